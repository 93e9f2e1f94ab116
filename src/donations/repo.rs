use sqlx::SqlitePool;

use crate::donations::repo_types::Donation;
use crate::error::AppError;

impl Donation {
    /// Insert a new row. The owner must exist; the foreign key rejects an
    /// unknown id before anything is written.
    pub async fn add(
        db: &SqlitePool,
        descricao: &str,
        quantidade: Option<&str>,
        destino: Option<&str>,
        recebido: bool,
        user_id: i64,
    ) -> Result<Donation, AppError> {
        let donation = sqlx::query_as::<_, Donation>(
            r#"
            INSERT INTO doacoes (descricao, quantidade, destino, recebido, userId)
            VALUES (?, ?, ?, ?, ?)
            RETURNING id, descricao, quantidade, destino, recebido, userId
            "#,
        )
        .bind(descricao)
        .bind(quantidade)
        .bind(destino)
        .bind(recebido)
        .bind(user_id)
        .fetch_one(db)
        .await?;
        Ok(donation)
    }

    pub async fn find_by_id(db: &SqlitePool, id: i64) -> Result<Option<Donation>, AppError> {
        let donation = sqlx::query_as::<_, Donation>(
            r#"
            SELECT id, descricao, quantidade, destino, recebido, userId
            FROM doacoes
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(donation)
    }

    pub async fn find_by_owner(db: &SqlitePool, user_id: i64) -> Result<Vec<Donation>, AppError> {
        let donations = sqlx::query_as::<_, Donation>(
            r#"
            SELECT id, descricao, quantidade, destino, recebido, userId
            FROM doacoes
            WHERE userId = ?
            ORDER BY id
            "#,
        )
        .bind(user_id)
        .fetch_all(db)
        .await?;
        Ok(donations)
    }

    pub async fn find_all(db: &SqlitePool) -> Result<Vec<Donation>, AppError> {
        let donations = sqlx::query_as::<_, Donation>(
            r#"
            SELECT id, descricao, quantidade, destino, recebido, userId
            FROM doacoes
            ORDER BY id
            "#,
        )
        .fetch_all(db)
        .await?;
        Ok(donations)
    }

    /// Full-row replace by id, except ownership: a donation never moves
    /// between users. Returns false when no row has this id.
    pub async fn update(&self, db: &SqlitePool) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE doacoes
            SET descricao = ?, quantidade = ?, destino = ?, recebido = ?
            WHERE id = ?
            "#,
        )
        .bind(self.descricao.as_str())
        .bind(self.quantidade.as_deref())
        .bind(self.destino.as_deref())
        .bind(self.recebido)
        .bind(self.id)
        .execute(db)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn delete(db: &SqlitePool, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM doacoes WHERE id = ?")
            .bind(id)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
