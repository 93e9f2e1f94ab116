use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One registered donation. Field names mirror the `doacoes` table columns
/// and serialize unchanged onto the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Donation {
    pub id: i64,
    pub descricao: String,
    pub quantidade: Option<String>,
    pub destino: Option<String>,
    pub recebido: bool,
    #[sqlx(rename = "userId")]
    #[serde(rename = "userId")]
    pub user_id: i64,
}
