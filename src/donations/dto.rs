use serde::Deserialize;

/// Request body for registering a donation.
#[derive(Debug, Deserialize)]
pub struct CreateDonationRequest {
    pub descricao: String,
    pub quantidade: Option<String>,
    pub destino: Option<String>,
    #[serde(default)]
    pub recebido: bool,
}

/// Request body for a full update of one donation.
#[derive(Debug, Deserialize)]
pub struct UpdateDonationRequest {
    pub descricao: String,
    pub quantidade: Option<String>,
    pub destino: Option<String>,
    pub recebido: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_request_defaults_to_not_received() {
        let req: CreateDonationRequest =
            serde_json::from_str(r#"{"descricao": "arroz", "quantidade": "5kg"}"#).unwrap();
        assert_eq!(req.descricao, "arroz");
        assert_eq!(req.quantidade.as_deref(), Some("5kg"));
        assert_eq!(req.destino, None);
        assert!(!req.recebido);
    }
}
