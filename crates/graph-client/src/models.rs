use serde::{Deserialize, Serialize};

/// Profile returned by `GET /me`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    /// Only present when the token carries the `email` permission.
    #[serde(default)]
    pub email: Option<String>,
}

/// Response of `GET /oauth/access_token_info`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenInfo {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub token_type: Option<String>,
    /// Remaining lifetime in seconds. Absent for tokens without an expiry.
    #[serde(default)]
    pub expires_in: Option<u64>,
}

/// One page entry of `GET /me/accounts`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageAccount {
    pub id: String,
    pub name: String,
    pub access_token: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AccountsPage {
    #[serde(default)]
    pub data: Vec<PageAccount>,
    #[serde(default)]
    pub paging: Option<Paging>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Paging {
    #[serde(default)]
    pub next: Option<String>,
}

/// Graph error envelope: `{"error": {"message": ..., "type": ..., "code": ...}}`.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorEnvelope {
    pub error: ErrorBody,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub code: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_info_without_expiry() {
        let info: TokenInfo =
            serde_json::from_str(r#"{"access_token":"abc","token_type":"bearer"}"#).unwrap();
        assert_eq!(info.expires_in, None);
    }

    #[test]
    fn test_accounts_page_parses_paging() {
        let page: AccountsPage = serde_json::from_str(
            r#"{
                "data": [{"id": "1", "name": "Page", "access_token": "tok", "category": "Shop"}],
                "paging": {"cursors": {"before": "a", "after": "b"}, "next": "https://x/next"}
            }"#,
        )
        .unwrap();
        assert_eq!(page.data.len(), 1);
        assert_eq!(page.data[0].name, "Page");
        assert_eq!(
            page.paging.and_then(|p| p.next).as_deref(),
            Some("https://x/next")
        );
    }
}
