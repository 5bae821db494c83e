use chrono::{DateTime, Duration, Utc};
use constant_time_eq::constant_time_eq;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A registered OAuth2 client. The `id` is the primary key of the record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Client {
    pub id: String,
    #[serde(default)]
    pub secret: String,
    #[serde(default)]
    pub redirect_uri: String,
    /// Opaque data attached by the server owner.
    #[serde(default)]
    pub user_data: Value,
}

impl Client {
    pub fn new(
        id: impl Into<String>,
        secret: impl Into<String>,
        redirect_uri: impl Into<String>,
    ) -> Self {
        Client {
            id: id.into(),
            secret: secret.into(),
            redirect_uri: redirect_uri.into(),
            user_data: Value::Null,
        }
    }

    /// Compares the stored secret against `candidate` in constant time.
    pub fn secret_matches(&self, candidate: &str) -> bool {
        constant_time_eq(self.secret.as_bytes(), candidate.as_bytes())
    }
}

/// An authorization code grant, stored under its code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthorizeData {
    pub client: Client,
    pub code: String,
    /// Lifetime in seconds, also used as the record's TTL.
    pub expires_in: u32,
    #[serde(default)]
    pub scope: String,
    #[serde(default)]
    pub redirect_uri: String,
    #[serde(default)]
    pub state: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub user_data: Value,
    // PKCE (RFC 7636)
    #[serde(default)]
    pub code_challenge: String,
    #[serde(default)]
    pub code_challenge_method: String,
}

impl AuthorizeData {
    pub fn expire_at(&self) -> DateTime<Utc> {
        self.created_at + Duration::seconds(i64::from(self.expires_in))
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expire_at() < now
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }
}

/// Access token grant. The same shape is stored under the refresh token key,
/// holding the token's previous `AccessData` in the rotation chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessData {
    pub client: Client,
    /// Grant this token was minted from, if any.
    #[serde(default)]
    pub authorize_data: Option<Box<AuthorizeData>>,
    /// Previous token in the rotation chain, if any.
    #[serde(default)]
    pub access_data: Option<Box<AccessData>>,
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: String,
    pub expires_in: u32,
    #[serde(default)]
    pub scope: String,
    #[serde(default)]
    pub redirect_uri: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub user_data: Value,
}

impl AccessData {
    pub fn expire_at(&self) -> DateTime<Utc> {
        self.created_at + Duration::seconds(i64::from(self.expires_in))
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expire_at() < now
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    pub fn has_refresh_token(&self) -> bool {
        !self.refresh_token.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn created_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2015, 1, 1, 12, 12, 12).unwrap()
    }

    #[test]
    fn test_secret_matches() {
        let client = Client::new("client_id", "client_secret", "http://some.redirect.here");
        assert!(client.secret_matches("client_secret"));
        assert!(!client.secret_matches("client_secreT"));
        assert!(!client.secret_matches(""));
    }

    #[test]
    fn test_authorize_expiry() {
        let data = AuthorizeData {
            client: Client::new("client_id", "", ""),
            code: "foo".to_string(),
            expires_in: 1000,
            scope: String::new(),
            redirect_uri: String::new(),
            state: String::new(),
            created_at: created_at(),
            user_data: Value::Null,
            code_challenge: String::new(),
            code_challenge_method: String::new(),
        };

        assert_eq!(data.expire_at(), created_at() + Duration::seconds(1000));
        assert!(!data.is_expired_at(created_at() + Duration::seconds(1000)));
        assert!(data.is_expired_at(created_at() + Duration::seconds(1001)));
        assert!(data.is_expired());
    }

    #[test]
    fn test_nested_records_are_optional_in_documents() {
        // A refresh record written without a grant or chain still decodes.
        let doc = json!({
            "client": { "id": "client_id" },
            "access_token": "footookeeen",
            "expires_in": 3600,
            "created_at": "2015-01-01T12:12:12Z"
        });

        let data: AccessData = serde_json::from_value(doc).unwrap();
        assert_eq!(data.client.id, "client_id");
        assert_eq!(data.client.user_data, Value::Null);
        assert!(data.authorize_data.is_none());
        assert!(data.access_data.is_none());
        assert!(!data.has_refresh_token());
        assert_eq!(data.created_at, created_at());
    }
}
