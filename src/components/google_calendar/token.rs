use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};
use validator::Validate;

use crate::config::GoogleAuthEnv;
use crate::error::{auth_error, AppResult, Error};
use crate::utils::validation::format_validation_errors;

/// Default OAuth token endpoint
pub const GOOGLE_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// Scopes requested for the service account: calendar read/write and events read/write
pub const CALENDAR_SCOPES: [&str; 2] = [
    "https://www.googleapis.com/auth/calendar",
    "https://www.googleapis.com/auth/calendar.events",
];

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// Lifetime of the signed assertion, the maximum Google accepts
const ASSERTION_LIFETIME_SECS: i64 = 3600;

/// Source of bearer tokens for the calendar API
#[async_trait]
pub trait TokenProvider: Send + Sync + 'static {
    /// Obtain a token valid for at least the current request
    async fn access_token(&self) -> AppResult<String>;
}

/// Claims of the self-signed service account assertion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssertionClaims {
    pub iss: String,
    pub scope: String,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    expires_in: Option<i64>,
}

/// A validated service account credential
#[derive(Debug, Clone)]
pub struct ServiceAccountKey {
    pub project_id: String,
    pub private_key_id: String,
    pub client_email: String,
    pub private_key: String,
    pub client_id: String,
}

impl ServiceAccountKey {
    /// Validate the raw environment values.
    ///
    /// Escaped `\n` sequences in the private key become real newlines.
    pub fn from_env(env: &GoogleAuthEnv) -> AppResult<Self> {
        env.validate()
            .map_err(|errors| Error::Config(format_validation_errors(&errors)))?;

        let field = |value: &Option<String>| value.clone().unwrap_or_default();

        Ok(Self {
            project_id: field(&env.google_project_id),
            private_key_id: field(&env.google_private_key_id),
            client_email: field(&env.google_client_email),
            private_key: field(&env.google_private_key).replace("\\n", "\n"),
            client_id: field(&env.google_client_id),
        })
    }

    /// Sign the JWT assertion exchanged for an access token
    pub fn sign_assertion(&self, token_uri: &str, now: DateTime<Utc>) -> AppResult<String> {
        let claims = AssertionClaims {
            iss: self.client_email.clone(),
            scope: CALENDAR_SCOPES.join(" "),
            aud: token_uri.to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::seconds(ASSERTION_LIFETIME_SECS)).timestamp(),
        };

        let mut header = Header::new(Algorithm::RS256);
        header.kid = Some(self.private_key_id.clone());

        let key = EncodingKey::from_rsa_pem(self.private_key.as_bytes())
            .map_err(|e| Error::Config(format!("Invalid Google private key: {}", e)))?;

        encode(&header, &claims, &key)
            .map_err(|e| auth_error(&format!("Failed to sign service account assertion: {}", e)))
    }
}

/// Exchanges the service account credential for a scoped bearer token
pub struct ServiceAccountTokenProvider {
    credentials: GoogleAuthEnv,
    token_uri: String,
    client: Client,
}

impl ServiceAccountTokenProvider {
    pub fn new(credentials: GoogleAuthEnv, token_uri: &str) -> Self {
        Self {
            credentials,
            token_uri: token_uri.to_string(),
            client: Client::new(),
        }
    }

    /// Whether the configured credential passes validation
    pub fn check_credentials(&self) -> AppResult<()> {
        ServiceAccountKey::from_env(&self.credentials).map(|_| ())
    }
}

#[async_trait]
impl TokenProvider for ServiceAccountTokenProvider {
    async fn access_token(&self) -> AppResult<String> {
        let key = ServiceAccountKey::from_env(&self.credentials)?;
        let assertion = key.sign_assertion(&self.token_uri, Utc::now())?;

        let params = [("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())];

        let response = self
            .client
            .post(&self.token_uri)
            .form(&params)
            .send()
            .await
            .map_err(|e| auth_error(&format!("Failed to request access token: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Could not read error response".to_string());
            error!("Token exchange failed: HTTP {} - {}", status, error_body);
            return Err(auth_error(&format!(
                "Failed to obtain access token: HTTP {} - {}",
                status, error_body
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| auth_error(&format!("Failed to parse token response: {}", e)))?;

        match token.access_token {
            Some(access_token) if !access_token.is_empty() => {
                debug!(
                    "Obtained access token for {} (expires in {:?}s)",
                    key.client_email, token.expires_in
                );
                info!("Authenticated as service account {}", key.client_email);
                Ok(access_token)
            }
            _ => Err(auth_error("Failed to obtain access token from Google OAuth")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_credentials_fail_before_any_request() {
        let err = ServiceAccountKey::from_env(&GoogleAuthEnv::default()).unwrap_err();
        let message = err.to_string();

        assert!(message.starts_with("Configuration error: validation error: ["));
        assert!(message.contains("- google_project_id Google project ID is required"));
        assert!(message.contains("- google_client_email Valid Google service account email required"));
    }

    #[test]
    fn private_key_newlines_are_unescaped() {
        let env = GoogleAuthEnv {
            google_project_id: Some("p".to_string()),
            google_private_key_id: Some("k".to_string()),
            google_client_email: Some("svc@p.iam.gserviceaccount.com".to_string()),
            google_private_key: Some("line1\\nline2".to_string()),
            google_client_id: Some("c".to_string()),
        };

        let key = ServiceAccountKey::from_env(&env).unwrap();
        assert_eq!(key.private_key, "line1\nline2");
    }

    #[test]
    fn garbage_private_key_is_a_config_error() {
        let key = ServiceAccountKey {
            project_id: "p".to_string(),
            private_key_id: "k".to_string(),
            client_email: "svc@p.iam.gserviceaccount.com".to_string(),
            private_key: "not a pem".to_string(),
            client_id: "c".to_string(),
        };

        let err = key.sign_assertion(GOOGLE_TOKEN_URI, Utc::now()).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
