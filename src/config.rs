use crate::components::google_calendar::client::GOOGLE_API_BASE;
use crate::components::google_calendar::token::GOOGLE_TOKEN_URI;
use crate::error::{env_error, AppResult};
use dotenvy::dotenv;
use std::env;
use validator::Validate;

/// Default bind address
pub const DEFAULT_HOST: &str = "127.0.0.1";
/// Default listening port
pub const DEFAULT_PORT: u16 = 8787;

/// Service account credential as provided through the environment.
///
/// Values stay raw here; they are checked each time a token is requested so a
/// misconfigured deployment still serves the health route.
#[derive(Debug, Clone, Default, Validate)]
pub struct GoogleAuthEnv {
    #[validate(
        required(message = "Google project ID is required"),
        length(min = 1, message = "Google project ID is required")
    )]
    pub google_project_id: Option<String>,
    #[validate(
        required(message = "Google private key ID is required"),
        length(min = 1, message = "Google private key ID is required")
    )]
    pub google_private_key_id: Option<String>,
    #[validate(
        required(message = "Valid Google service account email required"),
        email(message = "Valid Google service account email required")
    )]
    pub google_client_email: Option<String>,
    #[validate(
        required(message = "Google private key is required"),
        length(min = 1, message = "Google private key is required")
    )]
    pub google_private_key: Option<String>,
    #[validate(
        required(message = "Google client ID is required"),
        length(min = 1, message = "Google client ID is required")
    )]
    pub google_client_id: Option<String>,
}

impl GoogleAuthEnv {
    /// Read the five `GOOGLE_*` credential variables
    pub fn from_env() -> Self {
        Self {
            google_project_id: env::var("GOOGLE_PROJECT_ID").ok(),
            google_private_key_id: env::var("GOOGLE_PRIVATE_KEY_ID").ok(),
            google_client_email: env::var("GOOGLE_CLIENT_EMAIL").ok(),
            google_private_key: env::var("GOOGLE_PRIVATE_KEY").ok(),
            google_client_id: env::var("GOOGLE_CLIENT_ID").ok(),
        }
    }
}

/// Main configuration structure for the gateway
#[derive(Debug, Clone)]
pub struct Config {
    /// Address to bind the HTTP server to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Service account credential
    pub google: GoogleAuthEnv,
    /// OAuth token endpoint used for the service account exchange
    pub google_token_uri: String,
    /// Calendar REST API base URL
    pub calendar_api_base: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            google: GoogleAuthEnv::default(),
            google_token_uri: GOOGLE_TOKEN_URI.to_string(),
            calendar_api_base: GOOGLE_API_BASE.to_string(),
        }
    }
}

impl Config {
    /// Load configuration from the environment, reading `.env` first if present
    pub fn load() -> AppResult<Self> {
        dotenv().ok();

        let host = env::var("HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string());

        let port = match env::var("PORT") {
            Ok(port) => port.parse::<u16>().map_err(|_| env_error("PORT"))?,
            Err(_) => DEFAULT_PORT,
        };

        let google_token_uri =
            env::var("GOOGLE_TOKEN_URI").unwrap_or_else(|_| GOOGLE_TOKEN_URI.to_string());
        let calendar_api_base =
            env::var("GOOGLE_CALENDAR_API_BASE").unwrap_or_else(|_| GOOGLE_API_BASE.to_string());

        Ok(Config {
            host,
            port,
            google: GoogleAuthEnv::from_env(),
            google_token_uri,
            calendar_api_base,
        })
    }
}
