use serde::Deserialize;

/// Global application configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Base URL of the household document API (households, users, endpoints)
    pub doc_store_url: String,

    /// FCM project identifier for the v1 send endpoint
    pub fcm_project_id: String,

    /// OAuth bearer token for FCM; minted externally and rotated by the deployment
    pub fcm_access_token: String,

    /// FCM API origin (override for emulators)
    pub fcm_endpoint: String,

    /// Port the event webhook server listens on (default: 8080)
    pub http_port: u16,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            doc_store_url: std::env::var("DOC_STORE_URL")
                .map_err(|_| anyhow::anyhow!("DOC_STORE_URL environment variable is required"))?,
            fcm_project_id: std::env::var("FCM_PROJECT_ID")
                .map_err(|_| anyhow::anyhow!("FCM_PROJECT_ID environment variable is required"))?,
            fcm_access_token: std::env::var("FCM_ACCESS_TOKEN").map_err(|_| {
                anyhow::anyhow!("FCM_ACCESS_TOKEN environment variable is required")
            })?,
            fcm_endpoint: std::env::var("FCM_ENDPOINT")
                .unwrap_or_else(|_| "https://fcm.googleapis.com".to_string()),
            http_port: std::env::var("HTTP_PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("HTTP_PORT must be a valid u16"))?,
        })
    }
}
