use std::{env, time::Duration};

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub catalog_api_url: String,
    pub image_upload_url: String,
    pub image_upload_preset: Option<String>,
    pub upstream_timeout: Duration,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL")?;
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(3000);
        let catalog_api_url =
            env::var("CATALOG_API_URL").unwrap_or_else(|_| "http://127.0.0.1:4000".to_string());
        let image_upload_url = env::var("IMAGE_UPLOAD_URL")
            .unwrap_or_else(|_| "http://127.0.0.1:4000/image-upload".to_string());
        let image_upload_preset = env::var("IMAGE_UPLOAD_PRESET")
            .ok()
            .filter(|p| !p.is_empty());
        let upstream_timeout = env::var("UPSTREAM_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(15));
        Ok(Self {
            port,
            database_url,
            host,
            catalog_api_url,
            image_upload_url,
            image_upload_preset,
            upstream_timeout,
        })
    }
}
