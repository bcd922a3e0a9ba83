use anyhow::Context;

pub const DEFAULT_DOG_API_URL: &str = "https://dog.ceo/api/breeds/image/random";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub session_secret: String,
    pub dog_api_url: String,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
        // No default fallback: a missing or short secret is a startup failure.
        let session_secret =
            std::env::var("SESSION_SECRET").context("SESSION_SECRET must be set")?;
        anyhow::ensure!(
            session_secret.len() >= 32,
            "SESSION_SECRET must be at least 32 bytes"
        );

        let host = std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let port = std::env::var("APP_PORT")
            .ok()
            .and_then(|v| v.parse::<u16>().ok())
            .unwrap_or(3000);
        let dog_api_url =
            std::env::var("DOG_API_URL").unwrap_or_else(|_| DEFAULT_DOG_API_URL.into());

        Ok(Self {
            host,
            port,
            database_url,
            session_secret,
            dog_api_url,
        })
    }
}
