use anyhow::Result;

/// Configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    pub token_url: String,
    pub client_id: String,
    pub client_secret: String,
}

/// Load configuration from `.env` and environment
pub fn load_config() -> Result<Config> {
    // Load `.env` file if present
    dotenv::dotenv().ok();
    // Credentials are required; the endpoints default to the public catalog
    let client_id = std::env::var("CATALOG_CLIENT_ID")?;
    let client_secret = std::env::var("CATALOG_CLIENT_SECRET")?;
    let api_url =
        std::env::var("CATALOG_API_URL").unwrap_or_else(|_| "https://api.spotify.com/v1".to_string());
    let token_url = std::env::var("CATALOG_TOKEN_URL")
        .unwrap_or_else(|_| "https://accounts.spotify.com/api/token".to_string());
    Ok(Config {
        api_url,
        token_url,
        client_id,
        client_secret,
    })
}
