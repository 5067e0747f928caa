use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_path: String,
    /// Directory holding the built front-end bundle.
    pub static_dir: String,
    /// Origins allowed by CORS. Empty means any origin.
    pub allowed_origins: Vec<String>,
    pub monobank_token: String,
    /// Override for the Monobank API base URL (tests, staging).
    pub monobank_api_url: Option<String>,
    /// Where the payment page sends the attendee after checkout.
    pub redirect_url: String,
    /// Where Monobank posts payment status callbacks.
    pub webhook_url: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port: u16 = env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(3000);

        let base_url =
            env::var("BASE_URL").unwrap_or_else(|_| format!("http://{}:{}", host, port));

        Self {
            database_path: env::var("DATABASE_PATH").unwrap_or_else(|_| "confreg.db".to_string()),
            static_dir: env::var("STATIC_DIR").unwrap_or_else(|_| "dist".to_string()),
            allowed_origins: env::var("ALLOWED_ORIGINS")
                .map(|v| {
                    v.split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect()
                })
                .unwrap_or_default(),
            monobank_token: env::var("MONOBANK_TOKEN").unwrap_or_default(),
            monobank_api_url: env::var("MONOBANK_API_URL").ok(),
            redirect_url: env::var("MONOBANK_REDIRECT_URL")
                .unwrap_or_else(|_| format!("{}/thank-you", base_url)),
            webhook_url: env::var("MONOBANK_WEBHOOK_URL")
                .unwrap_or_else(|_| format!("{}/payment-callback", base_url)),
            host,
            port,
        }
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
