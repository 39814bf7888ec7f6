use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub frontend_url: String,

    pub jwt_secret: String,

    pub claude_api_key: String,
    pub claude_model: String,
    pub claude_api_url: String,

    // Generation client behaviour
    pub generation_timeout_secs: u64,
    pub generation_max_retries: u32,
    pub generation_rate_limit: u32,
    pub generation_rate_window_secs: u64,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".into())
                .parse()
                .expect("PORT must be a number"),
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:3000".into()),

            jwt_secret: env::var("JWT_SECRET").expect("JWT_SECRET must be set"),

            claude_api_key: env::var("CLAUDE_API_KEY").unwrap_or_else(|_| String::new()),
            claude_model: env::var("CLAUDE_MODEL")
                .unwrap_or_else(|_| "claude-sonnet-4-20250514".into()),
            claude_api_url: env::var("CLAUDE_API_URL")
                .unwrap_or_else(|_| "https://api.anthropic.com/v1/messages".into()),

            generation_timeout_secs: env::var("GENERATION_TIMEOUT_SECS")
                .unwrap_or_else(|_| "30".into())
                .parse()
                .unwrap_or(30),
            generation_max_retries: env::var("GENERATION_MAX_RETRIES")
                .unwrap_or_else(|_| "2".into())
                .parse()
                .unwrap_or(2),
            generation_rate_limit: env::var("GENERATION_RATE_LIMIT")
                .unwrap_or_else(|_| "20".into())
                .parse()
                .unwrap_or(20),
            generation_rate_window_secs: env::var("GENERATION_RATE_WINDOW_SECS")
                .unwrap_or_else(|_| "60".into())
                .parse()
                .unwrap_or(60),
        }
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Configuration used by unit tests; never reads the environment.
    #[cfg(test)]
    pub fn for_tests() -> Self {
        Self {
            database_url: "postgres://localhost/dailywell_test".into(),
            host: "127.0.0.1".into(),
            port: 0,
            frontend_url: "http://localhost:3000".into(),
            jwt_secret: "test-secret".into(),
            claude_api_key: String::new(),
            claude_model: "test-model".into(),
            claude_api_url: "http://localhost:9/v1/messages".into(),
            generation_timeout_secs: 1,
            generation_max_retries: 0,
            generation_rate_limit: 3,
            generation_rate_window_secs: 60,
        }
    }
}
