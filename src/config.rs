use anyhow::Result;
use std::env;
use std::sync::OnceLock;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub jwt_expiration_days: i64,
    pub host: String,
    pub port: u16,
    pub environment: String,
}

static CONFIG: OnceLock<Config> = OnceLock::new();

/// Global configuration, loaded from the environment on first access.
pub fn config() -> &'static Config {
    CONFIG.get_or_init(|| Config::from_env().expect("failed to load configuration"))
}

/// Override the global configuration. Intended for tests.
pub fn set_config(config: Config) {
    let _ = CONFIG.set(config);
}

impl Config {
    pub fn from_env() -> Result<Self> {
        // Load .env file if it exists
        dotenvy::dotenv().ok();

        Ok(Config {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "postgres://@localhost:5432/intramural".to_string()),
            jwt_secret: env::var("JWT_SECRET").unwrap_or_else(|_| {
                "change-this-development-jwt-secret-before-deploying".to_string()
            }),
            jwt_expiration_days: env::var("JWT_EXPIRATION_DAYS")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .unwrap_or(30),
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
        })
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_are_sensible() {
        let config = Config {
            database_url: "postgres://@localhost:5432/intramural".to_string(),
            jwt_secret: "secret".to_string(),
            jwt_expiration_days: 30,
            host: "127.0.0.1".to_string(),
            port: 8080,
            environment: "development".to_string(),
        };

        assert_eq!(config.server_address(), "127.0.0.1:8080");
        assert!(!config.is_production());
    }
}
