use dotenvy::dotenv;
use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub redis_url: String,
    pub kafka_brokers: String,
    pub port: u16,
    /// Redis pub/sub channel real-time chat events are published to.
    pub chat_events_channel: String,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self, crate::error::AppError> {
        dotenv().ok();
        let database_url = env::var("DATABASE_URL")
            .map_err(|_| crate::error::AppError::Config("DATABASE_URL missing".into()))?;
        let redis_url = env::var("REDIS_URL").unwrap_or_else(|_| "redis://127.0.0.1:6379".into());
        let kafka_brokers = env::var("KAFKA_BROKERS").unwrap_or_else(|_| "localhost:9092".into());
        let port = env::var("PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(4005);
        let chat_events_channel =
            env::var("CHAT_EVENTS_CHANNEL").unwrap_or_else(|_| "chat:events".into());

        let db_max_connections = env::var("DB_MAX_CONNECTIONS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(10);
        let db_min_connections = env::var("DB_MIN_CONNECTIONS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(2);
        let db_acquire_timeout_secs = env::var("DB_ACQUIRE_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(10);

        Ok(Self {
            database_url,
            redis_url,
            kafka_brokers,
            port,
            chat_events_channel,
            db_max_connections,
            db_min_connections,
            db_acquire_timeout_secs,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clear_env() {
        for key in [
            "DATABASE_URL",
            "REDIS_URL",
            "KAFKA_BROKERS",
            "PORT",
            "CHAT_EVENTS_CHANNEL",
            "DB_MAX_CONNECTIONS",
            "DB_MIN_CONNECTIONS",
            "DB_ACQUIRE_TIMEOUT_SECS",
        ] {
            std::env::remove_var(key);
        }
    }

    #[test]
    #[serial_test::serial]
    fn from_env_requires_database_url() {
        clear_env();
        assert!(Config::from_env().is_err());
    }

    #[test]
    #[serial_test::serial]
    fn from_env_applies_defaults() {
        clear_env();
        std::env::set_var("DATABASE_URL", "postgres://localhost/chat_test");

        let cfg = Config::from_env().unwrap();
        assert_eq!(cfg.redis_url, "redis://127.0.0.1:6379");
        assert_eq!(cfg.kafka_brokers, "localhost:9092");
        assert_eq!(cfg.port, 4005);
        assert_eq!(cfg.chat_events_channel, "chat:events");
        assert_eq!(cfg.db_max_connections, 10);
        assert_eq!(cfg.db_min_connections, 2);
        assert_eq!(cfg.db_acquire_timeout_secs, 10);

        std::env::remove_var("DATABASE_URL");
    }

    #[test]
    #[serial_test::serial]
    fn from_env_honours_overrides() {
        clear_env();
        std::env::set_var("DATABASE_URL", "postgres://localhost/chat_test");
        std::env::set_var("PORT", "8088");
        std::env::set_var("CHAT_EVENTS_CHANNEL", "chat:staging");
        std::env::set_var("DB_MAX_CONNECTIONS", "25");

        let cfg = Config::from_env().unwrap();
        assert_eq!(cfg.port, 8088);
        assert_eq!(cfg.chat_events_channel, "chat:staging");
        assert_eq!(cfg.db_max_connections, 25);

        clear_env();
    }
}
