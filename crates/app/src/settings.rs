//! Handles settings for the application.
//!
//! Values come, in increasing priority, from built-in defaults, an optional
//! `settings.toml`, `FINSTATS__`-prefixed environment variables (`__`
//! separates sections, e.g. `FINSTATS__SERVER__PORT`), and the historical
//! `JWT_SECRET`, `DATABASE_DSN` and `PORT` variables. A `.env` file is
//! loaded into the environment first when present.
use config::{Config, ConfigError, Environment, File, Source};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct App {
    pub level: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Database {
    Memory,
    Sqlite(String),
    Url(String),
}

#[derive(Debug, Deserialize)]
pub struct Pool {
    pub max_connections: u32,
    pub min_connections: u32,
    pub max_lifetime_secs: u64,
}

#[derive(Debug, Deserialize)]
pub struct Server {
    pub database: Option<Database>,
    pub bind: String,
    pub port: u16,
    pub request_timeout_secs: u64,
    pub pool: Pool,
}

#[derive(Debug, Deserialize)]
pub struct Auth {
    pub secret: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub app: App,
    pub server: Server,
    pub auth: Auth,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        if let Err(err) = dotenvy::dotenv()
            && !err.not_found()
        {
            return Err(ConfigError::Message(format!("failed to load .env: {err}")));
        }

        Self::load(
            File::with_name("settings").required(false),
            Environment::with_prefix("FINSTATS").separator("__"),
            |key| std::env::var(key).ok(),
        )
    }

    fn load<F, E>(
        file: F,
        env: E,
        var: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError>
    where
        F: Source + Send + Sync + 'static,
        E: Source + Send + Sync + 'static,
    {
        let mut settings: Settings = Config::builder()
            .set_default("app.level", "info")?
            .set_default("server.bind", "0.0.0.0")?
            .set_default("server.port", 8080)?
            .set_default("server.request_timeout_secs", 30)?
            .set_default("server.pool.max_connections", 100)?
            .set_default("server.pool.min_connections", 10)?
            .set_default("server.pool.max_lifetime_secs", 3600)?
            .add_source(file)
            .add_source(env)
            .set_override_option("auth.secret", var("JWT_SECRET"))?
            .set_override_option("server.port", var("PORT"))?
            .build()?
            .try_deserialize()?;

        // Replaces the whole variant; merging a `url` key into a file's
        // `{ sqlite = .. }` table would leave an ambiguous enum.
        if let Some(url) = var("DATABASE_DSN") {
            settings.server.database = Some(Database::Url(url));
        }

        Ok(settings)
    }

    /// The connection string is the one setting the process cannot start
    /// without.
    pub fn database(&self) -> Result<&Database, ConfigError> {
        self.server
            .database
            .as_ref()
            .ok_or_else(|| ConfigError::NotFound("server.database (or DATABASE_DSN)".to_string()))
    }
}
