use crate::error::ConfigError;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use settings::{DatabaseSettings, LogFormat, LoggingSettings, ServerSettings, Settings};

/// Prefix of the environment variables that override the configuration file,
/// e.g. `GRADE_STATS__SERVER__PORT=8080`.
pub const ENV_PREFIX: &str = "GRADE_STATS";

/// Default configuration file, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "config.toml";

/// Loads the application configuration.
///
/// Sources, lowest priority first: built-in defaults, the configuration file
/// (`config.toml` when `path` is `None`, in which case it may be absent),
/// `GRADE_STATS__*` environment variables, then `DATABASE_URL` (read after
/// loading `.env`). The result is validated before being returned.
pub fn load_config(path: Option<&Path>) -> Result<Settings, ConfigError> {
    dotenvy::dotenv().ok();
    let database_url = std::env::var("DATABASE_URL").ok();
    load_config_with(path, database_url)
}

/// Same as [`load_config`] with the `DATABASE_URL` override passed explicitly.
pub fn load_config_with(
    path: Option<&Path>,
    database_url: Option<String>,
) -> Result<Settings, ConfigError> {
    let file = match path {
        Some(path) => config::File::from(path).required(true),
        None => config::File::with_name(DEFAULT_CONFIG_FILE).required(false),
    };

    let mut builder = config::Config::builder()
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 3000)?
        .set_default("server.request_timeout_secs", 30)?
        .set_default("database.url", "")?
        .set_default("database.max_connections", 10)?
        .set_default("database.acquire_timeout_secs", 5)?
        .set_default("database.query_timeout_secs", 10)?
        .set_default("logging.level", "info")?
        .set_default("logging.format", "pretty")?
        .add_source(file)
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        );

    if let Some(url) = database_url {
        builder = builder.set_override("database.url", url)?;
    }

    let settings = builder.build()?.try_deserialize::<Settings>()?;
    settings.validate()?;

    tracing::debug!(
        host = %settings.server.host,
        port = settings.server.port,
        max_connections = settings.database.max_connections,
        "Configuration loaded."
    );
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn file_values_override_defaults() {
        let file = write_config(
            r#"
            [server]
            port = 8080

            [database]
            url = "postgres://localhost/grades"
            query_timeout_secs = 3

            [logging]
            format = "json"
            "#,
        );

        let settings = load_config_with(Some(file.path()), None).unwrap();
        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.server.host, "0.0.0.0");
        assert_eq!(settings.server.request_timeout_secs, 30);
        assert_eq!(settings.database.url, "postgres://localhost/grades");
        assert_eq!(settings.database.max_connections, 10);
        assert_eq!(settings.database.query_timeout().as_secs(), 3);
        assert_eq!(settings.logging.format, LogFormat::Json);
        assert_eq!(settings.logging.level, "info");
        assert!(settings.logging.directory.is_none());
    }

    #[test]
    fn database_url_override_wins_over_file() {
        let file = write_config(
            r#"
            [database]
            url = "postgres://from-file/grades"
            "#,
        );

        let settings =
            load_config_with(Some(file.path()), Some("postgres://from-env/grades".to_string()))
                .unwrap();
        assert_eq!(settings.database.url, "postgres://from-env/grades");
    }

    #[test]
    fn missing_database_url_is_rejected() {
        let file = write_config("[server]\nport = 3000\n");
        let err = load_config_with(Some(file.path()), None).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn zero_pool_size_is_rejected() {
        let file = write_config(
            r#"
            [database]
            url = "postgres://localhost/grades"
            max_connections = 0
            "#,
        );
        let err = load_config_with(Some(file.path()), None).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(msg) if msg.contains("max_connections")));
    }

    #[test]
    fn request_timeout_must_outlast_query_timeout() {
        let file = write_config(
            r#"
            [server]
            request_timeout_secs = 10

            [database]
            url = "postgres://localhost/grades"
            query_timeout_secs = 10
            "#,
        );
        let err = load_config_with(Some(file.path()), None).unwrap_err();
        assert!(
            matches!(err, ConfigError::ValidationError(msg) if msg.contains("request_timeout_secs"))
        );
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let err = load_config_with(Some(Path::new("does-not-exist.toml")), None).unwrap_err();
        assert!(matches!(err, ConfigError::LoadError(_)));
    }

    #[test]
    fn socket_addr_is_built_from_host_and_port() {
        let file = write_config(
            r#"
            [server]
            host = "127.0.0.1"
            port = 4000

            [database]
            url = "postgres://localhost/grades"
            "#,
        );
        let settings = load_config_with(Some(file.path()), None).unwrap();
        assert_eq!(settings.server.socket_addr().unwrap().to_string(), "127.0.0.1:4000");
    }
}
