use config::Config;
use log::info;
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use std::sync::Arc;
use tokio::time::Duration;

pub mod config;
pub mod logging;

/// PostgreSQL schema holding every Phaunos table and enum type.
pub const DB_SCHEMA: &str = "phaunos";

pub async fn init_database(config: &Config) -> Result<DatabaseConnection, DbErr> {
    info!(
        "Connecting to database (pool {}..{} connections, schema {DB_SCHEMA})",
        config.db_min_connections, config.db_max_connections,
    );

    Database::connect(connect_options(config)).await
}

fn connect_options(config: &Config) -> ConnectOptions {
    let mut opt = ConnectOptions::new(config.database_url());
    opt.max_connections(config.db_max_connections)
        .min_connections(config.db_min_connections)
        .connect_timeout(Duration::from_secs(config.db_connect_timeout_secs))
        .acquire_timeout(Duration::from_secs(config.db_acquire_timeout_secs))
        .idle_timeout(Duration::from_secs(config.db_idle_timeout_secs))
        .max_lifetime(Duration::from_secs(config.db_max_lifetime_secs))
        .sqlx_logging(true)
        .sqlx_logging_level(log::LevelFilter::Debug)
        .set_schema_search_path(DB_SCHEMA);
    opt
}

// Needs to implement Clone to be able to be passed into Router as State
#[derive(Clone)]
pub struct AppState {
    pub database_connection: Arc<DatabaseConnection>,
    pub config: Config,
}

impl AppState {
    pub fn new(app_config: Config, db: &Arc<DatabaseConnection>) -> Self {
        Self {
            database_connection: Arc::clone(db),
            config: app_config,
        }
    }

    pub fn db_conn_ref(&self) -> &DatabaseConnection {
        self.database_connection.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn connect_options_use_the_phaunos_schema_and_pool_limits() {
        let config = Config::parse_from([
            "phaunos",
            "--jwt-secret-key",
            "test-secret",
            "--database-url",
            "postgres://u:p@db:5432/phaunos",
            "--db-max-connections",
            "7",
        ]);

        let options = connect_options(&config);

        assert_eq!(options.get_url(), "postgres://u:p@db:5432/phaunos");
        assert_eq!(options.get_max_connections(), Some(7));
        assert_eq!(options.get_schema_search_path(), Some(&DB_SCHEMA.to_string()));
    }
}
