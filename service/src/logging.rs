use crate::config::Config;
use log::{LevelFilter, SetLoggerError};
use simplelog::{self, ConfigBuilder};

/// Dependencies whose records are dropped unless the level is TRACE.
const NOISY_DEPENDENCIES: &[&str] = &[
    "sqlx", "sea_orm", "tower", "tracing", "hyper", "axum", "reqwest", "rustls",
];

pub struct Logger {}

impl Logger {
    /// Installs a terminal logger at the configured level.
    ///
    /// Fails when a global logger is already installed.
    pub fn init_logger(config: &Config) -> Result<(), SetLoggerError> {
        simplelog::TermLogger::init(
            Self::to_simplelog_level(config.log_level_filter),
            Self::log_config(Self::ignored_modules(config.log_level_filter)),
            simplelog::TerminalMode::Mixed,
            simplelog::ColorChoice::Auto,
        )
    }

    fn to_simplelog_level(level: LevelFilter) -> simplelog::LevelFilter {
        match level {
            LevelFilter::Off => simplelog::LevelFilter::Off,
            LevelFilter::Error => simplelog::LevelFilter::Error,
            LevelFilter::Warn => simplelog::LevelFilter::Warn,
            LevelFilter::Info => simplelog::LevelFilter::Info,
            LevelFilter::Debug => simplelog::LevelFilter::Debug,
            LevelFilter::Trace => simplelog::LevelFilter::Trace,
        }
    }

    /// Module prefixes to silence at the given level. TRACE shows everything.
    fn ignored_modules(level: LevelFilter) -> &'static [&'static str] {
        if level == LevelFilter::Trace {
            &[]
        } else {
            NOISY_DEPENDENCIES
        }
    }

    fn log_config(ignored_modules: &[&'static str]) -> simplelog::Config {
        let mut builder = ConfigBuilder::new();
        builder.set_time_format_rfc3339();
        for module in ignored_modules {
            builder.add_filter_ignore_str(module);
        }
        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trace_level_keeps_dependency_logs() {
        assert!(Logger::ignored_modules(LevelFilter::Trace).is_empty());
    }

    #[test]
    fn every_other_level_silences_database_and_http_dependencies() {
        for level in [
            LevelFilter::Off,
            LevelFilter::Error,
            LevelFilter::Warn,
            LevelFilter::Info,
            LevelFilter::Debug,
        ] {
            let ignored = Logger::ignored_modules(level);
            for module in ["sqlx", "sea_orm", "axum", "hyper", "reqwest"] {
                assert!(ignored.contains(&module), "{module} not ignored at {level}");
            }
        }
    }

    #[test]
    fn log_config_builds_with_and_without_filters() {
        let _filtered = Logger::log_config(NOISY_DEPENDENCIES);
        let _unfiltered = Logger::log_config(&[]);
    }

    #[test]
    fn level_conversion_preserves_ordering() {
        let levels = [
            LevelFilter::Off,
            LevelFilter::Error,
            LevelFilter::Warn,
            LevelFilter::Info,
            LevelFilter::Debug,
            LevelFilter::Trace,
        ];
        let converted: Vec<simplelog::LevelFilter> =
            levels.iter().map(|l| Logger::to_simplelog_level(*l)).collect();

        assert!(converted.windows(2).all(|pair| pair[0] < pair[1]));
        assert_eq!(converted[3], simplelog::LevelFilter::Info);
    }
}
