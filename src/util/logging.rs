//! Tracing subscriber setup.
//!
//! Logs go to stderr so `--format json` output on stdout stays parseable.
//! The subscriber is installed once per process; later calls are ignored.
//!
//! ```no_run
//! use sowgen::util::{init_logging, LoggingConfig};
//! use tracing::info;
//!
//! init_logging(LoggingConfig::development());
//! info!(workflow_id = "ab12cd34", "Processing takeoff");
//! ```

use crate::config::SowgenConfig;
use std::env;
use std::sync::Once;
use tracing::Level;
use tracing_subscriber::layer::{Layer, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Registry};

static INIT: Once = Once::new();

/// Crates whose chatter is capped unless `RUST_LOG` says otherwise.
const QUIET_DEPENDENCIES: &[&str] = &["h2=warn", "hyper=warn", "reqwest=warn", "tower_http=info"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Multi-field console lines
    Full,
    /// One short line per event, no target
    Compact,
    Json,
}

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub level: Level,
    pub format: LogFormat,
    pub include_target: bool,
    /// File and line of the call site
    pub include_location: bool,
    pub include_thread_ids: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            format: LogFormat::Full,
            include_target: true,
            include_location: false,
            include_thread_ids: false,
        }
    }
}

impl LoggingConfig {
    pub fn with_level(level: Level) -> Self {
        Self {
            level,
            ..Default::default()
        }
    }

    /// Level and JSON switch from `SOWGEN_LOG_LEVEL` / `SOWGEN_LOG_JSON`.
    pub fn from_config(config: &SowgenConfig) -> Self {
        let format = if config.log_json {
            LogFormat::Json
        } else {
            LogFormat::Full
        };
        Self {
            level: parse_level(&config.log_level),
            format,
            ..Default::default()
        }
    }

    /// JSON with call sites and thread ids, for the long-running server.
    pub fn production() -> Self {
        Self {
            level: Level::INFO,
            format: LogFormat::Json,
            include_target: true,
            include_location: true,
            include_thread_ids: true,
        }
    }

    pub fn development() -> Self {
        Self {
            level: Level::DEBUG,
            ..Default::default()
        }
    }

    /// Terse output for one-shot CLI commands.
    pub fn cli() -> Self {
        Self {
            level: Level::WARN,
            format: LogFormat::Compact,
            include_target: false,
            include_location: false,
            include_thread_ids: false,
        }
    }

    pub fn is_json(&self) -> bool {
        self.format == LogFormat::Json
    }

    /// `RUST_LOG` directives first, then the crate level, then the caps on
    /// noisy dependencies when `RUST_LOG` is unset.
    pub fn env_filter(&self) -> EnvFilter {
        let mut filter = EnvFilter::from_default_env();
        if let Ok(directive) = format!("sowgen={}", self.level).parse() {
            filter = filter.add_directive(directive);
        }
        if env::var_os("RUST_LOG").is_none() {
            for quiet in QUIET_DEPENDENCIES {
                if let Ok(directive) = quiet.parse() {
                    filter = filter.add_directive(directive);
                }
            }
        }
        filter
    }

    fn fmt_layer(&self) -> Box<dyn Layer<Registry> + Send + Sync> {
        let base = fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(self.include_target)
            .with_file(self.include_location)
            .with_line_number(self.include_location)
            .with_thread_ids(self.include_thread_ids)
            .with_thread_names(self.include_thread_ids);

        match self.format {
            LogFormat::Full => base.boxed(),
            LogFormat::Compact => base.compact().boxed(),
            LogFormat::Json => base.json().boxed(),
        }
    }
}

/// Case-insensitive level name. Unknown names fall back to INFO with a note
/// on stderr, since the subscriber is not up yet.
pub fn parse_level(name: &str) -> Level {
    name.trim().parse::<Level>().unwrap_or_else(|_| {
        eprintln!(
            "Invalid log level '{}', defaulting to INFO. Valid levels: trace, debug, info, warn, error",
            name
        );
        Level::INFO
    })
}

pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let filter = config.env_filter();
        tracing_subscriber::registry()
            .with(config.fmt_layer())
            .with(filter)
            .init();
    });
}

pub fn init_default() {
    init_logging(LoggingConfig::default());
}

/// Reads `SOWGEN_LOG_LEVEL` and `SOWGEN_LOG_JSON` through [`SowgenConfig`].
pub fn init_from_env() {
    init_logging(LoggingConfig::from_config(&SowgenConfig::default()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use yare::parameterized;

    #[parameterized(
        trace = { "trace", Level::TRACE },
        debug_mixed_case = { "Debug", Level::DEBUG },
        info_upper = { "INFO", Level::INFO },
        warn_padded = { " warn ", Level::WARN },
        error = { "error", Level::ERROR },
        unknown = { "verbose", Level::INFO },
        empty = { "", Level::INFO },
    )]
    fn test_parse_level(name: &str, expected: Level) {
        assert_eq!(parse_level(name), expected);
    }

    #[test]
    fn test_presets() {
        let default = LoggingConfig::default();
        assert_eq!(default.level, Level::INFO);
        assert!(!default.is_json());

        let production = LoggingConfig::production();
        assert!(production.is_json());
        assert!(production.include_location);

        assert_eq!(LoggingConfig::development().level, Level::DEBUG);

        let cli = LoggingConfig::cli();
        assert_eq!(cli.format, LogFormat::Compact);
        assert!(!cli.include_target);
    }

    #[test]
    fn test_from_config() {
        let app = SowgenConfig {
            log_level: "warn".to_string(),
            log_json: true,
            ..SowgenConfig::default()
        };
        let config = LoggingConfig::from_config(&app);
        assert_eq!(config.level, Level::WARN);
        assert!(config.is_json());
    }

    #[test]
    fn test_env_filter_names_crate_level() {
        let filter = LoggingConfig::with_level(Level::DEBUG).env_filter();
        assert!(filter.to_string().contains("sowgen=debug"));
    }

    #[test]
    fn test_init_logging_twice_is_noop() {
        init_logging(LoggingConfig::default());
        init_logging(LoggingConfig::production());
    }
}
