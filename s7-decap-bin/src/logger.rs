use crate::error::{DecapError, DecapResult};
use tracing::{level_filters::LevelFilter, subscriber::set_global_default, Level};
use tracing_subscriber::{fmt, layer::SubscriberExt, EnvFilter, Layer, Registry};

/// Console logger. Records go to stdout, so logs are written to stderr.
pub struct Logger {
    level: Level,
}

impl Logger {
    pub fn new(level: Option<Level>) -> Self {
        Logger {
            level: level.unwrap_or(Level::INFO),
        }
    }

    /// `DEBUG` when verbose, `INFO` otherwise.
    pub fn from_verbosity(verbose: bool) -> Self {
        Logger::new(verbose.then_some(Level::DEBUG))
    }

    #[inline]
    pub fn get_level(&self) -> Level {
        self.level
    }

    /// `RUST_LOG` directives when set, the configured level otherwise.
    fn filter(&self) -> EnvFilter {
        EnvFilter::builder()
            .with_default_directive(LevelFilter::from_level(self.level).into())
            .from_env_lossy()
    }

    /// Install the global subscriber. Fails if one is already installed.
    pub fn initialize(&self) -> DecapResult<()> {
        let console_layer = {
            let layer = fmt::layer().with_writer(std::io::stderr).with_target(false);

            #[cfg(debug_assertions)]
            let layer = layer.with_file(true).with_line_number(true);

            layer.with_filter(self.filter())
        };

        let subscriber = Registry::default().with(console_layer);
        set_global_default(subscriber)
            .map_err(|_| DecapError::InitializationError("Failed to set logger".to_string()))?;
        Ok(())
    }
}
