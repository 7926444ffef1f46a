//! Verbosity levels and `tracing` subscriber setup.

use tracing_subscriber::EnvFilter;

/// Output verbosity, from silent to per-column detail.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verbosity {
    NoOutput = 0,
    /// Failures that stop processing
    Error = 1,
    /// Unexpected input that processing recovers from
    Warn = 2,
    /// Progress information
    #[default]
    Info = 3,
    Debug = 4,
    /// Expected behavior, per column and per unit
    Detail = 5,
}

impl Verbosity {
    pub fn from_level(level: u8) -> Self {
        match level {
            0 => Verbosity::NoOutput,
            1 => Verbosity::Error,
            2 => Verbosity::Warn,
            3 => Verbosity::Info,
            4 => Verbosity::Debug,
            _ => Verbosity::Detail,
        }
    }

    /// The `tracing` filter directive for this level
    pub fn directive(self) -> &'static str {
        match self {
            Verbosity::NoOutput => "off",
            Verbosity::Error => "error",
            Verbosity::Warn => "warn",
            Verbosity::Info => "info",
            Verbosity::Debug => "debug",
            Verbosity::Detail => "trace",
        }
    }
}

/// Install the global subscriber. `RUST_LOG` wins over the verbosity level when set.
pub fn init(verbosity: Verbosity) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity.directive()));

    // A subscriber may already be installed (tests, embedding applications).
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_level() {
        assert_eq!(Verbosity::from_level(0), Verbosity::NoOutput);
        assert_eq!(Verbosity::from_level(3), Verbosity::Info);
        assert_eq!(Verbosity::from_level(5), Verbosity::Detail);
        assert_eq!(Verbosity::from_level(9), Verbosity::Detail);
    }

    #[test]
    fn test_directive() {
        assert_eq!(Verbosity::NoOutput.directive(), "off");
        assert_eq!(Verbosity::Detail.directive(), "trace");
        assert!(Verbosity::Warn < Verbosity::Info);
    }

    #[test]
    fn test_capture_levels() {
        let ((), levels) = capture::levels_of(|| {
            tracing::info!("one");
            tracing::trace!("two");
        });
        assert_eq!(levels, vec![tracing::Level::INFO, tracing::Level::TRACE]);
    }
}
