// fencekeep/src/logger.rs
//! Logging setup for the `fencekeep` binary.
//!
//! `RUST_LOG` is honoured as the base filter; an explicit level from the
//! command line overrides it. Logs go to stderr so they never mix with
//! sanitized output on stdout.

use log::LevelFilter;

/// Default filter when neither `RUST_LOG` nor a flag is given.
const DEFAULT_FILTER: &str = "warn";

/// Initializes `env_logger`. Safe to call more than once; later calls are ignored.
pub fn init_logger(level: Option<LevelFilter>) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(DEFAULT_FILTER));
    if let Some(level) = level {
        builder.filter_level(level);
    }
    builder.format_timestamp(None);
    let _ = builder.try_init();
}

/// Maps the `--quiet` / `--debug` flags to a level override.
///
/// `--quiet` wins when both are given.
pub fn level_from_flags(quiet: bool, debug: bool) -> Option<LevelFilter> {
    if quiet {
        Some(LevelFilter::Off)
    } else if debug {
        Some(LevelFilter::Debug)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_from_flags() {
        assert_eq!(level_from_flags(false, false), None);
        assert_eq!(level_from_flags(false, true), Some(LevelFilter::Debug));
        assert_eq!(level_from_flags(true, true), Some(LevelFilter::Off));
    }
}
