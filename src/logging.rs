//! Process-wide tracing setup for the relay binary.

use std::sync::OnceLock;

static INIT: OnceLock<()> = OnceLock::new();

/// Environment variable consulted when no level is given explicitly.
pub const LOG_ENV: &str = "PRESENCE_RELAY_LOG";

/// Parse a level name; anything unrecognized means `info`.
pub fn parse_level(name: &str) -> tracing::Level {
    match name.trim().to_ascii_lowercase().as_str() {
        "trace" => tracing::Level::TRACE,
        "debug" => tracing::Level::DEBUG,
        "warn" => tracing::Level::WARN,
        "error" => tracing::Level::ERROR,
        _ => tracing::Level::INFO,
    }
}

/// Install the stderr subscriber.
///
/// `explicit` wins over [`LOG_ENV`]. Only the first call has any effect.
pub fn init(explicit: Option<&str>) {
    if INIT.get().is_some() {
        return;
    }
    let level = match explicit {
        Some(name) => parse_level(name),
        None => parse_level(&std::env::var(LOG_ENV).unwrap_or_default()),
    };
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
    let _ = INIT.set(());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level_names() {
        assert_eq!(parse_level("TRACE"), tracing::Level::TRACE);
        assert_eq!(parse_level(" debug "), tracing::Level::DEBUG);
        assert_eq!(parse_level("warn"), tracing::Level::WARN);
        assert_eq!(parse_level("error"), tracing::Level::ERROR);
        assert_eq!(parse_level(""), tracing::Level::INFO);
        assert_eq!(parse_level("verbose"), tracing::Level::INFO);
    }

    #[test]
    fn test_init_twice_is_harmless() {
        init(Some("error"));
        init(Some("trace"));
    }
}
