//! 로그 설정
//!
//! Engine `tracing` events reach env_logger through the `log` feature of
//! `tracing`, so one filter covers the runner and the engine.

use env_logger::{Builder, Target};

/// Filter used before `RUST_LOG` is applied. Third-party crates stay at
/// warn. Per-tick engine traces only show up when `RUST_LOG` asks for them.
pub fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        "warn,ss_cli=debug,ss_core=debug"
    } else {
        "warn,ss_cli=info,ss_core=info"
    }
}

/// Installs the global logger on stderr so stdout stays clean for reports.
/// `RUST_LOG` directives override the defaults module by module.
pub fn init(verbose: bool) {
    let mut builder = Builder::new();
    builder.parse_filters(default_filter(verbose));
    if let Ok(spec) = std::env::var("RUST_LOG") {
        builder.parse_filters(&spec);
    }
    builder.format_timestamp_millis().target(Target::Stderr);

    // a second init (tests, embedding) keeps the first logger
    let _ = builder.try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_levels() {
        assert!(default_filter(false).contains("ss_core=info"));
        assert!(default_filter(true).contains("ss_core=debug"));
        assert!(default_filter(true).starts_with("warn,"));
    }

    #[test]
    fn test_init_twice_is_harmless() {
        init(false);
        init(true);
        log::info!("logger installed");
    }
}
