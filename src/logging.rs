//! 日志初始化：两个命令行工具共用的 tracing 配置。
//!
//! Both binaries log to stderr (stdout is the protocol channel for the
//! server). `RUST_LOG` takes precedence; when it is unset or empty the
//! binary's default level applies.

use tracing_subscriber::EnvFilter;

/// Build the filter from `RUST_LOG`, falling back to `default_directive`.
pub fn env_filter(default_directive: &str) -> EnvFilter {
    filter_from(std::env::var("RUST_LOG").ok().as_deref(), default_directive)
}

fn filter_from(rust_log: Option<&str>, default_directive: &str) -> EnvFilter {
    rust_log
        .filter(|v| !v.trim().is_empty())
        .and_then(|v| match EnvFilter::try_new(v) {
            Ok(filter) => Some(filter),
            Err(e) => {
                eprintln!("ignoring invalid RUST_LOG '{}': {}", v, e);
                None
            }
        })
        .unwrap_or_else(|| EnvFilter::new(default_directive))
}

/// Install the stderr subscriber. Later calls are no-ops.
pub fn init(default_directive: &str) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter(default_directive))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing::level_filters::LevelFilter;

    #[test]
    fn test_rust_log_overrides_default_level() {
        let filter = filter_from(Some("debug"), "info");
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::DEBUG));
    }

    #[test]
    fn test_default_applies_when_unset_or_empty() {
        assert_eq!(
            filter_from(None, "info").max_level_hint(),
            Some(LevelFilter::INFO)
        );
        assert_eq!(
            filter_from(Some("  "), "warn").max_level_hint(),
            Some(LevelFilter::WARN)
        );
    }
}
