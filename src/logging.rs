use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Library targets that log alongside the binary.
const TARGETS: [&str; 9] = [
    "cauce",
    "cauce_anomaly",
    "cauce_calendar",
    "cauce_io",
    "cauce_regime",
    "cauce_seasonal",
    "cauce_series",
    "cauce_stats",
    "cauce_trend",
];

/// Level for the cauce targets.
///
/// Skipped units in a batch are reported at `warn`, so that is the floor
/// unless `quiet` is set, which keeps errors only.
fn level(verbose: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::ERROR;
    }
    match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

/// `EnvFilter` directives: other crates stay at `warn`, cauce targets at
/// `level`.
fn directives(level: LevelFilter) -> String {
    let mut parts = vec![LevelFilter::WARN.min(level).to_string().to_lowercase()];
    parts.extend(TARGETS.iter().map(|t| format!("{t}={}", level.to_string().to_lowercase())));
    parts.join(",")
}

/// Install the stderr subscriber. `RUST_LOG` takes precedence over the
/// flags.
pub fn init(verbose: u8, quiet: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(directives(level(verbose, quiet))));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(verbose > 1)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_levels() {
        assert_eq!(level(0, false), LevelFilter::WARN);
        assert_eq!(level(1, false), LevelFilter::INFO);
        assert_eq!(level(2, false), LevelFilter::DEBUG);
        assert_eq!(level(7, false), LevelFilter::TRACE);
        assert_eq!(level(2, true), LevelFilter::ERROR);
    }

    #[test]
    fn directives_cover_every_target() {
        let d = directives(LevelFilter::DEBUG);
        assert!(d.starts_with("warn,"));
        for t in TARGETS {
            assert!(d.contains(&format!("{t}=debug")));
        }
        assert!(EnvFilter::try_new(&d).is_ok());
    }

    #[test]
    fn quiet_silences_dependencies_too() {
        let d = directives(LevelFilter::ERROR);
        assert!(d.starts_with("error,"));
        assert!(d.contains("cauce_io=error"));
    }
}
