//! Opt-in tracing setup for hosts and the `chart_spec_tool` binary.
//!
//! Library code only emits `tracing` events under the `sheet_charts` target;
//! nothing is printed until a subscriber is installed, either by the host or
//! through [`init_default_tracing`].

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "sheet_charts=info";

/// Installs a compact stderr subscriber filtered by `RUST_LOG`, or by
/// `fallback_filter` when the variable is missing or invalid.
///
/// Returns `false` when the `telemetry` feature is disabled or a global
/// subscriber is already set. Output goes to stderr so compiled specifications
/// written to stdout stay machine readable.
#[must_use]
pub fn init_tracing(fallback_filter: &str) -> bool {
    #[cfg(feature = "telemetry")]
    {
        use tracing_subscriber::EnvFilter;

        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback_filter));
        return tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .compact()
            .try_init()
            .is_ok();
    }

    #[cfg(not(feature = "telemetry"))]
    {
        let _ = fallback_filter;
        false
    }
}

#[must_use]
pub fn init_default_tracing() -> bool {
    init_tracing(DEFAULT_FILTER)
}
