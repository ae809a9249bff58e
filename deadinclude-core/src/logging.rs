//! Structured logging using **tracing**.
//!
//! Library code emits events through the `tracing` macros; binaries call
//! [`init_structured_logging`] once to route them to stderr as JSON, so
//! stdout stays reserved for findings and reports.

/// Initializes the global tracing subscriber.
///
/// Call once at startup. Repeated calls are ignored instead of panicking.
///
/// # Environment Variables
/// - `RUST_LOG`: Controls log filtering (e.g., `RUST_LOG=deadinclude_core=debug`)
pub fn init_structured_logging() {
    let _ = tracing_subscriber::fmt()
        .json()
        .with_ansi(false)
        .with_level(true)
        .with_target(true)
        .with_current_span(true)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();
}
