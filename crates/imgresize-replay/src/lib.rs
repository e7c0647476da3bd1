#![forbid(unsafe_code)]

//! Scripted replay for the image resize overlay.
//!
//! A script names the starting image, the viewport, and an ordered list of
//! controller inputs. Replaying it drives a real
//! [`OverlayController`](imgresize_web::OverlayController) over an in-memory
//! target and reports every dispatch, the final overlay frame, the final
//! target state, and callback counts.

pub mod cli;
pub mod error;
pub mod replay;
pub mod script;

use tracing_subscriber::EnvFilter;

pub use cli::run_from_env;
pub use error::{ReplayError, Result};

/// Environment variable holding the log filter directive.
pub const LOG_ENV: &str = "IMGRESIZE_LOG";

/// Install a stderr `fmt` subscriber filtered by [`LOG_ENV`] (default `warn`).
///
/// Does nothing if a global subscriber is already set.
pub fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Whether errors should be reported as a JSON line.
#[must_use]
pub fn json_errors() -> bool {
    std::env::var("IMGRESIZE_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"))
}
