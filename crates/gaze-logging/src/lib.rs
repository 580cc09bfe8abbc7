//! Shared tracing setup for the gaze agent workspace.
//!
//! Grounded on `logging::lib`/`logging::fmt`: a crate-scoped `EnvFilter`
//! spec builder plus an `init_tracing` that installs a `fmt` subscriber.
//! Unlike the teacher, there is no UI process to forward logs to, so this
//! crate carries no `forward`-layer equivalent — every crate here logs to
//! stderr through `tracing`, never `println!`.
#![warn(missing_docs)]

use tracing_subscriber::EnvFilter;

/// Crate targets included in default logging directives, the workspace's
/// analogue of `logging::OUR_CRATES`.
const OUR_CRATES: &[&str] = &[
    "gaze",
    "gaze_protocol",
    "gaze_platform",
    "gaze_capture",
    "gaze_classifier",
    "gaze_region",
    "gaze_vision",
    "gaze_registry",
    "gaze_mapper",
    "gaze_tracker",
    "gaze_motion",
    "gaze_action",
    "gaze_brush",
    "gaze_step",
    "gaze_planner",
    "gaze_recovery",
    "gaze_director",
];

/// Build a filter directive string that sets `level` for every crate in
/// [`OUR_CRATES`], leaving everything else at its default (roughly `warn`).
#[must_use]
pub fn level_spec_for(level: &str) -> String {
    let lvl = level.to_ascii_lowercase();
    OUR_CRATES
        .iter()
        .map(|crate_name| format!("{crate_name}={lvl}"))
        .collect::<Vec<_>>()
        .join(",")
}

/// Compute the final filter spec, preferring `RUST_LOG` when set and
/// falling back to crate-scoped `info`.
#[must_use]
pub fn compute_spec() -> String {
    std::env::var("RUST_LOG").unwrap_or_else(|_| level_spec_for("info"))
}

/// Build an [`EnvFilter`] from an explicit spec string.
#[must_use]
pub fn env_filter_from_spec(spec: &str) -> EnvFilter {
    EnvFilter::new(spec)
}

/// Install a global `fmt` subscriber filtered by `spec` (or, if empty, by
/// [`compute_spec`]). Returns an error if a global subscriber is already
/// set; safe to call once at process startup.
pub fn init_tracing(spec: &str) -> Result<(), tracing::subscriber::SetGlobalDefaultError> {
    let spec = if spec.is_empty() { compute_spec() } else { spec.to_string() };
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(env_filter_from_spec(&spec))
        .finish();
    tracing::subscriber::set_global_default(subscriber)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_spec_scopes_every_crate_in_our_crates() {
        let spec = level_spec_for("debug");
        assert!(spec.contains("gaze_director=debug"));
        assert!(spec.contains("gaze_protocol=debug"));
        assert_eq!(spec.split(',').count(), OUR_CRATES.len());
    }

    #[test]
    fn env_filter_from_spec_accepts_a_crate_scoped_directive() {
        let _filter = env_filter_from_spec("gaze_director=trace");
    }
}
