//! Version metadata for CLI surfaces.

/// Semver package version from `Cargo.toml`.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Render the version line used by `wattline --version`.
pub fn cli_version_text() -> String {
    format!("wattline {VERSION}")
}
