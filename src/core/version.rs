//! Build metadata and telemetry protocol version.
//! Includes the generated version.rs from the build script so the binaries
//! and the codec share a single source of truth.

include!(concat!(env!("OUT_DIR"), "/version.rs"));

/// Telemetry wire protocol version recorded in `Cargo.toml` package metadata.
/// Falls back to 1 if the build script could not read it.
pub fn protocol_version() -> u32 {
    TELEMETRY_PROTOCOL_VERSION.parse().unwrap_or(1)
}

/// Build time string from the build script (UTC)
pub fn build_time() -> &'static str {
    BUILD_TIME
}

/// Short git hash captured by the build script
pub fn git_hash() -> &'static str {
    GIT_HASH
}

/// One-line banner logged by both binaries at startup
pub fn banner(binary: &str) -> String {
    format!(
        "{} {} (protocol v{}, {}, built {})",
        binary,
        env!("CARGO_PKG_VERSION"),
        protocol_version(),
        git_hash(),
        build_time()
    )
}
