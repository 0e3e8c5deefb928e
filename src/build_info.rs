//! Build information module
//!
//! Compile-time metadata set by `build.rs`, shown in the startup banner and
//! the `nutritrack_status` tool.

use std::fmt;

use serde::Serialize;

/// Build number, incremented on each recompilation
pub const BUILD_NUMBER: u64 = match option_env!("NUTRITRACK_BUILD_NUMBER") {
    Some(s) => match parse_u64(s) {
        Some(n) => n,
        None => 0,
    },
    None => 0,
};

/// Build timestamp in ISO 8601 format
pub const BUILD_TIMESTAMP: &str = env_or_unknown(option_env!("NUTRITRACK_BUILD_TIMESTAMP"));

/// Cargo profile (`debug` or `release`)
pub const BUILD_PROFILE: &str = env_or_unknown(option_env!("NUTRITRACK_BUILD_PROFILE"));

/// Target triple the binary was compiled for
pub const BUILD_TARGET: &str = env_or_unknown(option_env!("NUTRITRACK_BUILD_TARGET"));

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

const fn env_or_unknown(value: Option<&'static str>) -> &'static str {
    match value {
        Some(s) => s,
        None => "unknown",
    }
}

/// `str::parse` is not const, so digits are folded by hand
const fn parse_u64(s: &str) -> Option<u64> {
    let bytes = s.as_bytes();
    if bytes.is_empty() {
        return None;
    }
    let mut result: u64 = 0;
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        if b < b'0' || b > b'9' {
            return None;
        }
        result = result * 10 + (b - b'0') as u64;
        i += 1;
    }
    Some(result)
}

#[derive(Debug, Clone, Serialize)]
pub struct BuildInfo {
    pub name: &'static str,
    pub version: &'static str,
    pub build_number: u64,
    pub build_timestamp: &'static str,
    pub profile: &'static str,
    pub target: &'static str,
}

impl BuildInfo {
    pub fn current() -> Self {
        Self {
            name: NAME,
            version: VERSION,
            build_number: BUILD_NUMBER,
            build_timestamp: BUILD_TIMESTAMP,
            profile: BUILD_PROFILE,
            target: BUILD_TARGET,
        }
    }

    pub fn is_release(&self) -> bool {
        self.profile == "release"
    }
}

impl Default for BuildInfo {
    fn default() -> Self {
        Self::current()
    }
}

/// One-line form, e.g. `nutritrack 1.0.0 (build 12, release)`
impl fmt::Display for BuildInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} (build {}, {})",
            self.name, self.version, self.build_number, self.profile
        )
    }
}

/// Print the startup banner to stderr (stdout carries the MCP transport)
pub fn print_startup_banner() {
    let info = BuildInfo::current();
    eprintln!("===============================================");
    eprintln!("  Nutrition Tracker - {}", DESCRIPTION);
    eprintln!("  {}", info);
    eprintln!("  Compiled: {} for {}", info.build_timestamp, info.target);
    if !info.is_release() {
        eprintln!("  Debug build: goal and store logs are verbose with RUST_LOG=nutritrack=debug");
    }
    eprintln!("===============================================");
}
