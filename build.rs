//! Build script for nutritrack
//!
//! Embeds a persistent build counter, the build time, and the cargo profile
//! and target the binary was compiled for.

use std::env;
use std::fs;
use std::path::Path;

const BUILD_NUMBER_FILE: &str = "build_number.txt";

fn read_build_number(path: &Path) -> u64 {
    fs::read_to_string(path)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(0)
}

fn main() {
    println!("cargo:rerun-if-changed=src");
    println!("cargo:rerun-if-changed=build.rs");

    let build_number_path = Path::new(BUILD_NUMBER_FILE);
    let build_number = read_build_number(build_number_path) + 1;

    fs::write(build_number_path, build_number.to_string())
        .expect("Failed to write build number file");

    let timestamp = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string();
    let profile = env::var("PROFILE").unwrap_or_else(|_| "unknown".to_string());
    let target = env::var("TARGET").unwrap_or_else(|_| "unknown".to_string());

    println!("cargo:rustc-env=NUTRITRACK_BUILD_NUMBER={}", build_number);
    println!("cargo:rustc-env=NUTRITRACK_BUILD_TIMESTAMP={}", timestamp);
    println!("cargo:rustc-env=NUTRITRACK_BUILD_PROFILE={}", profile);
    println!("cargo:rustc-env=NUTRITRACK_BUILD_TARGET={}", target);

    println!(
        "cargo:warning=nutritrack build #{} ({} {}) at {}",
        build_number, profile, target, timestamp
    );
}
