//! Stamps GROOT_GIT_SHA and GROOT_BUILD_DATE into the library.
//!
//! Tarball builds have no .git, so both values can be supplied through the
//! environment; otherwise they come from git and the build clock.

use std::env;
use std::process::Command;

const SHA_VAR: &str = "GROOT_GIT_SHA";
const DATE_VAR: &str = "GROOT_BUILD_DATE";

fn preset(var: &str) -> Option<String> {
    env::var(var).ok().filter(|v| !v.trim().is_empty())
}

fn git_short_sha() -> Option<String> {
    let output = Command::new("git")
        .args(["rev-parse", "--short=10", "HEAD"])
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }
    let sha = String::from_utf8(output.stdout).ok()?;
    Some(sha.trim().to_owned()).filter(|s| !s.is_empty())
}

fn main() {
    let sha = preset(SHA_VAR)
        .or_else(git_short_sha)
        .unwrap_or_else(|| "unknown".to_owned());
    let date = preset(DATE_VAR).unwrap_or_else(|| chrono::Utc::now().format("%Y-%m-%d").to_string());

    println!("cargo:rustc-env={SHA_VAR}={sha}");
    println!("cargo:rustc-env={DATE_VAR}={date}");

    println!("cargo:rerun-if-env-changed={SHA_VAR}");
    println!("cargo:rerun-if-env-changed={DATE_VAR}");
    println!("cargo:rerun-if-changed=../../.git/HEAD");
}
