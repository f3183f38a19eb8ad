//! Build-time version information.

use serde::{Deserialize, Serialize};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const GIT_SHA: &str = env!("GROOT_GIT_SHA");
pub const BUILD_DATE: &str = env!("GROOT_BUILD_DATE");

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionInfo {
    pub version: String,
    pub git_sha: String,
    pub build_date: String,
}

impl VersionInfo {
    pub fn current() -> Self {
        Self {
            version: VERSION.to_string(),
            git_sha: GIT_SHA.to_string(),
            build_date: BUILD_DATE.to_string(),
        }
    }

    /// One-line summary for startup logs
    pub fn display(&self) -> String {
        format!("{} ({} {})", self.version, self.git_sha, self.build_date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_stamps_present() {
        let info = VersionInfo::current();
        assert!(!info.git_sha.is_empty());
        assert_eq!(info.build_date.len(), "2024-01-01".len());
        assert!(info.display().starts_with(VERSION));
    }
}
