//! Serialized summary of a completed build.
//!
//! The compiler reports one snapshot per finished build; the relay keeps
//! the most recent one and broadcasts it to connected clients.

use serde::{Deserialize, Serialize};

/// Per-asset emission flag from the latest build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetStats {
    /// Output file name of the asset.
    pub name: String,

    /// Whether the asset was actually (re)written during the latest build,
    /// as opposed to being unchanged from a prior build.
    pub emitted: bool,
}

impl AssetStats {
    /// Convenience constructor.
    pub fn new(name: impl Into<String>, emitted: bool) -> Self {
        Self {
            name: name.into(),
            emitted,
        }
    }
}

/// Stats snapshot of a completed build.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildStats {
    /// Build hash identifying the compilation.
    pub hash: String,

    /// Compilation errors, if any.
    pub errors: Vec<String>,

    /// Compilation warnings, if any.
    pub warnings: Vec<String>,

    /// Per-asset emission flags.
    pub assets: Vec<AssetStats>,
}

impl BuildStats {
    /// Whether at least one asset was (re)emitted during this build.
    ///
    /// A build where nothing was emitted is a no-op rebuild and is not
    /// worth notifying clients about unless they ask for it.
    pub fn any_emitted(&self) -> bool {
        self.assets.iter().any(|asset| asset.emitted)
    }

    /// Whether the build finished without errors or warnings.
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty() && self.warnings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_any_emitted() {
        let mut stats = BuildStats {
            hash: "abc123".to_string(),
            assets: vec![
                AssetStats::new("main.js", false),
                AssetStats::new("main.css", false),
            ],
            ..Default::default()
        };
        assert!(!stats.any_emitted());

        stats.assets[1].emitted = true;
        assert!(stats.any_emitted());
    }

    #[test]
    fn test_any_emitted_no_assets() {
        let stats = BuildStats::default();
        assert!(!stats.any_emitted());
    }

    #[test]
    fn test_is_clean() {
        let mut stats = BuildStats::default();
        assert!(stats.is_clean());

        stats.warnings.push("unused import".to_string());
        assert!(!stats.is_clean());
    }

    #[test]
    fn test_serialization_roundtrip() {
        let stats = BuildStats {
            hash: "deadbeef".to_string(),
            errors: vec!["module not found".to_string()],
            warnings: vec![],
            assets: vec![AssetStats::new("main.js", true)],
        };

        let json = serde_json::to_string(&stats).unwrap();
        let parsed: BuildStats = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, stats);
    }
}
