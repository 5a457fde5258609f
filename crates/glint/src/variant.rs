//! Build-variant identification
//!
//! The feature set a binary was compiled with is part of its identity:
//! every artifact reports its variant tag so embedders can verify they
//! linked the configuration they meant to. The tag is purely informative
//! at runtime; feature selection happens at compile time and is never
//! switched dynamically.

/// Feature configuration of this artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildVariant {
    /// Dock-node subsystem compiled in.
    pub docking: bool,
    /// FreeType hint-processing rasterizer compiled in.
    pub hinting: bool,
    /// Experimental additions tracking the unreleased revision.
    pub latest: bool,
}

impl BuildVariant {
    /// The variant this artifact was compiled as.
    #[must_use]
    pub const fn current() -> Self {
        Self {
            docking: cfg!(feature = "docking"),
            hinting: cfg!(feature = "hinting"),
            latest: cfg!(feature = "latest"),
        }
    }

    /// Whether no optional variant feature is active.
    #[must_use]
    pub const fn is_vanilla(self) -> bool {
        !self.docking && !self.hinting && !self.latest
    }

    /// Stable tag naming this configuration.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match (self.docking, self.hinting, self.latest) {
            (false, false, false) => "vanilla",
            (true, false, false) => "docking",
            (true, true, false) => "docking-hinting",
            (false, false, true) => "latest",
            (false, true, false) => "hinting",
            (true, false, true) => "docking-latest",
            (false, true, true) => "hinting-latest",
            (true, true, true) => "docking-hinting-latest",
        }
    }
}

/// Crate version as compiled.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Human-readable identity: crate version plus variant tag.
#[must_use]
pub fn version_string() -> String {
    format!("glint {} ({})", VERSION, BuildVariant::current().label())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_current_matches_compiled_features() {
        let variant = BuildVariant::current();
        assert_eq!(variant.docking, cfg!(feature = "docking"));
        assert_eq!(variant.hinting, cfg!(feature = "hinting"));
        assert_eq!(variant.latest, cfg!(feature = "latest"));
    }

    #[test]
    fn test_labels_are_distinct() {
        let mut labels = Vec::new();
        for docking in [false, true] {
            for hinting in [false, true] {
                for latest in [false, true] {
                    labels.push(
                        BuildVariant {
                            docking,
                            hinting,
                            latest,
                        }
                        .label(),
                    );
                }
            }
        }
        let count = labels.len();
        labels.sort_unstable();
        labels.dedup();
        assert_eq!(labels.len(), count);
    }

    #[test]
    fn test_version_string_carries_the_tag() {
        let s = version_string();
        assert!(s.contains(VERSION));
        assert!(s.contains(BuildVariant::current().label()));
    }
}
