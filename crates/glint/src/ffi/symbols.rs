//! Inventory of the exported C surface.
//!
//! Each api module keeps its own symbol list next to its functions and
//! this module only aggregates, so a function added without its list
//! entry shows up as a test failure rather than a silent gap in the
//! inventory.

use super::{context_api, draw_api, io_api};

fn vanilla_surface() -> Vec<&'static str> {
    let mut symbols = Vec::new();
    symbols.extend_from_slice(context_api::SYMBOLS);
    symbols.extend_from_slice(io_api::SYMBOLS);
    symbols.extend_from_slice(draw_api::SYMBOLS);
    #[cfg(feature = "backend-glfw")]
    symbols.extend_from_slice(super::platform_api::SYMBOLS);
    #[cfg(feature = "renderer-opengl")]
    symbols.extend_from_slice(super::renderer_api::SYMBOLS);
    symbols
}

/// Names of every `extern "C"` function this build exports, sorted.
///
/// Variant features only ever add names: a docking or latest build
/// exports a superset of the vanilla surface, so a loader written
/// against vanilla resolves against any variant.
#[must_use]
pub fn exported_symbols() -> Vec<&'static str> {
    let mut symbols = vanilla_surface();
    #[cfg(feature = "docking")]
    symbols.extend_from_slice(super::docking_api::SYMBOLS);
    #[cfg(feature = "latest")]
    symbols.extend_from_slice(super::latest_api::SYMBOLS);
    symbols.sort_unstable();
    symbols
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbols_are_prefixed_and_unique() {
        let symbols = exported_symbols();
        assert!(!symbols.is_empty());
        for name in &symbols {
            assert!(name.starts_with("glint_"), "unprefixed symbol {name}");
        }
        let mut deduped = symbols.clone();
        deduped.dedup();
        assert_eq!(deduped.len(), symbols.len());
    }

    #[test]
    fn test_variant_surface_is_superset_of_vanilla() {
        let exported = exported_symbols();
        for name in vanilla_surface() {
            assert!(exported.contains(&name), "vanilla symbol {name} missing");
        }
    }

    #[cfg(feature = "docking")]
    #[test]
    fn test_docking_build_adds_dock_symbols() {
        let symbols = exported_symbols();
        assert!(symbols.contains(&"glint_dock_space"));
        let dock_count = symbols
            .iter()
            .filter(|name| name.starts_with("glint_dock_"))
            .count();
        assert!(dock_count >= 3);
    }

    // Hinting changes glyph rasterization, not the C surface; builds
    // with and without it export the same names.
    #[test]
    fn test_hinting_gates_no_symbols() {
        for name in exported_symbols() {
            assert!(!name.contains("hint"), "unexpected symbol {name}");
        }
    }
}
