//! Variant parameter composition.
//!
//! Each variant model reads the same canonical parameters, but with a few knobs
//! substituted:
//!
//! - mirror: `n = 17`, `d17/h17 <- d17_mir/h17_mir`
//! - defect: `n = 0`, `d17/h17` untouched (geometry follows from `n = 0`)
//! - waveguide: `n = 17`, `d17/h17 <- d17_wg/h17_wg`
//!
//! Composition is a pure function of `(kind, base)`.

use crate::domain::VariantKind;
use crate::params::{ParameterSet, aliases};

const MIRROR_CELLS: &str = "17";
const DEFECT_CELLS: &str = "0";

/// Produce the parameter set a variant's model should use.
pub fn compose_variant_parameters(kind: VariantKind, base: &ParameterSet) -> ParameterSet {
    let mut params = base.clone();
    match kind {
        VariantKind::Mirror => {
            params.insert(aliases::CELL_COUNT, MIRROR_CELLS);
            copy_slot(base, &mut params, "d17_mir", aliases::D_SLOT);
            copy_slot(base, &mut params, "h17_mir", aliases::H_SLOT);
        }
        VariantKind::Defect => {
            params.insert(aliases::CELL_COUNT, DEFECT_CELLS);
        }
        VariantKind::Waveguide => {
            params.insert(aliases::CELL_COUNT, MIRROR_CELLS);
            copy_slot(base, &mut params, "d17_wg", aliases::D_SLOT);
            copy_slot(base, &mut params, "h17_wg", aliases::H_SLOT);
        }
    }
    params
}

fn copy_slot(base: &ParameterSet, params: &mut ParameterSet, from: &str, to: &str) {
    if let Some(value) = base.get(from) {
        params.insert(to, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> ParameterSet {
        ParameterSet::try_from_pairs([
            ("d17_mir", "5[nm]"),
            ("h17_mir", "2[nm]"),
            ("n_ext", "17"),
        ])
        .unwrap()
    }

    #[test]
    fn mirror_maps_mirror_targets_into_slots() {
        let p = compose_variant_parameters(VariantKind::Mirror, &base());
        assert_eq!(p.get("n"), Some("17"));
        assert_eq!(p.get("d17"), Some("5[nm]"));
        assert_eq!(p.get("h17"), Some("2[nm]"));
        assert_eq!(p.get("n_ext"), Some("17"));
    }

    #[test]
    fn defect_sets_zero_cells_and_leaves_slots_alone() {
        let p = compose_variant_parameters(VariantKind::Defect, &base());
        assert_eq!(p.get("n"), Some("0"));
        assert!(!p.contains("d17"));
        assert!(!p.contains("h17"));
        assert_eq!(p.len(), base().len() + 1);
    }

    #[test]
    fn waveguide_maps_only_present_targets() {
        let mut b = base();
        b.insert("d17_wg", "7[nm]");
        b.insert("h17", "9[nm]");
        let p = compose_variant_parameters(VariantKind::Waveguide, &b);
        assert_eq!(p.get("n"), Some("17"));
        assert_eq!(p.get("d17"), Some("7[nm]"));
        // No h17_wg: existing h17 passes through unchanged.
        assert_eq!(p.get("h17"), Some("9[nm]"));
    }

    #[test]
    fn base_is_not_mutated() {
        let b = base();
        let before = b.clone();
        let _ = compose_variant_parameters(VariantKind::Mirror, &b);
        assert_eq!(b, before);
    }

    #[test]
    fn existing_cell_count_keeps_its_casing() {
        let mut b = base();
        b.insert("N", "3");
        let p = compose_variant_parameters(VariantKind::Defect, &b);
        assert_eq!(p.canonical_name("n"), Some("N"));
        assert_eq!(p.get("N"), Some("0"));
    }
}
