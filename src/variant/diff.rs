//! Planned-vs-live parameter comparison.

use crate::domain::ParameterDiff;
use crate::params::ParameterSet;

/// Compare `planned` against values read from a live model.
///
/// `read_current` returns `None` when a value cannot be read; such parameters
/// count as mismatched so they get re-applied. Values are compared after
/// trimming whitespace. The result is sorted by name (case-sensitive).
pub fn detect_mismatches<F>(mut read_current: F, planned: &ParameterSet) -> Vec<ParameterDiff>
where
    F: FnMut(&str) -> Option<String>,
{
    let mut diffs: Vec<ParameterDiff> = planned
        .iter()
        .filter_map(|(name, value)| {
            let current = read_current(name);
            let matches = current
                .as_deref()
                .is_some_and(|c| c.trim() == value.trim());
            (!matches).then(|| ParameterDiff {
                name: name.to_string(),
                current,
                planned: value.to_string(),
            })
        })
        .collect();
    diffs.sort_by(|a, b| a.name.cmp(&b.name));
    diffs
}

#[cfg(test)]
mod tests {
    use super::*;

    fn planned() -> ParameterSet {
        ParameterSet::try_from_pairs([("n", "17"), ("d17", "5[nm]"), ("H0", "4[nm]")]).unwrap()
    }

    #[test]
    fn unreadable_values_are_all_mismatches() {
        let diffs = detect_mismatches(|_| None, &planned());
        assert_eq!(diffs.len(), 3);
        assert!(diffs.iter().all(|d| d.current.is_none()));
    }

    #[test]
    fn identical_values_after_trim_produce_no_diffs() {
        let p = planned();
        let diffs = detect_mismatches(|name| p.get(name).map(|v| format!("  {v} ")), &p);
        assert!(diffs.is_empty());
    }

    #[test]
    fn differing_values_are_reported_in_name_order() {
        let diffs = detect_mismatches(
            |name| match name {
                "n" => Some("0".to_string()),
                "d17" => Some("5[nm]".to_string()),
                _ => None,
            },
            &planned(),
        );
        let names: Vec<&str> = diffs.iter().map(|d| d.name.as_str()).collect();
        // Case-sensitive order: uppercase sorts first.
        assert_eq!(names, ["H0", "n"]);
        assert_eq!(diffs[1].current.as_deref(), Some("0"));
        assert_eq!(diffs[1].planned, "17");
    }

    #[test]
    fn unit_text_differences_count_as_mismatch() {
        let p = ParameterSet::try_from_pairs([("d0", "250[nm]")]).unwrap();
        let diffs = detect_mismatches(|_| Some("2.5E-7[m]".to_string()), &p);
        assert_eq!(diffs.len(), 1);
    }
}
