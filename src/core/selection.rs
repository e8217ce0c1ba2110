//! core/selection.rs — Split per-object scans by layer label and truth match.

use crate::error::{RadiusError, RadiusResult};

/// Values of one quantity for a single layer label.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    pub all: Vec<f64>,
    pub matched: Vec<f64>,
}

impl Selection {
    pub fn is_empty(&self) -> bool {
        self.all.is_empty() || self.matched.is_empty()
    }
}

/// Select `values` whose label equals `label` (every value when `label` is
/// empty), then restrict that subset to truth-matched positions.
///
/// Both subsets come out of the same pass, so `matched` is always a
/// sub-multiset of `all` and keeps its relative order.
pub fn select(
    values: &[f64],
    matched_mask: &[bool],
    labels: &[String],
    label: &str,
) -> RadiusResult<Selection> {
    check_len("matched mask", values.len(), matched_mask.len())?;
    check_len("layer labels", values.len(), labels.len())?;

    let mut out = Selection::default();
    for ((&value, &is_matched), object_label) in values.iter().zip(matched_mask).zip(labels) {
        if !label.is_empty() && object_label != label {
            continue;
        }
        out.all.push(value);
        if is_matched {
            out.matched.push(value);
        }
    }
    Ok(out)
}

/// Distinct non-empty labels in sorted order, followed by "" for the unsplit view.
///
/// Objects without any decoded layer carry an empty label; they only show
/// up in the unsplit view.
pub fn unique_labels(labels: &[String]) -> Vec<String> {
    let mut unique: Vec<String> = labels.iter().filter(|l| !l.is_empty()).cloned().collect();
    unique.sort_unstable();
    unique.dedup();
    unique.push(String::new());
    unique
}

fn check_len(name: &str, expected: usize, got: usize) -> RadiusResult<()> {
    if expected != got {
        return Err(RadiusError::LengthMismatch {
            name: name.to_string(),
            expected,
            got,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn empty_label_selects_everything() {
        let values = [1.0, 2.0, 3.0];
        let mask = [true, false, true];
        let sel = select(&values, &mask, &labels(&["BB", "BE", "BB"]), "").unwrap();
        assert_eq!(sel.all, vec![1.0, 2.0, 3.0]);
        assert_eq!(sel.matched, vec![1.0, 3.0]);
    }

    #[test]
    fn label_restricts_both_subsets() {
        let values = [1.0, 2.0, 3.0, 4.0];
        let mask = [true, true, false, true];
        let sel = select(&values, &mask, &labels(&["BB", "BE", "BB", "BE"]), "BE").unwrap();
        assert_eq!(sel.all, vec![2.0, 4.0]);
        assert_eq!(sel.matched, vec![2.0, 4.0]);

        let sel = select(&values, &mask, &labels(&["BB", "BE", "BB", "BE"]), "BB").unwrap();
        assert_eq!(sel.all, vec![1.0, 3.0]);
        assert_eq!(sel.matched, vec![1.0]);
    }

    #[test]
    fn unknown_label_is_empty_not_error() {
        let sel = select(&[1.0], &[true], &labels(&["B"]), "EEEEE").unwrap();
        assert!(sel.all.is_empty());
        assert!(sel.is_empty());
    }

    #[test]
    fn length_mismatch_is_reported() {
        let err = select(&[1.0, 2.0], &[true], &labels(&["B", "B"]), "").unwrap_err();
        assert!(matches!(
            err,
            RadiusError::LengthMismatch {
                expected: 2,
                got: 1,
                ..
            }
        ));
    }

    #[test]
    fn unique_labels_sorted_with_unsplit_last() {
        let unique = unique_labels(&labels(&["BE", "BB", "BE", "EE"]));
        assert_eq!(unique, labels(&["BB", "BE", "EE", ""]));
        assert_eq!(unique_labels(&labels(&["", "B"])), labels(&["B", ""]));
    }
}
