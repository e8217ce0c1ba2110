//! File names and titles derived from quantity labels.

use std::path::{Path, PathBuf};

/// Filesystem-safe token for a quantity label.
///
/// "(1/inner radius - 1/sim_radius)/(1/inner radius)" becomes
/// "1byinner_radius_minus_1bysim_radiusby_1byinner_radius".
pub fn sanitize_quantity(quantity: &str) -> String {
    let token = quantity
        .replace('(', " ")
        .replace(')', "")
        .replace('/', "by")
        .replace('-', "minus")
        .replace(' ', "_");
    match token.strip_prefix('_') {
        Some(rest) => rest.to_string(),
        None => token,
    }
}

/// `<dir>/<sanitized>[_<layer_type>].<ext>`; no directory means the working directory.
pub fn output_path(dir: Option<&Path>, quantity: &str, layer_type: &str, ext: &str) -> PathBuf {
    let stem = sanitize_quantity(quantity);
    let file_name = if layer_type.is_empty() {
        format!("{stem}.{ext}")
    } else {
        format!("{stem}_{layer_type}.{ext}")
    };
    match dir {
        Some(dir) => dir.join(file_name),
        None => PathBuf::from(file_name),
    }
}

/// Per-plot title; the unsplit view shows the quantity alone.
pub fn plot_title(quantity: &str, layer_type: &str) -> String {
    if layer_type.is_empty() {
        quantity.to_string()
    } else {
        format!("{quantity} type {layer_type}")
    }
}

/// Title for the all-vs-matched overlay; triplet pt labels read as radii.
pub fn combined_title(quantity: &str, layer_type: &str) -> String {
    if layer_type.is_empty() && quantity.contains("TripletPt") {
        quantity.replace("TripletPt", "Triplet radius")
    } else {
        plot_title(quantity, layer_type)
    }
}

pub fn suptitle(sample: &str, tag: &str) -> String {
    format!("Sample = {sample} Tag = {tag}")
}

#[cfg(test)]
mod tests {
    use super::*;

    const INNER: &str = "(1/inner radius - 1/sim_radius)/(1/inner radius)";

    #[test]
    fn sanitize_residual_label() {
        let token = sanitize_quantity(INNER);
        assert_eq!(token, "1byinner_radius_minus_1bysim_radiusby_1byinner_radius");
        assert!(!token.contains(['(', ')', '/', '-', ' ']));
        assert!(!token.starts_with('_'));
    }

    #[test]
    fn sanitize_strips_only_one_leading_underscore() {
        assert_eq!(sanitize_quantity("((a"), "_a");
        assert_eq!(sanitize_quantity("plain"), "plain");
    }

    #[test]
    fn output_path_with_and_without_layer_type() {
        let dir = Path::new("plots");
        assert_eq!(
            output_path(Some(dir), "a/b", "BBE", "pdf"),
            PathBuf::from("plots/abyb_BBE.pdf")
        );
        assert_eq!(output_path(None, "a/b", "", "svg"), PathBuf::from("abyb.svg"));
    }

    #[test]
    fn titles() {
        assert_eq!(plot_title("q", ""), "q");
        assert_eq!(plot_title("q", "BE"), "q type BE");
        assert_eq!(combined_title("TripletPt - x", ""), "Triplet radius - x");
        assert_eq!(combined_title("TripletPt", "BE"), "TripletPt type BE");
        assert_eq!(suptitle("ttbar", "v1"), "Sample = ttbar Tag = v1");
    }
}
