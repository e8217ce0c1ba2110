//! core/quantity.rs — Radius residuals against simulated truth.
//!
//! sim_radius = pt / (k·B) with k = 2.99792458e-3 GeV/(T·cm).
//! residual  = |1/r − 1/r_sim| / (1/r), i.e. the relative curvature error.

/// Values at or below this mark an invalid/missing entry.
pub const SENTINEL: f64 = -999.0;

/// Speed-of-light factor converting pt [GeV] and B [T] into radius [cm].
pub const PT_TO_RADIUS_FACTOR: f64 = 2.99792458e-3;

/// Default solenoid field [T].
pub const DEFAULT_B_FIELD: f64 = 3.8;

#[inline]
pub fn is_sentinel(value: f64) -> bool {
    value <= SENTINEL
}

/// Radius estimate being compared against the simulated radius.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RadiusKind {
    Inner,
    Bridge,
    Outer,
}

impl RadiusKind {
    pub const ALL: [RadiusKind; 3] = [RadiusKind::Inner, RadiusKind::Bridge, RadiusKind::Outer];

    pub fn name(self) -> &'static str {
        match self {
            Self::Inner => "inner",
            Self::Bridge => "bridge",
            Self::Outer => "outer",
        }
    }

    /// Plot label, e.g. "(1/inner radius - 1/sim_radius)/(1/inner radius)".
    pub fn residual_label(self) -> String {
        let radius = format!("{} radius", self.name());
        format!("(1/{radius} - 1/sim_radius)/(1/{radius})")
    }
}

/// Converts simulated pt into the radius of curvature in a uniform field.
#[derive(Debug, Clone, Copy)]
pub struct RadiusModel {
    pub b_field: f64,
    pub factor: f64,
}

impl Default for RadiusModel {
    fn default() -> Self {
        Self {
            b_field: DEFAULT_B_FIELD,
            factor: PT_TO_RADIUS_FACTOR,
        }
    }
}

impl RadiusModel {
    /// Simulated radius for a given pt. Sentinel pt values pass through.
    pub fn sim_radius(&self, pt: f64) -> f64 {
        if is_sentinel(pt) {
            return pt;
        }
        pt / (self.factor * self.b_field)
    }
}

/// Relative curvature residual of one radius estimate.
///
/// A sentinel radius or sim radius is returned unchanged. A zero radius,
/// a zero sim radius or any other non-finite result yields [`SENTINEL`].
pub fn radius_residual(radius: f64, sim_radius: f64) -> f64 {
    if is_sentinel(radius) {
        return radius;
    }
    if is_sentinel(sim_radius) {
        return sim_radius;
    }
    if radius == 0.0 || sim_radius == 0.0 {
        return SENTINEL;
    }
    let inv = 1.0 / radius;
    let q = (inv - 1.0 / sim_radius).abs() / inv;
    if q.is_finite() { q } else { SENTINEL }
}

/// Element-wise [`radius_residual`] over aligned radius and sim-radius scans.
pub fn residual_scan(radii: &[f64], sim_radii: &[f64]) -> Vec<f64> {
    debug_assert_eq!(radii.len(), sim_radii.len(), "residual scan length mismatch");
    radii
        .iter()
        .zip(sim_radii)
        .map(|(&r, &s)| radius_residual(r, s))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn residual_reference_value() {
        assert_relative_eq!(radius_residual(2.0, 4.0), 0.5);
        assert_relative_eq!(radius_residual(4.0, 4.0), 0.0);
    }

    #[test]
    fn residual_is_symmetric_in_sign_of_error() {
        // |1/r - 1/s| * r == |1 - r/s|
        assert_relative_eq!(radius_residual(6.0, 4.0), 0.5);
    }

    #[test]
    fn sentinels_pass_through_verbatim() {
        assert_eq!(radius_residual(-999.0, 4.0), -999.0);
        assert_eq!(radius_residual(-1500.0, 4.0), -1500.0);
        assert_eq!(radius_residual(3.0, -999.0), -999.0);
    }

    #[test]
    fn degenerate_inputs_become_sentinel() {
        assert_eq!(radius_residual(0.0, 4.0), SENTINEL);
        assert_eq!(radius_residual(2.0, 0.0), SENTINEL);
        assert_eq!(radius_residual(f64::NAN, 4.0), SENTINEL);
        assert_eq!(radius_residual(2.0, f64::INFINITY), 1.0);
    }

    #[test]
    fn sim_radius_uses_field_and_factor() {
        let model = RadiusModel::default();
        let pt = PT_TO_RADIUS_FACTOR * DEFAULT_B_FIELD * 100.0;
        assert_relative_eq!(model.sim_radius(pt), 100.0, max_relative = 1e-12);
        assert_eq!(model.sim_radius(-999.0), -999.0);
    }

    #[test]
    fn residual_label_matches_plot_naming() {
        assert_eq!(
            RadiusKind::Inner.residual_label(),
            "(1/inner radius - 1/sim_radius)/(1/inner radius)"
        );
    }
}
