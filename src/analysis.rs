//! Radius-difference distributions for every layer combination.
//!
//! The collection is passed in by reference and never mutated; every stage
//! derives its own scans from it.

use std::path::PathBuf;

use tracing::info;

use crate::config::{AppConfig, PlotVariant};
use crate::core::quantity::{RadiusKind, RadiusModel, residual_scan};
use crate::core::selection::{select, unique_labels};
use crate::error::RadiusResult;
use crate::ntuple::T5Collection;
use crate::plot::{self, PlotContext};

/// Simulated radius of every object from its matched pt.
pub fn sim_radii(collection: &T5Collection, model: &RadiusModel) -> Vec<f64> {
    collection
        .matched_pt
        .iter()
        .map(|&pt| model.sim_radius(pt))
        .collect()
}

/// Residual scan of one radius estimate for every object.
pub fn residuals(collection: &T5Collection, sim_radii: &[f64], kind: RadiusKind) -> Vec<f64> {
    let radii = match kind {
        RadiusKind::Inner => &collection.inner_radius,
        RadiusKind::Bridge => &collection.bridge_radius,
        RadiusKind::Outer => &collection.outer_radius,
    };
    residual_scan(radii, sim_radii)
}

#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub labels: Vec<String>,
    pub written: Vec<PathBuf>,
    pub skipped: usize,
}

pub fn make_radius_difference_distributions(
    collection: &T5Collection,
    config: &AppConfig,
    ctx: &PlotContext,
) -> RadiusResult<RunSummary> {
    let labels = collection.labels(config.plot.split, config.input.object_kind)?;
    let unique = unique_labels(&labels);
    info!("layer types: {unique:?}");

    let sim = sim_radii(collection, &config.physics.radius_model());
    let scans: Vec<(RadiusKind, Vec<f64>)> = RadiusKind::ALL
        .iter()
        .map(|&kind| (kind, residuals(collection, &sim, kind)))
        .collect();

    let mut summary = RunSummary {
        labels: unique.clone(),
        ..RunSummary::default()
    };
    for layer_type in &unique {
        info!("layerType = {layer_type}");
        for (kind, scan) in &scans {
            info!("qName = {}", kind.name());
            let quantity = kind.residual_label();
            let selection = select(scan, &collection.is_matched, &labels, layer_type)?;
            match config.plot.variant {
                PlotVariant::Single => {
                    let out = plot::make_single_plots(
                        ctx,
                        &config.histogram.single,
                        config.plot.quantile,
                        &selection.matched,
                        &quantity,
                        layer_type,
                    )?;
                    summary.written.push(out.path);
                }
                PlotVariant::Combined => {
                    match plot::make_plots(
                        ctx,
                        &config.histogram.combined,
                        &selection.all,
                        &selection.matched,
                        &quantity,
                        layer_type,
                    )? {
                        Some(path) => summary.written.push(path),
                        None => summary.skipped += 1,
                    }
                }
            }
        }
    }
    Ok(summary)
}
