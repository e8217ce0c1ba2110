//! Histogram plots of radius residuals: one file per quantity and layer label.

pub mod naming;
pub mod render;

use std::fs;
use std::path::PathBuf;

use tracing::{info, warn};

use crate::config::OutputFormat;
use crate::core::histogram::{Binning, BinningParams, Hist1D, valid_values};
use crate::core::selection::Selection;
use crate::error::RadiusResult;
use render::{Figure, SERIES_BLUE, SERIES_RED, Series};

/// Where and how figures are written, shared by every plot of a run.
#[derive(Debug, Clone)]
pub struct PlotContext {
    /// `None` writes into the working directory.
    pub out_dir: Option<PathBuf>,
    pub sample: String,
    pub tag: String,
    pub format: OutputFormat,
    pub width: u32,
    pub height: u32,
}

impl PlotContext {
    fn path_for(&self, quantity: &str, layer_type: &str) -> RadiusResult<PathBuf> {
        if let Some(dir) = &self.out_dir {
            fs::create_dir_all(dir)?;
        }
        Ok(naming::output_path(
            self.out_dir.as_deref(),
            quantity,
            layer_type,
            self.format.extension(),
        ))
    }

    fn figure<'a>(&self, title: &'a str, suptitle: &'a str, quantity: &'a str) -> Figure<'a> {
        Figure {
            title,
            suptitle,
            x_desc: quantity,
            width: self.width,
            height: self.height,
        }
    }
}

/// Result of a single-series plot.
#[derive(Debug, Clone)]
pub struct SinglePlot {
    pub path: PathBuf,
    pub entries: u64,
    /// Requested quantile of the binned distribution; `None` when empty.
    pub quantile: Option<f64>,
}

/// All entries overlaid with the sim-track-matched subset.
///
/// Sentinel entries are removed first; returns `Ok(None)` without writing
/// anything when either remaining subset is empty.
pub fn make_plots(
    ctx: &PlotContext,
    params: &BinningParams,
    all: &[f64],
    matched: &[f64],
    quantity: &str,
    layer_type: &str,
) -> RadiusResult<Option<PathBuf>> {
    let valid = Selection {
        all: valid_values(all),
        matched: valid_values(matched),
    };
    if valid.is_empty() {
        warn!("{layer_type} has no entries. Skipping");
        return Ok(None);
    }

    let binning = Binning::for_quantity(params, quantity)?;
    let all_hist = Hist1D::from_values(&valid.all, binning.clone());
    let matched_hist = Hist1D::from_values(&valid.matched, binning);

    let title = naming::combined_title(quantity, layer_type);
    let suptitle = naming::suptitle(&ctx.sample, &ctx.tag);
    let svg = render::render_svg(
        &ctx.figure(&title, &suptitle, quantity),
        &[
            Series {
                hist: &all_hist,
                label: "all",
                color: SERIES_BLUE,
            },
            Series {
                hist: &matched_hist,
                label: "sim track matched",
                color: SERIES_RED,
            },
        ],
    )?;

    let path = ctx.path_for(quantity, layer_type)?;
    render::write_figure(&path, &svg, ctx.format)?;
    info!(path = %path.display(), all = all_hist.total(), matched = matched_hist.total(), "saved plot");
    Ok(Some(path))
}

/// One distribution, with its `q`-quantile reported before plotting.
pub fn make_single_plots(
    ctx: &PlotContext,
    params: &BinningParams,
    q: f64,
    values: &[f64],
    quantity: &str,
    layer_type: &str,
) -> RadiusResult<SinglePlot> {
    let binning = Binning::for_quantity(params, quantity)?;
    let hist = Hist1D::from_values(&valid_values(values), binning);

    let quantile = hist.quantile(q);
    match quantile {
        Some(limit) => info!("{:.0}% limit at {limit}", q * 100.0),
        None => warn!("{quantity} {layer_type} has no entries in range; no quantile"),
    }

    let title = naming::plot_title(quantity, layer_type);
    let suptitle = naming::suptitle(&ctx.sample, &ctx.tag);
    let svg = render::render_svg(
        &ctx.figure(&title, &suptitle, quantity),
        &[Series {
            hist: &hist,
            label: "all",
            color: SERIES_BLUE,
        }],
    )?;

    let path = ctx.path_for(quantity, layer_type)?;
    render::write_figure(&path, &svg, ctx.format)?;
    info!(path = %path.display(), entries = hist.total(), "saved plot");
    Ok(SinglePlot {
        path,
        entries: hist.total(),
        quantile,
    })
}
