//! Histogram figures drawn with plotters' SVG backend, optionally converted to PDF.

use std::fs;
use std::path::Path;

use plotters::prelude::*;
use svg2pdf::usvg;
use tracing::{debug, warn};

use crate::config::OutputFormat;
use crate::core::histogram::{BinScale, Hist1D};
use crate::error::{RadiusError, RadiusResult};

/// matplotlib "C0"
pub const SERIES_BLUE: RGBColor = RGBColor(31, 119, 180);
/// matplotlib "C3"
pub const SERIES_RED: RGBColor = RGBColor(214, 39, 40);

const SERIES_ALPHA: f64 = 0.8;
// Bars start here on the log count axis.
const Y_FLOOR: f64 = 0.5;

pub struct Figure<'a> {
    pub title: &'a str,
    pub suptitle: &'a str,
    pub x_desc: &'a str,
    pub width: u32,
    pub height: u32,
}

pub struct Series<'a> {
    pub hist: &'a Hist1D,
    pub label: &'a str,
    pub color: RGBColor,
}

fn render_err<E: std::fmt::Display>(err: E) -> RadiusError {
    RadiusError::Render(err.to_string())
}

/// Draw overlaid filled histograms sharing one binning; counts on a log axis.
pub fn render_svg(fig: &Figure<'_>, series: &[Series<'_>]) -> RadiusResult<String> {
    let Some(first) = series.first() else {
        return Err(RadiusError::Render("no series to draw".to_string()));
    };
    let binning = &first.hist.binning;
    let y_max = series
        .iter()
        .map(|s| s.hist.max_count())
        .max()
        .unwrap_or(0)
        .max(1) as f64;
    let x_range = binning.min()..binning.max();
    let y_range = (Y_FLOOR..y_max * 2.0).log_scale();

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (fig.width, fig.height)).into_drawing_area();
        root.fill(&WHITE).map_err(render_err)?;
        let root = root
            .titled(fig.suptitle, ("sans-serif", 18))
            .map_err(render_err)?;

        let mut builder = ChartBuilder::on(&root);
        builder
            .caption(fig.title, ("sans-serif", 16))
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(60);

        match binning.scale {
            BinScale::Log => {
                let mut chart = builder
                    .build_cartesian_2d(x_range.log_scale(), y_range)
                    .map_err(render_err)?;
                chart
                    .configure_mesh()
                    .x_desc(fig.x_desc)
                    .y_desc("entries")
                    .draw()
                    .map_err(render_err)?;
                draw_filled_steps(&mut chart, series)?;
            }
            BinScale::Linear => {
                let mut chart = builder
                    .build_cartesian_2d(x_range, y_range)
                    .map_err(render_err)?;
                chart
                    .configure_mesh()
                    .x_desc(fig.x_desc)
                    .y_desc("entries")
                    .draw()
                    .map_err(render_err)?;
                draw_filled_steps(&mut chart, series)?;
            }
        }

        root.present().map_err(render_err)?;
    }
    Ok(svg)
}

fn draw_filled_steps<'a, X>(
    chart: &mut ChartContext<'a, SVGBackend<'a>, Cartesian2d<X, LogCoord<f64>>>,
    series: &[Series<'_>],
) -> RadiusResult<()>
where
    X: Ranged<ValueType = f64>,
{
    for s in series {
        let color = s.color;
        let bars = s
            .hist
            .bins()
            .filter(|&(_, _, count)| count > 0)
            .map(move |(lo, hi, count)| {
                Rectangle::new(
                    [(lo, Y_FLOOR), (hi, count as f64)],
                    color.mix(SERIES_ALPHA).filled(),
                )
            });
        chart
            .draw_series(bars)
            .map_err(render_err)?
            .label(s.label)
            .legend(move |(x, y)| {
                Rectangle::new([(x, y - 5), (x + 15, y + 5)], color.mix(SERIES_ALPHA).filled())
            });
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(render_err)?;
    Ok(())
}

// Tried in order for the "sans-serif" family plotters writes.
const SANS_SERIF_FAMILIES: [&str; 6] = [
    "Arial",
    "Helvetica",
    "DejaVu Sans",
    "Liberation Sans",
    "Noto Sans",
    "FreeSans",
];

/// Family to stand in for "sans-serif": the first preferred family that is
/// installed, otherwise the first installed family at all.
fn pick_sans_serif<'a>(installed: &[&'a str]) -> Option<&'a str> {
    SANS_SERIF_FAMILIES
        .iter()
        .find_map(|want| installed.iter().copied().find(|have| have == want))
        .or_else(|| installed.first().copied())
}

fn system_fonts() -> usvg::fontdb::Database {
    let mut db = usvg::fontdb::Database::new();
    db.load_system_fonts();
    let installed: Vec<&str> = db
        .faces()
        .flat_map(|face| face.families.iter().map(|(name, _)| name.as_str()))
        .collect();
    match pick_sans_serif(&installed).map(str::to_string) {
        Some(family) => {
            debug!(%family, "sans-serif family for PDF text");
            db.set_sans_serif_family(family);
        }
        None => warn!("no system fonts found; PDF figures will have no text"),
    }
    db
}

/// Convert an SVG document into a single-page PDF.
pub fn svg_to_pdf(svg: &str) -> RadiusResult<Vec<u8>> {
    let mut options = usvg::Options::default();
    *options.fontdb_mut() = system_fonts();
    let tree =
        usvg::Tree::from_str(svg, &options).map_err(|err| RadiusError::Pdf(err.to_string()))?;
    svg2pdf::to_pdf(
        &tree,
        svg2pdf::ConversionOptions::default(),
        svg2pdf::PageOptions::default(),
    )
    .map_err(|err| RadiusError::Pdf(err.to_string()))
}

/// Write a rendered figure in the requested format.
pub fn write_figure(path: &Path, svg: &str, format: OutputFormat) -> RadiusResult<()> {
    match format {
        OutputFormat::Svg => fs::write(path, svg)?,
        OutputFormat::Pdf => fs::write(path, svg_to_pdf(svg)?)?,
    }
    Ok(())
}
