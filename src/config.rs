use crate::core::histogram::BinningParams;
use crate::core::layers::{ObjectKind, SplitMode};
use crate::core::quantity::{DEFAULT_B_FIELD, PT_TO_RADIUS_FACTOR, RadiusModel};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::warn;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    #[serde(default = "InputConfig::default_tree")]
    pub tree: String,
    #[serde(default = "InputConfig::default_prefix")]
    pub prefix: String,
    #[serde(default)]
    pub object_kind: ObjectKind,
}

impl InputConfig {
    fn default_tree() -> String {
        "tree".to_string()
    }
    fn default_prefix() -> String {
        "t5".to_string()
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            tree: Self::default_tree(),
            prefix: Self::default_prefix(),
            object_kind: ObjectKind::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhysicsConfig {
    #[serde(default = "PhysicsConfig::default_b_field")]
    pub b_field: f64,
    #[serde(default = "PhysicsConfig::default_pt_to_radius")]
    pub pt_to_radius: f64,
}

impl PhysicsConfig {
    fn default_b_field() -> f64 {
        DEFAULT_B_FIELD
    }
    fn default_pt_to_radius() -> f64 {
        PT_TO_RADIUS_FACTOR
    }

    pub fn radius_model(&self) -> RadiusModel {
        RadiusModel {
            b_field: self.b_field,
            factor: self.pt_to_radius,
        }
    }
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            b_field: Self::default_b_field(),
            pt_to_radius: Self::default_pt_to_radius(),
        }
    }
}

/// Histogram limits for both plot variants.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistogramConfig {
    #[serde(default = "HistogramConfig::default_combined")]
    pub combined: BinningParams,
    #[serde(default = "HistogramConfig::default_single")]
    pub single: BinningParams,
}

impl HistogramConfig {
    fn default_combined() -> BinningParams {
        BinningParams {
            min: 1e-5,
            max: 1e2,
            n_edges: 1000,
            overflow: true,
        }
    }
    fn default_single() -> BinningParams {
        BinningParams {
            min: 9e-6,
            max: 1.1e2,
            n_edges: 500,
            overflow: true,
        }
    }
}

impl Default for HistogramConfig {
    fn default() -> Self {
        Self {
            combined: Self::default_combined(),
            single: Self::default_single(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    #[default]
    Pdf,
    Svg,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Svg => "svg",
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pdf" => Ok(Self::Pdf),
            "svg" => Ok(Self::Svg),
            other => Err(format!("unknown output format '{other}' (expected pdf or svg)")),
        }
    }
}

/// Which plot is drawn per quantity and label.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum PlotVariant {
    /// Sim-track-matched entries only, with a quantile report.
    #[default]
    Single,
    /// All entries overlaid with the sim-track-matched subset.
    Combined,
}

impl std::str::FromStr for PlotVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "single" => Ok(Self::Single),
            "combined" => Ok(Self::Combined),
            other => Err(format!("unknown plot variant '{other}' (expected single or combined)")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlotConfig {
    #[serde(default)]
    pub variant: PlotVariant,
    #[serde(default)]
    pub split: SplitMode,
    #[serde(default)]
    pub format: OutputFormat,
    #[serde(default = "PlotConfig::default_width")]
    pub width: u32,
    #[serde(default = "PlotConfig::default_height")]
    pub height: u32,
    #[serde(default = "PlotConfig::default_quantile")]
    pub quantile: f64,
}

impl PlotConfig {
    fn default_width() -> u32 {
        800
    }
    fn default_height() -> u32 {
        600
    }
    fn default_quantile() -> f64 {
        0.99
    }
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            variant: PlotVariant::default(),
            split: SplitMode::default(),
            format: OutputFormat::default(),
            width: Self::default_width(),
            height: Self::default_height(),
            quantile: Self::default_quantile(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub physics: PhysicsConfig,
    #[serde(default)]
    pub histogram: HistogramConfig,
    #[serde(default)]
    pub plot: PlotConfig,
}

impl AppConfig {
    /// Read `path`, or write it with every setting commented out and return defaults.
    pub fn load_or_default(path: &str) -> Self {
        let path_obj = Path::new(path);
        if path_obj.exists() {
            match fs::read_to_string(path_obj) {
                Ok(contents) => match toml::from_str(&contents) {
                    Ok(cfg) => return cfg,
                    Err(err) => {
                        warn!("Failed to parse config {path}: {err}. Using defaults.");
                    }
                },
                Err(err) => {
                    warn!("Failed to read config {path}: {err}. Using defaults.");
                }
            }
            return Self::default();
        }

        let default_cfg = Self::default();
        match toml::to_string_pretty(&default_cfg) {
            Ok(text) => {
                if let Err(err) = fs::write(path_obj, comment_out_settings(&text)) {
                    warn!("Failed to write default config to {path}: {err}");
                }
            }
            Err(err) => warn!("Failed to serialize default config: {err}"),
        }
        default_cfg
    }
}

/// Top-level section headers stay live; keys and nested tables are commented.
fn comment_out_settings(text: &str) -> String {
    let mut out = String::with_capacity(text.len() * 2);
    for line in text.lines() {
        let trimmed = line.trim();
        let top_level_header =
            trimmed.starts_with('[') && trimmed.ends_with(']') && !trimmed.contains('.');
        if !trimmed.is_empty() && !top_level_header {
            out.push_str("# ");
        }
        out.push_str(line);
        out.push('\n');
    }
    out
}
