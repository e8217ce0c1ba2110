use std::path::PathBuf;

use clap::Parser;

use crate::config::{AppConfig, OutputFormat, PlotVariant};
use crate::core::layers::SplitMode;
use crate::plot::PlotContext;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about)]
pub struct Args {
    /// ROOT file holding the object ntuple
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Directory for the plots (working directory when omitted)
    #[arg(value_name = "OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    /// Sample name shown in plot titles
    #[arg(value_name = "SAMPLE")]
    pub sample: Option<String>,

    /// Tag shown in plot titles
    #[arg(value_name = "TAG")]
    pub tag: Option<String>,

    /// Path to config TOML (written with commented defaults if missing)
    #[arg(long)]
    pub config: Option<String>,

    /// Tree name inside the input file (overrides config)
    #[arg(long)]
    pub tree: Option<String>,

    /// Branch prefix of the objects, e.g. t5 (overrides config)
    #[arg(long)]
    pub prefix: Option<String>,

    /// single: matched entries only; combined: all vs matched (overrides config)
    #[arg(long)]
    pub variant: Option<PlotVariant>,

    /// barrel-endcap, layer-numbers or module-types (overrides config)
    #[arg(long)]
    pub split: Option<SplitMode>,

    /// pdf or svg (overrides config)
    #[arg(long)]
    pub format: Option<OutputFormat>,
}

impl Args {
    /// Config from `--config` (or defaults) with command-line overrides applied.
    pub fn resolve_config(&self) -> AppConfig {
        let mut cfg = match &self.config {
            Some(path) => AppConfig::load_or_default(path),
            None => AppConfig::default(),
        };
        if let Some(tree) = &self.tree {
            cfg.input.tree = tree.clone();
        }
        if let Some(prefix) = &self.prefix {
            cfg.input.prefix = prefix.clone();
        }
        if let Some(variant) = self.variant {
            cfg.plot.variant = variant;
        }
        if let Some(split) = self.split {
            cfg.plot.split = split;
        }
        if let Some(format) = self.format {
            cfg.plot.format = format;
        }
        cfg
    }

    pub fn plot_context(&self, cfg: &AppConfig) -> PlotContext {
        PlotContext {
            out_dir: self.output_dir.clone(),
            sample: self.sample.clone().unwrap_or_default(),
            tag: self.tag.clone().unwrap_or_default(),
            format: cfg.plot.format,
            width: cfg.plot.width,
            height: cfg.plot.height,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positional_order_is_input_dir_sample_tag() {
        let args = Args::parse_from(["t5-radius", "in.root", "plots", "ttbar", "v2"]);
        assert_eq!(args.input, PathBuf::from("in.root"));
        assert_eq!(args.output_dir, Some(PathBuf::from("plots")));
        assert_eq!(args.sample.as_deref(), Some("ttbar"));
        assert_eq!(args.tag.as_deref(), Some("v2"));
    }

    #[test]
    fn only_input_is_required() {
        let args = Args::parse_from(["t5-radius", "in.root"]);
        assert!(args.output_dir.is_none());
        let ctx = args.plot_context(&AppConfig::default());
        assert_eq!(ctx.sample, "");
        assert!(Args::try_parse_from(["t5-radius"]).is_err());
    }

    #[test]
    fn flags_override_config() {
        let args = Args::parse_from([
            "t5-radius",
            "in.root",
            "--variant",
            "combined",
            "--split",
            "layer-numbers",
            "--format",
            "svg",
            "--tree",
            "ntuple",
        ]);
        let cfg = args.resolve_config();
        assert_eq!(cfg.plot.variant, PlotVariant::Combined);
        assert_eq!(cfg.plot.split, SplitMode::LayerNumbers);
        assert_eq!(cfg.plot.format, OutputFormat::Svg);
        assert_eq!(cfg.input.tree, "ntuple");
        assert_eq!(cfg.input.prefix, "t5");
    }
}
