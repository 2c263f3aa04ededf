//! Command-line surface
//!
//! Long flags are camelCase (`--outDir`, `--settleMs`); `--variant` is repeatable.
//! Other flags may be repeated too, the last value wins.

use crate::job::{CaptureRegion, JobRequest, DEFAULT_SELECTOR};
use crate::variant::{self, Encoding, VariantDefaults, VariantSpec};
use crate::{ExportConfig, Result};
use clap::Parser;
use std::path::PathBuf;

const EXAMPLES: &str = "\
Examples:
  mockshot mockups/infographic.html --selector=#page
  mockshot mockups/landing.html --selector=.max-w-6xl --outDir=exports --slug=landing \\
      --variant=preview:1600x900@2 --variant=poster:2400x1350@3,quality=95";

#[derive(Parser, Debug)]
#[command(
    name = "mockshot",
    version,
    about = "Export an HTML mockup to images at several sizes",
    arg_required_else_help = true,
    args_override_self = true,
    after_help = EXAMPLES
)]
pub struct Cli {
    /// HTML document to render
    #[arg(value_name = "HTML")]
    pub html: PathBuf,

    /// CSS selector of the element to capture (`viewport` captures the whole viewport)
    #[arg(long, value_name = "CSS", default_value = DEFAULT_SELECTOR)]
    pub selector: String,

    /// Capture the whole viewport instead of an element
    #[arg(long)]
    pub viewport: bool,

    /// Output directory [default: ./exports]
    #[arg(long = "outDir", value_name = "DIR")]
    pub out_dir: Option<PathBuf>,

    /// Base name of the output files [default: HTML file stem]
    #[arg(long, value_name = "NAME")]
    pub slug: Option<String>,

    /// Image type for variants that do not set one
    #[arg(long = "type", value_name = "jpeg|png|webp", default_value = "jpeg")]
    pub encoding: Encoding,

    /// JPEG quality for variants that do not set one; clamped to 1-100
    #[arg(long, value_name = "N", default_value_t = 92.0, value_parser = parse_quality)]
    pub quality: f64,

    /// Device scale factor for variants that do not set one; capped at 8
    #[arg(long, value_name = "N", default_value_t = 2.0, value_parser = parse_scale)]
    pub scale: f64,

    /// Output variant, `name:WIDTHxHEIGHT[@SCALE][,type=png][,quality=95]`; repeatable.
    /// Replaces the built-in standard/medium/high set.
    #[arg(long = "variant", value_name = "SPEC")]
    pub variants: Vec<VariantSpec>,

    /// Pause after load before the first capture
    #[arg(long = "settleMs", value_name = "MS", default_value_t = 800)]
    pub settle_ms: u64,

    /// Navigation timeout
    #[arg(long = "timeoutMs", value_name = "MS", default_value_t = 120_000)]
    pub timeout_ms: u64,
}

impl Cli {
    /// Split into the job request and the runtime configuration.
    pub fn into_parts(self) -> (JobRequest, ExportConfig) {
        let region = if self.viewport {
            CaptureRegion::Viewport
        } else {
            CaptureRegion::from_selector(&self.selector)
        };

        let request = JobRequest {
            source: self.html,
            region,
            out_dir: self.out_dir,
            slug: self.slug,
            defaults: VariantDefaults {
                encoding: self.encoding,
                quality: self.quality,
                scale: self.scale,
            },
            variants: self.variants,
        };

        let config = ExportConfig {
            navigation_timeout_ms: self.timeout_ms,
            settle_delay_ms: self.settle_ms,
            ..ExportConfig::default()
        };

        (request, config)
    }
}

fn parse_quality(value: &str) -> Result<f64> {
    variant::parse_finite(value, "quality")
}

fn parse_scale(value: &str) -> Result<f64> {
    variant::parse_positive(value, "scale").map(variant::clamp_scale)
}
