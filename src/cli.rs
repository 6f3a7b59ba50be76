use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, ValueHint};

use crate::color::PowerRamp;
use crate::data::table::RenderConfig;

// ---------------------------------------------------------------------------
// Command-line surface
// ---------------------------------------------------------------------------

/// Render an rtl_power / hackrf_sweep scan log as a waterfall image.
#[derive(Parser, Debug)]
#[command(name = "sweepfall", version, about)]
pub struct Cli {
    /// Input sweep log (CSV)
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    pub input: PathBuf,

    /// Output image path; defaults to `<input>.<format>`
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    pub output: Option<PathBuf>,

    /// Output image format: png or jpeg
    #[arg(short, long, default_value = "png")]
    pub format: String,

    /// Lowest rendered power in dBm, or `auto` to derive it from the data
    #[arg(long, default_value = "auto", allow_hyphen_values = true)]
    pub min_power: String,

    /// Highest rendered power in dBm, or `auto` to derive it from the data
    #[arg(long, default_value = "auto", allow_hyphen_values = true)]
    pub max_power: String,

    /// Power-to-color ramp
    #[arg(long, value_enum, default_value = "spectrum")]
    pub palette: PowerRamp,

    /// Skip the frequency/time scales and the info box
    #[arg(long, action = ArgAction::SetTrue)]
    pub no_annotations: bool,
}

/// Validated run configuration derived from the raw flags.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    pub format: String,
    pub annotations: bool,
    pub range: RenderConfig,
    pub ramp: PowerRamp,
}

impl RunConfig {
    pub fn from_cli(cli: Cli) -> Result<Self> {
        let output = cli
            .output
            .unwrap_or_else(|| PathBuf::from(format!("{}.{}", cli.input.display(), cli.format)));

        let range = RenderConfig {
            min_power: parse_power(&cli.min_power).context("invalid --min-power")?,
            max_power: parse_power(&cli.max_power).context("invalid --max-power")?,
        };

        Ok(RunConfig {
            input: cli.input,
            output,
            format: cli.format,
            annotations: !cli.no_annotations,
            range,
            ramp: cli.palette,
        })
    }
}

/// `auto` derives the bound from the data; anything else must be a float.
fn parse_power(raw: &str) -> Result<Option<f64>> {
    if raw.eq_ignore_ascii_case("auto") {
        return Ok(None);
    }
    let value = raw
        .parse::<f64>()
        .with_context(|| format!("not a power value: {raw:?}"))?;
    Ok(Some(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auto_sentinel_means_derive() {
        assert_eq!(parse_power("auto").unwrap(), None);
        assert_eq!(parse_power("AUTO").unwrap(), None);
        assert_eq!(parse_power("-72.5").unwrap(), Some(-72.5));
        assert!(parse_power("loud").is_err());
    }

    #[test]
    fn output_defaults_to_input_plus_format() {
        let cli = Cli::parse_from(["sweepfall", "--input", "scan.csv"]);
        let config = RunConfig::from_cli(cli).unwrap();

        assert_eq!(config.output, PathBuf::from("scan.csv.png"));
        assert_eq!(config.format, "png");
        assert!(config.annotations);
    }

    #[test]
    fn explicit_flags_are_honored() {
        let cli = Cli::parse_from([
            "sweepfall",
            "-i",
            "scan.csv",
            "-o",
            "waterfall.jpg",
            "-f",
            "jpeg",
            "--min-power",
            "-90",
            "--palette",
            "yellow",
            "--no-annotations",
        ]);
        let config = RunConfig::from_cli(cli).unwrap();

        assert_eq!(config.output, PathBuf::from("waterfall.jpg"));
        assert_eq!(config.range.min_power, Some(-90.0));
        assert_eq!(config.range.max_power, None);
        assert_eq!(config.ramp, PowerRamp::Yellow);
        assert!(!config.annotations);
    }
}
