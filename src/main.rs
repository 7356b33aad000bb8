use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;
use tradeoff_plots::{
    experiment::Sweep,
    report::{Output, Report},
};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    Svg,
    Png,
    Pdf,
}

impl Format {
    fn extension(self) -> &'static str {
        match self {
            Format::Svg => "svg",
            Format::Png => "png",
            Format::Pdf => "pdf",
        }
    }
}

/// Chart the max-time and max-cost sweeps of the resource allocator.
///
/// Without `--out` both figures are displayed one after the other.
#[derive(Debug, Parser)]
#[command(version)]
struct Args {
    /// Save the figures in this directory instead of displaying them.
    #[arg(long, value_name = "DIR")]
    out: Option<PathBuf>,
    /// Image format of saved figures.
    #[arg(long, value_enum, default_value_t = Format::Svg)]
    format: Format,
    /// Resolution of saved figures.
    #[arg(long, value_parser = positive_dpi)]
    dpi: Option<f64>,
    /// Log panel details.
    #[arg(short, long)]
    verbose: bool,
}

fn positive_dpi(s: &str) -> Result<f64, String> {
    let dpi: f64 = s.parse().map_err(|e| format!("{e}"))?;
    if dpi.is_finite() && dpi > 0. {
        Ok(dpi)
    } else {
        Err(format!("dpi must be a positive number, got {dpi}"))
    }
}

impl Args {
    fn output(&self) -> Result<Output> {
        Ok(match &self.out {
            None => Output::Show,
            Some(dir) => {
                fs::create_dir_all(dir)
                    .with_context(|| format!("failed to create directory {}", dir.display()))?;
                Output::Save {
                    dir: dir.clone(),
                    format: self.format.extension().to_string(),
                    dpi: self.dpi,
                }
            }
        })
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);
    let output = args.output()?;
    let report = Report::new();

    for sweep in Sweep::all()? {
        info!("charting {} sweep ({})", sweep.parameter, sweep.caption);
        report
            .publish(&sweep, &output)
            .with_context(|| format!("failed to chart the {} sweep", sweep.parameter))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_arguments_displays() -> Result<()> {
        let args = Args::try_parse_from(["tradeoff-plots"])?;
        assert_eq!(args.output()?, Output::Show);
        Ok(())
    }

    #[test]
    fn out_directory_is_created() -> Result<()> {
        let tmp = tempfile::tempdir()?;
        let dir = tmp.path().join("figures");
        let args = Args::try_parse_from([
            "tradeoff-plots", "--out", dir.to_str().unwrap(), "--format", "png", "--dpi", "150",
        ])?;
        let output = args.output()?;
        assert!(dir.is_dir());
        assert_eq!(output.path("max-cost-sweep"), Some(dir.join("max-cost-sweep.png")));
        assert_eq!(output, Output::Save { dir, format: "png".into(), dpi: Some(150.) });
        Ok(())
    }

    #[test]
    fn non_positive_dpi_is_rejected() {
        for dpi in ["--dpi=0", "--dpi=-72", "--dpi=inf", "--dpi=abc"] {
            assert!(Args::try_parse_from(["tradeoff-plots", dpi]).is_err(), "{dpi}");
        }
        assert!(Args::try_parse_from(["tradeoff-plots", "--dpi=72.5"]).is_ok());
    }

    #[test]
    fn unknown_format_is_rejected() {
        assert!(Args::try_parse_from(["tradeoff-plots", "--format", "bmp"]).is_err());
    }
}
