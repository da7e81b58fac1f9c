use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use sacs_io::{Conversion, ConversionConfig, ConvertError, convert};
use sacs_model::AssemblyError;
use tracing_subscriber::EnvFilter;

/// Converts ETABS/SAP CSV exports into a SACS geometry deck and a list of
/// mudline joints.
#[derive(Parser, Debug)]
#[command(name = "sacs-cli", version)]
struct Args {
    /// JSON file with any of the paths below; flags take precedence.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Joint coordinates export
    #[arg(long)]
    nodes: Option<PathBuf>,

    #[arg(long)]
    beams: Option<PathBuf>,

    #[arg(long)]
    braces: Option<PathBuf>,

    #[arg(long)]
    columns: Option<PathBuf>,

    /// Frame section assignments export
    #[arg(long = "assign")]
    assignments: Option<PathBuf>,

    /// Pipe section definitions export
    #[arg(long)]
    sections: Option<PathBuf>,

    /// Single-row material table; missing values fall back to A992 steel
    #[arg(long, conflicts_with = "no_material")]
    material: Option<PathBuf>,

    /// Ignore any material table and use the default steel
    #[arg(long)]
    no_material: bool,

    /// Geometry deck to write
    #[arg(long = "out")]
    geometry_out: Option<PathBuf>,

    /// Mudline joint list to write
    #[arg(long = "mudline")]
    mudline_out: Option<PathBuf>,

    /// Also write a JSON run report here
    #[arg(long)]
    report: Option<PathBuf>,

    /// Debug logging (RUST_LOG overrides)
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn into_config(self) -> Result<ConversionConfig> {
        let mut config = match &self.config {
            Some(path) => ConversionConfig::load(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => ConversionConfig::default(),
        };

        let overrides = [
            (self.nodes, &mut config.nodes),
            (self.beams, &mut config.beams),
            (self.braces, &mut config.braces),
            (self.columns, &mut config.columns),
            (self.assignments, &mut config.assignments),
            (self.sections, &mut config.sections),
            (self.geometry_out, &mut config.geometry_out),
            (self.mudline_out, &mut config.mudline_out),
        ];
        for (flag, slot) in overrides {
            if let Some(path) = flag {
                *slot = path;
            }
        }

        if self.no_material {
            config.material = None;
        } else if let Some(path) = self.material {
            config.material = Some(path);
        }
        if let Some(path) = self.report {
            config.report = Some(path);
        }
        Ok(config)
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(config: &ConversionConfig) -> Result<Conversion> {
    let effective = serde_json::to_string(config)?;
    tracing::debug!(config = %effective, "effective configuration");
    Ok(convert(config)?)
}

fn print_outcome(config: &ConversionConfig, conversion: &Conversion) {
    println!("OK: wrote {}", config.geometry_out.display());
    println!("OK: wrote {}", config.mudline_out.display());
    if let Some(report) = &config.report {
        println!("OK: wrote {}", report.display());
    }
    println!("Sections used: {:?}", conversion.report.sections_used);
}

fn report_failure(err: &anyhow::Error) {
    eprintln!("error: {err:#}");
    if let Some(ConvertError::Assembly(AssemblyError::UnresolvedMembers { frame_ids, .. })) =
        err.downcast_ref::<ConvertError>()
    {
        eprintln!("unresolved frame ids: {frame_ids:?}");
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = match args.into_config() {
        Ok(config) => config,
        Err(err) => {
            report_failure(&err);
            return ExitCode::from(1);
        }
    };

    match run(&config) {
        Ok(conversion) => {
            print_outcome(&config, &conversion);
            ExitCode::SUCCESS
        }
        Err(err) => {
            report_failure(&err);
            ExitCode::from(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("sacs-cli").chain(argv.iter().copied()))
            .expect("arguments should parse")
    }

    #[test]
    fn no_flags_keeps_conventional_names() {
        let config = parse(&[]).into_config().expect("config should build");
        assert_eq!(config, ConversionConfig::default());
    }

    #[test]
    fn flags_override_individual_paths() {
        let config = parse(&["--nodes", "in/joints.csv", "--out", "deck.inp", "--assign", "a.csv"])
            .into_config()
            .expect("config should build");
        assert_eq!(config.nodes, PathBuf::from("in/joints.csv"));
        assert_eq!(config.geometry_out, PathBuf::from("deck.inp"));
        assert_eq!(config.assignments, PathBuf::from("a.csv"));
        assert_eq!(config.beams, PathBuf::from("beam_conectivity.csv"));
    }

    #[test]
    fn no_material_clears_the_table() {
        let config = parse(&["--no-material"]).into_config().expect("config should build");
        assert_eq!(config.material, None);
        assert!(
            Args::try_parse_from(["sacs-cli", "--no-material", "--material", "m.csv"]).is_err()
        );
    }

    #[test]
    fn missing_config_file_is_reported() {
        let err = parse(&["--config", "/nonexistent/convert.json"])
            .into_config()
            .expect_err("config file does not exist");
        assert!(format!("{err:#}").contains("loading config"));
    }
}
