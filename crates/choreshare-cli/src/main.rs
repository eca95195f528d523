//! choreshare CLI - Household Chore Planner
//!
//! Reads task definitions from a workbook, spreads them over the weeks of the
//! configured window and writes the chore chart. Without arguments it runs
//! `generate` with the built-in configuration.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use choreshare_core::{ChoreConfig, ChorePlan, Renderer, WeekAssigner};
use choreshare_reader::WorkbookSource;
use choreshare_render::{ExcelRenderer, TextRenderer};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "choreshare")]
#[command(author, version, about = "Household chore planner", long_about = None)]
struct Cli {
    /// Verbose output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Configuration file (TOML); built-in defaults when omitted
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Plan every week and write the chore chart workbook
    Generate {
        /// Task workbook (overrides `workbook_path`)
        #[arg(short, long, value_name = "FILE")]
        input: Option<PathBuf>,

        /// Output workbook (overrides `output_path`)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Print the plan instead of writing a workbook
    Preview {
        /// Task workbook (overrides `workbook_path`)
        #[arg(short, long, value_name = "FILE")]
        input: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = PreviewFormat::Text)]
        format: PreviewFormat,

        /// Leave out weeks without any task (text format only)
        #[arg(long)]
        skip_empty: bool,
    },

    /// Print the effective configuration as TOML
    Config,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum PreviewFormat {
    Text,
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Some(Commands::Generate { input, output }) => generate(config, input, output),
        None => generate(config, None, None),
        Some(Commands::Preview {
            input,
            format,
            skip_empty,
        }) => preview(config, input, format, skip_empty),
        Some(Commands::Config) => {
            print!("{}", config.to_toml_string()?);
            Ok(())
        }
    }
}

/// Log to stderr; `RUST_LOG` wins over `-v`
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn load_config(path: Option<&Path>) -> Result<ChoreConfig> {
    match path {
        Some(path) => ChoreConfig::load(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display())),
        None => {
            let config = ChoreConfig::default();
            config.validate()?;
            Ok(config)
        }
    }
}

/// Read the task sheet and plan every week
fn plan_from_workbook(config: &ChoreConfig) -> Result<ChorePlan> {
    let sheet = WorkbookSource::open(&config.workbook_path, config.source_sheet.as_deref())
        .with_context(|| {
            format!(
                "Failed to read tasks from {}",
                config.workbook_path.display()
            )
        })?;

    let plan = WeekAssigner::new(config).plan(&sheet)?;
    Ok(plan)
}

fn generate(mut config: ChoreConfig, input: Option<PathBuf>, output: Option<PathBuf>) -> Result<()> {
    if let Some(input) = input {
        config.workbook_path = input;
    }
    if let Some(output) = output {
        config.output_path = output;
    }
    if same_file(&config.workbook_path, &config.output_path) {
        bail!(
            "Output {} would overwrite the task workbook",
            config.output_path.display()
        );
    }

    let plan = plan_from_workbook(&config)?;

    ExcelRenderer::new()
        .sheet_name(config.output_sheet.clone())
        .labels(config.labels.clone())
        .save(&plan, &config.output_path)
        .with_context(|| format!("Failed to write {}", config.output_path.display()))?;

    info!(
        output = %config.output_path.display(),
        weeks = plan.weeks.len(),
        "wrote chore chart"
    );
    println!(
        "Wrote {} weeks to {}",
        plan.weeks.len(),
        config.output_path.display()
    );
    Ok(())
}

fn preview(
    mut config: ChoreConfig,
    input: Option<PathBuf>,
    format: PreviewFormat,
    skip_empty: bool,
) -> Result<()> {
    if let Some(input) = input {
        config.workbook_path = input;
    }

    let plan = plan_from_workbook(&config)?;

    match format {
        PreviewFormat::Text => {
            let mut renderer = TextRenderer::new().labels(config.labels.clone());
            if skip_empty {
                renderer = renderer.skip_empty_weeks();
            }
            print!("{}", renderer.render(&plan)?);
        }
        PreviewFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&plan)?);
        }
    }
    Ok(())
}

/// Whether two paths name the same file, following symlinks when both exist
fn same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_preview_options() {
        let cli = Cli::try_parse_from([
            "choreshare",
            "-vv",
            "preview",
            "--input",
            "tasks.xlsx",
            "--format",
            "json",
            "--skip-empty",
        ])
        .unwrap();

        assert_eq!(cli.verbose, 2);
        match cli.command {
            Some(Commands::Preview {
                input,
                format,
                skip_empty,
            }) => {
                assert_eq!(input, Some(PathBuf::from("tasks.xlsx")));
                assert_eq!(format, PreviewFormat::Json);
                assert!(skip_empty);
            }
            _ => panic!("expected preview"),
        }
    }

    #[test]
    fn no_arguments_means_generate() {
        let cli = Cli::try_parse_from(["choreshare"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.config.is_none());
    }

    #[test]
    fn global_config_after_subcommand() {
        let cli = Cli::try_parse_from(["choreshare", "generate", "--config", "house.toml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("house.toml")));
    }

    #[test]
    fn same_file_compares_plain_paths() {
        assert!(same_file(Path::new("tasks.xlsx"), Path::new("tasks.xlsx")));
        assert!(!same_file(Path::new("tasks.xlsx"), Path::new("out.xlsx")));
    }
}
