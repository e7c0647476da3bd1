use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use imgresize_layout::OverlayMetrics;
use imgresize_web::Trace;

use crate::error::{ReplayError, Result};
use crate::replay::{ReplayReport, render_text, replay, verify};
use crate::script::Script;

#[derive(Debug, Parser)]
#[command(
    name = "imgresize-replay",
    about = "Replay scripted sessions against the image resize overlay",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Replay a script and print the final overlay and target state.
    Run(RunArgs),

    /// Replay a script and require it to match a recorded trace.
    Verify(VerifyArgs),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Overrides for the fixed overlay metrics.
#[derive(Debug, Clone, Default, Args)]
pub struct MetricsArgs {
    #[arg(long, env = "IMGRESIZE_HANDLE_SIZE")]
    pub handle_size: Option<f64>,

    #[arg(long, env = "IMGRESIZE_TOOLBAR_WIDTH")]
    pub toolbar_width: Option<f64>,

    #[arg(long, env = "IMGRESIZE_TOOLBAR_HEIGHT")]
    pub toolbar_height: Option<f64>,

    #[arg(long, env = "IMGRESIZE_PADDING")]
    pub padding: Option<f64>,
}

impl MetricsArgs {
    #[must_use]
    pub fn resolve(&self) -> OverlayMetrics {
        let defaults = OverlayMetrics::default();
        OverlayMetrics {
            handle_size: self.handle_size.unwrap_or(defaults.handle_size),
            toolbar_width: self.toolbar_width.unwrap_or(defaults.toolbar_width),
            toolbar_height: self.toolbar_height.unwrap_or(defaults.toolbar_height),
            padding: self.padding.unwrap_or(defaults.padding),
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct RunArgs {
    /// Script file (JSON).
    #[arg(long)]
    pub script: PathBuf,

    #[arg(long, value_enum, env = "IMGRESIZE_FORMAT", default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Write the interaction trace here as JSON Lines.
    #[arg(long)]
    pub trace: Option<PathBuf>,

    #[command(flatten)]
    pub metrics: MetricsArgs,
}

#[derive(Debug, Clone, Args)]
pub struct VerifyArgs {
    #[arg(long)]
    pub script: PathBuf,

    /// Previously recorded trace (JSON Lines).
    #[arg(long)]
    pub trace: PathBuf,

    #[arg(long, value_enum, env = "IMGRESIZE_FORMAT", default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    #[command(flatten)]
    pub metrics: MetricsArgs,
}

pub fn run_from_env() -> Result<()> {
    crate::init_logging();
    let cli = Cli::parse();
    run(cli, &mut io::stdout().lock())
}

pub fn run(cli: Cli, out: &mut dyn Write) -> Result<()> {
    match cli.command {
        Commands::Run(args) => run_replay(&args, out),
        Commands::Verify(args) => run_verify(&args, out),
    }
}

fn run_replay(args: &RunArgs, out: &mut dyn Write) -> Result<()> {
    let script = Script::load(&args.script)?;
    let report = replay(&script, args.metrics.resolve())?;
    if let Some(path) = &args.trace {
        let text = report.trace.to_jsonl()?;
        fs::write(path, text).map_err(|source| ReplayError::Write {
            path: path.clone(),
            source,
        })?;
        tracing::info!(path = %path.display(), "trace written");
    }
    print_report(&report, args.format, out)
}

fn run_verify(args: &VerifyArgs, out: &mut dyn Write) -> Result<()> {
    let script = Script::load(&args.script)?;
    let text = fs::read_to_string(&args.trace).map_err(|source| ReplayError::Read {
        path: args.trace.clone(),
        source,
    })?;
    let expected = Trace::from_jsonl(&text)?;
    let report = verify(&script, args.metrics.resolve(), &expected)?;
    print_report(&report, args.format, out)
}

fn print_report(report: &ReplayReport, format: OutputFormat, out: &mut dyn Write) -> Result<()> {
    match format {
        OutputFormat::Text => out.write_all(render_text(report).as_bytes())?,
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, report)?;
            writeln!(out)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::{Cli, Commands, OutputFormat};

    #[test]
    fn run_parses_metric_overrides() {
        let cli = Cli::try_parse_from([
            "imgresize-replay",
            "run",
            "--script",
            "session.json",
            "--format",
            "json",
            "--toolbar-width",
            "320",
        ])
        .unwrap();
        let Commands::Run(args) = cli.command else {
            panic!("expected run");
        };
        assert_eq!(args.format, OutputFormat::Json);
        let metrics = args.metrics.resolve();
        assert_eq!(metrics.toolbar_width, 320.0);
        assert_eq!(metrics.handle_size, 10.0);
    }

    #[test]
    fn verify_requires_trace() {
        assert!(Cli::try_parse_from(["imgresize-replay", "verify", "--script", "s.json"]).is_err());
    }
}
