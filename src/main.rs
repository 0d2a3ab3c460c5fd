use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use version_updates::app::{self, RunOptions};
use version_updates::report::{OutputFormat, ReportMode};

#[derive(Parser)]
#[command(name = "version-updates")]
#[command(version, about = "Find available version updates for configured components")]
struct Cli {
    /// Config file (defaults to $XDG_CONFIG_HOME/version-updates/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Version catalog (defaults to catalog.json next to the config)
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    /// Write JSON logs to this file instead of stderr
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    /// Report every component, including those already up to date
    #[arg(long, global = true)]
    show_all: bool,

    /// Consider snapshot versions as candidates
    #[arg(long, global = true)]
    allow_snapshots: bool,

    /// Attach per-tier decision traces to JSON output
    #[arg(long, global = true)]
    explain: bool,

    #[arg(long, value_enum, default_value_t = Format::Text, global = true)]
    format: Format,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show the recommended update for each component
    Dependencies,
    /// Show property style `${name} current -> winner` lines
    Properties,
    /// Show the newest incremental, minor and major update per component
    Report,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let _guard = version_updates::logging::init(cli.log_file.as_deref());

    let options = RunOptions {
        config_path: cli.config,
        catalog_path: cli.catalog,
        mode: match cli.command {
            Command::Dependencies => ReportMode::Dependencies,
            Command::Properties => ReportMode::Properties,
            Command::Report => ReportMode::Report,
        },
        format: match cli.format {
            Format::Text => OutputFormat::Text,
            Format::Json => OutputFormat::Json,
        },
        show_all: cli.show_all,
        allow_snapshots: cli.allow_snapshots,
        explain: cli.explain,
    };

    let output = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(app::run(&options))?;
    print!("{}", output);
    Ok(())
}
