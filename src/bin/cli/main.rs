//! CLI tool for inspecting and patching model containers.

mod commands;
mod exit_codes;
mod file_selector;
mod output;
mod progress;

use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, fmt};

use exit_codes::ExitCode;

/// Inspect and patch simulation-model containers
#[derive(Parser)]
#[command(name = "mphkit")]
#[command(author, version, about = "Inspect and patch simulation-model containers", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, short = 'f', value_enum, default_value = "human", global = true)]
    format: OutputFormat,

    /// Suppress progress output
    #[arg(long, short = 'q', global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List container members (alias: l)
    #[command(alias = "l")]
    List {
        /// Container to list
        container: PathBuf,

        /// Member patterns to show (glob patterns supported)
        #[arg(short = 'i', long)]
        include: Vec<String>,

        /// Member patterns to hide
        #[arg(short = 'e', long)]
        exclude: Vec<String>,
    },

    /// Show model information and size breakdown (alias: i)
    #[command(alias = "i")]
    Info {
        /// Container to inspect
        container: PathBuf,
    },

    /// Show the parameter table (alias: p)
    #[command(alias = "p")]
    Params {
        /// Container to read
        container: PathBuf,
    },

    /// Patch parameter values into a modified copy (alias: s)
    #[command(alias = "s")]
    Set {
        /// Container to patch
        container: PathBuf,

        /// Edits as NAME=VALUE
        #[arg(required = true, value_name = "NAME=VALUE")]
        assignments: Vec<String>,

        /// Directory for the backup and modified container
        #[arg(short = 'o', long)]
        output_dir: Option<PathBuf>,

        /// Store members without compression
        #[arg(long)]
        store: bool,
    },

    /// Extract all members into <stem>-extracted (alias: x)
    #[command(alias = "x")]
    Extract {
        /// Container to extract
        container: PathBuf,

        /// Destination directory
        #[arg(short = 'o', long, default_value = ".")]
        output: PathBuf,
    },

    /// Compare two containers member by member
    Diff {
        /// First container
        left: PathBuf,

        /// Second container
        right: PathBuf,
    },

    /// Find containers under a projects directory
    Scan {
        /// Directory to search
        #[arg(default_value = "comsol_projects", env = "MPHKIT_PROJECTS")]
        dir: PathBuf,
    },

    /// Check for external tools
    Doctor {
        /// Additional executables that must be present
        tools: Vec<String>,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Human,
    Json,
}

/// Installs the stderr log subscriber. `RUST_LOG` overrides the default.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    // Set up Ctrl+C handler
    ctrlc::set_handler(move || {
        eprintln!("\nInterrupted");
        std::process::exit(exit_codes::USER_INTERRUPT);
    })
    .ok();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if e.use_stderr() => {
            e.print().ok();
            std::process::exit(exit_codes::BAD_ARGS);
        }
        Err(e) => e.exit(),
    };

    init_logging();

    let exit_code = match cli.command {
        Commands::List {
            container,
            include,
            exclude,
        } => commands::list(&container, &include, &exclude, cli.format),

        Commands::Info { container } => commands::info(&container, cli.format),

        Commands::Params { container } => commands::params(&container, cli.format),

        Commands::Set {
            container,
            assignments,
            output_dir,
            store,
        } => commands::set(&commands::SetConfig {
            container_path: &container,
            assignments: &assignments,
            output_dir: output_dir.as_deref(),
            store,
            format: cli.format,
            quiet: cli.quiet,
        }),

        Commands::Extract { container, output } => {
            commands::extract(&container, &output, cli.format, cli.quiet)
        }

        Commands::Diff { left, right } => commands::diff(&left, &right, cli.format),

        Commands::Scan { dir } => commands::scan(&dir, cli.format),

        Commands::Doctor { tools } => commands::doctor(&tools, cli.format),

        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(shell, &mut cmd, name, &mut std::io::stdout());
            ExitCode::Success
        }
    };

    std::process::exit(exit_code.code());
}
