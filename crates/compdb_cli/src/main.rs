//! compdb CLI: the command-line interface to compilation databases.
//!
//! Provides `compdb list` to dump compile commands, `compdb update` to
//! recompute complementer caches such as the header database, `compdb check`
//! to compare the databases with the files of a project, `compdb scan-files`
//! to list C/C++ files, and `compdb config` to inspect the configuration.

#![warn(missing_docs)]

mod check;
mod config_cmd;
mod filelist;
mod list;
mod logging;
mod session;
mod update;

use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use compdb_config::{parse_override, Config, ConfigResult, Override};

use crate::filelist::FileGroup;

/// compdb: compilation database tools.
#[derive(Parser, Debug)]
#[command(name = "compdb", version, about = "Compilation database tools")]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose (debug-level) output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Set a configuration variable, e.g. `-c compdb.build_dir=build`.
    /// Must precede the subcommand.
    #[arg(short = 'c', value_name = "NAME[=VALUE]")]
    pub config: Vec<String>,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Dump compile commands as a JSON compilation database.
    List(ListArgs),
    /// Recompute the complementer caches of every build directory.
    Update,
    /// Report project files missing from the compilation database(s).
    Check(CheckArgs),
    /// List C and C++ files.
    ScanFiles(ScanArgs),
    /// Inspect the configuration.
    Config {
        /// The configuration query.
        #[command(subcommand)]
        command: ConfigCommand,
    },
    /// Print the version.
    Version {
        /// Print the version number only.
        #[arg(long)]
        short: bool,
    },
}

/// Arguments for `compdb list`.
#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Keep at most one compile command per file.
    #[arg(short, long)]
    pub unique: bool,

    /// Files to look up; all compile commands when omitted.
    pub files: Vec<PathBuf>,
}

/// Arguments for `compdb check`.
#[derive(Parser, Debug)]
pub struct CheckArgs {
    /// Project directories to scan.
    #[arg(default_value = ".")]
    pub paths: Vec<PathBuf>,

    /// File groups to scan.
    #[arg(
        short,
        long,
        value_enum,
        value_delimiter = ',',
        default_values_t = [FileGroup::Source, FileGroup::Header]
    )]
    pub groups: Vec<FileGroup>,

    /// Ignore missing files matching this pattern.
    #[arg(long, value_name = "PATTERN")]
    pub suppress: Vec<String>,

    /// Read suppression patterns from a file.
    #[arg(long, value_name = "FILE")]
    pub suppressions: Vec<PathBuf>,
}

/// Arguments for `compdb scan-files`.
#[derive(Parser, Debug)]
pub struct ScanArgs {
    /// Directories to scan.
    #[arg(default_value = ".")]
    pub paths: Vec<PathBuf>,

    /// File groups to list.
    #[arg(
        short,
        long,
        value_enum,
        value_delimiter = ',',
        default_values_t = [FileGroup::Source, FileGroup::Header]
    )]
    pub groups: Vec<FileGroup>,
}

/// `compdb config` subcommands.
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum ConfigCommand {
    /// Print the path of the user configuration file.
    PrintUserConf,
    /// Print the path of the local configuration file.
    PrintLocalConf,
    /// List every configuration key.
    List,
    /// Dump the effective configuration.
    Dump,
    /// Print the effective value of a variable.
    Get {
        /// The variable, `SECTION.VAR`.
        key: String,
    },
}

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Whether to suppress non-error output.
    pub quiet: bool,
    /// Configuration overrides from `-c`.
    pub overrides: Vec<Override>,
    /// The working directory, as the user sees it.
    pub cwd: PathBuf,
}

impl GlobalArgs {
    /// Loads the configuration seen from the working directory.
    pub fn load_config(&self) -> ConfigResult<Config> {
        Config::load(&self.overrides, &self.cwd)
    }
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.quiet, cli.verbose);

    match run(cli) {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}

fn run(cli: Cli) -> Result<i32, Box<dyn std::error::Error>> {
    let overrides = cli
        .config
        .iter()
        .map(|arg| parse_override(arg))
        .collect::<ConfigResult<Vec<_>>>()?;
    let global = GlobalArgs {
        quiet: cli.quiet,
        overrides,
        cwd: compdb_common::logical_abspath(Path::new(".")),
    };
    tracing::debug!("working directory: {}", global.cwd.display());

    match cli.command {
        Command::List(ref args) => list::run(args, &global),
        Command::Update => update::run(&global),
        Command::Check(ref args) => check::run(args, &global),
        Command::ScanFiles(ref args) => filelist::run(args, &global),
        Command::Config { ref command } => config_cmd::run(command, &global),
        Command::Version { short } => {
            println!("{}", version_line(short));
            Ok(0)
        }
    }
}

fn version_line(short: bool) -> String {
    let version = env!("CARGO_PKG_VERSION");
    if short {
        version.to_string()
    } else {
        format!("compdb version {version}")
    }
}
