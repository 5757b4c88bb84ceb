use clap::{Args, Parser, Subcommand};
use espkit::core::units::{LengthUnit, PotentialUnit};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "ChargeAPI Contributors",
    version,
    about = "ESPKit CLI - Electrostatic potentials from predicted atomic multipoles, for single molecules and batches.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Set the number of threads for parallel computation.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Evaluate the ESP of a single molecule.
    Evaluate(EvaluateArgs),
    /// Evaluate the ESP of every molecule in a batch file and write one result file.
    Batch(BatchArgs),
    /// List the known multipole models.
    Models,
}

/// Options shared by every evaluating command.
#[derive(Args, Debug, Clone, Default)]
pub struct EvaluationArgs {
    /// Path to a configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Multipole model to use (case-insensitive, see `espkit models`).
    #[arg(short, long, value_name = "NAME")]
    pub model: Option<String>,

    /// Length unit of coordinates and grids (angstrom, bohr, nm).
    #[arg(long, value_name = "UNIT")]
    pub length_unit: Option<LengthUnit>,

    /// Length unit of predicted dipoles and quadrupoles.
    #[arg(long, value_name = "UNIT")]
    pub moment_length_unit: Option<LengthUnit>,

    /// Unit of the reported potential (hartree, volt, kcal).
    #[arg(long, value_name = "UNIT")]
    pub potential_unit: Option<PotentialUnit>,

    /// Report monopole, dipole and quadrupole contributions separately.
    #[arg(long)]
    pub broken_up: bool,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S grid.density=3.0
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

/// Arguments for the `evaluate` subcommand.
#[derive(Args, Debug)]
pub struct EvaluateArgs {
    /// Path to the input molecule (JSON with `elements` and `coordinates`).
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,

    /// Path to a JSON grid, either `[[x, y, z], ...]` or a flat array.
    /// Without one, a grid is generated around the molecule.
    #[arg(short, long, value_name = "PATH")]
    pub grid: Option<PathBuf>,

    /// Write the result to this file (.json or .csv) instead of standard output.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub evaluation: EvaluationArgs,
}

/// Arguments for the `batch` subcommand.
#[derive(Args, Debug)]
pub struct BatchArgs {
    /// Path to the batch file: a JSON object mapping molecule identifiers to molecules.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,

    /// Path of the result file. Defaults to `<input stem>_esp.json` next to the input.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Reserved batched-grid mode. Accepted for compatibility, currently has no effect.
    #[arg(long)]
    pub batched_grid: bool,

    #[command(flatten)]
    pub evaluation: EvaluationArgs,
}
