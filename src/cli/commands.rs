use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Roofing takeoff to scope-of-work generator
#[derive(Parser, Debug)]
#[command(
    name = "sowgen",
    about = "Roofing takeoff to scope-of-work generator",
    version,
    author,
    long_about = "sowgen validates roofing takeoff forms, selects the matching SOW template \
                  for the work type, membrane, attachment method and deck, and renders a \
                  scope-of-work summary. It can run a single takeoff file or serve the \
                  workflow over HTTP."
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, value_name = "LEVEL", help = "Set logging level")]
    pub log_level: Option<String>,

    #[arg(
        short = 'v',
        long,
        global = true,
        help = "Enable debug logging"
    )]
    pub verbose: bool,

    #[arg(
        short = 'q',
        long,
        global = true,
        conflicts_with = "verbose",
        help = "Quiet mode - suppress non-error output"
    )]
    pub quiet: bool,

    #[arg(
        short = 'f',
        long,
        global = true,
        value_enum,
        default_value = "human",
        help = "Output format"
    )]
    pub format: OutputFormatArg,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(
        about = "Run the full workflow on a takeoff file",
        long_about = "Saves the takeoff, validates it, selects a template, renders the SOW \
                      summary and writes the document under the data directory.\n\n\
                      Examples:\n  \
                      sowgen generate takeoff.json\n  \
                      sowgen generate takeoff.json --data-dir ./data --format json"
    )]
    Generate(GenerateArgs),

    #[command(about = "Validate a takeoff file without generating anything")]
    Validate(TakeoffArgs),

    #[command(about = "Select the SOW template for a takeoff file")]
    Select(TakeoffArgs),

    #[command(
        about = "Check a takeoff file against a specific template",
        long_about = "Reports work type and membrane errors, deck warnings and template \
                      restrictions.\n\n\
                      Examples:\n  \
                      sowgen check --template T4 takeoff.json"
    )]
    Check(CheckArgs),

    #[command(about = "List available templates")]
    Templates(TemplatesArgs),

    #[command(about = "Render the SOW summary for a takeoff file")]
    Summary(SummaryArgs),

    #[command(about = "Show the status of a workflow by id")]
    Status(StatusArgs),

    #[command(
        about = "Serve the HTTP API",
        long_about = "Starts the HTTP API. Host and port default to SOWGEN_HOST and \
                      SOWGEN_PORT.\n\n\
                      Examples:\n  \
                      sowgen serve\n  \
                      sowgen serve --host 127.0.0.1 --port 9000"
    )]
    Serve(ServeArgs),
}

#[derive(Parser, Debug, Clone)]
pub struct TakeoffArgs {
    #[arg(value_name = "FILE", help = "Takeoff JSON file")]
    pub file: PathBuf,
}

#[derive(Parser, Debug, Clone)]
pub struct GenerateArgs {
    #[arg(value_name = "FILE", help = "Takeoff JSON file")]
    pub file: PathBuf,

    #[arg(
        long,
        value_name = "DIR",
        help = "Data directory (defaults to SOWGEN_DATA_DIR)"
    )]
    pub data_dir: Option<PathBuf>,
}

#[derive(Parser, Debug, Clone)]
pub struct CheckArgs {
    #[arg(short = 't', long, value_name = "ID", help = "Template id, e.g. T6")]
    pub template: String,

    #[arg(value_name = "FILE", help = "Takeoff JSON file")]
    pub file: PathBuf,
}

#[derive(Parser, Debug, Clone, Default)]
pub struct TemplatesArgs {
    #[arg(long, value_name = "TEXT", help = "Only templates for this work type")]
    pub work_type: Option<String>,

    #[arg(long, value_name = "TEXT", help = "Only templates supporting this membrane")]
    pub membrane: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct SummaryArgs {
    #[arg(value_name = "FILE", help = "Takeoff JSON file")]
    pub file: PathBuf,

    #[arg(
        short = 'o',
        long,
        value_name = "FILE",
        help = "Write output to file instead of stdout"
    )]
    pub output: Option<PathBuf>,
}

#[derive(Parser, Debug, Clone)]
pub struct StatusArgs {
    #[arg(value_name = "WORKFLOW_ID")]
    pub workflow_id: String,

    #[arg(
        long,
        value_name = "DIR",
        help = "Data directory (defaults to SOWGEN_DATA_DIR)"
    )]
    pub data_dir: Option<PathBuf>,
}

#[derive(Parser, Debug, Clone)]
pub struct ServeArgs {
    #[arg(long, value_name = "HOST")]
    pub host: Option<String>,

    #[arg(short = 'p', long, value_name = "PORT")]
    pub port: Option<u16>,

    #[arg(
        long,
        value_name = "DIR",
        help = "Data directory (defaults to SOWGEN_DATA_DIR)"
    )]
    pub data_dir: Option<PathBuf>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormatArg {
    Json,
    Yaml,
    Human,
}

impl From<OutputFormatArg> for super::output::OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Json => super::output::OutputFormat::Json,
            OutputFormatArg::Yaml => super::output::OutputFormat::Yaml,
            OutputFormatArg::Human => super::output::OutputFormat::Human,
        }
    }
}
