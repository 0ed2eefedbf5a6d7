use sowgen::cli::commands::{CliArgs, Commands};
use sowgen::cli::handlers::{
    handle_check, handle_generate, handle_select, handle_serve, handle_status, handle_summary,
    handle_templates, handle_validate,
};
use sowgen::cli::OutputFormat;
use sowgen::util::logging::{init_logging, parse_level, LoggingConfig};
use sowgen::{SowgenConfig, VERSION};

use clap::Parser;
use tracing::{debug, Level};

#[tokio::main]
async fn main() {
    let args = CliArgs::parse();
    let config = SowgenConfig::default();
    init_logging_from_args(&args, &config);

    debug!("sowgen v{} starting", VERSION);
    debug!("Arguments: {:?}", args);

    if let Err(e) = config.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    let format = OutputFormat::from(args.format);
    let exit_code = match &args.command {
        Commands::Generate(a) => handle_generate(a, format, &config).await,
        Commands::Validate(a) => handle_validate(a, format),
        Commands::Select(a) => handle_select(a, format),
        Commands::Check(a) => handle_check(a, format),
        Commands::Templates(a) => handle_templates(a, format),
        Commands::Summary(a) => handle_summary(a, format),
        Commands::Status(a) => handle_status(a, format, &config),
        Commands::Serve(a) => handle_serve(a, &config).await,
    };

    std::process::exit(exit_code);
}

fn init_logging_from_args(args: &CliArgs, config: &SowgenConfig) {
    let mut logging = LoggingConfig::from_config(config);
    if !matches!(args.command, Commands::Serve(_)) && !logging.is_json() {
        logging = LoggingConfig {
            level: logging.level,
            ..LoggingConfig::cli()
        };
    }
    if let Some(level) = &args.log_level {
        logging.level = parse_level(level);
    } else if args.verbose {
        logging.level = Level::DEBUG;
    } else if args.quiet {
        logging.level = Level::ERROR;
    }
    init_logging(logging);
}
