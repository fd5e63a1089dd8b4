use clap::error::ErrorKind;
use clap::Parser;
use colored::*;
use lbstats::client::{
    init_logging_with_config, ClientError, Config, Runner, TracingLogger, EXIT_ARGUMENTS, USAGE,
};
use std::process;
use std::sync::Arc;
use tracing::{debug, error, info};

fn main() {
    let config = match Config::try_parse() {
        Ok(config) => config,
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => e.exit(),
            ErrorKind::MissingRequiredArgument => {
                eprintln!("{} too few arguments", "error:".red().bold());
                eprintln!("\n{}", USAGE);
                process::exit(EXIT_ARGUMENTS);
            }
            _ => {
                let _ = e.print();
                process::exit(EXIT_ARGUMENTS);
            }
        },
    };

    init_logging_with_config(&config.log_level, config.is_json_format());

    if let Err(e) = config.validate() {
        fail(&e);
    }

    info!(
        address = %config.address,
        packet_size = config.packet_size,
        stats_period = config.stats_period,
        percentiles = config.percentiles,
        "Starting lbstats"
    );

    let runner = Runner::new(&config, Arc::new(TracingLogger));
    match runner.run() {
        Ok(outcome) => {
            debug!(
                writer = %outcome.writer,
                reader = %outcome.reader,
                "Both loops stopped"
            );
        }
        Err(e) => {
            error!("failed to open connection");
            fail(&e);
        }
    }
}

fn fail(e: &ClientError) -> ! {
    error!(error = %e, "lbstats failed");
    eprintln!("{} {}", "error:".red().bold(), e);
    if matches!(e, ClientError::PacketTooSmall { .. } | ClientError::Argument(_)) {
        eprintln!("\n{}", USAGE);
    }
    process::exit(e.exit_code());
}
