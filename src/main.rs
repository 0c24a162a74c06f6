use std::io::{self, BufRead};
use std::path::PathBuf;
use std::process;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use elevator::input::command::{parse_line, Command};
use elevator::manager::dispatcher::Dispatcher;
use elevator::util::config::Config;

#[derive(Parser, Debug, Default)]
#[command(name = "elevator-bank", about = "Simulates a bank of elevators fed from stdin")]
struct Cli {
    /// Number of elevators to run
    elevators: Option<String>,
    /// JSON file with floors and timings
    #[arg(long)]
    config: Option<PathBuf>,
}

fn parse_cli() -> Cli {
    match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if e.kind() == clap::error::ErrorKind::DisplayHelp
            || e.kind() == clap::error::ErrorKind::DisplayVersion =>
        {
            e.exit()
        }
        Err(e) => {
            tracing::warn!(error = %e, "ignoring command line arguments");
            Cli::default()
        }
    }
}

fn elevator_count(cli: &Cli, config: &Config) -> usize {
    match cli.elevators.as_deref().map(str::parse::<usize>) {
        Some(Ok(n)) if n > 0 => n,
        Some(_) => {
            tracing::warn!(elevators = ?cli.elevators, "invalid elevator count, using the default");
            config.default_elevators
        }
        None => config.default_elevators,
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    let cli = parse_cli();
    let config = Config::load_or_default(cli.config.as_deref());
    let elevators = elevator_count(&cli, &config);
    println!("Number of the Elevators needs to be running :{}", elevators);

    let mut dispatcher = Dispatcher::new(config);
    if let Err(e) = dispatcher.start(elevators) {
        tracing::error!(error = %e, "could not start the elevators");
        process::exit(1);
    }

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                tracing::error!(error = %e, "could not read input");
                break;
            }
        };
        match parse_line(&line) {
            Command::Shutdown => {
                println!("Shutting Down All the Elevators");
                break;
            }
            Command::Request(request) => {
                if let Err(e) = dispatcher.submit(request) {
                    tracing::debug!(%request, error = %e, "request rejected");
                    println!("Invalid Request");
                }
            }
            Command::Invalid => println!("Invalid Request"),
        }
    }

    dispatcher.shutdown();
    println!("Exit");
    process::exit(1);
}
