use std::process::ExitCode;

use chrono::Utc;
use clap::{Parser, Subcommand};
use serde::Serialize;

use sat_access::batch::run_batch;
use sat_access::config::Config;
use sat_access::oracle::SgpOracle;
use sat_access::predict::CancelToken;
use sat_access::synth::{self, CatalogPool, FixedCatalog, OrbitType, OrbitalSynthesisRequest};
use sat_access::timeexpr::{parse_duration, TimeExpr};
use sat_access::tle;

#[derive(Parser)]
#[command(name = "sat-access")]
#[command(about = "Satellite access windows and TLE tooling")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a two-line element set and report every problem found
    Validate {
        #[arg(long)]
        line1: String,
        #[arg(long)]
        line2: String,
    },
    /// Synthesize an element set for a hypothetical satellite
    Synthesize {
        #[arg(long)]
        orbit: OrbitType,
        #[arg(long)]
        altitude_km: Option<f64>,
        #[arg(long)]
        inclination_deg: Option<f64>,
        #[arg(long)]
        eccentricity: Option<f64>,
        /// Use this catalog number instead of the next free dummy one
        #[arg(long)]
        catalog: Option<u32>,
    },
    /// Compute access windows for every satellite/site pair of a config file
    Passes {
        #[arg(long)]
        config: String,
        #[arg(long, default_value = "now")]
        start: TimeExpr,
        #[arg(long, default_value = "now+1day")]
        end: TimeExpr,
        /// Print flattened AOS/culmination/LOS events instead of windows
        #[arg(long)]
        events: bool,
        /// Print events as InfluxDB line protocol
        #[arg(long, conflicts_with = "events")]
        influx: bool,
        /// Abort the batch after this long, e.g. `30s`
        #[arg(long)]
        timeout: Option<String>,
    },
}

#[derive(Clone, Copy)]
enum Output {
    Windows,
    Events,
    Influx,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { line1, line2 } => validate(&line1, &line2),
        Commands::Synthesize {
            orbit,
            altitude_km,
            inclination_deg,
            eccentricity,
            catalog,
        } => {
            let request = OrbitalSynthesisRequest {
                orbit,
                altitude_km,
                inclination_deg,
                eccentricity,
            };
            synthesize(&request, catalog)
        }
        Commands::Passes {
            config,
            start,
            end,
            events,
            influx,
            timeout,
        } => {
            let output = if influx {
                Output::Influx
            } else if events {
                Output::Events
            } else {
                Output::Windows
            };
            passes(&config, start, end, output, timeout.as_deref())
        }
    }
}

fn validate(line1: &str, line2: &str) -> ExitCode {
    let report = tle::validate(line1, line2);
    print_json(&report);
    if report.is_valid {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn synthesize(request: &OrbitalSynthesisRequest, catalog: Option<u32>) -> ExitCode {
    let result = match catalog {
        Some(number) => synth::synthesize(request, &FixedCatalog(number)),
        None => synth::synthesize(request, &CatalogPool::new()),
    };
    match result {
        Ok(orbit) => {
            print_json(&orbit);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Synthesis error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn passes(
    path: &str,
    start: TimeExpr,
    end: TimeExpr,
    output: Output,
    timeout: Option<&str>,
) -> ExitCode {
    let config = match Config::from_file(path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let now = Utc::now();
    let request = match config.batch_request(start.resolve(now), end.resolve(now)) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Config error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let cancel = match timeout.map(parse_duration).transpose() {
        Ok(Some(limit)) => match limit.to_std() {
            Ok(limit) => CancelToken::with_timeout(limit),
            Err(e) => {
                eprintln!("Invalid timeout: {}", e);
                return ExitCode::FAILURE;
            }
        },
        Ok(None) => CancelToken::new(),
        Err(e) => {
            eprintln!("Invalid timeout: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let oracle = SgpOracle::new();
    let catalog = CatalogPool::new();
    match run_batch(&oracle, &request, &catalog, &cancel) {
        Ok(result) => {
            match output {
                Output::Windows => print_json(&result),
                Output::Events => print_json(&result.events()),
                Output::Influx => {
                    for point in result.influx_points() {
                        println!("{}", point.to_line_protocol());
                    }
                }
            }
            if result.cancelled {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(e) => {
            eprintln!("Batch error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Serialization error: {}", e),
    }
}
