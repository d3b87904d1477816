//! proxitrack CLI - Command-line interface
//!
//! Geodesy calculator, demo simulation and config management on top of the
//! proxitrack library.

mod commands;
mod error;
mod format;
mod runner;

use clap::{Parser, Subcommand};
use proxitrack::geodesy::Coordinate;

use commands::config::ConfigCommands;
use commands::distance::DistanceArgs;
use commands::simulate::SimulateArgs;

#[derive(Parser)]
#[command(name = "proxitrack")]
#[command(version = proxitrack::VERSION)]
#[command(about = "Real-time proximity tracking and ETA for moving vehicles", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Distance, bearing and ETA between two points
    Distance {
        /// Starting point as LAT,LON in decimal degrees
        #[arg(long, allow_hyphen_values = true)]
        from: Coordinate,

        /// Destination as LAT,LON in decimal degrees
        #[arg(long, allow_hyphen_values = true)]
        to: Coordinate,

        /// Speed toward the destination in meters per second
        #[arg(long)]
        speed: Option<f64>,
    },

    /// Drive a simulated vehicle toward an observer and print live snapshots
    Simulate {
        /// Identifier the simulated positions are published under
        #[arg(long, default_value = "demo-vehicle")]
        entity: String,

        /// Vehicle start as LAT,LON
        #[arg(long, allow_hyphen_values = true)]
        from: Coordinate,

        /// Observer position (and vehicle target) as LAT,LON
        #[arg(long, allow_hyphen_values = true)]
        to: Coordinate,

        /// Stop after this many positions even if the target is not reached
        #[arg(long)]
        ticks: Option<u32>,

        /// Milliseconds between positions (overrides config)
        #[arg(long)]
        tick_ms: Option<u64>,

        /// Meters moved per position (overrides config)
        #[arg(long)]
        step_m: Option<f64>,
    },

    /// Manage the configuration file
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Distance { from, to, speed } => {
            commands::distance::run(DistanceArgs { from, to, speed })
        }
        Commands::Simulate {
            entity,
            from,
            to,
            ticks,
            tick_ms,
            step_m,
        } => commands::simulate::run(SimulateArgs {
            entity,
            from,
            to,
            ticks,
            tick_ms,
            step_m,
        }),
        Commands::Config { command } => commands::config::run(command),
    };

    if let Err(e) = result {
        e.exit();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_distance_with_negative_longitude() {
        let cli = Cli::try_parse_from([
            "proxitrack",
            "distance",
            "--from",
            "14.95,-89.53",
            "--to",
            "14.952,-89.531",
            "--speed",
            "10",
        ])
        .unwrap();

        match cli.command {
            Commands::Distance { from, to, speed } => {
                assert_eq!(from, Coordinate::new(14.95, -89.53));
                assert_eq!(to, Coordinate::new(14.952, -89.531));
                assert_eq!(speed, Some(10.0));
            }
            _ => panic!("expected distance command"),
        }
    }

    #[test]
    fn test_parse_rejects_out_of_range_coordinate() {
        let result = Cli::try_parse_from([
            "proxitrack",
            "distance",
            "--from",
            "95.0,0.0",
            "--to",
            "0.0,0.0",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_simulate_defaults() {
        let cli = Cli::try_parse_from([
            "proxitrack",
            "simulate",
            "--from",
            "-33.9,151.2",
            "--to",
            "-33.901,151.2",
        ])
        .unwrap();

        match cli.command {
            Commands::Simulate {
                entity,
                ticks,
                tick_ms,
                step_m,
                ..
            } => {
                assert_eq!(entity, "demo-vehicle");
                assert_eq!(ticks, None);
                assert_eq!(tick_ms, None);
                assert_eq!(step_m, None);
            }
            _ => panic!("expected simulate command"),
        }
    }
}
