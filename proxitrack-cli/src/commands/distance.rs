//! Distance command - great-circle distance, bearing and ETA between two points.

use proxitrack::geodesy::{self, Coordinate};
use proxitrack::tracking::eta;

use crate::error::CliError;
use crate::format::{format_distance, format_eta};

/// Arguments for the distance command.
pub struct DistanceArgs {
    pub from: Coordinate,
    pub to: Coordinate,
    /// Speed toward `to` in m/s, for the ETA line
    pub speed: Option<f64>,
}

/// Result of a distance calculation.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceReport {
    pub distance_m: f64,
    pub bearing_deg: f64,
    pub eta_s: Option<f64>,
}

impl DistanceReport {
    pub fn compute(args: &DistanceArgs) -> Self {
        let distance_m = geodesy::distance(args.from, args.to);
        Self {
            distance_m,
            bearing_deg: geodesy::bearing(args.from, args.to),
            eta_s: eta(distance_m, args.speed),
        }
    }
}

/// Run the distance command.
pub fn run(args: DistanceArgs) -> Result<(), CliError> {
    if let Some(speed) = args.speed {
        if !speed.is_finite() || speed < 0.0 {
            return Err(CliError::Config(format!(
                "Speed must be a non-negative number of m/s (got {})",
                speed
            )));
        }
    }

    let report = DistanceReport::compute(&args);

    println!("From:     {}", args.from);
    println!("To:       {}", args.to);
    println!("Distance: {}", format_distance(Some(report.distance_m)));
    println!("Bearing:  {:.1}°", report.bearing_deg);
    println!("ETA:      {}", format_eta(report.eta_s));

    Ok(())
}
