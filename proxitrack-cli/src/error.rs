//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and appropriate exit codes.

use std::fmt;
use std::process;

use proxitrack::config::ConfigFileError;
use proxitrack::session::SessionError;
use proxitrack::simulation::SimulationError;
use proxitrack::telemetry::PublishError;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Configuration error
    Config(String),
    /// Failed to read or write the config file
    ConfigFile(ConfigFileError),
    /// Failed to start the async runtime
    Runtime(std::io::Error),
    /// The tracking session shut down early
    Session(SessionError),
    /// The demo producer stopped with an error
    Simulation(SimulationError),
    /// A background task panicked or was cancelled
    Task(String),
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        match self {
            CliError::Simulation(SimulationError::Publish(e)) if e.is_user_actionable() => {
                eprintln!();
                eprintln!("The telemetry backend refused the position update:");
                eprintln!("  1. Check that this client may publish for the entity");
                eprintln!("  2. Try again with a different --entity");
            }
            CliError::Simulation(SimulationError::Publish(PublishError::MissingEntity)) => {
                eprintln!();
                eprintln!("Pass a non-empty identifier with --entity.");
            }
            CliError::ConfigFile(ConfigFileError::InvalidValue { .. }) => {
                eprintln!();
                eprintln!("Fix the value in the config file or regenerate it with:");
                eprintln!("  proxitrack config init --force");
            }
            _ => {}
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::ConfigFile(e) => write!(f, "{}", e),
            CliError::Runtime(e) => write!(f, "Failed to start async runtime: {}", e),
            CliError::Session(e) => write!(f, "{}", e),
            CliError::Simulation(e) => write!(f, "Simulation failed: {}", e),
            CliError::Task(msg) => write!(f, "Background task failed: {}", msg),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::ConfigFile(e) => Some(e),
            CliError::Runtime(e) => Some(e),
            CliError::Session(e) => Some(e),
            CliError::Simulation(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigFileError> for CliError {
    fn from(e: ConfigFileError) -> Self {
        CliError::ConfigFile(e)
    }
}

impl From<SessionError> for CliError {
    fn from(e: SessionError) -> Self {
        CliError::Session(e)
    }
}

impl From<SimulationError> for CliError {
    fn from(e: SimulationError) -> Self {
        CliError::Simulation(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proxitrack::tracking::EntityId;

    #[test]
    fn test_display_wraps_library_errors() {
        let err = CliError::from(SimulationError::Publish(PublishError::PermissionDenied(
            EntityId::new("bus-7"),
        )));
        let message = err.to_string();
        assert!(message.starts_with("Simulation failed:"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_config_message_passthrough() {
        let err = CliError::Config("bad key".to_string());
        assert_eq!(err.to_string(), "Configuration error: bad key");
        assert!(std::error::Error::source(&err).is_none());
    }
}
