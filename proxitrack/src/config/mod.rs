//! User configuration stored in `~/.proxitrack/config.ini`.
//!
//! # Example
//!
//! ```no_run
//! use proxitrack::config::ConfigFile;
//!
//! let config = ConfigFile::load()?;
//! let session = config.to_session_config();
//! assert!(session.history_capacity >= 1);
//! # Ok::<(), proxitrack::config::ConfigFileError>(())
//! ```

mod defaults;
mod file;
mod parser;
mod settings;
mod writer;

pub use defaults::*;
pub use file::{config_directory, config_file_path, ConfigFileError};
pub use settings::{
    AcquisitionSettings, ConfigFile, LoggingSettings, SimulationSettings, TrackingSettings,
};
