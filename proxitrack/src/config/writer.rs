//! INI serialization logic for converting `ConfigFile` → INI string.
//!
//! Produces the commented INI representation written to `config.ini`.

use std::path::Path;

use super::settings::ConfigFile;

/// Convert a `ConfigFile` to a commented INI string for saving.
pub(super) fn to_config_string(config: &ConfigFile) -> String {
    format!(
        r#"[tracking]
; Remote position samples kept per tracked vehicle
history_capacity = {}
; Distances kept to decide approaching / receding
distance_history_capacity = {}
; Distance changes within this band (meters) count as stationary
stationary_threshold_m = {}

[acquisition]
; Ask the device for its most accurate fix
high_accuracy = {}
; Oldest cached fix the device may return (milliseconds)
max_cached_age_ms = {}
; How long the device may take to produce a fix (milliseconds)
timeout_ms = {}
; Seconds between reads when continuous updates are unavailable
poll_interval_secs = {}

[simulation]
; Meters moved per tick
step_m = {}
; Milliseconds between ticks
tick_ms = {}
; Samples averaged for the reported speed
smoothing_window = {}
; Stationary band for simulated data (meters)
stationary_threshold_m = {}

[logging]
directory = {}
file = {}
"#,
        config.tracking.history_capacity,
        config.tracking.distance_history_capacity,
        config.tracking.stationary_threshold_m,
        config.acquisition.high_accuracy,
        config.acquisition.max_cached_age_ms,
        config.acquisition.timeout_ms,
        config.acquisition.poll_interval_secs,
        config.simulation.step_m,
        config.simulation.tick_ms,
        config.simulation.smoothing_window,
        config.simulation.stationary_threshold_m,
        path_to_string(&config.logging.directory),
        config.logging.file,
    )
}

/// Convert a path to string, collapsing the home directory to ~.
fn path_to_string(path: &Path) -> String {
    if let Some(home) = dirs::home_dir() {
        if let Ok(stripped) = path.strip_prefix(&home) {
            return format!("~/{}", stripped.display());
        }
    }
    path.display().to_string()
}

#[cfg(test)]
mod tests {
    use super::super::settings::ConfigFile;
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("nested").join("config.ini");

        let mut config = ConfigFile::default();
        config.tracking.stationary_threshold_m = 1.5;
        config.acquisition.high_accuracy = false;
        config.acquisition.poll_interval_secs = 10;
        config.simulation.step_m = 12.5;
        config.logging.file = "demo.log".to_string();

        config.save_to(&config_path).unwrap();
        let loaded = ConfigFile::load_from(&config_path).unwrap();

        assert_eq!(loaded, config);
    }

    #[test]
    fn test_written_defaults_are_commented() {
        let content = to_config_string(&ConfigFile::default());
        assert!(content.contains("[tracking]"));
        assert!(content.contains("stationary_threshold_m = 1\n"));
        assert!(content.contains("stationary_threshold_m = 0.5"));
        assert!(content.contains("high_accuracy = true"));
        assert!(content.lines().any(|l| l.starts_with(';')));
    }
}
