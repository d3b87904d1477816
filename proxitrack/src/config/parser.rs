//! INI parsing logic for converting `Ini` → `ConfigFile`.
//!
//! The single place where INI key names are mapped to struct fields.

use std::path::PathBuf;
use std::str::FromStr;

use ini::{Ini, Properties};

use super::file::ConfigFileError;
use super::settings::ConfigFile;

/// Parse an `Ini` object into a `ConfigFile`.
///
/// Starts from `ConfigFile::default()` and overlays any values found in the INI.
pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    // [tracking] section
    if let Some(section) = ini.section(Some("tracking")) {
        if let Some(v) = parse_capacity(section, "tracking", "history_capacity")? {
            config.tracking.history_capacity = v;
        }
        if let Some(v) = parse_capacity(section, "tracking", "distance_history_capacity")? {
            config.tracking.distance_history_capacity = v;
        }
        if let Some(v) = parse_threshold(section, "tracking", "stationary_threshold_m")? {
            config.tracking.stationary_threshold_m = v;
        }
    }

    // [acquisition] section
    if let Some(section) = ini.section(Some("acquisition")) {
        if let Some(v) = section.get("high_accuracy") {
            config.acquisition.high_accuracy = parse_bool(v);
        }
        if let Some(v) = parse_number(
            section,
            "acquisition",
            "max_cached_age_ms",
            "must be a non-negative integer (milliseconds)",
        )? {
            config.acquisition.max_cached_age_ms = v;
        }
        if let Some(v) = parse_positive_u64(
            section,
            "acquisition",
            "timeout_ms",
            "must be a positive integer (milliseconds)",
        )? {
            config.acquisition.timeout_ms = v;
        }
        if let Some(v) = parse_positive_u64(
            section,
            "acquisition",
            "poll_interval_secs",
            "must be a positive integer (seconds)",
        )? {
            config.acquisition.poll_interval_secs = v;
        }
    }

    // [simulation] section
    if let Some(section) = ini.section(Some("simulation")) {
        if let Some(v) = section.get("step_m") {
            let reason = "must be a positive number (meters)";
            let step: f64 = v
                .trim()
                .parse()
                .map_err(|_| invalid("simulation", "step_m", v, reason))?;
            if !step.is_finite() || step <= 0.0 {
                return Err(invalid("simulation", "step_m", v, reason));
            }
            config.simulation.step_m = step;
        }
        if let Some(v) = parse_positive_u64(
            section,
            "simulation",
            "tick_ms",
            "must be a positive integer (milliseconds)",
        )? {
            config.simulation.tick_ms = v;
        }
        if let Some(v) = parse_capacity(section, "simulation", "smoothing_window")? {
            config.simulation.smoothing_window = v;
        }
        if let Some(v) = parse_threshold(section, "simulation", "stationary_threshold_m")? {
            config.simulation.stationary_threshold_m = v;
        }
    }

    // [logging] section
    if let Some(section) = ini.section(Some("logging")) {
        if let Some(v) = section.get("directory") {
            let v = v.trim();
            if !v.is_empty() {
                config.logging.directory = expand_tilde(v);
            }
        }
        if let Some(v) = section.get("file") {
            let v = v.trim();
            if !v.is_empty() {
                config.logging.file = v.to_string();
            }
        }
    }

    Ok(config)
}

fn invalid(section: &str, key: &str, value: &str, reason: &str) -> ConfigFileError {
    ConfigFileError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn parse_number<T: FromStr>(
    section: &Properties,
    name: &str,
    key: &str,
    reason: &str,
) -> Result<Option<T>, ConfigFileError> {
    section
        .get(key)
        .map(|v| v.trim().parse().map_err(|_| invalid(name, key, v, reason)))
        .transpose()
}

fn parse_positive_u64(
    section: &Properties,
    name: &str,
    key: &str,
    reason: &str,
) -> Result<Option<u64>, ConfigFileError> {
    match parse_number::<u64>(section, name, key, reason)? {
        Some(0) => Err(invalid(name, key, "0", reason)),
        other => Ok(other),
    }
}

fn parse_capacity(
    section: &Properties,
    name: &str,
    key: &str,
) -> Result<Option<usize>, ConfigFileError> {
    let reason = "must be a positive integer";
    match parse_number::<usize>(section, name, key, reason)? {
        Some(0) => Err(invalid(name, key, "0", reason)),
        other => Ok(other),
    }
}

fn parse_threshold(
    section: &Properties,
    name: &str,
    key: &str,
) -> Result<Option<f64>, ConfigFileError> {
    let Some(v) = section.get(key) else {
        return Ok(None);
    };
    let reason = "must be a non-negative number (meters)";
    let threshold: f64 = v.trim().parse().map_err(|_| invalid(name, key, v, reason))?;
    if !threshold.is_finite() || threshold < 0.0 {
        return Err(invalid(name, key, v, reason));
    }
    Ok(Some(threshold))
}

/// Parse a boolean value from a config string.
/// Accepts: true/false, yes/no, 1/0, on/off (case-insensitive)
pub(super) fn parse_bool(value: &str) -> bool {
    let v = value.trim().to_lowercase();
    v == "true" || v == "1" || v == "yes" || v == "on"
}

/// Expand ~ to home directory in paths.
pub(super) fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn load(content: &str) -> Result<ConfigFile, ConfigFileError> {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.ini");
        std::fs::write(&config_path, content).unwrap();
        ConfigFile::load_from(&config_path)
    }

    #[test]
    fn test_partial_config() {
        let config = load(
            r#"
[tracking]
stationary_threshold_m = 2.5

[simulation]
tick_ms = 500
"#,
        )
        .unwrap();

        assert_eq!(config.tracking.stationary_threshold_m, 2.5);
        assert_eq!(config.tracking.history_capacity, 5);
        assert_eq!(config.simulation.tick_ms, 500);
        assert_eq!(config.simulation.step_m, 20.0);
    }

    #[test]
    fn test_invalid_capacity() {
        let err = load("[tracking]\nhistory_capacity = 0\n").unwrap_err();
        assert!(err.to_string().contains("history_capacity"));
        assert!(err.to_string().contains("positive integer"));

        let err = load("[tracking]\ndistance_history_capacity = lots\n").unwrap_err();
        assert!(matches!(err, ConfigFileError::InvalidValue { .. }));
    }

    #[test]
    fn test_negative_threshold_rejected() {
        let err = load("[simulation]\nstationary_threshold_m = -1\n").unwrap_err();
        match err {
            ConfigFileError::InvalidValue { section, key, .. } => {
                assert_eq!(section, "simulation");
                assert_eq!(key, "stationary_threshold_m");
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_zero_poll_interval_rejected() {
        let err = load("[acquisition]\npoll_interval_secs = 0\n").unwrap_err();
        assert!(err.to_string().contains("poll_interval_secs"));
    }

    #[test]
    fn test_acquisition_section() {
        let config = load(
            r#"
[acquisition]
high_accuracy = no
max_cached_age_ms = 0
timeout_ms = 3000
"#,
        )
        .unwrap();
        assert!(!config.acquisition.high_accuracy);
        assert_eq!(config.acquisition.max_cached_age_ms, 0);
        assert_eq!(config.acquisition.timeout_ms, 3000);
    }

    #[test]
    fn test_logging_section() {
        let config = load("[logging]\ndirectory = /var/log/proxitrack\nfile = run.log\n").unwrap();
        assert_eq!(config.logging.directory, PathBuf::from("/var/log/proxitrack"));
        assert_eq!(config.logging.file, "run.log");
    }

    #[test]
    fn test_parse_bool_values() {
        for v in ["true", "TRUE", "1", "yes", "on", " On "] {
            assert!(parse_bool(v), "{} should be true", v);
        }
        for v in ["false", "0", "no", "off", "maybe"] {
            assert!(!parse_bool(v), "{} should be false", v);
        }
    }

    #[test]
    fn test_expand_tilde() {
        let path = expand_tilde("~/logs");
        if let Some(home) = dirs::home_dir() {
            assert_eq!(path, home.join("logs"));
        }
        assert_eq!(expand_tilde("/absolute/path"), PathBuf::from("/absolute/path"));
    }
}
