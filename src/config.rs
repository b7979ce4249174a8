use std::path::PathBuf;

use crate::selector::DEFAULT_MIN_YEAR;

/// Runtime settings, read from the environment with fallbacks
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub bind_addr: String,
    pub min_year: i32, // earliest season the history windows include
}

impl AppConfig {
    pub fn from_env() -> Self {
        let min_year = std::env::var("RACEDASH_MIN_YEAR")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_MIN_YEAR);

        Self {
            data_dir: std::env::var("RACEDASH_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("data")),
            bind_addr: std::env::var("RACEDASH_BIND_ADDR")
                .unwrap_or_else(|_| "0.0.0.0:3000".to_string()),
            min_year,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            bind_addr: "0.0.0.0:3000".to_string(),
            min_year: DEFAULT_MIN_YEAR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = AppConfig::default();
        assert_eq!(config.data_dir, PathBuf::from("data"));
        assert_eq!(config.bind_addr, "0.0.0.0:3000");
        assert_eq!(config.min_year, 2022);
    }
}
