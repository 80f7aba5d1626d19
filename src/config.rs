use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::eval::EvalSettings;

/// Config file used when RANKEVAL_CONFIG is not set.
const DEFAULT_CONFIG_FILE: &str = "rankeval.toml";

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub eval: EvalConfig,
    #[serde(default)]
    pub thresholds: ThresholdsConfig,
}

/// Evaluation inputs and cutoffs
#[derive(Debug, Clone, Deserialize)]
pub struct EvalConfig {
    /// Tab-separated judgments file; the CLI --qrels flag overrides it.
    #[serde(default)]
    pub qrels_path: Option<PathBuf>,
    #[serde(default = "default_hits_k")]
    pub hits_k: usize,
    #[serde(default = "default_precision_ks")]
    pub precision_ks: Vec<usize>,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            qrels_path: None,
            hits_k: default_hits_k(),
            precision_ks: default_precision_ks(),
            log_level: default_log_level(),
        }
    }
}

/// Optional pass/fail gates for the CLI exit code
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ThresholdsConfig {
    pub min_mrr: Option<f64>,
    pub min_hits: Option<f64>,
    /// Applied to every Precision@K that considered at least one query.
    pub min_precision: Option<f64>,
}

fn default_hits_k() -> usize {
    5
}

fn default_precision_ks() -> Vec<usize> {
    vec![5, 10, 20]
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration
    ///
    /// Loads environment variables from .env file (if present) first.
    /// Looks for the config file in this order:
    /// 1. Path specified in RANKEVAL_CONFIG environment variable (must exist)
    /// 2. ./rankeval.toml in current directory (defaults are used when absent)
    pub fn load() -> Result<Self> {
        let _ = dotenv::dotenv();

        match std::env::var("RANKEVAL_CONFIG") {
            Ok(path) => Self::from_path(Path::new(&path)),
            Err(_) => {
                let path = Path::new(DEFAULT_CONFIG_FILE);
                if path.exists() {
                    Self::from_path(path)
                } else {
                    log::debug!("No {} found, using default configuration", DEFAULT_CONFIG_FILE);
                    Ok(Self::default())
                }
            }
        }
    }

    /// Load and validate a specific config file
    pub fn from_path(path: &Path) -> Result<Self> {
        let config_str = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&config_str)
            .with_context(|| format!("Failed to parse {}", path.display()))?;

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values
    fn validate(&self) -> Result<()> {
        if self.eval.hits_k == 0 {
            anyhow::bail!("eval.hits_k must be greater than 0");
        }

        if self.eval.precision_ks.is_empty() {
            anyhow::bail!("eval.precision_ks must list at least one cutoff");
        }

        if self.eval.precision_ks.contains(&0) {
            anyhow::bail!("eval.precision_ks entries must be greater than 0");
        }

        let gates = [
            ("thresholds.min_mrr", self.thresholds.min_mrr),
            ("thresholds.min_hits", self.thresholds.min_hits),
            ("thresholds.min_precision", self.thresholds.min_precision),
        ];
        for (name, value) in gates {
            if let Some(v) = value {
                if !(0.0..=1.0).contains(&v) {
                    anyhow::bail!("{} must be between 0.0 and 1.0", name);
                }
            }
        }

        Ok(())
    }

    /// Cutoffs for the evaluator
    pub fn eval_settings(&self) -> EvalSettings {
        EvalSettings {
            hits_k: self.eval.hits_k,
            precision_ks: self.eval.precision_ks.clone(),
        }
    }

    /// Get the configured judgments path, if any
    pub fn qrels_path(&self) -> Option<&Path> {
        self.eval.qrels_path.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// Serialize config tests that mutate process-wide env so they don't race.
    static CONFIG_TEST_LOCK: Mutex<()> = Mutex::new(());

    const TEST_CONFIG: &str = r#"
[eval]
qrels_path = "data/test.qrels"
hits_k = 10
precision_ks = [1, 3]
log_level = "debug"

[thresholds]
min_mrr = 0.5
"#;

    fn with_config_env(config_path: &Path, f: impl FnOnce()) {
        let original = std::env::var("RANKEVAL_CONFIG").ok();
        std::env::set_var("RANKEVAL_CONFIG", config_path);
        f();
        std::env::remove_var("RANKEVAL_CONFIG");
        if let Some(val) = original {
            std::env::set_var("RANKEVAL_CONFIG", val);
        }
    }

    #[test]
    fn test_config_load_success() {
        let _lock = CONFIG_TEST_LOCK.lock().unwrap();
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("rankeval.toml");
        fs::write(&config_path, TEST_CONFIG).unwrap();
        with_config_env(&config_path, || {
            let config = Config::load();
            assert!(config.is_ok(), "Config::load() failed: {:?}", config.err());
            let config = config.unwrap();
            assert_eq!(config.eval.log_level, "debug");
            assert_eq!(config.eval.hits_k, 10);
            assert_eq!(config.qrels_path(), Some(Path::new("data/test.qrels")));
            assert_eq!(config.thresholds.min_mrr, Some(0.5));
            assert_eq!(config.thresholds.min_hits, None);
            let settings = config.eval_settings();
            assert_eq!(settings.precision_ks, vec![1, 3]);
        });
    }

    #[test]
    fn test_config_defaults() {
        let config = Config::default();
        assert_eq!(config.eval.hits_k, 5);
        assert_eq!(config.eval.precision_ks, vec![5, 10, 20]);
        assert_eq!(config.eval.log_level, "info");
        assert!(config.qrels_path().is_none());
        assert_eq!(config.eval_settings(), EvalSettings::default());
    }

    #[test]
    fn test_config_partial_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("partial.toml");
        fs::write(&config_path, "[thresholds]\nmin_hits = 0.9\n").unwrap();
        let config = Config::from_path(&config_path).unwrap();
        assert_eq!(config.eval.hits_k, 5);
        assert_eq!(config.thresholds.min_hits, Some(0.9));
    }

    #[test]
    fn test_config_rejects_zero_cutoff() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("bad.toml");
        fs::write(&config_path, "[eval]\nprecision_ks = [5, 0]\n").unwrap();
        let err = Config::from_path(&config_path).unwrap_err();
        assert!(err.to_string().contains("precision_ks"));
    }

    #[test]
    fn test_config_rejects_threshold_out_of_range() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("bad.toml");
        fs::write(&config_path, "[thresholds]\nmin_mrr = 1.5\n").unwrap();
        let err = Config::from_path(&config_path).unwrap_err();
        assert!(err.to_string().contains("thresholds.min_mrr"));
    }

    #[test]
    fn test_config_invalid_path() {
        let _lock = CONFIG_TEST_LOCK.lock().unwrap();
        with_config_env(Path::new("nonexistent.toml"), || {
            let config = Config::load();
            assert!(config.is_err());
            assert!(config.unwrap_err().to_string().contains("nonexistent.toml"));
        });
    }
}
