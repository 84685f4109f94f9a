use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use thiserror::Error;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::geometry::Lattice;

/// Construction-time failure: unreadable parameter file, bad value, or a
/// parameter set that fails validation. Update code never produces these;
/// once a simulation is built, invariant violations are programming errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read parameter file: {0}")]
    Io(#[from] std::io::Error),
    #[error("missing required key '{0}'")]
    MissingKey(&'static str),
    #[error("bad value for key '{key}': {reason}")]
    InvalidValue { key: String, reason: String },
    #[error("invalid lattice geometry: {0}")]
    Geometry(String),
    #[error("invalid model state: {0}")]
    Model(String),
    #[error(transparent)]
    Invalid(#[from] ValidationErrors),
}

/// Hamiltonian parameters of the O(N) model.
///
/// `temp` is the only field a running chain mutates (via
/// [`crate::simulation::Chain::set_temp`], which also clears the warm-up
/// flag).
#[derive(Debug, Clone, Copy)]
pub struct ModelParams {
    /// Number of spin components (the N of O(N), >= 2).
    pub spin_dim: usize,
    /// Exchange coupling J.
    pub coupling: f64,
    /// External field h, coupled to the first spin component.
    pub field: f64,
    /// Temperature T.
    pub temp: f64,
}

/// Sweep/measurement bookkeeping for one run.
#[derive(Debug, Clone, Copy)]
pub struct Schedule {
    pub warmup_sweeps: usize,
    pub sweeps_per_meas: usize,
    pub meas_per_bin: usize,
    pub n_bins: usize,
}

impl Schedule {
    /// Total sweep count of the run, warm-up included.
    pub fn total_sweeps(&self) -> usize {
        self.warmup_sweeps + self.n_bins * self.meas_per_bin * self.sweeps_per_meas
    }
}

fn validate_sim_config(cfg: &SimConfig) -> Result<(), ValidationError> {
    if cfg.spin_dim < 2 {
        return Err(ValidationError::new("spinDim must be >= 2"));
    }
    if cfg.n_dims < 1 {
        return Err(ValidationError::new("D must be >= 1"));
    }
    if cfg.linear_size < 1 {
        return Err(ValidationError::new("L must be >= 1"));
    }
    if cfg.temp <= 0.0 || !cfg.temp.is_finite() {
        return Err(ValidationError::new("T must be positive and finite"));
    }
    if !cfg.coupling.is_finite() || !cfg.field.is_finite() {
        return Err(ValidationError::new("J and h must be finite"));
    }
    if cfg.schedule.sweeps_per_meas < 1 {
        return Err(ValidationError::new("sweepsPerMeas must be >= 1"));
    }
    if cfg.schedule.meas_per_bin < 1 {
        return Err(ValidationError::new("measesPerBin must be >= 1"));
    }
    if cfg.schedule.n_bins < 1 {
        return Err(ValidationError::new("numBins must be >= 1"));
    }
    Ok(())
}

/// Full parameter set of one simulation, as read from a parameter file.
#[derive(Debug, Validate)]
#[validate(schema(function = "validate_sim_config"))]
pub struct SimConfig {
    pub spin_dim: usize,
    pub n_dims: usize,
    pub linear_size: usize,
    pub coupling: f64,
    pub field: f64,
    pub temp: f64,
    pub schedule: Schedule,
    pub seed: u64,
    pub write_clusts: bool,
}

impl SimConfig {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    /// Parse a line-oriented `key = value` parameter set.
    ///
    /// The value of a key is the first whitespace-delimited token after the
    /// first `=` on its line that parses as a number (or boolean). Blank
    /// lines, `#` comments, lines without `=`, and unknown keys are ignored;
    /// a repeated key overrides the earlier one. Missing keys and
    /// out-of-range values fail fast.
    pub fn from_reader(reader: impl BufRead) -> Result<Self, ConfigError> {
        let raw = read_key_values(reader)?;
        let config = Self {
            spin_dim: take_usize(&raw, "spinDim")?,
            n_dims: take_usize(&raw, "D")?,
            linear_size: take_usize(&raw, "L")?,
            coupling: take_f64(&raw, "J")?,
            field: take_f64(&raw, "h")?,
            temp: take_f64(&raw, "T")?,
            schedule: Schedule {
                warmup_sweeps: take_usize(&raw, "numWarmupSweeps")?,
                sweeps_per_meas: take_usize(&raw, "sweepsPerMeas")?,
                meas_per_bin: take_usize(&raw, "measesPerBin")?,
                n_bins: take_usize(&raw, "numBins")?,
            },
            seed: take_u64(&raw, "seed")?,
            write_clusts: take_bool(&raw, "writeClusts")?,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn model_params(&self) -> ModelParams {
        ModelParams {
            spin_dim: self.spin_dim,
            coupling: self.coupling,
            field: self.field,
            temp: self.temp,
        }
    }

    pub fn lattice(&self) -> Result<Lattice, ConfigError> {
        Lattice::hypercubic(self.n_dims, self.linear_size)
    }
}

fn read_key_values(reader: impl BufRead) -> Result<HashMap<String, String>, ConfigError> {
    let mut map = HashMap::new();
    for line in reader.lines() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let Some((key, rest)) = trimmed.split_once('=') else {
            continue;
        };
        let key = key.trim();
        if key.is_empty() {
            continue;
        }
        let token = rest
            .split_whitespace()
            .find(|t| t.parse::<f64>().is_ok() || matches!(*t, "true" | "false"));
        if let Some(token) = token {
            map.insert(key.to_string(), token.to_string());
        }
    }
    Ok(map)
}

fn take<'a>(map: &'a HashMap<String, String>, key: &'static str) -> Result<&'a str, ConfigError> {
    map.get(key)
        .map(String::as_str)
        .ok_or(ConfigError::MissingKey(key))
}

fn take_f64(map: &HashMap<String, String>, key: &'static str) -> Result<f64, ConfigError> {
    let token = take(map, key)?;
    token.parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        reason: format!("'{token}' is not a real number"),
    })
}

fn take_usize(map: &HashMap<String, String>, key: &'static str) -> Result<usize, ConfigError> {
    let token = take(map, key)?;
    token.parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        reason: format!("'{token}' is not a non-negative integer"),
    })
}

fn take_u64(map: &HashMap<String, String>, key: &'static str) -> Result<u64, ConfigError> {
    let token = take(map, key)?;
    token.parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        reason: format!("'{token}' is not a non-negative integer"),
    })
}

fn take_bool(map: &HashMap<String, String>, key: &'static str) -> Result<bool, ConfigError> {
    let token = take(map, key)?;
    match token {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => token
            .parse::<f64>()
            .map(|v| v != 0.0)
            .map_err(|_| ConfigError::InvalidValue {
                key: key.to_string(),
                reason: format!("'{token}' is not a boolean"),
            }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const GOOD: &str = "\
# O(3) model on a 16^2 torus
spinDim = 3
D = 2
L = 16
J = 1.0
h = 0.0
T = 1.5
numWarmupSweeps = 100
sweepsPerMeas = 2
measesPerBin = 50
numBins = 10
seed = 42
writeClusts = 1
";

    #[test]
    fn test_parse_full_config() {
        let cfg = SimConfig::from_reader(Cursor::new(GOOD)).unwrap();
        assert_eq!(cfg.spin_dim, 3);
        assert_eq!(cfg.n_dims, 2);
        assert_eq!(cfg.linear_size, 16);
        assert_eq!(cfg.coupling, 1.0);
        assert_eq!(cfg.field, 0.0);
        assert_eq!(cfg.temp, 1.5);
        assert_eq!(cfg.schedule.warmup_sweeps, 100);
        assert_eq!(cfg.schedule.total_sweeps(), 100 + 10 * 50 * 2);
        assert_eq!(cfg.seed, 42);
        assert!(cfg.write_clusts);
    }

    #[test]
    fn test_first_numeric_token_wins() {
        let text = "T = temperature: 2.5 (target)\n";
        let raw = read_key_values(Cursor::new(text)).unwrap();
        assert_eq!(raw.get("T").unwrap(), "2.5");
    }

    #[test]
    fn test_later_duplicate_overrides() {
        let text = "L = 8\nL = 32\n";
        let raw = read_key_values(Cursor::new(text)).unwrap();
        assert_eq!(raw.get("L").unwrap(), "32");
    }

    #[test]
    fn test_missing_key_fails() {
        let text = GOOD.replace("T = 1.5\n", "");
        let err = SimConfig::from_reader(Cursor::new(text)).unwrap_err();
        assert!(matches!(err, ConfigError::MissingKey("T")));
    }

    #[test]
    fn test_validation_rejects_bad_params() {
        for (from, to) in [
            ("spinDim = 3", "spinDim = 1"),
            ("T = 1.5", "T = 0.0"),
            ("numBins = 10", "numBins = 0"),
        ] {
            let text = GOOD.replace(from, to);
            assert!(SimConfig::from_reader(Cursor::new(text)).is_err());
        }
    }

    #[test]
    fn test_write_clusts_accepts_bool_literals() {
        let text = GOOD.replace("writeClusts = 1", "writeClusts = false");
        let cfg = SimConfig::from_reader(Cursor::new(text)).unwrap();
        assert!(!cfg.write_clusts);
    }
}
