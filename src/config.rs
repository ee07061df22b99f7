use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Deserialize;
use thiserror::Error;

use crate::batch::{BatchRequest, SatelliteInput, SiteInput};
use crate::oracle::GroundSite;
use crate::predict::{
    BoundaryPolicy, PassConfig, Refinement, DEFAULT_LOCATION_TYPE, DEFAULT_MIN_ELEVATION_DEG,
    DEFAULT_STEP_SECONDS,
};
use crate::synth::OrbitalSynthesisRequest;
use crate::timeexpr::parse_duration;
use crate::tle::{LoadError, TleLoader};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("TLE load error: {0}")]
    Load(#[from] LoadError),
    #[error("site {name}: {message}")]
    Site { name: String, message: String },
    #[error("satellite {name}: {message}")]
    Satellite { name: String, message: String },
    #[error("predict: {0}")]
    Predict(String),
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub sites: Vec<SiteConfig>,
    #[serde(default)]
    pub predict: PredictConfig,
    #[serde(default)]
    pub satellites: Vec<SatelliteConfig>,
    #[serde(default)]
    pub tle_files: Vec<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    pub name: String,
    /// `"lat, lon"` in degrees.
    pub coordinates: String,
    #[serde(default)]
    pub altitude_m: f64,
    /// Tag carried into access events, e.g. `ground_station` or `vehicle`.
    #[serde(default = "default_location_type")]
    pub location_type: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PredictConfig {
    #[serde(default = "default_min_elevation")]
    pub min_elevation_deg: f64,
    /// Sampling step, e.g. `30s` or `1m`.
    #[serde(default = "default_step")]
    pub step: String,
    #[serde(default = "default_workers")]
    pub workers: usize,
    #[serde(default)]
    pub boundary: BoundaryPolicy,
    #[serde(default)]
    pub refine: Refinement,
}

impl Default for PredictConfig {
    fn default() -> Self {
        Self {
            min_elevation_deg: default_min_elevation(),
            step: default_step(),
            workers: default_workers(),
            boundary: BoundaryPolicy::default(),
            refine: Refinement::default(),
        }
    }
}

fn default_min_elevation() -> f64 {
    DEFAULT_MIN_ELEVATION_DEG
}

fn default_step() -> String {
    format!("{}s", DEFAULT_STEP_SECONDS)
}

fn default_location_type() -> String {
    DEFAULT_LOCATION_TYPE.to_string()
}

fn default_workers() -> usize {
    4
}

/// A satellite given either as TLE text (2 or 3 lines) or as synthesis parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct SatelliteConfig {
    pub name: String,
    #[serde(default)]
    pub tle: Option<String>,
    #[serde(default)]
    pub synthesize: Option<OrbitalSynthesisRequest>,
}

impl Config {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(content)?;
        Ok(config)
    }

    pub fn site_inputs(&self) -> Result<Vec<SiteInput>, ConfigError> {
        self.sites
            .iter()
            .map(|site| {
                let ground = GroundSite::from_coordinates(&site.coordinates, Some(site.altitude_m))
                    .ok_or_else(|| ConfigError::Site {
                        name: site.name.clone(),
                        message: format!("invalid coordinates {:?}", site.coordinates),
                    })?;
                ground.validate().map_err(|message| ConfigError::Site {
                    name: site.name.clone(),
                    message,
                })?;
                Ok(SiteInput::new(site.name.clone(), ground)
                    .with_location_type(site.location_type.clone()))
            })
            .collect()
    }

    pub fn pass_config(&self) -> Result<PassConfig, ConfigError> {
        let config = PassConfig {
            min_elevation_deg: self.predict.min_elevation_deg,
            step: parse_duration(&self.predict.step).map_err(ConfigError::Predict)?,
            boundary: self.predict.boundary,
            refine: self.predict.refine,
        };
        config
            .validate()
            .map_err(|e| ConfigError::Predict(e.to_string()))?;
        Ok(config)
    }

    /// Inline satellites in file order, then those loaded from `tle_files`.
    ///
    /// Malformed inline TLE text is passed through so that it fails as a
    /// single batch pair rather than rejecting the whole configuration.
    pub fn satellite_inputs(&self) -> Result<Vec<SatelliteInput>, ConfigError> {
        let mut inputs = Vec::with_capacity(self.satellites.len());
        for satellite in &self.satellites {
            let input = match (&satellite.tle, &satellite.synthesize) {
                (Some(text), None) => {
                    let lines: Vec<&str> = text
                        .lines()
                        .map(str::trim)
                        .filter(|l| !l.is_empty())
                        .collect();
                    match lines.as_slice() {
                        [.., line1, line2] => {
                            SatelliteInput::from_lines(satellite.name.clone(), line1, line2)
                        }
                        _ => {
                            return Err(ConfigError::Satellite {
                                name: satellite.name.clone(),
                                message: "tle needs at least two lines".into(),
                            })
                        }
                    }
                }
                (None, Some(request)) => {
                    SatelliteInput::synthesized(satellite.name.clone(), request.clone())
                }
                _ => {
                    return Err(ConfigError::Satellite {
                        name: satellite.name.clone(),
                        message: "exactly one of `tle` or `synthesize` is required".into(),
                    })
                }
            };
            inputs.push(input);
        }

        if !self.tle_files.is_empty() {
            let mut loader = TleLoader::new(self.tle_files.clone());
            loader.load_all()?;
            inputs.extend(
                loader
                    .into_satellites()
                    .into_iter()
                    .map(|named| SatelliteInput::from_elements(named.name, named.tle)),
            );
        }
        Ok(inputs)
    }

    pub fn batch_request(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<BatchRequest, ConfigError> {
        Ok(BatchRequest {
            satellites: self.satellite_inputs()?,
            sites: self.site_inputs()?,
            start,
            end,
            pass: self.pass_config()?,
            workers: self.predict.workers,
        })
    }
}
