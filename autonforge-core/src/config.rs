use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_GRID_CELLS: u32 = 6;
pub const DEFAULT_PIXELS_PER_CELL: f64 = 80.0;
pub const DEFAULT_INCHES_PER_CELL: f64 = 24.0;
pub const DEFAULT_FUNCTION_NAME: &str = "generated_auton";
const START_EDGE_MARGIN: f64 = 0.1;
pub const MAX_RENDER_EXTENT: f64 = 8192.0;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid field config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    pub grid_cells: u32,
    pub pixels_per_cell: f64,
    pub inches_per_cell: f64,
}

impl FieldConfig {
    pub fn start_limit(&self) -> f64 {
        self.grid_cells as f64 - START_EDGE_MARGIN
    }

    /// Maps a user-facing y (up is positive) onto the top-left origin field.
    pub fn invert_y(&self, y: f64) -> f64 {
        self.grid_cells as f64 - y
    }

    pub fn center(&self) -> f64 {
        self.grid_cells as f64 / 2.0
    }

    pub fn render_extent(&self) -> f64 {
        self.grid_cells as f64 * self.pixels_per_cell
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_cells == 0 {
            return Err(ConfigError::Invalid("grid_cells must be at least 1".to_string()));
        }
        for (name, value) in [
            ("pixels_per_cell", self.pixels_per_cell),
            ("inches_per_cell", self.inches_per_cell),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be a positive number, got {value}"
                )));
            }
        }
        let extent = self.render_extent();
        if extent > MAX_RENDER_EXTENT {
            return Err(ConfigError::Invalid(format!(
                "field renders {extent} px wide, limit is {MAX_RENDER_EXTENT} px"
            )));
        }
        Ok(())
    }
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            grid_cells: DEFAULT_GRID_CELLS,
            pixels_per_cell: DEFAULT_PIXELS_PER_CELL,
            inches_per_cell: DEFAULT_INCHES_PER_CELL,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StartInput {
    pub x: f64,
    pub y: f64,
    pub heading: f64,
}

impl Default for StartInput {
    fn default() -> Self {
        Self {
            x: 3.0,
            y: 3.0,
            heading: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    pub field: FieldConfig,
    pub function_name: String,
    pub start: StartInput,
}

impl PlannerConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.field.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_json_str(&json)?;
        log::info!("loaded planner config from {}", path.display());
        Ok(config)
    }
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            field: FieldConfig::default(),
            function_name: DEFAULT_FUNCTION_NAME.to_string(),
            start: StartInput::default(),
        }
    }
}
