use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config file: {0}")]
    Parse(#[from] json5::Error),
}

/// Constants used when a single node is positioned relative to an anchor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlacementConfig {
    pub root_x: f64,
    pub root_y: f64,
    /// Horizontal step per person already on the child's generation row.
    pub child_step_x: f64,
    pub child_offset_y: f64,
    pub sibling_offset_x: f64,
    pub spouse_offset_x: f64,
    pub peer_offset_x: f64,
    pub rebalance_spacing: f64,
    pub rebalance_offset_y: f64,
    /// Provisional offset of a freshly created union node from the parent it was built from.
    pub junction_offset_x: f64,
    pub junction_offset_y: f64,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            root_x: 400.0,
            root_y: 50.0,
            child_step_x: 150.0,
            child_offset_y: 200.0,
            sibling_offset_x: 200.0,
            spouse_offset_x: 200.0,
            peer_offset_x: 250.0,
            rebalance_spacing: 200.0,
            rebalance_offset_y: 150.0,
            junction_offset_x: 100.0,
            junction_offset_y: 50.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub row_spacing: f64,
    pub column_spacing: f64,
    /// Cursor advance after a couple, in units of `column_spacing`.
    pub couple_advance: f64,
    /// Cursor advance after a single person, in units of `column_spacing`.
    pub single_advance: f64,
    pub max_level_passes: usize,
    pub placement: PlacementConfig,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            row_spacing: 150.0,
            column_spacing: 120.0,
            couple_advance: 2.2,
            single_advance: 1.2,
            max_level_passes: 20,
            placement: PlacementConfig::default(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlacementConfigFile {
    root_x: Option<f64>,
    root_y: Option<f64>,
    child_step_x: Option<f64>,
    child_offset_y: Option<f64>,
    sibling_offset_x: Option<f64>,
    spouse_offset_x: Option<f64>,
    peer_offset_x: Option<f64>,
    rebalance_spacing: Option<f64>,
    rebalance_offset_y: Option<f64>,
    junction_offset_x: Option<f64>,
    junction_offset_y: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    row_spacing: Option<f64>,
    column_spacing: Option<f64>,
    couple_advance: Option<f64>,
    single_advance: Option<f64>,
    max_level_passes: Option<usize>,
    placement: Option<PlacementConfigFile>,
}

/// Defaults, overridden by whatever fields the optional config file sets.
pub fn load_config(path: Option<&Path>) -> Result<LayoutConfig, ConfigError> {
    let Some(path) = path else {
        return Ok(LayoutConfig::default());
    };
    let contents = std::fs::read_to_string(path)?;
    parse_config(&contents)
}

pub fn parse_config(contents: &str) -> Result<LayoutConfig, ConfigError> {
    let parsed: ConfigFile = match serde_json::from_str(contents) {
        Ok(parsed) => parsed,
        Err(_) => json5::from_str(contents)?,
    };

    let mut config = LayoutConfig::default();
    if let Some(v) = parsed.row_spacing {
        config.row_spacing = v;
    }
    if let Some(v) = parsed.column_spacing {
        config.column_spacing = v;
    }
    if let Some(v) = parsed.couple_advance {
        config.couple_advance = v;
    }
    if let Some(v) = parsed.single_advance {
        config.single_advance = v;
    }
    if let Some(v) = parsed.max_level_passes {
        config.max_level_passes = v;
    }

    if let Some(placement) = parsed.placement {
        let target = &mut config.placement;
        if let Some(v) = placement.root_x {
            target.root_x = v;
        }
        if let Some(v) = placement.root_y {
            target.root_y = v;
        }
        if let Some(v) = placement.child_step_x {
            target.child_step_x = v;
        }
        if let Some(v) = placement.child_offset_y {
            target.child_offset_y = v;
        }
        if let Some(v) = placement.sibling_offset_x {
            target.sibling_offset_x = v;
        }
        if let Some(v) = placement.spouse_offset_x {
            target.spouse_offset_x = v;
        }
        if let Some(v) = placement.peer_offset_x {
            target.peer_offset_x = v;
        }
        if let Some(v) = placement.rebalance_spacing {
            target.rebalance_spacing = v;
        }
        if let Some(v) = placement.rebalance_offset_y {
            target.rebalance_offset_y = v;
        }
        if let Some(v) = placement.junction_offset_x {
            target.junction_offset_x = v;
        }
        if let Some(v) = placement.junction_offset_y {
            target.junction_offset_y = v;
        }
    }

    Ok(config)
}
