use crate::color::HexColor;
use crate::geometry::MonthLocale;
use crate::geometry::constants::{DEFAULT_INIT_ANGLE_DEG, DEFAULT_ITEM_SPACING_DEG, MIN_ITEM_SPAN_DEG};
use crate::interaction::InteractionSettings;
use crate::layout::{DEFAULT_PALETTE, LayoutOptions};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

const MIN_ZOOM_PERCENT: f64 = 50.0;
const MAX_ZOOM_PERCENT: f64 = 200.0;

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct WheelConfig {
    pub show_month_ring: bool,
    pub show_week_ring: bool,
    pub show_ring_names: bool,
    pub show_item_labels: bool,
    pub month_locale: MonthLocale,
    pub palette: Vec<HexColor>,
    pub zoom_percent: f64,
    pub init_angle_deg: f64,
    pub item_spacing_deg: f64,
    pub min_item_span_deg: f64,
    pub interaction: InteractionSettings,
}

impl Default for WheelConfig {
    fn default() -> Self {
        Self {
            show_month_ring: true,
            show_week_ring: true,
            show_ring_names: true,
            show_item_labels: true,
            month_locale: MonthLocale::default(),
            palette: DEFAULT_PALETTE.to_vec(),
            zoom_percent: 100.0,
            init_angle_deg: DEFAULT_INIT_ANGLE_DEG,
            item_spacing_deg: DEFAULT_ITEM_SPACING_DEG,
            min_item_span_deg: MIN_ITEM_SPAN_DEG,
            interaction: InteractionSettings::default(),
        }
    }
}

impl WheelConfig {
    pub fn zoom_percent(&self) -> f64 {
        if self.zoom_percent.is_finite() {
            self.zoom_percent.clamp(MIN_ZOOM_PERCENT, MAX_ZOOM_PERCENT)
        } else {
            100.0
        }
    }

    pub fn layout_options(&self, year: i32) -> LayoutOptions {
        LayoutOptions {
            year,
            init_angle_deg: self.init_angle_deg,
            item_spacing_deg: self.item_spacing_deg.max(0.0),
            min_item_span_deg: self.min_item_span_deg.max(0.0),
            show_month_ring: self.show_month_ring,
            show_week_ring: self.show_week_ring,
            show_ring_names: self.show_ring_names,
            month_locale: self.month_locale,
            palette: self.palette.clone(),
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to determine config directory")]
    ConfigDirNotFound,
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub fn config_path() -> Result<PathBuf, ConfigError> {
    let dirs = ProjectDirs::from("org", "yearwheel", "yearwheel")
        .ok_or(ConfigError::ConfigDirNotFound)?;
    Ok(dirs.config_dir().join("config.toml"))
}

pub fn load() -> Result<WheelConfig, ConfigError> {
    let builder = config::Config::builder()
        .add_source(config::File::from(config_path()?).required(false))
        .add_source(
            config::Environment::with_prefix("YEARWHEEL")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );
    Ok(builder.build()?.try_deserialize()?)
}

pub fn load_or_default() -> WheelConfig {
    match load() {
        Ok(config) => config,
        Err(e) => {
            log::warn!("Using default config: {}", e);
            WheelConfig::default()
        }
    }
}

pub fn write_default_config() -> Result<PathBuf, ConfigError> {
    let path = config_path()?;
    if let Some(parent) = path.parent() {
        fs_err::create_dir_all(parent)?;
    }
    if !path.exists() {
        fs_err::write(&path, DEFAULT_CONFIG)?;
    }
    Ok(path)
}

const DEFAULT_CONFIG: &str = include_str!("default_config.toml");
