use crate::events::AppEvent;
use crate::format::CurrencyFormat;
use async_channel::Sender;
use directories::ProjectDirs;
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use palette::{Srgb, WithAlpha};
use ringchart::{
    Category, CategoryError, CategoryId, CategoryName, ChartOptions, Color, MotionMode, SymbolName,
};
use serde::{Deserialize, Serialize};
use serde_with::{DeserializeFromStr, DisplayFromStr, serde_as};
use std::f64::consts::PI;
use std::str::FromStr;
use strum::{Display as StrumDisplay, EnumString};
use thiserror::Error;

const DEFAULT_SYMBOL: &str = "folder";

/// Where the static indicator sits, and so where the selected segment
/// rotates to.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    DeserializeFromStr,
    EnumString,
    StrumDisplay,
)]
#[strum(ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    #[default]
    #[strum(serialize = "right", serialize = "east", serialize = "e")]
    Right,
    #[strum(serialize = "bottom", serialize = "south", serialize = "s")]
    Bottom,
    #[strum(serialize = "left", serialize = "west", serialize = "w")]
    Left,
    #[strum(serialize = "top", serialize = "north", serialize = "n")]
    Top,
}

impl Alignment {
    /// Screen angle with y pointing down.
    pub fn angle(&self) -> f64 {
        match self {
            Self::Right => 0.0,
            Self::Bottom => PI / 2.0,
            Self::Left => PI,
            Self::Top => -PI / 2.0,
        }
    }
}

/// `#rrggbb` / `#rgb` color as written in the config file.
#[derive(Debug, Clone, Copy, PartialEq, DeserializeFromStr)]
pub struct HexColor(Srgb<u8>);

impl FromStr for HexColor {
    type Err = palette::rgb::FromHexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<Srgb<u8>>().map(Self)
    }
}

impl HexColor {
    pub fn to_color(&self) -> Color {
        let rgb: Srgb<f64> = self.0.into_format();
        rgb.with_alpha(1.0)
    }
}

#[serde_as]
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Default)]
#[serde(default)]
pub struct ChartConfig {
    pub size: Option<f64>,
    #[serde_as(as = "DisplayFromStr")]
    pub reduced_motion: MotionMode,
    pub alignment: Alignment,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CategoryConfig {
    pub id: Option<CategoryId>,
    pub name: CategoryName,
    pub value: f64,
    pub color: HexColor,
    pub symbol: Option<SymbolName>,
}

impl CategoryConfig {
    pub fn to_category(&self) -> Result<Category, CategoryError> {
        let id = self
            .id
            .clone()
            .unwrap_or_else(|| CategoryId::new(self.name.to_lowercase()));
        let symbol = self
            .symbol
            .clone()
            .unwrap_or_else(|| SymbolName::from(DEFAULT_SYMBOL));

        Category::new(id, self.name.clone(), self.value, self.color.to_color(), symbol)
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub chart: ChartConfig,
    #[serde(default)]
    pub currency: CurrencyFormat,
    #[serde(default)]
    pub categories: Vec<CategoryConfig>,
}

impl Config {
    /// Valid categories in file order. Invalid entries are logged and skipped.
    pub fn categories(&self) -> Vec<Category> {
        self.categories
            .iter()
            .filter_map(|cfg| {
                cfg.to_category()
                    .inspect_err(|e| log::warn!("Skipping category: {}", e))
                    .ok()
            })
            .collect()
    }

    pub fn chart_options(&self, system_reduced_motion: impl FnOnce() -> bool) -> ChartOptions {
        let defaults = ChartOptions::default();
        ChartOptions {
            size: self.chart.size.unwrap_or(defaults.size),
            reduced_motion: self.chart.reduced_motion.reduced_motion(system_reduced_motion),
            alignment_angle: self.chart.alignment.angle(),
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to determine config directory")]
    ConfigDirNotFound,
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Notify error: {0}")]
    Notify(#[from] notify::Error),
}

pub fn get_config_path() -> Result<std::path::PathBuf, ConfigError> {
    let proj_dirs = ProjectDirs::from("org", "budgetring", "budgetring")
        .ok_or(ConfigError::ConfigDirNotFound)?;
    Ok(proj_dirs.config_dir().join("config.toml"))
}

pub fn load_config() -> Result<Config, ConfigError> {
    let config_path = get_config_path()?;

    let s = config::Config::builder()
        .add_source(config::File::from(config_path).required(false))
        .add_source(
            config::Environment::with_prefix("BUDGETRING")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    Ok(s.try_deserialize()?)
}

/// The bundled sample budget, used until the user writes a config file.
pub fn sample_config() -> Config {
    config::Config::builder()
        .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
        .build()
        .and_then(|s| s.try_deserialize())
        .unwrap_or_else(|e| {
            log::error!("Bundled config is invalid: {}", e);
            Config::default()
        })
}

/// Loads the user's config. On first run the sample budget is written out
/// so there is a file to edit, and used as is.
pub fn load_or_default() -> Config {
    if let Ok(path) = get_config_path()
        && !path.exists()
    {
        match write_default_config() {
            Ok(path) => log::info!("Wrote sample configuration to {}", path.display()),
            Err(e) => log::warn!("Failed to write sample configuration: {}", e),
        }
        return sample_config();
    }

    match load_config() {
        Ok(c) => c,
        Err(e) => {
            log::error!("Failed to load config, using sample data: {}", e);
            sample_config()
        }
    }
}

pub fn write_default_config() -> std::io::Result<std::path::PathBuf> {
    let path =
        get_config_path().map_err(|e| std::io::Error::new(std::io::ErrorKind::NotFound, e))?;
    if let Some(parent) = path.parent() {
        fs_err::create_dir_all(parent)?;
    }
    if !path.exists() {
        fs_err::write(&path, DEFAULT_CONFIG)?;
    }
    Ok(path)
}

const DEFAULT_CONFIG: &str = include_str!("default_config.toml");

pub async fn run_async_watcher(tx: Sender<AppEvent>) {
    let config_path = match get_config_path() {
        Ok(p) => p,
        Err(e) => {
            log::error!("Config watcher error: {}", e);
            return;
        }
    };
    let Some(config_dir) = config_path.parent().map(|p| p.to_path_buf()) else {
        return;
    };

    if let Err(e) = fs_err::create_dir_all(&config_dir) {
        log::error!("Failed to create config directory for watching: {}", e);
        return;
    }

    let (bridge_tx, bridge_rx) = async_channel::unbounded();

    let mut watcher = match RecommendedWatcher::new(
        move |res| {
            let _ = bridge_tx.send_blocking(res);
        },
        notify::Config::default(),
    ) {
        Ok(w) => w,
        Err(e) => {
            log::error!("Failed to create watcher: {}", ConfigError::from(e));
            return;
        }
    };

    if let Err(e) = watcher.watch(&config_dir, RecursiveMode::NonRecursive) {
        log::error!("Failed to watch config directory: {}", e);
        return;
    }

    while let Ok(res) = bridge_rx.recv().await {
        match res {
            Ok(event) => {
                let touches_config = matches!(
                    event.kind,
                    EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_)
                ) && event.paths.iter().any(|p| p == &config_path);

                if touches_config && tx.send(AppEvent::ConfigReload).await.is_err() {
                    break;
                }
            }
            Err(e) => log::error!("Watch error: {}", e),
        }
    }
}
