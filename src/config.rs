//! Where the menu finds its files

use std::path::{Path, PathBuf};

use crate::configurators::graphics::PresetPaths;
use crate::localization::Language;

/// Environment variable naming the assets root
pub const DIR_ENV: &str = "SETTINGS_MENU_DIR";
/// Assets root used when nothing else is given
pub const DEFAULT_DIR: &str = "assets";

/// File locations for every configurator
#[derive(Debug, Clone)]
pub struct MenuConfig {
    pub audio: PathBuf,
    pub graphics: PathBuf,
    pub presets: PresetPaths,
    pub language: PathBuf,
    pub player: PathBuf,
    pub locales: Vec<PathBuf>,
}

impl MenuConfig {
    /// Standard layout under one assets root
    ///
    /// ```text
    /// Config/Audio/Saved.json
    /// Config/Graphics/Saved.json
    /// Config/Graphics/{Textures,Models,Effects}.json
    /// Config/Language/Saved.json
    /// Config/Player/Saved.json
    /// Locales/{ru,en,zh}.json
    /// ```
    pub fn from_dir(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        let config = root.join("Config");
        let graphics = config.join("Graphics");
        Self {
            audio: config.join("Audio").join("Saved.json"),
            graphics: graphics.join("Saved.json"),
            presets: PresetPaths {
                textures: graphics.join("Textures.json"),
                models: graphics.join("Models.json"),
                effects: graphics.join("Effects.json"),
            },
            language: config.join("Language").join("Saved.json"),
            player: config.join("Player").join("Saved.json"),
            locales: Language::ALL
                .iter()
                .map(|l| root.join("Locales").join(format!("{}.json", l.code())))
                .collect(),
        }
    }

    /// Root from the first CLI argument, then `SETTINGS_MENU_DIR`, then `assets`
    pub fn resolve_root(arg: Option<String>) -> PathBuf {
        arg.or_else(|| std::env::var(DIR_ENV).ok())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DIR))
    }
}
