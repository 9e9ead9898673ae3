//! Graphics quality configurators
//!
//! Textures, models and effects each cycle through their own quality tiers.
//! The tiers a domain offers are the keys of its preset table, and every
//! preset maps to the engine properties applied for that tier. All three
//! domains persist into one shared file.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::CyclicConfigurator;
use crate::cycle::OptionSet;
use crate::error::{LoadError, Result, SettingsError};
use crate::localization::LocaleContext;
use crate::notify::Delivery;
use crate::ordinal::ordinal_enum;
use crate::persistence::{ConfigFile, store};
use crate::platform::{EngineSetting, EngineSink, UiSink, Widget};

ordinal_enum! {
    /// Quality tiers, lowest first
    pub enum QualityLevel {
        VeryLow = 0,
        Low = 1,
        Medium = 2,
        High = 3,
        VeryHigh = 4,
        Ultra = 5,
    }
}

impl QualityLevel {
    /// Localization key for the tier name
    pub fn label_key(&self) -> &'static str {
        match self {
            QualityLevel::VeryLow => "QUALITY_VERY_LOW",
            QualityLevel::Low => "QUALITY_LOW",
            QualityLevel::Medium => "QUALITY_MEDIUM",
            QualityLevel::High => "QUALITY_HIGH",
            QualityLevel::VeryHigh => "QUALITY_VERY_HIGH",
            QualityLevel::Ultra => "QUALITY_ULTRA",
        }
    }
}

ordinal_enum! {
    /// Texture mip limit: full, half, quarter or eighth resolution
    pub enum TextureResolution {
        Full = 0,
        Half = 1,
        Quarter = 2,
        Eighth = 3,
    }
}

ordinal_enum! {
    pub enum AnisotropicFiltering {
        Disable = 0,
        Enable = 1,
        ForceEnable = 2,
    }
}

ordinal_enum! {
    /// MSAA sample count
    pub enum AntiAliasing {
        Off = 0,
        Msaa2x = 2,
        Msaa4x = 4,
        Msaa8x = 8,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TextureProps {
    pub resolution: TextureResolution,
    pub filtering: AnisotropicFiltering,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModelProps {
    #[serde(rename = "MSAA_Level")]
    pub msaa: AntiAliasing,
    #[serde(rename = "LODBias")]
    pub lod_bias: f32,
    #[serde(rename = "MaxLODLevel")]
    pub max_lod_level: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct EffectProps {
    pub use_soft_particles: bool,
    pub particle_raycast_budget: u32,
}

/// Engine properties per quality tier
pub type PresetTable<P> = BTreeMap<QualityLevel, P>;

/// Read a preset table from JSON (`{"0": {...}, "3": {...}}`)
pub fn load_presets<P: DeserializeOwned>(path: &Path) -> Result<PresetTable<P>> {
    store::load(path).map_err(|source| SettingsError::load_failed(path, source))
}

/// Graphics domains sharing the quality file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QualityDomain {
    Textures,
    Models,
    Effects,
}

impl QualityDomain {
    pub const ALL: [QualityDomain; 3] = [
        QualityDomain::Textures,
        QualityDomain::Models,
        QualityDomain::Effects,
    ];

    /// Key in the graphics file
    pub fn key(&self) -> &'static str {
        match self {
            QualityDomain::Textures => "Textures",
            QualityDomain::Models => "Models",
            QualityDomain::Effects => "Effects",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "textures" | "texture" => Some(QualityDomain::Textures),
            "models" | "model" => Some(QualityDomain::Models),
            "effects" | "fx" => Some(QualityDomain::Effects),
            _ => None,
        }
    }

    fn title_key(&self) -> &'static str {
        match self {
            QualityDomain::Textures => "textures_quality",
            QualityDomain::Models => "models_quality",
            QualityDomain::Effects => "fx_quality",
        }
    }

    fn element(&self, part: &str) -> String {
        format!("graphics.{}.{}", self.key().to_lowercase(), part)
    }
}

/// Persisted tier of one domain
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SavedQuality {
    pub level: QualityLevel,
}

/// Graphics file contents, keyed by `QualityDomain::key`
pub type GraphicsRecord = BTreeMap<String, SavedQuality>;

/// One quality domain: a cyclic tier selector plus its apply strategy
pub struct QualityConfigurator {
    domain: QualityDomain,
    cycle: CyclicConfigurator<QualityLevel>,
    locale: LocaleContext,
    ui: Arc<dyn UiSink>,
    startup: Delivery,
}

impl QualityConfigurator {
    /// Wire a domain to the shared file and publish its persisted tier
    ///
    /// `apply` turns a preset into the setting handed to the engine. A
    /// persisted tier missing from `presets` fails with `NotFound`.
    pub fn open<P, F>(
        domain: QualityDomain,
        file: Arc<ConfigFile<GraphicsRecord>>,
        presets: PresetTable<P>,
        apply: F,
        engine: Arc<dyn EngineSink>,
        ui: Arc<dyn UiSink>,
        locale: LocaleContext,
    ) -> Result<Self>
    where
        P: Clone + 'static,
        F: Fn(P) -> EngineSetting + 'static,
    {
        let saved = file
            .read(|r| r.get(domain.key()).copied())
            .ok_or_else(|| {
                SettingsError::load_failed(
                    file.path(),
                    LoadError::MissingEntry(domain.key().to_string()),
                )
            })?;

        let options = OptionSet::new(presets.keys().copied().collect()).map_err(|_| {
            SettingsError::InvalidConfiguration(format!("no quality presets for {}", domain.key()))
        })?;
        let mut cycle = CyclicConfigurator::new(domain.key(), options);

        cycle.subscribe(move |level| {
            let props = presets
                .get(level)
                .cloned()
                .ok_or_else(|| SettingsError::NotFound(format!("{:?} preset", level)))?;
            engine.apply(domain.key(), &apply(props))
        });
        {
            let (ui, locale) = (ui.clone(), locale.clone());
            cycle.subscribe(move |level| {
                ui.render(&domain.element("value"), &Widget::Text(locale.text(level.label_key())))
            });
        }
        {
            let file = file.clone();
            cycle.subscribe(move |level| {
                file.update(|r| {
                    r.insert(domain.key().to_string(), SavedQuality { level: *level });
                })?;
                Ok(())
            });
        }

        let startup = cycle.start(&saved.level)?;
        Ok(Self {
            domain,
            cycle,
            locale,
            ui,
            startup,
        })
    }

    /// Outcome of publishing the persisted tier, handed over once
    pub fn take_startup(&mut self) -> Delivery {
        std::mem::take(&mut self.startup)
    }

    pub fn domain(&self) -> QualityDomain {
        self.domain
    }

    pub fn level(&self) -> QualityLevel {
        *self.cycle.current()
    }

    pub fn options(&self) -> &OptionSet<QualityLevel> {
        self.cycle.options()
    }

    pub fn increase(&mut self) -> Delivery {
        self.cycle.next()
    }

    pub fn decrease(&mut self) -> Delivery {
        self.cycle.previous()
    }

    pub fn subscribe<F>(&mut self, handler: F)
    where
        F: FnMut(&QualityLevel) -> anyhow::Result<()> + 'static,
    {
        self.cycle.subscribe(handler);
    }

    pub fn relabel(&self) -> anyhow::Result<()> {
        let title = self.locale.text(self.domain.title_key());
        self.ui.render(&self.domain.element("title"), &Widget::Text(title))?;
        let value = self.locale.text(self.level().label_key());
        self.ui.render(&self.domain.element("value"), &Widget::Text(value))
    }
}

/// Preset file locations for every domain
#[derive(Debug, Clone)]
pub struct PresetPaths {
    pub textures: PathBuf,
    pub models: PathBuf,
    pub effects: PathBuf,
}

/// All graphics domains over one shared quality file
pub struct GraphicsConfigurator {
    file: Arc<ConfigFile<GraphicsRecord>>,
    domains: Vec<QualityConfigurator>,
    locale: LocaleContext,
    ui: Arc<dyn UiSink>,
    startup: Delivery,
}

impl GraphicsConfigurator {
    pub fn open(
        saved: &Path,
        presets: &PresetPaths,
        engine: Arc<dyn EngineSink>,
        ui: Arc<dyn UiSink>,
        locale: LocaleContext,
    ) -> Result<Self> {
        let file = ConfigFile::<GraphicsRecord>::open(saved)?;

        let textures = QualityConfigurator::open(
            QualityDomain::Textures,
            file.clone(),
            load_presets::<TextureProps>(&presets.textures)?,
            EngineSetting::Textures,
            engine.clone(),
            ui.clone(),
            locale.clone(),
        )?;
        let models = QualityConfigurator::open(
            QualityDomain::Models,
            file.clone(),
            load_presets::<ModelProps>(&presets.models)?,
            EngineSetting::Models,
            engine.clone(),
            ui.clone(),
            locale.clone(),
        )?;
        let effects = QualityConfigurator::open(
            QualityDomain::Effects,
            file.clone(),
            load_presets::<EffectProps>(&presets.effects)?,
            EngineSetting::Effects,
            engine,
            ui.clone(),
            locale.clone(),
        )?;

        let mut domains = vec![textures, models, effects];
        let mut startup = Delivery::default();
        for domain in &mut domains {
            startup.merge(domain.take_startup());
        }
        Ok(Self {
            file,
            domains,
            locale,
            ui,
            startup,
        })
    }

    /// Combined startup outcome of every domain, handed over once
    pub fn take_startup(&mut self) -> Delivery {
        std::mem::take(&mut self.startup)
    }

    pub fn domain(&self, domain: QualityDomain) -> &QualityConfigurator {
        &self.domains[domain as usize]
    }

    pub fn domain_mut(&mut self, domain: QualityDomain) -> &mut QualityConfigurator {
        &mut self.domains[domain as usize]
    }

    pub fn level(&self, domain: QualityDomain) -> QualityLevel {
        self.domain(domain).level()
    }

    pub fn increase(&mut self, domain: QualityDomain) -> Delivery {
        self.domain_mut(domain).increase()
    }

    pub fn decrease(&mut self, domain: QualityDomain) -> Delivery {
        self.domain_mut(domain).decrease()
    }

    pub fn file(&self) -> &ConfigFile<GraphicsRecord> {
        &self.file
    }

    pub fn relabel(&self) -> anyhow::Result<()> {
        self.ui.render(
            "graphics.title",
            &Widget::Text(self.locale.text("graphics_quality")),
        )?;
        for domain in &self.domains {
            domain.relabel()?;
        }
        Ok(())
    }
}
