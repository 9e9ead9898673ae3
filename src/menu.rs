//! Settings menu composition root
//!
//! Owns the localizer and every configurator, opens them in a fixed order
//! and re-renders localized labels whenever the language changes.

use std::sync::Arc;

use crate::config::MenuConfig;
use crate::configurators::audio::Channel;
use crate::configurators::graphics::QualityDomain;
use crate::configurators::{
    AudioConfigurator, GraphicsConfigurator, LanguageConfigurator, PlayerConfigurator,
};
use crate::error::{Result, SettingsError};
use crate::localization::{Language, LocaleContext, Localizer};
use crate::notify::Delivery;
use crate::platform::{EngineSink, UiSink, Widget};

pub struct SettingsMenu {
    locale: LocaleContext,
    ui: Arc<dyn UiSink>,
    language: LanguageConfigurator,
    audio: AudioConfigurator,
    graphics: GraphicsConfigurator,
    player: PlayerConfigurator,
    startup: Delivery,
}

impl SettingsMenu {
    /// Load everything and bring the engine and UI in sync with saved state
    ///
    /// Any load failure is returned as is; the menu is not usable without
    /// its files.
    pub fn open(
        config: &MenuConfig,
        engine: Arc<dyn EngineSink>,
        ui: Arc<dyn UiSink>,
    ) -> Result<Self> {
        let localizer = Arc::new(Localizer::load(&config.locales)?);
        let fallback = localizer.languages().first().copied().ok_or_else(|| {
            SettingsError::InvalidConfiguration("no locale files configured".into())
        })?;
        let locale = LocaleContext::new(localizer, fallback);

        let mut language =
            LanguageConfigurator::open(&config.language, ui.clone(), locale.clone())?;
        let mut audio =
            AudioConfigurator::open(&config.audio, engine.clone(), ui.clone(), locale.clone())?;
        let mut graphics = GraphicsConfigurator::open(
            &config.graphics,
            &config.presets,
            engine,
            ui.clone(),
            locale.clone(),
        )?;
        let mut player = PlayerConfigurator::open(&config.player, ui.clone(), locale.clone())?;

        let mut startup = language.take_startup();
        startup.merge(audio.take_startup());
        startup.merge(graphics.take_startup());
        startup.merge(player.take_startup());

        let mut menu = Self {
            locale,
            ui,
            language,
            audio,
            graphics,
            player,
            startup: Delivery::default(),
        };
        startup.merge(menu.relabel());
        if !startup.is_clean() {
            log::warn!(
                "Settings menu opened with {} failed subscriber call(s)",
                startup.failures.len()
            );
        }
        menu.startup = startup;
        log::info!("Settings menu ready (language: {:?})", menu.language.language());
        Ok(menu)
    }

    /// Everything published while opening, including the first relabel
    ///
    /// Save and sink failures do not stop the menu from opening; they are
    /// collected here.
    pub fn startup(&self) -> &Delivery {
        &self.startup
    }

    /// Render every localized label in the active language
    pub fn relabel(&self) -> Delivery {
        let steps: [(&str, anyhow::Result<()>); 5] = [
            (
                "menu",
                self.ui
                    .render("menu.title", &Widget::Text(self.locale.text("settings"))),
            ),
            ("language", self.language.relabel()),
            ("audio", self.audio.relabel()),
            ("graphics", self.graphics.relabel()),
            ("player", self.player.relabel()),
        ];

        let mut delivery = Delivery::default();
        for (index, (section, outcome)) in steps.into_iter().enumerate() {
            delivery.delivered += 1;
            if let Err(err) = outcome {
                log::error!("Relabeling {} failed: {:#}", section, err);
                delivery.failures.push((index, err));
            }
        }
        delivery
    }

    // === Audio ===

    pub fn set_volume(&mut self, channel: Channel, volume: f32) -> Delivery {
        self.audio.set_volume(channel, volume)
    }

    pub fn set_muted(&mut self, channel: Channel, muted: bool) -> Delivery {
        self.audio.set_muted(channel, muted)
    }

    // === Graphics ===

    pub fn next_quality(&mut self, domain: QualityDomain) -> Delivery {
        self.graphics.increase(domain)
    }

    pub fn previous_quality(&mut self, domain: QualityDomain) -> Delivery {
        self.graphics.decrease(domain)
    }

    // === Language ===

    /// Switch language, then re-render every label
    pub fn select_language(&mut self, language: Language) -> Result<Delivery> {
        let mut delivery = self.language.select(language)?;
        delivery.merge(self.relabel());
        Ok(delivery)
    }

    pub fn set_subtitles(&mut self, enabled: bool) -> Delivery {
        self.language.set_subtitles(enabled)
    }

    // === Player ===

    pub fn begin_nickname_edit(&mut self) -> anyhow::Result<()> {
        self.player.begin_nickname_edit()
    }

    pub fn commit_nickname(&mut self, nickname: &str) -> Result<Delivery> {
        self.player.commit_nickname(nickname)
    }

    pub fn next_gender(&mut self) -> Delivery {
        self.player.next_gender()
    }

    pub fn previous_gender(&mut self) -> Delivery {
        self.player.previous_gender()
    }

    // === Accessors ===

    pub fn locale(&self) -> &LocaleContext {
        &self.locale
    }

    pub fn audio(&self) -> &AudioConfigurator {
        &self.audio
    }

    pub fn audio_mut(&mut self) -> &mut AudioConfigurator {
        &mut self.audio
    }

    pub fn graphics(&self) -> &GraphicsConfigurator {
        &self.graphics
    }

    pub fn graphics_mut(&mut self) -> &mut GraphicsConfigurator {
        &mut self.graphics
    }

    pub fn language(&self) -> &LanguageConfigurator {
        &self.language
    }

    pub fn language_mut(&mut self) -> &mut LanguageConfigurator {
        &mut self.language
    }

    pub fn player(&self) -> &PlayerConfigurator {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut PlayerConfigurator {
        &mut self.player
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::configurators::audio::LOWEST_VOLUME;
    use crate::configurators::graphics::QualityLevel;
    use crate::configurators::player::Gender;
    use crate::error::LoadError;
    use crate::testing::{Recorder, copy_assets};

    fn open(root: &std::path::Path) -> (Result<SettingsMenu>, Arc<Recorder>) {
        let recorder = Arc::new(Recorder::default());
        let menu = SettingsMenu::open(
            &MenuConfig::from_dir(root),
            recorder.clone(),
            recorder.clone(),
        );
        (menu, recorder)
    }

    #[test]
    fn test_shipped_assets_open() {
        let dir = copy_assets();
        let (menu, recorder) = open(dir.path());
        let menu = menu.unwrap();

        assert_eq!(menu.language().language(), Language::English);
        assert_eq!(recorder.last_rendered("menu.title"), Some(Widget::Text("Settings".into())));
        assert_eq!(menu.graphics().level(QualityDomain::Textures), QualityLevel::High);
        assert!(recorder.applied_count() > 0);
    }

    #[test]
    fn test_startup_collects_failures() {
        let dir = copy_assets();
        let (menu, _) = open(dir.path());
        assert!(menu.unwrap().startup().is_clean());

        let recorder = Arc::new(Recorder::default());
        recorder.fail_engine(true);
        let menu = SettingsMenu::open(
            &MenuConfig::from_dir(dir.path()),
            recorder.clone(),
            recorder.clone(),
        )
        .unwrap();
        let startup = menu.startup();
        // Eight audio publishes and three quality domains hit the engine
        assert_eq!(startup.failures.len(), 8 + 3);
        assert!(startup.delivered > startup.failures.len());
    }

    #[test]
    fn test_language_switch_relabels_everything() {
        let dir = copy_assets();
        let (menu, recorder) = open(dir.path());
        let mut menu = menu.unwrap();

        let delivery = menu.select_language(Language::Russian).unwrap();
        assert!(delivery.is_clean());
        assert_eq!(recorder.last_rendered("menu.title"), Some(Widget::Text("Настройки".into())));
        assert_eq!(recorder.last_rendered("audio.title"), Some(Widget::Text("Звук".into())));
        assert_eq!(
            recorder.last_rendered("graphics.textures.value"),
            Some(Widget::Text("Высокое".into()))
        );
    }

    #[test]
    fn test_changes_survive_reopen() {
        let dir = copy_assets();
        {
            let (menu, _) = open(dir.path());
            let mut menu = menu.unwrap();
            menu.set_volume(Channel::Music, -20.0);
            menu.set_muted(Channel::Effects, true);
            menu.next_quality(QualityDomain::Models);
            menu.select_language(Language::Chinese).unwrap();
            menu.set_subtitles(false);
            menu.begin_nickname_edit().unwrap();
            menu.commit_nickname("Kolya").unwrap();
            menu.next_gender();
        }

        let (menu, recorder) = open(dir.path());
        let menu = menu.unwrap();
        assert_eq!(menu.audio().volume(Channel::Music), -20.0);
        assert_eq!(menu.audio().effective_volume(Channel::Effects), LOWEST_VOLUME);
        assert_eq!(menu.graphics().level(QualityDomain::Models), QualityLevel::High);
        assert_eq!(menu.language().language(), Language::Chinese);
        assert!(!menu.language().subtitles_enabled());
        assert_eq!(menu.player().nickname(), "Kolya");
        assert_eq!(menu.player().gender(), Gender::Female);
        assert_eq!(recorder.last_rendered("menu.title"), Some(Widget::Text("设置".into())));
    }

    #[test]
    fn test_missing_file_fails_open() {
        let dir = copy_assets();
        std::fs::remove_file(dir.path().join("Config/Player/Saved.json")).unwrap();
        let (menu, _) = open(dir.path());
        let err = menu.err().unwrap();
        assert!(err.is_fatal());
        assert!(matches!(
            err,
            SettingsError::ConfigLoadFailed {
                source: LoadError::Io(_),
                ..
            }
        ));
    }

    #[test]
    fn test_nickname_commit_requires_edit() {
        let dir = copy_assets();
        let (menu, _) = open(dir.path());
        let mut menu = menu.unwrap();
        assert!(matches!(
            menu.commit_nickname("x"),
            Err(SettingsError::InvalidConfiguration(_))
        ));
    }
}
