//! Language and subtitles configurator

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::cycle::{OptionSet, Selector};
use crate::error::{Result, SettingsError};
use crate::localization::{Language, LocaleContext};
use crate::notify::{ChangeNotifier, Delivery};
use crate::persistence::ConfigFile;
use crate::platform::{UiSink, Widget};

/// Language file contents
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LanguageRecord {
    #[serde(rename = "Language")]
    pub language: Language,
    /// Key spelling matches existing save files
    #[serde(rename = "SubltitlesEnabled")]
    pub subtitles_enabled: bool,
}

pub struct LanguageConfigurator {
    file: Arc<ConfigFile<LanguageRecord>>,
    languages: Selector<Language>,
    language_changed: ChangeNotifier<Language>,
    subtitles_changed: ChangeNotifier<bool>,
    locale: LocaleContext,
    ui: Arc<dyn UiSink>,
    startup: Delivery,
}

impl LanguageConfigurator {
    /// Load the language file and make its language active
    ///
    /// Only languages with a loaded string table can be selected.
    pub fn open(path: &Path, ui: Arc<dyn UiSink>, locale: LocaleContext) -> Result<Self> {
        let file = ConfigFile::<LanguageRecord>::open(path)?;
        let saved = file.read(|r| *r);

        let options = OptionSet::new(locale.localizer().languages()).map_err(|_| {
            SettingsError::InvalidConfiguration("no locale tables loaded".into())
        })?;
        let mut languages = Selector::new(options);
        languages.select(&saved.language)?;

        let mut configurator = Self {
            file,
            languages,
            language_changed: ChangeNotifier::new("language changed"),
            subtitles_changed: ChangeNotifier::new("subtitles toggled"),
            locale,
            ui,
            startup: Delivery::default(),
        };
        configurator.wire();

        let mut startup = configurator.language_changed.publish(&saved.language);
        startup.merge(configurator.subtitles_changed.publish(&saved.subtitles_enabled));
        configurator.startup = startup;
        Ok(configurator)
    }

    /// Outcome of publishing the saved language and subtitles, handed over once
    pub fn take_startup(&mut self) -> Delivery {
        std::mem::take(&mut self.startup)
    }

    fn wire(&mut self) {
        let file = self.file.clone();
        self.language_changed.subscribe(move |language| {
            file.update(|r| r.language = *language)?;
            Ok(())
        });
        let locale = self.locale.clone();
        self.language_changed.subscribe(move |language| {
            locale.set_language(*language);
            Ok(())
        });
        let (ui, available) = (self.ui.clone(), self.languages.options().clone());
        self.language_changed.subscribe(move |language| {
            for option in available.iter() {
                ui.render(&toggle_element(*option), &Widget::Toggle(option == language))?;
            }
            Ok(())
        });

        let file = self.file.clone();
        self.subtitles_changed.subscribe(move |enabled| {
            file.update(|r| r.subtitles_enabled = *enabled)?;
            Ok(())
        });
        let ui = self.ui.clone();
        self.subtitles_changed
            .subscribe(move |enabled| ui.render("language.subtitles", &Widget::Toggle(*enabled)));
    }

    pub fn language(&self) -> Language {
        *self.languages.current()
    }

    pub fn subtitles_enabled(&self) -> bool {
        self.file.read(|r| r.subtitles_enabled)
    }

    pub fn available(&self) -> &OptionSet<Language> {
        self.languages.options()
    }

    /// Switch language; `NotFound` if it has no string table
    pub fn select(&mut self, language: Language) -> Result<Delivery> {
        let language = *self.languages.select(&language)?;
        log::info!("Language changed to {:?}", language);
        Ok(self.language_changed.publish(&language))
    }

    pub fn set_subtitles(&mut self, enabled: bool) -> Delivery {
        log::info!("Subtitles enabled: {}", enabled);
        self.subtitles_changed.publish(&enabled)
    }

    /// Subscribe to language changes
    pub fn on_language_changed<F>(&mut self, handler: F)
    where
        F: FnMut(&Language) -> anyhow::Result<()> + 'static,
    {
        self.language_changed.subscribe(handler);
    }

    pub fn relabel(&self) -> anyhow::Result<()> {
        self.ui
            .render("language.title", &Widget::Text(self.locale.text("language")))?;
        self.ui.render(
            "language.subtitles.title",
            &Widget::Text(self.locale.text("subtitles")),
        )?;
        for option in self.languages.options().iter() {
            let title = self
                .locale
                .localizer()
                .title(*option)
                .unwrap_or(option.code())
                .to_string();
            self.ui
                .render(&format!("{}.title", toggle_element(*option)), &Widget::Text(title))?;
        }
        Ok(())
    }
}

fn toggle_element(language: Language) -> String {
    format!("language.{}", language.code())
}
