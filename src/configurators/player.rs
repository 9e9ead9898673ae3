//! Player profile configurator: nickname and gender

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::CyclicConfigurator;
use crate::cycle::OptionSet;
use crate::error::{Result, SettingsError};
use crate::localization::LocaleContext;
use crate::notify::{ChangeNotifier, Delivery};
use crate::ordinal::ordinal_enum;
use crate::persistence::ConfigFile;
use crate::platform::{UiSink, Widget};

ordinal_enum! {
    pub enum Gender {
        Male = 0,
        Female = 1,
        Other = 2,
    }
}

impl Gender {
    pub fn label_key(&self) -> &'static str {
        match self {
            Gender::Male => "GENDER_MALE",
            Gender::Female => "GENDER_FEMALE",
            Gender::Other => "GENDER_OTHER",
        }
    }
}

/// Player file contents
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PlayerRecord {
    pub nickname: String,
    pub gender: Gender,
}

pub struct PlayerConfigurator {
    file: Arc<ConfigFile<PlayerRecord>>,
    gender: CyclicConfigurator<Gender>,
    nickname_changed: ChangeNotifier<String>,
    editing: bool,
    locale: LocaleContext,
    ui: Arc<dyn UiSink>,
    startup: Delivery,
}

impl PlayerConfigurator {
    pub fn open(path: &Path, ui: Arc<dyn UiSink>, locale: LocaleContext) -> Result<Self> {
        let file = ConfigFile::<PlayerRecord>::open(path)?;
        let saved = file.read(|r| r.clone());

        let mut gender = CyclicConfigurator::new("Gender", OptionSet::new(Gender::ALL.to_vec())?);
        {
            let (ui, locale) = (ui.clone(), locale.clone());
            gender.subscribe(move |g| {
                ui.render("player.gender.value", &Widget::Text(locale.text(g.label_key())))
            });
        }
        {
            let file = file.clone();
            gender.subscribe(move |g| {
                file.update(|r| r.gender = *g)?;
                Ok(())
            });
        }

        let mut nickname_changed = ChangeNotifier::new("nickname changed");
        {
            let file = file.clone();
            nickname_changed.subscribe(move |name: &String| {
                file.update(|r| r.nickname = name.clone())?;
                Ok(())
            });
        }
        {
            let ui = ui.clone();
            nickname_changed.subscribe(move |name: &String| {
                ui.render("player.nickname", &Widget::Field(name.clone()))?;
                ui.render("player.nickname", &Widget::Editable(false))
            });
        }

        let mut startup = nickname_changed.publish(&saved.nickname);
        startup.merge(gender.start(&saved.gender)?);

        Ok(Self {
            file,
            gender,
            nickname_changed,
            editing: false,
            locale,
            ui,
            startup,
        })
    }

    /// Outcome of publishing the saved profile, handed over once
    pub fn take_startup(&mut self) -> Delivery {
        std::mem::take(&mut self.startup)
    }

    pub fn nickname(&self) -> String {
        self.file.read(|r| r.nickname.clone())
    }

    pub fn gender(&self) -> Gender {
        *self.gender.current()
    }

    pub fn is_editing(&self) -> bool {
        self.editing
    }

    /// Unlock the nickname field for typing
    pub fn begin_nickname_edit(&mut self) -> anyhow::Result<()> {
        self.editing = true;
        self.ui.render("player.nickname", &Widget::Editable(true))
    }

    /// Finish editing and store `nickname`
    ///
    /// Only valid after `begin_nickname_edit`; the field is locked again
    /// afterwards.
    pub fn commit_nickname(&mut self, nickname: &str) -> Result<Delivery> {
        if !self.editing {
            return Err(SettingsError::InvalidConfiguration(
                "nickname committed without an active edit".into(),
            ));
        }
        self.editing = false;
        let nickname = nickname.to_string();
        log::info!("Nickname changed to {:?}", nickname);
        Ok(self.nickname_changed.publish(&nickname))
    }

    pub fn next_gender(&mut self) -> Delivery {
        self.gender.next()
    }

    pub fn previous_gender(&mut self) -> Delivery {
        self.gender.previous()
    }

    pub fn relabel(&self) -> anyhow::Result<()> {
        self.ui.render(
            "player.gender.title",
            &Widget::Text(self.locale.text("select_gender")),
        )?;
        self.ui.render(
            "player.gender.value",
            &Widget::Text(self.locale.text(self.gender().label_key())),
        )
    }
}
