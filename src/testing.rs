//! Shared test helpers: recording sinks and asset fixtures

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crate::localization::{Language, LocaleContext, Localizer};
use crate::platform::{EngineSetting, EngineSink, UiSink, Widget};

/// Engine and UI sink that remembers everything it receives
#[derive(Debug, Default)]
pub struct Recorder {
    applied: Mutex<Vec<(String, EngineSetting)>>,
    rendered: Mutex<Vec<(String, Widget)>>,
    fail_engine: AtomicBool,
}

impl Recorder {
    pub fn fail_engine(&self, fail: bool) {
        self.fail_engine.store(fail, Ordering::SeqCst);
    }

    pub fn last_applied(&self, domain: &str) -> Option<EngineSetting> {
        let applied = self.applied.lock().unwrap();
        applied
            .iter()
            .rev()
            .find(|(d, _)| d == domain)
            .map(|(_, s)| s.clone())
    }

    pub fn applied_count(&self) -> usize {
        self.applied.lock().unwrap().len()
    }

    pub fn last_rendered(&self, element: &str) -> Option<Widget> {
        let rendered = self.rendered.lock().unwrap();
        rendered
            .iter()
            .rev()
            .find(|(e, _)| e == element)
            .map(|(_, w)| w.clone())
    }
}

impl EngineSink for Recorder {
    fn apply(&self, domain: &str, setting: &EngineSetting) -> anyhow::Result<()> {
        if self.fail_engine.load(Ordering::SeqCst) {
            anyhow::bail!("engine rejected {}", domain);
        }
        self.applied
            .lock()
            .unwrap()
            .push((domain.to_string(), setting.clone()));
        Ok(())
    }
}

impl UiSink for Recorder {
    fn render(&self, element: &str, widget: &Widget) -> anyhow::Result<()> {
        self.rendered
            .lock()
            .unwrap()
            .push((element.to_string(), widget.clone()));
        Ok(())
    }
}

pub fn assets_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("assets")
}

fn locale_path(language: Language) -> PathBuf {
    assets_dir()
        .join("Locales")
        .join(format!("{}.json", language.code()))
}

/// Only the English table, English active
pub fn english_locale() -> LocaleContext {
    let localizer = Localizer::load([locale_path(Language::English)]).unwrap();
    LocaleContext::new(Arc::new(localizer), Language::English)
}

/// Every shipped table, English active
pub fn all_locales() -> LocaleContext {
    let localizer = Localizer::load(Language::ALL.iter().map(|l| locale_path(*l))).unwrap();
    LocaleContext::new(Arc::new(localizer), Language::English)
}

/// Fresh writable copy of the shipped assets tree
pub fn copy_assets() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    copy_tree(&assets_dir(), dir.path());
    dir
}

fn copy_tree(from: &Path, to: &Path) {
    fs::create_dir_all(to).unwrap();
    for entry in fs::read_dir(from).unwrap() {
        let entry = entry.unwrap();
        let target = to.join(entry.file_name());
        if entry.file_type().unwrap().is_dir() {
            copy_tree(&entry.path(), &target);
        } else {
            fs::copy(entry.path(), target).unwrap();
        }
    }
}
