//! Settings Menu - options screen core for a game
//!
//! Core modules:
//! - `cycle`: Cyclic option sets and selections (next/previous with wraparound)
//! - `notify`: Ordered fan-out of value changes to subscribers
//! - `persistence`: Whole-file JSON snapshots with atomic replace
//! - `configurators`: Audio, graphics quality, language and player profile
//! - `localization`: Per-language string tables
//! - `platform`: Engine and UI sinks the menu drives
//! - `menu`: Composition root wiring everything together

pub mod config;
pub mod configurators;
pub mod cycle;
pub mod error;
pub mod localization;
pub mod menu;
pub mod notify;
mod ordinal;
pub mod persistence;
pub mod platform;

#[cfg(test)]
pub(crate) mod testing;

pub use config::MenuConfig;
pub use configurators::audio::Channel;
pub use configurators::graphics::{QualityDomain, QualityLevel};
pub use configurators::player::Gender;
pub use cycle::{OptionSet, Selection, Selector};
pub use error::{LoadError, Result, SettingsError};
pub use localization::{Language, LocaleContext, Localizer};
pub use menu::SettingsMenu;
pub use notify::{ChangeNotifier, Delivery};
pub use platform::{EngineSetting, EngineSink, LogSink, UiSink, Widget};
