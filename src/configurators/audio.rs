//! Audio volume configurator
//!
//! Four channels, each with a volume slider and a mute toggle. Muting
//! forces the applied gain to the silence floor but leaves the stored
//! volume alone, so unmuting restores it exactly.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{LoadError, Result, SettingsError};
use crate::localization::LocaleContext;
use crate::notify::{ChangeNotifier, Delivery};
use crate::persistence::ConfigFile;
use crate::platform::{EngineSetting, EngineSink, UiSink, Widget};

/// Silence floor in dB, also the applied gain while muted
pub const LOWEST_VOLUME: f32 = -50.0;
/// Loudest allowed volume in dB
pub const HIGHEST_VOLUME: f32 = 15.0;

/// Persisted state of one channel
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct VolumeRecord {
    pub volume: f32,
    pub is_muted: bool,
}

impl VolumeRecord {
    /// Gain actually sent to the engine
    pub fn effective(&self) -> f32 {
        if self.is_muted {
            LOWEST_VOLUME
        } else {
            self.volume
        }
    }
}

/// Audio file contents, keyed by `Channel::key`
pub type AudioRecord = BTreeMap<String, VolumeRecord>;

/// Volume channels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    Master,
    Music,
    Voice,
    Effects,
}

impl Channel {
    pub const ALL: [Channel; 4] = [Channel::Master, Channel::Music, Channel::Voice, Channel::Effects];

    /// Key in the audio file
    pub fn key(&self) -> &'static str {
        match self {
            Channel::Master => "Master",
            Channel::Music => "Music",
            Channel::Voice => "Voice",
            Channel::Effects => "Effects",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "master" => Some(Channel::Master),
            "music" => Some(Channel::Music),
            "voice" => Some(Channel::Voice),
            "effects" | "fx" => Some(Channel::Effects),
            _ => None,
        }
    }

    fn title_key(&self) -> &'static str {
        match self {
            Channel::Master => "master_volume",
            Channel::Music => "music_volume",
            Channel::Voice => "voice_volume",
            Channel::Effects => "fx_volume",
        }
    }

    /// Master drives the listener, the rest are mixer parameters
    fn engine_setting(&self, decibels: f32) -> EngineSetting {
        let parameter = match self {
            Channel::Master => return EngineSetting::ListenerVolume(decibels),
            Channel::Music => "MusicVolume",
            Channel::Voice => "VoiceVolume",
            Channel::Effects => "FXVolume",
        };
        EngineSetting::MixerGain { parameter, decibels }
    }

    fn element(&self, part: &str) -> String {
        format!("audio.{}.{}", self.key().to_lowercase(), part)
    }
}

struct ChannelEvents {
    volume_changed: ChangeNotifier<f32>,
    mute_changed: ChangeNotifier<bool>,
}

pub struct AudioConfigurator {
    file: Arc<ConfigFile<AudioRecord>>,
    channels: [ChannelEvents; 4],
    locale: LocaleContext,
    ui: Arc<dyn UiSink>,
    startup: Delivery,
}

impl AudioConfigurator {
    /// Load the audio file, wire every channel and push the loaded state out
    pub fn open(
        path: &Path,
        engine: Arc<dyn EngineSink>,
        ui: Arc<dyn UiSink>,
        locale: LocaleContext,
    ) -> Result<Self> {
        let file = ConfigFile::<AudioRecord>::open(path)?;
        if let Some(missing) = Channel::ALL
            .iter()
            .find(|ch| file.read(|r| !r.contains_key(ch.key())))
        {
            return Err(SettingsError::load_failed(
                path,
                LoadError::MissingEntry(missing.key().to_string()),
            ));
        }

        let mut configurator = Self {
            file,
            channels: Channel::ALL.map(|ch| ChannelEvents {
                volume_changed: ChangeNotifier::new(format!("{} volume", ch.key())),
                mute_changed: ChangeNotifier::new(format!("{} mute", ch.key())),
            }),
            locale,
            ui,
            startup: Delivery::default(),
        };
        for channel in Channel::ALL {
            configurator.wire(channel, &engine);
        }
        configurator.startup = configurator.sync();
        Ok(configurator)
    }

    fn wire(&mut self, channel: Channel, engine: &Arc<dyn EngineSink>) {
        let key = channel.key();
        let events = &mut self.channels[channel as usize];

        let file = self.file.clone();
        events.volume_changed.subscribe(move |volume| {
            file.update(|r| r.entry(key.to_string()).or_default().volume = *volume)?;
            Ok(())
        });
        let (file, engine_sink) = (self.file.clone(), engine.clone());
        events.volume_changed.subscribe(move |_| {
            let effective = file.read(|r| channel_state(r, channel).effective());
            engine_sink.apply(key, &channel.engine_setting(effective))
        });
        let ui = self.ui.clone();
        events
            .volume_changed
            .subscribe(move |volume| ui.render(&channel.element("volume"), &Widget::Slider(*volume)));

        let file = self.file.clone();
        events.mute_changed.subscribe(move |muted| {
            file.update(|r| r.entry(key.to_string()).or_default().is_muted = *muted)?;
            Ok(())
        });
        let (file, engine_sink) = (self.file.clone(), engine.clone());
        events.mute_changed.subscribe(move |_| {
            let effective = file.read(|r| channel_state(r, channel).effective());
            engine_sink.apply(key, &channel.engine_setting(effective))
        });
        let ui = self.ui.clone();
        events
            .mute_changed
            .subscribe(move |muted| ui.render(&channel.element("mute"), &Widget::Toggle(*muted)));
    }

    /// Publish every stored volume, then every mute flag
    fn sync(&mut self) -> Delivery {
        let mut delivery = Delivery::default();
        for channel in Channel::ALL {
            let volume = self.state(channel).volume;
            delivery.merge(self.channels[channel as usize].volume_changed.publish(&volume));
        }
        for channel in Channel::ALL {
            let muted = self.state(channel).is_muted;
            delivery.merge(self.channels[channel as usize].mute_changed.publish(&muted));
        }
        delivery
    }

    /// Outcome of the initial sync, handed over once
    pub fn take_startup(&mut self) -> Delivery {
        std::mem::take(&mut self.startup)
    }

    /// Set a channel volume, clamped to the supported range
    ///
    /// Non-finite input is ignored and nothing is published.
    pub fn set_volume(&mut self, channel: Channel, volume: f32) -> Delivery {
        if !volume.is_finite() {
            log::warn!("{} volume {} ignored, keeping {}", channel.key(), volume, self.volume(channel));
            return Delivery::default();
        }
        let clamped = volume.clamp(LOWEST_VOLUME, HIGHEST_VOLUME);
        if clamped != volume {
            log::warn!("{} volume {} out of range, using {}", channel.key(), volume, clamped);
        }
        log::info!("{} volume changed to {}", channel.key(), clamped);
        self.channels[channel as usize].volume_changed.publish(&clamped)
    }

    pub fn set_muted(&mut self, channel: Channel, muted: bool) -> Delivery {
        log::info!("{} muted: {}", channel.key(), muted);
        self.channels[channel as usize].mute_changed.publish(&muted)
    }

    /// Stored volume, unaffected by mute
    pub fn volume(&self, channel: Channel) -> f32 {
        self.state(channel).volume
    }

    pub fn is_muted(&self, channel: Channel) -> bool {
        self.state(channel).is_muted
    }

    pub fn effective_volume(&self, channel: Channel) -> f32 {
        self.state(channel).effective()
    }

    pub fn state(&self, channel: Channel) -> VolumeRecord {
        self.file.read(|r| channel_state(r, channel))
    }

    /// Subscribe to volume changes of one channel
    pub fn on_volume_changed<F>(&mut self, channel: Channel, handler: F)
    where
        F: FnMut(&f32) -> anyhow::Result<()> + 'static,
    {
        self.channels[channel as usize].volume_changed.subscribe(handler);
    }

    /// Subscribe to mute toggles of one channel
    pub fn on_mute_changed<F>(&mut self, channel: Channel, handler: F)
    where
        F: FnMut(&bool) -> anyhow::Result<()> + 'static,
    {
        self.channels[channel as usize].mute_changed.subscribe(handler);
    }

    /// Render titles in the active language
    pub fn relabel(&self) -> anyhow::Result<()> {
        self.ui
            .render("audio.title", &Widget::Text(self.locale.text("sound")))?;
        for channel in Channel::ALL {
            let title = self.locale.text(channel.title_key());
            self.ui.render(&channel.element("title"), &Widget::Text(title))?;
        }
        Ok(())
    }
}

fn channel_state(record: &AudioRecord, channel: Channel) -> VolumeRecord {
    record.get(channel.key()).copied().unwrap_or_default()
}
