//! Host engine abstraction
//!
//! The menu never talks to an audio mixer, quality settings or widgets
//! directly. It hands values to two sinks:
//! - `EngineSink` receives settings to apply (gains, quality properties)
//! - `UiSink` receives widget state and display text

use std::fmt;

use crate::configurators::graphics::{EffectProps, ModelProps, TextureProps};

/// A value the engine should apply
#[derive(Debug, Clone, PartialEq)]
pub enum EngineSetting {
    /// Global listener volume in dB
    ListenerVolume(f32),
    /// Exposed mixer parameter in dB
    MixerGain {
        parameter: &'static str,
        decibels: f32,
    },
    Textures(TextureProps),
    Models(ModelProps),
    Effects(EffectProps),
}

/// Widget state pushed to the UI
#[derive(Debug, Clone, PartialEq)]
pub enum Widget {
    /// Label or title text
    Text(String),
    /// Slider position
    Slider(f32),
    /// Toggle / checkbox state
    Toggle(bool),
    /// Text field contents
    Field(String),
    /// Whether a text field accepts input
    Editable(bool),
}

impl fmt::Display for Widget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Widget::Text(text) => write!(f, "\"{}\"", text),
            Widget::Slider(value) => write!(f, "slider {:.1}", value),
            Widget::Toggle(on) => write!(f, "[{}]", if *on { "x" } else { " " }),
            Widget::Field(text) => write!(f, "field \"{}\"", text),
            Widget::Editable(editable) => {
                write!(f, "{}", if *editable { "editing" } else { "read-only" })
            }
        }
    }
}

/// Receives settings for engine subsystems
pub trait EngineSink {
    fn apply(&self, domain: &str, setting: &EngineSetting) -> anyhow::Result<()>;
}

/// Receives widget updates, keyed by element id (`audio.music.volume`)
pub trait UiSink {
    fn render(&self, element: &str, widget: &Widget) -> anyhow::Result<()>;
}

/// Sink that only logs what it receives
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl EngineSink for LogSink {
    fn apply(&self, domain: &str, setting: &EngineSetting) -> anyhow::Result<()> {
        log::info!("apply {}: {:?}", domain, setting);
        Ok(())
    }
}

impl UiSink for LogSink {
    fn render(&self, element: &str, widget: &Widget) -> anyhow::Result<()> {
        log::info!("render {}: {}", element, widget);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_widget_display() {
        assert_eq!(Widget::Slider(-12.5).to_string(), "slider -12.5");
        assert_eq!(Widget::Toggle(true).to_string(), "[x]");
        assert_eq!(Widget::Text("Sound".into()).to_string(), "\"Sound\"");
    }

    #[test]
    fn test_log_sink_accepts_everything() {
        let sink = LogSink;
        assert!(sink.apply("Master", &EngineSetting::ListenerVolume(0.0)).is_ok());
        assert!(sink.render("menu.title", &Widget::Editable(false)).is_ok());
    }
}
