//! Per-domain configurators
//!
//! Every configurator starts up the same way:
//! 1. load its persisted record
//! 2. initialize its selection or scalar from it
//! 3. register subscribers (persist, apply to engine, render)
//! 4. publish the loaded value once so every subscriber is in sync
//!
//! After that, each user action computes a new value and publishes it.

pub mod audio;
pub mod graphics;
pub mod language;
pub mod player;

use std::fmt::Debug;

use crate::cycle::{OptionSet, Selector};
use crate::error::Result;
use crate::notify::{ChangeNotifier, Delivery};

pub use audio::AudioConfigurator;
pub use graphics::GraphicsConfigurator;
pub use language::LanguageConfigurator;
pub use player::PlayerConfigurator;

/// A cyclic selector wired to a change notifier
///
/// Shared by every next/previous style domain; what a change does is
/// entirely up to the subscribers.
#[derive(Debug)]
pub struct CyclicConfigurator<T> {
    domain: String,
    selector: Selector<T>,
    changed: ChangeNotifier<T>,
}

impl<T> CyclicConfigurator<T>
where
    T: Clone + PartialEq + Debug + 'static,
{
    pub fn new(domain: impl Into<String>, options: OptionSet<T>) -> Self {
        let domain = domain.into();
        Self {
            changed: ChangeNotifier::new(format!("{} changed", domain)),
            domain,
            selector: Selector::new(options),
        }
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn current(&self) -> &T {
        self.selector.current()
    }

    pub fn options(&self) -> &OptionSet<T> {
        self.selector.options()
    }

    pub fn subscribe<F>(&mut self, handler: F)
    where
        F: FnMut(&T) -> anyhow::Result<()> + 'static,
    {
        self.changed.subscribe(handler);
    }

    /// Select the persisted value and publish it to every subscriber
    ///
    /// Fails with `NotFound` if `initial` is not one of the options.
    pub fn start(&mut self, initial: &T) -> Result<Delivery> {
        self.selector.select(initial)?;
        Ok(self.publish())
    }

    pub fn next(&mut self) -> Delivery {
        self.selector.advance();
        log::info!("{} changed to {:?}", self.domain, self.current());
        self.publish()
    }

    pub fn previous(&mut self) -> Delivery {
        self.selector.retreat();
        log::info!("{} changed to {:?}", self.domain, self.current());
        self.publish()
    }

    /// Re-run every subscriber with the current value
    pub fn publish(&mut self) -> Delivery {
        let value = self.selector.current().clone();
        self.changed.publish(&value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SettingsError;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_start_publishes_loaded_value() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut cfg = CyclicConfigurator::new("Gender", OptionSet::new(vec!["m", "f", "o"]).unwrap());
        {
            let seen = seen.clone();
            cfg.subscribe(move |v| {
                seen.borrow_mut().push(*v);
                Ok(())
            });
        }

        cfg.start(&"f").unwrap();
        cfg.next();
        cfg.next();
        cfg.previous();
        assert_eq!(*seen.borrow(), vec!["f", "o", "m", "o"]);
    }

    #[test]
    fn test_start_with_unknown_value() {
        let mut cfg = CyclicConfigurator::new("Textures", OptionSet::new(vec![1u8, 2, 3]).unwrap());
        let err = cfg.start(&5).unwrap_err();
        assert!(matches!(err, SettingsError::NotFound(_)));
        assert_eq!(*cfg.current(), 1);
    }
}
