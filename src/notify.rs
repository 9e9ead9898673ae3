//! Change notification
//!
//! A `ChangeNotifier` fans one value change out to every subscriber, in the
//! order they subscribed. A failing handler is logged and does not stop the
//! handlers after it.

use std::fmt::Debug;

type Handler<T> = Box<dyn FnMut(&T) -> anyhow::Result<()>>;

/// Outcome of one `publish` call
#[derive(Debug, Default)]
pub struct Delivery {
    /// Handlers invoked
    pub delivered: usize,
    /// Errors from failing handlers, with their registration index
    pub failures: Vec<(usize, anyhow::Error)>,
}

impl Delivery {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    /// Fold another delivery's counts and failures into this one
    pub fn merge(&mut self, other: Delivery) {
        self.delivered += other.delivered;
        self.failures.extend(other.failures);
    }

    /// Collapse into the first failure, if any
    pub fn into_result(self) -> anyhow::Result<()> {
        match self.failures.into_iter().next() {
            Some((_, err)) => Err(err),
            None => Ok(()),
        }
    }
}

/// Ordered subscriber list for one kind of change
pub struct ChangeNotifier<T> {
    /// Event name used in log output
    name: String,
    handlers: Vec<Handler<T>>,
}

impl<T: Debug> ChangeNotifier<T> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            handlers: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn subscribe<F>(&mut self, handler: F)
    where
        F: FnMut(&T) -> anyhow::Result<()> + 'static,
    {
        self.handlers.push(Box::new(handler));
    }

    pub fn subscriber_count(&self) -> usize {
        self.handlers.len()
    }

    /// Run every handler with `value`, synchronously and in registration order
    pub fn publish(&mut self, value: &T) -> Delivery {
        log::debug!("{} -> {:?}", self.name, value);
        let mut delivery = Delivery::default();
        for (index, handler) in self.handlers.iter_mut().enumerate() {
            delivery.delivered += 1;
            if let Err(err) = handler(value) {
                log::error!("{} handler #{} failed: {:#}", self.name, index, err);
                delivery.failures.push((index, err));
            }
        }
        delivery
    }
}

impl<T> Debug for ChangeNotifier<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangeNotifier")
            .field("name", &self.name)
            .field("subscribers", &self.handlers.len())
            .finish()
    }
}
