//! Cyclic option selection
//!
//! An `OptionSet` is a fixed, non-empty list of distinct values. A
//! `Selection` is an index into it that wraps around at both ends.

use std::fmt::Debug;

use crate::error::{Result, SettingsError};

/// Cursor into an `OptionSet`, always in range for the set that produced it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Selection(usize);

impl Selection {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Immutable ordered set of selectable values
#[derive(Debug, Clone, PartialEq)]
pub struct OptionSet<T> {
    options: Vec<T>,
}

impl<T: PartialEq + Debug> OptionSet<T> {
    /// Build a set; empty lists and duplicate values are rejected
    pub fn new(options: Vec<T>) -> Result<Self> {
        if options.is_empty() {
            return Err(SettingsError::InvalidConfiguration(
                "option set must contain at least one value".into(),
            ));
        }
        for (i, value) in options.iter().enumerate() {
            if options[..i].contains(value) {
                return Err(SettingsError::InvalidConfiguration(format!(
                    "duplicate option {:?}",
                    value
                )));
            }
        }
        Ok(Self { options })
    }

    /// Locate the last occurrence of `value`
    pub fn find(&self, value: &T) -> Result<Selection> {
        self.options
            .iter()
            .rposition(|v| v == value)
            .map(Selection)
            .ok_or_else(|| SettingsError::NotFound(format!("{:?}", value)))
    }
}

impl<T> OptionSet<T> {
    pub fn len(&self) -> usize {
        self.options.len()
    }

    /// Never true, construction rejects empty sets
    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    pub fn first(&self) -> Selection {
        Selection(0)
    }

    pub fn last(&self) -> Selection {
        Selection(self.options.len() - 1)
    }

    /// Next selection, wrapping from the last value to the first
    pub fn advance(&self, selection: Selection) -> Selection {
        Selection((selection.0 + 1) % self.options.len())
    }

    /// Previous selection, wrapping from the first value to the last
    pub fn retreat(&self, selection: Selection) -> Selection {
        let len = self.options.len();
        Selection((selection.0 + len - 1) % len)
    }

    pub fn get(&self, selection: Selection) -> &T {
        &self.options[selection.0]
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.options.iter()
    }
}

/// An option set together with its active selection
#[derive(Debug, Clone)]
pub struct Selector<T> {
    options: OptionSet<T>,
    current: Selection,
}

impl<T: PartialEq + Debug> Selector<T> {
    /// Start at the first option
    pub fn new(options: OptionSet<T>) -> Self {
        let current = options.first();
        Self { options, current }
    }

    /// Move the cursor to `value`; the cursor is unchanged on `NotFound`
    pub fn select(&mut self, value: &T) -> Result<&T> {
        self.current = self.options.find(value)?;
        Ok(self.current())
    }
}

impl<T> Selector<T> {
    pub fn current(&self) -> &T {
        self.options.get(self.current)
    }

    pub fn selection(&self) -> Selection {
        self.current
    }

    pub fn options(&self) -> &OptionSet<T> {
        &self.options
    }

    pub fn advance(&mut self) -> &T {
        self.current = self.options.advance(self.current);
        self.current()
    }

    pub fn retreat(&mut self) -> &T {
        self.current = self.options.retreat(self.current);
        self.current()
    }
}
