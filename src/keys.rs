//! Modifier key tracking.
//!
//! The tracker remembers modifier keydowns the rendering surface may have
//! missed so the router can replay them once the surface is focused again.
//! Records are keyed by physical key code: a keyup removes the record with
//! the same code, and a second keydown for a code already held is ignored.

#[cfg(test)]
#[path = "keys_test.rs"]
mod keys_test;

use crate::consts::MODIFIER_KEY_NAMES;

/// One of the four modifier keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModifierKey {
    Control,
    Shift,
    Alt,
    Meta,
}

impl ModifierKey {
    /// Classify a `KeyboardEvent.key` value. Non-modifiers return `None`.
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "Control" => Some(Self::Control),
            "Shift" => Some(Self::Shift),
            "Alt" => Some(Self::Alt),
            "Meta" => Some(Self::Meta),
            _ => None,
        }
    }

    /// The `KeyboardEvent.key` value for this modifier.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Self::Control => MODIFIER_KEY_NAMES[0],
            Self::Shift => MODIFIER_KEY_NAMES[1],
            Self::Alt => MODIFIER_KEY_NAMES[2],
            Self::Meta => MODIFIER_KEY_NAMES[3],
        }
    }
}

/// A captured modifier keydown, kept unchanged until its keyup arrives.
#[derive(Debug, Clone)]
pub struct ModifierEventRecord<E> {
    key: ModifierKey,
    code: String,
    event: E,
}

impl<E> ModifierEventRecord<E> {
    #[must_use]
    pub fn key(&self) -> ModifierKey {
        self.key
    }

    /// Physical key code, e.g. `ShiftLeft`.
    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }

    /// The original keydown event.
    #[must_use]
    pub fn event(&self) -> &E {
        &self.event
    }
}

/// Outstanding modifier keydowns, in the order they were pressed.
#[derive(Debug, Clone)]
pub struct ModifierKeyTracker<E> {
    records: Vec<ModifierEventRecord<E>>,
}

impl<E> Default for ModifierKeyTracker<E> {
    fn default() -> Self {
        Self { records: Vec::new() }
    }
}

impl<E: Clone> ModifierKeyTracker<E> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a keydown. Returns `true` when a new record was stored; keys
    /// that are not modifiers and codes already held are ignored.
    pub fn press(&mut self, key: &str, code: &str, event: E) -> bool {
        let Some(key) = ModifierKey::from_key(key) else {
            return false;
        };
        if self.contains(code) {
            return false;
        }
        self.records.push(ModifierEventRecord { key, code: code.to_owned(), event });
        true
    }

    /// Drop every record whose code matches a keyup. Returns how many were removed.
    pub fn release(&mut self, code: &str) -> usize {
        let before = self.records.len();
        self.records.retain(|record| record.code != code);
        before - self.records.len()
    }

    /// Forget everything. Returns how many records were dropped.
    pub fn clear(&mut self) -> usize {
        let dropped = self.records.len();
        self.records.clear();
        dropped
    }

    #[must_use]
    pub fn contains(&self, code: &str) -> bool {
        self.records.iter().any(|record| record.code == code)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Codes currently held, in press order.
    #[must_use]
    pub fn codes(&self) -> Vec<&str> {
        self.records.iter().map(|record| record.code.as_str()).collect()
    }

    pub fn records(&self) -> impl Iterator<Item = &ModifierEventRecord<E>> {
        self.records.iter()
    }
}
