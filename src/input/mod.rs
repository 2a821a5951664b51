//! Backend-neutral input events
//!
//! Every native button, key and motion representation ends up as one
//! [`InputEvent`]. The constructors keep kind and fields consistent: motion
//! never carries a button, key events never carry a button, button events
//! never carry a key code.

use bitflags::bitflags;
use std::fmt;

pub mod native;
pub mod normalizer;

pub use normalizer::{EventNormalizer, NormalizedEvent};

bitflags! {
    /// Modifier and button state at the time of an event.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct InputModifiers: u8 {
        const SHIFT = 0b0001;
        const CONTROL = 0b0010;
        const ALT = 0b0100;
        /// Primary pointer button held.
        const BUTTON1 = 0b1000;
    }
}

/// What happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputKind {
    ButtonPress,
    ButtonRelease,
    KeyPress,
    KeyRelease,
    PointerMotion,
    Invalid,
}

/// Uniform input record delivered to input callbacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InputEvent {
    kind: InputKind,
    button: u32,
    key_code: u32,
    x: i32,
    y: i32,
    modifiers: InputModifiers,
    time_ms: u64,
    sequence: u64,
}

impl InputEvent {
    fn new(kind: InputKind, button: u32, key_code: u32, x: i32, y: i32, modifiers: InputModifiers) -> Self {
        Self {
            kind,
            button,
            key_code,
            x,
            y,
            modifiers,
            time_ms: 0,
            sequence: 0,
        }
    }

    pub fn button_press(button: u32, x: i32, y: i32, modifiers: InputModifiers) -> Self {
        Self::new(InputKind::ButtonPress, button, 0, x, y, modifiers)
    }

    pub fn button_release(button: u32, x: i32, y: i32, modifiers: InputModifiers) -> Self {
        Self::new(InputKind::ButtonRelease, button, 0, x, y, modifiers)
    }

    pub fn key_press(key_code: u32, x: i32, y: i32, modifiers: InputModifiers) -> Self {
        Self::new(InputKind::KeyPress, 0, key_code, x, y, modifiers)
    }

    pub fn key_release(key_code: u32, x: i32, y: i32, modifiers: InputModifiers) -> Self {
        Self::new(InputKind::KeyRelease, 0, key_code, x, y, modifiers)
    }

    pub fn motion(x: i32, y: i32, modifiers: InputModifiers) -> Self {
        Self::new(InputKind::PointerMotion, 0, 0, x, y, modifiers)
    }

    pub fn invalid() -> Self {
        Self::new(InputKind::Invalid, 0, 0, 0, 0, InputModifiers::empty())
    }

    /// Native event time in milliseconds.
    pub fn at_time(mut self, time_ms: u64) -> Self {
        self.time_ms = time_ms;
        self
    }

    pub(crate) fn with_sequence(mut self, sequence: u64) -> Self {
        self.sequence = sequence;
        self
    }

    pub fn kind(&self) -> InputKind {
        self.kind
    }

    /// Button number, 0 when not a button event.
    pub fn button(&self) -> u32 {
        self.button
    }

    /// Key code, 0 when not a key event.
    pub fn key_code(&self) -> u32 {
        self.key_code
    }

    /// Surface-local pixel position.
    pub fn position(&self) -> (i32, i32) {
        (self.x, self.y)
    }

    pub fn modifiers(&self) -> InputModifiers {
        self.modifiers
    }

    /// Native event time in milliseconds, 0 when the backend gives none.
    pub fn time_ms(&self) -> u64 {
        self.time_ms
    }

    /// Delivery order within one normalizer.
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Whether the populated fields agree with the kind.
    pub fn is_consistent(&self) -> bool {
        match self.kind {
            InputKind::ButtonPress | InputKind::ButtonRelease => self.key_code == 0,
            InputKind::KeyPress | InputKind::KeyRelease => self.button == 0,
            InputKind::PointerMotion => self.button == 0 && self.key_code == 0,
            InputKind::Invalid => true,
        }
    }
}

impl fmt::Display for InputEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            InputKind::ButtonPress | InputKind::ButtonRelease => write!(
                f,
                "{:?} button {} at ({}, {}) {:?}",
                self.kind, self.button, self.x, self.y, self.modifiers
            ),
            InputKind::KeyPress | InputKind::KeyRelease => write!(
                f,
                "{:?} key {} at ({}, {}) {:?}",
                self.kind, self.key_code, self.x, self.y, self.modifiers
            ),
            InputKind::PointerMotion => write!(
                f,
                "motion to ({}, {}) {:?}",
                self.x, self.y, self.modifiers
            ),
            InputKind::Invalid => write!(f, "invalid input"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors_are_consistent() {
        let mods = InputModifiers::SHIFT | InputModifiers::BUTTON1;
        let events = [
            InputEvent::button_press(1, 10, 20, mods),
            InputEvent::button_release(3, 10, 20, mods),
            InputEvent::key_press(65, 0, 0, InputModifiers::CONTROL),
            InputEvent::key_release(65, 0, 0, InputModifiers::empty()),
            InputEvent::motion(5, 6, mods),
            InputEvent::invalid(),
        ];
        for event in events {
            assert!(event.is_consistent(), "{}", event);
        }
    }

    #[test]
    fn test_motion_never_carries_button() {
        let event = InputEvent::motion(1, 2, InputModifiers::BUTTON1);
        assert_eq!(event.button(), 0);
        assert_eq!(event.key_code(), 0);
        assert!(event.modifiers().contains(InputModifiers::BUTTON1));
    }

    #[test]
    fn test_time_and_sequence() {
        let event = InputEvent::key_press(9, 1, 1, InputModifiers::empty())
            .at_time(1500)
            .with_sequence(4);
        assert_eq!(event.time_ms(), 1500);
        assert_eq!(event.sequence(), 4);
        assert_eq!(event.position(), (1, 1));
    }
}
