//! Carbon events

use super::{Translation, BUTTON_LEFT, BUTTON_MIDDLE, BUTTON_RIGHT};
use crate::input::normalizer::NormalizedEvent;
use crate::input::{InputEvent, InputModifiers};

const fn four_char(code: &[u8; 4]) -> u32 {
    ((code[0] as u32) << 24) | ((code[1] as u32) << 16) | ((code[2] as u32) << 8) | code[3] as u32
}

pub const EVENT_CLASS_MOUSE: u32 = four_char(b"mous");
pub const EVENT_CLASS_KEYBOARD: u32 = four_char(b"keyb");
pub const EVENT_CLASS_WINDOW: u32 = four_char(b"wind");

pub const EVENT_MOUSE_DOWN: u32 = 1;
pub const EVENT_MOUSE_UP: u32 = 2;
pub const EVENT_MOUSE_MOVED: u32 = 5;
pub const EVENT_MOUSE_DRAGGED: u32 = 6;

pub const EVENT_RAW_KEY_DOWN: u32 = 1;
pub const EVENT_RAW_KEY_REPEAT: u32 = 2;
pub const EVENT_RAW_KEY_UP: u32 = 3;

pub const EVENT_WINDOW_DRAW_CONTENT: u32 = 2;
pub const EVENT_WINDOW_SHOWN: u32 = 24;
pub const EVENT_WINDOW_BOUNDS_CHANGED: u32 = 27;

pub const SHIFT_KEY: u32 = 0x0200;
pub const OPTION_KEY: u32 = 0x0800;
pub const CONTROL_KEY: u32 = 0x1000;

/// Carbon numbers the secondary button 2 and the tertiary button 3.
pub const MOUSE_BUTTON_PRIMARY: u16 = 1;
pub const MOUSE_BUTTON_SECONDARY: u16 = 2;
pub const MOUSE_BUTTON_TERTIARY: u16 = 3;

/// The parameters of a Carbon event this layer reads.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CarbonEvent {
    pub class: u32,
    pub kind: u32,
    /// Window-local position.
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
    /// `kEventParamKeyModifiers`.
    pub modifiers: u32,
    pub button: u16,
    /// `kEventParamMouseChord`: bit 0 is the primary button.
    pub mouse_chord: u32,
    pub key_code: u32,
    /// Seconds since system start.
    pub timestamp: f64,
}

impl CarbonEvent {
    pub fn new(class: u32, kind: u32) -> Self {
        Self {
            class,
            kind,
            ..Default::default()
        }
    }

    pub fn mouse(kind: u32, button: u16, x: i32, y: i32, modifiers: u32, mouse_chord: u32) -> Self {
        Self {
            class: EVENT_CLASS_MOUSE,
            kind,
            button,
            x,
            y,
            modifiers,
            mouse_chord,
            ..Default::default()
        }
    }

    pub fn key(kind: u32, key_code: u32, modifiers: u32) -> Self {
        Self {
            class: EVENT_CLASS_KEYBOARD,
            kind,
            key_code,
            modifiers,
            ..Default::default()
        }
    }

    pub fn bounds_changed(width: u32, height: u32) -> Self {
        Self {
            class: EVENT_CLASS_WINDOW,
            kind: EVENT_WINDOW_BOUNDS_CHANGED,
            width,
            height,
            ..Default::default()
        }
    }

    pub fn at_time(mut self, timestamp: f64) -> Self {
        self.timestamp = timestamp;
        self
    }

    fn input_modifiers(&self) -> InputModifiers {
        let mut modifiers = InputModifiers::empty();
        if self.modifiers & SHIFT_KEY != 0 {
            modifiers |= InputModifiers::SHIFT;
        }
        if self.modifiers & CONTROL_KEY != 0 {
            modifiers |= InputModifiers::CONTROL;
        }
        if self.modifiers & OPTION_KEY != 0 {
            modifiers |= InputModifiers::ALT;
        }
        if self.mouse_chord & 1 != 0 {
            modifiers |= InputModifiers::BUTTON1;
        }
        modifiers
    }

    fn button_number(&self) -> u32 {
        match self.button {
            MOUSE_BUTTON_PRIMARY => BUTTON_LEFT,
            MOUSE_BUTTON_SECONDARY => BUTTON_RIGHT,
            MOUSE_BUTTON_TERTIARY => BUTTON_MIDDLE,
            other => u32::from(other),
        }
    }

    fn time_ms(&self) -> u64 {
        if self.timestamp > 0.0 {
            (self.timestamp * 1000.0).round() as u64
        } else {
            0
        }
    }

    pub(crate) fn translate(&self, translation: &mut Translation<'_>) -> NormalizedEvent {
        let modifiers = self.input_modifiers();
        let input = match (self.class, self.kind) {
            (EVENT_CLASS_WINDOW, EVENT_WINDOW_SHOWN) => return NormalizedEvent::Initialise,
            (EVENT_CLASS_WINDOW, EVENT_WINDOW_DRAW_CONTENT) => return NormalizedEvent::Expose,
            (EVENT_CLASS_WINDOW, EVENT_WINDOW_BOUNDS_CHANGED) => {
                return NormalizedEvent::Resize {
                    width: self.width,
                    height: self.height,
                }
            }
            (EVENT_CLASS_MOUSE, EVENT_MOUSE_DOWN) => {
                *translation.cursor = (self.x, self.y);
                InputEvent::button_press(self.button_number(), self.x, self.y, modifiers)
            }
            (EVENT_CLASS_MOUSE, EVENT_MOUSE_UP) => {
                *translation.cursor = (self.x, self.y);
                InputEvent::button_release(self.button_number(), self.x, self.y, modifiers)
            }
            (EVENT_CLASS_MOUSE, EVENT_MOUSE_MOVED | EVENT_MOUSE_DRAGGED) => {
                *translation.cursor = (self.x, self.y);
                InputEvent::motion(self.x, self.y, modifiers)
            }
            (EVENT_CLASS_KEYBOARD, EVENT_RAW_KEY_DOWN | EVENT_RAW_KEY_REPEAT) => {
                let (x, y) = *translation.cursor;
                InputEvent::key_press(self.key_code, x, y, modifiers)
            }
            (EVENT_CLASS_KEYBOARD, EVENT_RAW_KEY_UP) => {
                let (x, y) = *translation.cursor;
                InputEvent::key_release(self.key_code, x, y, modifiers)
            }
            _ => return NormalizedEvent::Ignored,
        };
        NormalizedEvent::Input(input.at_time(self.time_ms()))
    }
}
