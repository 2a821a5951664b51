//! X11 events as delivered to a GLX drawing area

use super::{x_style_modifiers, Translation};
use crate::input::normalizer::NormalizedEvent;
use crate::input::InputEvent;

pub const KEY_PRESS: i32 = 2;
pub const KEY_RELEASE: i32 = 3;
pub const BUTTON_PRESS: i32 = 4;
pub const BUTTON_RELEASE: i32 = 5;
pub const MOTION_NOTIFY: i32 = 6;
pub const EXPOSE: i32 = 12;
pub const MAP_NOTIFY: i32 = 19;
pub const CONFIGURE_NOTIFY: i32 = 22;

pub const SHIFT_MASK: u32 = 1 << 0;
pub const CONTROL_MASK: u32 = 1 << 2;
pub const MOD1_MASK: u32 = 1 << 3;
pub const BUTTON1_MASK: u32 = 1 << 8;

/// The fields of an `XEvent` this layer reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct XEvent {
    pub event_type: i32,
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
    /// Modifier and button mask.
    pub state: u32,
    pub button: u32,
    pub keycode: u32,
    /// Exposes still queued after this one.
    pub count: i32,
    /// Server time in milliseconds.
    pub time: u64,
}

impl XEvent {
    pub fn expose(count: i32) -> Self {
        Self {
            event_type: EXPOSE,
            count,
            ..Default::default()
        }
    }

    pub fn configure(width: u32, height: u32) -> Self {
        Self {
            event_type: CONFIGURE_NOTIFY,
            width,
            height,
            ..Default::default()
        }
    }

    pub fn map() -> Self {
        Self {
            event_type: MAP_NOTIFY,
            ..Default::default()
        }
    }

    pub fn button(event_type: i32, button: u32, x: i32, y: i32, state: u32, time: u64) -> Self {
        Self {
            event_type,
            button,
            x,
            y,
            state,
            time,
            ..Default::default()
        }
    }

    pub fn key(event_type: i32, keycode: u32, x: i32, y: i32, state: u32, time: u64) -> Self {
        Self {
            event_type,
            keycode,
            x,
            y,
            state,
            time,
            ..Default::default()
        }
    }

    pub fn motion(x: i32, y: i32, state: u32, time: u64) -> Self {
        Self {
            event_type: MOTION_NOTIFY,
            x,
            y,
            state,
            time,
            ..Default::default()
        }
    }

    pub(crate) fn translate(&self, translation: &mut Translation<'_>) -> NormalizedEvent {
        let modifiers = x_style_modifiers(self.state);
        let input = match self.event_type {
            EXPOSE if self.count > 0 => return NormalizedEvent::ExposeDeferred,
            EXPOSE => return NormalizedEvent::Expose,
            MAP_NOTIFY => return NormalizedEvent::Initialise,
            CONFIGURE_NOTIFY => {
                return NormalizedEvent::Resize {
                    width: self.width,
                    height: self.height,
                }
            }
            BUTTON_PRESS => InputEvent::button_press(self.button, self.x, self.y, modifiers),
            BUTTON_RELEASE => InputEvent::button_release(self.button, self.x, self.y, modifiers),
            KEY_PRESS => InputEvent::key_press(self.keycode, self.x, self.y, modifiers),
            KEY_RELEASE => InputEvent::key_release(self.keycode, self.x, self.y, modifiers),
            MOTION_NOTIFY => InputEvent::motion(self.x, self.y, modifiers),
            _ => return NormalizedEvent::Ignored,
        };
        *translation.cursor = (self.x, self.y);
        NormalizedEvent::Input(input.at_time(self.time))
    }
}
