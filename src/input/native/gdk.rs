//! GDK events as delivered to a GTK-GL area

use super::{x_style_modifiers, Translation};
use crate::input::normalizer::NormalizedEvent;
use crate::input::InputEvent;

pub const GDK_EXPOSE: i32 = 2;
pub const GDK_MOTION_NOTIFY: i32 = 3;
pub const GDK_BUTTON_PRESS: i32 = 4;
pub const GDK_2BUTTON_PRESS: i32 = 5;
pub const GDK_3BUTTON_PRESS: i32 = 6;
pub const GDK_BUTTON_RELEASE: i32 = 7;
pub const GDK_KEY_PRESS: i32 = 8;
pub const GDK_KEY_RELEASE: i32 = 9;
pub const GDK_CONFIGURE: i32 = 13;
pub const GDK_MAP: i32 = 14;

/// The fields of a `GdkEvent` this layer reads.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GdkEvent {
    pub event_type: i32,
    pub x: f64,
    pub y: f64,
    pub width: u32,
    pub height: u32,
    /// Modifier mask, X11 bit layout.
    pub state: u32,
    pub button: u32,
    pub hardware_keycode: u32,
    /// Motion hint: position and state must be queried from the pointer.
    pub is_hint: bool,
    /// Exposes still queued after this one.
    pub count: i32,
    /// Milliseconds.
    pub time: u32,
}

impl GdkEvent {
    pub fn expose(count: i32) -> Self {
        Self {
            event_type: GDK_EXPOSE,
            count,
            ..Default::default()
        }
    }

    pub fn configure(width: u32, height: u32) -> Self {
        Self {
            event_type: GDK_CONFIGURE,
            width,
            height,
            ..Default::default()
        }
    }

    pub fn map() -> Self {
        Self {
            event_type: GDK_MAP,
            ..Default::default()
        }
    }

    pub fn button(event_type: i32, button: u32, x: f64, y: f64, state: u32, time: u32) -> Self {
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

    pub fn key(event_type: i32, hardware_keycode: u32, state: u32, time: u32) -> Self {
        Self {
            event_type,
            hardware_keycode,
            state,
            time,
            ..Default::default()
        }
    }

    pub fn motion(x: f64, y: f64, state: u32, is_hint: bool, time: u32) -> Self {
        Self {
            event_type: GDK_MOTION_NOTIFY,
            x,
            y,
            state,
            is_hint,
            time,
            ..Default::default()
        }
    }

    pub(crate) fn translate(&self, translation: &mut Translation<'_>) -> NormalizedEvent {
        let (x, y) = (self.x as i32, self.y as i32);
        let modifiers = x_style_modifiers(self.state);
        let input = match self.event_type {
            GDK_EXPOSE if self.count > 0 => return NormalizedEvent::ExposeDeferred,
            GDK_EXPOSE => return NormalizedEvent::Expose,
            GDK_MAP => return NormalizedEvent::Initialise,
            GDK_CONFIGURE => {
                return NormalizedEvent::Resize {
                    width: self.width,
                    height: self.height,
                }
            }
            GDK_BUTTON_PRESS => {
                *translation.cursor = (x, y);
                InputEvent::button_press(self.button, x, y, modifiers)
            }
            GDK_BUTTON_RELEASE => {
                *translation.cursor = (x, y);
                InputEvent::button_release(self.button, x, y, modifiers)
            }
            // GDK follows every double/triple click with its own press events.
            GDK_2BUTTON_PRESS | GDK_3BUTTON_PRESS => return NormalizedEvent::Ignored,
            GDK_KEY_PRESS | GDK_KEY_RELEASE => {
                let (cx, cy) = *translation.cursor;
                if self.event_type == GDK_KEY_PRESS {
                    InputEvent::key_press(self.hardware_keycode, cx, cy, modifiers)
                } else {
                    InputEvent::key_release(self.hardware_keycode, cx, cy, modifiers)
                }
            }
            GDK_MOTION_NOTIFY => {
                let (x, y, modifiers) = if self.is_hint {
                    match (translation.query_pointer)() {
                        Some(pointer) => (pointer.x, pointer.y, pointer.modifiers),
                        None => (x, y, modifiers),
                    }
                } else {
                    (x, y, modifiers)
                };
                *translation.cursor = (x, y);
                InputEvent::motion(x, y, modifiers)
            }
            _ => return NormalizedEvent::Ignored,
        };
        NormalizedEvent::Input(input.at_time(u64::from(self.time)))
    }
}
