//! wx canvas events

use super::{Translation, BUTTON_LEFT, BUTTON_MIDDLE, BUTTON_RIGHT};
use crate::input::normalizer::NormalizedEvent;
use crate::input::{InputEvent, InputModifiers};
use log::error;

pub const WX_MOUSE_BTN_LEFT: i32 = 1;
pub const WX_MOUSE_BTN_MIDDLE: i32 = 2;
pub const WX_MOUSE_BTN_RIGHT: i32 = 3;

/// Keyboard modifier flags as wx reports them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WxModifiers {
    pub shift: bool,
    pub control: bool,
    pub alt: bool,
}

impl WxModifiers {
    fn to_input(self) -> InputModifiers {
        let mut modifiers = InputModifiers::empty();
        if self.shift {
            modifiers |= InputModifiers::SHIFT;
        }
        if self.control {
            modifiers |= InputModifiers::CONTROL;
        }
        if self.alt {
            modifiers |= InputModifiers::ALT;
        }
        modifiers
    }
}

/// A `wxMouseEvent`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WxMouse {
    pub x: i32,
    pub y: i32,
    pub dragging: bool,
    pub leaving: bool,
    pub button_down: bool,
    pub button_up: bool,
    /// `WX_MOUSE_BTN_*`; anything else is an invalid button.
    pub button: i32,
    pub left_is_down: bool,
    pub modifiers: WxModifiers,
    pub timestamp: i64,
}

/// Events a wx GL canvas forwards to this layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WxEvent {
    Create,
    Paint,
    Size { width: u32, height: u32 },
    Key {
        up: bool,
        key_code: u32,
        modifiers: WxModifiers,
        timestamp: i64,
    },
    Mouse(WxMouse),
}

impl WxEvent {
    pub(crate) fn translate(&self, translation: &mut Translation<'_>) -> NormalizedEvent {
        match *self {
            WxEvent::Create => NormalizedEvent::Initialise,
            WxEvent::Paint => NormalizedEvent::Expose,
            WxEvent::Size { width, height } => NormalizedEvent::Resize { width, height },
            WxEvent::Key {
                up,
                key_code,
                modifiers,
                timestamp,
            } => {
                let (x, y) = *translation.cursor;
                let input = if up {
                    InputEvent::key_release(key_code, x, y, modifiers.to_input())
                } else {
                    InputEvent::key_press(key_code, x, y, modifiers.to_input())
                };
                NormalizedEvent::Input(input.at_time(timestamp.max(0) as u64))
            }
            WxEvent::Mouse(mouse) => translate_mouse(&mouse, translation),
        }
    }
}

fn translate_mouse(mouse: &WxMouse, translation: &mut Translation<'_>) -> NormalizedEvent {
    if mouse.leaving {
        *translation.cursor = (-1, -1);
        return NormalizedEvent::Ignored;
    }

    *translation.cursor = (mouse.x, mouse.y);
    let mut modifiers = mouse.modifiers.to_input();

    let input = if mouse.dragging {
        if mouse.left_is_down {
            modifiers |= InputModifiers::BUTTON1;
        }
        InputEvent::motion(mouse.x, mouse.y, modifiers)
    } else if mouse.button_down || mouse.button_up {
        let button = match mouse.button {
            WX_MOUSE_BTN_LEFT => BUTTON_LEFT,
            WX_MOUSE_BTN_MIDDLE => BUTTON_MIDDLE,
            WX_MOUSE_BTN_RIGHT => BUTTON_RIGHT,
            other => {
                error!("Dropping mouse event with invalid button {}", other);
                return NormalizedEvent::Ignored;
            }
        };
        if mouse.button_down {
            InputEvent::button_press(button, mouse.x, mouse.y, modifiers)
        } else {
            InputEvent::button_release(button, mouse.x, mouse.y, modifiers)
        }
    } else {
        // Plain moves, enter and wheel only update the cursor.
        return NormalizedEvent::Ignored;
    };
    NormalizedEvent::Input(input.at_time(mouse.timestamp.max(0) as u64))
}
