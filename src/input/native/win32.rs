//! Win32 window messages

use super::{Translation, BUTTON_LEFT, BUTTON_MIDDLE, BUTTON_RIGHT};
use crate::input::normalizer::NormalizedEvent;
use crate::input::{InputEvent, InputModifiers};

pub const WM_CREATE: u32 = 0x0001;
pub const WM_SIZE: u32 = 0x0005;
pub const WM_PAINT: u32 = 0x000F;
pub const WM_KEYDOWN: u32 = 0x0100;
pub const WM_KEYUP: u32 = 0x0101;
pub const WM_SYSKEYDOWN: u32 = 0x0104;
pub const WM_SYSKEYUP: u32 = 0x0105;
pub const WM_MOUSEMOVE: u32 = 0x0200;
pub const WM_LBUTTONDOWN: u32 = 0x0201;
pub const WM_LBUTTONUP: u32 = 0x0202;
pub const WM_RBUTTONDOWN: u32 = 0x0204;
pub const WM_RBUTTONUP: u32 = 0x0205;
pub const WM_MBUTTONDOWN: u32 = 0x0207;
pub const WM_MBUTTONUP: u32 = 0x0208;

pub const MK_LBUTTON: u64 = 0x0001;
pub const MK_SHIFT: u64 = 0x0004;
pub const MK_CONTROL: u64 = 0x0008;

/// `GetKeyState` samples taken when the message was retrieved.
pub const KEY_STATE_SHIFT: u32 = 0x1;
pub const KEY_STATE_CONTROL: u32 = 0x2;
pub const KEY_STATE_MENU: u32 = 0x4;

/// A window message plus the key state sampled alongside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Win32Message {
    pub message: u32,
    pub wparam: u64,
    pub lparam: i64,
    /// Milliseconds, from `GetMessageTime`.
    pub time: u32,
    pub key_state: u32,
}

/// Pack a client-area point the way mouse messages carry it.
pub fn make_point_lparam(x: i16, y: i16) -> i64 {
    i64::from(((y as u16 as u32) << 16) | (x as u16 as u32))
}

impl Win32Message {
    pub fn new(message: u32, wparam: u64, lparam: i64) -> Self {
        Self {
            message,
            wparam,
            lparam,
            ..Default::default()
        }
    }

    pub fn with_key_state(mut self, key_state: u32) -> Self {
        self.key_state = key_state;
        self
    }

    pub fn at_time(mut self, time: u32) -> Self {
        self.time = time;
        self
    }

    fn point(&self) -> (i32, i32) {
        let x = (self.lparam & 0xFFFF) as u16 as i16;
        let y = ((self.lparam >> 16) & 0xFFFF) as u16 as i16;
        (i32::from(x), i32::from(y))
    }

    fn size(&self) -> (u32, u32) {
        ((self.lparam & 0xFFFF) as u32, ((self.lparam >> 16) & 0xFFFF) as u32)
    }

    fn mouse_modifiers(&self) -> InputModifiers {
        let mut modifiers = InputModifiers::empty();
        if self.wparam & MK_SHIFT != 0 {
            modifiers |= InputModifiers::SHIFT;
        }
        if self.wparam & MK_CONTROL != 0 {
            modifiers |= InputModifiers::CONTROL;
        }
        if self.key_state & KEY_STATE_MENU != 0 {
            modifiers |= InputModifiers::ALT;
        }
        if self.wparam & MK_LBUTTON != 0 {
            modifiers |= InputModifiers::BUTTON1;
        }
        modifiers
    }

    fn key_modifiers(&self) -> InputModifiers {
        let mut modifiers = InputModifiers::empty();
        if self.key_state & KEY_STATE_SHIFT != 0 {
            modifiers |= InputModifiers::SHIFT;
        }
        if self.key_state & KEY_STATE_CONTROL != 0 {
            modifiers |= InputModifiers::CONTROL;
        }
        if self.key_state & KEY_STATE_MENU != 0
            || matches!(self.message, WM_SYSKEYDOWN | WM_SYSKEYUP)
        {
            modifiers |= InputModifiers::ALT;
        }
        modifiers
    }

    pub(crate) fn translate(&self, translation: &mut Translation<'_>) -> NormalizedEvent {
        let input = match self.message {
            WM_CREATE => return NormalizedEvent::Initialise,
            // Windows already merges invalid regions into one WM_PAINT.
            WM_PAINT => return NormalizedEvent::Expose,
            WM_SIZE => {
                let (width, height) = self.size();
                return NormalizedEvent::Resize { width, height };
            }
            WM_LBUTTONDOWN | WM_MBUTTONDOWN | WM_RBUTTONDOWN | WM_LBUTTONUP | WM_MBUTTONUP
            | WM_RBUTTONUP => {
                let (x, y) = self.point();
                *translation.cursor = (x, y);
                let button = match self.message {
                    WM_LBUTTONDOWN | WM_LBUTTONUP => BUTTON_LEFT,
                    WM_MBUTTONDOWN | WM_MBUTTONUP => BUTTON_MIDDLE,
                    _ => BUTTON_RIGHT,
                };
                if matches!(self.message, WM_LBUTTONDOWN | WM_MBUTTONDOWN | WM_RBUTTONDOWN) {
                    InputEvent::button_press(button, x, y, self.mouse_modifiers())
                } else {
                    InputEvent::button_release(button, x, y, self.mouse_modifiers())
                }
            }
            WM_MOUSEMOVE => {
                let (x, y) = self.point();
                *translation.cursor = (x, y);
                InputEvent::motion(x, y, self.mouse_modifiers())
            }
            WM_KEYDOWN | WM_SYSKEYDOWN => {
                let (x, y) = *translation.cursor;
                InputEvent::key_press(self.wparam as u32, x, y, self.key_modifiers())
            }
            WM_KEYUP | WM_SYSKEYUP => {
                let (x, y) = *translation.cursor;
                InputEvent::key_release(self.wparam as u32, x, y, self.key_modifiers())
            }
            _ => return NormalizedEvent::Ignored,
        };
        NormalizedEvent::Input(input.at_time(u64::from(self.time)))
    }
}
