//! Native event representations, one module per backend family
//!
//! Each module models the fields its windowing system delivers and
//! translates them into a [`NormalizedEvent`]. Modifier bits are mapped one
//! by one since every backend puts them at different positions.

use super::normalizer::NormalizedEvent;
use super::InputModifiers;
use crate::backend::PointerState;

pub mod carbon;
pub mod gdk;
pub mod win32;
pub mod wx;
pub mod x11;

pub use carbon::CarbonEvent;
pub use gdk::GdkEvent;
pub use win32::Win32Message;
pub use wx::WxEvent;
pub use x11::XEvent;

/// Conventional button numbers shared by every backend.
pub const BUTTON_LEFT: u32 = 1;
pub const BUTTON_MIDDLE: u32 = 2;
pub const BUTTON_RIGHT: u32 = 3;

/// Any backend's native event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NativeEvent {
    X11(XEvent),
    Gdk(GdkEvent),
    Win32(Win32Message),
    Carbon(CarbonEvent),
    Wx(WxEvent),
}

impl From<XEvent> for NativeEvent {
    fn from(event: XEvent) -> Self {
        NativeEvent::X11(event)
    }
}

impl From<GdkEvent> for NativeEvent {
    fn from(event: GdkEvent) -> Self {
        NativeEvent::Gdk(event)
    }
}

impl From<Win32Message> for NativeEvent {
    fn from(event: Win32Message) -> Self {
        NativeEvent::Win32(event)
    }
}

impl From<CarbonEvent> for NativeEvent {
    fn from(event: CarbonEvent) -> Self {
        NativeEvent::Carbon(event)
    }
}

impl From<WxEvent> for NativeEvent {
    fn from(event: WxEvent) -> Self {
        NativeEvent::Wx(event)
    }
}

/// State a translation may read or update.
pub(crate) struct Translation<'a> {
    /// Last known pointer position, for backends whose key events carry none.
    pub cursor: &'a mut (i32, i32),
    /// Samples the pointer from the windowing system, for motion hints.
    pub query_pointer: &'a dyn Fn() -> Option<PointerState>,
}

impl NativeEvent {
    pub(crate) fn translate(&self, translation: &mut Translation<'_>) -> NormalizedEvent {
        match self {
            NativeEvent::X11(event) => event.translate(translation),
            NativeEvent::Gdk(event) => event.translate(translation),
            NativeEvent::Win32(event) => event.translate(translation),
            NativeEvent::Carbon(event) => event.translate(translation),
            NativeEvent::Wx(event) => event.translate(translation),
        }
    }
}

/// Map an X-style modifier mask (X11 and GDK share the bit layout).
pub(crate) fn x_style_modifiers(state: u32) -> InputModifiers {
    let mut modifiers = InputModifiers::empty();
    if state & x11::SHIFT_MASK != 0 {
        modifiers |= InputModifiers::SHIFT;
    }
    if state & x11::CONTROL_MASK != 0 {
        modifiers |= InputModifiers::CONTROL;
    }
    if state & x11::MOD1_MASK != 0 {
        modifiers |= InputModifiers::ALT;
    }
    if state & x11::BUTTON1_MASK != 0 {
        modifiers |= InputModifiers::BUTTON1;
    }
    modifiers
}
