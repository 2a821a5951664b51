//! Native event normalization and dispatch
//!
//! One [`EventNormalizer`] serves one surface. It translates native events,
//! coalesces expose bursts into a single full-surface expose, stamps input
//! events with a sequence number and pushes the result into the surface's
//! callback lists.

use super::native::{NativeEvent, Translation};
use super::InputEvent;
use crate::surface::Surface;
use log::{debug, trace};

/// What a native event turned into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NormalizedEvent {
    Initialise,
    Resize { width: u32, height: u32 },
    /// Last expose of a burst; redraw the whole surface.
    Expose,
    /// More exposes are queued behind this one.
    ExposeDeferred,
    Input(InputEvent),
    Ignored,
}

/// Per-surface event normalizer.
#[derive(Debug)]
pub struct EventNormalizer {
    cursor: (i32, i32),
    next_sequence: u64,
    initialised: bool,
    deferred_exposes: u64,
}

impl Default for EventNormalizer {
    fn default() -> Self {
        Self {
            cursor: (-1, -1),
            next_sequence: 0,
            initialised: false,
            deferred_exposes: 0,
        }
    }
}

impl EventNormalizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last known pointer position; `(-1, -1)` before the pointer entered
    /// and after it left.
    pub fn cursor(&self) -> (i32, i32) {
        self.cursor
    }

    /// Exposes suppressed so far.
    pub fn deferred_exposes(&self) -> u64 {
        self.deferred_exposes
    }

    /// Translate `event` for `surface` without dispatching it.
    pub fn normalize(&mut self, surface: &Surface, event: &NativeEvent) -> NormalizedEvent {
        let query_pointer = || surface.pointer_state();
        let mut translation = Translation {
            cursor: &mut self.cursor,
            query_pointer: &query_pointer,
        };

        match event.translate(&mut translation) {
            NormalizedEvent::Initialise if self.initialised => NormalizedEvent::Ignored,
            NormalizedEvent::Initialise => {
                self.initialised = true;
                NormalizedEvent::Initialise
            }
            NormalizedEvent::ExposeDeferred => {
                self.deferred_exposes += 1;
                NormalizedEvent::ExposeDeferred
            }
            NormalizedEvent::Input(input) => {
                let sequence = self.next_sequence;
                self.next_sequence += 1;
                NormalizedEvent::Input(input.with_sequence(sequence))
            }
            other => other,
        }
    }

    /// Translate `event` and dispatch it to `surface`'s callbacks.
    /// Returns the number of callbacks that ran.
    pub fn deliver(&mut self, surface: &mut Surface, event: &NativeEvent) -> usize {
        let normalized = self.normalize(surface, event);
        trace!("{:?} -> {:?}", event, normalized);

        match normalized {
            NormalizedEvent::Initialise => surface.dispatch_initialise(),
            NormalizedEvent::Resize { width, height } => {
                debug!("Surface {:?} resized to {}x{}", surface.id(), width, height);
                surface.dispatch_resize(width, height)
            }
            NormalizedEvent::Expose => surface.dispatch_expose(),
            NormalizedEvent::Input(input) => surface.dispatch_input(input),
            NormalizedEvent::ExposeDeferred | NormalizedEvent::Ignored => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::simulated::SimulatedDriver;
    use crate::backend::{BackendFamily, PointerState, QueryMechanism};
    use crate::callback::CallbackKind;
    use crate::capability::CapabilityRequest;
    use crate::input::native::carbon::{self, CarbonEvent};
    use crate::input::native::gdk::{self, GdkEvent};
    use crate::input::native::win32::{self, make_point_lparam, Win32Message};
    use crate::input::native::wx::{WxEvent, WxModifiers, WxMouse, WX_MOUSE_BTN_RIGHT};
    use crate::input::native::x11::{self, XEvent};
    use crate::input::{InputKind, InputModifiers};
    use crate::package::SurfacePackage;
    use std::sync::{Arc, Mutex};

    fn window() -> (Arc<SimulatedDriver>, SurfacePackage, Surface) {
        let driver = Arc::new(SimulatedDriver::with_typical_configs(&[QueryMechanism::GlxFbConfig]));
        let package = SurfacePackage::new(BackendFamily::X11Glx, driver.clone());
        let surface = package
            .create_onscreen(&CapabilityRequest::new(), 200, 100)
            .unwrap();
        (driver, package, surface)
    }

    fn input_of(event: NormalizedEvent) -> InputEvent {
        match event {
            NormalizedEvent::Input(input) => input,
            other => panic!("expected input, got {:?}", other),
        }
    }

    #[test]
    fn test_expose_burst_dispatches_once() {
        let (_driver, _package, mut surface) = window();
        let exposes = Arc::new(Mutex::new(Vec::new()));
        let seen = exposes.clone();
        surface
            .add_expose_callback(move |n| seen.lock().unwrap().push((n.width, n.height)))
            .unwrap();

        let mut normalizer = EventNormalizer::new();
        for count in (0..5).rev() {
            normalizer.deliver(&mut surface, &XEvent::expose(count).into());
        }

        assert_eq!(*exposes.lock().unwrap(), vec![(200, 100)]);
        assert_eq!(normalizer.deferred_exposes(), 4);
    }

    #[test]
    fn test_callback_lists_are_independent() {
        let (_driver, _package, mut surface) = window();
        let hits = Arc::new(Mutex::new(Vec::new()));
        for kind in ["init", "resize", "expose", "input"] {
            let hits = hits.clone();
            let record = move || hits.lock().unwrap().push(kind);
            match kind {
                "init" => surface.add_initialise_callback(move |_| record()).unwrap(),
                "resize" => surface.add_resize_callback(move |_| record()).unwrap(),
                "expose" => surface.add_expose_callback(move |_| record()).unwrap(),
                _ => surface.add_input_callback(move |_| record()).unwrap(),
            };
        }

        let mut normalizer = EventNormalizer::new();
        normalizer.deliver(&mut surface, &XEvent::configure(300, 150).into());
        assert_eq!(*hits.lock().unwrap(), vec!["resize"]);

        normalizer.deliver(&mut surface, &XEvent::motion(1, 1, 0, 0).into());
        assert_eq!(*hits.lock().unwrap(), vec!["resize", "input"]);
        assert_eq!(surface.callback_count(CallbackKind::Input), 1);
    }

    #[test]
    fn test_initialise_only_once() {
        let (_driver, _package, mut surface) = window();
        let count = Arc::new(Mutex::new(0));
        let seen = count.clone();
        surface
            .add_initialise_callback(move |_| *seen.lock().unwrap() += 1)
            .unwrap();

        let mut normalizer = EventNormalizer::new();
        normalizer.deliver(&mut surface, &XEvent::map().into());
        normalizer.deliver(&mut surface, &XEvent::map().into());
        assert_eq!(*count.lock().unwrap(), 1);
    }

    #[test]
    fn test_x11_modifiers_and_sequence() {
        let (_driver, _package, surface) = window();
        let mut normalizer = EventNormalizer::new();

        let press = input_of(normalizer.normalize(
            &surface,
            &XEvent::button(x11::BUTTON_PRESS, 1, 10, 20, x11::SHIFT_MASK, 500).into(),
        ));
        assert_eq!(press.kind(), InputKind::ButtonPress);
        assert_eq!(press.button(), 1);
        assert_eq!(press.modifiers(), InputModifiers::SHIFT);
        assert_eq!(press.time_ms(), 500);

        let drag = input_of(normalizer.normalize(
            &surface,
            &XEvent::motion(12, 22, x11::BUTTON1_MASK | x11::CONTROL_MASK, 510).into(),
        ));
        assert_eq!(drag.kind(), InputKind::PointerMotion);
        assert_eq!(drag.button(), 0);
        assert_eq!(
            drag.modifiers(),
            InputModifiers::BUTTON1 | InputModifiers::CONTROL
        );
        assert_eq!((press.sequence(), drag.sequence()), (0, 1));
    }

    #[test]
    fn test_gdk_motion_hint_queries_pointer() {
        let (driver, _package, surface) = window();
        driver.set_pointer_state(Some(PointerState {
            x: 40,
            y: 50,
            modifiers: InputModifiers::ALT,
        }));
        let mut normalizer = EventNormalizer::new();

        let hinted = input_of(normalizer.normalize(&surface, &GdkEvent::motion(1.0, 2.0, 0, true, 7).into()));
        assert_eq!(hinted.position(), (40, 50));
        assert_eq!(hinted.modifiers(), InputModifiers::ALT);

        let plain = input_of(normalizer.normalize(&surface, &GdkEvent::motion(3.5, 4.5, 0, false, 8).into()));
        assert_eq!(plain.position(), (3, 4));
    }

    #[test]
    fn test_gdk_keys_use_last_cursor_and_multi_clicks_are_ignored() {
        let (_driver, _package, surface) = window();
        let mut normalizer = EventNormalizer::new();
        normalizer.normalize(&surface, &GdkEvent::motion(15.0, 25.0, 0, false, 1).into());

        let key = input_of(normalizer.normalize(
            &surface,
            &GdkEvent::key(gdk::GDK_KEY_PRESS, 38, 0, 2).into(),
        ));
        assert_eq!(key.kind(), InputKind::KeyPress);
        assert_eq!(key.key_code(), 38);
        assert_eq!(key.position(), (15, 25));

        let double = GdkEvent::button(gdk::GDK_2BUTTON_PRESS, 1, 0.0, 0.0, 0, 3);
        assert_eq!(normalizer.normalize(&surface, &double.into()), NormalizedEvent::Ignored);
    }

    #[test]
    fn test_win32_messages() {
        let (_driver, _package, surface) = window();
        let mut normalizer = EventNormalizer::new();

        let down = Win32Message::new(
            win32::WM_RBUTTONDOWN,
            win32::MK_CONTROL,
            make_point_lparam(-5, 30),
        );
        let press = input_of(normalizer.normalize(&surface, &down.into()));
        assert_eq!(press.button(), 3);
        assert_eq!(press.position(), (-5, 30));
        assert_eq!(press.modifiers(), InputModifiers::CONTROL);

        let alt_key = Win32Message::new(win32::WM_SYSKEYDOWN, 0x46, 0);
        let key = input_of(normalizer.normalize(&surface, &alt_key.into()));
        assert_eq!(key.kind(), InputKind::KeyPress);
        assert_eq!(key.key_code(), 0x46);
        assert!(key.modifiers().contains(InputModifiers::ALT));
        assert_eq!(key.position(), (-5, 30));

        let size = Win32Message::new(win32::WM_SIZE, 0, make_point_lparam(640, 480));
        assert_eq!(
            normalizer.normalize(&surface, &size.into()),
            NormalizedEvent::Resize {
                width: 640,
                height: 480
            }
        );
    }

    #[test]
    fn test_carbon_buttons_and_time() {
        let (_driver, _package, surface) = window();
        let mut normalizer = EventNormalizer::new();

        let secondary = CarbonEvent::mouse(
            carbon::EVENT_MOUSE_DOWN,
            carbon::MOUSE_BUTTON_SECONDARY,
            8,
            9,
            carbon::OPTION_KEY | carbon::SHIFT_KEY,
            0,
        )
        .at_time(2.5);
        let press = input_of(normalizer.normalize(&surface, &secondary.into()));
        assert_eq!(press.button(), 3);
        assert_eq!(press.time_ms(), 2500);
        assert_eq!(press.modifiers(), InputModifiers::ALT | InputModifiers::SHIFT);

        let dragged = CarbonEvent::mouse(carbon::EVENT_MOUSE_DRAGGED, 0, 10, 11, 0, 1);
        let motion = input_of(normalizer.normalize(&surface, &dragged.into()));
        assert_eq!(motion.kind(), InputKind::PointerMotion);
        assert_eq!(motion.modifiers(), InputModifiers::BUTTON1);
    }

    #[test]
    fn test_wx_cursor_tracking_and_invalid_buttons() {
        let (_driver, _package, surface) = window();
        let mut normalizer = EventNormalizer::new();

        let drag = WxMouse {
            x: 30,
            y: 40,
            dragging: true,
            left_is_down: true,
            ..Default::default()
        };
        let motion = input_of(normalizer.normalize(&surface, &WxEvent::Mouse(drag).into()));
        assert_eq!(motion.modifiers(), InputModifiers::BUTTON1);
        assert_eq!(normalizer.cursor(), (30, 40));

        let key = WxEvent::Key {
            up: false,
            key_code: 65,
            modifiers: WxModifiers {
                shift: true,
                ..Default::default()
            },
            timestamp: 99,
        };
        let pressed = input_of(normalizer.normalize(&surface, &key.into()));
        assert_eq!(pressed.position(), (30, 40));

        let leave = WxMouse {
            leaving: true,
            ..Default::default()
        };
        assert_eq!(
            normalizer.normalize(&surface, &WxEvent::Mouse(leave).into()),
            NormalizedEvent::Ignored
        );
        assert_eq!(normalizer.cursor(), (-1, -1));

        let bogus = WxMouse {
            button_down: true,
            button: 7,
            ..Default::default()
        };
        assert_eq!(
            normalizer.normalize(&surface, &WxEvent::Mouse(bogus).into()),
            NormalizedEvent::Ignored
        );

        let right = WxMouse {
            button_up: true,
            button: WX_MOUSE_BTN_RIGHT,
            ..Default::default()
        };
        let release = input_of(normalizer.normalize(&surface, &WxEvent::Mouse(right).into()));
        assert_eq!(release.kind(), InputKind::ButtonRelease);
        assert_eq!(release.button(), 3);
    }

    #[test]
    fn test_wx_plain_moves_only_track_the_cursor() {
        let (_driver, _package, surface) = window();
        let mut normalizer = EventNormalizer::new();
        assert_eq!(normalizer.cursor(), (-1, -1));

        let key = WxEvent::Key {
            up: false,
            key_code: 32,
            modifiers: Default::default(),
            timestamp: 1,
        };
        let early = input_of(normalizer.normalize(&surface, &key.into()));
        assert_eq!(early.position(), (-1, -1));

        let moved = WxMouse {
            x: 5,
            y: 6,
            left_is_down: true,
            ..Default::default()
        };
        assert_eq!(
            normalizer.normalize(&surface, &WxEvent::Mouse(moved).into()),
            NormalizedEvent::Ignored
        );
        assert_eq!(normalizer.cursor(), (5, 6));

        let dragged = WxMouse {
            dragging: true,
            button_down: true,
            button: WX_MOUSE_BTN_RIGHT,
            ..moved
        };
        let motion = input_of(normalizer.normalize(&surface, &WxEvent::Mouse(dragged).into()));
        assert_eq!(motion.kind(), InputKind::PointerMotion);
        assert_eq!(motion.position(), (5, 6));
    }

    #[test]
    fn test_destroyed_surface_receives_nothing() {
        let (_driver, _package, mut surface) = window();
        let count = Arc::new(Mutex::new(0));
        let seen = count.clone();
        surface
            .add_expose_callback(move |_| *seen.lock().unwrap() += 1)
            .unwrap();
        surface.destroy().unwrap();

        let mut normalizer = EventNormalizer::new();
        assert_eq!(normalizer.deliver(&mut surface, &XEvent::expose(0).into()), 0);
        assert_eq!(*count.lock().unwrap(), 0);
    }
}
