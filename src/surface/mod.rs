//! Rendering surfaces and their lifecycle
//!
//! A [`Surface`] is only ever handed out fully materialized: it owns its
//! backend configuration, its native drawable, its context (unless that
//! context is the package's shared one) and four callback lists. Once
//! destroyed, every operation fails with [`SurfaceError::InvalidSurface`]
//! and touches nothing.

use crate::backend::{
    BackendConfig, BackendFamily, ContextHandle, DrawableHandle, DrawableKind, NativeDriver,
    PointerState,
};
use crate::callback::{CallbackKind, CallbackList, InputNotification, Notification, Subscription};
use crate::capability::{BufferingMode, StereoMode};
use crate::error::{Result, SurfaceError};
use crate::input::InputEvent;
use crate::package::{CurrentBinding, PackageInner, ShareRole};
use log::{debug, info, warn};
use std::fmt;
use std::sync::{Arc, Weak};

/// Package-unique surface identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SurfaceId(pub u64);

/// What a surface renders into, which decides sharing eligibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SurfaceVariant {
    OnscreenWindow,
    OffscreenShared,
    OffscreenExclusive,
    Invalid,
}

impl SurfaceVariant {
    /// Whether contexts of this variant share with, or seed, the package's
    /// shared context.
    pub fn can_share(self) -> bool {
        matches!(self, SurfaceVariant::OnscreenWindow | SurfaceVariant::OffscreenShared)
    }

    pub fn is_offscreen(self) -> bool {
        matches!(
            self,
            SurfaceVariant::OffscreenShared | SurfaceVariant::OffscreenExclusive
        )
    }
}

/// Lifecycle states. `Destroyed` is terminal and `Negotiating` is never
/// re-entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SurfaceState {
    Uninitialized,
    Negotiating,
    Ready,
    Destroyed,
}

impl SurfaceState {
    pub fn can_transition_to(self, next: SurfaceState) -> bool {
        matches!(
            (self, next),
            (SurfaceState::Uninitialized, SurfaceState::Negotiating)
                | (SurfaceState::Negotiating, SurfaceState::Ready)
                | (SurfaceState::Uninitialized, SurfaceState::Destroyed)
                | (SurfaceState::Negotiating, SurfaceState::Destroyed)
                | (SurfaceState::Ready, SurfaceState::Destroyed)
        )
    }
}

/// Everything a successful negotiation produced for one surface.
pub(crate) struct SurfaceParts {
    pub driver: Arc<dyn NativeDriver>,
    pub config: BackendConfig,
    pub drawable_kind: DrawableKind,
    pub drawable: DrawableHandle,
    pub context: ContextHandle,
    pub role: ShareRole,
    pub width: u32,
    pub height: u32,
}

/// Native resources, present only while the surface is ready.
struct Resources {
    config: BackendConfig,
    drawable_kind: DrawableKind,
    drawable: DrawableHandle,
    context: ContextHandle,
    role: ShareRole,
}

pub struct Surface {
    id: SurfaceId,
    family: BackendFamily,
    variant: SurfaceVariant,
    state: SurfaceState,
    package: Weak<PackageInner>,
    driver: Arc<dyn NativeDriver>,
    resources: Option<Resources>,
    width: u32,
    height: u32,
    border_width: u32,
    initialise: CallbackList<Notification>,
    resize: CallbackList<Notification>,
    expose: CallbackList<Notification>,
    input: CallbackList<InputNotification>,
}

impl fmt::Debug for Surface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Surface")
            .field("id", &self.id)
            .field("family", &self.family)
            .field("variant", &self.variant)
            .field("state", &self.state)
            .field("visual_id", &self.config().map(BackendConfig::visual_id))
            .field("context", &self.context())
            .field("size", &(self.width, self.height))
            .finish()
    }
}

impl Surface {
    pub(crate) fn materialized(
        id: SurfaceId,
        variant: SurfaceVariant,
        package: Weak<PackageInner>,
        parts: SurfaceParts,
    ) -> Self {
        let mut state = SurfaceState::Uninitialized;
        for next in [SurfaceState::Negotiating, SurfaceState::Ready] {
            debug_assert!(state.can_transition_to(next));
            state = next;
        }

        Self {
            id,
            family: parts.config.family(),
            variant,
            state,
            package,
            driver: parts.driver,
            resources: Some(Resources {
                config: parts.config,
                drawable_kind: parts.drawable_kind,
                drawable: parts.drawable,
                context: parts.context,
                role: parts.role,
            }),
            width: parts.width,
            height: parts.height,
            border_width: 0,
            initialise: CallbackList::new(),
            resize: CallbackList::new(),
            expose: CallbackList::new(),
            input: CallbackList::new(),
        }
    }

    fn ready(&self) -> Result<&Resources> {
        match (&self.state, &self.resources) {
            (SurfaceState::Ready, Some(resources)) => Ok(resources),
            (SurfaceState::Destroyed, _) => Err(SurfaceError::InvalidSurface {
                surface: self.id,
                reason: "destroyed",
            }),
            _ => Err(SurfaceError::InvalidSurface {
                surface: self.id,
                reason: "not ready",
            }),
        }
    }

    fn package(&self) -> Result<Arc<PackageInner>> {
        self.package.upgrade().ok_or(SurfaceError::PackageDestroyed)
    }

    fn window_only(&self, operation: &'static str) -> Result<&Resources> {
        let resources = self.ready()?;
        if resources.drawable_kind != DrawableKind::Window {
            return Err(SurfaceError::Unsupported {
                family: self.family,
                operation,
            });
        }
        Ok(resources)
    }

    pub fn id(&self) -> SurfaceId {
        self.id
    }

    pub fn family(&self) -> BackendFamily {
        self.family
    }

    pub fn variant(&self) -> SurfaceVariant {
        self.variant
    }

    pub fn state(&self) -> SurfaceState {
        self.state
    }

    /// Family and variant; a destroyed surface reports `Invalid`.
    pub fn kind(&self) -> (BackendFamily, SurfaceVariant) {
        match self.state {
            SurfaceState::Ready => (self.family, self.variant),
            _ => (self.family, SurfaceVariant::Invalid),
        }
    }

    /// The negotiated configuration, `None` once destroyed.
    pub fn config(&self) -> Option<&BackendConfig> {
        self.resources.as_ref().map(|resources| &resources.config)
    }

    pub fn context(&self) -> Option<ContextHandle> {
        self.resources.as_ref().map(|resources| resources.context)
    }

    pub fn drawable(&self) -> Option<DrawableHandle> {
        self.resources.as_ref().map(|resources| resources.drawable)
    }

    pub fn share_role(&self) -> Option<ShareRole> {
        self.resources.as_ref().map(|resources| resources.role)
    }

    /// Bind this surface for drawing and reading. Any other surface of the
    /// package stops being current.
    pub fn make_current(&self) -> Result<()> {
        let resources = self.ready()?;
        let package = self.package()?;
        self.driver
            .make_current(resources.drawable, resources.drawable, resources.context)?;
        *package.current.lock() = Some(CurrentBinding {
            surface: self.id,
            draw: resources.drawable,
            read: resources.drawable,
            context: resources.context,
        });
        Ok(())
    }

    /// Read from this surface while drawing to the currently bound one.
    pub fn make_read_current(&self) -> Result<()> {
        let resources = self.ready()?;
        let package = self.package()?;
        if !self.driver.supports_separate_read() {
            return Err(SurfaceError::Unsupported {
                family: self.family,
                operation: "make_read_current",
            });
        }

        let mut current = package.current.lock();
        let binding = current.ok_or(SurfaceError::NoCurrentSurface)?;
        self.driver
            .make_current(binding.draw, resources.drawable, binding.context)?;
        *current = Some(CurrentBinding {
            read: resources.drawable,
            ..binding
        });
        Ok(())
    }

    /// Whether this surface is the package's draw surface.
    pub fn is_current(&self) -> bool {
        self.state == SurfaceState::Ready
            && self.package.upgrade().map_or(false, |package| {
                package
                    .current
                    .lock()
                    .map_or(false, |binding| binding.surface == self.id)
            })
    }

    pub fn swap_buffers(&self) -> Result<()> {
        let resources = self.ready()?;
        self.driver.swap_buffers(resources.drawable)?;
        Ok(())
    }

    /// Current size in pixels. Windows report what the windowing system
    /// says; offscreen surfaces keep their creation size.
    pub fn size(&self) -> Result<(u32, u32)> {
        let resources = self.ready()?;
        Ok(self.driver.drawable_size(resources.drawable)?)
    }

    pub fn width(&self) -> Result<u32> {
        self.size().map(|(width, _)| width)
    }

    pub fn height(&self) -> Result<u32> {
        self.size().map(|(_, height)| height)
    }

    pub fn visual_id(&self) -> Result<u32> {
        Ok(self.ready()?.config.visual_id())
    }

    pub fn colour_depth(&self) -> Result<u32> {
        Ok(self.ready()?.config.resolved().colour_depth())
    }

    pub fn depth_buffer_depth(&self) -> Result<u32> {
        Ok(self.ready()?.config.resolved().depth_bits)
    }

    pub fn accumulation_depth(&self) -> Result<u32> {
        Ok(self.ready()?.config.resolved().accumulation_depth())
    }

    pub fn buffering_mode(&self) -> Result<BufferingMode> {
        Ok(self.ready()?.config.resolved().buffering_mode())
    }

    pub fn stereo_mode(&self) -> Result<StereoMode> {
        Ok(self.ready()?.config.resolved().stereo_mode())
    }

    /// Whether the native window is shown. Offscreen and destroyed
    /// surfaces are never visible.
    pub fn is_visible(&self) -> bool {
        self.ready()
            .map(|resources| self.driver.is_drawable_visible(resources.drawable))
            .unwrap_or(false)
    }

    /// Show (manage) a window-backed surface.
    pub fn awaken(&self) -> Result<()> {
        let resources = self.window_only("awaken")?;
        self.driver.show_drawable(resources.drawable)?;
        debug!("Awakened surface {:?}", self.id);
        Ok(())
    }

    pub fn set_width(&mut self, width: u32) -> Result<()> {
        let (_, height) = self.size()?;
        self.resize_window(width, height)
    }

    pub fn set_height(&mut self, height: u32) -> Result<()> {
        let (width, _) = self.size()?;
        self.resize_window(width, height)
    }

    fn resize_window(&mut self, width: u32, height: u32) -> Result<()> {
        let drawable = self.window_only("resize")?.drawable;
        self.driver.resize_drawable(drawable, width, height)?;
        self.width = width;
        self.height = height;
        Ok(())
    }

    pub fn border_width(&self) -> Result<u32> {
        self.window_only("border_width")?;
        Ok(self.border_width)
    }

    pub fn set_border_width(&mut self, border_width: u32) -> Result<()> {
        self.window_only("set_border_width")?;
        self.border_width = border_width;
        Ok(())
    }

    /// Pointer state sampled from the windowing system.
    pub fn pointer_state(&self) -> Option<PointerState> {
        let resources = self.ready().ok()?;
        self.driver.pointer_state(resources.drawable)
    }

    pub fn add_initialise_callback<F>(&mut self, callback: F) -> Result<Subscription>
    where
        F: FnMut(&Notification) + Send + 'static,
    {
        self.ready()?;
        let id = self.initialise.add(callback);
        Ok(Subscription::new(self.id, CallbackKind::Initialise, id))
    }

    pub fn add_resize_callback<F>(&mut self, callback: F) -> Result<Subscription>
    where
        F: FnMut(&Notification) + Send + 'static,
    {
        self.ready()?;
        let id = self.resize.add(callback);
        Ok(Subscription::new(self.id, CallbackKind::Resize, id))
    }

    pub fn add_expose_callback<F>(&mut self, callback: F) -> Result<Subscription>
    where
        F: FnMut(&Notification) + Send + 'static,
    {
        self.ready()?;
        let id = self.expose.add(callback);
        Ok(Subscription::new(self.id, CallbackKind::Expose, id))
    }

    pub fn add_input_callback<F>(&mut self, callback: F) -> Result<Subscription>
    where
        F: FnMut(&InputNotification) + Send + 'static,
    {
        self.ready()?;
        let id = self.input.add(callback);
        Ok(Subscription::new(self.id, CallbackKind::Input, id))
    }

    /// Remove one registration. Returns false for a subscription that is
    /// already gone or belongs to another surface.
    pub fn remove_callback(&mut self, subscription: Subscription) -> Result<bool> {
        self.ready()?;
        if subscription.surface() != self.id {
            return Ok(false);
        }
        let removed = match subscription.kind() {
            CallbackKind::Initialise => self.initialise.remove(subscription.id()),
            CallbackKind::Resize => self.resize.remove(subscription.id()),
            CallbackKind::Expose => self.expose.remove(subscription.id()),
            CallbackKind::Input => self.input.remove(subscription.id()),
        };
        Ok(removed)
    }

    pub fn callback_count(&self, kind: CallbackKind) -> usize {
        match kind {
            CallbackKind::Initialise => self.initialise.len(),
            CallbackKind::Resize => self.resize.len(),
            CallbackKind::Expose => self.expose.len(),
            CallbackKind::Input => self.input.len(),
        }
    }

    fn notification(&self) -> Notification {
        Notification {
            surface: self.id,
            width: self.width,
            height: self.height,
        }
    }

    /// Run the initialise callbacks. Returns how many ran.
    pub fn dispatch_initialise(&mut self) -> usize {
        if self.ready().is_err() {
            return 0;
        }
        let notification = self.notification();
        self.initialise.dispatch(&notification)
    }

    /// Record the new size and run the resize callbacks.
    pub fn dispatch_resize(&mut self, width: u32, height: u32) -> usize {
        if self.ready().is_err() {
            return 0;
        }
        self.width = width;
        self.height = height;
        let notification = self.notification();
        self.resize.dispatch(&notification)
    }

    /// Run the expose callbacks for the whole surface.
    pub fn dispatch_expose(&mut self) -> usize {
        if self.ready().is_err() {
            return 0;
        }
        if let Ok((width, height)) = self.size() {
            self.width = width;
            self.height = height;
        }
        let notification = self.notification();
        self.expose.dispatch(&notification)
    }

    pub fn dispatch_input(&mut self, input: InputEvent) -> usize {
        if self.ready().is_err() {
            return 0;
        }
        let notification = InputNotification {
            surface: self.id,
            input,
        };
        self.input.dispatch(&notification)
    }

    /// Release the surface's native resources.
    ///
    /// The drawable and configuration always go; the context goes unless it
    /// is the package's registered shared context. Native release failures
    /// are logged and destruction carries on.
    pub fn destroy(&mut self) -> Result<()> {
        self.ready()?;
        self.release();
        Ok(())
    }

    fn release(&mut self) {
        let Some(resources) = self.resources.take() else {
            return;
        };

        if let Some(package) = self.package.upgrade() {
            package.release_binding(self.id);
        }

        if let Err(e) = self.driver.destroy_drawable(resources.drawable) {
            warn!(
                "Failed to release drawable {:?} of surface {:?}: {}",
                resources.drawable, self.id, e
            );
        }
        if resources.role != ShareRole::Registered {
            if let Err(e) = self.driver.destroy_context(resources.context) {
                warn!(
                    "Failed to release context {:?} of surface {:?}: {}",
                    resources.context, self.id, e
                );
            }
        }

        self.initialise.clear();
        self.resize.clear();
        self.expose.clear();
        self.input.clear();
        debug_assert!(self.state.can_transition_to(SurfaceState::Destroyed));
        self.state = SurfaceState::Destroyed;
        info!("Destroyed {:?} surface {:?}", self.variant, self.id);
    }
}

impl Drop for Surface {
    fn drop(&mut self) {
        self.release();
    }
}
