//! Surface packages
//!
//! A [`SurfacePackage`] is the explicit owner of everything that used to be
//! process-global in a graphics layer: the shared context registry, the
//! package-wide visual override and the "which surface is current" binding.
//! Every surface factory call goes through a package; surfaces only keep a
//! weak reference back to it.

use crate::backend::{
    BackendConfig, BackendFamily, ContextHandle, DrawableHandle, DrawableKind, DrawableTarget,
    NativeDriver,
};
use crate::capability::CapabilityRequest;
use crate::config::{OffscreenConfig, SurfaceConfig};
use crate::error::{NativeError, Result, SurfaceError};
use crate::negotiate::SurfaceNegotiator;
use crate::surface::{Surface, SurfaceId, SurfaceParts, SurfaceVariant};
use log::{debug, info, warn};
use parking_lot::Mutex;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

pub mod registry;

pub use registry::{ShareRole, SharedContextRegistry};

/// The package's current draw/read binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct CurrentBinding {
    pub surface: SurfaceId,
    pub draw: DrawableHandle,
    pub read: DrawableHandle,
    pub context: ContextHandle,
}

pub(crate) struct PackageInner {
    pub family: BackendFamily,
    pub driver: Arc<dyn NativeDriver>,
    pub negotiator: SurfaceNegotiator,
    pub registry: SharedContextRegistry,
    pub override_visual_id: Mutex<Option<u32>>,
    pub offscreen: OffscreenConfig,
    pub defaults: CapabilityRequest,
    pub current: Mutex<Option<CurrentBinding>>,
    next_surface: AtomicU64,
}

impl PackageInner {
    fn next_surface_id(&self) -> SurfaceId {
        SurfaceId(self.next_surface.fetch_add(1, Ordering::Relaxed))
    }

    /// Forget the current binding if it belongs to `surface`.
    pub fn release_binding(&self, surface: SurfaceId) {
        let mut current = self.current.lock();
        if current.map_or(false, |binding| binding.surface == surface) {
            *current = None;
        }
    }
}

impl Drop for PackageInner {
    fn drop(&mut self) {
        self.registry.teardown(self.driver.as_ref());
    }
}

/// Explicitly constructed, explicitly destroyed owner of package state.
pub struct SurfacePackage {
    inner: Arc<PackageInner>,
}

impl fmt::Debug for SurfacePackage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SurfacePackage")
            .field("family", &self.inner.family)
            .field("driver", &self.inner.driver.name())
            .field("shared_context", &self.inner.registry.shared_context())
            .field("override_visual_id", &*self.inner.override_visual_id.lock())
            .finish()
    }
}

impl SurfacePackage {
    /// A package for `family` with default settings.
    pub fn new(family: BackendFamily, driver: Arc<dyn NativeDriver>) -> Self {
        Self::build(family, driver, &SurfaceConfig::default())
    }

    /// A package configured from `config`. The family falls back to the
    /// build's native family when the configuration names none.
    pub fn from_config(config: &SurfaceConfig, driver: Arc<dyn NativeDriver>) -> Self {
        let family = config.backend.family.unwrap_or_else(BackendFamily::native);
        Self::build(family, driver, config)
    }

    fn build(family: BackendFamily, driver: Arc<dyn NativeDriver>, config: &SurfaceConfig) -> Self {
        let mut negotiator = SurfaceNegotiator::new(family, driver.clone());
        for &mechanism in &config.backend.disabled_mechanisms {
            debug!("Disabling {:?} by configuration", mechanism);
            negotiator.disable_mechanism(mechanism);
        }
        info!("📦 Surface package for {:?} on driver {}", family, driver.name());

        Self {
            inner: Arc::new(PackageInner {
                family,
                driver,
                negotiator,
                registry: SharedContextRegistry::new(),
                override_visual_id: Mutex::new(config.backend.override_visual_id),
                offscreen: config.offscreen.clone(),
                defaults: config.defaults,
                current: Mutex::new(None),
                next_surface: AtomicU64::new(1),
            }),
        }
    }

    pub fn family(&self) -> BackendFamily {
        self.inner.family
    }

    pub fn driver(&self) -> &Arc<dyn NativeDriver> {
        &self.inner.driver
    }

    pub fn negotiator(&self) -> &SurfaceNegotiator {
        &self.inner.negotiator
    }

    /// The request used when a caller has no preferences of its own.
    pub fn default_request(&self) -> CapabilityRequest {
        self.inner.defaults
    }

    /// Apply `visual_id` to every later surface whose request has none.
    pub fn set_override_visual_id(&self, visual_id: Option<u32>) {
        *self.inner.override_visual_id.lock() = visual_id;
    }

    pub fn override_visual_id(&self) -> Option<u32> {
        *self.inner.override_visual_id.lock()
    }

    pub fn shared_context(&self) -> Option<ContextHandle> {
        self.inner.registry.shared_context()
    }

    pub fn current_surface(&self) -> Option<SurfaceId> {
        self.inner.current.lock().map(|binding| binding.surface)
    }

    pub fn create_onscreen(&self, request: &CapabilityRequest, width: u32, height: u32) -> Result<Surface> {
        self.create_surface(SurfaceVariant::OnscreenWindow, request, width, height, None)
    }

    pub fn create_offscreen_shared(
        &self,
        request: &CapabilityRequest,
        width: u32,
        height: u32,
    ) -> Result<Surface> {
        self.create_surface(SurfaceVariant::OffscreenShared, request, width, height, None)
    }

    pub fn create_offscreen_exclusive(
        &self,
        request: &CapabilityRequest,
        width: u32,
        height: u32,
    ) -> Result<Surface> {
        self.create_surface(SurfaceVariant::OffscreenExclusive, request, width, height, None)
    }

    /// A shared offscreen surface with `companion`'s exact configuration.
    pub fn create_offscreen_from_surface(
        &self,
        width: u32,
        height: u32,
        companion: &Surface,
    ) -> Result<Surface> {
        self.create_surface(
            SurfaceVariant::OffscreenShared,
            &CapabilityRequest::new(),
            width,
            height,
            Some(companion),
        )
    }

    /// Negotiate, materialize and return a ready surface.
    ///
    /// With a `companion`, the relaxation search is skipped and the
    /// companion's configuration is reused; `request` is then ignored.
    pub fn create_surface(
        &self,
        variant: SurfaceVariant,
        request: &CapabilityRequest,
        width: u32,
        height: u32,
        companion: Option<&Surface>,
    ) -> Result<Surface> {
        let (width, height) = match variant {
            SurfaceVariant::OnscreenWindow => (width, height),
            _ => self.offscreen_size(width, height),
        };
        let inner = &self.inner;
        let driver = inner.driver.as_ref();

        let materialize = |config: &BackendConfig,
                           kind: DrawableKind|
         -> std::result::Result<(DrawableHandle, ContextHandle, ShareRole), NativeError> {
            let target = DrawableTarget { kind, width, height };
            let drawable = driver.create_drawable(config.native(), target)?;
            let eligible = variant.can_share() && kind.can_share_context();
            let created = inner
                .registry
                .create_context(eligible, |share| driver.create_context(config.native(), share));
            match created {
                Ok((context, role)) => Ok((drawable, context, role)),
                Err(e) => {
                    if let Err(release) = driver.destroy_drawable(drawable) {
                        warn!("Failed to release drawable {:?} after context failure: {}", drawable, release);
                    }
                    Err(e)
                }
            }
        };

        let negotiated = match companion {
            Some(companion) => {
                let template = companion.config().ok_or(SurfaceError::InvalidSurface {
                    surface: companion.id(),
                    reason: "companion surface is destroyed",
                })?;
                inner.negotiator.match_companion(template, variant, materialize)?
            }
            None => {
                let override_visual = *inner.override_visual_id.lock();
                inner
                    .negotiator
                    .negotiate(request, variant, override_visual, materialize)?
            }
        };

        let (drawable, context, role) = negotiated.materialized;
        let id = inner.next_surface_id();
        info!(
            "🖼️ Created {:?} surface {:?} {}x{} with visual 0x{:x} ({:?})",
            variant,
            id,
            width,
            height,
            negotiated.config.visual_id(),
            role
        );

        Ok(Surface::materialized(
            id,
            variant,
            Arc::downgrade(&self.inner),
            SurfaceParts {
                driver: inner.driver.clone(),
                config: negotiated.config,
                drawable_kind: negotiated.drawable,
                drawable,
                context,
                role,
                width,
                height,
            },
        ))
    }

    fn offscreen_size(&self, width: u32, height: u32) -> (u32, u32) {
        let settings = &self.inner.offscreen;
        let width = if width == 0 { settings.default_width } else { width };
        let height = if height == 0 { settings.default_height } else { height };

        let mut limit = self.inner.driver.max_drawable_size();
        if let Some(cap) = settings.max_size {
            limit = limit.min(cap);
        }
        if width > limit || height > limit {
            warn!(
                "Offscreen size {}x{} exceeds maximum {}, clamping",
                width, height, limit
            );
        }
        (width.min(limit), height.min(limit))
    }

    /// Tear the package down, releasing the shared context exactly once.
    ///
    /// Surfaces that outlive the package keep working for operations that
    /// only need their own resources; package-level operations on them
    /// return [`SurfaceError::PackageDestroyed`].
    pub fn destroy(self) {
        info!("Destroying surface package for {:?}", self.inner.family);
        self.inner.registry.teardown(self.inner.driver.as_ref());
    }
}
