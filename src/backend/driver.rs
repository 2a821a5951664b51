//! The native boundary consumed by the surface layer
//!
//! A [`NativeDriver`] wraps one windowing system's primitives: querying
//! configurations against criteria, creating drawables and contexts
//! (optionally sharing), binding, swapping and releasing them. Everything
//! above this trait is backend neutral.

use super::{Criteria, DrawableKind, NativeConfig, QueryMechanism};
use crate::error::NativeError;
use crate::input::InputModifiers;

/// Opaque handle to a native GPU context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContextHandle(pub u64);

/// Opaque handle to a native drawable (window, pbuffer, pixmap, framebuffer object).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DrawableHandle(pub u64);

/// What to create a drawable as, and at what size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DrawableTarget {
    pub kind: DrawableKind,
    pub width: u32,
    pub height: u32,
}

/// One configuration query: the backend's native attribute list plus the
/// typed criteria it was built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigQuery<'a> {
    pub mechanism: QueryMechanism,
    pub selection_level: u32,
    pub attributes: &'a [i32],
    pub criteria: &'a Criteria,
}

/// Pointer position and modifier state sampled from the windowing system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PointerState {
    pub x: i32,
    pub y: i32,
    pub modifiers: InputModifiers,
}

/// Native windowing/graphics primitives for one backend family.
///
/// Calls happen on the thread that owns the native event loop and may
/// block for a driver round-trip.
pub trait NativeDriver: Send + Sync {
    /// Short name used in log messages.
    fn name(&self) -> &str;

    /// Whether a query mechanism exists on the running platform.
    fn supports_mechanism(&self, mechanism: QueryMechanism) -> bool;

    /// Configurations matching `query`, best first. An empty list is not an error.
    fn query_configs(&self, query: &ConfigQuery<'_>) -> Result<Vec<NativeConfig>, NativeError>;

    /// Look up one configuration by its native visual identifier.
    fn config_by_visual_id(&self, mechanism: QueryMechanism, visual_id: u32) -> Option<NativeConfig>;

    fn create_drawable(
        &self,
        config: &NativeConfig,
        target: DrawableTarget,
    ) -> Result<DrawableHandle, NativeError>;

    /// Create a context for `config`, sharing textures and display lists
    /// with `share_with` when given.
    fn create_context(
        &self,
        config: &NativeConfig,
        share_with: Option<ContextHandle>,
    ) -> Result<ContextHandle, NativeError>;

    /// Bind `context` with separate draw and read drawables. Drivers that
    /// cannot split them only accept `draw == read`.
    fn make_current(
        &self,
        draw: DrawableHandle,
        read: DrawableHandle,
        context: ContextHandle,
    ) -> Result<(), NativeError>;

    /// Whether `make_current` accepts `draw != read`.
    fn supports_separate_read(&self) -> bool;

    fn swap_buffers(&self, drawable: DrawableHandle) -> Result<(), NativeError>;

    fn drawable_size(&self, drawable: DrawableHandle) -> Result<(u32, u32), NativeError>;

    fn resize_drawable(
        &self,
        drawable: DrawableHandle,
        width: u32,
        height: u32,
    ) -> Result<(), NativeError>;

    /// Map/manage a window drawable.
    fn show_drawable(&self, drawable: DrawableHandle) -> Result<(), NativeError>;

    fn is_drawable_visible(&self, drawable: DrawableHandle) -> bool;

    /// Largest width or height an offscreen drawable may have.
    fn max_drawable_size(&self) -> u32;

    /// Current pointer state relative to `drawable`, for motion-hint events.
    fn pointer_state(&self, drawable: DrawableHandle) -> Option<PointerState>;

    fn destroy_context(&self, context: ContextHandle) -> Result<(), NativeError>;

    fn destroy_drawable(&self, drawable: DrawableHandle) -> Result<(), NativeError>;
}
