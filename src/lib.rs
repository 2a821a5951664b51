//! # Graphics Surface Library
//!
//! One rendering pipeline, many native windowing backends. This crate
//! negotiates a pixel format for a requested capability set, creates
//! onscreen and offscreen OpenGL surfaces, shares one GPU context across a
//! package of surfaces, and turns each backend's native events into one
//! neutral callback stream.
//!
//! ## Architecture
//!
//! - `capability`: requested and resolved capability sets
//! - `backend`: backend families, native query probes and the driver seam
//! - `negotiate`: progressive-relaxation pixel format search
//! - `package`: the surface package and its shared-context registry
//! - `surface`: surface lifecycle, geometry queries and callbacks
//! - `callback`: ordered callback lists and subscription tokens
//! - `input`: input events and native event normalization
//! - `config`: configuration parsing and management
//! - `logging`: optional `env_logger` bootstrap
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use graphics_surface::backend::simulated::SimulatedDriver;
//! use graphics_surface::{
//!     BackendFamily, BufferingMode, CapabilityRequest, QueryMechanism, SurfacePackage,
//! };
//!
//! fn main() -> graphics_surface::Result<()> {
//!     let driver = Arc::new(SimulatedDriver::with_typical_configs(&[QueryMechanism::GlxFbConfig]));
//!     let package = SurfacePackage::new(BackendFamily::X11Glx, driver);
//!     let request = CapabilityRequest::new()
//!         .with_buffering(BufferingMode::Double)
//!         .with_colour_depth(24)
//!         .with_depth_buffer_depth(16);
//!
//!     let window = package.create_onscreen(&request, 640, 480)?;
//!     window.make_current()?;
//!     window.swap_buffers()?;
//!     Ok(())
//! }
//! ```

pub mod backend;
pub mod callback;
pub mod capability;
pub mod config;
pub mod error;
pub mod input;
pub mod logging;
pub mod negotiate;
pub mod package;
pub mod surface;

// Re-export main types for easy access
pub use backend::{BackendConfig, BackendFamily, BackendProbe, NativeDriver, QueryMechanism};
pub use callback::{CallbackKind, CallbackList, InputNotification, Notification, Subscription};
pub use capability::{BufferingMode, CapabilityRequest, ResolvedCapabilities, StereoMode};
pub use config::SurfaceConfig;
pub use error::{ErrorCategory, NativeError, NativeErrorKind, Result, SurfaceError};
pub use input::{EventNormalizer, InputEvent, InputKind, InputModifiers, NormalizedEvent};
pub use negotiate::SurfaceNegotiator;
pub use package::{ShareRole, SharedContextRegistry, SurfacePackage};
pub use surface::{Surface, SurfaceId, SurfaceState, SurfaceVariant};

/// Version information for graphics-surface
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");
pub const BUILD_DATE: &str = env!("BUILD_DATE");
