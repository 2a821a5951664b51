//! Backend families and their configuration probes
//!
//! Every windowing system exposes its own way of asking for a pixel
//! configuration. This module gives each of them a [`BackendProbe`] that
//! turns a [`CapabilityRequest`] into criteria at a given selection level
//! and encodes those criteria as the backend's native attribute list.
//!
//! Supported families:
//! - `glx`: X11/GLX (GLX 1.3 FBConfig, then legacy visuals)
//! - `gtk`: GTK-GL areas
//! - `win32`: Win32/GDI (WGL ARB pixel formats, then `ChoosePixelFormat`)
//! - `agl`: Carbon/AGL
//! - `wx`: the wx portable widget toolkit

use crate::capability::{accumulation_channels, per_channel_minimum, CapabilityRequest, ResolvedCapabilities};
use crate::surface::SurfaceVariant;
use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::fmt;

pub mod agl;
pub mod driver;
pub mod glx;
pub mod gtk;
pub mod simulated;
pub mod win32;
pub mod wx;

pub use driver::{ConfigQuery, ContextHandle, DrawableHandle, DrawableTarget, NativeDriver, PointerState};

/// Depth buffer bits asked for when no depth buffer is required.
pub const PREFERRED_DEPTH_BITS: u32 = 16;

/// Alpha bits asked for when no alpha channel is required.
pub const PREFERRED_ALPHA_BITS: u32 = 1;

/// One native windowing/graphics API group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BackendFamily {
    X11Glx,
    GtkGl,
    Win32Gdi,
    CarbonAgl,
    Wx,
}

impl BackendFamily {
    /// The family selected by this build's target and features.
    pub fn native() -> Self {
        if cfg!(feature = "wx") {
            BackendFamily::Wx
        } else if cfg!(feature = "gtk") {
            BackendFamily::GtkGl
        } else if cfg!(target_os = "windows") {
            BackendFamily::Win32Gdi
        } else if cfg!(target_os = "macos") {
            BackendFamily::CarbonAgl
        } else {
            BackendFamily::X11Glx
        }
    }

    /// Probes for this family, most capable query mechanism first.
    pub fn probes(self) -> Vec<Box<dyn BackendProbe>> {
        match self {
            BackendFamily::X11Glx => vec![
                Box::new(glx::GlxFbConfigProbe),
                Box::new(glx::GlxVisualProbe),
            ],
            BackendFamily::GtkGl => vec![Box::new(gtk::GdkGlProbe)],
            BackendFamily::Win32Gdi => vec![
                Box::new(win32::WglArbProbe),
                Box::new(win32::GdiPixelFormatProbe),
            ],
            BackendFamily::CarbonAgl => vec![Box::new(agl::AglProbe)],
            BackendFamily::Wx => vec![Box::new(wx::WxAttributeProbe)],
        }
    }
}

/// A configuration query mechanism within a family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QueryMechanism {
    GlxFbConfig,
    GlxVisual,
    GdkGl,
    WglArb,
    GdiPixelFormat,
    AglPixelFormat,
    WxAttributes,
}

impl QueryMechanism {
    pub fn family(self) -> BackendFamily {
        match self {
            QueryMechanism::GlxFbConfig | QueryMechanism::GlxVisual => BackendFamily::X11Glx,
            QueryMechanism::GdkGl => BackendFamily::GtkGl,
            QueryMechanism::WglArb | QueryMechanism::GdiPixelFormat => BackendFamily::Win32Gdi,
            QueryMechanism::AglPixelFormat => BackendFamily::CarbonAgl,
            QueryMechanism::WxAttributes => BackendFamily::Wx,
        }
    }
}

/// Kind of native drawable a surface renders into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DrawableKind {
    Window,
    Pbuffer,
    Pixmap,
    Framebuffer,
}

impl DrawableKind {
    pub fn support_flag(self) -> DrawableSupport {
        match self {
            DrawableKind::Window => DrawableSupport::WINDOW,
            DrawableKind::Pbuffer => DrawableSupport::PBUFFER,
            DrawableKind::Pixmap => DrawableSupport::PIXMAP,
            DrawableKind::Framebuffer => DrawableSupport::FRAMEBUFFER,
        }
    }

    /// Pixmap contexts never take part in context sharing.
    pub fn can_share_context(self) -> bool {
        self != DrawableKind::Pixmap
    }
}

bitflags! {
    /// Drawable kinds a native configuration can render into.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct DrawableSupport: u32 {
        const WINDOW = 0b0001;
        const PBUFFER = 0b0010;
        const PIXMAP = 0b0100;
        const FRAMEBUFFER = 0b1000;
    }
}

bitflags! {
    /// Optional attributes asserted at a selection level.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Preferences: u8 {
        const ACCUMULATION = 0b0001;
        const ALPHA = 0b0010;
        const DEPTH = 0b0100;
        const DOUBLE_BUFFER = 0b1000;
    }
}

/// Backend-native configuration identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NativeConfigId(pub u64);

/// A configuration returned by a native query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NativeConfig {
    pub id: NativeConfigId,
    pub visual_id: u32,
    pub capabilities: ResolvedCapabilities,
    pub drawables: DrawableSupport,
}

/// Typed selection criteria for one query. `None` omits the criterion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Criteria {
    pub drawable: DrawableKind,
    pub red: u32,
    pub green: u32,
    pub blue: u32,
    pub alpha: Option<u32>,
    pub depth: Option<u32>,
    pub accumulation: Option<[u32; 3]>,
    pub double_buffer: Option<bool>,
    pub stereo: Option<bool>,
    /// Which of the optional attributes above are preferences rather than requirements.
    pub preferences: Preferences,
}

impl Criteria {
    /// Whether a native configuration meets every asserted criterion.
    pub fn accepts(&self, config: &NativeConfig) -> bool {
        let caps = &config.capabilities;
        config.drawables.contains(self.drawable.support_flag())
            && caps.red_bits >= self.red
            && caps.green_bits >= self.green
            && caps.blue_bits >= self.blue
            && self.alpha.map_or(true, |bits| caps.alpha_bits >= bits)
            && self.depth.map_or(true, |bits| caps.depth_bits >= bits)
            && self.accumulation.map_or(true, |[r, g, b]| {
                caps.accum_red_bits >= r && caps.accum_green_bits >= g && caps.accum_blue_bits >= b
            })
            && self
                .double_buffer
                .map_or(true, |double| caps.double_buffered == double)
            && self.stereo.map_or(true, |stereo| caps.stereo == stereo)
    }
}

/// Levels above which each optional preference is still asserted.
///
/// At level `L` a preference with threshold `t` is asserted when `L > t`.
/// `double_buffer` is `None` for backends that never prefer double
/// buffering on their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreferenceThresholds {
    pub accumulation: u32,
    pub alpha: u32,
    pub depth: u32,
    pub double_buffer: Option<u32>,
}

/// Build criteria for `request` at `level`.
///
/// Explicit minimums are asserted at every level; optional preferences
/// drop out one per level as `level` falls past their thresholds.
pub fn build_criteria(
    request: &CapabilityRequest,
    drawable: DrawableKind,
    level: u32,
    thresholds: PreferenceThresholds,
) -> Criteria {
    let colour = per_channel_minimum(request.min_colour_depth());
    let mut preferences = Preferences::empty();

    let alpha = if request.min_alpha_depth() > 0 {
        Some(request.min_alpha_depth())
    } else if level > thresholds.alpha {
        preferences |= Preferences::ALPHA;
        Some(PREFERRED_ALPHA_BITS)
    } else {
        None
    };

    let depth = if request.min_depth_buffer_depth() > 0 {
        Some(request.min_depth_buffer_depth())
    } else if level > thresholds.depth {
        preferences |= Preferences::DEPTH;
        Some(PREFERRED_DEPTH_BITS)
    } else {
        None
    };

    let accumulation = if request.min_accumulation_depth() > 0 {
        Some(accumulation_channels(request.min_accumulation_depth()))
    } else if level > thresholds.accumulation {
        preferences |= Preferences::ACCUMULATION;
        let channel = colour.max(1);
        Some([channel, channel, channel])
    } else {
        None
    };

    let double_buffer = match request.buffering().as_criterion() {
        Some(double) => Some(double),
        None => match thresholds.double_buffer {
            Some(threshold) if level > threshold => {
                preferences |= Preferences::DOUBLE_BUFFER;
                Some(true)
            }
            _ => None,
        },
    };

    Criteria {
        drawable,
        red: colour,
        green: colour,
        blue: colour,
        alpha,
        depth,
        accumulation,
        double_buffer,
        stereo: request.stereo().as_criterion(),
        preferences,
    }
}

/// Answers "can this query mechanism satisfy the request at level L".
pub trait BackendProbe: Send + Sync + fmt::Debug {
    fn mechanism(&self) -> QueryMechanism;

    fn family(&self) -> BackendFamily {
        self.mechanism().family()
    }

    /// Number of selection levels; level `selection_levels()` is strictest, level 1 loosest.
    fn selection_levels(&self) -> u32;

    fn thresholds(&self) -> PreferenceThresholds;

    /// Drawable used for `variant`, or `None` when the mechanism cannot produce it.
    fn drawable_for(&self, variant: SurfaceVariant) -> Option<DrawableKind>;

    /// Encode criteria as the backend's native attribute list.
    fn encode(&self, criteria: &Criteria) -> Vec<i32>;

    fn supports_variant(&self, variant: SurfaceVariant) -> bool {
        self.drawable_for(variant).is_some()
    }

    fn is_available(&self, driver: &dyn NativeDriver) -> bool {
        driver.supports_mechanism(self.mechanism())
    }

    fn criteria(
        &self,
        request: &CapabilityRequest,
        variant: SurfaceVariant,
        level: u32,
    ) -> Option<Criteria> {
        let drawable = self.drawable_for(variant)?;
        Some(build_criteria(request, drawable, level, self.thresholds()))
    }
}

/// Resolved backend configuration owned by one surface.
///
/// Other surfaces only ever see it as a read-only template when they need
/// to match it exactly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendConfig {
    mechanism: QueryMechanism,
    native: NativeConfig,
    selection_level: Option<u32>,
}

impl BackendConfig {
    pub(crate) fn new(mechanism: QueryMechanism, native: NativeConfig, selection_level: Option<u32>) -> Self {
        Self {
            mechanism,
            native,
            selection_level,
        }
    }

    pub fn family(&self) -> BackendFamily {
        self.mechanism.family()
    }

    pub fn mechanism(&self) -> QueryMechanism {
        self.mechanism
    }

    pub fn native(&self) -> &NativeConfig {
        &self.native
    }

    pub fn visual_id(&self) -> u32 {
        self.native.visual_id
    }

    pub fn resolved(&self) -> &ResolvedCapabilities {
        &self.native.capabilities
    }

    /// Level the relaxation search succeeded at; `None` for an explicit
    /// visual or a companion match.
    pub fn selection_level(&self) -> Option<u32> {
        self.selection_level
    }
}
