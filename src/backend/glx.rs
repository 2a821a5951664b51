//! X11/GLX probes
//!
//! GLX 1.3 servers are asked for FBConfigs first; older servers fall back
//! to the legacy `glXChooseVisual` path, whose boolean attributes carry no
//! value and can only be asserted, never denied.

use super::{BackendProbe, Criteria, DrawableKind, PreferenceThresholds, QueryMechanism};
use crate::surface::SurfaceVariant;

pub const GLX_NONE: i32 = 0;
pub const GLX_BUFFER_SIZE: i32 = 2;
pub const GLX_RGBA: i32 = 4;
pub const GLX_DOUBLEBUFFER: i32 = 5;
pub const GLX_STEREO: i32 = 6;
pub const GLX_RED_SIZE: i32 = 8;
pub const GLX_GREEN_SIZE: i32 = 9;
pub const GLX_BLUE_SIZE: i32 = 10;
pub const GLX_ALPHA_SIZE: i32 = 11;
pub const GLX_DEPTH_SIZE: i32 = 12;
pub const GLX_ACCUM_RED_SIZE: i32 = 14;
pub const GLX_ACCUM_GREEN_SIZE: i32 = 15;
pub const GLX_ACCUM_BLUE_SIZE: i32 = 16;
pub const GLX_ACCUM_ALPHA_SIZE: i32 = 17;

pub const GLX_DRAWABLE_TYPE: i32 = 0x8010;
pub const GLX_RENDER_TYPE: i32 = 0x8011;
pub const GLX_RGBA_BIT: i32 = 0x0001;
pub const GLX_WINDOW_BIT: i32 = 0x0001;
pub const GLX_PIXMAP_BIT: i32 = 0x0002;
pub const GLX_PBUFFER_BIT: i32 = 0x0004;

fn push_sizes(attributes: &mut Vec<i32>, criteria: &Criteria) {
    attributes.extend_from_slice(&[
        GLX_RED_SIZE,
        criteria.red as i32,
        GLX_GREEN_SIZE,
        criteria.green as i32,
        GLX_BLUE_SIZE,
        criteria.blue as i32,
    ]);
    if let Some(alpha) = criteria.alpha {
        attributes.extend_from_slice(&[GLX_ALPHA_SIZE, alpha as i32]);
    }
    if let Some(depth) = criteria.depth {
        attributes.extend_from_slice(&[GLX_DEPTH_SIZE, depth as i32]);
    }
    if let Some([red, green, blue]) = criteria.accumulation {
        attributes.extend_from_slice(&[
            GLX_ACCUM_RED_SIZE,
            red as i32,
            GLX_ACCUM_GREEN_SIZE,
            green as i32,
            GLX_ACCUM_BLUE_SIZE,
            blue as i32,
        ]);
    }
}

/// GLX 1.3 FBConfig selection, six levels.
#[derive(Debug, Clone, Copy, Default)]
pub struct GlxFbConfigProbe;

impl BackendProbe for GlxFbConfigProbe {
    fn mechanism(&self) -> QueryMechanism {
        QueryMechanism::GlxFbConfig
    }

    fn selection_levels(&self) -> u32 {
        6
    }

    fn thresholds(&self) -> PreferenceThresholds {
        PreferenceThresholds {
            accumulation: 5,
            alpha: 4,
            depth: 3,
            double_buffer: Some(2),
        }
    }

    fn drawable_for(&self, variant: SurfaceVariant) -> Option<DrawableKind> {
        match variant {
            SurfaceVariant::OnscreenWindow => Some(DrawableKind::Window),
            SurfaceVariant::OffscreenShared | SurfaceVariant::OffscreenExclusive => {
                Some(DrawableKind::Pbuffer)
            }
            SurfaceVariant::Invalid => None,
        }
    }

    fn encode(&self, criteria: &Criteria) -> Vec<i32> {
        let drawable_bit = match criteria.drawable {
            DrawableKind::Window => GLX_WINDOW_BIT,
            DrawableKind::Pixmap => GLX_PIXMAP_BIT,
            DrawableKind::Pbuffer | DrawableKind::Framebuffer => GLX_PBUFFER_BIT,
        };
        let mut attributes = vec![
            GLX_DRAWABLE_TYPE,
            drawable_bit,
            GLX_RENDER_TYPE,
            GLX_RGBA_BIT,
        ];
        push_sizes(&mut attributes, criteria);
        if let Some(double) = criteria.double_buffer {
            attributes.extend_from_slice(&[GLX_DOUBLEBUFFER, double as i32]);
        }
        if let Some(stereo) = criteria.stereo {
            attributes.extend_from_slice(&[GLX_STEREO, stereo as i32]);
        }
        attributes.push(GLX_NONE);
        attributes
    }
}

/// Legacy GLX visual selection, five levels. Offscreen surfaces use pixmaps.
#[derive(Debug, Clone, Copy, Default)]
pub struct GlxVisualProbe;

impl BackendProbe for GlxVisualProbe {
    fn mechanism(&self) -> QueryMechanism {
        QueryMechanism::GlxVisual
    }

    fn selection_levels(&self) -> u32 {
        5
    }

    fn thresholds(&self) -> PreferenceThresholds {
        PreferenceThresholds {
            accumulation: 4,
            alpha: 3,
            depth: 2,
            double_buffer: Some(1),
        }
    }

    fn drawable_for(&self, variant: SurfaceVariant) -> Option<DrawableKind> {
        match variant {
            SurfaceVariant::OnscreenWindow => Some(DrawableKind::Window),
            SurfaceVariant::OffscreenShared | SurfaceVariant::OffscreenExclusive => {
                Some(DrawableKind::Pixmap)
            }
            SurfaceVariant::Invalid => None,
        }
    }

    fn encode(&self, criteria: &Criteria) -> Vec<i32> {
        let mut attributes = vec![GLX_RGBA];
        if criteria.double_buffer == Some(true) {
            attributes.push(GLX_DOUBLEBUFFER);
        }
        if criteria.stereo == Some(true) {
            attributes.push(GLX_STEREO);
        }
        push_sizes(&mut attributes, criteria);
        attributes.push(GLX_NONE);
        attributes
    }
}
