//! wx toolkit probe
//!
//! wx canvases render into windows; offscreen surfaces are framebuffer
//! objects attached to the package's shared context, so only the shared
//! offscreen variant exists.

use super::{BackendProbe, Criteria, DrawableKind, PreferenceThresholds, QueryMechanism};
use crate::surface::SurfaceVariant;

pub const WX_GL_RGBA: i32 = 1;
pub const WX_GL_BUFFER_SIZE: i32 = 2;
pub const WX_GL_DOUBLEBUFFER: i32 = 4;
pub const WX_GL_STEREO: i32 = 5;
pub const WX_GL_MIN_RED: i32 = 7;
pub const WX_GL_MIN_GREEN: i32 = 8;
pub const WX_GL_MIN_BLUE: i32 = 9;
pub const WX_GL_MIN_ALPHA: i32 = 10;
pub const WX_GL_DEPTH_SIZE: i32 = 11;
pub const WX_GL_STENCIL_SIZE: i32 = 12;
pub const WX_GL_MIN_ACCUM_RED: i32 = 13;
pub const WX_GL_MIN_ACCUM_GREEN: i32 = 14;
pub const WX_GL_MIN_ACCUM_BLUE: i32 = 15;
pub const WX_GL_MIN_ACCUM_ALPHA: i32 = 16;

#[derive(Debug, Clone, Copy, Default)]
pub struct WxAttributeProbe;

impl BackendProbe for WxAttributeProbe {
    fn mechanism(&self) -> QueryMechanism {
        QueryMechanism::WxAttributes
    }

    fn selection_levels(&self) -> u32 {
        5
    }

    fn thresholds(&self) -> PreferenceThresholds {
        PreferenceThresholds {
            accumulation: 4,
            alpha: 3,
            depth: 2,
            double_buffer: None,
        }
    }

    fn drawable_for(&self, variant: SurfaceVariant) -> Option<DrawableKind> {
        match variant {
            SurfaceVariant::OnscreenWindow => Some(DrawableKind::Window),
            SurfaceVariant::OffscreenShared => Some(DrawableKind::Framebuffer),
            SurfaceVariant::OffscreenExclusive | SurfaceVariant::Invalid => None,
        }
    }

    fn encode(&self, criteria: &Criteria) -> Vec<i32> {
        let mut attributes = vec![WX_GL_RGBA];
        if criteria.double_buffer == Some(true) {
            attributes.push(WX_GL_DOUBLEBUFFER);
        }
        if criteria.stereo == Some(true) {
            attributes.push(WX_GL_STEREO);
        }
        attributes.extend_from_slice(&[
            WX_GL_MIN_RED,
            criteria.red as i32,
            WX_GL_MIN_GREEN,
            criteria.green as i32,
            WX_GL_MIN_BLUE,
            criteria.blue as i32,
        ]);
        if let Some(alpha) = criteria.alpha {
            attributes.extend_from_slice(&[WX_GL_MIN_ALPHA, alpha as i32]);
        }
        if let Some(depth) = criteria.depth {
            attributes.extend_from_slice(&[WX_GL_DEPTH_SIZE, depth as i32]);
        }
        if let Some([red, green, blue]) = criteria.accumulation {
            attributes.extend_from_slice(&[
                WX_GL_MIN_ACCUM_RED,
                red as i32,
                WX_GL_MIN_ACCUM_GREEN,
                green as i32,
                WX_GL_MIN_ACCUM_BLUE,
                blue as i32,
            ]);
        }
        attributes.push(0);
        attributes
    }
}
