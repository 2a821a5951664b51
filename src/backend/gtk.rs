//! GTK-GL area probe
//!
//! The GTK family only renders into widget windows. Its attribute list
//! follows the GLX visual layout: booleans are bare flags.

use super::{BackendProbe, Criteria, DrawableKind, PreferenceThresholds, QueryMechanism};
use crate::surface::SurfaceVariant;

pub const GDK_GL_NONE: i32 = 0;
pub const GDK_GL_BUFFER_SIZE: i32 = 2;
pub const GDK_GL_RGBA: i32 = 4;
pub const GDK_GL_DOUBLEBUFFER: i32 = 5;
pub const GDK_GL_STEREO: i32 = 6;
pub const GDK_GL_RED_SIZE: i32 = 8;
pub const GDK_GL_GREEN_SIZE: i32 = 9;
pub const GDK_GL_BLUE_SIZE: i32 = 10;
pub const GDK_GL_ALPHA_SIZE: i32 = 11;
pub const GDK_GL_DEPTH_SIZE: i32 = 12;
pub const GDK_GL_ACCUM_RED_SIZE: i32 = 14;
pub const GDK_GL_ACCUM_GREEN_SIZE: i32 = 15;
pub const GDK_GL_ACCUM_BLUE_SIZE: i32 = 16;

#[derive(Debug, Clone, Copy, Default)]
pub struct GdkGlProbe;

impl BackendProbe for GdkGlProbe {
    fn mechanism(&self) -> QueryMechanism {
        QueryMechanism::GdkGl
    }

    fn selection_levels(&self) -> u32 {
        4
    }

    fn thresholds(&self) -> PreferenceThresholds {
        PreferenceThresholds {
            accumulation: 3,
            alpha: 2,
            depth: 1,
            double_buffer: None,
        }
    }

    fn drawable_for(&self, variant: SurfaceVariant) -> Option<DrawableKind> {
        match variant {
            SurfaceVariant::OnscreenWindow => Some(DrawableKind::Window),
            _ => None,
        }
    }

    fn encode(&self, criteria: &Criteria) -> Vec<i32> {
        let mut attributes = vec![GDK_GL_RGBA];
        if criteria.double_buffer == Some(true) {
            attributes.push(GDK_GL_DOUBLEBUFFER);
        }
        if criteria.stereo == Some(true) {
            attributes.push(GDK_GL_STEREO);
        }
        attributes.extend_from_slice(&[
            GDK_GL_RED_SIZE,
            criteria.red as i32,
            GDK_GL_GREEN_SIZE,
            criteria.green as i32,
            GDK_GL_BLUE_SIZE,
            criteria.blue as i32,
        ]);
        if let Some(alpha) = criteria.alpha {
            attributes.extend_from_slice(&[GDK_GL_ALPHA_SIZE, alpha as i32]);
        }
        if let Some(depth) = criteria.depth {
            attributes.extend_from_slice(&[GDK_GL_DEPTH_SIZE, depth as i32]);
        }
        if let Some([red, green, blue]) = criteria.accumulation {
            attributes.extend_from_slice(&[
                GDK_GL_ACCUM_RED_SIZE,
                red as i32,
                GDK_GL_ACCUM_GREEN_SIZE,
                green as i32,
                GDK_GL_ACCUM_BLUE_SIZE,
                blue as i32,
            ]);
        }
        attributes.push(GDK_GL_NONE);
        attributes
    }
}
