//! Carbon/AGL probe

use super::{BackendProbe, Criteria, DrawableKind, PreferenceThresholds, QueryMechanism};
use crate::surface::SurfaceVariant;

pub const AGL_NONE: i32 = 0;
pub const AGL_RGBA: i32 = 4;
pub const AGL_DOUBLEBUFFER: i32 = 5;
pub const AGL_STEREO: i32 = 6;
pub const AGL_RED_SIZE: i32 = 8;
pub const AGL_GREEN_SIZE: i32 = 9;
pub const AGL_BLUE_SIZE: i32 = 10;
pub const AGL_ALPHA_SIZE: i32 = 11;
pub const AGL_DEPTH_SIZE: i32 = 12;
pub const AGL_ACCUM_RED_SIZE: i32 = 14;
pub const AGL_ACCUM_GREEN_SIZE: i32 = 15;
pub const AGL_ACCUM_BLUE_SIZE: i32 = 16;
pub const AGL_ACCELERATED: i32 = 73;
pub const AGL_WINDOW: i32 = 80;
pub const AGL_PBUFFER: i32 = 90;

/// `aglChoosePixelFormat`, five levels, windows and pbuffers.
#[derive(Debug, Clone, Copy, Default)]
pub struct AglProbe;

impl BackendProbe for AglProbe {
    fn mechanism(&self) -> QueryMechanism {
        QueryMechanism::AglPixelFormat
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
                Some(DrawableKind::Pbuffer)
            }
            SurfaceVariant::Invalid => None,
        }
    }

    fn encode(&self, criteria: &Criteria) -> Vec<i32> {
        let target = match criteria.drawable {
            DrawableKind::Window => AGL_WINDOW,
            _ => AGL_PBUFFER,
        };
        let mut attributes = vec![AGL_RGBA, target, AGL_ACCELERATED];
        if criteria.double_buffer == Some(true) {
            attributes.push(AGL_DOUBLEBUFFER);
        }
        if criteria.stereo == Some(true) {
            attributes.push(AGL_STEREO);
        }
        attributes.extend_from_slice(&[
            AGL_RED_SIZE,
            criteria.red as i32,
            AGL_GREEN_SIZE,
            criteria.green as i32,
            AGL_BLUE_SIZE,
            criteria.blue as i32,
        ]);
        if let Some(alpha) = criteria.alpha {
            attributes.extend_from_slice(&[AGL_ALPHA_SIZE, alpha as i32]);
        }
        if let Some(depth) = criteria.depth {
            attributes.extend_from_slice(&[AGL_DEPTH_SIZE, depth as i32]);
        }
        if let Some([red, green, blue]) = criteria.accumulation {
            attributes.extend_from_slice(&[
                AGL_ACCUM_RED_SIZE,
                red as i32,
                AGL_ACCUM_GREEN_SIZE,
                green as i32,
                AGL_ACCUM_BLUE_SIZE,
                blue as i32,
            ]);
        }
        attributes.push(AGL_NONE);
        attributes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::CapabilityRequest;

    #[test]
    fn test_pbuffer_target_and_acceleration() {
        let criteria = AglProbe
            .criteria(&CapabilityRequest::new(), SurfaceVariant::OffscreenExclusive, 5)
            .unwrap();
        let attributes = AglProbe.encode(&criteria);
        assert_eq!(&attributes[..4], &[AGL_RGBA, AGL_PBUFFER, AGL_ACCELERATED, AGL_DOUBLEBUFFER]);
        assert_eq!(attributes.last(), Some(&AGL_NONE));
    }
}
