//! Win32 probes
//!
//! `wglChoosePixelFormatARB` is tried first and can produce pbuffers. Without
//! the extension, `ChoosePixelFormat` takes a descriptor instead of an
//! attribute list; offscreen surfaces then render into a DIB section and
//! cannot share.

use super::{BackendProbe, Criteria, DrawableKind, PreferenceThresholds, QueryMechanism};
use crate::surface::SurfaceVariant;

pub const WGL_DRAW_TO_WINDOW_ARB: i32 = 0x2001;
pub const WGL_SUPPORT_OPENGL_ARB: i32 = 0x2010;
pub const WGL_DOUBLE_BUFFER_ARB: i32 = 0x2011;
pub const WGL_STEREO_ARB: i32 = 0x2012;
pub const WGL_PIXEL_TYPE_ARB: i32 = 0x2013;
pub const WGL_RED_BITS_ARB: i32 = 0x2015;
pub const WGL_GREEN_BITS_ARB: i32 = 0x2017;
pub const WGL_BLUE_BITS_ARB: i32 = 0x2019;
pub const WGL_ALPHA_BITS_ARB: i32 = 0x201B;
pub const WGL_ACCUM_RED_BITS_ARB: i32 = 0x201E;
pub const WGL_ACCUM_GREEN_BITS_ARB: i32 = 0x201F;
pub const WGL_ACCUM_BLUE_BITS_ARB: i32 = 0x2020;
pub const WGL_DEPTH_BITS_ARB: i32 = 0x2022;
pub const WGL_TYPE_RGBA_ARB: i32 = 0x202B;
pub const WGL_DRAW_TO_PBUFFER_ARB: i32 = 0x202D;

pub const PFD_DOUBLEBUFFER: i32 = 0x0000_0001;
pub const PFD_STEREO: i32 = 0x0000_0002;
pub const PFD_DRAW_TO_WINDOW: i32 = 0x0000_0004;
pub const PFD_DRAW_TO_BITMAP: i32 = 0x0000_0008;
pub const PFD_SUPPORT_OPENGL: i32 = 0x0000_0020;
pub const PFD_DOUBLEBUFFER_DONTCARE: i32 = 0x4000_0000;
pub const PFD_STEREO_DONTCARE: i32 = 0x8000_0000_u32 as i32;

/// `wglChoosePixelFormatARB`, five levels.
#[derive(Debug, Clone, Copy, Default)]
pub struct WglArbProbe;

impl BackendProbe for WglArbProbe {
    fn mechanism(&self) -> QueryMechanism {
        QueryMechanism::WglArb
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
            DrawableKind::Window => WGL_DRAW_TO_WINDOW_ARB,
            _ => WGL_DRAW_TO_PBUFFER_ARB,
        };
        let mut attributes = vec![
            target,
            1,
            WGL_SUPPORT_OPENGL_ARB,
            1,
            WGL_PIXEL_TYPE_ARB,
            WGL_TYPE_RGBA_ARB,
            WGL_RED_BITS_ARB,
            criteria.red as i32,
            WGL_GREEN_BITS_ARB,
            criteria.green as i32,
            WGL_BLUE_BITS_ARB,
            criteria.blue as i32,
        ];
        if let Some(alpha) = criteria.alpha {
            attributes.extend_from_slice(&[WGL_ALPHA_BITS_ARB, alpha as i32]);
        }
        if let Some(depth) = criteria.depth {
            attributes.extend_from_slice(&[WGL_DEPTH_BITS_ARB, depth as i32]);
        }
        if let Some([red, green, blue]) = criteria.accumulation {
            attributes.extend_from_slice(&[
                WGL_ACCUM_RED_BITS_ARB,
                red as i32,
                WGL_ACCUM_GREEN_BITS_ARB,
                green as i32,
                WGL_ACCUM_BLUE_BITS_ARB,
                blue as i32,
            ]);
        }
        if let Some(double) = criteria.double_buffer {
            attributes.extend_from_slice(&[WGL_DOUBLE_BUFFER_ARB, double as i32]);
        }
        if let Some(stereo) = criteria.stereo {
            attributes.extend_from_slice(&[WGL_STEREO_ARB, stereo as i32]);
        }
        attributes.push(0);
        attributes
    }
}

/// `ChoosePixelFormat` with a pixel format descriptor, four levels.
///
/// Encoded as `[flags, colour bits, alpha bits, accumulation bits, depth bits]`.
#[derive(Debug, Clone, Copy, Default)]
pub struct GdiPixelFormatProbe;

impl BackendProbe for GdiPixelFormatProbe {
    fn mechanism(&self) -> QueryMechanism {
        QueryMechanism::GdiPixelFormat
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
            // DIB sections cannot share a context with a window.
            SurfaceVariant::OffscreenExclusive => Some(DrawableKind::Pixmap),
            SurfaceVariant::OffscreenShared | SurfaceVariant::Invalid => None,
        }
    }

    fn encode(&self, criteria: &Criteria) -> Vec<i32> {
        let mut flags = PFD_SUPPORT_OPENGL;
        flags |= match criteria.drawable {
            DrawableKind::Window => PFD_DRAW_TO_WINDOW,
            _ => PFD_DRAW_TO_BITMAP,
        };
        flags |= match criteria.double_buffer {
            Some(true) => PFD_DOUBLEBUFFER,
            Some(false) => 0,
            None => PFD_DOUBLEBUFFER_DONTCARE,
        };
        flags |= match criteria.stereo {
            Some(true) => PFD_STEREO,
            Some(false) => 0,
            None => PFD_STEREO_DONTCARE,
        };
        let accumulation = criteria
            .accumulation
            .map_or(0, |channels| channels.iter().sum::<u32>());

        vec![
            flags,
            (criteria.red + criteria.green + criteria.blue) as i32,
            criteria.alpha.unwrap_or(0) as i32,
            accumulation as i32,
            criteria.depth.unwrap_or(0) as i32,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::{BufferingMode, CapabilityRequest};

    #[test]
    fn test_arb_pbuffer_target() {
        let criteria = WglArbProbe
            .criteria(&CapabilityRequest::new(), SurfaceVariant::OffscreenShared, 1)
            .unwrap();
        let attributes = WglArbProbe.encode(&criteria);
        assert_eq!(&attributes[..2], &[WGL_DRAW_TO_PBUFFER_ARB, 1]);
        assert_eq!(attributes.last(), Some(&0));
    }

    #[test]
    fn test_gdi_cannot_share_offscreen() {
        assert!(!GdiPixelFormatProbe.supports_variant(SurfaceVariant::OffscreenShared));
        assert!(GdiPixelFormatProbe.supports_variant(SurfaceVariant::OffscreenExclusive));
    }

    #[test]
    fn test_gdi_descriptor_layout() {
        let request = CapabilityRequest::new()
            .with_colour_depth(24)
            .with_buffering(BufferingMode::Double)
            .with_accumulation_depth(48);
        let criteria = GdiPixelFormatProbe
            .criteria(&request, SurfaceVariant::OnscreenWindow, 4)
            .unwrap();

        assert_eq!(
            GdiPixelFormatProbe.encode(&criteria),
            vec![
                PFD_SUPPORT_OPENGL | PFD_DRAW_TO_WINDOW | PFD_DOUBLEBUFFER | PFD_STEREO_DONTCARE,
                24,
                1,
                48,
                16,
            ]
        );
    }
}
