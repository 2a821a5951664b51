//! Capability requests and the resolved pixel configuration values
//!
//! A [`CapabilityRequest`] describes what a client wants from a rendering
//! surface. Negotiation turns it into backend criteria; a successful
//! negotiation produces [`ResolvedCapabilities`] describing what the native
//! configuration actually provides.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Buffering mode requested for a surface.
///
/// `Any` is "don't care": the criterion is omitted from the native query
/// rather than asserted either way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BufferingMode {
    Single,
    Double,
    #[default]
    Any,
}

/// Stereo mode requested for a surface. `Any` is "don't care".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StereoMode {
    Mono,
    Stereo,
    #[default]
    Any,
}

impl BufferingMode {
    /// The native double-buffer criterion, `None` when unconstrained.
    pub fn as_criterion(self) -> Option<bool> {
        match self {
            BufferingMode::Single => Some(false),
            BufferingMode::Double => Some(true),
            BufferingMode::Any => None,
        }
    }
}

impl StereoMode {
    /// The native stereo criterion, `None` when unconstrained.
    pub fn as_criterion(self) -> Option<bool> {
        match self {
            StereoMode::Mono => Some(false),
            StereoMode::Stereo => Some(true),
            StereoMode::Any => None,
        }
    }
}

/// Minimum bits per red/green/blue channel for a total bit count.
///
/// Rounds up, so a 24 bit request asks for 8/8/8 and a 16 bit request asks
/// for 6/6/6.
pub fn per_channel_minimum(total_bits: u32) -> u32 {
    (total_bits + 2) / 3
}

/// Red/green/blue accumulation minimums for a total accumulation depth.
///
/// The total is spread over the three colour channels only; no alpha
/// accumulation is ever requested, so whatever the total implies for alpha
/// is left unaccounted.
pub fn accumulation_channels(total_bits: u32) -> [u32; 3] {
    let channel = per_channel_minimum(total_bits);
    [channel, channel, channel]
}

/// Immutable description of the desired surface properties.
///
/// All minimums are bit counts; zero means "no requirement". The explicit
/// visual identifier, when present, bypasses negotiation entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct CapabilityRequest {
    #[serde(default)]
    buffering: BufferingMode,
    #[serde(default)]
    stereo: StereoMode,
    #[serde(default)]
    min_colour_depth: u32,
    #[serde(default)]
    min_depth_buffer_depth: u32,
    #[serde(default)]
    min_alpha_depth: u32,
    #[serde(default)]
    min_accumulation_depth: u32,
    #[serde(default)]
    visual_id: Option<u32>,
}

impl CapabilityRequest {
    /// A request with no requirements at all.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_buffering(mut self, buffering: BufferingMode) -> Self {
        self.buffering = buffering;
        self
    }

    pub fn with_stereo(mut self, stereo: StereoMode) -> Self {
        self.stereo = stereo;
        self
    }

    pub fn with_colour_depth(mut self, bits: u32) -> Self {
        self.min_colour_depth = bits;
        self
    }

    pub fn with_depth_buffer_depth(mut self, bits: u32) -> Self {
        self.min_depth_buffer_depth = bits;
        self
    }

    pub fn with_alpha_depth(mut self, bits: u32) -> Self {
        self.min_alpha_depth = bits;
        self
    }

    pub fn with_accumulation_depth(mut self, bits: u32) -> Self {
        self.min_accumulation_depth = bits;
        self
    }

    /// Pin negotiation to one backend-native visual identifier.
    pub fn with_visual_id(mut self, visual_id: u32) -> Self {
        self.visual_id = Some(visual_id);
        self
    }

    pub fn buffering(&self) -> BufferingMode {
        self.buffering
    }

    pub fn stereo(&self) -> StereoMode {
        self.stereo
    }

    pub fn min_colour_depth(&self) -> u32 {
        self.min_colour_depth
    }

    pub fn min_depth_buffer_depth(&self) -> u32 {
        self.min_depth_buffer_depth
    }

    pub fn min_alpha_depth(&self) -> u32 {
        self.min_alpha_depth
    }

    pub fn min_accumulation_depth(&self) -> u32 {
        self.min_accumulation_depth
    }

    pub fn visual_id(&self) -> Option<u32> {
        self.visual_id
    }
}

/// Capability values a native configuration actually provides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ResolvedCapabilities {
    pub red_bits: u32,
    pub green_bits: u32,
    pub blue_bits: u32,
    pub alpha_bits: u32,
    pub depth_bits: u32,
    pub accum_red_bits: u32,
    pub accum_green_bits: u32,
    pub accum_blue_bits: u32,
    pub accum_alpha_bits: u32,
    pub double_buffered: bool,
    pub stereo: bool,
}

impl ResolvedCapabilities {
    /// Total red + green + blue bits.
    pub fn colour_depth(&self) -> u32 {
        self.red_bits + self.green_bits + self.blue_bits
    }

    /// Total accumulation bits over all four accumulation channels.
    pub fn accumulation_depth(&self) -> u32 {
        self.accum_red_bits + self.accum_green_bits + self.accum_blue_bits + self.accum_alpha_bits
    }

    pub fn buffering_mode(&self) -> BufferingMode {
        if self.double_buffered {
            BufferingMode::Double
        } else {
            BufferingMode::Single
        }
    }

    pub fn stereo_mode(&self) -> StereoMode {
        if self.stereo {
            StereoMode::Stereo
        } else {
            StereoMode::Mono
        }
    }

    /// Whether these values meet every explicit minimum of `request`.
    pub fn satisfies(&self, request: &CapabilityRequest) -> bool {
        let colour = per_channel_minimum(request.min_colour_depth);
        let [accum_red, accum_green, accum_blue] =
            accumulation_channels(request.min_accumulation_depth);

        self.red_bits >= colour
            && self.green_bits >= colour
            && self.blue_bits >= colour
            && self.colour_depth() >= request.min_colour_depth
            && self.alpha_bits >= request.min_alpha_depth
            && self.depth_bits >= request.min_depth_buffer_depth
            && self.accum_red_bits >= accum_red
            && self.accum_green_bits >= accum_green
            && self.accum_blue_bits >= accum_blue
            && request
                .buffering
                .as_criterion()
                .map_or(true, |double| double == self.double_buffered)
            && request
                .stereo
                .as_criterion()
                .map_or(true, |stereo| stereo == self.stereo)
    }
}

impl fmt::Display for ResolvedCapabilities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "rgba {}/{}/{}/{} depth {} accum {}/{}/{}/{} {} {}",
            self.red_bits,
            self.green_bits,
            self.blue_bits,
            self.alpha_bits,
            self.depth_bits,
            self.accum_red_bits,
            self.accum_green_bits,
            self.accum_blue_bits,
            self.accum_alpha_bits,
            if self.double_buffered { "double" } else { "single" },
            if self.stereo { "stereo" } else { "mono" },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rgb888_depth24_double() -> ResolvedCapabilities {
        ResolvedCapabilities {
            red_bits: 8,
            green_bits: 8,
            blue_bits: 8,
            depth_bits: 24,
            double_buffered: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_per_channel_minimum_rounds_up() {
        assert_eq!(per_channel_minimum(0), 0);
        assert_eq!(per_channel_minimum(1), 1);
        assert_eq!(per_channel_minimum(16), 6);
        assert_eq!(per_channel_minimum(24), 8);
        assert_eq!(per_channel_minimum(32), 11);
    }

    #[test]
    fn test_accumulation_channels_leave_alpha_unrequested() {
        assert_eq!(accumulation_channels(10), [4, 4, 4]);
        assert_eq!(accumulation_channels(48), [16, 16, 16]);
        assert_eq!(accumulation_channels(0), [0, 0, 0]);
    }

    #[test]
    fn test_request_builder_keeps_values() {
        let request = CapabilityRequest::new()
            .with_buffering(BufferingMode::Double)
            .with_stereo(StereoMode::Mono)
            .with_colour_depth(24)
            .with_depth_buffer_depth(16)
            .with_alpha_depth(8)
            .with_accumulation_depth(30)
            .with_visual_id(0x21);

        assert_eq!(request.buffering(), BufferingMode::Double);
        assert_eq!(request.stereo(), StereoMode::Mono);
        assert_eq!(request.min_colour_depth(), 24);
        assert_eq!(request.min_depth_buffer_depth(), 16);
        assert_eq!(request.min_alpha_depth(), 8);
        assert_eq!(request.min_accumulation_depth(), 30);
        assert_eq!(request.visual_id(), Some(0x21));
    }

    #[test]
    fn test_dont_care_is_distinct_from_disabled() {
        assert_eq!(BufferingMode::Any.as_criterion(), None);
        assert_eq!(BufferingMode::Single.as_criterion(), Some(false));
        assert_eq!(StereoMode::Any.as_criterion(), None);
        assert_eq!(StereoMode::Mono.as_criterion(), Some(false));
    }

    #[test]
    fn test_satisfies_checks_minimums_and_modes() {
        let caps = rgb888_depth24_double();
        let request = CapabilityRequest::new()
            .with_colour_depth(24)
            .with_depth_buffer_depth(24)
            .with_buffering(BufferingMode::Double);
        assert!(caps.satisfies(&request));

        assert!(!caps.satisfies(&request.with_alpha_depth(1)));
        assert!(!caps.satisfies(&request.with_buffering(BufferingMode::Single)));
        assert!(!caps.satisfies(&request.with_stereo(StereoMode::Stereo)));
        assert!(caps.satisfies(&request.with_stereo(StereoMode::Mono)));
    }

    #[test]
    fn test_resolved_totals() {
        let caps = ResolvedCapabilities {
            accum_red_bits: 16,
            accum_green_bits: 16,
            accum_blue_bits: 16,
            accum_alpha_bits: 16,
            ..rgb888_depth24_double()
        };
        assert_eq!(caps.colour_depth(), 24);
        assert_eq!(caps.accumulation_depth(), 64);
        assert_eq!(caps.buffering_mode(), BufferingMode::Double);
        assert_eq!(caps.stereo_mode(), StereoMode::Mono);
    }

    #[test]
    fn test_request_deserializes_with_defaults() {
        let request: CapabilityRequest = toml::from_str(
            r#"
buffering = "double"
min_colour_depth = 24
"#,
        )
        .unwrap();
        assert_eq!(request.buffering(), BufferingMode::Double);
        assert_eq!(request.stereo(), StereoMode::Any);
        assert_eq!(request.min_colour_depth(), 24);
        assert_eq!(request.visual_id(), None);
    }
}
