//! Integration tests for pixel format negotiation
//!
//! These tests verify the progressive relaxation search, the explicit
//! visual and companion paths, and the failure signals, all through
//! `SurfacePackage` against the simulated driver.

use graphics_surface::backend::simulated::SimulatedDriver;
use graphics_surface::backend::DrawableSupport;
use graphics_surface::config::SurfaceConfig;
use graphics_surface::{
    BackendFamily, BackendProbe, BufferingMode, CapabilityRequest, ErrorCategory, NativeDriver,
    QueryMechanism, ResolvedCapabilities, StereoMode, SurfaceError, SurfacePackage,
    SurfaceVariant,
};
use std::sync::Arc;

fn glx_package() -> (Arc<SimulatedDriver>, SurfacePackage) {
    let driver = Arc::new(SimulatedDriver::with_typical_configs(&[
        QueryMechanism::GlxFbConfig,
    ]));
    let package = SurfacePackage::new(BackendFamily::X11Glx, driver.clone());
    (driver, package)
}

fn exact_rgb8_depth24_double() -> ResolvedCapabilities {
    ResolvedCapabilities {
        red_bits: 8,
        green_bits: 8,
        blue_bits: 8,
        depth_bits: 24,
        double_buffered: true,
        ..Default::default()
    }
}

/// Repeated negotiations land on the same level and configuration
#[test]
fn test_idempotent_relaxation() {
    let (driver, package) = glx_package();
    let request = CapabilityRequest::new()
        .with_colour_depth(16)
        .with_buffering(BufferingMode::Single);

    let mut outcomes = Vec::new();
    for _ in 0..3 {
        driver.clear_queries();
        let surface = package.create_onscreen(&request, 100, 100).unwrap();
        let config = surface.config().unwrap();
        outcomes.push((
            config.selection_level(),
            config.visual_id(),
            driver.queries().len(),
        ));
    }

    assert!(outcomes.windows(2).all(|pair| pair[0] == pair[1]));
}

/// Optional preferences drop out level by level; minimums never do
#[test]
fn test_monotonic_relaxation_in_native_queries() {
    let driver = Arc::new(SimulatedDriver::new("empty"));
    driver.enable_mechanism(QueryMechanism::GlxFbConfig);
    let package = SurfacePackage::new(BackendFamily::X11Glx, driver.clone());

    let request = CapabilityRequest::new()
        .with_colour_depth(24)
        .with_depth_buffer_depth(24);
    let error = package.create_onscreen(&request, 100, 100).unwrap_err();
    assert_eq!(
        error,
        SurfaceError::NoMatchingConfig {
            variant: SurfaceVariant::OnscreenWindow
        }
    );

    let queries = driver.queries();
    let levels: Vec<u32> = queries.iter().map(|q| q.selection_level).collect();
    assert_eq!(levels, vec![6, 5, 4, 3, 2, 1]);

    for pair in queries.windows(2) {
        let (stricter, looser) = (&pair[0].criteria, &pair[1].criteria);
        assert!(stricter.preferences.contains(looser.preferences));
        assert!(stricter.preferences.bits().count_ones() <= looser.preferences.bits().count_ones() + 1);
        assert_eq!((looser.red, looser.green, looser.blue), (8, 8, 8));
        assert_eq!(looser.depth, Some(24));
    }
    assert!(queries.last().unwrap().criteria.preferences.is_empty());
}

/// Exactly satisfiable request resolves to at least the minimums, double buffered
#[test]
fn test_round_trip_capability() {
    let driver = Arc::new(SimulatedDriver::new("exact"));
    driver.add_config(
        QueryMechanism::GlxFbConfig,
        exact_rgb8_depth24_double(),
        DrawableSupport::all(),
    );
    let package = SurfacePackage::new(BackendFamily::X11Glx, driver.clone());

    let request = CapabilityRequest::new()
        .with_colour_depth(24)
        .with_depth_buffer_depth(24)
        .with_alpha_depth(0)
        .with_accumulation_depth(0)
        .with_buffering(BufferingMode::Double);
    let surface = package.create_onscreen(&request, 100, 100).unwrap();

    assert!(surface.colour_depth().unwrap() >= 24);
    assert!(surface.depth_buffer_depth().unwrap() >= 24);
    assert_eq!(surface.accumulation_depth().unwrap(), 0);
    assert_eq!(surface.buffering_mode().unwrap(), BufferingMode::Double);
    assert_eq!(surface.stereo_mode().unwrap(), StereoMode::Mono);
    assert!(surface.config().unwrap().resolved().satisfies(&request));
}

/// Companion matching reuses the configuration without querying
#[test]
fn test_companion_matching() {
    let (driver, package) = glx_package();
    let request = CapabilityRequest::new().with_buffering(BufferingMode::Single);
    let window = package.create_onscreen(&request, 400, 300).unwrap();

    driver.clear_queries();
    let offscreen = package
        .create_offscreen_from_surface(128, 128, &window)
        .unwrap();

    assert_eq!(driver.query_count(), 0);
    assert_eq!(offscreen.config(), window.config());
    assert_eq!(offscreen.variant(), SurfaceVariant::OffscreenShared);
    assert_eq!(offscreen.size().unwrap(), (128, 128));
}

/// A companion that is already destroyed cannot be matched
#[test]
fn test_destroyed_companion_is_rejected() {
    let (_driver, package) = glx_package();
    let mut window = package
        .create_onscreen(&CapabilityRequest::new(), 100, 100)
        .unwrap();
    window.destroy().unwrap();

    assert!(matches!(
        package.create_offscreen_from_surface(64, 64, &window),
        Err(SurfaceError::InvalidSurface { .. })
    ));
}

/// The legacy probe stands in only when the preferred mechanism is missing
#[test]
fn test_fallback_to_legacy_visuals() {
    let driver = Arc::new(SimulatedDriver::with_typical_configs(&[
        QueryMechanism::GlxVisual,
    ]));
    let package = SurfacePackage::new(BackendFamily::X11Glx, driver.clone());

    let surface = package
        .create_onscreen(&CapabilityRequest::new(), 100, 100)
        .unwrap();
    assert_eq!(
        surface.config().unwrap().mechanism(),
        QueryMechanism::GlxVisual
    );
    assert!(driver
        .queries()
        .iter()
        .all(|q| q.mechanism == QueryMechanism::GlxVisual));
}

/// Disabling the preferred mechanism through configuration forces the legacy path
#[test]
fn test_disabled_mechanism_from_config() {
    let driver = Arc::new(SimulatedDriver::with_typical_configs(&[
        QueryMechanism::GlxFbConfig,
        QueryMechanism::GlxVisual,
    ]));
    let config = SurfaceConfig::from_toml_str(
        r#"
[backend]
family = "x11-glx"
disabled_mechanisms = ["glx-fb-config"]
"#,
    )
    .unwrap();
    let package = SurfacePackage::from_config(&config, driver);

    let surface = package
        .create_offscreen_exclusive(&CapabilityRequest::new(), 64, 64)
        .unwrap();
    assert_eq!(
        surface.config().unwrap().mechanism(),
        QueryMechanism::GlxVisual
    );
}

#[test]
fn test_no_backend_available() {
    let driver = Arc::new(SimulatedDriver::new("bare"));
    let package = SurfacePackage::new(BackendFamily::CarbonAgl, driver);

    let error = package
        .create_onscreen(&CapabilityRequest::new(), 100, 100)
        .unwrap_err();
    assert_eq!(
        error,
        SurfaceError::NoBackendAvailable {
            family: BackendFamily::CarbonAgl
        }
    );
    assert_eq!(error.category(), ErrorCategory::Configuration);
}

#[test]
fn test_unsupported_variant() {
    let driver = Arc::new(SimulatedDriver::with_typical_configs(&[QueryMechanism::GdkGl]));
    let package = SurfacePackage::new(BackendFamily::GtkGl, driver);

    let error = package
        .create_offscreen_shared(&CapabilityRequest::new(), 64, 64)
        .unwrap_err();
    assert!(matches!(error, SurfaceError::Unsupported { .. }));
    assert_eq!(error.category(), ErrorCategory::UnsupportedOperation);
}

#[test]
fn test_invalid_variant_is_rejected() {
    let (_driver, package) = glx_package();
    let error = package
        .create_surface(
            SurfaceVariant::Invalid,
            &CapabilityRequest::new(),
            10,
            10,
            None,
        )
        .unwrap_err();
    assert!(matches!(error, SurfaceError::InvalidRequest(_)));
}

/// Native refusal of every candidate surfaces as a retryable resource error
#[test]
fn test_materialization_failure() {
    let (driver, package) = glx_package();
    for visual in 0x21..=0x24 {
        let native = driver
            .config_by_visual_id(QueryMechanism::GlxFbConfig, visual)
            .unwrap();
        driver.fail_contexts_for(native.id);
    }

    let error = package
        .create_onscreen(&CapabilityRequest::new(), 100, 100)
        .unwrap_err();
    assert!(matches!(
        error,
        SurfaceError::MaterializationFailed {
            mechanism: QueryMechanism::GlxFbConfig,
            ..
        }
    ));
    assert_eq!(error.category(), ErrorCategory::ResourceExhaustion);
    assert!(error.is_retryable());
    assert_eq!(driver.live_drawables(), 0);
    assert_eq!(driver.live_contexts(), 0);
}

/// An explicit visual is tried as-is, without relaxation
#[test]
fn test_explicit_visual_skips_relaxation() {
    let (driver, package) = glx_package();
    let request = CapabilityRequest::new().with_visual_id(0x24);

    let surface = package.create_onscreen(&request, 100, 100).unwrap();
    assert_eq!(surface.visual_id().unwrap(), 0x24);
    assert_eq!(surface.config().unwrap().selection_level(), None);
    assert_eq!(driver.query_count(), 0);

    let missing = CapabilityRequest::new().with_visual_id(0x99);
    assert!(matches!(
        package.create_onscreen(&missing, 100, 100),
        Err(SurfaceError::NoMatchingConfig { .. })
    ));
}

/// Every family negotiates an onscreen window with its own mechanism
#[test]
fn test_every_family_negotiates_a_window() {
    for family in [
        BackendFamily::X11Glx,
        BackendFamily::GtkGl,
        BackendFamily::Win32Gdi,
        BackendFamily::CarbonAgl,
        BackendFamily::Wx,
    ] {
        let mechanisms: Vec<QueryMechanism> =
            family.probes().iter().map(|probe| probe.mechanism()).collect();
        let driver = Arc::new(SimulatedDriver::with_typical_configs(&mechanisms));
        let package = SurfacePackage::new(family, driver.clone());

        let request = CapabilityRequest::new()
            .with_colour_depth(24)
            .with_buffering(BufferingMode::Double);
        let surface = package.create_onscreen(&request, 100, 100).unwrap();

        assert_eq!(surface.family(), family);
        assert_eq!(surface.config().unwrap().mechanism(), mechanisms[0]);
        assert_eq!(surface.buffering_mode().unwrap(), BufferingMode::Double);
        let first_query = &driver.queries()[0];
        assert_eq!(first_query.mechanism, mechanisms[0]);
        assert!(!first_query.attributes.is_empty());
    }
}
