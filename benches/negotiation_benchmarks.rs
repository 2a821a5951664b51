//! Performance benchmarks for graphics-surface
//!
//! Pixel format negotiation runs on every surface creation and event
//! normalization runs on every native event, so both are tracked here.

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use graphics_surface::backend::simulated::SimulatedDriver;
use graphics_surface::input::native::x11::{self, XEvent};
use graphics_surface::input::native::NativeEvent;
use graphics_surface::negotiate::relaxation_ladder;
use graphics_surface::{
    BackendFamily, BackendProbe, BufferingMode, CapabilityRequest, EventNormalizer, QueryMechanism,
    SurfaceNegotiator, SurfacePackage, SurfaceVariant,
};
use std::sync::Arc;

fn demanding_request() -> CapabilityRequest {
    CapabilityRequest::new()
        .with_buffering(BufferingMode::Double)
        .with_colour_depth(24)
        .with_depth_buffer_depth(24)
        .with_alpha_depth(8)
        .with_accumulation_depth(48)
}

/// Benchmark building the criteria ladder for every family
fn bench_relaxation_ladder(c: &mut Criterion) {
    let mut group = c.benchmark_group("relaxation_ladder");
    let request = demanding_request();

    for family in [
        BackendFamily::X11Glx,
        BackendFamily::GtkGl,
        BackendFamily::Win32Gdi,
        BackendFamily::CarbonAgl,
        BackendFamily::Wx,
    ] {
        let probes = family.probes();
        group.bench_function(format!("{:?}", family), |b| {
            b.iter(|| {
                for probe in &probes {
                    let ladder =
                        relaxation_ladder(probe.as_ref(), black_box(&request), SurfaceVariant::OnscreenWindow);
                    for (_, criteria) in &ladder {
                        black_box(probe.encode(criteria));
                    }
                }
            })
        });
    }

    group.finish();
}

/// Benchmark a full negotiation against the simulated driver
fn bench_negotiation(c: &mut Criterion) {
    let mut group = c.benchmark_group("negotiation");
    let driver = Arc::new(SimulatedDriver::with_typical_configs(&[
        QueryMechanism::GlxFbConfig,
    ]));
    let negotiator = SurfaceNegotiator::new(BackendFamily::X11Glx, driver.clone());

    group.bench_function("first_level_match", |b| {
        let request = demanding_request();
        b.iter(|| {
            let negotiated = negotiator.negotiate(
                black_box(&request),
                SurfaceVariant::OnscreenWindow,
                None,
                |_, _| Ok(()),
            );
            driver.clear_queries();
            black_box(negotiated)
        })
    });

    group.bench_function("relax_to_last_level", |b| {
        let request = CapabilityRequest::new().with_buffering(BufferingMode::Single);
        b.iter(|| {
            let negotiated = negotiator.negotiate(
                black_box(&request),
                SurfaceVariant::OnscreenWindow,
                None,
                |config, _| {
                    if config.selection_level() == Some(1) {
                        Ok(())
                    } else {
                        Err(graphics_surface::NativeError::new(
                            graphics_surface::NativeErrorKind::Refused,
                            "bench",
                            "forced relaxation",
                        ))
                    }
                },
            );
            driver.clear_queries();
            black_box(negotiated)
        })
    });

    group.finish();
}

/// Benchmark creating and destroying surfaces through a package
fn bench_surface_lifecycle(c: &mut Criterion) {
    let driver = Arc::new(SimulatedDriver::with_typical_configs(&[
        QueryMechanism::GlxFbConfig,
    ]));
    let package = SurfacePackage::new(BackendFamily::X11Glx, driver.clone());
    let request = demanding_request();

    c.bench_function("create_destroy_onscreen", |b| {
        b.iter(|| {
            let mut surface = package.create_onscreen(&request, 640, 480).unwrap();
            surface.destroy().unwrap();
            driver.clear_queries();
        })
    });
}

/// Benchmark normalizing a burst of exposes followed by pointer motion
fn bench_event_normalization(c: &mut Criterion) {
    let driver = Arc::new(SimulatedDriver::with_typical_configs(&[
        QueryMechanism::GlxFbConfig,
    ]));
    let package = SurfacePackage::new(BackendFamily::X11Glx, driver);
    let mut surface = package
        .create_onscreen(&CapabilityRequest::new(), 640, 480)
        .unwrap();
    surface.add_expose_callback(|n| {
        black_box(n.width);
    })
    .unwrap();
    surface.add_input_callback(|n| {
        black_box(n.input);
    })
    .unwrap();

    let events: Vec<NativeEvent> = (0..16)
        .rev()
        .map(|count| XEvent::expose(count).into())
        .chain((0..64).map(|i| XEvent::motion(i, i, x11::BUTTON1_MASK, i as u64).into()))
        .collect();

    c.bench_function("normalize_x11_burst", |b| {
        b.iter_batched(
            EventNormalizer::new,
            |mut normalizer| {
                for event in &events {
                    black_box(normalizer.deliver(&mut surface, event));
                }
            },
            BatchSize::SmallInput,
        )
    });
}

criterion_group!(
    benches,
    bench_relaxation_ladder,
    bench_negotiation,
    bench_surface_lifecycle,
    bench_event_normalization
);
criterion_main!(benches);
