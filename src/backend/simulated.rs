//! In-process driver that simulates a windowing system
//!
//! [`SimulatedDriver`] keeps a configuration table per query mechanism and
//! fakes drawables and contexts with counters. It records every query and
//! every release so tests can check what the surface layer asked for, and
//! it can be told to fail creation for chosen configurations.

use super::driver::{ConfigQuery, ContextHandle, DrawableHandle, DrawableTarget, NativeDriver, PointerState};
use super::{DrawableKind, DrawableSupport, NativeConfig, NativeConfigId, QueryMechanism};
use crate::capability::ResolvedCapabilities;
use crate::error::{NativeError, NativeErrorKind};
use log::{debug, trace};
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};

/// A configuration query the driver received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryRecord {
    pub mechanism: QueryMechanism,
    pub selection_level: u32,
    pub attributes: Vec<i32>,
    pub criteria: super::Criteria,
}

/// A simulated drawable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulatedDrawable {
    pub config: NativeConfigId,
    pub kind: DrawableKind,
    pub width: u32,
    pub height: u32,
    pub visible: bool,
    pub swaps: u64,
}

/// A simulated context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulatedContext {
    pub config: NativeConfigId,
    pub shares_with: Option<ContextHandle>,
}

#[derive(Debug, Default)]
struct SimulatedState {
    mechanisms: HashSet<QueryMechanism>,
    configs: HashMap<QueryMechanism, Vec<NativeConfig>>,
    next_config: u64,
    next_handle: u64,
    drawables: HashMap<DrawableHandle, SimulatedDrawable>,
    contexts: HashMap<ContextHandle, SimulatedContext>,
    failing_drawables: HashSet<NativeConfigId>,
    failing_contexts: HashSet<NativeConfigId>,
    queries: Vec<QueryRecord>,
    context_releases: HashMap<ContextHandle, u32>,
    drawable_releases: HashMap<DrawableHandle, u32>,
    current: Option<(DrawableHandle, DrawableHandle, ContextHandle)>,
    separate_read: bool,
    max_drawable_size: u32,
    pointer: Option<PointerState>,
}

/// Driver backed by in-memory tables.
#[derive(Debug)]
pub struct SimulatedDriver {
    name: String,
    state: Mutex<SimulatedState>,
}

impl Default for SimulatedDriver {
    fn default() -> Self {
        Self::new("simulated")
    }
}

impl SimulatedDriver {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            state: Mutex::new(SimulatedState {
                next_config: 1,
                next_handle: 1,
                separate_read: true,
                max_drawable_size: 4096,
                ..Default::default()
            }),
        }
    }

    /// A driver offering the usual desktop configurations for `mechanisms`.
    pub fn with_typical_configs(mechanisms: &[QueryMechanism]) -> Self {
        let driver = Self::default();
        for &mechanism in mechanisms {
            driver.add_typical_configs(mechanism);
        }
        driver
    }

    /// Make `mechanism` available, with or without configurations.
    pub fn enable_mechanism(&self, mechanism: QueryMechanism) {
        self.state.lock().mechanisms.insert(mechanism);
    }

    pub fn disable_mechanism(&self, mechanism: QueryMechanism) {
        self.state.lock().mechanisms.remove(&mechanism);
    }

    /// Append a configuration for `mechanism` and return it. Query results
    /// keep insertion order, so add the best configurations first.
    pub fn add_config(
        &self,
        mechanism: QueryMechanism,
        capabilities: ResolvedCapabilities,
        drawables: DrawableSupport,
    ) -> NativeConfig {
        let mut state = self.state.lock();
        let id = state.next_config;
        state.next_config += 1;

        let config = NativeConfig {
            id: NativeConfigId(id),
            visual_id: 0x20 + id as u32,
            capabilities,
            drawables,
        };
        state.mechanisms.insert(mechanism);
        state.configs.entry(mechanism).or_default().push(config);
        config
    }

    /// Four configurations, richest first: double-buffered RGBA8 with depth
    /// and accumulation, the same without accumulation, single-buffered RGB8
    /// with depth, and bare RGB565.
    pub fn add_typical_configs(&self, mechanism: QueryMechanism) -> Vec<NativeConfig> {
        let all = DrawableSupport::all();
        let rgba8_accum = ResolvedCapabilities {
            red_bits: 8,
            green_bits: 8,
            blue_bits: 8,
            alpha_bits: 8,
            depth_bits: 24,
            accum_red_bits: 16,
            accum_green_bits: 16,
            accum_blue_bits: 16,
            accum_alpha_bits: 16,
            double_buffered: true,
            stereo: false,
        };
        let rgba8 = ResolvedCapabilities {
            accum_red_bits: 0,
            accum_green_bits: 0,
            accum_blue_bits: 0,
            accum_alpha_bits: 0,
            ..rgba8_accum
        };
        let rgb8_single = ResolvedCapabilities {
            alpha_bits: 0,
            double_buffered: false,
            ..rgba8
        };
        let rgb565 = ResolvedCapabilities {
            red_bits: 5,
            green_bits: 6,
            blue_bits: 5,
            ..Default::default()
        };

        vec![
            self.add_config(mechanism, rgba8_accum, all),
            self.add_config(mechanism, rgba8, all),
            self.add_config(mechanism, rgb8_single, all),
            self.add_config(mechanism, rgb565, all),
        ]
    }

    /// Drawable creation fails for `config` from now on.
    pub fn fail_drawables_for(&self, config: NativeConfigId) {
        self.state.lock().failing_drawables.insert(config);
    }

    /// Context creation fails for `config` from now on.
    pub fn fail_contexts_for(&self, config: NativeConfigId) {
        self.state.lock().failing_contexts.insert(config);
    }

    pub fn clear_failures(&self) {
        let mut state = self.state.lock();
        state.failing_drawables.clear();
        state.failing_contexts.clear();
    }

    pub fn set_separate_read(&self, supported: bool) {
        self.state.lock().separate_read = supported;
    }

    pub fn set_max_drawable_size(&self, size: u32) {
        self.state.lock().max_drawable_size = size;
    }

    pub fn set_pointer_state(&self, pointer: Option<PointerState>) {
        self.state.lock().pointer = pointer;
    }

    /// Change a drawable's size behind the surface layer's back, the way a
    /// window manager would.
    pub fn set_drawable_size(&self, drawable: DrawableHandle, width: u32, height: u32) {
        if let Some(entry) = self.state.lock().drawables.get_mut(&drawable) {
            entry.width = width;
            entry.height = height;
        }
    }

    pub fn queries(&self) -> Vec<QueryRecord> {
        self.state.lock().queries.clone()
    }

    pub fn query_count(&self) -> usize {
        self.state.lock().queries.len()
    }

    pub fn clear_queries(&self) {
        self.state.lock().queries.clear();
    }

    pub fn drawable(&self, drawable: DrawableHandle) -> Option<SimulatedDrawable> {
        self.state.lock().drawables.get(&drawable).copied()
    }

    pub fn context(&self, context: ContextHandle) -> Option<SimulatedContext> {
        self.state.lock().contexts.get(&context).copied()
    }

    pub fn live_contexts(&self) -> usize {
        self.state.lock().contexts.len()
    }

    pub fn live_drawables(&self) -> usize {
        self.state.lock().drawables.len()
    }

    /// How many times `context` was passed to `destroy_context`.
    pub fn context_releases(&self, context: ContextHandle) -> u32 {
        self.state
            .lock()
            .context_releases
            .get(&context)
            .copied()
            .unwrap_or(0)
    }

    /// How many times `drawable` was passed to `destroy_drawable`.
    pub fn drawable_releases(&self, drawable: DrawableHandle) -> u32 {
        self.state
            .lock()
            .drawable_releases
            .get(&drawable)
            .copied()
            .unwrap_or(0)
    }

    pub fn current(&self) -> Option<(DrawableHandle, DrawableHandle, ContextHandle)> {
        self.state.lock().current
    }

    fn allocate_handle(state: &mut SimulatedState) -> u64 {
        let handle = state.next_handle;
        state.next_handle += 1;
        handle
    }
}

impl NativeDriver for SimulatedDriver {
    fn name(&self) -> &str {
        &self.name
    }

    fn supports_mechanism(&self, mechanism: QueryMechanism) -> bool {
        self.state.lock().mechanisms.contains(&mechanism)
    }

    fn query_configs(&self, query: &ConfigQuery<'_>) -> Result<Vec<NativeConfig>, NativeError> {
        let mut state = self.state.lock();
        if !state.mechanisms.contains(&query.mechanism) {
            return Err(NativeError::new(
                NativeErrorKind::Unsupported,
                "query_configs",
                format!("{:?} is not available", query.mechanism),
            ));
        }
        state.queries.push(QueryRecord {
            mechanism: query.mechanism,
            selection_level: query.selection_level,
            attributes: query.attributes.to_vec(),
            criteria: *query.criteria,
        });

        let matches: Vec<NativeConfig> = state
            .configs
            .get(&query.mechanism)
            .map(|configs| {
                configs
                    .iter()
                    .filter(|config| query.criteria.accepts(config))
                    .copied()
                    .collect()
            })
            .unwrap_or_default();

        trace!(
            "{} level {} query matched {} configs",
            self.name,
            query.selection_level,
            matches.len()
        );
        Ok(matches)
    }

    fn config_by_visual_id(&self, mechanism: QueryMechanism, visual_id: u32) -> Option<NativeConfig> {
        self.state
            .lock()
            .configs
            .get(&mechanism)?
            .iter()
            .find(|config| config.visual_id == visual_id)
            .copied()
    }

    fn create_drawable(
        &self,
        config: &NativeConfig,
        target: DrawableTarget,
    ) -> Result<DrawableHandle, NativeError> {
        let mut state = self.state.lock();
        if state.failing_drawables.contains(&config.id) {
            return Err(NativeError::new(
                NativeErrorKind::Exhausted,
                "create_drawable",
                format!("config {:?} refused a {:?}", config.id, target.kind),
            ));
        }
        if !config.drawables.contains(target.kind.support_flag()) {
            return Err(NativeError::new(
                NativeErrorKind::BadMatch,
                "create_drawable",
                format!("config {:?} cannot render to {:?}", config.id, target.kind),
            ));
        }

        let handle = DrawableHandle(Self::allocate_handle(&mut state));
        state.drawables.insert(
            handle,
            SimulatedDrawable {
                config: config.id,
                kind: target.kind,
                width: target.width,
                height: target.height,
                visible: false,
                swaps: 0,
            },
        );
        debug!(
            "{} created {:?} {:?} {}x{}",
            self.name, target.kind, handle, target.width, target.height
        );
        Ok(handle)
    }

    fn create_context(
        &self,
        config: &NativeConfig,
        share_with: Option<ContextHandle>,
    ) -> Result<ContextHandle, NativeError> {
        let mut state = self.state.lock();
        if state.failing_contexts.contains(&config.id) {
            return Err(NativeError::new(
                NativeErrorKind::Exhausted,
                "create_context",
                format!("config {:?} refused a context", config.id),
            ));
        }
        if let Some(shared) = share_with {
            if !state.contexts.contains_key(&shared) {
                return Err(NativeError::new(
                    NativeErrorKind::BadMatch,
                    "create_context",
                    format!("cannot share with unknown context {:?}", shared),
                ));
            }
        }

        let handle = ContextHandle(Self::allocate_handle(&mut state));
        state.contexts.insert(
            handle,
            SimulatedContext {
                config: config.id,
                shares_with: share_with,
            },
        );
        debug!("{} created context {:?} sharing {:?}", self.name, handle, share_with);
        Ok(handle)
    }

    fn make_current(
        &self,
        draw: DrawableHandle,
        read: DrawableHandle,
        context: ContextHandle,
    ) -> Result<(), NativeError> {
        let mut state = self.state.lock();
        if draw != read && !state.separate_read {
            return Err(NativeError::new(
                NativeErrorKind::Unsupported,
                "make_current",
                "separate read drawables are not supported",
            ));
        }
        if !state.drawables.contains_key(&draw)
            || !state.drawables.contains_key(&read)
            || !state.contexts.contains_key(&context)
        {
            return Err(NativeError::new(
                NativeErrorKind::BadMatch,
                "make_current",
                "unknown drawable or context",
            ));
        }
        state.current = Some((draw, read, context));
        Ok(())
    }

    fn supports_separate_read(&self) -> bool {
        self.state.lock().separate_read
    }

    fn swap_buffers(&self, drawable: DrawableHandle) -> Result<(), NativeError> {
        let mut state = self.state.lock();
        let entry = state.drawables.get_mut(&drawable).ok_or_else(|| {
            NativeError::new(NativeErrorKind::BadMatch, "swap_buffers", "unknown drawable")
        })?;
        entry.swaps += 1;
        Ok(())
    }

    fn drawable_size(&self, drawable: DrawableHandle) -> Result<(u32, u32), NativeError> {
        self.state
            .lock()
            .drawables
            .get(&drawable)
            .map(|entry| (entry.width, entry.height))
            .ok_or_else(|| NativeError::new(NativeErrorKind::BadMatch, "drawable_size", "unknown drawable"))
    }

    fn resize_drawable(
        &self,
        drawable: DrawableHandle,
        width: u32,
        height: u32,
    ) -> Result<(), NativeError> {
        let mut state = self.state.lock();
        let entry = state.drawables.get_mut(&drawable).ok_or_else(|| {
            NativeError::new(NativeErrorKind::BadMatch, "resize_drawable", "unknown drawable")
        })?;
        if entry.kind != DrawableKind::Window {
            return Err(NativeError::new(
                NativeErrorKind::Unsupported,
                "resize_drawable",
                format!("{:?} drawables have a fixed size", entry.kind),
            ));
        }
        entry.width = width;
        entry.height = height;
        Ok(())
    }

    fn show_drawable(&self, drawable: DrawableHandle) -> Result<(), NativeError> {
        let mut state = self.state.lock();
        let entry = state.drawables.get_mut(&drawable).ok_or_else(|| {
            NativeError::new(NativeErrorKind::BadMatch, "show_drawable", "unknown drawable")
        })?;
        entry.visible = entry.kind == DrawableKind::Window;
        Ok(())
    }

    fn is_drawable_visible(&self, drawable: DrawableHandle) -> bool {
        self.state
            .lock()
            .drawables
            .get(&drawable)
            .map_or(false, |entry| entry.visible)
    }

    fn max_drawable_size(&self) -> u32 {
        self.state.lock().max_drawable_size
    }

    fn pointer_state(&self, _drawable: DrawableHandle) -> Option<PointerState> {
        self.state.lock().pointer
    }

    fn destroy_context(&self, context: ContextHandle) -> Result<(), NativeError> {
        let mut state = self.state.lock();
        *state.context_releases.entry(context).or_insert(0) += 1;
        if state.current.map_or(false, |(_, _, current)| current == context) {
            state.current = None;
        }
        state.contexts.remove(&context).map(|_| ()).ok_or_else(|| {
            NativeError::new(NativeErrorKind::BadMatch, "destroy_context", "unknown context")
        })
    }

    fn destroy_drawable(&self, drawable: DrawableHandle) -> Result<(), NativeError> {
        let mut state = self.state.lock();
        *state.drawable_releases.entry(drawable).or_insert(0) += 1;
        state.drawables.remove(&drawable).map(|_| ()).ok_or_else(|| {
            NativeError::new(NativeErrorKind::BadMatch, "destroy_drawable", "unknown drawable")
        })
    }
}
