//! Progressive relaxation search for a usable backend configuration
//!
//! The negotiator walks one backend family's probes in preference order,
//! settles on the first query mechanism the running platform offers, and
//! searches its selection levels from strictest to loosest. The first
//! candidate that can actually be materialized wins.

use crate::backend::{
    BackendConfig, BackendFamily, BackendProbe, ConfigQuery, Criteria, DrawableKind, NativeDriver,
    QueryMechanism,
};
use crate::capability::CapabilityRequest;
use crate::error::{NativeError, Result, SurfaceError};
use crate::surface::SurfaceVariant;
use log::{debug, error, warn};
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;


/// A successful negotiation: the configuration plus whatever the caller
/// materialized from it.
#[derive(Debug)]
pub struct Negotiated<T> {
    pub config: BackendConfig,
    pub drawable: DrawableKind,
    pub materialized: T,
    /// Materialization attempts made, including the successful one.
    pub attempts: u32,
}

/// Criteria for every selection level of `probe`, strictest first.
pub fn relaxation_ladder(
    probe: &dyn BackendProbe,
    request: &CapabilityRequest,
    variant: SurfaceVariant,
) -> Vec<(u32, Criteria)> {
    (1..=probe.selection_levels())
        .rev()
        .filter_map(|level| {
            probe
                .criteria(request, variant, level)
                .map(|criteria| (level, criteria))
        })
        .collect()
}

/// Runs negotiation for one backend family against one driver.
pub struct SurfaceNegotiator {
    family: BackendFamily,
    driver: Arc<dyn NativeDriver>,
    probes: Vec<Box<dyn BackendProbe>>,
    disabled: HashSet<QueryMechanism>,
}

impl fmt::Debug for SurfaceNegotiator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SurfaceNegotiator")
            .field("family", &self.family)
            .field("driver", &self.driver.name())
            .field("probes", &self.probes)
            .field("disabled", &self.disabled)
            .finish()
    }
}

impl SurfaceNegotiator {
    pub fn new(family: BackendFamily, driver: Arc<dyn NativeDriver>) -> Self {
        Self::with_probes(family, driver, family.probes())
    }

    pub fn with_probes(
        family: BackendFamily,
        driver: Arc<dyn NativeDriver>,
        probes: Vec<Box<dyn BackendProbe>>,
    ) -> Self {
        Self {
            family,
            driver,
            probes,
            disabled: HashSet::new(),
        }
    }

    /// Treat `mechanism` as unavailable even when the driver offers it.
    pub fn disable_mechanism(&mut self, mechanism: QueryMechanism) {
        self.disabled.insert(mechanism);
    }

    pub fn family(&self) -> BackendFamily {
        self.family
    }

    pub fn driver(&self) -> &Arc<dyn NativeDriver> {
        &self.driver
    }

    fn is_usable(&self, probe: &dyn BackendProbe) -> bool {
        !self.disabled.contains(&probe.mechanism()) && probe.is_available(self.driver.as_ref())
    }

    /// The probe negotiation will use: the most capable mechanism the
    /// platform offers. Later probes only stand in when earlier ones are
    /// unavailable, not when they fail to match.
    pub fn active_probe(&self) -> Result<&dyn BackendProbe> {
        self.probes
            .iter()
            .map(|probe| probe.as_ref())
            .find(|probe| self.is_usable(*probe))
            .ok_or(SurfaceError::NoBackendAvailable { family: self.family })
    }

    fn probe_for(&self, mechanism: QueryMechanism) -> Result<&dyn BackendProbe> {
        self.probes
            .iter()
            .map(|probe| probe.as_ref())
            .find(|probe| probe.mechanism() == mechanism && self.is_usable(*probe))
            .ok_or(SurfaceError::NoBackendAvailable {
                family: mechanism.family(),
            })
    }

    fn drawable_for(&self, probe: &dyn BackendProbe, variant: SurfaceVariant) -> Result<DrawableKind> {
        if variant == SurfaceVariant::Invalid {
            return Err(SurfaceError::InvalidRequest(
                "cannot negotiate an Invalid surface".to_string(),
            ));
        }
        probe.drawable_for(variant).ok_or(SurfaceError::Unsupported {
            family: self.family,
            operation: match variant {
                SurfaceVariant::OffscreenShared => "shared offscreen surfaces",
                SurfaceVariant::OffscreenExclusive => "exclusive offscreen surfaces",
                _ => "onscreen surfaces",
            },
        })
    }

    /// Find a configuration for `request` and materialize it.
    ///
    /// `materialize` is called once per candidate, best first; a native
    /// failure moves on to the next candidate and then the next level.
    /// `override_visual` applies when the request carries no visual id.
    pub fn negotiate<T, F>(
        &self,
        request: &CapabilityRequest,
        variant: SurfaceVariant,
        override_visual: Option<u32>,
        mut materialize: F,
    ) -> Result<Negotiated<T>>
    where
        F: FnMut(&BackendConfig, DrawableKind) -> std::result::Result<T, NativeError>,
    {
        let probe = self.active_probe()?;
        let drawable = self.drawable_for(probe, variant)?;

        if let Some(visual_id) = request.visual_id().or(override_visual) {
            return self.negotiate_visual(probe, visual_id, variant, drawable, materialize);
        }

        let mut last_failure: Option<NativeError> = None;
        let mut attempts = 0;

        for (level, criteria) in relaxation_ladder(probe, request, variant) {
            let attributes = probe.encode(&criteria);
            debug!(
                "{:?} level {}/{} for {:?}: {:?}",
                probe.mechanism(),
                level,
                probe.selection_levels(),
                variant,
                attributes
            );

            let query = ConfigQuery {
                mechanism: probe.mechanism(),
                selection_level: level,
                attributes: &attributes,
                criteria: &criteria,
            };
            let candidates = match self.driver.query_configs(&query) {
                Ok(candidates) => candidates,
                Err(e) => {
                    warn!("{:?} level {} query failed: {}", probe.mechanism(), level, e);
                    continue;
                }
            };

            for native in candidates {
                attempts += 1;
                let config = BackendConfig::new(probe.mechanism(), native, Some(level));
                debug!(
                    "Trying {:?} visual 0x{:x} ({})",
                    probe.mechanism(),
                    config.visual_id(),
                    config.resolved()
                );
                match materialize(&config, drawable) {
                    Ok(materialized) => {
                        debug!(
                            "Negotiated {:?} visual 0x{:x} at level {}",
                            probe.mechanism(),
                            config.visual_id(),
                            level
                        );
                        return Ok(Negotiated {
                            config,
                            drawable,
                            materialized,
                            attempts,
                        });
                    }
                    Err(e) => {
                        error!(
                            "Failed to materialize visual 0x{:x} for {:?}: {}",
                            config.visual_id(),
                            variant,
                            e
                        );
                        last_failure = Some(e);
                    }
                }
            }
        }

        match last_failure {
            Some(source) => Err(SurfaceError::MaterializationFailed {
                mechanism: probe.mechanism(),
                source,
            }),
            None => Err(SurfaceError::NoMatchingConfig { variant }),
        }
    }

    fn negotiate_visual<T, F>(
        &self,
        probe: &dyn BackendProbe,
        visual_id: u32,
        variant: SurfaceVariant,
        drawable: DrawableKind,
        mut materialize: F,
    ) -> Result<Negotiated<T>>
    where
        F: FnMut(&BackendConfig, DrawableKind) -> std::result::Result<T, NativeError>,
    {
        let native = self
            .driver
            .config_by_visual_id(probe.mechanism(), visual_id)
            .filter(|native| native.drawables.contains(drawable.support_flag()))
            .ok_or_else(|| {
                warn!(
                    "Visual 0x{:x} cannot back a {:?} surface on {:?}",
                    visual_id,
                    variant,
                    probe.mechanism()
                );
                SurfaceError::NoMatchingConfig { variant }
            })?;

        let config = BackendConfig::new(probe.mechanism(), native, None);
        debug!("Using explicit visual 0x{:x} ({})", visual_id, config.resolved());
        let materialized = materialize(&config, drawable).map_err(|source| {
            error!("Failed to materialize explicit visual 0x{:x}: {}", visual_id, source);
            SurfaceError::MaterializationFailed {
                mechanism: probe.mechanism(),
                source,
            }
        })?;
        Ok(Negotiated {
            config,
            drawable,
            materialized,
            attempts: 1,
        })
    }

    /// Materialize `companion`'s exact configuration for `variant`,
    /// skipping the relaxation search.
    pub fn match_companion<T, F>(
        &self,
        companion: &BackendConfig,
        variant: SurfaceVariant,
        mut materialize: F,
    ) -> Result<Negotiated<T>>
    where
        F: FnMut(&BackendConfig, DrawableKind) -> std::result::Result<T, NativeError>,
    {
        let probe = self.probe_for(companion.mechanism())?;
        let drawable = self.drawable_for(probe, variant)?;
        if !companion.native().drawables.contains(drawable.support_flag()) {
            return Err(SurfaceError::NoMatchingConfig { variant });
        }

        let config = companion.clone();
        debug!(
            "Matching companion visual 0x{:x} for {:?}",
            config.visual_id(),
            variant
        );
        let materialized = materialize(&config, drawable).map_err(|source| {
            error!(
                "Failed to materialize companion visual 0x{:x}: {}",
                config.visual_id(),
                source
            );
            SurfaceError::MaterializationFailed {
                mechanism: config.mechanism(),
                source,
            }
        })?;
        Ok(Negotiated {
            config,
            drawable,
            materialized,
            attempts: 1,
        })
    }
}
