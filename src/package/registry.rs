//! Package-scoped shared GPU context

use crate::backend::{ContextHandle, NativeDriver};
use crate::error::NativeError;
use log::{info, warn};
use parking_lot::Mutex;

/// How a surface's context relates to the package's shared context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShareRole {
    /// This context is the shared context; the registry owns it.
    Registered,
    /// Created sharing with the given registered context.
    SharedWith(ContextHandle),
    /// Never shares and never registers (exclusive offscreen surfaces).
    Unshared,
}

/// Holds at most one shared context per package.
///
/// Empty at package creation, filled by the first eligible surface whose
/// context creation succeeds, emptied only at package teardown.
#[derive(Debug, Default)]
pub struct SharedContextRegistry {
    shared: Mutex<Option<ContextHandle>>,
}

impl SharedContextRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared_context(&self) -> Option<ContextHandle> {
        *self.shared.lock()
    }

    pub fn is_shared_context(&self, context: ContextHandle) -> bool {
        self.shared_context() == Some(context)
    }

    /// Create a context through `create`, sharing or registering as needed.
    ///
    /// The lock is held across `create`, so two eligible surfaces racing to
    /// be first cannot both register.
    pub fn create_context<F>(
        &self,
        eligible: bool,
        create: F,
    ) -> Result<(ContextHandle, ShareRole), NativeError>
    where
        F: FnOnce(Option<ContextHandle>) -> Result<ContextHandle, NativeError>,
    {
        if !eligible {
            return create(None).map(|context| (context, ShareRole::Unshared));
        }

        let mut shared = self.shared.lock();
        match *shared {
            Some(registered) => {
                create(Some(registered)).map(|context| (context, ShareRole::SharedWith(registered)))
            }
            None => {
                let context = create(None)?;
                *shared = Some(context);
                info!("🔗 Registered shared context {:?}", context);
                Ok((context, ShareRole::Registered))
            }
        }
    }

    /// Release the shared context, once. Later calls do nothing.
    pub fn teardown(&self, driver: &dyn NativeDriver) {
        if let Some(context) = self.shared.lock().take() {
            match driver.destroy_context(context) {
                Ok(()) => info!("Released shared context {:?}", context),
                Err(e) => warn!("Failed to release shared context {:?}: {}", context, e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::simulated::SimulatedDriver;
    use crate::backend::{DrawableSupport, QueryMechanism};
    use crate::capability::ResolvedCapabilities;
    use crate::error::NativeErrorKind;

    #[test]
    fn test_first_eligible_context_registers() {
        let registry = SharedContextRegistry::new();
        let mut next = 10;
        let mut create = |_: Option<ContextHandle>| -> Result<ContextHandle, NativeError> {
            next += 1;
            Ok(ContextHandle(next))
        };

        let (first, role) = registry.create_context(true, &mut create).unwrap();
        assert_eq!(role, ShareRole::Registered);
        assert_eq!(registry.shared_context(), Some(first));

        let (second, role) = registry.create_context(true, &mut create).unwrap();
        assert_eq!(role, ShareRole::SharedWith(first));
        assert_ne!(second, first);
        assert_eq!(registry.shared_context(), Some(first));
    }

    #[test]
    fn test_ineligible_contexts_never_register() {
        let registry = SharedContextRegistry::new();
        let (_, role) = registry
            .create_context(false, |share| {
                assert_eq!(share, None);
                Ok(ContextHandle(1))
            })
            .unwrap();
        assert_eq!(role, ShareRole::Unshared);
        assert_eq!(registry.shared_context(), None);
    }

    #[test]
    fn test_failed_creation_leaves_registry_empty() {
        let registry = SharedContextRegistry::new();
        let err = registry
            .create_context(true, |_| {
                Err(NativeError::new(NativeErrorKind::Exhausted, "create_context", "none left"))
            })
            .unwrap_err();
        assert_eq!(err.kind, NativeErrorKind::Exhausted);
        assert_eq!(registry.shared_context(), None);
    }

    #[test]
    fn test_teardown_releases_once() {
        let driver = SimulatedDriver::default();
        let config = driver.add_config(
            QueryMechanism::GlxFbConfig,
            ResolvedCapabilities::default(),
            DrawableSupport::WINDOW,
        );
        let registry = SharedContextRegistry::new();
        let (context, _) = registry
            .create_context(true, |share| driver.create_context(&config, share))
            .unwrap();

        registry.teardown(&driver);
        registry.teardown(&driver);
        assert_eq!(driver.context_releases(context), 1);
        assert_eq!(registry.shared_context(), None);
    }
}
