use std::sync::Arc;

use json_lattice::Lattice;
use json_strand::{AdapterFactory, JsonAdapter, Qualifier, Strand};
use json_type_meta::TypeDescriptor;
use tracing::{debug, trace};

use crate::bridge::Slot;
use crate::error::into_strand;
use crate::policy::RoutingPolicy;
use crate::stream::StreamBridgeAdapter;

/// Installed first in the primary codec's chain. Hands types owned by the
/// secondary codec over to it and declines everything else.
pub struct PrimaryExtensionPoint {
    policy: Arc<dyn RoutingPolicy>,
    secondary: Slot<Lattice>,
}

impl PrimaryExtensionPoint {
    /// Detached until installed by [`Bridge`](crate::Bridge); requests that
    /// need the secondary codec fail with `BridgeError::Detached` until then.
    pub fn new(policy: Arc<dyn RoutingPolicy>) -> Self {
        Self {
            policy,
            secondary: Slot::new("secondary"),
        }
    }

    pub(crate) fn attach(&self, lattice: &Arc<Lattice>) {
        self.secondary.attach(lattice);
    }
}

impl AdapterFactory for PrimaryExtensionPoint {
    fn create(
        &self,
        ty: &TypeDescriptor,
        qualifiers: &[Qualifier],
        _strand: &Strand,
    ) -> json_strand::Result<Option<Arc<dyn JsonAdapter>>> {
        if !qualifiers.is_empty() || !ty.is_bare_class() {
            trace!(ty = %ty, ?qualifiers, "not bridgeable");
            return Ok(None);
        }
        if self.policy.should_use_primary(ty) {
            trace!(ty = %ty, "primary codec owns type");
            return Ok(None);
        }

        let lattice = self.secondary.get()?;
        let delegate = lattice.adapter_for(ty).map_err(into_strand)?;
        debug!(ty = %ty, "bridging primary codec to secondary adapter");
        let bridge: Arc<dyn JsonAdapter> =
            Arc::new(StreamBridgeAdapter::new(delegate).pretty(lattice.is_pretty_printing()));
        Ok(Some(bridge.null_safe()))
    }
}
