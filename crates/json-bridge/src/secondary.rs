use std::sync::Arc;

use json_lattice::{Lattice, TypeAdapter, TypeAdapterFactory};
use json_strand::Strand;
use json_type_meta::{is_builtin, TypeDescriptor};
use tracing::{debug, trace};

use crate::bridge::Slot;
use crate::error::into_lattice;
use crate::policy::RoutingPolicy;
use crate::tree::TreeBridgeAdapter;

/// Installed first in the secondary codec's chain. Types owned by the
/// primary codec are served through it; everything else resolves with the
/// rest of the secondary chain.
pub struct SecondaryExtensionPoint {
    policy: Arc<dyn RoutingPolicy>,
    primary: Slot<Strand>,
}

impl SecondaryExtensionPoint {
    /// Detached until installed by [`Bridge`](crate::Bridge); requests that
    /// need the primary codec fail with `BridgeError::Detached` until then.
    pub fn new(policy: Arc<dyn RoutingPolicy>) -> Self {
        Self {
            policy,
            primary: Slot::new("primary"),
        }
    }

    pub(crate) fn attach(&self, strand: &Arc<Strand>) {
        self.primary.attach(strand);
    }
}

impl TypeAdapterFactory for SecondaryExtensionPoint {
    fn create(
        &self,
        lattice: &Lattice,
        ty: &TypeDescriptor,
    ) -> json_lattice::Result<Option<Arc<dyn TypeAdapter>>> {
        // Built-in scalars are handled identically by both codecs.
        if !ty.is_bare_class() || is_builtin(ty) {
            trace!(ty = %ty, "not bridgeable");
            return Ok(None);
        }
        if !self.policy.should_use_primary(ty) {
            return lattice.delegate_adapter(self, ty).map(Some);
        }

        let strand = self.primary.get()?;
        let delegate = strand.adapter_for(ty).map_err(into_lattice)?;
        debug!(ty = %ty, "bridging secondary codec to primary adapter");
        let bridge: Arc<dyn TypeAdapter> = Arc::new(TreeBridgeAdapter::new(delegate));
        Ok(Some(bridge.null_safe()))
    }
}
