//! Two-phase construction of a bridged codec pair.

use std::fmt;
use std::sync::{Arc, OnceLock, Weak};

use json_lattice::Lattice;
use json_strand::{Strand, StrandBuilder};
use tracing::debug;

use crate::error::BridgeError;
use crate::policy::{DefaultPolicy, RoutingPolicy};
use crate::primary::PrimaryExtensionPoint;
use crate::secondary::SecondaryExtensionPoint;

/// Late-bound reference from an extension point to the codec on the other
/// side. Filled once, after both codecs exist.
pub(crate) struct Slot<T> {
    cell: OnceLock<Weak<T>>,
    codec: &'static str,
}

impl<T> Slot<T> {
    pub(crate) fn new(codec: &'static str) -> Self {
        Self {
            cell: OnceLock::new(),
            codec,
        }
    }

    /// Later calls are ignored.
    pub(crate) fn attach(&self, target: &Arc<T>) {
        let _ = self.cell.set(Arc::downgrade(target));
    }

    pub(crate) fn get(&self) -> Result<Arc<T>, BridgeError> {
        self.cell
            .get()
            .and_then(Weak::upgrade)
            .ok_or(BridgeError::Detached { codec: self.codec })
    }
}

type PrimaryHook = Box<dyn FnOnce(StrandBuilder) -> StrandBuilder>;

/// Builds a [`CodecPair`] from two independently configured codecs.
///
/// The inputs are consumed. Their configuration is copied into new
/// instances that carry the bridging factories ahead of everything else.
pub struct Bridge {
    primary: Strand,
    secondary: Lattice,
    policy: Arc<dyn RoutingPolicy>,
    configure_primary: Option<PrimaryHook>,
}

impl Bridge {
    pub fn new(primary: Strand, secondary: Lattice) -> Self {
        Self {
            primary,
            secondary,
            policy: Arc::new(DefaultPolicy),
            configure_primary: None,
        }
    }

    pub fn policy(mut self, policy: impl RoutingPolicy + 'static) -> Self {
        self.policy = Arc::new(policy);
        self
    }

    /// Runs `hook` on the primary builder before the primary codec is built.
    /// The bridging factory is inserted after the hook returns, so it stays
    /// first in the chain even if the hook calls `add_first`.
    pub fn configure_primary(
        mut self,
        hook: impl FnOnce(StrandBuilder) -> StrandBuilder + 'static,
    ) -> Self {
        self.configure_primary = Some(Box::new(hook));
        self
    }

    pub fn build(self) -> CodecPair {
        let primary_point = Arc::new(PrimaryExtensionPoint::new(Arc::clone(&self.policy)));
        let secondary_point = Arc::new(SecondaryExtensionPoint::new(Arc::clone(&self.policy)));

        let mut builder = self.primary.new_builder();
        if let Some(hook) = self.configure_primary {
            builder = hook(builder);
        }
        let primary = Arc::new(builder.add_first(primary_point.clone()).build());
        let secondary = Arc::new(
            self.secondary
                .new_builder()
                .register_factory_first(secondary_point.clone())
                .build(),
        );

        primary_point.attach(&secondary);
        secondary_point.attach(&primary);
        debug!("bridged codec pair built");

        CodecPair { primary, secondary }
    }
}

/// The two bridged codecs. Each resolves types owned by the other through
/// it, so both must be used from this pair.
#[derive(Clone)]
pub struct CodecPair {
    primary: Arc<Strand>,
    secondary: Arc<Lattice>,
}

impl CodecPair {
    pub fn primary(&self) -> &Arc<Strand> {
        &self.primary
    }

    pub fn secondary(&self) -> &Arc<Lattice> {
        &self.secondary
    }

    pub fn into_parts(self) -> (Arc<Strand>, Arc<Lattice>) {
        (self.primary, self.secondary)
    }
}

impl fmt::Debug for CodecPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CodecPair")
            .field("pretty_printing", &self.secondary.is_pretty_printing())
            .finish_non_exhaustive()
    }
}
