//! Decides which codec owns a type.

use json_type_meta::{is_builtin, MetadataKind, TypeDescriptor};

/// The codec responsible for converting a type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Owner {
    Primary,
    Secondary,
}

/// Ownership decision for a type.
///
/// Implementations must be deterministic: both codecs cache the adapters
/// synthesized from a decision, so asking again for the same type has to
/// give the same answer for the life of the process.
pub trait RoutingPolicy: Send + Sync {
    fn should_use_primary(&self, ty: &TypeDescriptor) -> bool;

    fn owner(&self, ty: &TypeDescriptor) -> Owner {
        if self.should_use_primary(ty) {
            Owner::Primary
        } else {
            Owner::Secondary
        }
    }
}

impl<F> RoutingPolicy for F
where
    F: Fn(&TypeDescriptor) -> bool + Send + Sync,
{
    fn should_use_primary(&self, ty: &TypeDescriptor) -> bool {
        self(ty)
    }
}

/// The standard routing rules, first match wins:
///
/// 1. built-in scalars go to the primary codec;
/// 2. types marked [`GenerateAdapter`](json_type_meta::Metadata::GenerateAdapter)
///    go to the primary codec;
/// 3. enums go to the secondary codec if any constant carries a serialized
///    name, to the primary codec otherwise;
/// 4. everything else goes to the secondary codec.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultPolicy;

impl RoutingPolicy for DefaultPolicy {
    fn should_use_primary(&self, ty: &TypeDescriptor) -> bool {
        if is_builtin(ty) {
            return true;
        }
        if ty.has_metadata(MetadataKind::GenerateAdapter) {
            return true;
        }
        if let Some(constants) = ty.enum_constants() {
            // The primary codec cannot rename individual constants.
            return !constants
                .iter()
                .any(|c| c.has_metadata(MetadataKind::SerializedName));
        }
        false
    }
}
