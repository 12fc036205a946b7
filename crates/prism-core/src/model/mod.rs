//! The origin-agnostic model layer.
//!
//! Every node in this module wraps an origin token and answers the same
//! questions regardless of which origin produced it: who it is, which
//! origin made it, and which non-platform classes it directly depends
//! on. Equality and hashing never look at origin token identity, only at
//! the structural key — that is what lets the closure deduplicate across
//! origins.

pub mod annotation;
pub mod class_info;
pub mod members;
pub mod platform;
pub mod signature;

use std::sync::{Arc, OnceLock, Weak};

use indexmap::IndexSet;

use crate::errors::{PrismError, PrismResult};
use crate::origin::OriginKind;

use self::class_info::ClassInfoModel;
use self::members::MethodInfoModel;

// ---------------------------------------------------------------------------
// Model contract
// ---------------------------------------------------------------------------

/// Contract every model node supplies regardless of origin.
pub trait Model {
    /// Which metadata source produced this node.
    fn origin_kind(&self) -> OriginKind;

    fn is_runtime(&self) -> bool {
        self.origin_kind() == OriginKind::Runtime
    }

    fn is_scan(&self) -> bool {
        self.origin_kind() == OriginKind::Scan
    }

    /// Non-platform classes directly referenced by this node (one hop,
    /// not transitive), in stable discovery order.
    fn dependencies(&self) -> PrismResult<IndexSet<Arc<ClassInfoModel>>>;
}

// ---------------------------------------------------------------------------
// Declaring context
// ---------------------------------------------------------------------------

/// Declaring context handed to the signature factory; used to resolve
/// type variables against the enclosing method and class declarations.
///
/// Weak on purpose: a navigational back-reference, not ownership, so the
/// cyclic domain graph stays acyclic as a data structure.
#[derive(Clone)]
pub enum SignatureParent {
    None,
    Class(Weak<ClassInfoModel>),
    Method(Weak<MethodInfoModel>),
}

impl std::fmt::Debug for SignatureParent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SignatureParent::None => write!(f, "SignatureParent::None"),
            SignatureParent::Class(_) => write!(f, "SignatureParent::Class"),
            SignatureParent::Method(_) => write!(f, "SignatureParent::Method"),
        }
    }
}

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

/// Fill a write-once cache, computing at most once on the success path.
///
/// Races are benign: recomputing from the same origin yields an equal
/// value, so first writer and last writer converge. Failures are not
/// cached; they abort the caller instead.
pub(crate) fn try_cache<'a, T, F>(cell: &'a OnceLock<T>, compute: F) -> PrismResult<&'a T>
where
    F: FnOnce() -> PrismResult<T>,
{
    if let Some(value) = cell.get() {
        return Ok(value);
    }
    let value = compute()?;
    Ok(cell.get_or_init(|| value))
}

/// Upgrade a navigational owner reference.
pub(crate) fn upgrade<T>(weak: &Weak<T>, owner_of: &str) -> PrismResult<Arc<T>> {
    weak.upgrade().ok_or_else(|| {
        PrismError::Resolution(format!("declaring model of `{owner_of}` is no longer alive"))
    })
}
