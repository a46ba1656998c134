//! Typed graph element identifiers and O(1) grouping of merged elements.
//!
//! Identifiers that must be treated as one logical unit (deduplicated nodes
//! or edges, contracted components) are linked into groups stored inside a
//! flat array indexed by identifier. Merging, splitting and classifying
//! elements never allocate and never walk a group, so identifiers keep
//! indexing fixed-size attribute arrays while their grouping changes.

/// Checks a caller contract. Always on unless the `unchecked` feature is
/// enabled, in which case only debug builds check it.
macro_rules! precondition {
    ($($arg:tt)*) => {
        #[cfg(not(feature = "unchecked"))]
        assert!($($arg)*);
        #[cfg(feature = "unchecked")]
        debug_assert!($($arg)*);
    };
}

pub mod distinct_set;
pub mod distinct_set_collection;
pub mod distinct_sets;
pub mod element_id;
pub mod error;
pub mod list_node;
pub mod multi_element_type;
pub mod prelude;
pub mod set_collection;
pub mod tracing_support;

mod test_support;

pub use distinct_set::{ElementIdChain, ElementIdDistinctSet};
pub use distinct_set_collection::ElementIdDistinctSetCollection;
pub use distinct_sets::ElementIdDistinctSets;
pub use element_id::{ComponentId, EdgeId, ElementId, ElementKind, NodeId};
pub use error::{ElementIdError, InvariantError};
pub use multi_element_type::MultiElementType;
pub use set_collection::ElementIdSetCollection;
