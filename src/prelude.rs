pub use crate::distinct_set::{
    ConstEdgeIdDistinctSet, ConstNodeIdDistinctSet, EdgeIdDistinctSet, ElementIdDistinctSet,
    NodeIdDistinctSet,
};
pub use crate::distinct_set_collection::{
    EdgeIdDistinctSetCollection, ElementIdDistinctSetCollection, NodeIdDistinctSetCollection,
};
pub use crate::distinct_sets::{EdgeIdDistinctSets, ElementIdDistinctSets, NodeIdDistinctSets};
pub use crate::element_id::{
    Component, ComponentId, ComponentIdMap, ComponentIdSet, Edge, EdgeId, EdgeIdMap, EdgeIdSet,
    ElementId, ElementIdMap, ElementIdRange, ElementIdSet, ElementKind, Node, NodeId, NodeIdMap, NodeIdSet,
};
pub use crate::list_node::SlotState;
pub use crate::multi_element_type::MultiElementType;
pub use crate::set_collection::{EdgeIdSetCollection, ElementIdSetCollection, NodeIdSetCollection};
