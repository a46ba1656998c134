//! Merge bookkeeping keyed by element rather than by group.
//!
//! [`ElementIdSetCollection`] is what graph transforms use to record that a
//! number of nodes or edges have been merged into one: the smallest id of a
//! group heads it and stands for the whole group, and callers never have to
//! carry set ids around themselves.

use derivative::Derivative;

use crate::{
    distinct_set::ElementIdDistinctSet,
    distinct_set_collection::ElementIdDistinctSetCollection,
    distinct_sets::ElementIdDistinctSets,
    element_id::{Edge, ElementId, ElementIdSet, ElementKind, Node},
    error::InvariantError,
    list_node::SlotState,
    multi_element_type::MultiElementType,
    tracing_support::info_span,
};

#[derive(Derivative)]
#[derivative(Clone(bound = ""), Debug(bound = ""), Default(bound = ""))]
pub struct ElementIdSetCollection<K: ElementKind> {
    groups: ElementIdDistinctSetCollection<K>,
}

pub type NodeIdSetCollection = ElementIdSetCollection<Node>;
pub type EdgeIdSetCollection = ElementIdSetCollection<Edge>;

impl<K: ElementKind> ElementIdSetCollection<K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        ElementIdSetCollection {
            groups: ElementIdDistinctSetCollection::with_capacity(capacity),
        }
    }

    pub fn capacity(&self) -> usize {
        self.groups.capacity()
    }

    pub fn resize(&mut self, capacity: usize) {
        self.groups.resize(capacity);
    }

    pub fn clear(&mut self) {
        self.groups.clear();
    }

    /// The underlying group storage.
    pub fn distinct(&self) -> &ElementIdDistinctSetCollection<K> {
        &self.groups
    }

    /// Merges `element_id` into the group represented by `set_id` and
    /// returns the representative of the merged group.
    ///
    /// Either argument may also be ungrouped, and two representatives merge
    /// their whole groups. Merging two members of the same group changes
    /// nothing and returns that group's head.
    pub fn add(&mut self, set_id: ElementId<K>, element_id: ElementId<K>) -> ElementId<K> {
        precondition!(
            !set_id.is_null() && !element_id.is_null(),
            "cannot merge a null element id"
        );
        precondition!(set_id != element_id, "cannot merge {set_id:?} with itself");
        match (self.groups.head_of(set_id), self.groups.head_of(element_id)) {
            (Some(first), Some(second)) if first == second => first,
            _ => self.groups.add(set_id, element_id),
        }
    }

    /// Takes `element_id` out of whatever group it is in. A group left with a
    /// single member keeps it as a singleton.
    pub fn remove(&mut self, element_id: ElementId<K>) {
        if self.groups.state_of(element_id) != SlotState::Null {
            self.groups.remove(ElementId::NULL, element_id);
        }
    }

    pub fn type_of(&self, element_id: ElementId<K>) -> MultiElementType {
        self.groups.type_of(element_id)
    }

    pub fn state_of(&self, element_id: ElementId<K>) -> SlotState {
        self.groups.state_of(element_id)
    }

    /// Every identifier that `element_id` stands for: the whole group for a
    /// head, otherwise just `element_id` itself.
    pub fn elements(&self, element_id: ElementId<K>) -> ElementIdSet<K> {
        let _span = info_span!("elements").entered();
        let mut elements = ElementIdSet::default();
        if self.type_of(element_id) == MultiElementType::Head {
            elements.extend(self.groups.chain(element_id));
        } else {
            elements.insert(element_id);
        }
        elements
    }

    /// A read-only view of the group headed by `set_id`.
    pub fn set_by_id(&self, set_id: ElementId<K>) -> ElementIdDistinctSet<K, &ElementIdDistinctSetCollection<K>> {
        self.groups.set(set_id)
    }

    pub fn set_by_ids<I>(&self, set_ids: I) -> ElementIdDistinctSets<K, &ElementIdDistinctSetCollection<K>>
    where
        I: IntoIterator<Item = ElementId<K>>,
    {
        self.groups.sets(set_ids)
    }

    pub fn validate(&self) -> Result<(), InvariantError> {
        self.groups.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element_id::{EdgeId, NodeId};

    fn id(value: i32) -> NodeId {
        NodeId::new(value)
    }

    fn id_set(values: &[i32]) -> ElementIdSet<Node> {
        values.iter().copied().map(NodeId::new).collect()
    }

    #[test]
    fn test_fresh_ids_are_not_merged() {
        let collection = NodeIdSetCollection::with_capacity(3);
        assert_eq!(collection.type_of(id(0)), MultiElementType::Not);
        assert_eq!(collection.elements(id(2)), id_set(&[2]));
        assert_eq!(collection.validate(), Ok(()));
    }

    #[test]
    fn test_merge_pair() {
        let mut collection = NodeIdSetCollection::with_capacity(4);
        assert_eq!(collection.add(id(3), id(1)), id(1));
        assert_eq!(collection.type_of(id(1)), MultiElementType::Head);
        assert_eq!(collection.type_of(id(3)), MultiElementType::Tail);
        assert_eq!(collection.elements(id(1)), id_set(&[1, 3]));
        assert_eq!(collection.elements(id(3)), id_set(&[3]));
        assert_eq!(collection.validate(), Ok(()));
    }

    #[test]
    fn test_remove_leaves_singleton() {
        let mut collection = NodeIdSetCollection::with_capacity(4);
        collection.add(id(0), id(2));
        collection.remove(id(0));
        assert_eq!(collection.state_of(id(0)), SlotState::Null);
        assert_eq!(collection.state_of(id(2)), SlotState::Singleton);
        assert_eq!(collection.type_of(id(2)), MultiElementType::Not);
        assert_eq!(collection.elements(id(2)), id_set(&[2]));

        collection.remove(id(2));
        assert_eq!(collection.state_of(id(2)), SlotState::Null);
        assert_eq!(collection.validate(), Ok(()));
    }

    #[test]
    fn test_remove_ungrouped_is_noop() {
        let mut collection = NodeIdSetCollection::with_capacity(4);
        collection.add(id(0), id(1));
        collection.remove(id(3));
        assert_eq!(collection.elements(id(0)), id_set(&[0, 1]));
        assert_eq!(collection.validate(), Ok(()));
    }

    #[test]
    fn test_chain_of_merges() {
        let mut collection = NodeIdSetCollection::with_capacity(6);
        let mut head = collection.add(id(4), id(5));
        head = collection.add(head, id(3));
        head = collection.add(head, id(2));
        assert_eq!(head, id(2));
        assert_eq!(collection.type_of(id(2)), MultiElementType::Head);
        assert_eq!(collection.type_of(id(3)), MultiElementType::Interior);
        assert_eq!(collection.type_of(id(4)), MultiElementType::Interior);
        assert_eq!(collection.type_of(id(5)), MultiElementType::Tail);
        assert_eq!(collection.elements(head), id_set(&[2, 3, 4, 5]));
        assert_eq!(collection.validate(), Ok(()));
    }

    #[test]
    fn test_merge_groups_by_heads() {
        let mut collection = NodeIdSetCollection::with_capacity(8);
        let first = collection.add(id(5), id(0));
        let second = collection.add(id(2), id(6));
        let merged = collection.add(second, first);
        assert_eq!(merged, id(0));
        assert_eq!(collection.elements(merged), id_set(&[0, 2, 5, 6]));
        assert_eq!(collection.validate(), Ok(()));
    }

    #[test]
    fn test_set_views() {
        let mut collection = NodeIdSetCollection::with_capacity(8);
        let first = collection.add(id(1), id(7));
        let second = collection.add(id(2), id(4));
        assert_eq!(collection.set_by_id(first).len(), 2);

        let sets = collection.set_by_ids([first, second, id(6)]);
        assert_eq!(sets.len(), 5);
        assert_eq!(collection.distinct().capacity(), 8);
    }

    #[test]
    fn test_edges() {
        let mut collection = EdgeIdSetCollection::with_capacity(3);
        collection.add(EdgeId::new(0), EdgeId::new(2));
        assert_eq!(collection.type_of(EdgeId::new(2)), MultiElementType::Tail);
        assert_eq!(collection.type_of(EdgeId::new(1)), MultiElementType::Not);
    }

    #[test]
    fn test_merging_same_group_again_changes_nothing() {
        let mut collection = NodeIdSetCollection::with_capacity(5);
        assert_eq!(collection.add(id(0), id(1)), id(0));
        assert_eq!(collection.add(id(0), id(1)), id(0));
        assert_eq!(collection.add(id(1), id(0)), id(0));
        assert_eq!(collection.elements(id(0)), id_set(&[0, 1]));
        assert_eq!(collection.validate(), Ok(()));

        collection.add(id(0), id(4));
        collection.add(id(0), id(3));
        assert_eq!(collection.add(id(3), id(4)), id(0));
        assert_eq!(collection.elements(id(0)), id_set(&[0, 1, 3, 4]));
        assert_eq!(collection.type_of(id(4)), MultiElementType::Interior);
        assert_eq!(collection.type_of(id(1)), MultiElementType::Tail);
        assert_eq!(collection.validate(), Ok(()));
    }

    #[test]
    #[should_panic]
    fn test_merge_with_self_panics() {
        let mut collection = NodeIdSetCollection::with_capacity(3);
        collection.add(id(1), id(1));
    }
}
