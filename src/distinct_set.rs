use std::{
    cell::Cell,
    fmt::{Debug, Formatter},
    iter::FusedIterator,
    ops::{Deref, DerefMut},
};

use crate::{
    distinct_set_collection::{
        EdgeIdDistinctSetCollection, ElementIdDistinctSetCollection, NodeIdDistinctSetCollection,
    },
    element_id::{Edge, ElementId, ElementKind, Node},
    multi_element_type::MultiElementType,
};

/// Iterator over the members of one group, head first.
pub struct ElementIdChain<'a, K: ElementKind> {
    collection: &'a ElementIdDistinctSetCollection<K>,
    next: ElementId<K>,
}

impl<'a, K: ElementKind> ElementIdChain<'a, K> {
    pub(crate) fn new(collection: &'a ElementIdDistinctSetCollection<K>, head: ElementId<K>) -> Self {
        ElementIdChain {
            collection,
            next: head,
        }
    }
}

impl<K: ElementKind> Clone for ElementIdChain<'_, K> {
    fn clone(&self) -> Self {
        ElementIdChain {
            collection: self.collection,
            next: self.next,
        }
    }
}

impl<K: ElementKind> Iterator for ElementIdChain<'_, K> {
    type Item = ElementId<K>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next.is_null() {
            return None;
        }
        let current = self.next;
        self.next = self
            .collection
            .next_in_chain(current)
            .unwrap_or(ElementId::NULL);
        Some(current)
    }
}

impl<K: ElementKind> FusedIterator for ElementIdChain<'_, K> {}

/// A view of one group in an [`ElementIdDistinctSetCollection`], tracking
/// the group's head as elements come and go.
///
/// `C` is either a shared or an exclusive reference to the collection; only
/// views over an exclusive reference can [`add`](Self::add) and
/// [`remove`](Self::remove). The size is counted lazily on first use and
/// kept up to date afterwards.
pub struct ElementIdDistinctSet<K: ElementKind, C> {
    head: ElementId<K>,
    collection: C,
    size: Cell<Option<usize>>,
}

pub type NodeIdDistinctSet<'a> =
    ElementIdDistinctSet<Node, &'a mut NodeIdDistinctSetCollection>;
pub type EdgeIdDistinctSet<'a> =
    ElementIdDistinctSet<Edge, &'a mut EdgeIdDistinctSetCollection>;
pub type ConstNodeIdDistinctSet<'a> =
    ElementIdDistinctSet<Node, &'a NodeIdDistinctSetCollection>;
pub type ConstEdgeIdDistinctSet<'a> =
    ElementIdDistinctSet<Edge, &'a EdgeIdDistinctSetCollection>;

impl<K, C> ElementIdDistinctSet<K, C>
where
    K: ElementKind,
    C: Deref<Target = ElementIdDistinctSetCollection<K>>,
{
    pub fn with_head(head: ElementId<K>, collection: C) -> Self {
        debug_assert!(
            head.is_null() || collection.type_of(head).is_representative(),
            "{head:?} does not head a group"
        );
        let size = if head.is_null() { Some(0) } else { None };
        ElementIdDistinctSet {
            head,
            collection,
            size: Cell::new(size),
        }
    }

    pub fn empty(collection: C) -> Self {
        Self::with_head(ElementId::NULL, collection)
    }

    pub fn head(&self) -> ElementId<K> {
        self.head
    }

    pub fn iter(&self) -> ElementIdChain<'_, K> {
        self.collection.chain(self.head)
    }

    pub fn len(&self) -> usize {
        match self.size.get() {
            Some(size) => size,
            None => {
                let size = self.iter().count();
                self.size.set(Some(size));
                size
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.head.is_null()
    }

    pub fn to_vec(&self) -> Vec<ElementId<K>> {
        self.iter().collect()
    }
}

impl<K, C> ElementIdDistinctSet<K, C>
where
    K: ElementKind,
    C: DerefMut<Target = ElementIdDistinctSetCollection<K>>,
{
    /// Adds `element_id` to this group. Adding the head of another group
    /// merges that whole group in.
    pub fn add(&mut self, element_id: ElementId<K>) {
        if element_id == self.head {
            return;
        }
        let merging = self.collection.type_of(element_id) == MultiElementType::Head;
        self.head = self.collection.add(self.head, element_id);
        if merging {
            self.size.set(None);
        } else if let Some(size) = self.size.get() {
            self.size.set(Some(size + 1));
        }
    }

    pub fn remove(&mut self, element_id: ElementId<K>) {
        let was_member = element_id == self.head || self.collection.is_grouped(element_id);
        self.head = self.collection.remove(self.head, element_id);
        if was_member {
            if let Some(size) = self.size.get() {
                self.size.set(Some(size.saturating_sub(1)));
            }
        }
    }
}

impl<K: ElementKind, C: Clone> Clone for ElementIdDistinctSet<K, C> {
    fn clone(&self) -> Self {
        ElementIdDistinctSet {
            head: self.head,
            collection: self.collection.clone(),
            size: self.size.clone(),
        }
    }
}

impl<K, C> Debug for ElementIdDistinctSet<K, C>
where
    K: ElementKind,
    C: Deref<Target = ElementIdDistinctSetCollection<K>>,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<'a, K, C> IntoIterator for &'a ElementIdDistinctSet<K, C>
where
    K: ElementKind,
    C: Deref<Target = ElementIdDistinctSetCollection<K>>,
{
    type Item = ElementId<K>;
    type IntoIter = ElementIdChain<'a, K>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element_id::NodeId;

    fn id(value: i32) -> NodeId {
        NodeId::new(value)
    }

    fn ids(values: &[i32]) -> Vec<NodeId> {
        values.iter().copied().map(NodeId::new).collect()
    }

    #[test]
    fn test_empty_set() {
        let collection = NodeIdDistinctSetCollection::with_capacity(4);
        let set = collection.set(NodeId::NULL);
        assert!(set.is_empty());
        assert_eq!(set.len(), 0);
        assert_eq!(set.iter().next(), None);
    }

    #[test]
    fn test_untouched_head_is_its_own_set() {
        let collection = NodeIdDistinctSetCollection::with_capacity(4);
        let set = collection.set(id(2));
        assert!(!set.is_empty());
        assert_eq!(set.len(), 1);
        assert_eq!(set.to_vec(), ids(&[2]));
    }

    #[test]
    fn test_add_and_remove_track_head() {
        let mut collection = NodeIdDistinctSetCollection::with_capacity(10);
        {
            let mut set = collection.empty_set_mut();
            set.add(id(5));
            assert_eq!(set.head(), id(5));
            assert_eq!(set.len(), 1);

            set.add(id(3));
            assert_eq!(set.head(), id(3));
            set.add(id(8));
            assert_eq!(set.head(), id(3));
            assert_eq!(set.len(), 3);
            assert_eq!(set.to_vec(), ids(&[3, 8, 5]));

            set.remove(id(3));
            assert_eq!(set.head(), id(8));
            assert_eq!(set.len(), 2);
            assert_eq!(set.to_vec(), ids(&[8, 5]));
        }
        assert_eq!(collection.type_of(id(8)), MultiElementType::Head);
        assert_eq!(collection.type_of(id(3)), MultiElementType::Not);
        assert_eq!(collection.validate(), Ok(()));
    }

    #[test]
    fn test_size_is_counted_lazily() {
        let mut collection = NodeIdDistinctSetCollection::with_capacity(4);
        let mut head = collection.add(id(0), id(1));
        head = collection.add(head, id(2));

        let set = collection.set(head);
        assert_eq!(set.size.get(), None);
        assert_eq!(set.len(), 3);
        assert_eq!(set.size.get(), Some(3));
    }

    #[test]
    fn test_removing_non_member_keeps_size() {
        let mut collection = NodeIdDistinctSetCollection::with_capacity(6);
        let head = collection.add(id(1), id(4));
        let mut set = collection.set_mut(head);
        assert_eq!(set.len(), 2);
        set.remove(id(5));
        assert_eq!(set.len(), 2);
        assert_eq!(set.head(), id(1));
    }

    #[test]
    fn test_adding_another_head_merges_groups() {
        let mut collection = NodeIdDistinctSetCollection::with_capacity(6);
        let first = collection.add(id(0), id(3));
        let second = collection.add(id(1), id(5));
        let mut set = collection.set_mut(first);
        assert_eq!(set.len(), 2);
        set.add(second);
        assert_eq!(set.len(), 4);
        assert_eq!(set.to_vec(), ids(&[0, 3, 1, 5]));
    }

    #[test]
    fn test_debug_lists_members() {
        let mut collection = NodeIdDistinctSetCollection::with_capacity(4);
        collection.add(id(1), id(2));
        assert_eq!(
            format!("{:?}", collection.set(id(1))),
            "{NodeId(1), NodeId(2)}"
        );
    }

    #[test]
    fn test_cloned_chain_walks_independently() {
        let mut collection = NodeIdDistinctSetCollection::with_capacity(4);
        let head = collection.add(id(0), id(2));
        collection.add(head, id(3));

        let mut chain = collection.chain(head);
        assert_eq!(chain.next(), Some(id(0)));
        let rest: Vec<NodeId> = chain.clone().collect();
        assert_eq!(rest, ids(&[3, 2]));
        assert_eq!(chain.next(), Some(id(3)));
        assert_eq!(chain.count(), 1);
    }

    #[test]
    fn test_into_iter() {
        let mut collection = NodeIdDistinctSetCollection::with_capacity(4);
        collection.add(id(0), id(3));
        let set = collection.set(id(0));
        let mut seen = Vec::new();
        for element in &set {
            seen.push(element.value());
        }
        assert_eq!(seen, vec![0, 3]);
    }
}
