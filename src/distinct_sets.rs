use std::{
    cell::Cell,
    fmt::{Debug, Formatter},
    iter::FusedIterator,
    ops::Deref,
};

use crate::{
    distinct_set::{ElementIdChain, ElementIdDistinctSet},
    distinct_set_collection::{
        EdgeIdDistinctSetCollection, ElementIdDistinctSetCollection, NodeIdDistinctSetCollection,
    },
    element_id::{Edge, ElementId, ElementKind, Node},
};

/// Several group views treated as one sequence of identifiers.
pub struct ElementIdDistinctSets<K: ElementKind, C> {
    sets: Vec<ElementIdDistinctSet<K, C>>,
    size: Cell<Option<usize>>,
}

pub type NodeIdDistinctSets<'a> = ElementIdDistinctSets<Node, &'a NodeIdDistinctSetCollection>;
pub type EdgeIdDistinctSets<'a> = ElementIdDistinctSets<Edge, &'a EdgeIdDistinctSetCollection>;

impl<K, C> ElementIdDistinctSets<K, C>
where
    K: ElementKind,
    C: Deref<Target = ElementIdDistinctSetCollection<K>>,
{
    pub fn new() -> Self {
        ElementIdDistinctSets {
            sets: Vec::new(),
            size: Cell::new(Some(0)),
        }
    }

    pub fn push(&mut self, set: ElementIdDistinctSet<K, C>) {
        if let Some(size) = self.size.get() {
            self.size.set(Some(size + set.len()));
        }
        self.sets.push(set);
    }

    pub fn sets(&self) -> &[ElementIdDistinctSet<K, C>] {
        &self.sets
    }

    pub fn iter(&self) -> ElementIdDistinctSetsIter<'_, K, C> {
        ElementIdDistinctSetsIter {
            sets: &self.sets,
            current: None,
        }
    }

    /// Total number of identifiers across all sets.
    pub fn len(&self) -> usize {
        match self.size.get() {
            Some(size) => size,
            None => {
                let size = self.sets.iter().map(ElementIdDistinctSet::len).sum();
                self.size.set(Some(size));
                size
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.sets.iter().all(ElementIdDistinctSet::is_empty)
    }

    pub fn to_vec(&self) -> Vec<ElementId<K>> {
        self.iter().collect()
    }
}

impl<K, C> Default for ElementIdDistinctSets<K, C>
where
    K: ElementKind,
    C: Deref<Target = ElementIdDistinctSetCollection<K>>,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K: ElementKind, C> FromIterator<ElementIdDistinctSet<K, C>> for ElementIdDistinctSets<K, C> {
    fn from_iter<I: IntoIterator<Item = ElementIdDistinctSet<K, C>>>(iter: I) -> Self {
        ElementIdDistinctSets {
            sets: iter.into_iter().collect(),
            size: Cell::new(None),
        }
    }
}

impl<K, C> Debug for ElementIdDistinctSets<K, C>
where
    K: ElementKind,
    C: Deref<Target = ElementIdDistinctSetCollection<K>>,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.sets.iter()).finish()
    }
}

/// Iterator over every identifier of every set, set by set.
pub struct ElementIdDistinctSetsIter<'a, K: ElementKind, C> {
    sets: &'a [ElementIdDistinctSet<K, C>],
    current: Option<ElementIdChain<'a, K>>,
}

impl<'a, K, C> Iterator for ElementIdDistinctSetsIter<'a, K, C>
where
    K: ElementKind,
    C: Deref<Target = ElementIdDistinctSetCollection<K>>,
{
    type Item = ElementId<K>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(id) = self.current.as_mut().and_then(|chain| chain.next()) {
                return Some(id);
            }
            let (first, rest) = self.sets.split_first()?;
            self.sets = rest;
            self.current = Some(first.iter());
        }
    }
}

impl<K, C> FusedIterator for ElementIdDistinctSetsIter<'_, K, C>
where
    K: ElementKind,
    C: Deref<Target = ElementIdDistinctSetCollection<K>>,
{
}

impl<'a, K, C> IntoIterator for &'a ElementIdDistinctSets<K, C>
where
    K: ElementKind,
    C: Deref<Target = ElementIdDistinctSetCollection<K>>,
{
    type Item = ElementId<K>;
    type IntoIter = ElementIdDistinctSetsIter<'a, K, C>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
