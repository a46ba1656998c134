//! Strongly typed, nullable integer handles for graph elements.
//!
//! An [`ElementId`] is a plain `i32` with a zero-sized kind marker attached, so
//! node, edge and component identifiers cannot be mixed up at the type level
//! while still being stored in bulk exactly like integers.

use std::{
    collections::{HashMap, HashSet},
    fmt::{Debug, Display, Formatter},
    hash::{BuildHasherDefault, Hasher},
    iter::FusedIterator,
    marker::PhantomData,
    mem::size_of,
};

use derivative::Derivative;

use crate::error::ElementIdError;

/// Marker trait for the kinds of graph element an [`ElementId`] can name.
pub trait ElementKind: 'static {
    /// Name used when formatting identifiers of this kind, e.g. `NodeId`.
    const NAME: &'static str;
}

/// Kind marker for graph nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Node {}

/// Kind marker for graph edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Edge {}

/// Kind marker for connected components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Component {}

impl ElementKind for Node {
    const NAME: &'static str = "NodeId";
}

impl ElementKind for Edge {
    const NAME: &'static str = "EdgeId";
}

impl ElementKind for Component {
    const NAME: &'static str = "ComponentId";
}

/// A nullable identifier for a graph element of kind `K`.
///
/// The null value is `-1`. Ordering, equality and hashing all operate on the
/// underlying integer only.
#[derive(Derivative)]
#[derivative(
    Clone(bound = ""),
    Copy(bound = ""),
    PartialEq(bound = ""),
    Eq(bound = ""),
    Hash(bound = ""),
    PartialOrd(bound = ""),
    Ord(bound = "")
)]
#[repr(transparent)]
pub struct ElementId<K: ElementKind> {
    value: i32,
    #[derivative(
        PartialEq = "ignore",
        Hash = "ignore",
        PartialOrd = "ignore",
        Ord = "ignore"
    )]
    _kind: PhantomData<fn() -> K>,
}

pub type NodeId = ElementId<Node>;
pub type EdgeId = ElementId<Edge>;
pub type ComponentId = ElementId<Component>;

// Arrays of identifiers are sized by raw integer width.
const _: () = assert!(size_of::<NodeId>() == size_of::<i32>());
const _: () = assert!(size_of::<EdgeId>() == size_of::<i32>());
const _: () = assert!(size_of::<ComponentId>() == size_of::<i32>());

impl<K: ElementKind> ElementId<K> {
    const NULL_VALUE: i32 = -1;

    /// The null identifier.
    pub const NULL: Self = Self::new(Self::NULL_VALUE);

    pub const fn new(value: i32) -> Self {
        ElementId {
            value,
            _kind: PhantomData,
        }
    }

    pub const fn null() -> Self {
        Self::NULL
    }

    pub const fn is_null(self) -> bool {
        self.value == Self::NULL_VALUE
    }

    pub fn set_to_null(&mut self) {
        self.value = Self::NULL_VALUE;
    }

    /// The raw integer value; `-1` for null.
    pub const fn value(self) -> i32 {
        self.value
    }

    /// The slot index for this identifier. Null (and any other negative
    /// value) maps to `usize::MAX` so that indexing with it panics instead of
    /// touching a neighboring slot.
    pub fn index(self) -> usize {
        usize::try_from(self.value).unwrap_or(usize::MAX)
    }

    /// Converts a slot index back into an identifier.
    pub fn try_from_index(index: usize) -> Result<Self, ElementIdError> {
        i32::try_from(index)
            .map(Self::new)
            .map_err(|_| ElementIdError::IndexOverflow(index))
    }

    /// Pre-increment: advances this identifier and returns the new value.
    pub fn increment(&mut self) -> Self {
        self.value += 1;
        *self
    }

    /// Post-increment: advances this identifier and returns the old value.
    pub fn post_increment(&mut self) -> Self {
        let previous = *self;
        self.value += 1;
        previous
    }

    /// Pre-decrement: moves this identifier back and returns the new value.
    pub fn decrement(&mut self) -> Self {
        self.value -= 1;
        *self
    }

    /// Post-decrement: moves this identifier back and returns the old value.
    pub fn post_decrement(&mut self) -> Self {
        let previous = *self;
        self.value -= 1;
        previous
    }

    /// The identifier following this one.
    pub fn successor(self) -> Self {
        Self::new(self.value + 1)
    }
}

impl<K: ElementKind> Default for ElementId<K> {
    fn default() -> Self {
        Self::NULL
    }
}

impl<K: ElementKind> From<i32> for ElementId<K> {
    fn from(value: i32) -> Self {
        Self::new(value)
    }
}

impl<K: ElementKind> From<ElementId<K>> for i32 {
    fn from(id: ElementId<K>) -> Self {
        id.value
    }
}

impl<K: ElementKind> PartialEq<i32> for ElementId<K> {
    fn eq(&self, other: &i32) -> bool {
        self.value == *other
    }
}

impl<K: ElementKind> PartialOrd<i32> for ElementId<K> {
    fn partial_cmp(&self, other: &i32) -> Option<std::cmp::Ordering> {
        self.value.partial_cmp(other)
    }
}

impl<K: ElementKind> Display for ElementId<K> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.is_null() {
            write!(f, "Null")
        } else {
            write!(f, "{}", self.value)
        }
    }
}

impl<K: ElementKind> Debug for ElementId<K> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", K::NAME, self)
    }
}

/// A [`Hasher`] that passes the identifier's integer through unchanged, so
/// hashed containers of identifiers behave like direct-indexed tables.
#[derive(Debug, Default, Clone, Copy)]
pub struct ElementIdHasher(u64);

impl Hasher for ElementIdHasher {
    fn finish(&self) -> u64 {
        self.0
    }

    fn write(&mut self, bytes: &[u8]) {
        for byte in bytes {
            self.0 = (self.0 << 8) | u64::from(*byte);
        }
    }

    fn write_i32(&mut self, value: i32) {
        self.0 = value as u64;
    }
}

pub type BuildElementIdHasher = BuildHasherDefault<ElementIdHasher>;

pub type ElementIdSet<K> = HashSet<ElementId<K>, BuildElementIdHasher>;
pub type ElementIdMap<K, V> = HashMap<ElementId<K>, V, BuildElementIdHasher>;

pub type NodeIdSet = ElementIdSet<Node>;
pub type EdgeIdSet = ElementIdSet<Edge>;
pub type ComponentIdSet = ElementIdSet<Component>;

pub type NodeIdMap<V> = ElementIdMap<Node, V>;
pub type EdgeIdMap<V> = ElementIdMap<Edge, V>;
pub type ComponentIdMap<V> = ElementIdMap<Component, V>;

/// Iterator over the identifiers in a half-open range `[start, end)`.
#[derive(Derivative)]
#[derivative(Clone(bound = ""), Debug(bound = ""))]
pub struct ElementIdRange<K: ElementKind> {
    next: ElementId<K>,
    end: ElementId<K>,
}

impl<K: ElementKind> ElementIdRange<K> {
    pub fn new(start: ElementId<K>, end: ElementId<K>) -> Self {
        ElementIdRange { next: start, end }
    }

    /// Every identifier whose slot fits in `capacity`.
    pub fn below(capacity: usize) -> Self {
        let end = i32::try_from(capacity).unwrap_or(i32::MAX);
        Self::new(ElementId::new(0), ElementId::new(end))
    }
}

impl<K: ElementKind> Iterator for ElementIdRange<K> {
    type Item = ElementId<K>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next < self.end {
            Some(self.next.post_increment())
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = usize::try_from(self.end.value - self.next.value).unwrap_or(0);
        (remaining, Some(remaining))
    }
}

impl<K: ElementKind> ExactSizeIterator for ElementIdRange<K> {}

impl<K: ElementKind> FusedIterator for ElementIdRange<K> {}
