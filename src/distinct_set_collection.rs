//! Disjoint groups of element identifiers, stored as intrusive lists.
//!
//! Every identifier owns one [`ListNode`] slot in a flat array. A group is a
//! doubly linked list threaded through those slots, identified by its head;
//! the head and tail each point at the other through `opposite`, so both ends
//! are reachable in O(1). Adding an element to a group, removing it again and
//! joining two groups never walk a list.

use bitvec::vec::BitVec;
use derivative::Derivative;

use crate::{
    distinct_set::{ElementIdChain, ElementIdDistinctSet},
    distinct_sets::ElementIdDistinctSets,
    element_id::{Edge, ElementId, ElementIdRange, ElementKind, Node},
    error::{ElementIdError, InvariantError},
    list_node::{ListNode, SlotState},
    multi_element_type::MultiElementType,
    tracing_support::{TimingScope, info_span, set_timing_scope},
};

/// A collection of disjoint groups keyed by the identifier of each group's
/// head.
///
/// Callers hold on to the head identifier (the "set id") and pass it back to
/// [`add`](Self::add) and [`remove`](Self::remove), which return the possibly
/// changed set id. Elements that were never added belong to no group.
#[derive(Derivative)]
#[derivative(Clone(bound = ""), Debug(bound = ""), Default(bound = ""))]
pub struct ElementIdDistinctSetCollection<K: ElementKind> {
    list: Vec<ListNode<K>>,
}

pub type NodeIdDistinctSetCollection = ElementIdDistinctSetCollection<Node>;
pub type EdgeIdDistinctSetCollection = ElementIdDistinctSetCollection<Edge>;

impl<K: ElementKind> ElementIdDistinctSetCollection<K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let mut collection = Self::new();
        collection.resize(capacity);
        collection
    }

    /// Number of identifiers with a slot.
    pub fn capacity(&self) -> usize {
        self.list.len()
    }

    /// Grows or shrinks the slot array. New slots start out in no group.
    ///
    /// Shrinking must not cut through a group; the caller is expected to
    /// have removed every identifier at or beyond `capacity` first.
    pub fn resize(&mut self, capacity: usize) {
        let _span = info_span!("resize").entered();
        precondition!(
            i32::try_from(capacity).is_ok(),
            "capacity {capacity} exceeds the element id range"
        );
        self.list.resize(capacity, ListNode::default());
    }

    /// Dissolves every group and drops all slots.
    pub fn clear(&mut self) {
        let _span = info_span!("clear").entered();
        self.list.clear();
    }

    fn node(&self, id: ElementId<K>) -> &ListNode<K> {
        precondition!(!id.is_null(), "null element id has no slot");
        &self.list[id.index()]
    }

    fn node_mut(&mut self, id: ElementId<K>) -> &mut ListNode<K> {
        precondition!(!id.is_null(), "null element id has no slot");
        &mut self.list[id.index()]
    }

    /// Checks that `id` names a slot in this collection.
    pub fn check_element_id(&self, id: ElementId<K>) -> Result<(), ElementIdError> {
        if id.is_null() {
            Err(ElementIdError::Null)
        } else if id.index() >= self.capacity() {
            Err(ElementIdError::OutOfRange {
                id: id.value(),
                capacity: self.capacity(),
            })
        } else {
            Ok(())
        }
    }

    /// Adds `element_id` to the group headed by `set_id` and returns the head
    /// of the resulting group.
    ///
    /// A null `set_id` starts a new group containing just `element_id`. When
    /// both identifiers already head groups of their own, the two groups are
    /// joined. The returned id is the smaller of the two arguments, which is
    /// the new head whenever `set_id` was a head.
    pub fn add(&mut self, set_id: ElementId<K>, element_id: ElementId<K>) -> ElementId<K> {
        let set_id = if set_id.is_null() {
            debug_assert!(
                matches!(
                    self.state_of(element_id),
                    SlotState::Null | SlotState::Singleton
                ),
                "{element_id:?} already belongs to a group"
            );
            element_id
        } else {
            set_id
        };

        let (low_id, high_id) = if set_id <= element_id {
            (set_id, element_id)
        } else {
            (element_id, set_id)
        };

        // Singletons rejoin as plain ungrouped elements.
        for id in [low_id, high_id] {
            if self.node(id).is_singleton(id) {
                self.node_mut(id).set_to_null();
            }
        }

        let low = *self.node(low_id);
        let high = *self.node(high_id);

        if low.is_null() && high.is_null() {
            if low_id == high_id {
                self.node_mut(low_id).set_to_singleton(low_id);
            } else {
                *self.node_mut(low_id) = ListNode {
                    prev: ElementId::NULL,
                    next: high_id,
                    opposite: high_id,
                };
                *self.node_mut(high_id) = ListNode {
                    prev: low_id,
                    next: high_id,
                    opposite: low_id,
                };
            }
        } else if low_id == high_id {
            // Already a member of its own group.
        } else if low.is_head(low_id) && high.is_head(high_id) {
            self.concatenate(low_id, &low, high_id, &high);
        } else if high.is_head(high_id) {
            precondition!(low.is_null(), "{low_id:?} already belongs to a group");
            self.push_front(low_id, high_id, &high);
        } else if low.is_tail(low_id) {
            precondition!(high.is_null(), "{high_id:?} already belongs to a group");
            self.push_back(low_id, &low, high_id);
        } else if !low.is_null() {
            precondition!(high.is_null(), "{high_id:?} already belongs to a group");
            self.insert_after(low_id, &low, high_id);
        } else {
            debug_assert!(!high.prev.is_null());
            self.insert_before(low_id, high_id, &high);
        }

        low_id
    }

    /// Appends the group headed by `high_id` to the group headed by `low_id`.
    fn concatenate(
        &mut self,
        low_id: ElementId<K>,
        low: &ListNode<K>,
        high_id: ElementId<K>,
        high: &ListNode<K>,
    ) {
        let tail_one = low.opposite;
        let tail_two = high.opposite;

        let tail_one_node = self.node_mut(tail_one);
        tail_one_node.opposite = ElementId::NULL;
        tail_one_node.next = high_id;

        self.node_mut(tail_two).opposite = low_id;

        let high_node = self.node_mut(high_id);
        high_node.prev = tail_one;
        high_node.opposite = ElementId::NULL;

        self.node_mut(low_id).opposite = tail_two;
    }

    fn push_front(&mut self, low_id: ElementId<K>, high_id: ElementId<K>, high: &ListNode<K>) {
        let tail = high.opposite;
        self.node_mut(tail).opposite = low_id;

        *self.node_mut(low_id) = ListNode {
            prev: ElementId::NULL,
            next: high_id,
            opposite: tail,
        };

        let high_node = self.node_mut(high_id);
        high_node.prev = low_id;
        high_node.opposite = ElementId::NULL;
    }

    fn push_back(&mut self, low_id: ElementId<K>, low: &ListNode<K>, high_id: ElementId<K>) {
        let head = low.opposite;
        self.node_mut(head).opposite = high_id;

        *self.node_mut(high_id) = ListNode {
            prev: low_id,
            next: high_id,
            opposite: head,
        };

        let low_node = self.node_mut(low_id);
        low_node.next = high_id;
        low_node.opposite = ElementId::NULL;
    }

    fn insert_after(&mut self, low_id: ElementId<K>, low: &ListNode<K>, high_id: ElementId<K>) {
        let next = low.next;
        *self.node_mut(high_id) = ListNode {
            prev: low_id,
            next,
            opposite: ElementId::NULL,
        };
        self.node_mut(low_id).next = high_id;
        self.node_mut(next).prev = high_id;
    }

    fn insert_before(&mut self, low_id: ElementId<K>, high_id: ElementId<K>, high: &ListNode<K>) {
        let prev = high.prev;
        *self.node_mut(low_id) = ListNode {
            prev,
            next: high_id,
            opposite: ElementId::NULL,
        };
        self.node_mut(high_id).prev = low_id;
        self.node_mut(prev).next = low_id;
    }

    /// Removes `element_id` from the group headed by `set_id` and returns the
    /// group's new set id, or null once the group is gone.
    ///
    /// | `element_id` is        | result                              |
    /// |------------------------|-------------------------------------|
    /// | in no group            | `set_id`, or null if it is `set_id` |
    /// | a singleton            | null                                |
    /// | head of a pair         | the tail, now a singleton           |
    /// | tail of a pair         | the head, now a singleton           |
    /// | head of a larger group | its successor, the new head         |
    /// | tail of a larger group | the head                            |
    /// | interior               | `set_id`                            |
    pub fn remove(&mut self, set_id: ElementId<K>, element_id: ElementId<K>) -> ElementId<K> {
        let node = *self.node(element_id);

        let new_set_id = if node.is_null() {
            if set_id == element_id {
                ElementId::NULL
            } else {
                set_id
            }
        } else if node.is_singleton(element_id) {
            ElementId::NULL
        } else if node.next == node.opposite {
            let tail = node.next;
            self.node_mut(tail).set_to_singleton(tail);
            tail
        } else if node.prev == node.opposite {
            let head = node.prev;
            self.node_mut(head).set_to_singleton(head);
            head
        } else if node.is_head(element_id) {
            let next = node.next;
            let next_node = self.node_mut(next);
            next_node.prev = ElementId::NULL;
            next_node.opposite = node.opposite;
            self.node_mut(node.opposite).opposite = next;
            next
        } else if node.is_tail(element_id) {
            let prev = node.prev;
            let prev_node = self.node_mut(prev);
            prev_node.next = prev;
            prev_node.opposite = node.opposite;
            self.node_mut(node.opposite).opposite = prev;
            node.opposite
        } else {
            self.node_mut(node.prev).next = node.next;
            self.node_mut(node.next).prev = node.prev;
            set_id
        };

        self.node_mut(element_id).set_to_null();

        debug_assert!(
            new_set_id.is_null()
                || new_set_id == set_id
                || self.node(new_set_id).is_head(new_set_id)
        );
        new_set_id
    }

    pub fn type_of(&self, element_id: ElementId<K>) -> MultiElementType {
        self.state_of(element_id).into()
    }

    pub fn state_of(&self, element_id: ElementId<K>) -> SlotState {
        self.node(element_id).state(element_id)
    }

    /// Whether `element_id` is linked into a group, singletons included.
    pub fn is_grouped(&self, element_id: ElementId<K>) -> bool {
        !self.node(element_id).is_null()
    }

    pub(crate) fn next_in_chain(&self, element_id: ElementId<K>) -> Option<ElementId<K>> {
        let node = self.node(element_id);
        node.has_next(element_id).then_some(node.next)
    }

    /// The head of the group `element_id` belongs to, or `None` when it is
    /// in no group. Interior and tail members walk to the tail, whose
    /// `opposite` is the head.
    pub fn head_of(&self, element_id: ElementId<K>) -> Option<ElementId<K>> {
        match self.state_of(element_id) {
            SlotState::Null => None,
            SlotState::Singleton | SlotState::Head => Some(element_id),
            SlotState::Interior | SlotState::Tail => {
                let mut tail = element_id;
                while let Some(next) = self.next_in_chain(tail) {
                    tail = next;
                }
                Some(self.node(tail).opposite)
            }
        }
    }

    /// Walks the group headed by `head`. An identifier in no group yields
    /// just itself.
    pub fn chain(&self, head: ElementId<K>) -> ElementIdChain<'_, K> {
        debug_assert!(
            head.is_null() || self.type_of(head).is_representative(),
            "{head:?} does not head a group"
        );
        ElementIdChain::new(self, head)
    }

    /// A read-only view of the group headed by `head`.
    pub fn set(&self, head: ElementId<K>) -> ElementIdDistinctSet<K, &Self> {
        ElementIdDistinctSet::with_head(head, self)
    }

    /// A view of the group headed by `head` through which elements can be
    /// added and removed.
    pub fn set_mut(&mut self, head: ElementId<K>) -> ElementIdDistinctSet<K, &mut Self> {
        ElementIdDistinctSet::with_head(head, self)
    }

    /// A view with no head yet; the first element added starts a new group.
    pub fn empty_set_mut(&mut self) -> ElementIdDistinctSet<K, &mut Self> {
        ElementIdDistinctSet::empty(self)
    }

    /// Read-only views of several groups at once.
    pub fn sets<I>(&self, heads: I) -> ElementIdDistinctSets<K, &Self>
    where
        I: IntoIterator<Item = ElementId<K>>,
    {
        heads.into_iter().map(|head| self.set(head)).collect()
    }

    /// Checks every structural invariant of the slot array: links stay in
    /// range, every head's walk ends at the tail that points back to it,
    /// `prev` mirrors `next`, no slot is shared between groups and no linked
    /// slot is unreachable.
    pub fn validate(&self) -> Result<(), InvariantError> {
        let _scope = set_timing_scope(TimingScope::Validation);
        let _span = info_span!("validate").entered();

        let capacity = self.capacity();
        let in_range = |id: ElementId<K>| id.is_null() || id.index() < capacity;

        for (id, node) in ElementIdRange::<K>::below(capacity).zip(&self.list) {
            if node.is_null() {
                if !node.prev.is_null() || !node.opposite.is_null() {
                    return Err(InvariantError::PartialNull { slot: id.value() });
                }
                continue;
            }
            for target in [node.prev, node.next, node.opposite] {
                if !in_range(target) {
                    return Err(InvariantError::DanglingLink {
                        slot: id.value(),
                        target: target.value(),
                        capacity,
                    });
                }
            }
        }

        let mut visited = BitVec::<usize>::repeat(false, capacity);
        for (id, node) in ElementIdRange::<K>::below(capacity).zip(&self.list) {
            if node.is_head(id) {
                self.validate_chain(id, &mut visited)?;
            }
        }

        match visited.iter_zeros().find(|&index| !self.list[index].is_null()) {
            Some(index) => Err(InvariantError::Orphan {
                slot: Self::slot_value(index),
            }),
            None => Ok(()),
        }
    }

    fn slot_value(index: usize) -> i32 {
        ElementId::<K>::try_from_index(index).map_or(i32::MAX, ElementId::value)
    }

    fn validate_chain(&self, head: ElementId<K>, visited: &mut BitVec) -> Result<(), InvariantError> {
        let head_node = &self.list[head.index()];
        if head_node.is_singleton(head) {
            if visited.replace(head.index(), true) {
                return Err(InvariantError::SharedMember { slot: head.value() });
            }
            return Ok(());
        }
        if !head_node.prev.is_null() {
            return Err(InvariantError::HeadHasPrev { slot: head.value() });
        }

        let tail = head_node.opposite;
        let mut current = head;
        for _ in 0..self.capacity() {
            if visited.replace(current.index(), true) {
                return Err(InvariantError::SharedMember {
                    slot: current.value(),
                });
            }
            let node = &self.list[current.index()];
            if current != head {
                if node.is_tail(current) {
                    if current != tail || node.opposite != head {
                        return Err(InvariantError::OppositeMismatch {
                            head: head.value(),
                            tail: tail.value(),
                            found: node.opposite.value(),
                        });
                    }
                    return Ok(());
                }
                if !node.opposite.is_null() {
                    return Err(InvariantError::InteriorOpposite {
                        slot: current.value(),
                        opposite: node.opposite.value(),
                    });
                }
            }

            let next = node.next;
            let found = self.list[next.index()].prev;
            if found != current {
                return Err(InvariantError::BrokenPrevLink {
                    slot: next.value(),
                    prev: current.value(),
                    found: found.value(),
                });
            }
            current = next;
        }

        Err(InvariantError::UnterminatedChain { head: head.value() })
    }
}
