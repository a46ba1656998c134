//! The per-identifier slot of the intrusive group lists.
//!
//! Slot shapes, for an element `x` owning the slot:
//!
//! | state     | prev        | next        | opposite |
//! |-----------|-------------|-------------|----------|
//! | null      | null        | null        | null     |
//! | singleton | `x`         | `x`         | `x`      |
//! | head      | null        | successor   | tail     |
//! | interior  | predecessor | successor   | null     |
//! | tail      | predecessor | `x`         | head     |

use derivative::Derivative;

use crate::element_id::{ElementId, ElementKind};

/// Position of an element within the group state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlotState {
    /// Not a member of any group.
    Null,
    /// The only member of its group.
    Singleton,
    Head,
    Interior,
    Tail,
}

#[derive(Derivative)]
#[derivative(
    Clone(bound = ""),
    Copy(bound = ""),
    Debug(bound = ""),
    Default(bound = ""),
    PartialEq(bound = ""),
    Eq(bound = "")
)]
pub(crate) struct ListNode<K: ElementKind> {
    pub(crate) prev: ElementId<K>,
    pub(crate) next: ElementId<K>,
    pub(crate) opposite: ElementId<K>,
}

impl<K: ElementKind> ListNode<K> {
    pub(crate) fn is_null(&self) -> bool {
        self.next.is_null()
    }

    pub(crate) fn is_tail(&self, element_id: ElementId<K>) -> bool {
        !self.is_null() && self.next == element_id
    }

    pub(crate) fn is_head(&self, element_id: ElementId<K>) -> bool {
        !self.is_null()
            && !self.opposite.is_null()
            && (!self.is_tail(element_id) || self.opposite == element_id)
    }

    pub(crate) fn is_singleton(&self, element_id: ElementId<K>) -> bool {
        self.is_head(element_id) && self.is_tail(element_id)
    }

    /// Whether walking forward from `element_id` continues past it.
    pub(crate) fn has_next(&self, element_id: ElementId<K>) -> bool {
        !self.next.is_null() && !self.is_tail(element_id)
    }

    pub(crate) fn set_to_null(&mut self) {
        *self = Self::default();
    }

    pub(crate) fn set_to_singleton(&mut self, element_id: ElementId<K>) {
        self.prev = element_id;
        self.next = element_id;
        self.opposite = element_id;
    }

    pub(crate) fn state(&self, element_id: ElementId<K>) -> SlotState {
        if self.is_null() {
            SlotState::Null
        } else if self.is_singleton(element_id) {
            SlotState::Singleton
        } else if self.is_head(element_id) {
            SlotState::Head
        } else if self.is_tail(element_id) {
            SlotState::Tail
        } else {
            SlotState::Interior
        }
    }
}
