use crate::list_node::SlotState;

/// How an element participates in a multi-element group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MultiElementType {
    /// Not merged with anything: either untouched or a singleton.
    Not,
    /// The first element of a group of two or more.
    Head,
    /// Neither end of a group of three or more.
    Interior,
    /// The last element of a group of two or more.
    Tail,
}

impl MultiElementType {
    /// Whether the element stands for its whole group, i.e. it is either
    /// ungrouped or the head of its group.
    pub fn is_representative(self) -> bool {
        matches!(self, MultiElementType::Not | MultiElementType::Head)
    }

    /// Whether the element shares a group with at least one other element.
    pub fn is_multi_element(self) -> bool {
        !matches!(self, MultiElementType::Not)
    }
}

impl From<SlotState> for MultiElementType {
    fn from(state: SlotState) -> Self {
        match state {
            SlotState::Null | SlotState::Singleton => MultiElementType::Not,
            SlotState::Head => MultiElementType::Head,
            SlotState::Interior => MultiElementType::Interior,
            SlotState::Tail => MultiElementType::Tail,
        }
    }
}
