use thiserror::Error;

/// Errors reported when checking an identifier against a collection.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ElementIdError {
    /// The identifier is null.
    #[error("element id is null")]
    Null,
    /// The identifier is beyond the slots the collection was resized to.
    #[error("element id {id} is out of range for capacity {capacity}")]
    OutOfRange { id: i32, capacity: usize },
    /// A slot index does not fit in an element id.
    #[error("index {0} does not fit in an element id")]
    IndexOverflow(usize),
}

/// A broken structural invariant found by a full consistency check. Every
/// variant names the raw value of the offending slot.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantError {
    #[error("slot {slot} has a null next link but non-null prev or opposite")]
    PartialNull { slot: i32 },
    #[error("slot {slot} links to {target}, which is outside capacity {capacity}")]
    DanglingLink {
        slot: i32,
        target: i32,
        capacity: usize,
    },
    #[error("slot {slot} is a head whose prev link is not null")]
    HeadHasPrev { slot: i32 },
    #[error("head {head} points to tail {tail}, but the tail points back to {found}")]
    OppositeMismatch { head: i32, tail: i32, found: i32 },
    #[error("slot {slot} follows {prev}, but its prev link is {found}")]
    BrokenPrevLink { slot: i32, prev: i32, found: i32 },
    #[error("interior slot {slot} has a non-null opposite {opposite}")]
    InteriorOpposite { slot: i32, opposite: i32 },
    #[error("slot {slot} is reachable from more than one head")]
    SharedMember { slot: i32 },
    #[error("walking from head {head} did not reach a tail")]
    UnterminatedChain { head: i32 },
    #[error("slot {slot} is linked but not reachable from any head")]
    Orphan { slot: i32 },
}
