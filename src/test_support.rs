#![cfg(test)]

use std::collections::BTreeSet;

use quickcheck::{Arbitrary, Gen};

use crate::prelude::*;
use crate::tracing_support::{TimingScope, info_span, init_tracing, set_timing_scope};

/// Number of identifiers available to generated scripts.
pub const CAPACITY: usize = 24;

/// One step of a generated script. Indices are interpreted relative to the
/// model state when the step runs, so every script (and every shrink of it)
/// is valid.
#[derive(Debug, Clone, Copy)]
pub enum Op {
    /// Put a free element into an existing group, or into a new one.
    Add { element: usize, group: usize },
    /// Take a member out of its group.
    Remove { group: usize, member: usize },
    /// Join two groups through their set ids.
    Merge { first: usize, second: usize },
}

impl Arbitrary for Op {
    fn arbitrary(g: &mut Gen) -> Self {
        let a = usize::arbitrary(g);
        let b = usize::arbitrary(g);
        match u8::arbitrary(g) % 3 {
            0 => Op::Add {
                element: a,
                group: b,
            },
            1 => Op::Remove {
                group: a,
                member: b,
            },
            _ => Op::Merge {
                first: a,
                second: b,
            },
        }
    }
}

#[derive(Debug, Clone)]
pub struct OpScript {
    pub ops: Vec<Op>,
}

impl Arbitrary for OpScript {
    fn arbitrary(g: &mut Gen) -> Self {
        OpScript {
            ops: Vec::arbitrary(g),
        }
    }

    fn shrink(&self) -> Box<dyn Iterator<Item = Self>> {
        Box::new(self.ops.shrink().map(|ops| OpScript { ops }))
    }
}

/// A list of merges between arbitrary identifiers. Raw values are mapped
/// below [`CAPACITY`] by [`MergeScript::pairs`], so shrunk scripts stay valid.
#[derive(Debug, Clone)]
pub struct MergeScript {
    pub raw: Vec<(u8, u8)>,
}

impl MergeScript {
    pub fn pairs(&self) -> Vec<(NodeId, NodeId)> {
        let node = |value: u8| NodeId::new(i32::from(value) % CAPACITY as i32);
        self.raw.iter().map(|&(a, b)| (node(a), node(b))).collect()
    }
}

impl Arbitrary for MergeScript {
    fn arbitrary(g: &mut Gen) -> Self {
        MergeScript {
            raw: Vec::arbitrary(g),
        }
    }

    fn shrink(&self) -> Box<dyn Iterator<Item = Self>> {
        Box::new(self.raw.shrink().map(|raw| MergeScript { raw }))
    }
}

/// A distinct set collection driven in lockstep with a plain model of its
/// groups.
pub struct GroupModel {
    pub collection: NodeIdDistinctSetCollection,
    pub groups: Vec<(NodeId, BTreeSet<NodeId>)>,
}

impl GroupModel {
    pub fn new() -> Self {
        init_tracing();
        GroupModel {
            collection: NodeIdDistinctSetCollection::with_capacity(CAPACITY),
            groups: Vec::new(),
        }
    }

    pub fn free_elements(&self) -> Vec<NodeId> {
        ElementIdRange::below(CAPACITY)
            .filter(|id| self.groups.iter().all(|(_, members)| !members.contains(id)))
            .collect()
    }

    pub fn apply(&mut self, op: Op) {
        let _span = info_span!("apply").entered();
        match op {
            Op::Add { element, group } => {
                let free = self.free_elements();
                if free.is_empty() {
                    return;
                }
                let element_id = free[element % free.len()];
                let index = group % (self.groups.len() + 1);
                if index == self.groups.len() {
                    let set_id = self.collection.add(NodeId::NULL, element_id);
                    assert_eq!(set_id, element_id);
                    self.groups.push((set_id, BTreeSet::from([element_id])));
                } else {
                    let (set_id, members) = &mut self.groups[index];
                    let new_set_id = self.collection.add(*set_id, element_id);
                    assert_eq!(new_set_id, (*set_id).min(element_id));
                    *set_id = new_set_id;
                    members.insert(element_id);
                }
            }
            Op::Remove { group, member } => {
                if self.groups.is_empty() {
                    return;
                }
                let index = group % self.groups.len();
                let (set_id, members) = &mut self.groups[index];
                let Some(&element_id) = members.iter().nth(member % members.len()) else {
                    return;
                };
                let new_set_id = self.collection.remove(*set_id, element_id);
                members.remove(&element_id);
                if members.is_empty() {
                    assert!(new_set_id.is_null());
                    self.groups.swap_remove(index);
                } else {
                    if element_id != *set_id {
                        assert_eq!(new_set_id, *set_id);
                    }
                    assert!(members.contains(&new_set_id));
                    *set_id = new_set_id;
                }
            }
            Op::Merge { first, second } => {
                if self.groups.len() < 2 {
                    return;
                }
                let first = first % self.groups.len();
                let second = second % self.groups.len();
                if first == second {
                    return;
                }
                let first_id = self.groups[first].0;
                let second_id = self.groups[second].0;
                let merged_id = self.collection.add(first_id, second_id);
                assert_eq!(merged_id, first_id.min(second_id));

                let (_, absorbed) = self.groups.swap_remove(second);
                let keep = if first == self.groups.len() { second } else { first };
                let (set_id, members) = &mut self.groups[keep];
                *set_id = merged_id;
                members.extend(absorbed);
            }
        }
    }

    /// Checks the collection against the model.
    pub fn verify(&self) {
        let _scope = set_timing_scope(TimingScope::Validation);
        assert_eq!(self.collection.validate(), Ok(()));

        for (set_id, members) in &self.groups {
            let chain: Vec<NodeId> = self.collection.chain(*set_id).collect();
            assert_eq!(chain.len(), members.len());
            assert_eq!(chain.iter().copied().collect::<BTreeSet<_>>(), *members);
            assert_eq!(chain.first(), Some(set_id));

            if members.len() == 1 {
                assert_eq!(self.collection.state_of(*set_id), SlotState::Singleton);
                assert_eq!(self.collection.type_of(*set_id), MultiElementType::Not);
                continue;
            }

            let types: Vec<MultiElementType> =
                chain.iter().map(|&id| self.collection.type_of(id)).collect();
            assert_eq!(types[0], MultiElementType::Head);
            assert_eq!(types[types.len() - 1], MultiElementType::Tail);
            assert!(
                types[1..types.len() - 1]
                    .iter()
                    .all(|&t| t == MultiElementType::Interior)
            );
        }

        for id in self.free_elements() {
            assert_eq!(self.collection.state_of(id), SlotState::Null);
        }
    }
}

/// Applies `pairs` to a fresh [`NodeIdSetCollection`], always merging the
/// representatives of both sides, and returns the resulting partition of
/// every identifier below [`CAPACITY`].
pub fn merge_partition(pairs: &[(NodeId, NodeId)]) -> BTreeSet<BTreeSet<NodeId>> {
    init_tracing();
    let mut collection = NodeIdSetCollection::with_capacity(CAPACITY);
    let mut representative: Vec<NodeId> = ElementIdRange::below(CAPACITY).collect();

    for &(a, b) in pairs {
        let rep_a = representative[a.index()];
        let rep_b = representative[b.index()];
        if rep_a == rep_b {
            continue;
        }
        let merged = collection.add(rep_a, rep_b);
        assert_eq!(merged, rep_a.min(rep_b));
        for rep in representative.iter_mut() {
            if *rep == rep_a || *rep == rep_b {
                *rep = merged;
            }
        }
    }

    let _scope = set_timing_scope(TimingScope::Validation);
    assert_eq!(collection.validate(), Ok(()));

    let heads: BTreeSet<NodeId> = representative.iter().copied().collect();
    heads
        .into_iter()
        .map(|head| {
            assert!(collection.type_of(head).is_representative());
            collection.elements(head).into_iter().collect()
        })
        .collect()
}
