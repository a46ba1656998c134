use std::collections::BTreeSet;

use element_id_sets::prelude::*;
use quickcheck::TestResult;
use quickcheck_macros::quickcheck;

const CAPACITY: usize = 64;

fn node(value: u8) -> NodeId {
    NodeId::new(i32::from(value) % CAPACITY as i32)
}

fn distinct_nodes(values: &[u8]) -> Vec<NodeId> {
    let mut seen = BTreeSet::new();
    values
        .iter()
        .map(|&value| node(value))
        .filter(|id| seen.insert(*id))
        .collect()
}

fn id_set(values: &[i32]) -> NodeIdSet {
    values.iter().copied().map(NodeId::new).collect()
}

#[test]
fn test_cleared_ids_are_not_merged() {
    let mut collection = NodeIdSetCollection::with_capacity(8);
    collection.add(NodeId::new(1), NodeId::new(2));
    collection.add(NodeId::new(1), NodeId::new(5));
    collection.clear();
    collection.resize(8);
    for id in ElementIdRange::below(8) {
        assert_eq!(collection.type_of(id), MultiElementType::Not);
    }
    assert_eq!(collection.validate(), Ok(()));
}

#[test]
fn test_grow_and_shrink_scenario() {
    let mut collection = NodeIdDistinctSetCollection::with_capacity(10);
    let set_id = collection.add(NodeId::NULL, NodeId::new(5));
    assert_eq!(set_id, NodeId::new(5));
    let set_id = collection.add(set_id, NodeId::new(9));
    assert_eq!(set_id, NodeId::new(5));
    let set_id = collection.add(set_id, NodeId::new(2));
    assert_eq!(set_id, NodeId::new(2));

    let members: BTreeSet<i32> = collection.chain(set_id).map(NodeId::value).collect();
    assert_eq!(members, BTreeSet::from([2, 5, 9]));
    assert_eq!(collection.type_of(NodeId::new(5)), MultiElementType::Interior);

    let set_id = collection.remove(set_id, NodeId::new(5));
    assert_eq!(set_id, NodeId::new(2));
    let members: BTreeSet<i32> = collection.chain(set_id).map(NodeId::value).collect();
    assert_eq!(members, BTreeSet::from([2, 9]));
    assert_eq!(collection.validate(), Ok(()));
}

#[test]
fn test_merge_order_of_three() {
    let mut forward = NodeIdSetCollection::with_capacity(4);
    let head = forward.add(NodeId::new(1), NodeId::new(2));
    forward.add(head, NodeId::new(3));

    let mut backward = NodeIdSetCollection::with_capacity(4);
    let head = backward.add(NodeId::new(2), NodeId::new(3));
    backward.add(NodeId::new(1), head);

    assert_eq!(forward.elements(NodeId::new(1)), id_set(&[1, 2, 3]));
    assert_eq!(backward.elements(NodeId::new(1)), id_set(&[1, 2, 3]));
}

#[test]
fn test_set_views_over_edges() {
    let mut collection = EdgeIdDistinctSetCollection::with_capacity(6);
    {
        let mut set: EdgeIdDistinctSet<'_> = collection.empty_set_mut();
        set.add(EdgeId::new(4));
        set.add(EdgeId::new(1));
        set.add(EdgeId::new(3));
        assert_eq!(set.head(), EdgeId::new(1));
        assert_eq!(set.len(), 3);
    }
    let set: ConstEdgeIdDistinctSet<'_> = collection.set(EdgeId::new(1));
    let members: Vec<EdgeId> = set.iter().collect();
    assert_eq!(members.len(), 3);
    assert_eq!(members[0], EdgeId::new(1));

    let sets = collection.sets([EdgeId::new(1), EdgeId::new(5)]);
    assert_eq!(sets.len(), 4);
    assert_eq!(sets.to_vec().last(), Some(&EdgeId::new(5)));
}

#[quickcheck]
fn prop_merge_then_remove_leaves_singleton(a: u8, b: u8, remove_first: bool) -> TestResult {
    let (a, b) = (node(a), node(b));
    if a == b {
        return TestResult::discard();
    }
    let (gone, kept) = if remove_first { (a, b) } else { (b, a) };

    let mut collection = NodeIdSetCollection::with_capacity(CAPACITY);
    collection.add(a, b);
    collection.remove(gone);
    let mut elements = NodeIdSet::default();
    elements.insert(kept);

    let mut distinct = NodeIdDistinctSetCollection::with_capacity(CAPACITY);
    let set_id = distinct.add(a, b);
    let set_id = distinct.remove(set_id, gone);

    TestResult::from_bool(
        collection.type_of(kept) == MultiElementType::Not
            && collection.elements(kept) == elements
            && set_id == kept
            && distinct.chain(set_id).collect::<Vec<_>>() == vec![kept]
            && distinct.validate().is_ok(),
    )
}

#[quickcheck]
fn prop_merged_chain_has_one_head_and_one_tail(values: Vec<u8>) -> TestResult {
    let ids = distinct_nodes(&values);
    let Some((&first, rest)) = ids.split_first() else {
        return TestResult::discard();
    };

    let mut collection = NodeIdSetCollection::with_capacity(CAPACITY);
    let mut head = first;
    for &id in rest {
        head = collection.add(head, id);
    }

    let elements = collection.elements(head);
    let count = |kind| ids.iter().filter(|&&id| collection.type_of(id) == kind).count();
    let shape_ok = if ids.len() == 1 {
        count(MultiElementType::Not) == 1
    } else {
        count(MultiElementType::Head) == 1
            && count(MultiElementType::Tail) == 1
            && count(MultiElementType::Interior) == ids.len() - 2
    };

    TestResult::from_bool(
        elements.len() == ids.len()
            && ids.iter().all(|id| elements.contains(id))
            && shape_ok
            && collection.validate().is_ok(),
    )
}

#[quickcheck]
fn prop_groups_are_disjoint(values: Vec<u8>, split: usize) -> TestResult {
    let ids = distinct_nodes(&values);
    if ids.len() < 2 {
        return TestResult::discard();
    }
    let (left, right) = ids.split_at(1 + split % (ids.len() - 1));

    let mut collection = NodeIdSetCollection::with_capacity(CAPACITY);
    let mut heads = Vec::new();
    for part in [left, right] {
        let mut head = part[0];
        for &id in &part[1..] {
            head = collection.add(head, id);
        }
        heads.push(head);
    }

    let first = collection.elements(heads[0]);
    let second = collection.elements(heads[1]);
    TestResult::from_bool(
        first.is_disjoint(&second) && first.len() + second.len() == ids.len(),
    )
}

#[quickcheck]
fn prop_removal_keeps_or_moves_set_id(values: Vec<u8>, pick: usize) -> TestResult {
    let ids = distinct_nodes(&values);
    if ids.len() < 3 {
        return TestResult::discard();
    }

    let mut collection = NodeIdDistinctSetCollection::with_capacity(CAPACITY);
    let mut set_id = NodeId::NULL;
    for &id in &ids {
        set_id = collection.add(set_id, id);
    }

    let victim = ids[pick % ids.len()];
    let victim_type = collection.type_of(victim);
    let new_set_id = collection.remove(set_id, victim);

    let ok = match victim_type {
        MultiElementType::Head => {
            !new_set_id.is_null()
                && new_set_id != set_id
                && collection.type_of(new_set_id) == MultiElementType::Head
        }
        _ => new_set_id == set_id,
    };
    TestResult::from_bool(
        ok && collection.chain(new_set_id).count() == ids.len() - 1
            && collection.validate().is_ok(),
    )
}
