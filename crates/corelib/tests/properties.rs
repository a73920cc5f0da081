//! Property tests for ring lookups.

use corelib::partitioner::Xxh3Partitioner;
use corelib::ring::HashRing;
use proptest::prelude::*;

fn node_names() -> impl Strategy<Value = Vec<String>> {
    prop::collection::hash_set("[a-z]{1,8}\\.[0-9]{1,3}", 1..6)
        .prop_map(|set| set.into_iter().collect())
}

proptest! {
    /// Property: a non-empty ring answers every key, and always the same way.
    #[test]
    fn prop_lookup_total_and_deterministic(
        nodes in node_names(),
        vnodes in 1usize..64,
        keys in prop::collection::vec(".*", 1..50),
    ) {
        let ring = HashRing::new(vnodes, nodes.clone()).unwrap();
        for key in &keys {
            let owner = ring.get(key);
            prop_assert!(owner.is_some());
            prop_assert!(nodes.contains(owner.as_ref().unwrap()));
            prop_assert_eq!(ring.get(key), owner);
        }
    }

    /// Property: the owner is the first position at or after the key's hash,
    /// or the lowest position when the hash is past the end.
    #[test]
    fn prop_owner_is_clockwise_successor(
        nodes in node_names(),
        vnodes in 1usize..32,
        key in ".*",
    ) {
        let ring = HashRing::new(vnodes, nodes).unwrap();
        let tokens = ring.tokens();
        let hash = ring.hash(&key);
        let expected = tokens
            .iter()
            .find(|(t, _)| *t >= hash)
            .or_else(|| tokens.first())
            .map(|(_, n)| n.clone());
        prop_assert_eq!(ring.get(&key), expected);
    }

    /// Property: joining then leaving leaves every key where it was, even when
    /// node names share prefixes (e.g. `ab.1` and `ab.12`).
    #[test]
    fn prop_add_remove_is_inverse(
        nodes in node_names(),
        vnodes in 1usize..32,
        keys in prop::collection::vec("[a-z0-9]{1,16}", 1..50),
    ) {
        let joiner = "joiner.999".to_string();
        prop_assume!(!nodes.contains(&joiner));
        let ring = HashRing::with_partitioner(vnodes, Xxh3Partitioner, nodes).unwrap();
        let before: Vec<_> = keys.iter().map(|k| ring.get(k)).collect();

        let report = ring.add(joiner.clone());
        prop_assert_eq!(report.displaced, 0);
        prop_assert_eq!(report.inserted, vnodes);
        ring.remove(&joiner);

        let after: Vec<_> = keys.iter().map(|k| ring.get(k)).collect();
        prop_assert_eq!(before, after);
    }
}
