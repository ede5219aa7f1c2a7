use super::*;

use proptest::prelude::*;
use proptest_derive::Arbitrary;
use std::collections::{BTreeMap, BTreeSet};

/// Node count of the unique compressed trie holding `words`: the root, every
/// word, and every prefix where two words part ways.
fn expected_node_count<'a>(words: impl IntoIterator<Item = &'a str>) -> usize {
    let mut nodes: BTreeSet<&str> = BTreeSet::new();
    let mut next: BTreeMap<&str, BTreeSet<u8>> = BTreeMap::new();
    for w in words {
        nodes.insert(w);
        for i in 1..w.len() {
            next.entry(&w[..i]).or_default().insert(w.as_bytes()[i]);
        }
    }
    if nodes.is_empty() {
        return 0;
    }
    for (prefix, letters) in next {
        if letters.len() >= 2 {
            nodes.insert(prefix);
        }
    }
    nodes.len() + 1
}

fn validate_trie(t: &Trie, model: &BTreeMap<u32, String>) {
    let issues = t.verify_integrity();
    assert!(issues.is_empty(), "integrity issues: {issues:?}");

    assert_eq!(t.len(), model.len(), "word count must match model");
    assert_eq!(
        t.node_count(),
        expected_node_count(model.values().map(String::as_str)),
        "trie must stay fully compressed"
    );

    let got: Vec<(u32, Vec<u8>)> = t.words().map(|(id, w)| (id.get(), w.to_vec())).collect();
    let expected: Vec<(u32, Vec<u8>)> = model
        .iter()
        .map(|(id, w)| (*id, w.clone().into_bytes()))
        .collect();
    assert_eq!(got, expected);
}

fn word_strategy() -> impl Strategy<Value = String> {
    // A small alphabet forces shared prefixes, splits and merges.
    "[a-d]{1,6}"
}

fn pattern_strategy() -> impl Strategy<Value = String> {
    "[a-d]{0,4}"
}

#[derive(Clone, Debug, Arbitrary)]
enum Op {
    #[proptest(weight = 6)]
    Insert(#[proptest(strategy = "word_strategy()")] String),
    #[proptest(weight = 3)]
    Delete(#[proptest(strategy = "0u32..64")] u32),
    #[proptest(weight = 3)]
    Derive(
        #[proptest(strategy = "0u32..64")] u32,
        #[proptest(strategy = "0usize..7")] usize,
        #[proptest(strategy = "0usize..7")] usize,
    ),
    #[proptest(weight = 2)]
    Find(#[proptest(strategy = "pattern_strategy()")] String),
    Clear,
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        max_shrink_iters: 10_000,
        .. ProptestConfig::default()
    })]

    #[test]
    fn prop_equivalence(ops in prop::collection::vec(any::<Op>(), 0..=400)) {
        let mut t = Trie::new();
        let mut model: BTreeMap<u32, String> = BTreeMap::new();
        let mut next_id = 0u32;

        for op in ops {
            match op {
                Op::Insert(word) => {
                    let present = model.values().any(|w| *w == word);
                    match t.insert(&word) {
                        Ok(id) => {
                            prop_assert!(!present);
                            prop_assert_eq!(id.get(), next_id);
                            model.insert(next_id, word);
                            next_id += 1;
                        }
                        Err(Error::Duplicate) => prop_assert!(present),
                        Err(e) => prop_assert!(false, "unexpected error {}", e),
                    }
                }
                Op::Delete(id) => {
                    let got = t.delete(WordId::new(id));
                    match model.remove(&id) {
                        Some(_) => prop_assert_eq!(got.unwrap().get(), id),
                        None => {
                            let unknown = matches!(got, Err(Error::UnknownId(_)));
                            prop_assert!(unknown, "expected UnknownId, got {:?}", got);
                        }
                    }
                }
                Op::Derive(id, start, end) => {
                    let before = t.stats();
                    let got = t.derive(WordId::new(id), start, end);
                    match model.get(&id).cloned() {
                        None => {
                            let unknown = matches!(got, Err(Error::UnknownId(_)));
                            prop_assert!(unknown, "expected UnknownId, got {:?}", got);
                        }
                        Some(source) if start > end || end >= source.len() => {
                            let out_of_range = matches!(got, Err(Error::InvalidRange { .. }));
                            prop_assert!(out_of_range, "expected InvalidRange, got {:?}", got);
                        }
                        Some(source) => {
                            let sub = source[start..=end].to_string();
                            let present = model.values().any(|w| *w == sub);
                            match got {
                                Ok(new_id) => {
                                    prop_assert!(!present);
                                    prop_assert_eq!(new_id.get(), next_id);
                                    model.insert(next_id, sub);
                                    next_id += 1;
                                    // Derived words never copy text.
                                    prop_assert_eq!(t.stats().arena_bytes, before.arena_bytes);
                                }
                                Err(Error::Duplicate) => prop_assert!(present),
                                Err(e) => prop_assert!(false, "unexpected error {}", e),
                            }
                        }
                    }
                    if t.stats().next_id == before.next_id {
                        // Rejected derives leave no trace.
                        prop_assert_eq!(t.stats(), before);
                    }
                }
                Op::Find(pattern) => {
                    let expected = model.values().any(|w| w.starts_with(pattern.as_str()));
                    prop_assert_eq!(t.find(&pattern), expected);
                }
                Op::Clear => {
                    t.clear();
                    model.clear();
                    next_id = 0;
                }
            }

            prop_assert_eq!(t.len(), model.len());
        }

        validate_trie(&t, &model);
    }
}

fn for_each_permutation<T: Clone>(items: &[T], mut f: impl FnMut(Vec<T>)) {
    fn rec<T: Clone>(items: &[T], used: &mut [bool], out: &mut Vec<T>, f: &mut impl FnMut(Vec<T>)) {
        if out.len() == items.len() {
            f(out.clone());
            return;
        }
        for i in 0..items.len() {
            if used[i] {
                continue;
            }
            used[i] = true;
            out.push(items[i].clone());
            rec(items, used, out, f);
            out.pop();
            used[i] = false;
        }
    }

    let mut used = vec![false; items.len()];
    let mut out = Vec::with_capacity(items.len());
    rec(items, &mut used, &mut out, &mut f);
}

const SMALL_SET: [&str; 6] = ["a", "ab", "abc", "abd", "b", "ba"];

#[test]
fn exhaustive_insert_order_small_set() {
    for_each_permutation(&SMALL_SET, |perm| {
        let mut t = Trie::new();
        let mut model = BTreeMap::new();
        for (i, w) in perm.into_iter().enumerate() {
            assert_eq!(t.insert(w).unwrap().get(), i as u32);
            model.insert(i as u32, w.to_string());
        }
        validate_trie(&t, &model);
    });
}

#[test]
fn exhaustive_delete_order_small_set() {
    let mut base = Trie::new();
    for w in SMALL_SET {
        base.insert(w).unwrap();
    }

    for_each_permutation(&[0u32, 1, 2, 3, 4, 5], |perm| {
        let mut t = Trie::new();
        let mut model = BTreeMap::new();
        for (i, w) in SMALL_SET.iter().enumerate() {
            t.insert(w).unwrap();
            model.insert(i as u32, w.to_string());
        }
        assert_eq!(t.node_count(), base.node_count());

        for id in perm {
            assert_eq!(t.delete(WordId::new(id)).unwrap().get(), id);
            model.remove(&id);
            validate_trie(&t, &model);
        }
        assert_eq!(t.node_count(), 0);
        assert!(!t.find("a"));
    });
}
