use std::time::{SystemTime, UNIX_EPOCH};

use rand::{rngs::SmallRng, Rng, SeedableRng};

use crate::error::Error;
use crate::rb::{Colour, RbTree};

fn inorder(tree: &RbTree<i64>) -> Vec<i64> {
    let mut out = vec![];
    tree.traverse_inorder(|v| out.push(*v));
    out
}

#[test]
fn test_empty() {
    let mut tree: RbTree<i64> = RbTree::new();
    assert!(tree.is_empty());
    assert_eq!(tree.black_height(), 0);
    assert_eq!(tree.root(), None);
    assert_eq!(tree.delete(&1), Err(Error::RemoveFromEmpty));
    assert!(tree.validate().is_ok());
}

#[test]
fn test_recolour_and_rotate() {
    let mut tree = RbTree::new();
    for v in [10, 20, 30, 15, 25, 5].iter() {
        tree.insert(*v).unwrap();
        assert!(tree.validate().is_ok());
    }
    assert_eq!(inorder(&tree), vec![5, 10, 15, 20, 25, 30]);
    assert_eq!(tree.root(), Some(&20));
    assert_eq!(tree.colour_of(&20), Some(Colour::Black));
    assert_eq!(tree.colour_of(&10), Some(Colour::Black));
    assert_eq!(tree.colour_of(&30), Some(Colour::Black));
    for leaf in [5, 15, 25].iter() {
        assert_eq!(tree.colour_of(leaf), Some(Colour::Red));
    }
    assert_eq!(tree.colour_of(&99), None);
    assert_eq!(tree.black_height(), 2);

    let stats = tree.validate().unwrap();
    assert_eq!(stats.entries(), 6);
    assert_eq!(stats.blacks(), Some(2));
    assert_eq!(stats.height(), Some(3));
}

#[test]
fn test_fresh_root_is_black() {
    let mut tree = RbTree::new();
    tree.insert(1).unwrap();
    assert_eq!(tree.colour_of(&1), Some(Colour::Black));
    assert_eq!(tree.black_height(), 1);
}

#[test]
fn test_multiplicity() {
    let mut tree = RbTree::new();
    assert_eq!(tree.insert(7), Ok(1));
    assert_eq!(tree.insert(7), Ok(2));
    assert_eq!(tree.len(), 1);
    assert_eq!(tree.insert_unique(7), Err(Error::Duplicate));
    tree.delete(&7).unwrap();
    assert_eq!(tree.multiplicity(&7), 1);
    tree.delete(&7).unwrap();
    assert!(tree.is_empty());

    tree.insert(1).unwrap();
    assert_eq!(tree.delete(&7), Err(Error::KeyNotFound));
}

#[test]
fn test_delete_cases() {
    // ascending inserts followed by deletes from both ends and the
    // middle walk through every sibling case.
    let mut tree = RbTree::load_from(0..64).unwrap();
    assert!(tree.validate().is_ok());
    let mut expect: Vec<i64> = (0..64).collect();
    for key in [0, 63, 31, 32, 1, 62, 16, 48, 8, 40].iter() {
        tree.delete(key).unwrap();
        expect.retain(|k| k != key);
        assert!(tree.validate().is_ok(), "after delete {}", key);
        assert_eq!(inorder(&tree), expect);
    }
    while let Some(root) = tree.root().copied() {
        assert_eq!(tree.remove(&root), Ok(root));
        assert!(tree.validate().is_ok());
    }
    assert_eq!(tree.len(), 0);
}

#[test]
fn test_queries() {
    let tree = RbTree::load_from(vec![50, 20, 80, 10, 30, 70, 90, 25]).unwrap();
    assert_eq!(tree.min(), Some(&10));
    assert_eq!(tree.max(), Some(&90));
    assert_eq!(tree.predecessor(&30), Some(&25));
    assert_eq!(tree.successor(&30), Some(&50));
    assert_eq!(tree.successor(&90), None);
    assert_eq!(tree.min_below(&80), Some(&70));
    assert_eq!(tree.lowest_common_ancestor(&10, &25), Ok(&20));
    assert_eq!(tree.lowest_common_ancestor(&25, &90), Ok(&50));
    assert_eq!(tree.lowest_common_ancestor(&25, &91), Err(Error::KeyNotFound));

    let mut level = vec![];
    tree.traverse_level(|v| level.push(*v));
    assert_eq!(level[0], 50);
    assert_eq!(level.len(), 8);

    let mut pre = vec![];
    tree.traverse_preorder(|v| pre.push(*v));
    let mut post = vec![];
    tree.traverse_postorder(|v| post.push(*v));
    assert_eq!(pre[0], 50);
    assert_eq!(post[7], 50);
}

#[test]
fn test_crud() {
    let size = 500;
    let mut tree: RbTree<i64> = RbTree::new();
    let mut refs = RefCounts::new(size);
    let mut rng = make_rng();

    for _ in 0..20_000 {
        let key = (rng.gen::<u64>() % (size as u64)) as i64;
        match rng.gen::<u8>() % 5 {
            0 | 1 => {
                let n = tree.insert(key).unwrap();
                assert_eq!(n, refs.insert(key));
            }
            2 => {
                let ok = tree.delete(&key).is_ok();
                assert_eq!(ok, refs.delete(key));
            }
            3 => {
                let res = tree.remove(&key).ok();
                assert_eq!(res.is_some(), refs.remove(key).is_some());
            }
            4 => {
                assert_eq!(tree.multiplicity(&key), refs.multiplicity(key));
                assert_eq!(tree.predecessor(&key).copied(), refs.predecessor(key));
                assert_eq!(tree.successor(&key).copied(), refs.successor(key));
            }
            op => panic!("unreachable {}", op),
        };

        assert!(tree.validate().is_ok());
        assert_eq!(tree.len(), refs.len());
    }

    println!("rb-length {}", tree.len());
    assert_eq!(tree.iter().copied().collect::<Vec<i64>>(), refs.keys());
    let mut rng = make_rng();
    if let Some(key) = tree.random(&mut rng) {
        assert!(tree.contains(key));
    }
}

include!("./ref_test.rs");
