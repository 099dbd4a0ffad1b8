use std::time::{SystemTime, UNIX_EPOCH};

use rand::{rngs::SmallRng, Rng, SeedableRng};

use crate::sort::{
    binary_search, binary_search_by, bubble_sort, bubble_sort_by, heap_sort, merge_sort,
    merge_sort_by, quick_sort, quick_sort_by, radix_sort, reverse,
};

fn random_items(n: usize) -> Vec<u64> {
    let seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    println!("seed {}", seed);
    let mut rng = SmallRng::from_seed(seed.to_le_bytes());
    (0..n).map(|_| rng.gen::<u64>() % 10_000).collect()
}

#[test]
fn test_small_inputs() {
    let mut empty: Vec<u64> = vec![];
    quick_sort(&mut empty);
    merge_sort(&mut empty);
    bubble_sort(&mut empty);
    radix_sort(&mut empty);
    assert!(empty.is_empty());

    let mut one = vec![42_u64];
    quick_sort(&mut one);
    merge_sort(&mut one);
    bubble_sort(&mut one);
    radix_sort(&mut one);
    assert_eq!(one, vec![42]);

    let mut items = vec![5, 1, 4, 2, 3];
    quick_sort(&mut items);
    assert_eq!(items, vec![1, 2, 3, 4, 5]);
}

#[test]
fn test_against_std() {
    let items = random_items(2_000);
    let mut want = items.clone();
    want.sort_unstable();

    let mut got = items.clone();
    quick_sort(&mut got);
    assert_eq!(got, want);

    let mut got = items.clone();
    merge_sort(&mut got);
    assert_eq!(got, want);

    let mut got = items.clone();
    radix_sort(&mut got);
    assert_eq!(got, want);

    let mut got = items.clone();
    heap_sort(&mut got).unwrap();
    assert_eq!(got, want);

    let mut got = items[..300].to_vec();
    bubble_sort(&mut got);
    let mut short = items[..300].to_vec();
    short.sort_unstable();
    assert_eq!(got, short);
}

#[test]
fn test_comparators() {
    let mut items = vec![3, 1, 2, 5, 4];
    quick_sort_by(&mut items, |a: &i32, b: &i32| b.cmp(a));
    assert_eq!(items, vec![5, 4, 3, 2, 1]);
    bubble_sort_by(&mut items, |a: &i32, b: &i32| a.cmp(b));
    assert_eq!(items, vec![1, 2, 3, 4, 5]);
}

#[test]
fn test_merge_sort_is_stable() {
    let mut items = vec![(2, 'a'), (1, 'b'), (2, 'c'), (1, 'd'), (0, 'e'), (2, 'f')];
    merge_sort_by(&mut items, |a: &(i32, char), b: &(i32, char)| a.0.cmp(&b.0));
    assert_eq!(
        items,
        vec![(0, 'e'), (1, 'b'), (1, 'd'), (2, 'a'), (2, 'c'), (2, 'f')]
    );
}

#[test]
fn test_radix_sort_wide() {
    let mut items = vec![u64::MAX, 0, 10, 9, 100, u64::MAX - 1, 1_000_000_007];
    radix_sort(&mut items);
    assert_eq!(
        items,
        vec![0, 9, 10, 100, 1_000_000_007, u64::MAX - 1, u64::MAX]
    );
}

#[test]
fn test_reverse() {
    let mut items = vec![1, 2, 3, 4, 5];
    reverse(&mut items);
    assert_eq!(items, vec![5, 4, 3, 2, 1]);
    let mut items = vec![1, 2];
    reverse(&mut items);
    assert_eq!(items, vec![2, 1]);
}

#[test]
fn test_binary_search() {
    let items: Vec<u64> = (0..100).map(|i| i * 3).collect();
    assert_eq!(binary_search(&items, &27), Some(&27));
    assert_eq!(binary_search(&items, &0), Some(&0));
    assert_eq!(binary_search(&items, &297), Some(&297));
    assert_eq!(binary_search(&items, &28), None);
    assert_eq!(binary_search(&items, &1000), None);
    assert_eq!(binary_search::<u64>(&[], &1), None);

    let words = vec!["apple", "fig", "kiwi", "pear"];
    let found = binary_search_by(&words, |w| w.cmp(&"kiwi"));
    assert_eq!(found, Some(&"kiwi"));
}

#[test]
fn test_quick_sort_presorted() {
    let n = 100_000_u64;
    let want: Vec<u64> = (0..n).collect();

    let mut items = want.clone();
    quick_sort(&mut items);
    assert_eq!(items, want);

    let mut items: Vec<u64> = (0..n).rev().collect();
    quick_sort(&mut items);
    assert_eq!(items, want);

    let mut items: Vec<u64> = (0..n).map(|i| i % 7).collect();
    quick_sort_by(&mut items, |a: &u64, b: &u64| b.cmp(a));
    assert!(items.windows(2).all(|w| w[0] >= w[1]));
}
