use std::time::{SystemTime, UNIX_EPOCH};

use rand::{rngs::SmallRng, Rng, SeedableRng};

use crate::error::Error;
use crate::heap::{heap_sort, heap_sort_by, PriorityQueue};

#[test]
fn test_updates() {
    let mut queue = PriorityQueue::new();
    for (p, v) in [(5, 'A'), (2, 'B'), (8, 'C'), (1, 'D')].iter() {
        queue.push(*p, Some(*v)).unwrap();
        assert!(queue.validate().is_ok());
    }
    assert_eq!(queue.top_priority(), Some(&8));
    assert_eq!(queue.top(), Some(&'C'));

    let index = queue.find_index_by_payload(&'D').unwrap();
    assert_eq!(queue.change_priority(index, 10), Ok(1));
    assert!(queue.validate().is_ok());
    assert_eq!(queue.top_priority(), Some(&10));
    assert_eq!(queue.top(), Some(&'D'));

    let mut popped = vec![];
    while let Ok((priority, _)) = queue.pop() {
        popped.push(priority);
        assert!(queue.validate().is_ok());
    }
    assert_eq!(popped, vec![10, 8, 5, 2]);
    assert_eq!(queue.pop(), Err(Error::RemoveFromEmpty));
}

#[test]
fn test_empty() {
    let mut queue: PriorityQueue<u32, ()> = PriorityQueue::default();
    assert!(queue.is_empty());
    assert_eq!(queue.top(), None);
    assert_eq!(queue.top_priority(), None);
    assert_eq!(queue.pop(), Err(Error::RemoveFromEmpty));
    assert_eq!(
        queue.change_priority(0, 1),
        Err(Error::InvalidIndex { index: 0, len: 0 })
    );
}

#[test]
fn test_min_heap() {
    let mut queue = PriorityQueue::new_min();
    for p in [7, 3, 9, 1, 4].iter() {
        queue.push(*p, None::<()>).unwrap();
    }
    assert_eq!(queue.top_priority(), Some(&1));
    let mut popped = vec![];
    while let Ok((p, _)) = queue.pop() {
        popped.push(p);
    }
    assert_eq!(popped, vec![1, 3, 4, 7, 9]);
}

#[test]
fn test_change_priority_down() {
    let mut queue = PriorityQueue::new();
    for p in 1..=10 {
        queue.push(p, Some(p * 100)).unwrap();
    }
    let index = queue.find_index_by_priority(&10).unwrap();
    assert_eq!(index, 0);
    assert_eq!(queue.change_priority(index, 0), Ok(10));
    assert!(queue.validate().is_ok());
    assert_eq!(queue.top_priority(), Some(&9));
    assert_eq!(queue.top(), Some(&900));

    // equal priority leaves the array untouched.
    let before: Vec<i32> = queue.iter().map(|(p, _)| *p).collect();
    assert_eq!(queue.change_priority(3, before[3]), Ok(before[3]));
    let after: Vec<i32> = queue.iter().map(|(p, _)| *p).collect();
    assert_eq!(before, after);
}

#[test]
fn test_heapify() {
    let mut queue = PriorityQueue::new();
    let priorities = vec![3, 9, 1, 7, 5, 8, 2];
    let payloads = vec!["c", "i", "a", "g", "e", "h", "b"];
    queue.heapify(priorities, Some(payloads)).unwrap();
    assert!(queue.validate().is_ok());
    assert_eq!(queue.len(), 7);

    let mut popped = vec![];
    while let Ok((p, v)) = queue.pop() {
        popped.push((p, v.unwrap()));
    }
    assert_eq!(
        popped,
        vec![(9, "i"), (8, "h"), (7, "g"), (5, "e"), (3, "c"), (2, "b"), (1, "a")]
    );

    let res = queue.heapify(vec![1, 2, 3], Some(vec!["x"]));
    assert_eq!(res, Err(Error::LengthMismatch { expected: 3, got: 1 }));

    queue.heapify(vec![4, 6], None).unwrap();
    assert_eq!(queue.get(0), Some((&6, None)));
    assert_eq!(queue.get(2), None);
}

#[test]
fn test_growth() {
    let mut queue = PriorityQueue::new();
    assert_eq!(queue.capacity(), 0);
    queue.push(1, Some(1)).unwrap();
    assert!(queue.capacity() >= 16);
    for p in 2..=100 {
        queue.push(p, Some(p)).unwrap();
    }
    assert!(queue.capacity() >= 100);
    assert_eq!(queue.len(), 100);
    queue.clear();
    assert!(queue.is_empty());

    let queue: PriorityQueue<u8, u8, _> =
        PriorityQueue::with_capacity(64, |a: &u8, b: &u8| a.cmp(b)).unwrap();
    assert!(queue.capacity() >= 64);
}

#[test]
fn test_heap_sort() {
    let mut items = vec![5, 1, 4, 2, 3];
    heap_sort(&mut items).unwrap();
    assert_eq!(items, vec![1, 2, 3, 4, 5]);

    let mut items = vec![5, 1, 4, 2, 3];
    heap_sort_by(&mut items, |a: &i32, b: &i32| b.cmp(a)).unwrap();
    assert_eq!(items, vec![5, 4, 3, 2, 1]);

    let mut items: Vec<u32> = vec![];
    heap_sort(&mut items).unwrap();
    assert!(items.is_empty());
}

#[test]
fn test_random() {
    let seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    println!("seed {}", seed);
    let mut rng = SmallRng::from_seed(seed.to_le_bytes());

    let mut queue = PriorityQueue::new();
    let mut refs: Vec<u32> = vec![];
    for _ in 0..10_000 {
        match rng.gen::<u8>() % 3 {
            0 | 1 => {
                let p = rng.gen::<u32>() % 1000;
                queue.push(p, Some(p)).unwrap();
                refs.push(p);
            }
            _ => {
                refs.sort_unstable();
                match (queue.pop().ok(), refs.pop()) {
                    (Some((p, v)), Some(want)) => {
                        assert_eq!(p, want);
                        assert_eq!(v, Some(want));
                    }
                    (None, None) => (),
                    (got, want) => panic!("{:?} {:?}", got, want),
                }
            }
        }
        assert!(queue.validate().is_ok());
        assert_eq!(queue.len(), refs.len());
    }
}
