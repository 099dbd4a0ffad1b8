//! In-place sorting over slices. Every routine sorts ascending, by
//! [`Ord`] or by the comparator passed to its `_by` variant.

use std::{cmp::Ordering, collections::VecDeque, mem};

pub use crate::heap::{heap_sort, heap_sort_by};

/// Radix for [`radix_sort`].
pub const RADIX: u64 = 10;

pub fn quick_sort<T: Ord>(items: &mut [T]) {
    quick_sort_by(items, |a, b| a.cmp(b))
}

/// Quicksort with Lomuto partitioning around the last element. The
/// median of the first, middle and last elements is moved into the
/// last slot before each partition.
pub fn quick_sort_by<T, C>(items: &mut [T], cmp: C)
where
    C: Fn(&T, &T) -> Ordering,
{
    quick_split(items, &cmp)
}

// Recurse into the smaller side and loop on the larger one, keeping
// the stack depth logarithmic.
fn quick_split<T, C>(mut items: &mut [T], cmp: &C)
where
    C: Fn(&T, &T) -> Ordering,
{
    while items.len() > 1 {
        let pivot = partition(items, cmp);
        let (left, right) = mem::take(&mut items).split_at_mut(pivot);
        let right = &mut right[1..];
        if left.len() < right.len() {
            quick_split(left, cmp);
            items = right;
        } else {
            quick_split(right, cmp);
            items = left;
        }
    }
}

fn median_to_last<T, C>(items: &mut [T], cmp: &C)
where
    C: Fn(&T, &T) -> Ordering,
{
    let (first, mid, last) = (0, items.len() / 2, items.len() - 1);
    if cmp(&items[mid], &items[first]) == Ordering::Less {
        items.swap(mid, first);
    }
    if cmp(&items[last], &items[first]) == Ordering::Less {
        items.swap(last, first);
    }
    if cmp(&items[mid], &items[last]) == Ordering::Less {
        items.swap(mid, last);
    }
}

fn partition<T, C>(items: &mut [T], cmp: &C) -> usize
where
    C: Fn(&T, &T) -> Ordering,
{
    if items.len() >= 3 {
        median_to_last(items, cmp);
    }
    let pivot = items.len() - 1;
    let mut store = 0;
    for i in 0..pivot {
        if cmp(&items[i], &items[pivot]) != Ordering::Greater {
            items.swap(store, i);
            store += 1;
        }
    }
    items.swap(store, pivot);
    store
}

pub fn merge_sort<T: Ord + Clone>(items: &mut [T]) {
    merge_sort_by(items, |a, b| a.cmp(b))
}

/// Stable top-down merge sort, the auxiliary buffer is allocated once.
pub fn merge_sort_by<T, C>(items: &mut [T], cmp: C)
where
    T: Clone,
    C: Fn(&T, &T) -> Ordering,
{
    if items.len() <= 1 {
        return;
    }
    let mut aux = items.to_vec();
    merge_split(items, &mut aux, &cmp);
}

fn merge_split<T, C>(items: &mut [T], aux: &mut [T], cmp: &C)
where
    T: Clone,
    C: Fn(&T, &T) -> Ordering,
{
    let len = items.len();
    if len <= 1 {
        return;
    }
    let mid = len / 2;
    {
        let (left, right) = items.split_at_mut(mid);
        let (aux_left, aux_right) = aux.split_at_mut(mid);
        merge_split(left, aux_left, cmp);
        merge_split(right, aux_right, cmp);
    }

    aux[..len].clone_from_slice(items);
    let (mut i, mut j) = (0, mid);
    for slot in items.iter_mut() {
        let take_left = j >= len || (i < mid && cmp(&aux[j], &aux[i]) != Ordering::Less);
        if take_left {
            *slot = aux[i].clone();
            i += 1;
        } else {
            *slot = aux[j].clone();
            j += 1;
        }
    }
}

pub fn bubble_sort<T: Ord>(items: &mut [T]) {
    bubble_sort_by(items, |a, b| a.cmp(b))
}

/// Bubble sort, stops after the first pass that swaps nothing.
pub fn bubble_sort_by<T, C>(items: &mut [T], cmp: C)
where
    C: Fn(&T, &T) -> Ordering,
{
    let mut end = items.len();
    while end > 1 {
        let mut swapped = false;
        for i in 1..end {
            if cmp(&items[i - 1], &items[i]) == Ordering::Greater {
                items.swap(i - 1, i);
                swapped = true;
            }
        }
        if !swapped {
            break;
        }
        end -= 1;
    }
}

/// Least-significant-digit radix sort in base [`RADIX`], one FIFO
/// bucket per digit.
pub fn radix_sort(items: &mut [u64]) {
    let max = match items.iter().max() {
        Some(&max) => max,
        None => return,
    };
    let mut buckets: Vec<VecDeque<u64>> = (0..RADIX).map(|_| VecDeque::new()).collect();
    let mut place: u64 = 1;
    loop {
        for &item in items.iter() {
            buckets[((item / place) % RADIX) as usize].push_back(item);
        }
        let drained = buckets.iter_mut().flat_map(|bucket| bucket.drain(..));
        for (slot, item) in items.iter_mut().zip(drained) {
            *slot = item;
        }
        place = match place.checked_mul(RADIX) {
            Some(next) if next <= max => next,
            _ => break,
        };
    }
}

pub fn reverse<T>(items: &mut [T]) {
    let len = items.len();
    for i in 0..len / 2 {
        items.swap(i, len - 1 - i);
    }
}

/// Find `key` in an ascending `items`.
pub fn binary_search<'a, T: Ord>(items: &'a [T], key: &T) -> Option<&'a T> {
    binary_search_by(items, |item| item.cmp(key))
}

/// Find the item for which `seek` returns [`Ordering::Equal`], `seek`
/// orders an item relative to the target.
pub fn binary_search_by<T, F>(items: &[T], seek: F) -> Option<&T>
where
    F: Fn(&T) -> Ordering,
{
    let (mut low, mut high) = (0, items.len());
    while low < high {
        let mid = low + (high - low) / 2;
        match seek(&items[mid]) {
            Ordering::Less => low = mid + 1,
            Ordering::Greater => high = mid,
            Ordering::Equal => return Some(&items[mid]),
        }
    }
    None
}
