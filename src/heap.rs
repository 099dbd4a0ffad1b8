use std::{cmp::Ordering, fmt};

use crate::error::{Error, Result};

/// Initial slot count for an empty queue.
pub const DEFAULT_CAPACITY: usize = 16;

/// Capacity is multiplied by this factor when the queue is full.
pub const GROWTH_FACTOR: usize = 2;

/// PriorityQueue is an array-backed binary heap of `(priority,
/// payload)` pairs. The entry whose priority ranks highest under the
/// comparator sits at index 0, a max-heap for [`PriorityQueue::new`].
/// Invert the comparator, or use [`PriorityQueue::new_min`], to get a
/// min-heap. Payloads are optional.
///
/// ```
/// use sorted_collections::PriorityQueue;
///
/// let mut queue = PriorityQueue::new();
/// queue.push(5, Some('A')).unwrap();
/// queue.push(8, Some('C')).unwrap();
/// queue.push(2, None).unwrap();
/// assert_eq!(queue.top_priority(), Some(&8));
/// assert_eq!(queue.pop().unwrap(), (8, Some('C')));
/// ```
pub struct PriorityQueue<P, T, C = fn(&P, &P) -> Ordering> {
    entries: Vec<(P, Option<T>)>,
    cmp: C,
}

fn reverse_cmp<P: Ord>(a: &P, b: &P) -> Ordering {
    b.cmp(a)
}

/// Different ways to construct a new PriorityQueue instance.
impl<P, T> PriorityQueue<P, T>
where
    P: Ord,
{
    /// Max-heap over `P`'s [`Ord`].
    pub fn new() -> PriorityQueue<P, T> {
        let cmp: fn(&P, &P) -> Ordering = Ord::cmp;
        PriorityQueue::with_comparator(cmp)
    }

    /// Min-heap over `P`'s [`Ord`].
    pub fn new_min() -> PriorityQueue<P, T> {
        let cmp: fn(&P, &P) -> Ordering = reverse_cmp::<P>;
        PriorityQueue::with_comparator(cmp)
    }
}

impl<P, T> Default for PriorityQueue<P, T>
where
    P: Ord,
{
    fn default() -> Self {
        PriorityQueue::new()
    }
}

impl<P, T, C> PriorityQueue<P, T, C>
where
    C: Fn(&P, &P) -> Ordering,
{
    /// Heap ordered by `cmp`, the entry ranking [`Ordering::Greater`]
    /// over every other one is at the top.
    pub fn with_comparator(cmp: C) -> PriorityQueue<P, T, C> {
        PriorityQueue {
            entries: Vec::new(),
            cmp,
        }
    }

    /// Like [`PriorityQueue::with_comparator`], pre-allocating room
    /// for `capacity` entries.
    pub fn with_capacity(capacity: usize, cmp: C) -> Result<PriorityQueue<P, T, C>> {
        let mut entries = Vec::new();
        entries
            .try_reserve_exact(capacity)
            .map_err(|_| Error::AllocationFailed)?;
        Ok(PriorityQueue { entries, cmp })
    }
}

/// Maintenance API.
impl<P, T, C> PriorityQueue<P, T, C>
where
    C: Fn(&P, &P) -> Ordering,
{
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.entries.capacity()
    }

    /// Drop every entry, keep the allocation.
    pub fn clear(&mut self) {
        self.entries.clear()
    }

    /// Check that no entry outranks its parent.
    pub fn validate(&self) -> Result<()> {
        for index in 1..self.entries.len() {
            let parent = (index - 1) / 2;
            if self.rank(parent, index) == Ordering::Less {
                return Err(Error::HeapOrder { index });
            }
        }
        Ok(())
    }
}

/// Write operations on PriorityQueue instance.
impl<P, T, C> PriorityQueue<P, T, C>
where
    C: Fn(&P, &P) -> Ordering,
{
    /// Add an entry, growing the backing array by [`GROWTH_FACTOR`]
    /// when full.
    pub fn push(&mut self, priority: P, payload: Option<T>) -> Result<()> {
        self.reserve_one()?;
        self.entries.push((priority, payload));
        self.sift_up(self.entries.len() - 1);
        Ok(())
    }

    /// Remove and return the top entry.
    pub fn pop(&mut self) -> Result<(P, Option<T>)> {
        if self.entries.is_empty() {
            return Err(Error::RemoveFromEmpty);
        }
        let last = self.entries.len() - 1;
        self.entries.swap(0, last);
        let top = match self.entries.pop() {
            Some(top) => top,
            None => return Err(Error::RemoveFromEmpty),
        };
        self.sift_down(0);
        Ok(top)
    }

    /// Replace the priority of the entry at `index` and move it up or
    /// down to restore heap order. Return the old priority.
    pub fn change_priority(&mut self, index: usize, priority: P) -> Result<P> {
        let len = self.entries.len();
        if index >= len {
            return Err(Error::InvalidIndex { index, len });
        }
        let ord = (self.cmp)(&priority, &self.entries[index].0);
        let old = std::mem::replace(&mut self.entries[index].0, priority);
        match ord {
            Ordering::Greater => self.sift_up(index),
            Ordering::Less => self.sift_down(index),
            Ordering::Equal => (),
        }
        Ok(old)
    }

    /// Replace the contents with `priorities` and matching `payloads`,
    /// building the heap in linear time.
    pub fn heapify(&mut self, priorities: Vec<P>, payloads: Option<Vec<T>>) -> Result<()> {
        let entries: Vec<(P, Option<T>)> = match payloads {
            Some(payloads) if payloads.len() != priorities.len() => {
                let (expected, got) = (priorities.len(), payloads.len());
                return Err(Error::LengthMismatch { expected, got });
            }
            Some(payloads) => priorities.into_iter().zip(payloads.into_iter().map(Some)).collect(),
            None => priorities.into_iter().map(|p| (p, None)).collect(),
        };
        self.entries = entries;
        for index in (0..self.entries.len() / 2).rev() {
            self.sift_down(index);
        }
        Ok(())
    }

    fn reserve_one(&mut self) -> Result<()> {
        let capacity = self.entries.capacity();
        if self.entries.len() < capacity {
            return Ok(());
        }
        let additional = if capacity == 0 {
            DEFAULT_CAPACITY
        } else {
            capacity * (GROWTH_FACTOR - 1)
        };
        self.entries
            .try_reserve_exact(additional)
            .map_err(|_| Error::AllocationFailed)?;
        tracing::trace!(old = capacity, new = self.entries.capacity(), "heap grown");
        Ok(())
    }

    // ordering of entry `a` relative to entry `b`.
    #[inline]
    fn rank(&self, a: usize, b: usize) -> Ordering {
        (self.cmp)(&self.entries[a].0, &self.entries[b].0)
    }

    fn sift_up(&mut self, mut index: usize) {
        while index > 0 {
            let parent = (index - 1) / 2;
            if self.rank(index, parent) != Ordering::Greater {
                break;
            }
            self.entries.swap(index, parent);
            index = parent;
        }
    }

    fn sift_down(&mut self, mut index: usize) {
        let len = self.entries.len();
        loop {
            let (left, right) = (2 * index + 1, 2 * index + 2);
            if left >= len {
                break;
            }
            let child = if right < len && self.rank(right, left) == Ordering::Greater {
                right
            } else {
                left
            };
            if self.rank(child, index) != Ordering::Greater {
                break;
            }
            self.entries.swap(index, child);
            index = child;
        }
    }
}

/// Read operations on PriorityQueue instance.
impl<P, T, C> PriorityQueue<P, T, C>
where
    C: Fn(&P, &P) -> Ordering,
{
    /// Payload of the top entry. None when empty or when the top entry
    /// has no payload.
    pub fn top(&self) -> Option<&T> {
        self.entries.first().and_then(|(_, payload)| payload.as_ref())
    }

    pub fn top_priority(&self) -> Option<&P> {
        self.entries.first().map(|(priority, _)| priority)
    }

    /// Entry at array position `index`.
    pub fn get(&self, index: usize) -> Option<(&P, Option<&T>)> {
        self.entries
            .get(index)
            .map(|(priority, payload)| (priority, payload.as_ref()))
    }

    /// Lowest index whose payload equals `payload`.
    pub fn find_index_by_payload(&self, payload: &T) -> Option<usize>
    where
        T: PartialEq,
    {
        self.entries
            .iter()
            .position(|(_, p)| p.as_ref() == Some(payload))
    }

    /// Lowest index whose priority compares equal to `priority`.
    pub fn find_index_by_priority(&self, priority: &P) -> Option<usize> {
        self.entries
            .iter()
            .position(|(p, _)| (self.cmp)(p, priority) == Ordering::Equal)
    }

    /// Entries in array order, which is not priority order.
    pub fn iter(&self) -> impl Iterator<Item = (&P, Option<&T>)> + '_ {
        self.entries
            .iter()
            .map(|(priority, payload)| (priority, payload.as_ref()))
    }
}

impl<P, T, C> fmt::Debug for PriorityQueue<P, T, C>
where
    P: fmt::Debug,
    T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.entries.iter()).finish()
    }
}

/// Sort `items` ascending by heapifying them into a max-heap and
/// popping every entry back from the tail end.
pub fn heap_sort<P>(items: &mut [P]) -> Result<()>
where
    P: Ord + Clone,
{
    heap_sort_by(items, |a: &P, b: &P| a.cmp(b))
}

/// Sort `items` so that `cmp` is non-decreasing along the slice.
pub fn heap_sort_by<P, C>(items: &mut [P], cmp: C) -> Result<()>
where
    P: Clone,
    C: Fn(&P, &P) -> Ordering,
{
    let mut queue: PriorityQueue<P, (), C> = PriorityQueue::with_comparator(cmp);
    queue.heapify(items.to_vec(), None)?;
    for slot in items.iter_mut().rev() {
        let (priority, _) = queue.pop()?;
        *slot = priority;
    }
    Ok(())
}
