use std::{cmp::Ordering, fmt};

use rand::Rng;

use crate::arena::{Arena, Meta, NodeId};
use crate::bst::{Placement, Walk};
use crate::depth::Depth;
use crate::error::{Error, Result};
use crate::stats::Stats;

/// Height of a subtree, 1 at a leaf and 0 for the sentinel.
impl Meta for u32 {
    fn sentinel() -> u32 {
        0
    }
}

/// AvlTree manage an ordered multiset using a height-balanced
/// [AVL][avl] tree. Equal values are not stored twice, instead the
/// existing node's multiplicity is incremented.
///
/// ```
/// use sorted_collections::AvlTree;
///
/// let mut tree = AvlTree::new();
/// for v in [10, 20, 30].iter() {
///     tree.insert(*v).unwrap();
/// }
/// assert_eq!(tree.root(), Some(&20));
/// assert_eq!(tree.iter().copied().collect::<Vec<i32>>(), vec![10, 20, 30]);
/// ```
///
/// [avl]: https://en.wikipedia.org/wiki/AVL_tree
pub struct AvlTree<T, C = fn(&T, &T) -> Ordering> {
    arena: Arena<T, u32>,
    root: NodeId,
    n_count: usize, // number of distinct values in the tree.
    cmp: C,
}

/// Different ways to construct a new AvlTree instance.
impl<T> AvlTree<T>
where
    T: Ord,
{
    /// Create an empty tree ordered by `T`'s [`Ord`].
    pub fn new() -> AvlTree<T> {
        let cmp: fn(&T, &T) -> Ordering = Ord::cmp;
        AvlTree::with_comparator(cmp)
    }

    /// Create a new tree and load it with values from `iter`.
    pub fn load_from<I>(iter: I) -> Result<AvlTree<T>>
    where
        I: IntoIterator<Item = T>,
    {
        let mut tree = AvlTree::new();
        for value in iter {
            tree.insert(value)?;
        }
        Ok(tree)
    }
}

impl<T> Default for AvlTree<T>
where
    T: Ord,
{
    fn default() -> Self {
        AvlTree::new()
    }
}

impl<T, C> AvlTree<T, C>
where
    C: Fn(&T, &T) -> Ordering,
{
    /// Create an empty tree ordered by `cmp`, which must be a total
    /// order returning the ordering of its first argument relative
    /// to the second.
    pub fn with_comparator(cmp: C) -> AvlTree<T, C> {
        AvlTree {
            arena: Arena::new(),
            root: NodeId::NIL,
            n_count: 0,
            cmp,
        }
    }
}

/// Maintenance API.
impl<T, C> AvlTree<T, C>
where
    C: Fn(&T, &T) -> Ordering,
{
    /// Return number of distinct values in this tree.
    #[inline]
    pub fn len(&self) -> usize {
        self.n_count
    }

    /// Check whether this tree is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.n_count == 0
    }

    /// Return the height of this tree, 0 when empty.
    #[inline]
    pub fn height(&self) -> usize {
        self.arena.meta(self.root) as usize
    }

    /// Return quickly with basic statisics, only entries() and
    /// node_size() are valid with this statistics.
    pub fn stats(&self) -> Stats {
        Stats::new(self.n_count, Arena::<T, u32>::node_size())
    }

    /// Drop every value.
    pub fn clear(&mut self) {
        self.arena.clear();
        self.root = NodeId::NIL;
        self.n_count = 0;
    }

    /// Validate AVL tree with following rules:
    ///
    /// * Values are in strictly ascending order under the comparator.
    /// * Every child points back to its parent.
    /// * Stored heights match recomputed heights.
    /// * Left and right subtree heights differ by at most one.
    ///
    /// Additionally return full statistics on the tree.
    pub fn validate(&self) -> Result<Stats> {
        let mut depths = Depth::new();
        let counted = self.arena.check_tree(self.root, &self.cmp, &mut depths)?;
        if counted != self.n_count || counted != self.arena.live() {
            let bookkept = self.n_count;
            return Err(Error::CountMismatch { bookkept, counted });
        }
        let height = self.check_heights(self.root)?;

        let mut stats = self.stats();
        stats.set_height(height as usize);
        stats.set_depths(depths);
        Ok(stats)
    }

    fn check_heights(&self, node: NodeId) -> Result<u32> {
        if node.is_nil() {
            return Ok(0);
        }
        let lh = self.check_heights(self.arena[node].left)?;
        let rh = self.check_heights(self.arena[node].right)?;
        let (stored, computed) = (self.arena.meta(node), 1 + lh.max(rh));
        if stored != computed {
            return Err(Error::HeightMismatch { stored, computed });
        }
        let balance = i64::from(lh) - i64::from(rh);
        if balance.abs() > 1 {
            return Err(Error::Unbalanced { balance });
        }
        Ok(computed)
    }
}

/// Write operations on AvlTree instance.
impl<T, C> AvlTree<T, C>
where
    C: Fn(&T, &T) -> Ordering,
{
    /// Insert `value`. If an equal value is already present its
    /// multiplicity is incremented and `value` is dropped. Return the
    /// multiplicity of the value after insertion.
    pub fn insert(&mut self, value: T) -> Result<usize> {
        let (parent, side) = match self.locate(&value) {
            Placement::Found(id) => {
                self.arena[id].multiplicity += 1;
                return Ok(self.arena[id].multiplicity);
            }
            Placement::Vacant { parent, side } => (parent, side),
        };
        let id = self.arena.alloc(value, 1)?;
        self.arena.attach(&mut self.root, parent, side, id);
        self.n_count += 1;
        self.rebalance(parent);
        Ok(1)
    }

    /// Insert `value` only if no equal value is present.
    pub fn insert_unique(&mut self, value: T) -> Result<()> {
        match self.locate(&value) {
            Placement::Found(_) => Err(Error::Duplicate),
            Placement::Vacant { .. } => self.insert(value).map(|_| ()),
        }
    }

    /// Delete one occurrence of `key`. The node is removed once its
    /// multiplicity drops to zero.
    pub fn delete(&mut self, key: &T) -> Result<()> {
        let id = self.node_for_removal(key)?;
        if self.arena[id].multiplicity > 1 {
            self.arena[id].multiplicity -= 1;
        } else {
            self.unlink(id);
        }
        Ok(())
    }

    /// Remove the node equal to `key` whatever its multiplicity, and
    /// return its value.
    pub fn remove(&mut self, key: &T) -> Result<T> {
        let id = self.node_for_removal(key)?;
        Ok(self.unlink(id))
    }

    fn node_for_removal(&self, key: &T) -> Result<NodeId> {
        if self.is_empty() {
            return Err(Error::RemoveFromEmpty);
        }
        match self.node_of(key) {
            id if id.is_nil() => Err(Error::KeyNotFound),
            id => Ok(id),
        }
    }

    // A node with two children first trades places with its inorder
    // successor, then it has at most one child and is spliced out.
    fn unlink(&mut self, id: NodeId) -> T {
        let (left, right) = (self.arena[id].left, self.arena[id].right);
        if !left.is_nil() && !right.is_nil() {
            let next = self.arena.minimum(right);
            self.arena.swap_positions(&mut self.root, id, next);
        }

        let (left, right) = (self.arena[id].left, self.arena[id].right);
        let child = if left.is_nil() { right } else { left };
        let parent = self.arena[id].parent;
        self.arena.transplant(&mut self.root, id, child);
        let value = self.arena.release(id);
        self.n_count -= 1;
        self.rebalance(parent);
        value
    }
}

/// Read operations on AvlTree instance.
impl<T, C> AvlTree<T, C>
where
    C: Fn(&T, &T) -> Ordering,
{
    /// Get the stored value equal to `key`.
    pub fn find(&self, key: &T) -> Option<&T> {
        self.value_at(self.node_of(key))
    }

    /// Whether `key` is present.
    pub fn contains(&self, key: &T) -> bool {
        !self.node_of(key).is_nil()
    }

    /// Return how many times `key` was inserted, net of deletes.
    pub fn multiplicity(&self, key: &T) -> usize {
        match self.node_of(key) {
            id if id.is_nil() => 0,
            id => self.arena[id].multiplicity,
        }
    }

    /// Value at the root.
    pub fn root(&self) -> Option<&T> {
        self.value_at(self.root)
    }

    /// Smallest value in the tree.
    pub fn min(&self) -> Option<&T> {
        self.value_at(self.arena.minimum(self.root))
    }

    /// Largest value in the tree.
    pub fn max(&self) -> Option<&T> {
        self.value_at(self.arena.maximum(self.root))
    }

    /// Smallest value in the subtree rooted at `key`'s node.
    pub fn min_below(&self, key: &T) -> Option<&T> {
        self.value_at(self.arena.minimum(self.node_of(key)))
    }

    /// Largest value in the subtree rooted at `key`'s node.
    pub fn max_below(&self, key: &T) -> Option<&T> {
        self.value_at(self.arena.maximum(self.node_of(key)))
    }

    /// Largest value smaller than `key`, `key` must be present.
    pub fn predecessor(&self, key: &T) -> Option<&T> {
        match self.node_of(key) {
            id if id.is_nil() => None,
            id => self.value_at(self.arena.predecessor(id)),
        }
    }

    /// Smallest value larger than `key`, `key` must be present.
    pub fn successor(&self, key: &T) -> Option<&T> {
        match self.node_of(key) {
            id if id.is_nil() => None,
            id => self.value_at(self.arena.successor(id)),
        }
    }

    /// Deepest node having both `a` and `b` in its subtree.
    pub fn lowest_common_ancestor(&self, a: &T, b: &T) -> Result<&T> {
        if !self.contains(a) || !self.contains(b) {
            return Err(Error::KeyNotFound);
        }
        let cmp = &self.cmp;
        let id = self
            .arena
            .common_ancestor(self.root, |v| cmp(a, v), |v| cmp(b, v));
        self.value_at(id).ok_or(Error::KeyNotFound)
    }

    /// Height of the subtree rooted at `key`'s node.
    pub fn height_of(&self, key: &T) -> Option<usize> {
        match self.node_of(key) {
            id if id.is_nil() => None,
            id => Some(self.arena.meta(id) as usize),
        }
    }

    /// Return a random value from this tree.
    pub fn random<R: Rng>(&self, rng: &mut R) -> Option<&T> {
        if self.root.is_nil() {
            return None;
        }
        let mut node = self.root;
        let mut at_depth = rng.gen::<u8>() % 40;
        loop {
            let next = match rng.gen::<u8>() % 2 {
                0 => self.arena[node].left,
                _ => self.arena[node].right,
            };
            if at_depth == 0 || next.is_nil() {
                break self.value_at(node);
            }
            at_depth -= 1;
            node = next;
        }
    }

    /// Return an iterator over values in ascending order. Each distinct
    /// value is yielded once, whatever its multiplicity.
    pub fn iter(&self) -> Iter<T> {
        Iter {
            walk: Walk::new(&self.arena, self.root),
        }
    }

    /// Apply `action` to each value in ascending order.
    pub fn traverse_inorder<F>(&self, mut action: F)
    where
        F: FnMut(&T),
    {
        let arena = &self.arena;
        arena.walk_inorder(self.root, &mut |id| action(arena.value(id)));
    }

    /// Apply `action` to each value, node before its subtrees.
    pub fn traverse_preorder<F>(&self, mut action: F)
    where
        F: FnMut(&T),
    {
        let arena = &self.arena;
        arena.walk_preorder(self.root, &mut |id| action(arena.value(id)));
    }

    /// Apply `action` to each value, subtrees before their node.
    pub fn traverse_postorder<F>(&self, mut action: F)
    where
        F: FnMut(&T),
    {
        let arena = &self.arena;
        arena.walk_postorder(self.root, &mut |id| action(arena.value(id)));
    }

    /// Apply `action` to each value, level by level from the root,
    /// left to right within a level.
    pub fn traverse_level<F>(&self, mut action: F)
    where
        F: FnMut(&T),
    {
        let arena = &self.arena;
        arena.walk_level(self.root, &mut |id| action(arena.value(id)));
    }

    fn locate(&self, key: &T) -> Placement {
        let cmp = &self.cmp;
        self.arena.locate(self.root, |v| cmp(key, v))
    }

    fn node_of(&self, key: &T) -> NodeId {
        let cmp = &self.cmp;
        self.arena.search(self.root, |v| cmp(key, v))
    }

    #[inline]
    fn value_at(&self, id: NodeId) -> Option<&T> {
        if id.is_nil() {
            None
        } else {
            Some(self.arena.value(id))
        }
    }
}

// Balancing.
impl<T, C> AvlTree<T, C>
where
    C: Fn(&T, &T) -> Ordering,
{
    #[inline]
    fn update_height(&mut self, node: NodeId) {
        let (left, right) = (self.arena[node].left, self.arena[node].right);
        let height = 1 + self.arena.meta(left).max(self.arena.meta(right));
        self.arena.set_meta(node, height);
    }

    #[inline]
    fn balance(&self, node: NodeId) -> i64 {
        if node.is_nil() {
            return 0;
        }
        let (left, right) = (self.arena[node].left, self.arena[node].right);
        i64::from(self.arena.meta(left)) - i64::from(self.arena.meta(right))
    }

    fn rotate_left(&mut self, pivot: NodeId) -> NodeId {
        let x = self.arena.rotate_left(&mut self.root, pivot);
        self.update_height(pivot);
        self.update_height(x);
        x
    }

    fn rotate_right(&mut self, pivot: NodeId) -> NodeId {
        let x = self.arena.rotate_right(&mut self.root, pivot);
        self.update_height(pivot);
        self.update_height(x);
        x
    }

    // Walk from `node` up to the root, refreshing heights and rotating
    // wherever |balance| exceeds one. A taller child with balance 0,
    // only possible after a delete, takes the single rotation.
    fn rebalance(&mut self, mut node: NodeId) {
        while !node.is_nil() {
            self.update_height(node);
            let balance = self.balance(node);
            if balance > 1 {
                let left = self.arena[node].left;
                if self.balance(left) < 0 {
                    self.rotate_left(left);
                }
                node = self.rotate_right(node);
            } else if balance < -1 {
                let right = self.arena[node].right;
                if self.balance(right) > 0 {
                    self.rotate_right(right);
                }
                node = self.rotate_left(node);
            }
            node = self.arena[node].parent;
        }
    }
}

impl<T, C> fmt::Debug for AvlTree<T, C>
where
    T: fmt::Debug,
    C: Fn(&T, &T) -> Ordering,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<'a, T, C> IntoIterator for &'a AvlTree<T, C>
where
    C: Fn(&T, &T) -> Ordering,
{
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

/// Ascending iterator over an [`AvlTree`]. Holds a shared borrow, so
/// the tree cannot change while it is alive.
pub struct Iter<'a, T> {
    walk: Walk<'a, T, u32>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        self.walk.next().map(|(value, _)| value)
    }
}
