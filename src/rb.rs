use std::{cmp::Ordering, fmt};

use rand::Rng;

use crate::arena::{Arena, Meta, NodeId};
use crate::bst::{Placement, Walk};
use crate::depth::Depth;
use crate::error::{Error, Result};
use crate::stats::Stats;

/// Node colour in a red-black tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Colour {
    Red,
    Black,
}

/// The sentinel is black.
impl Meta for Colour {
    fn sentinel() -> Colour {
        Colour::Black
    }
}

/// Red-black algorithms over one tree inside an arena. The tree is
/// named by its root slot, so a hash table can keep many bucket trees
/// in a single arena sharing a single sentinel.
impl<T> Arena<T, Colour> {
    /// Insert `value` into the tree at `root`. Return the node holding
    /// it and whether that node is new. An equal value bumps the
    /// existing node's multiplicity and `value` is dropped.
    pub(crate) fn rb_insert<C>(&mut self, root: &mut NodeId, value: T, cmp: &C) -> Result<(NodeId, bool)>
    where
        C: Fn(&T, &T) -> Ordering,
    {
        match self.locate(*root, |v| cmp(&value, v)) {
            Placement::Found(id) => {
                self[id].multiplicity += 1;
                Ok((id, false))
            }
            Placement::Vacant { parent, side } => {
                let id = self.alloc(value, Colour::Red)?;
                self.rb_link(root, parent, side, id);
                Ok((id, true))
            }
        }
    }

    /// Hang a detached node under `parent` and restore colours. The
    /// node's links are reset, its multiplicity is kept.
    pub(crate) fn rb_link(&mut self, root: &mut NodeId, parent: NodeId, side: Ordering, id: NodeId) {
        let node = &mut self[id];
        node.left = NodeId::NIL;
        node.right = NodeId::NIL;
        node.meta = Colour::Red;
        self.attach(root, parent, side, id);
        self.rb_insert_fixup(root, id);
    }

    fn rb_insert_fixup(&mut self, root: &mut NodeId, mut z: NodeId) {
        while self.meta(self[z].parent) == Colour::Red {
            let parent = self[z].parent;
            let grand = self[parent].parent; // red parent is never the root.
            if parent == self[grand].left {
                let uncle = self[grand].right;
                if self.meta(uncle) == Colour::Red {
                    self.set_meta(parent, Colour::Black);
                    self.set_meta(uncle, Colour::Black);
                    self.set_meta(grand, Colour::Red);
                    z = grand;
                    continue;
                }
                if z == self[parent].right {
                    z = parent;
                    self.rotate_left(root, z);
                }
                let parent = self[z].parent;
                self.set_meta(parent, Colour::Black);
                self.set_meta(grand, Colour::Red);
                self.rotate_right(root, grand);
            } else {
                let uncle = self[grand].left;
                if self.meta(uncle) == Colour::Red {
                    self.set_meta(parent, Colour::Black);
                    self.set_meta(uncle, Colour::Black);
                    self.set_meta(grand, Colour::Red);
                    z = grand;
                    continue;
                }
                if z == self[parent].left {
                    z = parent;
                    self.rotate_right(root, z);
                }
                let parent = self[z].parent;
                self.set_meta(parent, Colour::Black);
                self.set_meta(grand, Colour::Red);
                self.rotate_left(root, grand);
            }
        }
        let top = *root;
        self.set_meta(top, Colour::Black);
    }

    /// Splice node `z` out of the tree at `root` and return its value.
    /// A node with two children first trades places, and colours, with
    /// its inorder successor.
    pub(crate) fn rb_unlink(&mut self, root: &mut NodeId, z: NodeId) -> T {
        let (left, right) = (self[z].left, self[z].right);
        if !left.is_nil() && !right.is_nil() {
            let next = self.minimum(right);
            self.swap_positions(root, z, next);
        }

        let (left, right) = (self[z].left, self[z].right);
        let child = if left.is_nil() { right } else { left };
        let (parent, colour) = (self[z].parent, self.meta(z));
        self.transplant(root, z, child);
        let value = self.release(z);
        if colour == Colour::Black {
            self.rb_delete_fixup(root, child, parent);
        }
        value
    }

    // `x` carries an extra black. It may be the sentinel, hence its
    // parent is tracked in `xp` instead of being read through `x`.
    fn rb_delete_fixup(&mut self, root: &mut NodeId, mut x: NodeId, mut xp: NodeId) {
        while x != *root && self.meta(x) == Colour::Black && !xp.is_nil() {
            if x == self[xp].left {
                let mut w = self[xp].right;
                if self.meta(w) == Colour::Red {
                    self.set_meta(w, Colour::Black);
                    self.set_meta(xp, Colour::Red);
                    self.rotate_left(root, xp);
                    w = self[xp].right;
                }
                let (wl, wr) = (self[w].left, self[w].right);
                if self.meta(wl) == Colour::Black && self.meta(wr) == Colour::Black {
                    self.set_meta(w, Colour::Red);
                    x = xp;
                    xp = self[x].parent;
                    continue;
                }
                if self.meta(wr) == Colour::Black {
                    self.set_meta(wl, Colour::Black);
                    self.set_meta(w, Colour::Red);
                    self.rotate_right(root, w);
                    w = self[xp].right;
                }
                let (pc, wr) = (self.meta(xp), self[w].right);
                self.set_meta(w, pc);
                self.set_meta(xp, Colour::Black);
                self.set_meta(wr, Colour::Black);
                self.rotate_left(root, xp);
            } else {
                let mut w = self[xp].left;
                if self.meta(w) == Colour::Red {
                    self.set_meta(w, Colour::Black);
                    self.set_meta(xp, Colour::Red);
                    self.rotate_right(root, xp);
                    w = self[xp].left;
                }
                let (wl, wr) = (self[w].left, self[w].right);
                if self.meta(wl) == Colour::Black && self.meta(wr) == Colour::Black {
                    self.set_meta(w, Colour::Red);
                    x = xp;
                    xp = self[x].parent;
                    continue;
                }
                if self.meta(wl) == Colour::Black {
                    self.set_meta(wr, Colour::Black);
                    self.set_meta(w, Colour::Red);
                    self.rotate_left(root, w);
                    w = self[xp].left;
                }
                let (pc, wl) = (self.meta(xp), self[w].left);
                self.set_meta(w, pc);
                self.set_meta(xp, Colour::Black);
                self.set_meta(wl, Colour::Black);
                self.rotate_right(root, xp);
            }
            x = *root;
            break;
        }
        self.set_meta(x, Colour::Black);
    }

    /// Number of black nodes from `node` down to any sentinel, both
    /// ends included. Fails on red-red links or uneven paths.
    pub(crate) fn rb_check(&self, node: NodeId) -> Result<usize> {
        if node.is_nil() {
            return Ok(1);
        }
        let (left, right) = (self[node].left, self[node].right);
        let colour = self.meta(node);
        if colour == Colour::Red
            && (self.meta(left) == Colour::Red || self.meta(right) == Colour::Red)
        {
            return Err(Error::ConsecutiveReds);
        }
        let lblacks = self.rb_check(left)?;
        let rblacks = self.rb_check(right)?;
        if lblacks != rblacks {
            let err = format!("left: {} right: {}", lblacks, rblacks);
            return Err(Error::UnbalancedBlacks(err));
        }
        Ok(lblacks + if colour == Colour::Black { 1 } else { 0 })
    }

    /// Black nodes on a path from `root` to a sentinel, excluding
    /// `root` itself.
    pub(crate) fn black_height(&self, root: NodeId) -> usize {
        if root.is_nil() {
            return 0;
        }
        let mut blacks = 0;
        let mut node = self[root].left;
        loop {
            if self.meta(node) == Colour::Black {
                blacks += 1;
            }
            if node.is_nil() {
                break blacks;
            }
            node = self[node].left;
        }
    }
}

/// RbTree manage an ordered multiset using a [red-black][rb] tree.
/// Equal values are not stored twice, instead the existing node's
/// multiplicity is incremented.
///
/// ```
/// use sorted_collections::{Colour, RbTree};
///
/// let mut tree = RbTree::new();
/// for v in [10, 20, 30, 15, 25, 5].iter() {
///     tree.insert(*v).unwrap();
/// }
/// assert_eq!(tree.root(), Some(&20));
/// assert_eq!(tree.colour_of(&15), Some(Colour::Red));
/// assert_eq!(tree.black_height(), 2);
/// ```
///
/// [rb]: https://en.wikipedia.org/wiki/Red%E2%80%93black_tree
pub struct RbTree<T, C = fn(&T, &T) -> Ordering> {
    arena: Arena<T, Colour>,
    root: NodeId,
    n_count: usize, // number of distinct values in the tree.
    cmp: C,
}

/// Different ways to construct a new RbTree instance.
impl<T> RbTree<T>
where
    T: Ord,
{
    /// Create an empty tree ordered by `T`'s [`Ord`].
    pub fn new() -> RbTree<T> {
        let cmp: fn(&T, &T) -> Ordering = Ord::cmp;
        RbTree::with_comparator(cmp)
    }

    /// Create a new tree and load it with values from `iter`.
    pub fn load_from<I>(iter: I) -> Result<RbTree<T>>
    where
        I: IntoIterator<Item = T>,
    {
        let mut tree = RbTree::new();
        for value in iter {
            tree.insert(value)?;
        }
        Ok(tree)
    }
}

impl<T> Default for RbTree<T>
where
    T: Ord,
{
    fn default() -> Self {
        RbTree::new()
    }
}

impl<T, C> RbTree<T, C>
where
    C: Fn(&T, &T) -> Ordering,
{
    /// Create an empty tree ordered by `cmp`.
    pub fn with_comparator(cmp: C) -> RbTree<T, C> {
        RbTree {
            arena: Arena::new(),
            root: NodeId::NIL,
            n_count: 0,
            cmp,
        }
    }
}

/// Maintenance API.
impl<T, C> RbTree<T, C>
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

    /// Return the number of black nodes on any path from the root down
    /// to an absent child, root excluded, absent child included.
    pub fn black_height(&self) -> usize {
        self.arena.black_height(self.root)
    }

    /// Return the length of the longest root-to-leaf path.
    pub fn height(&self) -> usize {
        self.arena.depth_of(self.root)
    }

    /// Return quickly with basic statisics, only entries() and
    /// node_size() are valid with this statistics.
    pub fn stats(&self) -> Stats {
        Stats::new(self.n_count, Arena::<T, Colour>::node_size())
    }

    /// Drop every value.
    pub fn clear(&mut self) {
        self.arena.clear();
        self.root = NodeId::NIL;
        self.n_count = 0;
    }

    /// Validate red-black tree with following rules:
    ///
    /// * Root is black.
    /// * A red node has only black children.
    /// * Every path from a node down to an absent child carries the
    ///   same number of blacks.
    /// * Values are in strictly ascending order and links are
    ///   consistent.
    ///
    /// Additionally return full statistics on the tree.
    pub fn validate(&self) -> Result<Stats> {
        if self.arena.meta(self.root) == Colour::Red {
            return Err(Error::RedRoot);
        }
        self.arena.rb_check(self.root)?;

        let mut depths = Depth::new();
        let counted = self.arena.check_tree(self.root, &self.cmp, &mut depths)?;
        if counted != self.n_count || counted != self.arena.live() {
            let bookkept = self.n_count;
            return Err(Error::CountMismatch { bookkept, counted });
        }

        let mut stats = self.stats();
        stats.set_blacks(self.black_height());
        stats.set_height(self.height());
        stats.set_depths(depths);
        Ok(stats)
    }
}

/// Write operations on RbTree instance.
impl<T, C> RbTree<T, C>
where
    C: Fn(&T, &T) -> Ordering,
{
    /// Insert `value`. If an equal value is already present its
    /// multiplicity is incremented and `value` is dropped. Return the
    /// multiplicity of the value after insertion.
    pub fn insert(&mut self, value: T) -> Result<usize> {
        let (id, new) = self.arena.rb_insert(&mut self.root, value, &self.cmp)?;
        if new {
            self.n_count += 1;
        }
        Ok(self.arena[id].multiplicity)
    }

    /// Insert `value` only if no equal value is present.
    pub fn insert_unique(&mut self, value: T) -> Result<()> {
        if self.contains(&value) {
            return Err(Error::Duplicate);
        }
        self.insert(value).map(|_| ())
    }

    /// Delete one occurrence of `key`. The node is removed once its
    /// multiplicity drops to zero.
    pub fn delete(&mut self, key: &T) -> Result<()> {
        let id = self.node_for_removal(key)?;
        if self.arena[id].multiplicity > 1 {
            self.arena[id].multiplicity -= 1;
        } else {
            self.arena.rb_unlink(&mut self.root, id);
            self.n_count -= 1;
        }
        Ok(())
    }

    /// Remove the node equal to `key` whatever its multiplicity, and
    /// return its value.
    pub fn remove(&mut self, key: &T) -> Result<T> {
        let id = self.node_for_removal(key)?;
        let value = self.arena.rb_unlink(&mut self.root, id);
        self.n_count -= 1;
        Ok(value)
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
}

/// Read operations on RbTree instance.
impl<T, C> RbTree<T, C>
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

    /// Colour of `key`'s node.
    pub fn colour_of(&self, key: &T) -> Option<Colour> {
        match self.node_of(key) {
            id if id.is_nil() => None,
            id => Some(self.arena.meta(id)),
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

    /// Return a random value from this tree.
    pub fn random<R: Rng>(&self, rng: &mut R) -> Option<&T> {
        let mut node = self.root;
        if node.is_nil() {
            return None;
        }
        let mut at_depth = rng.gen::<u8>() % 40;
        loop {
            let next = if rng.gen::<bool>() {
                self.arena[node].left
            } else {
                self.arena[node].right
            };
            if at_depth == 0 || next.is_nil() {
                break self.value_at(node);
            }
            at_depth -= 1;
            node = next;
        }
    }

    /// Return an iterator over values in ascending order.
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

impl<T, C> fmt::Debug for RbTree<T, C>
where
    T: fmt::Debug,
    C: Fn(&T, &T) -> Ordering,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<'a, T, C> IntoIterator for &'a RbTree<T, C>
where
    C: Fn(&T, &T) -> Ordering,
{
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

/// Ascending iterator over an [`RbTree`].
pub struct Iter<'a, T> {
    walk: Walk<'a, T, Colour>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        self.walk.next().map(|(value, _)| value)
    }
}
