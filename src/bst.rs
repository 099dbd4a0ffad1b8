//! Binary-search-tree machinery shared by the AVL tree, the red-black
//! tree and the bucket trees of the hash table. Everything here works
//! on node ids inside an [`Arena`] and takes the tree's root slot
//! explicitly, so one arena can host many trees.

use std::cmp::Ordering;

use crate::arena::{Arena, Meta, NodeId};
use crate::depth::Depth;
use crate::error::{Error, Result};
use crate::queue::TraversalQueue;

/// Outcome of a descent looking for a key.
pub(crate) enum Placement {
    /// Node holding an equal key.
    Found(NodeId),
    /// Key is absent, it would hang under `parent` on side `side`.
    /// `parent` is the sentinel for an empty tree.
    Vacant { parent: NodeId, side: Ordering },
}

/// Navigation.
impl<T, M> Arena<T, M>
where
    M: Meta,
{
    /// `seek(v)` shall return the ordering of the searched key
    /// relative to `v`.
    pub(crate) fn locate<F>(&self, root: NodeId, seek: F) -> Placement
    where
        F: Fn(&T) -> Ordering,
    {
        let (mut parent, mut side) = (NodeId::NIL, Ordering::Equal);
        let mut node = root;
        while !node.is_nil() {
            side = seek(self.value(node));
            parent = node;
            node = match side {
                Ordering::Less => self[node].left,
                Ordering::Greater => self[node].right,
                Ordering::Equal => return Placement::Found(node),
            };
        }
        Placement::Vacant { parent, side }
    }

    pub(crate) fn search<F>(&self, root: NodeId, seek: F) -> NodeId
    where
        F: Fn(&T) -> Ordering,
    {
        match self.locate(root, seek) {
            Placement::Found(id) => id,
            Placement::Vacant { .. } => NodeId::NIL,
        }
    }

    pub(crate) fn minimum(&self, mut node: NodeId) -> NodeId {
        if node.is_nil() {
            return node;
        }
        while !self[node].left.is_nil() {
            node = self[node].left;
        }
        node
    }

    pub(crate) fn maximum(&self, mut node: NodeId) -> NodeId {
        if node.is_nil() {
            return node;
        }
        while !self[node].right.is_nil() {
            node = self[node].right;
        }
        node
    }

    pub(crate) fn successor(&self, mut node: NodeId) -> NodeId {
        if !self[node].right.is_nil() {
            return self.minimum(self[node].right);
        }
        let mut parent = self[node].parent;
        while !parent.is_nil() && node == self[parent].right {
            node = parent;
            parent = self[parent].parent;
        }
        parent
    }

    pub(crate) fn predecessor(&self, mut node: NodeId) -> NodeId {
        if !self[node].left.is_nil() {
            return self.maximum(self[node].left);
        }
        let mut parent = self[node].parent;
        while !parent.is_nil() && node == self[parent].left {
            node = parent;
            parent = self[parent].parent;
        }
        parent
    }

    /// Both keys must be present, checked by the caller.
    pub(crate) fn common_ancestor<A, B>(&self, root: NodeId, pa: A, pb: B) -> NodeId
    where
        A: Fn(&T) -> Ordering,
        B: Fn(&T) -> Ordering,
    {
        let mut node = root;
        while !node.is_nil() {
            let value = self.value(node);
            node = match (pa(value), pb(value)) {
                (Ordering::Less, Ordering::Less) => self[node].left,
                (Ordering::Greater, Ordering::Greater) => self[node].right,
                _ => return node,
            };
        }
        node
    }

    /// Count of nodes on the longest root-to-leaf path.
    pub(crate) fn depth_of(&self, node: NodeId) -> usize {
        if node.is_nil() {
            return 0;
        }
        let (left, right) = (self[node].left, self[node].right);
        1 + self.depth_of(left).max(self.depth_of(right))
    }
}

/// Link surgery.
impl<T, M> Arena<T, M>
where
    M: Meta,
{
    /// Hang a detached node under `parent`, or make it the root.
    pub(crate) fn attach(&mut self, root: &mut NodeId, parent: NodeId, side: Ordering, id: NodeId) {
        self[id].parent = parent;
        match side {
            _ if parent.is_nil() => *root = id,
            Ordering::Less => self[parent].left = id,
            Ordering::Greater => self[parent].right = id,
            Ordering::Equal => panic!("attach(): equal key ? Call the programmer"),
        }
    }

    /// Point `old`'s parent at `new`. `new` may be the sentinel, in
    /// which case only the parent's child link changes.
    pub(crate) fn transplant(&mut self, root: &mut NodeId, old: NodeId, new: NodeId) {
        let parent = self[old].parent;
        if parent.is_nil() {
            *root = new;
        } else if self[parent].left == old {
            self[parent].left = new;
        } else {
            self[parent].right = new;
        }
        if !new.is_nil() {
            self[new].parent = parent;
        }
    }

    //              (i)                       (i)
    //               |                         |
    //             pivot                       x
    //              /  \                      / \
    //             /    \                    /   \
    //            /      \                  /     \
    //          left      x             pivot      xr
    //                   / \            /  \
    //                 xl   xr       left   xl
    //
    pub(crate) fn rotate_left(&mut self, root: &mut NodeId, pivot: NodeId) -> NodeId {
        let x = self[pivot].right;
        if x.is_nil() {
            panic!("rotate_left(): no right child ? Call the programmer");
        }
        let xl = self[x].left;
        self[pivot].right = xl;
        if !xl.is_nil() {
            self[xl].parent = pivot;
        }
        self.transplant(root, pivot, x);
        self[x].left = pivot;
        self[pivot].parent = x;
        x
    }

    //              (i)                       (i)
    //               |                         |
    //             pivot                       x
    //              /  \                      / \
    //             /    \                    /   \
    //            /      \                  /     \
    //           x       right            xl     pivot
    //          / \                               / \
    //        xl   xr                           xr  right
    //
    pub(crate) fn rotate_right(&mut self, root: &mut NodeId, pivot: NodeId) -> NodeId {
        let x = self[pivot].left;
        if x.is_nil() {
            panic!("rotate_right(): no left child ? Call the programmer");
        }
        let xr = self[x].right;
        self[pivot].left = xr;
        if !xr.is_nil() {
            self[xr].parent = pivot;
        }
        self.transplant(root, pivot, x);
        self[x].right = pivot;
        self[pivot].parent = x;
        x
    }

    /// Exchange the tree positions of `a` and `b`, including their
    /// balancing metadata. Values and multiplicities stay with their
    /// nodes, so references into payloads remain valid. Handles `b`
    /// being a child of `a` and vice versa.
    pub(crate) fn swap_positions(&mut self, root: &mut NodeId, a: NodeId, b: NodeId) {
        let swap = |x: NodeId| {
            if x == a {
                b
            } else if x == b {
                a
            } else {
                x
            }
        };
        let (ap, al, ar, am) = (self[a].parent, self[a].left, self[a].right, self[a].meta);
        let (bp, bl, br, bm) = (self[b].parent, self[b].left, self[b].right, self[b].meta);

        // parents' child links, once per distinct parent.
        if !ap.is_nil() && ap != b {
            self.swap_children(ap, swap);
        }
        if !bp.is_nil() && bp != a && bp != ap {
            self.swap_children(bp, swap);
        }
        // children's parent links.
        for &c in [al, ar, bl, br].iter() {
            if !c.is_nil() && c != a && c != b {
                let p = self[c].parent;
                self[c].parent = swap(p);
            }
        }
        if ap.is_nil() {
            *root = b;
        } else if bp.is_nil() {
            *root = a;
        }

        let node = &mut self[a];
        node.parent = swap(bp);
        node.left = swap(bl);
        node.right = swap(br);
        node.meta = bm;
        let node = &mut self[b];
        node.parent = swap(ap);
        node.left = swap(al);
        node.right = swap(ar);
        node.meta = am;
    }

    fn swap_children<F>(&mut self, p: NodeId, swap: F)
    where
        F: Fn(NodeId) -> NodeId,
    {
        let (l, r) = (self[p].left, self[p].right);
        self[p].left = swap(l);
        self[p].right = swap(r);
    }

    /// Release every node under `node`, dropping their values. Returns
    /// the number of nodes released.
    pub(crate) fn free_subtree(&mut self, node: NodeId) -> usize {
        if node.is_nil() {
            return 0;
        }
        let (left, right) = (self[node].left, self[node].right);
        let n = self.free_subtree(left) + self.free_subtree(right);
        self.release(node);
        n + 1
    }
}

/// Traversals, each node visited exactly once, the sentinel never.
impl<T, M> Arena<T, M>
where
    M: Meta,
{
    pub(crate) fn walk_inorder<F>(&self, node: NodeId, action: &mut F)
    where
        F: FnMut(NodeId),
    {
        if node.is_nil() {
            return;
        }
        self.walk_inorder(self[node].left, action);
        action(node);
        self.walk_inorder(self[node].right, action);
    }

    pub(crate) fn walk_preorder<F>(&self, node: NodeId, action: &mut F)
    where
        F: FnMut(NodeId),
    {
        if node.is_nil() {
            return;
        }
        action(node);
        self.walk_preorder(self[node].left, action);
        self.walk_preorder(self[node].right, action);
    }

    pub(crate) fn walk_postorder<F>(&self, node: NodeId, action: &mut F)
    where
        F: FnMut(NodeId),
    {
        if node.is_nil() {
            return;
        }
        self.walk_postorder(self[node].left, action);
        self.walk_postorder(self[node].right, action);
        action(node);
    }

    pub(crate) fn walk_level<F>(&self, root: NodeId, action: &mut F)
    where
        F: FnMut(NodeId),
    {
        let mut queue = TraversalQueue::new();
        queue.push(root);
        while let Some(node) = queue.pop() {
            action(node);
            queue.push(self[node].left);
            queue.push(self[node].right);
        }
    }
}

/// Validation common to every tree flavour.
impl<T, M> Arena<T, M>
where
    M: Meta,
{
    /// Check parent links, strict inorder and leaf depths. Returns the
    /// number of nodes under `root`.
    pub(crate) fn check_tree<C>(&self, root: NodeId, cmp: &C, depths: &mut Depth) -> Result<usize>
    where
        C: Fn(&T, &T) -> Ordering,
    {
        if !root.is_nil() && !self[root].parent.is_nil() {
            return Err(Error::BrokenLink);
        }
        self.check_links(root, 0, depths)?;

        let mut rank = 0;
        let mut prev: Option<&T> = None;
        let mut err = None;
        self.walk_inorder(root, &mut |id| {
            let value = self.value(id);
            if let Some(prev) = prev {
                if err.is_none() && cmp(prev, value) != Ordering::Less {
                    err = Some(Error::SortOrder { rank });
                }
            }
            prev = Some(value);
            rank += 1;
        });
        match err {
            Some(err) => Err(err),
            None => Ok(rank),
        }
    }

    fn check_links(&self, node: NodeId, depth: usize, depths: &mut Depth) -> Result<()> {
        if node.is_nil() {
            depths.sample(depth);
            return Ok(());
        }
        if self[node].multiplicity == 0 {
            return Err(Error::BrokenLink);
        }
        for &child in [self[node].left, self[node].right].iter() {
            if !child.is_nil() && self[child].parent != node {
                return Err(Error::BrokenLink);
            }
            self.check_links(child, depth + 1, depths)?;
        }
        Ok(())
    }
}

/// Lazy inorder walk over one tree, driven by parent links.
pub(crate) struct Walk<'a, T, M> {
    arena: &'a Arena<T, M>,
    next: NodeId,
}

impl<'a, T, M> Walk<'a, T, M>
where
    M: Meta,
{
    pub(crate) fn new(arena: &'a Arena<T, M>, root: NodeId) -> Walk<'a, T, M> {
        Walk {
            arena,
            next: arena.minimum(root),
        }
    }
}

impl<'a, T, M> Iterator for Walk<'a, T, M>
where
    M: Meta,
{
    type Item = (&'a T, usize);

    fn next(&mut self) -> Option<Self::Item> {
        if self.next.is_nil() {
            return None;
        }
        let node = self.next;
        self.next = self.arena.successor(node);
        Some((self.arena.value(node), self.arena[node].multiplicity))
    }
}
