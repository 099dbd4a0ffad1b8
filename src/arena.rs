use std::ops::{Index, IndexMut};

use crate::error::{Error, Result};

/// Index of a node inside an [`Arena`]. Index 0 is the sentinel, it
/// stands in for every absent parent or child.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) struct NodeId(u32);

impl NodeId {
    pub(crate) const NIL: NodeId = NodeId(0);

    #[inline]
    pub(crate) fn is_nil(self) -> bool {
        self.0 == 0
    }

    #[inline]
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// Per-node balancing metadata. The sentinel and vacant slots carry
/// `Meta::sentinel()`: height 0 for AVL, black for red-black.
pub(crate) trait Meta: Copy {
    fn sentinel() -> Self;
}

/// Node corresponds to a single distinct key in a tree.
pub(crate) struct Node<T, M> {
    value: Option<T>, // None for the sentinel and for vacant slots.
    pub(crate) parent: NodeId,
    pub(crate) left: NodeId,
    pub(crate) right: NodeId,
    pub(crate) multiplicity: usize,
    pub(crate) meta: M,
}

impl<T, M> Node<T, M>
where
    M: Meta,
{
    fn vacant(next_free: NodeId) -> Node<T, M> {
        Node {
            value: None,
            parent: NodeId::NIL,
            left: next_free,
            right: NodeId::NIL,
            multiplicity: 0,
            meta: M::sentinel(),
        }
    }
}

/// Arena owns every node of one tree, or of every bucket tree of a
/// hash table. Released slots are chained through their `left` link
/// and reused before the backing vector grows.
pub(crate) struct Arena<T, M> {
    nodes: Vec<Node<T, M>>,
    free: NodeId,
    n_free: usize,
}

impl<T, M> Arena<T, M>
where
    M: Meta,
{
    pub(crate) fn new() -> Arena<T, M> {
        Arena {
            nodes: vec![Node::vacant(NodeId::NIL)],
            free: NodeId::NIL,
            n_free: 0,
        }
    }

    /// Number of live nodes.
    #[inline]
    pub(crate) fn live(&self) -> usize {
        self.nodes.len() - 1 - self.n_free
    }

    /// Allocate a detached node holding `value`, with multiplicity 1.
    pub(crate) fn alloc(&mut self, value: T, meta: M) -> Result<NodeId> {
        let id = if self.free.is_nil() {
            if self.nodes.len() > (u32::MAX as usize) {
                return Err(Error::AllocationFailed);
            }
            if self.nodes.len() == self.nodes.capacity() {
                let old = self.nodes.capacity();
                self.nodes
                    .try_reserve(old.max(4))
                    .map_err(|_| Error::AllocationFailed)?;
                tracing::trace!(old, new = self.nodes.capacity(), "arena grown");
            }
            self.nodes.push(Node::vacant(NodeId::NIL));
            NodeId((self.nodes.len() - 1) as u32)
        } else {
            let id = self.free;
            self.free = self.nodes[id.index()].left;
            self.n_free -= 1;
            id
        };

        let node = &mut self.nodes[id.index()];
        node.value = Some(value);
        node.parent = NodeId::NIL;
        node.left = NodeId::NIL;
        node.right = NodeId::NIL;
        node.multiplicity = 1;
        node.meta = meta;
        Ok(id)
    }

    /// Return the slot to the free list and hand back its value. Caller
    /// must have unlinked the node from its tree.
    pub(crate) fn release(&mut self, id: NodeId) -> T {
        if id.is_nil() {
            panic!("release(): releasing the sentinel ? Call the programmer");
        }
        let slot = &mut self.nodes[id.index()];
        let value = match slot.value.take() {
            Some(value) => value,
            None => panic!("release(): double release ? Call the programmer"),
        };
        *slot = Node::vacant(self.free);
        self.free = id;
        self.n_free += 1;
        value
    }

    /// Drop every node, keep the sentinel.
    pub(crate) fn clear(&mut self) {
        self.nodes.truncate(1);
        self.free = NodeId::NIL;
        self.n_free = 0;
    }

    #[inline]
    pub(crate) fn value(&self, id: NodeId) -> &T {
        match &self.nodes[id.index()].value {
            Some(value) => value,
            None => panic!("value(): vacant node {:?}, call the programmer", id),
        }
    }

    /// Sentinel reads as `M::sentinel()`, whatever was written to it.
    #[inline]
    pub(crate) fn meta(&self, id: NodeId) -> M {
        if id.is_nil() {
            M::sentinel()
        } else {
            self.nodes[id.index()].meta
        }
    }

    /// Writes to the sentinel are ignored.
    #[inline]
    pub(crate) fn set_meta(&mut self, id: NodeId, meta: M) {
        if !id.is_nil() {
            self.nodes[id.index()].meta = meta
        }
    }

    pub(crate) fn node_size() -> usize {
        std::mem::size_of::<Node<T, M>>()
    }
}

impl<T, M> Index<NodeId> for Arena<T, M> {
    type Output = Node<T, M>;

    #[inline]
    fn index(&self, id: NodeId) -> &Node<T, M> {
        &self.nodes[id.index()]
    }
}

impl<T, M> IndexMut<NodeId> for Arena<T, M> {
    #[inline]
    fn index_mut(&mut self, id: NodeId) -> &mut Node<T, M> {
        if id.is_nil() {
            panic!("index_mut(): writing the sentinel ? Call the programmer");
        }
        &mut self.nodes[id.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq)]
    struct Flag(bool);

    impl Meta for Flag {
        fn sentinel() -> Flag {
            Flag(false)
        }
    }

    #[test]
    fn test_alloc_release_reuse() {
        let mut arena: Arena<String, Flag> = Arena::new();
        assert_eq!(arena.live(), 0);

        let a = arena.alloc("a".to_string(), Flag(true)).unwrap();
        let b = arena.alloc("b".to_string(), Flag(true)).unwrap();
        assert!(!a.is_nil() && !b.is_nil() && a != b);
        assert_eq!(arena.live(), 2);
        assert_eq!(arena.value(b), "b");
        assert_eq!(arena[a].multiplicity, 1);

        assert_eq!(arena.release(a), "a");
        assert_eq!(arena.live(), 1);

        let c = arena.alloc("c".to_string(), Flag(true)).unwrap();
        assert_eq!(c, a);
        assert_eq!(arena.value(c), "c");
        assert_eq!(arena.live(), 2);

        arena.clear();
        assert_eq!(arena.live(), 0);
    }

    #[test]
    fn test_sentinel_meta() {
        let mut arena: Arena<u8, Flag> = Arena::new();
        arena.set_meta(NodeId::NIL, Flag(true));
        assert_eq!(arena.meta(NodeId::NIL), Flag(false));
        assert_eq!(arena[NodeId::NIL].parent, NodeId::NIL);
        assert_eq!(arena[NodeId::NIL].left, NodeId::NIL);
        assert_eq!(arena[NodeId::NIL].right, NodeId::NIL);
    }
}
