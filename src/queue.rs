use std::collections::VecDeque;

use crate::arena::NodeId;

/// FIFO of node references used for level-order walks. Only live
/// nodes are ever queued, pushing the sentinel is a no-op.
pub(crate) struct TraversalQueue {
    items: VecDeque<NodeId>,
}

impl TraversalQueue {
    pub(crate) fn new() -> TraversalQueue {
        TraversalQueue {
            items: VecDeque::new(),
        }
    }

    #[inline]
    pub(crate) fn push(&mut self, id: NodeId) {
        if !id.is_nil() {
            self.items.push_back(id)
        }
    }

    #[inline]
    pub(crate) fn pop(&mut self) -> Option<NodeId> {
        self.items.pop_front()
    }
}
