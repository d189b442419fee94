//! Ready queue.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use super::node::{Node, NodeId};

/// Sort key of a ready node: kind priority first, then insertion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct ReadyKey {
    kind_priority: u8,
    priority: u32,
    id: NodeId,
}

/// Min-queue of nodes whose predecessors have all been removed.
///
/// Insertion priorities are unique, so the order in which nodes are pushed
/// never affects the order in which they are popped.
#[derive(Debug, Default)]
pub struct ReadyQueue {
    heap: BinaryHeap<Reverse<ReadyKey>>,
}

impl ReadyQueue {
    pub fn new() -> Self {
        ReadyQueue {
            heap: BinaryHeap::new(),
        }
    }

    pub fn push(&mut self, id: NodeId, node: &Node) {
        self.heap.push(Reverse(ReadyKey {
            kind_priority: node.kind_priority(),
            priority: node.priority,
            id,
        }));
    }

    pub fn pop(&mut self) -> Option<NodeId> {
        self.heap.pop().map(|Reverse(key)| key.id)
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}
