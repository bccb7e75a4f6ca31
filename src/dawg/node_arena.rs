//! An append-only arena for canonical DAWG nodes.
//!
//! Nodes are addressed by their position, so a node id stays valid until the
//! arena is cleared. Children are always canonicalized before their parent,
//! which keeps the arena in post-order: every child id is lower than the id
//! of any node pointing at it.

use std::ops::Index;

use super::node::DawgNode;

/// Position of a node in a [`NodeArena`].
pub(crate) type NodeId = u32;

pub(crate) struct NodeArena {
    nodes: Vec<DawgNode>,
}

impl NodeArena {
    /// Creates an empty arena.
    pub(crate) fn new() -> Self {
        NodeArena { nodes: Vec::new() }
    }

    /// Stores a node and returns its id.
    pub(crate) fn alloc(&mut self, node: DawgNode) -> NodeId {
        let id = NodeId::try_from(self.nodes.len()).expect("node arena exceeds u32 ids");
        self.nodes.push(node);
        id
    }

    /// Returns the number of nodes allocated in this arena.
    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Drops every node. Previously returned ids become dangling.
    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
    }

    /// Nodes in allocation order together with their ids.
    pub(crate) fn iter(&self) -> impl DoubleEndedIterator<Item = (NodeId, &DawgNode)> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, node)| (i as NodeId, node))
    }
}

impl Index<NodeId> for NodeArena {
    type Output = DawgNode;

    fn index(&self, id: NodeId) -> &DawgNode {
        &self.nodes[id as usize]
    }
}
