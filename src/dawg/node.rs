use super::node_arena::NodeId;

/// A compact representation of the outgoing edges of a [`DawgNode`] that doesn't
/// allocate until there are at least three of them.
///
/// Edges are kept in insertion order. Sorted input keys mean edges are always
/// inserted with ascending labels, so insertion order is label order.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) enum Children {
    /// No children.
    None,
    /// Exactly one child (label, node).
    One((u8, NodeId)),
    /// Exactly two children (label1, node1, label2, node2).
    Two((u8, NodeId, u8, NodeId)),
    /// Three or more children stored in a vector.
    Many(Vec<(u8, NodeId)>),
}

impl Children {
    /// Gets the child at the specified position.
    ///
    /// Returns `None` if the position is out of bounds.
    #[inline]
    pub(crate) fn get(&self, index: usize) -> Option<(u8, NodeId)> {
        match self {
            Children::None => None,
            Children::One(child) => match index {
                0 => Some(*child),
                _ => None,
            },
            Children::Two((l1, n1, l2, n2)) => match index {
                0 => Some((*l1, *n1)),
                1 => Some((*l2, *n2)),
                _ => None,
            },
            Children::Many(children) => children.get(index).copied(),
        }
    }

    #[inline]
    fn len(&self) -> usize {
        match self {
            Children::None => 0,
            Children::One(_) => 1,
            Children::Two(_) => 2,
            Children::Many(children) => children.len(),
        }
    }
}

/// An iterator over the children of a [`DawgNode`].
#[derive(Clone)]
pub(crate) struct ChildIter<'n> {
    children: &'n Children,
    index: Option<usize>,
}

impl Iterator for ChildIter<'_> {
    type Item = (u8, NodeId);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let index = self.index?;
        let next_child = self.children.get(index);
        self.index = if next_child.is_some() {
            index.checked_add(1)
        } else {
            None
        };
        next_child
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = match self.index {
            Some(i) => self.children.len().saturating_sub(i),
            None => 0,
        };
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for ChildIter<'_> {}

/// A state of the automaton under construction.
///
/// Children always point at canonical nodes, so two nodes are equivalent
/// exactly when their flags and child ids are equal. Derived `Eq` and `Hash`
/// only look one level down.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) struct DawgNode {
    children: Children,
    accepting: bool,
}

impl DawgNode {
    /// Creates a node without children.
    ///
    /// `accepting` marks the end of a key.
    pub(crate) fn new(accepting: bool) -> Self {
        DawgNode {
            children: Children::None,
            accepting,
        }
    }

    /// True if a key ends at this node.
    #[inline]
    pub(crate) fn is_accepting(&self) -> bool {
        self.accepting
    }

    pub(crate) fn set_accepting(&mut self) {
        self.accepting = true;
    }

    /// Appends an edge. Labels must arrive in ascending order.
    pub(crate) fn insert(&mut self, label: u8, child: NodeId) {
        debug_assert!(self.children().all(|(l, _)| l < label));
        let c = (label, child);
        match &mut self.children {
            Children::None => self.children = Children::One(c),
            Children::One((l1, n1)) => self.children = Children::Two((*l1, *n1, c.0, c.1)),
            Children::Two((l1, n1, l2, n2)) => {
                self.children = Children::Many(vec![(*l1, *n1), (*l2, *n2), c])
            }
            Children::Many(children) => children.push(c),
        };
    }

    /// Returns an iterator over all children of this node, in label order.
    #[inline]
    pub(crate) fn children(&self) -> ChildIter<'_> {
        ChildIter {
            children: &self.children,
            index: Some(0),
        }
    }

    /// Returns the number of children.
    #[inline]
    pub(crate) fn child_count(&self) -> usize {
        self.children.len()
    }
}
