//! Rooted outline tree with an active-ancestor stack
//!
//! Nodes live in an arena while a scan runs; `children` ordering is only
//! changed by [`OutlineTree::push`], so the result is a valid rooted tree no
//! matter how many mismatched opens and closes were fed in.

use super::OutlineNode;

/// Index of a node in the tree's arena
pub type NodeId = usize;

const ROOT: NodeId = 0;

struct Slot {
    node: OutlineNode,
    children: Vec<NodeId>,
}

pub struct OutlineTree {
    slots: Vec<Slot>,
    /// Open ancestors; the root is always at the bottom
    stack: Vec<NodeId>,
}

impl Default for OutlineTree {
    fn default() -> Self {
        Self::new()
    }
}

impl OutlineTree {
    pub fn new() -> Self {
        Self {
            slots: vec![Slot {
                node: OutlineNode::root(),
                children: Vec::new(),
            }],
            stack: vec![ROOT],
        }
    }

    /// Append `node` as the last child of the current node and open it
    pub fn push(&mut self, node: OutlineNode) -> NodeId {
        let id = self.slots.len();
        let parent = self.current();
        self.slots.push(Slot {
            node,
            children: Vec::new(),
        });
        self.slots[parent].children.push(id);
        self.stack.push(id);
        id
    }

    /// Close the current node. With only the root open this is a no-op.
    pub fn pop(&mut self) -> Option<NodeId> {
        if self.stack.len() < 2 {
            tracing::debug!("Ignoring unmatched closer: no open outline node");
            return None;
        }
        self.stack.pop()
    }

    /// Close `id` and everything opened after it. Returns false when `id`
    /// is not open.
    pub fn close(&mut self, id: NodeId) -> bool {
        if id == ROOT || !self.stack.contains(&id) {
            return false;
        }
        while let Some(top) = self.pop() {
            if top == id {
                break;
            }
        }
        true
    }

    /// Innermost open node
    pub fn current(&self) -> NodeId {
        self.stack.last().copied().unwrap_or(ROOT)
    }

    /// Number of open nodes, root excluded
    pub fn depth(&self) -> usize {
        self.stack.len() - 1
    }

    pub fn node(&self, id: NodeId) -> Option<&OutlineNode> {
        self.slots.get(id).map(|slot| &slot.node)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut OutlineNode> {
        self.slots.get_mut(id).map(|slot| &mut slot.node)
    }

    /// Assemble the owned tree. Nodes still open keep whatever was captured.
    pub fn into_root(self) -> OutlineNode {
        let mut built: Vec<Option<OutlineNode>> = Vec::with_capacity(self.slots.len());
        built.resize_with(self.slots.len(), || None);

        // Children always have larger ids than their parent, so walking the
        // arena backwards finishes every child before its parent.
        for (id, slot) in self.slots.into_iter().enumerate().rev() {
            let mut node = slot.node;
            node.children = slot
                .children
                .iter()
                .filter_map(|&child| built[child].take())
                .collect();
            built[id] = Some(node);
        }

        built
            .into_iter()
            .next()
            .flatten()
            .unwrap_or_else(OutlineNode::root)
    }
}
