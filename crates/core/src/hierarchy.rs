use std::collections::VecDeque;

use crate::error::Result;
use crate::model::*;

impl Hierarchy {
    /// Builds the arena from the input tree. Nodes are numbered in
    /// breadth-first order, so every parent precedes its children.
    pub fn from_data(data: &DataNode) -> Result<Hierarchy> {
        let mut nodes: Vec<HierarchyNode> = Vec::new();
        let mut queue: VecDeque<(&DataNode, Option<NodeId>, u32)> = VecDeque::new();
        queue.push_back((data, None, 0));

        while let Some((src, parent, depth)) = queue.pop_front() {
            let id = NodeId(nodes.len() as u64);
            nodes.push(HierarchyNode {
                id,
                parent,
                name: src.name.clone(),
                category: src.category.clone(),
                own_value: src.own_value()?,
                value: 0.0,
                depth,
                height: 0,
                children: Vec::with_capacity(src.children.len()),
                x0: 0.0,
                y0: 0.0,
                x1: 0.0,
                y1: 0.0,
            });
            if let Some(pid) = parent {
                nodes[pid.0 as usize].children.push(id);
            }
            for child in &src.children {
                queue.push_back((child, Some(id), depth + 1));
            }
        }

        // Children always sit after their parent, so a reverse sweep sees
        // every child before it is folded into the parent.
        for i in (0..nodes.len()).rev() {
            if let Some(pid) = nodes[i].parent {
                let h = nodes[i].height + 1;
                let parent = &mut nodes[pid.0 as usize];
                parent.height = parent.height.max(h);
            }
        }

        tracing::debug!(nodes = nodes.len(), "hierarchy built");
        Ok(Hierarchy {
            root: NodeId(0),
            nodes,
        })
    }

    pub fn node(&self, id: NodeId) -> &HierarchyNode {
        &self.nodes[id.0 as usize]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut HierarchyNode {
        &mut self.nodes[id.0 as usize]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Sets every node's value to its own value plus the sum of its
    /// children's values.
    pub fn sum(&mut self) -> &mut Self {
        for n in self.nodes.iter_mut() {
            n.value = n.own_value;
        }
        for i in (0..self.nodes.len()).rev() {
            if let Some(pid) = self.nodes[i].parent {
                let v = self.nodes[i].value;
                self.nodes[pid.0 as usize].value += v;
            }
        }
        self
    }

    /// Orders each node's children by descending value. Ties keep their
    /// input order.
    pub fn sort_by_value_desc(&mut self) -> &mut Self {
        for i in 0..self.nodes.len() {
            if self.nodes[i].children.len() < 2 {
                continue;
            }
            let mut children = std::mem::take(&mut self.nodes[i].children);
            children.sort_by(|a, b| {
                let va = self.nodes[a.0 as usize].value;
                let vb = self.nodes[b.0 as usize].value;
                vb.total_cmp(&va)
            });
            self.nodes[i].children = children;
        }
        self
    }

    /// All nodes in breadth-first order, root first, following the
    /// current child order.
    pub fn descendants(&self) -> Vec<NodeId> {
        let mut out = Vec::with_capacity(self.nodes.len());
        if self.nodes.is_empty() {
            return out;
        }
        let mut queue = VecDeque::from([self.root]);
        while let Some(id) = queue.pop_front() {
            out.push(id);
            queue.extend(self.node(id).children.iter().copied());
        }
        out
    }

    pub fn leaves(&self) -> Vec<NodeId> {
        self.descendants()
            .into_iter()
            .filter(|id| self.node(*id).is_leaf())
            .collect()
    }

    /// Path from `id` up to and including the root.
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = vec![id];
        let mut cur = self.node(id).parent;
        while let Some(pid) = cur {
            out.push(pid);
            cur = self.node(pid).parent;
        }
        out
    }

    /// Depth-first pre-order, the order in which the layout positions
    /// nodes.
    pub(crate) fn pre_order(&self) -> Vec<NodeId> {
        let mut out = Vec::with_capacity(self.nodes.len());
        if self.nodes.is_empty() {
            return out;
        }
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.node(id).children.iter().rev().copied());
        }
        out
    }
}
