use {
    crate::{MacroDef, MacroNode, NodeId, NodeKind, NodePath, SlotRef},
    bevy::platform::collections::HashMap,
    std::collections::BTreeSet,
    thiserror::Error,
};

pub const ROOT_NAME: &str = "Root";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TreeError {
    #[error("node {0} does not exist")]
    NodeNotFound(NodeId),
    #[error("the root node cannot be moved, renamed or removed")]
    RootImmutable,
    #[error("node {0} cannot hold children")]
    NotAContainer(NodeId),
    #[error("node {0} is not a macro")]
    NotAMacro(NodeId),
    #[error("moving {node} under {target} would create a cycle")]
    CycleDetected { node: NodeId, target: NodeId },
    #[error("node {0} already exists")]
    DuplicateId(NodeId),
    #[error("node names cannot be empty")]
    EmptyName,
}

/// A single mutation of the tree, as sent by editors and subscription sync.
#[derive(Debug, Clone, PartialEq)]
pub enum TreeEdit {
    Insert {
        id: NodeId,
        parent: NodeId,
        index: Option<usize>,
        name: String,
        kind: NodeKind,
    },
    Rename {
        id: NodeId,
        name: String,
    },
    UpdateMacro {
        id: NodeId,
        def: MacroDef,
    },
    Move {
        id: NodeId,
        parent: NodeId,
        index: Option<usize>,
    },
    Remove {
        id: NodeId,
    },
}

impl TreeEdit {
    /// Appends a new node under `parent` with a freshly generated id.
    pub fn insert(parent: NodeId, name: impl Into<String>, kind: NodeKind) -> Self {
        TreeEdit::Insert {
            id: NodeId::new(),
            parent,
            index: None,
            name: name.into(),
            kind,
        }
    }

    /// The node this edit creates or changes.
    pub fn target(&self) -> NodeId {
        match self {
            TreeEdit::Insert { id, .. }
            | TreeEdit::Rename { id, .. }
            | TreeEdit::UpdateMacro { id, .. }
            | TreeEdit::Move { id, .. }
            | TreeEdit::Remove { id } => *id,
        }
    }
}

/// Ordered forest of groups and macros stored in an arena keyed by [`NodeId`].
///
/// Every node except the permanent root group has exactly one parent, and children keep their
/// declaration order. Declaration order (pre-order, siblings in list order) is the priority
/// order used when two macros claim the same slot.
#[derive(Debug, Clone)]
pub struct MacroTree {
    nodes: HashMap<NodeId, MacroNode>,
    root: NodeId,
}

impl Default for MacroTree {
    fn default() -> Self {
        Self::new()
    }
}

impl MacroTree {
    pub fn new() -> Self {
        let root = NodeId::new();
        let mut nodes = HashMap::default();
        nodes.insert(
            root,
            MacroNode {
                id: root,
                name: ROOT_NAME.to_string(),
                parent: None,
                children: Vec::new(),
                kind: NodeKind::Group,
            },
        );
        Self { nodes, root }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn get(&self, id: NodeId) -> Option<&MacroNode> {
        self.nodes.get(&id)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Number of nodes, root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    fn node(&self, id: NodeId) -> Result<&MacroNode, TreeError> {
        self.nodes.get(&id).ok_or(TreeError::NodeNotFound(id))
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut MacroNode, TreeError> {
        self.nodes.get_mut(&id).ok_or(TreeError::NodeNotFound(id))
    }

    fn container(&self, id: NodeId) -> Result<&MacroNode, TreeError> {
        let node = self.node(id)?;
        if !node.kind.is_container() {
            return Err(TreeError::NotAContainer(id));
        }
        Ok(node)
    }

    // ========================================================================
    // Edits
    // ========================================================================

    /// Adds a node under `parent` at `index` (appended when `None` or past the end).
    pub fn insert(
        &mut self,
        parent: NodeId,
        index: Option<usize>,
        name: impl Into<String>,
        kind: NodeKind,
    ) -> Result<NodeId, TreeError> {
        let id = NodeId::new();
        self.insert_with_id(id, parent, index, name, kind)?;
        Ok(id)
    }

    pub fn insert_with_id(
        &mut self,
        id: NodeId,
        parent: NodeId,
        index: Option<usize>,
        name: impl Into<String>,
        kind: NodeKind,
    ) -> Result<(), TreeError> {
        if self.nodes.contains_key(&id) {
            return Err(TreeError::DuplicateId(id));
        }
        let name = non_empty(name.into())?;
        self.container(parent)?;

        self.nodes.insert(
            id,
            MacroNode {
                id,
                name,
                parent: Some(parent),
                children: Vec::new(),
                kind,
            },
        );
        self.attach(id, parent, index)
    }

    pub fn rename(&mut self, id: NodeId, name: impl Into<String>) -> Result<(), TreeError> {
        if id == self.root {
            return Err(TreeError::RootImmutable);
        }
        let name = non_empty(name.into())?;
        self.node_mut(id)?.name = name;
        Ok(())
    }

    pub fn update_macro(&mut self, id: NodeId, def: MacroDef) -> Result<(), TreeError> {
        let node = self.node_mut(id)?;
        match &mut node.kind {
            NodeKind::Macro(existing) => {
                *existing = def;
                Ok(())
            }
            _ => Err(TreeError::NotAMacro(id)),
        }
    }

    /// Re-parents `id` under `parent` at `index`. Moving a node into its own subtree is rejected.
    pub fn move_node(
        &mut self,
        id: NodeId,
        parent: NodeId,
        index: Option<usize>,
    ) -> Result<(), TreeError> {
        if id == self.root {
            return Err(TreeError::RootImmutable);
        }
        self.node(id)?;
        self.container(parent)?;
        if id == parent || self.is_ancestor(id, parent) {
            return Err(TreeError::CycleDetected {
                node: id,
                target: parent,
            });
        }

        self.detach(id)?;
        self.node_mut(id)?.parent = Some(parent);
        self.attach(id, parent, index)
    }

    /// Removes `id` and its whole subtree, returning the removed ids in pre-order.
    pub fn remove(&mut self, id: NodeId) -> Result<Vec<NodeId>, TreeError> {
        if id == self.root {
            return Err(TreeError::RootImmutable);
        }
        self.node(id)?;

        let removed: Vec<NodeId> = self.pre_order_from(id).map(|node| node.id).collect();
        self.detach(id)?;
        for removed_id in &removed {
            self.nodes.remove(removed_id);
        }
        Ok(removed)
    }

    pub fn apply(&mut self, edit: TreeEdit) -> Result<(), TreeError> {
        match edit {
            TreeEdit::Insert {
                id,
                parent,
                index,
                name,
                kind,
            } => self.insert_with_id(id, parent, index, name, kind),
            TreeEdit::Rename { id, name } => self.rename(id, name),
            TreeEdit::UpdateMacro { id, def } => self.update_macro(id, def),
            TreeEdit::Move { id, parent, index } => self.move_node(id, parent, index),
            TreeEdit::Remove { id } => self.remove(id).map(|_| ()),
        }
    }

    fn attach(&mut self, id: NodeId, parent: NodeId, index: Option<usize>) -> Result<(), TreeError> {
        let children = &mut self.node_mut(parent)?.children;
        let index = index.unwrap_or(children.len()).min(children.len());
        children.insert(index, id);
        Ok(())
    }

    fn detach(&mut self, id: NodeId) -> Result<(), TreeError> {
        if let Some(parent) = self.node(id)?.parent {
            self.node_mut(parent)?.children.retain(|child| *child != id);
        }
        Ok(())
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// True if `ancestor` is a strict ancestor of `id`.
    pub fn is_ancestor(&self, ancestor: NodeId, id: NodeId) -> bool {
        let mut current = self.get(id).and_then(|node| node.parent);
        while let Some(parent) = current {
            if parent == ancestor {
                return true;
            }
            current = self.get(parent).and_then(|node| node.parent);
        }
        false
    }

    /// Every node in declaration order: parents before children, siblings in list order.
    pub fn pre_order(&self) -> PreOrder<'_> {
        self.pre_order_from(self.root)
    }

    pub fn pre_order_from(&self, start: NodeId) -> PreOrder<'_> {
        PreOrder {
            tree: self,
            stack: vec![start],
        }
    }

    /// Macro nodes in declaration order.
    pub fn macros(&self) -> impl Iterator<Item = (&MacroNode, &MacroDef)> {
        self.pre_order()
            .filter_map(|node| node.as_macro().map(|def| (node, def)))
    }

    /// Every slot referenced by any macro's link, active or not.
    pub fn linked_slots(&self) -> BTreeSet<SlotRef> {
        self.macros()
            .flat_map(|(_, def)| def.link.slot_refs())
            .collect()
    }

    pub fn path_of(&self, id: NodeId) -> Option<NodePath> {
        let mut segments = Vec::new();
        let mut current = self.get(id)?;
        while let Some(parent) = current.parent {
            segments.push(current.name.clone());
            current = self.get(parent)?;
        }
        segments.reverse();
        Some(NodePath::new(segments))
    }

    /// Resolves a textual path such as `/Jobs/Dragoon`. When siblings share a name the first one
    /// in declaration order is used.
    pub fn resolve(&self, path: &str) -> Option<NodeId> {
        self.resolve_path(&NodePath::parse(path))
    }

    pub fn resolve_path(&self, path: &NodePath) -> Option<NodeId> {
        let mut current = self.root;
        for segment in path.segments() {
            current = self
                .get(current)?
                .children
                .iter()
                .copied()
                .find(|child| self.get(*child).is_some_and(|node| &node.name == segment))?;
        }
        Some(current)
    }
}

/// Empty segments are dropped when a path is parsed, so an empty name could never be resolved.
fn non_empty(name: String) -> Result<String, TreeError> {
    if name.is_empty() {
        return Err(TreeError::EmptyName);
    }
    Ok(name)
}

/// Pre-order iterator over a [`MacroTree`].
pub struct PreOrder<'a> {
    tree: &'a MacroTree,
    stack: Vec<NodeId>,
}

impl<'a> Iterator for PreOrder<'a> {
    type Item = &'a MacroNode;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(id) = self.stack.pop() {
            let Some(node) = self.tree.get(id) else {
                continue;
            };
            self.stack.extend(node.children.iter().rev().copied());
            return Some(node);
        }
        None
    }
}
