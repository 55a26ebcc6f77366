use {
    crate::{DEFAULT_ICON_ID, Link},
    condition_components::OrExpr,
    serde::{Deserialize, Serialize},
    std::fmt,
    uuid::Uuid,
};

/// Stable identity of a node in the macro tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub Uuid);

impl NodeId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A user-authored macro together with its activation rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MacroDef {
    pub icon_id: u32,
    /// Bind regardless of `conditions`.
    pub always_linked: bool,
    pub link: Link,
    /// Append `/nextmacro` commands so an oversized body runs across its linked slots.
    pub link_with_chain: bool,
    pub conditions: OrExpr,
    /// Macro text, one game line per `\n` separated line.
    pub body: String,
}

impl Default for MacroDef {
    fn default() -> Self {
        Self {
            icon_id: DEFAULT_ICON_ID,
            always_linked: false,
            link: Link::default(),
            link_with_chain: false,
            conditions: OrExpr::default(),
            body: String::new(),
        }
    }
}

impl MacroDef {
    /// True if the macro has somewhere to go: always linked, or at least one slot.
    pub fn has_link(&self) -> bool {
        self.always_linked || !self.link.is_empty()
    }

    /// Logical lines of the body. Empty lines are kept; an empty body has no lines.
    pub fn lines(&self) -> Vec<&str> {
        if self.body.is_empty() {
            return Vec::new();
        }
        self.body
            .split('\n')
            .map(|line| line.strip_suffix('\r').unwrap_or(line))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NodeKind {
    Group,
    /// Group whose content is kept in sync with a remote source.
    SubscriptionGroup { url: String },
    Macro(MacroDef),
}

impl NodeKind {
    /// Only groups may own children.
    pub fn is_container(&self) -> bool {
        matches!(self, NodeKind::Group | NodeKind::SubscriptionGroup { .. })
    }

    pub fn as_macro(&self) -> Option<&MacroDef> {
        match self {
            NodeKind::Macro(def) => Some(def),
            _ => None,
        }
    }
}

/// A node stored in a [`MacroTree`](crate::MacroTree) arena.
///
/// `parent` is a plain id back-reference; ownership runs strictly from parent to children.
#[derive(Debug, Clone, PartialEq)]
pub struct MacroNode {
    pub(crate) id: NodeId,
    pub(crate) name: String,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) kind: NodeKind,
}

impl MacroNode {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn as_macro(&self) -> Option<&MacroDef> {
        self.kind.as_macro()
    }
}
