//! Expression hierarchy with explicit parent links
//!
//! A decision (or business knowledge model) owns one expression, which may
//! nest others: a context holds entries, an entry holds an expression, an
//! invocation holds bindings. Each node records its parent, and the root is
//! always the owning element with its variable.
//!
//! ```text
//! Owner(Decision "Eligibility")
//! └── Context
//!     ├── ContextEntry "Age Band"   ← variable
//!     │   └── <decision table>
//!     └── ContextEntry (result)
//! ```
//!
//! Nodes are only ever added beneath an existing node, so parent links
//! cannot form a cycle.

use crate::types::InformationItem;

/// Index of a node in an [`ExpressionTree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExpressionId(usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpressionKind {
    /// The decision or knowledge model owning the expression
    Owner,
    Context,
    ContextEntry,
    Invocation,
    /// A parameter binding inside an invocation
    Binding,
    FunctionDefinition,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExpressionNode {
    pub kind: ExpressionKind,
    pub variable: Option<InformationItem>,
    parent: Option<ExpressionId>,
}

impl ExpressionNode {
    pub fn parent(&self) -> Option<ExpressionId> {
        self.parent
    }
}

/// Arena of expression nodes rooted at the owning element
#[derive(Debug, Clone)]
pub struct ExpressionTree {
    nodes: Vec<ExpressionNode>,
}

impl ExpressionTree {
    /// A tree whose root is an owner bound to `variable`
    pub fn new(variable: Option<InformationItem>) -> Self {
        Self {
            nodes: vec![ExpressionNode {
                kind: ExpressionKind::Owner,
                variable,
                parent: None,
            }],
        }
    }

    pub fn root(&self) -> ExpressionId {
        ExpressionId(0)
    }

    /// Add a node beneath `parent`
    pub fn add(
        &mut self,
        parent: ExpressionId,
        kind: ExpressionKind,
        variable: Option<InformationItem>,
    ) -> ExpressionId {
        let id = ExpressionId(self.nodes.len());
        self.nodes.push(ExpressionNode {
            kind,
            variable,
            parent: Some(parent),
        });
        id
    }

    pub fn context(&mut self, parent: ExpressionId) -> ExpressionId {
        self.add(parent, ExpressionKind::Context, None)
    }

    pub fn context_entry(
        &mut self,
        context: ExpressionId,
        variable: Option<InformationItem>,
    ) -> ExpressionId {
        self.add(context, ExpressionKind::ContextEntry, variable)
    }

    pub fn get(&self, id: ExpressionId) -> Option<&ExpressionNode> {
        self.nodes.get(id.0)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// `start` followed by each of its ancestors up to the root
    pub fn ancestors(&self, start: ExpressionId) -> Ancestors<'_> {
        Ancestors {
            tree: self,
            next: self.get(start).map(|_| start),
        }
    }

    /// The closest node at or above `start` that binds a variable
    pub fn nearest_variable(&self, start: ExpressionId) -> Option<&InformationItem> {
        self.ancestors(start)
            .filter_map(|id| self.get(id))
            .find_map(|node| node.variable.as_ref())
    }
}

/// Iterator over a node and its ancestors
pub struct Ancestors<'a> {
    tree: &'a ExpressionTree,
    next: Option<ExpressionId>,
}

impl Iterator for Ancestors<'_> {
    type Item = ExpressionId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = self.tree.get(current).and_then(|node| node.parent);
        Some(current)
    }
}
