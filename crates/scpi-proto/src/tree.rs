//! Command tree and header dispatch.
//!
//! The tree is an arena of [`CommandNode`]s linked by index: every node has
//! a first-child link and a next-sibling link, so each level of the header
//! hierarchy is an ordered list in registration order. The root has no name
//! and no handler; it only owns the top-level list.
//!
//! Lookup walks one level per header token and never backtracks: if no
//! sibling matches a token, the whole lookup fails.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use crate::casemap::{header_eq, short_form};
use crate::context::{Context, Handler};
use crate::response::Response;
use crate::token::{Arguments, TokenKind, Tokens};

/// Index of a node within its [`CommandTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

impl NodeId {
    /// Arena index.
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

/// Where a newly registered node is attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Append to the parent's list of children.
    Child,
    /// Append to the sibling list the parent itself belongs to.
    Sibling,
}

/// Shared, type-erased handler reference.
pub type HandlerRef<S> = Arc<dyn Handler<S>>;

/// Wrap a closure or function as a handler reference.
pub fn endpoint<S, F>(f: F) -> Option<HandlerRef<S>>
where
    F: Fn(&mut Context<S>, &Arguments<'_>) -> Option<Response> + Send + Sync + 'static,
{
    Some(Arc::new(f))
}

/// A keyword in the command hierarchy.
pub struct CommandNode<S> {
    long_name: Cow<'static, str>,
    short_name: Cow<'static, str>,
    handler: Option<HandlerRef<S>>,
    first_child: Option<NodeId>,
    next_sibling: Option<NodeId>,
}

impl<S> CommandNode<S> {
    /// Long keyword form (e.g. `SYSTEM`).
    pub fn long_name(&self) -> &str {
        &self.long_name
    }

    /// Short keyword form (e.g. `SYST`).
    pub fn short_name(&self) -> &str {
        &self.short_name
    }

    /// Handler, if the node is an endpoint.
    pub fn handler(&self) -> Option<&HandlerRef<S>> {
        self.handler.as_ref()
    }

    /// Whether a header token names this node in either form.
    #[inline]
    pub fn matches(&self, token: &[u8]) -> bool {
        header_eq(token, &self.long_name) || header_eq(token, &self.short_name)
    }
}

impl<S> fmt::Debug for CommandNode<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandNode")
            .field("long_name", &self.long_name)
            .field("short_name", &self.short_name)
            .field("handler", &self.handler.is_some())
            .field("first_child", &self.first_child)
            .field("next_sibling", &self.next_sibling)
            .finish()
    }
}

/// The registered command hierarchy.
pub struct CommandTree<S> {
    nodes: Vec<CommandNode<S>>,
}

impl<S> Default for CommandTree<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> CommandTree<S> {
    /// Create a tree holding only the root.
    pub fn new() -> Self {
        Self {
            nodes: vec![CommandNode {
                long_name: Cow::Borrowed(""),
                short_name: Cow::Borrowed(""),
                handler: None,
                first_child: None,
                next_sibling: None,
            }],
        }
    }

    /// The root node; its children are the top-level keywords.
    #[inline]
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Node by id.
    ///
    /// # Panics
    ///
    /// Panics if `id` was issued by a different tree.
    #[inline]
    pub fn node(&self, id: NodeId) -> &CommandNode<S> {
        &self.nodes[id.0]
    }

    /// Number of nodes, root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether only the root exists.
    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    /// Register a keyword.
    ///
    /// With [`Placement::Child`] the node becomes the last child of
    /// `parent`; with [`Placement::Sibling`] it is appended to the list
    /// `parent` belongs to. Registration order decides which node wins when
    /// two could match the same token. Duplicates are not detected.
    pub fn register(
        &mut self,
        parent: NodeId,
        placement: Placement,
        long_name: impl Into<Cow<'static, str>>,
        short_name: impl Into<Cow<'static, str>>,
        handler: Option<HandlerRef<S>>,
    ) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(CommandNode {
            long_name: long_name.into(),
            short_name: short_name.into(),
            handler,
            first_child: None,
            next_sibling: None,
        });

        let head = match placement {
            Placement::Child => self.nodes[parent.0].first_child,
            Placement::Sibling => Some(parent),
        };
        match head {
            None => self.nodes[parent.0].first_child = Some(id),
            Some(head) => {
                let tail = self.last_sibling(head);
                self.nodes[tail.0].next_sibling = Some(id);
            }
        }
        id
    }

    /// Register a mixed-case SCPI keyword such as `FREQuency?`.
    ///
    /// The long form is the keyword in uppercase, the short form its
    /// uppercase letters (plus a trailing `?`).
    pub fn register_keyword(
        &mut self,
        parent: NodeId,
        placement: Placement,
        keyword: &str,
        handler: Option<HandlerRef<S>>,
    ) -> NodeId {
        let long_name = keyword.to_ascii_uppercase();
        let short_name = short_form(keyword);
        self.register(parent, placement, long_name, short_name, handler)
    }

    fn last_sibling(&self, mut id: NodeId) -> NodeId {
        while let Some(next) = self.nodes[id.0].next_sibling {
            id = next;
        }
        id
    }

    /// Iterate over the children of `id` in registration order.
    pub fn children(&self, id: NodeId) -> Siblings<'_, S> {
        Siblings {
            tree: self,
            next: self.nodes[id.0].first_child,
        }
    }

    /// Resolve the header path of `tokens` to a node.
    ///
    /// Returns the node matched by the last header token, or `None` if any
    /// token fails to match at its level. A returned node may still lack a
    /// handler.
    pub fn find(&self, tokens: &Tokens<'_>) -> Option<NodeId> {
        let line = tokens.line();
        let mut level = self.nodes[0].first_child;
        let mut iter = tokens.iter().peekable();

        while let Some(token) = iter.next() {
            if token.kind() != TokenKind::Name {
                return None;
            }
            let text = token.bytes(line);
            let matched = self
                .siblings_from(level)
                .find(|(_, node)| node.matches(text))
                .map(|(id, _)| id)?;

            match iter.peek() {
                Some(next) if next.kind() == TokenKind::Name => {
                    level = self.nodes[matched.0].first_child;
                }
                _ => return Some(matched),
            }
        }
        None
    }

    /// Every invocable path, in long form, depth first.
    pub fn paths(&self) -> Vec<String> {
        let mut out = Vec::new();
        self.collect_paths(self.root(), String::new(), &mut out);
        out
    }

    fn collect_paths(&self, parent: NodeId, prefix: String, out: &mut Vec<String>) {
        for (id, node) in self.children(parent) {
            let path = if prefix.is_empty() {
                node.long_name().to_string()
            } else {
                format!("{}:{}", prefix, node.long_name())
            };
            if node.handler.is_some() {
                out.push(path.clone());
            }
            self.collect_paths(id, path, out);
        }
    }

    fn siblings_from(&self, first: Option<NodeId>) -> Siblings<'_, S> {
        Siblings {
            tree: self,
            next: first,
        }
    }
}

impl<S> fmt::Debug for CommandTree<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandTree")
            .field("nodes", &self.nodes)
            .finish()
    }
}

/// Iterator over one sibling list.
pub struct Siblings<'t, S> {
    tree: &'t CommandTree<S>,
    next: Option<NodeId>,
}

impl<'t, S> Iterator for Siblings<'t, S> {
    type Item = (NodeId, &'t CommandNode<S>);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next?;
        let node = &self.tree.nodes[id.0];
        self.next = node.next_sibling;
        Some((id, node))
    }
}
