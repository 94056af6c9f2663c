//! Bracket tree.
//!
//! [`build`] pairs `LBrace`/`RBrace` items with a stack of open scopes.
//! Scopes still open when the items run out are kept with
//! `closed == false`, so the tree always reflects the whole input and
//! [`Tree::render`] decides how to report them.

use lexkit::Item;
use tracing::trace;

use super::BracketError;
use crate::TextToken;

/// A node of the bracket tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Node {
    /// Text between braces.
    Text { offset: usize, text: String },
    /// Everything between a `{` and its `}`.
    Scope {
        /// Offset of the `{`.
        offset: usize,
        /// `false` if the input ended before the matching `}`.
        closed: bool,
        children: Vec<Node>,
    },
}

/// Top-level nodes in input order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Deepest scope nesting. Zero for plain text.
    pub fn depth(&self) -> usize {
        self.nodes.iter().map(Node::depth).max().unwrap_or(0)
    }

    /// Render text as is and each closed scope as `>>...<<`.
    ///
    /// Fails on the first unclosed scope, innermost first.
    pub fn render(&self) -> Result<String, BracketError> {
        let mut out = String::new();
        for node in &self.nodes {
            let mut part = String::new();
            if let Err(offset) = node.render_into(&mut part) {
                return Err(BracketError::Unterminated {
                    offset,
                    rendered: out,
                });
            }
            out.push_str(&part);
        }
        Ok(out)
    }
}

impl Node {
    fn depth(&self) -> usize {
        match self {
            Node::Text { .. } => 0,
            Node::Scope { children, .. } => {
                1 + children.iter().map(Node::depth).max().unwrap_or(0)
            }
        }
    }

    /// Render into `out`, or return the offset of an unclosed scope.
    fn render_into(&self, out: &mut String) -> Result<(), usize> {
        match self {
            Node::Text { text, .. } => out.push_str(text),
            Node::Scope {
                offset,
                closed,
                children,
            } => {
                out.push_str(">>");
                for child in children {
                    child.render_into(out)?;
                }
                if !closed {
                    return Err(*offset);
                }
                out.push_str("<<");
            }
        }
        Ok(())
    }
}

/// Pair brackets into a [`Tree`].
///
/// Fails with [`BracketError::Unbalanced`] on a `}` that closes nothing.
pub fn build<I>(items: I) -> Result<Tree, BracketError>
where
    I: IntoIterator<Item = Item<TextToken, char>>,
{
    let mut roots = Vec::new();
    // Open scopes: offset of the `{` and the children collected so far.
    let mut open: Vec<(usize, Vec<Node>)> = Vec::new();

    for item in items {
        match item.kind() {
            TextToken::Ident | TextToken::Templ | TextToken::Error => {
                let node = Node::Text {
                    offset: item.offset(),
                    text: item.text(),
                };
                innermost(&mut open, &mut roots).push(node);
            }
            TextToken::LBrace => {
                trace!(offset = item.offset(), depth = open.len(), "open scope");
                open.push((item.offset(), Vec::new()));
            }
            TextToken::RBrace => {
                let Some((offset, children)) = open.pop() else {
                    return Err(BracketError::Unbalanced {
                        offset: item.offset(),
                    });
                };
                let node = Node::Scope {
                    offset,
                    closed: true,
                    children,
                };
                innermost(&mut open, &mut roots).push(node);
            }
            TextToken::Eof => break,
        }
    }

    while let Some((offset, children)) = open.pop() {
        let node = Node::Scope {
            offset,
            closed: false,
            children,
        };
        innermost(&mut open, &mut roots).push(node);
    }

    Ok(Tree { nodes: roots })
}

fn innermost<'a>(
    open: &'a mut [(usize, Vec<Node>)],
    roots: &'a mut Vec<Node>,
) -> &'a mut Vec<Node> {
    match open.last_mut() {
        Some((_, children)) => children,
        None => roots,
    }
}
