//! Document outline extraction
//!
//! Builds the heading hierarchy of a Markdown buffer. Used by the outline
//! panel to show a collapsible tree and to jump to a heading.

mod extract;

pub use extract::{extract_outline, heading_anchor, parse_heading};

use serde::Serialize;

/// A single heading in the outline tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutlineNode {
    /// 1 to 6
    pub level: u8,
    pub text: String,
    /// Zero-based line of the heading
    pub line: usize,
    /// Slug used as the preview anchor
    pub anchor: String,
    pub children: Vec<OutlineNode>,
}

impl OutlineNode {
    /// Whether this node has children (can be expanded/collapsed)
    pub fn is_collapsible(&self) -> bool {
        !self.children.is_empty()
    }

    /// Short label for rendering in the outline tree
    pub fn label(&self) -> &'static str {
        match self.level {
            1 => "H1",
            2 => "H2",
            3 => "H3",
            4 => "H4",
            5 => "H5",
            6 => "H6",
            _ => "H?",
        }
    }
}

/// Outline of the active buffer, tagged with the revision it was built from
#[derive(Debug, Clone, Default)]
pub struct OutlineData {
    pub revision: u64,
    pub roots: Vec<OutlineNode>,
}

impl OutlineData {
    pub fn empty(revision: u64) -> Self {
        Self {
            revision,
            roots: Vec::new(),
        }
    }

    pub fn from_text(text: &str, revision: u64) -> Self {
        Self {
            revision,
            roots: extract_outline(text),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Depth-first walk yielding `(depth, node)`
    pub fn flatten(&self) -> Vec<(usize, &OutlineNode)> {
        fn walk<'a>(nodes: &'a [OutlineNode], depth: usize, out: &mut Vec<(usize, &'a OutlineNode)>) {
            for node in nodes {
                out.push((depth, node));
                walk(&node.children, depth + 1, out);
            }
        }
        let mut out = Vec::new();
        walk(&self.roots, 0, &mut out);
        out
    }

    /// Line of the first heading whose anchor is `anchor`
    pub fn line_of_anchor(&self, anchor: &str) -> Option<usize> {
        self.flatten()
            .into_iter()
            .find(|(_, node)| node.anchor == anchor)
            .map(|(_, node)| node.line)
    }
}
