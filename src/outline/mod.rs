//! Code outline extraction
//!
//! Builds a tree of document symbols from a token stream. Two engines share
//! the data model, the tree/stack primitive and the driving loop:
//!
//! - [`MarkupEngine`]: tag nesting for HTML-like markup
//! - [`DeclarationScanner`]: class/interface/function headers and
//!   brace-delimited bodies for PHP
//!
//! Every update rescans the whole token stream; no engine state outlives a scan.

mod declarations;
mod label;
mod markup;
mod tree;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::grammar::GrammarId;
use crate::tokens::Token;

pub use declarations::DeclarationScanner;
pub use label::{Label, LabelRole, LabelSpan};
pub use markup::{is_void_element, MarkupEngine};
pub use tree::{NodeId, OutlineTree};

/// Symbol kind for display and categorization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutlineKind {
    /// Sentinel holding the top-level symbols; never displayed
    Root,
    Tag,
    Class,
    Interface,
    Function,
}

impl OutlineKind {
    /// Short label for rendering in the outline tree
    pub fn label(&self) -> &'static str {
        match self {
            OutlineKind::Root => "root",
            OutlineKind::Tag => "tag",
            OutlineKind::Class => "class",
            OutlineKind::Interface => "iface",
            OutlineKind::Function => "fn",
        }
    }
}

/// Which outline to build for markup documents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    /// Every element, nested as in the source
    #[default]
    Tree,
    /// Only elements carrying an `id` or `class`, flattened under the root
    Essential,
}

impl ViewMode {
    pub fn toggled(self) -> Self {
        match self {
            ViewMode::Tree => ViewMode::Essential,
            ViewMode::Essential => ViewMode::Tree,
        }
    }

    pub fn retention(self) -> RetentionPolicy {
        match self {
            ViewMode::Tree => RetentionPolicy::KeepAll,
            ViewMode::Essential => RetentionPolicy::KeepIfLabeled,
        }
    }
}

/// Which nodes of a finished scan make it into the delivered outline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetentionPolicy {
    KeepAll,
    /// Keep nodes with `essential_weight() >= 1`, flattened in document order
    KeepIfLabeled,
}

impl RetentionPolicy {
    pub fn apply(self, mut root: OutlineNode) -> OutlineNode {
        match self {
            RetentionPolicy::KeepAll => root,
            RetentionPolicy::KeepIfLabeled => {
                let mut kept = Vec::new();
                collect_labeled(std::mem::take(&mut root.children), &mut kept);
                root.children = kept;
                root
            }
        }
    }
}

// Pre-order is discovery order, so the flattened list stays in document order.
fn collect_labeled(nodes: Vec<OutlineNode>, kept: &mut Vec<OutlineNode>) {
    for mut node in nodes {
        let children = std::mem::take(&mut node.children);
        if node.essential_weight() >= 1 {
            kept.push(node);
        }
        collect_labeled(children, kept);
    }
}

/// A declared parameter of a function
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Param {
    /// Name without the leading `$`
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_hint: Option<String>,
}

/// A single node in the outline tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutlineNode {
    pub kind: OutlineKind,
    /// Identifier, only ever appended to (e.g. `div` → `div #main .wide`)
    pub name: String,
    /// Display line; empty until the node's opening construct completes
    #[serde(default, skip_serializing_if = "Label::is_empty")]
    pub label: Label,
    /// 1-based line of the opening construct
    pub start_line: usize,
    /// 0-based column of the opening construct
    pub start_column: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<OutlineNode>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extends: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub implements: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<Param>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_type: Option<String>,
}

impl OutlineNode {
    pub fn new(kind: OutlineKind, name: impl Into<String>, line: usize, column: usize) -> Self {
        Self {
            kind,
            name: name.into(),
            label: Label::default(),
            start_line: line,
            start_column: column,
            children: Vec::new(),
            attributes: BTreeMap::new(),
            extends: Vec::new(),
            implements: Vec::new(),
            params: Vec::new(),
            return_type: None,
        }
    }

    pub fn root() -> Self {
        Self::new(OutlineKind::Root, "root", 0, 0)
    }

    pub fn is_root(&self) -> bool {
        self.kind == OutlineKind::Root
    }

    /// Whether this node has children (can be expanded/collapsed)
    pub fn is_collapsible(&self) -> bool {
        !self.children.is_empty()
    }

    /// Where the editor should place the cursor when this node is selected
    pub fn jump_target(&self) -> (usize, usize) {
        (self.start_line, self.start_column)
    }

    /// `id` counts 2, `class` counts 1; essential mode drops nodes below 1
    pub fn essential_weight(&self) -> u8 {
        let mut weight = 0;
        if self.attributes.contains_key("id") {
            weight += 2;
        }
        if self.attributes.contains_key("class") {
            weight += 1;
        }
        weight
    }

    /// Number of descendants (the node itself excluded)
    pub fn count_nodes(&self) -> usize {
        self.children
            .iter()
            .map(|child| 1 + child.count_nodes())
            .sum()
    }

    /// All descendants in document order
    pub fn descendants(&self) -> Vec<&OutlineNode> {
        let mut out = Vec::new();
        let mut stack: Vec<&OutlineNode> = self.children.iter().rev().collect();
        while let Some(node) = stack.pop() {
            out.push(node);
            stack.extend(node.children.iter().rev());
        }
        out
    }

    /// Innermost node declared on `line`
    pub fn find_at_line(&self, line: usize) -> Option<&OutlineNode> {
        self.descendants()
            .into_iter()
            .filter(|node| node.start_line == line)
            .last()
    }
}

/// Per-scan settings, read once at scan start
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanOptions {
    pub view_mode: ViewMode,
    pub tab_size: usize,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            view_mode: ViewMode::Tree,
            tab_size: 4,
        }
    }
}

/// A token-driven state machine that builds an outline
pub trait OutlineEngine {
    /// Consume the next token; `column` is the token's 0-based start column
    fn feed(&mut self, token: &Token, column: usize);

    /// Hand over the finished tree
    fn finish(self) -> OutlineNode;
}

/// Feed every token to `engine` in order, tracking columns per line
pub fn drive<E: OutlineEngine>(mut engine: E, tokens: &[Token], tab_size: usize) -> OutlineNode {
    let mut line = 0;
    let mut column = 0;
    for token in tokens {
        if token.line != line {
            line = token.line;
            column = 0;
        }
        engine.feed(token, column);
        column += token.width(tab_size);
    }
    engine.finish()
}

/// Build the outline for an already tokenized document
pub fn build_outline(grammar: GrammarId, tokens: &[Token], options: ScanOptions) -> OutlineNode {
    let root = match grammar {
        GrammarId::Html => drive(
            MarkupEngine::new(options.view_mode.retention()),
            tokens,
            options.tab_size,
        ),
        GrammarId::Php => drive(DeclarationScanner::new(), tokens, options.tab_size),
    };
    tracing::debug!(
        "Built {} outline: {} symbols from {} tokens",
        grammar,
        root.count_nodes(),
        tokens.len()
    );
    root
}
