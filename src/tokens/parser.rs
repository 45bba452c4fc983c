//! Tree-sitter backed tokenizer
//!
//! Parses the document and walks the syntax tree's leaves in source order,
//! classifying each one into a [`TokenStyle`]. Text between leaves
//! (whitespace, inline HTML) becomes `Plain` tokens so that every source
//! byte is covered.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use tree_sitter::{Language, Node, Parser};

use super::{push_lines, Token, TokenSource, TokenStyle};
use crate::error::OutlineError;
use crate::grammar::GrammarId;

/// Node kinds emitted as a single token instead of being descended into
const HTML_OPAQUE: &[&str] = &["quoted_attribute_value", "doctype", "comment"];
const PHP_OPAQUE: &[&str] = &[
    "variable_name",
    "qualified_name",
    "primitive_type",
    "string",
    "encapsed_string",
    "heredoc",
    "nowdoc",
    "comment",
    "attribute_list",
];

fn language(grammar: GrammarId) -> Language {
    match grammar {
        GrammarId::Html => tree_sitter_html::LANGUAGE.into(),
        GrammarId::Php => tree_sitter_php::LANGUAGE_PHP.into(),
    }
}

/// Parser instances, created lazily per grammar (tree-sitter parsers are !Sync)
#[derive(Default)]
pub struct TreeSitterTokens {
    parsers: HashMap<GrammarId, Parser>,
}

impl TreeSitterTokens {
    pub fn new() -> Self {
        Self::default()
    }

    fn parser(&mut self, grammar: GrammarId) -> Result<&mut Parser, OutlineError> {
        match self.parsers.entry(grammar) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                let mut parser = Parser::new();
                parser
                    .set_language(&language(grammar))
                    .map_err(|e| OutlineError::GrammarLoad {
                        grammar,
                        message: e.to_string(),
                    })?;
                tracing::debug!("Initialized {} tokenizer", grammar);
                Ok(entry.insert(parser))
            }
        }
    }
}

impl TokenSource for TreeSitterTokens {
    fn tokenize(&mut self, text: &str, grammar: GrammarId) -> Result<Vec<Token>, OutlineError> {
        let tree = self
            .parser(grammar)?
            .parse(text, None)
            .ok_or(OutlineError::ParseFailed(grammar))?;

        let mut walker = LeafWalker {
            source: text,
            grammar,
            tokens: Vec::new(),
            offset: 0,
            line: 1,
        };
        walker.visit(tree.root_node());
        walker.flush_gap(text.len());

        tracing::trace!(
            "Tokenized {} bytes of {} into {} tokens",
            text.len(),
            grammar,
            walker.tokens.len()
        );
        Ok(walker.tokens)
    }
}

struct LeafWalker<'a> {
    source: &'a str,
    grammar: GrammarId,
    tokens: Vec<Token>,
    /// Byte offset up to which tokens have been emitted
    offset: usize,
    line: usize,
}

impl LeafWalker<'_> {
    fn visit(&mut self, node: Node) {
        if node.child_count() == 0 || self.is_opaque(node.kind()) {
            self.emit(node);
            return;
        }

        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            self.visit(child);
        }
    }

    fn is_opaque(&self, kind: &str) -> bool {
        match self.grammar {
            GrammarId::Html => HTML_OPAQUE.contains(&kind),
            GrammarId::Php => PHP_OPAQUE.contains(&kind),
        }
    }

    fn emit(&mut self, node: Node) {
        let (start, end) = (node.start_byte(), node.end_byte());
        // MISSING nodes are zero-width; overlapping leaves were already covered
        if start >= end || start < self.offset {
            return;
        }
        self.flush_gap(start);

        let source = self.source;
        let Some(text) = source.get(start..end) else {
            tracing::debug!("Skipping leaf {} at non-boundary {}..{}", node.kind(), start, end);
            return;
        };
        let style = match self.grammar {
            GrammarId::Html => classify_html(&node),
            GrammarId::Php => classify_php(&node),
        };
        push_lines(&mut self.tokens, text, style, &mut self.line);
        self.offset = end;
    }

    fn flush_gap(&mut self, upto: usize) {
        if upto <= self.offset {
            return;
        }
        let source = self.source;
        if let Some(gap) = source.get(self.offset..upto) {
            push_lines(&mut self.tokens, gap, TokenStyle::Plain, &mut self.line);
        }
        self.offset = upto;
    }
}

fn classify_html(node: &Node) -> TokenStyle {
    match node.kind() {
        "<" | "</" | ">" | "/>" => TokenStyle::TagBracket,
        "tag_name" | "erroneous_end_tag_name" => TokenStyle::Tag,
        "attribute_name" => TokenStyle::Attribute,
        "quoted_attribute_value" | "attribute_value" => TokenStyle::String,
        "comment" => TokenStyle::Comment,
        "doctype" => TokenStyle::Meta,
        _ => TokenStyle::Plain,
    }
}

fn classify_php(node: &Node) -> TokenStyle {
    let kind = node.kind();
    match kind {
        "comment" => TokenStyle::Comment,
        "php_tag" | "?>" => TokenStyle::Meta,
        "name" | "qualified_name" | "primitive_type" => TokenStyle::Variable,
        "variable_name" => TokenStyle::Variable2,
        "string" | "encapsed_string" | "heredoc" | "nowdoc" => TokenStyle::String,
        // `#[...]` attributes and inline HTML carry no declaration punctuation
        "attribute_list" | "text" => TokenStyle::Other,
        _ if !node.is_named() && is_keyword(kind) => TokenStyle::Keyword,
        _ if node.is_named() => TokenStyle::Other,
        _ => TokenStyle::Plain,
    }
}

fn is_keyword(kind: &str) -> bool {
    !kind.is_empty() && kind.chars().all(|c| c.is_ascii_alphabetic() || c == '_')
}
