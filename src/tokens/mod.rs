//! Token source for outline engines
//!
//! Engines consume a flat, ordered sequence of `(text, style, line)` tokens.
//! Style classification happens here, at the boundary, so the engines can
//! pattern-match on [`TokenStyle`] instead of comparing class strings.
//!
//! ## Architecture
//!
//! ```text
//! source text ──► TokenSource::tokenize ──► Vec<Token> ──► outline engine
//!                 (tree-sitter leaves)
//! ```

mod parser;

use serde::{Deserialize, Serialize};

use crate::error::OutlineError;
use crate::grammar::GrammarId;

pub use parser::TreeSitterTokens;

/// Style category attached to a token by the tokenizer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TokenStyle {
    /// Whitespace, punctuation and anything without a class
    #[default]
    Plain,
    /// `<`, `</`, `>`, `/>`
    TagBracket,
    /// Element name in an opening or closing tag
    Tag,
    /// Attribute name inside a tag
    Attribute,
    /// String literal or attribute value (quotes included)
    String,
    /// Reserved word (`class`, `function`, `extends`, ...)
    Keyword,
    /// Identifier: declaration names, base classes, type hints
    Variable,
    /// `$`-prefixed variable
    Variable2,
    Comment,
    /// Processing instructions, doctypes, `<?php`
    Meta,
    /// A class no engine reacts to
    Other,
}

impl TokenStyle {
    /// Map a CodeMirror-style class name (`"tag bracket"`, `"variable-2"`)
    /// to a style. Unknown classes fall through to [`TokenStyle::Other`].
    pub fn from_class(class: &str) -> Self {
        match class.trim() {
            "" | "null" => TokenStyle::Plain,
            "tag bracket" | "bracket tag" => TokenStyle::TagBracket,
            "tag" => TokenStyle::Tag,
            "attribute" => TokenStyle::Attribute,
            "string" => TokenStyle::String,
            "keyword" => TokenStyle::Keyword,
            "variable" => TokenStyle::Variable,
            "variable-2" => TokenStyle::Variable2,
            "comment" => TokenStyle::Comment,
            "meta" => TokenStyle::Meta,
            _ => TokenStyle::Other,
        }
    }
}

/// A single lexical token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub text: String,
    pub style: TokenStyle,
    /// 1-based source line
    pub line: usize,
}

impl Token {
    pub fn new(text: impl Into<String>, style: TokenStyle, line: usize) -> Self {
        Self {
            text: text.into(),
            style,
            line,
        }
    }

    /// Display width in columns, with tabs expanded to `tab_size`
    pub fn width(&self, tab_size: usize) -> usize {
        self.text
            .chars()
            .map(|c| if c == '\t' { tab_size } else { 1 })
            .sum()
    }
}

/// Anything that can turn document text into an ordered token sequence
pub trait TokenSource {
    fn tokenize(&mut self, text: &str, grammar: GrammarId) -> Result<Vec<Token>, OutlineError>;
}

/// Append `text` as one token per line segment, advancing `line` on every
/// newline. Empty segments and line terminators are dropped.
pub(crate) fn push_lines(tokens: &mut Vec<Token>, text: &str, style: TokenStyle, line: &mut usize) {
    for (i, segment) in text.split('\n').enumerate() {
        if i > 0 {
            *line += 1;
        }
        let segment = segment.strip_suffix('\r').unwrap_or(segment);
        if !segment.is_empty() {
            tokens.push(Token::new(segment, style, *line));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_class_known_names() {
        assert_eq!(TokenStyle::from_class("tag bracket"), TokenStyle::TagBracket);
        assert_eq!(TokenStyle::from_class("variable-2"), TokenStyle::Variable2);
        assert_eq!(TokenStyle::from_class("keyword"), TokenStyle::Keyword);
        assert_eq!(TokenStyle::from_class(""), TokenStyle::Plain);
    }

    #[test]
    fn test_from_class_unknown_is_other() {
        assert_eq!(TokenStyle::from_class("number"), TokenStyle::Other);
        assert_eq!(TokenStyle::from_class("def"), TokenStyle::Other);
    }

    #[test]
    fn test_width_expands_tabs() {
        let token = Token::new("\t\tx", TokenStyle::Plain, 1);
        assert_eq!(token.width(4), 9);
        assert_eq!(Token::new("héllo", TokenStyle::Plain, 1).width(4), 5);
    }

    #[test]
    fn test_push_lines_splits_on_newlines() {
        let mut tokens = Vec::new();
        let mut line = 3;
        push_lines(&mut tokens, "/* a\r\n\n b */", TokenStyle::Comment, &mut line);
        assert_eq!(line, 5);
        assert_eq!(
            tokens,
            vec![
                Token::new("/* a", TokenStyle::Comment, 3),
                Token::new(" b */", TokenStyle::Comment, 5),
            ]
        );
    }
}
