//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use outliner::bridge::{OutlineMsg, OutlinerApi};
use outliner::error::OutlineError;
use outliner::grammar::GrammarId;
use outliner::outline::OutlineNode;
use outliner::tokens::{Token, TokenSource, TokenStyle};

/// Build a token stream from `(text, style, line)` triples
pub fn tokens(stream: &[(&str, TokenStyle, usize)]) -> Vec<Token> {
    stream
        .iter()
        .map(|(text, style, line)| Token::new(*text, *style, *line))
        .collect()
}

/// Tokens for `<tag attr="value" ...>` on one line
pub fn open_tag(tag: &str, attrs: &[(&str, &str)], line: usize) -> Vec<Token> {
    let mut out = vec![
        Token::new("<", TokenStyle::TagBracket, line),
        Token::new(tag, TokenStyle::Tag, line),
    ];
    for (name, value) in attrs {
        out.push(Token::new(" ", TokenStyle::Plain, line));
        out.push(Token::new(*name, TokenStyle::Attribute, line));
        out.push(Token::new("=", TokenStyle::Plain, line));
        out.push(Token::new(format!("\"{}\"", value), TokenStyle::String, line));
    }
    out.push(Token::new(">", TokenStyle::TagBracket, line));
    out
}

/// Tokens for `</tag>`
pub fn close_tag(tag: &str, line: usize) -> Vec<Token> {
    vec![
        Token::new("</", TokenStyle::TagBracket, line),
        Token::new(tag, TokenStyle::Tag, line),
        Token::new(">", TokenStyle::TagBracket, line),
    ]
}

/// Names of a node's direct children
pub fn child_names(node: &OutlineNode) -> Vec<&str> {
    node.children.iter().map(|n| n.name.as_str()).collect()
}

/// Token source that replays a fixed stream, or fails
pub struct FixedTokens {
    pub tokens: Vec<Token>,
    pub fail: bool,
}

impl FixedTokens {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            tokens: Vec::new(),
            fail: true,
        }
    }
}

impl TokenSource for FixedTokens {
    fn tokenize(&mut self, _text: &str, grammar: GrammarId) -> Result<Vec<Token>, OutlineError> {
        if self.fail {
            return Err(OutlineError::ParseFailed(grammar));
        }
        Ok(self.tokens.clone())
    }
}

/// Host panel that records what a bridge asked of it
#[derive(Default)]
pub struct RecordingApi {
    pub buttons: Vec<(String, OutlineMsg)>,
    pub redraws: usize,
}

impl OutlinerApi for RecordingApi {
    fn register_button(&mut self, id: &str, on_click: OutlineMsg) {
        self.buttons.push((id.to_string(), on_click));
    }

    fn force_draw(&mut self) {
        self.redraws += 1;
    }
}
