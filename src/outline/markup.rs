//! Tag nesting engine for HTML-like markup
//!
//! `<` + tag opens an element, `</` + tag closes the innermost open one.
//! The `>` ending an opening tag finalizes the element's label from its
//! `id`/`class` attributes, and immediately closes void and self-closing
//! elements. Essential mode runs the same machine and filters afterwards.

use super::{
    Label, LabelRole, NodeId, OutlineEngine, OutlineKind, OutlineNode, OutlineTree,
    RetentionPolicy,
};
use crate::tokens::{Token, TokenStyle};

/// Elements that never have children or a closing tag
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "command", "embed", "hr", "img", "input", "keygen", "link",
    "meta", "param", "source", "track", "wbr",
];

pub fn is_void_element(tag: &str) -> bool {
    VOID_ELEMENTS.contains(&tag.to_ascii_lowercase().as_str())
}

pub struct MarkupEngine {
    tree: OutlineTree,
    policy: RetentionPolicy,
    last_bracket: Option<String>,
    /// Attribute name waiting for its value
    pending_attribute: Option<String>,
    /// Element whose opening tag has not seen `>` yet
    open_tag: Option<NodeId>,
    open_tag_column: usize,
}

impl MarkupEngine {
    pub fn new(policy: RetentionPolicy) -> Self {
        Self {
            tree: OutlineTree::new(),
            policy,
            last_bracket: None,
            pending_attribute: None,
            open_tag: None,
            open_tag_column: 0,
        }
    }

    fn on_bracket(&mut self, text: &str, column: usize) {
        let bracket = text.trim();
        if bracket.contains('>') {
            if let Some(id) = self.open_tag.take() {
                let tag = self.finalize(id);
                if bracket.contains("/>") || is_void_element(&tag) {
                    self.tree.close(id);
                }
            }
            self.pending_attribute = None;
        } else if bracket.contains('<') {
            self.open_tag_column = column;
        }
        self.last_bracket = Some(bracket.to_string());
    }

    fn on_tag(&mut self, token: &Token) {
        match self.last_bracket.take().as_deref() {
            Some("<") => {
                let node = OutlineNode::new(
                    OutlineKind::Tag,
                    token.text.trim(),
                    token.line,
                    self.open_tag_column,
                );
                self.open_tag = Some(self.tree.push(node));
                self.pending_attribute = None;
            }
            Some("</") => {
                if self.tree.pop().is_none() {
                    tracing::debug!(
                        "Closing tag </{}> on line {} has no open element",
                        token.text.trim(),
                        token.line
                    );
                }
            }
            _ => {}
        }
    }

    fn on_attribute_value(&mut self, text: &str) {
        let Some(name) = self.pending_attribute.take() else {
            return;
        };
        let Some(node) = self.open_tag.and_then(|id| self.tree.node_mut(id)) else {
            return;
        };
        let value: String = text.chars().filter(|c| *c != '"' && *c != '\'').collect();
        node.attributes.insert(name, value);
    }

    /// Build the label and decorate the name; returns the bare tag name
    fn finalize(&mut self, id: NodeId) -> String {
        let Some(node) = self.tree.node_mut(id) else {
            return String::new();
        };
        let tag = node.name.clone();

        let mut label = Label::new();
        label.push(LabelRole::Tag, tag.as_str());
        if let Some(id_attr) = node.attributes.get("id") {
            let part = format!("#{}", id_attr);
            label.punct(" ").push(LabelRole::Id, part.as_str());
            node.name.push(' ');
            node.name.push_str(&part);
        }
        if let Some(class_attr) = node.attributes.get("class") {
            let part = format!(".{}", class_attr);
            label.punct(" ").push(LabelRole::Class, part.as_str());
            node.name.push(' ');
            node.name.push_str(&part);
        }
        node.label = label;
        tag
    }
}

impl OutlineEngine for MarkupEngine {
    fn feed(&mut self, token: &Token, column: usize) {
        match token.style {
            TokenStyle::TagBracket => self.on_bracket(&token.text, column),
            TokenStyle::Tag => self.on_tag(token),
            TokenStyle::Attribute => {
                if self.open_tag.is_some() {
                    self.pending_attribute = Some(token.text.trim().to_ascii_lowercase());
                }
            }
            TokenStyle::String => self.on_attribute_value(&token.text),
            TokenStyle::Plain
            | TokenStyle::Keyword
            | TokenStyle::Variable
            | TokenStyle::Variable2
            | TokenStyle::Comment
            | TokenStyle::Meta
            | TokenStyle::Other => {}
        }
    }

    fn finish(self) -> OutlineNode {
        self.policy.apply(self.tree.into_root())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outline::drive;

    fn tokens(stream: &[(&str, TokenStyle)]) -> Vec<Token> {
        stream
            .iter()
            .map(|(text, style)| Token::new(*text, *style, 1))
            .collect()
    }

    #[test]
    fn test_void_elements() {
        assert!(is_void_element("br"));
        assert!(is_void_element("IMG"));
        assert!(!is_void_element("div"));
    }

    #[test]
    fn test_open_tag_column_points_at_bracket() {
        use TokenStyle::*;
        let stream = tokens(&[
            ("  ", Plain),
            ("<", TagBracket),
            ("p", Tag),
            (">", TagBracket),
        ]);
        let root = drive(MarkupEngine::new(RetentionPolicy::KeepAll), &stream, 4);
        assert_eq!(root.children[0].jump_target(), (1, 2));
    }

    #[test]
    fn test_attribute_without_value_is_unset() {
        use TokenStyle::*;
        let stream = tokens(&[
            ("<", TagBracket),
            ("input", Tag),
            ("disabled", Attribute),
            (">", TagBracket),
            ("\"x\"", String),
        ]);
        let root = drive(MarkupEngine::new(RetentionPolicy::KeepAll), &stream, 4);
        assert!(root.children[0].attributes.is_empty());
    }

    #[test]
    fn test_self_closing_tag_closes_element() {
        use TokenStyle::*;
        let stream = tokens(&[
            ("<", TagBracket),
            ("circle", Tag),
            ("/>", TagBracket),
            ("<", TagBracket),
            ("rect", Tag),
            ("/>", TagBracket),
        ]);
        let root = drive(MarkupEngine::new(RetentionPolicy::KeepAll), &stream, 4);
        assert_eq!(root.children.len(), 2);
        assert!(root.children.iter().all(|n| n.children.is_empty()));
    }
}
