//! Declaration scanner for PHP
//!
//! A flat scanner state plus per-body brace counters. Keywords open a
//! declaration header, identifiers fill in its name and heritage lists,
//! `$variables` inside the parentheses become parameters, and the header
//! ends at `{` (body follows) or `;` (no body).
//!
//! ```text
//! Idle ─class/interface/function─► WaitName ─name─► WaitHeritage | WaitParams
//! WaitHeritage ─extends─► WaitExtends ─implements─► WaitImplements ─{─► Idle
//! WaitParams ─(─► Params ─)─► WaitBody ─{ or ;─► Idle
//! ```

use super::{
    Label, LabelRole, NodeId, OutlineEngine, OutlineKind, OutlineNode, OutlineTree, Param,
};
use crate::tokens::{Token, TokenStyle};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Idle,
    WaitName,
    /// Class or interface named; `extends`/`implements` may follow
    WaitHeritage,
    WaitExtends,
    WaitImplements,
    /// Function named; parameter list follows
    WaitParams,
    Params,
    /// Parameter list closed; return type, `{` or `;` follows
    WaitBody,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DeclKind {
    Class,
    Interface,
    Function,
}

impl DeclKind {
    fn from_keyword(word: &str) -> Option<Self> {
        match word {
            "class" => Some(DeclKind::Class),
            "interface" => Some(DeclKind::Interface),
            "function" => Some(DeclKind::Function),
            _ => None,
        }
    }

    fn outline_kind(self) -> OutlineKind {
        match self {
            DeclKind::Class => OutlineKind::Class,
            DeclKind::Interface => OutlineKind::Interface,
            DeclKind::Function => OutlineKind::Function,
        }
    }
}

/// Declaration whose header is being scanned
#[derive(Debug, Clone, Copy)]
struct Header {
    kind: DeclKind,
    node: NodeId,
}

/// An open declaration body
#[derive(Debug, Clone, Copy)]
struct Scope {
    node: NodeId,
    /// Unmatched non-declaration `{` inside this body
    braces: usize,
}

pub struct DeclarationScanner {
    tree: OutlineTree,
    state: ScanState,
    header: Option<Header>,
    scopes: Vec<Scope>,
    paren_depth: usize,
    /// Type hint seen before the next parameter
    pending_type: Option<String>,
    /// Last non-blank, non-comment token
    last_token: String,
}

impl Default for DeclarationScanner {
    fn default() -> Self {
        Self::new()
    }
}

impl DeclarationScanner {
    pub fn new() -> Self {
        Self {
            tree: OutlineTree::new(),
            state: ScanState::Idle,
            header: None,
            scopes: Vec::new(),
            paren_depth: 0,
            pending_type: None,
            last_token: String::new(),
        }
    }

    fn header_node(&mut self) -> Option<&mut OutlineNode> {
        let header = self.header?;
        self.tree.node_mut(header.node)
    }

    fn on_keyword(&mut self, token: &Token, column: usize) {
        let word = token.text.trim().to_ascii_lowercase();
        if let Some(kind) = DeclKind::from_keyword(&word) {
            // `Foo::class`, `$obj->function`, `use function Foo\bar;`
            if matches!(self.last_token.as_str(), "::" | "->" | "?->")
                || self.last_token.eq_ignore_ascii_case("use")
            {
                return;
            }
            self.open_header(kind, token.line, column);
            return;
        }

        if self.header.is_none() {
            return;
        }
        match word.as_str() {
            "extends" => self.state = ScanState::WaitExtends,
            "implements" => self.state = ScanState::WaitImplements,
            _ => {}
        }
    }

    fn open_header(&mut self, kind: DeclKind, line: usize, column: usize) {
        if let Some(previous) = self.header {
            tracing::debug!("Declaration on line {} starts before the previous header ended", line);
            self.end_header(previous, true);
        }
        let node = self
            .tree
            .push(OutlineNode::new(kind.outline_kind(), "", line, column));
        self.header = Some(Header { kind, node });
        self.state = ScanState::WaitName;
        self.paren_depth = 0;
        self.pending_type = None;
    }

    fn on_variable(&mut self, text: &str) {
        let Some(header) = self.header else {
            return;
        };
        let text = text.trim();
        match self.state {
            ScanState::WaitName => {
                if let Some(node) = self.header_node() {
                    node.name.push_str(text);
                }
                self.state = match header.kind {
                    DeclKind::Function => ScanState::WaitParams,
                    DeclKind::Class | DeclKind::Interface => ScanState::WaitHeritage,
                };
            }
            ScanState::WaitExtends => {
                if let Some(node) = self.header_node() {
                    node.extends.push(text.to_string());
                }
            }
            ScanState::WaitImplements => {
                if let Some(node) = self.header_node() {
                    node.implements.push(text.to_string());
                }
            }
            ScanState::Params => {
                self.pending_type = Some(extend_type(self.pending_type.take(), text));
            }
            ScanState::WaitBody => {
                if let Some(node) = self.header_node() {
                    node.return_type = Some(extend_type(node.return_type.take(), text));
                }
            }
            ScanState::Idle | ScanState::WaitHeritage | ScanState::WaitParams => {}
        }
    }

    fn on_variable2(&mut self, text: &str) {
        let Some(header) = self.header else {
            return;
        };
        if header.kind != DeclKind::Function || self.state != ScanState::Params {
            return;
        }
        let type_hint = self
            .pending_type
            .take()
            .map(|hint| hint.trim_end_matches(TYPE_MARKERS).to_string())
            .filter(|hint| !hint.is_empty());
        let param = Param {
            name: text.trim().trim_start_matches('$').to_string(),
            type_hint,
        };
        if let Some(node) = self.header_node() {
            node.params.push(param);
        }
    }

    fn on_punctuation(&mut self, c: char) {
        match c {
            '(' => self.open_paren(),
            ')' => self.close_paren(),
            '{' => self.open_brace(),
            '}' => self.close_brace(),
            ';' => self.on_semicolon(),
            ',' if self.state == ScanState::Params && self.paren_depth == 1 => {
                self.pending_type = None;
            }
            '?' | '|' | '&' => self.on_type_marker(c),
            _ => {}
        }
    }

    /// Nullable, union and intersection markers between type names
    fn on_type_marker(&mut self, marker: char) {
        match self.state {
            ScanState::Params if self.paren_depth == 1 => {
                self.pending_type = push_marker(self.pending_type.take(), marker);
            }
            ScanState::WaitBody => {
                if let Some(node) = self.header_node() {
                    node.return_type = push_marker(node.return_type.take(), marker);
                }
            }
            _ => {}
        }
    }

    fn open_paren(&mut self) {
        let Some(header) = self.header else {
            return;
        };
        if header.kind != DeclKind::Function {
            // `new class(...)` arguments; the class stays unnamed
            if self.state == ScanState::WaitName {
                self.state = ScanState::WaitHeritage;
            }
            return;
        }
        match self.state {
            ScanState::WaitName | ScanState::WaitParams => {
                self.state = ScanState::Params;
                self.paren_depth = 1;
            }
            ScanState::Params => self.paren_depth += 1,
            _ => {}
        }
    }

    fn close_paren(&mut self) {
        if self.state != ScanState::Params {
            return;
        }
        self.paren_depth = self.paren_depth.saturating_sub(1);
        if self.paren_depth == 0 {
            self.state = ScanState::WaitBody;
            self.pending_type = None;
        }
    }

    fn open_brace(&mut self) {
        if let Some(header) = self.header {
            let body_follows = match header.kind {
                DeclKind::Function => self.state == ScanState::WaitBody,
                DeclKind::Class | DeclKind::Interface => true,
            };
            if body_follows {
                self.finalize(header);
                self.header = None;
                self.state = ScanState::Idle;
                self.scopes.push(Scope {
                    node: header.node,
                    braces: 0,
                });
                return;
            }
        }
        if let Some(scope) = self.scopes.last_mut() {
            scope.braces += 1;
        }
    }

    fn close_brace(&mut self) {
        let Some(scope) = self.scopes.last_mut() else {
            match self.header {
                Some(header) => self.end_header(header, false),
                None => {
                    self.tree.pop();
                }
            }
            return;
        };
        if scope.braces > 0 {
            scope.braces -= 1;
            return;
        }

        if let Some(header) = self.header.take() {
            tracing::debug!("Body closed while a declaration header was open");
            self.state = ScanState::Idle;
            self.tree.close(header.node);
        }
        if let Some(scope) = self.scopes.pop() {
            self.tree.close(scope.node);
        }
    }

    fn on_semicolon(&mut self) {
        let Some(header) = self.header else {
            return;
        };
        if self.state != ScanState::Params {
            self.end_header(header, true);
        }
    }

    /// Close a declaration that has no body
    fn end_header(&mut self, header: Header, finalize: bool) {
        if finalize {
            self.finalize(header);
        }
        self.header = None;
        self.state = ScanState::Idle;
        self.tree.close(header.node);
    }

    fn finalize(&mut self, header: Header) {
        let Some(node) = self.tree.node_mut(header.node) else {
            return;
        };
        node.label = match header.kind {
            DeclKind::Function => function_label(node),
            DeclKind::Class => class_label(node, "class"),
            DeclKind::Interface => class_label(node, "interface"),
        };
        tracing::trace!("Declaration finalized: {}", node.label);
    }
}

const TYPE_MARKERS: [char; 3] = ['?', '|', '&'];

/// Add a type name, joining union members with `|` when no marker came between
fn extend_type(existing: Option<String>, name: &str) -> String {
    match existing {
        None => name.to_string(),
        Some(mut ty) => {
            if !ty.ends_with(TYPE_MARKERS) {
                ty.push('|');
            }
            ty.push_str(name);
            ty
        }
    }
}

/// `?` may open a type; `|` and `&` only continue one, so a by-reference
/// `&$x` without a type stays untyped
fn push_marker(existing: Option<String>, marker: char) -> Option<String> {
    match (existing, marker) {
        (Some(mut ty), _) => {
            if !ty.ends_with(TYPE_MARKERS) {
                ty.push(marker);
            }
            Some(ty)
        }
        (None, '?') => Some("?".to_string()),
        (None, _) => None,
    }
}

fn function_label(node: &OutlineNode) -> Label {
    let mut label = Label::new();
    label
        .push(LabelRole::Kind, "function")
        .punct(" ")
        .push(LabelRole::Name, node.name.as_str())
        .punct("(");
    for (i, param) in node.params.iter().enumerate() {
        if i > 0 {
            label.punct(", ");
        }
        if let Some(type_hint) = &param.type_hint {
            label.push(LabelRole::ParamType, type_hint.as_str()).punct(" ");
        }
        label.push(LabelRole::Param, format!("${}", param.name));
    }
    label.punct(")");
    if let Some(return_type) = &node.return_type {
        label
            .punct(": ")
            .push(LabelRole::ReturnType, return_type.as_str());
    }
    label
}

fn class_label(node: &OutlineNode, keyword: &str) -> Label {
    let mut label = Label::new();
    label.push(LabelRole::Kind, keyword);
    if !node.name.is_empty() {
        label.punct(" ").push(LabelRole::Name, node.name.as_str());
    }
    push_list(&mut label, " extends ", LabelRole::BaseClass, &node.extends);
    push_list(&mut label, " implements ", LabelRole::Interface, &node.implements);
    label
}

fn push_list(label: &mut Label, keyword: &str, role: LabelRole, items: &[String]) {
    if items.is_empty() {
        return;
    }
    label.punct(keyword);
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            label.punct(", ");
        }
        label.push(role, item.as_str());
    }
}

impl OutlineEngine for DeclarationScanner {
    fn feed(&mut self, token: &Token, column: usize) {
        match token.style {
            TokenStyle::Comment => return,
            TokenStyle::Keyword => self.on_keyword(token, column),
            TokenStyle::Variable => self.on_variable(&token.text),
            TokenStyle::Variable2 => self.on_variable2(&token.text),
            TokenStyle::Plain => {
                for c in token.text.chars() {
                    self.on_punctuation(c);
                }
            }
            TokenStyle::TagBracket
            | TokenStyle::Tag
            | TokenStyle::Attribute
            | TokenStyle::String
            | TokenStyle::Meta
            | TokenStyle::Other => {}
        }

        let text = token.text.trim();
        if !text.is_empty() {
            self.last_token = text.to_string();
        }
    }

    fn finish(self) -> OutlineNode {
        if let Some(header) = self.header {
            tracing::debug!("Stream ended inside declaration header (node {})", header.node);
        }
        self.tree.into_root()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outline::drive;

    fn scan(stream: &[(&str, TokenStyle)]) -> OutlineNode {
        let tokens: Vec<Token> = stream
            .iter()
            .map(|(text, style)| Token::new(*text, *style, 1))
            .collect();
        drive(DeclarationScanner::new(), &tokens, 4)
    }

    #[test]
    fn test_nested_if_braces_do_not_close_function() {
        use TokenStyle::*;
        let root = scan(&[
            ("function", Keyword),
            ("f", Variable),
            ("(", Plain),
            (")", Plain),
            ("{", Plain),
            ("if", Keyword),
            ("{", Plain),
            ("}", Plain),
            ("function", Keyword),
            ("g", Variable),
            ("(", Plain),
            (")", Plain),
            ("{", Plain),
            ("}", Plain),
            ("}", Plain),
        ]);
        assert_eq!(root.children.len(), 1);
        assert_eq!(root.children[0].name, "f");
        assert_eq!(root.children[0].children[0].name, "g");
    }

    #[test]
    fn test_default_value_parens_keep_collecting_params() {
        use TokenStyle::*;
        let root = scan(&[
            ("function", Keyword),
            ("f", Variable),
            ("(", Plain),
            ("$a", Variable2),
            ("=", Plain),
            ("array", Keyword),
            ("(", Plain),
            (")", Plain),
            (",", Plain),
            ("int", Variable),
            ("$b", Variable2),
            (")", Plain),
            (":", Plain),
            ("string", Variable),
            ("{", Plain),
            ("}", Plain),
        ]);
        let f = &root.children[0];
        let names: Vec<&str> = f.params.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(f.params[1].type_hint.as_deref(), Some("int"));
        assert_eq!(f.return_type.as_deref(), Some("string"));
        assert_eq!(f.label.to_string(), "function f($a, int $b): string");
    }

    #[test]
    fn test_class_constant_access_is_not_a_declaration() {
        use TokenStyle::*;
        let root = scan(&[
            ("Foo", Variable),
            ("::", Plain),
            ("class", Keyword),
            (";", Plain),
        ]);
        assert_eq!(root.count_nodes(), 0);
    }

    #[test]
    fn test_closure_use_clause_is_not_params() {
        use TokenStyle::*;
        let root = scan(&[
            ("function", Keyword),
            ("(", Plain),
            ("$x", Variable2),
            (")", Plain),
            ("use", Keyword),
            ("(", Plain),
            ("$y", Variable2),
            (")", Plain),
            ("{", Plain),
            ("}", Plain),
        ]);
        let closure = &root.children[0];
        assert_eq!(closure.name, "");
        assert_eq!(closure.params.len(), 1);
        assert_eq!(closure.params[0].name, "x");
    }

    #[test]
    fn test_type_pieces_join() {
        assert_eq!(extend_type(None, "int"), "int");
        assert_eq!(extend_type(Some("int".to_string()), "string"), "int|string");
        assert_eq!(extend_type(Some("?".to_string()), "Foo"), "?Foo");
        assert_eq!(extend_type(Some("A&".to_string()), "B"), "A&B");
        assert_eq!(push_marker(None, '?'), Some("?".to_string()));
        assert_eq!(push_marker(None, '&'), None);
        assert_eq!(push_marker(Some("A".to_string()), '&'), Some("A&".to_string()));
    }

    #[test]
    fn test_keywords_are_case_insensitive() {
        use TokenStyle::*;
        let root = scan(&[
            ("CLASS", Keyword),
            ("Foo", Variable),
            ("EXTENDS", Keyword),
            ("Bar", Variable),
            ("{", Plain),
            ("}", Plain),
        ]);
        assert_eq!(root.children[0].kind, OutlineKind::Class);
        assert_eq!(root.children[0].extends, vec!["Bar".to_string()]);
    }
}
