//! Structured display lines for outline nodes

use std::fmt;

use serde::{Deserialize, Serialize};

/// What a span of a label stands for; renderers style by role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LabelRole {
    /// Declaration keyword (`class`, `function`)
    Kind,
    Name,
    Tag,
    Id,
    Class,
    Param,
    ParamType,
    ReturnType,
    BaseClass,
    Interface,
    /// Separators and keywords between the styled parts
    Punctuation,
}

impl LabelRole {
    /// CSS class used by [`Label::to_html`]
    pub fn css_class(&self) -> Option<&'static str> {
        match self {
            LabelRole::Kind | LabelRole::ParamType => Some("type"),
            LabelRole::Name => Some("name"),
            LabelRole::Tag => Some("tag"),
            LabelRole::Id => Some("id"),
            LabelRole::Class => Some("class"),
            LabelRole::Param => Some("param"),
            LabelRole::ReturnType => Some("return"),
            LabelRole::BaseClass => Some("base-class"),
            LabelRole::Interface => Some("interface"),
            LabelRole::Punctuation => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelSpan {
    pub role: LabelRole,
    pub text: String,
}

/// A display line made of role-tagged spans
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Label {
    spans: Vec<LabelSpan>,
}

impl Label {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, role: LabelRole, text: impl Into<String>) -> &mut Self {
        let text = text.into();
        if !text.is_empty() {
            self.spans.push(LabelSpan { role, text });
        }
        self
    }

    pub fn punct(&mut self, text: &str) -> &mut Self {
        self.push(LabelRole::Punctuation, text)
    }

    pub fn spans(&self) -> &[LabelSpan] {
        &self.spans
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    /// Text of the first span with `role`
    pub fn part(&self, role: LabelRole) -> Option<&str> {
        self.spans
            .iter()
            .find(|span| span.role == role)
            .map(|span| span.text.as_str())
    }

    /// Render as `<span class="...">` markup for HTML-based outline panels
    pub fn to_html(&self) -> String {
        let mut html = String::new();
        for span in &self.spans {
            let text = escape_html(&span.text);
            match span.role.css_class() {
                Some(class) => {
                    html.push_str(&format!("<span class=\"{}\">{}</span>", class, text))
                }
                None => html.push_str(&text),
            }
        }
        html
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for span in &self.spans {
            f.write_str(&span.text)?;
        }
        Ok(())
    }
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}
