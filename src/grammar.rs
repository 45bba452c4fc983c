//! Grammar identification and detection
//!
//! Maps file extensions and editor mode ids to the grammars the outliner
//! knows how to tokenize.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Grammars with an outline engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GrammarId {
    /// HTML-family markup, outlined by the nesting engine
    Html,
    /// PHP source, outlined by the declaration scanner
    Php,
}

impl GrammarId {
    /// Detect grammar from file extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "html" | "htm" | "xhtml" | "shtml" => Some(GrammarId::Html),
            "php" | "phtml" | "php3" | "php4" | "php5" | "phps" => Some(GrammarId::Php),
            _ => None,
        }
    }

    /// Detect grammar from file path
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    /// Resolve an editor mode id such as `text/x-brackets-html` or `php`
    pub fn from_mode_id(id: &str) -> Option<Self> {
        match id.to_lowercase().as_str() {
            "html" | "text/html" | "text/x-brackets-html" | "htmlmixed" => Some(GrammarId::Html),
            "php" | "text/x-php" | "application/x-httpd-php" => Some(GrammarId::Php),
            _ => None,
        }
    }

    /// Get display name for the grammar
    pub fn display_name(&self) -> &'static str {
        match self {
            GrammarId::Html => "HTML",
            GrammarId::Php => "PHP",
        }
    }

    /// Whether this grammar's outline offers the "essential" view mode
    pub fn has_essential_mode(&self) -> bool {
        matches!(self, GrammarId::Html)
    }
}

impl fmt::Display for GrammarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}
