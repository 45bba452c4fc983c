//! Outliner - structural outlines for HTML and PHP
//!
//! This crate turns a classified token stream into a navigable tree of
//! symbols (HTML tags, PHP classes, interfaces and functions) for editor
//! outline panels.

pub mod bridge;
pub mod cli;
pub mod config;
pub mod config_paths;
pub mod error;
pub mod grammar;
pub mod outline;
pub mod render;
pub mod tokens;
pub mod tracing;
pub mod watch;

// Re-export commonly used types
pub use bridge::{OutlineBridge, OutlinerApi, ViewPreference};
pub use config::OutlineConfig;
pub use error::OutlineError;
pub use grammar::GrammarId;
pub use outline::{build_outline, OutlineNode, ScanOptions, ViewMode};
pub use tokens::{Token, TokenSource, TokenStyle, TreeSitterTokens};
