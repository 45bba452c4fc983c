//! Command-line argument parsing for the outliner
//!
//! Supports:
//! - Outlining one or more HTML/PHP files
//! - Forcing a grammar when the extension is not recognized
//! - Essential view for markup
//! - Plain tree, JSON or YAML output
//! - Watch mode that re-outlines on every saved change

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::config::OutlineConfig;
use crate::grammar::GrammarId;
use crate::outline::{ScanOptions, ViewMode};

/// Print a structural outline of HTML and PHP files
#[derive(Parser, Debug)]
#[command(
    name = "outliner",
    version,
    about = "Print a structural outline of HTML and PHP files"
)]
pub struct CliArgs {
    /// Files to outline
    #[arg(value_name = "PATHS")]
    pub paths: Vec<PathBuf>,

    /// Grammar to use instead of detecting it from the extension
    #[arg(short = 'g', long, value_name = "GRAMMAR", value_parser = parse_grammar)]
    pub grammar: Option<GrammarId>,

    /// Keep only elements with an id or class (markup only)
    #[arg(short = 'e', long)]
    pub essential: bool,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Tree)]
    pub format: OutputFormat,

    /// Print labels as span markup instead of plain text
    #[arg(long)]
    pub html_labels: bool,

    /// Re-print the outline whenever a file changes on disk
    #[arg(short = 'w', long)]
    pub watch: bool,
}

/// How outlines are written to stdout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Indented tree with `line:col` prefixes
    #[default]
    Tree,
    Json,
    Yaml,
}

/// A file paired with the grammar that outlines it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutlineTarget {
    pub path: PathBuf,
    pub grammar: GrammarId,
}

/// Configuration derived from CLI arguments and the persisted config
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub targets: Vec<OutlineTarget>,
    pub options: ScanOptions,
    pub format: OutputFormat,
    pub html_labels: bool,
    pub watch: bool,
}

fn parse_grammar(value: &str) -> Result<GrammarId, String> {
    GrammarId::from_mode_id(value)
        .or_else(|| GrammarId::from_extension(value))
        .ok_or_else(|| format!("unknown grammar '{}' (expected html or php)", value))
}

impl CliArgs {
    /// Resolve targets and merge flags over the persisted config
    pub fn into_config(self, config: &OutlineConfig) -> Result<RunConfig, String> {
        if self.paths.is_empty() {
            return Err("No input files given".to_string());
        }

        let mut targets = Vec::with_capacity(self.paths.len());
        for path in self.paths {
            if path.is_dir() {
                return Err(format!("{} is a directory", path.display()));
            }
            let grammar = match self.grammar.or_else(|| GrammarId::from_path(&path)) {
                Some(grammar) => grammar,
                None => {
                    return Err(format!(
                        "Cannot detect grammar for {}, pass --grammar",
                        path.display()
                    ))
                }
            };
            targets.push(OutlineTarget { path, grammar });
        }

        let mut options = config.scan_options();
        if self.essential {
            options.view_mode = ViewMode::Essential;
        }

        Ok(RunConfig {
            targets,
            options,
            format: self.format,
            html_labels: self.html_labels,
            watch: self.watch,
        })
    }
}
