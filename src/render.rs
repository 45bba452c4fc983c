//! Text rendering of outline trees for the CLI

use std::fmt::Write;

use crate::cli::OutputFormat;
use crate::outline::OutlineNode;

/// Render `root` in the requested format
pub fn render(
    root: &OutlineNode,
    format: OutputFormat,
    html_labels: bool,
) -> Result<String, String> {
    match format {
        OutputFormat::Tree => Ok(render_tree(root, html_labels)),
        OutputFormat::Json => serde_json::to_string_pretty(root)
            .map(|mut out| {
                out.push('\n');
                out
            })
            .map_err(|e| format!("Failed to serialize outline as JSON: {}", e)),
        OutputFormat::Yaml => serde_yaml::to_string(root)
            .map_err(|e| format!("Failed to serialize outline as YAML: {}", e)),
    }
}

/// Indented outline, one symbol per line as `line:col text`
///
/// Nodes whose label never completed fall back to their name.
pub fn render_tree(root: &OutlineNode, html_labels: bool) -> String {
    let mut out = String::new();
    for child in &root.children {
        write_node(&mut out, child, 0, html_labels);
    }
    out
}

fn write_node(out: &mut String, node: &OutlineNode, depth: usize, html_labels: bool) {
    let text = if node.label.is_empty() {
        node.name.clone()
    } else if html_labels {
        node.label.to_html()
    } else {
        node.label.to_string()
    };
    let (line, column) = node.jump_target();
    let _ = writeln!(out, "{}{}:{} {}", "  ".repeat(depth), line, column, text);

    for child in &node.children {
        write_node(out, child, depth + 1, html_labels);
    }
}
