//! Benchmarks for outline extraction
//!
//! Run with: cargo bench --bench outline

use outliner::grammar::GrammarId;
use outliner::outline::{build_outline, ScanOptions, ViewMode};
use outliner::tokens::{TokenSource, TreeSitterTokens};

#[global_allocator]
static ALLOC: divan::AllocProfiler = divan::AllocProfiler::system();

fn main() {
    divan::main();
}

// ============================================================================
// Sample documents
// ============================================================================

fn generate_html(sections: usize) -> String {
    let mut out = String::from("<html>\n<body>\n");
    for i in 0..sections {
        out.push_str(&format!("  <section id=\"s{}\" class=\"block\">\n", i));
        out.push_str("    <div>\n      <p>text <b>bold</b></p>\n      <img src=\"a.png\">\n");
        out.push_str("      <ul><li>one</li><li class=\"two\">two</li></ul>\n    </div>\n");
        out.push_str("  </section>\n");
    }
    out.push_str("</body>\n</html>\n");
    out
}

fn generate_php(classes: usize) -> String {
    let mut out = String::from("<?php\n");
    for i in 0..classes {
        out.push_str(&format!(
            "class Model{} extends Base implements Countable {{\n",
            i
        ));
        out.push_str("    public function count(): int { return 0; }\n");
        out.push_str("    public function find(int $id, $opts = array()) {\n");
        out.push_str("        if ($id > 0) { foreach ($opts as $o) { echo $o; } }\n");
        out.push_str("    }\n}\n");
    }
    out
}

// ============================================================================
// Tokenize + scan
// ============================================================================

#[divan::bench(args = [10, 100, 1000])]
fn html_full_update(sections: usize) {
    let source = generate_html(sections);
    let mut tokens = TreeSitterTokens::new();
    let stream = tokens.tokenize(&source, GrammarId::Html).unwrap();
    let root = build_outline(GrammarId::Html, &stream, ScanOptions::default());
    divan::black_box(root);
}

#[divan::bench(args = [10, 100, 1000])]
fn php_full_update(classes: usize) {
    let source = generate_php(classes);
    let mut tokens = TreeSitterTokens::new();
    let stream = tokens.tokenize(&source, GrammarId::Php).unwrap();
    let root = build_outline(GrammarId::Php, &stream, ScanOptions::default());
    divan::black_box(root);
}

// ============================================================================
// Engines only (pre-tokenized)
// ============================================================================

#[divan::bench(args = [100, 1000])]
fn html_scan_only(bencher: divan::Bencher, sections: usize) {
    let source = generate_html(sections);
    let stream = TreeSitterTokens::new()
        .tokenize(&source, GrammarId::Html)
        .unwrap();

    bencher.bench_local(|| build_outline(GrammarId::Html, &stream, ScanOptions::default()));
}

#[divan::bench(args = [100, 1000])]
fn html_essential_scan_only(bencher: divan::Bencher, sections: usize) {
    let source = generate_html(sections);
    let stream = TreeSitterTokens::new()
        .tokenize(&source, GrammarId::Html)
        .unwrap();
    let options = ScanOptions {
        view_mode: ViewMode::Essential,
        ..ScanOptions::default()
    };

    bencher.bench_local(|| build_outline(GrammarId::Html, &stream, options));
}

#[divan::bench(args = [100, 1000])]
fn php_scan_only(bencher: divan::Bencher, classes: usize) {
    let source = generate_php(classes);
    let stream = TreeSitterTokens::new()
        .tokenize(&source, GrammarId::Php)
        .unwrap();

    bencher.bench_local(|| build_outline(GrammarId::Php, &stream, ScanOptions::default()));
}
