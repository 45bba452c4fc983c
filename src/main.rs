use std::collections::HashMap;
use std::io::Write;

use anyhow::{anyhow, Context, Result};
use clap::Parser;

use outliner::bridge::{OutlineBridge, ViewPreference};
use outliner::cli::{CliArgs, OutlineTarget, RunConfig};
use outliner::config::OutlineConfig;
use outliner::grammar::GrammarId;
use outliner::render::render;
use outliner::watch::FileWatcher;

/// One bridge per grammar, all sharing the process-wide view preference
struct Outliner {
    bridges: HashMap<GrammarId, OutlineBridge>,
    preference: ViewPreference,
    run: RunConfig,
}

impl Outliner {
    fn new(run: RunConfig) -> Self {
        Self {
            bridges: HashMap::new(),
            preference: ViewPreference::new(run.options.view_mode),
            run,
        }
    }

    fn bridge(&mut self, grammar: GrammarId) -> &mut OutlineBridge {
        let preference = &self.preference;
        let tab_size = self.run.options.tab_size;
        self.bridges.entry(grammar).or_insert_with(|| {
            OutlineBridge::new(grammar, preference.clone()).with_tab_size(tab_size)
        })
    }

    fn print(&mut self, target: &OutlineTarget) -> Result<()> {
        let code = std::fs::read_to_string(&target.path)
            .with_context(|| format!("Failed to read {}", target.path.display()))?;

        let format = self.run.format;
        let html_labels = self.run.html_labels;
        let mut output = None;
        self.bridge(target.grammar)
            .update(&code, |root| output = Some(render(root, format, html_labels)))
            .with_context(|| format!("Failed to outline {}", target.path.display()))?;

        let text = output
            .ok_or_else(|| anyhow!("No outline produced for {}", target.path.display()))?
            .map_err(|e| anyhow!(e))?;

        let mut stdout = std::io::stdout().lock();
        if self.run.targets.len() > 1 || self.run.watch {
            writeln!(stdout, "== {} ==", target.path.display())?;
        }
        stdout.write_all(text.as_bytes())?;
        stdout.flush()?;
        Ok(())
    }

    fn print_all(&mut self) -> Result<()> {
        for target in self.run.targets.clone() {
            self.print(&target)?;
        }
        Ok(())
    }

    fn watch(&mut self) -> Result<()> {
        let paths: Vec<_> = self.run.targets.iter().map(|t| t.path.clone()).collect();
        let watcher = FileWatcher::new(&paths).context("Failed to start file watcher")?;

        // Watcher reports canonical paths; map them back to targets
        let targets: Vec<(std::path::PathBuf, OutlineTarget)> = self
            .run
            .targets
            .iter()
            .map(|t| {
                let key = t.path.canonicalize().unwrap_or_else(|_| t.path.clone());
                (key, t.clone())
            })
            .collect();

        while let Some(changed) = watcher.next_changes() {
            for path in changed {
                let Some((_, target)) = targets.iter().find(|(key, _)| *key == path) else {
                    continue;
                };
                if let Err(e) = self.print(target) {
                    tracing::warn!("{:#}", e);
                    eprintln!("{:#}", e);
                }
            }
        }
        Ok(())
    }
}

fn main() -> Result<()> {
    let args = CliArgs::parse();

    outliner::tracing::init();

    let config = OutlineConfig::load();
    let run = args.into_config(&config).map_err(|e| anyhow!(e))?;
    tracing::debug!("Outlining {} files", run.targets.len());

    let watch = run.watch;
    let mut outliner = Outliner::new(run);
    outliner.print_all()?;

    if watch {
        outliner.watch()?;
    }

    Ok(())
}
