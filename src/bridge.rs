//! Outline host bridge
//!
//! Glue between a host editor's outline panel and the engines. The host
//! registers buttons through [`OutlinerApi`], forwards clicks back as
//! [`OutlineMsg`]s, and calls [`OutlineBridge::update`] with the full text
//! on every relevant edit. Updates run synchronously to completion.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::OutlineError;
use crate::grammar::GrammarId;
use crate::outline::{build_outline, OutlineNode, ScanOptions, ViewMode};
use crate::tokens::{TokenSource, TreeSitterTokens};

/// Button id for the tree/essential toggle
pub const SWITCH_MODE_BUTTON: &str = "switchMode";

/// Messages the host sends back to the bridge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutlineMsg {
    /// Flip between tree and essential view
    ToggleViewMode,
    /// Redraw without changing anything
    ForceRedraw,
}

/// Side effects requested from the host after handling a message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutlineCmd {
    /// Rebuild and redraw the outline panel
    Redraw,
}

/// Services the host outline panel offers to a bridge
pub trait OutlinerApi {
    /// Add a panel button; clicking it must deliver `on_click` to the bridge
    fn register_button(&mut self, id: &str, on_click: OutlineMsg);

    /// Ask the panel to request a fresh outline and redraw it
    fn force_draw(&mut self);
}

/// Process-wide view mode preference
///
/// Cloning shares the same preference. It is set by the toggle button and
/// read once at the start of every scan, so a change applies to the next
/// update of any document.
#[derive(Debug, Clone, Default)]
pub struct ViewPreference {
    essential: Arc<AtomicBool>,
}

impl ViewPreference {
    pub fn new(mode: ViewMode) -> Self {
        let preference = Self::default();
        preference.set(mode);
        preference
    }

    pub fn get(&self) -> ViewMode {
        if self.essential.load(Ordering::Relaxed) {
            ViewMode::Essential
        } else {
            ViewMode::Tree
        }
    }

    pub fn set(&self, mode: ViewMode) {
        self.essential.store(mode == ViewMode::Essential, Ordering::Relaxed);
    }

    /// Flip the mode and return the new one
    pub fn toggle(&self) -> ViewMode {
        let was_essential = self.essential.fetch_xor(true, Ordering::Relaxed);
        if was_essential {
            ViewMode::Tree
        } else {
            ViewMode::Essential
        }
    }
}

/// Outline provider for one grammar
pub struct OutlineBridge<S: TokenSource = TreeSitterTokens> {
    grammar: GrammarId,
    source: S,
    preference: ViewPreference,
    tab_size: usize,
    /// Last delivered tree, kept for debugging only
    last: Option<OutlineNode>,
}

impl OutlineBridge<TreeSitterTokens> {
    pub fn new(grammar: GrammarId, preference: ViewPreference) -> Self {
        Self::with_source(grammar, TreeSitterTokens::new(), preference)
    }

    /// Bridge for a host editor mode id such as `text/x-brackets-html`
    pub fn for_mode(mode_id: &str, preference: ViewPreference) -> Result<Self, OutlineError> {
        let grammar = GrammarId::from_mode_id(mode_id)
            .ok_or_else(|| OutlineError::UnsupportedGrammar(mode_id.to_string()))?;
        Ok(Self::new(grammar, preference))
    }
}

impl<S: TokenSource> OutlineBridge<S> {
    pub fn with_source(grammar: GrammarId, source: S, preference: ViewPreference) -> Self {
        Self {
            grammar,
            source,
            preference,
            tab_size: ScanOptions::default().tab_size,
            last: None,
        }
    }

    pub fn with_tab_size(mut self, tab_size: usize) -> Self {
        self.tab_size = tab_size;
        self
    }

    pub fn grammar(&self) -> GrammarId {
        self.grammar
    }

    pub fn view_mode(&self) -> ViewMode {
        self.preference.get()
    }

    /// Register panel buttons for this grammar
    pub fn init(&mut self, api: &mut dyn OutlinerApi) {
        if self.grammar.has_essential_mode() {
            api.register_button(SWITCH_MODE_BUTTON, OutlineMsg::ToggleViewMode);
        }
        tracing::debug!("Outline bridge ready for {}", self.grammar);
    }

    /// Handle a message from the host
    pub fn handle(&mut self, msg: OutlineMsg) -> Option<OutlineCmd> {
        match msg {
            OutlineMsg::ToggleViewMode => {
                let mode = self.preference.toggle();
                tracing::info!("Outline view mode switched to {:?}", mode);
                Some(OutlineCmd::Redraw)
            }
            OutlineMsg::ForceRedraw => Some(OutlineCmd::Redraw),
        }
    }

    /// Handle a message and carry out the resulting command on `api`
    pub fn dispatch(&mut self, msg: OutlineMsg, api: &mut dyn OutlinerApi) {
        if let Some(OutlineCmd::Redraw) = self.handle(msg) {
            api.force_draw();
        }
    }

    /// Rescan `code` from scratch and pass the root to `callback`
    ///
    /// The callback is not invoked when tokenization fails.
    pub fn update<F>(&mut self, code: &str, callback: F) -> Result<(), OutlineError>
    where
        F: FnOnce(&OutlineNode),
    {
        let options = ScanOptions {
            view_mode: self.preference.get(),
            tab_size: self.tab_size,
        };
        let tokens = self.source.tokenize(code, self.grammar)?;
        let root = build_outline(self.grammar, &tokens, options);

        callback(&root);
        tracing::trace!("Outline tree: {:?}", root);
        self.last = Some(root);
        Ok(())
    }

    /// Tree delivered by the most recent successful update
    pub fn last_tree(&self) -> Option<&OutlineNode> {
        self.last.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preference_toggle_and_share() {
        let preference = ViewPreference::new(ViewMode::Tree);
        let shared = preference.clone();
        assert_eq!(preference.toggle(), ViewMode::Essential);
        assert_eq!(shared.get(), ViewMode::Essential);
        assert_eq!(shared.toggle(), ViewMode::Tree);
        assert_eq!(preference.get(), ViewMode::Tree);
    }

    #[test]
    fn test_preference_set() {
        let preference = ViewPreference::default();
        assert_eq!(preference.get(), ViewMode::Tree);
        preference.set(ViewMode::Essential);
        assert_eq!(preference.get(), ViewMode::Essential);
    }

    #[test]
    fn test_handle_toggle_requests_redraw() {
        let preference = ViewPreference::default();
        let mut bridge = OutlineBridge::new(GrammarId::Html, preference.clone());
        assert_eq!(
            bridge.handle(OutlineMsg::ToggleViewMode),
            Some(OutlineCmd::Redraw)
        );
        assert_eq!(bridge.view_mode(), ViewMode::Essential);
        assert_eq!(preference.get(), ViewMode::Essential);
    }

    #[test]
    fn test_for_mode() {
        let bridge = OutlineBridge::for_mode("text/x-brackets-html", ViewPreference::default());
        assert_eq!(bridge.map(|b| b.grammar()).ok(), Some(GrammarId::Html));

        let err = OutlineBridge::for_mode("text/css", ViewPreference::default())
            .err()
            .unwrap();
        assert!(matches!(err, OutlineError::UnsupportedGrammar(ref id) if id == "text/css"));
    }
}
