//! Errors surfaced by an outline update
//!
//! Malformed source is never an error: unmatched closers and truncated
//! declarations are tolerated by the engines. Only a tokenizer that cannot
//! produce a token sequence fails the update.

use thiserror::Error;

use crate::grammar::GrammarId;

#[derive(Debug, Error)]
pub enum OutlineError {
    /// The requested grammar id is not known to the token source
    #[error("unsupported grammar: {0}")]
    UnsupportedGrammar(String),

    /// The tokenizer could not load a grammar
    #[error("failed to load {grammar} grammar: {message}")]
    GrammarLoad { grammar: GrammarId, message: String },

    /// The tokenizer returned no parse for the document
    #[error("{0} tokenizer produced no parse tree")]
    ParseFailed(GrammarId),
}
