//! Static skincare knowledge base.
//!
//! Routines, product picks and canned answers keyed by lowercased skin type
//! and issue names.

mod base;
mod tables;

pub use base::KnowledgeBase;
pub use tables::KbProduct;
