//! # Laudos CLI
//!
//! Terminal front end for the laudos report service: credential setup, one-shot searches, PDF
//! export and an interactive search loop. The root `laudos-run` binary reuses the interactive
//! form next to the web front end.

pub mod actions;
pub mod form;
pub mod render;
