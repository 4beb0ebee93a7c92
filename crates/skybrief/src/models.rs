//! The core data objects passed between the loop, the registry, and the
//! gateway.
//!
//! The chat endpoint's wire schema, the registry dispatch boundary, and the
//! terminal rendering all overlap without matching exactly, so everything is
//! converted into these internal structs at the edges and the rest of the
//! crate works with them alone.

pub mod message;
pub mod tool;
