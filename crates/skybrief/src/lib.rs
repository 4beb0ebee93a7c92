//! An aviation weather briefing agent.
//!
//! skybrief wraps an OpenAI-compatible chat endpoint with a small catalog of
//! aviation weather tools (METAR, TAF, NOTAMs, report interpretation, web
//! search) and an orchestration loop that lets the model decide which tools
//! to call before it answers a pilot's question in plain English.
//!
//! The pieces are deliberately separable: [`conversation::Conversation`]
//! owns the turn log, [`registry::ToolRegistry`] owns the catalog and
//! dispatch boundary, [`providers`] speak to the model service, [`adapters`]
//! do the weather I/O, and [`agent::Agent`] ties them together one user turn
//! at a time.

pub mod adapters;
pub mod agent;
pub mod briefing;
pub mod config;
pub mod conversation;
pub mod errors;
pub mod models;
pub mod providers;
pub mod registry;
