//! Sentinel - natural-language SQL assistant for CRM databases.
//!
//! The core of the crate is the [`safety`] module: a multi-stage validation
//! pipeline that parses, classifies, and risk-scores SQL before it may touch
//! a live database. The LLM and database layers are trait seams with mock
//! implementations.

pub mod app;
pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod llm;
pub mod logging;
pub mod safety;
