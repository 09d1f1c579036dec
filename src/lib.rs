//! newsrag library
//!
//! Retrieval-augmented news answering: search, filter, build a prompt,
//! complete it with an LLM. Exposed as a library so any front end can
//! drive [`pipeline::Pipeline`].

pub mod cli;
pub mod config;
pub mod filter;
pub mod llm;
pub mod logging;
pub mod pipeline;
pub mod prompt;
pub mod search;

pub use pipeline::{Answer, Pipeline, PipelineError, PipelineOptions};
