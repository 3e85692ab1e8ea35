//! nomikai library
//!
//! A web-search-augmented planning agent: five event criteria go in, a
//! grounded venue recommendation comes out. Exports the tool system and
//! planning core for testing and reuse.

pub mod agent;
pub mod cli;
pub mod config;
pub mod llm;
pub mod logging;
pub mod planner;
pub mod search;
pub mod tool;
