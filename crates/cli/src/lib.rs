//! Command-line front end for research-tools.
//!
//! `rt` runs the same cached research operations as the MCP server and
//! prints their results as JSON.

pub mod cli;
pub mod commands;
