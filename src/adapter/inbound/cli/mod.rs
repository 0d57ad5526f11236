//! CLI module graph.

pub mod command;
pub mod dispatch;
pub mod links;
pub mod markets;
pub mod matching;
pub mod operator;
pub mod output;
pub mod paths;
pub mod topics;
