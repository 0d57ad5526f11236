//! Inbound ports (driving side).

pub mod operator;
pub mod pipeline;
