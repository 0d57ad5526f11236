//! Topic pipelines and the registry that dispatches to them.

pub mod climate;
pub mod crypto;
pub mod elections;
pub mod keyword;
pub mod rates;
pub mod registry;
pub mod sports;
pub mod text;
