//! Infrastructure configuration modules.

pub mod dedup;
pub mod logging;
pub mod matching;
pub mod settings;
pub mod venue;
