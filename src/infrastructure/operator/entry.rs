//! Concrete operator wired to configuration, SQLite and the shipped pipelines.

/// Operator capability implementation installed by the binary.
#[derive(Debug, Clone, Copy, Default)]
pub struct Operator;

impl Operator {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}
