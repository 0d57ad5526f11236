//! Per-invocation environment for operator calls.

/// Environment shared by every operator call: raw configuration text and
/// overrides from global flags.
#[derive(Debug, Clone, Default)]
pub struct OperatorContext {
    /// Raw TOML configuration content; defaults apply when absent.
    pub config_toml: Option<String>,
    /// Database path overriding configuration and environment.
    pub database: Option<String>,
    /// Log level overriding configuration.
    pub log_level: Option<String>,
}
