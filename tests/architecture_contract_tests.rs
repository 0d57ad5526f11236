//! Architecture contract tests.

mod support;

use support::architecture::{
    find_lines_containing, find_non_export_lines_in_mod_files, path_exists, read_relative,
};

#[test]
fn cli_has_no_direct_infrastructure_imports() {
    let hits = find_lines_containing(
        "src/adapter/inbound/cli",
        &["use crate::infrastructure", "crate::infrastructure::"],
    );

    assert!(
        hits.is_empty(),
        "found direct infrastructure imports in inbound CLI adapters: {hits:#?}"
    );
}

#[test]
fn domain_has_no_framework_or_outer_layer_imports() {
    let hits = find_lines_containing(
        "src/domain",
        &[
            "crate::adapter",
            "crate::infrastructure",
            "crate::application",
            "crate::port",
            "tokio::",
            "diesel::",
            "tracing::",
        ],
    );

    assert!(
        hits.is_empty(),
        "found forbidden imports in domain layer: {hits:#?}"
    );
}

#[test]
fn ports_depend_only_on_domain() {
    let hits = find_lines_containing(
        "src/port",
        &["crate::adapter", "crate::infrastructure", "crate::application", "diesel::"],
    );

    assert!(hits.is_empty(), "ports should depend only on domain: {hits:#?}");
}

#[test]
fn mod_rs_is_export_only() {
    let violations = find_non_export_lines_in_mod_files("src");
    assert!(
        violations.is_empty(),
        "found non-export content in mod.rs files: {violations:#?}"
    );
}

#[test]
fn cli_operator_bridge_uses_operator_name() {
    let source = read_relative("src/adapter/inbound/cli/operator.rs");
    assert!(
        source.contains("pub fn operator() -> &'static dyn OperatorPort"),
        "operator bridge should expose `operator()` capability accessor"
    );
}

#[test]
fn operator_ports_are_transport_agnostic() {
    let hits = find_lines_containing("src/port/inbound/operator", &["std::path::Path", "PathBuf"]);
    assert!(
        hits.is_empty(),
        "operator inbound ports should not expose filesystem path types: {hits:#?}"
    );
}

#[test]
fn application_layer_has_no_direct_adapter_imports() {
    let hits = find_lines_containing("src/application", &["crate::adapter::", "crate::infrastructure::"]);
    assert!(
        hits.is_empty(),
        "application layer should not import adapters directly: {hits:#?}"
    );
}

#[test]
fn pipelines_never_touch_stores() {
    let hits = find_lines_containing("src/application/pipeline", &["port::outbound"]);
    assert!(
        hits.is_empty(),
        "topic pipelines must stay pure and never reach a store: {hits:#?}"
    );
}

#[test]
fn sql_stays_in_the_sqlite_adapter() {
    let hits = find_lines_containing("src", &["diesel::"])
        .into_iter()
        .filter(|(path, _, _)| {
            !path.starts_with("src/adapter/outbound/sqlite/") && path != "src/error.rs"
        })
        .collect::<Vec<_>>();
    assert!(hits.is_empty(), "diesel usage outside the sqlite adapter: {hits:#?}");
}

#[test]
fn migrations_and_schema_live_together() {
    assert!(path_exists("src/adapter/outbound/sqlite/database/schema.rs"));
    assert!(path_exists("migrations/2025-01-01-000000_create_market_links/up.sql"));
    assert!(path_exists("migrations/2025-01-01-000100_create_markets/up.sql"));
}
