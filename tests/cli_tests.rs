//! CLI integration tests.

use std::path::{Path, PathBuf};

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use tempfile::TempDir;

/// A scratch home directory and database for one test.
struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("create temp dir"),
        }
    }

    fn db(&self) -> PathBuf {
        self.dir.path().join("links.db")
    }

    fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        std::fs::write(&path, contents).expect("write fixture");
        path
    }

    fn cmd(&self) -> Command {
        let mut cmd = cargo_bin_cmd!("marketlink");
        cmd.env("HOME", self.dir.path())
            .env_remove("MARKETLINK_DATABASE")
            .env_remove("RUST_LOG")
            .arg("--db")
            .arg(self.db());
        cmd
    }

    fn json(&self, args: &[&str]) -> Value {
        let output = self.cmd().arg("--json").args(args).output().expect("run marketlink");
        assert!(
            output.status.success(),
            "marketlink {args:?} failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        let stdout = String::from_utf8(output.stdout).expect("utf-8 stdout");
        let line = stdout.lines().last().expect("one JSON line");
        serde_json::from_str(line).expect("valid JSON")
    }

    fn import(&self, venue: &str, file: &Path) {
        self.cmd()
            .args(["markets", "import", "--venue", venue])
            .arg(file)
            .assert()
            .success()
            .stdout(predicate::str::contains("Imported"));
    }

    fn import_rates_markets(&self) {
        let kalshi = self.write(
            "kalshi.json",
            r#"[{"market_id": "KXFED-25MAR", "title": "Fed raises rates by 25bps in March"}]"#,
        );
        let polymarket = self.write(
            "polymarket.json",
            r#"[
                {"market_id": "0xfomc", "title": "FOMC March hike ≥0.25%"},
                {"market_id": "0xsettled", "title": "Fed cut in March?", "status": "settled"}
            ]"#,
        );
        self.import("kalshi", &kalshi);
        self.import("polymarket", &polymarket);
    }
}

fn marketlink() -> Command {
    cargo_bin_cmd!("marketlink")
}

#[test]
fn help_lists_commands() {
    marketlink()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("marketlink"))
        .stdout(predicate::str::contains("match-all"))
        .stdout(predicate::str::contains("topics"))
        .stdout(predicate::str::contains("links"))
        .stdout(predicate::str::contains("markets"));
}

#[test]
fn version_names_the_binary() {
    marketlink()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("marketlink"));
}

#[test]
fn topics_lists_every_topic() {
    let ws = Workspace::new();
    let value = ws.json(&["topics"]);

    assert_eq!(value["command"], "topics");
    let topics = value["result"].as_array().expect("topic list");
    assert_eq!(topics.len(), 12);
    let rates = topics
        .iter()
        .find(|t| t["topic"] == "RATES")
        .expect("RATES listed");
    assert_eq!(rates["implemented"], true);
    assert_eq!(rates["algo_version"], "rates-v1");
    let macro_topic = topics.iter().find(|t| t["topic"] == "MACRO").expect("MACRO listed");
    assert_eq!(macro_topic["implemented"], false);
}

#[test]
fn topics_table_in_human_mode() {
    let ws = Workspace::new();
    ws.cmd()
        .arg("topics")
        .assert()
        .success()
        .stdout(predicate::str::contains("CRYPTO_DAILY"))
        .stdout(predicate::str::contains("Implemented"));
}

#[test]
fn import_match_and_inspect_links() {
    let ws = Workspace::new();
    ws.import_rates_markets();

    let run = ws.json(&["match", "--from", "kalshi", "--to", "polymarket", "--topic", "rates"]);
    assert_eq!(run["command"], "match");
    assert_eq!(run["result"]["topic"], "RATES");
    assert_eq!(run["result"]["right_count"], 1);
    assert_eq!(run["result"]["pairs_linked"], 1);
    assert_eq!(run["result"]["suggestions_created"], 1);
    assert_eq!(run["result"]["errors"].as_array().map(Vec::len), Some(0));

    let stats = ws.json(&["links", "stats"]);
    assert_eq!(stats["result"]["total"], 1);
    assert_eq!(stats["result"]["by_status"]["suggested"], 1);
    assert_eq!(stats["result"]["by_topic"]["RATES"], 1);

    let reviewed = ws.json(&[
        "links",
        "review",
        "--left-venue",
        "kalshi",
        "--left-id",
        "KXFED-25MAR",
        "--right-venue",
        "polymarket",
        "--right-id",
        "0xfomc",
        "--status",
        "confirmed",
    ]);
    assert_eq!(reviewed["result"]["status"], "confirmed");
    assert_eq!(reviewed["result"]["reason"], "manual-review");

    let rollback = ws.json(&["links", "rollback", "--tag", "manual-review", "--dry-run"]);
    assert_eq!(rollback["result"]["matched"], 1);
    assert_eq!(rollback["result"]["updated"], 0);

    let stats = ws.json(&["links", "stats"]);
    assert_eq!(stats["result"]["by_status"]["confirmed"], 1);
}

#[test]
fn dry_run_match_writes_nothing() {
    let ws = Workspace::new();
    ws.import_rates_markets();

    let run = ws.json(&[
        "match",
        "--from",
        "kalshi",
        "--to",
        "polymarket",
        "--topic",
        "RATES",
        "--dry-run",
    ]);
    assert_eq!(run["result"]["mode"], "dry-run");
    assert_eq!(run["result"]["pairs_linked"], 1);

    let stats = ws.json(&["links", "stats"]);
    assert_eq!(stats["result"]["total"], 0);
}

#[test]
fn match_all_runs_every_topic() {
    let ws = Workspace::new();
    ws.import_rates_markets();

    let batch = ws.json(&["match-all", "--from", "kalshi", "--to", "polymarket"]);
    assert_eq!(batch["command"], "match-all");
    assert_eq!(batch["result"]["results"].as_array().map(Vec::len), Some(12));
    assert_eq!(batch["result"]["totals"]["topics"], 12);
    assert!(batch["result"]["totals"]["pairs_linked"].as_u64().unwrap_or(0) >= 1);
    let last = &batch["result"]["results"][11];
    assert_eq!(last["topic"], "UNIVERSAL");

    let stats = ws.json(&["links", "stats"]);
    assert_eq!(stats["result"]["total"], 1);
    assert_eq!(stats["result"]["by_topic"]["RATES"], 1);
    assert_eq!(stats["result"]["by_algo_version"]["rates-v1"], 1);
}

#[test]
fn unknown_topic_is_reported_in_the_result() {
    let ws = Workspace::new();
    let run = ws.json(&["match", "--from", "kalshi", "--to", "polymarket", "--topic", "astrology"]);

    assert_eq!(run["result"]["errors"][0], "unknown topic 'astrology'");
}

#[test]
fn reviewing_a_missing_link_fails() {
    let ws = Workspace::new();
    ws.cmd()
        .args([
            "links",
            "review",
            "--left-venue",
            "kalshi",
            "--left-id",
            "NOPE",
            "--right-venue",
            "polymarket",
            "--right-id",
            "NOPE",
            "--status",
            "rejected",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("link not found"));
}

#[test]
fn invalid_config_exits_nonzero() {
    let ws = Workspace::new();
    let config = ws.write("bad.toml", "[matching]\nmin_score = 1.5\n");

    ws.cmd()
        .arg("--config")
        .arg(config)
        .arg("topics")
        .assert()
        .failure()
        .stderr(predicate::str::contains("min_score"));
}

#[test]
fn malformed_import_exits_nonzero() {
    let ws = Workspace::new();
    let file = ws.write("broken.json", "{not json");

    ws.cmd()
        .args(["markets", "import", "--venue", "kalshi"])
        .arg(file)
        .assert()
        .failure()
        .stderr(predicate::str::contains("JSON"));
}

#[test]
fn quiet_mode_prints_nothing_on_success() {
    let ws = Workspace::new();
    ws.cmd()
        .args(["--quiet", "links", "stats"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}
