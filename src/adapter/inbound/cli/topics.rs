//! Handler for `topics`.

use tabled::{Table, Tabled};

use crate::adapter::inbound::cli::{operator, output};
use crate::error::Result;
use crate::port::inbound::operator::context::OperatorContext;
use crate::port::inbound::operator::topic::TopicRecord;

#[derive(Tabled)]
struct TopicRow {
    #[tabled(rename = "Topic")]
    topic: String,
    #[tabled(rename = "Algorithm")]
    algo_version: String,
    #[tabled(rename = "Implemented")]
    implemented: &'static str,
    #[tabled(rename = "Auto-confirm")]
    auto_confirm: &'static str,
    #[tabled(rename = "Auto-reject")]
    auto_reject: &'static str,
}

const fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}

impl From<TopicRecord> for TopicRow {
    fn from(record: TopicRecord) -> Self {
        Self {
            topic: record.topic,
            algo_version: record.algo_version,
            implemented: yes_no(record.implemented),
            auto_confirm: yes_no(record.auto_confirm),
            auto_reject: yes_no(record.auto_reject),
        }
    }
}

/// Execute `topics`.
pub fn execute(context: &OperatorContext) -> Result<()> {
    let topics = operator::operator().list_topics(context)?;

    if output::is_json() {
        output::json_result("topics", &topics);
        return Ok(());
    }
    if output::is_quiet() {
        return Ok(());
    }

    output::header(env!("CARGO_PKG_VERSION"));
    output::section("Registered topics");
    let rows: Vec<TopicRow> = topics.into_iter().map(TopicRow::from).collect();
    output::lines(&Table::new(rows).to_string());
    output::hint("run one with `marketlink match --from <venue> --to <venue> --topic <topic>`");
    Ok(())
}
