use crate::blocks::Blocks;
use crate::Topic;
use anyhow::Result;
use std::io::BufRead;

/// Parses the OHSU topic file into `Topic` records, preserving file order.
/// Blocks missing any of `<num>`, `<title>` or `<desc>` are logged and
/// skipped.
pub fn parse_topics<R: BufRead>(reader: R) -> Result<Vec<Topic>> {
    let mut topics = Vec::new();
    for block in Blocks::new(reader, "<top>") {
        let block = block?;
        match parse_block(&block) {
            Some(topic) => topics.push(topic),
            None => tracing::warn!(
                head = block.lines().next().unwrap_or(""),
                "topic block missing <num>, <title> or <desc>, skipping"
            ),
        }
    }
    Ok(topics)
}

pub fn parse_block(block: &str) -> Option<Topic> {
    let lines: Vec<&str> = block.lines().collect();

    let mut num = None;
    let mut title = None;
    let mut desc = None;

    for (i, line) in lines.iter().enumerate() {
        if let Some(rest) = line.strip_prefix("<num>") {
            num = rest.split_once(':').map(|(_, n)| n.trim().to_string());
        } else if let Some(rest) = line.strip_prefix("<title>") {
            title = Some(rest.trim_start().to_string());
        } else if line.starts_with("<desc>") {
            // the description is the whole following line, verbatim
            desc = lines.get(i + 1).map(|l| l.to_string());
        }
    }

    Some(Topic { num: num?, title: title?, desc: desc? })
}
