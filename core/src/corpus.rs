use crate::blocks::Blocks;
use crate::Document;
use anyhow::Result;
use std::io::BufRead;

/// Streaming reader over an OHSUMED flat file. Records that cannot be parsed
/// (missing or non-numeric `.U` identifier) are logged and skipped rather
/// than aborting the whole ingest; `skipped` counts them.
pub struct Documents<R> {
    blocks: Blocks<R>,
    pub skipped: usize,
}

pub fn documents<R: BufRead>(reader: R) -> Documents<R> {
    Documents { blocks: Blocks::new(reader, ".I"), skipped: 0 }
}

impl<R: BufRead> Iterator for Documents<R> {
    type Item = Result<Document>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.blocks.next()? {
                Ok(block) => match parse_block(&block) {
                    Some(doc) => return Some(Ok(doc)),
                    None => self.skipped += 1,
                },
                Err(e) => return Some(Err(e.into())),
            }
        }
    }
}

/// Extracts tagged fields from one corpus block. `.I` carries its value on
/// the tag line; every other tag's value is the following line.
pub fn parse_block(block: &str) -> Option<Document> {
    let lines: Vec<&str> = block.lines().collect();

    let mut seq_id = None;
    let mut medline_ui = None;
    let mut source = None;
    let mut mesh_terms = Vec::new();
    let mut title = None;
    let mut publication_type = None;
    let mut abstract_text = None;
    let mut authors = Vec::new();

    for (i, raw) in lines.iter().enumerate() {
        let line = raw.trim();
        let mut parts = line.splitn(2, char::is_whitespace);
        let tag = parts.next().unwrap_or("");
        let rest = parts.next().unwrap_or("");
        let next = || lines.get(i + 1).map(|l| l.trim());
        match tag {
            ".I" => seq_id = rest.trim().parse().ok(),
            ".U" => medline_ui = next().and_then(|v| v.parse().ok()),
            ".S" => source = next().map(str::to_string),
            ".M" => mesh_terms = next().map(split_list).unwrap_or_default(),
            ".T" => title = next().map(str::to_string),
            ".P" => publication_type = next().map(str::to_string),
            ".W" => abstract_text = next().map(str::to_string),
            ".A" => authors = next().map(split_list).unwrap_or_default(),
            _ => {}
        }
    }

    let Some(medline_ui) = medline_ui else {
        tracing::warn!(
            head = lines.first().copied().unwrap_or(""),
            "corpus record has no usable .U identifier, skipping"
        );
        return None;
    };

    Some(Document {
        seq_id,
        medline_ui,
        source,
        mesh_terms,
        title,
        publication_type,
        abstract_text,
        authors,
    })
}

// "Smith J; Doe A." -> ["Smith J", "Doe A"]
fn split_list(line: &str) -> Vec<String> {
    let line = line.strip_suffix('.').unwrap_or(line);
    line.split("; ").map(str::to_string).collect()
}
