use anyhow::Result;
use std::io::BufRead;

/// Relevance judgments for one query: two parallel lists in file order.
/// Ratings are kept as the raw strings from the qrels file.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Judgments {
    pub ratings: Vec<String>,
    pub doc_ids: Vec<String>,
}

impl Judgments {
    pub fn len(&self) -> usize {
        self.ratings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ratings.is_empty()
    }

    pub fn truncate(&mut self, n: usize) {
        self.ratings.truncate(n);
        self.doc_ids.truncate(n);
    }
}

/// Filters the qrels file down to rows whose first column equals `num`.
/// Columns: query id, iteration, document id, rating. Short rows are ignored.
pub fn judgments_for<R: BufRead>(reader: R, num: &str) -> Result<Judgments> {
    let mut out = Judgments::default();
    for line in reader.lines() {
        let line = line?;
        let cols: Vec<&str> = line.split_whitespace().collect();
        if cols.len() < 4 || cols[0] != num {
            continue;
        }
        out.doc_ids.push(cols[2].to_string());
        out.ratings.push(cols[3].to_string());
    }
    Ok(out)
}
