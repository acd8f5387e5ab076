use std::io::{self, Write};

/// One ranked result from the engine, in engine return order.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedHit {
    pub doc_id: String,
    pub score: f64,
}

/// Appends one trec_eval submission line per hit:
/// `query_id \t Q0 \t doc_id \t rank \t score \t method`. Rank is the hit's
/// 0-based position; no local re-ranking happens here.
pub fn write_run<W: Write>(
    w: &mut W,
    query_id: &str,
    hits: &[RankedHit],
    method: &str,
) -> io::Result<()> {
    for (rank, hit) in hits.iter().enumerate() {
        writeln!(
            w,
            "{}\tQ0\t{}\t{}\t{}\t{}",
            query_id, hit.doc_id, rank, hit.score, method
        )?;
    }
    Ok(())
}
