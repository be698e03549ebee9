//! 比对结果的文本 / JSON 输出。

use anyhow::Result;
use serde::Serialize;
use std::io::Write;
use std::time::Duration;

use crate::align::{Alignment, QueryHit};

const LABEL_WIDTH: usize = 9;

/// 三行展示：seq1、标记行、seq2
pub fn write_alignment<W: Write>(out: &mut W, aln: &Alignment) -> Result<()> {
    if aln.is_empty() {
        writeln!(out, "{:<w$}(no local alignment)", "", w = LABEL_WIDTH)?;
        return Ok(());
    }
    writeln!(out, "{:<w$}{}", "seq1:", aln.seq1_aligned, w = LABEL_WIDTH)?;
    writeln!(out, "{:<w$}{}", "", aln.markers(), w = LABEL_WIDTH)?;
    writeln!(out, "{:<w$}{}", "seq2:", aln.seq2_aligned, w = LABEL_WIDTH)?;
    Ok(())
}

pub fn write_hit<W: Write>(out: &mut W, hit: &QueryHit) -> Result<()> {
    let aln = &hit.alignment;
    writeln!(out, "# query {} (len {})", hit.query_id, hit.query_len)?;
    writeln!(out, "{:<w$}{}", "score:", aln.score, w = LABEL_WIDTH)?;
    write_alignment(out, aln)?;
    if !aln.is_empty() {
        writeln!(
            out,
            "{:<w$}seq1[{}..{}) seq2[{}..{}) identities={}/{} gaps={}",
            "range:",
            aln.seq1_range.start,
            aln.seq1_range.end,
            aln.seq2_range.start,
            aln.seq2_range.end,
            aln.identities(),
            aln.len(),
            aln.gaps(),
            w = LABEL_WIDTH
        )?;
        writeln!(out, "{:<w$}{:?} {:?}", "indices:", aln.seq1_indices, aln.seq2_indices, w = LABEL_WIDTH)?;
    }
    writeln!(out)?;
    Ok(())
}

/// 一批比对的汇总统计
#[derive(Debug, Clone, Serialize)]
pub struct BatchSummary {
    pub started_at: String,
    pub database_id: String,
    pub database_len: usize,
    pub queries: usize,
    /// 得分 > 0 的 query 数
    pub aligned: usize,
    pub best_score: i64,
    pub best_query: Option<String>,
    pub mean_score: f64,
    pub total_cells: u64,
    pub elapsed_ms: u64,
}

impl BatchSummary {
    pub fn from_hits(
        started_at: chrono::DateTime<chrono::Utc>,
        database_id: &str,
        database_len: usize,
        hits: &[QueryHit],
        elapsed: Duration,
    ) -> Self {
        let mut best_score = 0;
        let mut best_query = None;
        let mut total = 0i64;
        for h in hits {
            total += h.alignment.score;
            if h.alignment.score > best_score {
                best_score = h.alignment.score;
                best_query = Some(h.query_id.clone());
            }
        }
        let mean_score = if hits.is_empty() { 0.0 } else { total as f64 / hits.len() as f64 };

        Self {
            started_at: started_at.to_rfc3339(),
            database_id: database_id.to_string(),
            database_len,
            queries: hits.len(),
            aligned: hits.iter().filter(|h| h.alignment.score > 0).count(),
            best_score,
            best_query,
            mean_score,
            total_cells: hits.iter().map(|h| h.cells() as u64).sum(),
            elapsed_ms: elapsed.as_millis() as u64,
        }
    }

    pub fn write_table<W: Write>(&self, out: &mut W) -> Result<()> {
        writeln!(out, "== summary ==")?;
        writeln!(out, "{:<14}{}", "started:", self.started_at)?;
        writeln!(out, "{:<14}{} ({} symbols)", "database:", self.database_id, self.database_len)?;
        writeln!(out, "{:<14}{}", "queries:", self.queries)?;
        writeln!(out, "{:<14}{}", "aligned:", self.aligned)?;
        match &self.best_query {
            Some(q) => writeln!(out, "{:<14}{} ({})", "best score:", self.best_score, q)?,
            None => writeln!(out, "{:<14}0", "best score:")?,
        }
        writeln!(out, "{:<14}{:.2}", "mean score:", self.mean_score)?;
        writeln!(out, "{:<14}{}", "dp cells:", self.total_cells)?;
        writeln!(out, "{:<14}{} ms", "elapsed:", self.elapsed_ms)?;
        Ok(())
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    summary: &'a BatchSummary,
    hits: &'a [QueryHit],
}

pub fn write_json<W: Write>(out: &mut W, summary: &BatchSummary, hits: &[QueryHit]) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, &JsonReport { summary, hits })?;
    writeln!(out)?;
    Ok(())
}
