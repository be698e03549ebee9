pub mod scoring;
pub mod sw;

use anyhow::{Context, Result};
use rayon::prelude::*;
use serde::Serialize;

pub use scoring::{Alphabet, Scoring, SubstitutionMatrix, GAP};
pub use sw::{fill, traceback, Alignment, Cell, DpMatrix, Fill, Origin};

use crate::error::AlignError;
use crate::io::fasta::FastaRecord;

/// 单对序列的 Smith-Waterman 局部比对：填表 + 回溯。
///
/// seq1 对应得分矩阵的列，seq2 对应行。空序列或无正分区域返回得分 0 的空比对。
pub fn align_pair(scoring: &Scoring, seq1: &[u8], seq2: &[u8]) -> Result<Alignment, AlignError> {
    let f = fill(scoring, seq1, seq2)?;
    traceback(&f, seq1, seq2)
}

/// 批量比对参数
#[derive(Clone, Copy, Debug)]
pub struct BatchOpt {
    /// 0 或 1 表示在当前线程顺序执行
    pub threads: usize,
}

impl Default for BatchOpt {
    fn default() -> Self {
        Self { threads: 1 }
    }
}

/// 一条 query 对数据库序列的比对结果
#[derive(Debug, Clone, Serialize)]
pub struct QueryHit {
    pub query_id: String,
    pub query_len: usize,
    pub database_len: usize,
    pub alignment: Alignment,
}

impl QueryHit {
    /// 该次比对填充的 DP 单元数
    pub fn cells(&self) -> usize {
        self.query_len * self.database_len
    }
}

fn align_one(scoring: &Scoring, database: &[u8], q: &FastaRecord) -> Result<QueryHit> {
    let alignment = align_pair(scoring, database, &q.seq)
        .with_context(|| format!("failed to align query '{}'", q.id))?;
    log::debug!("query {}: len={} score={}", q.id, q.seq.len(), alignment.score);
    Ok(QueryHit {
        query_id: q.id.clone(),
        query_len: q.seq.len(),
        database_len: database.len(),
        alignment,
    })
}

/// 把每条 query（作为 seq2）与数据库序列（seq1）逐一比对，结果保持输入顺序。
///
/// 每对比对各自分配矩阵，互不共享，因此可以直接交给 rayon 并行。
/// 任何一条 query 出错都会使整个批次失败。
pub fn align_queries(
    scoring: &Scoring,
    database: &[u8],
    queries: &[FastaRecord],
    opt: BatchOpt,
) -> Result<Vec<QueryHit>> {
    if opt.threads <= 1 {
        return queries.iter().map(|q| align_one(scoring, database, q)).collect();
    }

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(opt.threads)
        .build()
        .context("cannot build alignment thread pool")?;
    log::info!("aligning {} queries on {} threads", queries.len(), opt.threads);
    pool.install(|| {
        queries
            .par_iter()
            .map(|q| align_one(scoring, database, q))
            .collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nucleotide_scoring() -> Scoring {
        let alphabet = Alphabet::new(b"ACGT").unwrap();
        let matrix = SubstitutionMatrix::uniform(alphabet.len(), 2, -1, -1);
        Scoring::new(alphabet, matrix).unwrap()
    }

    fn record(id: &str, seq: &[u8]) -> FastaRecord {
        FastaRecord { id: id.to_string(), desc: None, seq: seq.to_vec() }
    }

    #[test]
    fn align_pair_basic() {
        let s = nucleotide_scoring();
        let aln = align_pair(&s, b"TTACGTTT", b"GGACGTGG").unwrap();
        assert_eq!(aln.score, 8);
        assert_eq!(aln.seq1_aligned, "ACGT");
        assert_eq!(aln.seq1_indices, vec![2, 3, 4, 5]);
        assert_eq!(aln.seq2_indices, vec![2, 3, 4, 5]);
    }

    #[test]
    fn batch_keeps_order_and_matches_pairwise() {
        let s = nucleotide_scoring();
        let db = b"ACGTACGTTAGCATGCATCG";
        let queries = vec![
            record("q1", b"CATGCA"),
            record("q2", b"TTTT"),
            record("q3", b""),
            record("q4", b"ACGTAC"),
        ];

        let seq = align_queries(&s, db, &queries, BatchOpt::default()).unwrap();
        let par = align_queries(&s, db, &queries, BatchOpt { threads: 3 }).unwrap();
        assert_eq!(seq.len(), 4);
        for (a, b) in seq.iter().zip(par.iter()) {
            assert_eq!(a.query_id, b.query_id);
            assert_eq!(a.alignment, b.alignment);
        }
        assert_eq!(seq[0].query_id, "q1");
        assert_eq!(seq[0].alignment.score, 12);
        assert_eq!(seq[2].alignment.score, 0);
        assert_eq!(seq[3].alignment, align_pair(&s, db, b"ACGTAC").unwrap());
        assert_eq!(seq[0].cells(), 6 * db.len());
    }

    #[test]
    fn batch_error_names_query() {
        let s = nucleotide_scoring();
        let queries = vec![record("good", b"ACGT"), record("bad", b"ACNT")];
        let err = align_queries(&s, b"ACGTACGT", &queries, BatchOpt { threads: 2 }).unwrap_err();
        assert!(format!("{:#}", err).contains("query 'bad'"));
        assert!(err.downcast_ref::<AlignError>().is_some());
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn rescore(s: &Scoring, aln: &Alignment) -> i64 {
            let a = s.alphabet();
            let m = s.matrix();
            aln.seq1_aligned
                .bytes()
                .zip(aln.seq2_aligned.bytes())
                .map(|(x, y)| -> i64 {
                    let v = match (x, y) {
                        (GAP, y) => m.gap(a.index_of(y, 0).unwrap()),
                        (x, GAP) => m.gap(a.index_of(x, 0).unwrap()),
                        (x, y) => m.score(a.index_of(x, 0).unwrap(), a.index_of(y, 0).unwrap()),
                    };
                    i64::from(v)
                })
                .sum()
        }

        proptest! {
            #[test]
            fn score_is_symmetric(
                seq1 in "[ACGT]{0,40}",
                seq2 in "[ACGT]{0,40}"
            ) {
                let s = nucleotide_scoring();
                let ab = align_pair(&s, seq1.as_bytes(), seq2.as_bytes()).unwrap();
                let ba = align_pair(&s, seq2.as_bytes(), seq1.as_bytes()).unwrap();
                prop_assert_eq!(ab.score, ba.score);
            }

            #[test]
            fn alignment_is_deterministic(
                seq1 in "[ACGT]{0,40}",
                seq2 in "[ACGT]{0,40}"
            ) {
                let s = nucleotide_scoring();
                let first = align_pair(&s, seq1.as_bytes(), seq2.as_bytes()).unwrap();
                let second = align_pair(&s, seq1.as_bytes(), seq2.as_bytes()).unwrap();
                prop_assert_eq!(first, second);
            }

            #[test]
            fn reported_alignment_reproduces_score(
                seq1 in "[ACGT]{1,50}",
                seq2 in "[ACGT]{1,50}"
            ) {
                let s = nucleotide_scoring();
                let aln = align_pair(&s, seq1.as_bytes(), seq2.as_bytes()).unwrap();
                prop_assert!(aln.score >= 0);
                prop_assert_eq!(aln.seq1_aligned.len(), aln.seq2_aligned.len());
                prop_assert_eq!(rescore(&s, &aln), aln.score);

                // 去掉间隙后恰好是各自序列的连续片段
                let ungapped1: String = aln.seq1_aligned.chars().filter(|&c| c != '-').collect();
                let ungapped2: String = aln.seq2_aligned.chars().filter(|&c| c != '-').collect();
                prop_assert_eq!(&ungapped1, &seq1[aln.seq1_range.clone()]);
                prop_assert_eq!(&ungapped2, &seq2[aln.seq2_range.clone()]);
            }

            #[test]
            fn indices_sorted_and_in_bounds(
                seq1 in "[ACGT]{0,40}",
                seq2 in "[ACGT]{0,40}"
            ) {
                let s = nucleotide_scoring();
                let aln = align_pair(&s, seq1.as_bytes(), seq2.as_bytes()).unwrap();
                prop_assert_eq!(aln.seq1_indices.len(), aln.seq2_indices.len());
                prop_assert!(aln.seq1_indices.windows(2).all(|w| w[0] < w[1]));
                prop_assert!(aln.seq2_indices.windows(2).all(|w| w[0] < w[1]));
                prop_assert!(aln.seq1_indices.iter().all(|&i| i < seq1.len()));
                prop_assert!(aln.seq2_indices.iter().all(|&i| i < seq2.len()));
            }

            #[test]
            fn nonnegative_scores_dominate_common_substrings(
                seq1 in "[ACGT]{1,30}",
                seq2 in "[ACGT]{1,30}"
            ) {
                // 非负替换分、零间隙代价：得分不小于最长公共子串的匹配和
                let alphabet = Alphabet::new(b"ACGT").unwrap();
                let matrix = SubstitutionMatrix::uniform(4, 1, 0, 0);
                let s = Scoring::new(alphabet, matrix).unwrap();
                let aln = align_pair(&s, seq1.as_bytes(), seq2.as_bytes()).unwrap();

                let (a, b) = (seq1.as_bytes(), seq2.as_bytes());
                let mut longest = 0i64;
                for i in 0..a.len() {
                    for j in 0..b.len() {
                        let run = a[i..].iter().zip(&b[j..]).take_while(|(x, y)| x == y).count();
                        longest = longest.max(run as i64);
                    }
                }
                prop_assert!(aln.score >= longest);
            }
        }
    }
}
