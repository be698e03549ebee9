use std::ops::Range;

use serde::Serialize;

use super::scoring::{Scoring, GAP};
use crate::error::AlignError;

/// 每个单元格得分的来源方向
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Origin {
    /// 来自 (r-1, c-1)：两条序列各消耗一个符号
    Diagonal,
    /// 来自 (r-1, c)：seq2 的符号对齐 seq1 中的间隙
    Up,
    /// 来自 (r, c-1)：seq1 的符号对齐 seq2 中的间隙；
    /// 零下限胜出时同样记为 Left，回溯靠得分为 0 终止
    #[default]
    Left,
}

/// 行优先的稠密二维网格
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DpMatrix<T> {
    rows: usize,
    cols: usize,
    data: Vec<T>,
}

impl<T: Copy + Default> DpMatrix<T> {
    fn new(rows: usize, cols: usize) -> Self {
        Self { rows, cols, data: vec![T::default(); rows * cols] }
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> T {
        self.data[row * self.cols + col]
    }

    #[inline]
    fn set(&mut self, row: usize, col: usize, v: T) {
        self.data[row * self.cols + col] = v;
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// 第 `row` 行的切片
    pub fn row(&self, row: usize) -> &[T] {
        &self.data[row * self.cols..(row + 1) * self.cols]
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

/// 填表阶段的产物：得分矩阵、来源矩阵与全局最大值。
///
/// 尺寸为 (len(seq2)+1) × (len(seq1)+1)；第 0 行和第 0 列恒为 0。
/// `best` 为 None 表示整个矩阵没有正分单元，不存在局部比对。
#[derive(Debug, Clone)]
pub struct Fill {
    /// 单元格用 i64 累加，矩阵项为 i32，不会溢出
    pub score: DpMatrix<i64>,
    pub origin: DpMatrix<Origin>,
    pub max_score: i64,
    pub best: Option<Cell>,
}

/// 一次局部比对的结果。索引均为 0-based 且升序。
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Alignment {
    pub score: i64,
    /// seq1 中参与对角（符号对符号）配对的位置
    pub seq1_indices: Vec<usize>,
    pub seq2_indices: Vec<usize>,
    pub seq1_aligned: String,
    pub seq2_aligned: String,
    /// 比对覆盖的 seq1 半开区间（含对齐到间隙的符号）
    pub seq1_range: Range<usize>,
    pub seq2_range: Range<usize>,
}

impl Alignment {
    pub fn is_empty(&self) -> bool {
        self.seq1_aligned.is_empty() && self.seq2_aligned.is_empty()
    }

    /// 比对列数
    pub fn len(&self) -> usize {
        self.seq1_aligned.len().max(self.seq2_aligned.len())
    }

    /// 标记行：两行字符相同处为 `|`，否则为空格（仅用于展示）
    pub fn markers(&self) -> String {
        self.seq1_aligned
            .chars()
            .zip(self.seq2_aligned.chars())
            .map(|(a, b)| if a == b { '|' } else { ' ' })
            .collect()
    }

    /// 相同符号的列数
    pub fn identities(&self) -> usize {
        self.markers().chars().filter(|&c| c == '|').count()
    }

    pub fn gaps(&self) -> usize {
        self.seq1_aligned.bytes().chain(self.seq2_aligned.bytes()).filter(|&b| b == GAP).count()
    }
}

/// 平局时的优先级：Diagonal > Up > Left（Left 同时覆盖零下限的情况）
#[inline]
fn pick_origin(val: i64, diag: i64, up: i64) -> Origin {
    if val == diag {
        Origin::Diagonal
    } else if val == up {
        Origin::Up
    } else {
        Origin::Left
    }
}

/// 填充得分矩阵与来源矩阵，并记录第一个出现的最大得分单元（严格 `>` 更新）。
///
/// seq1 对应列，seq2 对应行。任一序列含字母表外的符号时在任何 DP 计算前失败。
pub fn fill(scoring: &Scoring, seq1: &[u8], seq2: &[u8]) -> Result<Fill, AlignError> {
    let alphabet = scoring.alphabet();
    let matrix = scoring.matrix();
    let s1 = alphabet.encode(seq1)?;
    let s2 = alphabet.encode(seq2)?;

    let rows = s2.len() + 1;
    let cols = s1.len() + 1;
    let mut score = DpMatrix::<i64>::new(rows, cols);
    let mut origin = DpMatrix::<Origin>::new(rows, cols);

    let mut max_score = 0i64;
    let mut best: Option<Cell> = None;

    for r in 1..rows {
        let b = s2[r - 1];
        let gap_b = i64::from(matrix.gap(b));
        for c in 1..cols {
            let a = s1[c - 1];

            let diag = score.get(r - 1, c - 1) + i64::from(matrix.score(a, b));
            let up = score.get(r - 1, c) + gap_b;
            let left = score.get(r, c - 1) + i64::from(matrix.gap(a));
            let val = diag.max(up).max(left).max(0);

            score.set(r, c, val);
            origin.set(r, c, pick_origin(val, diag, up));

            if val > max_score {
                max_score = val;
                best = Some(Cell { row: r, col: c });
            }
        }
    }

    Ok(Fill { score, origin, max_score, best })
}

/// 从最大得分单元沿来源矩阵回溯，直到到达边界或第一个得分为 0 的单元。
///
/// `fill` 必须由同一对 `seq1`/`seq2` 生成，长度不符时返回 `SequenceLengthMismatch`。
pub fn traceback(fill: &Fill, seq1: &[u8], seq2: &[u8]) -> Result<Alignment, AlignError> {
    let expected = (fill.score.cols() - 1, fill.score.rows() - 1);
    if (seq1.len(), seq2.len()) != expected {
        return Err(AlignError::SequenceLengthMismatch {
            expected,
            found: (seq1.len(), seq2.len()),
        });
    }
    let Some(best) = fill.best else {
        return Ok(Alignment::default());
    };

    let mut aln1: Vec<u8> = Vec::new();
    let mut aln2: Vec<u8> = Vec::new();
    let mut idx1: Vec<usize> = Vec::new();
    let mut idx2: Vec<usize> = Vec::new();

    let mut r = best.row;
    let mut c = best.col;
    while r > 0 && c > 0 && fill.score.get(r, c) != 0 {
        match fill.origin.get(r, c) {
            Origin::Diagonal => {
                r -= 1;
                c -= 1;
                aln1.push(seq1[c]);
                aln2.push(seq2[r]);
                idx1.push(c);
                idx2.push(r);
            }
            Origin::Up => {
                r -= 1;
                aln1.push(GAP);
                aln2.push(seq2[r]);
            }
            Origin::Left => {
                c -= 1;
                aln1.push(seq1[c]);
                aln2.push(GAP);
            }
        }
    }

    aln1.reverse();
    aln2.reverse();
    idx1.sort_unstable();
    idx2.sort_unstable();

    Ok(Alignment {
        score: fill.max_score,
        seq1_indices: idx1,
        seq2_indices: idx2,
        // 字母表只含 ASCII，逐字节即逐字符
        seq1_aligned: aln1.into_iter().map(char::from).collect(),
        seq2_aligned: aln2.into_iter().map(char::from).collect(),
        seq1_range: c..best.col,
        seq2_range: r..best.row,
    })
}
