//! # swalign
//!
//! 任意有限字母表上的 Smith-Waterman 局部比对，使用用户提供的替换矩阵与线性间隙代价。
//!
//! 本 crate 提供：
//!
//! - **打分**：字母表（O(1) 符号查找）与 (p+1)×(p+1) 替换矩阵，最后一列为间隙代价
//! - **填表**：完整 O(n·m) 得分矩阵与来源矩阵，零下限，平局优先级 对角 > 上 > 左
//! - **回溯**：从第一个最大得分单元回溯至边界或第一个零分单元，重建带 `-` 的比对
//! - **批量**：一条数据库序列对多条 query 的并行比对（rayon）
//!
//! ## 快速示例
//!
//! ```rust
//! use swalign::align::{self, Alphabet, Scoring, SubstitutionMatrix};
//!
//! let alphabet = Alphabet::new(b"ACGTU").unwrap();
//! let matrix = SubstitutionMatrix::uniform(alphabet.len(), 2, -1, -1);
//! let scoring = Scoring::new(alphabet, matrix).unwrap();
//!
//! let aln = align::align_pair(&scoring, b"GATTACA", b"GCATGCU").unwrap();
//! assert_eq!(aln.score, 5);
//! assert_eq!(aln.seq1_aligned, "G-AT");
//! assert_eq!(aln.seq2_aligned, "GCAT");
//! assert_eq!(aln.seq1_indices, vec![0, 1, 2]);
//! assert_eq!(aln.seq2_indices, vec![0, 2, 3]);
//! ```
//!
//! ## 模块说明
//!
//! - [`align`] — 打分、填表、回溯与批量比对
//! - [`io`] — 序列记录文件、字母表文件、矩阵文件的读取
//! - [`report`] — 比对文本展示、批量汇总与 JSON 输出
//! - [`error`] — 核心错误类型

pub mod align;
pub mod error;
pub mod io;
pub mod report;

pub use error::AlignError;
