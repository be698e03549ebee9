//! 比对核心的错误类型。
//!
//! 空序列、无正分区域都不是错误，它们以得分 0 的正常结果返回。

use thiserror::Error;

/// 核心比对过程中可能出现的错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AlignError {
    /// 序列中出现了字母表之外的符号
    #[error("unknown symbol '{}' (0x{:02x}) at position {position}", sym(symbol), symbol)]
    UnknownSymbol { symbol: u8, position: usize },

    /// 替换矩阵尺寸与字母表不符（应为 (p+1)×(p+1)）
    #[error("substitution matrix dimension mismatch at {}: expected {expected}, found {found}", describe_row(*row))]
    DimensionMismatch {
        expected: usize,
        found: usize,
        /// None 表示行数不符，Some(i) 表示第 i 行列数不符
        row: Option<usize>,
    },

    #[error("alphabet is empty")]
    EmptyAlphabet,

    #[error("duplicate symbol '{}' in alphabet", sym(.0))]
    DuplicateSymbol(u8),

    /// `-` 保留给比对结果中的间隙
    #[error("symbol '{}' is reserved for gaps and cannot be part of the alphabet", sym(.0))]
    ReservedSymbol(u8),

    /// 符号按单字节处理，多字节 UTF-8 会被拆开，因此只接受 ASCII
    #[error("alphabet symbol 0x{0:02x} is not ASCII")]
    NonAsciiSymbol(u8),

    /// 回溯用的序列与填表时的长度 (seq1, seq2) 不一致
    #[error("sequence lengths {found:?} do not match the filled matrix {expected:?}")]
    SequenceLengthMismatch {
        expected: (usize, usize),
        found: (usize, usize),
    },
}

fn sym(b: &u8) -> char {
    char::from(*b)
}

fn describe_row(row: Option<usize>) -> String {
    match row {
        Some(r) => format!("row {}", r),
        None => "row count".to_string(),
    }
}
