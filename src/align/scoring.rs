use crate::error::AlignError;

/// 比对结果中表示间隙的字符，不允许出现在字母表中
pub const GAP: u8 = b'-';

const UNMAPPED: u8 = u8::MAX;

/// 有序、无重复的符号表。
///
/// 内部维护一张 256 项的查找表（符号字节 → 下标），查找为 O(1)，
/// 未知符号显式报错而不是落到默认值。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alphabet {
    symbols: Vec<u8>,
    lookup: [u8; 256],
}

impl Alphabet {
    pub fn new(symbols: &[u8]) -> Result<Self, AlignError> {
        if symbols.is_empty() {
            return Err(AlignError::EmptyAlphabet);
        }
        // 只接受 ASCII 且不允许重复，下标 < 128，不会与 UNMAPPED 冲突
        let mut lookup = [UNMAPPED; 256];
        for (i, &s) in symbols.iter().enumerate() {
            if !s.is_ascii() {
                return Err(AlignError::NonAsciiSymbol(s));
            }
            if s == GAP {
                return Err(AlignError::ReservedSymbol(s));
            }
            if lookup[s as usize] != UNMAPPED {
                return Err(AlignError::DuplicateSymbol(s));
            }
            lookup[s as usize] = i as u8;
        }

        Ok(Self { symbols: symbols.to_vec(), lookup })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn symbols(&self) -> &[u8] {
        &self.symbols
    }

    #[inline]
    pub fn contains(&self, symbol: u8) -> bool {
        self.lookup[symbol as usize] != UNMAPPED
    }

    /// 单个符号的下标；`position` 只用于错误信息
    #[inline]
    pub fn index_of(&self, symbol: u8, position: usize) -> Result<usize, AlignError> {
        match self.lookup[symbol as usize] {
            UNMAPPED => Err(AlignError::UnknownSymbol { symbol, position }),
            i => Ok(i as usize),
        }
    }

    /// 把整条序列编码成下标序列，遇到第一个未知符号即失败
    pub fn encode(&self, seq: &[u8]) -> Result<Vec<usize>, AlignError> {
        seq.iter()
            .enumerate()
            .map(|(pos, &s)| self.index_of(s, pos))
            .collect()
    }
}

/// (p+1)×(p+1) 整数替换矩阵，p 为字母表大小。
///
/// `rows[a][b]` 是符号 a 对齐符号 b 的得分；最后一列 `rows[a][p]` 是符号 a
/// 对齐间隙的线性代价（通常为负）。最后一行只为保持方阵形状，不参与计分。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubstitutionMatrix {
    size: usize,
    /// 行优先展平
    cells: Vec<i32>,
}

impl SubstitutionMatrix {
    pub fn new(alphabet_len: usize, rows: Vec<Vec<i32>>) -> Result<Self, AlignError> {
        let size = alphabet_len + 1;
        if rows.len() != size {
            return Err(AlignError::DimensionMismatch { expected: size, found: rows.len(), row: None });
        }
        let mut cells = Vec::with_capacity(size * size);
        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != size {
                return Err(AlignError::DimensionMismatch { expected: size, found: row.len(), row: Some(i) });
            }
            cells.extend(row);
        }
        Ok(Self { size, cells })
    }

    /// 按 match/mismatch/gap 三个常数生成矩阵
    pub fn uniform(alphabet_len: usize, match_score: i32, mismatch_score: i32, gap: i32) -> Self {
        let size = alphabet_len + 1;
        let mut cells = vec![mismatch_score; size * size];
        for a in 0..size {
            for b in 0..size {
                let idx = a * size + b;
                if a == alphabet_len || b == alphabet_len {
                    cells[idx] = gap;
                } else if a == b {
                    cells[idx] = match_score;
                }
            }
        }
        Self { size, cells }
    }

    /// 字母表大小 p（矩阵边长为 p+1）
    pub fn alphabet_len(&self) -> usize {
        self.size - 1
    }

    #[inline]
    pub fn score(&self, a: usize, b: usize) -> i32 {
        self.cells[a * self.size + b]
    }

    #[inline]
    pub fn gap(&self, a: usize) -> i32 {
        self.cells[a * self.size + self.size - 1]
    }

    pub fn is_symmetric(&self) -> bool {
        (0..self.size).all(|a| (0..a).all(|b| self.score(a, b) == self.score(b, a)))
    }
}

/// 字母表 + 替换矩阵，构造时校验两者尺寸一致
#[derive(Debug, Clone)]
pub struct Scoring {
    alphabet: Alphabet,
    matrix: SubstitutionMatrix,
}

impl Scoring {
    pub fn new(alphabet: Alphabet, matrix: SubstitutionMatrix) -> Result<Self, AlignError> {
        if matrix.alphabet_len() != alphabet.len() {
            return Err(AlignError::DimensionMismatch {
                expected: alphabet.len() + 1,
                found: matrix.alphabet_len() + 1,
                row: None,
            });
        }
        Ok(Self { alphabet, matrix })
    }

    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    pub fn matrix(&self) -> &SubstitutionMatrix {
        &self.matrix
    }
}
