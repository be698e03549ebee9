//! 字母表与替换矩阵的平面文本格式。
//!
//! 字母表文件：所有行拼接（去掉空白）得到有序符号表，例如每行一个符号。
//! 矩阵文件：每个非空行是一行以空白分隔的整数，共 p+1 行、每行 p+1 列，
//! 最后一列是对应符号的间隙代价。

use anyhow::{anyhow, Context, Result};
use std::io::BufRead;
use std::path::Path;

use crate::align::{Alphabet, Scoring, SubstitutionMatrix};

pub fn parse_alphabet<R: BufRead>(reader: R) -> Result<Alphabet> {
    let mut symbols = Vec::new();
    for line in reader.lines() {
        let line = line?;
        symbols.extend(line.bytes().filter(|b| !b.is_ascii_whitespace()));
    }
    Ok(Alphabet::new(&symbols)?)
}

pub fn parse_matrix_rows<R: BufRead>(reader: R) -> Result<Vec<Vec<i32>>> {
    let mut rows = Vec::new();
    for (lineno, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let row = line
            .split_whitespace()
            .map(|tok| {
                tok.parse::<i32>()
                    .map_err(|e| anyhow!("line {}: invalid integer '{}': {}", lineno + 1, tok, e))
            })
            .collect::<Result<Vec<_>>>()?;
        rows.push(row);
    }
    Ok(rows)
}

pub fn load_alphabet<P: AsRef<Path>>(path: P) -> Result<Alphabet> {
    let path = path.as_ref();
    let fh = std::fs::File::open(path)
        .with_context(|| format!("cannot open alphabet file '{}'", path.display()))?;
    parse_alphabet(std::io::BufReader::new(fh))
        .with_context(|| format!("invalid alphabet file '{}'", path.display()))
}

/// 读取矩阵文件并按字母表大小校验尺寸
pub fn load_matrix<P: AsRef<Path>>(path: P, alphabet: &Alphabet) -> Result<SubstitutionMatrix> {
    let path = path.as_ref();
    let fh = std::fs::File::open(path)
        .with_context(|| format!("cannot open matrix file '{}'", path.display()))?;
    let rows = parse_matrix_rows(std::io::BufReader::new(fh))
        .with_context(|| format!("invalid matrix file '{}'", path.display()))?;
    let matrix = SubstitutionMatrix::new(alphabet.len(), rows)
        .with_context(|| format!("invalid matrix file '{}'", path.display()))?;
    Ok(matrix)
}

pub fn load_scoring<P: AsRef<Path>, Q: AsRef<Path>>(alphabet_path: P, matrix_path: Q) -> Result<Scoring> {
    let alphabet = load_alphabet(alphabet_path)?;
    let matrix = load_matrix(matrix_path, &alphabet)?;
    log::debug!(
        "alphabet: {} symbols, matrix: {}x{}",
        alphabet.len(),
        alphabet.len() + 1,
        alphabet.len() + 1
    );
    Ok(Scoring::new(alphabet, matrix)?)
}
