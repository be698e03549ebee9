use criterion::{black_box, criterion_group, criterion_main, Criterion};

use swalign::align::{self, Alphabet, BatchOpt, Scoring, SubstitutionMatrix};
use swalign::io::fasta::FastaRecord;

fn make_sequence(len: usize, seed: u32) -> Vec<u8> {
    let bases = [b'A', b'C', b'G', b'T'];
    let mut seq = Vec::with_capacity(len);
    let mut x: u32 = seed;
    for _ in 0..len {
        x = x.wrapping_mul(1_103_515_245).wrapping_add(12_345);
        seq.push(bases[(x >> 16) as usize % 4]);
    }
    seq
}

fn scoring() -> Scoring {
    let alphabet = Alphabet::new(b"ACGT").unwrap();
    let matrix = SubstitutionMatrix::uniform(alphabet.len(), 2, -1, -1);
    Scoring::new(alphabet, matrix).unwrap()
}

fn bench_align_pair(c: &mut Criterion) {
    let s = scoring();
    for len in [100usize, 500] {
        let seq1 = make_sequence(len, 42);
        let mut seq2 = make_sequence(len, 7);
        // 嵌入一段 seq1 的片段，保证存在有意义的局部比对
        let k = len / 5;
        seq2[len / 2..len / 2 + k].copy_from_slice(&seq1[len / 3..len / 3 + k]);

        c.bench_function(&format!("align_pair_{}x{}", len, len), |b| {
            b.iter(|| {
                black_box(align::align_pair(&s, black_box(&seq1), black_box(&seq2)).unwrap());
            })
        });
    }
}

fn bench_fill_only(c: &mut Criterion) {
    let s = scoring();
    let seq1 = make_sequence(500, 42);
    let seq2 = make_sequence(500, 7);

    c.bench_function("fill_500x500", |b| {
        b.iter(|| {
            black_box(align::fill(&s, black_box(&seq1), black_box(&seq2)).unwrap());
        })
    });
}

fn bench_batch(c: &mut Criterion) {
    let s = scoring();
    let db = make_sequence(2_000, 42);
    let queries: Vec<FastaRecord> = (0..32)
        .map(|i| FastaRecord {
            id: format!("q{}", i),
            desc: None,
            seq: make_sequence(100, 1000 + i),
        })
        .collect();

    for threads in [1usize, 4] {
        c.bench_function(&format!("batch_32x100_vs_2k_t{}", threads), |b| {
            b.iter(|| {
                black_box(align::align_queries(&s, &db, &queries, BatchOpt { threads }).unwrap());
            })
        });
    }
}

criterion_group!(benches, bench_align_pair, bench_fill_only, bench_batch);
criterion_main!(benches);
