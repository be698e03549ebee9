pub mod fasta;
pub mod scoring;
