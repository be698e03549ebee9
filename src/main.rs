use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;

use swalign::align::{self, BatchOpt, QueryHit};
use swalign::io::{fasta, scoring};
use swalign::report;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

#[derive(Parser, Debug)]
#[command(name = "swalign", author, version, about = "Smith-Waterman local alignment with a custom substitution matrix", arg_required_else_help = true)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Align query records against the first record of a database file
    Align {
        /// Alphabet file (symbols, one or more per line)
        #[arg(short = 'a', long)]
        alphabet: PathBuf,
        /// Substitution matrix file ((p+1) x (p+1) integers, last column = gap cost)
        #[arg(short = 'm', long)]
        matrix: PathBuf,
        /// Database records ('>' headers); the first record is used
        #[arg(short = 'd', long)]
        database: PathBuf,
        /// Query records ('>' headers)
        #[arg(short = 'q', long)]
        query: PathBuf,
        /// Output path (stdout if omitted)
        #[arg(short, long)]
        out: Option<PathBuf>,
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
        /// Only align the first query record
        #[arg(long)]
        first_only: bool,
        #[arg(short = 't', long = "threads", default_value_t = 1)]
        threads: usize,
    },
    /// Align two sequences given on the command line
    Pair {
        #[arg(short = 'a', long)]
        alphabet: PathBuf,
        #[arg(short = 'm', long)]
        matrix: PathBuf,
        /// Sequence 1 (matrix columns)
        seq1: String,
        /// Sequence 2 (matrix rows)
        seq2: String,
        #[arg(long)]
        json: bool,
    },
}

fn init_logger(verbose: u8) {
    let level = match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .format_timestamp(None)
        .format_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logger(cli.verbose);
    match cli.command {
        Commands::Align {
            alphabet,
            matrix,
            database,
            query,
            out,
            json,
            first_only,
            threads,
        } => {
            let paths = AlignPaths { alphabet, matrix, database, query };
            run_align(&paths, out.as_deref(), json, first_only, BatchOpt { threads })
        }
        Commands::Pair { alphabet, matrix, seq1, seq2, json } => run_pair(&alphabet, &matrix, &seq1, &seq2, json),
    }
}

struct AlignPaths {
    alphabet: PathBuf,
    matrix: PathBuf,
    database: PathBuf,
    query: PathBuf,
}

fn open_output(out: Option<&std::path::Path>) -> Result<Box<dyn Write>> {
    Ok(match out {
        Some(p) => {
            let fh = std::fs::File::create(p)
                .with_context(|| format!("cannot create output '{}'", p.display()))?;
            Box::new(std::io::BufWriter::new(fh))
        }
        None => Box::new(std::io::BufWriter::new(std::io::stdout())),
    })
}

fn run_align(paths: &AlignPaths, out: Option<&std::path::Path>, json: bool, first_only: bool, opt: BatchOpt) -> Result<()> {
    let started_at = chrono::Utc::now();
    let timer = std::time::Instant::now();

    let scoring = scoring::load_scoring(&paths.alphabet, &paths.matrix)?;

    let db_records = fasta::read_fasta_file(&paths.database)?;
    let Some(db) = db_records.into_iter().next() else {
        anyhow::bail!("database file '{}' contains no records", paths.database.display());
    };
    let mut queries = fasta::read_fasta_file(&paths.query)?;
    if queries.is_empty() {
        anyhow::bail!("query file '{}' contains no records", paths.query.display());
    }
    if first_only {
        queries.truncate(1);
    }
    log::info!("database {}: {} symbols, {} queries", db.id, db.seq.len(), queries.len());

    let hits: Vec<QueryHit> = align::align_queries(&scoring, &db.seq, &queries, opt)?;
    let summary = report::BatchSummary::from_hits(started_at, &db.id, db.seq.len(), &hits, timer.elapsed());

    let mut w = open_output(out)?;
    if json {
        report::write_json(&mut w, &summary, &hits)?;
    } else {
        for h in &hits {
            report::write_hit(&mut w, h)?;
        }
        summary.write_table(&mut w)?;
    }
    w.flush()?;
    Ok(())
}

fn run_pair(alphabet: &std::path::Path, matrix: &std::path::Path, seq1: &str, seq2: &str, json: bool) -> Result<()> {
    let scoring = scoring::load_scoring(alphabet, matrix)?;
    let aln = align::align_pair(&scoring, seq1.as_bytes(), seq2.as_bytes())?;

    let mut w = open_output(None)?;
    if json {
        serde_json::to_writer_pretty(&mut w, &aln)?;
        writeln!(w)?;
    } else {
        writeln!(w, "Score:   {}", aln.score)?;
        report::write_alignment(&mut w, &aln)?;
        writeln!(w, "Indices: {:?} {:?}", aln.seq1_indices, aln.seq2_indices)?;
    }
    w.flush()?;
    Ok(())
}
