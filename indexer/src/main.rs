use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use searchcore::tokenizer::NormalizerKind;
use searchcore::{
    BetterRanker, BetterRankerConfig, Corpus, DocId, Document, InMemoryCorpus, InMemoryInvertedIndex, IndexConfig,
    InvertedIndex, Ranker, SearchOptions, SimpleRanker, SimpleSearchEngine,
};
use serde::Serialize;
use tracing_subscriber::{fmt, EnvFilter};

use std::io::{self, BufRead, Write};
use std::time::Instant;

#[derive(Parser)]
#[command(name = "indexer")]
#[command(about = "Build an in-memory inverted index over a corpus and query it", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct IndexArgs {
    /// Corpus file (.txt, .tsv, .json, .jsonl) or directory of such files
    #[arg(long)]
    corpus: String,
    /// Document fields to index
    #[arg(long = "field", default_values_t = vec!["body".to_string()])]
    fields: Vec<String>,
    /// Store posting lists variable-byte compressed
    #[arg(long, default_value_t = false)]
    compressed: bool,
    /// Normalizer applied to documents and queries
    #[arg(long, value_enum, default_value_t = NormalizerArg::Simple)]
    normalizer: NormalizerArg,
}

#[derive(Clone, Copy, ValueEnum)]
enum NormalizerArg {
    Simple,
    Porter,
}

#[derive(Clone, Copy, ValueEnum)]
enum RankerArg {
    Simple,
    Better,
}

#[derive(Subcommand)]
enum Commands {
    /// Report corpus and vocabulary statistics
    Stats {
        #[command(flatten)]
        index: IndexArgs,
        /// Number of most frequent terms to list
        #[arg(long, default_value_t = 10)]
        top: usize,
    },
    /// Print the postings of a term
    Postings {
        #[command(flatten)]
        index: IndexArgs,
        #[arg(long)]
        term: String,
    },
    /// Evaluate queries given as arguments, or one per line on stdin
    Query {
        #[command(flatten)]
        index: IndexArgs,
        /// Fraction of distinct query terms a document must contain, in (0, 1]
        #[arg(long, default_value_t = 0.5)]
        match_threshold: f64,
        /// Maximum number of hits, clamped to [1, 100]
        #[arg(long, default_value_t = 5)]
        hit_count: usize,
        #[arg(long, value_enum, default_value_t = RankerArg::Simple)]
        ranker: RankerArg,
        /// Weight of the TF-IDF score (better ranker)
        #[arg(long, default_value_t = 1.0)]
        dynamic_weight: f64,
        /// Weight of the static quality score (better ranker)
        #[arg(long, default_value_t = 1.0)]
        static_weight: f64,
        /// Field holding the static quality score (better ranker)
        #[arg(long, default_value = "static_quality_score")]
        static_score_field: String,
        queries: Vec<String>,
    },
}

#[derive(Serialize)]
struct QueryOutput<'a> {
    query: &'a str,
    took_s: f64,
    hits: Vec<HitOutput<'a>>,
}

#[derive(Serialize)]
struct HitOutput<'a> {
    score: f64,
    doc_id: DocId,
    document: &'a Document,
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Stats { index, top } => stats(&index, top),
        Commands::Postings { index, term } => postings(&index, &term),
        Commands::Query {
            index,
            match_threshold,
            hit_count,
            ranker,
            dynamic_weight,
            static_weight,
            static_score_field,
            queries,
        } => {
            let options = SearchOptions::new(match_threshold, hit_count)?;
            let ranker_config = BetterRankerConfig { dynamic_weight, static_weight, static_score_field };
            query(&index, options, ranker, ranker_config, &queries)
        }
    }
}

fn load(args: &IndexArgs) -> Result<(InMemoryCorpus, InMemoryInvertedIndex)> {
    let corpus = InMemoryCorpus::from_path(&args.corpus)?;
    let config = IndexConfig {
        fields: args.fields.clone(),
        compressed: args.compressed,
        normalizer: match args.normalizer {
            NormalizerArg::Simple => NormalizerKind::Simple,
            NormalizerArg::Porter => NormalizerKind::Porter,
        },
    };
    let index = InMemoryInvertedIndex::from_config(&corpus, &config)?;
    Ok((corpus, index))
}

fn stats(args: &IndexArgs, top: usize) -> Result<()> {
    let (corpus, index) = load(args)?;
    let mut terms: Vec<(&str, usize)> = index.terms().collect();
    terms.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    terms.truncate(top);
    let out = serde_json::json!({
        "documents": corpus.size(),
        "terms": index.term_count(),
        "compressed": index.is_compressed(),
        "top_terms": terms.iter().map(|(t, df)| serde_json::json!({ "term": t, "df": df })).collect::<Vec<_>>(),
    });
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}

fn postings(args: &IndexArgs, term: &str) -> Result<()> {
    let (_corpus, index) = load(args)?;
    // Look the term up the way queries see it.
    let terms = index.get_terms(term);
    let Some(normalized) = terms.first() else {
        anyhow::bail!("term {term:?} normalizes to nothing");
    };
    let postings: Vec<_> = index.get_postings_iterator(normalized).collect();
    let out = serde_json::json!({
        "term": normalized,
        "df": index.get_document_frequency(normalized),
        "postings": postings,
    });
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}

fn query(
    args: &IndexArgs,
    options: SearchOptions,
    ranker: RankerArg,
    ranker_config: BetterRankerConfig,
    queries: &[String],
) -> Result<()> {
    let (corpus, index) = load(args)?;
    let engine = SimpleSearchEngine::new(&corpus, &index);
    let mut ranker: Box<dyn Ranker + '_> = match ranker {
        RankerArg::Simple => Box::new(SimpleRanker::new()),
        RankerArg::Better => Box::new(BetterRanker::with_config(&corpus, &index, ranker_config)),
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut run = |q: &str| -> Result<()> {
        let start = Instant::now();
        let hits = engine.evaluate(q, &options, ranker.as_mut())?;
        let took_s = start.elapsed().as_secs_f64();
        let hits = hits
            .into_iter()
            .map(|h| HitOutput { score: h.score, doc_id: h.document.doc_id, document: h.document })
            .collect();
        writeln!(out, "{}", serde_json::to_string(&QueryOutput { query: q, took_s, hits })?)?;
        Ok(())
    };

    if queries.is_empty() {
        tracing::info!("reading queries from stdin");
        for line in io::stdin().lock().lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            run(line.as_str())?;
        }
    } else {
        for q in queries {
            run(q.as_str())?;
        }
    }
    Ok(())
}
