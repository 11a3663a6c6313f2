use anyhow::Result;
use axum::Router;
use clap::Parser;
use searchcore::tokenizer::NormalizerKind;
use searchcore::{BetterRankerConfig, IndexConfig};
use server::{build_app, ServerConfig};
use std::net::SocketAddr;
use std::path::PathBuf;
use tokio::net::TcpListener;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
struct Args {
    /// Corpus file or directory
    #[arg(long, default_value = "./corpus.jsonl")]
    corpus: PathBuf,
    /// Document fields to index
    #[arg(long = "field", default_values_t = vec!["body".to_string()])]
    fields: Vec<String>,
    /// Store posting lists variable-byte compressed
    #[arg(long, default_value_t = false)]
    compressed: bool,
    /// Stem terms with the English Snowball stemmer
    #[arg(long, default_value_t = false)]
    porter: bool,
    /// Weight of the TF-IDF score
    #[arg(long, default_value_t = 1.0)]
    dynamic_weight: f64,
    /// Weight of the static quality score
    #[arg(long, default_value_t = 1.0)]
    static_weight: f64,
    /// Field holding the static quality score
    #[arg(long, default_value = "static_quality_score")]
    static_score_field: String,
    /// Host to bind
    #[arg(long, default_value = "0.0.0.0")]
    host: String,
    /// Port to bind
    #[arg(long, default_value_t = 8080)]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Args::parse();
    let config = ServerConfig {
        corpus: args.corpus,
        index: IndexConfig {
            fields: args.fields,
            compressed: args.compressed,
            normalizer: if args.porter { NormalizerKind::Porter } else { NormalizerKind::Simple },
        },
        ranker: BetterRankerConfig {
            dynamic_weight: args.dynamic_weight,
            static_weight: args.static_weight,
            static_score_field: args.static_score_field,
        },
    };
    let app: Router = build_app(config)?;

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "server listening");
    axum::serve(listener, app).await?;
    Ok(())
}
