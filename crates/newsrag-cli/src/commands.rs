//! Subcommand implementations

use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

use newsrag_clean::{CleaningConfig, CleaningReport, CorpusCleaner, Normalizer};
use newsrag_core::{read_articles, Answer, Embedder, RAGEngine, RAGQuery, VectorStore};
use newsrag_eval::{read_examples, EvalReport, Evaluator};
use newsrag_openai::OpenAIClient;
use newsrag_rag::{ArticleIndexer, IndexingResult, NewsRAGEngine};

use crate::settings::Settings;
use crate::store::AnyVectorStore;

/// Options of `newsrag clean`
#[derive(Debug, Clone)]
pub struct CleanOptions {
    pub input: PathBuf,
    pub output: PathBuf,
    /// TOML file replacing the built-in cleaning tables
    pub tables: Option<PathBuf>,
}

/// Options of `newsrag index`
#[derive(Debug, Clone)]
pub struct IndexOptions {
    pub input: PathBuf,
}

/// Options of `newsrag ask`
#[derive(Debug, Clone)]
pub struct AskOptions {
    pub question: String,
    pub top_k: usize,
    /// Processed corpus indexed first when no Qdrant URL is configured
    pub corpus: Option<PathBuf>,
}

/// Options of `newsrag evaluate`
#[derive(Debug, Clone)]
pub struct EvaluateOptions {
    pub gold: PathBuf,
    pub output: PathBuf,
    pub top_k: usize,
    pub corpus: Option<PathBuf>,
}

/// Normalize a raw corpus into a processed corpus
pub fn clean(options: &CleanOptions) -> Result<CleaningReport> {
    let config = match &options.tables {
        Some(path) => CleaningConfig::from_file(path)
            .with_context(|| format!("Failed to load cleaning tables from {}", path.display()))?,
        None => CleaningConfig::default(),
    };

    let cleaner = CorpusCleaner::new(Normalizer::new(config)?);
    let report = cleaner.clean_file(&options.input, &options.output)?;
    Ok(report)
}

/// Chunk, embed and store every article of a processed corpus
pub async fn index_corpus<E, V>(embedder: Arc<E>, store: Arc<V>, corpus: &Path) -> Result<IndexingResult>
where
    E: Embedder,
    V: VectorStore,
{
    let articles = read_articles(corpus)
        .with_context(|| format!("Failed to read corpus {}", corpus.display()))?;
    info!(articles = articles.len(), corpus = %corpus.display(), "Indexing corpus");

    let indexer = ArticleIndexer::new(embedder, store);
    Ok(indexer.index_articles(&articles).await?)
}

/// Open the configured store; an in-memory store is filled from `corpus` first
async fn open_store(
    settings: &Settings,
    client: Arc<OpenAIClient>,
    corpus: Option<&Path>,
) -> Result<Arc<AnyVectorStore>> {
    let store = Arc::new(AnyVectorStore::open(settings.qdrant.as_ref())?);

    if !store.is_persistent() {
        let Some(corpus) = corpus else {
            bail!("No QDRANT_URL configured; pass --corpus to index a processed corpus into memory");
        };
        index_corpus(client, store.clone(), corpus).await?;
    }

    Ok(store)
}

/// Index a processed corpus into the configured store
pub async fn index(options: &IndexOptions, settings: &Settings) -> Result<IndexingResult> {
    let client = Arc::new(OpenAIClient::new(settings.openai.clone())?);
    let store = Arc::new(AnyVectorStore::open(settings.qdrant.as_ref())?);

    if !store.is_persistent() {
        warn!("No QDRANT_URL configured; the in-memory index is discarded on exit");
    }
    info!(store = %store.describe(), "Indexing");

    index_corpus(client, store, &options.input).await
}

/// Answer one question from the indexed corpus
pub async fn ask(options: &AskOptions, settings: &Settings) -> Result<Answer> {
    let client = Arc::new(OpenAIClient::new(settings.openai.clone())?);
    let store = open_store(settings, client.clone(), options.corpus.as_deref()).await?;

    let engine = NewsRAGEngine::new(client.clone(), store, client)
        .with_chat_config(settings.chat_config());
    let query = RAGQuery {
        top_k: options.top_k,
        ..RAGQuery::new(options.question.clone())
    };

    Ok(engine.answer(&query).await?)
}

/// Run `engine` over the gold file and write the CSV report
pub async fn evaluate_with<R, E>(
    engine: Arc<R>,
    embedder: Arc<E>,
    options: &EvaluateOptions,
) -> Result<EvalReport>
where
    R: RAGEngine,
    E: Embedder,
{
    let examples = read_examples(&options.gold)
        .with_context(|| format!("Failed to read gold answers {}", options.gold.display()))?;
    if examples.is_empty() {
        bail!("No usable examples in {}", options.gold.display());
    }

    let report = Evaluator::new(engine, embedder)
        .with_top_k(options.top_k)
        .run(&examples)
        .await;

    report
        .write_csv_file(&options.output)
        .with_context(|| format!("Failed to write report {}", options.output.display()))?;

    Ok(report)
}

/// Score generated answers against the gold file
pub async fn evaluate(options: &EvaluateOptions, settings: &Settings) -> Result<EvalReport> {
    let client = Arc::new(OpenAIClient::new(settings.openai.clone())?);
    let store = open_store(settings, client.clone(), options.corpus.as_deref()).await?;

    let engine = NewsRAGEngine::new(client.clone(), store, client.clone())
        .with_chat_config(settings.chat_config());

    evaluate_with(Arc::new(engine), client, options).await
}
