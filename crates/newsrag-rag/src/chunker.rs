//! Overlapping character windows over cleaned article text

use serde::{Deserialize, Serialize};
use serde_json::json;

use newsrag_core::{Article, Error, Result};

/// Chunking and batching parameters for indexing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkingConfig {
    /// Window length in characters
    pub chunk_size: usize,
    /// Characters shared by consecutive windows
    pub chunk_overlap: usize,
    /// Chunks sent to the embedder per request
    pub batch_size: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            chunk_overlap: 200,
            batch_size: 32,
        }
    }
}

impl ChunkingConfig {
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(Error::Configuration("chunk_size must be positive".to_string()));
        }
        if self.chunk_overlap >= self.chunk_size {
            return Err(Error::Configuration(format!(
                "chunk_overlap ({}) must be smaller than chunk_size ({})",
                self.chunk_overlap, self.chunk_size
            )));
        }
        if self.batch_size == 0 {
            return Err(Error::Configuration("batch_size must be positive".to_string()));
        }
        Ok(())
    }
}

/// A window of an article with the metadata stored next to its vector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    pub id: String,
    pub content: String,
    pub metadata: serde_json::Value,
}

/// Stable identifier of an article: md5 of its url, or of its title when the url is empty
pub fn article_id(article: &Article) -> String {
    let key = if article.url.is_empty() {
        &article.title
    } else {
        &article.url
    };
    format!("{:x}", md5::compute(key.as_bytes()))
}

/// Split `content` into windows of `chunk_size` characters, each starting
/// `chunk_size - chunk_overlap` characters after the previous one.
pub fn chunk_text(content: &str, config: &ChunkingConfig) -> Result<Vec<String>> {
    config.validate()?;

    let mut chunks = Vec::new();
    let chars: Vec<char> = content.chars().collect();
    let mut start = 0;

    while start < chars.len() {
        let end = (start + config.chunk_size).min(chars.len());
        chunks.push(chars[start..end].iter().collect());

        if end >= chars.len() {
            break;
        }

        start = end - config.chunk_overlap;
    }

    Ok(chunks)
}

/// Chunk an article and attach its metadata to every window.
///
/// `published_on` holds the ISO date parsed from the date column, or null.
pub fn chunk_article(article: &Article, config: &ChunkingConfig) -> Result<Vec<Chunk>> {
    let id = article_id(article);
    let windows = chunk_text(&article.content, config)?;
    let total = windows.len();
    let published_on = article.published_on().map(|day| day.to_string());

    Ok(windows
        .into_iter()
        .enumerate()
        .map(|(index, content)| Chunk {
            id: format!("{}_{}", id, index),
            metadata: json!({
                "content": content,
                "title": article.title,
                "date": article.date,
                "published_on": published_on,
                "domain": article.domain,
                "url": article.url,
                "chunk_index": index,
                "total_chunks": total,
            }),
            content,
        })
        .collect())
}
