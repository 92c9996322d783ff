//! News article records and corpus file IO

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;

use crate::{Error, Result};

/// A row of the raw scraped corpus
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawArticle {
    pub title: String,
    pub date: String,
    #[serde(default)]
    pub author: Option<String>,
    pub content: String,
    pub domain: String,
    pub url: String,
}

/// A processed article. Same columns as the raw corpus minus `author`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub title: String,
    pub date: String,
    pub content: String,
    pub domain: String,
    pub url: String,
}

impl Article {
    /// Parse the publication date from the leading `YYYY-MM-DD` of the date column
    pub fn published_on(&self) -> Option<NaiveDate> {
        let day = self.date.trim().get(..10)?;
        NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
    }
}

impl From<RawArticle> for Article {
    fn from(raw: RawArticle) -> Self {
        Self {
            title: raw.title,
            date: raw.date,
            content: raw.content,
            domain: raw.domain,
            url: raw.url,
        }
    }
}

/// Load a processed corpus
pub fn read_articles<P: AsRef<Path>>(path: P) -> Result<Vec<Article>> {
    let file = File::open(&path).map_err(|e| {
        Error::InvalidInput(format!("Failed to open {}: {}", path.as_ref().display(), e))
    })?;

    let mut reader = csv::Reader::from_reader(file);
    let mut articles = Vec::new();
    for row in reader.deserialize() {
        let article: Article = row?;
        articles.push(article);
    }

    Ok(articles)
}
