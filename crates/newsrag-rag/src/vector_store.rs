//! Vector store implementations

use async_trait::async_trait;
use qdrant_client::qdrant::point_id::PointIdOptions;
use qdrant_client::qdrant::value::Kind;
use qdrant_client::qdrant::{
    CountPointsBuilder, CreateCollectionBuilder, Distance, ListValue, PointId, PointStruct,
    SearchPointsBuilder, Struct, UpsertPointsBuilder, Value as QdrantValue, VectorParamsBuilder,
};
use qdrant_client::Qdrant;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tracing::{debug, info};
use uuid::Uuid;

use newsrag_core::{Error, QueryConfig, Result, VectorMatch, VectorRecord, VectorStore};

/// Cosine similarity; zero for mismatched lengths or a zero-norm vector
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot_product / (norm_a * norm_b)
}

/// In-memory vector store ranking by cosine similarity
pub struct LocalVectorStore {
    records: Arc<RwLock<HashMap<String, VectorRecord>>>,
    dimension: RwLock<Option<usize>>,
}

impl LocalVectorStore {
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(HashMap::new())),
            dimension: RwLock::new(None),
        }
    }

    fn expected_dimension(&self) -> Result<Option<usize>> {
        let dimension = self
            .dimension
            .read()
            .map_err(|e| Error::VectorStore(format!("Lock error: {}", e)))?;
        Ok(*dimension)
    }
}

impl Default for LocalVectorStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VectorStore for LocalVectorStore {
    async fn ensure_index(&self, dimension: usize) -> Result<()> {
        let mut current = self
            .dimension
            .write()
            .map_err(|e| Error::VectorStore(format!("Lock error: {}", e)))?;

        match *current {
            Some(existing) if existing != dimension => Err(Error::VectorStore(format!(
                "Index holds {}-dimensional vectors, cannot use {}",
                existing, dimension
            ))),
            Some(_) => Ok(()),
            None => {
                *current = Some(dimension);
                Ok(())
            }
        }
    }

    async fn upsert(&self, records: Vec<VectorRecord>) -> Result<usize> {
        let dimension = self.expected_dimension()?.ok_or_else(|| {
            Error::VectorStore("Index not created; call ensure_index first".to_string())
        })?;

        if let Some(record) = records.iter().find(|r| r.vector.len() != dimension) {
            return Err(Error::VectorStore(format!(
                "Record {} has {} dimensions, index expects {}",
                record.id,
                record.vector.len(),
                dimension
            )));
        }

        let mut stored = self
            .records
            .write()
            .map_err(|e| Error::VectorStore(format!("Lock error: {}", e)))?;

        let count = records.len();
        for record in records {
            stored.insert(record.id.clone(), record);
        }

        Ok(count)
    }

    async fn query(&self, vector: &[f32], config: &QueryConfig) -> Result<Vec<VectorMatch>> {
        let stored = self
            .records
            .read()
            .map_err(|e| Error::VectorStore(format!("Lock error: {}", e)))?;

        let mut results: Vec<VectorMatch> = stored
            .values()
            .map(|record| VectorMatch {
                id: record.id.clone(),
                score: cosine_similarity(vector, &record.vector),
                metadata: record.metadata.clone(),
            })
            .filter(|m| config.score_threshold.is_none_or(|threshold| m.score >= threshold))
            .collect();

        results.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.id.cmp(&b.id))
        });
        results.truncate(config.top_k);

        Ok(results)
    }

    async fn count(&self) -> Result<usize> {
        let stored = self
            .records
            .read()
            .map_err(|e| Error::VectorStore(format!("Lock error: {}", e)))?;
        Ok(stored.len())
    }
}

/// Connection settings for a Qdrant collection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QdrantConfig {
    pub url: String,
    pub api_key: Option<String>,
    pub collection: String,
}

impl QdrantConfig {
    pub const DEFAULT_COLLECTION: &'static str = "news_articles";

    /// Read `QDRANT_URL`, `QDRANT_API_KEY` and `NEWSRAG_COLLECTION`.
    ///
    /// Returns `None` when no URL is configured.
    pub fn from_env() -> Option<Self> {
        let url = std::env::var("QDRANT_URL").ok().filter(|url| !url.is_empty())?;

        Some(Self {
            url,
            api_key: std::env::var("QDRANT_API_KEY").ok().filter(|key| !key.is_empty()),
            collection: std::env::var("NEWSRAG_COLLECTION")
                .unwrap_or_else(|_| Self::DEFAULT_COLLECTION.to_string()),
        })
    }
}

/// Qdrant-backed vector store
pub struct QdrantVectorStore {
    client: Qdrant,
    collection: String,
}

/// Deterministic Qdrant point id for a record id
pub fn point_id(record_id: &str) -> String {
    Uuid::from_bytes(md5::compute(record_id.as_bytes()).0).to_string()
}

impl QdrantVectorStore {
    pub fn new(config: &QdrantConfig) -> Result<Self> {
        let mut builder = Qdrant::from_url(&config.url);
        if let Some(api_key) = &config.api_key {
            builder = builder.api_key(api_key.clone());
        }

        let client = builder
            .build()
            .map_err(|e| Error::VectorStore(format!("Failed to create Qdrant client: {}", e)))?;

        Ok(Self {
            client,
            collection: config.collection.clone(),
        })
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }
}

#[async_trait]
impl VectorStore for QdrantVectorStore {
    async fn ensure_index(&self, dimension: usize) -> Result<()> {
        let exists = self
            .client
            .collection_exists(self.collection.clone())
            .await
            .map_err(|e| Error::VectorStore(e.to_string()))?;

        if !exists {
            self.client
                .create_collection(
                    CreateCollectionBuilder::new(self.collection.clone())
                        .vectors_config(VectorParamsBuilder::new(dimension as u64, Distance::Cosine)),
                )
                .await
                .map_err(|e| Error::VectorStore(e.to_string()))?;
            info!(collection = %self.collection, dimension, "Created Qdrant collection");
        }

        Ok(())
    }

    async fn upsert(&self, records: Vec<VectorRecord>) -> Result<usize> {
        if records.is_empty() {
            return Ok(0);
        }

        let count = records.len();
        let points: Vec<PointStruct> = records
            .into_iter()
            .map(|record| {
                let mut payload = json_object_to_payload(record.metadata);
                payload.insert("record_id".to_string(), QdrantValue::from(record.id.clone()));
                PointStruct::new(point_id(&record.id), record.vector, payload)
            })
            .collect();

        self.client
            .upsert_points(UpsertPointsBuilder::new(self.collection.clone(), points).wait(true))
            .await
            .map_err(|e| Error::VectorStore(e.to_string()))?;

        debug!(collection = %self.collection, count, "Upserted points");
        Ok(count)
    }

    async fn query(&self, vector: &[f32], config: &QueryConfig) -> Result<Vec<VectorMatch>> {
        let mut request =
            SearchPointsBuilder::new(self.collection.clone(), vector.to_vec(), config.top_k as u64)
                .with_payload(true);
        if let Some(threshold) = config.score_threshold {
            request = request.score_threshold(threshold);
        }

        let response = self
            .client
            .search_points(request)
            .await
            .map_err(|e| Error::VectorStore(e.to_string()))?;

        Ok(response
            .result
            .into_iter()
            .map(|point| {
                let mut payload = point.payload;
                let id = match payload.remove("record_id").and_then(|v| v.kind) {
                    Some(Kind::StringValue(id)) => id,
                    _ => point.id.map(point_id_to_string).unwrap_or_default(),
                };

                VectorMatch {
                    id,
                    score: point.score,
                    metadata: payload_to_json(payload),
                }
            })
            .collect())
    }

    async fn count(&self) -> Result<usize> {
        let response = self
            .client
            .count(CountPointsBuilder::new(self.collection.clone()).exact(true))
            .await
            .map_err(|e| Error::VectorStore(e.to_string()))?;

        Ok(response.result.map_or(0, |result| result.count as usize))
    }
}

fn point_id_to_string(id: PointId) -> String {
    match id.point_id_options {
        Some(PointIdOptions::Uuid(uuid)) => uuid,
        Some(PointIdOptions::Num(num)) => num.to_string(),
        None => String::new(),
    }
}

fn json_object_to_payload(value: serde_json::Value) -> HashMap<String, QdrantValue> {
    match value {
        serde_json::Value::Object(map) => map
            .into_iter()
            .map(|(key, value)| (key, json_to_qdrant(value)))
            .collect(),
        serde_json::Value::Null => HashMap::new(),
        other => HashMap::from([("value".to_string(), json_to_qdrant(other))]),
    }
}

fn json_to_qdrant(value: serde_json::Value) -> QdrantValue {
    let kind = match value {
        serde_json::Value::Null => Kind::NullValue(0),
        serde_json::Value::Bool(b) => Kind::BoolValue(b),
        serde_json::Value::Number(n) => match n.as_i64() {
            Some(i) => Kind::IntegerValue(i),
            None => Kind::DoubleValue(n.as_f64().unwrap_or_default()),
        },
        serde_json::Value::String(s) => Kind::StringValue(s),
        serde_json::Value::Array(items) => Kind::ListValue(ListValue {
            values: items.into_iter().map(json_to_qdrant).collect(),
        }),
        serde_json::Value::Object(map) => Kind::StructValue(Struct {
            fields: map
                .into_iter()
                .map(|(key, value)| (key, json_to_qdrant(value)))
                .collect(),
        }),
    };

    QdrantValue { kind: Some(kind) }
}

fn qdrant_to_json(value: QdrantValue) -> serde_json::Value {
    match value.kind {
        None | Some(Kind::NullValue(_)) => serde_json::Value::Null,
        Some(Kind::BoolValue(b)) => serde_json::Value::Bool(b),
        Some(Kind::IntegerValue(i)) => serde_json::Value::from(i),
        Some(Kind::DoubleValue(d)) => serde_json::Value::from(d),
        Some(Kind::StringValue(s)) => serde_json::Value::String(s),
        Some(Kind::ListValue(list)) => {
            serde_json::Value::Array(list.values.into_iter().map(qdrant_to_json).collect())
        }
        Some(Kind::StructValue(s)) => payload_to_json(s.fields),
    }
}

fn payload_to_json(payload: HashMap<String, QdrantValue>) -> serde_json::Value {
    serde_json::Value::Object(
        payload
            .into_iter()
            .map(|(key, value)| (key, qdrant_to_json(value)))
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(id: &str, vector: Vec<f32>) -> VectorRecord {
        VectorRecord {
            id: id.to_string(),
            vector,
            metadata: json!({ "content": id }),
        }
    }

    #[test]
    fn test_cosine_similarity() {
        assert!((cosine_similarity(&[1.0, 0.0], &[2.0, 0.0]) - 1.0).abs() < 1e-6);
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]), 0.0);
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[1.0]), 0.0);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
    }

    #[tokio::test]
    async fn test_local_store_ranks_by_cosine() {
        let store = LocalVectorStore::new();
        store.ensure_index(2).await.unwrap();
        store
            .upsert(vec![
                record("east", vec![1.0, 0.0]),
                record("north", vec![0.0, 1.0]),
                record("north-east", vec![1.0, 1.0]),
            ])
            .await
            .unwrap();

        let matches = store.query(&[1.0, 0.2], &QueryConfig::default()).await.unwrap();
        let ids: Vec<&str> = matches.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["east", "north-east", "north"]);
    }

    #[tokio::test]
    async fn test_local_store_top_k_and_threshold() {
        let store = LocalVectorStore::new();
        store.ensure_index(2).await.unwrap();
        store
            .upsert(vec![
                record("a", vec![1.0, 0.0]),
                record("b", vec![0.9, 0.1]),
                record("c", vec![0.0, 1.0]),
            ])
            .await
            .unwrap();

        let config = QueryConfig {
            top_k: 1,
            score_threshold: None,
        };
        assert_eq!(store.query(&[1.0, 0.0], &config).await.unwrap().len(), 1);

        let config = QueryConfig {
            top_k: 10,
            score_threshold: Some(0.5),
        };
        let matches = store.query(&[1.0, 0.0], &config).await.unwrap();
        assert_eq!(matches.len(), 2);
    }

    #[tokio::test]
    async fn test_local_store_upsert_replaces_by_id() {
        let store = LocalVectorStore::new();
        store.ensure_index(2).await.unwrap();
        store.upsert(vec![record("a", vec![1.0, 0.0])]).await.unwrap();
        store.upsert(vec![record("a", vec![0.0, 1.0])]).await.unwrap();

        assert_eq!(store.count().await.unwrap(), 1);
        let matches = store.query(&[0.0, 1.0], &QueryConfig::default()).await.unwrap();
        assert!((matches[0].score - 1.0).abs() < 1e-6);
    }

    #[tokio::test]
    async fn test_local_store_checks_dimension() {
        let store = LocalVectorStore::new();
        assert!(store.upsert(vec![record("a", vec![1.0])]).await.is_err());

        store.ensure_index(2).await.unwrap();
        assert!(store.ensure_index(2).await.is_ok());
        assert!(store.ensure_index(3).await.is_err());
        assert!(store.upsert(vec![record("a", vec![1.0])]).await.is_err());
    }

    #[test]
    fn test_point_id_is_stable_uuid() {
        let id = point_id("abc_0");
        assert_eq!(id, point_id("abc_0"));
        assert_ne!(id, point_id("abc_1"));
        assert!(Uuid::parse_str(&id).is_ok());
    }

    #[test]
    fn test_payload_round_trip() {
        let metadata = json!({
            "title": "Rates",
            "chunk_index": 3,
            "tags": ["a", "b"],
            "score": 0.5,
        });

        let payload = json_object_to_payload(metadata.clone());
        assert_eq!(payload_to_json(payload), metadata);
    }
}
