//! String analysis operations
//!
//! Composes the store, filter engine and query translator into the
//! operation set exposed to transports. Untyped input is validated here
//! into typed requests before it reaches the core.

use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

use crate::entry::{AnalyzedEntry, EntryId};
use crate::error::{AnalyzerError, Result};
use crate::filter::{FilterConfig, FilterEngine, FilterSet};
use crate::query::{InterpretedQuery, QueryTranslator};
use crate::storage::{StorageStats, StringStore};

/// A validated request to analyze a string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateRequest {
    pub value: String,
}

impl CreateRequest {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }

    /// Validate an untyped request body
    pub fn from_json(body: Value) -> Result<Self> {
        let mut object = match body {
            Value::Object(map) => map,
            _ => {
                return Err(AnalyzerError::InvalidInput(
                    "request body must be a JSON object".into(),
                ))
            }
        };

        match object.remove("value") {
            None => Err(AnalyzerError::InvalidInput("Missing 'value' field".into())),
            Some(Value::String(value)) => Ok(Self { value }),
            Some(_) => Err(AnalyzerError::InvalidType("'value' must be a string".into())),
        }
    }
}

/// Result of a structured listing
#[derive(Debug, Clone, Serialize)]
pub struct ListResult {
    pub data: Vec<AnalyzedEntry>,
    pub count: usize,
    pub filters_applied: FilterSet,
}

/// Result of a natural-language query
#[derive(Debug, Clone, Serialize)]
pub struct QueryResult {
    pub data: Vec<AnalyzedEntry>,
    pub count: usize,
    pub interpreted_query: InterpretedQuery,
}

/// String analysis service
pub struct StringService {
    store: Arc<StringStore>,
    engine: FilterEngine,
    translator: QueryTranslator,
}

impl StringService {
    /// Create a new service over a shared store
    pub fn new(store: Arc<StringStore>, filter: FilterConfig) -> Result<Self> {
        Ok(Self {
            store,
            engine: FilterEngine::new(filter),
            translator: QueryTranslator::new()?,
        })
    }

    /// Create with default configuration
    pub fn with_defaults(store: Arc<StringStore>) -> Result<Self> {
        Self::new(store, FilterConfig::default())
    }

    /// Analyze and store a string
    ///
    /// Analysis runs on the blocking pool so large inputs do not stall the
    /// async workers.
    pub async fn create(&self, request: CreateRequest) -> Result<AnalyzedEntry> {
        let entry = tokio::task::spawn_blocking(move || AnalyzedEntry::new(request.value))
            .await
            .map_err(|e| AnalyzerError::Internal(format!("analysis task failed: {}", e)))?;
        let entry = self.store.insert(entry).await?;
        tracing::info!(id = %entry.id, length = entry.properties.length, "analyzed string");
        Ok(entry)
    }

    /// Fetch an entry by its exact original value
    pub async fn get_by_value(&self, value: &str) -> Result<AnalyzedEntry> {
        self.store
            .get_by_value(value)
            .await
            .ok_or_else(|| AnalyzerError::NotFound(value.to_string()))
    }

    /// Fetch an entry by its content hash
    pub async fn get_by_id(&self, id: &EntryId) -> Result<AnalyzedEntry> {
        self.store
            .get_by_id(id)
            .await
            .ok_or_else(|| AnalyzerError::NotFound(id.to_string()))
    }

    /// List stored entries matching structured filters
    pub async fn list(&self, filters: FilterSet) -> ListResult {
        let data = self.engine.filter(self.store.list_all().await, &filters);
        tracing::debug!(filters = %filters, count = data.len(), "listed strings");
        ListResult {
            count: data.len(),
            data,
            filters_applied: filters,
        }
    }

    /// Translate a free-text query and list the matching entries
    pub async fn query_by_text(&self, query: &str) -> Result<QueryResult> {
        let interpreted = self.translator.translate(query)?;
        let data = self
            .engine
            .filter(self.store.list_all().await, &interpreted.parsed_filters);
        tracing::debug!(
            query,
            filters = %interpreted.parsed_filters,
            count = data.len(),
            "natural language query"
        );
        Ok(QueryResult {
            count: data.len(),
            data,
            interpreted_query: interpreted,
        })
    }

    /// Delete an entry by its exact original value
    pub async fn delete_by_value(&self, value: &str) -> Result<()> {
        match self.store.delete_by_value(value).await {
            Some(entry) => {
                tracing::info!(id = %entry.id, "deleted string");
                Ok(())
            }
            None => Err(AnalyzerError::NotFound(value.to_string())),
        }
    }

    /// Get storage statistics
    pub async fn stats(&self) -> StorageStats {
        self.store.stats().await
    }
}
