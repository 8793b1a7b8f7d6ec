//! # String Analyzer
//!
//! Analyzes strings, stores each distinct string exactly once keyed by its
//! SHA-256 content hash, and answers filter queries over the stored set.
//!
//! ## Features
//!
//! - **Analysis**: length, case-insensitive palindrome check, unique
//!   characters, word count, content hash and an ordered frequency histogram
//! - **Content-addressed storage**: concurrent store with a secondary
//!   exact-value index; duplicates are rejected atomically
//! - **Filtering**: conjunctive structured filters, newest entries first
//! - **Natural-language queries**: a small rule set translating phrases such
//!   as "single word palindromic strings" into filters
//! - **HTTP**: axum REST server (feature `server`)
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐    ┌──────────────────┐    ┌─────────────────┐
//! │   HTTP Client   │    │  StringService   │    │  StringStore    │
//! │                 │    │                  │    │                 │
//! │ • POST /strings │◄──►│ • Analyze        │◄──►│ • by content id │
//! │ • GET filters   │    │ • Filter engine  │    │ • by value      │
//! │ • NL queries    │    │ • Translator     │    │                 │
//! └─────────────────┘    └──────────────────┘    └─────────────────┘
//! ```

pub mod analysis;
pub mod entry;
pub mod error;
pub mod filter;
pub mod query;
#[cfg(feature = "server")]
pub mod server;
pub mod service;
pub mod storage;

pub use analysis::{analyze, CharacterFrequency, Properties};
pub use entry::{AnalyzedEntry, EntryId};
pub use error::{AnalyzerError, Result};
pub use filter::{FilterConfig, FilterEngine, FilterParams, FilterSet};
pub use query::{InterpretedQuery, QueryTranslator};
#[cfg(feature = "server")]
pub use server::{ApiServer, ServerConfig};
pub use service::{CreateRequest, ListResult, QueryResult, StringService};
pub use storage::{StorageConfig, StorageStats, StringStore};
