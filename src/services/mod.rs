pub mod catalog;
pub mod embedding;
pub mod query;
pub mod recommender;
pub mod trace_log;

pub use catalog::Catalog;
pub use embedding::{Embedder, HashingEmbedder};
#[cfg(feature = "fastembed")]
pub use embedding::FastEmbedder;
pub use query::normalize_query;
pub use recommender::Recommender;
pub use trace_log::{TraceEntry, TraceLog};
