pub mod embedder;
pub mod engine;
pub mod index;

pub use embedder::{cosine_similarity, HashedBagOfWordsEmbedder, QueryEmbedder};
pub use engine::{HybridSearchEngine, SearchOutcome};
pub use index::{load_catalog_from_file, seed_catalog, InMemoryCatalogIndex};
