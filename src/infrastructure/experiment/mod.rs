pub mod consistent_hashing;
pub mod router;

pub use consistent_hashing::ConsistentHasher;
pub use router::ExperimentRouter;
