pub mod executor;

pub use executor::InferenceExecutor;
