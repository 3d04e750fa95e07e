pub mod handle;
pub mod loader;

pub use handle::ModelRegistry;
pub use loader::{load_from_file, seed_snapshot};
