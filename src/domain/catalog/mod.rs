pub mod filter;
pub mod item;
pub mod query;

pub use filter::{FilterCondition, FilterOperator, FilterValue};
pub use item::CatalogItem;
pub use query::{RankedItem, SearchQuery};
