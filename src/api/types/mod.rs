//! API wire types

pub mod error;
pub mod json;
pub mod prediction;
pub mod search;

pub use error::{ApiError, ApiErrorDetail, ApiErrorResponse, ApiErrorType, FieldError};
pub use json::Json;
pub use prediction::{PredictRequestBody, PredictResponse};
pub use search::{SearchRequestBody, SearchResponse, SearchResponseItem};
