//! Infrastructure layer - Runtime implementations over the domain

pub mod experiment;
pub mod inference;
pub mod logging;
pub mod metrics;
pub mod observability;
pub mod registry;
pub mod search;
pub mod services;
