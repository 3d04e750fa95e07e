pub mod recorder;
pub mod sink;

pub use recorder::MetricsRecorder;
pub use sink::{InMemorySink, JsonLinesSink, MetricsSink};
