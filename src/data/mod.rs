pub mod npz;
pub mod registry;
pub mod series;
pub mod source;
pub mod synthetic;

// Re-export key types for convenience
pub use registry::{DataOrigin, DatasetRegistry, LoadOutcome};
pub use series::{Channel, Matrix, TimeSeries};
pub use source::TimestampSource;
