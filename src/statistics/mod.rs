pub mod histogram;
pub mod measures;

pub use histogram::ClusterHistogram;
pub use measures::MeasurementSet;
