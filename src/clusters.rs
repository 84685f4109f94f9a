pub mod tracker;
pub mod wolff;

pub use tracker::ClusterTracker;
pub use wolff::{wolff_update, WolffOutcome};
