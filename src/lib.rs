pub mod config;
pub mod geometry;
pub mod spins;

pub mod clusters;
pub mod mcmc;
pub mod simulation;
pub mod statistics;

pub use config::{ConfigError, ModelParams, Schedule, SimConfig};
pub use geometry::Lattice;
pub use simulation::{run_bin_loop, run_chains_parallel, Chain, SimError};
pub use spins::{SpinLattice, SpinVector};
