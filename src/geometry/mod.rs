pub mod lattice;

pub use lattice::{hypercubic, triangular, Lattice};
