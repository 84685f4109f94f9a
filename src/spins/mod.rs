pub mod energy;
pub mod lattice;
pub mod vector;

pub use lattice::SpinLattice;
pub use vector::SpinVector;
