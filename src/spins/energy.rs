use crate::config::ModelParams;
use crate::geometry::Lattice;

use super::lattice::SpinLattice;
use super::vector::SpinVector;

/// Total energy `−J·Σ_i Σ_d s_i · s_{fwd(i,d)} − h·Σ_i s_i[0]`.
///
/// Each bond is counted once, through the forward direction set. Always a
/// full O(N·D) recompute; nothing tracks energy incrementally, so update
/// arithmetic can never drift away from the true value.
pub fn total_energy(lattice: &Lattice, spins: &SpinLattice, params: &ModelParams) -> f64 {
    let mut energy_j = 0.0;
    for site in 0..lattice.n_sites {
        let spin = spins.get(site);
        for d in 0..lattice.n_offsets {
            energy_j += spin.dot(spins.get(lattice.neighbour(site, d)));
        }
    }

    let mut energy_h = 0.0;
    for site in 0..lattice.n_sites {
        energy_h += spins.get(site).component(0);
    }

    -params.coupling * energy_j - params.field * energy_h
}

/// Vector sum of all site spins, O(N).
pub fn magnetization(spins: &SpinLattice) -> SpinVector {
    let mut mag = SpinVector::zero(spins.spin_dim());
    for site in 0..spins.len() {
        mag.accumulate(spins.get(site));
    }
    mag
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256StarStar;

    fn params(coupling: f64, field: f64) -> ModelParams {
        ModelParams {
            spin_dim: 3,
            coupling,
            field,
            temp: 1.0,
        }
    }

    #[test]
    fn test_energy_counts_each_bond_once() {
        // Two aligned spins on a 2-site ring: both forward neighbours point
        // at the other site, so E_J = -J * 2 * (s·s) = -2J.
        let lattice = Lattice::hypercubic(1, 2).unwrap();
        let mut rng = Xoshiro256StarStar::seed_from_u64(10);
        let mut spins = SpinLattice::random(2, 3, &mut rng).unwrap();
        let s = spins.get(0).clone();
        spins.replace(1, s);

        let e = total_energy(&lattice, &spins, &params(1.0, 0.0));
        assert!((e - (-2.0)).abs() < 1e-12);
    }

    #[test]
    fn test_field_couples_to_first_component() {
        let lattice = Lattice::hypercubic(1, 2).unwrap();
        let mut rng = Xoshiro256StarStar::seed_from_u64(11);
        let spins = SpinLattice::random(2, 3, &mut rng).unwrap();

        let h = 0.7;
        let e0 = total_energy(&lattice, &spins, &params(0.0, 0.0));
        let eh = total_energy(&lattice, &spins, &params(0.0, h));
        let first_sum = spins.get(0).component(0) + spins.get(1).component(0);
        assert_eq!(e0, 0.0);
        assert!((eh - (-h * first_sum)).abs() < 1e-12);
    }

    #[test]
    fn test_magnetization_is_vector_sum() {
        let mut rng = Xoshiro256StarStar::seed_from_u64(12);
        let spins = SpinLattice::random(8, 2, &mut rng).unwrap();
        let mag = magnetization(&spins);
        let mut expect = [0.0f64; 2];
        for site in 0..8 {
            expect[0] += spins.get(site).component(0);
            expect[1] += spins.get(site).component(1);
        }
        assert!((mag.component(0) - expect[0]).abs() < 1e-12);
        assert!((mag.component(1) - expect[1]).abs() < 1e-12);
    }
}
