use rand::distributions::Open01;
use rand::Rng;
use rand_xoshiro::Xoshiro256StarStar;

use crate::config::ModelParams;
use crate::geometry::Lattice;
use crate::spins::{SpinLattice, SpinVector};

/// One single-spin Metropolis trial. Returns whether the move was accepted.
///
/// Draw order is fixed: candidate direction, site, then (only when
/// `ΔE > 0`) exactly one uniform accept draw in (0,1). A rejected candidate
/// is discarded without touching the lattice.
pub fn local_update(
    lattice: &Lattice,
    spins: &mut SpinLattice,
    params: &ModelParams,
    rng: &mut Xoshiro256StarStar,
) -> bool {
    let candidate = SpinVector::random_unit(params.spin_dim, rng);
    let site = rng.gen_range(0..lattice.n_sites);

    let mut nn_sum = SpinVector::zero(params.spin_dim);
    for dir in 0..lattice.n_directions() {
        nn_sum.accumulate(spins.get(lattice.neighbour(site, dir)));
    }

    let current = spins.get(site);
    let delta_e = -params.coupling * (nn_sum.dot(&candidate) - nn_sum.dot(current))
        - params.field * (candidate.component(0) - current.component(0));

    let accept = delta_e <= 0.0 || {
        let draw: f64 = rng.sample(Open01);
        draw < (-delta_e / params.temp).exp()
    };

    if accept {
        spins.replace(site, candidate);
    }
    accept
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spins::energy::total_energy;
    use rand::SeedableRng;

    fn setup(
        coupling: f64,
        field: f64,
        temp: f64,
        seed: u64,
    ) -> (Lattice, SpinLattice, ModelParams, Xoshiro256StarStar) {
        let lattice = Lattice::hypercubic(2, 4).unwrap();
        let mut rng = Xoshiro256StarStar::seed_from_u64(seed);
        let spins = SpinLattice::random(lattice.n_sites, 3, &mut rng).unwrap();
        let params = ModelParams {
            spin_dim: 3,
            coupling,
            field,
            temp,
        };
        (lattice, spins, params, rng)
    }

    #[test]
    fn test_free_spins_always_accept() {
        // J = 0, h = 0: ΔE is identically zero, every trial must accept.
        let (lattice, mut spins, params, mut rng) = setup(0.0, 0.0, 1.0, 30);
        for _ in 0..500 {
            assert!(local_update(&lattice, &mut spins, &params, &mut rng));
        }
    }

    #[test]
    fn test_norms_stay_unit() {
        let (lattice, mut spins, params, mut rng) = setup(1.0, 0.4, 1.2, 31);
        for _ in 0..500 {
            local_update(&lattice, &mut spins, &params, &mut rng);
        }
        for site in 0..lattice.n_sites {
            assert!((spins.get(site).norm() - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_accepted_delta_matches_full_recompute() {
        let (lattice, mut spins, params, mut rng) = setup(1.0, 0.6, 0.9, 32);
        for _ in 0..300 {
            let snapshot = spins.clone();
            let energy_before = total_energy(&lattice, &snapshot, &params);
            let accepted = local_update(&lattice, &mut spins, &params, &mut rng);
            let energy_after = total_energy(&lattice, &spins, &params);

            if !accepted {
                assert_eq!(energy_after, energy_before);
                continue;
            }

            // Recover the changed site and recompute ΔE from the move rule.
            let site = (0..lattice.n_sites)
                .find(|&i| spins.get(i) != snapshot.get(i))
                .expect("accepted move must change exactly one site");
            let mut nn_sum = SpinVector::zero(3);
            for dir in 0..lattice.n_directions() {
                nn_sum.accumulate(snapshot.get(lattice.neighbour(site, dir)));
            }
            let delta_e = -params.coupling
                * (nn_sum.dot(spins.get(site)) - nn_sum.dot(snapshot.get(site)))
                - params.field
                    * (spins.get(site).component(0) - snapshot.get(site).component(0));
            assert!((energy_after - energy_before - delta_e).abs() < 1e-9);
        }
    }

    #[test]
    fn test_low_temperature_descends_in_energy() {
        let (lattice, mut spins, params, mut rng) = setup(1.0, 0.0, 1e-3, 33);
        let start = total_energy(&lattice, &spins, &params);
        for _ in 0..5000 {
            local_update(&lattice, &mut spins, &params, &mut rng);
        }
        let end = total_energy(&lattice, &spins, &params);
        assert!(end < start);
    }
}
