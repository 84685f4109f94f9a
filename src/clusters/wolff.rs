use rand::distributions::Open01;
use rand::Rng;
use rand_xoshiro::Xoshiro256StarStar;

use crate::config::ModelParams;
use crate::geometry::Lattice;
use crate::spins::{SpinLattice, SpinVector};

use super::tracker::ClusterTracker;

/// What one Wolff move did. The caller owns counter and histogram
/// bookkeeping.
#[derive(Debug, Clone, Copy)]
pub struct WolffOutcome {
    /// Number of sites in the grown cluster.
    pub size: usize,
    /// Whether the flip was kept.
    pub accepted: bool,
    /// Onsite (field) energy change of the flip. Zero whenever `h == 0`;
    /// the exchange terms cancel by construction and never appear here.
    pub onsite_delta: f64,
}

/// One Wolff single-cluster move with the reflection axis restricted to the
/// embedding subspace `components[axis_start..=axis_end]`.
///
/// Grows the cluster by probabilistic bond activation, reflects it about the
/// axis, then accepts or rejects the whole flip on the onsite (field) energy
/// alone. The lattice is left in either the flipped or the original
/// configuration; the tracker is clean on return.
///
/// Bond activation: a popped site contributes bond weights as if it were
/// already flipped, so for neighbour `nb` the activation exponent is
/// `(2J/T)·(r·reflected(s))·(r·s_nb)`. Only `exponent < 0` can activate,
/// with probability `1 − exp(exponent)` and exactly one uniform draw per
/// candidate bond; already-visited neighbours cost no draw.
///
/// The accept step draws at most once regardless of cluster size: a cluster
/// with `ΔE_onsite ≤ 0` (in particular any cluster at `h = 0`) is kept
/// unconditionally, otherwise it is kept with probability
/// `exp(−ΔE_onsite/T)` and reflected back when the draw fails.
pub fn wolff_update(
    lattice: &Lattice,
    spins: &mut SpinLattice,
    params: &ModelParams,
    tracker: &mut ClusterTracker,
    axis_start: usize,
    axis_end: usize,
    rng: &mut Xoshiro256StarStar,
) -> WolffOutcome {
    let axis = SpinVector::random_unit_in_range(params.spin_dim, axis_start, axis_end, rng);
    let two_j_over_t = 2.0 * params.coupling / params.temp;

    let seed = rng.gen_range(0..lattice.n_sites);
    tracker.seed(seed);

    while let Some(site) = tracker.pop() {
        // The popped spin is not flipped yet; its bond weights use the state
        // it would have after the flip.
        let reflected = spins.get(site).reflected(&axis);
        let r_dot_ref = axis.dot(&reflected);

        for dir in 0..lattice.n_directions() {
            let neigh = lattice.neighbour(site, dir);
            if tracker.contains(neigh) {
                continue;
            }
            let exponent = two_j_over_t * r_dot_ref * axis.dot(spins.get(neigh));
            if exponent < 0.0 {
                let p_add = 1.0 - exponent.exp();
                let draw: f64 = rng.sample(Open01);
                if draw < p_add {
                    tracker.visit(neigh);
                }
            }
        }
    }

    let size = tracker.size();
    let energy_before = onsite_energy(spins, tracker.members(), params.field);
    reflect_members(spins, tracker.members(), &axis);
    let energy_after = onsite_energy(spins, tracker.members(), params.field);
    let onsite_delta = energy_after - energy_before;

    let accepted = if onsite_delta > 0.0 {
        let p_accept = (-onsite_delta / params.temp).exp();
        let draw: f64 = rng.sample(Open01);
        if draw >= p_accept {
            reflect_members(spins, tracker.members(), &axis);
            false
        } else {
            true
        }
    } else {
        true
    };

    tracker.finish();
    WolffOutcome {
        size,
        accepted,
        onsite_delta,
    }
}

/// Field part of the energy restricted to `members`: `−h·Σ s[0]`.
fn onsite_energy(spins: &SpinLattice, members: &[usize], field: f64) -> f64 {
    let first_sum: f64 = members
        .iter()
        .map(|&site| spins.get(site).component(0))
        .sum();
    -field * first_sum
}

fn reflect_members(spins: &mut SpinLattice, members: &[usize], axis: &SpinVector) {
    for &site in members {
        spins.get_mut(site).reflect(axis);
    }
}
