use rand_xoshiro::Xoshiro256StarStar;

use crate::clusters::{wolff_update, ClusterTracker, WolffOutcome};
use crate::config::ModelParams;
use crate::geometry::Lattice;
use crate::spins::SpinLattice;

use super::local::local_update;

/// Per-sweep bookkeeping returned to the caller.
#[derive(Debug, Clone, Copy)]
pub struct SweepStats {
    /// Accepted local moves out of the N attempted this sweep.
    pub local_accepts: u64,
    /// Outcome of the sweep's single Wolff move.
    pub wolff: WolffOutcome,
}

/// One sweep: `⌊N/2⌋` local updates, one Wolff update over the full
/// embedding range, then the remaining `N − ⌊N/2⌋` local updates.
///
/// The cluster move decorrelates long-range order near criticality; the
/// interleaved local moves supply cheap supplementary mixing and a local
/// acceptance statistic.
pub fn sweep(
    lattice: &Lattice,
    spins: &mut SpinLattice,
    params: &ModelParams,
    tracker: &mut ClusterTracker,
    rng: &mut Xoshiro256StarStar,
) -> SweepStats {
    let n_before = lattice.n_sites / 2;
    let n_after = lattice.n_sites - n_before;

    let mut local_accepts = 0;
    for _ in 0..n_before {
        if local_update(lattice, spins, params, rng) {
            local_accepts += 1;
        }
    }

    let wolff = wolff_update(
        lattice,
        spins,
        params,
        tracker,
        0,
        params.spin_dim - 1,
        rng,
    );

    for _ in 0..n_after {
        if local_update(lattice, spins, params, rng) {
            local_accepts += 1;
        }
    }

    SweepStats {
        local_accepts,
        wolff,
    }
}
