pub mod chain;

pub use chain::Chain;

use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};

use rayon::prelude::*;
use thiserror::Error;

use crate::config::Schedule;
use crate::geometry::Lattice;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("interrupted")]
    Interrupted,
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Run warm-up plus the full bin loop for one [`Chain`].
///
/// Structure: `warmup_sweeps` sweeps, then `n_bins` bins of
/// `meas_per_bin × sweeps_per_meas` sweeps with a measurement after each
/// group of `sweeps_per_meas` and one output row per bin. Measurements and
/// acceptance counters are zeroed at each bin start. `on_sweep` is called
/// once per sweep (useful for progress bars); output goes to the explicit
/// `sink`, only at bin boundaries.
pub fn run_bin_loop(
    lattice: &Lattice,
    chain: &mut Chain,
    schedule: &Schedule,
    sink: &mut dyn Write,
    interrupted: &AtomicBool,
    on_sweep: &(dyn Fn() + Sync),
) -> Result<(), SimError> {
    for _ in 0..schedule.warmup_sweeps {
        if interrupted.load(Ordering::Relaxed) {
            return Err(SimError::Interrupted);
        }
        chain.sweep(lattice);
        on_sweep();
    }
    chain.mark_warmup_done();

    for bin_num in 1..=schedule.n_bins {
        chain.zero_measurements();
        for _ in 0..schedule.meas_per_bin {
            for _ in 0..schedule.sweeps_per_meas {
                if interrupted.load(Ordering::Relaxed) {
                    return Err(SimError::Interrupted);
                }
                chain.sweep(lattice);
                on_sweep();
            }
            chain.make_measurement(lattice);
        }
        chain.write_bin(
            sink,
            lattice,
            bin_num,
            schedule.meas_per_bin,
            schedule.sweeps_per_meas,
        )?;
    }
    Ok(())
}

/// Run the bin loop over fully independent chains, one rayon task each.
///
/// Chains share the (immutable) lattice and nothing else: each owns its
/// spins, cluster buffers, and RNG stream, so this is safe exactly at
/// per-chain granularity. Each chain writes into its own buffer, returned
/// in chain order. A single chain runs on the current thread, skipping the
/// thread-pool overhead.
pub fn run_chains_parallel(
    lattice: &Lattice,
    chains: &mut [Chain],
    schedule: &Schedule,
    interrupted: &AtomicBool,
    on_sweep: &(dyn Fn() + Sync),
) -> Result<Vec<Vec<u8>>, SimError> {
    if chains.len() == 1 {
        let mut sink = Vec::new();
        run_bin_loop(lattice, &mut chains[0], schedule, &mut sink, interrupted, on_sweep)?;
        return Ok(vec![sink]);
    }

    let results: Vec<Result<Vec<u8>, SimError>> = chains
        .par_iter_mut()
        .map(|chain| {
            let mut sink = Vec::new();
            run_bin_loop(lattice, chain, schedule, &mut sink, interrupted, on_sweep)?;
            Ok(sink)
        })
        .collect();

    results.into_iter().collect()
}
