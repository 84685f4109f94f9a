use std::sync::atomic::AtomicBool;
use std::time::Instant;

use on_sim::config::{ModelParams, Schedule};
use on_sim::{run_chains_parallel, Chain, Lattice};

const L: usize = 64;
const SPIN_DIM: usize = 3;
const N_TEMPS: usize = 8;
const N_SWEEPS: usize = 50;

fn main() {
    let lattice = Lattice::hypercubic(2, L).unwrap();

    // Temperature ladder across the O(3) critical region.
    let temps: Vec<f64> = (0..N_TEMPS)
        .map(|i| 0.8 + 1.2 * i as f64 / (N_TEMPS - 1) as f64)
        .collect();

    let mut chains: Vec<Chain> = temps
        .iter()
        .enumerate()
        .map(|(i, &temp)| {
            let params = ModelParams {
                spin_dim: SPIN_DIM,
                coupling: 1.0,
                field: 0.0,
                temp,
            };
            Chain::new(&lattice, params, 42 + i as u64, false).unwrap()
        })
        .collect();

    let schedule = Schedule {
        warmup_sweeps: 0,
        sweeps_per_meas: 1,
        meas_per_bin: N_SWEEPS,
        n_bins: 1,
    };
    let interrupted = AtomicBool::new(false);

    println!(
        "Lattice: {L}x{L}  |  spinDim: {SPIN_DIM}  |  Temps: {N_TEMPS}  |  Sweeps: {N_SWEEPS}"
    );
    println!("{}", "-".repeat(70));

    let t0 = Instant::now();
    let outputs =
        run_chains_parallel(&lattice, &mut chains, &schedule, &interrupted, &|| {}).unwrap();
    let elapsed = t0.elapsed().as_secs_f64();

    for output in &outputs {
        print!("{}", String::from_utf8_lossy(output));
    }
    let per_sweep = elapsed / (N_SWEEPS * N_TEMPS) as f64 * 1000.0;
    println!("Total: {elapsed:.3} s  |  {per_sweep:.3} ms/sweep");
}
