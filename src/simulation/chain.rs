use std::io::{self, Write};

use rand::SeedableRng;
use rand_xoshiro::Xoshiro256StarStar;

use crate::clusters::{wolff_update, ClusterTracker, WolffOutcome};
use crate::config::{ConfigError, ModelParams};
use crate::geometry::Lattice;
use crate::mcmc::{local_update, sweep, SweepStats};
use crate::spins::{energy, SpinLattice, SpinVector};
use crate::statistics::{ClusterHistogram, MeasurementSet};

/// Everything one Markov chain mutates: model parameters, the spin
/// configuration, cluster-growth buffers, the RNG stream, acceptance
/// counters, and measurement storage.
///
/// A chain shares nothing mutable with any other chain, so independent
/// chains may run on separate threads; within a chain every update is
/// strictly sequential.
pub struct Chain {
    params: ModelParams,
    spins: SpinLattice,
    tracker: ClusterTracker,
    rng: Xoshiro256StarStar,
    measures: MeasurementSet,
    n_accept_local: u64,
    n_accept_clust: u64,
    warmup_done: bool,
    clust_histogram: Option<ClusterHistogram>,
    header_written: bool,
}

impl Chain {
    /// Build a chain with a freshly randomized spin configuration and a
    /// deterministic RNG stream seeded from `seed`.
    pub fn new(
        lattice: &Lattice,
        params: ModelParams,
        seed: u64,
        track_clusters: bool,
    ) -> Result<Self, ConfigError> {
        let mut rng = Xoshiro256StarStar::seed_from_u64(seed);
        let spins = SpinLattice::random(lattice.n_sites, params.spin_dim, &mut rng)?;

        let mut measures = MeasurementSet::new();
        measures.insert("E");
        measures.insert("ESq");
        measures.insert("AccRate_local");
        measures.insert("AccRate_clust");

        Ok(Self {
            params,
            spins,
            tracker: ClusterTracker::new(lattice.n_sites),
            rng,
            measures,
            n_accept_local: 0,
            n_accept_clust: 0,
            warmup_done: false,
            clust_histogram: track_clusters.then(|| ClusterHistogram::new(lattice.n_sites)),
            header_written: false,
        })
    }

    pub fn params(&self) -> &ModelParams {
        &self.params
    }

    pub fn spins(&self) -> &SpinLattice {
        &self.spins
    }

    pub fn warmup_done(&self) -> bool {
        self.warmup_done
    }

    pub fn n_accept_local(&self) -> u64 {
        self.n_accept_local
    }

    pub fn n_accept_clust(&self) -> u64 {
        self.n_accept_clust
    }

    pub fn cluster_histogram(&self) -> Option<&ClusterHistogram> {
        self.clust_histogram.as_ref()
    }

    /// Change the temperature. Any completed warm-up is invalidated.
    pub fn set_temp(&mut self, temp: f64) {
        self.params.temp = temp;
        self.warmup_done = false;
    }

    /// Mark warm-up as complete and clear any cluster-size tallies so they
    /// cover only the measurement phase.
    pub fn mark_warmup_done(&mut self) {
        self.warmup_done = true;
        if let Some(hist) = &mut self.clust_histogram {
            hist.reset();
        }
    }

    /// Zero the measurement store and both acceptance counters (start of a
    /// measurement bin).
    pub fn zero_measurements(&mut self) {
        self.measures.zero();
        self.n_accept_local = 0;
        self.n_accept_clust = 0;
    }

    /// One single-spin Metropolis trial.
    pub fn local_update(&mut self, lattice: &Lattice) -> bool {
        let accepted = local_update(lattice, &mut self.spins, &self.params, &mut self.rng);
        if accepted {
            self.n_accept_local += 1;
        }
        accepted
    }

    /// One Wolff move with the reflection axis restricted to spin
    /// components `axis_start..=axis_end`.
    pub fn wolff_update(
        &mut self,
        lattice: &Lattice,
        axis_start: usize,
        axis_end: usize,
    ) -> WolffOutcome {
        let outcome = wolff_update(
            lattice,
            &mut self.spins,
            &self.params,
            &mut self.tracker,
            axis_start,
            axis_end,
            &mut self.rng,
        );
        self.tally_wolff(&outcome);
        outcome
    }

    /// One full sweep: `⌊N/2⌋` local updates, a full-range Wolff move, then
    /// the remaining local updates.
    pub fn sweep(&mut self, lattice: &Lattice) -> SweepStats {
        let stats = sweep(
            lattice,
            &mut self.spins,
            &self.params,
            &mut self.tracker,
            &mut self.rng,
        );
        self.n_accept_local += stats.local_accepts;
        self.tally_wolff(&stats.wolff);
        stats
    }

    fn tally_wolff(&mut self, outcome: &WolffOutcome) {
        if outcome.accepted {
            self.n_accept_clust += 1;
        }
        if let Some(hist) = &mut self.clust_histogram {
            hist.record(outcome);
        }
    }

    pub fn total_energy(&self, lattice: &Lattice) -> f64 {
        energy::total_energy(lattice, &self.spins, &self.params)
    }

    pub fn magnetization(&self) -> SpinVector {
        energy::magnetization(&self.spins)
    }

    /// Sample energy per site and its square into the measurement store.
    pub fn make_measurement(&mut self, lattice: &Lattice) {
        let energy_per_spin = self.total_energy(lattice) / lattice.n_sites as f64;
        self.measures.accumulate("E", energy_per_spin);
        self.measures.accumulate("ESq", energy_per_spin * energy_per_spin);
    }

    /// Write one bin row: `L, T, binNum` followed by each measurement's
    /// running average. The column-header row is written exactly once, on
    /// the first bin this chain writes.
    ///
    /// Acceptance counts enter as `count / (N · sweeps_per_meas)`; the final
    /// division by `n_meas` inside `write_averages` turns them into rates.
    pub fn write_bin(
        &mut self,
        sink: &mut dyn Write,
        lattice: &Lattice,
        bin_num: usize,
        n_meas: usize,
        sweeps_per_meas: usize,
    ) -> io::Result<()> {
        let denom = lattice.n_sites as f64 * sweeps_per_meas as f64;
        self.measures
            .accumulate("AccRate_local", self.n_accept_local as f64 / denom);
        self.measures
            .accumulate("AccRate_clust", self.n_accept_clust as f64 / denom);

        if !self.header_written {
            write!(sink, "# L \t T \t binNum")?;
            self.measures.write_names(sink)?;
            writeln!(sink)?;
            self.header_written = true;
        }

        write!(
            sink,
            "{}\t{}\t{}",
            lattice.linear_size(),
            self.params.temp,
            bin_num
        )?;
        self.measures.write_averages(sink, n_meas)?;
        writeln!(sink)
    }

    /// Write the cluster-size table. A no-op when tracking is disabled.
    pub fn write_cluster_histogram(&self, sink: &mut dyn Write) -> io::Result<()> {
        match &self.clust_histogram {
            Some(hist) => hist.write(sink, self.params.temp),
            None => Ok(()),
        }
    }
}
