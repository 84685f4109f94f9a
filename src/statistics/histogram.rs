use std::io::{self, Write};

use crate::clusters::WolffOutcome;

/// Cluster-size tallies: three parallel arrays indexed by `size − 1`.
///
/// Reset when warm-up completes so the recorded statistics cover only the
/// measurement phase. Every generated cluster lands in exactly one of the
/// accepted/rejected arrays.
pub struct ClusterHistogram {
    generated: Vec<u64>,
    accepted: Vec<u64>,
    rejected: Vec<u64>,
}

impl ClusterHistogram {
    pub fn new(n_sites: usize) -> Self {
        Self {
            generated: vec![0; n_sites],
            accepted: vec![0; n_sites],
            rejected: vec![0; n_sites],
        }
    }

    pub fn record(&mut self, outcome: &WolffOutcome) {
        let bucket = outcome.size - 1;
        self.generated[bucket] += 1;
        if outcome.accepted {
            self.accepted[bucket] += 1;
        } else {
            self.rejected[bucket] += 1;
        }
    }

    pub fn reset(&mut self) {
        self.generated.fill(0);
        self.accepted.fill(0);
        self.rejected.fill(0);
    }

    pub fn generated(&self) -> &[u64] {
        &self.generated
    }

    pub fn accepted(&self) -> &[u64] {
        &self.accepted
    }

    pub fn rejected(&self) -> &[u64] {
        &self.rejected
    }

    /// Total clusters recorded since the last reset.
    pub fn n_recorded(&self) -> u64 {
        self.generated.iter().sum()
    }

    /// Write the histogram table: a commented header, then one row per
    /// cluster size `1..=N`.
    pub fn write(&self, sink: &mut dyn Write, temp: f64) -> io::Result<()> {
        writeln!(
            sink,
            "# T \t clustSize \t num_generated \t num_accepted \t num_rejected"
        )?;
        for (i, ((&gen, &acc), &rej)) in self
            .generated
            .iter()
            .zip(&self.accepted)
            .zip(&self.rejected)
            .enumerate()
        {
            writeln!(sink, "{temp}\t{}\t{gen}\t{acc}\t{rej}", i + 1)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(size: usize, accepted: bool) -> WolffOutcome {
        WolffOutcome {
            size,
            accepted,
            onsite_delta: 0.0,
        }
    }

    #[test]
    fn test_record_partitions_into_accept_reject() {
        let mut hist = ClusterHistogram::new(4);
        hist.record(&outcome(1, true));
        hist.record(&outcome(3, false));
        hist.record(&outcome(3, true));

        assert_eq!(hist.generated(), &[1, 0, 2, 0]);
        assert_eq!(hist.accepted(), &[1, 0, 1, 0]);
        assert_eq!(hist.rejected(), &[0, 0, 1, 0]);
        assert_eq!(hist.n_recorded(), 3);

        let accepted_plus_rejected: u64 =
            hist.accepted().iter().sum::<u64>() + hist.rejected().iter().sum::<u64>();
        assert_eq!(accepted_plus_rejected, hist.n_recorded());
    }

    #[test]
    fn test_reset_clears_all_buckets() {
        let mut hist = ClusterHistogram::new(2);
        hist.record(&outcome(2, true));
        hist.reset();
        assert_eq!(hist.n_recorded(), 0);
        assert_eq!(hist.rejected(), &[0, 0]);
    }

    #[test]
    fn test_write_emits_header_and_one_row_per_size() {
        let mut hist = ClusterHistogram::new(3);
        hist.record(&outcome(2, false));
        let mut out = Vec::new();
        hist.write(&mut out, 1.5).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("# T"));
        assert_eq!(lines[2], "1.5\t2\t1\t0\t1");
    }
}
