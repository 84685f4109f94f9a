use std::io::{self, Write};

/// Named running-sum store for scalar observables, in insertion order.
///
/// Each bin accumulates raw values; the average over the bin is formed only
/// when [`write_averages`](Self::write_averages) divides by the caller's
/// measurement count. Accumulating into an unregistered name is a
/// programming error and panics.
pub struct MeasurementSet {
    names: Vec<String>,
    totals: Vec<f64>,
}

impl MeasurementSet {
    pub fn new() -> Self {
        Self {
            names: Vec::new(),
            totals: Vec::new(),
        }
    }

    /// Register a measurement name. Later writes emit columns in
    /// registration order.
    pub fn insert(&mut self, name: &str) {
        debug_assert!(!self.names.iter().any(|n| n == name));
        self.names.push(name.to_string());
        self.totals.push(0.0);
    }

    /// Reset every running total to zero (start of a bin).
    pub fn zero(&mut self) {
        self.totals.fill(0.0);
    }

    pub fn accumulate(&mut self, name: &str, value: f64) {
        let idx = self
            .names
            .iter()
            .position(|n| n == name)
            .unwrap_or_else(|| panic!("unknown measurement '{name}'"));
        self.totals[idx] += value;
    }

    /// Current running total for `name`, mainly for tests and diagnostics.
    pub fn total(&self, name: &str) -> Option<f64> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|idx| self.totals[idx])
    }

    /// Write one tab-prefixed column label per measurement.
    pub fn write_names(&self, sink: &mut dyn Write) -> io::Result<()> {
        for name in &self.names {
            write!(sink, "\t{name}")?;
        }
        Ok(())
    }

    /// Write one tab-prefixed running average per measurement, dividing each
    /// total by `count`.
    pub fn write_averages(&self, sink: &mut dyn Write, count: usize) -> io::Result<()> {
        for &total in &self.totals {
            write!(sink, "\t{}", total / count as f64)?;
        }
        Ok(())
    }
}

impl Default for MeasurementSet {
    fn default() -> Self {
        Self::new()
    }
}
