use rand::Rng;

use crate::config::ConfigError;

use super::vector::SpinVector;

/// The spin configuration: one unit vector per lattice site.
///
/// Exclusively owned and mutated by one chain. Spins are replaced or
/// reflected in place per update; sites are never added or removed after
/// construction.
#[derive(Clone)]
pub struct SpinLattice {
    spin_dim: usize,
    spins: Vec<SpinVector>,
}

impl SpinLattice {
    /// Build a configuration of `n_sites` independent random unit spins.
    pub fn random(
        n_sites: usize,
        spin_dim: usize,
        rng: &mut impl Rng,
    ) -> Result<Self, ConfigError> {
        if spin_dim < 2 {
            return Err(ConfigError::Model(format!(
                "spin dimension must be >= 2, got {spin_dim}"
            )));
        }
        if n_sites == 0 {
            return Err(ConfigError::Model("spin lattice has no sites".into()));
        }
        let mut lattice = Self {
            spin_dim,
            spins: vec![SpinVector::zero(spin_dim); n_sites],
        };
        lattice.randomize(rng);
        Ok(lattice)
    }

    #[inline]
    pub fn spin_dim(&self) -> usize {
        self.spin_dim
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.spins.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.spins.is_empty()
    }

    #[inline]
    pub fn get(&self, site: usize) -> &SpinVector {
        &self.spins[site]
    }

    #[inline]
    pub fn get_mut(&mut self, site: usize) -> &mut SpinVector {
        &mut self.spins[site]
    }

    /// Overwrite the spin at `site`; the previous value is discarded.
    #[inline]
    pub fn replace(&mut self, site: usize, new_spin: SpinVector) {
        debug_assert_eq!(new_spin.spin_dim(), self.spin_dim);
        self.spins[site] = new_spin;
    }

    /// Re-draw every site as an independent random unit vector.
    pub fn randomize(&mut self, rng: &mut impl Rng) {
        for spin in &mut self.spins {
            *spin = SpinVector::random_unit(self.spin_dim, rng);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256StarStar;

    #[test]
    fn test_random_lattice_is_normalized() {
        let mut rng = Xoshiro256StarStar::seed_from_u64(7);
        let spins = SpinLattice::random(64, 3, &mut rng).unwrap();
        assert_eq!(spins.len(), 64);
        for site in 0..spins.len() {
            assert!((spins.get(site).norm() - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_replace_overwrites_slot() {
        let mut rng = Xoshiro256StarStar::seed_from_u64(8);
        let mut spins = SpinLattice::random(4, 2, &mut rng).unwrap();
        let new_spin = SpinVector::random_unit(2, &mut rng);
        spins.replace(2, new_spin.clone());
        assert_eq!(spins.get(2), &new_spin);
    }

    #[test]
    fn test_ising_dimension_rejected() {
        let mut rng = Xoshiro256StarStar::seed_from_u64(9);
        assert!(SpinLattice::random(4, 1, &mut rng).is_err());
        assert!(SpinLattice::random(0, 2, &mut rng).is_err());
    }
}
