use rand::Rng;
use rand_distr::StandardNormal;

/// A spin: unit vector in `spin_dim`-dimensional real space.
///
/// Every vector observable from outside an update has Euclidean norm 1.
/// Reflections renormalize after the transform so repeated cluster flips do
/// not accumulate float drift.
#[derive(Debug, Clone, PartialEq)]
pub struct SpinVector {
    components: Vec<f64>,
}

impl SpinVector {
    /// All-zero vector, used as an accumulator for neighbour sums and
    /// magnetization. Not a valid spin until something is added to it.
    pub fn zero(spin_dim: usize) -> Self {
        Self {
            components: vec![0.0; spin_dim],
        }
    }

    /// Uniformly random direction on the full unit hypersphere.
    pub fn random_unit(spin_dim: usize, rng: &mut impl Rng) -> Self {
        Self::random_unit_in_range(spin_dim, 0, spin_dim - 1, rng)
    }

    /// Uniformly random direction on the sub-sphere spanned by components
    /// `start..=end`; components outside the range are exactly zero.
    ///
    /// Independent Gaussian components within the range, normalized. A
    /// degenerate draw (norm numerically zero) is re-drawn.
    pub fn random_unit_in_range(
        spin_dim: usize,
        start: usize,
        end: usize,
        rng: &mut impl Rng,
    ) -> Self {
        debug_assert!(start <= end && end < spin_dim);
        let mut components = vec![0.0; spin_dim];
        loop {
            let mut norm_sq = 0.0;
            for c in &mut components[start..=end] {
                let g: f64 = rng.sample(StandardNormal);
                *c = g;
                norm_sq += g * g;
            }
            if norm_sq > f64::EPSILON {
                let inv = 1.0 / norm_sq.sqrt();
                for c in &mut components[start..=end] {
                    *c *= inv;
                }
                return Self { components };
            }
        }
    }

    #[inline]
    pub fn spin_dim(&self) -> usize {
        self.components.len()
    }

    #[inline]
    pub fn component(&self, i: usize) -> f64 {
        self.components[i]
    }

    /// Inner product, O(spin_dim).
    #[inline]
    pub fn dot(&self, other: &Self) -> f64 {
        self.components
            .iter()
            .zip(&other.components)
            .map(|(a, b)| a * b)
            .sum()
    }

    /// Componentwise accumulation.
    #[inline]
    pub fn accumulate(&mut self, other: &Self) {
        for (c, &o) in self.components.iter_mut().zip(&other.components) {
            *c += o;
        }
    }

    #[inline]
    pub fn norm(&self) -> f64 {
        self.dot(self).sqrt()
    }

    fn normalize(&mut self) {
        let inv = 1.0 / self.norm();
        for c in &mut self.components {
            *c *= inv;
        }
    }

    /// In-place reflection through the hyperplane orthogonal to `axis`:
    /// `s ← s − 2(s·axis)·axis`, then renormalize.
    ///
    /// `axis` must be a unit vector. Reflecting twice about the same axis
    /// restores the original vector within float tolerance.
    pub fn reflect(&mut self, axis: &Self) {
        let proj = 2.0 * self.dot(axis);
        for (c, &a) in self.components.iter_mut().zip(&axis.components) {
            *c -= proj * a;
        }
        self.normalize();
    }

    /// Non-mutating variant of [`reflect`](Self::reflect), used to preview a
    /// flip before committing it.
    pub fn reflected(&self, axis: &Self) -> Self {
        let mut copy = self.clone();
        copy.reflect(axis);
        copy
    }
}
