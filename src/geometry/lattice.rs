use crate::config::ConfigError;

/// Forward offsets of a hypercubic lattice: the unit vector along each
/// dimension, giving coordination number `2 * n_dims`.
pub fn hypercubic(n_dims: usize) -> Vec<Vec<isize>> {
    (0..n_dims)
        .map(|d| {
            let mut v = vec![0isize; n_dims];
            v[d] = 1;
            v
        })
        .collect()
}

/// Forward offsets `[1,0], [0,1], [1,-1]` of the 2D triangular lattice
/// (coordination number 6).
pub fn triangular() -> Vec<Vec<isize>> {
    vec![vec![1, 0], vec![0, 1], vec![1, -1]]
}

/// Periodic Bravais lattice with a precomputed neighbour table.
///
/// Sites are indexed in row-major (C) order. The neighbour table is a flat
/// array of length `n_sites * 2 * n_offsets`, where element
/// `site * 2 * n_offsets + dir` is the site reached from `site` along
/// direction `dir`. Directions `0..n_offsets` follow the forward offsets,
/// directions `n_offsets..2*n_offsets` their negations, so for a hypercubic
/// lattice direction `d` is forward along dimension `d` and direction
/// `d + n_dims` is backward along the same dimension.
pub struct Lattice {
    /// Extent along each dimension (e.g. `[8, 8, 8]`).
    pub shape: Vec<usize>,
    /// Row-major strides: `strides[d] = product of shape[d+1..]`.
    pub strides: Vec<usize>,
    /// Total number of sites (`shape.iter().product()`).
    pub n_sites: usize,
    /// Number of spatial dimensions (`shape.len()`).
    pub n_dims: usize,
    /// Number of forward neighbour directions per site.
    pub n_offsets: usize,
    neighbours: Vec<u32>,
}

impl Lattice {
    /// Create a D-dimensional hypercubic torus with linear size `l` per side.
    pub fn hypercubic(n_dims: usize, l: usize) -> Result<Self, ConfigError> {
        Self::with_offsets(vec![l; n_dims], hypercubic(n_dims))
    }

    /// Create a lattice with arbitrary forward neighbour offsets.
    ///
    /// Each offset is a displacement in lattice coordinates of length
    /// `n_dims`; the backward neighbour is its negation. Periodic boundary
    /// conditions are applied via `rem_euclid`.
    pub fn with_offsets(shape: Vec<usize>, offsets: Vec<Vec<isize>>) -> Result<Self, ConfigError> {
        let n_dims = shape.len();
        let n_offsets = offsets.len();

        if n_dims == 0 {
            return Err(ConfigError::Geometry("lattice shape is empty".into()));
        }
        if let Some(d) = shape.iter().position(|&l| l == 0) {
            return Err(ConfigError::Geometry(format!(
                "lattice extent along dimension {d} is zero"
            )));
        }
        if n_offsets == 0 {
            return Err(ConfigError::Geometry("no neighbour offsets given".into()));
        }
        for (idx, off) in offsets.iter().enumerate() {
            if off.len() != n_dims {
                return Err(ConfigError::Geometry(format!(
                    "offset {idx} has length {}, expected {n_dims}",
                    off.len()
                )));
            }
        }

        let n_sites: usize = shape.iter().product();
        if n_sites > u32::MAX as usize {
            return Err(ConfigError::Geometry(format!(
                "lattice has {n_sites} sites, more than the neighbour table can index"
            )));
        }

        let mut strides = vec![1usize; n_dims];
        for d in (0..n_dims.saturating_sub(1)).rev() {
            strides[d] = strides[d + 1] * shape[d + 1];
        }

        let n_dirs = 2 * n_offsets;
        let mut neighbours = vec![0u32; n_sites * n_dirs];

        for site in 0..n_sites {
            let coords: Vec<usize> = (0..n_dims).map(|d| (site / strides[d]) % shape[d]).collect();

            for (d, off) in offsets.iter().enumerate() {
                for (block, sign) in [(0, 1isize), (n_offsets, -1isize)] {
                    let mut flat = 0usize;
                    for dim in 0..n_dims {
                        let c = (coords[dim] as isize + sign * off[dim])
                            .rem_euclid(shape[dim] as isize)
                            as usize;
                        flat += c * strides[dim];
                    }
                    neighbours[site * n_dirs + block + d] = flat as u32;
                }
            }
        }

        Ok(Self {
            shape,
            strides,
            n_sites,
            n_dims,
            n_offsets,
            neighbours,
        })
    }

    /// Total number of directions per site (forward and backward).
    #[inline]
    pub fn n_directions(&self) -> usize {
        2 * self.n_offsets
    }

    /// Return the neighbour of `site` along direction `dir`.
    ///
    /// Directions `0..n_offsets` are forward, `n_offsets..2*n_offsets`
    /// backward.
    #[inline]
    pub fn neighbour(&self, site: usize, dir: usize) -> usize {
        self.neighbours[site * 2 * self.n_offsets + dir] as usize
    }

    /// Linear size along the first dimension (what the bin output reports).
    #[inline]
    pub fn linear_size(&self) -> usize {
        self.shape[0]
    }
}
