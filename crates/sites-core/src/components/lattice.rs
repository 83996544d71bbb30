//! Lattice
//!
//! The 2D grid of sites. Owns every agent's trait vector; the engine borrows
//! it mutably one tick at a time.

use rand::Rng;

use crate::config::ConfigError;

use super::trait_vector::TraitVector;

/// Lattice coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Site {
    pub x: usize,
    pub y: usize,
}

impl Site {
    pub fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

/// In-bounds 4-connected neighbors of a site, in left, right, up, down order.
#[derive(Debug, Clone, Copy)]
pub struct Neighbors {
    sites: [Site; 4],
    len: usize,
}

impl Neighbors {
    fn push(&mut self, site: Site) {
        self.sites[self.len] = site;
        self.len += 1;
    }

    pub fn as_slice(&self) -> &[Site] {
        &self.sites[..self.len]
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Fixed-size grid of trait vectors, stored row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct Lattice {
    width: usize,
    height: usize,
    dimensions: usize,
    sites: Vec<TraitVector>,
}

impl Lattice {
    /// Builds a lattice, drawing each value from `sample`.
    ///
    /// Values are drawn row by row, and within a site in dimension order.
    pub fn from_fn(
        width: usize,
        height: usize,
        dimensions: usize,
        mut sample: impl FnMut() -> f64,
    ) -> Result<Self, ConfigError> {
        Self::check_shape(width, height, dimensions)?;
        let sites = (0..width * height)
            .map(|_| TraitVector::new((0..dimensions).map(|_| sample()).collect()))
            .collect();
        Ok(Self {
            width,
            height,
            dimensions,
            sites,
        })
    }

    /// Builds a lattice with every value set to `value`.
    pub fn filled(
        width: usize,
        height: usize,
        dimensions: usize,
        value: f64,
    ) -> Result<Self, ConfigError> {
        Self::from_fn(width, height, dimensions, || value)
    }

    /// Builds a lattice from explicit row-major trait vectors.
    pub fn from_sites(
        width: usize,
        height: usize,
        sites: Vec<TraitVector>,
    ) -> Result<Self, ConfigError> {
        let dimensions = sites.first().map(TraitVector::len).unwrap_or(0);
        Self::check_shape(width, height, dimensions)?;
        if sites.len() != width * height {
            return Err(ConfigError::SiteCountMismatch {
                expected: width * height,
                actual: sites.len(),
            });
        }
        if let Some((index, traits)) = sites
            .iter()
            .enumerate()
            .find(|(_, t)| t.len() != dimensions)
        {
            return Err(ConfigError::DimensionMismatch {
                index,
                expected: dimensions,
                actual: traits.len(),
            });
        }
        Ok(Self {
            width,
            height,
            dimensions,
            sites,
        })
    }

    fn check_shape(width: usize, height: usize, dimensions: usize) -> Result<(), ConfigError> {
        if width == 0 || height == 0 {
            return Err(ConfigError::EmptyLattice { width, height });
        }
        if width * height < 2 {
            return Err(ConfigError::TooFewSites {
                sites: width * height,
            });
        }
        if dimensions == 0 {
            return Err(ConfigError::NoDimensions);
        }
        Ok(())
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Trait dimensionality D.
    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    pub fn site_count(&self) -> usize {
        self.sites.len()
    }

    pub fn contains(&self, site: Site) -> bool {
        site.x < self.width && site.y < self.height
    }

    fn index_of(&self, site: Site) -> Option<usize> {
        self.contains(site).then(|| site.y * self.width + site.x)
    }

    pub fn get(&self, site: Site) -> Option<&TraitVector> {
        let i = self.index_of(site)?;
        Some(&self.sites[i])
    }

    pub fn get_mut(&mut self, site: Site) -> Option<&mut TraitVector> {
        let i = self.index_of(site)?;
        Some(&mut self.sites[i])
    }

    pub fn trait_at(&self, x: usize, y: usize) -> Option<&TraitVector> {
        self.get(Site::new(x, y))
    }

    /// All sites with their trait vectors, row-major.
    pub fn iter(&self) -> impl Iterator<Item = (Site, &TraitVector)> + '_ {
        self.sites
            .iter()
            .enumerate()
            .map(|(i, traits)| (Site::new(i % self.width, i / self.width), traits))
    }

    /// Every 4-neighbor edge once, as (site, right or lower neighbor).
    pub fn edges(&self) -> impl Iterator<Item = (Site, Site)> + '_ {
        let (width, height) = (self.width, self.height);
        (0..height).flat_map(move |y| {
            (0..width).flat_map(move |x| {
                let right = (x + 1 < width).then(|| (Site::new(x, y), Site::new(x + 1, y)));
                let down = (y + 1 < height).then(|| (Site::new(x, y), Site::new(x, y + 1)));
                right.into_iter().chain(down)
            })
        })
    }

    /// Uniformly random site; x is drawn before y.
    pub fn random_site<R: Rng + ?Sized>(&self, rng: &mut R) -> Site {
        let x = rng.gen_range(0..self.width);
        let y = rng.gen_range(0..self.height);
        Site::new(x, y)
    }

    pub fn neighbors(&self, site: Site) -> Neighbors {
        let mut neighbors = Neighbors {
            sites: [site; 4],
            len: 0,
        };
        if site.x > 0 {
            neighbors.push(Site::new(site.x - 1, site.y));
        }
        if site.x + 1 < self.width {
            neighbors.push(Site::new(site.x + 1, site.y));
        }
        if site.y > 0 {
            neighbors.push(Site::new(site.x, site.y - 1));
        }
        if site.y + 1 < self.height {
            neighbors.push(Site::new(site.x, site.y + 1));
        }
        neighbors
    }

    /// Uniformly random 4-connected neighbor of `site`.
    ///
    /// Construction guarantees at least two sites, so every in-bounds site has
    /// at least one neighbor.
    pub fn random_neighbor<R: Rng + ?Sized>(&self, site: Site, rng: &mut R) -> Site {
        let neighbors = self.neighbors(site);
        let candidates = neighbors.as_slice();
        debug_assert!(!candidates.is_empty(), "site {:?} has no neighbors", site);
        candidates[rng.gen_range(0..candidates.len())]
    }

    /// Mutable access to `active` alongside shared access to `other`.
    ///
    /// Returns `None` if the sites coincide or either is out of bounds.
    pub fn pair_mut(&mut self, active: Site, other: Site) -> Option<(&mut TraitVector, &TraitVector)> {
        let a = self.index_of(active)?;
        let b = self.index_of(other)?;
        if a < b {
            let (lo, hi) = self.sites.split_at_mut(b);
            Some((&mut lo[a], &hi[0]))
        } else if a > b {
            let (lo, hi) = self.sites.split_at_mut(a);
            Some((&mut hi[0], &lo[b]))
        } else {
            None
        }
    }

    /// True when every value of every site lies in [0, 1].
    pub fn is_normalized(&self) -> bool {
        self.sites.iter().all(TraitVector::is_normalized)
    }
}
