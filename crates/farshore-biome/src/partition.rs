//! Procedural partition generator: a jittered square lattice of seed
//! points whose cells are classified by noise-driven elevation and
//! moisture fields.
//!
//! Water connectivity decides between ocean and inland water, a
//! first-match climate table covers the land categories, and a shoreline
//! pass retags land cells that border water.

use glam::DVec2;
use noise::{NoiseFn, Simplex};
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::VecDeque;
use thiserror::Error;

use crate::{BiomeCategory, BiomeGraph, GraphError, Region, RegionId};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Multi-octave simplex parameters for the elevation field.
///
/// Output is normalized by the geometric amplitude sum, so elevation is
/// always in `[0.0, 1.0]` regardless of octave count.
#[derive(Clone, Debug)]
pub struct FbmParams {
    /// Number of noise octaves to composite.
    pub octaves: u32,
    /// Frequency multiplier between successive octaves.
    pub lacunarity: f64,
    /// Amplitude multiplier between successive octaves.
    pub persistence: f64,
    /// Frequency of the first octave. Controls the spatial scale of the
    /// broadest landmasses.
    pub base_frequency: f64,
}

impl Default for FbmParams {
    fn default() -> Self {
        Self {
            octaves: 5,
            lacunarity: 2.0,
            persistence: 0.5,
            base_frequency: 0.0005,
        }
    }
}

/// Configuration for [`generate_partition`].
#[derive(Clone, Debug)]
pub struct PartitionConfig {
    /// World seed. Two runs with equal configuration produce identical
    /// graphs.
    pub seed: u64,
    /// Lattice size per axis; the graph has `cells_per_axis^2` regions.
    pub cells_per_axis: u32,
    /// Lattice pitch in world units.
    pub cell_spacing: f64,
    /// Seed-point wander as a fraction of the spacing, in `[0.0, 0.5]`.
    /// Zero yields a perfect grid.
    pub jitter: f64,
    /// Normalized elevation below which a cell is water.
    pub sea_level: f64,
    /// Elevation band above sea level in which an ocean-bordering cell
    /// reads as beach rather than coast.
    pub shore_band: f64,
    /// Elevation field parameters.
    pub elevation: FbmParams,
    /// Frequency of the moisture field.
    pub moisture_frequency: f64,
}

impl Default for PartitionConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            cells_per_axis: 32,
            cell_spacing: 400.0,
            jitter: 0.35,
            sea_level: 0.42,
            shore_band: 0.04,
            elevation: FbmParams::default(),
            moisture_frequency: 0.0007,
        }
    }
}

/// Errors raised for configurations that cannot describe a lattice.
#[derive(Debug, Error, PartialEq)]
pub enum PartitionError {
    #[error("cells_per_axis must be at least 1")]
    ZeroCells,
    #[error("cell_spacing must be positive, got {0}")]
    NonPositiveSpacing(f64),
    #[error("jitter must lie in [0.0, 0.5], got {0}")]
    JitterOutOfRange(f64),
    #[error(transparent)]
    Graph(#[from] GraphError),
}

// ---------------------------------------------------------------------------
// Climate table
// ---------------------------------------------------------------------------

/// A rectangular band in relative-elevation and moisture space mapped to
/// a land category. First match wins.
struct ClimateBand {
    elev_min: f64,
    elev_max: f64,
    moisture_min: f64,
    biome: BiomeCategory,
}

/// Land classification, highest cells first. `elev` here is relative
/// height above sea level rescaled to `[0.0, 1.0]`. Bands within one
/// elevation zone are ordered wettest first, so `moisture_min` alone
/// selects the band.
const LAND_BANDS: [ClimateBand; 14] = [
    band(0.75, 1.01, 0.50, BiomeCategory::Snow),
    band(0.75, 1.01, 0.33, BiomeCategory::Tundra),
    band(0.75, 1.01, 0.16, BiomeCategory::Bare),
    band(0.75, 1.01, 0.00, BiomeCategory::Scorched),
    band(0.50, 0.75, 0.66, BiomeCategory::Taiga),
    band(0.50, 0.75, 0.33, BiomeCategory::Shrubland),
    band(0.50, 0.75, 0.00, BiomeCategory::TemperateDesert),
    band(0.25, 0.50, 0.83, BiomeCategory::TemperateRainForest),
    band(0.25, 0.50, 0.50, BiomeCategory::TemperateDeciduousForest),
    band(0.25, 0.50, 0.16, BiomeCategory::Grassland),
    band(0.25, 0.50, 0.00, BiomeCategory::TemperateDesert),
    band(0.00, 0.25, 0.66, BiomeCategory::TropicalRainForest),
    band(0.00, 0.25, 0.33, BiomeCategory::TropicalSeasonalForest),
    band(0.00, 0.25, 0.16, BiomeCategory::Grassland),
];

const fn band(elev_min: f64, elev_max: f64, moisture_min: f64, biome: BiomeCategory) -> ClimateBand {
    ClimateBand {
        elev_min,
        elev_max,
        moisture_min,
        biome,
    }
}

fn classify_land(relative_elevation: f64, moisture: f64) -> BiomeCategory {
    for band in &LAND_BANDS {
        if relative_elevation >= band.elev_min
            && relative_elevation < band.elev_max
            && moisture >= band.moisture_min
        {
            return band.biome;
        }
    }
    BiomeCategory::SubtropicalDesert
}

/// Inland water classification by depth: shallow water silts into marsh,
/// the highest enclosed basins freeze over.
fn classify_inland_water(relative_depth: f64) -> BiomeCategory {
    if relative_depth < 0.35 {
        BiomeCategory::Marsh
    } else if relative_depth > 0.8 {
        BiomeCategory::Ice
    } else {
        BiomeCategory::Lake
    }
}

// ---------------------------------------------------------------------------
// Generator
// ---------------------------------------------------------------------------

struct FieldSampler {
    elevation_noise: Simplex,
    moisture_noise: Simplex,
    elevation: FbmParams,
    moisture_frequency: f64,
}

impl FieldSampler {
    fn new(config: &PartitionConfig) -> Self {
        // Decorrelate the two fields by deriving distinct seeds.
        Self {
            elevation_noise: Simplex::new(config.seed as u32),
            moisture_noise: Simplex::new(config.seed.wrapping_add(0xDEAD_BEEF) as u32),
            elevation: config.elevation.clone(),
            moisture_frequency: config.moisture_frequency,
        }
    }

    /// Normalized elevation in `[0.0, 1.0]`.
    fn elevation(&self, point: DVec2) -> f64 {
        let mut total = 0.0;
        let mut max_amplitude = 0.0;
        let mut frequency = self.elevation.base_frequency;
        let mut amplitude = 1.0;

        for _ in 0..self.elevation.octaves {
            total += self.elevation_noise.get([point.x * frequency, point.y * frequency]) * amplitude;
            max_amplitude += amplitude;
            frequency *= self.elevation.lacunarity;
            amplitude *= self.elevation.persistence;
        }

        if max_amplitude == 0.0 {
            return 0.5;
        }
        (total / max_amplitude + 1.0) * 0.5
    }

    /// Normalized moisture in `[0.0, 1.0]`.
    fn moisture(&self, point: DVec2) -> f64 {
        let raw = self.moisture_noise.get([
            point.x * self.moisture_frequency,
            point.y * self.moisture_frequency,
        ]);
        (raw + 1.0) * 0.5
    }
}

fn cell_seed(seed: u64, i: u32, j: u32) -> u64 {
    let packed = ((i as u64) << 32) | j as u64;
    seed ^ packed.wrapping_mul(0x9E37_79B9_7F4A_7C15)
}

/// Generates a biome graph from a jittered lattice of seed points.
///
/// The lattice is centered on the origin. Region ids are row-major over
/// the lattice, and adjacency is the eight surrounding lattice cells, so
/// the graph invariants hold by construction.
///
/// # Errors
///
/// Returns a [`PartitionError`] when the configuration describes no
/// lattice (zero cells, non-positive spacing, jitter outside
/// `[0.0, 0.5]`).
pub fn generate_partition(config: &PartitionConfig) -> Result<BiomeGraph, PartitionError> {
    if config.cells_per_axis == 0 {
        return Err(PartitionError::ZeroCells);
    }
    if !(config.cell_spacing > 0.0) {
        return Err(PartitionError::NonPositiveSpacing(config.cell_spacing));
    }
    if !(0.0..=0.5).contains(&config.jitter) {
        return Err(PartitionError::JitterOutOfRange(config.jitter));
    }

    let n = config.cells_per_axis as usize;
    let spacing = config.cell_spacing;
    let half = (n as f64 - 1.0) * 0.5;
    let max_offset = config.jitter * spacing;
    let sampler = FieldSampler::new(config);

    // Seed points, then raw fields per cell.
    let mut centers = Vec::with_capacity(n * n);
    let mut elevations = Vec::with_capacity(n * n);
    for j in 0..n {
        for i in 0..n {
            let mut rng = ChaCha8Rng::seed_from_u64(cell_seed(config.seed, i as u32, j as u32));
            let offset = if max_offset > 0.0 {
                DVec2::new(
                    rng.random_range(-max_offset..=max_offset),
                    rng.random_range(-max_offset..=max_offset),
                )
            } else {
                DVec2::ZERO
            };
            let center = DVec2::new(
                (i as f64 - half) * spacing + offset.x,
                (j as f64 - half) * spacing + offset.y,
            );
            elevations.push(sampler.elevation(center));
            centers.push(center);
        }
    }

    let water: Vec<bool> = elevations.iter().map(|e| *e < config.sea_level).collect();
    let ocean = flood_ocean(n, &water);

    // Classify every cell.
    let mut biomes = Vec::with_capacity(n * n);
    for index in 0..n * n {
        let elevation = elevations[index];
        let biome = if ocean[index] {
            BiomeCategory::Ocean
        } else if water[index] {
            let relative_depth = if config.sea_level > 0.0 {
                1.0 - elevation / config.sea_level
            } else {
                0.0
            };
            classify_inland_water(relative_depth)
        } else {
            let relative = (elevation - config.sea_level) / (1.0 - config.sea_level).max(f64::EPSILON);
            classify_land(relative.clamp(0.0, 1.0), sampler.moisture(centers[index]))
        };
        biomes.push(biome);
    }

    // Shoreline pass: land cells bordering water become shore categories.
    // Ocean frontage wins over lake frontage.
    let mut shored = biomes.clone();
    for index in 0..n * n {
        if water[index] {
            continue;
        }
        let mut touches_ocean = false;
        let mut touches_inland = false;
        for neighbor in lattice_neighbors(n, index) {
            if ocean[neighbor] {
                touches_ocean = true;
            } else if water[neighbor] {
                touches_inland = true;
            }
        }
        if touches_ocean {
            shored[index] = if elevations[index] - config.sea_level < config.shore_band {
                BiomeCategory::Beach
            } else {
                BiomeCategory::Coast
            };
        } else if touches_inland {
            shored[index] = BiomeCategory::Lakeshore;
        }
    }

    let regions = (0..n * n)
        .map(|index| Region {
            id: RegionId(index as u32),
            center: centers[index],
            biome: shored[index],
            neighbors: lattice_neighbors(n, index)
                .map(|neighbor| RegionId(neighbor as u32))
                .collect(),
        })
        .collect();

    Ok(BiomeGraph::from_regions(regions)?.with_cell_reach(spacing))
}

/// The up-to-eight surrounding lattice cells of `index`, ascending.
fn lattice_neighbors(n: usize, index: usize) -> impl Iterator<Item = usize> {
    let i = (index % n) as i64;
    let j = (index / n) as i64;
    let n = n as i64;
    (-1..=1i64)
        .flat_map(move |dj| (-1..=1i64).map(move |di| (di, dj)))
        .filter_map(move |(di, dj)| {
            if di == 0 && dj == 0 {
                return None;
            }
            let (ni, nj) = (i + di, j + dj);
            if ni < 0 || nj < 0 || ni >= n || nj >= n {
                return None;
            }
            Some((nj * n + ni) as usize)
        })
}

/// Marks water cells connected to the lattice border as ocean. Enclosed
/// water stays unmarked and classifies as inland water.
fn flood_ocean(n: usize, water: &[bool]) -> Vec<bool> {
    let mut ocean = vec![false; water.len()];
    let mut queue = VecDeque::new();

    for index in 0..water.len() {
        let i = index % n;
        let j = index / n;
        let on_border = i == 0 || j == 0 || i == n - 1 || j == n - 1;
        if on_border && water[index] {
            ocean[index] = true;
            queue.push_back(index);
        }
    }

    while let Some(index) = queue.pop_front() {
        for neighbor in lattice_neighbors(n, index) {
            if water[neighbor] && !ocean[neighbor] {
                ocean[neighbor] = true;
                queue.push_back(neighbor);
            }
        }
    }

    ocean
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
