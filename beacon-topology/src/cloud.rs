//! Point clouds extracted from a signal's RGB grid.

use std::fmt;

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use beacon_core::Signal;

/// Default cap on cloud size before pairwise distances are taken.
pub const MAX_POINTS: usize = 500;

/// How pixels become points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointCloudMethod {
    /// One 3-D point `(r, g, b)` per pixel.
    RgbPixels,
    /// One 5-D point `(x, y, r, g, b)` per pixel.
    SpatialRgb,
    /// One 9-D point per interior pixel: its 3×3 grayscale neighbourhood.
    GrayscalePatches,
}

impl PointCloudMethod {
    pub fn dimension(self) -> usize {
        match self {
            PointCloudMethod::RgbPixels => 3,
            PointCloudMethod::SpatialRgb => 5,
            PointCloudMethod::GrayscalePatches => 9,
        }
    }
}

impl fmt::Display for PointCloudMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PointCloudMethod::RgbPixels => write!(f, "rgb_pixels"),
            PointCloudMethod::SpatialRgb => write!(f, "spatial_rgb"),
            PointCloudMethod::GrayscalePatches => write!(f, "grayscale_patches"),
        }
    }
}

/// Points of equal dimension stored row-major.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointCloud {
    dimension: usize,
    coords: Vec<f64>,
}

impl PointCloud {
    /// `None` if `coords` is not a whole number of `dimension`-wide rows.
    pub fn from_coords(dimension: usize, coords: Vec<f64>) -> Option<Self> {
        if dimension == 0 || coords.len() % dimension != 0 {
            return None;
        }
        Some(PointCloud { dimension, coords })
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn len(&self) -> usize {
        self.coords.len() / self.dimension
    }

    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    pub fn point(&self, i: usize) -> &[f64] {
        &self.coords[i * self.dimension..(i + 1) * self.dimension]
    }

    pub fn points(&self) -> impl Iterator<Item = &[f64]> {
        self.coords.chunks_exact(self.dimension)
    }

    pub fn distance(&self, i: usize, j: usize) -> f64 {
        self.point(i)
            .iter()
            .zip(self.point(j))
            .map(|(a, b)| (a - b) * (a - b))
            .sum::<f64>()
            .sqrt()
    }

    /// At most `max_points` distinct points chosen by a seeded draw without
    /// replacement. Clouds already small enough are returned unchanged.
    pub fn subsample(&self, max_points: usize, seed: u64) -> PointCloud {
        if self.len() <= max_points {
            return self.clone();
        }
        let mut rng = StdRng::seed_from_u64(seed);
        let picked = rand::seq::index::sample(&mut rng, self.len(), max_points);
        let mut coords = Vec::with_capacity(max_points * self.dimension);
        for i in picked.iter() {
            coords.extend_from_slice(self.point(i));
        }
        PointCloud {
            dimension: self.dimension,
            coords,
        }
    }
}

/// Build the cloud for `signal` under `method`.
pub fn point_cloud(signal: &Signal, method: PointCloudMethod) -> PointCloud {
    let side = signal.resolution().get();
    let dimension = method.dimension();
    let mut coords = Vec::new();

    match method {
        PointCloudMethod::RgbPixels => {
            coords.extend(signal.as_bytes().iter().map(|&b| b as f64));
        }
        PointCloudMethod::SpatialRgb => {
            for y in 0..side {
                for x in 0..side {
                    let px = signal.pixel(y, x);
                    coords.push(x as f64);
                    coords.push(y as f64);
                    coords.extend(px.iter().map(|&b| b as f64));
                }
            }
        }
        PointCloudMethod::GrayscalePatches => {
            let gray = signal.grayscale();
            for y in 1..side.saturating_sub(1) {
                for x in 1..side - 1 {
                    for dy in 0..3 {
                        let row = (y + dy - 1) * side;
                        coords.extend_from_slice(&gray[row + x - 1..row + x + 2]);
                    }
                }
            }
        }
    }

    debug_assert_eq!(coords.len() % dimension, 0);
    PointCloud { dimension, coords }
}

#[cfg(test)]
mod tests {
    use super::*;
    use beacon_core::Resolution;

    fn ramp_signal(side: usize) -> Signal {
        let res = Resolution::new(side).unwrap();
        let bytes: Vec<u8> = (0..res.signal_len()).map(|i| (i % 256) as u8).collect();
        Signal::from_bytes(bytes, res).unwrap()
    }

    #[test]
    fn test_rgb_pixels() {
        let cloud = point_cloud(&ramp_signal(4), PointCloudMethod::RgbPixels);
        assert_eq!(cloud.len(), 16);
        assert_eq!(cloud.dimension(), 3);
        assert_eq!(cloud.point(1), &[3.0, 4.0, 5.0]);
    }

    #[test]
    fn test_spatial_rgb() {
        let cloud = point_cloud(&ramp_signal(4), PointCloudMethod::SpatialRgb);
        assert_eq!(cloud.len(), 16);
        // Row 1, column 2: pixel index 6.
        assert_eq!(cloud.point(6), &[2.0, 1.0, 18.0, 19.0, 20.0]);
    }

    #[test]
    fn test_grayscale_patches() {
        let signal = ramp_signal(4);
        let cloud = point_cloud(&signal, PointCloudMethod::GrayscalePatches);
        assert_eq!(cloud.len(), 4);
        assert_eq!(cloud.dimension(), 9);
        let gray = signal.grayscale();
        // Patch centred on (1, 1).
        assert_eq!(
            cloud.point(0),
            &[gray[0], gray[1], gray[2], gray[4], gray[5], gray[6], gray[8], gray[9], gray[10]]
        );
    }

    #[test]
    fn test_grayscale_patches_tiny_grid() {
        let cloud = point_cloud(&ramp_signal(2), PointCloudMethod::GrayscalePatches);
        assert!(cloud.is_empty());
    }

    #[test]
    fn test_subsample() {
        let cloud = point_cloud(&ramp_signal(32), PointCloudMethod::RgbPixels);
        assert_eq!(cloud.len(), 1024);
        let a = cloud.subsample(MAX_POINTS, 7);
        let b = cloud.subsample(MAX_POINTS, 7);
        assert_eq!(a.len(), MAX_POINTS);
        assert_eq!(a, b);
        assert_eq!(cloud.subsample(2000, 7), cloud);
    }

    #[test]
    fn test_distance() {
        let cloud = PointCloud::from_coords(2, vec![0.0, 0.0, 3.0, 4.0]).unwrap();
        assert_eq!(cloud.distance(0, 1), 5.0);
        assert!(PointCloud::from_coords(2, vec![1.0]).is_none());
    }
}
