//! 2-D Fourier spectrum of the grayscale signal grid.
//!
//! The grid is the R×R average of the three channels of each cell. The
//! transform is a separable row/column DFT through `rustfft`, shifted so the
//! zero-frequency bin sits at (R/2, R/2).

use beacon_core::Signal;
use num_complex::Complex64;
use rustfft::FftPlanner;
use serde::{Deserialize, Serialize};

/// Bins at or below this magnitude are excluded from flatness.
pub const MAGNITUDE_FLOOR: f64 = 1e-10;

/// Unnormalised forward 2-D DFT of a row-major `side`×`side` real grid.
pub fn fft2(grid: &[f64], side: usize) -> Vec<Complex64> {
    assert_eq!(grid.len(), side * side, "grid must be side×side");
    let mut data: Vec<Complex64> = grid.iter().map(|&v| Complex64::new(v, 0.0)).collect();
    if side == 0 {
        return data;
    }

    let mut planner = FftPlanner::<f64>::new();
    let fft = planner.plan_fft_forward(side);

    for row in data.chunks_exact_mut(side) {
        fft.process(row);
    }

    let mut column = vec![Complex64::new(0.0, 0.0); side];
    for c in 0..side {
        for (r, slot) in column.iter_mut().enumerate() {
            *slot = data[r * side + c];
        }
        fft.process(&mut column);
        for (r, value) in column.iter().enumerate() {
            data[r * side + c] = *value;
        }
    }

    data
}

/// Move the zero-frequency bin to the centre (both axes rolled by side/2).
pub fn fftshift<T: Copy>(grid: &[T], side: usize) -> Vec<T> {
    let half = side / 2;
    let mut out = grid.to_vec();
    for r in 0..side {
        for c in 0..side {
            let dst = ((r + half) % side) * side + (c + half) % side;
            out[dst] = grid[r * side + c];
        }
    }
    out
}

/// Centre-shifted magnitude grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MagnitudeSpectrum {
    pub side: usize,
    /// Row-major, zero frequency at (side/2, side/2).
    pub values: Vec<f64>,
}

impl MagnitudeSpectrum {
    pub fn at(&self, row: usize, col: usize) -> f64 {
        self.values[row * self.side + col]
    }
}

/// Shifted magnitude spectrum of a signal's grayscale grid.
pub fn magnitude_spectrum(signal: &Signal) -> MagnitudeSpectrum {
    let side = signal.resolution().get();
    let spectrum = fft2(&signal.grayscale(), side);
    let magnitudes: Vec<f64> = spectrum.iter().map(|z| z.norm()).collect();
    MagnitudeSpectrum {
        side,
        values: fftshift(&magnitudes, side),
    }
}

/// Geometric mean over arithmetic mean of the bins above [`MAGNITUDE_FLOOR`].
///
/// Returns 0 when no bin is above the floor (e.g. an all-zero signal).
pub fn flatness_of(magnitudes: &[f64]) -> f64 {
    let positive: Vec<f64> = magnitudes
        .iter()
        .copied()
        .filter(|&m| m > MAGNITUDE_FLOOR)
        .collect();
    if positive.is_empty() {
        return 0.0;
    }
    let n = positive.len() as f64;
    let log_mean = positive.iter().map(|m| m.ln()).sum::<f64>() / n;
    let arithmetic_mean = positive.iter().sum::<f64>() / n;
    (log_mean.exp() / arithmetic_mean).clamp(0.0, 1.0)
}

/// Spectral flatness of a signal, in [0, 1]. Near 0 is tonal, near 1 is noise.
pub fn spectral_flatness(signal: &Signal) -> f64 {
    flatness_of(&magnitude_spectrum(signal).values)
}

/// One strong off-centre bin of the shifted spectrum.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpectralPeak {
    /// Column in the shifted grid.
    pub x: usize,
    /// Row in the shifted grid.
    pub y: usize,
    pub magnitude: f64,
}

/// The `k` largest bins after masking the 3×3 block around DC.
pub fn top_peaks(spectrum: &MagnitudeSpectrum, k: usize) -> Vec<SpectralPeak> {
    let side = spectrum.side;
    let center = side / 2;
    let lo = center.saturating_sub(1);
    let hi = (center + 1).min(side.saturating_sub(1));

    let mut candidates: Vec<SpectralPeak> = Vec::with_capacity(side * side);
    for y in 0..side {
        for x in 0..side {
            if (lo..=hi).contains(&y) && (lo..=hi).contains(&x) {
                continue;
            }
            candidates.push(SpectralPeak {
                x,
                y,
                magnitude: spectrum.at(y, x),
            });
        }
    }
    candidates.sort_by(|a, b| {
        b.magnitude
            .partial_cmp(&a.magnitude)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    candidates.truncate(k);
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use beacon_core::{generate_random, Resolution};

    #[test]
    fn test_fft2_constant_grid_is_pure_dc() {
        let grid = vec![2.0; 16];
        let spectrum = fft2(&grid, 4);
        assert!((spectrum[0].re - 32.0).abs() < 1e-9);
        for z in &spectrum[1..] {
            assert!(z.norm() < 1e-9);
        }
    }

    #[test]
    fn test_fft2_matches_direct_dft() {
        let side = 3;
        let grid: Vec<f64> = (0..9).map(|v| (v * v) as f64).collect();
        let fast = fft2(&grid, side);
        for u in 0..side {
            for v in 0..side {
                let mut acc = Complex64::new(0.0, 0.0);
                for r in 0..side {
                    for c in 0..side {
                        let angle = -2.0 * std::f64::consts::PI
                            * ((u * r) as f64 / side as f64 + (v * c) as f64 / side as f64);
                        acc += Complex64::from_polar(grid[r * side + c], angle);
                    }
                }
                assert!((fast[u * side + v] - acc).norm() < 1e-9);
            }
        }
    }

    #[test]
    fn test_fftshift_moves_dc_to_centre() {
        let mut grid = vec![0; 16];
        grid[0] = 1;
        let shifted = fftshift(&grid, 4);
        assert_eq!(shifted[2 * 4 + 2], 1);

        let odd: Vec<i32> = (0..9).collect();
        let shifted = fftshift(&odd, 3);
        assert_eq!(shifted[4], 0);
    }

    #[test]
    fn test_flatness_bounds() {
        assert_eq!(flatness_of(&[]), 0.0);
        assert_eq!(flatness_of(&[0.0, 1e-12]), 0.0);
        assert!((flatness_of(&[3.0, 3.0, 3.0]) - 1.0).abs() < 1e-12);
        let peaky = flatness_of(&[100.0, 0.01, 0.01, 0.01]);
        assert!(peaky < 0.1, "peaky spectrum flatness {}", peaky);
    }

    #[test]
    fn test_random_signal_flatness_is_noise_like() {
        let signal = generate_random(Resolution::new(16).unwrap(), 3);
        let f = spectral_flatness(&signal);
        assert!(f > 0.3 && f <= 1.0, "flatness {}", f);
    }

    #[test]
    fn test_top_peaks_skip_dc_block() {
        let signal = generate_random(Resolution::new(8).unwrap(), 11);
        let spectrum = magnitude_spectrum(&signal);
        let peaks = top_peaks(&spectrum, 5);
        assert_eq!(peaks.len(), 5);
        for p in &peaks {
            assert!(!((3..=5).contains(&p.x) && (3..=5).contains(&p.y)));
        }
        for pair in peaks.windows(2) {
            assert!(pair[0].magnitude >= pair[1].magnitude);
        }
    }
}
