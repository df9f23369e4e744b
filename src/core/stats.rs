// src/core/stats.rs

use serde::{Deserialize, Serialize};

use crate::cv::circles::Circle;

/// Area unit the bubble density is normalized to.
pub const DEFAULT_DENSITY_UNIT: f64 = 10_000.0;

/// Descriptive statistics over the bubbles of one region.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BubbleStatistics {
    pub count: usize,
    pub avg_diameter: f64,
    /// Mean center distance over every unordered pair of circles.
    pub avg_distance: f64,
    pub min_diameter: f64,
    pub max_diameter: f64,
    /// Circles per `density_unit` area units of the region.
    pub density: f64,
    pub circles: Vec<Circle>,
}

/// Guards a ratio against empty populations; never yields NaN or infinity.
fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        return 0.0;
    }
    let value = numerator / denominator;
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

impl BubbleStatistics {
    /// Summarizes `circles` found inside a region of `region_area` square pixels.
    pub fn from_circles(circles: &[Circle], region_area: u64) -> Self {
        Self::with_density_unit(circles, region_area, DEFAULT_DENSITY_UNIT)
    }

    pub fn with_density_unit(circles: &[Circle], region_area: u64, density_unit: f64) -> Self {
        if circles.is_empty() {
            return BubbleStatistics::default();
        }

        let count = circles.len();
        let mut min_diameter = f64::INFINITY;
        let mut max_diameter = f64::NEG_INFINITY;
        let mut diameter_sum = 0.0;
        for circle in circles {
            let diameter = circle.diameter();
            diameter_sum += diameter;
            min_diameter = min_diameter.min(diameter);
            max_diameter = max_diameter.max(diameter);
        }

        let mut distance_sum = 0.0;
        let mut pairs = 0usize;
        for (i, a) in circles.iter().enumerate() {
            for b in &circles[i + 1..] {
                distance_sum += a.distance_to(b);
                pairs += 1;
            }
        }

        BubbleStatistics {
            count,
            avg_diameter: ratio(diameter_sum, count as f64),
            avg_distance: ratio(distance_sum, pairs as f64),
            min_diameter,
            max_diameter,
            density: ratio(count as f64, region_area as f64) * density_unit,
            circles: circles.to_vec(),
        }
    }
}
