// src/core/analyzer.rs

use serde::{Deserialize, Serialize};

use crate::core::stats::{BubbleStatistics, DEFAULT_DENSITY_UNIT};
use crate::cv::circles::{detect_circles, Circle, CircleOptions};
use crate::cv::draw::annotate_circles;
use crate::cv::regions::{find_regions, Region, RegionOptions};
use crate::cv::ComputerVision;
use crate::{AnalysisError, ImageBuffer, PixelBuffer, Rect, Result};

/// Tunables for one analysis run. Every field has a default, so a partial
/// JSON object deserializes into a complete configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerOptions {
    /// Side of the adaptive threshold window (odd).
    pub adaptive_block_size: usize,
    /// Offset subtracted from the local mean.
    pub adaptive_c: f64,
    pub regions: RegionOptions,
    /// Side of the median window applied before the circle search (odd).
    pub blur_kernel_size: usize,
    pub circles: CircleOptions,
    pub density_unit: f64,
    /// Draw detected circles on the returned buffer.
    pub annotate: bool,
}

impl Default for AnalyzerOptions {
    fn default() -> Self {
        AnalyzerOptions {
            adaptive_block_size: 31,
            adaptive_c: 10.0,
            regions: RegionOptions::default(),
            blur_kernel_size: 5,
            circles: CircleOptions::default(),
            density_unit: DEFAULT_DENSITY_UNIT,
            annotate: true,
        }
    }
}

impl AnalyzerOptions {
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| Err(AnalysisError::InvalidOptions(msg));

        if self.adaptive_block_size == 0 || self.adaptive_block_size % 2 == 0 {
            return invalid(format!(
                "adaptive_block_size must be odd, got {}",
                self.adaptive_block_size
            ));
        }
        if self.blur_kernel_size == 0 || self.blur_kernel_size % 2 == 0 {
            return invalid(format!(
                "blur_kernel_size must be odd, got {}",
                self.blur_kernel_size
            ));
        }
        let circles = &self.circles;
        if circles.min_radius == 0 || circles.min_radius > circles.max_radius {
            return invalid(format!(
                "radius band [{}, {}] is empty",
                circles.min_radius, circles.max_radius
            ));
        }
        if circles.center_step == 0 || circles.angle_step_deg == 0 || circles.angle_step_deg >= 360 {
            return invalid("center_step and angle_step_deg must be positive".to_string());
        }
        if !(self.density_unit > 0.0) {
            return invalid(format!("density_unit must be positive, got {}", self.density_unit));
        }
        let r = &self.regions;
        if !(r.min_area_smallbox_ratio <= r.min_area_general_ratio
            && r.min_area_general_ratio <= r.max_area_ratio)
        {
            return invalid("region area ratios must be ordered smallbox <= general <= max".to_string());
        }
        Ok(())
    }
}

/// Output of one pipeline run.
#[derive(Debug, Clone)]
pub struct Analysis {
    /// Candidate frames, largest bounding box first.
    pub regions: Vec<Region>,
    /// Copy of the input with the primary frame's bubbles drawn on it.
    pub annotated: PixelBuffer,
    /// `None` when no frame qualified or no bubble was confirmed.
    pub bubble_stats: Option<BubbleStatistics>,
}

/// Intermediate results before the overlay is drawn.
struct Measured {
    regions: Vec<Region>,
    circles: Vec<Circle>,
    bubble_stats: Option<BubbleStatistics>,
}

/// Frame and bubble analyzer.
pub struct Analyzer<CV: ComputerVision> {
    pub cv: CV,
    pub options: AnalyzerOptions,
}

impl<CV: ComputerVision> Analyzer<CV> {
    /// Creates an analyzer after validating `options`.
    pub fn new(cv: CV, options: AnalyzerOptions) -> Result<Self> {
        options.validate()?;
        Ok(Analyzer { cv, options })
    }

    /// Analyzer with the default thresholds.
    pub fn with_defaults(cv: CV) -> Self {
        Analyzer {
            cv,
            options: AnalyzerOptions::default(),
        }
    }

    /// Primary pipeline: Grayscale -> Adaptive Threshold -> Invert -> Regions,
    /// then Crop -> Median Blur -> Circles -> Statistics on the largest region.
    ///
    /// The input is only read; the annotated output is a fresh copy.
    pub fn analyze(&self, image: &ImageBuffer) -> Result<Analysis> {
        let image = ImageBuffer::new(image.data, image.width, image.height)?;
        let measured = self.measure(&image)?;
        let source = PixelBuffer {
            data: image.data.to_vec(),
            width: image.width,
            height: image.height,
        };
        Ok(self.finish(source, measured))
    }

    /// Owned-buffer entry point; the input becomes the base of the annotated output.
    pub fn analyze_buffer(&self, buffer: PixelBuffer) -> Result<Analysis> {
        let measured = self.measure(&ImageBuffer::new(&buffer.data, buffer.width, buffer.height)?)?;
        Ok(self.finish(buffer, measured))
    }

    fn measure(&self, image: &ImageBuffer) -> Result<Measured> {
        // 1. Grayscale
        let grey = self.grayscale(image);

        // 2-3. Binarize and flip so marks become foreground
        let binary = self.binarize(&grey);
        let inverted = self.invert(&binary);

        // 4. Regions
        let regions = find_regions(&inverted.as_image(), &self.options.regions);
        log::debug!("{} regions extracted", regions.len());

        // 5-7. Bubbles inside the primary region
        let mut circles = Vec::new();
        let mut bubble_stats = None;
        if let Some(primary) = regions.first() {
            circles = self.detect_bubbles(&grey, &primary.rect())?;
            if !circles.is_empty() {
                bubble_stats = Some(BubbleStatistics::with_density_unit(
                    &circles,
                    primary.area,
                    self.options.density_unit,
                ));
            }
        }

        Ok(Measured {
            regions,
            circles,
            bubble_stats,
        })
    }

    fn finish(&self, source: PixelBuffer, measured: Measured) -> Analysis {
        let Measured {
            regions,
            circles,
            bubble_stats,
        } = measured;

        let annotated = match regions.first() {
            Some(primary) if self.options.annotate && !circles.is_empty() => {
                annotate_circles(source, (primary.x, primary.y), &circles)
            }
            _ => source,
        };

        log_report(&regions, bubble_stats.as_ref());

        Analysis {
            regions,
            annotated,
            bubble_stats,
        }
    }

    pub fn grayscale(&self, image: &ImageBuffer) -> PixelBuffer {
        let mut grey = PixelBuffer::zeroed(image.width, image.height);
        CV::grayscale(image, &mut grey.data);
        grey
    }

    pub fn binarize(&self, grey: &PixelBuffer) -> PixelBuffer {
        let mut binary = PixelBuffer::zeroed(grey.width, grey.height);
        CV::adaptive_threshold(
            &grey.as_image(),
            &mut binary.data,
            self.options.adaptive_block_size,
            self.options.adaptive_c,
        );
        binary
    }

    pub fn invert(&self, binary: &PixelBuffer) -> PixelBuffer {
        let mut inverted = PixelBuffer::zeroed(binary.width, binary.height);
        CV::invert(&binary.data, &mut inverted.data);
        inverted
    }

    /// Median-filters the grayscale crop of `rect`.
    pub fn blur_region(&self, grey: &PixelBuffer, rect: &Rect) -> Result<PixelBuffer> {
        let crop = grey.crop(rect)?;
        let mut blurred = PixelBuffer::zeroed(crop.width, crop.height);
        CV::median_blur(&crop.as_image(), &mut blurred.data, self.options.blur_kernel_size);
        Ok(blurred)
    }

    /// Circles inside `rect`, centers relative to the rectangle's corner.
    pub fn detect_bubbles(&self, grey: &PixelBuffer, rect: &Rect) -> Result<Vec<Circle>> {
        if rect.width == 0 || rect.height == 0 {
            return Ok(Vec::new());
        }
        let blurred = self.blur_region(grey, rect)?;
        let roi = Rect {
            x: 0,
            y: 0,
            width: blurred.width,
            height: blurred.height,
        };
        let circles = detect_circles(&blurred.as_image(), &roi, &self.options.circles);
        log::debug!("{} bubbles confirmed in primary region", circles.len());
        Ok(circles)
    }
}

fn log_report(regions: &[Region], bubble_stats: Option<&BubbleStatistics>) {
    log::info!("analysis complete: {} frames found", regions.len());
    for (index, region) in regions.iter().enumerate() {
        let [tl, tr, bl, br] = region.corners();
        log::info!(
            "frame {}: top left ({}, {}), top right ({}, {}), bottom left ({}, {}), bottom right ({}, {})",
            index + 1,
            tl.x,
            tl.y,
            tr.x,
            tr.y,
            bl.x,
            bl.y,
            br.x,
            br.y
        );
        if index == 0 {
            if let Some(stats) = bubble_stats {
                log::info!(
                    "frame 1: {} bubbles, average diameter {:.2} px",
                    stats.count,
                    stats.avg_diameter
                );
            }
        }
    }
}
