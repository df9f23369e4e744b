// tests/pipeline.rs
use approx::assert_relative_eq;
use bubblescan_rs::cv::draw::{CENTER_COLOR, CIRCLE_COLOR};
use bubblescan_rs::cv::scalar::ScalarCV;
use bubblescan_rs::simd::dispatch::Backend;
use bubblescan_rs::{
    Analyzer, AnalyzerOptions, ImageBuffer, PixelBuffer, Rect, RegionEditor, RegionOptions,
};

/// White opaque RGBA page.
fn blank_page(width: usize, height: usize) -> Vec<u8> {
    vec![255u8; width * height * 4]
}

fn paint(data: &mut [u8], width: usize, x: usize, y: usize) {
    let i = (y * width + x) * 4;
    data[i..i + 3].copy_from_slice(&[0, 0, 0]);
}

fn fill_rect(data: &mut [u8], width: usize, x0: usize, y0: usize, w: usize, h: usize) {
    for y in y0..y0 + h {
        for x in x0..x0 + w {
            paint(data, width, x, y);
        }
    }
}

/// Rectangular frame outline of thickness 4 spanning `[x0, x1] x [y0, y1]`.
fn draw_frame(data: &mut [u8], width: usize, x0: usize, y0: usize, x1: usize, y1: usize) {
    for y in y0..=y1 {
        for x in x0..=x1 {
            if x < x0 + 4 || x > x1 - 4 || y < y0 + 4 || y > y1 - 4 {
                paint(data, width, x, y);
            }
        }
    }
}

/// Dark ring of thickness 4 around radius `r`.
fn draw_ring(data: &mut [u8], width: usize, height: usize, cx: i64, cy: i64, r: i64) {
    let inner = (r - 2) * (r - 2);
    let outer = (r + 2) * (r + 2);
    for y in 0..height as i64 {
        for x in 0..width as i64 {
            let d2 = (x - cx) * (x - cx) + (y - cy) * (y - cy);
            if d2 >= inner && d2 <= outer {
                paint(data, width, x as usize, y as usize);
            }
        }
    }
}

const RING_CENTERS: [(i64, i64); 5] = [(60, 60), (100, 60), (140, 60), (60, 100), (100, 100)];

/// 200x160 answer sheet: one framed area holding five ring bubbles.
fn answer_sheet() -> Vec<u8> {
    let (width, height) = (200, 160);
    let mut data = blank_page(width, height);
    draw_frame(&mut data, width, 20, 20, 179, 139);
    for &(cx, cy) in &RING_CENTERS {
        draw_ring(&mut data, width, height, cx, cy, 8);
    }
    data
}

fn pixel(buffer: &PixelBuffer, x: usize, y: usize) -> [u8; 4] {
    let i = (y * buffer.width as usize + x) * 4;
    [
        buffer.data[i],
        buffer.data[i + 1],
        buffer.data[i + 2],
        buffer.data[i + 3],
    ]
}

#[test]
fn blank_page_yields_nothing() {
    let data = blank_page(120, 90);
    let image = ImageBuffer::new(&data, 120, 90).unwrap();

    let analysis = Analyzer::with_defaults(ScalarCV).analyze(&image).unwrap();

    assert!(analysis.regions.is_empty());
    assert!(analysis.bubble_stats.is_none());
    assert_eq!(analysis.annotated.data, data);
}

#[test]
fn solid_squares_become_two_regions_largest_first() {
    let (width, height) = (300, 300);
    let mut data = blank_page(width, height);
    fill_rect(&mut data, width, 200, 220, 40, 40);
    fill_rect(&mut data, width, 20, 30, 100, 100);
    let image = ImageBuffer::new(&data, width as u32, height as u32).unwrap();

    let analysis = Analyzer::with_defaults(ScalarCV).analyze(&image).unwrap();

    let rects: Vec<Rect> = analysis.regions.iter().map(|r| r.rect()).collect();
    assert_eq!(
        rects,
        vec![
            Rect { x: 20, y: 30, width: 99, height: 99 },
            Rect { x: 200, y: 220, width: 39, height: 39 },
        ]
    );
    // A solid square holds no bubbles
    assert!(analysis.bubble_stats.is_none());
}

#[test]
fn regions_respect_area_policy_and_order() {
    let data = answer_sheet();
    let (width, height) = (200u32, 160u32);
    let image = ImageBuffer::new(&data, width, height).unwrap();

    let analysis = Analyzer::with_defaults(ScalarCV).analyze(&image).unwrap();

    let thresholds = RegionOptions::default().thresholds(width, height);
    for region in &analysis.regions {
        let area = region.area as f64;
        assert_eq!(region.area, region.width as u64 * region.height as u64);
        assert!(area >= thresholds.min_area_smallbox && area <= thresholds.max_area);
    }
    assert!(analysis
        .regions
        .windows(2)
        .all(|w| w[0].width as u64 * w[0].height as u64 >= w[1].width as u64 * w[1].height as u64));
}

#[test]
fn answer_sheet_bubbles_are_measured() {
    let data = answer_sheet();
    let image = ImageBuffer::new(&data, 200, 160).unwrap();

    let analysis = Analyzer::with_defaults(ScalarCV).analyze(&image).unwrap();

    // Rings are too small to be frames and sit below the header band
    assert_eq!(analysis.regions.len(), 1);
    let frame = &analysis.regions[0];
    assert_eq!(frame.rect(), Rect { x: 20, y: 20, width: 159, height: 119 });

    let stats = analysis.bubble_stats.expect("bubbles inside the frame");
    assert_eq!(stats.count, 5);
    assert_eq!(stats.circles.len(), 5);
    for &(cx, cy) in &RING_CENTERS {
        let local = ((cx - 20) as f64, (cy - 20) as f64);
        let matched = stats.circles.iter().any(|c| {
            let dx = c.x as f64 - local.0;
            let dy = c.y as f64 - local.1;
            (dx * dx + dy * dy).sqrt() <= 3.0
        });
        assert!(matched, "no bubble near ({}, {})", cx, cy);
    }
    for (i, a) in stats.circles.iter().enumerate() {
        assert!(a.r >= 4 && a.r <= 12);
        for b in &stats.circles[i + 1..] {
            assert!(a.distance_to(b) >= 12.0);
        }
    }
    assert!(stats.min_diameter <= stats.avg_diameter && stats.avg_diameter <= stats.max_diameter);
    assert_relative_eq!(stats.density, 5.0 / 18_921.0 * 10_000.0, epsilon = 1e-9);

    // Overlay lands at the frame offset, input pixels elsewhere are kept
    let first = stats.circles[0];
    let (gx, gy) = ((20 + first.x) as usize, (20 + first.y) as usize);
    assert_eq!(pixel(&analysis.annotated, gx, gy), CENTER_COLOR);
    assert_eq!(pixel(&analysis.annotated, gx + first.r as usize, gy), CIRCLE_COLOR);
    assert_eq!(pixel(&analysis.annotated, 2, 2), [255, 255, 255, 255]);
}

#[test]
fn header_mark_is_kept_as_small_region() {
    let mut data = answer_sheet();
    fill_rect(&mut data, 200, 150, 3, 20, 10);
    let image = ImageBuffer::new(&data, 200, 160).unwrap();

    let analysis = Analyzer::with_defaults(ScalarCV).analyze(&image).unwrap();

    assert_eq!(analysis.regions.len(), 2);
    assert_eq!(analysis.regions[0].x, 20);
    assert_eq!(analysis.regions[1].rect(), Rect { x: 150, y: 3, width: 19, height: 9 });
    assert_eq!(analysis.bubble_stats.map(|s| s.count), Some(5));
}

#[test]
fn disabled_overlay_returns_input_unchanged() {
    let data = answer_sheet();
    let buffer = PixelBuffer::new(data.clone(), 200, 160).unwrap();
    let options = AnalyzerOptions {
        annotate: false,
        ..AnalyzerOptions::default()
    };

    let analysis = Analyzer::new(Backend, options)
        .unwrap()
        .analyze_buffer(buffer)
        .unwrap();

    assert_eq!(analysis.annotated.data, data);
    assert!(analysis.bubble_stats.is_some());
}

#[test]
fn repeated_runs_are_identical() {
    let data = answer_sheet();
    let image = ImageBuffer::new(&data, 200, 160).unwrap();
    let analyzer = Analyzer::with_defaults(ScalarCV);

    let first = analyzer.analyze(&image).unwrap();
    let second = analyzer.analyze(&image).unwrap();

    assert_eq!(first.regions, second.regions);
    assert_eq!(first.bubble_stats, second.bubble_stats);
    assert_eq!(first.annotated, second.annotated);
}

#[test]
fn editing_does_not_touch_analysis_output() {
    let data = answer_sheet();
    let image = ImageBuffer::new(&data, 200, 160).unwrap();
    let analysis = Analyzer::with_defaults(ScalarCV).analyze(&image).unwrap();

    let mut editor = RegionEditor::new(analysis.regions.clone(), 200, 160);
    assert_eq!(editor.select_at(30.0, 30.0), Some(0));
    assert!(editor.move_selected(0, 0));
    editor.add_default();

    assert_eq!(editor.regions().len(), 2);
    assert_eq!(editor.regions()[0].rect(), Rect { x: 0, y: 0, width: 159, height: 119 });
    assert_eq!(analysis.regions[0].rect(), Rect { x: 20, y: 20, width: 159, height: 119 });
}
