use crate::error::{ProcessingError, Result};
use crate::processors::Series;
use crate::utils::constants::{DEFAULT_PLOT_HEIGHT, DEFAULT_PLOT_WIDTH, PLOT_GRID_LINES, PLOT_MARGIN};
use std::path::Path;
use tiny_skia::{
    Color, FillRule, LineCap, LineJoin, Paint, PathBuilder, Pixmap, Stroke, Transform,
};
use tracing::info;

const SERIES_COLORS: [[u8; 4]; 4] = [
    [31, 119, 180, 255],
    [255, 127, 14, 255],
    [44, 160, 44, 255],
    [214, 39, 40, 255],
];

/// Data bounds shared by every series on the chart
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl Bounds {
    fn of(series: &[Series]) -> Option<Self> {
        let mut points = series.iter().flat_map(|s| s.points.iter()).filter(|(x, y)| {
            x.is_finite() && y.is_finite()
        });
        let &(x0, y0) = points.next()?;
        let mut bounds = Bounds {
            min_x: x0,
            max_x: x0,
            min_y: y0,
            max_y: y0,
        };
        for &(x, y) in points {
            bounds.min_x = bounds.min_x.min(x);
            bounds.max_x = bounds.max_x.max(x);
            bounds.min_y = bounds.min_y.min(y);
            bounds.max_y = bounds.max_y.max(y);
        }

        // A flat series still needs a non-zero span to scale against
        if bounds.max_x == bounds.min_x {
            bounds.min_x -= 0.5;
            bounds.max_x += 0.5;
        }
        if bounds.max_y == bounds.min_y {
            bounds.min_y -= 0.5;
            bounds.max_y += 0.5;
        }
        Some(bounds)
    }
}

/// A plain multi-series line chart rendered to PNG
pub struct LineChart {
    title: String,
    width: u32,
    height: u32,
    series: Vec<Series>,
}

impl LineChart {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            width: DEFAULT_PLOT_WIDTH,
            height: DEFAULT_PLOT_HEIGHT,
            series: Vec::new(),
        }
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn add_series(mut self, series: Series) -> Self {
        self.series.push(series);
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn series(&self) -> &[Series] {
        &self.series
    }

    pub fn bounds(&self) -> Option<Bounds> {
        Bounds::of(&self.series)
    }

    pub fn render(&self) -> Result<Pixmap> {
        let bounds = self.bounds().ok_or_else(|| {
            ProcessingError::MissingData(format!("no points to plot for '{}'", self.title))
        })?;

        let mut pixmap = Pixmap::new(self.width, self.height).ok_or_else(|| {
            ProcessingError::Image(format!("invalid canvas size {}x{}", self.width, self.height))
        })?;
        pixmap.fill(Color::WHITE);

        let w = self.width as f32;
        let h = self.height as f32;
        let plot_w = (w - 2.0 * PLOT_MARGIN).max(1.0);
        let plot_h = (h - 2.0 * PLOT_MARGIN).max(1.0);

        let to_canvas = |x: f64, y: f64| -> (f32, f32) {
            let fx = ((x - bounds.min_x) / (bounds.max_x - bounds.min_x)) as f32;
            let fy = ((y - bounds.min_y) / (bounds.max_y - bounds.min_y)) as f32;
            (PLOT_MARGIN + fx * plot_w, h - PLOT_MARGIN - fy * plot_h)
        };

        draw_frame(&mut pixmap, w, h, plot_w, plot_h);

        for (i, series) in self.series.iter().enumerate() {
            let color = SERIES_COLORS[i % SERIES_COLORS.len()];
            let mut paint = Paint::default();
            paint.set_color_rgba8(color[0], color[1], color[2], color[3]);
            paint.anti_alias = true;

            let points: Vec<(f32, f32)> = series
                .points
                .iter()
                .filter(|(x, y)| x.is_finite() && y.is_finite())
                .map(|&(x, y)| to_canvas(x, y))
                .collect();

            if points.len() == 1 {
                let (x, y) = points[0];
                if let Some(dot) = PathBuilder::from_circle(x, y, 3.0) {
                    pixmap.fill_path(&dot, &paint, FillRule::Winding, Transform::identity(), None);
                }
                continue;
            }

            let mut pb = PathBuilder::new();
            for (j, &(x, y)) in points.iter().enumerate() {
                if j == 0 {
                    pb.move_to(x, y);
                } else {
                    pb.line_to(x, y);
                }
            }

            let mut stroke = Stroke::default();
            stroke.width = 2.0;
            stroke.line_cap = LineCap::Round;
            stroke.line_join = LineJoin::Round;

            if let Some(path) = pb.finish() {
                pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
            }
        }

        Ok(pixmap)
    }

    pub fn save_png(&self, path: &Path) -> Result<()> {
        let pixmap = self.render()?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        pixmap
            .save_png(path)
            .map_err(|e| ProcessingError::Image(e.to_string()))?;

        let labels: Vec<&str> = self.series.iter().map(|s| s.label.as_str()).collect();
        info!(path = %path.display(), title = %self.title, series = ?labels, "Saved chart");
        Ok(())
    }
}

/// Axes box plus light horizontal and vertical gridlines
fn draw_frame(pixmap: &mut Pixmap, w: f32, h: f32, plot_w: f32, plot_h: f32) {
    let mut grid_paint = Paint::default();
    grid_paint.set_color_rgba8(220, 220, 220, 255);
    let mut grid_stroke = Stroke::default();
    grid_stroke.width = 1.0;

    let mut pb = PathBuilder::new();
    for i in 1..PLOT_GRID_LINES {
        let t = i as f32 / PLOT_GRID_LINES as f32;
        let y = h - PLOT_MARGIN - t * plot_h;
        pb.move_to(PLOT_MARGIN, y);
        pb.line_to(PLOT_MARGIN + plot_w, y);
        let x = PLOT_MARGIN + t * plot_w;
        pb.move_to(x, PLOT_MARGIN);
        pb.line_to(x, h - PLOT_MARGIN);
    }
    if let Some(path) = pb.finish() {
        pixmap.stroke_path(&path, &grid_paint, &grid_stroke, Transform::identity(), None);
    }

    let mut axis_paint = Paint::default();
    axis_paint.set_color_rgba8(60, 60, 60, 255);
    let mut axis_stroke = Stroke::default();
    axis_stroke.width = 1.5;

    let mut pb = PathBuilder::new();
    pb.move_to(PLOT_MARGIN, PLOT_MARGIN);
    pb.line_to(PLOT_MARGIN, h - PLOT_MARGIN);
    pb.line_to(w - PLOT_MARGIN, h - PLOT_MARGIN);
    if let Some(path) = pb.finish() {
        pixmap.stroke_path(&path, &axis_paint, &axis_stroke, Transform::identity(), None);
    }
}
