//! Line chart of a price history onto an abstract drawing surface.

use crate::render::format::format_compact;

pub const CHART_PADDING: f64 = 40.0;
pub const DEFAULT_WIDTH: f64 = 600.0;
pub const DEFAULT_HEIGHT: f64 = 300.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Drawing primitives the chart needs. Coordinates are surface units with the
/// origin top-left.
pub trait Surface {
    fn size(&self) -> (f64, f64);
    fn clear(&mut self);
    fn text(&mut self, at: Point, text: &str);
    /// Left and bottom axis meeting at `corner`.
    fn axes(&mut self, top: Point, corner: Point, right: Point);
    fn polyline(&mut self, points: &[Point]);
    fn point(&mut self, at: Point);
}

/// Clears `surface` and plots `data` scaled between its min and max.
pub fn draw_chart(surface: &mut dyn Surface, data: &[f64], label: &str) {
    surface.clear();
    if data.is_empty() {
        surface.text(Point::new(20.0, 40.0), &format!("No data available for {label}"));
        return;
    }

    let (width, height) = surface.size();
    let plot_width = (width - CHART_PADDING * 2.0).max(0.0);
    let plot_height = (height - CHART_PADDING * 2.0).max(0.0);

    let min = data.iter().copied().fold(f64::INFINITY, f64::min);
    let max = data.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = if max - min == 0.0 { 1.0 } else { max - min };

    surface.axes(
        Point::new(CHART_PADDING, CHART_PADDING),
        Point::new(CHART_PADDING, CHART_PADDING + plot_height),
        Point::new(CHART_PADDING + plot_width, CHART_PADDING + plot_height),
    );

    let last_index = data.len().saturating_sub(1).max(1) as f64;
    let points = data
        .iter()
        .enumerate()
        .map(|(index, value)| {
            Point::new(
                CHART_PADDING + index as f64 / last_index * plot_width,
                CHART_PADDING + plot_height - (value - min) / range * plot_height,
            )
        })
        .collect::<Vec<_>>();

    surface.polyline(&points);
    for point in &points {
        surface.point(*point);
    }

    surface.text(Point::new(10.0, 14.0), &format!("Min: {}", format_compact(min)));
    surface.text(Point::new(10.0, 30.0), &format!("Max: {}", format_compact(max)));
    surface.text(
        Point::new(width - 120.0, 20.0),
        &format!("Points: {}", data.len()),
    );
}

/// One recorded drawing call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    Clear,
    Text(Point, String),
    Axes(Point, Point, Point),
    Polyline(Vec<Point>),
    Point(Point),
}

/// Surface that keeps a log of calls instead of drawing.
#[derive(Debug, Clone)]
pub struct RecordingSurface {
    width: f64,
    height: f64,
    calls: Vec<DrawCall>,
}

impl RecordingSurface {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            calls: Vec::new(),
        }
    }

    pub fn calls(&self) -> &[DrawCall] {
        &self.calls
    }

    pub fn drew_axes(&self) -> bool {
        self.calls
            .iter()
            .any(|call| matches!(call, DrawCall::Axes(..)))
    }

    pub fn points(&self) -> Vec<Point> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                DrawCall::Point(point) => Some(*point),
                _ => None,
            })
            .collect()
    }

    pub fn texts(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                DrawCall::Text(_, text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl Default for RecordingSurface {
    fn default() -> Self {
        Self::new(DEFAULT_WIDTH, DEFAULT_HEIGHT)
    }
}

impl Surface for RecordingSurface {
    fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    fn clear(&mut self) {
        self.calls.clear();
        self.calls.push(DrawCall::Clear);
    }

    fn text(&mut self, at: Point, text: &str) {
        self.calls.push(DrawCall::Text(at, text.to_owned()));
    }

    fn axes(&mut self, top: Point, corner: Point, right: Point) {
        self.calls.push(DrawCall::Axes(top, corner, right));
    }

    fn polyline(&mut self, points: &[Point]) {
        self.calls.push(DrawCall::Polyline(points.to_vec()));
    }

    fn point(&mut self, at: Point) {
        self.calls.push(DrawCall::Point(at));
    }
}

/// Character-cell surface for terminals. Surface units are mapped onto a
/// `cols x rows` grid.
#[derive(Debug, Clone)]
pub struct GridSurface {
    width: f64,
    height: f64,
    cols: usize,
    rows: usize,
    cells: Vec<Vec<char>>,
}

impl GridSurface {
    pub fn new(cols: usize, rows: usize) -> Self {
        let cols = cols.max(1);
        let rows = rows.max(1);
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            cols,
            rows,
            cells: vec![vec![' '; cols]; rows],
        }
    }

    pub fn to_text(&self) -> String {
        self.cells
            .iter()
            .map(|row| row.iter().collect::<String>().trim_end().to_owned())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn cell(&self, at: Point) -> (usize, usize) {
        let col = (at.x / self.width * self.cols as f64).floor();
        let row = (at.y / self.height * self.rows as f64).floor();
        (
            (col.max(0.0) as usize).min(self.cols - 1),
            (row.max(0.0) as usize).min(self.rows - 1),
        )
    }

    fn put(&mut self, col: usize, row: usize, ch: char) {
        if let Some(cell) = self.cells.get_mut(row).and_then(|line| line.get_mut(col)) {
            *cell = ch;
        }
    }

    fn segment(&mut self, from: Point, to: Point, ch: char) {
        let (c0, r0) = self.cell(from);
        let (c1, r1) = self.cell(to);
        let steps = c0.abs_diff(c1).max(r0.abs_diff(r1)).max(1);
        for step in 0..=steps {
            let t = step as f64 / steps as f64;
            let col = (c0 as f64 + (c1 as f64 - c0 as f64) * t).round() as usize;
            let row = (r0 as f64 + (r1 as f64 - r0 as f64) * t).round() as usize;
            if self.cells[row][col] == ' ' {
                self.put(col, row, ch);
            }
        }
    }
}

impl Surface for GridSurface {
    fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    fn clear(&mut self) {
        for row in &mut self.cells {
            row.fill(' ');
        }
    }

    fn text(&mut self, at: Point, text: &str) {
        let (col, row) = self.cell(at);
        for (offset, ch) in text.chars().enumerate() {
            self.put(col + offset, row, ch);
        }
    }

    fn axes(&mut self, top: Point, corner: Point, right: Point) {
        let (left_col, top_row) = self.cell(top);
        let (_, bottom_row) = self.cell(corner);
        let (right_col, _) = self.cell(right);
        for row in top_row..bottom_row {
            self.put(left_col, row, '│');
        }
        for col in left_col + 1..=right_col {
            self.put(col, bottom_row, '─');
        }
        self.put(left_col, bottom_row, '└');
    }

    fn polyline(&mut self, points: &[Point]) {
        for pair in points.windows(2) {
            self.segment(pair[0], pair[1], '·');
        }
    }

    fn point(&mut self, at: Point) {
        let (col, row) = self.cell(at);
        self.put(col, row, '●');
    }
}
