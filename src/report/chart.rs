//! Plain chart description handed to the PDF writer.

pub type Rgb = (f32, f32, f32);

pub const BLUE: Rgb = (0.12, 0.47, 0.71);
pub const ORANGE: Rgb = (1.0, 0.5, 0.05);
pub const LIGHT_BLUE: Rgb = (0.65, 0.78, 0.89);

#[derive(Debug, Clone)]
pub struct Axis {
    pub label: String,
    pub min: f64,
    pub max: f64,
    /// (value, label) pairs drawn along the axis.
    pub ticks: Vec<(f64, String)>,
}

impl Axis {
    pub fn new(label: &str, min: f64, max: f64) -> Self {
        Self {
            label: label.to_string(),
            min,
            max,
            ticks: Vec::new(),
        }
    }

    pub fn with_ticks(mut self, ticks: Vec<(f64, String)>) -> Self {
        self.ticks = ticks;
        self
    }

    /// `n + 1` evenly spaced ticks over the range.
    pub fn with_even_ticks(self, n: usize, decimals: usize) -> Self {
        let n = n.max(1);
        let step = (self.max - self.min) / n as f64;
        let ticks = (0..=n)
            .map(|i| {
                let v = self.min + step * i as f64;
                (v, format!("{:.*}", decimals, v))
            })
            .collect();
        self.with_ticks(ticks)
    }

    pub fn contains(&self, v: f64) -> bool {
        v >= self.min && v <= self.max
    }

    /// Position of `v` on an axis of `length` points starting at `origin`.
    pub fn project(&self, v: f64, origin: f32, length: f32) -> f32 {
        let span = self.max - self.min;
        if span <= 0.0 {
            return origin + length / 2.0;
        }
        origin + (((v - self.min) / span) as f32) * length
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesStyle {
    LineWithMarkers,
    Markers,
}

#[derive(Debug, Clone)]
pub struct Series {
    pub label: String,
    pub color: Rgb,
    pub style: SeriesStyle,
    pub points: Vec<(f64, f64)>,
}

#[derive(Debug, Clone)]
pub struct Chart {
    pub title: String,
    pub x: Axis,
    pub y: Axis,
    pub series: Vec<Series>,
    pub legend: bool,
}
