use serde::{Serialize, Serializer};
use std::fmt::Display;

#[cfg(test)]
#[path = "./load.tests.rs"]
mod load_tests;

/// Heat map color stops for 0%, ~33%, ~67% and 100% load.
pub const HEAT_MAP_STOPS: [RgbColor; 4] = [
    RgbColor::new(0.0, 0.0, 255.0),
    RgbColor::new(0.0, 255.0, 0.0),
    RgbColor::new(255.0, 255.0, 0.0),
    RgbColor::new(255.0, 0.0, 0.0),
];

/// RGB color with unrounded channels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RgbColor {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl RgbColor {
    /// Creates new [`RgbColor`] instance.
    pub const fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    /// Returns channels rounded to the nearest integer.
    pub fn rounded(&self) -> (u8, u8, u8) {
        (round_channel(self.r), round_channel(self.g), round_channel(self.b))
    }

    fn lerp(from: &RgbColor, to: &RgbColor, fraction: f64) -> Self {
        Self {
            r: (to.r - from.r) * fraction + from.r,
            g: (to.g - from.g) * fraction + from.g,
            b: (to.b - from.b) * fraction + from.b,
        }
    }
}

impl Display for RgbColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "rgb({},{},{})", self.r, self.g, self.b)
    }
}

impl Serialize for RgbColor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Returns `used` as a percentage of `capacity`, rounded up to two decimal places.\
/// **Note** that `capacity` must not be zero, the result is infinite or NaN otherwise.
pub fn compute_load(used: f64, capacity: f64) -> f64 {
    (1e4 * used / capacity).ceil() / 100.0
}

/// Maps load percentage onto the blue, green, yellow, red heat map.\
/// Loads at or below 0% (and NaN) are blue, loads at or above 100% are red.
pub fn heat_map_color(load: f64) -> RgbColor {
    let level = load / 100.0;
    let last = HEAT_MAP_STOPS.len() - 1;

    if level.is_nan() || level <= 0.0 {
        return HEAT_MAP_STOPS[0];
    }

    if level >= 1.0 {
        return HEAT_MAP_STOPS[last];
    }

    let scaled = level * last as f64;
    let lower = (scaled.floor() as usize).min(last - 1);
    let fraction = scaled - lower as f64;

    RgbColor::lerp(&HEAT_MAP_STOPS[lower], &HEAT_MAP_STOPS[lower + 1], fraction)
}

fn round_channel(value: f64) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}
