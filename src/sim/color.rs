//! Body colors

use bytemuck::{Pod, Zeroable};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::{COLOR_CHANNEL_MAX, COLOR_CHANNEL_MIN};

/// 8-bit RGBA color
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Random opaque pastel-ish color
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut channel = || rng.random_range(COLOR_CHANNEL_MIN..COLOR_CHANNEL_MAX);
        Self::new(channel(), channel(), channel(), u8::MAX)
    }

    /// Same color with a different alpha (0-1)
    pub fn with_alpha(self, alpha: f64) -> Self {
        Self {
            a: (alpha.clamp(0.0, 1.0) * 255.0).round() as u8,
            ..self
        }
    }

    /// Normalized [r, g, b, a] for GPU upload
    pub fn to_f32_array(self) -> [f32; 4] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
            self.a as f32 / 255.0,
        ]
    }
}

/// Mix `b` into `a` by `amount` (0 = all `a`, 1 = all `b`)
///
/// RGB channels are interpolated and rounded; alpha is the average of both.
pub fn blend(a: Rgba, b: Rgba, amount: f64) -> Rgba {
    let amount = amount.clamp(0.0, 1.0);
    let mix = |x: u8, y: u8| ((1.0 - amount) * x as f64 + amount * y as f64).round() as u8;
    Rgba {
        r: mix(a.r, b.r),
        g: mix(a.g, b.g),
        b: mix(a.b, b.b),
        a: ((a.a as u16 + b.a as u16 + 1) / 2) as u8,
    }
}
