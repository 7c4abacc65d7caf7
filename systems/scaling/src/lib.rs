#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Viewport-driven presentation scaling.
//!
//! Presentation size is a pure function of the viewport: the smaller of the
//! width and height ratios against the 800x600 reference, reduced on mobile,
//! clamped to `[0.5, 1.5]`. Combat never consults this module; scale affects
//! how entities are shown, not what they do.

/// Reference viewport width the ratios are computed against.
pub const REFERENCE_WIDTH: f32 = 800.0;
/// Reference viewport height the ratios are computed against.
pub const REFERENCE_HEIGHT: f32 = 600.0;
/// Multiplier applied on mobile before clamping.
pub const MOBILE_FACTOR: f32 = 0.8;
/// Lower clamp on the resulting scale factor.
pub const MIN_SCALE: f32 = 0.5;
/// Upper clamp on the resulting scale factor.
pub const MAX_SCALE: f32 = 1.5;

/// Computes the presentation scale factor for a viewport.
#[must_use]
pub fn compute_scale_factor(width: f32, height: f32, is_mobile: bool) -> f32 {
    let ratio = (width / REFERENCE_WIDTH).min(height / REFERENCE_HEIGHT);
    let ratio = if is_mobile { ratio * MOBILE_FACTOR } else { ratio };
    ratio.clamp(MIN_SCALE, MAX_SCALE)
}

/// Caches the viewport and the scale factor derived from it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaleManager {
    width: f32,
    height: f32,
    is_mobile: bool,
    factor: f32,
}

impl ScaleManager {
    /// Creates a manager for the provided viewport.
    #[must_use]
    pub fn new(width: f32, height: f32, is_mobile: bool) -> Self {
        Self {
            width,
            height,
            is_mobile,
            factor: compute_scale_factor(width, height, is_mobile),
        }
    }

    /// Recomputes the factor for a new viewport size.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
        self.factor = compute_scale_factor(width, height, self.is_mobile);
    }

    /// Current scale factor.
    #[must_use]
    pub const fn factor(&self) -> f32 {
        self.factor
    }

    /// Cached viewport width.
    #[must_use]
    pub const fn width(&self) -> f32 {
        self.width
    }

    /// Cached viewport height.
    #[must_use]
    pub const fn height(&self) -> f32 {
        self.height
    }

    /// Applies the factor to a base presentation size.
    #[must_use]
    pub fn scaled(&self, base: f32) -> f32 {
        base * self.factor
    }
}
