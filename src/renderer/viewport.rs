//! Viewport sizing and projection bounds

/// Orthographic bounds of the visible screen space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

/// Drawable surface size in physical pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
        }
    }

    /// Physical size for a CSS-pixel element, with the device pixel ratio
    /// capped at `max_ratio`
    pub fn from_css(css_width: f64, css_height: f64, device_pixel_ratio: f64, max_ratio: f64) -> Self {
        let ratio = device_pixel_ratio.clamp(1.0, max_ratio.max(1.0));
        Self::new(
            (css_width * ratio).round() as u32,
            (css_height * ratio).round() as u32,
        )
    }

    /// Scale down uniformly so neither side exceeds `max_dimension`
    ///
    /// The aspect ratio is kept (to the nearest pixel).
    pub fn fit_within(self, max_dimension: u32) -> Self {
        let max_dimension = max_dimension.max(1);
        let longest = self.width.max(self.height);
        if longest <= max_dimension {
            return self;
        }
        let scale = f64::from(max_dimension) / f64::from(longest);
        Self::new(
            ((f64::from(self.width) * scale).round() as u32).min(max_dimension),
            ((f64::from(self.height) * scale).round() as u32).min(max_dimension),
        )
    }

    #[inline]
    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    /// Screen space spans one unit vertically either side of center
    pub fn projection(&self) -> Projection {
        let aspect = self.aspect();
        Projection {
            left: -aspect,
            right: aspect,
            top: 1.0,
            bottom: -1.0,
        }
    }

    /// Apply a resize, ignoring degenerate sizes. Returns whether it changed.
    pub fn resize(&mut self, width: u32, height: u32) -> bool {
        if width == 0 || height == 0 || (width == self.width && height == self.height) {
            return false;
        }
        self.width = width;
        self.height = height;
        true
    }
}
