//! Viewport dimensions and projection aspect

/// Drawable area of the output surface
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    /// Both sides are clamped to at least one pixel so a minimized window
    /// never produces a zero or infinite aspect.
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: sanitize(width),
            height: sanitize(height),
        }
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.width / self.height
    }
}

fn sanitize(side: f32) -> f32 {
    if side.is_finite() {
        side.max(1.0)
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aspect_ratio() {
        assert_eq!(Viewport::new(1920.0, 1080.0).aspect_ratio(), 1920.0 / 1080.0);
        assert_eq!(Viewport::new(600.0, 800.0).aspect_ratio(), 0.75);
    }

    #[test]
    fn test_degenerate_sizes() {
        assert_eq!(Viewport::new(800.0, 0.0).aspect_ratio(), 800.0);
        assert_eq!(Viewport::new(0.0, 0.0).aspect_ratio(), 1.0);
        assert_eq!(Viewport::new(f32::NAN, 100.0).aspect_ratio(), 0.01);
    }
}
