/// Drawing-surface geometry and visibility as last reported by the host.
///
/// Width and height are CSS (logical) pixels; the backing store is
/// `css * dpr`, never smaller than one pixel.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    pub dpr: f32,
    pub visible: bool,
}

impl Viewport {
    pub fn new(width: f32, height: f32, dpr: f32) -> Self {
        Self {
            width: sanitize(width, 1.0),
            height: sanitize(height, 1.0),
            dpr: sanitize(dpr, 1.0),
            visible: true,
        }
    }

    pub fn physical_size(&self) -> (u32, u32) {
        let w = (self.width * self.dpr).round() as u32;
        let h = (self.height * self.dpr).round() as u32;
        (w.max(1), h.max(1))
    }

    pub fn aspect(&self) -> f32 {
        self.width / self.height.max(1.0)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280.0, 720.0, 1.0)
    }
}

#[inline]
fn sanitize(v: f32, fallback: f32) -> f32 {
    if v.is_finite() && v > 0.0 {
        v
    } else {
        fallback
    }
}
