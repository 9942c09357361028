// src/mapper.rs
use tracing::trace;

#[derive(Debug, Clone)]
pub struct CoordinateMapper {
    screen_width: i32,
    screen_height: i32,
    smoothing: f64,
    last_position: Option<(i32, i32)>,
}

impl CoordinateMapper {
    pub fn new(screen_width: i32, screen_height: i32, smoothing: f64) -> Self {
        Self {
            screen_width: screen_width.max(1),
            screen_height: screen_height.max(1),
            smoothing,
            last_position: None,
        }
    }

    #[cfg(test)]
    pub fn last_position(&self) -> Option<(i32, i32)> {
        self.last_position
    }

    pub fn reset(&mut self) {
        self.last_position = None;
    }

    // Axes above 1.0 are frame pixels. The first call after a reset is
    // unsmoothed. Output is clamped to the screen.
    pub fn map_to_screen(
        &mut self,
        x: f64,
        y: f64,
        frame_width: u32,
        frame_height: u32,
        flip_x: bool,
    ) -> (i32, i32) {
        let mut norm_x = if x > 1.0 { x / frame_width as f64 } else { x };
        let norm_y = if y > 1.0 { y / frame_height as f64 } else { y };

        if flip_x {
            norm_x = 1.0 - norm_x;
        }

        let (raw_x, raw_y) = self.raw_target(norm_x, norm_y);

        let (mut screen_x, mut screen_y) = (raw_x, raw_y);
        if let Some((last_x, last_y)) = self.last_position {
            let alpha = self.smoothing;
            screen_x = (alpha * raw_x as f64 + (1.0 - alpha) * last_x as f64) as i32;
            screen_y = (alpha * raw_y as f64 + (1.0 - alpha) * last_y as f64) as i32;
        }

        let screen_x = screen_x.clamp(0, self.screen_width - 1);
        let screen_y = screen_y.clamp(0, self.screen_height - 1);
        trace!(raw_x, raw_y, screen_x, screen_y, "mapped to screen");

        self.last_position = Some((screen_x, screen_y));
        (screen_x, screen_y)
    }

    fn raw_target(&self, norm_x: f64, norm_y: f64) -> (i32, i32) {
        (
            (norm_x * self.screen_width as f64) as i32,
            (norm_y * self.screen_height as f64) as i32,
        )
    }
}
