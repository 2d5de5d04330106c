use crate::config::{CELL_SIZE, MAX_VIEW_ZOOM, MIN_VIEW_ZOOM};

/// Pan and zoom of the grid inside the window, in physical pixels.
///
/// The grid is drawn at `CELL_SIZE * zoom` pixels per cell with its top-left corner
/// at (`pan_x`, `pan_y`). Panning is clamped so no empty space opens up beyond the
/// grid edges while the grid is larger than the window.
#[derive(Clone, Debug)]
pub struct View {
    pub pan_x: f32,
    pub pan_y: f32,
    pub zoom: f32,
    grid_width: u32,
    grid_height: u32,
    viewport_width: f32,
    viewport_height: f32,
    drag: Option<Drag>,
}

#[derive(Clone, Copy, Debug)]
struct Drag {
    cursor_x: f32,
    cursor_y: f32,
    pan_x: f32,
    pan_y: f32,
}

impl View {
    pub fn new(grid_width: u32, grid_height: u32, viewport_width: u32, viewport_height: u32) -> Self {
        Self {
            pan_x: 0.0,
            pan_y: 0.0,
            zoom: MIN_VIEW_ZOOM,
            grid_width,
            grid_height,
            viewport_width: viewport_width as f32,
            viewport_height: viewport_height as f32,
            drag: None,
        }
    }

    /// Back to 1x with the grid's top-left corner at the window's
    pub fn reset(&mut self) {
        self.pan_x = 0.0;
        self.pan_y = 0.0;
        self.zoom = MIN_VIEW_ZOOM;
        self.drag = None;
    }

    pub fn set_grid_size(&mut self, width: u32, height: u32) {
        self.grid_width = width;
        self.grid_height = height;
        self.clamp_pan();
    }

    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.viewport_width = width as f32;
        self.viewport_height = height as f32;
        self.clamp_pan();
    }

    /// On-screen size of one cell
    pub fn cell_pixels(&self) -> f32 {
        CELL_SIZE as f32 * self.zoom
    }

    /// Zoom by `factor` keeping the point under the cursor fixed
    pub fn zoom_at(&mut self, factor: f32, cursor_x: f32, cursor_y: f32) {
        let new_zoom = (self.zoom * factor).clamp(MIN_VIEW_ZOOM, MAX_VIEW_ZOOM);
        let ratio = new_zoom / self.zoom;
        self.pan_x = cursor_x - (cursor_x - self.pan_x) * ratio;
        self.pan_y = cursor_y - (cursor_y - self.pan_y) * ratio;
        self.zoom = new_zoom;
        self.clamp_pan();
    }

    /// Zoom around the window center
    pub fn zoom_centered(&mut self, factor: f32) {
        self.zoom_at(factor, self.viewport_width / 2.0, self.viewport_height / 2.0);
    }

    pub fn pan_by(&mut self, dx: f32, dy: f32) {
        self.pan_x += dx;
        self.pan_y += dy;
        self.clamp_pan();
    }

    pub fn begin_drag(&mut self, cursor_x: f32, cursor_y: f32) {
        self.drag = Some(Drag {
            cursor_x,
            cursor_y,
            pan_x: self.pan_x,
            pan_y: self.pan_y,
        });
    }

    pub fn drag_to(&mut self, cursor_x: f32, cursor_y: f32) {
        let Some(drag) = self.drag else {
            return;
        };
        self.pan_x = drag.pan_x + (cursor_x - drag.cursor_x);
        self.pan_y = drag.pan_y + (cursor_y - drag.cursor_y);
        self.clamp_pan();
    }

    pub fn end_drag(&mut self) {
        self.drag = None;
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Grid cell under a window position, if any
    pub fn screen_to_cell(&self, x: f32, y: f32) -> Option<(u32, u32)> {
        let cx = ((x - self.pan_x) / self.cell_pixels()).floor();
        let cy = ((y - self.pan_y) / self.cell_pixels()).floor();
        if cx < 0.0 || cy < 0.0 || cx >= self.grid_width as f32 || cy >= self.grid_height as f32 {
            return None;
        }
        Some((cx as u32, cy as u32))
    }

    fn clamp_pan(&mut self) {
        let content_width = self.grid_width as f32 * self.cell_pixels();
        let content_height = self.grid_height as f32 * self.cell_pixels();
        let min_x = (self.viewport_width - content_width).min(0.0);
        let min_y = (self.viewport_height - content_height).min(0.0);
        self.pan_x = self.pan_x.clamp(min_x, 0.0);
        self.pan_y = self.pan_y.clamp(min_y, 0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // 100x50 grid at 4px fills a 400x200 window exactly
    fn view() -> View {
        View::new(100, 50, 400, 200)
    }

    #[test]
    fn test_cannot_pan_at_full_size() {
        let mut view = view();
        view.pan_by(-30.0, 25.0);
        assert_eq!((view.pan_x, view.pan_y), (0.0, 0.0));
    }

    #[test]
    fn test_zoom_keeps_cursor_point() {
        let mut view = view();
        let before = view.screen_to_cell(200.0, 100.0);
        view.zoom_at(2.0, 200.0, 100.0);
        assert_eq!(view.zoom, 2.0);
        assert_eq!((view.pan_x, view.pan_y), (-200.0, -100.0));
        assert_eq!(view.screen_to_cell(200.0, 100.0), before);
    }

    #[test]
    fn test_zoom_limits() {
        let mut view = view();
        view.zoom_at(0.5, 0.0, 0.0);
        assert_eq!(view.zoom, MIN_VIEW_ZOOM);
        for _ in 0..30 {
            view.zoom_centered(1.2);
        }
        assert_eq!(view.zoom, MAX_VIEW_ZOOM);
    }

    #[test]
    fn test_pan_clamped_to_grid_edges() {
        let mut view = view();
        view.zoom_at(2.0, 0.0, 0.0);
        view.pan_by(-10_000.0, -10_000.0);
        // content is 800x400 in a 400x200 window
        assert_eq!((view.pan_x, view.pan_y), (-400.0, -200.0));
        view.pan_by(10_000.0, 10_000.0);
        assert_eq!((view.pan_x, view.pan_y), (0.0, 0.0));
    }

    #[test]
    fn test_drag_pans_from_start() {
        let mut view = view();
        view.zoom_at(4.0, 0.0, 0.0);
        view.begin_drag(100.0, 100.0);
        view.drag_to(60.0, 70.0);
        assert_eq!((view.pan_x, view.pan_y), (-40.0, -30.0));
        view.drag_to(50.0, 50.0);
        assert_eq!((view.pan_x, view.pan_y), (-50.0, -50.0));
        view.end_drag();
        view.drag_to(0.0, 0.0);
        assert_eq!((view.pan_x, view.pan_y), (-50.0, -50.0));
    }

    #[test]
    fn test_screen_to_cell() {
        let view = view();
        assert_eq!(view.screen_to_cell(0.0, 0.0), Some((0, 0)));
        assert_eq!(view.screen_to_cell(9.0, 5.0), Some((2, 1)));
        assert_eq!(view.screen_to_cell(400.0, 0.0), None);
        assert_eq!(view.screen_to_cell(-1.0, 0.0), None);
    }
}
