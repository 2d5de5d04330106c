use wgpu::{Buffer, BufferUsages, Device, Queue};

use crate::canvas::Canvas;
use crate::view::View;

/// Storage buffers mirroring the canvas plus the view uniform
pub struct GridBuffers {
    /// One packed 0xRRGGBB color per cell
    pub cells_buffer: Buffer,
    /// One agent marker per cell, 0 when empty
    pub overlay_buffer: Buffer,
    /// Uniform buffer for view parameters
    pub view_buffer: Buffer,
    /// Grid dimensions
    pub width: u32,
    pub height: u32,
}

/// View parameters passed to the render shader (32 bytes, aligned to 16)
#[repr(C)]
#[derive(Clone, Copy, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ViewParams {
    pub grid_width: u32,
    pub grid_height: u32,
    pub cell_pixels: f32,
    /// 1 when the surface encodes sRGB on write, so the shader must output linear color
    pub srgb_surface: u32,

    pub pan_x: f32,
    pub pan_y: f32,
    pub viewport_width: f32,
    pub viewport_height: f32,
}

impl ViewParams {
    pub fn new(grid: (u32, u32), view: &View, viewport: (u32, u32), srgb_surface: bool) -> Self {
        Self {
            grid_width: grid.0,
            grid_height: grid.1,
            cell_pixels: view.cell_pixels(),
            srgb_surface: srgb_surface as u32,
            pan_x: view.pan_x,
            pan_y: view.pan_y,
            viewport_width: viewport.0 as f32,
            viewport_height: viewport.1 as f32,
        }
    }
}

impl GridBuffers {
    /// Create buffers sized for a `width` x `height` grid
    pub fn new(device: &Device, width: u32, height: u32) -> Self {
        let buffer_size = (width as u64) * (height as u64) * std::mem::size_of::<u32>() as u64;

        let cells_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("cells-buffer"),
            size: buffer_size,
            usage: BufferUsages::STORAGE | BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let overlay_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("overlay-buffer"),
            size: buffer_size,
            usage: BufferUsages::STORAGE | BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let view_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("view-params-buffer"),
            size: std::mem::size_of::<ViewParams>() as u64,
            usage: BufferUsages::UNIFORM | BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        Self {
            cells_buffer,
            overlay_buffer,
            view_buffer,
            width,
            height,
        }
    }

    /// Whether these buffers fit the canvas, i.e. no reallocation is needed
    pub fn matches(&self, canvas: &Canvas) -> bool {
        self.width == canvas.width() && self.height == canvas.height()
    }

    /// Upload the canvas cells and agent overlay
    pub fn upload(&self, queue: &Queue, canvas: &Canvas) {
        queue.write_buffer(&self.cells_buffer, 0, bytemuck::cast_slice(canvas.cells()));
        queue.write_buffer(&self.overlay_buffer, 0, bytemuck::cast_slice(canvas.overlay()));
    }

    /// Update view parameters
    pub fn update_view(&self, queue: &Queue, view: &View, viewport: (u32, u32), srgb_surface: bool) {
        let params = ViewParams::new((self.width, self.height), view, viewport, srgb_surface);
        queue.write_buffer(&self.view_buffer, 0, bytemuck::bytes_of(&params));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_params_size() {
        assert_eq!(std::mem::size_of::<ViewParams>(), 32);
    }

    #[test]
    fn test_srgb_flag_follows_surface() {
        let view = View::new(16, 8, 64, 32);
        let srgb = ViewParams::new((16, 8), &view, (64, 32), true);
        let plain = ViewParams::new((16, 8), &view, (64, 32), false);
        assert_eq!(srgb.srgb_surface, 1);
        assert_eq!(plain.srgb_surface, 0);
        assert_eq!((plain.grid_width, plain.grid_height), (16, 8));
        assert_eq!(plain.viewport_width, 64.0);
    }
}
