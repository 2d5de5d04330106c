/// Size of one grid cell on screen, in pixels, at 1x zoom
pub const CELL_SIZE: u32 = 4;

/// Initial window size (logical pixels)
pub const WINDOW_WIDTH: u32 = 1024;
pub const WINDOW_HEIGHT: u32 = 768;

// ============================================
// Simulation Parameters
// ============================================

/// Number of color states used on startup
pub const DEFAULT_COLOR_COUNT: usize = 2;

/// Smallest color count a simulation may run with; lower requests are clamped
pub const MIN_COLOR_COUNT: usize = 2;

/// Largest color count; color states are stored as `u8`
pub const MAX_COLOR_COUNT: usize = 256;

/// Ticks per second used on startup
pub const DEFAULT_TICK_RATE: u32 = 10;

/// Smallest tick rate; lower requests are clamped
pub const MIN_TICK_RATE: u32 = 1;

/// Largest tick rate; higher requests are clamped. Keeps the tick interval at 100µs or more.
pub const MAX_TICK_RATE: u32 = 10_000;

/// Upper bound on redraws when a random turn would make every rule share one turn
pub const MAX_TURN_REDRAWS: u32 = 64;

/// Name and marker color of the group seeded on every full reset
pub const DEFAULT_GROUP_NAME: &str = "Langton's ant";
pub const DEFAULT_GROUP_COLOR: u32 = 0xFF0000;

// ============================================
// Cell Palette
// ============================================

/// Display colors (0xRRGGBB) for color states 0..10
pub const PALETTE: [u32; 10] = [
    0x000000, // black
    0xFFFFFF, // white
    0xFFFF00, // yellow
    0xFF00FF, // magenta
    0x00FFFF, // cyan
    0xFFA500, // orange
    0x800080, // purple
    0x808080, // gray
    0xFFC0CB, // pink
    0x008080, // teal
];

/// Color for any state past the end of the palette
pub const FALLBACK_CELL_COLOR: u32 = 0xFFFFFF;

// ============================================
// View
// ============================================

/// Zoom limits: 1x shows the whole grid, 10x is the closest view
pub const MIN_VIEW_ZOOM: f32 = 1.0;
pub const MAX_VIEW_ZOOM: f32 = 10.0;

/// Zoom factor per wheel notch / keypress
pub const VIEW_ZOOM_IN: f32 = 1.2;
pub const VIEW_ZOOM_OUT: f32 = 0.8;

/// Keyboard pan step in screen pixels
pub const VIEW_PAN_SPEED: f32 = 32.0;
