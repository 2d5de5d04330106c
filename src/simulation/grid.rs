use crate::simulation::rules::ColorState;

/// Dense row-major grid of color states
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    width: u32,
    height: u32,
    cells: Vec<ColorState>,
}

impl Grid {
    /// Create a grid with every cell in state 0. Dimensions are clamped to at least 1.
    pub fn new(width: u32, height: u32) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        Self {
            width,
            height,
            cells: vec![0; (width * height) as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// State at (x, y), or `None` outside the grid
    pub fn get(&self, x: u32, y: u32) -> Option<ColorState> {
        self.index(x, y).map(|i| self.cells[i])
    }

    /// Write `state` at (x, y). Out-of-range writes are ignored.
    pub fn set(&mut self, x: u32, y: u32, state: ColorState) {
        if let Some(i) = self.index(x, y) {
            self.cells[i] = state;
        }
    }

    pub fn cells(&self) -> &[ColorState] {
        &self.cells
    }

    /// Number of cells not in state 0
    pub fn painted_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c != 0).count()
    }

    fn index(&self, x: u32, y: u32) -> Option<usize> {
        if x < self.width && y < self.height {
            Some((y * self.width + x) as usize)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_creation() {
        let grid = Grid::new(100, 50);
        assert_eq!(grid.cells().len(), 5000);
        assert!(grid.cells().iter().all(|&c| c == 0));
    }

    #[test]
    fn test_zero_dimensions_clamped() {
        let grid = Grid::new(0, 0);
        assert_eq!((grid.width(), grid.height()), (1, 1));
    }

    #[test]
    fn test_set_and_get_row_major() {
        let mut grid = Grid::new(4, 3);
        grid.set(3, 1, 2);
        assert_eq!(grid.get(3, 1), Some(2));
        assert_eq!(grid.cells()[1 * 4 + 3], 2);
        assert_eq!(grid.painted_count(), 1);
    }

    #[test]
    fn test_out_of_range() {
        let mut grid = Grid::new(4, 3);
        grid.set(4, 0, 1);
        grid.set(0, 3, 1);
        assert_eq!(grid.get(4, 0), None);
        assert_eq!(grid.painted_count(), 0);
    }
}
