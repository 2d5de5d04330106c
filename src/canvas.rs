use crate::config::{FALLBACK_CELL_COLOR, PALETTE};
use crate::simulation::{ColorState, Grid, PaintInstruction, SimulationEngine};

/// Overlay value for a cell without an agent
pub const NO_AGENT: u32 = 0;

/// Marks an overlay entry as holding an agent color
const AGENT_FLAG: u32 = 0xFF00_0000;

/// CPU-side image of the simulation, laid out exactly like the GPU buffers.
///
/// `cells` holds one packed 0xRRGGBB color per grid cell and, after creation, is
/// updated only from paint instructions. `overlay` holds the marker color of the agent on each cell,
/// rebuilt every frame.
pub struct Canvas {
    width: u32,
    height: u32,
    cells: Vec<u32>,
    overlay: Vec<u32>,
    marked: Vec<usize>,
}

impl Canvas {
    /// Canvas showing the current state of `grid`, without agents
    pub fn from_grid(grid: &Grid) -> Self {
        let size = grid.cells().len();
        Self {
            width: grid.width(),
            height: grid.height(),
            cells: grid.cells().iter().map(|&state| cell_color(state)).collect(),
            overlay: vec![NO_AGENT; size],
            marked: Vec::new(),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn cells(&self) -> &[u32] {
        &self.cells
    }

    pub fn overlay(&self) -> &[u32] {
        &self.overlay
    }

    /// Paint the cells changed by one tick
    pub fn apply(&mut self, paints: &[PaintInstruction]) {
        for paint in paints {
            if let Some(i) = self.index(paint.x, paint.y) {
                self.cells[i] = cell_color(paint.color);
            }
        }
    }

    /// Redraw agent markers at their current cells in their group's color
    pub fn mark_agents(&mut self, engine: &SimulationEngine) {
        for i in self.marked.drain(..) {
            self.overlay[i] = NO_AGENT;
        }

        for agent in engine.agents() {
            let cell = self.index(agent.x, agent.y);
            let (Some(i), Some(group)) = (cell, engine.group(agent.group)) else {
                continue;
            };
            self.overlay[i] = AGENT_FLAG | (group.color.0 & 0xFF_FFFF);
            self.marked.push(i);
        }
    }

    fn index(&self, x: u32, y: u32) -> Option<usize> {
        if x < self.width && y < self.height {
            Some((y * self.width + x) as usize)
        } else {
            None
        }
    }
}

/// Display color for a color state
pub fn cell_color(state: ColorState) -> u32 {
    PALETTE
        .get(state as usize)
        .copied()
        .unwrap_or(FALLBACK_CELL_COLOR)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::Heading;

    #[test]
    fn test_palette_lookup() {
        assert_eq!(cell_color(0), 0x000000);
        assert_eq!(cell_color(1), 0xFFFFFF);
        assert_eq!(cell_color(5), 0xFFA500);
        assert_eq!(cell_color(10), FALLBACK_CELL_COLOR);
    }

    #[test]
    fn test_new_canvas_is_state_zero() {
        let canvas = Canvas::from_grid(&Grid::new(8, 4));
        assert_eq!(canvas.cells().len(), 32);
        assert!(canvas.cells().iter().all(|&c| c == 0x000000));
        assert!(canvas.overlay().iter().all(|&c| c == NO_AGENT));
    }

    #[test]
    fn test_apply_follows_engine_grid() {
        let mut engine = SimulationEngine::with_seed(3, 12, 12, 2);
        let group = engine.add_group();
        for _ in 0..6 {
            engine.add_agent(group);
        }
        let mut canvas = Canvas::from_grid(engine.grid());
        for _ in 0..200 {
            canvas.apply(engine.tick());
        }

        let expected: Vec<u32> = engine.grid().cells().iter().map(|&s| cell_color(s)).collect();
        assert_eq!(canvas.cells(), expected.as_slice());
    }

    #[test]
    fn test_from_grid_copies_states() {
        let mut grid = Grid::new(3, 2);
        grid.set(2, 1, 3);
        let canvas = Canvas::from_grid(&grid);
        assert_eq!((canvas.width(), canvas.height()), (3, 2));
        assert_eq!(canvas.cells()[5], 0xFF00FF);
        assert_eq!(canvas.cells()[0], 0x000000);
    }

    #[test]
    fn test_agent_markers_move_with_agents() {
        let mut engine = SimulationEngine::with_seed(2, 10, 10, 2);
        let group = engine.groups().next().unwrap().id;
        engine.add_agent_at(group, 3, 3, Heading::Up);

        let mut canvas = Canvas::from_grid(engine.grid());
        canvas.mark_agents(&engine);
        assert_eq!(canvas.overlay()[3 * 10 + 3], 0xFFFF0000);

        engine.tick();
        canvas.mark_agents(&engine);
        // turned right on color 0, now at (4, 3)
        assert_eq!(canvas.overlay()[3 * 10 + 3], NO_AGENT);
        assert_eq!(canvas.overlay()[3 * 10 + 4], 0xFFFF0000);
        assert_eq!(canvas.overlay().iter().filter(|&&c| c != NO_AGENT).count(), 1);
    }

    #[test]
    fn test_black_group_still_marked() {
        let mut engine = SimulationEngine::with_seed(2, 4, 4, 2);
        let group = engine.add_group_with_rules(
            "shadow",
            crate::simulation::Rgb(0x000000),
            crate::simulation::RuleTable::langton(2),
        );
        engine.add_agent_at(group, 1, 1, Heading::Up);
        let mut canvas = Canvas::from_grid(engine.grid());
        canvas.mark_agents(&engine);
        assert_ne!(canvas.overlay()[5], NO_AGENT);
    }
}
