use crate::simulation::rules::{GroupId, Turn};

/// Cardinal heading, stored as clockwise quarter steps from Up
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Heading {
    Up = 0,
    Right = 1,
    Down = 2,
    Left = 3,
}

impl Heading {
    pub const ALL: [Heading; 4] = [Heading::Up, Heading::Right, Heading::Down, Heading::Left];

    /// Heading from any number of clockwise steps, normalized into 0..4
    pub fn from_steps(steps: i32) -> Self {
        Self::ALL[steps.rem_euclid(4) as usize]
    }

    pub fn steps(self) -> i32 {
        self as i32
    }

    pub fn turned(self, turn: Turn) -> Self {
        Self::from_steps(self.steps() + turn.delta())
    }

    /// Unit step (dx, dy) with y growing downward
    pub fn offset(self) -> (i64, i64) {
        match self {
            Heading::Up => (0, -1),
            Heading::Right => (1, 0),
            Heading::Down => (0, 1),
            Heading::Left => (-1, 0),
        }
    }
}

/// An ant: a position, a heading and the group whose rules it follows
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Agent {
    pub x: u32,
    pub y: u32,
    pub heading: Heading,
    pub group: GroupId,
}

impl Agent {
    pub fn new(x: u32, y: u32, heading: Heading, group: GroupId) -> Self {
        Self {
            x,
            y,
            heading,
            group,
        }
    }

    /// Step one cell along the current heading inside a `width` x `height` grid.
    ///
    /// A step that would leave the grid is clamped to the edge cell and the heading
    /// is turned to face back inward. Each axis is handled on its own.
    pub fn advance(&mut self, width: u32, height: u32) {
        let (dx, dy) = self.heading.offset();
        let nx = self.x as i64 + dx;
        let ny = self.y as i64 + dy;

        if nx < 0 {
            self.x = 0;
            self.heading = Heading::Right;
        } else if nx >= width as i64 {
            self.x = width - 1;
            self.heading = Heading::Left;
        } else {
            self.x = nx as u32;
        }

        if ny < 0 {
            self.y = 0;
            self.heading = Heading::Down;
        } else if ny >= height as i64 {
            self.y = height - 1;
            self.heading = Heading::Up;
        } else {
            self.y = ny as u32;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_normalization() {
        assert_eq!(Heading::from_steps(-1), Heading::Left);
        assert_eq!(Heading::from_steps(4), Heading::Up);
        assert_eq!(Heading::from_steps(6), Heading::Down);
    }

    #[test]
    fn test_turns() {
        assert_eq!(Heading::Up.turned(Turn::Left), Heading::Left);
        assert_eq!(Heading::Left.turned(Turn::Right), Heading::Up);
        assert_eq!(Heading::Right.turned(Turn::UTurn), Heading::Left);
        assert_eq!(Heading::Down.turned(Turn::Straight), Heading::Down);
    }

    #[test]
    fn test_advance_inside() {
        let mut agent = Agent::new(2, 2, Heading::Up, GroupId(0));
        agent.advance(5, 5);
        assert_eq!((agent.x, agent.y, agent.heading), (2, 1, Heading::Up));
    }

    #[test]
    fn test_reflecting_walls() {
        let cases = [
            (0, 2, Heading::Left, (0, 2, Heading::Right)),
            (4, 2, Heading::Right, (4, 2, Heading::Left)),
            (2, 0, Heading::Up, (2, 0, Heading::Down)),
            (2, 4, Heading::Down, (2, 4, Heading::Up)),
        ];
        for (x, y, heading, expected) in cases {
            let mut agent = Agent::new(x, y, heading, GroupId(0));
            agent.advance(5, 5);
            assert_eq!((agent.x, agent.y, agent.heading), expected);
        }
    }

    #[test]
    fn test_single_cell_grid() {
        let mut agent = Agent::new(0, 0, Heading::Down, GroupId(0));
        agent.advance(1, 1);
        assert_eq!((agent.x, agent.y, agent.heading), (0, 0, Heading::Up));
    }
}
