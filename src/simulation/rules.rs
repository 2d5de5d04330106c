use std::fmt;

use rand::Rng;

use crate::config::{DEFAULT_GROUP_COLOR, DEFAULT_GROUP_NAME, MAX_TURN_REDRAWS};

/// A color state: both a paint color and an index into a rule table
pub type ColorState = u8;

/// Stable identity of a rule group. Assigned from a monotonic counter and never reused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GroupId(pub u32);

/// How an agent rotates before stepping forward
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Turn {
    Left,
    Right,
    Straight,
    UTurn,
}

impl Turn {
    pub const ALL: [Turn; 4] = [Turn::Left, Turn::Right, Turn::Straight, Turn::UTurn];

    /// Rotation in clockwise quarter steps
    pub fn delta(self) -> i32 {
        match self {
            Turn::Left => -1,
            Turn::Right => 1,
            Turn::Straight => 0,
            Turn::UTurn => 2,
        }
    }

    pub fn letter(self) -> char {
        match self {
            Turn::Left => 'L',
            Turn::Right => 'R',
            Turn::Straight => 'S',
            Turn::UTurn => 'U',
        }
    }

    fn next(self) -> Turn {
        match self {
            Turn::Left => Turn::Right,
            Turn::Right => Turn::Straight,
            Turn::Straight => Turn::UTurn,
            Turn::UTurn => Turn::Left,
        }
    }
}

/// What an agent does on a cell of a given color
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rule {
    pub turn: Turn,
    pub next_color: ColorState,
}

impl Rule {
    pub fn new(turn: Turn, next_color: ColorState) -> Self {
        Self { turn, next_color }
    }
}

/// Packed 0xRRGGBB display color
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb(pub u32);

impl Rgb {
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Rgb(rng.gen_range(0..=0xFF_FFFF))
    }

    pub fn to_hex(self) -> String {
        format!("#{:06X}", self.0 & 0xFF_FFFF)
    }
}

/// Rules indexed by the color state an agent stands on
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RuleTable {
    rules: Vec<Rule>,
}

impl RuleTable {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    /// Langton's ant generalized to `color_count` states: even states turn right,
    /// odd states turn left, each cell advances to the next color cyclically.
    ///
    /// With two colors this is the classic `[{Right, 1}, {Left, 0}]`. With more colors it
    /// is a different automaton from the classic ant: every state is reachable and
    /// painted, rather than the classic two-entry table that never leaves states 0 and 1.
    pub fn langton(color_count: usize) -> Self {
        let rules = (0..color_count)
            .map(|state| {
                let turn = if state % 2 == 0 { Turn::Right } else { Turn::Left };
                Rule::new(turn, ((state + 1) % color_count) as ColorState)
            })
            .collect();
        Self { rules }
    }

    /// Random table with one rule per color state.
    ///
    /// Turns are drawn uniformly, but a candidate is redrawn while every rule chosen
    /// so far uses that same turn, so the finished table never consists of a single
    /// repeated turn. Next colors are uniform over `0..color_count`.
    pub fn random<R: Rng + ?Sized>(color_count: usize, rng: &mut R) -> Self {
        let mut rules: Vec<Rule> = Vec::with_capacity(color_count);

        for _ in 0..color_count {
            let mut turn = Turn::ALL[rng.gen_range(0..Turn::ALL.len())];
            let mut redraws = 0;
            while all_share_turn(&rules, turn) {
                if redraws == MAX_TURN_REDRAWS {
                    turn = turn.next();
                    break;
                }
                turn = Turn::ALL[rng.gen_range(0..Turn::ALL.len())];
                redraws += 1;
            }

            let next_color = rng.gen_range(0..color_count) as ColorState;
            rules.push(Rule::new(turn, next_color));
        }

        Self { rules }
    }

    /// Rule for `state`, or `None` when the table does not cover it
    pub fn lookup(&self, state: ColorState) -> Option<Rule> {
        self.rules.get(state as usize).copied()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter()
    }
}

/// Compact form for logs: turn letter then next color, e.g. `R1 L0`
impl fmt::Display for RuleTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, rule) in self.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}{}", rule.turn.letter(), rule.next_color)?;
        }
        Ok(())
    }
}

/// True when `rules` is non-empty and every entry already uses `turn`
fn all_share_turn(rules: &[Rule], turn: Turn) -> bool {
    !rules.is_empty() && rules.iter().all(|rule| rule.turn == turn)
}

/// A named, colored rule table shared by every agent that belongs to it
#[derive(Clone, Debug)]
pub struct RuleGroup {
    pub id: GroupId,
    pub name: String,
    pub color: Rgb,
    pub rules: RuleTable,
}

impl RuleGroup {
    /// The group seeded on reset: red Langton's ants
    pub fn langton(id: GroupId, color_count: usize) -> Self {
        Self {
            id,
            name: DEFAULT_GROUP_NAME.to_string(),
            color: Rgb(DEFAULT_GROUP_COLOR),
            rules: RuleTable::langton(color_count),
        }
    }

    /// A synthesized group named after how many groups have been created so far
    pub fn random<R: Rng + ?Sized>(id: GroupId, color_count: usize, rng: &mut R) -> Self {
        Self {
            id,
            name: format!("Group {}", id.0 + 1),
            color: Rgb::random(rng),
            rules: RuleTable::random(color_count, rng),
        }
    }

    pub fn lookup(&self, state: ColorState) -> Option<Rule> {
        self.rules.lookup(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_langton_two_colors() {
        let table = RuleTable::langton(2);
        assert_eq!(
            table.iter().copied().collect::<Vec<_>>(),
            vec![Rule::new(Turn::Right, 1), Rule::new(Turn::Left, 0)]
        );
    }

    #[test]
    fn test_langton_alternates_and_cycles_colors() {
        let table = RuleTable::langton(5);
        assert_eq!(table.len(), 5);
        assert_eq!(table.lookup(2), Some(Rule::new(Turn::Right, 3)));
        assert_eq!(table.lookup(3), Some(Rule::new(Turn::Left, 4)));
        assert_eq!(table.lookup(4), Some(Rule::new(Turn::Right, 0)));
    }

    #[test]
    fn test_lookup_out_of_range_is_none() {
        let table = RuleTable::new(vec![Rule::new(Turn::Left, 1)]);
        assert_eq!(table.lookup(0), Some(Rule::new(Turn::Left, 1)));
        assert_eq!(table.lookup(1), None);
        assert_eq!(table.lookup(255), None);
    }

    #[test]
    fn test_turn_deltas() {
        let deltas: Vec<i32> = Turn::ALL.iter().map(|t| t.delta()).collect();
        assert_eq!(deltas, vec![-1, 1, 0, 2]);
    }

    #[test]
    fn test_random_table_is_never_single_turn() {
        let mut rng = StdRng::seed_from_u64(7);
        for color_count in 2..=12 {
            for _ in 0..200 {
                let table = RuleTable::random(color_count, &mut rng);
                assert_eq!(table.len(), color_count);
                let first = table.lookup(0).unwrap().turn;
                assert!(
                    table.iter().any(|rule| rule.turn != first),
                    "all {} rules turned {:?}",
                    color_count,
                    first
                );
            }
        }
    }

    #[test]
    fn test_random_table_colors_in_range() {
        let mut rng = StdRng::seed_from_u64(11);
        let table = RuleTable::random(6, &mut rng);
        assert!(table.iter().all(|rule| (rule.next_color as usize) < 6));
    }

    #[test]
    fn test_random_group_naming() {
        let mut rng = StdRng::seed_from_u64(3);
        let group = RuleGroup::random(GroupId(4), 3, &mut rng);
        assert_eq!(group.name, "Group 5");
        assert!(group.color.0 <= 0xFF_FFFF);
        assert_eq!(group.rules.len(), 3);
    }

    #[test]
    fn test_display() {
        assert_eq!(RuleTable::langton(3).to_string(), "R1 L2 R0");
        assert_eq!(RuleTable::new(vec![]).to_string(), "");
    }

    #[test]
    fn test_rgb_hex() {
        assert_eq!(Rgb(0xFF0000).to_hex(), "#FF0000");
        assert_eq!(Rgb(0x00000A).to_hex(), "#00000A");
    }
}
