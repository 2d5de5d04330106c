use std::collections::BTreeMap;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::{MAX_COLOR_COUNT, MIN_COLOR_COUNT};
use crate::simulation::agent::{Agent, Heading};
use crate::simulation::grid::Grid;
use crate::simulation::rules::{ColorState, GroupId, Rgb, RuleGroup, RuleTable};

/// A cell repainted during a tick
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PaintInstruction {
    pub x: u32,
    pub y: u32,
    pub color: ColorState,
}

/// Owns the grid, the rule groups and the agents of one simulation.
///
/// All mutation happens through `&mut self`, so commands from the UI are applied
/// between ticks and never interleave with one.
pub struct SimulationEngine {
    grid: Grid,
    groups: BTreeMap<GroupId, RuleGroup>,
    agents: Vec<Agent>,
    color_count: usize,
    next_group_id: u32,
    paints: Vec<PaintInstruction>,
    tick_count: u64,
    rng: StdRng,
}

impl SimulationEngine {
    /// Create an engine with an entropy-seeded RNG
    pub fn new(color_count: usize, width: u32, height: u32) -> Self {
        Self::with_rng(color_count, width, height, StdRng::from_entropy())
    }

    /// Create an engine whose random placement and rule synthesis are reproducible
    pub fn with_seed(color_count: usize, width: u32, height: u32, seed: u64) -> Self {
        Self::with_rng(color_count, width, height, StdRng::seed_from_u64(seed))
    }

    fn with_rng(color_count: usize, width: u32, height: u32, rng: StdRng) -> Self {
        let mut engine = Self {
            grid: Grid::new(width, height),
            groups: BTreeMap::new(),
            agents: Vec::new(),
            color_count: 0,
            next_group_id: 0,
            paints: Vec::new(),
            tick_count: 0,
            rng,
        };
        engine.reset(color_count, width, height);
        engine
    }

    /// Start a new run on a blank `width` x `height` grid.
    ///
    /// Agents are always cleared. Groups are rebuilt (a single Langton group) when the
    /// color count changes or no group exists; otherwise the existing groups are kept.
    pub fn reset(&mut self, color_count: usize, width: u32, height: u32) {
        let color_count = color_count.clamp(MIN_COLOR_COUNT, MAX_COLOR_COUNT);

        self.grid = Grid::new(width, height);
        self.agents.clear();
        self.paints.clear();
        self.tick_count = 0;

        if color_count != self.color_count || self.groups.is_empty() {
            self.groups.clear();
            self.color_count = color_count;
            let id = self.allocate_group_id();
            self.groups.insert(id, RuleGroup::langton(id, color_count));
        }

        log::info!(
            "Reset: {}x{} grid, {} colors, {} group(s)",
            self.grid.width(),
            self.grid.height(),
            self.color_count,
            self.groups.len()
        );
    }

    /// Advance every agent once and return the cells painted this tick.
    ///
    /// Agents decide in list order against the grid as it was before the tick; the
    /// paints are applied afterwards, so agents sharing a cell all read the same color.
    /// When several agents paint one cell the last in list order wins. An agent whose
    /// group has no rule for its cell does nothing this tick.
    pub fn tick(&mut self) -> &[PaintInstruction] {
        self.paints.clear();
        let width = self.grid.width();
        let height = self.grid.height();

        // Decide
        for agent in &mut self.agents {
            let Some(state) = self.grid.get(agent.x, agent.y) else {
                continue;
            };
            let Some(rule) = self.groups.get(&agent.group).and_then(|g| g.lookup(state)) else {
                continue;
            };

            agent.heading = agent.heading.turned(rule.turn);
            self.paints.push(PaintInstruction {
                x: agent.x,
                y: agent.y,
                color: rule.next_color,
            });
            agent.advance(width, height);
        }

        // Commit
        for paint in &self.paints {
            self.grid.set(paint.x, paint.y, paint.color);
        }

        self.tick_count += 1;
        &self.paints
    }

    /// Add a randomly synthesized group for the current color count
    pub fn add_group(&mut self) -> GroupId {
        let id = self.allocate_group_id();
        let group = RuleGroup::random(id, self.color_count, &mut self.rng);
        log::info!("Added {} ({}): {}", group.name, group.color.to_hex(), group.rules);
        self.groups.insert(id, group);
        id
    }

    /// Add a group with a caller-supplied rule table.
    ///
    /// The table may cover fewer states than the color count; agents standing on an
    /// uncovered state are skipped for that tick.
    pub fn add_group_with_rules(&mut self, name: &str, color: Rgb, rules: RuleTable) -> GroupId {
        let id = self.allocate_group_id();
        log::info!("Added {} ({}): {}", name, color.to_hex(), rules);
        self.groups.insert(
            id,
            RuleGroup {
                id,
                name: name.to_string(),
                color,
                rules,
            },
        );
        id
    }

    /// Remove a group and every agent following it. Returns how many agents went with it.
    pub fn remove_group(&mut self, id: GroupId) -> usize {
        let Some(group) = self.groups.remove(&id) else {
            log::warn!("Cannot remove unknown group {:?}", id);
            return 0;
        };

        let before = self.agents.len();
        self.agents.retain(|agent| agent.group != id);
        let removed = before - self.agents.len();

        log::info!("Removed {} and {} of its agents", group.name, removed);
        removed
    }

    /// Add an agent to `group`.
    ///
    /// The first agent on an empty field starts at the grid center facing up; later
    /// ones get a uniformly random cell and heading. Returns the agent's index, or
    /// `None` if the group does not exist.
    pub fn add_agent(&mut self, group: GroupId) -> Option<usize> {
        if !self.accepts_agents_for(group) {
            return None;
        }

        let (x, y, heading) = if self.agents.is_empty() {
            (self.grid.width() / 2, self.grid.height() / 2, Heading::Up)
        } else {
            (
                self.rng.gen_range(0..self.grid.width()),
                self.rng.gen_range(0..self.grid.height()),
                Heading::ALL[self.rng.gen_range(0..Heading::ALL.len())],
            )
        };
        self.add_agent_at(group, x, y, heading)
    }

    /// Add an agent at an explicit cell, clamped into the grid
    pub fn add_agent_at(&mut self, group: GroupId, x: u32, y: u32, heading: Heading) -> Option<usize> {
        if !self.accepts_agents_for(group) {
            return None;
        }

        let x = x.min(self.grid.width() - 1);
        let y = y.min(self.grid.height() - 1);
        self.agents.push(Agent::new(x, y, heading, group));
        log::debug!(
            "Agent {} of {:?} placed at ({}, {}) facing {:?}",
            self.agents.len() - 1,
            group,
            x,
            y,
            heading
        );
        Some(self.agents.len() - 1)
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    /// Groups in creation order
    pub fn groups(&self) -> impl Iterator<Item = &RuleGroup> {
        self.groups.values()
    }

    pub fn group(&self, id: GroupId) -> Option<&RuleGroup> {
        self.groups.get(&id)
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    pub fn color_count(&self) -> usize {
        self.color_count
    }

    /// Ticks run since the last reset
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    fn accepts_agents_for(&self, group: GroupId) -> bool {
        let known = self.groups.contains_key(&group);
        if !known {
            log::warn!("Cannot add agent: unknown group {:?}", group);
        }
        known
    }

    fn allocate_group_id(&mut self) -> GroupId {
        let id = GroupId(self.next_group_id);
        self.next_group_id += 1;
        id
    }
}
