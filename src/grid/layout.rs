use std::str::FromStr;

use crate::{
    env::Environment,
    error::{Error, Result},
};

use super::{Direction, Grid, GridState, Hazard, Pos, Position};

/// An immutable snapshot of a grid world: walls, food, capsules, hazards and the agent
///
/// Parsed from the classic text format, one character per cell:
///
/// | char | cell            |
/// |------|-----------------|
/// | `%`  | wall            |
/// | `.`  | food            |
/// | `o`  | capsule         |
/// | `P`  | agent (exactly one) |
/// | `G`  | hazard          |
/// | ` `  | empty           |
///
/// The first line of text is the top row.
#[derive(Clone, Debug, Hash, PartialEq, Eq)]
pub struct Layout {
    walls: Grid,
    food: Grid,
    capsules: Vec<Pos>,
    hazards: Vec<Hazard>,
    agent: Pos,
}

impl Layout {
    /// The same snapshot with the agent moved to `pos`
    pub fn with_agent_at(mut self, pos: Pos) -> Self {
        self.agent = pos;
        self
    }

    /// The same snapshot with every hazard weakened for `timer` steps
    pub fn with_scared_timer(mut self, timer: u32) -> Self {
        self.hazards.iter_mut().for_each(|h| h.scared_timer = timer);
        self
    }

    pub fn width(&self) -> usize {
        self.walls.width()
    }

    pub fn height(&self) -> usize {
        self.walls.height()
    }
}

impl FromStr for Layout {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let rows: Vec<&str> = s.lines().filter(|l| !l.is_empty()).collect();
        let width = rows.first().map_or(0, |r| r.chars().count());
        if width == 0 {
            return Err(Error::InvalidLayout("layout is empty".into()));
        }
        if let Some(row) = rows.iter().find(|r| r.chars().count() != width) {
            return Err(Error::InvalidLayout(format!(
                "row {row:?} is not {width} cells wide"
            )));
        }

        let height = rows.len();
        let mut walls = Grid::new(width, height);
        let mut food = Grid::new(width, height);
        let mut capsules = Vec::new();
        let mut hazards = Vec::new();
        let mut agent = None;

        for (row, line) in rows.iter().enumerate() {
            let y = (height - 1 - row) as i32;
            for (x, c) in line.chars().enumerate() {
                let pos = (x as i32, y);
                match c {
                    '%' => walls.set(pos, true),
                    '.' => food.set(pos, true),
                    'o' => capsules.push(pos),
                    'G' => hazards.push(Hazard {
                        position: pos,
                        scared_timer: 0,
                    }),
                    'P' if agent.is_none() => agent = Some(pos),
                    'P' => return Err(Error::InvalidLayout("more than one agent".into())),
                    ' ' => {}
                    other => {
                        return Err(Error::InvalidLayout(format!(
                            "unknown cell {other:?} at {pos:?}"
                        )))
                    }
                }
            }
        }

        let agent = agent.ok_or_else(|| Error::InvalidLayout("no agent".into()))?;
        Ok(Self {
            walls,
            food,
            capsules,
            hazards,
            agent,
        })
    }
}

impl GridState for Layout {
    fn walls(&self) -> &Grid {
        &self.walls
    }

    fn food(&self) -> &Grid {
        &self.food
    }

    fn capsules(&self) -> &[Pos] {
        &self.capsules
    }

    fn hazards(&self) -> &[Hazard] {
        &self.hazards
    }

    fn agent_position(&self) -> Pos {
        self.agent
    }
}

impl Position for Layout {
    fn position(&self) -> Pos {
        self.agent
    }
}

/// An [`Environment`] over [`Layout`] snapshots
///
/// A snapshot is terminal once no food remains or the agent shares a cell with a hazard
/// that is not weakened.
#[derive(Clone, Copy, Debug, Default)]
pub struct GridEnv;

impl Environment for GridEnv {
    type State = Layout;
    type Action = Direction;

    fn actions(&self, state: &Layout) -> Vec<Direction> {
        let caught = state
            .hazards
            .iter()
            .any(|h| !h.is_scared() && h.position == state.agent);
        if caught || state.food.count() == 0 {
            Vec::new()
        } else {
            state.legal_actions()
        }
    }
}
