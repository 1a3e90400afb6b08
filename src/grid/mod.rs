//! Grid geometry and the grid queries the domain-aware feature extractors consume

use std::collections::{HashSet, VecDeque};

use strum::{Display, VariantArray};

mod layout;

pub use layout::{GridEnv, Layout};

/// Cell coordinates `(x, y)`, with `y` growing upward
pub type Pos = (i32, i32);

/// A move on the grid
#[derive(VariantArray, Display, Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub enum Direction {
    North,
    South,
    East,
    West,
    Stop,
}

impl Direction {
    /// The four moves that change position
    pub const CARDINAL: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
    ];

    /// Unit displacement `(dx, dy)` of this move
    pub const fn vector(self) -> Pos {
        match self {
            Direction::North => (0, 1),
            Direction::South => (0, -1),
            Direction::East => (1, 0),
            Direction::West => (-1, 0),
            Direction::Stop => (0, 0),
        }
    }

    /// The position reached by taking this move from `pos`
    pub const fn apply(self, pos: Pos) -> Pos {
        let (dx, dy) = self.vector();
        (pos.0 + dx, pos.1 + dy)
    }
}

/// A rectangular boolean map, indexed by [`Pos`]
///
/// Reads outside the grid are `false`.
#[derive(Clone, Debug, Hash, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<bool>,
}

impl Grid {
    /// An all-`false` grid
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![false; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of cells, used to normalize distances across map sizes
    pub fn area(&self) -> usize {
        self.width * self.height
    }

    fn offset(&self, (x, y): Pos) -> Option<usize> {
        let (x, y) = (usize::try_from(x).ok()?, usize::try_from(y).ok()?);
        (x < self.width && y < self.height).then_some(y * self.width + x)
    }

    pub fn contains(&self, pos: Pos) -> bool {
        self.offset(pos).is_some()
    }

    pub fn get(&self, pos: Pos) -> bool {
        self.offset(pos).map_or(false, |i| self.cells[i])
    }

    /// **Panics** if `pos` is outside the grid
    pub fn set(&mut self, pos: Pos, value: bool) {
        let i = self
            .offset(pos)
            .unwrap_or_else(|| panic!("{pos:?} is outside a {}x{} grid", self.width, self.height));
        self.cells[i] = value;
    }

    /// Number of `true` cells
    pub fn count(&self) -> usize {
        self.cells.iter().filter(|&&c| c).count()
    }
}

/// The four grid-adjacent cells of `pos` that are inside the grid and not walls
pub fn adjacent(pos: Pos, walls: &Grid) -> impl Iterator<Item = Pos> + '_ {
    Direction::CARDINAL
        .into_iter()
        .map(move |d| d.apply(pos))
        .filter(move |&p| walls.contains(p) && !walls.get(p))
}

/// Whether `pos` is `from` itself or one legal move away from it
pub fn within_one_step(pos: Pos, from: Pos, walls: &Grid) -> bool {
    pos == from || adjacent(from, walls).any(|p| p == pos)
}

pub fn manhattan(a: Pos, b: Pos) -> u32 {
    a.0.abs_diff(b.0) + a.1.abs_diff(b.1)
}

/// Length of the shortest path from `start` to any cell satisfying `is_goal`
///
/// Breadth-first search over non-wall cells, expanding in FIFO order and stopping the first
/// time a goal cell is dequeued. `None` if no goal is reachable.
pub fn closest(start: Pos, walls: &Grid, is_goal: impl Fn(Pos) -> bool) -> Option<u32> {
    let mut fringe = VecDeque::from([(start, 0)]);
    let mut expanded = HashSet::new();
    while let Some((pos, dist)) = fringe.pop_front() {
        if !expanded.insert(pos) {
            continue;
        }
        if is_goal(pos) {
            return Some(dist);
        }
        fringe.extend(adjacent(pos, walls).map(|next| (next, dist + 1)));
    }
    None
}

/// A hazard on the grid; while `scared_timer` is positive it is weakened and may be pursued
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub struct Hazard {
    pub position: Pos,
    pub scared_timer: u32,
}

impl Hazard {
    pub fn is_scared(&self) -> bool {
        self.scared_timer > 0
    }
}

/// Grid queries a state must answer for the domain-aware extractors
pub trait GridState {
    fn walls(&self) -> &Grid;

    /// Cells holding a positive target
    fn food(&self) -> &Grid;

    fn capsules(&self) -> &[Pos];

    fn hazards(&self) -> &[Hazard];

    fn agent_position(&self) -> Pos;

    /// Moves the agent may take, including [`Direction::Stop`]
    fn legal_actions(&self) -> Vec<Direction> {
        let pos = self.agent_position();
        Direction::CARDINAL
            .into_iter()
            .filter(|d| {
                let next = d.apply(pos);
                self.walls().contains(next) && !self.walls().get(next)
            })
            .chain([Direction::Stop])
            .collect()
    }
}

/// A state that has grid coordinates
pub trait Position {
    fn position(&self) -> Pos;
}

impl Position for Pos {
    fn position(&self) -> Pos {
        *self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open(width: usize, height: usize) -> Grid {
        Grid::new(width, height)
    }

    #[test]
    fn grid_functional() {
        let mut grid = Grid::new(3, 2);
        assert_eq!(grid.area(), 6);
        grid.set((2, 1), true);
        assert!(grid.get((2, 1)));
        assert!(!grid.get((1, 1)));
        assert!(!grid.get((3, 1)), "outside reads are false");
        assert!(!grid.get((-1, 0)), "outside reads are false");
        assert_eq!(grid.count(), 1);
    }

    #[test]
    fn adjacent_skips_walls_and_edges() {
        let mut walls = open(3, 3);
        walls.set((1, 2), true);
        let mut around: Vec<_> = adjacent((1, 1), &walls).collect();
        around.sort();
        assert_eq!(around, [(0, 1), (1, 0), (2, 1)]);
        assert_eq!(adjacent((0, 0), &walls).count(), 2, "corner has two neighbours");
    }

    #[test]
    fn bfs_open_grid_matches_manhattan() {
        let walls = open(5, 5);
        let dist = closest((0, 0), &walls, |p| p == (4, 4));
        assert_eq!(dist, Some(8));
        assert_eq!(dist, Some(manhattan((0, 0), (4, 4))));
    }

    #[test]
    fn bfs_routes_around_walls() {
        // . . .
        // % % .
        // s . .
        let mut walls = open(3, 3);
        walls.set((0, 1), true);
        walls.set((1, 1), true);
        assert_eq!(closest((0, 0), &walls, |p| p == (0, 2)), Some(6));
        assert_eq!(closest((0, 0), &walls, |p| p == (0, 0)), Some(0), "start may be a goal");
    }

    #[test]
    fn bfs_unreachable_is_none() {
        let mut walls = open(3, 1);
        walls.set((1, 0), true);
        assert_eq!(closest((0, 0), &walls, |p| p == (2, 0)), None);
        assert_eq!(closest((0, 0), &walls, |_| false), None);
    }

    #[test]
    fn within_one_step_functional() {
        let walls = open(3, 3);
        assert!(within_one_step((1, 1), (1, 1), &walls), "same cell");
        assert!(within_one_step((1, 2), (1, 1), &walls));
        assert!(!within_one_step((2, 2), (1, 1), &walls), "diagonals are two steps");
    }

    #[test]
    fn direction_functional() {
        assert_eq!(Direction::North.apply((2, 2)), (2, 3));
        assert_eq!(Direction::West.apply((2, 2)), (1, 2));
        assert_eq!(Direction::Stop.apply((2, 2)), (2, 2));
        assert_eq!(Direction::East.to_string(), "East");
        assert_eq!(Direction::VARIANTS.len(), 5);
    }
}
