use std::collections::BTreeSet;
use std::fmt;

/// A cell on a square puzzle grid. `x` is the column, `y` is the row.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(from = "[usize; 2]", into = "[usize; 2]")]
pub struct Coord {
    pub x: usize,
    pub y: usize,
}

impl Coord {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

impl From<[usize; 2]> for Coord {
    fn from([x, y]: [usize; 2]) -> Self {
        Self { x, y }
    }
}

impl From<Coord> for [usize; 2] {
    fn from(coord: Coord) -> Self {
        [coord.x, coord.y]
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.x, self.y)
    }
}

/// One movement command the robot understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Parses one of the four command tokens, ignoring case.
    ///
    /// Anything else yields `None` so callers can treat it as a no-op.
    pub fn from_token(token: &str) -> Option<Self> {
        match token.trim().to_ascii_uppercase().as_str() {
            "UP" => Some(Direction::Up),
            "DOWN" => Some(Direction::Down),
            "LEFT" => Some(Direction::Left),
            "RIGHT" => Some(Direction::Right),
            _ => None,
        }
    }

    pub fn token(self) -> &'static str {
        match self {
            Direction::Up => "UP",
            Direction::Down => "DOWN",
            Direction::Left => "LEFT",
            Direction::Right => "RIGHT",
        }
    }

    pub fn arrow(self) -> &'static str {
        match self {
            Direction::Up => "⬆️",
            Direction::Down => "⬇️",
            Direction::Left => "⬅️",
            Direction::Right => "➡️",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum LevelError {
    #[error("grid size must be at least 1")]
    EmptyGrid,
    #[error("{role} {coord} lies outside a {size}x{size} grid")]
    OutOfBounds {
        role: &'static str,
        coord: Coord,
        size: usize,
    },
    #[error("{role} {coord} is placed on an obstacle")]
    BlockedEndpoint { role: &'static str, coord: Coord },
}

/// A fixed puzzle layout. Construct through [`Level::new`] so every
/// coordinate is known to lie on the grid.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "LevelSpec", into = "LevelSpec")]
pub struct Level {
    id: u32,
    size: usize,
    start: Coord,
    end: Coord,
    obstacles: BTreeSet<Coord>,
}

/// Unvalidated wire form of a [`Level`].
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct LevelSpec {
    pub id: u32,
    pub size: usize,
    pub start: Coord,
    pub end: Coord,
    #[serde(default)]
    pub obstacles: Vec<Coord>,
}

impl TryFrom<LevelSpec> for Level {
    type Error = LevelError;

    fn try_from(spec: LevelSpec) -> Result<Self, Self::Error> {
        Level::new(spec.id, spec.size, spec.start, spec.end, spec.obstacles)
    }
}

impl From<Level> for LevelSpec {
    fn from(level: Level) -> Self {
        Self {
            id: level.id,
            size: level.size,
            start: level.start,
            end: level.end,
            obstacles: level.obstacles.into_iter().collect(),
        }
    }
}

impl Level {
    pub fn new(
        id: u32,
        size: usize,
        start: Coord,
        end: Coord,
        obstacles: impl IntoIterator<Item = Coord>,
    ) -> Result<Self, LevelError> {
        if size == 0 {
            return Err(LevelError::EmptyGrid);
        }

        let obstacles: BTreeSet<Coord> = obstacles.into_iter().collect();
        let in_bounds = |role: &'static str, coord: Coord| {
            if coord.x < size && coord.y < size {
                Ok(())
            } else {
                Err(LevelError::OutOfBounds { role, coord, size })
            }
        };

        in_bounds("start", start)?;
        in_bounds("end", end)?;
        for obstacle in &obstacles {
            in_bounds("obstacle", *obstacle)?;
        }

        for (role, coord) in [("start", start), ("end", end)] {
            if obstacles.contains(&coord) {
                return Err(LevelError::BlockedEndpoint { role, coord });
            }
        }

        Ok(Self {
            id,
            size,
            start,
            end,
            obstacles,
        })
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn start(&self) -> Coord {
        self.start
    }

    pub fn end(&self) -> Coord {
        self.end
    }

    pub fn obstacles(&self) -> impl Iterator<Item = Coord> + '_ {
        self.obstacles.iter().copied()
    }

    pub fn is_obstacle(&self, coord: Coord) -> bool {
        self.obstacles.contains(&coord)
    }

    /// Moves one cell in `direction`, clamping to the grid edges.
    ///
    /// Walking into an edge leaves the coordinate unchanged.
    pub fn step(&self, from: Coord, direction: Direction) -> Coord {
        let last = self.size - 1;
        match direction {
            Direction::Up => Coord::new(from.x, from.y.saturating_sub(1)),
            Direction::Down => Coord::new(from.x, (from.y + 1).min(last)),
            Direction::Left => Coord::new(from.x.saturating_sub(1), from.y),
            Direction::Right => Coord::new((from.x + 1).min(last), from.y),
        }
    }

    /// Row-major list of every cell, for renderers.
    pub fn cells(&self) -> impl Iterator<Item = Coord> + '_ {
        (0..self.size * self.size).map(|index| Coord::new(index % self.size, index / self.size))
    }
}

fn builtin_level(id: u32, size: usize, end: [usize; 2], obstacles: &[[usize; 2]]) -> Level {
    Level {
        id,
        size,
        start: Coord::new(0, 0),
        end: end.into(),
        obstacles: obstacles.iter().copied().map(Coord::from).collect(),
    }
}

/// The three dispatcher puzzles shipped with the game, in play order.
pub fn builtin_levels() -> Vec<Level> {
    vec![
        builtin_level(1, 3, [2, 2], &[[1, 1], [0, 2]]),
        builtin_level(2, 4, [3, 3], &[[1, 1], [2, 2], [0, 3]]),
        builtin_level(3, 5, [4, 4], &[[1, 2], [2, 2], [3, 2], [1, 4]]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn level_one() -> Level {
        builtin_levels().remove(0)
    }

    #[test]
    fn builtin_levels_pass_validation() {
        for level in builtin_levels() {
            let rebuilt = Level::new(
                level.id(),
                level.size(),
                level.start(),
                level.end(),
                level.obstacles(),
            )
            .expect("shipped levels should be valid");
            assert_eq!(rebuilt, level);
        }
    }

    #[test]
    fn step_clamps_at_every_edge() {
        let level = level_one();
        let origin = Coord::new(0, 0);
        let corner = Coord::new(2, 2);

        assert_eq!(level.step(origin, Direction::Up), origin);
        assert_eq!(level.step(origin, Direction::Left), origin);
        assert_eq!(level.step(corner, Direction::Down), corner);
        assert_eq!(level.step(corner, Direction::Right), corner);
        assert_eq!(level.step(origin, Direction::Right), Coord::new(1, 0));
        assert_eq!(level.step(origin, Direction::Down), Coord::new(0, 1));
    }

    #[test]
    fn step_never_leaves_the_grid() {
        let level = builtin_levels().remove(2);
        for cell in level.cells() {
            for direction in Direction::ALL {
                let next = level.step(cell, direction);
                assert!(next.x < level.size() && next.y < level.size());
            }
        }
    }

    #[test]
    fn rejects_zero_sized_grid() {
        let error = Level::new(9, 0, Coord::new(0, 0), Coord::new(0, 0), [])
            .expect_err("empty grid should be rejected");
        assert_eq!(error, LevelError::EmptyGrid);
    }

    #[test]
    fn rejects_out_of_bounds_obstacle() {
        let error = Level::new(9, 3, Coord::new(0, 0), Coord::new(2, 2), [Coord::new(3, 0)])
            .expect_err("obstacle off the grid should be rejected");
        assert_eq!(
            error,
            LevelError::OutOfBounds {
                role: "obstacle",
                coord: Coord::new(3, 0),
                size: 3
            }
        );
    }

    #[test]
    fn rejects_goal_on_obstacle() {
        let error = Level::new(9, 3, Coord::new(0, 0), Coord::new(1, 1), [Coord::new(1, 1)])
            .expect_err("blocked goal should be rejected");
        assert_eq!(
            error,
            LevelError::BlockedEndpoint {
                role: "end",
                coord: Coord::new(1, 1)
            }
        );
    }

    #[test]
    fn direction_tokens_are_case_insensitive() {
        assert_eq!(Direction::from_token("up"), Some(Direction::Up));
        assert_eq!(Direction::from_token(" Right "), Some(Direction::Right));
        assert_eq!(Direction::from_token("JUMP"), None);
    }

    #[test]
    fn level_parses_from_coordinate_pairs() {
        let json = r#"{
            "id": 7,
            "size": 3,
            "start": [0, 0],
            "end": [2, 2],
            "obstacles": [[1, 1], [0, 2]]
        }"#;

        let parsed: Level = serde_json::from_str(json).expect("level should parse");
        assert_eq!(parsed.size(), 3);
        assert!(parsed.is_obstacle(Coord::new(0, 2)));
        assert_eq!(parsed.end(), Coord::new(2, 2));
    }

    #[test]
    fn invalid_level_json_is_rejected() {
        let json = r#"{ "id": 7, "size": 2, "start": [0, 0], "end": [5, 5] }"#;
        let result: Result<Level, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }
}
