//! The tile grid and the robots moving on it.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Fuel a robot starts a level with.
pub const MAX_FUEL: i32 = 100;

/// Kind of a single grid cell.
///
/// The discriminants match the scripting language's named constants, so a
/// `scan` result can be compared directly against `none`, `wall` or `fuel`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tile {
    #[default]
    Empty = 0,
    Wall = 1,
    Fuel = 2,
}

impl Tile {
    pub fn code(self) -> i32 {
        self as i32
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    North,
    South,
    East,
    West,
}

impl Direction {
    /// Grid offset of one step in this direction. North is up (y - 1).
    pub fn offset(self) -> (i32, i32) {
        match self {
            Direction::North => (0, -1),
            Direction::South => (0, 1),
            Direction::East => (1, 0),
            Direction::West => (-1, 0),
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Direction::North => Direction::South,
            Direction::South => Direction::North,
            Direction::East => Direction::West,
            Direction::West => Direction::East,
        }
    }

    pub fn clockwise(self) -> Self {
        match self {
            Direction::North => Direction::East,
            Direction::East => Direction::South,
            Direction::South => Direction::West,
            Direction::West => Direction::North,
        }
    }

    pub fn counter_clockwise(self) -> Self {
        match self {
            Direction::North => Direction::West,
            Direction::West => Direction::South,
            Direction::South => Direction::East,
            Direction::East => Direction::North,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Direction::North => "north",
            Direction::South => "south",
            Direction::East => "east",
            Direction::West => "west",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Robot {
    pub x: i32,
    pub y: i32,
    pub dir: Direction,
    pub fuel: i32,
    pub is_player: bool,
    #[serde(default)]
    pub disassembled: bool,
}

impl Robot {
    pub fn new(is_player: bool, x: i32, y: i32, dir: Direction) -> Self {
        Robot {
            x,
            y,
            dir,
            fuel: MAX_FUEL,
            is_player,
            disassembled: false,
        }
    }

    /// The cell directly in front of the robot.
    pub fn ahead(&self) -> (i32, i32) {
        let (dx, dy) = self.dir.offset();
        (self.x + dx, self.y + dy)
    }

    /// The cell directly behind the robot.
    pub fn behind(&self) -> (i32, i32) {
        let (dx, dy) = self.dir.opposite().offset();
        (self.x + dx, self.y + dy)
    }

    pub fn is_active(&self) -> bool {
        !self.disassembled
    }
}

/// Error raised while reading a level description.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LevelError {
    #[error("level is empty")]
    Empty,
    #[error("unknown level character `{ch}` at line {line}, column {column}")]
    UnknownCharacter { ch: char, line: usize, column: usize },
}

/// A bordered tile grid together with every robot of the level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct World {
    pub width: i32,
    pub height: i32,
    tiles: Vec<Tile>,
    pub robots: Vec<Robot>,
}

impl World {
    /// An empty grid surrounded by a wall border.
    pub fn new(width: i32, height: i32) -> Self {
        let width = width.max(0);
        let height = height.max(0);
        let mut world = World {
            width,
            height,
            tiles: vec![Tile::Empty; (width * height) as usize],
            robots: Vec::new(),
        };
        for x in 0..width {
            world.set_tile(x, 0, Tile::Wall);
            world.set_tile(x, height - 1, Tile::Wall);
        }
        for y in 0..height {
            world.set_tile(0, y, Tile::Wall);
            world.set_tile(width - 1, y, Tile::Wall);
        }
        world
    }

    /// Builds a world from a text level.
    ///
    /// `#` is a wall, `F` a fuel tile, `.` or a space an empty tile, `P` the
    /// player and `E` an enemy; robots start facing north.
    pub fn from_ascii(level: &str) -> Result<Self, LevelError> {
        let rows: Vec<&str> = level
            .lines()
            .map(|l| l.trim_end_matches('\r'))
            .filter(|l| !l.trim().is_empty())
            .collect();
        if rows.is_empty() {
            return Err(LevelError::Empty);
        }
        let width = rows.iter().map(|r| r.chars().count()).max().unwrap_or(0) as i32;
        let height = rows.len() as i32;
        let mut world = World {
            width,
            height,
            tiles: vec![Tile::Empty; (width * height) as usize],
            robots: Vec::new(),
        };
        for (y, row) in rows.iter().enumerate() {
            for (x, ch) in row.chars().enumerate() {
                let (x, y) = (x as i32, y as i32);
                match ch {
                    '#' => world.set_tile(x, y, Tile::Wall),
                    'F' => world.set_tile(x, y, Tile::Fuel),
                    '.' | ' ' => {}
                    'P' => {
                        world.add_robot(Robot::new(true, x, y, Direction::North));
                    }
                    'E' => {
                        world.add_robot(Robot::new(false, x, y, Direction::North));
                    }
                    _ => {
                        return Err(LevelError::UnknownCharacter {
                            ch,
                            line: y as usize + 1,
                            column: x as usize + 1,
                        })
                    }
                };
            }
        }
        Ok(world)
    }

    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.width && y >= 0 && y < self.height
    }

    /// Tile at a coordinate; everything outside the grid reads as wall.
    pub fn tile(&self, x: i32, y: i32) -> Tile {
        if self.in_bounds(x, y) {
            self.tiles[(y * self.width + x) as usize]
        } else {
            Tile::Wall
        }
    }

    pub fn set_tile(&mut self, x: i32, y: i32, tile: Tile) {
        if self.in_bounds(x, y) {
            let index = (y * self.width + x) as usize;
            self.tiles[index] = tile;
        }
    }

    pub fn add_robot(&mut self, robot: Robot) -> usize {
        self.robots.push(robot);
        self.robots.len() - 1
    }

    pub fn robot(&self, id: usize) -> Option<&Robot> {
        self.robots.get(id)
    }

    pub fn robot_mut(&mut self, id: usize) -> Option<&mut Robot> {
        self.robots.get_mut(id)
    }

    /// Index of the first robot still in play standing at `(x, y)`.
    pub fn robot_at(&self, x: i32, y: i32) -> Option<usize> {
        self.robots
            .iter()
            .position(|r| r.is_active() && r.x == x && r.y == y)
    }

    pub fn player(&self) -> Option<usize> {
        self.robots.iter().position(|r| r.is_player)
    }

    /// Number of hostile robots still in play.
    pub fn enemies_left(&self) -> usize {
        self.robots
            .iter()
            .filter(|r| !r.is_player && r.is_active())
            .count()
    }

    /// Moves a robot by one tile unless the destination is a wall.
    ///
    /// Returns whether the robot moved.
    pub fn try_move(&mut self, id: usize, backward: bool) -> bool {
        let Some(robot) = self.robots.get(id) else {
            return false;
        };
        let (x, y) = if backward { robot.behind() } else { robot.ahead() };
        if self.tile(x, y) == Tile::Wall {
            return false;
        }
        let robot = &mut self.robots[id];
        robot.x = x;
        robot.y = y;
        true
    }
}

impl fmt::Display for World {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.height {
            for x in 0..self.width {
                let ch = match self.robot_at(x, y).map(|id| &self.robots[id]) {
                    Some(r) if r.is_player => 'P',
                    Some(_) => 'E',
                    None => match self.tile(x, y) {
                        Tile::Empty => '.',
                        Tile::Wall => '#',
                        Tile::Fuel => 'F',
                    },
                };
                write!(f, "{}", ch)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LEVEL: &str = "\
#####
#P.F#
#.#E#
#####
";

    #[test]
    fn test_from_ascii() {
        let world = World::from_ascii(LEVEL).unwrap();
        assert_eq!((world.width, world.height), (5, 4));
        assert_eq!(world.tile(3, 1), Tile::Fuel);
        assert_eq!(world.tile(2, 2), Tile::Wall);
        assert_eq!(world.robots.len(), 2);
        assert!(world.robots[0].is_player);
        assert_eq!(world.robot_at(3, 2), Some(1));
        assert_eq!(world.to_string(), LEVEL.replace(' ', "."));
    }

    #[test]
    fn test_unknown_character() {
        let err = World::from_ascii("#?#").unwrap_err();
        assert_eq!(
            err,
            LevelError::UnknownCharacter {
                ch: '?',
                line: 1,
                column: 2
            }
        );
    }

    #[test]
    fn test_out_of_bounds_is_wall() {
        let world = World::new(3, 3);
        assert_eq!(world.tile(-1, 0), Tile::Wall);
        assert_eq!(world.tile(1, 1), Tile::Empty);
        assert_eq!(world.tile(0, 1), Tile::Wall);
    }

    #[test]
    fn test_try_move_blocked_by_wall() {
        let mut world = World::from_ascii(LEVEL).unwrap();
        // Facing north into the border.
        assert!(!world.try_move(0, false));
        assert!(world.try_move(0, true));
        assert_eq!((world.robots[0].x, world.robots[0].y), (1, 2));
    }

    #[test]
    fn test_rotation_cycle() {
        let mut dir = Direction::North;
        for _ in 0..4 {
            dir = dir.clockwise();
        }
        assert_eq!(dir, Direction::North);
        assert_eq!(Direction::East.counter_clockwise(), Direction::North);
    }

    #[test]
    fn test_disassembled_robots_are_not_found() {
        let mut world = World::from_ascii(LEVEL).unwrap();
        world.robots[1].disassembled = true;
        assert_eq!(world.robot_at(3, 2), None);
        assert_eq!(world.enemies_left(), 0);
    }
}
