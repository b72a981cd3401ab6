use crate::world::{Direction, Tile};

/// The fixed constant vocabulary. A constant's value is its position in
/// [`CONSTANTS`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Constant {
    None,
    Wall,
    Fuel,
    Robot,
    North,
    South,
    East,
    West,
    Cw,
    Ccw,
}

pub const CONSTANTS: [Constant; 10] = [
    Constant::None,
    Constant::Wall,
    Constant::Fuel,
    Constant::Robot,
    Constant::North,
    Constant::South,
    Constant::East,
    Constant::West,
    Constant::Cw,
    Constant::Ccw,
];

impl Constant {
    pub fn name(self) -> &'static str {
        match self {
            Constant::None => "none",
            Constant::Wall => "wall",
            Constant::Fuel => "fuel",
            Constant::Robot => "robot",
            Constant::North => "north",
            Constant::South => "south",
            Constant::East => "east",
            Constant::West => "west",
            Constant::Cw => "cw",
            Constant::Ccw => "ccw",
        }
    }

    pub fn value(self) -> i32 {
        self as i32
    }

    pub fn from_name(name: &str) -> Option<Constant> {
        CONSTANTS.iter().copied().find(|c| c.name() == name)
    }

    pub fn from_value(value: i32) -> Option<Constant> {
        usize::try_from(value)
            .ok()
            .and_then(|i| CONSTANTS.get(i))
            .copied()
    }
}

impl From<Tile> for Constant {
    fn from(tile: Tile) -> Self {
        match tile {
            Tile::Empty => Constant::None,
            Tile::Wall => Constant::Wall,
            Tile::Fuel => Constant::Fuel,
        }
    }
}

impl From<Direction> for Constant {
    fn from(dir: Direction) -> Self {
        match dir {
            Direction::North => Constant::North,
            Direction::South => Constant::South,
            Direction::East => Constant::East,
            Direction::West => Constant::West,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_values_are_positions() {
        for (i, c) in CONSTANTS.iter().enumerate() {
            assert_eq!(c.value(), i as i32);
            assert_eq!(Constant::from_value(i as i32), Some(*c));
        }
        assert_eq!(Constant::from_value(-1), None);
        assert_eq!(Constant::from_value(10), None);
    }

    #[test]
    fn test_tiles_share_constant_values() {
        for tile in [Tile::Empty, Tile::Wall, Tile::Fuel] {
            assert_eq!(Constant::from(tile).value(), tile.code());
        }
    }
}
