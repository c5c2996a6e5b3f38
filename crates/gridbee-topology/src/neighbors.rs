//! Cardinal Neighbor Computation
//!
//! Every grid slot has up to four orthogonal neighbors. Directions are
//! always examined in the fixed order north, south, east, west so that
//! neighbor notification is deterministic.

use crate::GridCoord;

/// A cardinal direction on the grid.
///
/// Rows grow southward and columns grow eastward, so north is a row
/// decrement and west is a column decrement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum Direction {
    North,
    South,
    East,
    West,
}

impl Direction {
    /// The four directions, in the fixed examination order.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
    ];

    /// The direction pointing back at the sender.
    pub const fn opposite(self) -> Direction {
        match self {
            Direction::North => Direction::South,
            Direction::South => Direction::North,
            Direction::East => Direction::West,
            Direction::West => Direction::East,
        }
    }

    /// Row and column delta of a single step.
    pub const fn delta(self) -> (isize, isize) {
        match self {
            Direction::North => (-1, 0),
            Direction::South => (1, 0),
            Direction::East => (0, 1),
            Direction::West => (0, -1),
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Direction::North => "NORTH",
            Direction::South => "SOUTH",
            Direction::East => "EAST",
            Direction::West => "WEST",
        };
        f.write_str(name)
    }
}

/// Iterate the in-bounds cardinal neighbors of a coordinate, in the fixed
/// north/south/east/west order. Out-of-bounds steps are skipped silently.
pub fn neighbors_of(coord: GridCoord) -> impl Iterator<Item = (Direction, GridCoord)> {
    Direction::ALL
        .into_iter()
        .filter_map(move |direction| coord.step(direction).map(|next| (direction, next)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interior_slot_has_four_neighbors() {
        let neighbors: Vec<_> = neighbors_of(GridCoord::new(5, 5)).collect();
        assert_eq!(
            neighbors,
            vec![
                (Direction::North, GridCoord::new(4, 5)),
                (Direction::South, GridCoord::new(6, 5)),
                (Direction::East, GridCoord::new(5, 6)),
                (Direction::West, GridCoord::new(5, 4)),
            ]
        );
    }

    #[test]
    fn corner_slot_has_two_neighbors() {
        let neighbors: Vec<_> = neighbors_of(GridCoord::new(0, 0)).collect();
        assert_eq!(
            neighbors,
            vec![
                (Direction::South, GridCoord::new(1, 0)),
                (Direction::East, GridCoord::new(0, 1)),
            ]
        );
    }

    #[test]
    fn edge_slot_has_three_neighbors() {
        assert_eq!(neighbors_of(GridCoord::new(0, 5)).count(), 3);
        assert_eq!(neighbors_of(GridCoord::new(9, 5)).count(), 3);
        assert_eq!(neighbors_of(GridCoord::new(5, 0)).count(), 3);
        assert_eq!(neighbors_of(GridCoord::new(5, 9)).count(), 3);
    }

    #[test]
    fn opposites_are_symmetric() {
        for direction in Direction::ALL {
            assert_eq!(direction.opposite().opposite(), direction);
        }
    }

    #[test]
    fn examination_order_is_fixed() {
        let order: Vec<_> = neighbors_of(GridCoord::new(5, 5))
            .map(|(direction, _)| direction)
            .collect();
        assert_eq!(
            order,
            vec![
                Direction::North,
                Direction::South,
                Direction::East,
                Direction::West
            ]
        );
    }
}
