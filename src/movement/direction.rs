use std::f64::consts::FRAC_1_SQRT_2;

/// One of the 8 compass-aligned movement headings. Up is north (+lat),
/// right is east (+lon).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
    UpLeft,
    UpRight,
    DownLeft,
    DownRight,
}

impl Direction {
    /// Unit heading vector as `(lat, lon)` components.
    pub fn unit(self) -> (f64, f64) {
        match self {
            Direction::Up => (1.0, 0.0),
            Direction::Down => (-1.0, 0.0),
            Direction::Left => (0.0, -1.0),
            Direction::Right => (0.0, 1.0),
            Direction::UpLeft => (FRAC_1_SQRT_2, -FRAC_1_SQRT_2),
            Direction::UpRight => (FRAC_1_SQRT_2, FRAC_1_SQRT_2),
            Direction::DownLeft => (-FRAC_1_SQRT_2, -FRAC_1_SQRT_2),
            Direction::DownRight => (-FRAC_1_SQRT_2, FRAC_1_SQRT_2),
        }
    }

    /// Combines vertical (+1 = up) and horizontal (+1 = right) axis signs
    /// into a heading. Both axes zero means no movement intent.
    pub(crate) fn from_axes(vertical: i8, horizontal: i8) -> Option<Direction> {
        match (vertical.signum(), horizontal.signum()) {
            (1, -1) => Some(Direction::UpLeft),
            (1, 0) => Some(Direction::Up),
            (1, 1) => Some(Direction::UpRight),
            (0, -1) => Some(Direction::Left),
            (0, 1) => Some(Direction::Right),
            (-1, -1) => Some(Direction::DownLeft),
            (-1, 0) => Some(Direction::Down),
            (-1, 1) => Some(Direction::DownRight),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_vectors_are_unit_length() {
        for direction in [
            Direction::Up,
            Direction::Down,
            Direction::Left,
            Direction::Right,
            Direction::UpLeft,
            Direction::UpRight,
            Direction::DownLeft,
            Direction::DownRight,
        ] {
            let (lat, lon) = direction.unit();
            assert!(((lat * lat + lon * lon).sqrt() - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn axes_combine_into_diagonals() {
        assert_eq!(Direction::from_axes(1, 1), Some(Direction::UpRight));
        assert_eq!(Direction::from_axes(-1, -1), Some(Direction::DownLeft));
        assert_eq!(Direction::from_axes(0, 0), None);
    }
}
