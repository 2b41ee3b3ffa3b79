//! Box faces and the static opposite-face mapping.

use serde::{Deserialize, Serialize};

/// World axis of a face normal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// Component index into a `Vector3`.
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }
}

/// One of the six box faces an object can be touched on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Face {
    Front,
    Back,
    Right,
    Left,
    Top,
    Bottom,
}

impl Face {
    /// All six faces.
    pub const ALL: [Face; 6] = [
        Face::Front,
        Face::Back,
        Face::Right,
        Face::Left,
        Face::Top,
        Face::Bottom,
    ];

    /// The four side faces, in the order free-face selection considers
    /// them. Top and bottom never take touching partners.
    pub const LATERAL: [Face; 4] = [Face::Front, Face::Back, Face::Right, Face::Left];

    /// The (axis, sign) pair of this face's outward normal.
    pub fn axis_sign(self) -> (Axis, i8) {
        match self {
            Face::Front => (Axis::X, 1),
            Face::Back => (Axis::X, -1),
            Face::Right => (Axis::Y, 1),
            Face::Left => (Axis::Y, -1),
            Face::Top => (Axis::Z, 1),
            Face::Bottom => (Axis::Z, -1),
        }
    }

    /// The face with the same axis and flipped sign.
    ///
    /// Consulted when recording a touching relation symmetrically on
    /// both participants.
    pub fn opposite(self) -> Face {
        match self {
            Face::Front => Face::Back,
            Face::Back => Face::Front,
            Face::Right => Face::Left,
            Face::Left => Face::Right,
            Face::Top => Face::Bottom,
            Face::Bottom => Face::Top,
        }
    }
}

impl std::fmt::Display for Face {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Face::Front => "front",
            Face::Back => "back",
            Face::Right => "right",
            Face::Left => "left",
            Face::Top => "top",
            Face::Bottom => "bottom",
        };
        write!(f, "{}", name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opposite_flips_sign_and_keeps_axis() {
        for face in Face::ALL {
            let (axis, sign) = face.axis_sign();
            let (opp_axis, opp_sign) = face.opposite().axis_sign();
            assert_eq!(axis, opp_axis);
            assert_eq!(sign, -opp_sign);
        }
    }

    #[test]
    fn lateral_faces_are_horizontal() {
        for face in Face::LATERAL {
            let (axis, _) = face.axis_sign();
            assert_ne!(axis, Axis::Z);
        }
        assert!(!Face::LATERAL.contains(&Face::Top));
        assert!(!Face::LATERAL.contains(&Face::Bottom));
    }

    #[test]
    fn opposite_is_an_involution() {
        for face in Face::ALL {
            assert_eq!(face.opposite().opposite(), face);
        }
    }
}
