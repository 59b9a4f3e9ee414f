use serde::{Deserialize, Serialize};

use super::{Vector2D, Vector2DExt};

/// A one-sided wall segment. The normal points into the playing side.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Wall2D {
    pub from: Vector2D,
    pub to: Vector2D,
    pub normal: Vector2D,
}

impl Wall2D {
    pub fn new(from: Vector2D, to: Vector2D) -> Self {
        let dir = (to - from).normalized_or_zero();
        Self {
            from,
            to,
            normal: Vector2D::new(-dir.y, dir.x),
        }
    }

    pub fn center(&self) -> Vector2D {
        (self.from + self.to) / 2.0
    }
}
