use serde::{Deserialize, Serialize};

use crate::geometry::Vector2D;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegionModifier {
    Normal,
    /// Only the middle half of the region in each axis counts as inside.
    HalfSize,
}

/// Axis-aligned rectangle on the pitch. `top < bottom` (y grows downward).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub id: usize,
}

impl Region {
    pub fn new(left: f64, top: f64, right: f64, bottom: f64, id: usize) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
            id,
        }
    }

    pub fn width(&self) -> f64 {
        (self.right - self.left).abs()
    }

    pub fn height(&self) -> f64 {
        (self.bottom - self.top).abs()
    }

    /// The longer of width and height.
    pub fn length(&self) -> f64 {
        self.width().max(self.height())
    }

    pub fn center(&self) -> Vector2D {
        Vector2D::new(
            (self.left + self.right) * 0.5,
            (self.top + self.bottom) * 0.5,
        )
    }

    /// Strict containment; points on an edge are outside.
    pub fn is_inside(&self, pos: &Vector2D, modifier: RegionModifier) -> bool {
        match modifier {
            RegionModifier::Normal => {
                pos.x > self.left && pos.x < self.right && pos.y > self.top && pos.y < self.bottom
            }
            RegionModifier::HalfSize => {
                let margin_x = self.width() * 0.25;
                let margin_y = self.height() * 0.25;
                pos.x > self.left + margin_x
                    && pos.x < self.right - margin_x
                    && pos.y > self.top + margin_y
                    && pos.y < self.bottom - margin_y
            }
        }
    }
}
