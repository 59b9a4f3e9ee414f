//! Pitch layout: playing area, region grid, goals and walls.

use serde::{Deserialize, Serialize};

use super::config::PitchConfig;
use super::goal::Goal;
use super::region::Region;
use crate::error::{Result, SimError};
use crate::geometry::{vec2, Vector2D, Wall2D};
use crate::tactics::TeamColor;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pitch {
    client_width: f64,
    client_height: f64,
    playing_area: Region,
    regions: Vec<Region>,
    red_goal: Goal,
    blue_goal: Goal,
    walls: Vec<Wall2D>,
}

impl Pitch {
    pub fn new(cfg: &PitchConfig) -> Self {
        let (w, h) = (cfg.client_width, cfg.client_height);
        let playing_area = Region::new(cfg.margin, cfg.margin, w - cfg.margin, h - cfg.margin, 0);

        let regions = Self::create_regions(
            &playing_area,
            cfg.regions_horizontal,
            cfg.regions_vertical,
        );

        let post_top = (h - cfg.goal_width) / 2.0;
        let post_bottom = h - post_top;
        let red_goal = Goal::new(
            vec2(playing_area.left, post_top),
            vec2(playing_area.left, post_bottom),
            vec2(1.0, 0.0),
        );
        let blue_goal = Goal::new(
            vec2(playing_area.right, post_top),
            vec2(playing_area.right, post_bottom),
            vec2(-1.0, 0.0),
        );

        let top_left = vec2(playing_area.left, playing_area.top);
        let top_right = vec2(playing_area.right, playing_area.top);
        let bottom_right = vec2(playing_area.right, playing_area.bottom);
        let bottom_left = vec2(playing_area.left, playing_area.bottom);

        let walls = vec![
            Wall2D::new(bottom_left, red_goal.right_post),
            Wall2D::new(red_goal.left_post, top_left),
            Wall2D::new(top_left, top_right),
            Wall2D::new(top_right, blue_goal.left_post),
            Wall2D::new(blue_goal.right_post, bottom_right),
            Wall2D::new(bottom_right, bottom_left),
        ];

        Self {
            client_width: w,
            client_height: h,
            playing_area,
            regions,
            red_goal,
            blue_goal,
            walls,
        }
    }

    /// Column-major grid whose ids count down from the last index, so id 0
    /// sits in the bottom-right corner.
    fn create_regions(area: &Region, cols: usize, rows: usize) -> Vec<Region> {
        let width = area.width() / cols as f64;
        let height = area.height() / rows as f64;
        let total = cols * rows;

        let mut regions = vec![Region::new(0.0, 0.0, 0.0, 0.0, 0); total];
        for col in 0..cols {
            for row in 0..rows {
                let idx = total - 1 - (col * rows + row);
                regions[idx] = Region::new(
                    area.left + col as f64 * width,
                    area.top + row as f64 * height,
                    area.left + (col + 1) as f64 * width,
                    area.top + (row + 1) as f64 * height,
                    idx,
                );
            }
        }
        regions
    }

    pub fn playing_area(&self) -> &Region {
        &self.playing_area
    }

    pub fn center_spot(&self) -> Vector2D {
        vec2(self.client_width / 2.0, self.client_height / 2.0)
    }

    pub fn region(&self, idx: usize) -> Result<&Region> {
        self.regions.get(idx).ok_or(SimError::RegionOutOfRange(idx))
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    pub fn walls(&self) -> &[Wall2D] {
        &self.walls
    }

    /// The goal `color` defends.
    pub fn home_goal(&self, color: TeamColor) -> &Goal {
        match color {
            TeamColor::Red => &self.red_goal,
            TeamColor::Blue => &self.blue_goal,
        }
    }

    /// The goal `color` attacks.
    pub fn opponents_goal(&self, color: TeamColor) -> &Goal {
        self.home_goal(color.opponent())
    }

    pub(crate) fn goal_mut(&mut self, defended_by: TeamColor) -> &mut Goal {
        match defended_by {
            TeamColor::Red => &mut self.red_goal,
            TeamColor::Blue => &mut self.blue_goal,
        }
    }

    pub fn client_size(&self) -> (f64, f64) {
        (self.client_width, self.client_height)
    }
}
