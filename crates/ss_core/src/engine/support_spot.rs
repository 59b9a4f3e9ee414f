//! Support spot calculator
//!
//! A fixed grid of candidate positions in the opponents' half. Each scoring
//! pass overwrites every spot's score and remembers the best one; between
//! regulator openings the cached best is returned untouched.
//!
//! Scoring needs the whole world (pass safety, shot tests), so the caller
//! supplies it as a closure returning the bonus for a position.

use serde::{Deserialize, Serialize};

use super::region::Region;
use super::regulator::Regulator;
use crate::geometry::Vector2D;
use crate::tactics::TeamColor;

/// Every spot starts each pass at this score.
pub const BASE_SPOT_SCORE: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SupportSpot {
    pub position: Vector2D,
    pub score: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SupportSpotCalculator {
    spots: Vec<SupportSpot>,
    best: Option<usize>,
    regulator: Regulator,
}

impl SupportSpotCalculator {
    /// Lays out `(num_x / 2 - 1) x num_y` spots over the central 90% x 80% of
    /// the playing area, on the half `color` attacks.
    pub fn new(
        color: TeamColor,
        area: &Region,
        num_x: usize,
        num_y: usize,
        regulator: Regulator,
    ) -> Self {
        let height_of_ss_region = area.height() * 0.8;
        let width_of_ss_region = area.width() * 0.9;
        let slice_x = width_of_ss_region / num_x as f64;
        let slice_y = height_of_ss_region / num_y as f64;

        let left = area.left + (area.width() - width_of_ss_region) / 2.0 + slice_x / 2.0;
        let right = area.right - (area.width() - width_of_ss_region) / 2.0 - slice_x / 2.0;
        let top = area.top + (area.height() - height_of_ss_region) / 2.0 + slice_y / 2.0;

        // columns while x < num_x / 2 - 1, with real division
        let columns = (num_x as f64 / 2.0 - 1.0).ceil().max(0.0) as usize;

        let mut spots = Vec::with_capacity(columns * num_y);
        for x in 0..columns {
            for y in 0..num_y {
                let px = match color {
                    TeamColor::Blue => left + x as f64 * slice_x,
                    TeamColor::Red => right - x as f64 * slice_x,
                };
                spots.push(SupportSpot {
                    position: Vector2D::new(px, top + y as f64 * slice_y),
                    score: 0.0,
                });
            }
        }

        Self {
            spots,
            best: None,
            regulator,
        }
    }

    pub fn spots(&self) -> &[SupportSpot] {
        &self.spots
    }

    pub fn best_spot(&self) -> Option<Vector2D> {
        self.best.and_then(|i| self.spots.get(i)).map(|s| s.position)
    }

    /// Rescores every spot when the regulator opens (or nothing is cached).
    /// `bonus` returns the score added on top of [`BASE_SPOT_SCORE`].
    pub fn determine_best<F>(&mut self, tick: u64, mut bonus: F) -> Option<Vector2D>
    where
        F: FnMut(&Vector2D) -> f64,
    {
        if !self.regulator.is_ready(tick) && self.best.is_some() {
            return self.best_spot();
        }

        self.best = None;
        let mut best_score = 0.0;

        for (idx, spot) in self.spots.iter_mut().enumerate() {
            spot.score = BASE_SPOT_SCORE + bonus(&spot.position);
            if spot.score > best_score {
                best_score = spot.score;
                self.best = Some(idx);
            }
        }

        self.best_spot()
    }

    /// Cached best spot, computing one if none exists yet.
    pub fn best_or_determine<F>(&mut self, tick: u64, bonus: F) -> Option<Vector2D>
    where
        F: FnMut(&Vector2D) -> f64,
    {
        match self.best_spot() {
            Some(spot) => Some(spot),
            None => self.determine_best(tick, bonus),
        }
    }
}
