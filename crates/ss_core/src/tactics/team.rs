//! Team bookkeeping on the world: tactical pointers, home regions and the
//! closest-to-ball scan.

use tracing::trace;

use crate::engine::fsm;
use crate::engine::messaging::Message;
use crate::engine::world::World;
use crate::geometry::{Vector2D, Vector2DExt};
use crate::player::{FieldPlayerState, PlayerId};
use crate::tactics::TeamColor;

impl World {
    // ========== Tactical pointers ==========

    /// Only one side can be in control: taking control clears the opponent.
    pub(crate) fn set_controlling_player(&mut self, color: TeamColor, player: PlayerId) {
        self.team_mut(color).controlling = Some(player);
        self.team_mut(color.opponent()).controlling = None;
    }

    pub(crate) fn reset_controlling_player(&mut self, color: TeamColor) {
        self.team_mut(color).controlling = None;
        self.team_mut(color.opponent()).controlling = None;
    }

    pub(crate) fn set_supporting_player(&mut self, color: TeamColor, player: PlayerId) {
        self.team_mut(color).supporting = Some(player);
    }

    pub(crate) fn set_receiver(&mut self, color: TeamColor, player: PlayerId) {
        self.team_mut(color).receiving = Some(player);
    }

    pub(crate) fn reset_receiver(&mut self, color: TeamColor) {
        self.team_mut(color).receiving = None;
    }

    // ========== Roster scans ==========

    /// Refreshes every player's squared distance to the ball and the team's
    /// closest player.
    pub(crate) fn calculate_closest_player_to_ball(&mut self, color: TeamColor) {
        let ball = self.ball.position();
        let mut closest: Option<(PlayerId, f64)> = None;

        for i in 0..self.team(color).players.len() {
            let pid = self.team(color).players[i];
            let dist = self.member(pid).position().distance_sq(&ball);
            self.member_mut(pid).dist_sq_to_ball = dist;

            if closest.map_or(true, |(_, best)| dist < best) {
                closest = Some((pid, dist));
            }
        }

        let team = self.team_mut(color);
        team.closest_to_ball = closest.map(|(pid, _)| pid);
        team.closest_dist_sq = closest.map_or(f64::MAX, |(_, d)| d);
    }

    /// Reassigns home regions, keeper first.
    pub(crate) fn change_player_home_regions(&mut self, color: TeamColor, regions: &[usize]) {
        let roster = self.team(color).players.clone();
        for (pid, &region) in roster.iter().zip(regions) {
            self.member_mut(*pid).home_region = region;
        }
    }

    /// Players idling at home (Wait or ReturnToHomeRegion) get their steering
    /// target moved to the new home region.
    pub(crate) fn update_targets_of_waiting_players(&mut self, color: TeamColor) {
        let roster = self.team(color).field_players().to_vec();
        for pid in roster {
            let waiting = fsm::is_in_state(self, pid, FieldPlayerState::Wait)
                || fsm::is_in_state(self, pid, FieldPlayerState::ReturnToHomeRegion);
            if waiting {
                let centre = self.home_region_centre(pid);
                self.member_mut(pid).steering.set_target(centre);
            }
        }
    }

    /// The keeper tells every field player to go home.
    pub(crate) fn return_all_field_players_to_home(&mut self, color: TeamColor) {
        let Some(keeper) = self.team(color).keeper() else {
            return;
        };
        let roster = self.team(color).field_players().to_vec();
        for pid in roster {
            self.send(keeper, pid, Message::GoHome);
        }
    }

    pub(crate) fn all_players_at_home(&self, color: TeamColor) -> bool {
        self.team(color)
            .players
            .iter()
            .all(|&pid| self.is_in_home_region(pid))
    }

    // ========== Support ==========

    /// Rescores the support spots (throttled). Without a controlling player
    /// the previous best is kept and nothing is scored.
    pub(crate) fn determine_best_supporting_position(&mut self, color: TeamColor) -> Option<Vector2D> {
        let Some(controller) = self.team(color).controlling else {
            return self.team(color).support.best_spot();
        };

        let tick = self.tick;
        let mut calculator = std::mem::take(&mut self.team_mut(color).support);
        let best = calculator.determine_best(tick, |spot| {
            self.score_support_spot(color, controller, spot)
        });
        self.team_mut(color).support = calculator;

        trace!(team = %color, ?best, "support spot");
        best
    }

    /// Cached best spot, or a fresh determination when none exists.
    pub(crate) fn support_spot(&mut self, color: TeamColor) -> Option<Vector2D> {
        match self.team(color).support.best_spot() {
            Some(spot) => Some(spot),
            None => self.determine_best_supporting_position(color),
        }
    }

    fn score_support_spot(&mut self, color: TeamColor, controller: PlayerId, spot: &Vector2D) -> f64 {
        let tactics = self.config.tactics.clone();
        let controller_pos = self.member(controller).position();
        let mut bonus = 0.0;

        if self.is_pass_safe_from_all_opponents(
            color,
            controller_pos,
            *spot,
            None,
            tactics.max_passing_force,
        ) {
            bonus += tactics.spot_can_pass_score;
        }

        if self
            .can_shoot(color, *spot, tactics.max_shooting_force)
            .is_some()
        {
            bonus += tactics.spot_can_score_from_position_score;
        }

        if self.team(color).supporting.is_some() {
            let optimal = tactics.optimal_support_distance;
            let temp = (optimal - controller_pos.distance(spot)).abs();
            if temp < optimal {
                bonus += tactics.spot_dist_from_controlling_player_score * (optimal - temp) / optimal;
            }
        }

        bonus
    }

    /// Attacker (not the controller) closest to the best support spot.
    pub(crate) fn determine_best_supporting_attacker(&mut self, color: TeamColor) -> Option<PlayerId> {
        let spot = self.support_spot(color)?;
        let controller = self.team(color).controlling;

        self.team(color)
            .field_players()
            .iter()
            .copied()
            .filter(|&pid| {
                self.member(pid).role() == crate::player::PlayerRole::Attacker
                    && Some(pid) != controller
            })
            .map(|pid| (pid, self.member(pid).position().distance_sq(&spot)))
            .fold(None, |best: Option<(PlayerId, f64)>, (pid, d)| match best {
                Some((_, bd)) if bd <= d => best,
                _ => Some((pid, d)),
            })
            .map(|(pid, _)| pid)
    }
}
