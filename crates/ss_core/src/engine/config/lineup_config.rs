//! Team lineups and the region tables the team states switch between.

use serde::{Deserialize, Serialize};

use crate::player::PlayerRole;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSlot {
    pub region: usize,
    pub role: PlayerRole,
}

impl FieldSlot {
    pub const fn new(region: usize, role: PlayerRole) -> Self {
        Self { region, role }
    }
}

/// One team's starting lineup. Region lists are keeper first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamSetup {
    pub keeper_region: usize,
    pub field_players: Vec<FieldSlot>,
    pub defending_regions: Vec<usize>,
    pub attacking_regions: Vec<usize>,
}

impl TeamSetup {
    pub fn squad_size(&self) -> usize {
        self.field_players.len() + 1
    }

    fn from_tables(
        keeper: usize,
        defenders: [usize; 5],
        attackers: [usize; 5],
        defending: [usize; 11],
        attacking: [usize; 11],
    ) -> Self {
        let field_players = defenders
            .iter()
            .map(|&r| FieldSlot::new(r, PlayerRole::Defender))
            .chain(attackers.iter().map(|&r| FieldSlot::new(r, PlayerRole::Attacker)))
            .collect();
        Self {
            keeper_region: keeper,
            field_players,
            defending_regions: defending.to_vec(),
            attacking_regions: attacking.to_vec(),
        }
    }

    /// Red defends the left goal.
    pub fn classic_red() -> Self {
        Self::from_tables(
            80,
            [75, 74, 72, 71, 59],
            [61, 57, 52, 44, 46],
            [80, 75, 74, 72, 71, 59, 61, 57, 52, 44, 46],
            [80, 68, 67, 65, 64, 45, 34, 28, 24, 9, 11],
        )
    }

    /// Blue defends the right goal.
    pub fn classic_blue() -> Self {
        Self::from_tables(
            3,
            [8, 9, 11, 12, 24],
            [22, 26, 31, 37, 39],
            [3, 8, 9, 11, 12, 24, 22, 26, 31, 37, 39],
            [3, 15, 16, 18, 19, 38, 49, 55, 59, 72, 74],
        )
    }
}
