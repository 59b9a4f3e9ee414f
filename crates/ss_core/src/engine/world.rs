//! # Match world
//!
//! [`World`] owns every piece of mutable match state: pitch, ball, both
//! teams, the player arena, the entity registry, the random source and the
//! event log. State functions receive `&mut World` plus an owner handle, so
//! there is no shared aliasing anywhere in the engine.
//!
//! ## Tick order
//! 1. ball update (wall collision, friction)
//! 2. red team: closest player, team FSM, each player keeper first
//! 3. blue team, same order
//! 4. goal test, and reset for kick-off on a goal

use fxhash::FxHashMap;
use tracing::{debug, info, warn};

use super::ball::SoccerBall;
use super::config::{SimConfig, TeamSetup, FIELD_PLAYERS_PER_TEAM};
use super::entity::MovingEntity;
use super::events::{EventLog, EventOwner, MatchEvent, TimedEvent};
use super::fsm::{self, StateMachine};
use super::messaging::{Delivery, Dispatcher, EntityId, EntityIdAllocator, Message, Telegram};
use super::pitch::Pitch;
use super::random::RandomSource;
use super::regulator::Regulator;
use super::snapshot::Score;
use super::steering::{Behavior, Steering};
use super::support_spot::SupportSpotCalculator;
use crate::error::{Result, SimError};
use crate::geometry::{vec2, Vector2D};
use crate::player::{Brain, FieldPlayerState, KeeperState, Player, PlayerId, PlayerRole};
use crate::tactics::{Team, TeamColor, TeamState};

pub struct World {
    pub(crate) config: SimConfig,
    pub(crate) pitch: Pitch,
    pub(crate) ball: SoccerBall,
    pub(crate) players: Vec<Player>,
    /// Indexed by [`TeamColor::index`].
    pub(crate) teams: [Team; 2],
    registry: FxHashMap<EntityId, PlayerId>,
    ids: EntityIdAllocator,
    dispatcher: Dispatcher,
    pub(crate) tick: u64,
    pub(crate) game_active: bool,
    pub(crate) goal_keeper_has_ball: bool,
    paused: bool,
    pub(crate) rng: Box<dyn RandomSource>,
    pub(crate) events: EventLog,
}

impl std::fmt::Debug for World {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("World")
            .field("tick", &self.tick)
            .field("game_active", &self.game_active)
            .field("ball", &self.ball.position())
            .field("players", &self.players.len())
            .finish_non_exhaustive()
    }
}

impl World {
    /// Builds both squads from `config` and runs every initial `enter`.
    pub fn new(config: SimConfig, mut rng: Box<dyn RandomSource>) -> Result<Self> {
        config.validate()?;
        let pitch = Pitch::new(&config.pitch);
        for color in TeamColor::BOTH {
            validate_lineup(color, config.team(color), pitch.regions().len())?;
        }

        let mut ids = EntityIdAllocator::new();
        let ball = SoccerBall::new(
            ids.allocate(),
            pitch.center_spot(),
            config.ball.size,
            config.ball.mass,
            config.ball.friction,
        );

        let mut players = Vec::with_capacity(2 * (FIELD_PLAYERS_PER_TEAM + 1));
        let mut registry = FxHashMap::default();
        let mut rosters: [Vec<PlayerId>; 2] = [Vec::new(), Vec::new()];

        for color in TeamColor::BOTH {
            let setup = config.team(color);
            let slots = std::iter::once((setup.keeper_region, PlayerRole::GoalKeeper)).chain(
                setup.field_players.iter().map(|s| (s.region, s.role)),
            );

            for (region, role) in slots {
                let pid = PlayerId(players.len());
                let entity = ids.allocate();
                let home = pitch.region(region)?.center();
                let player = build_player(&config, rng.as_mut(), pid, entity, color, role, region, home);
                registry.insert(entity, pid);
                rosters[color.index()].push(pid);
                players.push(player);
            }
        }

        let [red_roster, blue_roster] = rosters;
        let mut support_for = |color: TeamColor| {
            let regulator = Regulator::new(
                config.tactics.support_spot_update_freq,
                config.frame_rate,
                rng.as_mut(),
            );
            SupportSpotCalculator::new(
                color,
                pitch.playing_area(),
                config.tactics.support_spots_x,
                config.tactics.support_spots_y,
                regulator,
            )
        };
        let red = Team::new(TeamColor::Red, red_roster, support_for(TeamColor::Red));
        let blue = Team::new(TeamColor::Blue, blue_roster, support_for(TeamColor::Blue));

        let mut world = Self {
            config,
            pitch,
            ball,
            players,
            teams: [red, blue],
            registry,
            ids,
            dispatcher: Dispatcher::new(),
            tick: 0,
            game_active: true,
            goal_keeper_has_ball: false,
            paused: false,
            rng,
            events: EventLog::new(),
        };

        for idx in 0..world.players.len() {
            let pid = PlayerId(idx);
            let (entity, name) = (world.players[idx].entity_id(), world.players[idx].state_name());
            world.raise(MatchEvent::EnterState {
                owner: EventOwner::Player(entity),
                state: name.to_string(),
            });
            if world.players[idx].is_goalkeeper() {
                fsm::start::<World, KeeperState>(&mut world, pid);
            } else {
                fsm::start::<World, FieldPlayerState>(&mut world, pid);
            }
        }

        for color in TeamColor::BOTH {
            let state = world.team(color).state();
            world.raise(MatchEvent::EnterState {
                owner: EventOwner::Team(color),
                state: <TeamState as fsm::State<World>>::name(state).to_string(),
            });
            fsm::start::<World, TeamState>(&mut world, color);
        }

        info!(
            players = world.players.len(),
            entities = world.ids.issued(),
            "match world created"
        );
        Ok(world)
    }

    // ========== Tick ==========

    /// Advances one tick. A no-op while paused.
    pub fn update(&mut self) {
        if self.paused {
            return;
        }

        self.ball_update();
        for color in TeamColor::BOTH {
            self.team_update(color);
        }
        self.check_goals();

        self.tick += 1;
    }

    pub fn ball_update(&mut self) {
        self.ball.update(self.pitch.walls());
    }

    pub fn team_update(&mut self, color: TeamColor) {
        self.calculate_closest_player_to_ball(color);
        fsm::update::<World, TeamState>(self, color);

        for i in 0..self.teams[color.index()].players.len() {
            let pid = self.teams[color.index()].players[i];
            self.player_update(pid);
        }
    }

    fn check_goals(&mut self) {
        let (pos, old) = (self.ball.position(), self.ball.old_position());

        // a goal is counted on the goal it went into
        let scoring = if self.pitch.goal_mut(TeamColor::Blue).scored(&pos, &old) {
            Some(TeamColor::Red)
        } else if self.pitch.goal_mut(TeamColor::Red).scored(&pos, &old) {
            Some(TeamColor::Blue)
        } else {
            None
        };

        let Some(scoring) = scoring else {
            return;
        };

        let score = self.score();
        info!(tick = self.tick, %scoring, red = score.red, blue = score.blue, "goal");
        self.raise(MatchEvent::GoalScored { scoring });

        self.game_active = false;
        self.ball.place_at_position(self.pitch.center_spot());
        for color in TeamColor::BOTH {
            fsm::change_state(self, color, TeamState::PrepareForKickOff);
        }
    }

    // ========== Messaging ==========

    /// Delivers a telegram synchronously to `receiver`'s state machine.
    pub fn dispatch(&mut self, sender: EntityId, receiver: EntityId, message: Message) -> Delivery {
        let Some(&pid) = self.registry.get(&receiver) else {
            warn!(%sender, %receiver, message = message.name(), "telegram to unknown receiver");
            self.dispatcher.record(Delivery::UnknownReceiver);
            return Delivery::UnknownReceiver;
        };

        if !self.dispatcher.try_enter() {
            warn!(
                %sender,
                %receiver,
                message = message.name(),
                depth = self.dispatcher.depth(),
                "dispatch depth exceeded, telegram dropped"
            );
            self.dispatcher.record(Delivery::DepthExceeded);
            return Delivery::DepthExceeded;
        }

        let telegram = Telegram {
            sender,
            receiver,
            message,
            tick: self.tick,
        };
        debug!(%sender, %receiver, message = message.name(), tick = self.tick, "dispatch");

        let handled = if self.players[pid.0].is_goalkeeper() {
            fsm::handle_message::<World, KeeperState>(self, pid, &telegram)
        } else {
            fsm::handle_message::<World, FieldPlayerState>(self, pid, &telegram)
        };
        self.dispatcher.leave();

        let delivery = if handled {
            Delivery::Handled
        } else {
            Delivery::Unhandled
        };
        self.dispatcher.record(delivery);
        delivery
    }

    /// Player-to-player shorthand for [`World::dispatch`].
    pub(crate) fn send(&mut self, from: PlayerId, to: PlayerId, message: Message) -> Delivery {
        let sender = self.players[from.0].entity_id();
        let receiver = self.players[to.0].entity_id();
        self.dispatch(sender, receiver, message)
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub fn player_by_entity(&self, entity: EntityId) -> Option<PlayerId> {
        self.registry.get(&entity).copied()
    }

    // ========== Events ==========

    pub(crate) fn raise(&mut self, event: MatchEvent) {
        self.events.raise(self.tick, event);
    }

    /// Releases every event raised since the last drain.
    pub fn drain_events(&mut self) -> Vec<TimedEvent> {
        self.events.drain()
    }

    pub fn events(&self) -> &EventLog {
        &self.events
    }

    // ========== Accessors ==========

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn pitch(&self) -> &Pitch {
        &self.pitch
    }

    pub fn ball(&self) -> &SoccerBall {
        &self.ball
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(id.0)
    }

    pub(crate) fn member(&self, id: PlayerId) -> &Player {
        &self.players[id.0]
    }

    pub(crate) fn member_mut(&mut self, id: PlayerId) -> &mut Player {
        &mut self.players[id.0]
    }

    pub fn team(&self, color: TeamColor) -> &Team {
        &self.teams[color.index()]
    }

    pub(crate) fn team_mut(&mut self, color: TeamColor) -> &mut Team {
        &mut self.teams[color.index()]
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn game_active(&self) -> bool {
        self.game_active
    }

    pub fn goal_keeper_has_ball(&self) -> bool {
        self.goal_keeper_has_ball
    }

    pub(crate) fn set_goal_keeper_has_ball(&mut self, value: bool) {
        self.goal_keeper_has_ball = value;
    }

    /// Raises `KickOff` when the game goes from inactive to active.
    pub fn set_game_active(&mut self, active: bool) {
        if active && !self.game_active {
            info!(tick = self.tick, "kick off");
            self.raise(MatchEvent::KickOff);
        }
        self.game_active = active;
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub(crate) fn rng(&mut self) -> &mut dyn RandomSource {
        self.rng.as_mut()
    }

    /// Goals for each side: red's count lives in the blue goal.
    pub fn score(&self) -> Score {
        Score {
            red: self.pitch.home_goal(TeamColor::Blue).goals_scored(),
            blue: self.pitch.home_goal(TeamColor::Red).goals_scored(),
        }
    }
}

fn validate_lineup(color: TeamColor, setup: &TeamSetup, num_regions: usize) -> Result<()> {
    let invalid = |reason: String| SimError::InvalidLineup { color, reason };

    if setup.field_players.len() != FIELD_PLAYERS_PER_TEAM {
        return Err(invalid(format!(
            "expected {} field players, found {}",
            FIELD_PLAYERS_PER_TEAM,
            setup.field_players.len()
        )));
    }
    if setup.field_players.iter().any(|s| s.role == PlayerRole::GoalKeeper) {
        return Err(invalid("goalkeeper listed as a field player".into()));
    }

    let squad = setup.squad_size();
    for (name, table) in [
        ("defending", &setup.defending_regions),
        ("attacking", &setup.attacking_regions),
    ] {
        if table.len() != squad {
            return Err(invalid(format!(
                "{} region table has {} entries for {} players",
                name,
                table.len(),
                squad
            )));
        }
    }

    let all_regions = std::iter::once(setup.keeper_region)
        .chain(setup.field_players.iter().map(|s| s.region))
        .chain(setup.defending_regions.iter().copied())
        .chain(setup.attacking_regions.iter().copied());
    for region in all_regions {
        if region >= num_regions {
            return Err(invalid(format!("region {} is off the pitch", region)));
        }
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn build_player(
    config: &SimConfig,
    rng: &mut dyn RandomSource,
    pid: PlayerId,
    entity: EntityId,
    color: TeamColor,
    role: PlayerRole,
    region: usize,
    home: Vector2D,
) -> Player {
    let pc = &config.player;
    let body = MovingEntity::new(
        entity,
        home,
        vec2(0.0, -1.0),
        pc.mass,
        pc.max_speed_without_ball,
        pc.max_force,
        pc.max_turn_rate,
        pc.bounding_radius * pc.scale,
    );

    let mut steering = Steering::new(pc.separation_coefficient, pc.view_distance);
    steering.activate(Behavior::Separation);
    steering.set_target(home);

    let brain = match role {
        PlayerRole::GoalKeeper => Brain::Keeper {
            fsm: StateMachine::new(KeeperState::TendGoal).with_global(KeeperState::Global),
            look_at: body.heading(),
        },
        PlayerRole::Attacker | PlayerRole::Defender => Brain::Field {
            fsm: StateMachine::new(FieldPlayerState::Wait).with_global(FieldPlayerState::Global),
            kick_limiter: Regulator::new(pc.kick_frequency, config.frame_rate, rng),
        },
    };

    Player::new(pid, color, role, region, body, steering, brain)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::messaging::MAX_DISPATCH_DEPTH;
    use crate::engine::random::testing::FixedRandom;
    use crate::engine::random::SimRng;

    fn world() -> World {
        World::new(SimConfig::deterministic(), Box::new(FixedRandom::new(0.5))).unwrap()
    }

    #[test]
    fn test_construction_layout() {
        let w = world();
        assert_eq!(w.players().len(), 22);
        // ball takes the first id
        assert_eq!(w.ball().id(), EntityId(0));
        for color in TeamColor::BOTH {
            let team = w.team(color);
            assert_eq!(team.players().len(), 11);
            let keeper = team.keeper().unwrap();
            assert!(w.member(keeper).is_goalkeeper());
            assert!(team
                .field_players()
                .iter()
                .all(|&p| w.member(p).field_state() == Some(FieldPlayerState::Wait)));
        }
        let red_keeper = w.member(w.team(TeamColor::Red).keeper().unwrap());
        assert_eq!(red_keeper.position(), w.pitch().region(80).unwrap().center());
        assert_eq!(red_keeper.keeper_state(), Some(KeeperState::TendGoal));
        assert!(w.game_active());
        assert_eq!(w.score(), Score { red: 0, blue: 0 });
    }

    #[test]
    fn test_separation_on_from_start() {
        let w = world();
        assert!(w
            .players()
            .iter()
            .all(|p| p.steering().is_active(Behavior::Separation)));
    }

    #[test]
    fn test_rejects_short_lineup() {
        let mut cfg = SimConfig::classic();
        cfg.blue.field_players.pop();
        let err = World::new(cfg, Box::new(FixedRandom::new(0.5))).unwrap_err();
        assert!(matches!(
            err,
            SimError::InvalidLineup {
                color: TeamColor::Blue,
                ..
            }
        ));
    }

    #[test]
    fn test_rejects_region_off_pitch() {
        let mut cfg = SimConfig::classic();
        cfg.red.attacking_regions[3] = 84;
        assert!(World::new(cfg, Box::new(FixedRandom::new(0.5))).is_err());
    }

    #[test]
    fn test_dispatch_unknown_receiver() {
        let mut w = world();
        let d = w.dispatch(EntityId(1), EntityId(999), Message::Wait);
        assert_eq!(d, Delivery::UnknownReceiver);
        assert_eq!(w.dispatcher().dropped(), 1);
    }

    #[test]
    fn test_dispatch_wait_is_handled_by_global() {
        let mut w = world();
        let pid = w.team(TeamColor::Blue).field_players()[2];
        let entity = w.member(pid).entity_id();
        assert_eq!(w.dispatch(EntityId(0), entity, Message::Wait), Delivery::Handled);
        assert_eq!(w.member(pid).field_state(), Some(FieldPlayerState::Wait));
    }

    #[test]
    fn test_keeper_ignores_field_messages() {
        let mut w = world();
        let keeper = w.team(TeamColor::Red).keeper().unwrap();
        let entity = w.member(keeper).entity_id();
        assert_eq!(w.dispatch(EntityId(0), entity, Message::Wait), Delivery::Unhandled);
    }

    #[test]
    fn test_depth_guard_drops_nested_telegram() {
        let mut w = world();
        for _ in 0..MAX_DISPATCH_DEPTH {
            assert!(w.dispatcher.try_enter());
        }
        let target = w.member(w.team(TeamColor::Red).field_players()[0]).entity_id();
        assert_eq!(
            w.dispatch(EntityId(0), target, Message::Wait),
            Delivery::DepthExceeded
        );
    }

    #[test]
    fn test_pause_freezes_the_match() {
        let mut w = world();
        w.set_paused(true);
        w.update();
        assert_eq!(w.tick(), 0);
        w.set_paused(false);
        w.update();
        assert_eq!(w.tick(), 1);
    }

    #[test]
    fn test_same_seed_same_match() {
        let cfg = SimConfig::classic().with_seed(42);
        let mut a = World::new(cfg.clone(), Box::new(SimRng::seeded(42))).unwrap();
        let mut b = World::new(cfg, Box::new(SimRng::seeded(42))).unwrap();
        for _ in 0..300 {
            a.update();
            b.update();
        }
        assert_eq!(a.snapshot(), b.snapshot());
        assert_eq!(a.events().counts(), b.events().counts());
    }

    #[test]
    fn test_goal_resets_for_kick_off() {
        let mut w = world();
        w.drain_events();

        // roll the ball straight into the blue goal
        let blue_goal = w.pitch().home_goal(TeamColor::Blue).center;
        w.ball.place_at_position(blue_goal - vec2(2.0, 0.0));
        w.ball.kick(vec2(1.0, 0.0), 5.0);
        w.ball_update();
        w.check_goals();

        assert_eq!(w.score(), Score { red: 1, blue: 0 });
        assert!(!w.game_active());
        assert_eq!(w.ball().position(), w.pitch().center_spot());
        for color in TeamColor::BOTH {
            assert_eq!(w.team(color).state(), TeamState::PrepareForKickOff);
            assert!(!w.team(color).in_control());
        }
        let events = w.drain_events();
        assert!(events
            .iter()
            .any(|e| e.event == MatchEvent::GoalScored { scoring: TeamColor::Red }));
    }

    #[test]
    fn test_kick_off_event_on_reactivation() {
        let mut w = world();
        w.set_game_active(false);
        w.drain_events();
        w.set_game_active(true);
        w.set_game_active(true);
        assert_eq!(w.drain_events().len(), 1);
        assert_eq!(w.events().count("kick_off"), 1);
    }
}
