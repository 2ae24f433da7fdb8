use std::io::{self, Write};

use tracing::{debug, info};

use super::command::{Action, Command};
use super::config::RaceConfig;
use super::simulation::{intercept_point, predict_collision, predict_race_path};
use super::targeting::{aim_waypoint, is_hairpin, on_final_lap, race_progress, Aim, Tracker};
use super::vec2::{angle_diff, Vec2};
use super::world::{Pod, Role, World};

/// What one controlled pod does this turn.
#[derive(Debug, Clone)]
pub struct Decision {
    pub command: Command,
    /// The pod is closing in on its checkpoint.
    pub approaching: bool,
}

impl Decision {
    fn new(command: Command, approaching: bool) -> Self {
        Decision {
            command,
            approaching,
        }
    }
}

/// Per-role decision function. Reads the whole turn snapshot, mutates only
/// its own bookkeeping.
pub trait PodStrategy {
    fn decide(&mut self, index: usize, world: &World, cfg: &RaceConfig) -> Decision;
}

/// Absolute heading error in degrees toward `target`. On the first turn the
/// pod may face anywhere, so there is no error to pay for.
fn heading_error(pod: &Pod, target: Vec2, turn: u32) -> f64 {
    if turn <= 1 || pod.pos.dist(target) < 1. {
        return 0.;
    }
    angle_diff(pod.angle, (target - pod.pos).angle_deg()).abs()
}

pub fn heading_thrust(error: f64, cfg: &RaceConfig) -> i32 {
    if error > cfg.thrust.stop_angle {
        0
    } else if error > cfg.thrust.slow_angle {
        cfg.thrust.slow_thrust
    } else {
        cfg.physics.max_thrust
    }
}

/// Pushes `point` ahead along the pod's heading of travel, one checkpoint
/// radius per `lookahead_speed` up to `lookahead_max`, and back against the
/// sideways velocity so momentum doesn't carry it wide of the checkpoint.
pub fn compensate_drift(pod: &Pod, point: Vec2, cfg: &RaceConfig) -> Vec2 {
    let tcfg = &cfg.thrust;
    let speed = pod.speed();
    if speed <= tcfg.drift_min_speed {
        return point;
    }

    let radii = (speed / tcfg.lookahead_speed).min(tcfg.lookahead_max);
    let lookahead = radii * cfg.physics.checkpoint_radius;
    let dir = (point - pod.pos).norm();
    let lateral = pod.vel - dir * pod.vel.dot(dir);
    point + pod.vel.norm() * lookahead - lateral * tcfg.drift_factor
}

/// Cornering curve for hairpins: rotate in place, creep, then full power.
pub fn hairpin_thrust(error: f64, cfg: &RaceConfig) -> i32 {
    let tcfg = &cfg.thrust;
    if error > tcfg.hairpin_stop_angle {
        0
    } else if error > tcfg.hairpin_slow_angle {
        tcfg.hairpin_slow_thrust
    } else {
        cfg.physics.max_thrust
    }
}

/// Time to impact if a shield is warranted this turn.
fn shield_threat(index: usize, world: &World, cfg: &RaceConfig) -> Option<f64> {
    let pod = &world.mine[index];
    if !pod.can_shield() {
        return None;
    }

    let scfg = &cfg.shield;
    world
        .others(index)
        .filter(|other| scfg.include_allies || other.role == Role::Opponent)
        .filter(|other| (other.vel - pod.vel).len() > scfg.min_relative_speed)
        .map(|other| predict_collision(pod, other, cfg))
        .filter(|c| c.within(scfg.horizon, scfg.min_probability))
        .map(|c| c.time)
        .min_by(f64::total_cmp)
}

/// Straight at the pod's own checkpoint, full thrust.
fn safe_default(pod: &Pod, world: &World, cfg: &RaceConfig) -> Decision {
    let target = world.track.get(pod.next_checkpoint).pos;
    let command = Command::new(target, Action::thrust(cfg.physics.max_thrust)).with_note("fallback");
    Decision::new(command, false)
}

/// Races its own checkpoints.
#[derive(Debug, Default)]
pub struct RacerStrategy;

impl RacerStrategy {
    fn may_boost(pod: &Pod, aim: &Aim, error: f64, world: &World, cfg: &RaceConfig) -> bool {
        let bcfg = &cfg.boost;
        // No thrust at all while the shield is up, boost included.
        if !pod.boost_available || !pod.can_shield() || aim.arriving {
            return false;
        }
        if world.turn <= bcfg.min_turn || error >= bcfg.max_angle || aim.distance <= bcfg.min_distance {
            return false;
        }
        if bcfg.long_leg_only {
            let track = &world.track;
            return on_final_lap(pod, track) && aim.checkpoint == track.longest_leg();
        }
        true
    }
}

impl PodStrategy for RacerStrategy {
    fn decide(&mut self, index: usize, world: &World, cfg: &RaceConfig) -> Decision {
        let pod = &world.mine[index];
        let aim = aim_waypoint(pod, &world.track, cfg);
        // Straight through the finish: no pre-aim, no look-ahead.
        let target = if aim.arriving || aim.final_leg {
            aim.point
        } else {
            compensate_drift(pod, aim.point, cfg)
        };
        if !target.is_finite() {
            return safe_default(pod, world, cfg);
        }

        let approaching = aim.arriving || aim.distance < cfg.thrust.brake_distance;
        let error = heading_error(pod, target, world.turn);

        if let Some(time) = shield_threat(index, world, cfg) {
            debug!(pod = index, time, "impact ahead");
            return Decision::new(Command::new(target, Action::Shield).with_note("impact"), approaching);
        }

        if !aim.final_leg && is_hairpin(pod, &world.track, cfg) {
            debug!(pod = index, error, "hairpin");
            let thrust = hairpin_thrust(error, cfg);
            return Decision::new(Command::new(target, Action::thrust(thrust)).with_note("hairpin"), approaching);
        }

        if Self::may_boost(pod, &aim, error, world, cfg) {
            return Decision::new(Command::new(target, Action::Boost).with_note("boost"), approaching);
        }

        let mut thrust = heading_thrust(error, cfg);
        let mut note = if aim.arriving { "drift" } else { "race" };
        if !aim.arriving
            && aim.distance < cfg.thrust.brake_distance
            && pod.speed() > cfg.thrust.brake_speed
        {
            thrust = thrust.min(cfg.thrust.brake_thrust);
            note = "brake";
        }

        Decision::new(Command::new(target, Action::thrust(thrust)).with_note(note), approaching)
    }
}

/// Hunts the leading opponent and keeps clear of the own racer.
#[derive(Debug, Default)]
pub struct BlockerStrategy {
    tracker: Tracker,
}

impl BlockerStrategy {
    pub fn new() -> Self {
        BlockerStrategy::default()
    }

    pub fn tracker(&self) -> &Tracker {
        &self.tracker
    }

    /// Perpendicular step away from an ally on a collision course.
    fn avoid_ally(index: usize, world: &World, cfg: &RaceConfig) -> Option<Vec2> {
        let pod = &world.mine[index];
        let acfg = &cfg.avoidance;

        world
            .mine
            .iter()
            .filter(|ally| ally.id != index)
            .filter(|ally| pod.pos.dist(ally.pos) < acfg.range)
            .find(|ally| predict_collision(pod, ally, cfg).within(acfg.horizon, acfg.min_probability))
            .map(|ally| {
                let mut side = (ally.pos - pod.pos).perp().norm();
                if side.dot(pod.vel - ally.vel) < 0. {
                    side = -side;
                }
                pod.pos + side * acfg.sidestep
            })
    }
}

impl PodStrategy for BlockerStrategy {
    fn decide(&mut self, index: usize, world: &World, cfg: &RaceConfig) -> Decision {
        let pod = &world.mine[index];

        if let Some(target) = Self::avoid_ally(index, world, cfg) {
            if target.is_finite() {
                let command = Command::new(target, Action::thrust(cfg.physics.max_thrust));
                return Decision::new(command.with_note("give way"), false);
            }
        }

        let Some(victim) = self.tracker.select(&world.opponents, &world.track, cfg) else {
            return safe_default(pod, world, cfg);
        };
        let opponent = &world.opponents[victim];

        let path = predict_race_path(opponent, &world.track, cfg.intercept.horizon(), cfg);
        let target = intercept_point(pod, &path, cfg)
            .map(|i| i.point)
            .unwrap_or(opponent.pos);
        if !target.is_finite() {
            return safe_default(pod, world, cfg);
        }

        let error = heading_error(pod, target, world.turn);

        if shield_threat(index, world, cfg).is_some() {
            return Decision::new(Command::new(target, Action::Shield).with_note("impact"), false);
        }

        let distance = pod.pos.dist(target);
        if pod.boost_available
            && pod.can_shield()
            && error < cfg.boost.max_angle
            && distance > cfg.boost.intercept_min_distance
        {
            return Decision::new(Command::new(target, Action::Boost).with_note("chase"), false);
        }

        let icfg = &cfg.intercept;
        let thrust = if pod.pos.dist(opponent.pos) < icfg.ram_distance && error < icfg.ram_angle {
            cfg.physics.max_thrust
        } else {
            heading_thrust(error, cfg)
        };

        Decision::new(Command::new(target, Action::thrust(thrust)).with_note("intercept"), false)
    }
}

fn pilot_for(role: Role) -> Box<dyn PodStrategy> {
    match role {
        Role::Blocker => Box::new(BlockerStrategy::new()),
        Role::Racer | Role::Opponent => Box::new(RacerStrategy),
    }
}

/// Drives every controlled pod, one strategy per role.
pub struct Strategy {
    cfg: RaceConfig,
    pilots: Vec<Box<dyn PodStrategy>>,
}

impl Strategy {
    pub fn new(cfg: RaceConfig) -> Self {
        Strategy {
            cfg,
            pilots: Vec::new(),
        }
    }

    pub fn config(&self) -> &RaceConfig {
        &self.cfg
    }

    /// One decision per controlled pod, in input order. `world` is not touched.
    pub fn decide(&mut self, world: &World) -> Vec<Decision> {
        if self.pilots.len() != world.mine.len() {
            self.pilots = world.mine.iter().map(|p| pilot_for(p.role)).collect();
        }

        let cfg = &self.cfg;
        self.pilots
            .iter_mut()
            .enumerate()
            .map(|(index, pilot)| pilot.decide(index, world, cfg))
            .collect()
    }

    /// Writes one command line per pod, then applies the side effects of
    /// those commands to the controlled pods.
    pub fn play<W: Write>(&mut self, world: &mut World, out: &mut W) -> io::Result<()> {
        let decisions = self.decide(world);

        for decision in &decisions {
            writeln!(out, "{}", decision.command.to_line(self.cfg.annotate))?;
        }
        out.flush()?;

        let cooldown = self.cfg.physics.shield_cooldown;
        for (pod, decision) in world.mine.iter_mut().zip(&decisions) {
            let action = decision.command.action;
            pod.commit(action, cooldown, decision.approaching);
            if action == Action::Boost {
                info!(turn = world.turn, pod = pod.id, role = %pod.role, "boost spent");
            }
        }

        for pod in &world.mine {
            debug!(
                turn = world.turn,
                pod = pod.id,
                role = %pod.role,
                phase = ?pod.phase,
                progress = race_progress(pod, &world.track, &self.cfg),
                "decided"
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::{PodSnapshot, Track};

    fn snap(x: f64, y: f64, vx: f64, vy: f64, angle: f64, next: usize) -> PodSnapshot {
        PodSnapshot {
            pos: Vec2::new(x, y),
            vel: Vec2::new(vx, vy),
            angle,
            next_checkpoint: next,
        }
    }

    fn world(points: &[Vec2], mine: &[PodSnapshot], opponents: &[PodSnapshot]) -> World {
        let cfg = RaceConfig::default();
        let track = Track::new(3, points, cfg.physics.checkpoint_radius).unwrap();
        let mut world = World::new(track, &cfg);
        world.observe(mine, opponents);
        world
    }

    fn play_lines(strategy: &mut Strategy, world: &mut World) -> Vec<String> {
        let mut out = Vec::new();
        strategy.play(world, &mut out).unwrap();
        String::from_utf8(out)
            .unwrap()
            .lines()
            .map(str::to_owned)
            .collect()
    }

    #[test]
    fn standing_start_goes_straight_for_checkpoint() {
        let mut w = world(
            &[Vec2::new(5000., 5000.), Vec2::new(12000., 2000.)],
            &[
                snap(4450., 5000., 0., 0., 0., 0),
                snap(1000., 1000., 0., 0., 0., 0),
            ],
            &[
                snap(1000., 8000., 0., 0., 0., 0),
                snap(2000., 8000., 0., 0., 0., 0),
            ],
        );
        let mut strategy = Strategy::new(RaceConfig::default());
        let lines = play_lines(&mut strategy, &mut w);

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "5000 5000 100");
    }

    #[test]
    fn shield_on_imminent_impact() {
        let far = snap(12000., 8000., 0., 0., 0., 1);
        let mut w = world(
            &[Vec2::new(1000., 2000.), Vec2::new(9000., 2000.)],
            &[snap(2000., 2000., 200., 0., 0., 1), snap(1000., 8000., 0., 0., 0., 1)],
            &[snap(3300., 2000., -200., 0., 180., 1), far],
        );
        let mut strategy = Strategy::new(RaceConfig::default());
        let lines = play_lines(&mut strategy, &mut w);

        // Aim is pushed two radii past the checkpoint at speed 200.
        assert_eq!(lines[0], "10200 2000 SHIELD");
        assert_eq!(w.mine[0].shield_cooldown, 3);
        assert_eq!(w.mine[0].phase, crate::world::Phase::Shielding);

        // Pods drift apart; the cooldown runs down and no shield is re-armed early.
        w.observe(
            &[snap(2000., 2000., 0., 0., 0., 1), snap(1000., 8000., 0., 0., 0., 1)],
            &[snap(6000., 5000., 0., 0., 0., 1), far],
        );
        play_lines(&mut strategy, &mut w);
        assert_eq!(w.mine[0].shield_cooldown, 2);
    }

    #[test]
    fn shield_waits_for_cooldown() {
        let mut w = world(
            &[Vec2::new(1000., 2000.), Vec2::new(9000., 2000.)],
            &[snap(2000., 2000., 200., 0., 0., 1), snap(1000., 8000., 0., 0., 0., 1)],
            &[snap(3300., 2000., -200., 0., 180., 1), snap(12000., 8000., 0., 0., 0., 1)],
        );
        w.mine[0].shield_cooldown = 1;
        let decisions = Strategy::new(RaceConfig::default()).decide(&w);
        assert_ne!(decisions[0].command.action, Action::Shield);
    }

    #[test]
    fn boost_is_spent_exactly_once() {
        let mine = [snap(1000., 1000., 0., 0., 0., 1), snap(1000., 8000., 0., 0., 0., 1)];
        let opponents = [snap(14000., 8000., 0., 0., 0., 1), snap(15000., 8000., 0., 0., 0., 1)];
        let mut w = world(&[Vec2::new(600., 600.), Vec2::new(9000., 1000.)], &mine, &opponents);
        let mut strategy = Strategy::new(RaceConfig::default());

        let mut boost_turns = Vec::new();
        for _ in 0..20 {
            let lines = play_lines(&mut strategy, &mut w);
            if lines[0].ends_with("BOOST") {
                boost_turns.push(w.turn);
            }
            w.observe(&mine, &opponents);
        }

        // Held through the opening turns, then spent on the first one allowed.
        assert_eq!(boost_turns, vec![4]);
        assert!(!w.mine[0].boost_available);
    }

    #[test]
    fn long_leg_restriction_holds_boost() {
        let mut cfg = RaceConfig::default();
        cfg.boost.long_leg_only = true;
        let mine = [snap(1000., 1000., 0., 0., 0., 1), snap(1000., 8000., 0., 0., 0., 1)];
        let opponents = [snap(14000., 8000., 0., 0., 0., 1), snap(15000., 4000., 0., 0., 0., 1)];
        let mut w = world(
            &[
                Vec2::new(600., 600.),
                Vec2::new(9000., 1000.),
                Vec2::new(15000., 8000.),
            ],
            &mine,
            &opponents,
        );
        for _ in 0..4 {
            w.observe(&mine, &opponents);
        }

        let mut strategy = Strategy::new(cfg);
        assert_eq!(strategy.decide(&w)[0].command.action, Action::Thrust(100));

        let decisions = Strategy::new(RaceConfig::default()).decide(&w);
        assert_eq!(decisions[0].command.action, Action::Boost);
    }

    #[test]
    fn long_leg_boost_waits_for_the_last_lap() {
        let mut cfg = RaceConfig::default();
        cfg.boost.long_leg_only = true;
        // Legs: 0 -> 1 is 4000, 1 -> 2 is 3000, 2 -> 0 is 5000.
        let points = [
            Vec2::new(1000., 1000.),
            Vec2::new(5000., 1000.),
            Vec2::new(5000., 4000.),
        ];
        let racer = |next| snap(6000., 4750., 0., 0., 217., next);
        let blocker = snap(1000., 8000., 0., 0., 0., 1);
        let opponents = [snap(14000., 8000., 0., 0., 0., 1), snap(15000., 8000., 0., 0., 0., 1)];

        let mut w = world(&points, &[racer(1), blocker], &opponents);
        assert_eq!(w.track.longest_leg(), 0);
        let mut strategy = Strategy::new(cfg);

        // Closing leg of lap 2: the wrap to 0 has already bumped the lap count.
        for next in [2, 0, 1, 2, 0] {
            w.observe(&[racer(next), blocker], &opponents);
        }
        assert_eq!(w.mine[0].laps, 2);
        assert_eq!(strategy.decide(&w)[0].command.action, Action::Thrust(100));

        // Same leg on lap 3.
        for next in [1, 2, 0] {
            w.observe(&[racer(next), blocker], &opponents);
        }
        assert_eq!(strategy.decide(&w)[0].command.to_string(), "1000 1000 BOOST");
    }

    #[test]
    fn hairpin_cornering_curve() {
        let mut cfg = RaceConfig::default();
        // Close enough to boost if the corner allowed it.
        cfg.boost.min_distance = 1000.;
        let far = [snap(14000., 8000., 0., 0., 0., 1), snap(15000., 8000., 0., 0., 0., 1)];
        let turn_four = |points: &[Vec2], angle: f64| {
            let mine = [snap(7500., 1000., 0., 0., angle, 1), snap(1000., 8000., 0., 0., 0., 1)];
            let mut w = world(points, &mine, &far);
            for _ in 0..3 {
                w.observe(&mine, &far);
            }
            w
        };

        let hairpin = [
            Vec2::new(1000., 1000.),
            Vec2::new(9000., 1000.),
            Vec2::new(2000., 2500.),
        ];
        let gentle = [
            Vec2::new(1000., 1000.),
            Vec2::new(9000., 1000.),
            Vec2::new(14000., 3000.),
        ];

        let action = |points: &[Vec2], angle: f64| {
            Strategy::new(cfg.clone()).decide(&turn_four(points, angle))[0].command.action
        };

        assert_eq!(action(&gentle, 0.), Action::Boost);
        assert_eq!(action(&hairpin, 0.), Action::Thrust(100));
        assert_eq!(action(&hairpin, 50.), Action::Thrust(30));
        assert_eq!(action(&hairpin, 80.), Action::Thrust(0));
        // The ordinary curve would still give 50 at this error.
        assert_eq!(action(&gentle, 50.), Action::Thrust(50));
    }

    #[test]
    fn home_run_aims_at_the_finish_itself() {
        let points = [Vec2::new(5000., 5000.), Vec2::new(12000., 2000.)];
        let mut w = world(
            &points,
            &[snap(2900., 5000., 300., 0., 0., 0), snap(1000., 1000., 0., 0., 0., 1)],
            &[snap(1000., 8000., 0., 0., 0., 1), snap(2000., 8000., 0., 0., 0., 1)],
        );

        w.mine[0].laps = 2;
        let decisions = Strategy::new(RaceConfig::default()).decide(&w);
        assert_eq!(decisions[0].command.to_string(), "6800 5000 100");

        w.mine[0].laps = 3;
        let decisions = Strategy::new(RaceConfig::default()).decide(&w);
        assert_eq!(decisions[0].command.to_string(), "5000 5000 100");
    }

    #[test]
    fn non_finite_state_falls_back_to_own_checkpoint() {
        let points = [Vec2::new(5000., 5000.), Vec2::new(12000., 2000.)];

        let w = world(
            &points,
            &[snap(1000., 1000., f64::NAN, 0., 0., 1), snap(1000., 8000., 0., 0., 0., 1)],
            &[snap(14000., 8000., 0., 0., 0., 1), snap(15000., 8000., 0., 0., 0., 1)],
        );
        let racer = &Strategy::new(RaceConfig::default()).decide(&w)[0].command;
        assert_eq!(racer.to_string(), "12000 2000 100");
        assert_eq!(racer.note, Some("fallback"));

        let w = world(
            &points,
            &[snap(1000., 1000., 0., 0., 0., 1), snap(1000., 8000., 0., 0., 0., 1)],
            &[snap(f64::NAN, 5000., 0., 0., 0., 1), snap(f64::NAN, 6000., 0., 0., 0., 1)],
        );
        let blocker = &Strategy::new(RaceConfig::default()).decide(&w)[1].command;
        assert_eq!(blocker.to_string(), "12000 2000 100");
        assert_eq!(blocker.note, Some("fallback"));
    }

    #[test]
    fn racer_brakes_near_checkpoint() {
        let w = world(
            &[Vec2::new(5000., 5000.), Vec2::new(12000., 2000.)],
            &[snap(4300., 4300., 250., -250., 315., 0), snap(1000., 1000., 0., 0., 0., 0)],
            &[snap(1000., 8000., 0., 0., 0., 0), snap(2000., 8000., 0., 0., 0., 0)],
        );
        let cfg = RaceConfig::default();
        let pod = &w.mine[0];
        let aim = aim_waypoint(pod, &w.track, &cfg);
        assert!(!aim.arriving);

        let decisions = Strategy::new(cfg).decide(&w);
        match decisions[0].command.action {
            Action::Thrust(t) => assert!(t <= 70, "thrust {t}"),
            other => panic!("unexpected {other}"),
        }
        assert!(decisions[0].approaching);
    }

    #[test]
    fn blocker_without_opponents_races() {
        let mut w = world(
            &[Vec2::new(5000., 5000.), Vec2::new(12000., 2000.)],
            &[snap(1000., 1000., 0., 0., 0., 1), snap(1000., 8000., 0., 0., 0., 1)],
            &[],
        );
        w.opponents.clear();
        let decisions = Strategy::new(RaceConfig::default()).decide(&w);
        assert_eq!(decisions[1].command.to_string(), "12000 2000 100");
    }

    #[test]
    fn blocker_gives_way_to_racer() {
        let w = world(
            &[Vec2::new(5000., 5000.), Vec2::new(12000., 2000.)],
            &[snap(3200., 2000., -300., 0., 180., 1), snap(2000., 2000., 300., 0., 0., 1)],
            &[snap(14000., 8000., 0., 0., 0., 1), snap(15000., 8000., 0., 0., 0., 1)],
        );
        let decisions = Strategy::new(RaceConfig::default()).decide(&w);
        let blocker = &decisions[1].command;
        assert_eq!(blocker.action, Action::Thrust(100));
        assert!((blocker.target.x - 2000.).abs() < 1e-9);
        assert!(((blocker.target.y - 2000.).abs() - 1000.).abs() < 1e-9);
    }

    #[test]
    fn blocker_intercepts_leader() {
        let w = world(
            &[Vec2::new(1000., 5000.), Vec2::new(9000., 5000.)],
            &[snap(1000., 1000., 0., 0., 0., 1), snap(5000., 3000., 0., 0., 90., 1)],
            &[snap(5000., 5000., 300., 0., 0., 1), snap(1000., 8000., 0., 0., 0., 1)],
        );
        let mut strategy = Strategy::new(RaceConfig::default());
        let decisions = strategy.decide(&w);
        let blocker = &decisions[1].command;

        assert_eq!(blocker.target.y, 5000.);
        assert!(blocker.target.x > 5000. && blocker.target.x < 9000.);
    }

    #[test]
    fn decide_leaves_world_untouched() {
        let w = world(
            &[Vec2::new(5000., 5000.), Vec2::new(12000., 2000.)],
            &[snap(1000., 1000., 0., 0., 0., 1), snap(1000., 8000., 0., 0., 0., 1)],
            &[snap(14000., 8000., 0., 0., 0., 1), snap(15000., 8000., 0., 0., 0., 1)],
        );
        let before = format!("{:?}", w.mine);
        Strategy::new(RaceConfig::default()).decide(&w);
        assert_eq!(format!("{:?}", w.mine), before);
    }

    #[test]
    fn drift_is_compensated_at_speed() {
        let cfg = RaceConfig::default();
        let mut pod = Pod::new(0, Role::Racer);

        // Straight at the checkpoint: pushed min(300 / 100, 3) radii beyond it.
        pod.vel = Vec2::new(300., 0.);
        assert_eq!(compensate_drift(&pod, Vec2::new(5000., 0.), &cfg), Vec2::new(6800., 0.));

        pod.vel = Vec2::new(900., 0.);
        assert_eq!(compensate_drift(&pod, Vec2::new(5000., 0.), &cfg), Vec2::new(6800., 0.));

        // Sideways: two radii along the drift, three times the drift back.
        pod.vel = Vec2::new(0., 200.);
        assert_eq!(compensate_drift(&pod, Vec2::new(5000., 0.), &cfg), Vec2::new(5000., 600.));

        pod.vel = Vec2::new(0., 50.);
        assert_eq!(compensate_drift(&pod, Vec2::new(5000., 0.), &cfg), Vec2::new(5000., 0.));
    }
}
