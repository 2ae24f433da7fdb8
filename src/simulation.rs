//! Forward simulation of pod motion under the race's friction and turn-rate model.
//!
//! Everything here is pure and infallible: degenerate geometry (zero speed,
//! zero distance) resolves to explicit "no event" values.

use super::config::{PhysicsConfig, RaceConfig};
use super::vec2::{angle_diff, normalize_angle, Vec2};
use super::world::{Pod, Track};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PodState {
    pub pos: Vec2,
    pub vel: Vec2,
    pub angle: f64,
}

impl PodState {
    pub fn of(pod: &Pod) -> Self {
        PodState {
            pos: pod.pos,
            vel: pod.vel,
            angle: pod.angle,
        }
    }
}

/// New heading after turning from `angle` toward `target` by at most `max_turn` degrees.
pub fn turn_toward(angle: f64, target: f64, max_turn: f64) -> f64 {
    let delta = angle_diff(angle, target).clamp(-max_turn, max_turn);
    normalize_angle(angle + delta)
}

/// One turn: rotate, accelerate along the new heading, apply friction, move.
pub fn step(state: PodState, target_angle: f64, thrust: f64, physics: &PhysicsConfig) -> PodState {
    let angle = turn_toward(state.angle, target_angle, physics.max_turn);
    let vel = (state.vel + Vec2::from_angle(angle) * thrust) * physics.friction;

    PodState {
        pos: state.pos + vel,
        vel,
        angle,
    }
}

/// Runs `horizon` steps, asking `policy` for (target angle, thrust) before each one.
pub fn simulate<F>(start: PodState, horizon: usize, physics: &PhysicsConfig, mut policy: F) -> Vec<PodState>
where
    F: FnMut(usize, &PodState) -> (f64, f64),
{
    let mut trajectory = Vec::with_capacity(horizon);
    let mut state = start;

    for turn in 0..horizon {
        let (target_angle, thrust) = policy(turn, &state);
        state = step(state, target_angle, thrust, physics);
        trajectory.push(state);
    }

    trajectory
}

/// Trajectory with the engine off and the heading held.
pub fn coast(start: PodState, horizon: usize, physics: &PhysicsConfig) -> Vec<PodState> {
    simulate(start, horizon, physics, |_, s| (s.angle, 0.))
}

/// Whether coasting carries the pod inside `checkpoint` within `horizon` turns.
/// A stationary pod has no momentum to carry, so it never counts as arriving.
pub fn arriving_soon(
    start: PodState,
    checkpoint: Vec2,
    radius: f64,
    horizon: usize,
    min_speed: f64,
    physics: &PhysicsConfig,
) -> bool {
    if start.vel.len() < min_speed {
        return false;
    }

    coast(start, horizon, physics)
        .iter()
        .any(|s| s.pos.dist(checkpoint) <= radius)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Collision {
    /// Turns until contact; infinite when it never happens.
    pub time: f64,
    pub probability: f64,
}

impl Collision {
    pub const NEVER: Collision = Collision {
        time: f64::INFINITY,
        probability: 0.,
    };

    pub const NOW: Collision = Collision {
        time: 0.,
        probability: 1.,
    };

    pub fn is_never(&self) -> bool {
        self.time.is_infinite()
    }

    pub fn within(&self, turns: f64, min_probability: f64) -> bool {
        self.time < turns && self.probability > min_probability
    }
}

/// Effective contact distance; faster closings get a wider margin.
pub fn collision_radius(relative_speed: f64, cfg: &RaceConfig) -> f64 {
    let margin = (relative_speed * cfg.collision.speed_margin).min(cfg.physics.pod_radius);
    cfg.collision.radius + margin.max(0.)
}

/// Solves `|p + v t| = r` for the first contact time between two pods moving
/// in straight lines, `p` and `v` being `b` relative to `a`.
pub fn predict_collision(a: &Pod, b: &Pod, cfg: &RaceConfig) -> Collision {
    let p = b.pos - a.pos;
    let v = b.vel - a.vel;
    let r = collision_radius(v.len(), cfg);

    let qa = v.len2();
    let qb = 2. * p.dot(v);
    let qc = p.len2() - r * r;

    if qa < 1e-4 {
        return if qc <= 0. { Collision::NOW } else { Collision::NEVER };
    }

    let discriminant = qb * qb - 4. * qa * qc;
    if discriminant < 0. {
        return Collision::NEVER;
    }

    // Overlapping pods have t1 <= 0 < t2; the later root is when they part.
    let root = discriminant.sqrt();
    let t1 = (-qb - root) / (2. * qa);
    let t2 = (-qb + root) / (2. * qa);
    let t = if t1 > 0. {
        t1
    } else if t2 > 0. {
        t2
    } else {
        return Collision::NEVER;
    };

    let probability = 1. - (t / cfg.collision.probability_turns).min(1.);
    Collision {
        time: t,
        probability,
    }
}

/// Thrust an opponent is assumed to use when heading for `checkpoint`.
fn estimated_thrust(state: &PodState, checkpoint: Vec2, cfg: &RaceConfig) -> f64 {
    let max = cfg.physics.max_thrust as f64;
    let radius = cfg.physics.checkpoint_radius;
    let dist = state.pos.dist(checkpoint);
    let error = angle_diff(state.angle, (checkpoint - state.pos).angle_deg()).abs();
    let (slow, stop) = (cfg.thrust.slow_angle, cfg.thrust.stop_angle);

    if dist < radius * 1.2 {
        (max * dist / (radius * 2.)).clamp(cfg.thrust.slow_thrust as f64 / 2., max)
    } else if error > slow {
        (max * (1. - (error - slow) / (stop - slow))).clamp(0., cfg.thrust.slow_thrust as f64)
    } else {
        max
    }
}

/// Plausible path of `pod` racing its own checkpoints for the next `horizon` turns.
pub fn predict_race_path(pod: &Pod, track: &Track, horizon: usize, cfg: &RaceConfig) -> Vec<PodState> {
    let mut target = pod.next_checkpoint;

    simulate(PodState::of(pod), horizon, &cfg.physics, |_, s| {
        let mut checkpoint = track.get(target).pos;
        if s.pos.dist(checkpoint) <= track.radius {
            target = track.next_index(target);
            checkpoint = track.get(target).pos;
        }
        (
            (checkpoint - s.pos).angle_deg(),
            estimated_thrust(s, checkpoint, cfg),
        )
    })
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intercept {
    pub point: Vec2,
    /// Turn of the predicted path this point belongs to (1-based).
    pub turn: usize,
    pub score: f64,
}

/// Picks the point of `path` the hunter can reach closest to the time the
/// target gets there, penalising sharp turns. `None` for an empty path.
pub fn intercept_point(hunter: &Pod, path: &[PodState], cfg: &RaceConfig) -> Option<Intercept> {
    let icfg = &cfg.intercept;
    let speed = hunter.speed();

    path.iter()
        .enumerate()
        .map(|(i, s)| {
            let turn = i + 1;
            let distance = hunter.pos.dist(s.pos);
            let error = if distance < 1. {
                0.
            } else {
                angle_diff(hunter.angle, (s.pos - hunter.pos).angle_deg()).abs()
            };

            let accel = cfg.physics.max_thrust as f64 * error.to_radians().cos();
            let reach = distance / (speed + accel / 2.).max(icfg.min_speed);
            let turning = error / cfg.physics.max_turn;

            let score = (turn as f64 - (reach + turning)).abs() * icfg.time_weight
                + error / 180. * icfg.angle_weight;

            Intercept {
                point: s.pos,
                turn,
                score,
            }
        })
        .min_by(|a, b| a.score.total_cmp(&b.score))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::Role;

    fn pod(pos: Vec2, vel: Vec2, angle: f64) -> Pod {
        let mut p = Pod::new(0, Role::Racer);
        p.pos = pos;
        p.vel = vel;
        p.angle = angle;
        p
    }

    #[test]
    fn step_clamps_rotation() {
        let physics = PhysicsConfig::default();
        let s = PodState {
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            angle: 0.,
        };
        assert_eq!(step(s, 90., 0., &physics).angle, 18.);
        assert_eq!(step(s, 270., 0., &physics).angle, 342.);
        assert_eq!(step(s, 10., 0., &physics).angle, 10.);
    }

    #[test]
    fn step_applies_thrust_then_friction() {
        let physics = PhysicsConfig::default();
        let s = PodState {
            pos: Vec2::new(100., 100.),
            vel: Vec2::new(100., 0.),
            angle: 0.,
        };
        let next = step(s, 0., 100., &physics);
        assert!((next.vel.x - 170.).abs() < 1e-9);
        assert!((next.pos.x - 270.).abs() < 1e-9);
        assert!((next.pos.y - 100.).abs() < 1e-9);
    }

    #[test]
    fn simulation_is_deterministic() {
        let physics = PhysicsConfig::default();
        let start = PodState {
            pos: Vec2::new(3000., 4000.),
            vel: Vec2::new(-120., 333.),
            angle: 77.,
        };
        let policy = |turn: usize, _: &PodState| (200. + turn as f64 * 7., 80.);
        assert_eq!(
            simulate(start, 8, &physics, policy),
            simulate(start, 8, &physics, policy)
        );
    }

    #[test]
    fn coasting_speed_decays_monotonically() {
        let physics = PhysicsConfig::default();
        let start = PodState {
            pos: Vec2::ZERO,
            vel: Vec2::new(-640., 455.),
            angle: 123.,
        };
        let mut last = start.vel;
        for s in coast(start, 50, &physics) {
            assert!(s.vel.len() < last.len());
            assert!(s.vel.x.signum() == start.vel.x.signum());
            assert!(s.vel.y.signum() == start.vel.y.signum());
            last = s.vel;
        }
        assert!(last.len() < 1.);
    }

    #[test]
    fn arriving_requires_momentum() {
        let physics = PhysicsConfig::default();
        let cp = Vec2::new(5000., 5000.);
        let still = PodState {
            pos: Vec2::new(4450., 5000.),
            vel: Vec2::ZERO,
            angle: 0.,
        };
        assert!(!arriving_soon(still, cp, 600., 6, 1., &physics));

        let moving = PodState {
            pos: Vec2::new(3800., 5000.),
            vel: Vec2::new(300., 0.),
            angle: 0.,
        };
        assert!(arriving_soon(moving, cp, 600., 6, 1., &physics));

        let away = PodState {
            vel: Vec2::new(-300., 0.),
            ..moving
        };
        assert!(!arriving_soon(away, cp, 600., 6, 1., &physics));
    }

    #[test]
    fn head_on_collision_in_one_turn() {
        let cfg = RaceConfig::default();
        let a = pod(Vec2::new(0., 0.), Vec2::new(200., 0.), 0.);
        let b = pod(Vec2::new(1300., 0.), Vec2::new(-200., 0.), 180.);

        let c = predict_collision(&a, &b, &cfg);
        assert!((c.time - 1.).abs() < 1e-9);
        assert!((c.probability - 2. / 3.).abs() < 1e-9);
    }

    #[test]
    fn collision_is_symmetric() {
        let cfg = RaceConfig::default();
        let a = pod(Vec2::new(1200., -300.), Vec2::new(350., 90.), 0.);
        let b = pod(Vec2::new(3100., 800.), Vec2::new(-220., -310.), 0.);

        let ab = predict_collision(&a, &b, &cfg);
        let ba = predict_collision(&b, &a, &cfg);
        assert!(!ab.is_never());
        assert!((ab.time - ba.time).abs() < 1e-9);
        assert!((ab.probability - ba.probability).abs() < 1e-9);
    }

    #[test]
    fn degenerate_collisions() {
        let cfg = RaceConfig::default();
        let a = pod(Vec2::new(0., 0.), Vec2::new(100., 100.), 0.);

        let parallel = pod(Vec2::new(5000., 0.), Vec2::new(100., 100.), 0.);
        assert_eq!(predict_collision(&a, &parallel, &cfg), Collision::NEVER);

        let touching = pod(Vec2::new(500., 0.), Vec2::new(100., 100.), 0.);
        assert_eq!(predict_collision(&a, &touching, &cfg), Collision::NOW);

        let miss = pod(Vec2::new(0., 5000.), Vec2::new(1100., 100.), 0.);
        assert!(predict_collision(&a, &miss, &cfg).is_never());

        let leaving = pod(Vec2::new(2000., 0.), Vec2::new(400., 100.), 0.);
        assert!(predict_collision(&a, &leaving, &cfg).is_never());
    }

    #[test]
    fn overlapping_pair_reports_exit_root() {
        let cfg = RaceConfig::default();
        let a = pod(Vec2::ZERO, Vec2::ZERO, 0.);
        let b = pod(Vec2::new(850., 0.), Vec2::new(-400., 0.), 180.);

        // Effective radius 900 at relative speed 400: already inside it,
        // so the first positive root is where b leaves the far side.
        let c = predict_collision(&a, &b, &cfg);
        assert!((c.time - 4.375).abs() < 1e-9, "got {}", c.time);
        assert_eq!(c.probability, 0.);
        assert_eq!(predict_collision(&b, &a, &cfg), c);

        let parting = pod(Vec2::new(850., 0.), Vec2::new(400., 0.), 0.);
        let c = predict_collision(&a, &parting, &cfg);
        assert!((c.time - 0.125).abs() < 1e-9, "got {}", c.time);
    }

    #[test]
    fn far_collisions_have_zero_probability() {
        let cfg = RaceConfig::default();
        let a = pod(Vec2::ZERO, Vec2::new(100., 0.), 0.);
        let b = pod(Vec2::new(10000., 0.), Vec2::ZERO, 0.);
        let c = predict_collision(&a, &b, &cfg);
        assert!(c.time > 3.);
        assert_eq!(c.probability, 0.);
    }

    #[test]
    fn race_path_heads_for_checkpoint() {
        let cfg = RaceConfig::default();
        let track = Track::new(
            3,
            &[
                Vec2::new(1000., 1000.),
                Vec2::new(9000., 1000.),
                Vec2::new(5000., 7000.),
            ],
            600.,
        )
        .unwrap();
        let mut runner = pod(Vec2::new(1000., 1000.), Vec2::ZERO, 0.);
        runner.next_checkpoint = 1;

        let path = predict_race_path(&runner, &track, 6, &cfg);
        assert_eq!(path.len(), 6);
        for w in path.windows(2) {
            assert!(w[1].pos.x > w[0].pos.x);
        }
    }

    #[test]
    fn intercept_prefers_reachable_point() {
        let cfg = RaceConfig::default();
        let hunter = pod(Vec2::new(5000., 3000.), Vec2::ZERO, 90.);
        // Target crossing below the hunter, left to right.
        let path: Vec<PodState> = (1..=6)
            .map(|t| PodState {
                pos: Vec2::new(3500. + 500. * t as f64, 4000.),
                vel: Vec2::new(500., 0.),
                angle: 0.,
            })
            .collect();

        let best = intercept_point(&hunter, &path, &cfg).unwrap();
        assert!(best.turn >= 2 && best.turn <= 6, "turn {}", best.turn);
        assert!(intercept_point(&hunter, &[], &cfg).is_none());
    }
}
