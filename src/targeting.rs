use std::cmp::Ordering;

use tracing::debug;

use super::config::RaceConfig;
use super::simulation::{arriving_soon, PodState};
use super::vec2::{angle_diff, Vec2};
use super::world::{Pod, Track};

/// Where a pod should steer to keep racing its own checkpoints.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aim {
    /// Checkpoint being aimed at; the one after the current when arriving.
    pub checkpoint: usize,
    pub point: Vec2,
    /// Momentum alone will carry the pod through its current checkpoint.
    pub arriving: bool,
    /// Distance to the current (not the aimed) checkpoint.
    pub distance: f64,
    /// The current checkpoint finishes the race; nothing lies beyond it.
    pub final_leg: bool,
}

pub fn aim_waypoint(pod: &Pod, track: &Track, cfg: &RaceConfig) -> Aim {
    let current = track.get(pod.next_checkpoint);
    let distance = pod.pos.dist(current.pos);
    let arriving = arriving_soon(
        PodState::of(pod),
        current.pos,
        track.radius,
        cfg.thrust.arrival_horizon(),
        cfg.thrust.arrival_min_speed,
        &cfg.physics,
    );
    let final_leg = on_final_leg(pod, track);

    let checkpoint = if arriving && !final_leg {
        track.next_index(current.index)
    } else {
        current.index
    };

    Aim {
        checkpoint,
        point: track.get(checkpoint).pos,
        arriving,
        distance,
        final_leg,
    }
}

/// The pod has started the last lap.
pub fn on_final_lap(pod: &Pod, track: &Track) -> bool {
    let lap_start = track.len() * (track.laps as usize).saturating_sub(1);
    pod.checkpoints_passed(track) >= lap_start
}

/// Only the finishing checkpoint is left.
pub fn on_final_leg(pod: &Pod, track: &Track) -> bool {
    pod.checkpoints_passed(track) + 1 >= track.total_checkpoints()
}

/// The pod is closing on a checkpoint whose exit turns back by more than
/// `hairpin_angle` from the approach.
pub fn is_hairpin(pod: &Pod, track: &Track, cfg: &RaceConfig) -> bool {
    let current = track.get(pod.next_checkpoint);
    let next = track.get(track.next_index(current.index));
    let approach = current.pos - pod.pos;
    let exit = next.pos - current.pos;

    if approach.len() < 1e-3 || exit.len() < 1e-3 || approach.len() >= cfg.thrust.hairpin_distance {
        return false;
    }
    angle_diff(approach.angle_deg(), exit.angle_deg()).abs() > cfg.thrust.hairpin_angle
}

/// 1 at the checkpoint edge, falling to 0 at a map diagonal away.
fn closeness(pod: &Pod, track: &Track, cfg: &RaceConfig) -> f64 {
    let dist = pod.pos.dist(track.get(pod.next_checkpoint).pos);
    let span = (cfg.physics.map_diagonal() - track.radius).max(1.);
    1. - ((dist - track.radius) / span).clamp(0., 1.)
}

/// Fraction of the whole race completed, in [0, 1].
pub fn race_progress(pod: &Pod, track: &Track, cfg: &RaceConfig) -> f64 {
    let count = track.len() as f64;
    let total = count * track.laps as f64;
    let done = pod.laps as f64 * count + pod.next_checkpoint as f64 + closeness(pod, track, cfg);
    (done / total).clamp(0., 1.)
}

/// Laps, then next checkpoint, then proximity to it.
pub fn compare_progress(a: &Pod, b: &Pod, track: &Track) -> Ordering {
    a.laps
        .cmp(&b.laps)
        .then(a.next_checkpoint.cmp(&b.next_checkpoint))
        .then_with(|| {
            let da = a.pos.dist(track.get(a.next_checkpoint).pos);
            let db = b.pos.dist(track.get(b.next_checkpoint).pos);
            db.total_cmp(&da)
        })
}

/// Index of the most advanced pod.
pub fn leader(pods: &[Pod], track: &Track) -> Option<usize> {
    pods.iter()
        .enumerate()
        .max_by(|(_, a), (_, b)| compare_progress(a, b, track))
        .map(|(i, _)| i)
}

/// Opponent choice for an interceptor, biased toward the previous pick.
#[derive(Debug, Default)]
pub struct Tracker {
    target: Option<usize>,
    frames: u32,
}

impl Tracker {
    pub fn new() -> Self {
        Tracker::default()
    }

    pub fn target(&self) -> Option<usize> {
        self.target
    }

    /// Consecutive turns the current target has been chosen.
    pub fn frames(&self) -> u32 {
        self.frames
    }

    pub fn select(&mut self, opponents: &[Pod], track: &Track, cfg: &RaceConfig) -> Option<usize> {
        let Some(lead) = leader(opponents, track) else {
            self.target = None;
            self.frames = 0;
            return None;
        };

        let mut chosen = lead;
        if let Some(current) = self.target.filter(|&i| i < opponents.len()) {
            if current != lead && self.frames > cfg.targeting.sticky_frames {
                let gap = race_progress(&opponents[lead], track, cfg)
                    - race_progress(&opponents[current], track, cfg);
                if gap <= cfg.targeting.switch_margin {
                    chosen = current;
                }
            }
        }

        if self.target == Some(chosen) {
            self.frames += 1;
        } else {
            debug!(from = ?self.target, to = chosen, "interceptor switches target");
            self.target = Some(chosen);
            self.frames = 1;
        }

        Some(chosen)
    }
}
