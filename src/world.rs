use std::fmt;

use rand::Rng;
use tracing::info;

use super::command::Action;
use super::config::{PhysicsConfig, RaceConfig};
use super::error::InputError;
use super::vec2::{normalize_angle, Vec2};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Checkpoint {
    pub index: usize,
    pub pos: Vec2,
}

/// Cyclic checkpoint sequence. Read once at start, immutable afterwards.
#[derive(Debug, Clone)]
pub struct Track {
    pub laps: u32,
    pub radius: f64,
    checkpoints: Vec<Checkpoint>,
}

impl Track {
    /// Far above any real map; guards allocations sized from input.
    pub const MAX_CHECKPOINTS: usize = 64;

    pub fn new(laps: u32, points: &[Vec2], radius: f64) -> Result<Self, InputError> {
        if points.is_empty() {
            return Err(InputError::Track("no checkpoints".into()));
        }
        if points.len() > Self::MAX_CHECKPOINTS {
            return Err(InputError::Track(format!("{} checkpoints", points.len())));
        }
        if laps == 0 {
            return Err(InputError::Track("lap count must be positive".into()));
        }

        let checkpoints = points
            .iter()
            .enumerate()
            .map(|(index, &pos)| Checkpoint { index, pos })
            .collect();

        Ok(Track {
            laps,
            radius,
            checkpoints,
        })
    }

    /// Random layout in the style of the game's maps: 3 to 8 checkpoints, kept
    /// away from the walls and from each other.
    pub fn random<R: Rng>(rng: &mut R, laps: u32, physics: &PhysicsConfig) -> Self {
        let count = rng.gen_range(3..=8);
        let margin = physics.checkpoint_radius * 2.;
        let min_gap = physics.checkpoint_radius * 4.;
        let mut points: Vec<Vec2> = Vec::with_capacity(count);

        // Rejection sampling; a crowded map is accepted after enough tries.
        let mut attempts = 0;
        while points.len() < count {
            let p = Vec2::new(
                rng.gen_range(margin..physics.map_width - margin).round(),
                rng.gen_range(margin..physics.map_height - margin).round(),
            );
            attempts += 1;
            if attempts > 10_000 || points.iter().all(|q| q.dist(p) >= min_gap) {
                points.push(p);
            }
        }

        let checkpoints = points
            .into_iter()
            .enumerate()
            .map(|(index, pos)| Checkpoint { index, pos })
            .collect();

        Track {
            laps: laps.max(1),
            radius: physics.checkpoint_radius,
            checkpoints,
        }
    }

    pub fn len(&self) -> usize {
        self.checkpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checkpoints.is_empty()
    }

    /// Checkpoint by index; out-of-range indices wrap.
    pub fn get(&self, index: usize) -> &Checkpoint {
        &self.checkpoints[index % self.checkpoints.len()]
    }

    pub fn next_index(&self, index: usize) -> usize {
        (index + 1) % self.checkpoints.len()
    }

    /// Checkpoint passes that finish the race, the closing return to 0 included.
    pub fn total_checkpoints(&self) -> usize {
        self.len() * self.laps as usize
    }

    pub fn checkpoints(&self) -> &[Checkpoint] {
        &self.checkpoints
    }

    /// Index of the checkpoint that ends the longest leg.
    pub fn longest_leg(&self) -> usize {
        let mut best = 0;
        let mut best_len = f64::MIN;
        for cp in &self.checkpoints {
            let to = self.get(self.next_index(cp.index));
            let len = cp.pos.dist(to.pos);
            if len > best_len {
                best_len = len;
                best = to.index;
            }
        }
        best
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Racer,
    Blocker,
    Opponent,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Racer => write!(f, "racer"),
            Role::Blocker => write!(f, "blocker"),
            Role::Opponent => write!(f, "opponent"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Cruising,
    Approaching,
    Shielding,
    Boosting,
}

/// One turn's raw kinematic input for a pod.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PodSnapshot {
    pub pos: Vec2,
    pub vel: Vec2,
    pub angle: f64,
    pub next_checkpoint: usize,
}

#[derive(Debug, Clone)]
pub struct Pod {
    pub id: usize,
    pub role: Role,
    pub pos: Vec2,
    pub vel: Vec2,
    /// Degrees in [0, 360).
    pub angle: f64,
    pub next_checkpoint: usize,
    pub laps: u32,
    pub shield_cooldown: u8,
    pub boost_available: bool,
    pub phase: Phase,
}

impl Pod {
    pub fn new(id: usize, role: Role) -> Self {
        Pod {
            id,
            role,
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            angle: 0.,
            next_checkpoint: 0,
            laps: 0,
            shield_cooldown: 0,
            boost_available: true,
            phase: Phase::Cruising,
        }
    }

    /// Overwrite kinematics from the snapshot. Returns true when the pod
    /// just wrapped from the last checkpoint back to index 0.
    pub fn observe(&mut self, snapshot: PodSnapshot) -> bool {
        let wrapped = snapshot.next_checkpoint < self.next_checkpoint;
        if wrapped {
            self.laps += 1;
        }

        self.pos = snapshot.pos;
        self.vel = snapshot.vel;
        self.angle = normalize_angle(snapshot.angle);
        self.next_checkpoint = snapshot.next_checkpoint;
        wrapped
    }

    pub fn speed(&self) -> f64 {
        self.vel.len()
    }

    /// Checkpoints reached since the start line. Pods start on checkpoint 0
    /// heading for 1, and a lap is counted on the wrap back to 0.
    pub fn checkpoints_passed(&self, track: &Track) -> usize {
        (self.laps as usize * track.len() + self.next_checkpoint).saturating_sub(1)
    }

    pub fn can_shield(&self) -> bool {
        self.shield_cooldown == 0
    }

    /// Post-emission bookkeeping for the action this pod just sent.
    pub fn commit(&mut self, action: Action, shield_cooldown: u8, approaching: bool) {
        match action {
            Action::Shield => self.shield_cooldown = shield_cooldown,
            _ => self.shield_cooldown = self.shield_cooldown.saturating_sub(1),
        }

        if action == Action::Boost {
            self.boost_available = false;
        }

        self.phase = match action {
            Action::Boost => Phase::Boosting,
            _ if self.shield_cooldown > 0 => Phase::Shielding,
            _ if approaching => Phase::Approaching,
            _ => Phase::Cruising,
        };
    }
}

/// Everything known about the race at the current turn.
#[derive(Debug, Clone)]
pub struct World {
    pub track: Track,
    pub mine: Vec<Pod>,
    pub opponents: Vec<Pod>,
    pub turn: u32,
}

impl World {
    /// First controlled pod races, the others block.
    pub fn new(track: Track, cfg: &RaceConfig) -> Self {
        let count = cfg.physics.pods_per_player;
        let mine = (0..count)
            .map(|i| Pod::new(i, if i == 0 { Role::Racer } else { Role::Blocker }))
            .collect();
        let opponents = (0..count).map(|i| Pod::new(i, Role::Opponent)).collect();

        World {
            track,
            mine,
            opponents,
            turn: 0,
        }
    }

    pub fn observe(&mut self, mine: &[PodSnapshot], opponents: &[PodSnapshot]) {
        self.turn += 1;
        let turn = self.turn;
        let laps = self.track.laps;

        for (pod, snapshot) in self.mine.iter_mut().zip(mine) {
            if pod.observe(*snapshot) {
                info!(turn, pod = pod.id, role = %pod.role, lap = pod.laps, laps, "lap completed");
            }
        }
        for (pod, snapshot) in self.opponents.iter_mut().zip(opponents) {
            if pod.observe(*snapshot) {
                info!(turn, pod = pod.id, role = %pod.role, lap = pod.laps, laps, "lap completed");
            }
        }
    }

    /// Every pod other than `mine[index]`.
    pub fn others(&self, index: usize) -> impl Iterator<Item = &Pod> {
        self.mine
            .iter()
            .filter(move |p| p.id != index)
            .chain(self.opponents.iter())
    }
}
