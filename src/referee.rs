//! Local stand-in for the game server: the race rules plus a driver that
//! talks to two [`Strategy`] instances through the text protocol.

use tracing::{debug, info, warn};

use super::command::{Action, Command};
use super::config::{PhysicsConfig, RaceConfig};
use super::error::MatchError;
use super::input::{read_track, read_turn, TokenReader};
use super::simulation::turn_toward;
use super::strategy::Strategy;
use super::vec2::Vec2;
use super::world::{Track, World};

pub const PLAYERS: usize = 2;

/// Gap between neighbouring pods on the starting line.
const START_SPACING: f64 = 1100.;

#[derive(Debug, Clone)]
pub struct RacePod {
    pub player: usize,
    pub pos: Vec2,
    pub vel: Vec2,
    pub angle: f64,
    pub next_checkpoint: usize,
    /// Checkpoints passed since the start.
    pub passed: usize,
    /// Turns left without thrust after a shield.
    pub shield: u8,
    /// Shield was raised on the last turn.
    pub shielded: bool,
    pub boost_used: bool,
}

#[derive(Debug, Clone)]
pub struct Race {
    track: Track,
    physics: PhysicsConfig,
    pods: Vec<RacePod>,
    commands: Vec<Option<Command>>,
    /// Turns since each player last passed a checkpoint.
    idle: [u32; PLAYERS],
    turn: u32,
    winner: Option<usize>,
}

fn segment_distance(from: Vec2, to: Vec2, point: Vec2) -> f64 {
    let seg = to - from;
    let len2 = seg.len2();
    if len2 == 0. {
        return from.dist(point);
    }
    let t = (point - from).dot(seg) / len2;
    from.lerp(to, t).dist(point)
}

impl Race {
    /// Pods line up across checkpoint 0, facing checkpoint 1.
    pub fn new(track: Track, physics: &PhysicsConfig) -> Self {
        let start = track.get(0).pos;
        let first = track.get(1).pos;
        let mut dir = (first - start).norm();
        if dir == Vec2::ZERO {
            dir = Vec2::new(1., 0.);
        }
        let across = dir.perp();

        let total = physics.pods_per_player * PLAYERS;
        let pods = (0..total)
            .map(|slot| {
                let offset = (slot as f64 - (total - 1) as f64 / 2.) * START_SPACING;
                let pos = (start + across * offset).round();
                RacePod {
                    player: slot % PLAYERS,
                    pos,
                    vel: Vec2::ZERO,
                    angle: (first - pos).angle_deg(),
                    next_checkpoint: track.next_index(0),
                    passed: 0,
                    shield: 0,
                    shielded: false,
                    boost_used: false,
                }
            })
            .collect();

        Race {
            track,
            physics: *physics,
            pods,
            commands: vec![None; total],
            idle: [0; PLAYERS],
            turn: 0,
            winner: None,
        }
    }

    pub fn track(&self) -> &Track {
        &self.track
    }

    pub fn pods(&self) -> &[RacePod] {
        &self.pods
    }

    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn winner(&self) -> Option<usize> {
        self.winner
    }

    pub fn is_over(&self) -> bool {
        self.winner.is_some()
    }

    fn slots(&self, player: usize) -> impl Iterator<Item = usize> + '_ {
        (0..self.pods.len()).filter(move |&i| self.pods[i].player == player)
    }

    /// Initialization block of the protocol.
    pub fn header(&self) -> String {
        let mut out = format!("{}\n{}\n", self.track.laps, self.track.len());
        for cp in self.track.checkpoints() {
            out += &format!("{} {}\n", cp.pos.x as i64, cp.pos.y as i64);
        }
        out
    }

    /// One turn of input as `player` sees it: own pods first.
    pub fn frame(&self, player: usize) -> String {
        let other = (player + 1) % PLAYERS;
        let mut out = String::new();
        for i in self.slots(player).chain(self.slots(other)) {
            let pod = &self.pods[i];
            out += &format!(
                "{} {} {} {} {} {}\n",
                pod.pos.x as i64,
                pod.pos.y as i64,
                pod.vel.x as i64,
                pod.vel.y as i64,
                pod.angle.round() as i64 % 360,
                pod.next_checkpoint
            );
        }
        out
    }

    /// Commands for `player`'s pods, in the order they appear in its frame.
    pub fn apply(&mut self, player: usize, commands: &[Command]) {
        let slots: Vec<usize> = self.slots(player).collect();
        for (slot, command) in slots.into_iter().zip(commands) {
            self.commands[slot] = Some(command.clone());
        }
    }

    pub fn step(&mut self) {
        if self.is_over() {
            return;
        }

        let physics = self.physics;
        let first_turn = self.turn == 0;
        let mut masses = vec![1.; self.pods.len()];

        for (i, pod) in self.pods.iter_mut().enumerate() {
            pod.shielded = false;
            let Some(command) = self.commands[i].take() else {
                continue;
            };

            let to = command.target - pod.pos;
            if to.len() > 0. {
                let wanted = to.angle_deg();
                pod.angle = if first_turn {
                    wanted
                } else {
                    turn_toward(pod.angle, wanted, physics.max_turn)
                };
            }

            let thrust = match command.action {
                Action::Shield => {
                    pod.shield = physics.shield_cooldown;
                    pod.shielded = true;
                    masses[i] = physics.shield_mass;
                    0.
                }
                _ if pod.shield > 0 => {
                    pod.shield -= 1;
                    0.
                }
                Action::Boost if !pod.boost_used => {
                    pod.boost_used = true;
                    physics.boost_thrust
                }
                Action::Boost => physics.max_thrust as f64,
                Action::Thrust(t) => t as f64,
            };
            pod.vel += Vec2::from_angle(pod.angle) * thrust;
        }

        let starts: Vec<Vec2> = self.pods.iter().map(|p| p.pos).collect();
        for pod in &mut self.pods {
            pod.pos += pod.vel;
        }
        self.collide(&masses);

        for pod in &mut self.pods {
            pod.vel = (pod.vel * physics.friction).trunc();
            pod.pos = pod.pos.round();
        }

        for player in 0..PLAYERS {
            self.idle[player] += 1;
        }
        self.pass_checkpoints(&starts);

        for player in 0..PLAYERS {
            if self.winner.is_none() && self.idle[player] > physics.checkpoint_timeout {
                warn!(turn = self.turn, player, "timed out");
                self.winner = Some((player + 1) % PLAYERS);
            }
        }

        self.turn += 1;
    }

    /// Elastic bounce between touching pods, with a minimum impulse.
    fn collide(&mut self, masses: &[f64]) {
        let min_dist = self.physics.pod_radius * 2.;
        let min_impulse = self.physics.min_impulse;

        for j in 1..self.pods.len() {
            for i in 0..j {
                let (left, right) = self.pods.split_at_mut(j);
                let (a, b) = (&mut left[i], &mut right[0]);

                let normal = a.pos - b.pos;
                let d2 = normal.len2();
                if d2 == 0. || d2 >= min_dist * min_dist {
                    continue;
                }
                let product = normal.dot(a.vel - b.vel);
                if product >= 0. {
                    continue;
                }

                let (m1, m2) = (masses[i], masses[j]);
                let mcoeff = (m1 + m2) / (m1 * m2);
                let mut force = normal * (product / (d2 * mcoeff));
                a.vel = a.vel - force / m1;
                b.vel += force / m2;

                let impulse = force.len();
                if impulse > 0. && impulse < min_impulse {
                    force = force * (min_impulse / impulse);
                }
                a.vel = a.vel - force / m1;
                b.vel += force / m2;
                debug!(turn = self.turn, a = i, b = j, impulse, "pods collide");
            }
        }
    }

    fn pass_checkpoints(&mut self, starts: &[Vec2]) {
        let radius = self.track.radius;
        let finish = self.track.len() * self.track.laps as usize;

        for (pod, &from) in self.pods.iter_mut().zip(starts) {
            let cp = self.track.get(pod.next_checkpoint);
            if segment_distance(from, pod.pos, cp.pos) > radius {
                continue;
            }

            pod.next_checkpoint = self.track.next_index(cp.index);
            pod.passed += 1;
            self.idle[pod.player] = 0;

            if pod.passed >= finish && self.winner.is_none() {
                info!(turn = self.turn, player = pod.player, "race finished");
                self.winner = Some(pod.player);
            }
        }
    }
}

/// One player's view of the race and the bot playing it.
pub struct Side {
    pub world: World,
    pub strategy: Strategy,
}

/// Two strategies racing each other through the text protocol.
pub struct Match {
    race: Race,
    sides: Vec<Side>,
}

impl Match {
    pub fn new(track: Track, configs: [RaceConfig; PLAYERS]) -> Result<Self, MatchError> {
        let race = Race::new(track, &configs[0].physics);
        let header = race.header();

        let mut sides = Vec::with_capacity(PLAYERS);
        for (player, cfg) in configs.into_iter().enumerate() {
            let mut reader = TokenReader::new(header.as_bytes());
            let track = read_track(&mut reader, cfg.physics.checkpoint_radius)
                .map_err(|source| MatchError::Input { player, source })?;
            sides.push(Side {
                world: World::new(track, &cfg),
                strategy: Strategy::new(cfg),
            });
        }

        Ok(Match { race, sides })
    }

    pub fn race(&self) -> &Race {
        &self.race
    }

    pub fn sides(&self) -> &[Side] {
        &self.sides
    }

    /// Plays one turn. Returns `false` once the race has a winner.
    pub fn turn(&mut self) -> Result<bool, MatchError> {
        if self.race.is_over() {
            return Ok(false);
        }

        for (player, side) in self.sides.iter_mut().enumerate() {
            let frame = self.race.frame(player);
            let mut reader = TokenReader::new(frame.as_bytes());
            read_turn(&mut reader, &mut side.world)
                .map_err(|source| MatchError::Input { player, source })?;

            let mut out = Vec::new();
            side.strategy.play(&mut side.world, &mut out)?;

            let commands = String::from_utf8_lossy(&out)
                .lines()
                .map(|line| line.parse::<Command>())
                .collect::<Result<Vec<_>, _>>()
                .map_err(|source| MatchError::Command { player, source })?;

            let expected = side.world.mine.len();
            if commands.len() != expected {
                return Err(MatchError::CommandCount {
                    player,
                    expected,
                    got: commands.len(),
                });
            }
            self.race.apply(player, &commands);
        }

        self.race.step();
        Ok(!self.race.is_over())
    }

    /// Runs until someone wins or `max_turns` pass.
    pub fn play_out(&mut self, max_turns: u32) -> Result<Option<usize>, MatchError> {
        while self.race.turn() < max_turns && self.turn()? {}
        Ok(self.race.winner())
    }
}
