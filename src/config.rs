use std::{env, fs, path::Path};

use serde::{Deserialize, Serialize};

use super::error::ConfigError;

/// Env var naming a JSON file with overrides for [`RaceConfig`].
pub const CONFIG_ENV: &str = "PODRACER_CONFIG";

/// Fixed rules of the race simulator.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    pub friction: f64,
    /// Degrees a pod may rotate per turn.
    pub max_turn: f64,
    pub checkpoint_radius: f64,
    pub pod_radius: f64,
    pub max_thrust: i32,
    pub boost_thrust: f64,
    pub shield_mass: f64,
    pub shield_cooldown: u8,
    pub min_impulse: f64,
    pub map_width: f64,
    pub map_height: f64,
    pub pods_per_player: usize,
    /// Turns without reaching a checkpoint before a pod is eliminated.
    pub checkpoint_timeout: u32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            friction: 0.85,
            max_turn: 18.,
            checkpoint_radius: 600.,
            pod_radius: 400.,
            max_thrust: 100,
            boost_thrust: 650.,
            shield_mass: 10.,
            shield_cooldown: 3,
            min_impulse: 120.,
            map_width: 16000.,
            map_height: 9000.,
            pods_per_player: 2,
            checkpoint_timeout: 100,
        }
    }
}

impl PhysicsConfig {
    pub fn map_diagonal(&self) -> f64 {
        self.map_width.hypot(self.map_height)
    }
}

/// Normal steering: thrust by heading error and distance.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct ThrustConfig {
    /// Heading errors above this coast with zero thrust.
    pub stop_angle: f64,
    pub slow_angle: f64,
    pub slow_thrust: i32,
    pub brake_distance: f64,
    pub brake_speed: f64,
    pub brake_thrust: i32,
    /// Turns of coasting used for the "arriving soon" check.
    pub arrival_horizon: usize,
    /// Speeds below this never count as arriving.
    pub arrival_min_speed: f64,
    pub drift_factor: f64,
    pub drift_min_speed: f64,
    /// Speed per checkpoint radius of look-ahead past the aim point.
    pub lookahead_speed: f64,
    /// Cap on the look-ahead, in checkpoint radii.
    pub lookahead_max: f64,
    /// A corner sharper than this, entered closer than `hairpin_distance`,
    /// is taken with the hairpin thrust curve.
    pub hairpin_angle: f64,
    pub hairpin_distance: f64,
    pub hairpin_stop_angle: f64,
    pub hairpin_slow_angle: f64,
    pub hairpin_slow_thrust: i32,
}

impl Default for ThrustConfig {
    fn default() -> Self {
        Self {
            stop_angle: 90.,
            slow_angle: 45.,
            slow_thrust: 50,
            brake_distance: 1000.,
            brake_speed: 200.,
            brake_thrust: 70,
            arrival_horizon: 6,
            arrival_min_speed: 1.,
            drift_factor: 3.,
            drift_min_speed: 100.,
            lookahead_speed: 100.,
            lookahead_max: 3.,
            hairpin_angle: 90.,
            hairpin_distance: 2000.,
            hairpin_stop_angle: 70.,
            hairpin_slow_angle: 40.,
            hairpin_slow_thrust: 30,
        }
    }
}

impl ThrustConfig {
    pub const MAX_ARRIVAL_HORIZON: usize = 10;

    pub fn arrival_horizon(&self) -> usize {
        self.arrival_horizon.clamp(1, Self::MAX_ARRIVAL_HORIZON)
    }
}

/// Collision-time estimation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct CollisionConfig {
    /// Centre distance at which two pods touch.
    pub radius: f64,
    /// Extra radius per unit of relative speed, capped at one pod radius.
    pub speed_margin: f64,
    /// Probability reaches zero at this many turns.
    pub probability_turns: f64,
}

impl Default for CollisionConfig {
    fn default() -> Self {
        Self {
            radius: 800.,
            speed_margin: 0.25,
            probability_turns: 3.,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct ShieldConfig {
    pub horizon: f64,
    pub min_probability: f64,
    pub min_relative_speed: f64,
    /// Shield against own pods too.
    pub include_allies: bool,
}

impl Default for ShieldConfig {
    fn default() -> Self {
        Self {
            horizon: 2.,
            min_probability: 0.5,
            min_relative_speed: 300.,
            include_allies: true,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct BoostConfig {
    pub max_angle: f64,
    pub min_distance: f64,
    /// Only boost toward the checkpoint ending the longest leg.
    pub long_leg_only: bool,
    pub intercept_min_distance: f64,
    /// The racer holds its boost through this many opening turns.
    pub min_turn: u32,
}

impl Default for BoostConfig {
    fn default() -> Self {
        Self {
            max_angle: 10.,
            min_distance: 4000.,
            long_leg_only: false,
            intercept_min_distance: 3000.,
            min_turn: 3,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetingConfig {
    pub sticky_frames: u32,
    pub switch_margin: f64,
}

impl Default for TargetingConfig {
    fn default() -> Self {
        Self {
            sticky_frames: 10,
            switch_margin: 0.05,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct InterceptConfig {
    pub horizon: usize,
    pub time_weight: f64,
    pub angle_weight: f64,
    /// Lower bound on the pursuer's assumed speed.
    pub min_speed: f64,
    /// Full thrust once this close and roughly aligned.
    pub ram_distance: f64,
    pub ram_angle: f64,
}

impl Default for InterceptConfig {
    fn default() -> Self {
        Self {
            horizon: 6,
            time_weight: 0.7,
            angle_weight: 0.3,
            min_speed: 100.,
            ram_distance: 1200.,
            ram_angle: 30.,
        }
    }
}

impl InterceptConfig {
    pub const MAX_HORIZON: usize = 8;

    pub fn horizon(&self) -> usize {
        self.horizon.clamp(1, Self::MAX_HORIZON)
    }
}

/// Blocker sidestep when about to hit the racer.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct AvoidanceConfig {
    pub horizon: f64,
    pub min_probability: f64,
    pub range: f64,
    pub sidestep: f64,
}

impl Default for AvoidanceConfig {
    fn default() -> Self {
        Self {
            horizon: 3.,
            min_probability: 0.5,
            range: 2000.,
            sidestep: 1000.,
        }
    }
}

/// Tuning for one process. Built once at startup and shared by reference.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RaceConfig {
    pub physics: PhysicsConfig,
    pub thrust: ThrustConfig,
    pub collision: CollisionConfig,
    pub shield: ShieldConfig,
    pub boost: BoostConfig,
    pub targeting: TargetingConfig,
    pub intercept: InterceptConfig,
    pub avoidance: AvoidanceConfig,
    /// Append a short reason after each command.
    pub annotate: bool,
}

impl RaceConfig {
    /// Defaults, overridden by the file in `PODRACER_CONFIG` when set.
    pub fn load() -> Result<Self, ConfigError> {
        match env::var(CONFIG_ENV) {
            Ok(path) if !path.is_empty() => Self::from_file(Path::new(&path)),
            _ => Ok(Self::default()),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let data = fs::read(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&data)
    }

    pub fn from_json(data: &[u8]) -> Result<Self, ConfigError> {
        Ok(serde_json::from_slice(data)?)
    }
}
