pub mod command;
pub mod config;
pub mod error;
pub mod input;
pub mod logging;
pub mod referee;
pub mod simulation;
pub mod strategy;
pub mod targeting;
pub mod vec2;
pub mod world;

pub use command::*;
pub use config::*;
pub use error::*;
pub use input::*;
pub use logging::*;
pub use referee::*;
pub use simulation::*;
pub use strategy::*;
pub use targeting::*;
pub use vec2::*;
pub use world::*;
