//! Core types shared by every game: sides, capture history, errors, RNG and
//! configuration.
//!
//! Nothing in this module knows the rules of a particular game.

pub mod player;
pub mod rng;
pub mod config;
pub mod history;
pub mod error;

pub use player::{Side, SideMap};
pub use rng::GameRng;
pub use config::{DraughtsConfig, GameConfig, MillConfig, SowingConfig, SowingStyle, Variant};
pub use history::{captured_by, CaptureEvent, CaptureHistory};
pub use error::MoveError;
