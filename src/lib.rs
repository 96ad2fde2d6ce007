//! Fractal tree growth engine with a terminal front end.
//!
//! - [`node`]: recursive nodes and the depth-targeted broadcast protocol.
//! - [`controller`]: the level-by-level growth policy.
//! - [`geometry`]: segments and leaves.
//! - [`host`]: drawing and randomness traits the engine talks to.
//! - [`canvas`], [`terminal`], [`grow`]: braille rendering and the tick loop.

pub mod canvas;
pub mod config;
pub mod controller;
pub mod error;
pub mod geometry;
pub mod grow;
pub mod help;
pub mod host;
pub mod node;
pub mod settings;
pub mod terminal;

pub use config::{ColorScheme, GrowConfig, TreeOverrides, TreeSpec};
pub use controller::{Advance, GrowthController, Phase};
pub use error::{Error, ParamError, Result};
pub use node::{Command, DepthTarget, Node, Reach};
