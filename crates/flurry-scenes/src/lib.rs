//! Animated scenes for the flurry terminal backdrop.
//!
//! Each scene keeps its own explicit state and draws through the
//! [`flurry_core::Surface`] trait. [`SceneState`] drives the active scene at a
//! fixed step rate and presents it with a half-block software [`Raster`].

mod raster;
pub mod scenes;
mod state;

pub use raster::Raster;
pub use scenes::Scene;
pub use state::{MAX_CATCHUP_STEPS, SceneState};
