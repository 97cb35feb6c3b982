//! Data-driven scene parameters.
//!
//! Defaults are tuned for the half-block raster, where a typical terminal
//! gives a canvas of roughly 160x90 pixels.

use serde::{Deserialize, Serialize};

/// Hard cap on fractal recursion regardless of configuration.
pub const MAX_FRACTAL_DEPTH: u32 = 14;

/// Upper bound for any particle count.
pub const MAX_PARTICLES: usize = 2000;

/// Blob field parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlobTuning {
    pub count: usize,
    /// Velocity multiplier applied every frame.
    pub friction: f32,
    /// Opacity of the backdrop wash that fades old frames.
    pub fade_alpha: f32,
    /// Pointer attraction reach in normalized units.
    pub attraction_radius: f32,
    /// Peak force of a click gust.
    pub gust_strength: f32,
}

impl Default for BlobTuning {
    fn default() -> Self {
        Self {
            count: 6,
            friction: 0.97,
            fade_alpha: 0.08,
            attraction_radius: 0.4,
            gust_strength: 0.08,
        }
    }
}

impl BlobTuning {
    pub fn clamped(mut self) -> Self {
        self.count = self.count.clamp(1, MAX_PARTICLES);
        self.friction = self.friction.clamp(0.0, 1.0);
        self.fade_alpha = self.fade_alpha.clamp(0.001, 1.0);
        self.attraction_radius = self.attraction_radius.clamp(0.0, 2.0);
        self.gust_strength = self.gust_strength.max(0.0);
        self
    }
}

/// Fractal tree parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeTuning {
    pub max_depth: u32,
    /// Angle between a branch and each child, in degrees.
    pub spread_deg: f32,
    /// Random angle variation per branch, in degrees.
    pub jitter_deg: f32,
    /// Child length as a fraction of its parent.
    pub decay: f32,
    /// Branches shorter than this many pixels are not generated.
    pub min_length: f32,
    /// Trunk length as a fraction of the canvas height.
    pub trunk_fraction: f32,
    pub growth_frames: u32,
    pub hold_frames: u32,
}

impl Default for TreeTuning {
    fn default() -> Self {
        Self {
            max_depth: 9,
            spread_deg: 24.0,
            jitter_deg: 6.0,
            decay: 0.74,
            min_length: 1.5,
            trunk_fraction: 0.28,
            growth_frames: 240,
            hold_frames: 120,
        }
    }
}

impl TreeTuning {
    pub fn clamped(mut self) -> Self {
        self.max_depth = self.max_depth.clamp(1, MAX_FRACTAL_DEPTH);
        self.decay = self.decay.clamp(0.1, 0.95);
        self.min_length = self.min_length.max(0.25);
        self.trunk_fraction = self.trunk_fraction.clamp(0.05, 0.6);
        self.growth_frames = self.growth_frames.max(1);
        self
    }
}

/// Fractal spiral parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpiralTuning {
    pub arms: u32,
    /// Extra rotation added at every level, in degrees.
    pub twist_deg: f32,
    pub max_depth: u32,
    /// Angle of side shoots relative to the arm, in degrees.
    pub spread_deg: f32,
    pub jitter_deg: f32,
    pub decay: f32,
    pub min_length: f32,
    /// First segment length as a fraction of the shorter canvas side.
    pub arm_fraction: f32,
    pub growth_frames: u32,
    pub hold_frames: u32,
}

impl Default for SpiralTuning {
    fn default() -> Self {
        Self {
            arms: 5,
            twist_deg: 18.0,
            max_depth: 12,
            spread_deg: 40.0,
            jitter_deg: 4.0,
            decay: 0.86,
            min_length: 1.0,
            arm_fraction: 0.12,
            growth_frames: 300,
            hold_frames: 120,
        }
    }
}

impl SpiralTuning {
    pub fn clamped(mut self) -> Self {
        self.arms = self.arms.clamp(1, 16);
        self.max_depth = self.max_depth.clamp(1, MAX_FRACTAL_DEPTH);
        self.decay = self.decay.clamp(0.1, 0.95);
        self.min_length = self.min_length.max(0.25);
        self.arm_fraction = self.arm_fraction.clamp(0.02, 0.5);
        self.growth_frames = self.growth_frames.max(1);
        self
    }
}

/// Sled scene parameters, in pixels and frames.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SledTuning {
    /// Downward acceleration per frame while airborne.
    pub gravity: f32,
    /// Jump charge gained per frame while the input is held.
    pub charge_rate: f32,
    /// Charge cap; also the largest launch speed.
    pub max_charge: f32,
    /// World pixels scrolled per frame.
    pub scroll_speed: f32,
    /// Height of the rider above the snow surface.
    pub rider_offset: f32,
    /// Fraction of the remaining slope angle applied per frame.
    pub slope_easing: f32,
    pub snow_count: usize,
    /// Spray particles spawned on landing.
    pub spray_burst: usize,
    /// Horizontal distance between terrain samples.
    pub terrain_step: f32,
}

impl Default for SledTuning {
    fn default() -> Self {
        Self {
            gravity: 0.22,
            charge_rate: 0.12,
            max_charge: 3.2,
            scroll_speed: 1.2,
            rider_offset: 2.0,
            slope_easing: 0.15,
            snow_count: 90,
            spray_burst: 15,
            terrain_step: 2.0,
        }
    }
}

impl SledTuning {
    pub fn clamped(mut self) -> Self {
        self.gravity = self.gravity.max(0.001);
        self.charge_rate = self.charge_rate.max(0.001);
        self.max_charge = self.max_charge.max(0.001);
        self.scroll_speed = self.scroll_speed.max(0.0);
        self.rider_offset = self.rider_offset.max(0.0);
        self.slope_easing = self.slope_easing.clamp(0.0, 1.0);
        self.snow_count = self.snow_count.min(MAX_PARTICLES);
        self.spray_burst = self.spray_burst.min(MAX_PARTICLES);
        self.terrain_step = self.terrain_step.max(0.5);
        self
    }
}

/// Parameters for every scene.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tuning {
    pub blobs: BlobTuning,
    pub tree: TreeTuning,
    pub spiral: SpiralTuning,
    pub sled: SledTuning,
}

impl Tuning {
    pub fn clamped(self) -> Self {
        Self {
            blobs: self.blobs.clamped(),
            tree: self.tree.clamped(),
            spiral: self.spiral.clamped(),
            sled: self.sled.clamped(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_section_keeps_defaults() {
        let sled: SledTuning = toml::from_str("gravity = 0.5").unwrap();
        assert_eq!(sled.gravity, 0.5);
        assert_eq!(sled.spray_burst, SledTuning::default().spray_burst);

        let spiral: SpiralTuning = toml::from_str("arms = 3").unwrap();
        assert_eq!(spiral.arms, 3);
        assert_eq!(spiral.twist_deg, SpiralTuning::default().twist_deg);
    }

    #[test]
    fn test_clamped_caps_depth_and_counts() {
        let tuning = Tuning {
            tree: TreeTuning {
                max_depth: 40,
                ..Default::default()
            },
            sled: SledTuning {
                gravity: -1.0,
                snow_count: 1_000_000,
                ..Default::default()
            },
            ..Default::default()
        }
        .clamped();
        assert_eq!(tuning.tree.max_depth, MAX_FRACTAL_DEPTH);
        assert!(tuning.sled.gravity > 0.0);
        assert_eq!(tuning.sled.snow_count, MAX_PARTICLES);
    }
}
