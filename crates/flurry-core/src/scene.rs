//! Scene selection and playback speed.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Which animated scene is shown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SceneKind {
    /// Soft gradient blobs drifting over a fading backdrop.
    Blobs,
    /// Fractal tree growing from the bottom edge.
    Tree,
    /// Fractal spiral curling out from the centre.
    Spiral,
    /// Side-scrolling sled ride over parallax hills.
    #[default]
    Sled,
}

impl SceneKind {
    pub const ALL: [SceneKind; 4] = [
        SceneKind::Blobs,
        SceneKind::Tree,
        SceneKind::Spiral,
        SceneKind::Sled,
    ];

    /// Cycle to the next scene.
    pub fn next(self) -> Self {
        match self {
            SceneKind::Blobs => SceneKind::Tree,
            SceneKind::Tree => SceneKind::Spiral,
            SceneKind::Spiral => SceneKind::Sled,
            SceneKind::Sled => SceneKind::Blobs,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SceneKind::Blobs => "blobs",
            SceneKind::Tree => "tree",
            SceneKind::Spiral => "spiral",
            SceneKind::Sled => "sled",
        }
    }
}

impl fmt::Display for SceneKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SceneKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SceneKind::ALL
            .into_iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown scene '{s}' (expected blobs, tree, spiral or sled)"))
    }
}

/// Playback speed of the simulation clock.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnimationSpeed {
    Slow,
    #[default]
    Medium,
    Fast,
}

impl AnimationSpeed {
    pub const ALL: [AnimationSpeed; 3] = [
        AnimationSpeed::Slow,
        AnimationSpeed::Medium,
        AnimationSpeed::Fast,
    ];

    /// Cycle to the next speed.
    pub fn next(self) -> Self {
        match self {
            AnimationSpeed::Slow => AnimationSpeed::Medium,
            AnimationSpeed::Medium => AnimationSpeed::Fast,
            AnimationSpeed::Fast => AnimationSpeed::Slow,
        }
    }

    /// Multiplier applied to the simulation step rate.
    pub fn time_scale(self) -> f32 {
        match self {
            AnimationSpeed::Slow => 0.5,
            AnimationSpeed::Medium => 1.0,
            AnimationSpeed::Fast => 1.75,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AnimationSpeed::Slow => "slow",
            AnimationSpeed::Medium => "medium",
            AnimationSpeed::Fast => "fast",
        }
    }
}

impl fmt::Display for AnimationSpeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnimationSpeed {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AnimationSpeed::ALL
            .into_iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown speed '{s}' (expected slow, medium or fast)"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scene_cycle_visits_all() {
        let mut kind = SceneKind::Blobs;
        for expected in SceneKind::ALL.iter().cycle().skip(1).take(4) {
            kind = kind.next();
            assert_eq!(kind, *expected);
        }
    }

    #[test]
    fn test_parse_names() {
        assert_eq!("SLED".parse::<SceneKind>(), Ok(SceneKind::Sled));
        assert_eq!("fast".parse::<AnimationSpeed>(), Ok(AnimationSpeed::Fast));
        assert!("volcano".parse::<SceneKind>().is_err());
    }

    #[test]
    fn test_time_scale_ordering() {
        assert!(AnimationSpeed::Slow.time_scale() < AnimationSpeed::Medium.time_scale());
        assert!(AnimationSpeed::Medium.time_scale() < AnimationSpeed::Fast.time_scale());
    }
}
