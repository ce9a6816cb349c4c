//! Scenario configuration: arena, timing, goal, hazards and mutation tuning.

use serde::{Deserialize, Serialize};

use super::{
    Chances, FitnessStrategy, GenomeConstraints, GoalBox, KillWall, PairingScheme, Vec2,
};

const DEFAULT_WIDTH: f32 = 640.0;
const DEFAULT_HEIGHT: f32 = 480.0;

/// Immutable run description, validated once before a population is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    /// Seed for genome generation and genetic operators. `None` draws from entropy.
    #[serde(default)]
    pub seed: Option<u64>,
    /// Arena width in pixels.
    pub width: f32,
    /// Arena height in pixels.
    pub height: f32,
    /// Number of dots. Must be even.
    pub size: usize,
    /// Simulated seconds between kicks.
    pub kick_time: f32,
    /// Simulated seconds per generation.
    pub generation_time: f32,
    /// Fraction of velocity retained after one second, in (0, 1].
    pub damping: f32,
    #[serde(default)]
    pub chances: Chances,
    pub spawn: Vec2,
    pub target: GoalBox,
    /// Kill walls. `None` means the scenario never declared any.
    pub walls: Option<Vec<KillWall>>,
    #[serde(default)]
    pub genome: GenomeConstraints,
    #[serde(default = "default_dot_radius")]
    pub dot_radius: f32,
    /// Inward margin of the arena boundary that kills dots.
    #[serde(default = "default_boundary_margin")]
    pub boundary_margin: f32,
    #[serde(default = "default_solver_iterations")]
    pub solver_iterations: usize,
    #[serde(default)]
    pub fitness: FitnessStrategy,
    #[serde(default)]
    pub pairing: PairingScheme,
}

fn default_dot_radius() -> f32 {
    1.0
}
fn default_boundary_margin() -> f32 {
    2.0
}
fn default_solver_iterations() -> usize {
    10
}

impl Default for Scenario {
    fn default() -> Self {
        let (w, h) = (DEFAULT_WIDTH, DEFAULT_HEIGHT);
        Self {
            name: "default".to_string(),
            seed: Some(42),
            width: w,
            height: h,
            size: 1000,
            kick_time: 1.2,
            generation_time: 40.0,
            damping: 0.5,
            chances: Chances::default(),
            spawn: Vec2::new(w * 0.1, h * 0.1),
            target: GoalBox::new(Vec2::new(w * 0.9, h * 0.1), Vec2::new(10.0, 10.0)),
            walls: Some(vec![
                KillWall::new(w * 0.2, 0.0, w * 0.2, h * 0.5),
                KillWall::new(w * 0.5, h, w * 0.5, h * 0.5),
                KillWall::new(w * 0.8, 0.0, w * 0.8, h * 0.5),
            ]),
            genome: GenomeConstraints::default(),
            dot_radius: default_dot_radius(),
            boundary_margin: default_boundary_margin(),
            solver_iterations: default_solver_iterations(),
            fitness: FitnessStrategy::default(),
            pairing: PairingScheme::default(),
        }
    }
}

impl Scenario {
    /// Check the scenario, reporting the first problem found.
    pub fn validate(&self) -> Result<(), ScenarioError> {
        if self.size % 2 != 0 {
            return Err(ScenarioError::OddSize(self.size));
        }
        if self.walls.is_none() {
            return Err(ScenarioError::MissingWalls);
        }
        if self.kick_time < 0.0 {
            return Err(ScenarioError::NegativeKickTime(self.kick_time));
        }
        if self.generation_time < 0.0 {
            return Err(ScenarioError::NegativeGenerationTime(self.generation_time));
        }
        if !(self.damping > 0.0 && self.damping <= 1.0) {
            return Err(ScenarioError::InvalidDamping(self.damping));
        }
        if self.width < 0.0 || self.height < 0.0 {
            return Err(ScenarioError::NegativeDimensions {
                width: self.width,
                height: self.height,
            });
        }
        if self.spawn == self.target.center {
            return Err(ScenarioError::SpawnAtGoal);
        }
        Ok(())
    }

    /// Boolean form of [`Scenario::validate`].
    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// Declared kill walls, empty when none were declared.
    pub fn kill_walls(&self) -> &[KillWall] {
        self.walls.as_deref().unwrap_or(&[])
    }

    /// True if `point` lies outside the arena shrunk by the boundary margin.
    pub fn out_of_bounds(&self, point: Vec2) -> bool {
        let m = self.boundary_margin;
        point.x > self.width - m || point.x < m || point.y > self.height - m || point.y < m
    }
}

/// Scenario validation errors.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScenarioError {
    #[error("Population size must be even, got {0}")]
    OddSize(usize),
    #[error("Kill walls must be declared (an empty list is allowed)")]
    MissingWalls,
    #[error("Kick time must be non-negative, got {0}")]
    NegativeKickTime(f32),
    #[error("Generation time must be non-negative, got {0}")]
    NegativeGenerationTime(f32),
    #[error("Damping must lie in (0, 1], got {0}")]
    InvalidDamping(f32),
    #[error("Arena dimensions must be non-negative, got {width}x{height}")]
    NegativeDimensions { width: f32, height: f32 },
    #[error("Spawn point must differ from the goal center")]
    SpawnAtGoal,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_is_valid() {
        assert!(Scenario::default().is_valid());
    }

    #[test]
    fn test_each_invalid_field_rejected() {
        let cases: Vec<(Scenario, ScenarioError)> = vec![
            (
                Scenario {
                    size: 7,
                    ..Default::default()
                },
                ScenarioError::OddSize(7),
            ),
            (
                Scenario {
                    walls: None,
                    ..Default::default()
                },
                ScenarioError::MissingWalls,
            ),
            (
                Scenario {
                    kick_time: -0.1,
                    ..Default::default()
                },
                ScenarioError::NegativeKickTime(-0.1),
            ),
            (
                Scenario {
                    generation_time: -1.0,
                    ..Default::default()
                },
                ScenarioError::NegativeGenerationTime(-1.0),
            ),
            (
                Scenario {
                    damping: 0.0,
                    ..Default::default()
                },
                ScenarioError::InvalidDamping(0.0),
            ),
            (
                Scenario {
                    damping: 1.5,
                    ..Default::default()
                },
                ScenarioError::InvalidDamping(1.5),
            ),
            (
                Scenario {
                    width: -1.0,
                    ..Default::default()
                },
                ScenarioError::NegativeDimensions {
                    width: -1.0,
                    height: 480.0,
                },
            ),
            (
                Scenario {
                    height: -1.0,
                    ..Default::default()
                },
                ScenarioError::NegativeDimensions {
                    width: 640.0,
                    height: -1.0,
                },
            ),
        ];

        for (scenario, expected) in cases {
            assert!(!scenario.is_valid());
            assert_eq!(scenario.validate(), Err(expected));
        }
    }

    #[test]
    fn test_boundary_values_accepted() {
        let scenario = Scenario {
            size: 0,
            kick_time: 0.0,
            generation_time: 0.0,
            damping: 1.0,
            width: 0.0,
            height: 0.0,
            walls: Some(Vec::new()),
            ..Default::default()
        };
        assert!(scenario.is_valid());
    }

    #[test]
    fn test_spawn_at_goal_rejected() {
        let scenario = Scenario::default();
        let scenario = Scenario {
            spawn: scenario.target.center,
            ..scenario
        };
        assert_eq!(scenario.validate(), Err(ScenarioError::SpawnAtGoal));
    }

    #[test]
    fn test_out_of_bounds_margin() {
        let scenario = Scenario::default();
        assert!(scenario.out_of_bounds(Vec2::new(641.0, 100.0)));
        assert!(scenario.out_of_bounds(Vec2::new(639.0, 100.0)));
        assert!(scenario.out_of_bounds(Vec2::new(100.0, 1.0)));
        assert!(!scenario.out_of_bounds(Vec2::new(320.0, 240.0)));
    }

    #[test]
    fn test_json_file_round_trip() {
        let scenario = Scenario {
            name: "narrow".to_string(),
            size: 20,
            pairing: PairingScheme::Wrapping,
            ..Default::default()
        };

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{}", serde_json::to_string_pretty(&scenario).unwrap()).unwrap();

        let text = std::fs::read_to_string(file.path()).unwrap();
        let loaded: Scenario = serde_json::from_str(&text).unwrap();
        assert_eq!(loaded, scenario);
    }

    #[test]
    fn test_optional_fields_default() {
        let json = r#"{
            "name": "minimal",
            "width": 100.0,
            "height": 100.0,
            "size": 4,
            "kick_time": 1.0,
            "generation_time": 5.0,
            "damping": 0.9,
            "spawn": { "x": 10.0, "y": 10.0 },
            "target": { "center": { "x": 90.0, "y": 90.0 }, "half_extents": { "x": 5.0, "y": 5.0 } },
            "walls": []
        }"#;
        let scenario: Scenario = serde_json::from_str(json).unwrap();
        assert_eq!(scenario.seed, None);
        assert_eq!(scenario.chances, Chances::default());
        assert_eq!(scenario.fitness, FitnessStrategy::Compound);
        assert!(scenario.is_valid());
    }
}
