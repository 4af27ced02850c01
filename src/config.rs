//! Engine configuration.

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::error::EngineError;

/// Tunable world parameters. Everything has a sensible default, so a
/// config file only needs the fields it overrides.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    pub seed: u32,
    /// Chunks with resident data, as a Chebyshev radius around the observer.
    pub load_radius: i32,
    /// Chunks with live meshes; must not exceed `load_radius`.
    pub view_radius: i32,
    /// Chunks with colliders; must not exceed `view_radius`.
    pub simulation_radius: i32,
    /// Extra ring beyond `load_radius` before chunk data is freed, so small
    /// observer oscillations don't thrash generation.
    pub destroy_margin: i32,
    pub gen_workers: usize,
    pub mesh_workers: usize,
    pub mesh_applies_per_tick: usize,
    pub collider_applies_per_tick: usize,
    pub gen_applies_per_tick: usize,
}

impl Default for WorldConfig {
    fn default() -> Self {
        WorldConfig {
            seed: 12345,
            load_radius: LOAD_RADIUS,
            view_radius: VIEW_RADIUS,
            simulation_radius: SIMULATION_RADIUS,
            destroy_margin: DESTROY_MARGIN,
            gen_workers: GEN_WORKER_COUNT,
            mesh_workers: (num_cpus::get().saturating_sub(2)).max(1),
            mesh_applies_per_tick: MESH_APPLIES_PER_TICK,
            collider_applies_per_tick: COLLIDER_APPLIES_PER_TICK,
            gen_applies_per_tick: GEN_APPLIES_PER_TICK,
        }
    }
}

impl WorldConfig {
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.simulation_radius < 0
            || self.simulation_radius > self.view_radius
            || self.view_radius > self.load_radius
        {
            return Err(EngineError::InvalidConfig(format!(
                "radii must satisfy 0 <= simulation ({}) <= view ({}) <= load ({})",
                self.simulation_radius, self.view_radius, self.load_radius
            )));
        }
        if self.destroy_margin < 0 {
            return Err(EngineError::InvalidConfig(format!(
                "destroy margin must be non-negative, got {}",
                self.destroy_margin
            )));
        }
        if self.gen_workers == 0 || self.mesh_workers == 0 {
            return Err(EngineError::InvalidConfig(
                "worker pools need at least one thread".to_string(),
            ));
        }
        if self.mesh_applies_per_tick == 0
            || self.collider_applies_per_tick == 0
            || self.gen_applies_per_tick == 0
        {
            return Err(EngineError::InvalidConfig(
                "per-tick budgets must be at least one".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        WorldConfig::default().validate().unwrap();
    }

    #[test]
    fn radius_ordering_is_enforced() {
        let mut config = WorldConfig::default();
        config.view_radius = config.load_radius + 1;
        assert!(config.validate().is_err());

        let mut config = WorldConfig::default();
        config.simulation_radius = config.view_radius + 1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_budgets_are_rejected() {
        let mut config = WorldConfig::default();
        config.mesh_applies_per_tick = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn partial_config_deserializes_with_defaults() {
        let config: WorldConfig = serde_json::from_str(r#"{"seed": 7, "load_radius": 4}"#).unwrap();
        assert_eq!(config.seed, 7);
        assert_eq!(config.load_radius, 4);
        assert_eq!(config.view_radius, VIEW_RADIUS);
    }
}
