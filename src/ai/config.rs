/// Tuning knobs for one faction's planner.
///
/// The seed fixes the planner's private RNG; two planners built from the
/// same seed over the same world make identical decisions.
#[derive(Debug, Clone)]
pub struct PlannerConfig {
    pub seed: u64,
    /// Score penalty per estimated turn of travel to a task's target.
    pub distance_weight: i32,
    /// Score penalty (or garrison boost) per point of enemy strength near
    /// a task's target.
    pub danger_weight: i32,
    /// Radius scanned for enemies when weighing danger.
    pub danger_radius: u32,
    /// Radius around a colony whose tiles get improvement plans.
    pub improvement_radius: u32,
    /// Closest a new colony site may sit to any existing settlement.
    pub colony_spacing: u32,
    /// Radius scanned for hostile-wander and hunting targets.
    pub patrol_radius: u32,
    /// Gold a native demand party asks for at a colony gate.
    pub tribute_demand: u32,
}

impl PlannerConfig {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            distance_weight: 3,
            danger_weight: 2,
            danger_radius: 3,
            improvement_radius: 1,
            colony_spacing: 2,
            patrol_radius: 6,
            tribute_demand: 50,
        }
    }
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self::new(0)
    }
}
