//! Agents: the planner-side wrapper around one world unit.

use super::task::Task;
use crate::model::{Location, UnitRole, World};

/// One planned unit. The id of the agent is the id of its unit; everything
/// else the planner knows about the unit lives in the world registry.
#[derive(Debug)]
pub struct Agent {
    pub unit: u64,
    pub task: Option<Task>,
    /// Derived from the task's base transport priority at assignment.
    pub transport_priority: i32,
}

impl Agent {
    pub fn new(unit: u64) -> Self {
        Self {
            unit,
            task: None,
            transport_priority: 0,
        }
    }

    /// Attach a task. Assigning the same goal again is a no-op so mid-flight
    /// progress is not thrown away; claim teardown for the displaced task is
    /// the planner's job, done before calling this.
    pub fn assign(&mut self, task: Task) {
        if let Some(current) = &self.task {
            if current.kind.goal_eq(&task.kind) {
                return;
            }
        }
        self.transport_priority = task.kind.base_transport_priority();
        self.task = Some(task);
    }

    pub fn clear_task(&mut self) {
        self.task = None;
        self.transport_priority = 0;
    }

    /// Suitability for founding settlements. Plain unskilled colonists score
    /// highest; gear or training is wasted on a founder. Units already on
    /// the map get a small edge over those still overseas.
    pub fn builder_score(&self, world: &World) -> i32 {
        let Some(u) = world.live_unit(self.unit) else {
            return -1000;
        };
        if !u.kind.can_found_settlement() {
            return -1000;
        }
        let mut score = if !u.has_default_role() {
            0
        } else if u.kind.skill_level() > 0 {
            100
        } else {
            500
        };
        if matches!(u.location, Location::Tile(_) | Location::Settlement(_)) {
            score += 50;
        }
        score
    }

    /// Suitability for pioneering. Tools in hand beat training, training
    /// beats a bare colonist; a unit equipped for some other role is left
    /// alone.
    pub fn pioneer_score(&self, world: &World) -> i32 {
        let Some(u) = world.live_unit(self.unit) else {
            return -1000;
        };
        if !u.kind.is_colonist() {
            return -1000;
        }
        let mut score = if u.role == UnitRole::Pioneer {
            100
        } else if u.kind.expert_role() == Some(UnitRole::Pioneer) {
            90
        } else if u.has_default_role() {
            50
        } else {
            return -1000;
        };
        if matches!(u.location, Location::Tile(_) | Location::Settlement(_)) {
            score += 10;
        }
        score
    }

    /// Suitability for scouting. Parley takes a scout's horse and standing;
    /// nobody else qualifies.
    pub fn scout_score(&self, world: &World) -> i32 {
        let Some(u) = world.live_unit(self.unit) else {
            return -1000;
        };
        if u.role != UnitRole::Scout {
            return -1000;
        }
        100
    }
}

/// Buy into a role, trying the full count first and haggling down until the
/// treasury covers it. `false` when even a single count is out of reach.
pub(crate) fn equip_for_role(world: &mut World, unit: u64, role: UnitRole) -> bool {
    let faction = match world.live_unit(unit) {
        Some(u) => u.faction,
        None => return false,
    };
    let Some(f) = world.faction(faction) else {
        return false;
    };
    let mut count = role.max_count();
    while count > 0 && !f.can_afford(role.price() * count) {
        count -= 1;
    }
    if count == 0 {
        return false;
    }
    world.equip_unit(unit, role, count)
}
