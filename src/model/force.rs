use serde::{Deserialize, Serialize};

use super::rules::{UnitKind, UnitRole};

/// A group of identical units inside a [`Force`]. Cohorts with the same kind
/// and role are merged rather than listed twice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitCohort {
    pub kind: UnitKind,
    pub role: UnitRole,
    pub count: u32,
}

impl UnitCohort {
    pub fn new(kind: UnitKind, role: UnitRole, count: u32) -> Self {
        Self { kind, role, count }
    }
}

/// An order-of-battle: land cohorts that need shipping and naval cohorts
/// that provide it.
///
/// `capacity` and `space_required` are maintained incrementally by [`add`]
/// and can always be rebuilt from the cohort lists with
/// [`update_space_and_capacity`]; the bulk recompute is the source of truth
/// after any structural change that bypasses `add` (deserialization in
/// particular).
///
/// [`add`]: Force::add
/// [`update_space_and_capacity`]: Force::update_space_and_capacity
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(into = "ForceRepr", from = "ForceRepr")]
pub struct Force {
    land: Vec<UnitCohort>,
    naval: Vec<UnitCohort>,
    capacity: u32,
    space_required: u32,
}

#[derive(Serialize, Deserialize)]
struct ForceRepr {
    land: Vec<UnitCohort>,
    naval: Vec<UnitCohort>,
}

impl From<Force> for ForceRepr {
    fn from(force: Force) -> Self {
        ForceRepr {
            land: force.land,
            naval: force.naval,
        }
    }
}

impl From<ForceRepr> for Force {
    fn from(repr: ForceRepr) -> Self {
        let mut force = Force {
            land: repr.land,
            naval: repr.naval,
            capacity: 0,
            space_required: 0,
        };
        force.update_space_and_capacity();
        force
    }
}

impl Force {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn land_cohorts(&self) -> &[UnitCohort] {
        &self.land
    }

    pub fn naval_cohorts(&self) -> &[UnitCohort] {
        &self.naval
    }

    /// Total carrier holds across the naval cohorts.
    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Total holds the land cohorts need when embarked.
    pub fn space_required(&self) -> u32 {
        self.space_required
    }

    pub fn is_empty(&self) -> bool {
        self.land.is_empty() && self.naval.is_empty()
    }

    /// Add a cohort, merging it into an existing one with the same kind and
    /// role. Totals are updated incrementally, so adding in any order yields
    /// the same force.
    pub fn add(&mut self, cohort: UnitCohort) {
        if cohort.count == 0 {
            return;
        }
        let list = if cohort.kind.is_naval() {
            &mut self.naval
        } else {
            &mut self.land
        };
        match list
            .iter_mut()
            .find(|c| c.kind == cohort.kind && c.role == cohort.role)
        {
            Some(existing) => existing.count += cohort.count,
            None => list.push(cohort),
        }
        if cohort.kind.is_naval() {
            self.capacity += cohort.kind.capacity() * cohort.count;
        } else {
            self.space_required += cohort.kind.space_taken() * cohort.count;
        }
    }

    /// Empty the land arm and zero the space it needed.
    pub fn clear_land(&mut self) {
        self.land.clear();
        self.space_required = 0;
    }

    /// Empty the naval arm and zero the holds it offered.
    pub fn clear_naval(&mut self) {
        self.naval.clear();
        self.capacity = 0;
    }

    /// Rebuild both totals from the cohort lists.
    pub fn update_space_and_capacity(&mut self) {
        self.capacity = self
            .naval
            .iter()
            .map(|c| c.kind.capacity() * c.count)
            .sum();
        self.space_required = self
            .land
            .iter()
            .map(|c| c.kind.space_taken() * c.count)
            .sum();
    }

    /// Make the naval arm big enough to lift the land arm, requisitioning
    /// extra ships of the first naval cohort's kind one at a time until
    /// capacity covers the space required. Greedy on the first cohort only;
    /// a cheaper-per-hold ship later in the list is never considered.
    ///
    /// Returns `false`, changing nothing, when there are no naval cohorts.
    ///
    /// # Panics
    /// Panics if the first naval cohort cannot carry units.
    pub fn prepare_to_board(&mut self) -> bool {
        if self.naval.is_empty() {
            return false;
        }
        self.update_space_and_capacity();
        let per_ship = self.naval[0].kind.capacity();
        assert!(
            per_ship > 0,
            "prepare_to_board: first naval cohort cannot carry units"
        );
        while self.space_required > self.capacity {
            self.naval[0].count += 1;
            self.capacity += per_ship;
        }
        true
    }

    /// Offensive weight of one arm of the force.
    pub fn strength(&self, naval: bool) -> u32 {
        let list = if naval { &self.naval } else { &self.land };
        list.iter()
            .map(|c| (c.kind.offence() + c.role.offence_bonus()) * c.count)
            .sum()
    }
}
