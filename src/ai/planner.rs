//! The per-faction turn driver: validation, assignment, execution, and
//! transport arbitration, in one deterministic pass over the agents.

use std::collections::{BTreeMap, BTreeSet};

use rand::rngs::SmallRng;
use rand::SeedableRng;

use super::agent::Agent;
use super::config::PlannerConfig;
use super::context::TurnContext;
use super::improvement::ImprovementPlan;
use super::log::TurnLog;
use super::task::{Task, TaskKind, TaskState};
use super::transport::{Cargo, TransportCoordinator, TransportDemand, GOODS_PRIORITY};
use crate::id::IdGenerator;
use crate::model::{Coord, GoodsKind, Location, UnitKind, UnitRole, World};

/// Drives every agent of one faction once per simulated turn, in ascending
/// agent id order. The order is part of the observable contract: demands
/// raised by one agent are arbitrated before the next agent runs.
pub struct Planner {
    faction: u64,
    config: PlannerConfig,
    agents: BTreeMap<u64, Agent>,
    plans: BTreeMap<u64, ImprovementPlan>,
    transport: TransportCoordinator,
    /// Demand buffer the current step writes into.
    pending: Vec<TransportDemand>,
    /// Generates plan ids; planner-side records have their own id space.
    id_gen: IdGenerator,
    rng: SmallRng,
}

impl Planner {
    pub fn new(faction: u64, config: PlannerConfig) -> Self {
        let rng = SmallRng::seed_from_u64(config.seed);
        Self {
            faction,
            config,
            agents: BTreeMap::new(),
            plans: BTreeMap::new(),
            transport: TransportCoordinator::new(),
            pending: Vec::new(),
            id_gen: IdGenerator::new(),
            rng,
        }
    }

    pub fn faction(&self) -> u64 {
        self.faction
    }

    pub fn agent(&self, id: u64) -> Option<&Agent> {
        self.agents.get(&id)
    }

    pub fn agents(&self) -> impl Iterator<Item = &Agent> {
        self.agents.values()
    }

    pub fn plan(&self, id: u64) -> Option<&ImprovementPlan> {
        self.plans.get(&id)
    }

    pub fn plans(&self) -> impl Iterator<Item = &ImprovementPlan> {
        self.plans.values()
    }

    pub fn transport(&self) -> &TransportCoordinator {
        &self.transport
    }

    pub(crate) fn parts_mut(
        &mut self,
    ) -> (
        &mut BTreeMap<u64, Agent>,
        &mut BTreeMap<u64, ImprovementPlan>,
        &mut TransportCoordinator,
        &mut IdGenerator,
    ) {
        (
            &mut self.agents,
            &mut self.plans,
            &mut self.transport,
            &mut self.id_gen,
        )
    }

    /// Register an agent for every live unit of the faction that has none
    /// yet. Safe to call repeatedly.
    pub fn adopt_units(&mut self, world: &World) {
        for unit in world.units.values() {
            if unit.disposed || unit.faction != self.faction {
                continue;
            }
            self.agents
                .entry(unit.id)
                .or_insert_with(|| Agent::new(unit.id));
        }
    }

    /// One full planning pass. The caller refreshes world upkeep
    /// (`World::begin_turn`) before handing the world over.
    pub fn run_turn(&mut self, world: &mut World) -> TurnLog {
        let mut log = TurnLog::new();
        self.adopt_units(world);
        self.refresh_improvement_plans(world);
        self.demand_goods_transport(world);
        self.resolve_demands(world, &mut log);
        let ids: Vec<u64> = self.agents.keys().copied().collect();
        for id in ids {
            self.process_agent(id, world, &mut log);
            // Settle this agent's demands before the next agent runs, so a
            // carrier later in the order can serve them this very turn.
            self.resolve_demands(world, &mut log);
        }
        log
    }

    fn process_agent(&mut self, id: u64, world: &mut World, log: &mut TurnLog) {
        if world.live_unit(id).is_none() {
            self.dispose_agent(id, log);
            return;
        }
        self.validate_task(id, world, log);
        self.assign_task(id, world, log);
        self.execute_task(id, world, log);
    }

    /// Sweep an agent whose unit is gone: its task, its claims on others,
    /// and any claim on it.
    fn dispose_agent(&mut self, id: u64, log: &mut TurnLog) {
        let Some(mut agent) = self.agents.remove(&id) else {
            return;
        };
        if let Some(mut task) = agent.task.take() {
            task.state = TaskState::Disposed;
            self.teardown(id, &task, log);
        } else {
            self.transport.release(Cargo::Agent(id), &mut self.agents);
        }
        log.note(format!("agent {id} disposed"));
    }

    /// Undo a dying task's footprint: carrier claims, plan executorship,
    /// and the agent's own standing as claimed cargo.
    fn teardown(&mut self, agent_id: u64, task: &Task, log: &mut TurnLog) {
        match &task.kind {
            TaskKind::Transport { .. } => {
                for cargo in self.transport.release_carrier(agent_id) {
                    log.note(format!("claim on {cargo:?} released"));
                }
            }
            TaskKind::Pioneer { plan } => {
                if let Some(p) = self.plans.get_mut(plan) {
                    if p.executor == Some(agent_id) {
                        p.executor = None;
                    }
                }
            }
            _ => {}
        }
        self.transport.release(Cargo::Agent(agent_id), &mut self.agents);
    }

    /// Re-derive the current task's validity and activate or drop it.
    fn validate_task(&mut self, id: u64, world: &World, log: &mut TurnLog) {
        let task = match self.agents.get_mut(&id) {
            Some(a) => a.task.take(),
            None => return,
        };
        let Some(mut task) = task else {
            return;
        };
        let Some(unit) = world.live_unit(id) else {
            return;
        };
        match task.invalid_reason(world, unit, &self.plans) {
            Some(reason) => {
                log.note(format!("agent {id} dropped {}: {reason}", task.kind));
                task.state = TaskState::Invalid;
                self.teardown(id, &task, log);
                if let Some(a) = self.agents.get_mut(&id) {
                    a.transport_priority = 0;
                }
            }
            None => {
                task.state = TaskState::Active;
                if let Some(a) = self.agents.get_mut(&id) {
                    a.task = Some(task);
                }
            }
        }
    }

    /// Give an idle agent the best-scoring task its faction's factory
    /// offers. Ties go to the higher variant rank; candidate generation
    /// order settles anything left.
    fn assign_task(&mut self, id: u64, world: &World, log: &mut TurnLog) {
        let idle = self.agents.get(&id).map(|a| a.task.is_none()).unwrap_or(false);
        if !idle {
            return;
        }
        let native = world
            .faction(self.faction)
            .map(|f| f.is_native())
            .unwrap_or(false);
        let candidates = if native {
            self.native_candidates(id, world)
        } else {
            self.colonial_candidates(id, world)
        };
        let mut best: Option<(i32, Task)> = None;
        for (score, kind) in candidates {
            let better = match &best {
                Some((bs, bt)) => (score, kind.rank()) > (*bs, bt.kind.rank()),
                None => true,
            };
            if better {
                best = Some((score, Task::new(kind)));
            }
        }
        let Some((_, task)) = best else {
            return;
        };
        log.note(format!("agent {id} took {}", task.kind));
        self.install_task(id, task, log);
    }

    /// Attach a factory-made task: tear down whatever it displaces, wire up
    /// plan executorship, and activate. A same-goal assignment is a no-op.
    fn install_task(&mut self, id: u64, mut task: Task, log: &mut TurnLog) {
        let old = {
            let Some(agent) = self.agents.get_mut(&id) else {
                return;
            };
            if let Some(current) = &agent.task {
                if current.kind.goal_eq(&task.kind) {
                    return;
                }
            }
            agent.task.take()
        };
        if let Some(mut old) = old {
            old.state = TaskState::Disposed;
            self.teardown(id, &old, log);
        }
        if let TaskKind::Pioneer { plan } = &task.kind {
            if let Some(p) = self.plans.get_mut(plan) {
                p.executor = Some(id);
            }
        }
        // Fresh from the factory: the factory only proposes what is
        // currently valid, so it runs this very turn.
        task.state = TaskState::Active;
        if let Some(agent) = self.agents.get_mut(&id) {
            agent.assign(task);
        }
    }

    /// Run one step of the agent's active task.
    fn execute_task(&mut self, id: u64, world: &mut World, log: &mut TurnLog) {
        let task = match self.agents.get_mut(&id) {
            Some(a) => a.task.take(),
            None => return,
        };
        let Some(mut task) = task else {
            return;
        };
        if task.state != TaskState::Active {
            // Drafted mid-turn after its slot (a carrier claimed by the
            // coordinator): it runs after next turn's validation.
            if let Some(a) = self.agents.get_mut(&id) {
                a.task = Some(task);
            }
            return;
        }
        let mut demands = std::mem::take(&mut self.pending);
        {
            let mut ctx = TurnContext {
                world,
                rng: &mut self.rng,
                log,
                config: &self.config,
                demands: &mut demands,
                plans: &self.plans,
            };
            task.step(id, &mut ctx);
        }
        self.pending = demands;
        if task.state == TaskState::Completed {
            log.note(format!("agent {id} completed {}", task.kind));
            self.finish_task(id, &task);
            return;
        }
        if task.is_one_time() {
            // Fillers never carry over to the next turn.
            if let Some(a) = self.agents.get_mut(&id) {
                a.clear_task();
            }
            return;
        }
        if let Some(a) = self.agents.get_mut(&id) {
            a.task = Some(task);
        }
    }

    /// Retire a completed task's leftovers.
    fn finish_task(&mut self, id: u64, task: &Task) {
        if let TaskKind::Pioneer { plan } = &task.kind {
            // The work is in the ground; the plan has served.
            self.plans.remove(plan);
        }
        self.transport.release(Cargo::Agent(id), &mut self.agents);
        if let Some(a) = self.agents.get_mut(&id) {
            a.clear_task();
        }
    }

    fn resolve_demands(&mut self, world: &mut World, log: &mut TurnLog) {
        if self.pending.is_empty() {
            return;
        }
        let demands = std::mem::take(&mut self.pending);
        self.transport.resolve(demands, &mut self.agents, world, log);
    }

    /// Earmarked parcels ask for carriage by themselves; goods have no task
    /// to speak for them.
    fn demand_goods_transport(&mut self, world: &World) {
        for lot in world.goods.values() {
            if lot.faction != self.faction || lot.location.is_aboard() {
                continue;
            }
            let Some(dest) = lot.destination else {
                continue;
            };
            if world.settlement(dest).is_none() {
                continue;
            }
            if lot.location.settlement_id() == Some(dest) {
                continue;
            }
            if self.transport.is_claimed(Cargo::Goods(lot.id)) {
                continue;
            }
            self.pending.push(TransportDemand::Request {
                cargo: Cargo::Goods(lot.id),
                destination: Location::Settlement(dest),
                priority: GOODS_PRIORITY,
            });
        }
    }

    /// Mark-and-sweep the improvement plans: one plan per tile worth working
    /// in a ring around each colony. Surviving plans re-derive their kind
    /// and value but keep their ids and executors; tiles with nothing left
    /// to offer lose their plan, which invalidates any pioneer task pointed
    /// at it.
    fn refresh_improvement_plans(&mut self, world: &World) {
        let mut wanted: BTreeSet<Coord> = BTreeSet::new();
        let radius = self.config.improvement_radius as i32;
        for s in world.settlements.values() {
            if s.faction != self.faction || !s.is_colony() {
                continue;
            }
            for dx in -radius..=radius {
                for dy in -radius..=radius {
                    let c = Coord::new(s.coord.x + dx, s.coord.y + dy);
                    if world.in_bounds(c) && world.settlement_at(c).is_none() {
                        wanted.insert(c);
                    }
                }
            }
        }
        let mut keep: BTreeMap<u64, ImprovementPlan> = BTreeMap::new();
        for (pid, mut plan) in std::mem::take(&mut self.plans) {
            let Some(target) = plan.target else {
                continue;
            };
            // One plan per tile; the lowest id keeps the spot.
            if !wanted.remove(&target) {
                continue;
            }
            if plan.update_best(world) {
                keep.insert(pid, plan);
            }
        }
        for coord in wanted {
            let mut plan = ImprovementPlan::draft(coord);
            if plan.update_best(world) {
                plan.id = self.id_gen.next_id();
                keep.insert(plan.id, plan);
            }
        }
        self.plans = keep;
    }

    /// Does any agent already pursue this goal?
    fn goal_taken(&self, kind: &TaskKind) -> bool {
        self.agents.values().any(|a| {
            a.task
                .as_ref()
                .map(|t| t.kind.goal_eq(kind))
                .unwrap_or(false)
        })
    }

    fn assigned_count(&self, want: impl Fn(&TaskKind) -> bool) -> u32 {
        self.agents
            .values()
            .filter(|a| a.task.as_ref().map(|t| want(&t.kind)).unwrap_or(false))
            .count() as u32
    }

    /// Turns-to-reach for scoring. No route is not disqualifying: the goal
    /// may sit behind a foreign settlement's walls or across water that
    /// transport can cross, so fall back to straight-line distance, or a
    /// flat crossing guess when either end is off-map.
    fn travel_cost(&self, world: &World, unit: u64, dest: Location) -> i32 {
        match world.turns_to_reach(unit, dest) {
            Some(t) => t as i32,
            None => match (world.unit_tile(unit), world.tile_of(dest)) {
                (Some(a), Some(b)) => a.distance(b) as i32,
                _ => 8,
            },
        }
    }

    fn danger_at(&self, world: &World, coord: Coord) -> i32 {
        world.enemy_strength_near(self.faction, coord, self.config.danger_radius) as i32
    }

    /// Candidate tasks for a colonial agent, each with its assignment score.
    fn colonial_candidates(&self, id: u64, world: &World) -> Vec<(i32, TaskKind)> {
        let mut out = Vec::new();
        let Some(u) = world.live_unit(id) else {
            return out;
        };
        let agent = match self.agents.get(&id) {
            Some(a) => a,
            None => return out,
        };
        let dw = self.config.distance_weight;
        let gw = self.config.danger_weight;

        if u.kind == UnitKind::TreasureTrain && u.treasure > 0 {
            let bank = world
                .settlements
                .values()
                .find(|s| s.faction == self.faction && s.is_colony());
            if bank.is_some() || u.location.is_homeland() {
                out.push((95, TaskKind::CashInTreasure));
            }
        }

        for s in world.settlements.values() {
            if s.faction != self.faction {
                continue;
            }
            for w in &s.wishes {
                if w.kind != u.kind {
                    continue;
                }
                let kind = TaskKind::WishRealization {
                    settlement: s.id,
                    wish: w.id,
                };
                if self.goal_taken(&kind) {
                    continue;
                }
                let cost = self.travel_cost(world, id, Location::Settlement(s.id));
                out.push((100 + w.value - dw * cost, kind));
            }
        }

        // Units equipped for a calling are not founders; parley, muskets and
        // tools all outlive a one-off town charter.
        let builder = agent.builder_score(world);
        if u.has_default_role() && builder > 0 {
            if let Some((site, value)) = self.best_settlement_site(world) {
                let kind = TaskKind::BuildSettlement { site };
                if !self.goal_taken(&kind) {
                    let cost = self.travel_cost(world, id, Location::Tile(site));
                    let danger = self.danger_at(world, site);
                    out.push((90 + builder / 10 + value - dw * cost - gw * danger, kind));
                }
            }
        }

        let pioneer = agent.pioneer_score(world);
        if pioneer > 0 {
            for p in self.plans.values() {
                if p.executor.is_some() {
                    continue;
                }
                let (Some(target), true) = (p.target, p.validate(world)) else {
                    continue;
                };
                let cost = self.travel_cost(world, id, Location::Tile(target));
                out.push((
                    80 + pioneer / 10 + p.value - dw * cost,
                    TaskKind::Pioneer { plan: p.id },
                ));
            }
        }

        let scout = agent.scout_score(world);
        if scout > 0 {
            for s in world.settlements.values() {
                if !s.is_camp() || s.scouted_by(self.faction) {
                    continue;
                }
                let kind = TaskKind::Scout { camp: s.id };
                if self.goal_taken(&kind) {
                    continue;
                }
                let cost = self.travel_cost(world, id, Location::Settlement(s.id));
                out.push((60 + scout / 10 - dw * cost, kind));
            }
        }

        if u.role == UnitRole::Missionary {
            for s in world.settlements.values() {
                if !s.is_camp() || s.mission == Some(self.faction) {
                    continue;
                }
                let kind = TaskKind::Missionary { camp: s.id };
                if self.goal_taken(&kind) {
                    continue;
                }
                let cost = self.travel_cost(world, id, Location::Settlement(s.id));
                out.push((70 - dw * cost, kind));
            }
        }

        // Specialist roles keep their callings, and a garrison post needs a
        // unit that can fight back. An empty garrison shouts louder than a
        // thin one.
        let garrison_material = matches!(u.role, UnitRole::Default | UnitRole::Soldier);
        if garrison_material && !u.kind.is_naval() && u.offence() > 0 {
            for s in world.settlements.values() {
                if s.faction != self.faction {
                    continue;
                }
                let posted = self.assigned_count(|k| {
                    matches!(k, TaskKind::Defend { settlement } if *settlement == s.id)
                });
                if posted >= s.defenders_wanted {
                    continue;
                }
                let shortage = (s.defenders_wanted - posted) as i32;
                let cost = self.travel_cost(world, id, Location::Settlement(s.id));
                let danger = self.danger_at(world, s.coord);
                out.push((
                    50 + 40 * shortage + gw * danger - dw * cost,
                    TaskKind::Defend { settlement: s.id },
                ));
            }
        }

        if u.kind.is_colonist() {
            for s in world.settlements.values() {
                if s.faction != self.faction || !s.is_colony() {
                    continue;
                }
                let posted = self.assigned_count(|k| {
                    matches!(k, TaskKind::WorkInsideColony { settlement } if *settlement == s.id)
                });
                if posted >= s.workers_wanted {
                    continue;
                }
                let cost = self.travel_cost(world, id, Location::Settlement(s.id));
                out.push((30 - dw * cost, TaskKind::WorkInsideColony { settlement: s.id }));
            }
        }

        if u.offence() > 0 {
            if let Some((foe, cost)) = self.nearest_quarry(world, id, u.kind.is_naval()) {
                out.push((40 - dw * cost, TaskKind::SeekAndDestroy { quarry: foe }));
            }
        }

        if u.kind == UnitKind::Privateer {
            out.push((25, TaskKind::PrivateerRaid { quarry: None }));
        }

        if u.is_carrier() {
            // A carrier's default station: work whatever manifest comes.
            out.push((15, TaskKind::Transport { manifest: Vec::new() }));
        }

        let has_home = world
            .settlements
            .values()
            .any(|s| s.faction == self.faction);
        if has_home && !u.kind.is_naval() {
            out.push((2, TaskKind::IdleAtSettlement));
        }
        out.push((1, TaskKind::Wander));
        out
    }

    /// Candidate tasks for a native agent.
    fn native_candidates(&self, id: u64, world: &World) -> Vec<(i32, TaskKind)> {
        let mut out = Vec::new();
        let Some(u) = world.live_unit(id) else {
            return out;
        };
        let dw = self.config.distance_weight;
        let gw = self.config.danger_weight;

        if u.defence() > 0 {
            for s in world.settlements.values() {
                if s.faction != self.faction {
                    continue;
                }
                let posted = self.assigned_count(|k| {
                    matches!(k, TaskKind::Defend { settlement } if *settlement == s.id)
                });
                if posted >= s.defenders_wanted {
                    continue;
                }
                let shortage = (s.defenders_wanted - posted) as i32;
                let cost = self.travel_cost(world, id, Location::Settlement(s.id));
                let danger = self.danger_at(world, s.coord);
                out.push((
                    50 + 40 * shortage + gw * danger - dw * cost,
                    TaskKind::Defend { settlement: s.id },
                ));
            }
        }

        if u.offence() > 0 {
            if let Some((foe, cost)) = self.nearest_quarry(world, id, u.kind.is_naval()) {
                out.push((40 - dw * cost, TaskKind::SeekAndDestroy { quarry: foe }));
            }
        }

        if u.kind == UnitKind::Brave {
            let stocked_home = u
                .home
                .and_then(|h| world.settlement(h))
                .map(|s| s.is_camp() && s.faction == self.faction && s.stock > 0)
                .unwrap_or(false);
            for s in world.settlements.values() {
                if !s.is_colony() || s.faction == self.faction {
                    continue;
                }
                let cost = self.travel_cost(world, id, Location::Settlement(s.id));
                if stocked_home {
                    let kind = TaskKind::BringGift {
                        colony: s.id,
                        gift: None,
                    };
                    if !self.goal_taken(&kind) {
                        out.push((20 - dw * cost, kind));
                    }
                }
                let kind = TaskKind::DemandTribute {
                    colony: s.id,
                    collected: false,
                };
                if !self.goal_taken(&kind) {
                    out.push((20 - dw * cost, kind));
                }
            }
        }

        out.push((2, TaskKind::WanderHostile));
        out.push((1, TaskKind::Wander));
        out
    }

    /// Nearest live enemy of the same arm within patrol reach, with its
    /// travel cost. Lowest unit id breaks distance ties.
    fn nearest_quarry(&self, world: &World, id: u64, naval: bool) -> Option<(u64, i32)> {
        let here = world.unit_tile(id)?;
        let mut best: Option<(u32, u64)> = None;
        for t in world.units.values() {
            if t.disposed
                || t.faction == self.faction
                || t.kind.is_naval() != naval
                || t.location.is_aboard()
            {
                continue;
            }
            let Some(c) = world.tile_of(t.location) else {
                continue;
            };
            let d = here.distance(c);
            if d > self.config.patrol_radius {
                continue;
            }
            if best.map(|(bd, bid)| (d, t.id) < (bd, bid)).unwrap_or(true) {
                best = Some((d, t.id));
            }
        }
        best.map(|(d, foe)| (foe, d as i32))
    }

    /// The most promising unsettled tile: food yield tripled plus a coastal
    /// bonus, skipping tiles within `colony_spacing` of an existing
    /// settlement so new colonies do not crowd old ones. Lowest coordinate
    /// wins ties.
    fn best_settlement_site(&self, world: &World) -> Option<(Coord, i32)> {
        let spacing = self.config.colony_spacing;
        let mut best: Option<(i32, Coord)> = None;
        for (coord, tile) in world.tiles.iter() {
            if !tile.terrain.is_settleable() {
                continue;
            }
            if world
                .settlements
                .values()
                .any(|s| coord.distance(s.coord) <= spacing)
            {
                continue;
            }
            let coastal = coord.neighbors().any(|n| {
                world
                    .tile(n)
                    .map(|t| t.terrain.is_water())
                    .unwrap_or(false)
            });
            let value = tile.yield_of(GoodsKind::Food) * 3 + if coastal { 2 } else { 0 };
            if value > best.map(|(v, _)| v).unwrap_or(i32::MIN) {
                best = Some((value, *coord));
            }
        }
        best.map(|(value, coord)| (coord, value))
    }

    /// Sweep the registries for defects. Returns 1 when clean, 0 when
    /// everything found was repaired, -1 when damage remains.
    pub fn check_integrity(&mut self, world: &World, fix: bool) -> i32 {
        let mut worst = 1;
        let mut scratch = TurnLog::new();

        let dead_agents: Vec<u64> = self
            .agents
            .keys()
            .filter(|id| world.live_unit(**id).is_none())
            .copied()
            .collect();
        for id in dead_agents {
            tracing::warn!(agent = id, "integrity: agent without a live unit");
            if fix {
                self.dispose_agent(id, &mut scratch);
                worst = worst.min(0);
            } else {
                worst = -1;
            }
        }

        let bad_plans: Vec<u64> = self
            .plans
            .iter()
            .filter(|(_, p)| !p.validate(world))
            .map(|(id, _)| *id)
            .collect();
        for id in bad_plans {
            tracing::warn!(plan = id, "integrity: plan without type or target");
            if fix {
                self.plans.remove(&id);
                worst = worst.min(0);
            } else {
                worst = -1;
            }
        }

        let orphaned: Vec<u64> = self
            .plans
            .iter()
            .filter(|(_, p)| {
                p.executor
                    .map(|e| world.live_unit(e).is_none())
                    .unwrap_or(false)
            })
            .map(|(id, _)| *id)
            .collect();
        for id in orphaned {
            tracing::warn!(plan = id, "integrity: plan executor without a live unit");
            if fix {
                if let Some(p) = self.plans.get_mut(&id) {
                    p.executor = None;
                }
                worst = worst.min(0);
            } else {
                worst = -1;
            }
        }

        let dead_claims: Vec<Cargo> = self
            .transport
            .iter()
            .filter(|(cargo, claim)| {
                let cargo_ok = match cargo {
                    Cargo::Agent(a) => world.live_unit(*a).is_some(),
                    Cargo::Goods(g) => world.goods_lot(*g).is_some(),
                };
                let carrier_ok = self.agents.contains_key(&claim.carrier)
                    && world.live_unit(claim.carrier).is_some();
                !cargo_ok || !carrier_ok
            })
            .map(|(cargo, _)| *cargo)
            .collect();
        for cargo in dead_claims {
            tracing::warn!(?cargo, "integrity: claim on or by a missing party");
            if fix {
                self.transport.release(cargo, &mut self.agents);
                worst = worst.min(0);
            } else {
                worst = -1;
            }
        }

        worst
    }
}
