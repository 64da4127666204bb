//! Durable planner state, one JSONL file per registry plus a small manifest.
//!
//! A snapshot holds only what the planner cannot re-derive: which task each
//! agent carries, the improvement plans with their executors, and the
//! transport claims. Everything else is rebuilt from the world on the next
//! turn. Loading is forgiving about the world having moved on since the
//! snapshot: records pointing at dead units or vanished lots are discarded
//! with a warning rather than failing the load.

use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::ai::task::{Task, TaskKind, TaskState};
use crate::ai::{Agent, Cargo, Claim, ImprovementPlan, Planner, Shipment};
use crate::model::{Location, World};

#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("snapshot io")]
    Io(#[from] io::Error),
    #[error("{path}:{line}: malformed snapshot record")]
    Parse {
        path: PathBuf,
        line: usize,
        #[source]
        source: serde_json::Error,
    },
    #[error("snapshot belongs to faction {found}, not {expected}")]
    FactionMismatch { expected: u64, found: u64 },
}

#[derive(Debug, Serialize, Deserialize)]
struct Meta {
    faction: u64,
}

#[derive(Debug, Serialize, Deserialize)]
struct AgentRecord {
    unit: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    task: Option<TaskKind>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ClaimRecord {
    cargo: Cargo,
    carrier: u64,
    destination: Location,
}

/// Write the planner's registries under `dir`: `meta.json`, `agents.jsonl`,
/// `plans.jsonl`, and `claims.jsonl`.
///
/// One-time tasks and tasks past their useful life are not persisted; a
/// reloaded agent simply gets reassigned. Plans that no longer validate
/// against the world are dropped here rather than at load.
pub fn save(planner: &Planner, world: &World, dir: &Path) -> Result<(), SnapshotError> {
    fs::create_dir_all(dir)?;
    let meta = Meta {
        faction: planner.faction(),
    };
    fs::write(
        dir.join("meta.json"),
        serde_json::to_string_pretty(&meta).map_err(io::Error::from)?,
    )?;
    write_jsonl(
        &dir.join("agents.jsonl"),
        planner.agents().map(agent_record),
    )?;
    write_jsonl(
        &dir.join("plans.jsonl"),
        planner.plans().filter(|p| p.validate(world)),
    )?;
    write_jsonl(
        &dir.join("claims.jsonl"),
        planner.transport().iter().map(|(cargo, claim)| ClaimRecord {
            cargo: *cargo,
            carrier: claim.carrier,
            destination: claim.destination,
        }),
    )?;
    Ok(())
}

/// Replace the planner's registries with the snapshot under `dir`.
///
/// The world is the arbiter of what still exists: agents whose unit died,
/// claims on vanished cargo, and plans whose tile is gone are discarded with
/// a warning. A plan whose executor is stale merely loses the executor.
/// Restored tasks come back unvalidated and earn their keep on the next
/// turn. Claims are the source of truth for carrier manifests; manifests are
/// pruned and completed to match them.
pub fn load(planner: &mut Planner, world: &World, dir: &Path) -> Result<(), SnapshotError> {
    let meta: Meta = read_json(&dir.join("meta.json"))?;
    if meta.faction != planner.faction() {
        return Err(SnapshotError::FactionMismatch {
            expected: planner.faction(),
            found: meta.faction,
        });
    }
    let agent_records: Vec<AgentRecord> = read_jsonl(&dir.join("agents.jsonl"))?;
    let plan_records: Vec<ImprovementPlan> = read_jsonl(&dir.join("plans.jsonl"))?;
    let claim_records: Vec<ClaimRecord> = read_jsonl(&dir.join("claims.jsonl"))?;

    let (agents, plans, transport, id_gen) = planner.parts_mut();
    agents.clear();
    plans.clear();
    transport.clear();

    for rec in agent_records {
        if world.live_unit(rec.unit).is_none() {
            tracing::warn!(unit = rec.unit, "snapshot agent has no live unit, discarded");
            continue;
        }
        let mut agent = Agent::new(rec.unit);
        if let Some(kind) = rec.task {
            agent.assign(Task::new(kind));
        }
        agents.insert(rec.unit, agent);
    }

    for mut plan in plan_records {
        if !plan.validate(world) {
            tracing::warn!(plan = plan.id, "snapshot plan lost its target, discarded");
            continue;
        }
        if let Some(executor) = plan.executor {
            let held = agents
                .get(&executor)
                .and_then(|a| a.task.as_ref())
                .map(|t| matches!(&t.kind, TaskKind::Pioneer { plan: p } if *p == plan.id))
                .unwrap_or(false);
            if !held {
                tracing::warn!(
                    plan = plan.id,
                    executor,
                    "snapshot plan executor is stale, cleared"
                );
                plan.executor = None;
            }
        }
        id_gen.advance_past(plan.id);
        plans.insert(plan.id, plan);
    }

    for rec in claim_records {
        let cargo_ok = match rec.cargo {
            Cargo::Agent(a) => world.live_unit(a).is_some(),
            Cargo::Goods(g) => world.goods_lot(g).is_some(),
        };
        let carrier_on_duty = agents
            .get(&rec.carrier)
            .and_then(|a| a.task.as_ref())
            .map(|t| matches!(t.kind, TaskKind::Transport { .. }))
            .unwrap_or(false);
        if !cargo_ok || !carrier_on_duty {
            tracing::warn!(
                cargo = ?rec.cargo,
                carrier = rec.carrier,
                "snapshot claim references a missing party, discarded"
            );
            continue;
        }
        let claim = Claim {
            carrier: rec.carrier,
            destination: rec.destination,
        };
        if !transport.restore(rec.cargo, claim) {
            tracing::warn!(cargo = ?rec.cargo, "duplicate snapshot claim, discarded");
        }
    }

    // Manifests mirror the claims table, not the other way round.
    for (id, agent) in agents.iter_mut() {
        let Some(task) = agent.task.as_mut() else {
            continue;
        };
        if let TaskKind::Transport { manifest } = &mut task.kind {
            manifest.retain(|s| {
                transport
                    .claim_of(s.cargo)
                    .map(|c| c.carrier == *id)
                    .unwrap_or(false)
            });
        }
    }
    let claimed: Vec<(Cargo, Claim)> = transport.iter().map(|(c, cl)| (*c, *cl)).collect();
    for (cargo, claim) in claimed {
        let Some(agent) = agents.get_mut(&claim.carrier) else {
            continue;
        };
        let Some(task) = agent.task.as_mut() else {
            continue;
        };
        if let TaskKind::Transport { manifest } = &mut task.kind {
            if !manifest.iter().any(|s| s.cargo == cargo) {
                manifest.push(Shipment {
                    cargo,
                    destination: claim.destination,
                });
            }
        }
    }
    Ok(())
}

fn agent_record(agent: &Agent) -> AgentRecord {
    let task = agent.task.as_ref().and_then(|t| {
        let keep = !t.is_one_time()
            && matches!(t.state, TaskState::Unvalidated | TaskState::Active);
        keep.then(|| t.kind.clone())
    });
    AgentRecord {
        unit: agent.unit,
        task,
    }
}

/// One JSON object per line, the same shape the world flusher writes.
fn write_jsonl<T: Serialize>(path: &Path, items: impl Iterator<Item = T>) -> io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    for item in items {
        serde_json::to_writer(&mut writer, &item)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, SnapshotError> {
    let text = fs::read_to_string(path)?;
    serde_json::from_str(&text).map_err(|source| SnapshotError::Parse {
        path: path.to_path_buf(),
        line: 1,
        source,
    })
}

fn read_jsonl<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, SnapshotError> {
    let reader = BufReader::new(File::open(path)?);
    let mut out = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str(&line) {
            Ok(item) => out.push(item),
            Err(source) => {
                return Err(SnapshotError::Parse {
                    path: path.to_path_buf(),
                    line: index + 1,
                    source,
                });
            }
        }
    }
    Ok(out)
}
