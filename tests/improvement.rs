//! Improvement planning and the pioneers who work the plans.

mod common;

use common::open_frontier;
use frontier_ai::model::{ImprovementKind, UnitKind, UnitRole};
use frontier_ai::scenario::Scenario;
use frontier_ai::testutil::{has_task, planner_for, run_turn};
use frontier_ai::{Coord, TaskKind};

#[test]
fn plans_ring_the_colony_fields() {
    let mut f = open_frontier();
    let mut planner = planner_for(f.crown, 5);
    let home = f.world.settlement(f.colony).unwrap().coord;

    run_turn(&mut f.world, &mut planner);

    let plans: Vec<_> = planner.plans().collect();
    assert_eq!(plans.len(), 8, "one plan per worked tile around the colony");
    for p in &plans {
        let target = p.target.expect("a fresh plan always has a target");
        assert_eq!(home.distance(target), 1);
        assert_eq!(p.kind, Some(ImprovementKind::Plow));
        assert!(p.validate(&f.world));
    }
}

#[test]
fn a_pioneer_equips_and_plows_the_home_fields() {
    let mut s = Scenario::landlocked(3, 3);
    let crown = s.colonial("Crown", Coord::new(0, 0));
    let colony = s.colony(crown, "Hearth", Coord::new(1, 1));
    let pioneer = s.unit_in(crown, UnitKind::HardyPioneer, colony);
    s.gold(crown, 100);
    let mut world = s.finish();
    world.settlement_mut(colony).unwrap().defenders_wanted = 0;
    let mut planner = planner_for(crown, 5);

    for _ in 0..8 {
        run_turn(&mut world, &mut planner);
    }

    assert_eq!(world.unit(pioneer).unwrap().role, UnitRole::Pioneer, "tools were bought");
    assert!(
        world.tiles.values().any(|t| t.has_improvement(ImprovementKind::Plow)),
        "eight turns is time enough to finish at least one field"
    );
}

#[test]
fn a_vanished_plan_is_dropped_and_the_pioneer_reassigned() {
    let mut f = open_frontier();
    f.world.settlement_mut(f.colony).unwrap().defenders_wanted = 0;
    let pioneer = f
        .world
        .add_unit(f.crown, UnitKind::HardyPioneer, frontier_ai::Location::Settlement(f.colony));
    {
        let u = f.world.unit_mut(pioneer).unwrap();
        u.role = UnitRole::Pioneer;
        u.role_count = 5;
    }
    let mut planner = planner_for(f.crown, 5);

    run_turn(&mut f.world, &mut planner);
    assert!(has_task(&planner, pioneer, |k| matches!(k, TaskKind::Pioneer { .. })));

    // Someone plowed the field overnight; the plan it pointed at is gone.
    let target = planner
        .plans()
        .find(|p| p.executor.is_some())
        .and_then(|p| p.target)
        .expect("the pioneer's plan has a target");
    f.world
        .tiles
        .get_mut(&target)
        .unwrap()
        .improvements
        .push(ImprovementKind::Plow);

    let log = run_turn(&mut f.world, &mut planner);

    assert!(log.mentions("plan-gone"), "log was: {log}");
    assert!(
        has_task(&planner, pioneer, |k| matches!(k, TaskKind::Pioneer { .. })),
        "seven fields still want plowing"
    );
}
