//! Which task an idle unit picks up: role gates, garrison quotas and the
//! relative pull of the different callings.

mod common;

use common::open_frontier;
use frontier_ai::model::{UnitKind, UnitRole};
use frontier_ai::testutil::{has_task, manifest_of, planner_for, run_turn, task_of};
use frontier_ai::{Coord, Location, TaskKind};

#[test]
fn a_free_colonist_sets_out_to_found_a_settlement() {
    let mut f = open_frontier();
    let settler = f.colonist();
    let mut planner = planner_for(f.crown, 7);

    run_turn(&mut f.world, &mut planner);

    assert!(
        has_task(&planner, settler, |k| matches!(k, TaskKind::BuildSettlement { .. })),
        "expected a founding party, got {:?}",
        task_of(&planner, settler)
    );
}

#[test]
fn soldiers_split_between_garrison_and_frontier() {
    let mut f = open_frontier();
    let posting = Location::Settlement(f.colony);
    let s1 = f.world.add_unit(f.crown, UnitKind::VeteranSoldier, posting);
    let s2 = f.world.add_unit(f.crown, UnitKind::VeteranSoldier, posting);
    let s3 = f.world.add_unit(f.crown, UnitKind::VeteranSoldier, posting);
    let s4 = f.world.add_unit(f.crown, UnitKind::VeteranSoldier, posting);
    let mut planner = planner_for(f.crown, 7);

    run_turn(&mut f.world, &mut planner);

    // The empty garrison shouts loudest, so the first soldier stays. With
    // one post filled the founding run pays better, then the last garrison
    // slot, and the fourth man picks up pioneering.
    assert!(has_task(&planner, s1, |k| {
        matches!(k, TaskKind::Defend { settlement } if *settlement == f.colony)
    }));
    assert!(has_task(&planner, s2, |k| matches!(k, TaskKind::BuildSettlement { .. })));
    assert!(has_task(&planner, s3, |k| {
        matches!(k, TaskKind::Defend { settlement } if *settlement == f.colony)
    }));
    assert!(
        has_task(&planner, s4, |k| matches!(k, TaskKind::Pioneer { .. })),
        "expected the spare soldier on improvement duty, got {:?}",
        task_of(&planner, s4)
    );
}

#[test]
fn a_wish_outranks_the_garrison() {
    let mut f = open_frontier();
    let veteran = f
        .world
        .add_unit(f.crown, UnitKind::VeteranSoldier, Location::Tile(Coord::new(5, 5)));
    let wish = f.world.add_wish(f.colony, UnitKind::VeteranSoldier, 40);
    let mut planner = planner_for(f.crown, 7);

    run_turn(&mut f.world, &mut planner);

    assert!(has_task(&planner, veteran, |k| {
        matches!(k, TaskKind::WishRealization { settlement, wish: w }
            if *settlement == f.colony && *w == wish)
    }));
}

#[test]
fn specialists_keep_their_callings() {
    let mut f = open_frontier();
    let scout = f
        .world
        .add_unit(f.crown, UnitKind::Colonist, Location::Tile(Coord::new(1, 8)));
    f.world.unit_mut(scout).unwrap().role = UnitRole::Scout;
    let preacher = f
        .world
        .add_unit(f.crown, UnitKind::Colonist, Location::Tile(Coord::new(8, 1)));
    f.world.unit_mut(preacher).unwrap().role = UnitRole::Missionary;
    let mut planner = planner_for(f.crown, 7);

    run_turn(&mut f.world, &mut planner);

    assert!(has_task(&planner, scout, |k| {
        matches!(k, TaskKind::Scout { camp } if *camp == f.camp)
    }));
    assert!(has_task(&planner, preacher, |k| {
        matches!(k, TaskKind::Missionary { camp } if *camp == f.camp)
    }));
}

#[test]
fn treasure_heads_for_the_counting_house() {
    let mut f = open_frontier();
    let train = f
        .world
        .add_unit(f.crown, UnitKind::TreasureTrain, Location::Tile(Coord::new(6, 6)));
    f.world.unit_mut(train).unwrap().treasure = 300;
    let mut planner = planner_for(f.crown, 7);

    run_turn(&mut f.world, &mut planner);

    assert!(has_task(&planner, train, |k| matches!(k, TaskKind::CashInTreasure)));
}

#[test]
fn a_privateer_prowls_rather_than_hauls() {
    let mut f = open_frontier();
    let raider = f
        .world
        .add_unit(f.crown, UnitKind::Privateer, Location::Tile(Coord::new(0, 4)));
    let mut planner = planner_for(f.crown, 7);

    run_turn(&mut f.world, &mut planner);

    assert!(has_task(&planner, raider, |k| matches!(k, TaskKind::PrivateerRaid { .. })));
}

#[test]
fn an_idle_caravel_reports_for_freight_duty() {
    let mut f = open_frontier();
    let ship = f
        .world
        .add_unit(f.crown, UnitKind::Caravel, Location::Tile(Coord::new(0, 5)));
    let mut planner = planner_for(f.crown, 7);

    run_turn(&mut f.world, &mut planner);

    assert!(has_task(&planner, ship, |k| matches!(k, TaskKind::Transport { .. })));
    assert!(manifest_of(&planner, ship).is_empty(), "no cargo was claimed yet");
}

#[test]
fn the_first_brave_holds_the_camp() {
    let mut f = open_frontier();
    let mut planner = planner_for(f.tribe, 3);

    run_turn(&mut f.world, &mut planner);

    assert!(has_task(&planner, f.brave, |k| {
        matches!(k, TaskKind::Defend { settlement } if *settlement == f.camp)
    }));
}

#[test]
fn a_stocked_camp_sends_gifts() {
    let mut f = open_frontier();
    let giver = f.second_brave();
    let mut planner = planner_for(f.tribe, 3);

    run_turn(&mut f.world, &mut planner);

    assert!(has_task(&planner, giver, |k| {
        matches!(k, TaskKind::BringGift { colony, .. } if *colony == f.colony)
    }));
}

#[test]
fn an_empty_larder_demands_tribute_instead() {
    let mut f = open_frontier();
    let collector = f.second_brave();
    f.world.settlement_mut(f.camp).unwrap().stock = 0;
    let mut planner = planner_for(f.tribe, 3);

    run_turn(&mut f.world, &mut planner);

    assert!(has_task(&planner, collector, |k| {
        matches!(k, TaskKind::DemandTribute { colony, .. } if *colony == f.colony)
    }));
}
