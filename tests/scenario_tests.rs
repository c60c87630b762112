//! End-to-end control-cycle scenarios.
//!
//! Road layout used throughout (x, y in meters):
//!
//! ```text
//!   A(0,0) --- B(10,0) --- X(15,0) --- C(20,0)
//!                 \                    /
//!                  `----- Y(15,6) ----'      (detour, optional)
//! ```

use chrono::{DateTime, TimeZone, Utc};
use nav_commander::{
    BehaviorState, CommanderBuilder, CommanderConfig, CommanderSnapshot, ElementId, Mission,
    NavigatorState, Point, RoadGraph, RoadNetwork, Route, Severity, Zone, ZonePerimeterList,
};

const A: ElementId = ElementId(1);
const B: ElementId = ElementId(2);
const X: ElementId = ElementId(3);
const Y: ElementId = ElementId(4);
const C: ElementId = ElementId(5);

fn network(with_detour: bool) -> RoadNetwork {
    let mut net = RoadNetwork::new();
    net.add_waypoint(A, Point::new(0.0, 0.0))
        .add_waypoint(B, Point::new(10.0, 0.0))
        .add_waypoint(X, Point::new(15.0, 0.0))
        .add_waypoint(Y, Point::new(15.0, 6.0))
        .add_waypoint(C, Point::new(20.0, 0.0));
    net.connect_chain(&[A, B, X, C]).unwrap();
    if with_detour {
        net.connect_chain(&[B, Y, C]).unwrap();
    }
    net
}

fn at(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
}

fn on(element: ElementId, net: &RoadNetwork, secs: i64) -> NavigatorState {
    let position = net.position(element).unwrap();
    NavigatorState::at(element, position, at(secs))
}

fn ids(route: &Route) -> Vec<ElementId> {
    route.elements().collect()
}

#[test]
fn mission_start_goes_then_runs_after_first_checkpoint() {
    let net = network(false);
    let mut commander = CommanderBuilder::new()
        .graph(&net)
        .mission(Mission::new(vec![A, B, C]))
        .build()
        .unwrap();

    let order = commander.command(&on(A, &net, 0));
    assert_eq!(order.behavior, BehaviorState::Go);
    assert_eq!(order.route.first().map(|w| w.id), Some(A));
    assert!(order.route.leads_to(A, B));
    assert_eq!(commander.goal(), Some(B));
    assert_eq!(commander.goal2(), Some(C));

    let order = commander.command(&on(B, &net, 1));
    assert_eq!(order.behavior, BehaviorState::Run);
    assert_eq!(commander.goal(), Some(C));
    assert_eq!(commander.goal2(), None);
    assert_eq!(ids(&order.route), vec![B, X, C]);
}

#[test]
fn first_route_stops_at_goal_without_lookahead() {
    let net = network(false);
    let mut commander = CommanderBuilder::new()
        .graph(&net)
        .mission(Mission::new(vec![A, B, C]))
        .config(CommanderConfig {
            extend_to_goal2: false,
            ..CommanderConfig::default()
        })
        .build()
        .unwrap();

    let order = commander.command(&on(A, &net, 0));
    assert_eq!(ids(&order.route), vec![A, B]);
}

#[test]
fn blockage_with_alternate_path_keeps_running() {
    let net = network(true);
    let mut commander = CommanderBuilder::new()
        .graph(&net)
        .mission(Mission::new(vec![B, C]))
        .build()
        .unwrap();

    commander.command(&on(A, &net, 0));
    let order = commander.command(&on(B, &net, 1));
    assert_eq!(order.behavior, BehaviorState::Run);
    assert_eq!(ids(&order.route), vec![B, X, C]);

    commander.record_blockage(X, Severity::Full, at(2));
    let order = commander.command(&on(B, &net, 2));
    assert_eq!(order.behavior, BehaviorState::Run);
    assert_eq!(ids(&order.route), vec![B, Y, C]);
    assert!(!order.route.contains(X));
    assert_eq!(commander.replan_attempts(), 0);
}

#[test]
fn blockage_without_alternate_aborts_after_max_attempts() {
    let net = network(false);
    let mut commander = CommanderBuilder::new()
        .graph(&net)
        .mission(Mission::new(vec![B, C]))
        .config(CommanderConfig {
            max_replan_attempts: 3,
            ..CommanderConfig::default()
        })
        .build()
        .unwrap();

    commander.command(&on(A, &net, 0));
    assert_eq!(commander.command(&on(B, &net, 1)).behavior, BehaviorState::Run);
    commander.record_blockage(X, Severity::Full, at(1));

    let order = commander.command(&on(B, &net, 2));
    assert_eq!(order.behavior, BehaviorState::Pause);
    assert!(order.is_stop());
    assert_eq!(commander.replan_attempts(), 1);

    let order = commander.command(&on(B, &net, 3));
    assert_eq!(order.behavior, BehaviorState::Pause);
    assert_eq!(commander.replan_attempts(), 2);

    let order = commander.command(&on(B, &net, 4));
    assert_eq!(order.behavior, BehaviorState::Abort);
    assert!(order.route.is_empty());
    assert_eq!(order.speed_limit, 0.0);
    assert_eq!(commander.replan_attempts(), 3);

    let order = commander.command(&on(B, &net, 5));
    assert_eq!(order.behavior, BehaviorState::Abort);
    assert_eq!(commander.replan_attempts(), 3);
}

#[test]
fn pause_request_while_running_stops_the_vehicle() {
    let net = network(false);
    let mut commander = CommanderBuilder::new()
        .graph(&net)
        .mission(Mission::new(vec![B, C]))
        .build()
        .unwrap();

    commander.command(&on(A, &net, 0));
    assert_eq!(commander.command(&on(B, &net, 1)).behavior, BehaviorState::Run);

    let order = commander.command(&on(B, &net, 2).with_pause());
    assert_eq!(order.behavior, BehaviorState::Pause);
    assert!(order.route.is_empty());
    assert_eq!(order.speed_limit, 0.0);

    let order = commander.command(&on(B, &net, 3));
    assert_eq!(order.behavior, BehaviorState::Run);
    assert_eq!(ids(&order.route), vec![B, X, C]);
}

#[test]
fn resume_without_route_goes_and_replans() {
    let net = network(false);
    let mut commander = CommanderBuilder::new()
        .graph(&net)
        .mission(Mission::new(vec![C]))
        .build()
        .unwrap();

    let order = commander.command(&on(A, &net, 0).with_pause());
    assert_eq!(order.behavior, BehaviorState::Pause);
    assert!(commander.route().is_empty());

    let order = commander.command(&on(A, &net, 1));
    assert_eq!(order.behavior, BehaviorState::Go);
    assert_eq!(ids(&order.route), vec![A, B, X, C]);
}

#[test]
fn fault_aborts_in_the_same_cycle() {
    let net = network(true);
    let mut commander = CommanderBuilder::new()
        .graph(&net)
        .mission(Mission::new(vec![C]))
        .build()
        .unwrap();

    commander.command(&on(A, &net, 0));
    commander.record_blockage(B, Severity::Full, at(1));
    let order = commander.command(&on(A, &net, 1).with_fault().with_pause());
    assert_eq!(order.behavior, BehaviorState::Abort);
    assert!(order.is_stop());

    let order = commander.command(&on(A, &net, 2));
    assert_eq!(order.behavior, BehaviorState::Abort);
}

#[test]
fn empty_mission_quits_immediately() {
    let net = network(false);
    let mut commander = CommanderBuilder::new()
        .graph(&net)
        .mission(Mission::default())
        .build()
        .unwrap();

    let order = commander.command(&on(A, &net, 0));
    assert_eq!(order.behavior, BehaviorState::Quit);
    assert!(order.is_stop());
}

#[test]
fn final_checkpoint_completes_the_mission() {
    let net = network(false);
    let mut commander = CommanderBuilder::new()
        .graph(&net)
        .mission(Mission::new(vec![B, C]))
        .build()
        .unwrap();

    commander.command(&on(A, &net, 0));
    commander.command(&on(B, &net, 1));
    commander.command(&on(X, &net, 2));
    let order = commander.command(&on(C, &net, 3));
    assert_eq!(order.behavior, BehaviorState::Quit);
    assert!(order.is_stop());
    assert!(commander.route().is_empty());
    assert!(commander.checkpoints().is_exhausted());

    let path: Vec<_> = commander.history().get_path().into_iter().copied().collect();
    assert_eq!(
        path,
        vec![
            BehaviorState::Initialize,
            BehaviorState::Go,
            BehaviorState::Run,
            BehaviorState::Quit
        ]
    );
}

#[test]
fn zone_speed_limit_applies_on_first_segment() {
    let net = network(false);
    let zones = ZonePerimeterList::from(vec![Zone::new(
        "crosswalk",
        vec![
            Point::new(3.0, -2.0),
            Point::new(6.0, -2.0),
            Point::new(6.0, 2.0),
            Point::new(3.0, 2.0),
        ],
    )
    .with_speed_limit(2.5)]);
    let mut commander = CommanderBuilder::new()
        .graph(&net)
        .zones(&zones)
        .mission(Mission::new(vec![C]))
        .build()
        .unwrap();

    assert_eq!(commander.command(&on(A, &net, 0)).speed_limit, 2.5);
    let order = commander.command(&on(B, &net, 1));
    assert_eq!(order.speed_limit, CommanderConfig::default().speed_limit);
}

#[test]
fn impassable_zone_forces_detour() {
    let net = network(true);
    let zones = ZonePerimeterList::from(vec![Zone::new(
        "roadworks",
        vec![
            Point::new(14.0, -1.0),
            Point::new(16.0, -1.0),
            Point::new(16.0, 1.0),
            Point::new(14.0, 1.0),
        ],
    )
    .impassable()]);
    let mut commander = CommanderBuilder::new()
        .graph(&net)
        .zones(&zones)
        .mission(Mission::new(vec![C]))
        .build()
        .unwrap();

    let order = commander.command(&on(A, &net, 0));
    assert_eq!(ids(&order.route), vec![A, B, Y, C]);
}

#[test]
fn snapshot_resume_continues_the_mission() {
    let net = network(false);
    let mut commander = CommanderBuilder::new()
        .graph(&net)
        .mission(Mission::new(vec![B, C]))
        .build()
        .unwrap();
    commander.command(&on(A, &net, 0));
    commander.command(&on(B, &net, 1));

    let json = commander.snapshot(at(1)).to_json().unwrap();
    drop(commander);

    let snapshot = CommanderSnapshot::from_json(&json).unwrap();
    let mut resumed = CommanderBuilder::new()
        .graph(&net)
        .resume_from(snapshot)
        .build()
        .unwrap();
    assert_eq!(resumed.behavior(), BehaviorState::Run);
    assert_eq!(resumed.goal(), Some(C));

    let order = resumed.command(&on(X, &net, 2));
    assert_eq!(order.behavior, BehaviorState::Run);
    assert_eq!(ids(&order.route), vec![X, C]);
}
