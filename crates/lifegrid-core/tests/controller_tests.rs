//! Integration tests for [`SimulationController`] lifecycle behavior.
//!
//! These drive the real background run task on the tokio runtime, so they
//! wait on the stats channel rather than sleeping for fixed durations.

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::time::Duration;

use lifegrid_core::controller::{ControllerError, SimulationController};
use lifegrid_core::step::StepMode;
use lifegrid_types::{ControllerState, RawRules, RuleSet, StepStats};
use lifegrid_world::{Grid, Pattern, place};
use tokio::sync::watch;

fn blinker_controller(step_interval_ms: u64) -> SimulationController {
    let mut grid = Grid::new(8, 8).unwrap();
    place(&mut grid, Pattern::Blinker, 2, 3).unwrap();
    SimulationController::new(grid, RuleSet::classic(), StepMode::Parallel, step_interval_ms)
}

/// Wait until the published step count reaches `target`.
async fn wait_for_step(rx: &mut watch::Receiver<StepStats>, target: u64) {
    tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            if rx.borrow_and_update().step_count >= target {
                return;
            }
            rx.changed().await.unwrap();
        }
    })
    .await
    .unwrap();
}

#[tokio::test]
async fn pause_and_resume_keep_the_step_count() {
    let mut controller = blinker_controller(1);
    let mut rx = controller.subscribe();

    controller.start();
    assert_eq!(controller.state(), ControllerState::Running);
    wait_for_step(&mut rx, 3).await;
    controller.stop().await.unwrap();
    assert_eq!(controller.state(), ControllerState::Paused);

    let paused = controller.stats().await;
    assert!(paused.step_count >= 3);
    // A blinker keeps three live cells in both phases.
    assert_eq!(paused.alive_count, 3);

    tokio::time::sleep(Duration::from_millis(20)).await;
    assert_eq!(controller.stats().await.step_count, paused.step_count);

    // The run loop steps once immediately, then sleeps. A long interval
    // makes that first step the only one before the stop.
    controller.set_step_interval_ms(200);
    rx.borrow_and_update();
    controller.start();
    tokio::time::timeout(Duration::from_secs(5), rx.changed())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(
        rx.borrow_and_update().step_count,
        paused.step_count.saturating_add(1)
    );
    controller.stop().await.unwrap();

    let resumed = controller.stats().await;
    assert_eq!(resumed.step_count, paused.step_count.saturating_add(1));
    assert_eq!(resumed.alive_count, 3);
}

#[tokio::test]
async fn reset_is_idempotent() {
    let mut controller = blinker_controller(1);
    let mut rx = controller.subscribe();

    controller.start();
    wait_for_step(&mut rx, 2).await;

    controller.reset().await.unwrap();
    controller.reset().await.unwrap();

    assert_eq!(controller.state(), ControllerState::Idle);
    let stats = controller.stats().await;
    assert_eq!(stats.step_count, 0);
    assert_eq!(stats.alive_count, 0);
    assert_eq!(*controller.subscribe().borrow(), stats);
    assert!(controller.snapshot().await.alive_positions().is_empty());
}

#[tokio::test]
async fn reset_keeps_rules() {
    let mut controller = blinker_controller(0);
    let rules = RuleSet::classic().with_fade(true);
    controller.set_rules(rules).await;
    controller.reset().await.unwrap();
    assert_eq!(controller.rules().await, rules);
}

#[tokio::test]
async fn start_while_running_is_a_noop() {
    let mut controller = blinker_controller(1);
    let mut rx = controller.subscribe();

    controller.start();
    controller.start();
    wait_for_step(&mut rx, 2).await;
    assert_eq!(controller.state(), ControllerState::Running);

    controller.stop().await.unwrap();
    assert_eq!(controller.state(), ControllerState::Paused);
    let stopped_at = controller.stats().await.step_count;

    tokio::time::sleep(Duration::from_millis(20)).await;
    assert_eq!(controller.stats().await.step_count, stopped_at);
}

#[tokio::test]
async fn malformed_rules_do_not_start() {
    let mut controller = blinker_controller(0);
    let raw = RawRules {
        birth_count: "3.5".to_owned(),
        ..RawRules::from(&RuleSet::classic())
    };

    let err = controller.start_with_rules(&raw).await.unwrap_err();

    assert!(matches!(err, ControllerError::Rules { .. }));
    assert_eq!(controller.state(), ControllerState::Idle);
    assert_eq!(controller.stats().await.step_count, 0);
}

#[tokio::test]
async fn start_with_rules_installs_them() {
    let mut controller = blinker_controller(1);
    let raw = RawRules {
        fade_enabled: true,
        ..RawRules::from(&RuleSet::classic())
    };

    controller.start_with_rules(&raw).await.unwrap();
    controller.stop().await.unwrap();

    assert_eq!(controller.rules().await, RuleSet::classic().with_fade(true));
}

#[tokio::test]
async fn toggle_while_running_lands_between_steps() {
    let mut grid = Grid::new(6, 6).unwrap();
    grid.set_alive(0, 0, true).unwrap();
    let mut controller =
        SimulationController::new(grid, RuleSet::classic(), StepMode::Serial, 200);
    let mut rx = controller.subscribe();

    controller.start();
    // First step runs at once; the loop then sleeps long enough for the
    // toggle and the stop to land before a second step.
    wait_for_step(&mut rx, 1).await;
    let now_alive = controller.toggle(5, 5).await.unwrap();
    assert!(now_alive);
    controller.stop().await.unwrap();

    assert_eq!(controller.stats().await.step_count, 1);
    assert!(controller.is_alive(5, 5).await.unwrap());
    // The lone seed cell died on the first step.
    assert!(!controller.is_alive(0, 0).await.unwrap());
}

#[tokio::test]
async fn step_once_is_rejected_while_running() {
    let mut controller = blinker_controller(10);
    controller.start();
    let err = controller.step_once().await.unwrap_err();
    assert!(matches!(err, ControllerError::AlreadyRunning));
    controller.stop().await.unwrap();
}
