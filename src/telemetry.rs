//! Periodic flight reports.
//!
//! Every few ticks the player ship's state is logged as one JSON line, and
//! the app exits once the flight plan has been flown.

use bevy::prelude::*;
use flight_control::{EngineStatus, FlightSet, MotionState, Pose};
use serde::Serialize;

use crate::ship::{FlightPlan, PlayerShip};

#[derive(Default)]
pub struct TelemetryPlugin;

impl Plugin for TelemetryPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(FixedUpdate, report_telemetry.after(FlightSet));
    }
}

#[derive(Debug, Serialize)]
struct TelemetrySnapshot<'a> {
    tick: u64,
    pose: &'a Pose,
    translation_momentum: na::Vector2<f64>,
    rotation_momentum: f64,
    speed: f64,
    translation_speed_max: f64,
    status: EngineStatus,
}

impl<'a> TelemetrySnapshot<'a> {
    fn new(tick: u64, pose: &'a Pose, motion: &MotionState, status: EngineStatus) -> Self {
        TelemetrySnapshot {
            tick,
            pose,
            translation_momentum: motion.translation_momentum,
            rotation_momentum: motion.rotation_momentum,
            speed: motion.speed(),
            translation_speed_max: motion.translation_speed_max(),
            status,
        }
    }
}

fn report_telemetry(
    plan: Res<FlightPlan>,
    mut last_reported: Local<Option<u64>>,
    ships: Query<(&Pose, &MotionState, &EngineStatus), With<PlayerShip>>,
    mut exit: MessageWriter<AppExit>,
) {
    let tick = plan.tick();
    if *last_reported == Some(tick) {
        return;
    }
    let due = plan.report_every() > 0 && tick % plan.report_every() == 0;
    if !due && !plan.is_finished() {
        return;
    }
    *last_reported = Some(tick);

    for (pose, motion, status) in ships.iter() {
        let snapshot = TelemetrySnapshot::new(tick, pose, motion, *status);
        match serde_json::to_string(&snapshot) {
            Ok(line) => info!("{line}"),
            Err(err) => warn!("tick {tick}: cannot encode telemetry: {err}"),
        }
    }

    if plan.is_finished() {
        info!("flight plan complete after {tick} ticks");
        exit.write(AppExit::Success);
    }
}
