//! Tracker systems (polling + apply).

use bevy::prelude::*;
use std::sync::mpsc::TryRecvError;

use crate::camera::{ViewConfig, compute_initial_view};
use crate::tracker::fetcher::start_position_worker;
use crate::tracker::types::{
    MarkerConfig, PollSchedule, PositionChannels, PositionCommand, PositionResult, TrackedObject,
    TrackerConfig, TrackerContext,
};

pub fn setup_position_worker(mut commands: Commands, config: Res<TrackerConfig>) {
    let channels = start_position_worker(&config);
    info!(
        "[INIT] ISS position worker started (endpoint={}, every {:?})",
        config.endpoint, config.poll_interval
    );
    commands.insert_resource(channels);
    commands.insert_resource(PollSchedule::new(config.poll_interval));
}

/// Spawn the single tracked marker at the context's current position.
pub fn spawn_tracked_object(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    marker: Res<MarkerConfig>,
    ctx: Res<TrackerContext>,
) {
    commands.spawn((
        Mesh3d(meshes.add(Sphere::new(marker.radius_km).mesh().uv(32, 18))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: marker.color,
            emissive: marker.color.to_linear() * marker.emissive_intensity,
            ..default()
        })),
        Transform::from_translation(ctx.position.to_world_km()),
        TrackedObject,
        Name::new(marker.name.clone()),
    ));
}

pub fn poll_position(
    time: Res<Time>,
    config: Res<TrackerConfig>,
    schedule: Option<ResMut<PollSchedule>>,
    channels: Option<Res<PositionChannels>>,
) {
    let (Some(mut schedule), Some(channels)) = (schedule, channels) else {
        return;
    };

    // A stalled frame that spans several intervals still triggers a single request.
    if schedule.tick(time.delta()) == 0 {
        return;
    }

    if let Err(err) = channels.cmd_tx.send(PositionCommand::Fetch {
        url: config.endpoint.clone(),
        altitude_m: config.altitude_m,
    }) {
        error!("[ISS FETCH] failed to queue fetch: {}", err);
    }
}

pub fn apply_position_results(
    view_config: Res<ViewConfig>,
    mut ctx: ResMut<TrackerContext>,
    channels: Option<Res<PositionChannels>>,
    mut q_tracked: Query<&mut Transform, With<TrackedObject>>,
) {
    let Some(channels) = channels else { return };
    let Ok(guard) = channels.res_rx.lock() else {
        return;
    };

    loop {
        let msg = match guard.try_recv() {
            Ok(msg) => msg,
            Err(TryRecvError::Empty) => break,
            Err(TryRecvError::Disconnected) => {
                if !ctx.worker_stopped {
                    error!("[ISS FETCH] position worker stopped; no further updates");
                    ctx.worker_stopped = true;
                }
                break;
            }
        };
        ctx.first_fetch_done = true;
        match msg {
            PositionResult::Position {
                position,
                fetched_at,
            } => {
                ctx.position = position;
                ctx.last_update = Some(fetched_at);

                let world = position.to_world_km();
                for mut transform in q_tracked.iter_mut() {
                    transform.translation = world;
                }

                if ctx.view.claim_initial_view() {
                    let placement = compute_initial_view(&position, &view_config);
                    info!(
                        "[CAMERA] first fix at {}; placing camera ({:?})",
                        position.format_lat_lon(),
                        view_config.heuristic
                    );
                    ctx.pending_view = Some(placement);
                }
            }
            PositionResult::Error { error } => {
                error!("[ISS FETCH] could not fetch ISS position: {}", error);
            }
        }
    }
}
