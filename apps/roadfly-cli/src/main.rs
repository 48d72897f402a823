use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use glam::Vec3;
use roadfly_common::{Aabb, SegmentTransform};
use roadfly_input::{InputQueue, MoveDirection};
use roadfly_motion::{
    BoundaryConstraint, Controls, ControlsConfig, FirstPersonCamera, HeadlessGrab,
    PointerLockControls, SharedBounds,
};
use roadfly_render::{DebugTextRenderer, RenderView, Renderer};
use roadfly_scene::{RoadAnimator, RoadModel, RoadSegment, SegmentMesh};
use serde::Serialize;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "roadfly-cli", about = "Headless tooling for roadfly")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print crate versions and default constants
    Info,
    /// Load a road model and list its segments and bounds
    Inspect {
        /// Road model (glTF or GLB)
        #[arg(long)]
        model: PathBuf,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Run the per-frame pipeline without a window
    Simulate {
        /// Road model; a straight built-in road is used when omitted
        #[arg(long)]
        model: Option<PathBuf>,
        /// Direction to hold for the whole run (up, down, left, right)
        #[arg(long = "hold")]
        hold: Vec<MoveDirection>,
        #[arg(long, default_value = "3")]
        seconds: f64,
        #[arg(long, default_value = "60")]
        fps: u32,
        /// Controls configuration (YAML)
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

#[derive(Serialize)]
struct SegmentReport {
    name: String,
    transform: SegmentTransform,
    vertices: usize,
    triangles: usize,
}

#[derive(Serialize)]
struct Inspection {
    position: Vec3,
    bounds: Option<Aabb>,
    segments: Vec<SegmentReport>,
}

impl Inspection {
    fn of(road: &RoadModel) -> Self {
        let bounds = road.world_bounds();
        Self {
            position: road.position,
            bounds: (!bounds.is_empty()).then_some(bounds),
            segments: road
                .segments()
                .iter()
                .enumerate()
                .map(|(i, s)| SegmentReport {
                    name: s.label(i),
                    transform: *s.initial(),
                    vertices: s.mesh.vertex_count(),
                    triangles: s.mesh.triangle_count(),
                })
                .collect(),
        }
    }
}

/// Ten flat tiles one unit apart; with the group offset they span world
/// z = 0.5 down to z = -9.5, so the camera starts on the road.
fn straight_road() -> RoadModel {
    let tile = SegmentMesh {
        positions: vec![
            Vec3::new(-1.0, 0.0, -0.5),
            Vec3::new(1.0, 0.0, -0.5),
            Vec3::new(1.0, 0.0, 0.5),
            Vec3::new(-1.0, 0.0, 0.5),
        ],
        normals: vec![Vec3::Y; 4],
        indices: vec![0, 2, 1, 0, 3, 2],
    };
    let segments = (0..10)
        .map(|i| {
            RoadSegment::new(
                Some(format!("tile_{i}")),
                SegmentTransform {
                    position: Vec3::new(0.0, 0.0, 5.0 - i as f32),
                    ..SegmentTransform::default()
                },
                tile.clone(),
            )
        })
        .collect();
    RoadModel::new(segments)
}

struct SimulationReport {
    frames: u32,
    position: Vec3,
    velocity: Vec3,
    road: RoadModel,
    camera: FirstPersonCamera,
}

fn simulate(
    mut road: RoadModel,
    config: ControlsConfig,
    hold: &[MoveDirection],
    seconds: f64,
    fps: u32,
) -> anyhow::Result<SimulationReport> {
    if fps == 0 {
        bail!("--fps must be positive");
    }
    let bounds = SharedBounds::default();
    bounds.set(Some(road.world_bounds()));

    let mut source = InputQueue::new();
    let camera = PointerLockControls::new(FirstPersonCamera::default(), HeadlessGrab);
    let mut controls = Controls::new(camera, &mut source, config)
        .with_constraint(BoundaryConstraint::new(bounds));
    controls.lock();

    for direction in hold {
        let key = controls
            .bindings
            .keys_for(*direction)
            .first()
            .with_context(|| format!("no key bound to {direction}"))?
            .clone();
        source.key_down(key);
    }

    let animator = RoadAnimator::default();
    let frames = (seconds * fps as f64).round() as u32;
    for frame in 0..=frames {
        let t_ms = frame as f64 * 1000.0 / fps as f64;
        controls.pump(&mut source);
        controls.update(t_ms);
        animator.animate(&mut road, controls.position(), t_ms);

        if frame % fps == 0 {
            let p = controls.position();
            tracing::info!(
                "t={:.2}s pos=({:.3}, {:.3}, {:.3})",
                t_ms / 1000.0,
                p.x,
                p.y,
                p.z
            );
        }
    }

    let report = SimulationReport {
        frames,
        position: controls.position(),
        velocity: controls.velocity(),
        camera: *controls.camera().camera(),
        road,
    };
    controls.destroy(&mut source);
    Ok(report)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            let config = ControlsConfig::default();
            let animator = RoadAnimator::default();
            println!("roadfly-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("input: {}", roadfly_input::crate_info());
            println!("motion: {}", roadfly_motion::crate_info());
            println!("scene: {}", roadfly_scene::crate_info());
            println!("assets: {}", roadfly_assets::crate_info());
            println!("render: {}", roadfly_render::crate_info());
            println!("controls: step={} damping={}", config.step, config.damping);
            println!(
                "animator: rise={} spread={} tilt_limit={} time_scale={}",
                animator.rise, animator.spread, animator.tilt_limit, animator.time_scale
            );
            let offset = RoadModel::DEFAULT_OFFSET;
            println!("road offset: ({}, {}, {})", offset.x, offset.y, offset.z);
        }
        Commands::Inspect { model, json } => {
            let road = roadfly_assets::load_road(&model)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&Inspection::of(&road))?);
            } else {
                let view = RenderView::default();
                print!("{}", DebugTextRenderer::new().render(&road, &view));
            }
        }
        Commands::Simulate {
            model,
            hold,
            seconds,
            fps,
            config,
        } => {
            let road = match &model {
                Some(path) => roadfly_assets::load_road(path)?,
                None => straight_road(),
            };
            let config = match &config {
                Some(path) => ControlsConfig::load(path)?,
                None => ControlsConfig::default(),
            };
            let held: Vec<String> = hold.iter().map(ToString::to_string).collect();
            println!(
                "Simulating {seconds}s at {fps} fps, holding [{}]",
                held.join(", ")
            );

            let report = simulate(road, config, &hold, seconds, fps)?;
            println!(
                "Frames: {}, final velocity=({:.3}, {:.3})",
                report.frames, report.velocity.x, report.velocity.z
            );
            let view = RenderView {
                eye: report.position,
                yaw: report.camera.yaw,
                pitch: report.camera.pitch,
                fov_degrees: report.camera.fov.to_degrees(),
            };
            print!("{}", DebugTextRenderer::new().render(&report.road, &view));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn holding_up_flies_forward() {
        let report = simulate(
            straight_road(),
            ControlsConfig::default(),
            &[MoveDirection::Up],
            1.0,
            60,
        )
        .unwrap();
        assert_eq!(report.frames, 60);
        assert!(report.position.z < -1.0);
        assert!((report.velocity.z + 2.0).abs() < 0.01);
    }

    #[test]
    fn strafing_stops_at_the_road_edge() {
        let report = simulate(
            straight_road(),
            ControlsConfig::default(),
            &[MoveDirection::Right],
            5.0,
            60,
        )
        .unwrap();
        assert_eq!(report.position.x, 1.0);
        assert_eq!(report.velocity.x, 0.0);
    }

    #[test]
    fn zero_fps_is_rejected() {
        assert!(simulate(straight_road(), ControlsConfig::default(), &[], 1.0, 0).is_err());
    }

    #[test]
    fn inspection_lists_every_segment() {
        let road = straight_road();
        let report = Inspection::of(&road);
        assert_eq!(report.segments.len(), 10);
        assert_eq!(report.segments[3].name, "tile_3");
        let bounds = report.bounds.unwrap();
        assert_eq!(bounds.max.z, 0.5);
        assert_eq!(bounds.min.z, -9.5);
    }
}
