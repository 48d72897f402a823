//! One full frame: integrate, constrain, then animate from the constrained
//! camera position.

use glam::Vec3;
use roadfly_common::SegmentTransform;
use roadfly_input::InputQueue;
use roadfly_motion::{
    BoundaryConstraint, Controls, ControlsConfig, FirstPersonCamera, HeadlessGrab,
    PointerLockControls, SharedBounds,
};
use roadfly_scene::{RoadAnimator, RoadModel, RoadSegment, SegmentMesh};

fn tile(z: f32) -> RoadSegment {
    let mesh = SegmentMesh {
        positions: vec![
            Vec3::new(-1.0, 0.0, -0.5),
            Vec3::new(1.0, 0.0, -0.5),
            Vec3::new(1.0, 0.0, 0.5),
        ],
        normals: vec![Vec3::Y; 3],
        indices: vec![0, 2, 1],
    };
    RoadSegment::new(
        None,
        SegmentTransform {
            position: Vec3::new(0.5, 0.0, z),
            ..SegmentTransform::default()
        },
        mesh,
    )
}

#[test]
fn animator_reads_constrained_position() {
    let mut road = RoadModel::new((0..10).map(|i| tile(5.0 - i as f32)).collect());
    let bounds = SharedBounds::default();
    bounds.set(Some(road.world_bounds()));
    let box_ = road.world_bounds();

    let mut source = InputQueue::new();
    let camera = PointerLockControls::new(FirstPersonCamera::default(), HeadlessGrab);
    let mut controls = Controls::new(camera, &mut source, ControlsConfig::default())
        .with_constraint(BoundaryConstraint::new(bounds));
    let animator = RoadAnimator::default();

    source.key_down("d");
    controls.pump(&mut source);

    let mut t = 0.0;
    for _ in 0..600 {
        t += 1000.0 / 60.0;
        controls.update(t);
        let p = controls.position();
        assert!(p.x <= box_.max.x && p.x >= box_.min.x);
        animator.animate(&mut road, p, t);
    }

    // Strafing right for ten seconds pins the camera on the box edge.
    assert_eq!(controls.position().x, box_.max.x);
    assert_eq!(controls.velocity().x, 0.0);

    // Every segment pose matches the camera position the animator was given.
    let cam_z = controls.position().z;
    for segment in road.segments() {
        let world_z = road.world_position(segment).z;
        let d = animator.distance(cam_z, world_z);
        let expected = animator.pose(segment.initial().position, d, animator.scaled_time(t));
        assert_eq!(segment.transform.position, expected.position);
    }

    controls.destroy(&mut source);
    assert_eq!(source.subscriber_count(), 0);
}
