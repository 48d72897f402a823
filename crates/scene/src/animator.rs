//! Per-frame road animation.
//!
//! Segments level with or behind the camera reference point sit at their
//! initial pose. Segments further ahead are lifted, spread sideways in
//! proportion to their initial lateral offset, and tilted with an oscillation
//! whose amplitude saturates at `tilt_limit`; they settle into place as the
//! camera reaches them.

use crate::road::RoadModel;
use glam::Vec3;

/// Result of animating one segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentPose {
    pub distance: f32,
    pub position: Vec3,
    pub rotation_x: f32,
    pub rotation_z: f32,
}

#[derive(Debug, Clone, Copy)]
pub struct RoadAnimator {
    /// Shift of the camera reference point along -Z, so segments move before
    /// the camera reaches their origin.
    pub camera_offset: f32,
    /// Milliseconds to animation-clock units.
    pub time_scale: f64,
    pub rise: f32,
    pub spread: f32,
    pub tilt_limit: f32,
    pub tilt_x_ratio: f32,
}

impl Default for RoadAnimator {
    fn default() -> Self {
        Self {
            camera_offset: 0.5,
            time_scale: 0.0002,
            rise: 0.5,
            spread: 4.0,
            tilt_limit: 0.3,
            tilt_x_ratio: 1.5,
        }
    }
}

impl RoadAnimator {
    /// Forward distance from the (shifted) camera to a segment, floored at 0.
    pub fn distance(&self, camera_z: f32, segment_world_z: f32) -> f32 {
        ((camera_z - self.camera_offset) - segment_world_z).max(0.0)
    }

    pub fn scaled_time(&self, t_ms: f64) -> f32 {
        (t_ms * self.time_scale) as f32
    }

    /// Pose for a segment with local initial position `initial`.
    pub fn pose(&self, initial: Vec3, distance: f32, scaled_time: f32) -> SegmentPose {
        let d = distance.max(0.0);
        let angle = (scaled_time + d).cos() * d.min(self.tilt_limit);
        SegmentPose {
            distance: d,
            position: Vec3::new(
                initial.x + initial.x * d * self.spread,
                initial.y + d * self.rise,
                initial.z,
            ),
            rotation_x: angle * self.tilt_x_ratio,
            rotation_z: angle,
        }
    }

    /// Rewrite every segment's live transform for the camera at
    /// `camera_position` and timestamp `t_ms`.
    pub fn animate(&self, road: &mut RoadModel, camera_position: Vec3, t_ms: f64) {
        let scaled_time = self.scaled_time(t_ms);
        let group = road.group_matrix();
        tracing::trace!(segments = road.len(), t_ms, "animating road");

        for segment in road.segments_mut() {
            let world_z = group.transform_point3(segment.transform.position).z;
            let d = self.distance(camera_position.z, world_z);
            let pose = self.pose(segment.initial().position, d, scaled_time);

            segment.transform.position = pose.position;
            segment.transform.rotation.x = pose.rotation_x;
            segment.transform.rotation.z = pose.rotation_z;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::road::tests::segment_at;

    const EPS: f32 = 1e-6;

    #[test]
    fn pose_at_zero_distance_is_initial() {
        let a = RoadAnimator::default();
        let camera_z = 10.0;
        let d = a.distance(camera_z, 10.0);
        assert_eq!(d, 0.0);

        let p = a.pose(Vec3::new(1.0, 0.0, 0.0), d, 0.0);
        assert_eq!(p.position, Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(p.rotation_z, 0.0);
        assert_eq!(p.rotation_x, 0.0);
    }

    #[test]
    fn pose_at_distance_five() {
        let a = RoadAnimator::default();
        let d = a.distance(10.0, 4.5);
        assert!((d - 5.0).abs() < EPS);

        let p = a.pose(Vec3::new(1.0, 0.0, 0.0), d, 0.0);
        assert!((p.position.y - 2.5).abs() < EPS);
        assert!((p.position.x - 21.0).abs() < EPS);
        let angle = 5.0_f32.cos() * 0.3;
        assert!((p.rotation_z - angle).abs() < EPS);
        assert!((p.rotation_x - angle * 1.5).abs() < EPS);
    }

    #[test]
    fn distance_is_never_negative() {
        let a = RoadAnimator::default();
        for camera_z in [-100.0, -1.0, 0.0, 0.5, 3.0, 100.0] {
            for seg_z in [-50.0, -0.5, 0.0, 2.0, 99.0] {
                assert!(a.distance(camera_z, seg_z) >= 0.0);
            }
        }
    }

    #[test]
    fn tilt_amplitude_saturates() {
        let a = RoadAnimator::default();
        for i in 0..200 {
            let d = i as f32 * 0.05;
            for t in [0.0, 0.7, 3.0, 12.5] {
                let p = a.pose(Vec3::ONE, d, t);
                assert!(p.rotation_z.abs() <= 0.3 + EPS);
                assert!(p.rotation_x.abs() <= 0.45 + EPS);
            }
        }
    }

    #[test]
    fn centered_segments_do_not_spread() {
        let a = RoadAnimator::default();
        let p = a.pose(Vec3::new(0.0, 0.2, -3.0), 4.0, 1.0);
        assert_eq!(p.position.x, 0.0);
        assert_eq!(p.position.z, -3.0);
    }

    #[test]
    fn scaled_time_uses_factor() {
        let a = RoadAnimator::default();
        assert!((a.scaled_time(10_000.0) - 2.0).abs() < EPS);
    }

    #[test]
    fn animate_keeps_initial_and_y_rotation() {
        let mut road = RoadModel::new(vec![
            segment_at(Vec3::new(1.0, 0.0, 0.0)),
            segment_at(Vec3::new(0.0, 0.0, -20.0)),
        ]);
        road.segments_mut()[0].transform.rotation.y = 0.4;
        let initial = *road.segments()[0].initial();

        let a = RoadAnimator::default();
        // Segment 0 sits at world z = -5; camera at z = 0.5 gives d = 5.
        a.animate(&mut road, Vec3::new(0.0, 0.0, 0.5), 0.0);

        let s0 = &road.segments()[0];
        assert_eq!(*s0.initial(), initial);
        assert!((s0.transform.position.x - 21.0).abs() < EPS);
        assert!((s0.transform.position.y - 2.5).abs() < EPS);
        assert_eq!(s0.transform.rotation.y, 0.4);

        // Segment 1 sits at world z = -25, far ahead: d = 25.
        let s1 = &road.segments()[1];
        assert!((s1.transform.position.y - 12.5).abs() < EPS);
        assert_eq!(s1.transform.position.x, 0.0);

        // Once the camera passes both segments they return to the initial pose.
        a.animate(&mut road, Vec3::new(0.0, 0.0, -40.0), 0.0);
        assert_eq!(road.segments()[0].transform.position, initial.position);
        assert_eq!(road.segments()[0].transform.rotation.z, 0.0);
    }

    #[test]
    fn animate_is_pure_in_distance_and_time() {
        let mut road = RoadModel::new(vec![segment_at(Vec3::new(0.5, 0.0, 0.0))]);
        let a = RoadAnimator::default();
        a.animate(&mut road, Vec3::new(0.0, 0.0, 2.0), 500.0);
        let first = road.segments()[0].transform;
        a.animate(&mut road, Vec3::new(0.0, 0.0, 9.0), 9000.0);
        a.animate(&mut road, Vec3::new(0.0, 0.0, 2.0), 500.0);
        assert_eq!(road.segments()[0].transform, first);
    }
}
