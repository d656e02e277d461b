//! Material removal by a swept spherical tool
//!
//! The cutter is approximated by a sphere of the tool radius moved along
//! each segment in half-voxel steps. A cell is cleared when its center lies
//! within the radius of a step point.

use crate::voxel::VoxelStock;
use cncsim_core::Point3;
use cncsim_motion::TrajectorySample;
use glam::DVec3;
use serde::{Deserialize, Serialize};

/// Which trajectory segments remove material
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemovalPolicy {
    /// Every segment cuts, rapids and spindle-off moves included
    #[default]
    AllMotion,
    /// Only segments ending on a feed move with the spindle running
    CuttingOnly,
}

impl RemovalPolicy {
    fn removes(self, segment_end: &TrajectorySample) -> bool {
        match self {
            Self::AllMotion => true,
            Self::CuttingOnly => segment_end.is_cutting(),
        }
    }
}

/// Cell index range touched by `[lo, hi]` along one axis, clamped to the grid
fn cell_span(lo: f64, hi: f64, voxel_size: f64, cells: usize) -> Option<(usize, usize)> {
    let first = (lo / voxel_size).floor().max(0.0);
    let last = (hi / voxel_size).floor().min(cells as f64 - 1.0);
    (first <= last).then(|| (first as usize, last as usize))
}

impl VoxelStock {
    /// Clear every cell within `radius` of the segment `from -> to`
    pub fn carve(&mut self, from: Point3, to: Point3, radius: f64) {
        let vs = self.voxel_size();
        let (nx, ny, nz) = self.grid_size();
        let start = from.to_dvec3();
        let end = to.to_dvec3();
        let steps = ((start.distance(end) / (vs * 0.5)).ceil() as usize).max(1);

        for s in 0..=steps {
            let p = start.lerp(end, s as f64 / steps as f64);
            let Some((x0, x1)) = cell_span(p.x - radius, p.x + radius, vs, nx) else {
                continue;
            };
            let Some((y0, y1)) = cell_span(p.y - radius, p.y + radius, vs, ny) else {
                continue;
            };
            let Some((z0, z1)) = cell_span(p.z - radius, p.z + radius, vs, nz) else {
                continue;
            };

            for z in z0..=z1 {
                for y in y0..=y1 {
                    for x in x0..=x1 {
                        let center = DVec3::new(
                            (x as f64 + 0.5) * vs,
                            (y as f64 + 0.5) * vs,
                            (z as f64 + 0.5) * vs,
                        );
                        if center.distance(p) <= radius {
                            self.clear(x, y, z);
                        }
                    }
                }
            }
        }
    }

    /// Carve between every pair of consecutive samples, in axis coordinates.
    ///
    /// Removes material on every segment regardless of spindle state or
    /// motion mode.
    pub fn remove_along_trajectory(&mut self, samples: &[TrajectorySample], tool_diameter: f64) {
        self.remove_along_trajectory_with(samples, tool_diameter, RemovalPolicy::AllMotion);
    }

    pub fn remove_along_trajectory_with(
        &mut self,
        samples: &[TrajectorySample],
        tool_diameter: f64,
        policy: RemovalPolicy,
    ) {
        let radius = tool_diameter / 2.0;
        let before = self.removed_count();
        for pair in samples.windows(2) {
            if policy.removes(&pair[1]) {
                self.carve(pair[0].axes, pair[1].axes, radius);
            }
        }
        tracing::debug!(
            "Removed {} cells along {} samples ({:?})",
            self.removed_count() - before,
            samples.len(),
            policy
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cncsim_core::StockDimensions;
    use cncsim_gcode::{MotionMode, SpindleMode};

    fn stock(w: f64, h: f64, d: f64) -> VoxelStock {
        VoxelStock::new(&StockDimensions::new(w, h, d, 1.0)).unwrap()
    }

    fn sample(axes: Point3, mode: MotionMode, spindle: SpindleMode) -> TrajectorySample {
        TrajectorySample {
            t: 0.0,
            block_index: 0,
            line_number: 1,
            position: axes,
            axes,
            feed: 100.0,
            spindle_rpm: 1000.0,
            spindle_mode: spindle,
            motion_mode: mode,
        }
    }

    #[test]
    fn test_point_carve_clears_sphere() {
        let mut s = stock(10.0, 10.0, 10.0);
        let p = Point3::new(5.0, 5.0, 5.0);
        s.carve(p, p, 1.0);
        // centers at 4.5/5.5 on each axis are sqrt(0.75) away
        assert_eq!(s.removed_count(), 8);
        assert!(!s.is_occupied(4, 4, 4));
        assert!(!s.is_occupied(5, 5, 5));
        assert!(s.is_occupied(3, 4, 4));
    }

    #[test]
    fn test_carve_outside_grid_is_noop() {
        let mut s = stock(5.0, 5.0, 5.0);
        s.carve(Point3::new(-20.0, 2.0, 2.0), Point3::new(-10.0, 2.0, 2.0), 2.0);
        s.carve(Point3::new(2.0, 2.0, 30.0), Point3::new(2.0, 2.0, 40.0), 2.0);
        assert_eq!(s.removed_count(), 0);
    }

    #[test]
    fn test_slot_along_x() {
        let mut s = stock(20.0, 5.0, 5.0);
        s.carve(Point3::new(0.5, 2.5, 2.5), Point3::new(19.5, 2.5, 2.5), 0.6);
        for x in 0..20 {
            assert!(!s.is_occupied(x, 2, 2), "cell {} should be cut", x);
            assert!(s.is_occupied(x, 1, 2));
        }
        assert_eq!(s.removed_count(), 20);
    }

    #[test]
    fn test_carving_is_monotone() {
        let mut s = stock(10.0, 10.0, 5.0);
        s.carve(Point3::new(0.0, 0.0, 2.0), Point3::new(10.0, 10.0, 2.0), 2.0);
        let after_first = s.removed_count();
        s.carve(Point3::new(10.0, 0.0, 2.0), Point3::new(0.0, 10.0, 2.0), 2.0);
        assert!(s.removed_count() >= after_first);
    }

    #[test]
    fn test_policy_cutting_only_skips_rapids_and_spindle_off() {
        let a = Point3::new(2.5, 2.5, 2.5);
        let b = Point3::new(7.5, 2.5, 2.5);
        let c = Point3::new(7.5, 7.5, 2.5);

        let rapid = [
            sample(a, MotionMode::Rapid, SpindleMode::Clockwise),
            sample(b, MotionMode::Rapid, SpindleMode::Clockwise),
        ];
        let mut s = stock(10.0, 10.0, 5.0);
        s.remove_along_trajectory_with(&rapid, 2.0, RemovalPolicy::CuttingOnly);
        assert_eq!(s.removed_count(), 0);
        s.remove_along_trajectory(&rapid, 2.0);
        assert!(s.removed_count() > 0);

        let spindle_off = [
            sample(b, MotionMode::Linear, SpindleMode::Off),
            sample(c, MotionMode::Linear, SpindleMode::Off),
        ];
        let mut s = stock(10.0, 10.0, 5.0);
        s.remove_along_trajectory_with(&spindle_off, 2.0, RemovalPolicy::CuttingOnly);
        assert_eq!(s.removed_count(), 0);

        let cutting = [
            sample(b, MotionMode::Linear, SpindleMode::Clockwise),
            sample(c, MotionMode::Linear, SpindleMode::Clockwise),
        ];
        s.remove_along_trajectory_with(&cutting, 2.0, RemovalPolicy::CuttingOnly);
        assert!(s.removed_count() > 0);
    }

    #[test]
    fn test_single_sample_removes_nothing() {
        let mut s = stock(10.0, 10.0, 5.0);
        let only = [sample(
            Point3::new(5.0, 5.0, 2.5),
            MotionMode::Linear,
            SpindleMode::Clockwise,
        )];
        s.remove_along_trajectory(&only, 4.0);
        assert_eq!(s.removed_count(), 0);
    }
}
