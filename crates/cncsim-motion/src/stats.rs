//! Trajectory statistics and machining time estimate

use crate::planner::TrajectorySample;
use serde::{Deserialize, Serialize};

/// Summary of a planned trajectory
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TrajectoryStats {
    pub sample_count: usize,
    /// Timestamp of the last sample (seconds)
    pub total_time: f64,
    /// Time spent in rapid traverses (seconds)
    pub rapid_time: f64,
    /// Time spent in feed moves (seconds)
    pub feed_time: f64,
    /// TCP path length of feed moves (mm)
    pub feed_distance: f64,
    /// TCP path length of rapid traverses (mm)
    pub rapid_distance: f64,
    /// Highest planned feed (mm/min)
    pub max_feed: f64,
}

impl TrajectoryStats {
    /// Accumulate statistics over consecutive samples.
    ///
    /// A sample's interval and path segment are booked under its own
    /// motion mode. Path length starts at the first sample.
    pub fn from_samples(samples: &[TrajectorySample]) -> Self {
        let mut stats = Self {
            sample_count: samples.len(),
            ..Self::default()
        };

        let mut previous: Option<&TrajectorySample> = None;
        for sample in samples {
            let dt = sample.t - previous.map_or(0.0, |p| p.t);
            let ds = previous.map_or(0.0, |p| p.position.distance(sample.position));
            if sample.motion_mode.is_rapid() {
                stats.rapid_time += dt;
                stats.rapid_distance += ds;
            } else {
                stats.feed_time += dt;
                stats.feed_distance += ds;
            }
            stats.max_feed = stats.max_feed.max(sample.feed);
            previous = Some(sample);
        }

        stats.total_time = samples.last().map_or(0.0, |s| s.t);
        stats
    }

    pub fn total_distance(&self) -> f64 {
        self.feed_distance + self.rapid_distance
    }
}
