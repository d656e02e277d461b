//! Per-sample travel limit and fixture checks

use cncsim_core::{MachineDescriptor, Point3};
use cncsim_motion::TrajectorySample;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Name used for the moving tool in event pairs
pub const TOOL: &str = "tool";
/// Name used for the travel envelope in event pairs
pub const MACHINE_ENVELOPE: &str = "machine_envelope";

/// Category of a boundary event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CollisionKind {
    /// Tool center point left the axis travel envelope
    TravelLimit,
    /// Tool volume touched a fixture
    Collision,
}

impl CollisionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::TravelLimit => "TRAVEL_LIMIT",
            Self::Collision => "COLLISION",
        }
    }
}

impl fmt::Display for CollisionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A boundary violation found at one trajectory sample
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollisionEvent {
    pub kind: CollisionKind,
    /// Sample time (seconds)
    pub t: f64,
    pub line_number: usize,
    pub block_index: usize,
    /// Tool center point at the sample
    pub point: Point3,
    /// Moving body, always [`TOOL`]
    pub mover: String,
    /// Envelope or fixture name
    pub obstacle: String,
}

impl CollisionEvent {
    fn at(sample: &TrajectorySample, kind: CollisionKind, obstacle: &str) -> Self {
        Self {
            kind,
            t: sample.t,
            line_number: sample.line_number,
            block_index: sample.block_index,
            point: sample.position,
            mover: TOOL.to_string(),
            obstacle: obstacle.to_string(),
        }
    }

    /// `mover:obstacle`
    pub fn pair_label(&self) -> String {
        format!("{}:{}", self.mover, self.obstacle)
    }
}

/// Check every sample against the travel envelope and every fixture.
///
/// The envelope test uses the bare tool center point. Fixture tests grow
/// the point by the tool radius. Events follow sample order, envelope
/// first, then fixtures in descriptor order.
pub fn detect_collisions(
    samples: &[TrajectorySample],
    machine: &MachineDescriptor,
) -> Vec<CollisionEvent> {
    let envelope = machine.envelope();
    let tool_radius = machine.tool.radius();
    let mut events = Vec::new();

    for sample in samples {
        let p = sample.position;
        if !envelope.contains(p) {
            events.push(CollisionEvent::at(
                sample,
                CollisionKind::TravelLimit,
                MACHINE_ENVELOPE,
            ));
        }
        for fixture in &machine.fixtures {
            if fixture.aabb.intersects_inflated(p, tool_radius) {
                events.push(CollisionEvent::at(
                    sample,
                    CollisionKind::Collision,
                    &fixture.name,
                ));
            }
        }
    }

    if !events.is_empty() {
        tracing::debug!(
            "{} boundary events over {} samples",
            events.len(),
            samples.len()
        );
    }
    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use cncsim_core::{Aabb, Fixture, ToolSpec};
    use cncsim_gcode::{MotionMode, SpindleMode};

    fn sample(t: f64, line: usize, position: Point3) -> TrajectorySample {
        TrajectorySample {
            t,
            block_index: line - 1,
            line_number: line,
            position,
            axes: position,
            feed: 1000.0,
            spindle_rpm: 0.0,
            spindle_mode: SpindleMode::Off,
            motion_mode: MotionMode::Linear,
        }
    }

    fn clamp_machine() -> MachineDescriptor {
        MachineDescriptor {
            tool: ToolSpec { diameter: 6.0 },
            fixtures: vec![Fixture::new(
                "vise",
                Aabb::new(Point3::new(10.0, 10.0, 0.0), Point3::new(20.0, 20.0, 10.0)),
            )],
            ..MachineDescriptor::default()
        }
    }

    #[test]
    fn test_inside_envelope_no_events() {
        let events = detect_collisions(
            &[sample(0.1, 1, Point3::new(0.0, 0.0, 50.0))],
            &clamp_machine(),
        );
        assert!(events.is_empty());
    }

    #[test]
    fn test_envelope_boundary_is_inclusive() {
        let events = detect_collisions(
            &[
                sample(0.1, 1, Point3::new(500.0, 0.0, 50.0)),
                sample(0.2, 2, Point3::new(500.001, 0.0, 50.0)),
            ],
            &clamp_machine(),
        );
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, CollisionKind::TravelLimit);
        assert_eq!(events[0].line_number, 2);
        assert_eq!(events[0].pair_label(), "tool:machine_envelope");
    }

    #[test]
    fn test_fixture_uses_tool_radius() {
        let machine = clamp_machine();
        // 3 mm radius reaches a box face 2.5 mm away
        let events = detect_collisions(&[sample(1.0, 4, Point3::new(7.5, 15.0, 5.0))], &machine);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, CollisionKind::Collision);
        assert_eq!(events[0].obstacle, "vise");

        let events = detect_collisions(&[sample(1.0, 4, Point3::new(6.9, 15.0, 5.0))], &machine);
        assert!(events.is_empty());
    }

    #[test]
    fn test_multiple_events_per_sample_in_order() {
        let mut machine = clamp_machine();
        machine.axes.x.max = 15.0;
        machine.fixtures.push(Fixture::new(
            "clamp",
            Aabb::new(Point3::new(14.0, 14.0, 0.0), Point3::new(30.0, 30.0, 5.0)),
        ));
        let events = detect_collisions(
            &[
                sample(0.5, 1, Point3::new(0.0, 0.0, 0.0)),
                sample(1.0, 2, Point3::new(16.0, 16.0, 2.0)),
            ],
            &machine,
        );
        let kinds: Vec<(CollisionKind, &str)> = events
            .iter()
            .map(|e| (e.kind, e.obstacle.as_str()))
            .collect();
        assert_eq!(
            kinds,
            vec![
                (CollisionKind::TravelLimit, "machine_envelope"),
                (CollisionKind::Collision, "vise"),
                (CollisionKind::Collision, "clamp"),
            ]
        );
        assert!(events.iter().all(|e| e.t == 1.0));
    }

    #[test]
    fn test_kind_serializes_screaming_snake() {
        assert_eq!(
            serde_json::to_string(&CollisionKind::TravelLimit).unwrap(),
            "\"TRAVEL_LIMIT\""
        );
        assert_eq!(CollisionKind::Collision.to_string(), "COLLISION");
    }
}
