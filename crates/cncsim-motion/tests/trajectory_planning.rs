//! Planner behavior on interpreted programs

use cncsim_core::{AxisLimits, MachineAxes, MachineDescriptor, Point3};
use cncsim_gcode::{interpret_blocks, parse_program};
use cncsim_motion::{
    forward_kinematics, limit_feed_by_axes, plan_trajectory, PlannerOptions, TrajectoryStats,
};
use proptest::prelude::*;

fn machine(velocity: f64) -> MachineDescriptor {
    MachineDescriptor {
        axes: MachineAxes::uniform(AxisLimits::with_velocity(velocity)),
        ..MachineDescriptor::default()
    }
}

#[test]
fn test_sixty_millimeters_at_six_hundred() {
    let result = interpret_blocks(&parse_program("G21 G90\nG1 X60 F600"));
    let samples = plan_trajectory(&result.commands, &machine(200.0), &PlannerOptions::default());
    let last = samples.last().expect("samples");
    assert!((5.9..=6.1).contains(&last.t));
    assert!(samples.windows(2).all(|w| w[1].t > w[0].t));
    assert_eq!(last.line_number, 2);
    assert_eq!(last.block_index, 1);
}

#[test]
fn test_tcp_offset_example() {
    let tcp = forward_kinematics(
        Point3::new(1.0, 2.0, 3.0),
        Point3::new(10.0, 20.0, 30.0),
        Point3::ZERO,
    );
    assert_eq!(tcp, Point3::new(11.0, 22.0, 33.0));
}

#[test]
fn test_rectangle_statistics() {
    let program = "G0 X0 Y0 Z5\nG1 Z-1 F300\nG1 X50\nY30\nX0\nY0\nG0 Z5";
    let result = interpret_blocks(&parse_program(program));
    let samples = plan_trajectory(&result.commands, &machine(200.0), &PlannerOptions::default());
    let stats = TrajectoryStats::from_samples(&samples);
    // perimeter 160 plus the 6 mm plunge, all at 5 mm/s
    assert!((stats.feed_distance - 166.0).abs() < 1e-6);
    assert!((stats.feed_time - 166.0 / 5.0).abs() < 1e-6);
    assert_eq!(stats.sample_count, samples.len());
}

proptest! {
    #[test]
    fn prop_feed_never_exceeds_request_or_axis_limits(
        dx in -100.0f64..100.0,
        dy in -100.0f64..100.0,
        dz in -100.0f64..100.0,
        desired in 1.0f64..20_000.0,
        vx in 1.0f64..500.0,
        vy in 1.0f64..500.0,
        vz in 1.0f64..500.0,
    ) {
        let axes = MachineAxes {
            x: AxisLimits::with_velocity(vx),
            y: AxisLimits::with_velocity(vy),
            z: AxisLimits::with_velocity(vz),
        };
        let to = Point3::new(dx, dy, dz);
        let feed = limit_feed_by_axes(Point3::ZERO, to, desired, &axes);
        let distance = to.distance(Point3::ZERO);
        prop_assume!(distance > 1e-6);

        prop_assert!(feed <= desired + 1e-9);
        let speed = feed / 60.0;
        prop_assert!(speed * dx.abs() / distance <= vx * (1.0 + 1e-9));
        prop_assert!(speed * dy.abs() / distance <= vy * (1.0 + 1e-9));
        prop_assert!(speed * dz.abs() / distance <= vz * (1.0 + 1e-9));
    }
}
