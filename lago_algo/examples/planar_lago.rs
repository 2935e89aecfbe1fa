//! Square trajectory with noisy odometry and one loop closure.
//!
//! Prints the headings obtained by chaining odometry next to the LAGO
//! estimate. Run with `RUST_LOG=debug` to see the pipeline stages.

use lago_algo::prelude::*;
use lago_algo::slam::normalize_angle;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f64::consts::FRAC_PI_2;

const SIDE: usize = 10;
const HEADING_NOISE: f64 = 0.03;

fn x(i: usize) -> Key {
    Key::symbol('x', i as u64)
}

/// Poses walking counter-clockwise around a square, one step per meter
fn ground_truth() -> Vec<Pose2D> {
    let mut poses = vec![Pose2D::origin()];
    for side in 0..4 {
        for step in 0..SIDE {
            let last = *poses.last().unwrap_or(&Pose2D::origin());
            let turn = if step == SIDE - 1 && side < 3 { FRAC_PI_2 } else { 0.0 };
            poses.push(last.compose(&Pose2D::new(1.0, 0.0, turn)));
        }
    }
    poses
}

fn main() {
    env_logger::init();
    let mut rng = StdRng::seed_from_u64(11);

    let truth = ground_truth();
    let odom_noise = NoiseModel::from_sigmas(&[0.05, 0.05, HEADING_NOISE]);

    let mut graph = FactorGraph::new();
    graph.add_prior(x(0), truth[0], NoiseModel::from_sigmas(&[0.01, 0.01, 0.001]));

    let mut odometry = Values::new();
    odometry.insert(x(0), truth[0]);
    for i in 0..truth.len() - 1 {
        let mut delta = truth[i].between(&truth[i + 1]);
        delta.theta += rng.gen_range(-HEADING_NOISE..HEADING_NOISE);
        graph.add_between(x(i), x(i + 1), delta, odom_noise.clone());

        let prev = odometry.get(x(i)).copied().unwrap_or_default();
        odometry.insert(x(i + 1), prev.compose(&delta));
    }

    // Back at the start: close the loop
    let last = truth.len() - 1;
    graph.add_between(
        x(last),
        x(0),
        truth[last].between(&truth[0]),
        NoiseModel::from_sigmas(&[0.02, 0.02, 0.01]),
    );

    let poses = match initialize_poses(&graph, &odometry) {
        Ok(poses) => poses,
        Err(e) => {
            eprintln!("LAGO failed: {}", e);
            std::process::exit(1);
        }
    };

    println!("{:>4} {:>10} {:>10} {:>10}", "key", "truth", "odometry", "lago");
    let mut odom_err = 0.0;
    let mut lago_err = 0.0;
    for (i, expected) in truth.iter().enumerate() {
        let odom = odometry.get(x(i)).map(|p| p.theta).unwrap_or_default();
        let lago = poses.get(x(i)).map(|p| p.theta).unwrap_or_default();
        odom_err += normalize_angle(odom - expected.theta).powi(2);
        lago_err += normalize_angle(lago - expected.theta).powi(2);
        println!(
            "{:>4} {:>10.4} {:>10.4} {:>10.4}",
            x(i).to_string(),
            normalize_angle(expected.theta),
            normalize_angle(odom),
            normalize_angle(lago)
        );
    }

    let n = truth.len() as f64;
    println!("heading RMSE: odometry {:.4} rad, lago {:.4} rad", (odom_err / n).sqrt(), (lago_err / n).sqrt());
}
