//! Estimator benchmarks using Criterion.
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use hand_raise_rs::speed::{average_interval_speed, TimingPolicy};
use hand_raise_rs::{GestureSpeedEstimator, JointId, Sample, Skeleton, SkeletonFrame};

/// Frames of repeated raises at 30 fps, alternating raised and lowered.
fn create_test_frames(n: usize) -> Vec<SkeletonFrame> {
    (0..n)
        .map(|i| {
            let t = i as f64 * 33.3;
            let hand_y = if i % 8 < 6 { 1.6 + (i % 8) as f64 * 0.1 } else { 1.0 };
            let skeleton = Skeleton::from_joints([
                (JointId::Head, [0.0, 1.5, 2.0]),
                (JointId::HandRight, [0.2, hand_y, 1.9]),
            ]);
            SkeletonFrame::new(t, vec![Skeleton::default(), skeleton])
        })
        .collect()
}

fn benchmark_process_frames(c: &mut Criterion) {
    let frames = create_test_frames(300);

    c.bench_function("process_300_frames", |b| {
        b.iter(|| {
            let mut estimator = GestureSpeedEstimator::new(3).expect("valid estimator");
            estimator.process_frames(black_box(&frames)).expect("valid frames")
        })
    });
}

fn benchmark_average_interval_speed(c: &mut Criterion) {
    let samples: Vec<Sample> = (0..30)
        .map(|i| Sample::new(i as f64 * 33.3, 1.5 + i as f64 * 0.05))
        .collect();
    let mut speeds = Vec::with_capacity(samples.len());

    c.bench_function("average_interval_speed_30", |b| {
        b.iter(|| {
            average_interval_speed(black_box(&samples), TimingPolicy::ExcludeDegenerate, &mut speeds)
                .expect("valid window")
        })
    });
}

criterion_group!(benches, benchmark_process_frames, benchmark_average_interval_speed);
criterion_main!(benches);
