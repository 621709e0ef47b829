//! Benchmarks for the rule filter
//!
//! Run with: cargo bench --package pipeline
//!
//! Filters a synthetic result set the size of a long search (20 pages of 50).

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use pipeline::{Decision, FilterPipeline};
use video_model::{ChannelGroups, FilterConfig, VideoCandidate, ViewCount};

fn synthetic_candidates(count: usize) -> Vec<VideoCandidate> {
    (0..count)
        .map(|i| {
            let title = if i % 7 == 0 {
                format!("Sai Baba satsang part {i}")
            } else {
                format!("Interview clip number {i}")
            };
            VideoCandidate::new(
                format!("vid{i}"),
                title,
                format!("UC{}", i % 40),
                format!("Channel {}", i % 40),
                ViewCount::known((i as u64 * 37) % 2_000),
            )
        })
        .collect()
}

fn bench_decide(c: &mut Criterion) {
    let config = FilterConfig::default().with_deny_channel_ids(["UC3", "UC11"]);
    let pipeline = FilterPipeline::standard();
    let candidates = synthetic_candidates(1_000);

    c.bench_function("rule_filter_decide_1000", |b| {
        b.iter(|| {
            candidates
                .iter()
                .filter(|candidate| {
                    matches!(
                        pipeline.decide(black_box(candidate), black_box(&config)),
                        Decision::Keep
                    )
                })
                .count()
        })
    });
}

fn bench_apply(c: &mut Criterion) {
    let config = FilterConfig::default().with_deny_channel_ids(["UC3", "UC11"]);
    let pipeline = FilterPipeline::standard();
    let candidates = synthetic_candidates(1_000);

    c.bench_function("rule_filter_apply_1000", |b| {
        b.iter(|| {
            let kept = pipeline.apply(black_box(candidates.clone()), black_box(&config));
            black_box(kept)
        })
    });
}

fn bench_apply_to_groups(c: &mut Criterion) {
    let config = FilterConfig::default();
    let pipeline = FilterPipeline::standard();
    let groups: ChannelGroups = synthetic_candidates(1_000).into_iter().collect();

    c.bench_function("rule_filter_groups_1000", |b| {
        b.iter(|| {
            let mut groups = groups.clone();
            pipeline.apply_to_groups(black_box(&mut groups), black_box(&config));
            black_box(groups)
        })
    });
}

criterion_group!(benches, bench_decide, bench_apply, bench_apply_to_groups);
criterion_main!(benches);
