// Copyright 2025 the Treemap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{Criterion, Throughput, black_box, criterion_group, criterion_main};
use kurbo::{Point, Rect};
use treemap_demos::{Rng, synthetic_tree};
use treemap_layout::{Layout, squarify};

fn gen_sizes(n: usize, seed: u64) -> Vec<f64> {
    let mut rng = Rng::new(seed);
    (0..n).map(|_| 1.0 / (rng.next_f64() + 0.01)).collect()
}

fn bench_squarify(c: &mut Criterion) {
    let mut group = c.benchmark_group("squarify");
    let bounds = Rect::new(0.0, 0.0, 1920.0, 1080.0);
    for &n in &[16usize, 256, 4096] {
        let sizes = gen_sizes(n, 0xC0FF_EE00 + n as u64);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_function(format!("random_n{n}"), |b| {
            b.iter(|| black_box(squarify(black_box(&sizes), bounds)));
        });
    }
    let mut skewed = vec![1.0; 1023];
    skewed.insert(0, 1000.0);
    group.bench_function("one_large_many_small", |b| {
        b.iter(|| black_box(squarify(black_box(&skewed), bounds)));
    });
    group.finish();
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout");
    let bounds = Rect::new(0.0, 0.0, 1920.0, 1080.0);
    for &(depth, fanout) in &[(4u32, 8usize), (6, 12)] {
        let (tree, root) = synthetic_tree(0xBEEF, depth, fanout).expect("valid sizes");
        group.throughput(Throughput::Elements(tree.len() as u64));
        group.bench_function(format!("build_d{depth}_f{fanout}"), |b| {
            b.iter(|| black_box(Layout::build(&tree, root, bounds, |c| *c).expect("live root")));
        });
        let layout = Layout::build(&tree, root, bounds, |c| *c).expect("live root");
        group.bench_function(format!("hit_test_d{depth}_f{fanout}"), |b| {
            let mut rng = Rng::new(7);
            b.iter(|| {
                let p = Point::new(rng.next_f64() * 1920.0, rng.next_f64() * 1080.0);
                black_box(layout.hit_test(p))
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_squarify, bench_build);
criterion_main!(benches);
