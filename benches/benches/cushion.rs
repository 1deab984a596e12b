// Copyright 2025 the Treemap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use kurbo::{Affine, Rect};
use treemap_cushion::{CushionParams, CushionRenderer, PixelBuffer};
use treemap_demos::synthetic_tree;
use treemap_layout::Layout;

fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("cushion");
    let (tree, root) = synthetic_tree(0xF00D, 6, 12).expect("valid sizes");
    let layout = Layout::build(&tree, root, Rect::new(0.0, 0.0, 1.0, 1.0), |c| *c).expect("live root");

    for &px in &[256u32, 1024] {
        let view = Affine::scale(f64::from(px));
        group.throughput(Throughput::Elements(u64::from(px) * u64::from(px)));
        for (name, min_cushion_size) in [("default", 9.0), ("no_flatten", 0.0)] {
            let renderer = CushionRenderer::new(CushionParams {
                min_cushion_size,
                ..CushionParams::default()
            });
            group.bench_function(format!("{name}_{px}px"), |b| {
                b.iter_batched(
                    || PixelBuffer::new(px, px),
                    |mut buf| {
                        let stats = renderer.render(&layout, view, &mut buf).expect("invertible");
                        black_box(stats)
                    },
                    BatchSize::LargeInput,
                );
            });
        }
    }
    group.finish();
}

criterion_group!(benches, bench_render);
criterion_main!(benches);
