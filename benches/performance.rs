// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Performance benchmarks

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use nalgebra::{Point3, Vector3};
use polyedit::geometry::subdivide::subdivide_mesh;
use polyedit::geometry::{AdjacencyIndex, NurbsSurface, Primitive, SubdivisionMethod};
use polyedit::Editor;

fn bench_primitives(c: &mut Criterion) {
    let mut group = c.benchmark_group("primitives");

    group.bench_function("cube", |b| {
        b.iter(|| Primitive::cube(black_box(Vector3::new(10.0, 10.0, 10.0)), true).to_mesh());
    });

    group.bench_function("sphere_32", |b| {
        b.iter(|| Primitive::sphere(black_box(10.0), black_box(32)).to_mesh());
    });

    group.bench_function("sphere_64", |b| {
        b.iter(|| Primitive::sphere(black_box(10.0), black_box(64)).to_mesh());
    });

    group.finish();
}

fn bench_mesh_buffers(c: &mut Criterion) {
    let mut group = c.benchmark_group("mesh_buffers");

    for segments in [32u32, 128] {
        let mesh = Primitive::sphere(10.0, segments).to_mesh();

        group.bench_with_input(BenchmarkId::new("recompute_normals", segments), &mesh, |b, mesh| {
            let mut mesh = mesh.clone();
            b.iter(|| mesh.recompute_normals());
        });

        group.bench_with_input(BenchmarkId::new("adjacency_build", segments), &mesh, |b, mesh| {
            b.iter(|| AdjacencyIndex::build(black_box(mesh)));
        });
    }

    group.finish();
}

fn bench_drag(c: &mut Criterion) {
    let mut group = c.benchmark_group("drag");

    for segments in [32u32, 128] {
        let mut editor = Editor::new();
        let sphere = editor.add_primitive(&Primitive::sphere(10.0, segments));
        let start = editor.mesh(sphere).and_then(|m| m.position(segments as usize + 1));
        let start = start.unwrap_or_else(Point3::origin);
        if editor.pick(sphere, segments as usize + 1, start).is_err() {
            continue;
        }

        let mut step = 0.0;
        group.bench_function(BenchmarkId::new("update", segments), |b| {
            b.iter(|| {
                step += 0.001;
                editor
                    .move_to(black_box(start + Vector3::new(step, 0.0, 0.0)))
                    .unwrap()
            });
        });
    }

    group.finish();
}

fn bench_subdivision(c: &mut Criterion) {
    let mut group = c.benchmark_group("subdivision");
    let sphere = Primitive::sphere(10.0, 16).to_mesh();

    for method in [SubdivisionMethod::Loop, SubdivisionMethod::Midpoint] {
        for levels in [1u32, 3] {
            group.bench_function(BenchmarkId::new(method.to_string(), levels), |b| {
                b.iter(|| subdivide_mesh(black_box(&sphere), method, levels, usize::MAX).unwrap());
            });
        }
    }

    group.finish();
}

fn bench_surface(c: &mut Criterion) {
    let mut group = c.benchmark_group("nurbs");
    let grid: [Point3<f64>; 16] =
        std::array::from_fn(|k| Point3::new((k / 4) as f64, (k % 4) as f64, ((k * 7) % 3) as f64));
    let surface = NurbsSurface::bicubic(grid);

    for resolution in [20usize, 100] {
        group.bench_with_input(
            BenchmarkId::new("tessellate", resolution),
            &resolution,
            |b, &resolution| {
                b.iter(|| surface.tessellate(black_box(resolution)));
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_primitives,
    bench_mesh_buffers,
    bench_drag,
    bench_subdivision,
    bench_surface
);
criterion_main!(benches);
