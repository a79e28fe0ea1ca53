use criterion::*;

use glam::{Vec2, Vec3, Vec4};
use mapedit::{MapEditor, NoHooks, SectorId, SectorLeafBuilder, SideId, Surface, VertexId};

const CELL: f64 = 64.0;

fn side(editor: &mut MapEditor, sector: SectorId) -> SideId {
    editor
        .sidedef_create(
            Some(sector),
            0,
            Surface::default(),
            Surface::default(),
            Surface::default(),
        )
        .unwrap()
}

/// An `n` by `n` grid of square rooms sharing two-sided walls
fn grid_map(editor: &mut MapEditor, n: usize) {
    editor.begin("");
    let mut sectors = Vec::with_capacity(n * n);
    for i in 0..n * n {
        let sector = editor
            .sector_create(0.5 + (i % 4) as f32 * 0.1, 1.0, 1.0, 1.0)
            .unwrap();
        editor
            .plane_create(sector, 0.0, None, Vec2::ZERO, Vec4::ONE, Vec3::Z)
            .unwrap();
        editor
            .plane_create(sector, 128.0, None, Vec2::ZERO, Vec4::ONE, Vec3::NEG_Z)
            .unwrap();
        sectors.push(sector);
    }
    let cell = |x: usize, y: usize| sectors[y * n + x];

    let mut positions = Vec::with_capacity((n + 1) * (n + 1));
    for y in 0..=n {
        for x in 0..=n {
            positions.push((x as f64 * CELL, y as f64 * CELL));
        }
    }
    let v = editor.vertex_create_many(&positions).unwrap();
    let vert = |x: usize, y: usize| -> VertexId { v[y * (n + 1) + x] };

    // Walls run so their front faces a room. Inner walls get the neighbour
    // as back
    for y in 0..=n {
        for x in 0..n {
            let (a, b) = (vert(x + 1, y), vert(x, y));
            let (v1, v2, front, back) = if y < n {
                (a, b, cell(x, y), (y > 0).then(|| cell(x, y - 1)))
            } else {
                (b, a, cell(x, y - 1), None)
            };
            let front = side(editor, front);
            let back = back.map(|s| side(editor, s));
            editor.linedef_create(v1, v2, Some(front), back, 0).unwrap();
        }
    }
    for x in 0..=n {
        for y in 0..n {
            let (a, b) = (vert(x, y), vert(x, y + 1));
            let (v1, v2, front, back) = if x < n {
                (a, b, cell(x, y), (x > 0).then(|| cell(x - 1, y)))
            } else {
                (b, a, cell(x - 1, y), None)
            };
            let front = side(editor, front);
            let back = back.map(|s| side(editor, s));
            editor.linedef_create(v1, v2, Some(front), back, 0).unwrap();
        }
    }
}

fn bench_grid(b: &mut Bencher, n: &usize) {
    let mut editor = MapEditor::new();
    b.iter(|| {
        grid_map(&mut editor, *n);
        editor.end(&mut SectorLeafBuilder, &mut NoHooks).unwrap();
        std::hint::black_box(editor.take_last_built_map());
    });
}

fn bench(c: &mut Criterion) {
    let mut group = c.benchmark_group("Build grid map");

    for n in [8usize, 32] {
        group.bench_with_input(BenchmarkId::new("rooms per side", n), &n, bench_grid);
    }
    group.finish();
}

criterion_group!(benches, bench,);
criterion_main!(benches);
