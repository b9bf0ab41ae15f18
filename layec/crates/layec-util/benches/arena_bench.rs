use criterion::{black_box, criterion_group, criterion_main, Criterion};
use layec_util::Arena;

fn bench_intern_bytes(c: &mut Criterion) {
    let idents: Vec<String> = (0..1024).map(|i| format!("identifier_{i}")).collect();

    c.bench_function("arena_intern_1024_idents", |b| {
        b.iter(|| {
            let arena = Arena::new();
            for ident in &idents {
                black_box(arena.intern_bytes(ident.as_bytes()));
            }
        })
    });
}

fn bench_alloc_raw(c: &mut Criterion) {
    c.bench_function("arena_alloc_raw_4k_blocks", |b| {
        b.iter(|| {
            let arena = Arena::new();
            for _ in 0..256 {
                black_box(arena.alloc_raw(4096));
            }
        })
    });
}

criterion_group!(benches, bench_intern_bytes, bench_alloc_raw);
criterion_main!(benches);
