use criterion::{black_box, criterion_group, criterion_main, Criterion};
use mockshot::job::resolve_variants;
use mockshot::{VariantDefaults, VariantSpec};

// Run with:
//    cargo bench --bench parse_bench

fn bench_parse_variant(c: &mut Criterion) {
    c.bench_function("parse_variant_token", |b| {
        b.iter(|| {
            black_box("poster:2400x1350@3,type=png,quality=95")
                .parse::<VariantSpec>()
                .unwrap()
        })
    });
}

fn bench_resolve_builtins(c: &mut Criterion) {
    let specs = VariantSpec::builtin_set();
    let defaults = VariantDefaults::default();
    c.bench_function("resolve_builtin_variants", |b| {
        b.iter(|| resolve_variants(black_box(&specs), &defaults).unwrap())
    });
}

criterion_group!(benches, bench_parse_variant, bench_resolve_builtins);
criterion_main!(benches);
