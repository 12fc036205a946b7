//! Criterion benchmarks for prism-core.
//!
//! ## Benchmark groups
//!
//! 1. **descriptor** — JVM signature descriptor parsing.
//! 2. **closure** — Dependency closure over synthetic universes of
//!    varying size and fan-out.
//!
//! ## Running
//!
//! ```sh
//! cargo bench --manifest-path crates/prism-core/Cargo.toml
//! # Run only the closure group:
//! cargo bench --manifest-path crates/prism-core/Cargo.toml -- closure
//! ```

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use prism_core::origin::descriptor::parse_descriptor;
use prism_core::origin::runtime::{RuntimeClass, RuntimeField, RuntimeType, RuntimeUniverse};
use prism_core::{closure_of, ClassInfoModel, ClassOrigin, Modifiers};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Build a universe of `n` classes where class `i` has `fan_out` fields
/// referencing classes `i + 1 ..= i + fan_out` (wrapping), so the closure
/// visits every class with realistic duplicate discoveries.
fn populate_universe(n: usize, fan_out: usize) -> Arc<RuntimeUniverse> {
    let universe = RuntimeUniverse::new();
    for i in 0..n {
        let fields = (1..=fan_out)
            .map(|offset| RuntimeField {
                name: format!("ref{offset}"),
                ty: RuntimeType::class(&format!("com.bench.C{}", (i + offset) % n)),
                modifiers: Modifiers::default(),
                annotations: vec![],
            })
            .collect();
        universe.register(RuntimeClass {
            name: format!("com.bench.C{i}"),
            fields,
            ..Default::default()
        });
    }
    universe
}

fn root_of(universe: &Arc<RuntimeUniverse>) -> Arc<ClassInfoModel> {
    ClassInfoModel::of(ClassOrigin::Runtime(
        universe.lookup("com.bench.C0").unwrap(),
        Arc::clone(universe),
    ))
}

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

fn bench_descriptor(c: &mut Criterion) {
    let mut group = c.benchmark_group("descriptor");
    let samples = [
        ("primitive", "I"),
        ("plain_class", "Ljava/lang/String;"),
        (
            "nested_generics",
            "Ljava/util/Map<Ljava/lang/String;Ljava/util/List<Lcom/acme/Pet;>;>;",
        ),
        ("wildcard_array", "[Ljava/util/List<+Lcom/acme/Pet;>;"),
    ];
    for (label, descriptor) in samples {
        group.bench_function(label, |b| {
            b.iter(|| parse_descriptor(black_box(descriptor)).unwrap());
        });
    }
    group.finish();
}

fn bench_closure(c: &mut Criterion) {
    let mut group = c.benchmark_group("closure");
    for (n, fan_out) in [(100, 2), (1000, 2), (1000, 8)] {
        let universe = populate_universe(n, fan_out);
        group.bench_with_input(
            BenchmarkId::new("closure_of", format!("{n}x{fan_out}")),
            &universe,
            |b, universe| {
                b.iter(|| {
                    // Fresh root per iteration: closure caches live on the
                    // model nodes, and the walk should pay for them.
                    let root = root_of(universe);
                    let closure = closure_of(black_box(&[root])).unwrap();
                    assert_eq!(closure.len(), *black_box(&n));
                });
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_descriptor, bench_closure);
criterion_main!(benches);
