use criterion::{black_box, criterion_group, criterion_main, Criterion};
use godmap::clustering::suggest_extractions;
use godmap::config::Thresholds;
use godmap::core::{ClassMetrics, MethodMetrics};

fn synthetic_god_class(method_count: usize) -> ClassMetrics {
    let groups = [
        ("parse", "buffer"),
        ("render", "canvas"),
        ("persist", "store"),
        ("notify", "channel"),
    ];

    let methods: Vec<MethodMetrics> = (0..method_count)
        .map(|i| {
            let (verb, field) = groups[i % groups.len()];
            let mut m = MethodMetrics::new(format!("{verb}Item{i}"));
            m.tokens = vec![verb.to_string(), "item".to_string()];
            m.accessed_identifiers = [field.to_string(), format!("shared{}", i % 3)]
                .into_iter()
                .collect();
            m.line_count = 12 + i % 9;
            m.cyclomatic = 1 + (i % 5) as u32;
            m.is_public = i % 2 == 0;
            m
        })
        .collect();

    ClassMetrics::new("Monolith", "monolith.rs").with_methods(methods)
}

fn bench_clustering(c: &mut Criterion) {
    let thresholds = Thresholds::default();
    for size in [16usize, 48, 96] {
        let class = synthetic_god_class(size);
        c.bench_function(&format!("suggest_extractions_{size}"), |b| {
            b.iter(|| suggest_extractions(black_box(&class), black_box(&thresholds)))
        });
    }
}

criterion_group!(benches, bench_clustering);
criterion_main!(benches);
