use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;
use techfind::fuzzy::FuzzyScorer;
use techfind::{Algorithm, EngineConfig, Matcher, MatcherKind, PatternMatcher, RecordStore, SearchEngine, Technique};

fn corpus(size: usize) -> RecordStore {
    RecordStore::new(
        (0..size)
            .map(|i| {
                Technique::new(
                    i.to_string(),
                    format!("Technique number {i}"),
                    format!("Category {}", i % 7),
                    "An attacker abuses a misconfigured service to reach the internal database \
                     and exfiltrate records through an unsanitized query parameter",
                )
            })
            .collect(),
    )
    .expect("generated ids are unique")
}

fn matcher_benchmark(c: &mut Criterion) {
    let text = "test pattern ".repeat(1000).to_lowercase();
    for kind in MatcherKind::ALL {
        let matcher = Matcher::new(kind, "pattern");
        c.bench_function(&format!("find_all/{}", matcher.name()), |b| {
            b.iter(|| matcher.find_all_folded(black_box(&text)))
        });
    }

    let scorer = FuzzyScorer::new("sql injecton");
    c.bench_function("fuzzy/score", |b| {
        b.iter(|| scorer.score(black_box("attacker manipulates a database query through sql injection")))
    });
}

fn engine_benchmark(c: &mut Criterion) {
    for algorithm in Algorithm::ALL {
        let mut config = EngineConfig::default().with_algorithm(algorithm);
        config.cache_size = 0;
        let engine = SearchEngine::new(config, corpus(200)).expect("default config is valid");
        c.bench_function(&format!("search/{algorithm}"), |b| {
            b.iter(|| engine.search(black_box("database query")))
        });
    }
}

criterion_group!(benches, matcher_benchmark, engine_benchmark);
criterion_main!(benches);
