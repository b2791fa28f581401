//! Performance benchmarks for the benefit consolidation engine.
//!
//! Measures the deterministic pipeline over synthetic rosters of growing
//! size, and the orchestrator when it has to fall back.
//!
//! Run with: `cargo bench`
//! HTML reports are generated in `target/criterion/`

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use benefit_engine::calculation::{ExclusionSource, SourceBundle, normalize, run_deterministic};
use benefit_engine::config::EngineConfig;
use benefit_engine::models::{RawTable, SourceTable};
use benefit_engine::orchestrator::Orchestrator;

const UNIONS: [&str; 5] = [
    "SINDPD SP - SIND.TRAB.EM PROC DADOS",
    "SINDPD RJ - SINDICATO PROFISSIONAIS DE PROC DADOS",
    "SINDPPD RS - SINDICATO DOS TRAB. EM PROC. DE DADOS RS",
    "SITEPD PR - SIND DOS TRAB EM EMPR PRIVADAS DE PROC DE DADOS",
    "SEM SINDICATO",
];

const TITLES: [&str; 4] = ["ANALISTA", "COORDENADOR", "DIRETOR", "TECNICO"];

fn table(name: &str, rows: Vec<Vec<Option<String>>>) -> SourceTable {
    normalize(RawTable {
        name: name.to_string(),
        rows,
    })
    .into_table()
}

fn row(cells: &[&str]) -> Vec<Option<String>> {
    cells.iter().map(|c| Some(c.to_string())).collect()
}

/// A roster of `size` employees with one in ten on an exclusion list.
fn synthetic_bundle(size: usize) -> SourceBundle {
    let mut active = vec![row(&["MATRICULA", "EMPRESA", "TITULO DO CARGO", "DESC. SITUACAO", "Sindicato"])];
    let mut excluded = vec![row(&["MATRICULA"])];

    for i in 0..size {
        let id = format!("{}", 30_000 + i);
        active.push(row(&[
            id.as_str(),
            "1410",
            TITLES[i % TITLES.len()],
            "Trabalhando",
            UNIONS[i % UNIONS.len()],
        ]));
        if i % 10 == 0 {
            excluded.push(row(&[id.as_str()]));
        }
    }

    let mut bundle = SourceBundle::with_active(table("ATIVOS.xlsx", active));
    bundle.exclusions = vec![ExclusionSource::new("afastamentos", table("AFASTAMENTOS.xlsx", excluded))];
    bundle
}

/// Benchmark: the deterministic pipeline at several roster sizes.
fn bench_pipeline_scaling(c: &mut Criterion) {
    let config = EngineConfig::default();
    let mut group = c.benchmark_group("deterministic_pipeline");

    for size in [100usize, 1_000, 10_000] {
        let bundle = synthetic_bundle(size);
        if size >= 10_000 {
            group.sample_size(10);
        }
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("employees", size), &bundle, |b, bundle| {
            b.iter(|| black_box(run_deterministic(bundle, &config)))
        });
    }

    group.finish();
}

/// Benchmark: a consolidation with no model, which always falls back.
fn bench_orchestrator_fallback(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let orchestrator = Orchestrator::new(EngineConfig::default(), None);
    let bundle = synthetic_bundle(1_000);

    let mut group = c.benchmark_group("orchestrator");
    group.throughput(Throughput::Elements(1_000));
    group.bench_function("fallback_1000", |b| {
        b.to_async(&rt)
            .iter(|| async { black_box(orchestrator.consolidate(&bundle).await) })
    });
    group.finish();
}

criterion_group!(benches, bench_pipeline_scaling, bench_orchestrator_fallback);
criterion_main!(benches);
