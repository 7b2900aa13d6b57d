//! Criterion benchmarks for the hot paths.
//!
//! Benchmarks:
//! 1. Full bar-loop backtest at several series lengths
//! 2. Indicator precompute batch
//! 3. Ensemble evaluation overhead vs a single strategy

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use regimelab_core::domain::{
    Bar, FeeModel, MeanReversionParams, RegimeParams, RiskParams, SignalParams, StrategyParams,
};
use regimelab_core::engine::{run_backtest, EngineConfig};
use regimelab_core::indicators::{
    EfficiencyRatio, Ema, Indicator, IndicatorFrame, Momentum, RollingVolatility, Rsi,
};

fn make_bars(n: usize) -> Vec<Bar> {
    let base_date = chrono::NaiveDate::from_ymd_opt(2020, 1, 2).unwrap();
    (0..n)
        .map(|i| {
            let close = 100.0 + (i as f64 * 0.1).sin() * 10.0;
            Bar {
                symbol: "BENCH".to_string(),
                date: base_date + chrono::Duration::days(i as i64),
                close,
                volume: 1_000_000 + (i as u64 % 500_000),
            }
        })
        .collect()
}

fn mr_member(entry: f64, exit: f64) -> SignalParams {
    SignalParams::MeanReversion(MeanReversionParams {
        rsi_period: 4,
        entry_threshold: entry,
        exit_threshold: exit,
        boost: 0.0,
        vol_floor: 0.0,
    })
}

fn params(signal: SignalParams) -> StrategyParams {
    StrategyParams::new(
        signal,
        RegimeParams {
            er_window: 10,
            er_low: 0.3,
            er_high: 0.9,
            vol_window: 10,
            dwell_bars: 0,
        },
        RiskParams {
            base_fraction: 0.5,
            vol_scale: 5.0,
            max_fraction: 0.5,
            max_hold_bars: 15,
            adaptive_hold: None,
            return_cap: 0.25,
            fee_model: FeeModel::PercentNotional { rate: 0.001 },
        },
    )
    .expect("bench params are valid")
}

fn bench_bar_loop(c: &mut Criterion) {
    let mut group = c.benchmark_group("bar_loop");
    let config = EngineConfig::default();
    let strategy_params = params(mr_member(35.0, 65.0));

    for n in [252, 1260, 5040] {
        let bars = make_bars(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &bars, |b, bars| {
            b.iter(|| {
                let run = run_backtest(black_box(bars), &strategy_params, &config).unwrap();
                black_box(run.final_capital())
            })
        });
    }
    group.finish();
}

fn bench_indicator_precompute(c: &mut Criterion) {
    let bars = make_bars(5040);
    let indicators: Vec<Box<dyn Indicator>> = vec![
        Box::new(Rsi::new(14)),
        Box::new(Ema::new(10)),
        Box::new(Ema::new(50)),
        Box::new(RollingVolatility::new(21)),
        Box::new(EfficiencyRatio::new(10)),
        Box::new(Momentum::new(20)),
    ];

    c.bench_function("indicator_precompute_5040", |b| {
        b.iter(|| black_box(IndicatorFrame::compute(black_box(&bars), &indicators)))
    });
}

fn bench_ensemble_overhead(c: &mut Criterion) {
    let bars = make_bars(1260);
    let config = EngineConfig::default();

    let single = params(mr_member(35.0, 65.0));
    let ensemble = params(SignalParams::Ensemble {
        members: vec![
            mr_member(35.0, 65.0),
            mr_member(30.0, 70.0),
            mr_member(40.0, 60.0),
        ],
        quorum: 2,
    });

    let mut group = c.benchmark_group("ensemble_overhead");
    group.bench_function("single", |b| {
        b.iter(|| black_box(run_backtest(&bars, &single, &config).unwrap().signal_count))
    });
    group.bench_function("ensemble_3", |b| {
        b.iter(|| black_box(run_backtest(&bars, &ensemble, &config).unwrap().signal_count))
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_bar_loop,
    bench_indicator_precompute,
    bench_ensemble_overhead
);
criterion_main!(benches);
