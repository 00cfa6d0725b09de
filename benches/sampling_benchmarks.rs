use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use bmx280_sampler::{
    sampling::emit::MemorySink, summarize, CancelSignal, PressureUnit, Reading, RunConfig,
    RunResult, Sampler, SensorModel, SimulatedSensor, SummaryFormatter, TemperatureUnit,
};

fn synthetic_run(model: SensorModel, samples: usize) -> RunResult {
    let readings = (0..samples)
        .map(|i| {
            let wobble = (i % 17) as f64 * 0.01;
            match model {
                SensorModel::Bme280 => Reading::Bme280 {
                    temperature_c: 22.0 + wobble,
                    humidity_percent: 40.0 + wobble,
                    pressure_pa: 101_000.0 + wobble * 100.0,
                },
                SensorModel::Bmp280 => Reading::Bmp280 {
                    temperature_c: 22.0 + wobble,
                    pressure_pa: 101_000.0 + wobble * 100.0,
                },
            }
        })
        .collect();
    RunResult::from_samples(model, samples as u64, readings)
}

/// Benchmark aggregation over runs of different lengths
fn bench_summarize(c: &mut Criterion) {
    let config = RunConfig::default()
        .with_temperature_unit(TemperatureUnit::Fahrenheit)
        .with_pressure_unit(PressureUnit::Atm);

    for samples in [10, 120, 3600].iter() {
        let run = synthetic_run(SensorModel::Bme280, *samples);
        c.bench_with_input(BenchmarkId::new("summarize_bme280", samples), &run, |b, run| {
            b.iter(|| summarize(run, &config).expect("Should summarize"))
        });
    }
}

/// Benchmark rendering of the summary line
fn bench_summary_line(c: &mut Criterion) {
    let config = RunConfig::default();
    let summary = summarize(&synthetic_run(SensorModel::Bme280, 120), &config)
        .expect("Should summarize");

    c.bench_function("summary_line", |b| {
        b.iter(|| SummaryFormatter::summary_line(&summary))
    });
}

/// Benchmark a full zero-interval run against the simulator
fn bench_sampling_loop(c: &mut Criterion) {
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .start_paused(true)
        .build()
        .expect("Should create tokio runtime");

    c.bench_function("sampling_loop_paused_clock", |b| {
        b.to_async(&rt).iter(|| async {
            let mut sensor = SimulatedSensor::drifting(SensorModel::Bmp280, Some(5))
                .with_latency(std::time::Duration::from_millis(100));
            Sampler::new(RunConfig::new(10, 0))
                .run(&mut sensor, &mut CancelSignal::never(), &mut MemorySink::new())
                .await
        })
    });
}

criterion_group!(benches, bench_summarize, bench_summary_line, bench_sampling_loop);
criterion_main!(benches);
