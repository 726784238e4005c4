//! Well-log pipeline walkthrough
//!
//! Builds a synthetic two-well dataset, stores it as Parquet, then drives the
//! calculation chain through an `AnalysisSession` the way a web front end
//! would: select, validate, run, inspect, save.
//!
//! Run with: cargo run --example well_pipeline
//! Set `RUST_LOG=petrolog=debug` to see per-well and per-zone events.

use anyhow::Context;
use petrolog::catalog::parameter_definitions;
use petrolog::session::AnalysisSession;
use petrolog::storage::{DatasetStore, ParquetDatasetStore};
use petrolog::telemetry::init_tracing;
use petrolog::{Analyzer, Calculation, ParamSet, SampleTable};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;

const SAMPLES_PER_WELL: usize = 400;

fn synthetic_field() -> petrolog::Result<SampleTable> {
    let mut rng = StdRng::seed_from_u64(7);
    let mut depth = Vec::new();
    let mut gr = Vec::new();
    let mut rt = Vec::new();
    let mut rhob = Vec::new();
    let mut nphi = Vec::new();
    let mut wells = Vec::new();
    let mut markers = Vec::new();

    for (well, top) in [("ALPHA-1", 1200.0), ("BRAVO-2", 1850.0)] {
        for i in 0..SAMPLES_PER_WELL {
            let d = top + 0.5 * i as f64;
            // 25 m sand / shale cycles
            let shale = ((i / 50) % 2) == 1;
            let noise: f64 = rng.gen_range(-1.0..1.0);
            depth.push(d);
            wells.push(well);
            markers.push(if i < SAMPLES_PER_WELL / 2 { "UPPER" } else { "LOWER" });
            if shale {
                gr.push(115.0 + 8.0 * noise);
                rt.push(2.5 + 0.3 * noise);
                rhob.push(2.56 + 0.02 * noise);
                nphi.push(0.34 + 0.02 * noise);
            } else {
                gr.push(40.0 + 10.0 * noise);
                rt.push(25.0 + 8.0 * noise);
                rhob.push(2.24 + 0.04 * noise);
                nphi.push(0.21 + 0.03 * noise);
            }
        }
    }

    SampleTable::builder()
        .f64("DEPTH", depth)
        .f64("GR", gr)
        .f64("RT", rt)
        .f64("RHOB", rhob)
        .f64("NPHI", nphi)
        .text("WELL_NAME", wells)
        .text("MARKER", markers)
        .build()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing()?;

    let root = std::env::temp_dir().join("petrolog-demo");
    let store = ParquetDatasetStore::open(&root)?;
    store.save("field_raw", &synthetic_field()?)?;
    println!("Datasets in {}: {:?}", root.display(), store.list()?);

    let session = AnalysisSession::with_analyzer(Arc::new(store), Analyzer::default());
    let info = session.select_dataset("field_raw").await?;
    println!("\n{}", serde_json::to_string_pretty(&info)?);

    let form = parameter_definitions(Calculation::Sw)?;
    println!("\n{} form:", form.title);
    for p in &form.parameters {
        println!("  {:<8} {:<40} default {}", p.name, p.label, p.default);
    }

    let chain = [
        (Calculation::Vsh, ParamSet::new().with("output_log", "VSH")),
        (Calculation::Porosity, ParamSet::new()),
        (Calculation::Sw, ParamSet::new().with("SW_METHOD", "full")),
        (Calculation::Rwa, ParamSet::new()),
        (Calculation::RgbeRpbe, ParamSet::new()),
        (Calculation::RtR0, ParamSet::new()),
        (Calculation::Swgrad, ParamSet::new()),
        (Calculation::DnsDnsv, ParamSet::new()),
    ];

    println!();
    for (calculation, params) in chain {
        session
            .validate_calculation(calculation, &params)
            .await
            .with_context(|| format!("{calculation} cannot run on this dataset"))?;
        let report = session.run_calculation(calculation, params).await?;
        let elapsed = report.finished_at - report.started_at;
        println!(
            "{:<32} {:>5} rows  +{:<2} columns  {:>4} ms",
            report.calculation.title(),
            report.rows_processed,
            report.columns_added.len(),
            elapsed.num_milliseconds()
        );
    }

    for well in session.well_names().await? {
        let plot = session.plot_table(Some(&well)).await?;
        let markers = session.markers(Some(&well)).await?;
        let swgrad = plot.numeric("SWGRAD")?;
        let finite: Vec<f64> = swgrad.into_iter().filter(|v| v.is_finite()).collect();
        let mean = finite.iter().sum::<f64>() / finite.len().max(1) as f64;
        println!(
            "\n{well}: {} samples, {} marker intervals, mean SWGRAD {mean:.4}",
            plot.num_rows(),
            markers.len()
        );
        for m in markers {
            println!("  {:<6} {:>7.1} - {:<7.1}", m.name, m.top, m.bottom);
        }
    }

    let saved = session.save_current(Some("field_interpreted")).await?;
    println!("\nSaved as {saved}");
    Ok(())
}
