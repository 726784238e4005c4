//! End-to-end pipeline scenarios
//!
//! Runs calculations through the public `Analyzer` the way a front end
//! does, and checks the columns the plotting layer reads.

use petrolog::regression::linear_fit;
use petrolog::{Analyzer, Backend, Calculation, ParamSet, SampleTable};

fn analyzer() -> Analyzer {
    Analyzer::builder().backend(Backend::Scalar).build().unwrap()
}

/// 100 samples, GR rising linearly from 20 to 150 API
fn gr_ramp() -> SampleTable {
    let n = 100;
    SampleTable::builder()
        .f64("DEPTH", (0..n).map(|i| 1500.0 + 0.5 * f64::from(i)).collect())
        .f64("GR", (0..n).map(|i| 20.0 + 130.0 * f64::from(i) / 99.0).collect())
        .build()
        .unwrap()
}

/// Synthetic sand/shale sequence with every base log present
fn full_suite() -> SampleTable {
    let n = 60;
    let mut gr = Vec::with_capacity(n);
    let mut rt = Vec::with_capacity(n);
    let mut rhob = Vec::with_capacity(n);
    let mut nphi = Vec::with_capacity(n);
    for i in 0..n {
        let shale = (i / 10) % 2 == 1;
        let wiggle = (i % 10) as f64;
        if shale {
            gr.push(110.0 + wiggle);
            rt.push(2.0 + 0.1 * wiggle);
            rhob.push(2.55 + 0.005 * wiggle);
            nphi.push(0.35 - 0.002 * wiggle);
        } else {
            gr.push(35.0 + 2.0 * wiggle);
            rt.push(20.0 + 3.0 * wiggle);
            rhob.push(2.20 + 0.01 * wiggle);
            nphi.push(0.22 - 0.005 * wiggle);
        }
    }
    SampleTable::builder()
        .f64("DEPTH", (0..n).map(|i| 2000.0 + i as f64).collect())
        .f64("GR", gr)
        .f64("RT", rt)
        .f64("RHOB", rhob)
        .f64("NPHI", nphi)
        .build()
        .unwrap()
}

#[test]
fn test_vsh_end_to_end() {
    let table = gr_ramp();
    let params = ParamSet::new().with("GR_MA", 30.0).with("GR_SH", 120.0);
    let out = analyzer().run(Calculation::Vsh, &table, &params).unwrap();

    assert_eq!(out.num_rows(), 100);
    let vsh = out.numeric("VSH_GR").unwrap();
    assert!(vsh.iter().all(|v| (0.0..=1.0).contains(v)));
    assert_eq!(vsh[0], 0.0);
    assert_eq!(vsh[99], 1.0);
    assert_eq!(
        out.numeric("DEPTH").unwrap()[0],
        table.numeric("DEPTH").unwrap()[0]
    );
    // Input table untouched
    assert!(!table.has_column("VSH_GR"));
}

#[test]
fn test_vsh_rerun_is_identical() {
    let params = ParamSet::new().with("GR_MA", 30.0).with("GR_SH", 120.0);
    let once = analyzer().run(Calculation::Vsh, &gr_ramp(), &params).unwrap();
    let twice = analyzer().run(Calculation::Vsh, &once, &params).unwrap();

    assert_eq!(once.column_names(), twice.column_names());
    assert_eq!(once.batch(), twice.batch());
}

#[test]
fn test_swgrad_single_sample() {
    let table = SampleTable::builder()
        .f64("DEPTH", vec![1000.0])
        .f64("RT", vec![10.0])
        .f64("VSH", vec![0.3])
        .f64("PHIE", vec![0.2])
        .build()
        .unwrap();
    let out = analyzer()
        .run(Calculation::Swgrad, &table, &ParamSet::new())
        .unwrap();

    let sweep: Vec<f64> = (1..=25)
        .map(|j| out.numeric(&format!("SWARRAY_{j}")).unwrap()[0])
        .collect();
    // Saltier water conducts better, so the same RT needs less of it
    for pair in sweep.windows(2) {
        assert!(pair[1] <= pair[0], "{} > {}", pair[1], pair[0]);
    }
    assert!(sweep.iter().all(|v| (0.0..=1.0).contains(v)));

    let x = [10.0, 15.0, 20.0, 25.0];
    let y = [sweep[9], sweep[14], sweep[19], sweep[24]];
    let expected = linear_fit(&x, &y).unwrap().slope;
    let swgrad = out.numeric("SWGRAD").unwrap()[0];
    assert!((swgrad - expected).abs() < 1e-12, "{swgrad} vs {expected}");
    assert!(swgrad <= 0.0);

    assert!((out.numeric("CT").unwrap()[0] - 0.1).abs() < 1e-15);
    assert!((out.numeric("FTEMP").unwrap()[0] - 125.0).abs() < 1e-12);
}

#[test]
fn test_regression_skips_single_sample_and_constant_groups() {
    // Zone 0: one reservoir sample. Zone 1: shale. Zone 2: reservoir with
    // constant GR. Zone 3: shale. Zone 4: reservoir with a usable trend.
    let table = SampleTable::builder()
        .f64("DEPTH", (0..11).map(f64::from).collect())
        .f64(
            "GR",
            vec![40.0, 100.0, 45.0, 45.0, 45.0, 100.0, 30.0, 40.0, 50.0, 60.0, 70.0],
        )
        .f64(
            "RT",
            vec![20.0, 2.0, 10.0, 12.0, 14.0, 2.0, 30.0, 25.0, 20.0, 15.0, 10.0],
        )
        .f64(
            "PHIE",
            vec![0.2, 0.05, 0.2, 0.18, 0.16, 0.05, 0.25, 0.22, 0.19, 0.16, 0.13],
        )
        .f64(
            "VSH",
            vec![0.1, 0.9, 0.1, 0.1, 0.1, 0.9, 0.1, 0.15, 0.2, 0.25, 0.3],
        )
        .build()
        .unwrap();
    let out = analyzer()
        .run(Calculation::RgbeRpbe, &table, &ParamSet::new())
        .unwrap();
    let rgbe = out.numeric("RGBE").unwrap();

    assert!(rgbe[0].is_nan(), "single-sample zone must be skipped");
    assert!(rgbe[2..5].iter().all(|v| v.is_nan()), "constant GR zone must be skipped");
    assert!(rgbe[1].is_nan() && rgbe[5].is_nan(), "non-reservoir rows stay empty");
    // RT falls 5 ohm.m per 10 API: slope -0.5, reported as 100 * slope
    assert!(rgbe[6..].iter().all(|&v| v == -50.0));
    assert!(out.numeric("R_RGBE").unwrap()[6..].iter().all(|&v| v == -1.0));
}

#[test]
fn test_rt_r0_labels_every_sample_of_a_fitted_group() {
    let table = SampleTable::builder()
        .f64("DEPTH", (0..6).map(f64::from).collect())
        .f64("RT", vec![20.0, 25.0, 30.0, 2.0, 2.5, 3.0])
        .f64("PHIE", vec![0.15, 0.2, 0.25, 0.05, 0.04, 0.03])
        .f64("VSH", vec![0.1, 0.1, 0.1, 0.8, 0.8, 0.8])
        .build()
        .unwrap();
    let out = analyzer()
        .run(Calculation::RtR0, &table, &ParamSet::new())
        .unwrap();

    let groups = out.numeric("GROUP_ID").unwrap();
    assert_eq!(groups, vec![0.0, 0.0, 0.0, 1.0, 1.0, 1.0]);
    let labels = out.text("FLUID_RTROPHIE").unwrap();
    let first = labels[0].clone();
    assert!(first.is_some());
    assert!(labels[..3].iter().all(|l| *l == first));
    assert!(matches!(first.as_deref(), Some("G" | "W")));
}

#[test]
fn test_full_chain_produces_plot_columns() {
    let analyzer = analyzer();
    let mut table = full_suite();
    let steps: [(Calculation, ParamSet); 8] = [
        (Calculation::Vsh, ParamSet::new().with("output_log", "VSH")),
        (Calculation::Porosity, ParamSet::new()),
        (Calculation::Sw, ParamSet::new()),
        (Calculation::Rwa, ParamSet::new()),
        (Calculation::RgbeRpbe, ParamSet::new()),
        (Calculation::RtR0, ParamSet::new()),
        (Calculation::Swgrad, ParamSet::new()),
        (Calculation::Gsa, ParamSet::new().with("window_size", 5)),
    ];
    for (calculation, params) in &steps {
        table = analyzer.run(*calculation, &table, params).unwrap();
        assert_eq!(table.num_rows(), 60, "{calculation} changed the row count");
    }
    let table = analyzer
        .run(Calculation::DnsDnsv, &table, &ParamSet::new())
        .unwrap();

    for column in [
        "VSH", "PHIE", "SW", "RW_TEMP", "RWA_FULL", "RWA_SIMPLE", "RWA_TAR", "IQUAL", "RGBE",
        "RPBE", "R0", "RTR0", "SWARRAY_1", "SWARRAY_25", "SWGRAD", "RGSA", "NGSA", "DGSA", "DNS",
        "DNSV",
    ] {
        assert!(table.has_column(column), "missing {column}");
    }
    assert_eq!(table.num_rows(), 60);

    let sw = table.numeric("SW").unwrap();
    assert!(sw.iter().all(|v| v.is_nan() || (0.0..=1.0).contains(v)));
    let phie = table.numeric("PHIE").unwrap();
    assert!(phie.iter().all(|v| (0.0..=1.0).contains(v)));
}

#[test]
fn test_gsa_centred_window() {
    let table = SampleTable::builder()
        .f64("GR", vec![0.0; 5])
        .f64("RT", vec![1.0, 2.0, 3.0, 4.0, 5.0])
        .f64("NPHI", vec![0.1; 5])
        .f64("RHOB", vec![2.3; 5])
        .build()
        .unwrap();
    let out = analyzer()
        .run(Calculation::Gsa, &table, &ParamSet::new().with("window_size", "3"))
        .unwrap();
    let rgsa = out.numeric("RGSA").unwrap();
    assert!(rgsa[0].is_nan() && rgsa[4].is_nan());
    assert_eq!(&rgsa[1..4], &[2.0, 3.0, 4.0]);
}

#[test]
fn test_missing_columns_named_in_one_error() {
    let table = SampleTable::builder()
        .f64("DEPTH", vec![1.0])
        .f64("RT", vec![5.0])
        .build()
        .unwrap();
    let err = analyzer()
        .run(Calculation::RgbeRpbe, &table, &ParamSet::new())
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Missing required columns for rgbe_rpbe: GR, PHIE, VSH"
    );
}
