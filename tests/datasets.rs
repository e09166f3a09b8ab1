use approx::assert_relative_eq;
use proptest::prelude::*;

use propload::noise::{noise_sequence, DEFAULT_NOISE_SHIFT, DEFAULT_RADIUS, NOISE_SEED};
use propload::{
    add_noise_adv_rat, axial_advance_ratio, generate_datasets, hf_data, lf_data, Column,
    GeneratorConfig, NoiseSettings, PropLoadError,
};

#[test]
fn worked_example_low_fidelity() {
    let table = lf_data(&[0.0, 90.0], &[10.0, 10.0], &[100.0, 100.0], 100.0, 50.0).unwrap();

    assert_eq!(table.len(), 2);
    assert_eq!(table.column_names(), ["airspeed", "discangle", "propspeed", "load"]);
    let load = table.column(Column::Load).unwrap();
    assert_relative_eq!(load[0], 50.0, epsilon = 1e-12);
    assert_relative_eq!(load[1], 66.666_666_666_666_67, epsilon = 1e-9);
}

#[test]
fn mismatched_inputs_report_both_shapes() {
    for result in [
        lf_data(&[0.0, 90.0], &[10.0, 10.0, 10.0], &[100.0, 100.0], 100.0, 50.0),
        hf_data(&[0.0, 90.0], &[10.0, 10.0, 10.0], &[100.0, 100.0], 100.0, 50.0),
    ] {
        let err = result.unwrap_err();
        assert!(matches!(err, PropLoadError::ShapeMismatch { .. }));
        let msg = err.to_string();
        assert!(msg.contains("(2,)"), "{msg}");
        assert!(msg.contains("(3,)"), "{msg}");
    }
}

#[test]
fn generated_datasets_share_inputs() {
    let config = GeneratorConfig {
        noise: Some(NoiseSettings::with_threshold(0.05)),
        ..GeneratorConfig::default()
    };
    let datasets = generate_datasets(&config).unwrap();

    assert_eq!(datasets.low.len(), config.grid.len());
    assert_eq!(datasets.high.len(), config.grid.len());
    assert!(!datasets.low.has_noise());
    assert!(datasets.high.has_noise());
    for column in [Column::Airspeed, Column::Discangle, Column::Propspeed] {
        assert_eq!(datasets.low.column(column), datasets.high.column(column));
    }

    let again = generate_datasets(&config).unwrap();
    assert_eq!(datasets, again);
}

#[test]
fn bundled_config_parses() {
    let raw = include_str!("../configs/default.toml");
    let config = GeneratorConfig::from_toml_str(raw).unwrap();
    assert_eq!(config.grid.len(), 7 * 5 * 5);
    assert!(config.noise.is_some());
}

fn inputs() -> impl Strategy<Value = (Vec<f64>, Vec<f64>, Vec<f64>)> {
    (1usize..32).prop_flat_map(|n| {
        (
            prop::collection::vec(0.0f64..90.0, n),
            prop::collection::vec(0.0f64..60.0, n),
            prop::collection::vec(200.0f64..3000.0, n),
        )
    })
}

fn expected_load(high: bool, d: f64, a: f64, p: f64, max_p: f64, base: f64, load0: f64) -> f64 {
    let scaled = load0 * (p / base).powi(2);
    let sin_d = d.to_radians().sin();
    if high {
        scaled * (0.95 + (max_p.powi(3) / p.powi(3)) * sin_d * a / 35.0)
    } else {
        scaled * (1.0 + (max_p.powi(2) / p.powi(2)) * sin_d * a / 30.0)
    }
}

proptest! {
    #[test]
    fn loads_match_closed_form((d, a, p) in inputs(), base in 500.0f64..2000.0, load0 in 1.0f64..200.0) {
        let lf = lf_data(&d, &a, &p, base, load0).unwrap();
        let hf = hf_data(&d, &a, &p, base, load0).unwrap();
        let max_p = p.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        for i in 0..d.len() {
            let lf_expected = expected_load(false, d[i], a[i], p[i], max_p, base, load0);
            let hf_expected = expected_load(true, d[i], a[i], p[i], max_p, base, load0);
            prop_assert!((lf.rows()[i].load - lf_expected).abs() <= 1e-9 * lf_expected.abs().max(1.0));
            prop_assert!((hf.rows()[i].load - hf_expected).abs() <= 1e-9 * hf_expected.abs().max(1.0));
        }
    }

    #[test]
    fn generators_keep_row_count_and_order((d, a, p) in inputs()) {
        let lf = lf_data(&d, &a, &p, 1000.0, 10.0).unwrap();
        let hf = hf_data(&d, &a, &p, 1000.0, 10.0).unwrap();

        prop_assert_eq!(lf.len(), d.len());
        prop_assert_eq!(hf.len(), d.len());
        prop_assert_eq!(lf.column(Column::Discangle), Some(d.clone()));
        prop_assert_eq!(hf.column(Column::Propspeed), Some(p.clone()));
    }

    #[test]
    fn noise_follows_threshold_rule((d, a, p) in inputs(), threshold in 0.0f64..0.5) {
        let table = hf_data(&d, &a, &p, 1000.0, 10.0).unwrap();
        let noisy = add_noise_adv_rat(table, threshold, DEFAULT_RADIUS, DEFAULT_NOISE_SHIFT);
        let noise = noise_sequence(NOISE_SEED, noisy.len());

        for (row, u) in noisy.iter().zip(noise) {
            let adv = axial_advance_ratio(row.discangle, row.airspeed, row.propspeed, DEFAULT_RADIUS);
            let expected = if adv > threshold {
                DEFAULT_NOISE_SHIFT * row.load * u
            } else {
                row.load
            };
            prop_assert_eq!(row.load_noise.map(f64::to_bits), Some(expected.to_bits()));
        }
    }

    #[test]
    fn noise_is_reproducible((d, a, p) in inputs(), threshold in 0.0f64..0.5) {
        let table = lf_data(&d, &a, &p, 1000.0, 10.0).unwrap();
        let first = add_noise_adv_rat(table.clone(), threshold, DEFAULT_RADIUS, 1.3);
        let second = add_noise_adv_rat(table, threshold, DEFAULT_RADIUS, 1.3);

        let bits = |t: &propload::LoadTable| -> Vec<u64> {
            t.iter().filter_map(|r| r.load_noise).map(f64::to_bits).collect()
        };
        prop_assert_eq!(bits(&first), bits(&second));
    }
}
