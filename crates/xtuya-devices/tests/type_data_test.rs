//! Scaling and range tests for integer type data.

use xtuya_devices::{DpType, IntegerTypeData, TypeData};

fn data(min: i64, max: i64, scale: u32, step: i64) -> IntegerTypeData {
    IntegerTypeData::new("dp", min, max, scale, step, None).unwrap()
}

#[test]
fn test_scenario_scaled_setpoint() {
    let dp = data(0, 1000, 1, 10);
    assert_eq!(dp.scale_value(250), 25.0);
    assert_eq!(dp.scale_value_back(25.3), 250);
    // 255 sits exactly between two steps and rounds up.
    assert_eq!(dp.scale_value_back(25.5), 260);
    assert_eq!(dp.scale_value_back(25.0), 250);
}

#[test]
fn test_round_trip_on_step_boundaries() {
    let ranges = [
        data(0, 1000, 1, 10),
        data(-200, 200, 2, 5),
        data(16, 30, 0, 1),
        data(3, 99, 3, 7),
    ];
    for dp in &ranges {
        let mut raw = dp.min;
        while raw <= dp.max {
            assert_eq!(dp.scale_value_back(dp.scale_value(raw)), raw, "{:?} raw {}", dp, raw);
            raw += dp.step;
        }
    }
}

#[test]
fn test_out_of_range_clamps() {
    let dp = data(0, 1000, 1, 10);
    for below in [-0.1, -5.0, -1e12, f64::NEG_INFINITY] {
        assert_eq!(dp.scale_value_back(below), 0);
    }
    for above in [100.1, 500.0, 1e12, f64::INFINITY] {
        assert_eq!(dp.scale_value_back(above), 1000);
    }
}

#[test]
fn test_results_always_valid_raw() {
    let dp = data(3, 99, 1, 7);
    let mut v = -2.0;
    while v < 12.0 {
        let raw = dp.scale_value_back(v);
        assert!(dp.is_valid_raw(raw), "{} -> {}", v, raw);
        v += 0.13;
    }
}

#[test]
fn test_snap_never_exceeds_max() {
    // max is not on a step boundary: 3 + 7k <= 99 tops out at 94.
    let dp = data(3, 99, 0, 7);
    assert_eq!(dp.scale_value_back(99.0), 94);
    assert_eq!(dp.scale_value_back(98.0), 94);
}

#[test]
fn test_nan_maps_to_min() {
    let dp = data(-40, 80, 0, 1);
    assert_eq!(dp.scale_value_back(f64::NAN), -40);
}

#[test]
fn test_parse_from_vendor_payload() {
    let parsed = TypeData::parse(
        "temp_set",
        DpType::Integer,
        r#"{"unit":"℃","min":50,"max":950,"scale":1,"step":5}"#,
    )
    .unwrap();
    let dp = parsed.as_integer().unwrap();
    assert_eq!(dp.min_scaled(), 5.0);
    assert_eq!(dp.max_scaled(), 95.0);
    assert_eq!(dp.step_scaled(), 0.5);
    assert_eq!(dp.unit.as_deref(), Some("℃"));
}

#[test]
fn test_invalid_payloads_rejected() {
    for values in [
        r#"{"min":10,"max":0,"scale":0,"step":1}"#,
        r#"{"min":0,"max":10,"scale":0,"step":0}"#,
        r#"{"min":0,"max":10,"scale":-1,"step":1}"#,
        r#"{"max":10}"#,
        "not json",
    ] {
        assert!(
            TypeData::parse("dp", DpType::Integer, values).is_none(),
            "accepted {}",
            values
        );
    }
}
