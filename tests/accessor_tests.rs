//! Round-trip and boundary tests for every accessor kind

use bitrec::{
    Error, ErrorKind, FieldDecl, RecordOptions, Registry, Value, byte_cells, define_object_record,
};

fn single(token: &str) -> bitrec::ObjectRecordType {
    Registry::new()
        .define_object_record("Single", [("v", token)], RecordOptions::default())
        .unwrap()
}

#[test]
fn test_bit_round_trip_all_widths_and_offsets() {
    let registry = Registry::new();
    for width in 1..=7usize {
        for offset in 0..8usize {
            let ty = registry
                .define_object_record(
                    "Bits",
                    [
                        FieldDecl::skip(offset),
                        FieldDecl::field("v", format!("bit{width}")),
                    ],
                    RecordOptions::bit_length(16),
                )
                .unwrap();
            let mut bytes = [0xFFu8, 0xFF];
            let view = ty.view(&mut bytes, 0).unwrap();
            for value in 0..(1i64 << width) {
                view.set("v", value).unwrap();
                assert_eq!(view.get("v"), Some(Value::Int(value)));
            }
            // neighbouring bits are untouched by any write
            view.set("v", 0).unwrap();
            let raw = u16::from_be_bytes(view.to_vec().try_into().unwrap());
            let mask = ((1u16 << width) - 1) << (16 - offset - width);
            assert_eq!(raw, !mask, "width {width} offset {offset}");
        }
    }
}

#[test]
fn test_sixteen_one_hot_bits() {
    let fields: Vec<_> = (0..16).map(|i| (format!("b{i}"), "bit1")).collect();
    let ty = define_object_record("OneHot", fields, RecordOptions::default()).unwrap();
    assert_eq!(ty.bit_length(), 16);
    assert_eq!(ty.byte_length(), 2);

    for k in 0..16 {
        let mut bytes = [0u8; 2];
        let view = ty.view(&mut bytes, 0).unwrap();
        view.set(&format!("b{k}"), 1).unwrap();
        let raw = u16::from_be_bytes(view.to_vec().try_into().unwrap());
        assert_eq!(raw, 1 << (15 - k));
        assert_eq!(raw.count_ones(), 1);
    }
}

#[test]
fn test_int_boundaries() {
    let cases: [(&str, i64, i64); 6] = [
        ("int8", -128, 127),
        ("int16", -32768, 32767),
        ("int32", i32::MIN as i64, i32::MAX as i64),
        ("uint8", 0, 255),
        ("uint16", 0, 65535),
        ("uint32", 0, u32::MAX as i64),
    ];
    for (token, min, max) in cases {
        let ty = single(token);
        let mut bytes = vec![0u8; ty.byte_length()];
        let view = ty.view(&mut bytes, 0).unwrap();

        for value in [min, max, 0, min / 2, max / 2] {
            view.set("v", value).unwrap();
            assert_eq!(view.get("v").unwrap().as_i64(), Some(value), "{token}");
        }

        view.set("v", 1).unwrap();
        for value in [min - 1, max + 1] {
            let err = view.set("v", value).unwrap_err();
            assert_eq!(
                err,
                Error::OutOfRange {
                    field: "v".to_owned(),
                    min,
                    max,
                    actual: value.to_string(),
                }
            );
            assert_eq!(err.kind(), ErrorKind::Value);
            // rejected writes leave the buffer alone
            assert_eq!(view.get("v"), Some(Value::Int(1)));
        }
    }
}

#[test]
fn test_bit_boundaries() {
    let ty = single("bit4");
    let mut bytes = [0u8];
    let view = ty.view(&mut bytes, 0).unwrap();
    view.set("v", 15).unwrap();
    assert_eq!(
        view.set("v", 16).unwrap_err().to_string(),
        "field `v` expects a value in [0..15], got 16"
    );
    assert_eq!(
        view.set("v", -1).unwrap_err().to_string(),
        "field `v` expects a value in [0..15], got -1"
    );
    assert_eq!(view.to_vec(), [0xF0]);
}

#[test]
fn test_big_endian_layout() {
    let ty = define_object_record(
        "Wide",
        [("a", "uint16"), ("b", "int32"), ("c", "uint8")],
        RecordOptions::default(),
    )
    .unwrap();
    let mut bytes = [0u8; 7];
    let view = ty.view(&mut bytes, 0).unwrap();
    view.set("a", 0x1234).unwrap();
    view.set("b", -2).unwrap();
    view.set("c", 0xAB).unwrap();
    assert_eq!(view.to_vec(), [0x12, 0x34, 0xFF, 0xFF, 0xFF, 0xFE, 0xAB]);
}

#[test]
fn test_non_integer_values_are_type_errors() {
    let ty = single("int16");
    let mut bytes = [0u8; 2];
    let view = ty.view(&mut bytes, 0).unwrap();

    let err = view.set("v", 1.5).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Value);
    assert!(matches!(err, Error::NotAnInteger { .. }));

    assert!(matches!(
        view.set("v", f64::NAN).unwrap_err(),
        Error::NotAnInteger { .. }
    ));
    assert!(matches!(
        view.set("v", "12").unwrap_err(),
        Error::NotAnInteger { .. }
    ));
    // integral floats are integers
    view.set("v", 12.0).unwrap();
    assert_eq!(view.get("v"), Some(Value::Int(12)));
}

#[test]
fn test_float32_round_trip_bit_exact() {
    let ty = single("float32");
    let mut bytes = [0u8; 4];
    let view = ty.view(&mut bytes, 0).unwrap();
    for value in [
        0.0f32,
        -0.0,
        1.5,
        -3.25,
        f32::MIN_POSITIVE,
        f32::MAX,
        f32::INFINITY,
    ] {
        view.set("v", value).unwrap();
        let read = view.get("v").unwrap().as_f64().unwrap() as f32;
        assert_eq!(read.to_bits(), value.to_bits());
    }
    view.set("v", 1.0f32).unwrap();
    assert_eq!(view.to_vec(), [0x3F, 0x80, 0x00, 0x00]);
}

#[test]
fn test_float64_round_trip_bit_exact() {
    let ty = single("double");
    assert_eq!(ty.byte_length(), 8);
    let mut bytes = [0u8; 8];
    let view = ty.view(&mut bytes, 0).unwrap();
    for value in [0.1f64, -1e300, f64::EPSILON, f64::NEG_INFINITY] {
        view.set("v", value).unwrap();
        let read = view.get("v").unwrap().as_f64().unwrap();
        assert_eq!(read.to_bits(), value.to_bits());
    }
    view.set("v", f64::NAN).unwrap();
    assert!(view.get("v").unwrap().as_f64().unwrap().is_nan());
}

#[test]
fn test_float_accepts_integers_rejects_strings() {
    let ty = single("float");
    let mut bytes = [0u8; 4];
    let view = ty.view(&mut bytes, 0).unwrap();
    view.set("v", 7).unwrap();
    assert_eq!(view.get("v"), Some(Value::Float(7.0)));
    assert_eq!(
        view.set("v", "7").unwrap_err(),
        Error::NotANumber {
            field: "v".to_owned(),
            actual: "\"7\"".to_owned(),
        }
    );
}

#[test]
fn test_reads_always_touch_memory() {
    let ty = single("uint16");
    let mut bytes = [0u8; 2];
    let cells = byte_cells(&mut bytes);
    let view = ty.view(cells, 0).unwrap();
    assert_eq!(view.get("v"), Some(Value::Int(0)));
    cells[1].set(9);
    assert_eq!(view.get("v"), Some(Value::Int(9)));
}
