//! Array views and the fixed-length sequence operations

use bitrec::{
    Error, ErrorKind, FixedSequence, RecordOptions, Registry, Value, byte_cells,
    define_array_record, define_object_record,
};

fn ints(values: &[Value<'_>]) -> Vec<i64> {
    values.iter().map(|value| value.as_i64().unwrap()).collect()
}

fn uint8_array(bytes: &mut [u8]) -> bitrec::ArrayView<'_> {
    define_array_record("uint8", bytes.len())
        .unwrap()
        .view(bytes, 0)
        .unwrap()
}

#[test]
fn test_int16_pair() {
    let ty = define_array_record("int16", 2).unwrap();
    assert_eq!(ty.len(), 2);
    assert_eq!(ty.byte_length(), 4);

    let mut bytes = [0x01, 0x02, 0x03, 0x04];
    let view = ty.view(&mut bytes, 0).unwrap();
    assert_eq!(view.get(0), Some(Value::Int(258)));
    assert_eq!(view.get(1), Some(Value::Int(772)));
    assert_eq!(view.get(2), None);

    view.set(0, -1).unwrap();
    assert_eq!(view.to_vec(), [0xFF, 0xFF, 0x03, 0x04]);
}

#[test]
fn test_zero_length_array() {
    let ty = define_array_record("int32", 0).unwrap();
    assert_eq!(ty.len(), 0);
    assert!(ty.is_empty());
    assert_eq!(ty.byte_length(), 0);

    let mut bytes: [u8; 0] = [];
    let view = ty.view(&mut bytes, 0).unwrap();
    assert!(view.is_empty());
    let err = view.set(0, 1).unwrap_err();
    assert_eq!(err, Error::IndexOutOfBounds { index: 0, length: 0 });
    assert_eq!(err.kind(), ErrorKind::Immutability);
    assert_eq!(view.get(0), None);
    assert_eq!(view.to_json().to_string(), "[]");
}

#[test]
fn test_index_past_end() {
    let mut bytes = [0u8; 3];
    let view = uint8_array(&mut bytes);
    assert!(matches!(
        view.set(3, 1).unwrap_err(),
        Error::IndexOutOfBounds { index: 3, length: 3 }
    ));
}

#[test]
fn test_element_errors_name_the_index() {
    let mut bytes = [0u8; 2];
    let view = uint8_array(&mut bytes);
    let err = view.set(1, 256).unwrap_err();
    assert_eq!(
        err,
        Error::OutOfRange {
            field: "uint8$2[1]".to_owned(),
            min: 0,
            max: 255,
            actual: "256".to_owned(),
        }
    );
    assert_eq!(view.to_vec(), [0, 0]);
}

#[test]
fn test_packed_bit_elements() {
    let ty = define_array_record("bit3", 5).unwrap();
    let mut bytes = [0u8; 2];
    let view = ty.view(&mut bytes, 0).unwrap();
    for (index, value) in [1, 2, 3, 4, 5].into_iter().enumerate() {
        view.set(index, value).unwrap();
    }
    // 001 010 011 100 101 + 1 padding bit
    assert_eq!(view.to_vec(), [0b0010_1001, 0b1100_1010]);
    // the inherent `to_vec` copies bytes; the sequence one copies elements
    assert_eq!(ints(&FixedSequence::to_vec(&view)), [1, 2, 3, 4, 5]);
}

#[test]
fn test_iteration() {
    let mut bytes = [1, 2, 3, 4];
    let view = uint8_array(&mut bytes);
    assert_eq!(view.iter().len(), 4);
    assert_eq!(ints(&view.iter().rev().collect::<Vec<_>>()), [4, 3, 2, 1]);

    let mut sum = 0;
    for value in &view {
        sum += value.as_i64().unwrap();
    }
    assert_eq!(sum, 10);

    let mut iter = view.iter();
    assert_eq!(iter.next(), Some(Value::Int(1)));
    assert_eq!(iter.next_back(), Some(Value::Int(4)));
    assert_eq!(iter.len(), 2);
}

#[test]
fn test_search_operations() {
    let mut bytes = [5, 8, 5, 1];
    let view = uint8_array(&mut bytes);
    let even = |value: &Value<'_>, _: usize| value.as_i64().unwrap() % 2 == 0;

    assert_eq!(view.find(|value, _| value.as_i64() == Some(5)), Some(Value::Int(5)));
    assert_eq!(view.find_index(even), Some(1));
    assert_eq!(view.find_last(|value, _| *value == Value::Int(5)), Some(Value::Int(5)));
    assert_eq!(view.find_last_index(|value, _| *value == Value::Int(5)), Some(2));
    assert_eq!(view.find(|value, _| value.as_i64() == Some(9)), None);

    assert_eq!(view.index_of(&Value::Int(5)), Some(0));
    assert_eq!(view.last_index_of(&Value::Int(5)), Some(2));
    assert_eq!(view.index_of(&Value::Float(8.0)), Some(1));
    assert_eq!(view.index_of(&Value::Int(7)), None);
    assert!(view.includes(&Value::Int(1)));
    assert!(!view.includes(&Value::Int(2)));

    assert!(view.some(even));
    assert!(!view.every(even));
    assert!(view.every(|value, _| value.as_i64().unwrap() > 0));
}

#[test]
fn test_empty_sequence_predicates() {
    let ty = define_array_record("uint8", 0).unwrap();
    let mut bytes: [u8; 0] = [];
    let view = ty.view(&mut bytes, 0).unwrap();
    assert!(view.every(|_, _| false));
    assert!(!view.some(|_, _| true));
    assert_eq!(view.join(","), "");
    assert_eq!(view.reduce(7, |acc, _, _| acc + 1), 7);
}

#[test]
fn test_includes_nan() {
    let ty = define_array_record("float64", 2).unwrap();
    let mut bytes = [0u8; 16];
    let view = ty.view(&mut bytes, 0).unwrap();
    view.set(1, f64::NAN).unwrap();
    assert!(view.includes(&Value::Float(f64::NAN)));
    assert_eq!(view.index_of(&Value::Float(f64::NAN)), None);
    // SameValueZero: +0 matches -0
    assert!(view.includes(&Value::Float(-0.0)));
}

#[test]
fn test_transforming_operations() {
    let mut bytes = [1, 2, 3, 4];
    let view = uint8_array(&mut bytes);

    assert_eq!(view.map(|value, index| value.as_i64().unwrap() * index as i64), [0, 2, 6, 12]);
    assert_eq!(ints(&view.filter(|value, _| value.as_i64().unwrap() > 2)), [3, 4]);
    assert_eq!(ints(&view.slice(1..3)), [2, 3]);
    assert_eq!(ints(&view.slice(2..)), [3, 4]);
    assert_eq!(ints(&view.slice(3..99)), [4]);
    assert!(view.slice(5..).is_empty());
    assert_eq!(ints(&view.concat([Value::Int(9)])), [1, 2, 3, 4, 9]);
    assert_eq!(view.join("-"), "1-2-3-4");

    let sum = view.reduce(0, |acc, value, _| acc + value.as_i64().unwrap());
    assert_eq!(sum, 10);
    let digits = view.reduce_right(String::new(), |mut acc, value, _| {
        acc.push_str(&value.to_string());
        acc
    });
    assert_eq!(digits, "4321");

    let mut seen = Vec::new();
    view.for_each(|value, index| seen.push((index, value.as_i64().unwrap())));
    assert_eq!(seen, [(0, 1), (1, 2), (2, 3), (3, 4)]);

    // none of the above touched the buffer
    assert_eq!(view.to_vec(), [1, 2, 3, 4]);
}

#[test]
fn test_sort_and_reverse() {
    let ty = define_array_record("int8", 5).unwrap();
    let mut bytes = [3, 0xFF, 7, 0, 0xFE];
    let view = ty.view(&mut bytes, 0).unwrap();

    view.sort().unwrap();
    assert_eq!(view.to_vec(), [0xFE, 0xFF, 0, 3, 7]);

    view.reverse().unwrap();
    assert_eq!(view.to_vec(), [7, 3, 0, 0xFF, 0xFE]);

    view.sort_by(|a, b| b.total_cmp(a)).unwrap();
    assert_eq!(view.to_vec(), [7, 3, 0, 0xFF, 0xFE]);
}

#[test]
fn test_fill() {
    let mut bytes = [0u8; 5];
    let view = uint8_array(&mut bytes);
    view.fill(Value::Int(9), 1..3).unwrap();
    assert_eq!(view.to_vec(), [0, 9, 9, 0, 0]);
    view.fill(Value::Int(1), ..).unwrap();
    assert_eq!(view.to_vec(), [1, 1, 1, 1, 1]);

    let err = view.fill(Value::Int(300), 3..).unwrap_err();
    assert!(matches!(err, Error::OutOfRange { .. }));
    assert_eq!(view.to_vec(), [1, 1, 1, 1, 1]);
}

#[test]
fn test_copy_within() {
    let mut bytes = [1, 2, 3, 4, 5];
    let view = uint8_array(&mut bytes);
    view.copy_within(0, 3..).unwrap();
    assert_eq!(view.to_vec(), [4, 5, 3, 4, 5]);

    // overlapping forward copy reads the source first
    view.copy_within(1, 0..4).unwrap();
    assert_eq!(view.to_vec(), [4, 4, 5, 3, 4]);

    // clamped at the end
    view.copy_within(4, ..).unwrap();
    assert_eq!(view.to_vec(), [4, 4, 5, 3, 4]);
}

#[test]
fn test_multi_dimensional() {
    let registry = Registry::new();
    let row = registry.define_array_record("uint8", 3).unwrap();
    let matrix = registry.define_array_record(&row, 2).unwrap();
    let mut bytes = [1, 2, 3, 4, 5, 6];
    let view = matrix.view(&mut bytes, 0).unwrap();

    let second = view.get(1).unwrap();
    let second = second.as_array().unwrap();
    assert_eq!(second.get(2), Some(Value::Int(6)));
    second.set(0, 40).unwrap();
    assert_eq!(view.to_vec(), [1, 2, 3, 40, 5, 6]);

    // rows themselves are read-only
    assert!(matches!(view.set(0, 1).unwrap_err(), Error::ReadOnlyField { .. }));
    assert_eq!(view.to_json().to_string(), "[[1, 2, 3], [40, 5, 6]]");
}

#[test]
fn test_array_of_records() {
    let point = define_object_record("Point", [("x", "int8"), ("y", "int8")], RecordOptions::default())
        .unwrap();
    let points = define_array_record(&point, 3).unwrap();
    assert_eq!(points.name(), "Point$3");
    assert_eq!(points.byte_length(), 6);

    let mut bytes = [0u8; 6];
    let cells = byte_cells(&mut bytes);
    let view = points.view(cells, 0).unwrap();
    for (index, value) in view.iter().enumerate() {
        let point = value.as_object().unwrap();
        point.set("x", index as i64).unwrap();
        point.set("y", -(index as i64)).unwrap();
    }
    assert_eq!(
        cells.iter().map(|cell| cell.get()).collect::<Vec<_>>(),
        [0, 0, 1, 0xFF, 2, 0xFE]
    );

    let found = view.find(|value, _| value.as_object().unwrap().get("x") == Some(Value::Int(2)));
    assert!(found.is_some());
    assert!(view.record(2).is_some());
    assert!(view.record(3).is_none());
}

#[test]
fn test_nested_array_field_in_object() {
    let ty = define_object_record(
        "Frame",
        [("id", "uint8".into()), ("samples", bitrec::TypeToken::array("int16", 2))],
        RecordOptions::default(),
    )
    .unwrap();
    let mut bytes = [0u8; 5];
    let view = ty.view(&mut bytes, 0).unwrap();
    let samples = view.get("samples").unwrap();
    let samples = samples.as_array().unwrap();
    samples.set(1, -2).unwrap();
    assert_eq!(view.to_vec(), [0, 0, 0, 0xFF, 0xFE]);
    assert!(matches!(
        view.set("samples", 0).unwrap_err(),
        Error::ReadOnlyField { .. }
    ));
}
