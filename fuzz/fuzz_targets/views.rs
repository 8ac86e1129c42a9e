#![no_main]

use std::sync::OnceLock;

use bitrec::{
    FixedSequence, ObjectRecordType, RecordOptions, Registry, StandardTextEncoder, TypeToken,
    Value, byte_cells,
};
use libfuzzer_sys::fuzz_target;

fn record() -> &'static ObjectRecordType {
    static RECORD: OnceLock<ObjectRecordType> = OnceLock::new();
    RECORD.get_or_init(|| {
        let registry = Registry::with_text_encoder(StandardTextEncoder);
        let inner = registry
            .define_object_record("Inner", [("a", "bit3"), ("b", "bit7")], RecordOptions::default())
            .unwrap();
        registry
            .object_record("Fuzz")
            .field("flag", "bit1")
            .field("mode", "bit5")
            .field("wide", "bit7")
            .skip(3)
            .field("small", "int8")
            .field("word", "uint16")
            .field("long", "int32")
            .field("real", "float64")
            .field("text", TypeToken::string("mutf8", 6))
            .field("inner", &inner)
            .field("bits", TypeToken::array("bit3", 5))
            .define()
            .unwrap()
    })
}

fuzz_target!(|data: &[u8]| {
    let Some((&offset, rest)) = data.split_first() else {
        return;
    };
    let ty = record();
    let mut bytes = rest.to_vec();
    let cells = byte_cells(&mut bytes);
    let Ok(view) = ty.view(cells, usize::from(offset)) else {
        assert!(usize::from(offset) + ty.byte_length() > cells.len());
        return;
    };

    // every read of arbitrary bytes succeeds
    let before = view.to_vec();
    for (_, value) in view.entries() {
        let _ = value.to_json();
    }

    // in-domain writes read back exactly and stay inside the window
    let seed = before.first().copied().unwrap_or_default();
    let domain = i64::from(seed);
    view.set("mode", domain % 32).unwrap();
    assert_eq!(view.get("mode"), Some(Value::Int(domain % 32)));
    view.set("word", domain * 257).unwrap();
    assert_eq!(view.get("word"), Some(Value::Int(domain * 257)));
    assert!(view.set("small", 128 + domain).is_err());

    let bits = view.get("bits").unwrap();
    let bits = bits.as_array().unwrap();
    bits.fill(Value::Int(domain % 8), ..).unwrap();
    assert!(bits.every(|value, _| *value == Value::Int(domain % 8)));

    let start = usize::from(offset);
    let end = start + ty.byte_length();
    assert!(cells[..start].iter().zip(&rest[..start]).all(|(c, b)| c.get() == *b));
    assert!(cells[end..].iter().zip(&rest[end..]).all(|(c, b)| c.get() == *b));
});
