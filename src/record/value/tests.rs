use crate::record::{Array, Charset, Element, RecordError, Value, ValueKind};

fn assert_layout(value: &Value) {
	assert_eq!(value.byte_len(), value.element_count() * value.element_width(), "layout invariant broken for {value:?}");
}

#[test]
fn fresh_value_adopts_kind_of_first_element() {
	let mut value = Value::new();
	value.set_tag("my_tag");
	value.set(0, "my_value").expect("first set");

	assert_eq!(value.tag(), Some("my_tag"));
	assert_eq!(value.kind(), ValueKind::Text);
	assert_eq!(value.element_count(), 1);
	assert_eq!(value.element_width(), 8);
	assert_eq!(value.get(0).expect("element 0"), Element::from("my_value"));
	assert_layout(&value);
}

#[test]
fn get_past_end_is_index_out_of_range() {
	let value = Value::tagged("n", 1_i64).expect("value");
	let err = value.get(1).expect_err("only one element");
	assert!(matches!(err, RecordError::IndexOutOfRange { index: 1, count: 1 }));
}

#[test]
fn set_appends_at_count_and_rejects_gaps() {
	let mut value = Value::tagged("n", 1_i64).expect("value");
	value.set(1, 2_i64).expect("append at count");
	value.push(3_i64).expect("push");
	assert_eq!(value.element_count(), 3);
	assert_eq!(value.byte_len(), 24);

	let err = value.set(5, 9_i64).expect_err("gap");
	assert!(matches!(err, RecordError::IndexOutOfRange { index: 5, count: 3 }));
	assert_eq!(value.element_count(), 3);
	assert_layout(&value);
}

#[test]
fn set_overwrites_in_place_with_coercion() {
	let mut value = Value::tagged("n", 1_i64).expect("value");
	value.push(2_i64).expect("append");
	value.set(0, "40").expect("text parses as signed");
	value.set(1, true).expect("bool widens to signed");

	assert_eq!(value.elements().expect("decode"), vec![Element::Signed(40), Element::Signed(1)]);
	assert_layout(&value);
}

#[test]
fn single_variable_element_re_derives_width() {
	let mut value = Value::tagged("str", "hi").expect("value");
	value.set(0, "a longer string").expect("resize");
	assert_eq!(value.element_width(), 15);
	assert_eq!(value.byte_len(), 15);
	assert_layout(&value);
}

#[test]
fn multi_element_value_rejects_differing_width() {
	let mut value = Value::tagged("pair", "ab").expect("value");
	value.push("cd").expect("same width");

	let err = value.set(1, "xyz").expect_err("width differs");
	assert!(matches!(err, RecordError::ElementWidthMismatch { width: 2, got: 3, .. }));
	assert_eq!(value.elements().expect("decode"), vec![Element::from("ab"), Element::from("cd")]);
	assert_layout(&value);
}

#[test]
fn failed_coercion_leaves_value_unchanged() {
	let mut value = Value::tagged("n", 7_u64).expect("value");
	let before = value.clone();
	assert!(value.set(0, -1_i64).is_err());
	assert!(value.set(0, Array::new()).is_err());
	assert_eq!(value, before);
}

#[test]
fn decode_latin1_then_set_stores_new_byte_length() {
	let mut value = Value::tagged("str", vec![b'c', b'a', b'f', 0xE9]).expect("value");
	value.set_type(ValueKind::Bytes).expect("already bytes");

	let decoded = value.decode(0, Charset::Latin1).expect("latin1 decodes");
	assert_eq!(decoded.as_text(), Some("café"));
	assert_eq!(value.byte_len(), 4, "decode must not mutate");

	let mut text = Value::with_kind(ValueKind::Text);
	text.set(0, decoded).expect("store decoded");
	assert_eq!(text.byte_len(), "café".len());
	assert_eq!(text.element_width(), 5);
	assert_layout(&text);
}

#[test]
fn encode_reverses_decode() {
	let original = vec![0x00_u8, 0x7F, 0x80, 0xFF];
	let value = Value::tagged("raw", original.clone()).expect("value");
	let decoded = value.decode(0, Charset::Latin1).expect("decodes");

	let text = Value::tagged("txt", decoded).expect("value");
	assert_eq!(text.encode(0, Charset::Latin1).expect("encodes"), Element::Bytes(original));
}

#[test]
fn decode_rejects_numeric_kinds() {
	let value = Value::tagged("n", 1_i64).expect("value");
	assert!(matches!(value.decode(0, Charset::Utf8), Err(RecordError::TypeMismatch { from: "signed", .. })));
}

#[test]
fn set_type_reinterprets_whole_multiples() {
	let mut value = Value::tagged("raw", vec![0_u8, 0, 0, 0, 0, 0, 0, 5, 0, 0, 0, 0, 0, 0, 0, 6]).expect("value");
	value.set_type(ValueKind::Unsigned).expect("16 bytes is two words");

	assert_eq!(value.element_count(), 2);
	assert_eq!(value.element_width(), 8);
	assert_eq!(value.elements().expect("decode"), vec![Element::Unsigned(5), Element::Unsigned(6)]);

	value.set_type(ValueKind::Bool).expect("any length fits bool");
	assert_eq!(value.element_count(), 16);
	assert_layout(&value);
}

#[test]
fn set_type_size_mismatch_keeps_state() {
	let mut value = Value::tagged("str", "hello").expect("value");
	let before = value.clone();

	let err = value.set_type(ValueKind::Signed).expect_err("5 bytes is not a multiple of 8");
	assert!(matches!(err, RecordError::SizeMismatch { kind: "signed", byte_len: 5, width: 8 }));
	assert_eq!(value, before);
	assert_eq!(value.kind(), ValueKind::Text);
}

#[test]
fn set_type_to_text_validates_utf8() {
	let mut value = Value::tagged("raw", vec![0xC3_u8]).expect("value");
	let err = value.set_type(ValueKind::Text).expect_err("truncated sequence");
	assert!(matches!(err, RecordError::Encoding { charset: "utf-8", .. }));
	assert_eq!(value.kind(), ValueKind::Bytes);
}

#[test]
fn empty_text_elements_cannot_become_fixed_width() {
	let mut value = Value::tagged("e", "").expect("value");
	value.push("").expect("second empty element");
	assert_eq!(value.element_count(), 2);
	assert_eq!(value.byte_len(), 0);
	assert!(matches!(value.set_type(ValueKind::Bool), Err(RecordError::SizeMismatch { .. })));
}

#[test]
fn with_kind_coerces_first_element() {
	let mut value = Value::with_kind(ValueKind::Decimal);
	value.set(0, 3_i64).expect("integer widens");
	assert_eq!(value.get(0).expect("element"), Element::Decimal(3.0));
	assert_eq!(value.element_width(), 8);
}

#[test]
fn from_raw_checks_layout() {
	assert!(Value::from_raw(Some("x"), ValueKind::Signed, 8, 2, vec![0; 16]).is_ok());
	assert!(matches!(
		Value::from_raw(Some("x"), ValueKind::Signed, 8, 2, vec![0; 15]),
		Err(RecordError::SizeMismatch { .. })
	));
	assert!(matches!(
		Value::from_raw(None, ValueKind::Bool, 2, 1, vec![0; 2]),
		Err(RecordError::SizeMismatch { .. })
	));
	assert!(Value::from_raw(None, ValueKind::Text, 1, 1, vec![0xFF]).is_err());
}

#[test]
fn nested_array_elements_decode_to_arrays() {
	let mut inner = Array::new();
	inner.append(Value::tagged("deep", "x").expect("value"));
	let value = Value::tagged("outer", inner.clone()).expect("value");

	assert_eq!(value.kind(), ValueKind::Array);
	assert_eq!(value.get(0).expect("element"), Element::Array(inner));
}

#[test]
fn zero_width_elements_share_an_empty_buffer() {
	let mut value = Value::tagged("e", "").expect("value");
	value.push("").expect("same zero width");
	assert_eq!(value.element_count(), 2);
	assert_eq!(value.element_width(), 0);
	assert_eq!(value.byte_len(), 0);
	assert_eq!(value.elements().expect("decode"), vec![Element::from(""), Element::from("")]);

	let err = value.set(1, "x").expect_err("width differs");
	assert!(matches!(err, RecordError::ElementWidthMismatch { width: 0, got: 1, .. }));
	assert_layout(&value);
}

#[test]
fn from_raw_caps_zero_width_counts() {
	let err = Value::from_raw(None, ValueKind::Text, 0, usize::MAX, Vec::new()).expect_err("unbounded count");
	assert!(matches!(err, RecordError::WireTooManyValues { what: "elements", .. }));

	let value = Value::from_raw(None, ValueKind::Bytes, 0, 3, Vec::new()).expect("small count");
	assert_eq!(value.element_count(), 3);
}
