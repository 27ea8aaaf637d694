use crate::cmd::test_support::{run_rrscript, run_rrscript_json};

#[test]
fn inspect_json_lists_values_in_order() {
	let dir = tempfile::tempdir().expect("tempdir");
	let stream = dir.path().join("in.rrms");
	let stream = stream.to_string_lossy().into_owned();

	run_rrscript_json(&[
		"build", "--out", &stream, "--value", "str:bytes=636166e9", "--value", "n:i64=-5", "--value", "flag:bool=yes", "--topic",
		"a/b", "--timestamp", "99", "--json",
	]);
	let json = run_rrscript_json(&["inspect", &stream, "--json"]);

	assert_eq!(json["compression"], "none");
	assert_eq!(json["message_count"], 1);
	let message = &json["messages"][0];
	assert_eq!(message["timestamp"], 99);
	assert_eq!(message["topic"], "a/b");
	assert_eq!(message["class"], "array");

	let values = message["values"].as_array().expect("values");
	let tags: Vec<_> = values.iter().map(|value| value["tag"].as_str().unwrap_or("")).collect();
	assert_eq!(tags, vec!["str", "n", "flag"]);
	assert_eq!(values[0]["elements"][0], "636166e9");
	assert_eq!(values[0]["width"], 4);
	assert_eq!(values[1]["elements"][0], -5);
	assert_eq!(values[2]["elements"][0], true);
}

#[test]
fn inspect_reads_zstd_streams() {
	let dir = tempfile::tempdir().expect("tempdir");
	let stream = dir.path().join("in.rrms.zst");
	let stream = stream.to_string_lossy().into_owned();

	run_rrscript_json(&["build", "--out", &stream, "--value", "t:text=hi", "--count", "3", "--zstd", "--json"]);
	let json = run_rrscript_json(&["inspect", &stream, "--json"]);
	assert_eq!(json["compression"], "zstd");
	assert_eq!(json["message_count"], 3);
}

#[test]
fn inspect_rejects_garbage() {
	let dir = tempfile::tempdir().expect("tempdir");
	let path = dir.path().join("junk.bin");
	std::fs::write(&path, b"not a stream").expect("write");
	let path = path.to_string_lossy().into_owned();

	let output = run_rrscript(&["inspect", &path]);
	assert!(!output.status.success());
	assert!(String::from_utf8_lossy(&output.stderr).contains("error:"));
}
