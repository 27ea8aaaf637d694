use std::path::PathBuf;
use std::process::{Command, Output};
use std::sync::OnceLock;

static RRSCRIPT_BIN: OnceLock<PathBuf> = OnceLock::new();

pub(crate) fn run_rrscript(args: &[&str]) -> Output {
	Command::new(rrscript_bin()).args(args).output().expect("rrscript command executes")
}

pub(crate) fn run_rrscript_json(args: &[&str]) -> serde_json::Value {
	let output = run_rrscript(args);
	assert!(
		output.status.success(),
		"rrscript command failed with status={}: {}",
		output.status,
		String::from_utf8_lossy(&output.stderr)
	);
	serde_json::from_slice(&output.stdout).expect("stdout should be valid json")
}

fn rrscript_bin() -> &'static PathBuf {
	RRSCRIPT_BIN.get_or_init(resolve_rrscript_bin)
}

fn resolve_rrscript_bin() -> PathBuf {
	if let Ok(path) = std::env::var("CARGO_BIN_EXE_rrscript") {
		return PathBuf::from(path);
	}

	let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
	let target_dir = std::env::var_os("CARGO_TARGET_DIR")
		.map(PathBuf::from)
		.unwrap_or_else(|| manifest_dir.join("target"));

	let mut bin = target_dir.join("debug");
	bin.push(if cfg!(windows) { "rrscript.exe" } else { "rrscript" });

	let status = Command::new("cargo")
		.current_dir(&manifest_dir)
		.args(["build", "--quiet", "--bin", "rrscript"])
		.status()
		.expect("cargo build executes");
	assert!(status.success(), "failed to build rrscript binary at {}", bin.display());

	bin
}
