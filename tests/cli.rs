use std::io::Write;
use assert_cmd::Command;
use predicates::prelude::*;
use predicates::str::{contains, starts_with};
use tempfile::NamedTempFile;

/// Sunday, May 26, 2024. 18:58 CEST.
const MAY_2024: u64 = 0x090BE631B120000;

/// A capture of a partial minute followed by one full minute and its boundary.
fn capture(packed: u64) -> String {
	let bits: String = (0..59).map(|i| if (packed >> i) & 1 > 0 { "1\n" } else { "0\n" }).collect();
	format!("1\n0\n\n{}\n", bits)
}

fn cmd() -> Command {
	let mut cmd = Command::cargo_bin("dcf77decode").unwrap();
	cmd.env_remove("DCF77_LOG");
	cmd
}

#[test]
fn usage_test() {
	cmd()
		.assert()
		.success()
		.stdout(starts_with("Usage: dcf77decode [OPTIONS] [DATAFILE]"))
		.stdout(contains("Empty line"));
}

#[test]
fn file_test() {
	let mut file = NamedTempFile::new().unwrap();
	file.write_all(capture(MAY_2024).as_bytes()).unwrap();

	cmd()
		.arg(file.path())
		.assert()
		.success()
		.stdout(starts_with("Waiting for the beginning of the next minute...\n"))
		.stdout(contains("Weekday (1 = Monday): 7\n2024-05-26T18:58+02:00\n"))
		.stdout(contains("Warning").not());
}

#[test]
fn stdin_test() {
	cmd()
		.arg("-")
		.write_stdin(capture(MAY_2024).replace('\n', "\r\n"))
		.assert()
		.success()
		.stdout(contains("2024-05-26T18:58+02:00\n"));
}

#[test]
fn no_sync_test() {
	cmd()
		.args(["--no-sync", "-"])
		.write_stdin(capture(MAY_2024))
		.assert()
		.success()
		.stdout(contains("Warning: First bit is not 0, this should never happen.\n"))
		.stdout(contains("Waiting").not())
		.stdout(contains("2024-05-26T18:58+02:00\n"));
}

#[test]
fn json_test() {
	cmd()
		.args(["-f", "json", "-"])
		.write_stdin(capture(MAY_2024))
		.assert()
		.success()
		.stdout(starts_with("\"Waiting\"\n"))
		.stdout(contains(
			"{\"Frame\":{\"year\":24,\"month\":5,\"day\":26,\"hour\":18,\"minute\":58,\"tz_offset\":2}}\n"
		));
}

#[test]
fn missing_file_test() {
	cmd()
		.arg("does/not/exist.txt")
		.assert()
		.failure()
		.stderr(contains("Could not open file does/not/exist.txt"));
}

#[test]
fn bad_argument_test() {
	cmd()
		.args(["--format", "xml", "-"])
		.assert()
		.failure()
		.stderr(contains("xml"));
}
