//! Offline `uyap import --bundle` runs against a temporary database.

use std::path::Path;
use std::process::Command;

use serde_json::json;

fn run_uyap(workspace: &Path, args: &[&str]) -> (serde_json::Value, String, bool) {
	let output = Command::new(env!("CARGO_BIN_EXE_uyap"))
		.current_dir(workspace)
		.env("XDG_CONFIG_HOME", workspace.join("config"))
		.env_remove("RUST_LOG")
		.args(args)
		.output()
		.expect("failed to execute uyap");

	let stdout = String::from_utf8_lossy(&output.stdout).to_string();
	let stderr = String::from_utf8_lossy(&output.stderr).to_string();
	let parsed = serde_json::from_str::<serde_json::Value>(&stdout).unwrap_or_else(|_| json!({ "raw": stdout }));
	(parsed, stderr, output.status.success())
}

fn write_bundle(dir: &Path) -> std::path::PathBuf {
	let bundle = json!({
		"basic_info": {
			"case_number": "2024/125",
			"court": "İstanbul 3. Asliye Hukuk Mahkemesi",
			"jurisdiction_type": "Hukuk",
			"status": "Açık",
			"opening_date": "03.01.2024"
		},
		"parties": [
			{ "name": "Ahmet Yılmaz", "capacity": "Davacı" },
			{ "name": "Mehmet Demir", "capacity": "Davalı", "lawyer": "Av. Ali Veli" }
		],
		"expenses": [
			{ "expense_type": "Fee", "amount": 500.0, "date": "03.01.2024", "paid": false }
		]
	});
	let path = dir.join("bundle.json");
	std::fs::write(&path, bundle.to_string()).unwrap();
	path
}

#[test]
fn import_bundle_creates_then_conflicts() {
	let dir = tempfile::tempdir().unwrap();
	let bundle = write_bundle(dir.path());
	let bundle = bundle.to_str().unwrap();
	let db = dir.path().join("cases.db");
	let db = db.to_str().unwrap();
	let args = [
		"-f", "json", "import", "--bundle", bundle, "--db", db, "--owner", "1", "--parties", "--expenses",
	];

	let (first, stderr, ok) = run_uyap(dir.path(), &args);
	assert!(ok, "first import failed: {stderr}");
	assert_eq!(first["ok"], true);
	assert_eq!(first["command"], "import");
	assert_eq!(first["data"]["action"], "created");
	assert_eq!(first["data"]["counts"]["expenses"], 1);

	let (second, stderr, ok) = run_uyap(dir.path(), &args);
	assert!(!ok);
	assert_eq!(second["ok"], false);
	assert_eq!(second["command"], "import");
	assert_eq!(second["error"]["code"], "CONFLICT");
	assert!(stderr.contains("CONFLICT"), "stderr: {stderr}");
}

#[test]
fn overwrite_updates_existing_case() {
	let dir = tempfile::tempdir().unwrap();
	let bundle = write_bundle(dir.path());
	let bundle = bundle.to_str().unwrap();
	let db = dir.path().join("cases.db");
	let db = db.to_str().unwrap();

	let (_, stderr, ok) = run_uyap(dir.path(), &["-f", "json", "import", "--bundle", bundle, "--db", db]);
	assert!(ok, "{stderr}");

	let (updated, stderr, ok) = run_uyap(
		dir.path(),
		&["-f", "json", "import", "--bundle", bundle, "--db", db, "--overwrite"],
	);
	assert!(ok, "{stderr}");
	assert_eq!(updated["data"]["action"], "updated");
}

#[test]
fn bundle_without_case_number_fails_validation() {
	let dir = tempfile::tempdir().unwrap();
	let path = dir.path().join("empty.json");
	std::fs::write(&path, r#"{ "basic_info": { "court": "X" } }"#).unwrap();
	let db = dir.path().join("cases.db");

	let (json, _stderr, ok) = run_uyap(
		dir.path(),
		&[
			"-f",
			"json",
			"import",
			"--bundle",
			path.to_str().unwrap(),
			"--db",
			db.to_str().unwrap(),
		],
	);
	assert!(!ok);
	assert_eq!(json["error"]["code"], "VALIDATION_FAILED");
	assert_eq!(json["error"]["details"]["error_kind"], "validation");
}

#[test]
fn unreadable_bundle_is_invalid_input() {
	let dir = tempfile::tempdir().unwrap();
	let (json, _stderr, ok) = run_uyap(dir.path(), &["-f", "json", "import", "--bundle", "missing.json"]);

	assert!(!ok);
	assert_eq!(json["error"]["code"], "INVALID_INPUT");
}

#[test]
fn explicit_config_must_exist() {
	let dir = tempfile::tempdir().unwrap();
	let (json, _stderr, ok) = run_uyap(
		dir.path(),
		&["-f", "json", "--config", "nope.json", "import", "--bundle", "b.json"],
	);

	assert!(!ok);
	assert_eq!(json["error"]["code"], "INVALID_INPUT");
	assert!(json["error"]["message"].as_str().unwrap().contains("nope.json"));
}
