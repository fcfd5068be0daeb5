#![allow(deprecated)] // assert_cmd::Command::cargo_bin is deprecated but replacement requires nightly

use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};

fn pathbridge_cmd(home: &Path) -> assert_cmd::Command {
	let mut cmd = assert_cmd::Command::cargo_bin("pathbridge").unwrap();
	// Keep the user's own ~/.pathbridge.toml out of the cascade.
	cmd.env("HOME", home).env_remove("PATHBRIDGE_LOG");
	cmd
}

/// Canonicalize to handle macOS /var -> /private/var symlinks.
fn temp_root(temp_dir: &tempfile::TempDir) -> PathBuf {
	temp_dir.path().canonicalize().unwrap()
}

fn write_config(dir: &Path, content: &str) -> PathBuf {
	let config_path = dir.join(".pathbridge.toml");
	fs::write(&config_path, content).unwrap();
	config_path
}

// ============================================================================
// CLI flag tests
// ============================================================================

#[test]
fn test_help_flag() {
	let temp_dir = tempfile::tempdir().unwrap();
	pathbridge_cmd(temp_dir.path())
		.arg("--help")
		.assert()
		.success()
		.stdout(predicate::str::contains("rewrites filesystem paths"));
}

#[test]
fn test_version_flag() {
	let temp_dir = tempfile::tempdir().unwrap();
	pathbridge_cmd(temp_dir.path())
		.arg("--version")
		.assert()
		.success()
		.stdout(predicate::str::contains("pathbridge"));
}

#[test]
fn test_no_remote_command_configured() {
	let temp_dir = tempfile::tempdir().unwrap();
	write_config(temp_dir.path(), "root = true\n");

	pathbridge_cmd(temp_dir.path())
		.current_dir(temp_dir.path())
		.assert()
		.failure()
		.stderr(predicate::str::contains("No remote command configured"));
}

#[test]
fn test_remote_command_not_found() {
	let temp_dir = tempfile::tempdir().unwrap();

	pathbridge_cmd(temp_dir.path())
		.current_dir(temp_dir.path())
		.args(["--", "nonexistent_command_12345"])
		.assert()
		.failure()
		.stderr(predicate::str::contains("not found"));
}

// ============================================================================
// --init tests
// ============================================================================

#[test]
fn test_init_creates_config() {
	let temp_dir = tempfile::tempdir().unwrap();
	let config_path = temp_dir.path().join(".pathbridge.toml");

	pathbridge_cmd(temp_dir.path())
		.arg("--init")
		.current_dir(temp_dir.path())
		.assert()
		.success()
		.stdout(predicate::str::contains("Created .pathbridge.toml"));

	let content = fs::read_to_string(&config_path).unwrap();
	assert!(content.contains("root = true"));
	assert!(content.contains("[remote]"));
	assert!(content.contains("[translator]"));
}

#[test]
fn test_init_fails_if_exists() {
	let temp_dir = tempfile::tempdir().unwrap();
	write_config(temp_dir.path(), "# existing");

	pathbridge_cmd(temp_dir.path())
		.arg("--init")
		.current_dir(temp_dir.path())
		.assert()
		.failure()
		.stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_init_force_overwrites() {
	let temp_dir = tempfile::tempdir().unwrap();
	let config_path = write_config(temp_dir.path(), "# existing");

	pathbridge_cmd(temp_dir.path())
		.args(["--init", "--force"])
		.current_dir(temp_dir.path())
		.assert()
		.success();

	let content = fs::read_to_string(&config_path).unwrap();
	assert!(content.contains("root = true"));
}

#[test]
fn test_init_template_validates() {
	let temp_dir = tempfile::tempdir().unwrap();

	pathbridge_cmd(temp_dir.path())
		.arg("--init")
		.current_dir(temp_dir.path())
		.assert()
		.success();

	pathbridge_cmd(temp_dir.path())
		.args(["config", "validate"])
		.current_dir(temp_dir.path())
		.assert()
		.success()
		.stdout(predicate::str::contains("valid"));
}

// ============================================================================
// config subcommand tests
// ============================================================================

#[test]
fn test_config_validate_no_config() {
	let temp_dir = tempfile::tempdir().unwrap();

	pathbridge_cmd(temp_dir.path())
		.args(["config", "validate"])
		.current_dir(temp_dir.path())
		.assert()
		.success()
		.stdout(predicate::str::contains("No configuration files found"));
}

#[test]
fn test_config_validate_invalid_config() {
	let temp_dir = tempfile::tempdir().unwrap();
	write_config(temp_dir.path(), "invalid toml [[[");

	pathbridge_cmd(temp_dir.path())
		.args(["config", "validate"])
		.current_dir(temp_dir.path())
		.assert()
		.failure()
		.stderr(predicate::str::contains("Configuration error"));
}

#[test]
fn test_config_validate_rejects_translator_without_placeholder() {
	let temp_dir = tempfile::tempdir().unwrap();
	write_config(
		temp_dir.path(),
		r#"
root = true

[translator]
to-remote = ["wslpath", "-u"]
to-local = ["wslpath", "-w", "{path}"]
"#,
	);

	pathbridge_cmd(temp_dir.path())
		.args(["config", "validate"])
		.current_dir(temp_dir.path())
		.assert()
		.failure()
		.stderr(predicate::str::contains("{path}"));
}

#[test]
fn test_config_show_displays_config() {
	let temp_dir = tempfile::tempdir().unwrap();
	write_config(
		temp_dir.path(),
		r#"
root = true

[remote]
command = "wsl"
args = ["skip_lsp"]

[[mappings]]
local = "/home/u/proj"
remote = 'U:\proj'
"#,
	);

	pathbridge_cmd(temp_dir.path())
		.args(["config", "show"])
		.current_dir(temp_dir.path())
		.assert()
		.success()
		.stdout(predicate::str::contains("command: wsl"))
		.stdout(predicate::str::contains(r"/home/u/proj <-> U:\proj"));
}

// ============================================================================
// translate / rewrite subcommand tests
// ============================================================================

const FIXTURE_MAPPING: &str = r#"
root = true

[[mappings]]
local = "/home/u/proj"
remote = 'U:\proj'
"#;

#[test]
fn test_translate_both_ways() {
	let temp_dir = tempfile::tempdir().unwrap();
	write_config(temp_dir.path(), FIXTURE_MAPPING);

	pathbridge_cmd(temp_dir.path())
		.args(["translate", "--to", "remote", "/home/u/proj/file.ts"])
		.current_dir(temp_dir.path())
		.assert()
		.success()
		.stdout(r"U:\proj\file.ts".to_string() + "\n");

	pathbridge_cmd(temp_dir.path())
		.args(["translate", "--to", "local", r"U:\proj\file.ts"])
		.current_dir(temp_dir.path())
		.assert()
		.success()
		.stdout("/home/u/proj/file.ts\n");
}

#[test]
fn test_translate_unmapped_path_fails() {
	let temp_dir = tempfile::tempdir().unwrap();
	write_config(temp_dir.path(), FIXTURE_MAPPING);

	pathbridge_cmd(temp_dir.path())
		.args(["translate", "--to", "remote", "/srv/other.ts"])
		.current_dir(temp_dir.path())
		.assert()
		.failure()
		.stderr(predicate::str::contains("No mapping covers path"));
}

#[cfg(unix)]
#[test]
fn test_rewrite_subcommand() {
	let temp_dir = tempfile::tempdir().unwrap();
	let root = temp_root(&temp_dir);
	fs::create_dir(root.join("proj")).unwrap();
	fs::write(root.join("proj/a.ts"), "").unwrap();

	let config = format!(
		"root = true\n\n[[mappings]]\nlocal = \"{}\"\nremote = 'U:\\proj'\n",
		root.join("proj").display()
	);
	let config_path = root.join("bridge.toml");
	fs::write(&config_path, config).unwrap();

	let input = format!(
		"{{\"id\":1,\"params\":{{\"uri\":\"{}\"}}}}\nnot json {}\n{{\"id\":\n",
		root.join("proj/a.ts").display(),
		root.join("proj/a.ts").display()
	);
	let expected = format!(
		"{{\"id\":1,\"params\":{{\"uri\":\"U:\\\\proj\\\\a.ts\"}}}}\nnot json {}\n{{\"id\":\n",
		root.join("proj/a.ts").display()
	);

	pathbridge_cmd(&root)
		.arg("--config")
		.arg(&config_path)
		.args(["rewrite", "--direction", "to-remote"])
		.current_dir(&root)
		.write_stdin(input)
		.assert()
		.success()
		.stdout(expected);
}

// ============================================================================
// Proxy tests (Unix only - these use Unix commands as the remote process)
// ============================================================================

#[cfg(unix)]
fn split_roots(root: &Path) -> (PathBuf, PathBuf, PathBuf) {
	let local = root.join("local");
	let remote = root.join("remote");
	fs::create_dir(&local).unwrap();
	fs::create_dir(&remote).unwrap();

	let config = format!(
		"root = true\n\n[[mappings]]\nlocal = \"{}\"\nremote = \"{}\"\n",
		local.display(),
		remote.display()
	);
	let config_path = write_config(root, &config);
	(local, remote, config_path)
}

#[cfg(unix)]
#[test]
fn test_proxy_rewrites_local_to_remote() {
	let temp_dir = tempfile::tempdir().unwrap();
	let root = temp_root(&temp_dir);
	let (local, remote, _) = split_roots(&root);
	fs::write(local.join("a.ts"), "").unwrap();

	let input = format!(
		"{{\"jsonrpc\":\"2.0\",\"id\":9223372036854775807,\"params\":{{\"uri\":\"{}\",\"other\":\"a/b\"}}}}\nContent-Type: text/plain  \n{{\"id\":\n",
		local.join("a.ts").display()
	);
	// `cat` echoes what reached the remote side; the remote path does not
	// exist, so the way back leaves it alone.
	let expected = format!(
		"{{\"jsonrpc\":\"2.0\",\"id\":9223372036854775807,\"params\":{{\"uri\":\"{}\",\"other\":\"a/b\"}}}}\nContent-Type: text/plain  \n{{\"id\":\n",
		remote.join("a.ts").display()
	);

	pathbridge_cmd(&root)
		.args(["--", "cat"])
		.current_dir(&root)
		.write_stdin(input)
		.assert()
		.success()
		.stdout(expected);
}

#[cfg(unix)]
#[test]
fn test_proxy_rewrites_remote_to_local() {
	let temp_dir = tempfile::tempdir().unwrap();
	let root = temp_root(&temp_dir);
	let (local, remote, _) = split_roots(&root);
	fs::write(remote.join("b.ts"), "").unwrap();

	let script = format!(
		"echo 'banner from remote'; echo '{{\"uri\":\"{}\"}}'",
		remote.join("b.ts").display()
	);
	let expected = format!(
		"banner from remote\n{{\"uri\":\"{}\"}}\n",
		local.join("b.ts").display()
	);

	pathbridge_cmd(&root)
		.args(["--", "sh", "-c", &script])
		.current_dir(&root)
		.write_stdin("")
		.assert()
		.success()
		.stdout(expected);
}

#[cfg(unix)]
#[test]
fn test_proxy_uses_configured_remote() {
	let temp_dir = tempfile::tempdir().unwrap();
	let root = temp_root(&temp_dir);
	write_config(
		&root,
		"root = true\n\n[remote]\ncommand = \"sh\"\nargs = [\"-c\", \"echo configured\"]\n",
	);

	pathbridge_cmd(&root)
		.current_dir(&root)
		.write_stdin("")
		.assert()
		.success()
		.stdout("configured\n");
}

#[cfg(unix)]
#[test]
fn test_proxy_exit_code_propagates() {
	let temp_dir = tempfile::tempdir().unwrap();

	pathbridge_cmd(temp_dir.path())
		.args(["--", "sh", "-c", "exit 42"])
		.current_dir(temp_dir.path())
		.write_stdin("")
		.assert()
		.code(42);
}
