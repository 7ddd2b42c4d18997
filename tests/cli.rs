use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn pipfix(config_home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("pipfix").unwrap();
    cmd.env("XDG_CONFIG_HOME", config_home.path())
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_patch_without_arguments_reports_success() {
    let home = TempDir::new().unwrap();

    pipfix(&home)
        .arg("patch")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "✓ Successfully installed sanitizing version parser",
        ));
}

#[test]
fn test_patch_previews_versions() {
    let home = TempDir::new().unwrap();

    pipfix(&home)
        .args(["patch", "2.4.0-ubuntu4-zorin1", "1.26.4", "nonsense"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2.4.0-ubuntu4-zorin1 -> 2.4.0"))
        .stdout(predicate::str::contains("1.26.4 -> 1.26.4"))
        .stdout(predicate::str::contains("nonsense -> 0.0.0"));
}

#[cfg(target_os = "linux")]
#[test]
fn test_config_path_follows_xdg_config_home() {
    let home = TempDir::new().unwrap();
    let expected = home.path().join("pipfix").join("config.toml");

    pipfix(&home)
        .args(["config", "--path"])
        .assert()
        .success()
        .stdout(predicate::str::contains(expected.display().to_string()));
}

#[cfg(target_os = "linux")]
#[test]
fn test_config_init_writes_defaults() {
    let home = TempDir::new().unwrap();

    pipfix(&home)
        .args(["config", "--init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created config file at:"));

    let written = std::fs::read_to_string(home.path().join("pipfix").join("config.toml")).unwrap();
    assert!(written.contains("vendor_markers"));
}

#[cfg(target_os = "linux")]
#[test]
fn test_config_shows_settings_in_effect() {
    let home = TempDir::new().unwrap();
    let config_dir = home.path().join("pipfix");
    std::fs::create_dir_all(&config_dir).unwrap();
    std::fs::write(
        config_dir.join("config.toml"),
        "python = \"/opt/py/bin/python3\"\nvendor_markers = [\"Debian\", \"zorin\"]\n",
    )
    .unwrap();

    pipfix(&home)
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("Loaded from:    config file"))
        .stdout(predicate::str::contains("Interpreter:    /opt/py/bin/python3"))
        .stdout(predicate::str::contains("Vendor markers: debian, zorin"))
        .stdout(predicate::str::contains("Log filter:     warn"));
}

#[cfg(target_os = "linux")]
#[test]
fn test_config_without_file_shows_defaults() {
    let home = TempDir::new().unwrap();

    pipfix(&home)
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("Loaded from:    built-in defaults"))
        .stdout(predicate::str::contains("Vendor markers: ubuntu, zorin"))
        .stdout(predicate::str::contains("pipfix config --init"));
}

#[test]
fn test_list_with_missing_interpreter_fails() {
    let home = TempDir::new().unwrap();

    pipfix(&home)
        .args(["list", "--python", "pipfix-no-such-python-interpreter"])
        .assert()
        .code(1)
        .stderr(predicate::str::starts_with("Error:"));
}

#[cfg(unix)]
mod fake_python {
    use super::*;
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use std::path::PathBuf;

    /// Writes an executable stand-in for `python3`. It receives
    /// `-m pip list [--format=json]`, so `$4` tells the two modes apart.
    fn script(dir: &TempDir, json_branch: &str, text_branch: &str) -> PathBuf {
        let path = dir.path().join("python");
        let body = format!(
            "#!/bin/sh\nif [ \"$4\" = \"--format=json\" ]; then\n{json_branch}\nfi\n{text_branch}\n"
        );
        fs::write(&path, body).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[test]
    fn test_list_sanitizes_vendor_versions() {
        let home = TempDir::new().unwrap();
        let python = script(
            &home,
            r#"printf '%s' '[{"name":"python-apt","version":"2.4.0-ubuntu4-zorin1"},{"name":"requests","version":"2.31.0"}]'; exit 0"#,
            "exit 9",
        );

        pipfix(&home)
            .arg("list")
            .arg("--python")
            .arg(&python)
            .assert()
            .success()
            .stdout(concat!(
                "[\n",
                "  {\n",
                "    \"name\": \"python-apt\",\n",
                "    \"version\": \"2.4.0\"\n",
                "  },\n",
                "  {\n",
                "    \"name\": \"requests\",\n",
                "    \"version\": \"2.31.0\"\n",
                "  }\n",
                "]\n",
            ));
    }

    #[test]
    fn test_list_relays_text_mode_when_json_fails() {
        let home = TempDir::new().unwrap();
        let python = script(
            &home,
            "echo 'no such option: --format' >&2; exit 2",
            "printf 'Package Version\\npip     24.0\\n'; exit 0",
        );

        pipfix(&home)
            .arg("list")
            .arg("--python")
            .arg(&python)
            .assert()
            .success()
            .stdout("Package Version\npip     24.0\n");
    }

    #[test]
    fn test_list_relays_second_failure() {
        let home = TempDir::new().unwrap();
        let python = script(
            &home,
            "echo 'first' >&2; exit 2",
            "echo '/usr/bin/python3: No module named pip' >&2; exit 7",
        );

        pipfix(&home)
            .arg("list")
            .arg("--python")
            .arg(&python)
            .assert()
            .code(7)
            .stdout("")
            .stderr(predicate::str::contains(
                "/usr/bin/python3: No module named pip\n",
            ))
            .stderr(predicate::str::contains("first").not());
    }

    #[test]
    fn test_list_relays_undecodable_json() {
        let home = TempDir::new().unwrap();
        let python = script(&home, "printf 'not json at all'; exit 0", "exit 9");

        pipfix(&home)
            .arg("list")
            .arg("--python")
            .arg(&python)
            .assert()
            .success()
            .stdout("not json at all");
    }

    #[test]
    fn test_list_object_payload_prints_empty_list() {
        let home = TempDir::new().unwrap();
        let python = script(&home, r#"printf '{"name":"x"}'; exit 0"#, "exit 9");

        pipfix(&home)
            .arg("list")
            .arg("--python")
            .arg(&python)
            .assert()
            .success()
            .stdout("[]\n");
    }

    #[test]
    fn test_list_scalar_payload_is_an_error() {
        let home = TempDir::new().unwrap();
        let python = script(&home, "printf '5'; exit 0", "exit 9");

        pipfix(&home)
            .arg("list")
            .arg("--python")
            .arg(&python)
            .assert()
            .code(1)
            .stdout("")
            .stderr(predicate::str::contains(
                "Error: package listing is a JSON number, not a list",
            ));
    }

    #[test]
    fn test_list_uses_interpreter_from_config() {
        let home = TempDir::new().unwrap();
        let python = script(&home, "printf '[]'; exit 0", "exit 9");

        let config_dir = home.path().join("pipfix");
        fs::create_dir_all(&config_dir).unwrap();
        fs::write(
            config_dir.join("config.toml"),
            format!("python = \"{}\"\n", python.display()),
        )
        .unwrap();

        pipfix(&home)
            .arg("list")
            .assert()
            .success()
            .stdout("[]\n");
    }
}
