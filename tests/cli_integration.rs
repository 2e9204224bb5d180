use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;

fn globdict(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("globdict").unwrap();
    cmd.env("GLOBDICT_HOME", home)
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG");
    cmd
}

fn demo(name: &str) -> String {
    format!("{}/demos/{}", env!("CARGO_MANIFEST_DIR"), name)
}

#[test]
fn test_demo_scripts_pass() {
    let temp_dir = tempfile::tempdir().unwrap();
    for name in ["basic.dict", "many_new.dict", "copy_global.dict"] {
        globdict(temp_dir.path())
            .arg("run")
            .arg(demo(name))
            .assert()
            .success();
    }
}

#[test]
fn test_run_prints_values() {
    let temp_dir = tempfile::tempdir().unwrap();
    let script = temp_dir.path().join("s.dict");
    std::fs::write(
        &script,
        "d = new\ninsert d greeting hello\nfind d greeting\nsize d\nfind d nope\n",
    )
    .unwrap();

    globdict(temp_dir.path())
        .arg("run")
        .arg(&script)
        .assert()
        .success()
        .stdout(predicate::str::contains("d = 1"))
        .stdout(predicate::str::contains("hello"))
        .stdout(predicate::str::contains("NULL"));
}

#[test]
fn test_run_reads_stdin() {
    let temp_dir = tempfile::tempdir().unwrap();
    globdict(temp_dir.path())
        .arg("run")
        .write_stdin("insert global g0 d\nd = new\nfind d g0\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("d = 1"))
        .stdout(predicate::str::contains("\nd\n"));
}

#[test]
fn test_parse_error_exits_nonzero() {
    let temp_dir = tempfile::tempdir().unwrap();
    globdict(temp_dir.path())
        .arg("run")
        .write_stdin("new\nfrobnicate 1\n")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Parse error on line 2"));
}

#[test]
fn test_failed_expectation_exits_nonzero() {
    let temp_dir = tempfile::tempdir().unwrap();
    globdict(temp_dir.path())
        .arg("run")
        .write_stdin("d = new\nexpect size d 3\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Expectation failed on line 2"));
}

#[test]
fn test_failed_expectation_keeps_earlier_output() {
    let temp_dir = tempfile::tempdir().unwrap();
    globdict(temp_dir.path())
        .arg("run")
        .write_stdin("d = new\ninsert d k v\nfind d k\nexpect size d 3\n")
        .assert()
        .failure()
        .stdout(predicate::str::contains("d = 1"))
        .stdout(predicate::str::contains("v"))
        .stderr(predicate::str::contains("Expectation failed on line 4"));
}

#[test]
fn test_max_global_size_flag() {
    let temp_dir = tempfile::tempdir().unwrap();
    let script = (0..10)
        .map(|i| format!("insert global k{} v", i))
        .chain(["expect size global 3".to_string()])
        .collect::<Vec<_>>()
        .join("\n");

    globdict(temp_dir.path())
        .args(["--max-global-size", "3", "run"])
        .write_stdin(script)
        .assert()
        .success();
}

#[test]
fn test_id_policy_flag() {
    let temp_dir = tempfile::tempdir().unwrap();
    let script = "a = new\nb = new\ndelete a\nc = new\n";

    globdict(temp_dir.path())
        .arg("run")
        .write_stdin(script)
        .assert()
        .success()
        .stdout(predicate::str::contains("c = 1"));

    globdict(temp_dir.path())
        .args(["--id-policy", "monotonic", "run"])
        .write_stdin(script)
        .assert()
        .success()
        .stdout(predicate::str::contains("c = 3"));
}

#[test]
fn test_unknown_id_policy_rejected() {
    let temp_dir = tempfile::tempdir().unwrap();
    globdict(temp_dir.path())
        .args(["--id-policy", "random", "config"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown id policy"));
}

#[test]
fn test_config_save_and_reload() {
    let temp_dir = tempfile::tempdir().unwrap();

    globdict(temp_dir.path())
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("max-global-size = 42"))
        .stdout(predicate::str::contains("id-policy = compact"));

    globdict(temp_dir.path())
        .args(["--max-global-size", "5", "--id-policy", "monotonic", "config", "--save"])
        .assert()
        .success();
    assert!(temp_dir.path().join("config.json").exists());

    globdict(temp_dir.path())
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("max-global-size = 5"))
        .stdout(predicate::str::contains("id-policy = monotonic"));
}

#[test]
fn test_verbose_traces_operations() {
    let temp_dir = tempfile::tempdir().unwrap();
    globdict(temp_dir.path())
        .args(["-v", "run"])
        .write_stdin("d = new\ninsert d k v\n")
        .assert()
        .success()
        .stderr(predicate::str::contains("insert"))
        .stderr(predicate::str::contains("dictionary created"));
}

#[test]
fn test_quiet_by_default() {
    let temp_dir = tempfile::tempdir().unwrap();
    globdict(temp_dir.path())
        .arg("run")
        .write_stdin("d = new\ninsert d k v\n")
        .assert()
        .success()
        .stderr(predicate::str::is_empty());
}
