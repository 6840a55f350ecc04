use assert_cmd::Command;
use predicates::str::contains;
use tempfile::tempdir;

fn script(home: &std::path::Path, input: &str) -> assert_cmd::assert::Assert {
    let mut cmd = Command::cargo_bin("finance_core_cli").unwrap();
    cmd.env("FINANCE_CORE_CLI_SCRIPT", "1")
        .env("FINANCE_CORE_HOME", home)
        .write_stdin(input.to_string())
        .assert()
}

#[test]
fn script_mode_registers_income_and_persists() {
    let home = tempdir().unwrap();
    script(home.path(), "income 200 auto\nexit\n")
        .success()
        .stdout(contains("Ingreso of $200.00 registered (auto)"));

    let json =
        std::fs::read_to_string(home.path().join("finance_state_v1.json")).expect("slot written");
    assert!(json.contains("\"autoSplit\""));
    assert!(json.contains("\"ingreso\""));
}

#[test]
fn balances_carry_over_between_runs() {
    let home = tempdir().unwrap();
    script(home.path(), "income 200 auto\nexit\n").success();
    // 3092.97 + 20.00 from the ahorro leg of the split.
    script(home.path(), "show\nexit\n")
        .success()
        .stdout(contains("3,112.97"));
}

#[test]
fn snapshot_flow_saves_lists_and_restores() {
    let home = tempdir().unwrap();
    let input = "snapshot corte\nexpense 500 ahorro\nrestore 1\nshow\nexit\n";
    script(home.path(), input)
        .success()
        .stdout(contains("Snapshot `corte` saved."))
        .stdout(contains("Snapshot `corte` imported."))
        .stdout(contains("3,092.97"));
}

#[test]
fn invalid_amounts_warn_without_aborting_the_script() {
    let home = tempdir().unwrap();
    script(home.path(), "income abc\nshow\nexit\n")
        .success()
        .stdout(contains("Nothing registered"))
        .stdout(contains("3,092.97"));
}

#[test]
fn unknown_commands_get_a_suggestion() {
    let home = tempdir().unwrap();
    script(home.path(), "exprt\nexit\n")
        .success()
        .stdout(contains("Unknown command `exprt`"))
        .stdout(contains("Suggestion: `export`?"));
}

#[test]
fn reset_is_auto_confirmed_in_script_mode() {
    let home = tempdir().unwrap();
    script(home.path(), "income 1000 ahorro\nreset\nshow\nexit\n")
        .success()
        .stdout(contains("Balances reset"))
        .stdout(contains("3,092.97"));
}

#[test]
fn export_then_import_round_trips_on_disk() {
    let home = tempdir().unwrap();
    let export_path = home.path().join("backup.json");
    let input = format!(
        "income 200 auto\nexport {p}\nreset\nimport {p}\nshow\nexit\n",
        p = export_path.display()
    );
    script(home.path(), &input)
        .success()
        .stdout(contains("State exported"))
        .stdout(contains("State imported"))
        .stdout(contains("3,112.97"));
}
