// tests/cli_tests.rs
// Binary smoke runs against the simulated chain.

use assert_cmd::Command;

fn will_cli() -> Command {
    let mut cmd = Command::cargo_bin("will-cli").unwrap();
    for key in ["CONFIG_PATH", "WILL_PRIVATE_KEYS", "WILL_CONTRACT_ADDRESS", "WILL_LANGUAGE"] {
        cmd.env_remove(key);
    }
    cmd.env("RUST_LOG", "warn");
    cmd
}

#[test]
fn test_help_lists_commands() {
    let output = will_cli().arg("--help").output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    for command in ["accounts", "create", "list", "add-funds", "claim", "heartbeat", "shell"] {
        assert!(stdout.contains(command), "missing {} in:\n{}", command, stdout);
    }
}

#[test]
fn test_simulated_shell_session() {
    let output = will_cli()
        .args(["--simulate", "shell"])
        .write_stdin("connect\nquit\n")
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("== Decentralized Will =="), "{}", stdout);
    assert!(stdout.contains("[ok] Wallet connected!"), "{}", stdout);
}

#[test]
fn test_simulated_list_is_empty() {
    let output = will_cli().args(["--simulate", "list"]).output().unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert!(String::from_utf8_lossy(&output.stdout).contains("No Wills Found"));
}

#[test]
fn test_invalid_beneficiary_exits_with_error() {
    let output = will_cli()
        .args(["--simulate", "create", "--beneficiary", "0x12", "--period", "60", "--amount", "1"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("[error] Error creating will:"));
}
