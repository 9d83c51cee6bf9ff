mod support;

use predicates::str::contains;
use support::TestEnv;

#[test]
fn plain_chat_reads_lines_until_eof() {
    let env = TestEnv::new();

    env.cmd()
        .args(["chat", "--plain", "--no-delay", "--verbosity", "compact"])
        .write_stdin("add buy milk\nlist tasks\n")
        .assert()
        .success()
        .stdout(contains("How can I help you today?"))
        .stdout(contains("✅ Task added: \"buy milk\""))
        .stdout(contains("1. buy milk [⏳]"));

    assert_eq!(env.tasks().len(), 1);
}

#[test]
fn plain_chat_stops_at_exit_and_confirms_inline() {
    let env = TestEnv::new();
    env.write_config("[chat]\nthinking_delay_ms = 0\n");

    env.cmd()
        .args(["chat", "--plain"])
        .write_stdin("add a\nadd b\nclear all\nn\nexit\nadd never\n")
        .assert()
        .success()
        .stdout(contains("Are you sure you want to delete ALL tasks? [y/N]"))
        .stdout(contains("Operation Cancelled"));

    let titles: Vec<_> = env.tasks().into_iter().map(|task| task.title).collect();
    assert_eq!(titles, vec!["a", "b"]);
}

#[test]
fn chat_rejects_json() {
    TestEnv::new()
        .cmd()
        .args(["chat", "--plain", "--json"])
        .write_stdin("")
        .assert()
        .failure()
        .code(2);
}
