//! End-to-end tests for the `unrd` binary.
//!
//! Every command runs inside a fresh temp directory so no stray
//! config file or oracle key changes the outcome.

use assert_cmd::prelude::*;
use assert_fs::prelude::*;
use predicates::prelude::*;
use serde_json::Value;

mod util;
use util::{response_fixture, unrd_in};

#[test]
fn solves_clean_question()
{
    let tmp = assert_fs::TempDir::new().unwrap();

    unrd_in(tmp.path())
        .args(["solve", "--policy", "deterministic-only", "What is 12 plus 7?"])
        .assert()
        .success()
        .stdout("19.00\n");
}

#[test]
fn solves_obfuscated_challenge_from_stdin()
{
    let tmp = assert_fs::TempDir::new().unwrap();

    unrd_in(tmp.path())
        .args(["solve", "--policy", "deterministic-only"])
        .write_stdin("A] LoOoObSstT-eR ClAaW eXxErTs tHiRrTy-tWwO nEwToNs, ~ dOuUbLeS iT bY tWo?\n")
        .assert()
        .success()
        .stdout("64.00\n");
}

#[test]
fn oracle_first_without_key_still_answers()
{
    let tmp = assert_fs::TempDir::new().unwrap();

    unrd_in(tmp.path())
        .args(["solve", "twenty", "minus", "four"])
        .assert()
        .success()
        .stdout("16.00\n");
}

#[test]
fn unsolvable_challenge_fails()
{
    let tmp = assert_fs::TempDir::new().unwrap();

    unrd_in(tmp.path())
        .args(["solve", "--policy", "deterministic-only", "what is the claw force?"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No answer"));
}

#[test]
fn inspect_text_view()
{
    let tmp = assert_fs::TempDir::new().unwrap();

    let assert = unrd_in(tmp.path())
        .args(["--no-color", "inspect", "What is 12 plus 7?"])
        .assert()
        .success();
    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).to_string();

    insta::assert_snapshot!(stdout, @r"
    challenge:  What is 12 plus 7?
    normalized: what is 12 plus 7
    blob:       whatisplus
    strategy:   tokens
    operands:   12, 7
    operator:   add (+)
    answer:     19.00
    ");
}

#[test]
fn inspect_json_view()
{
    let tmp = assert_fs::TempDir::new().unwrap();

    let assert = unrd_in(tmp.path())
        .args(["inspect", "--format", "json", "tHiRrT y mInUs fIiV e"])
        .assert()
        .success();
    let v: Value = serde_json::from_slice(&assert.get_output().stdout).expect("valid json");

    let b = &v["breakdown"];
    assert_eq!(b["normalized"], "thirt y minus fiv e");
    assert_eq!(b["blob"], "thirtyminusfive");
    assert_eq!(b["strategy"], "blob");
    assert_eq!(b["operator"], "subtract");
    assert_eq!(b["answer"], "25.00");
    assert_eq!(b["operands"][0]["value"], 30.0);
    assert_eq!(b["operands"][0]["source"]["kind"], "blob");
    assert_eq!(b["operands"][1]["value"], 5.0);
}

#[test]
fn responds_to_verification_prompt()
{
    let tmp = response_fixture(
        r#"{"success": true, "verification": {"verification_code": "vc_1", "challenge": "tHiRrTy-tWwO pLuS tEn"}}"#,
    );

    unrd_in(tmp.path())
        .args(["respond", "--policy", "deterministic-only", "response.json"])
        .assert()
        .success()
        .stdout("{\"verification_code\":\"vc_1\",\"answer\":\"42.00\"}\n");
}

#[test]
fn respond_without_verification_is_a_no_op()
{
    let tmp = response_fixture(r#"{"success": true, "post": {"id": "p1"}}"#);

    unrd_in(tmp.path())
        .args(["respond", "response.json"])
        .assert()
        .success()
        .stdout("")
        .stderr(predicate::str::contains("No verification required"));
}

#[test]
fn respond_rejects_invalid_json()
{
    let tmp = response_fixture("not json");

    unrd_in(tmp.path())
        .args(["respond", "response.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not valid JSON"));
}

#[test]
fn triage_sorts_claim_outcomes()
{
    let tmp = assert_fs::TempDir::new().unwrap();

    unrd_in(tmp.path())
        .args(["--no-color", "triage", "This", "X", "account", "has", "Already", "Claimed", "an", "agent"])
        .assert()
        .success()
        .stdout("terminal: account-bound\n");

    unrd_in(tmp.path())
        .args(["--no-color", "triage", "This agent has already been claimed"])
        .assert()
        .success()
        .stdout("done: agent-already-claimed\n");

    unrd_in(tmp.path())
        .args(["triage", "--json", "We couldn't find your tweet"])
        .assert()
        .success()
        .stdout("{\"rejection\":\"no-recent-tweets\",\"success\":false,\"terminal\":false}\n");
}

#[test]
fn init_writes_config_once()
{
    let tmp = assert_fs::TempDir::new().unwrap();

    unrd_in(tmp.path())
        .args(["init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created config file"));

    tmp.child("unriddle.toml")
        .assert(predicate::str::contains("policy = \"oracle-first\""));

    unrd_in(tmp.path())
        .args(["init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    unrd_in(tmp.path())
        .args(["--quiet", "init", "--force"])
        .assert()
        .success()
        .stdout("");
}

#[test]
fn config_file_changes_default_policy_and_vocabulary()
{
    let tmp = assert_fs::TempDir::new().unwrap();
    tmp.child("unriddle.toml")
        .write_str(
            r#"
[solver]
policy = "deterministic-only"

[[vocabulary]]
word = "uno"
value = 1

[[vocabulary]]
word = "dos"
value = 2
"#,
        )
        .unwrap();

    unrd_in(tmp.path())
        .args(["solve", "uno", "plus", "dos"])
        .assert()
        .success()
        .stdout("3.00\n");
}

#[test]
fn completions_to_stdout()
{
    let tmp = assert_fs::TempDir::new().unwrap();

    unrd_in(tmp.path())
        .args(["completions", "bash", "--stdout"])
        .assert()
        .success()
        .stdout(predicate::str::contains("unrd"));
}
