//! Shared test utilities for integration tests
//!
//! Provides a hermetic command builder and fixture helpers
//! used across multiple test files.

use assert_cmd::Command;

use assert_cmd::prelude::*;
use assert_fs::prelude::*;

/// `unrd` running in `dir` with no oracle credentials leaking in
pub fn unrd_in(dir: &std::path::Path) -> Command
{
    let mut cmd = Command::cargo_bin("unrd").expect("unrd binary");
    cmd.current_dir(dir)
        .env_remove("UNRIDDLE__ORACLE__API_KEY")
        .env_remove("RUST_LOG");
    cmd
}

/// Temporary directory holding a platform response at `response.json`
pub fn response_fixture(body: &str) -> assert_fs::TempDir
{
    let tmp = assert_fs::TempDir::new().expect("tempdir");

    tmp.child("response.json")
        .write_str(body)
        .expect("write response");

    tmp
}
