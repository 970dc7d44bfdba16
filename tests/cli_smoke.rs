mod support;

use predicates::str::contains;

use support::TestEnv;

#[test]
fn taskman_help_works() {
    let env = TestEnv::new();
    env.cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(contains("flat-file task and user manager"));
}

#[test]
fn first_run_seeds_admin_and_creates_task_artifact() {
    let env = TestEnv::new();
    env.cmd()
        .write_stdin("admin\npassword\ne\n")
        .assert()
        .success()
        .stdout(contains("Login Successful!"))
        .stdout(contains("Goodbye!!!"));

    assert_eq!(env.read_file("user.txt"), "admin;password\n");
    assert_eq!(env.read_file("tasks.txt"), "");
}

#[test]
fn end_of_input_during_login_exits_cleanly() {
    let env = TestEnv::new();
    env.cmd().write_stdin("admin\n").assert().success();
}
