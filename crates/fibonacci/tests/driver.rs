//! tests/driver.rs — sortie exacte du binaire `fibonacci`.

use std::process::Command;

use indoc::indoc;
use pretty_assertions::assert_eq;

const EXPECTED: &str = indoc! {"
    Fibonacci Series:
    0
    1
    1
    2
    3
    5
    8
    13
    21
    34
"};

fn run_binary(args: &[&str], envs: &[(&str, &str)]) -> std::process::Output {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_fibonacci"));
    cmd.args(args);
    for (k, v) in envs {
        cmd.env(k, v);
    }
    cmd.output().expect("lancement du binaire fibonacci")
}

#[test]
fn in_memory_series_matches_expected_lines() {
    let series = fibonacci::render_series().unwrap();
    assert_eq!(series, EXPECTED);
    assert_eq!(series.lines().count(), 11);
}

#[test]
fn binary_prints_eleven_lines_and_exits_zero() {
    let out = run_binary(&[], &[]);
    assert!(out.status.success(), "status: {:?}", out.status);
    assert_eq!(String::from_utf8_lossy(&out.stdout), EXPECTED);
}

#[test]
fn output_is_identical_across_runs() {
    let a = run_binary(&[], &[]);
    let b = run_binary(&[], &[]);
    assert_eq!(a.stdout, b.stdout);
}

#[test]
fn arguments_and_environment_do_not_change_stdout() {
    let out = run_binary(&["--help", "42"], &[("RUST_LOG", "debug"), ("LANG", "C")]);
    assert!(out.status.success());
    assert_eq!(String::from_utf8_lossy(&out.stdout), EXPECTED);
}
