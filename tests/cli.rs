extern crate assert_cmd;
extern crate predicates;
extern crate tempfile;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;

#[test]
fn renders_a_png() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("sierpinski.png");
    Command::cargo_bin("chaos")
        .unwrap()
        .args(&["-o", out.to_str().unwrap()])
        .args(&["--size", "64x64", "--world", "0,0,1,1"])
        .args(&["--samples", "200", "--iterations", "20", "--threads", "1"])
        .args(&["--seed", "7", "--preset", "sierpinski"])
        .assert()
        .success()
        .stdout(predicate::str::contains("seed 7"));
    assert!(out.exists());
}

#[test]
fn same_seed_same_file() {
    let dir = tempfile::tempdir().unwrap();
    let render = |name: &str| {
        let out = dir.path().join(name);
        Command::cargo_bin("chaos")
            .unwrap()
            .args(&["-o", out.to_str().unwrap()])
            .args(&["--size", "48x48", "--samples", "300", "--symmetry", "3"])
            .args(&["--threads", "1", "--seed", "12345", "--tone", "mean"])
            .assert()
            .success();
        std::fs::read(out).unwrap()
    };
    assert_eq!(render("a.png"), render("b.png"));
}

#[test]
fn rejects_a_degenerate_world() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("never.png");
    Command::cargo_bin("chaos")
        .unwrap()
        .args(&["-o", out.to_str().unwrap(), "--world", "0,0,0,1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid world region"));
    assert!(!out.exists());
}

#[test]
fn rejects_unknown_presets() {
    Command::cargo_bin("chaos")
        .unwrap()
        .args(&["-o", "x.png", "--preset", "mandelbrot"])
        .assert()
        .failure();
}

#[test]
fn rejects_zero_symmetry() {
    Command::cargo_bin("chaos")
        .unwrap()
        .args(&["-o", "x.png", "--symmetry", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Symmetry order"));
}
