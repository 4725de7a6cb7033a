use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;

#[test]
fn merges_directory_into_output() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in");
    fs::create_dir(&input).unwrap();
    fs::write(input.join("1.txt"), "one-a\none-b\none-c\n").unwrap();
    fs::write(input.join("2.txt"), "").unwrap();
    fs::write(input.join("3.txt"), "three-a\n").unwrap();
    let output = dir.path().join("merged.txt");

    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("rrmux"));
    cmd.arg("--input")
        .arg(&input)
        .arg("--output")
        .arg(&output)
        .arg("--no-color")
        .assert()
        .success()
        .stderr(predicate::str::contains("Total elapsed time"))
        .stderr(predicate::str::contains("4 lines from 3 sources"));

    assert_eq!(
        fs::read_to_string(&output).unwrap(),
        "one-a\nthree-a\none-b\none-c\n",
    );
}

#[test]
fn many_workers_write_the_same_output() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in");
    fs::create_dir(&input).unwrap();
    for file in 0..6 {
        let lines: String = (0..50).map(|line| format!("{}:{}\n", file, line)).collect();
        fs::write(input.join(format!("{}.log", file)), lines).unwrap();
    }

    let mut outputs = Vec::new();
    for workers in ["1", "4"] {
        let output = dir.path().join(format!("out-{}.txt", workers));
        Command::new(assert_cmd::cargo::cargo_bin!("rrmux"))
            .args(["-w", workers, "-i"])
            .arg(&input)
            .arg("-o")
            .arg(&output)
            .assert()
            .success();
        outputs.push(fs::read_to_string(&output).unwrap());
    }

    assert_eq!(outputs[0].lines().count(), 300);
    assert!(outputs[0].starts_with("0:0\n1:0\n2:0\n3:0\n4:0\n5:0\n0:1\n"));
    assert_eq!(outputs[0], outputs[1]);
}

#[test]
fn missing_input_directory_fails() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("merged.txt");

    Command::new(assert_cmd::cargo::cargo_bin!("rrmux"))
        .arg("-i")
        .arg(dir.path().join("nope"))
        .arg("-o")
        .arg(&output)
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to list input directory"));

    assert!(!output.exists());
}
