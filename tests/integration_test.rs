use std::fs;
use std::process::{Command, Output};
use tempfile::TempDir;

fn run_command(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_carousel-block"))
        .args(args)
        .env("RUST_LOG", "error")
        .output()
        .expect("Failed to execute command")
}

#[test]
fn test_decorate_command() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let temp_path = temp_dir.path();

    let block_path = temp_path.join("block.md");
    fs::write(&block_path, "- ![First](one.png)\n- ![Second](two.png)\n")
        .expect("Failed to write block file");

    let css_path = temp_path.join("theme.css");
    fs::write(&css_path, ".carousel-dot { width: 1em; }").expect("Failed to write CSS file");

    let output_path = temp_path.join("out").join("index.html");

    let output = run_command(&[
        "decorate",
        "-i",
        block_path.to_str().unwrap(),
        "-o",
        output_path.to_str().unwrap(),
        "--css",
        css_path.to_str().unwrap(),
        "--title",
        "Gallery",
    ]);

    assert!(output.status.success(), "Command failed: {:?}", output);
    assert!(output_path.exists(), "Output file was not created");

    let html = fs::read_to_string(&output_path).expect("Failed to read output file");
    assert!(html.contains("<title>Gallery</title>"));
    assert!(html.contains("<style>.carousel-dot { width: 1em; }</style>"));
    assert!(html.contains("<ul class=\"carousel-slides\""));
    assert!(html.contains("src=\"two.png\""));
    assert!(html.contains("aria-label=\"Previous slide\""));
    assert!(html.contains("<span>&lt;</span>"));
}

#[test]
fn test_decorate_command_fails_without_list() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let block_path = temp_dir.path().join("block.html");
    fs::write(&block_path, "<p>No slides</p>").expect("Failed to write block file");
    let output_path = temp_dir.path().join("out.html");

    let output = run_command(&[
        "decorate",
        "-i",
        block_path.to_str().unwrap(),
        "-o",
        output_path.to_str().unwrap(),
    ]);

    assert!(!output.status.success());
    assert!(!output_path.exists());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("no list element"), "stderr: {}", stderr);
}

#[test]
fn test_decorate_command_rejects_unknown_mode() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let block_path = temp_dir.path().join("block.html");
    fs::write(&block_path, "<ul><li>A</li></ul>").expect("Failed to write block file");

    let output = run_command(&[
        "decorate",
        "-i",
        block_path.to_str().unwrap(),
        "-o",
        temp_dir.path().join("out.html").to_str().unwrap(),
        "--mode",
        "inline",
    ]);

    assert!(!output.status.success());
}

#[test]
fn test_simulate_command() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let block_path = temp_dir.path().join("block.html");
    fs::write(&block_path, "<ul><li>A</li><li>B</li><li>C</li></ul>")
        .expect("Failed to write block file");

    let output = run_command(&[
        "simulate",
        "-i",
        block_path.to_str().unwrap(),
        "--slide-width",
        "400",
        "--steps",
        "next,next,next,dot:1,wait:5000",
    ]);

    assert!(output.status.success(), "Command failed: {:?}", output);
    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();

    assert_eq!(lines.len(), 6, "stdout: {}", stdout);
    assert!(lines[0].contains("slide=0"));
    assert!(lines[1].contains("slide=1"));
    assert!(lines[2].contains("slide=2"));
    assert!(lines[3].contains("slide=0"));
    assert!(lines[4].contains("slide=1"));
    assert!(lines[4].contains("translateX(-400px)"));
    assert!(lines[5].contains("slide=2"));
    assert!(lines[5].contains("5000ms"));
}

#[test]
fn test_simulate_command_rejects_bad_step() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let block_path = temp_dir.path().join("block.html");
    fs::write(&block_path, "<ul><li>A</li></ul>").expect("Failed to write block file");

    let output = run_command(&[
        "simulate",
        "-i",
        block_path.to_str().unwrap(),
        "--steps",
        "next,teleport",
    ]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("teleport"), "stderr: {}", stderr);
}
