//! Runs the `punchcards` binary against files in a temp directory.

use image::{ExtendedColorType, GrayImage, ImageEncoder, Luma};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

fn punchcards(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_punchcards"))
        .args(args)
        .current_dir(dir)
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

fn stdout(out: &Output) -> String {
    String::from_utf8_lossy(&out.stdout).into_owned()
}

fn stderr(out: &Output) -> String {
    String::from_utf8_lossy(&out.stderr).into_owned()
}

/// Dark left half, light right half, 416x16.
fn write_fixture(dir: &Path) -> PathBuf {
    let img = GrayImage::from_fn(416, 16, |x, _| Luma([if x < 208 { 10 } else { 245 }]));
    let mut buf = Vec::new();
    image::codecs::png::PngEncoder::new(&mut buf)
        .write_image(img.as_raw(), img.width(), img.height(), ExtendedColorType::L8)
        .unwrap();
    let path = dir.join("split.png");
    std::fs::write(&path, buf).unwrap();
    path
}

// ===========================================================================
// convert
// ===========================================================================

#[test]
fn convert_writes_svg_and_reports() {
    let tmp = TempDir::new().unwrap();
    write_fixture(tmp.path());

    let out = punchcards(tmp.path(), &["convert", "split.png", "-o", "split.svg"]);
    assert!(out.status.success(), "{}", stderr(&out));

    let svg = std::fs::read_to_string(tmp.path().join("split.svg")).unwrap();
    assert!(svg.starts_with("<?xml"));
    // 416x16 → 208x8 → 8 cards
    assert_eq!(svg.matches("<g id=\"card-").count(), 8);

    let report = stdout(&out);
    assert!(report.contains("split.png → split.svg"), "{report}");
    assert!(report.contains("Cards: 8 × 26x8"), "{report}");
}

#[test]
fn convert_text_to_stdout_then_parse_back() {
    let tmp = TempDir::new().unwrap();
    write_fixture(tmp.path());

    let out = punchcards(
        tmp.path(),
        &["convert", "split.png", "-f", "text", "--title", "Split"],
    );
    assert!(out.status.success(), "{}", stderr(&out));
    let text = stdout(&out);
    assert!(text.starts_with("Title: Split\nCards: 8\nHoles per card: 208\n"), "{text}");
    std::fs::write(tmp.path().join("split.txt"), &text).unwrap();

    let out = punchcards(tmp.path(), &["parse", "split.txt"]);
    assert!(out.status.success(), "{}", stderr(&out));
    let listing = stdout(&out);
    assert!(listing.starts_with("Split (8 cards, 26x8)"), "{listing}");
    assert!(listing.contains("001 Card #1: 26x8, 104 holes (50.0% density)"));
}

#[test]
fn parse_reexport_keeps_file_title() {
    let tmp = TempDir::new().unwrap();
    write_fixture(tmp.path());
    std::fs::write(tmp.path().join("punchcards.toml"), "title = \"From Config\"\n").unwrap();

    let out = punchcards(
        tmp.path(),
        &["convert", "split.png", "-f", "text", "--title", "Rose", "-o", "rose.txt"],
    );
    assert!(out.status.success(), "{}", stderr(&out));

    let out = punchcards(tmp.path(), &["parse", "rose.txt", "--to", "svg"]);
    assert!(out.status.success(), "{}", stderr(&out));
    let svg = stdout(&out);
    assert!(svg.contains(">Rose #1/8</text>"), "{svg}");
    assert!(!svg.contains("From Config"));

    let out = punchcards(
        tmp.path(),
        &["parse", "rose.txt", "--to", "svg", "--title", "Renamed"],
    );
    assert!(out.status.success(), "{}", stderr(&out));
    assert!(stdout(&out).contains(">Renamed #1/8</text>"));
}

#[test]
fn convert_rejects_bad_color_mode() {
    let tmp = TempDir::new().unwrap();
    write_fixture(tmp.path());

    let out = punchcards(tmp.path(), &["convert", "split.png", "--color-mode", "3"]);
    assert!(!out.status.success());
    assert!(stderr(&out).contains("invalid color mode"), "{}", stderr(&out));
}

#[test]
fn convert_rejects_pdf_format() {
    let tmp = TempDir::new().unwrap();
    write_fixture(tmp.path());

    let out = punchcards(tmp.path(), &["convert", "split.png", "-f", "pdf"]);
    assert!(!out.status.success());
    assert!(stderr(&out).contains("unsupported output format: pdf"));
}

// ===========================================================================
// info / config
// ===========================================================================

#[test]
fn info_json_matches_report_shape() {
    let tmp = TempDir::new().unwrap();
    write_fixture(tmp.path());

    let out = punchcards(
        tmp.path(),
        &["info", "split.png", "--card-type", "50x12", "--json"],
    );
    assert!(out.status.success(), "{}", stderr(&out));
    let json: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(json["filename"], "split.png");
    assert_eq!(json["cardDimensions"], "50x12");
    assert_eq!(json["colorMode"], "2-color (binary: black/white using dithering)");
    // 416x16 → 600x23
    assert_eq!(json["totalCards"], 23);
    assert_eq!(json["holesPerCard"].as_array().unwrap().len(), 23);
}

#[test]
fn config_file_sets_card_type() {
    let tmp = TempDir::new().unwrap();
    write_fixture(tmp.path());
    std::fs::write(
        tmp.path().join("punchcards.toml"),
        "[card]\ntype = \"50x12\"\n",
    )
    .unwrap();

    let out = punchcards(tmp.path(), &["info", "split.png", "--json"]);
    assert!(out.status.success(), "{}", stderr(&out));
    let json: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(json["cardDimensions"], "50x12");
}

#[test]
fn missing_explicit_config_fails() {
    let tmp = TempDir::new().unwrap();
    write_fixture(tmp.path());

    let out = punchcards(
        tmp.path(),
        &["--config", "nope.toml", "info", "split.png"],
    );
    assert!(!out.status.success());
    assert!(stderr(&out).contains("nope.toml"), "{}", stderr(&out));
}

#[test]
fn gen_config_output_loads_back() {
    let tmp = TempDir::new().unwrap();
    let out = punchcards(tmp.path(), &["gen-config"]);
    assert!(out.status.success());
    std::fs::write(tmp.path().join("punchcards.toml"), &out.stdout).unwrap();

    write_fixture(tmp.path());
    let out = punchcards(tmp.path(), &["info", "split.png"]);
    assert!(out.status.success(), "{}", stderr(&out));
    assert!(stdout(&out).contains("Cards: 8 × 26x8"));
}
