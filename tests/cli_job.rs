//! Command line to resolved job, without a browser

use clap::Parser;
use mockshot::cli::Cli;
use mockshot::{CaptureRegion, Encoding, Error, ErrorKind, ExportJob};
use std::path::Path;

fn write_source(dir: &Path) {
    std::fs::write(dir.join("infographic.html"), "<div id=page>ok</div>").unwrap();
}

fn resolve(args: &[&str], cwd: &Path) -> mockshot::Result<ExportJob> {
    let mut argv = vec!["mockshot"];
    argv.extend_from_slice(args);
    let (request, _) = Cli::try_parse_from(argv).expect("cli should parse").into_parts();
    ExportJob::resolve(request, cwd)
}

#[test]
fn builtin_variants_in_fixed_order() {
    let dir = tempfile::tempdir().unwrap();
    write_source(dir.path());

    let job = resolve(&["infographic.html", "--quality=80", "--type=PNG"], dir.path()).unwrap();
    let summary: Vec<_> = job
        .variants
        .iter()
        .map(|v| (v.name.as_str(), v.width, v.height, v.device_scale_factor))
        .collect();
    assert_eq!(
        summary,
        [
            ("standard", 1920, 1080, 2.0),
            ("medium", 1600, 900, 2.0),
            ("high", 2400, 1350, 2.5),
        ]
    );
    assert!(job.variants.iter().all(|v| v.encoding == Encoding::Png && v.quality.is_none()));
}

#[test]
fn explicit_variants_only_in_declaration_order() {
    let dir = tempfile::tempdir().unwrap();
    write_source(dir.path());

    let job = resolve(
        &[
            "infographic.html",
            "--scale=3",
            "--quality=150",
            "--variant=preview:1600x900",
            "--variant=poster:2400x1350@10,quality=95",
            "--variant=icon:256x256,type=png,scale=1",
        ],
        dir.path(),
    )
    .unwrap();

    let names: Vec<_> = job.variants.iter().map(|v| v.name.as_str()).collect();
    assert_eq!(names, ["preview", "poster", "icon"]);

    assert_eq!(job.variants[0].device_scale_factor, 3.0);
    assert_eq!(job.variants[0].quality, Some(100));
    assert_eq!(job.variants[1].device_scale_factor, 8.0);
    assert_eq!(job.variants[1].quality, Some(95));
    assert_eq!(job.variants[2].device_scale_factor, 1.0);
    assert_eq!(job.variants[2].quality, None);
}

#[test]
fn output_names() {
    let dir = tempfile::tempdir().unwrap();
    write_source(dir.path());

    let job = resolve(
        &[
            "infographic.html",
            "--outDir=out/images",
            "--variant=a:10x10",
            "--variant=b:10x10,type=png",
            "--variant=c:10x10,type=webp",
        ],
        dir.path(),
    )
    .unwrap();

    let out = dir.path().join("out/images");
    assert_eq!(job.output_path(0), out.join("infographic.jpg"));
    assert_eq!(job.output_path(1), out.join("infographic_b.png"));
    assert_eq!(job.output_path(2), out.join("infographic_c.webp"));
}

#[test]
fn slug_and_viewport() {
    let dir = tempfile::tempdir().unwrap();
    write_source(dir.path());

    let job = resolve(&["infographic.html", "--slug=deck", "--viewport"], dir.path()).unwrap();
    assert_eq!(job.base_name, "deck");
    assert_eq!(job.capture_region, CaptureRegion::Viewport);
    assert_eq!(job.output_path(1).file_name().unwrap(), "deck_medium.jpg");
}

#[test]
fn malformed_variants_fail_during_argument_parsing() {
    for token in [
        "--variant=hero",
        "--variant=hero:800",
        "--variant=hero:800by600",
        "--variant=hero:wx600",
        "--variant=hero:800x0",
        "--variant=hero:800x600,dpi=2",
        "--variant=hero:800x600,type=gif",
    ] {
        let result = Cli::try_parse_from(["mockshot", "missing.html", token]);
        let err = result.expect_err(token);
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation, "{token}");
    }
}

#[test]
fn missing_source_is_a_specification_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = resolve(&["nope.html"], dir.path()).unwrap_err();
    assert!(matches!(err, Error::SourceNotFound(_)));
    assert_eq!(err.kind(), ErrorKind::Specification);
    assert!(err.to_string().starts_with("HTML file not found: "));
}
