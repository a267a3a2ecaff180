// tests/cli_options.rs

use clap::Parser;
use ndkdrive::cli::CliArgs;
use ndkdrive::config::DriveOptions;
use ndkdrive::errors::DriveError;
use ndkdrive::types::ProjectClass;

fn parse(args: &[&str]) -> CliArgs {
    CliArgs::try_parse_from(args).unwrap()
}

#[test]
fn minimal_invocation_gets_defaults() {
    let args = parse(&["ndkdrive", "--ndk", "/ndk", "tests/device/t1"]);
    let options = DriveOptions::from_args(&args).unwrap();

    assert_eq!(args.projects, vec!["tests/device/t1"]);
    assert_eq!(options.class, ProjectClass::Device);
    assert_eq!(options.out_dir.to_str(), Some("out"));
    assert_eq!(options.timeout, 900);
    assert_eq!(options.pie, None);
    assert_eq!(options.device_path, "/data/local/tmp/ndk-tests");
    assert_eq!(options.host_compilers, vec!["cc"]);
    assert!(!options.keep_going);
    assert!(options.abis.is_none());
}

#[test]
fn a_project_directory_is_required() {
    assert!(CliArgs::try_parse_from(["ndkdrive", "--ndk", "/ndk"]).is_err());
}

#[test]
fn pie_flags_are_mutually_exclusive() {
    assert!(
        CliArgs::try_parse_from(["ndkdrive", "--ndk", "/ndk", "--pie", "--no-pie", "t1"]).is_err()
    );

    let args = parse(&["ndkdrive", "--ndk", "/ndk", "--pie", "t1"]);
    assert_eq!(DriveOptions::from_args(&args).unwrap().pie, Some(true));

    let args = parse(&["ndkdrive", "--ndk", "/ndk", "--no-pie", "t1"]);
    assert_eq!(DriveOptions::from_args(&args).unwrap().pie, Some(false));
}

#[test]
fn abis_are_comma_separated() {
    let args = parse(&["ndkdrive", "--ndk", "/ndk", "--abis", "x86,x86_64", "t1"]);
    let options = DriveOptions::from_args(&args).unwrap();
    assert_eq!(
        options.abis,
        Some(vec!["x86".to_string(), "x86_64".to_string()])
    );
}

#[test]
fn repeatable_options_accumulate() {
    let args = parse(&[
        "ndkdrive",
        "--ndk",
        "/ndk",
        "--test",
        "t1",
        "--test",
        "t2",
        "--host-cc",
        "gcc",
        "--host-cc",
        "clang",
        "--symbols-dir",
        "/sym/a",
        "--symbols-dir",
        "/sym/b",
        "projects/t1",
        "projects/t2",
    ]);
    let options = DriveOptions::from_args(&args).unwrap();

    assert_eq!(options.selected, vec!["t1", "t2"]);
    assert_eq!(options.host_compilers, vec!["gcc", "clang"]);
    assert_eq!(options.symbols_dirs.len(), 2);
    assert_eq!(args.projects.len(), 2);
}

#[test]
fn class_names_map_to_project_classes() {
    for (name, class) in [
        ("device", ProjectClass::Device),
        ("build", ProjectClass::Build),
        ("sample", ProjectClass::Sample),
        ("samples", ProjectClass::Sample),
    ] {
        let args = parse(&["ndkdrive", "--ndk", "/ndk", "--class", name, "t1"]);
        assert_eq!(DriveOptions::from_args(&args).unwrap().class, class);
    }

    let args = parse(&["ndkdrive", "--ndk", "/ndk", "--class", "bogus", "t1"]);
    assert!(matches!(
        DriveOptions::from_args(&args),
        Err(DriveError::ConfigError(_))
    ));
}
