// tests/variant_matrix.rs

mod common;

use ndkdrive::fs::MockFileSystem;
use ndkdrive::matrix::{Variant, discover_abis, filter_abis, pie_candidates};
use ndkdrive::types::{ProjectClass, ToolchainFamily};
use proptest::prelude::*;
use std::path::Path;

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

#[test]
fn device_projects_build_both_pie_variants_by_default() {
    assert_eq!(
        pie_candidates(ProjectClass::Device, None, Some(ToolchainFamily::Gcc)),
        vec![false, true]
    );
}

#[test]
fn non_device_projects_build_pie_only() {
    assert_eq!(
        pie_candidates(ProjectClass::Build, None, Some(ToolchainFamily::Gcc)),
        vec![true]
    );
    assert_eq!(pie_candidates(ProjectClass::Sample, None, None), vec![true]);
}

#[test]
fn pinned_pie_value_wins() {
    assert_eq!(
        pie_candidates(ProjectClass::Device, Some(false), Some(ToolchainFamily::Gcc)),
        vec![false]
    );
    assert_eq!(
        pie_candidates(ProjectClass::Build, Some(false), None),
        vec![false]
    );
}

#[test]
fn clang_drops_non_pie_and_falls_back_to_pie() {
    // Default device set loses its non-PIE half.
    assert_eq!(
        pie_candidates(ProjectClass::Device, None, Some(ToolchainFamily::Clang)),
        vec![true]
    );
    // Even a pinned non-PIE value can't survive clang; the fallback applies.
    assert_eq!(
        pie_candidates(ProjectClass::Device, Some(false), Some(ToolchainFamily::Clang)),
        vec![true]
    );
}

#[test]
fn discovers_abis_from_build_output_layout() {
    let fs = MockFileSystem::new();
    let build_dir = Path::new("/out/device/t1/target+PIE");
    fs.add_file(build_dir.join("libs/x86/test-exe"), "");
    fs.add_file(build_dir.join("libs/armeabi-v7a/test-exe"), "");
    fs.add_dir(build_dir.join("libs/arm64-v8a"));
    // Stray files directly under libs/ are not ABIs.
    fs.add_file(build_dir.join("libs/notes.txt"), "");

    let abis = discover_abis(&fs, build_dir).unwrap();
    assert_eq!(abis, strings(&["arm64-v8a", "armeabi-v7a", "x86"]));
}

#[test]
fn missing_libs_directory_means_no_abis() {
    let fs = MockFileSystem::new();
    let abis = discover_abis(&fs, Path::new("/out/device/t1/target")).unwrap();
    assert!(abis.is_empty());
}

#[test]
fn non_pie_variants_drop_64_bit_abis() {
    let discovered = strings(&["arm64-v8a", "armeabi-v7a", "mips64", "x86", "x86_64"]);
    assert_eq!(
        filter_abis(discovered, None, false, Some(ToolchainFamily::Gcc)),
        strings(&["armeabi-v7a", "x86"])
    );
}

#[test]
fn pie_variants_keep_64_bit_abis() {
    let discovered = strings(&["arm64-v8a", "x86", "x86_64"]);
    assert_eq!(
        filter_abis(discovered.clone(), None, true, Some(ToolchainFamily::Gcc)),
        discovered
    );
}

#[test]
fn armeabi_is_dropped_under_clang() {
    let discovered = strings(&["armeabi", "armeabi-v7a", "x86"]);
    assert_eq!(
        filter_abis(discovered.clone(), None, true, Some(ToolchainFamily::Clang)),
        strings(&["armeabi-v7a", "x86"])
    );
    // Under gcc it survives.
    assert_eq!(
        filter_abis(discovered, None, true, Some(ToolchainFamily::Gcc)),
        strings(&["armeabi", "armeabi-v7a", "x86"])
    );
}

#[test]
fn allowlist_applies_before_everything_else() {
    let discovered = strings(&["arm64-v8a", "armeabi-v7a", "x86", "x86_64"]);
    let allowed = strings(&["x86", "x86_64"]);
    assert_eq!(
        filter_abis(discovered, Some(allowed.as_slice()), true, None),
        strings(&["x86", "x86_64"])
    );
}

#[test]
fn variant_display_matches_log_suffix_format() {
    common::init_tracing();
    let variant = Variant::new(true, Some("clang3.6".to_string())).with_abi("armeabi-v7a");
    assert_eq!(variant.to_string(), " clang3.6 +PIE: armeabi-v7a");

    let variant = Variant::new(false, None);
    assert_eq!(variant.to_string(), "");
}

proptest! {
    /// The candidate set is never empty and never contains non-PIE under
    /// clang.
    #[test]
    fn pie_candidates_invariants(
        class_idx in 0usize..3,
        pinned in prop::option::of(any::<bool>()),
        clang in any::<bool>(),
    ) {
        let class = [ProjectClass::Device, ProjectClass::Build, ProjectClass::Sample][class_idx];
        let family = if clang {
            Some(ToolchainFamily::Clang)
        } else {
            Some(ToolchainFamily::Gcc)
        };

        let pies = pie_candidates(class, pinned, family);
        prop_assert!(!pies.is_empty());
        if clang {
            prop_assert!(pies.iter().all(|&pie| pie));
        }
    }

    /// Filtering never invents ABIs and is idempotent.
    #[test]
    fn filter_abis_is_a_pure_subset(
        discovered in prop::collection::vec("[a-z0-9_-]{1,12}", 0..8),
        pie in any::<bool>(),
        clang in any::<bool>(),
    ) {
        let family = if clang {
            Some(ToolchainFamily::Clang)
        } else {
            Some(ToolchainFamily::Gcc)
        };

        let filtered = filter_abis(discovered.clone(), None, pie, family);
        prop_assert!(filtered.iter().all(|abi| discovered.contains(abi)));

        let again = filter_abis(filtered.clone(), None, pie, family);
        prop_assert_eq!(again, filtered);
    }
}
