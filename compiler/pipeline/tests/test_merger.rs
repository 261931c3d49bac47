//! Merge behavior against existing registry resources

use std::collections::BTreeSet;

use analysis::{Diagnostics, ProcessorError};
use pipeline::{Filer, FsFiler, MemoryFiler, RegistryFileMerger};
use registry::{read_services, ProviderRegistry};
use tempfile::TempDir;

fn resource(interface: &str) -> String { format!("META-INF/services/{}", interface) }

fn registry(pairs: &[(&str, &str)]) -> ProviderRegistry {
    let mut registry = ProviderRegistry::new();
    for (interface, implementer) in pairs {
        registry.add(*interface, *implementer);
    }
    registry
}

fn merge(
    registry: &ProviderRegistry,
    filer: &mut dyn Filer,
) -> Result<pipeline::MergeReport, ProcessorError> {
    RegistryFileMerger::default().merge(registry, filer, &mut Diagnostics::new())
}

#[test]
fn test_greeter_written_when_no_resource_exists() {
    let mut filer = MemoryFiler::new();
    merge(&registry(&[("svc.Greeter", "impl.EnglishGreeter")]), &mut filer).expect("merge");

    assert_eq!(filer.contents(&resource("svc.Greeter")).as_deref(), Some("impl.EnglishGreeter\n"));
}

#[test]
fn test_greeter_merged_with_existing_entry() {
    let mut filer = MemoryFiler::new().with_resource(&resource("svc.Greeter"), "impl.A\n");
    merge(&registry(&[("svc.Greeter", "impl.B")]), &mut filer).expect("merge");

    assert_eq!(filer.contents(&resource("svc.Greeter")).as_deref(), Some("impl.A\nimpl.B\n"));
}

#[test]
fn test_union_is_sorted_and_duplicate_free() {
    let mut filer = MemoryFiler::new().with_resource(&resource("svc.S"), "b\na\n");
    merge(&registry(&[("svc.S", "b"), ("svc.S", "c")]), &mut filer).expect("merge");

    assert_eq!(filer.contents(&resource("svc.S")).as_deref(), Some("a\nb\nc\n"));
}

#[test]
fn test_comments_and_blank_lines_are_not_entries() {
    let mut filer = MemoryFiler::new().with_resource(&resource("svc.S"), "# header\n\na.B\n\n");
    let report = merge(&registry(&[("svc.S", "a.B")]), &mut filer).expect("merge");

    // a.B is already listed, so the resource keeps its comment
    assert_eq!(report.unchanged, vec!["svc.S"]);
    assert_eq!(filer.write_count(), 0);
    assert_eq!(filer.contents(&resource("svc.S")).as_deref(), Some("# header\n\na.B\n\n"));
}

#[test]
fn test_second_merge_performs_no_writes() {
    let registry = registry(&[("svc.A", "impl.One"), ("svc.A", "impl.Two"), ("svc.B", "impl.Three")]);
    let mut filer = MemoryFiler::new();

    let first = merge(&registry, &mut filer).expect("first merge");
    assert_eq!(first.written, vec!["svc.A", "svc.B"]);
    assert_eq!(filer.write_count(), 2);

    let second = merge(&registry, &mut filer).expect("second merge");
    assert!(second.written.is_empty());
    assert_eq!(second.unchanged, vec!["svc.A", "svc.B"]);
    assert_eq!(filer.write_count(), 2);
}

#[test]
fn test_unchanged_interface_does_not_stop_later_ones() {
    let mut filer = MemoryFiler::new().with_resource(&resource("svc.A"), "impl.One\n");
    let report =
        merge(&registry(&[("svc.A", "impl.One"), ("svc.B", "impl.Two")]), &mut filer).expect("merge");

    assert_eq!(report.unchanged, vec!["svc.A"]);
    assert_eq!(report.written, vec!["svc.B"]);
    assert_eq!(filer.contents(&resource("svc.B")).as_deref(), Some("impl.Two\n"));
}

#[test]
fn test_write_failure_abandons_remaining_interfaces() {
    let mut filer = MemoryFiler::new().with_resource(&resource("svc.C"), "impl.Old\n");
    filer.fail_writes_of(&resource("svc.B"));

    let registry = registry(&[("svc.A", "impl.A"), ("svc.B", "impl.B"), ("svc.C", "impl.C")]);
    let err = merge(&registry, &mut filer).expect_err("write of svc.B fails");

    match &err {
        ProcessorError::ResourceWrite { resource: name, .. } => assert_eq!(name, &resource("svc.B")),
        other => panic!("unexpected error: {:?}", other),
    }
    assert!(err.to_string().starts_with("Unable to create META-INF/services/svc.B, "));
    assert_eq!(filer.contents(&resource("svc.A")).as_deref(), Some("impl.A\n"));
    assert_eq!(filer.contents(&resource("svc.B")), None);
    // svc.C keeps its stale content
    assert_eq!(filer.contents(&resource("svc.C")).as_deref(), Some("impl.Old\n"));
}

#[test]
fn test_fs_filer_round_trip_through_disk() {
    let temp_dir = TempDir::new().expect("temp dir");
    let mut filer = FsFiler::new(temp_dir.path());
    let services = temp_dir.path().join("META-INF").join("services");
    std::fs::create_dir_all(&services).expect("services dir");
    std::fs::write(services.join("svc.Greeter"), "# existing\nimpl.A\n").expect("seed");

    merge(&registry(&[("svc.Greeter", "impl.B"), ("p.Outer$Inner", "q.A$B$C")]), &mut filer)
        .expect("merge");

    let greeter = std::fs::read_to_string(services.join("svc.Greeter")).expect("greeter");
    assert_eq!(greeter, "impl.A\nimpl.B\n");
    let nested = std::fs::File::open(services.join("p.Outer$Inner")).expect("nested resource");
    assert_eq!(read_services(nested).expect("parse"), BTreeSet::from(["q.A$B$C".to_string()]));
}

#[test]
fn test_interface_names_cannot_escape_the_output_directory() {
    let temp_dir = TempDir::new().expect("temp dir");
    let out = temp_dir.path().join("out");
    let mut filer = FsFiler::new(&out);

    let err = merge(&registry(&[("../../../escaped.I", "impl.X")]), &mut filer)
        .expect_err("path-like interface name is rejected");

    assert!(matches!(err, ProcessorError::ResourceWrite { .. }));
    assert!(!temp_dir.path().join("escaped.I").exists());
    assert!(!out.exists(), "nothing may be created for a rejected interface");
}

#[test]
fn test_entries_that_would_not_read_back_are_rejected_before_truncating() {
    let mut filer = MemoryFiler::new().with_resource(&resource("svc.S"), "impl.Old\n");

    let err = merge(&registry(&[("svc.S", " impl.X")]), &mut filer).expect_err("padded entry");

    match &err {
        ProcessorError::ResourceWrite { source, .. } =>
            assert_eq!(source.kind(), std::io::ErrorKind::InvalidInput),
        other => panic!("unexpected error: {:?}", other),
    }
    assert_eq!(filer.write_count(), 0);
    assert_eq!(filer.contents(&resource("svc.S")).as_deref(), Some("impl.Old\n"));
}
