use registry::{read_services, write_services, ProviderRegistry, ProviderRegistryReader};

#[test]
fn test_provider_registry_new() {
    let registry = ProviderRegistry::new();

    assert!(registry.is_empty());
    assert_eq!(registry.interface_count(), 0);
    assert_eq!(registry.entry_count(), 0);
    assert!(registry.interfaces().is_empty());
    assert!(registry.implementers("svc.Greeter").is_none());
}

#[test]
fn test_provider_registry_add_is_idempotent() {
    let mut registry = ProviderRegistry::new();

    assert!(registry.add("svc.Greeter", "impl.EnglishGreeter"));
    assert!(!registry.add("svc.Greeter", "impl.EnglishGreeter"));
    assert_eq!(registry.interface_count(), 1);
    assert_eq!(registry.entry_count(), 1);

    assert!(registry.add("svc.Greeter", "impl.FrenchGreeter"));
    assert_eq!(registry.interface_count(), 1);
    assert_eq!(registry.entry_count(), 2);
}

#[test]
fn test_provider_registry_accumulates_across_calls() {
    let mut registry = ProviderRegistry::new();

    // first pass
    registry.add("svc.Greeter", "impl.B");
    registry.add("svc.Codec", "impl.Json");
    // second pass
    registry.add("svc.Greeter", "impl.A");
    registry.add("svc.Greeter", "impl.B");

    assert_eq!(registry.interfaces(), vec!["svc.Codec", "svc.Greeter"]);
    let greeters: Vec<&str> = registry
        .implementers("svc.Greeter")
        .expect("greeter entries")
        .iter()
        .map(String::as_str)
        .collect();
    assert_eq!(greeters, vec!["impl.A", "impl.B"]);
    assert_eq!(registry.entry_count(), 3);
}

#[test]
fn test_provider_registry_insertion_order_does_not_matter() {
    let pairs = [("svc.X", "impl.C"), ("svc.Y", "impl.A"), ("svc.X", "impl.A"), ("svc.X", "impl.C")];

    let mut forward = ProviderRegistry::new();
    for (interface, implementer) in pairs {
        forward.add(interface, implementer);
    }
    let mut backward = ProviderRegistry::new();
    for (interface, implementer) in pairs.iter().rev() {
        backward.add(*interface, *implementer);
    }

    assert_eq!(forward, backward);
}

#[test]
fn test_services_file_write_then_read() {
    let mut registry = ProviderRegistry::new();
    registry.add("svc.Greeter", "impl.B");
    registry.add("svc.Greeter", "impl.A");

    let mut out = Vec::new();
    write_services(registry.implementers("svc.Greeter").expect("entries"), &mut out)
        .expect("write succeeds");
    assert_eq!(String::from_utf8(out.clone()).expect("utf-8"), "impl.A\nimpl.B\n");

    let parsed = read_services(out.as_slice()).expect("read succeeds");
    assert_eq!(Some(&parsed), registry.implementers("svc.Greeter"));
}
