use super::*;

#[test]
fn standard_registry_contains_all_seven_tools() {
    let registry = ToolRegistry::standard();
    for name in ["read", "write", "edit", "bash", "grep", "find", "ls"] {
        assert!(registry.get(name).is_some(), "missing tool {name}");
    }
    assert_eq!(registry.names().len(), 7);
}

#[test]
fn read_only_registry_excludes_mutating_tools() {
    let registry = ToolRegistry::read_only();
    assert!(registry.get("write").is_none());
    assert!(registry.get("edit").is_none());
    assert!(registry.get("bash").is_none());
    assert!(registry.get("read").is_some());
}

#[test]
fn registering_same_name_twice_keeps_single_entry() {
    let mut registry = ToolRegistry::new();
    registry.register(std::sync::Arc::new(crate::read::ReadTool));
    registry.register(std::sync::Arc::new(crate::read::ReadTool));
    assert_eq!(registry.names().len(), 1);
}
