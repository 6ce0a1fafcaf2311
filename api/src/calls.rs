//! Wire format of managed method invocations.
//!
//! A call is encoded as `"<Namespace.Type>.<Member>(<args>)"`. Argument text
//! is substituted verbatim: nothing is quoted or escaped, and multiple
//! arguments are joined with `", "`. Splitting and interpreting the argument
//! list is entirely the managed parser's job, so argument text containing
//! `(`, `)` or `,` will derail it. This is a protocol contract with the
//! managed dispatcher, not a general-purpose call API.

/// Namespace every bridge call is rooted in.
pub const BRIDGE_NAMESPACE: &str = "Bridge";
/// Managed type exposing the unmanaged entry point.
pub const DISPATCHER_TYPE: &str = "Methods";
/// Name of the unmanaged-callers-only entry point on the dispatcher type.
pub const ENTRY_POINT: &str = "RunMethod";

/// Assembly-qualified name of the dispatcher type,
/// e.g. `"Bridge.Methods, Bridge"`.
pub fn dispatcher_type_name(assembly_name: &str) -> String {
    format!("{}.{}, {}", BRIDGE_NAMESPACE, DISPATCHER_TYPE, assembly_name)
}

pub fn load_assembly(assembly_path: &str) -> String {
    format!("{}.Assemblies.LoadAssembly({})", BRIDGE_NAMESPACE, assembly_path)
}

pub fn unload_assembly(assembly_path: &str) -> String {
    format!("{}.Assemblies.UnloadAssembly({})", BRIDGE_NAMESPACE, assembly_path)
}

pub fn create_instance(type_namespace: &str) -> String {
    format!("{}.InstanceFactory.CreateInstance({})", BRIDGE_NAMESPACE, type_namespace)
}

pub fn delete_instance(instance_id: u32) -> String {
    format!("{}.InstanceFactory.DeleteInstance({})", BRIDGE_NAMESPACE, instance_id)
}

pub fn run_instance_method(instance_id: u32, method: &str) -> String {
    format!(
        "{}.InstanceFactory.RunInstanceMethod({}, {})",
        BRIDGE_NAMESPACE, instance_id, method
    )
}
