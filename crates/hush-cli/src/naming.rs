use hush_hal::Descriptor;

/// Replace every character that is not ASCII alphanumeric with `_`.
pub fn sanitize(name: &str) -> String {
    name.chars().map(|c| if c.is_ascii_alphanumeric() { c } else { '_' }).collect()
}

/// `Implementor_<implementor>_name_<name>_UUID_<uuid>`, unsanitized.
pub fn prefix(descriptor: &Descriptor) -> String {
    format!(
        "Implementor_{}_name_{}_UUID_{}",
        descriptor.implementor,
        descriptor.name,
        descriptor.uuid.hyphenated()
    )
}

/// Parameterized case name, e.g. `Implementor_..._UUID_..._level_HIGH`.
pub fn case_name(descriptor: &Descriptor, tag: &str, value: &str) -> String {
    sanitize(&format!("{}_{tag}_{value}", prefix(descriptor)))
}
