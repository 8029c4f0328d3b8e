use crate::graph::{LicenseCondition, Target};

/// Source tree prefixes under which the next directories name the project.
const SOURCE_PREFIXES: [&str; 5] = ["external/", "vendor/", "hardware/", "device/", "prebuilts/"];

/// Originating library a condition is reported under. First match wins: the
/// condition's explicit library, the origin's package, a project derived from
/// the license text path, the origin's file name.
pub fn library_name(origin: &Target, condition: &LicenseCondition) -> String {
    if let Some(name) = non_empty(condition.library.as_deref()) {
        return name.to_string();
    }

    if let Some(package) = non_empty(origin.package.as_deref()) {
        return package.to_string();
    }

    if let Some(name) = condition.text.as_deref().and_then(project_from_text_path) {
        return name;
    }

    origin
        .install_name
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or(&origin.install_name)
        .to_string()
}

/// `external/libfoo/NOTICE` -> `libfoo`, `vendor/acme/libbar/LICENSE` -> `acme/libbar`.
pub fn project_from_text_path(text: &str) -> Option<String> {
    let text = text.trim_start_matches('/');
    let rest = SOURCE_PREFIXES.iter().find_map(|prefix| text.strip_prefix(prefix))?;
    let (dir, _file) = rest.rsplit_once('/')?;
    let dir = dir.trim_matches('/');

    if dir.is_empty() {
        None
    } else {
        Some(dir.to_string())
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
