//! Dart identifier and file naming.

use convert_case::{Case, Casing};

use dartboard_core::{DesignNode, Prop, Settings};

/// Replace anything that cannot appear in a Dart identifier with spaces.
fn words(raw: &str) -> String {
    raw.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { ' ' })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// A class name such as `HomePage`.
pub fn class_name(raw: &str, normalize: bool) -> String {
    let words = words(raw);
    let name = if normalize {
        words.to_case(Case::Pascal)
    } else {
        words.replace(' ', "")
    };
    if name.is_empty() {
        return "Widget".to_string();
    }
    if name.starts_with(|c: char| c.is_ascii_digit()) {
        format!("W{}", name)
    } else {
        name
    }
}

/// A member or parameter name such as `primaryBlue`.
pub fn identifier(raw: &str, normalize: bool) -> String {
    let words = words(raw);
    let name = if normalize {
        words.to_case(Case::Camel)
    } else {
        words.replace(' ', "")
    };
    if name.is_empty() {
        return "value".to_string();
    }
    if name.starts_with(|c: char| c.is_ascii_digit()) {
        format!("k{}", name)
    } else {
        name
    }
}

/// `HomePage` becomes `home_page.dart`.
pub fn file_name(class: &str) -> String {
    format!("{}.dart", class.to_case(Case::Snake))
}

/// Class name for an artboard or master component.
pub fn widget_class_name(node: &DesignNode, settings: &Settings) -> String {
    match node.prop_str(Prop::WidgetName) {
        Some(name) => class_name(name, false),
        None => format!(
            "{}{}",
            settings.widget_prefix,
            class_name(&node.name, settings.normalize_name_case)
        ),
    }
}
