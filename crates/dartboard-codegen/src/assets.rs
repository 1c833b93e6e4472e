//! Shared colour and character style classes.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use indexmap::{IndexMap, IndexSet};
use regex::Regex;

use dartboard_core::dart::color_literal;
use dartboard_core::document::{Assets, Fill};
use dartboard_core::{Log, Settings};

use crate::naming;
use crate::paint;
use crate::text::{style_params, StyleScope, TextContext};
use crate::widget::DartFile;

const SCREENUTIL_IMPORT: &str = "import 'package:flutter_screenutil/flutter_screenutil.dart';";

fn numbered() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^(.+?)(\d+)$").expect("numbered name pattern is valid"))
}

/// Members named `<base><n>` collected into a `List` constant.
#[derive(Debug)]
struct NumberedList {
    is_gradient: bool,
    members: BTreeMap<usize, String>,
}

impl NumberedList {
    /// `static const List<T> base = const [base0, base1, ...];`, stopping at
    /// the first gap. Lists without both 0 and 1 are not emitted.
    fn declaration(&self, base: &str) -> Option<String> {
        if !self.members.contains_key(&0) || !self.members.contains_key(&1) {
            return None;
        }
        let names: Vec<&str> = (0..)
            .map_while(|i| self.members.get(&i).map(String::as_str))
            .collect();
        let ty = if self.is_gradient { "Gradient" } else { "Color" };
        Some(format!(
            "  static const List<{}> {} = const [{}];",
            ty,
            base,
            names.join(", ")
        ))
    }
}

fn asset_class_name(configured: &str, fallback: &str) -> String {
    if configured.trim().is_empty() {
        fallback.to_string()
    } else {
        naming::class_name(configured, false)
    }
}

/// Usable member name, or `None` for unnamed assets.
fn member_name(raw: Option<&str>) -> Option<String> {
    raw.filter(|n| n.chars().any(|c| c.is_ascii_alphanumeric()))
        .map(|n| naming::identifier(n, false))
}

/// The colour class, or `None` when colour export is off or there are no
/// colour assets.
pub fn colors(assets: &Assets, settings: &Settings, log: &mut Log) -> Option<DartFile> {
    if !settings.export_colors || assets.colors.is_empty() {
        return None;
    }
    let class_name = asset_class_name(&settings.colors_class_name, "GenColors");

    let mut used = IndexSet::new();
    let mut lists: IndexMap<String, NumberedList> = IndexMap::new();
    let mut lines = vec![
        "import 'package:flutter/material.dart';".to_string(),
        String::new(),
        format!("class {} {{", class_name),
    ];

    for asset in &assets.colors {
        let Some(name) = member_name(asset.name.as_deref()) else {
            continue;
        };
        if used.contains(&name) {
            log.warn(format!("Duplicate color asset name: {}", name), None);
            continue;
        }

        let declaration = match (&asset.color, &asset.gradient) {
            (Some(color), _) => format!(
                "  static const Color {} = {};",
                name,
                color_literal(color, 1.0)
            ),
            (None, Some(fill)) => match (fill, paint::gradient(fill, 1.0)) {
                (Fill::LinearGradient { .. }, Some(g)) => {
                    format!("  static const LinearGradient {} = {};", name, g)
                }
                (Fill::RadialGradient { .. }, Some(g)) => {
                    format!("  static const RadialGradient {} = {};", name, g)
                }
                _ => {
                    log.warn(
                        format!("Unsupported {} in color asset '{}'", fill.label(), name),
                        None,
                    );
                    continue;
                }
            },
            (None, None) => continue,
        };
        used.insert(name.clone());
        lines.push(declaration);

        let is_gradient = asset.color.is_none();
        if let Some(caps) = numbered().captures(&name) {
            let base = caps[1].to_string();
            let Ok(index) = caps[2].parse::<usize>() else {
                continue;
            };
            let list = lists.entry(base.clone()).or_insert_with(|| NumberedList {
                is_gradient,
                members: BTreeMap::new(),
            });
            if list.is_gradient != is_gradient {
                log.warn(
                    format!("Color asset lists can't mix colors and gradients ({})", base),
                    None,
                );
            } else {
                list.members.insert(index, name.clone());
            }
        }
    }

    let list_lines: Vec<String> = lists
        .iter()
        .filter_map(|(base, list)| {
            if used.contains(base) {
                log.warn(
                    format!("Color list '{}' collides with a color asset name", base),
                    None,
                );
                return None;
            }
            list.declaration(base)
        })
        .collect();
    if !list_lines.is_empty() {
        lines.push(String::new());
        lines.extend(list_lines);
    }
    lines.push("}".to_string());
    lines.push(String::new());

    log::info!("generated {} with {} colors", class_name, used.len());
    Some(DartFile {
        file_name: naming::file_name(&class_name),
        class_name,
        source: lines.join("\n"),
    })
}

/// The character style class, or `None` when style export is off or there
/// are no character styles.
pub fn text_styles(assets: &Assets, settings: &Settings, log: &mut Log) -> Option<DartFile> {
    if !settings.export_char_styles || assets.character_styles.is_empty() {
        return None;
    }
    let class_name = asset_class_name(&settings.char_styles_class_name, "GenTextStyles");

    let mut lines = vec!["import 'package:flutter/material.dart';".to_string()];
    if settings.width_unit == ".w" {
        lines.push(SCREENUTIL_IMPORT.to_string());
    }
    lines.push(String::new());
    lines.push(format!("class {} {{", class_name));

    let text = TextContext {
        opacity: 1.0,
        ..Default::default()
    };
    let mut used = IndexSet::new();
    for asset in &assets.character_styles {
        let Some(name) = member_name(asset.name.as_deref()) else {
            continue;
        };
        if !used.insert(name.clone()) {
            log.warn(format!("Duplicate character style asset name: {}", name), None);
            continue;
        }
        let style = style_params(&asset.style, &text, settings, StyleScope::Full);
        lines.push(format!(
            "  static TextStyle {} = {};",
            name,
            style.to_text_style()
        ));
    }
    lines.push("}".to_string());
    lines.push(String::new());

    Some(DartFile {
        file_name: naming::file_name(&class_name),
        class_name,
        source: lines.join("\n"),
    })
}
