//! Text style resolution.
//!
//! Each style run becomes an ordered list of `TextStyle` parameters. Rich
//! text emits a baseline style taken from the first run and, per run, only
//! the parameters that differ from it.

use std::sync::OnceLock;

use indexmap::IndexMap;
use regex::Regex;

use dartboard_core::dart::{color_literal, fix, string_literal};
use dartboard_core::document::{Shadow, TextRun};
use dartboard_core::{Color, Settings};

use crate::paint::text_shadow;

/// `TextStyle` parameters in emission order.
pub const STYLE_KEYS: [&str; 9] = [
    "fontFamily",
    "fontSize",
    "color",
    "letterSpacing",
    "fontStyle",
    "fontWeight",
    "decoration",
    "height",
    "shadows",
];

/// Which parameters a list includes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StyleScope {
    /// Every parameter; used for flat text and character style assets.
    Full,
    /// Baseline of rich text: no weight, italic or decoration.
    Baseline,
    /// Per-run style: no line height or shadows.
    Run,
}

impl StyleScope {
    fn includes(&self, key: &str) -> bool {
        match self {
            StyleScope::Full => true,
            StyleScope::Baseline => !matches!(key, "fontStyle" | "fontWeight" | "decoration"),
            StyleScope::Run => !matches!(key, "height" | "shadows"),
        }
    }
}

/// Node-level inputs shared by every run.
#[derive(Debug, Clone, Default)]
pub struct TextContext {
    /// Fill of the text node, used when a run has none.
    pub fill: Option<Color>,
    pub opacity: f64,
    pub line_spacing: f64,
    pub shadow: Option<Shadow>,
    /// Parameter name substituted for the colour.
    pub color_param: Option<String>,
}

/// An ordered parameter list such as `fontSize: 14, color: ...`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StyleParams(IndexMap<&'static str, String>);

impl StyleParams {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Entries present here that are absent from or differ in `baseline`.
    pub fn delta(&self, baseline: &StyleParams) -> StyleParams {
        StyleParams(
            self.0
                .iter()
                .filter(|(k, v)| baseline.0.get(*k) != Some(*v))
                .map(|(k, v)| (*k, v.clone()))
                .collect(),
        )
    }

    /// `TextStyle(...)` built from the entries.
    pub fn to_text_style(&self) -> String {
        let body: String = self
            .0
            .iter()
            .map(|(k, v)| format!("{}: {}, ", k, v))
            .collect();
        format!("TextStyle({})", body)
    }
}

/// Resolve the parameters of one run.
pub fn style_params(
    run: &TextRun,
    text: &TextContext,
    settings: &Settings,
    scope: StyleScope,
) -> StyleParams {
    let mut params = IndexMap::new();
    for key in STYLE_KEYS {
        if !scope.includes(key) {
            continue;
        }
        let value = match key {
            "fontFamily" => Some(string_literal(settings.flutter_font(&run.font_family))),
            "fontSize" => Some(fix(run.font_size, 6)),
            "color" => match &text.color_param {
                Some(name) => Some(name.clone()),
                None => run
                    .fill
                    .or(text.fill)
                    .map(|c| color_literal(&c, text.opacity)),
            },
            "letterSpacing" => letter_spacing(run),
            "fontStyle" => is_italic(&run.font_style).then(|| "FontStyle.italic".to_string()),
            "fontWeight" => font_weight(&run.font_style).map(|w| format!("FontWeight.{}", w)),
            "decoration" => decoration(run),
            "height" => line_height(text.line_spacing, run.font_size),
            "shadows" => text
                .shadow
                .filter(|s| s.visible)
                .map(|s| format!("[{}, ]", text_shadow(&s, text.opacity))),
            _ => None,
        };
        if let Some(v) = value {
            params.insert(key, v);
        }
    }
    StyleParams(params)
}

fn letter_spacing(run: &TextRun) -> Option<String> {
    let spacing = run.char_spacing / 1000.0 * run.font_size;
    (spacing != 0.0).then(|| fix(spacing, 6))
}

/// `floor(lineSpacing / fontSize * 100) / 100`, omitted for automatic spacing.
fn line_height(line_spacing: f64, font_size: f64) -> Option<String> {
    if line_spacing == 0.0 || font_size == 0.0 {
        return None;
    }
    Some(fix((line_spacing / font_size * 100.0).floor() / 100.0, 2))
}

fn decoration(run: &TextRun) -> Option<String> {
    match (run.underline, run.strikethrough) {
        (true, true) => Some(
            "TextDecoration.combine([TextDecoration.underline, TextDecoration.lineThrough])"
                .to_string(),
        ),
        (true, false) => Some("TextDecoration.underline".to_string()),
        (false, true) => Some("TextDecoration.lineThrough".to_string()),
        (false, false) => None,
    }
}

fn weight_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r"(?i)(hairline|thin|extra\s*light|ultra\s*light|extra\s*bold|ultra\s*bold|semi\s*bold|demi\s*bold|light|book|demi|normal|regular|plain|medium|bold|heavy|black|poster)",
        )
        .expect("font weight pattern is valid")
    })
}

/// Flutter `FontWeight` constant for a style name, `None` for regular.
pub fn font_weight(style: &str) -> Option<&'static str> {
    let found = weight_pattern().find(style)?;
    let word: String = found
        .as_str()
        .to_lowercase()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    match word.as_str() {
        "thin" | "hairline" => Some("w100"),
        "extralight" | "ultralight" => Some("w200"),
        "light" | "book" | "demi" => Some("w300"),
        "medium" => Some("w500"),
        "semibold" | "demibold" => Some("w600"),
        "bold" => Some("w700"),
        "extrabold" | "ultrabold" | "heavy" => Some("w800"),
        "black" | "poster" => Some("w900"),
        _ => None,
    }
}

pub fn is_italic(style: &str) -> bool {
    let style = style.to_lowercase();
    style.contains("italic") || style.contains("oblique")
}
