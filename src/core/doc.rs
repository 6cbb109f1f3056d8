//! Documentation comment parsing.
//!
//! Reads the CMS annotations of a `/** ... */` block:
//! - summary text (the description)
//! - `@title`, `@label`, `@tags [a, b]`
//! - `@o3rCategory <name>` on properties, `@o3rCategories <name> [label]` on interfaces
//! - `@o3rWidget <type>` with `@o3rWidgetParam <name> <json>`
//! - `@o3rRequired`

use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

use crate::core::data::{CategoryDescription, PropertyWidget};

static LABEL_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"@label (.*)").unwrap());
static CATEGORY_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@o3rCategory (\w+)").unwrap());
static CATEGORIES_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@o3rCategories (.*)").unwrap());
static WIDGET_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"@o3rWidget (.*)").unwrap());
static WIDGET_PARAM_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@o3rWidgetParam (.*)").unwrap());
static WORD_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\w+").unwrap());

#[derive(Debug, Error)]
pub enum DocError {
    #[error("Invalid JSON format: {value}\n{source}")]
    InvalidWidgetParameter {
        value: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Annotations read from one documentation comment.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DocInfo {
    pub description: String,
    pub title: Option<String>,
    pub label: Option<String>,
    pub tags: Option<Vec<String>>,
    pub category: Option<String>,
    pub categories: Option<Vec<CategoryDescription>>,
    pub widget: Option<PropertyWidget>,
    pub required: bool,
}

impl DocInfo {
    /// Parse the body of a block comment (swc has already stripped `/*` and `*/`).
    pub fn parse(comment: &str) -> Result<Self, DocError> {
        let lines = clean_lines(comment);
        let text = lines.join("\n");

        Ok(Self {
            description: summary(&lines),
            title: block_tag(&lines, "@title"),
            label: LABEL_REGEX
                .captures(&text)
                .map(|c| c[1].trim().to_string())
                .filter(|l| !l.is_empty()),
            tags: block_tag(&lines, "@tags").and_then(|content| parse_tags(&content)),
            category: CATEGORY_REGEX.captures(&text).map(|c| c[1].to_string()),
            categories: parse_categories(&text),
            widget: parse_widget(&text)?,
            required: text.contains("@o3rRequired"),
        })
    }
}

/// Comment lines without their leading `*` decoration.
fn clean_lines(comment: &str) -> Vec<String> {
    comment
        .lines()
        .map(|line| {
            let line = line.trim();
            let line = line.strip_prefix('*').unwrap_or(line);
            line.strip_prefix(' ').unwrap_or(line).trim_end().to_string()
        })
        .collect()
}

fn summary(lines: &[String]) -> String {
    lines
        .iter()
        .take_while(|line| !line.trim_start().starts_with('@'))
        .map(|line| line.trim())
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Content of a block tag, running until the next block tag.
fn block_tag(lines: &[String], tag: &str) -> Option<String> {
    let start = lines.iter().position(|line| {
        let line = line.trim_start();
        line.strip_prefix(tag)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with(char::is_whitespace))
    })?;

    let mut parts = vec![lines[start].trim_start()[tag.len()..].trim().to_string()];
    parts.extend(
        lines[start + 1..]
            .iter()
            .take_while(|line| !line.trim_start().starts_with('@'))
            .map(|line| line.trim().to_string()),
    );
    let content = parts
        .into_iter()
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    (!content.is_empty()).then_some(content)
}

/// `[booking, servicing, pax_page]` gives the words before the closing bracket.
fn parse_tags(content: &str) -> Option<Vec<String>> {
    let end = content.find(']').filter(|end| *end > 0)?;
    let tags: Vec<String> = WORD_REGEX
        .find_iter(&content[..end])
        .map(|m| m.as_str().to_string())
        .collect();
    (!tags.is_empty()).then_some(tags)
}

fn parse_categories(text: &str) -> Option<Vec<CategoryDescription>> {
    let categories: Vec<CategoryDescription> = CATEGORIES_REGEX
        .captures_iter(text)
        .map(|c| c[1].trim().to_string())
        .filter(|category| !category.is_empty())
        .map(|category| match category.split_once(' ') {
            Some((name, label)) => CategoryDescription {
                name: name.to_string(),
                label: label.trim().to_string(),
            },
            None => CategoryDescription {
                label: capitalize(&category),
                name: category,
            },
        })
        .collect();
    (!categories.is_empty()).then_some(categories)
}

fn parse_widget(text: &str) -> Result<Option<PropertyWidget>, DocError> {
    let Some(widget_type) = WIDGET_REGEX
        .captures(text)
        .map(|c| c[1].trim().to_string())
        .filter(|t| !t.is_empty())
    else {
        return Ok(None);
    };

    let mut parameters = serde_json::Map::new();
    for captures in WIDGET_PARAM_REGEX.captures_iter(text) {
        let param = captures[1].trim();
        let Some((name, value)) = param.split_once(' ') else {
            continue;
        };
        let parsed = serde_json::from_str(value).map_err(|source| {
            DocError::InvalidWidgetParameter {
                value: value.to_string(),
                source,
            }
        })?;
        parameters.insert(name.to_string(), parsed);
    }

    Ok(Some(PropertyWidget {
        widget_type,
        parameters: (!parameters.is_empty()).then_some(parameters),
    }))
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
