//! Output formatters for CLI commands.
//!
//! Every command result goes through [`format_output`], so the same data
//! prints as JSON, compact text or colored key/value output. Folder
//! hierarchies have their own renderer in [`tree`].

use anyhow::Result;
use colored::Colorize;
use serde::Serialize;
use sharetree_core::cli::OutputFormat;

/// Format data according to the specified output format.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
///
/// # Examples
///
/// ```
/// use sharetree_cli::formatters::format_output;
/// use sharetree_core::cli::OutputFormat;
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Created {
///     path: String,
/// }
///
/// let output = format_output(&Created { path: "/docs".to_string() }, OutputFormat::Json)?;
/// assert!(output.contains("\"path\""));
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn format_output<T: Serialize>(data: &T, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => json::format(data),
        OutputFormat::Text => text::format(data),
        OutputFormat::Pretty => pretty::format(data),
    }
}

/// JSON output formatting.
pub mod json {
    use super::{Result, Serialize};

    /// Format data as indented JSON.
    pub fn format<T: Serialize>(data: &T) -> Result<String> {
        Ok(serde_json::to_string_pretty(data)?)
    }

    /// Format data as single-line JSON.
    pub fn format_compact<T: Serialize>(data: &T) -> Result<String> {
        Ok(serde_json::to_string(data)?)
    }
}

/// Plain text output formatting.
pub mod text {
    use super::{Result, Serialize, json};

    /// Format data as compact JSON, suitable for piping.
    pub fn format<T: Serialize>(data: &T) -> Result<String> {
        json::format_compact(data)
    }
}

/// Pretty (human-readable) output formatting.
///
/// Command results are flat records, sometimes holding a list of records
/// (listing entries, failed sources) or nested sections (configuration).
/// Records print as aligned `key: value` lines, lists of records as
/// tables, and sections as indented blocks. Keys print in sorted order.
/// Values starting with `/` are tree paths and are highlighted.
pub mod pretty {
    use super::{Colorize, Result, Serialize};
    use serde_json::{Map, Value};

    /// Format data for a terminal.
    pub fn format<T: Serialize>(data: &T) -> Result<String> {
        let value = serde_json::to_value(data)?;
        let mut lines = Vec::new();
        match &value {
            Value::Object(map) => record(&mut lines, map, ""),
            Value::Array(items) => list(&mut lines, items, ""),
            other => lines.push(plain(other)),
        }
        Ok(lines.join("\n"))
    }

    fn record(lines: &mut Vec<String>, map: &Map<String, Value>, pad: &str) {
        if map.is_empty() {
            lines.push(format!("{pad}{}", "(empty)".dimmed()));
            return;
        }
        let width = map.keys().map(|key| key.len() + 1).max().unwrap_or(0);
        for (key, value) in map {
            match value {
                Value::Object(inner) => {
                    lines.push(format!("{pad}{}", format!("[{key}]").bold()));
                    record(lines, inner, &format!("{pad}  "));
                }
                Value::Array(items) if is_table(items) => {
                    lines.push(format!("{pad}{} ({}):", key.blue().bold(), items.len()));
                    table(lines, items, &format!("{pad}  "));
                }
                Value::Array(items) if !items.is_empty() => {
                    lines.push(format!("{pad}{}:", key.blue().bold()));
                    list(lines, items, &format!("{pad}  "));
                }
                _ => {
                    let label = format!("{:<width$}", format!("{key}:"));
                    lines.push(format!("{pad}{} {}", label.blue().bold(), styled(value)));
                }
            }
        }
    }

    fn list(lines: &mut Vec<String>, items: &[Value], pad: &str) {
        if is_table(items) {
            table(lines, items, pad);
            return;
        }
        for item in items {
            lines.push(format!("{pad}- {}", styled(item)));
        }
    }

    /// A non-empty list whose items are all records of scalars.
    fn is_table(items: &[Value]) -> bool {
        !items.is_empty()
            && items.iter().all(|item| {
                item.as_object()
                    .is_some_and(|map| map.values().all(|v| !v.is_object() && !v.is_array()))
            })
    }

    fn table(lines: &mut Vec<String>, items: &[Value], pad: &str) {
        let mut columns: Vec<&str> = Vec::new();
        for map in items.iter().filter_map(Value::as_object) {
            for key in map.keys() {
                if !columns.contains(&key.as_str()) {
                    columns.push(key);
                }
            }
        }
        let rows: Vec<Vec<(String, &Value)>> = items
            .iter()
            .filter_map(Value::as_object)
            .map(|map| {
                columns
                    .iter()
                    .map(|column| {
                        let value = map.get(*column).unwrap_or(&Value::Null);
                        (plain(value), value)
                    })
                    .collect()
            })
            .collect();
        let widths: Vec<usize> = columns
            .iter()
            .enumerate()
            .map(|(i, column)| {
                rows.iter()
                    .map(|row| row[i].0.chars().count())
                    .chain(std::iter::once(column.len()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let header: Vec<String> = columns
            .iter()
            .zip(&widths)
            .map(|(column, width)| format!("{column:<width$}"))
            .collect();
        lines.push(format!("{pad}{}", header.join("  ").trim_end().dimmed()));
        for row in &rows {
            let cells: Vec<String> = row
                .iter()
                .zip(&widths)
                .map(|((text, value), width)| {
                    let fill = " ".repeat(width.saturating_sub(text.chars().count()));
                    format!("{}{fill}", paint(text, value))
                })
                .collect();
            lines.push(format!("{pad}{}", cells.join("  ").trim_end()));
        }
    }

    /// Uncolored text of a scalar.
    fn plain(value: &Value) -> String {
        match value {
            Value::Null => "-".to_string(),
            Value::Bool(true) => "yes".to_string(),
            Value::Bool(false) => "no".to_string(),
            Value::Array(items) if items.is_empty() => "(none)".to_string(),
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }

    fn styled(value: &Value) -> String {
        paint(&plain(value), value)
    }

    fn paint(text: &str, value: &Value) -> String {
        match value {
            Value::Null => text.dimmed().to_string(),
            Value::Bool(_) => text.yellow().to_string(),
            Value::Number(_) => text.cyan().to_string(),
            Value::String(s) if s.starts_with('/') => text.blue().to_string(),
            Value::String(_) => text.green().to_string(),
            Value::Object(_) | Value::Array(_) => text.to_string(),
        }
    }
}

/// Folder hierarchy rendering.
pub mod tree {
    use super::Colorize;
    use sharetree_store::{Folder, Node};

    /// Renders `folder` as an indented tree with box-drawing guides.
    ///
    /// With `color`, folders are blue and binary files magenta.
    ///
    /// # Examples
    ///
    /// ```
    /// use sharetree_cli::formatters::tree::render;
    /// use sharetree_store::TreeStore;
    ///
    /// let mut store = TreeStore::new();
    /// store.create_folder("/", "docs").unwrap();
    /// store.create_file("/docs", "a.txt", "hi", "text/plain").unwrap();
    ///
    /// assert_eq!(render(store.root(), false), "root/\n└── docs/\n    └── a.txt");
    /// ```
    #[must_use]
    pub fn render(folder: &Folder, color: bool) -> String {
        let mut lines = vec![folder_label(folder.name(), color)];
        walk(folder, "", color, &mut lines);
        lines.join("\n")
    }

    fn walk(folder: &Folder, prefix: &str, color: bool, lines: &mut Vec<String>) {
        let count = folder.len();
        for (index, child) in folder.children().enumerate() {
            let last = index + 1 == count;
            let branch = if last { "└── " } else { "├── " };
            match child {
                Node::Folder(inner) => {
                    lines.push(format!("{prefix}{branch}{}", folder_label(inner.name(), color)));
                    let nested = format!("{prefix}{}", if last { "    " } else { "│   " });
                    walk(inner, &nested, color, lines);
                }
                Node::File(file) => {
                    let label = if color && file.kind().is_binary() {
                        file.name().magenta().to_string()
                    } else {
                        file.name().to_string()
                    };
                    lines.push(format!("{prefix}{branch}{label}"));
                }
            }
        }
    }

    fn folder_label(name: &str, color: bool) -> String {
        let label = format!("{name}/");
        if color {
            label.blue().bold().to_string()
        } else {
            label
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sharetree_store::TreeStore;

    #[derive(Serialize)]
    struct Sample {
        path: String,
        size: usize,
        binary: bool,
        tags: Vec<String>,
    }

    fn sample() -> Sample {
        Sample {
            path: "/docs/a.txt".to_string(),
            size: 42,
            binary: false,
            tags: vec!["x".to_string()],
        }
    }

    #[test]
    fn test_json_format() {
        let output = json::format(&sample()).unwrap();
        assert!(output.contains("\"path\": \"/docs/a.txt\""));
        assert!(output.contains('\n'));
    }

    #[test]
    fn test_text_format_is_single_line() {
        let output = format_output(&sample(), OutputFormat::Text).unwrap();
        assert!(!output.contains('\n'));
        assert!(output.contains("\"size\":42"));
    }

    #[test]
    fn test_pretty_format() {
        colored::control::set_override(false);
        let output = format_output(&sample(), OutputFormat::Pretty).unwrap();
        assert_eq!(
            output,
            "binary: no\npath:   /docs/a.txt\nsize:   42\ntags:\n  - x"
        );
    }

    #[test]
    fn test_pretty_lists_records_as_table() {
        #[derive(Serialize)]
        struct Entry {
            name: &'static str,
            kind: &'static str,
            size: usize,
        }
        #[derive(Serialize)]
        struct Listing {
            path: &'static str,
            entries: Vec<Entry>,
            skipped: Vec<String>,
        }

        colored::control::set_override(false);
        let listing = Listing {
            path: "/docs",
            entries: vec![
                Entry { name: "drafts", kind: "folder", size: 2 },
                Entry { name: "a.txt", kind: "text/plain", size: 120 },
            ],
            skipped: Vec::new(),
        };
        let output = pretty::format(&listing).unwrap();
        assert_eq!(
            output,
            "entries (2):\n\
             \x20 kind        name    size\n\
             \x20 folder      drafts  2\n\
             \x20 text/plain  a.txt   120\n\
             path:    /docs\n\
             skipped: (none)"
        );
    }

    #[test]
    fn test_pretty_sections() {
        #[derive(Serialize)]
        struct Inner {
            level: u8,
        }
        #[derive(Serialize)]
        struct Outer {
            archive: Inner,
            empty: std::collections::BTreeMap<String, String>,
        }

        colored::control::set_override(false);
        let output = pretty::format(&Outer {
            archive: Inner { level: 3 },
            empty: std::collections::BTreeMap::new(),
        })
        .unwrap();
        assert_eq!(output, "[archive]\n  level: 3\n[empty]\n  (empty)");
    }

    #[test]
    fn test_tree_render_nesting() {
        let mut store = TreeStore::new();
        store.create_folder("/", "a").unwrap();
        store.create_folder("/a", "b").unwrap();
        store.create_file("/a/b", "deep.txt", "", "text/plain").unwrap();
        store.create_file("/", "top.txt", "", "text/plain").unwrap();

        let rendered = tree::render(store.root(), false);
        assert_eq!(
            rendered,
            "root/\n├── a/\n│   └── b/\n│       └── deep.txt\n└── top.txt"
        );
    }
}
