//! Output formatting for the coverage tree.

use std::fmt::Write;

use serde::Serialize;

use crate::annotate::{self, Markers};
use crate::error::{GocovError, Result};
use crate::model::{digits_count, Band};
use crate::sys::FileSystem;
use crate::tree::{Filter, Node, PathTree, Stats};

const FILL_SYMBOL: char = '\u{25A0}';
const PROGRESS_WIDTH: usize = 10;
const PERCENT_WIDTH: usize = 8;

const FILE_TITLE: &str = "File";
const FULL_PATH_TITLE: &str = "Full path";

pub const HTML_REPORT_FILE: &str = "coverage.html";

const TEMPLATE: &str = include_str!("../assets/report.html");
const SCRIPT: &str = include_str!("../assets/report.js");

const HTML_MARKERS: Markers<'static> = Markers {
    start: r#"<span style="background: pink">"#,
    end: "</span>",
};

/// Trait for rendering an accumulated coverage tree.
pub trait ReportFormatter {
    /// Render the tree; `stats` is what [`PathTree::accumulate`] returned.
    fn format(&self, tree: &PathTree, stats: &Stats) -> Result<String>;
}

/// Terminal colors for a band; empty strings when colors are off.
fn palette(band: Band, color: bool) -> (&'static str, &'static str) {
    if !color {
        return ("", "");
    }
    let start = match band {
        Band::Ok => "\x1b[0;32m",
        Band::Warn => "\x1b[0;33m",
        Band::Error => "\x1b[0;31m",
    };
    (start, "\x1b[0m")
}

fn progress_bar(percent: f64) -> String {
    let filled = ((percent / 10.0).floor() as usize).min(PROGRESS_WIDTH);
    let mut bar: String = std::iter::repeat(FILL_SYMBOL).take(filled).collect();
    bar.push_str(&" ".repeat(PROGRESS_WIDTH - filled));
    bar
}

/// Fixed-width pipe table for the terminal.
#[derive(Debug, Default)]
pub struct TableFormatter<'a> {
    pub color: bool,
    pub with_full_path: bool,
    pub filter: Filter<'a>,
}

struct Widths {
    file: usize,
    stmts: usize,
    full_path: usize,
}

impl TableFormatter<'_> {
    fn rule(&self, out: &mut String, widths: &Widths) {
        write!(
            out,
            "|-{}-|-{}-|-{}-|-{}-|",
            "-".repeat(widths.file),
            "-".repeat(widths.stmts + 1),
            "-".repeat(PERCENT_WIDTH),
            "-".repeat(PROGRESS_WIDTH),
        )
        .unwrap();
        if self.with_full_path {
            write!(out, "-{}-|", "-".repeat(widths.full_path)).unwrap();
        }
        out.push('\n');
    }

    fn header(&self, out: &mut String, widths: &Widths) {
        write!(
            out,
            "| {:<file$} | {:>stmts$} | {:>percent$} | {:<progress$} |",
            FILE_TITLE,
            "Stmts",
            "% Stmts",
            "Progress",
            file = widths.file,
            stmts = widths.stmts + 1,
            percent = PERCENT_WIDTH,
            progress = PROGRESS_WIDTH,
        )
        .unwrap();
        if self.with_full_path {
            write!(out, " {:<1$} |", FULL_PATH_TITLE, widths.full_path).unwrap();
        }
        out.push('\n');
    }

    fn row(&self, out: &mut String, node: &Node, widths: &Widths) {
        let percent = node.percent();
        let (c, nc) = palette(node.band(), self.color);
        let indent = "  ".repeat(node.level());
        let label_pad = widths
            .file
            .saturating_sub(node.name().chars().count() + node.level() * 2);
        let stmts_pad = widths
            .stmts
            .saturating_sub(digits_count(node.all_statements()) + digits_count(node.covered()));

        write!(
            out,
            "|{c}{indent} {}{} {nc}| {c}{}{}/{}{nc} | {c}{percent:7.2}%{nc} | {c}{}{nc} |",
            node.name(),
            " ".repeat(label_pad),
            " ".repeat(stmts_pad),
            node.covered(),
            node.all_statements(),
            progress_bar(percent),
        )
        .unwrap();
        if self.with_full_path {
            write!(out, " {c}{:<1$}{nc} |", node.full_path(), widths.full_path).unwrap();
        }
        out.push('\n');
    }
}

impl ReportFormatter for TableFormatter<'_> {
    fn format(&self, tree: &PathTree, stats: &Stats) -> Result<String> {
        let widths = Widths {
            file: stats.file_max_len.max(FILE_TITLE.len()),
            stmts: stats.stmts_max_len,
            full_path: stats.full_path_max_len.max(FULL_PATH_TITLE.len()),
        };

        let mut out = String::new();
        self.rule(&mut out, &widths);
        self.header(&mut out, &widths);
        self.rule(&mut out, &widths);
        for node in tree.visible(&self.filter) {
            self.row(&mut out, node, &widths);
        }
        self.rule(&mut out, &widths);
        Ok(out)
    }
}

/// One tree node as the HTML page's script reads it.
#[derive(Debug, Serialize)]
struct JsonNode<'t> {
    name: &'t str,
    all: u64,
    covered: u64,
    percent: f64,
    path: &'t str,
    level: usize,
    #[serde(rename = "type")]
    kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    children: Option<Vec<JsonNode<'t>>>,
}

impl<'t> JsonNode<'t> {
    fn from_node(node: &'t Node) -> Self {
        let children = (!node.is_file()).then(|| node.children().map(Self::from_node).collect());
        Self {
            name: node.name(),
            all: node.all_statements(),
            covered: node.covered(),
            percent: (node.percent() * 100.0).round() / 100.0,
            path: node.full_path(),
            level: node.level(),
            kind: if node.is_file() { "file" } else { "directory" },
            children,
        }
    }
}

/// Single-page HTML report with every file's annotated source embedded.
pub struct HtmlFormatter<'a> {
    /// Where source files are read from.
    pub fs: &'a dyn FileSystem,
}

impl HtmlFormatter<'_> {
    fn source(&self, node: &Node) -> Result<Option<String>> {
        let Some(file) = node.value() else {
            return Ok(None);
        };
        let target = annotate::target_file(node.full_path());
        let data = self.fs.read(target)?.ok_or_else(|| GocovError::MissingFile {
            path: target.to_string(),
        })?;
        let source = String::from_utf8_lossy(&data);
        let lines = annotate::annotate_with(&source, file, &HTML_MARKERS, |text| {
            html_escape::encode_text(text).into_owned()
        })?;

        Ok(Some(format!(
            "<div class=\"source\" id=\"{}\"><pre>{}</pre></div>\n",
            html_escape::encode_double_quoted_attribute(node.full_path()),
            lines.join("\n"),
        )))
    }

    fn sources(&self, node: &Node, out: &mut String) -> Result<()> {
        if let Some(source) = self.source(node)? {
            out.push_str(&source);
        }
        for child in node.children() {
            self.sources(child, out)?;
        }
        Ok(())
    }
}

impl ReportFormatter for HtmlFormatter<'_> {
    fn format(&self, tree: &PathTree, _stats: &Stats) -> Result<String> {
        let mut sources = String::new();
        for node in tree.top_level() {
            self.sources(node, &mut sources)?;
        }

        // A lone top-level directory is the natural root of the page.
        let mut top = tree.top_level();
        let json = match (top.next(), top.next()) {
            (Some(only), None) => JsonNode::from_node(only),
            _ => JsonNode::from_node(tree.root()),
        };
        let data = serde_json::to_string(&json)?.replace("</", "<\\/");

        Ok(TEMPLATE
            .replace("<!-- SCRIPT -->", SCRIPT.trim_end())
            .replace(
                "<!-- REPORT -->",
                &format!("<script type=\"application/json\" id=\"report-data\">{data}</script>"),
            )
            .replace("<!-- SOURCE -->", sources.trim_end()))
    }
}
