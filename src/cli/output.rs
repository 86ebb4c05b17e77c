//! Terminal output formatting with colors
//!
//! Respects NO_COLOR, CLICOLOR, CLICOLOR_FORCE automatically.

use colored::Colorize;
use itertools::Itertools;

use crate::application::services::{DocumentReport, LevelControls, VisibilityController};
use crate::domain::{TreeNodeConvert, TreeWidget};

/// Print error (red bold "error:" prefix) to stderr
pub fn error(msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("{}: {}", "error".red().bold(), msg);
}

/// Print warning (yellow "Warning:" prefix) to stderr
pub fn warning(msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("{}: {}", "Warning".yellow(), msg);
}

/// Print section header (cyan bold)
pub fn header(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{}", msg.to_string().cyan().bold());
}

/// Print indented detail (no color)
pub fn detail(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("  {}", msg);
}

/// Print plain output (no color)
pub fn info(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{}", msg);
}

/// Print prompt without newline (cyan)
pub fn prompt(msg: &(impl std::fmt::Display + ?Sized)) {
    use std::io::Write;
    print!("{} ", msg.to_string().cyan());
    std::io::stdout().flush().ok();
}

/// Print the widget as a tree, or a note when the filter hides everything.
pub fn tree(widget: &TreeWidget) {
    let tree = widget.to_tree_string();
    if tree.leaves.is_empty() && widget.search_text().is_some() {
        header(&tree.root);
        detail(&"no matching topics".dimmed());
        return;
    }
    print!("{}", tree);
}

/// Print the current level inputs.
pub fn inputs(controls: &LevelControls) {
    detail(&format!(
        "top={} bottom={} (showing {})",
        controls.top_input(),
        controls.bottom_input(),
        controls.window()
    ));
}

/// Print node counts per window level, roots first.
pub fn levels(controller: &VisibilityController) {
    header(&format!("{} levels", controller.max_level()));
    for (level, nodes) in controller.index().iter_levels().rev() {
        println!("  {:>3}  {:>6} nodes", level, nodes.len());
    }
}

/// Render the year histogram as two aligned rows.
pub fn year_rows(report: &DocumentReport) -> (String, String) {
    let width = report
        .year_counts
        .iter()
        .map(|(y, c)| y.to_string().len().max(c.to_string().len()))
        .max()
        .unwrap_or(4);
    let years = report
        .year_counts
        .keys()
        .map(|y| format!("{:>w$}", y, w = width))
        .join(" ");
    let counts = report
        .year_counts
        .values()
        .map(|c| format!("{:>w$}", c, w = width))
        .join(" ");
    (years, counts)
}

/// Print the detail view of one node.
pub fn document_report(report: &DocumentReport) {
    header(&report.title);

    info(&"Number of documents by year:".bold());
    let (years, counts) = year_rows(report);
    detail(&years);
    detail(&counts);

    info(
        &format!(
            "Document details (showing only the top {}):",
            report.limit.min(report.total)
        )
        .bold(),
    );
    for doc in &report.documents {
        let paper = &doc.paper;
        let title = match &paper.url {
            Some(url) => format!("{} <{}>", paper.title, url.underline()),
            None => paper.title.clone(),
        };
        detail(&format!(
            "{} | {} | {} | {} | {:.2}",
            paper.series, paper.year, title, paper.author, doc.prob
        ));
    }
    if report.total > report.documents.len() {
        detail(
            &format!("... {} more", report.total - report.documents.len()).dimmed(),
        );
    }
}
