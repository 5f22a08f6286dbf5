//! LaTeX table rendering.

use std::fmt::Write;

/// A table to render as a LaTeX `table` float with a `tabular` body.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LatexTable {
    pub caption: String,
    pub label: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Escape LaTeX special characters. `±` becomes `$\pm$`.
pub fn escape_latex(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => out.push_str(r"\textbackslash{}"),
            '&' | '%' | '$' | '#' | '_' | '{' | '}' => {
                out.push('\\');
                out.push(c);
            }
            '~' => out.push_str(r"\textasciitilde{}"),
            '^' => out.push_str(r"\textasciicircum{}"),
            '±' => out.push_str(r"$\pm$"),
            _ => out.push(c),
        }
    }
    out
}

/// Format `mean ± std` with a fixed number of decimals.
pub fn format_pm(mean: f64, std: f64, decimals: usize) -> String {
    format!("{mean:.decimals$} ± {std:.decimals$}")
}

/// Render `table` as a LaTeX string. The first column is left-aligned and
/// the rest centred. Every cell, caption and header is escaped; the label
/// is written verbatim.
pub fn latex_table(table: &LatexTable) -> String {
    let n_cols = table.headers.len().max(1);
    let spec = format!("l{}", "c".repeat(n_cols - 1));

    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = writeln!(out, r"\begin{{table}}[htbp]");
    let _ = writeln!(out, r"\centering");
    let _ = writeln!(out, r"\caption{{{}}}", escape_latex(&table.caption));
    let _ = writeln!(out, r"\label{{{}}}", table.label);
    let _ = writeln!(out, r"\begin{{tabular}}{{{spec}}}");
    let _ = writeln!(out, r"\hline");
    let header: Vec<String> = table.headers.iter().map(|h| escape_latex(h)).collect();
    let _ = writeln!(out, r"{} \\", header.join(" & "));
    let _ = writeln!(out, r"\hline");
    for row in &table.rows {
        let cells: Vec<String> = row.iter().map(|c| escape_latex(c)).collect();
        let _ = writeln!(out, r"{} \\", cells.join(" & "));
    }
    let _ = writeln!(out, r"\hline");
    let _ = writeln!(out, r"\end{{tabular}}");
    let _ = writeln!(out, r"\end{{table}}");
    out
}
