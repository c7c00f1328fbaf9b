use std::path::Path;
use std::process::Command;

use anyhow::{Context, Result, bail};

/// Runs `pdftotext` and returns one string per page.
///
/// The default reading-order mode joins the words of a printed row with single
/// spaces, so both print columns of a row arrive as one joint line. Layout mode
/// pads the designator and category columns with long space runs, which the
/// column gap then cuts apart; it is only useful for PDFs set without table
/// alignment.
pub(super) fn extract_page_texts(
    pdf_path: &Path,
    max_pages: Option<usize>,
    layout: bool,
) -> Result<Vec<String>> {
    let mut command = Command::new("pdftotext");
    if layout {
        command.arg("-layout");
    }
    command
        .arg("-enc")
        .arg("UTF-8")
        .arg("-f")
        .arg("1");
    if let Some(max_pages) = max_pages {
        command.arg("-l").arg(max_pages.to_string());
    }
    command.arg(pdf_path).arg("-");

    let output = command
        .output()
        .with_context(|| format!("failed to execute pdftotext for {}", pdf_path.display()))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        bail!(
            "pdftotext returned non-zero exit status for {}: {}",
            pdf_path.display(),
            stderr.trim()
        );
    }

    Ok(split_pages(&String::from_utf8_lossy(&output.stdout)))
}

/// pdftotext separates pages with a form feed and usually ends with one.
pub(super) fn split_pages(raw: &str) -> Vec<String> {
    let mut pages: Vec<String> = raw
        .split('\u{000C}')
        .map(|chunk| chunk.replace('\u{0000}', ""))
        .collect();

    while pages.last().is_some_and(|page| page.trim().is_empty()) {
        pages.pop();
    }

    pages
}

pub(super) fn pdftotext_version() -> Result<String> {
    let output = Command::new("pdftotext")
        .arg("-v")
        .output()
        .context("failed to run pdftotext -v; is poppler-utils installed?")?;

    // poppler prints its version banner on stderr.
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    let source = if stdout.trim().is_empty() {
        stderr
    } else {
        stdout
    };

    Ok(source
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or("unknown")
        .to_string())
}
