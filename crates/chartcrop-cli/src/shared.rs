use std::io::{self, IsTerminal, Write};
use std::path::Path;

use chartcrop::{BBox, ChartError, LabelPatterns, Pdfium, PdfiumSource, bind_pdfium};

use crate::cli::DocumentArgs;
use crate::page_range::parse_page_range;

/// Bind the pdfium library, reporting a failure on stderr.
pub fn load_pdfium() -> Result<Pdfium, i32> {
    bind_pdfium().map_err(|e| {
        eprintln!("Error: failed to load pdfium: {e}");
        1
    })
}

/// Fail early, before pdfium is bound, when the input file is missing.
pub fn require_file(file: &Path) -> Result<(), i32> {
    if file.exists() {
        Ok(())
    } else {
        eprintln!("Error: file not found: {}", file.display());
        Err(1)
    }
}

/// Open a PDF file with user-friendly error messages.
///
/// Returns `Err(1)` with a message printed to stderr if the file needs a
/// (different) password, forbids extraction, or cannot be parsed.
pub fn open_document<'a>(
    pdfium: &'a Pdfium,
    file: &Path,
    password: Option<&'a str>,
) -> Result<PdfiumSource<'a>, i32> {
    PdfiumSource::open(pdfium, file, password).map_err(|e| {
        match ChartError::from(e) {
            ChartError::PasswordRequired => {
                eprintln!("Error: {} is encrypted; pass --password", file.display());
            }
            ChartError::InvalidPassword => {
                eprintln!("Error: incorrect password for {}", file.display());
            }
            ChartError::ExtractionNotAllowed => {
                eprintln!(
                    "Error: {} does not permit content extraction",
                    file.display()
                );
            }
            other => eprintln!("Error: failed to open PDF: {other}"),
        }
        1
    })
}

/// Compile the caption and source patterns given on the command line.
pub fn label_patterns(doc: &DocumentArgs) -> Result<LabelPatterns, i32> {
    LabelPatterns::new(&doc.caption_pattern, &doc.source_pattern).map_err(|e| {
        eprintln!("Error: {e}");
        1
    })
}

/// Resolve an optional page range string into 0-indexed page indices.
///
/// `None` means every page and is passed through unchanged so the
/// extractor can walk the whole document.
pub fn resolve_pages(pages: Option<&str>, page_count: usize) -> Result<Option<Vec<usize>>, i32> {
    pages
        .map(|range| {
            parse_page_range(range, page_count).map_err(|e| {
                eprintln!("Error: {e}");
                1
            })
        })
        .transpose()
}

pub fn format_bbox(b: &BBox) -> String {
    format!("[{:.2}, {:.2}, {:.2}, {:.2}]", b.x0, b.y0, b.x1, b.y1)
}

pub fn bbox_to_json(b: &BBox) -> serde_json::Value {
    serde_json::json!([b.x0, b.y0, b.x1, b.y1])
}

/// Progress line on stderr, drawn only when stderr is a terminal.
///
/// Fed directly from [`ChartExtractor::run_with_progress`](chartcrop::ChartExtractor::run_with_progress),
/// which reports `(done, total)` before each page and once more at the end.
pub struct ProgressReporter {
    verb: &'static str,
    is_tty: bool,
    drawn: usize,
}

impl ProgressReporter {
    pub fn new(verb: &'static str) -> Self {
        Self {
            verb,
            is_tty: io::stderr().is_terminal(),
            drawn: 0,
        }
    }

    pub fn update(&mut self, done: usize, total: usize) {
        if !self.is_tty {
            return;
        }
        if let Some(line) = progress_line(self.verb, done, total) {
            eprint!("\r{line}");
            let _ = io::stderr().flush();
            self.drawn = self.drawn.max(line.chars().count());
        }
    }

    /// Blank out whatever was drawn.
    pub fn finish(&mut self) {
        if self.drawn > 0 {
            eprint!("\r{}\r", " ".repeat(self.drawn));
            let _ = io::stderr().flush();
            self.drawn = 0;
        }
    }
}

/// "Rendering page 3/12..." for the page about to be processed; `None` once
/// every page is done.
fn progress_line(verb: &str, done: usize, total: usize) -> Option<String> {
    (done < total).then(|| format!("{verb} page {}/{total}...", done + 1))
}
