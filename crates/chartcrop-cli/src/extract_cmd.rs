use std::path::Path;

use chartcrop::{
    ChartExtractor, DocumentSource, ExtractOptions, ExtractionReport, ExtractorConfig,
};

use crate::cli::{DocumentArgs, OutputFormat};
use crate::shared::{
    ProgressReporter, label_patterns, load_pdfium, open_document, require_file, resolve_pages,
};

/// Settings of the `extract` subcommand beyond the document arguments.
pub struct ExtractArgs<'a> {
    pub output: &'a Path,
    pub pages_dir: Option<&'a Path>,
    pub zoom: f32,
    pub margin: f64,
    pub discard_page_images: bool,
    pub format: &'a OutputFormat,
}

pub fn run(doc: &DocumentArgs, args: &ExtractArgs<'_>) -> Result<(), i32> {
    if !args.zoom.is_finite() || args.zoom <= 0.0 {
        eprintln!("Error: --zoom must be a positive number, got {}", args.zoom);
        return Err(1);
    }
    if !args.margin.is_finite() || args.margin < 0.0 {
        eprintln!("Error: --margin must not be negative, got {}", args.margin);
        return Err(1);
    }
    let patterns = label_patterns(doc)?;
    require_file(&doc.file)?;

    let pdfium = load_pdfium()?;
    let source = open_document(&pdfium, &doc.file, doc.password.as_deref())?;
    let pages = resolve_pages(doc.pages.as_deref(), source.page_count())?;

    let config = ExtractorConfig {
        output_dir: args.output.to_path_buf(),
        pages_dir: args.pages_dir.map(Path::to_path_buf),
        pages,
        options: ExtractOptions {
            zoom: args.zoom,
            margin: args.margin,
            patterns,
            keep_page_images: !args.discard_page_images,
        },
    };

    let extractor = ChartExtractor::new(source, config);
    let mut progress = ProgressReporter::new("Rendering");
    let result = extractor.run_with_progress(|done, total| progress.update(done, total));
    progress.finish();

    let report = result.map_err(|e| {
        eprintln!("Error: {e}");
        1
    })?;

    for warning in &report.warnings {
        eprintln!("Warning: {warning}");
    }

    match args.format {
        OutputFormat::Text => print_text(&report),
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&report).map_err(|e| {
                eprintln!("Error: failed to serialize report: {e}");
                1
            })?;
            println!("{json}");
        }
    }

    Ok(())
}

fn print_text(report: &ExtractionReport) {
    for path in &report.crops {
        if report.stitched.contains(path) {
            println!("{} (stitched)", path.display());
        } else {
            println!("{}", path.display());
        }
    }
    println!(
        "--- {} chart(s) from {} page(s), {} stitched, {} warning(s) ---",
        report.crops.len(),
        report.pages_scanned,
        report.stitched.len(),
        report.warnings.len()
    );
}

