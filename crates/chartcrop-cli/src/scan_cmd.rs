use chartcrop::{ChartExtractor, DocumentSource, ExtractOptions, ExtractorConfig, PagePlan};

use crate::cli::{DocumentArgs, OutputFormat};
use crate::shared::{
    bbox_to_json, format_bbox, label_patterns, load_pdfium, open_document, require_file,
    resolve_pages,
};

pub fn run(doc: &DocumentArgs, format: &OutputFormat) -> Result<(), i32> {
    let patterns = label_patterns(doc)?;
    require_file(&doc.file)?;
    let pdfium = load_pdfium()?;
    let source = open_document(&pdfium, &doc.file, doc.password.as_deref())?;
    let pages = resolve_pages(doc.pages.as_deref(), source.page_count())?;

    // scanning never writes, the output directory is only a placeholder
    let mut config = ExtractorConfig::new(".");
    config.pages = pages;
    config.options = ExtractOptions {
        patterns,
        ..ExtractOptions::default()
    };

    let plans = ChartExtractor::new(source, config).scan().map_err(|e| {
        eprintln!("Error: {e}");
        1
    })?;

    match format {
        OutputFormat::Text => {
            for plan in &plans {
                print_plan(plan);
            }
        }
        OutputFormat::Json => {
            let pages: Vec<serde_json::Value> = plans.iter().map(plan_to_json).collect();
            let json = serde_json::to_string_pretty(&pages).map_err(|e| {
                eprintln!("Error: failed to serialize scan: {e}");
                1
            })?;
            println!("{json}");
        }
    }

    Ok(())
}

fn print_plan(plan: &PagePlan) {
    println!("--- Page {} ---", plan.page + 1);
    if plan.is_empty() {
        println!("(no charts)");
        return;
    }
    for level in &plan.levels {
        println!("Level {}:", level.index);
        for placement in plan.placements.iter().filter(|p| p.level == level.index) {
            let continued = if placement.label.is_continuation {
                " (continued)"
            } else {
                ""
            };
            println!(
                "  {}{continued} {}",
                placement.label.text,
                format_bbox(&placement.bbox)
            );
        }
    }
}

fn plan_to_json(plan: &PagePlan) -> serde_json::Value {
    let regions: Vec<serde_json::Value> = plan
        .regions
        .iter()
        .map(|r| {
            serde_json::json!({
                "caption": r.caption.label.text,
                "caption_bbox": bbox_to_json(&r.caption.bbox),
                "footnote_bbox": bbox_to_json(&r.footnote.bbox),
                "continued": r.caption.label.is_continuation,
            })
        })
        .collect();
    let levels: Vec<&[usize]> = plan.levels.iter().map(|l| l.members.as_slice()).collect();
    let placements: Vec<serde_json::Value> = plan
        .placements
        .iter()
        .map(|p| {
            serde_json::json!({
                "label": p.label.text,
                "continued": p.label.is_continuation,
                "bbox": bbox_to_json(&p.bbox),
                "level": p.level,
                "region": p.region,
            })
        })
        .collect();

    serde_json::json!({
        "page": plan.page + 1,
        "regions": regions,
        "levels": levels,
        "placements": placements,
    })
}
