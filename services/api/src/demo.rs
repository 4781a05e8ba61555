use crate::infra::MemoryMediaStore;
use crate::seed;
use clap::Args;
use sheaf::catalog::{CatalogService, InMemoryCatalog, SearchQuery, WorksheetQuery};
use sheaf::error::AppError;
use sheaf::previews::PreviewGenerator;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Optional search term to run against the demo catalog
    #[arg(long)]
    pub(crate) search: Option<String>,
}

#[derive(Args, Debug)]
pub(crate) struct PreviewArgs {
    /// Path to the PDF to derive previews from
    #[arg(long)]
    pub(crate) pdf: PathBuf,
    /// Directory for the derived images (defaults to the PDF's directory)
    #[arg(long)]
    pub(crate) out_dir: Option<PathBuf>,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs { search } = args;

    let service = CatalogService::new(
        Arc::new(InMemoryCatalog::new()),
        Arc::new(MemoryMediaStore::default()),
        Arc::new(PreviewGenerator::disabled()),
    );
    seed::populate(&service)?;

    println!("Worksheet catalog demo");

    println!("\nCategory tree");
    for root in service.category_tree()? {
        println!(
            "- {} ({} worksheets)",
            root.category.name, root.category.worksheets_count
        );
        for child in &root.children {
            println!("  - {} ({} worksheets)", child.name, child.worksheets_count);
        }
    }

    println!("\nPopular tags");
    for tag in service.popular_tags()? {
        println!("- {} ({} worksheets)", tag.name, tag.usage_count);
    }

    println!("\nFeatured worksheets");
    for sheet in service.featured_worksheets()? {
        println!("- {} [{}]", sheet.title, sheet.category_path);
    }

    let page = service.list_worksheets(&WorksheetQuery::default(), "/api/worksheets/")?;
    println!(
        "\nCatalog page 1 of {} ({} published worksheets)",
        page.total_pages, page.count
    );
    for sheet in &page.results {
        println!(
            "- {} | {} | {} | {} views, {} downloads",
            sheet.title,
            sheet.grade_level.label(),
            sheet.difficulty.label(),
            sheet.views_count,
            sheet.downloads_count
        );
    }

    if let Some(term) = search {
        let query = SearchQuery {
            q: Some(term.clone()),
            ..SearchQuery::default()
        };
        let results = service.search_worksheets(&query, "/api/worksheets/search/")?;
        println!("\nSearch '{}' matched {} worksheets", term, results.count);
        for sheet in &results.results {
            println!("- {} ({})", sheet.title, sheet.slug);
        }
    }

    let detail = service.worksheet_detail("addition-up-to-10")?;
    match serde_json::to_string_pretty(&detail) {
        Ok(json) => println!("\nDetail payload for '{}':\n{}", detail.slug, json),
        Err(err) => println!("\nDetail payload unavailable: {}", err),
    }

    let download = service.download(detail.id)?;
    println!(
        "\nDownload: {} ({} bytes)",
        download.filename,
        download.bytes.len()
    );

    Ok(())
}

pub(crate) fn run_previews(args: PreviewArgs) -> Result<(), AppError> {
    let PreviewArgs { pdf, out_dir } = args;

    let bytes = std::fs::read(&pdf)?;
    let generator = PreviewGenerator::with_pdfium();
    let Some(set) = generator.derive(&bytes)? else {
        println!("pdfium is not available on this system; no previews derived");
        return Ok(());
    };

    let stem = pdf
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("worksheet");
    let out_dir = match out_dir {
        Some(dir) => dir,
        None => pdf
            .parent()
            .map(|dir| dir.to_path_buf())
            .unwrap_or_default(),
    };
    std::fs::create_dir_all(&out_dir)?;

    let thumbnail = out_dir.join(format!("{stem}_thumb.png"));
    let preview = out_dir.join(format!("{stem}_preview.png"));
    std::fs::write(&thumbnail, &set.thumbnail)?;
    std::fs::write(&preview, &set.preview)?;

    println!("Derived previews for {}", pdf.display());
    println!("- {} ({} bytes)", thumbnail.display(), set.thumbnail.len());
    println!("- {} ({} bytes)", preview.display(), set.preview.len());
    Ok(())
}
