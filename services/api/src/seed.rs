//! Demo catalog used by `serve --demo-data` and the demo command: a small
//! category tree, a handful of tags, and enough worksheets to light up every
//! public endpoint.

use sheaf::catalog::{
    CatalogError, CatalogRepository, CatalogService, CategoryDraft, CategoryId, Difficulty,
    GradeLevel, TagDraft, WorksheetDraft, WorksheetFlags, WorksheetId,
};
use sheaf::media::MediaStore;

const SAMPLE_PDF: &[u8] = b"%PDF-1.4\n1 0 obj\n<< /Type /Catalog /Pages 2 0 R >>\nendobj\n2 0 obj\n<< /Type /Pages /Kids [3 0 R] /Count 1 >>\nendobj\n3 0 obj\n<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] >>\nendobj\ntrailer\n<< /Root 1 0 R >>\n%%EOF\n";

pub(crate) fn populate<R, M>(service: &CatalogService<R, M>) -> Result<(), CatalogError>
where
    R: CatalogRepository + 'static,
    M: MediaStore + 'static,
{
    let mathematics = category(
        service,
        "Mathematics",
        "Number sense, arithmetic, and early problem solving.",
        None,
        1,
    )?;
    let addition = category(
        service,
        "Addition",
        "Sums and counting-on practice.",
        Some(mathematics),
        1,
    )?;
    let subtraction = category(
        service,
        "Subtraction",
        "Taking away and comparing quantities.",
        Some(mathematics),
        2,
    )?;
    let literacy = category(
        service,
        "Literacy",
        "Letters, phonics, and early reading.",
        None,
        2,
    )?;
    let letters = category(
        service,
        "Letter Tracing",
        "Uppercase and lowercase letter practice.",
        Some(literacy),
        1,
    )?;
    let coloring = category(
        service,
        "Coloring",
        "Color-by-number and free coloring pages.",
        None,
        3,
    )?;
    service.create_category(CategoryDraft {
        name: "Archive".to_string(),
        description: "Retired worksheets kept for reference.".to_string(),
        order: 9,
        is_active: false,
        ..CategoryDraft::default()
    })?;

    for (name, description) in [
        ("Counting", "Worksheets built around counting objects."),
        ("Addition Facts", "Fact fluency within 20."),
        ("Number Bonds", "Part-part-whole practice."),
        ("Alphabet", "Letter recognition and formation."),
        ("Phonics", "Letter sounds and blends."),
        ("Animals", "Animal-themed activities."),
        ("Shapes", "Shape recognition and drawing."),
        ("Fine Motor", "Pencil control and tracing."),
    ] {
        service.create_tag(TagDraft {
            name: name.to_string(),
            description: description.to_string(),
            ..TagDraft::default()
        })?;
    }

    let addition_up_to_ten = worksheet(
        service,
        "Addition up to 10",
        "Picture sums that stay within ten, sized for early counters.",
        addition,
        GradeLevel::Kindergarten,
        Difficulty::Easy,
        &["counting", "addition-facts"],
    )?;
    let addition_with_pictures = worksheet(
        service,
        "Addition with Pictures",
        "Count the animals in each box and write the total.",
        addition,
        GradeLevel::Preschool,
        Difficulty::Easy,
        &["counting", "addition-facts", "animals"],
    )?;
    worksheet(
        service,
        "Two-Digit Addition",
        "Column addition with and without regrouping.",
        addition,
        GradeLevel::Grade2,
        Difficulty::Medium,
        &["addition-facts"],
    )?;
    let subtraction_within_twenty = worksheet(
        service,
        "Subtraction within 20",
        "Cross out and count back to find each difference.",
        subtraction,
        GradeLevel::Grade1,
        Difficulty::Medium,
        &["counting", "number-bonds"],
    )?;
    worksheet(
        service,
        "Missing Number Bonds",
        "Fill the empty part of each bond to make the whole.",
        subtraction,
        GradeLevel::Grade1,
        Difficulty::Hard,
        &["number-bonds"],
    )?;
    let trace_the_alphabet = worksheet(
        service,
        "Trace the Alphabet",
        "Dotted uppercase and lowercase letters from A to Z.",
        letters,
        GradeLevel::Preschool,
        Difficulty::Easy,
        &["alphabet", "fine-motor"],
    )?;
    worksheet(
        service,
        "Beginning Sounds",
        "Match each picture to the letter it starts with.",
        letters,
        GradeLevel::Kindergarten,
        Difficulty::Medium,
        &["alphabet", "phonics"],
    )?;
    let farm_animal_coloring = worksheet(
        service,
        "Farm Animal Coloring",
        "Six farm friends with thick outlines for small hands.",
        coloring,
        GradeLevel::Preschool,
        Difficulty::Easy,
        &["animals"],
    )?;
    worksheet(
        service,
        "Color by Shape",
        "A picture hidden behind circles, squares, and triangles.",
        coloring,
        GradeLevel::Kindergarten,
        Difficulty::Easy,
        &["shapes", "fine-motor"],
    )?;
    service.create_worksheet(WorksheetDraft {
        title: "Winter Number Maze".to_string(),
        slug: None,
        description: "Follow the numbers in order to reach the snowman.".to_string(),
        category: mathematics,
        tags: vec!["counting".to_string()],
        grade_level: GradeLevel::Grade1,
        difficulty: Difficulty::Medium,
        meta_title: String::new(),
        meta_description: String::new(),
        is_featured: false,
        is_published: false,
    })?;

    for id in [addition_up_to_ten, trace_the_alphabet, farm_animal_coloring] {
        service.set_worksheet_flags(
            id,
            WorksheetFlags {
                is_featured: Some(true),
                ..WorksheetFlags::default()
            },
        )?;
    }

    for id in [
        addition_up_to_ten,
        addition_with_pictures,
        subtraction_within_twenty,
        trace_the_alphabet,
    ] {
        service.upload_worksheet_pdf(id, SAMPLE_PDF)?;
    }

    // A little engagement so the ordering and stats endpoints have spread.
    service.worksheet_detail("addition-up-to-10")?;
    service.worksheet_detail("addition-up-to-10")?;
    service.worksheet_detail("farm-animal-coloring")?;
    service.download(addition_up_to_ten)?;

    Ok(())
}

fn category<R, M>(
    service: &CatalogService<R, M>,
    name: &str,
    description: &str,
    parent: Option<CategoryId>,
    order: u32,
) -> Result<CategoryId, CatalogError>
where
    R: CatalogRepository + 'static,
    M: MediaStore + 'static,
{
    let view = service.create_category(CategoryDraft {
        name: name.to_string(),
        parent,
        description: description.to_string(),
        order,
        ..CategoryDraft::default()
    })?;
    Ok(view.id)
}

fn worksheet<R, M>(
    service: &CatalogService<R, M>,
    title: &str,
    description: &str,
    category: CategoryId,
    grade_level: GradeLevel,
    difficulty: Difficulty,
    tags: &[&str],
) -> Result<WorksheetId, CatalogError>
where
    R: CatalogRepository + 'static,
    M: MediaStore + 'static,
{
    let view = service.create_worksheet(WorksheetDraft {
        title: title.to_string(),
        slug: None,
        description: description.to_string(),
        category,
        tags: tags.iter().map(|slug| slug.to_string()).collect(),
        grade_level,
        difficulty,
        meta_title: format!("{title} | Printable Worksheet"),
        meta_description: description.to_string(),
        is_featured: false,
        is_published: true,
    })?;
    Ok(view.id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::MemoryMediaStore;
    use sheaf::catalog::{InMemoryCatalog, WorksheetQuery};
    use sheaf::previews::PreviewGenerator;
    use std::sync::Arc;

    fn seeded_service() -> CatalogService<InMemoryCatalog, MemoryMediaStore> {
        let service = CatalogService::new(
            Arc::new(InMemoryCatalog::new()),
            Arc::new(MemoryMediaStore::default()),
            Arc::new(PreviewGenerator::disabled()),
        );
        populate(&service).expect("demo data loads");
        service
    }

    #[test]
    fn demo_tree_hides_the_archived_root() {
        let service = seeded_service();
        let tree = service.category_tree().expect("tree builds");

        let slugs: Vec<&str> = tree.iter().map(|root| root.category.slug.as_str()).collect();
        assert_eq!(slugs, ["mathematics", "literacy", "coloring"]);
        assert_eq!(tree[0].category.worksheets_count, 5);
        assert_eq!(tree[0].children.len(), 2);
    }

    #[test]
    fn demo_listings_serve_only_published_worksheets() {
        let service = seeded_service();
        let page = service
            .list_worksheets(&WorksheetQuery::default(), "/api/worksheets/")
            .expect("page builds");
        assert_eq!(page.count, 9);

        let featured = service.featured_worksheets().expect("featured builds");
        assert_eq!(featured.len(), 3);
    }

    #[test]
    fn demo_tags_rank_by_usage() {
        let service = seeded_service();
        let popular = service.popular_tags().expect("tags build");

        assert_eq!(popular[0].slug, "addition-facts");
        assert_eq!(popular[0].usage_count, 3);
        assert_eq!(popular[1].slug, "counting");
    }

    #[test]
    fn demo_engagement_counts_are_preloaded() {
        let service = seeded_service();
        let detail = service
            .worksheet_detail("addition-up-to-10")
            .expect("detail reads");

        assert_eq!(detail.views_count, 3);
        assert_eq!(detail.downloads_count, 1);
        assert!(detail.pdf_file.is_some());
    }
}
