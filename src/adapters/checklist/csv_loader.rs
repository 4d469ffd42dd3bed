//! CSV checklist source.
//!
//! Reads the pillar question asset and builds the immutable [`Catalog`].
//! Expected columns: `pillar_id,pillar_name,pillar_description,question`.
//! Question ids are assigned from row order (1-based), so the file's row
//! order is the canonical interview order. Pillars are declared by their
//! first row; later rows for the same pillar only add questions.

use std::path::Path;

use serde::Deserialize;

use crate::domain::checklist::{Catalog, CatalogError, ChecklistQuestion, Pillar};
use crate::domain::foundation::{PillarId, QuestionId};

#[derive(Debug, Deserialize)]
struct CsvRow {
    pillar_id: i32,
    pillar_name: String,
    #[serde(default)]
    pillar_description: String,
    question: String,
}

/// Loads the catalog from a CSV file.
///
/// # Errors
///
/// - `Source` for I/O or CSV parse failures
/// - the usual [`CatalogError`] variants for structural problems
pub fn load_catalog_from_csv(path: &Path) -> Result<Catalog, CatalogError> {
    let mut reader = csv::Reader::from_path(path)
        .map_err(|e| CatalogError::Source(format!("{}: {}", path.display(), e)))?;

    let mut pillars: Vec<Pillar> = Vec::new();
    let mut questions: Vec<ChecklistQuestion> = Vec::new();

    for (row_index, record) in reader.deserialize::<CsvRow>().enumerate() {
        let row = record
            .map_err(|e| CatalogError::Source(format!("row {}: {}", row_index + 2, e)))?;

        let pillar_id = PillarId::new(row.pillar_id);
        if !pillars.iter().any(|p| p.id == pillar_id) {
            pillars.push(Pillar {
                id: pillar_id,
                name: row.pillar_name.trim().to_string(),
                description: row.pillar_description.trim().to_string(),
            });
        }

        questions.push(ChecklistQuestion {
            id: QuestionId::new(row_index as u32 + 1),
            pillar_id,
            text: row.question.trim().to_string(),
        });
    }

    Catalog::new(pillars, questions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn loads_pillars_and_questions_in_row_order() {
        let file = write_csv(
            "pillar_id,pillar_name,pillar_description,question\n\
             1,Security,Auth and data protection,What authentication do you need?\n\
             1,Security,Auth and data protection,Do you handle regulated data?\n\
             2,Infrastructure,Hosting and scaling,Cloud or on-premises?\n",
        );

        let catalog = load_catalog_from_csv(file.path()).unwrap();
        assert_eq!(catalog.len(), 3);

        let names: Vec<&str> = catalog.pillar_order().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Security", "Infrastructure"]);

        let q2 = catalog.question(QuestionId::new(2)).unwrap();
        assert_eq!(q2.text, "Do you handle regulated data?");
        assert_eq!(q2.pillar_id, PillarId::new(1));
    }

    #[test]
    fn pillar_metadata_comes_from_first_row() {
        let file = write_csv(
            "pillar_id,pillar_name,pillar_description,question\n\
             1,Security,First description,Q one\n\
             1,Security,Later rows are ignored,Q two\n",
        );

        let catalog = load_catalog_from_csv(file.path()).unwrap();
        assert_eq!(
            catalog.pillar(PillarId::new(1)).unwrap().description,
            "First description"
        );
    }

    #[test]
    fn missing_file_is_a_source_error() {
        let result = load_catalog_from_csv(Path::new("/nonexistent/questions.csv"));
        assert!(matches!(result, Err(CatalogError::Source(_))));
    }

    #[test]
    fn malformed_row_is_a_source_error() {
        let file = write_csv(
            "pillar_id,pillar_name,pillar_description,question\n\
             not_a_number,Security,desc,Q one\n",
        );
        let result = load_catalog_from_csv(file.path());
        assert!(matches!(result, Err(CatalogError::Source(_))));
    }

    #[test]
    fn blank_question_text_is_rejected() {
        let file = write_csv(
            "pillar_id,pillar_name,pillar_description,question\n\
             1,Security,desc,   \n",
        );
        let result = load_catalog_from_csv(file.path());
        assert!(matches!(result, Err(CatalogError::EmptyQuestion(_))));
    }

    #[test]
    fn empty_file_is_rejected() {
        let file = write_csv("pillar_id,pillar_name,pillar_description,question\n");
        let result = load_catalog_from_csv(file.path());
        assert!(matches!(result, Err(CatalogError::Empty)));
    }
}
