use std::{fs::File, io::Read, path::Path};

use crate::{
    error::{AppError, AppResult},
    models::Assessment,
};

const NAME_COLUMN: &str = "Assessment Name";
const URL_COLUMN: &str = "URL";
const DESCRIPTION_COLUMN: &str = "Description";
const TEST_TYPE_COLUMN: &str = "Test Type";

/// Words that mark an assessment as personality/behavior (`P`)
const PERSONALITY_HINTS: &[&str] = &[
    "personality",
    "behaviour",
    "behavior",
    "collaboration",
    "teamwork",
    "leadership",
    "work style",
    "communication",
    "motivation",
    "judgement",
    "judgment",
    "resilience",
    "culture",
    "sjt",
];

/// Best-effort test type for catalogs without a `Test Type` column.
/// Anything not recognizably personality-oriented is knowledge & skills.
pub fn guess_test_type(name: &str, url: &str, description: &str) -> &'static str {
    let text = format!("{} {} {}", name, url, description).to_lowercase();
    if PERSONALITY_HINTS.iter().any(|hint| text.contains(hint)) {
        "P"
    } else {
        "K"
    }
}

/// The assessment catalog, loaded once at startup
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: Vec<Assessment>,
}

impl Catalog {
    pub fn new(entries: Vec<Assessment>) -> Self {
        Self { entries }
    }

    /// Loads the catalog from a CSV file
    pub fn load(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            return Err(AppError::Catalog(format!(
                "Catalog not found at {}",
                path.display()
            )));
        }

        let catalog = Self::from_reader(File::open(path)?)?;

        tracing::info!(
            path = %path.display(),
            entries = catalog.len(),
            "Loaded assessment catalog"
        );

        Ok(catalog)
    }

    /// Parses CSV with a required `Assessment Name` column.
    /// `URL`, `Description` and `Test Type` are optional; missing cells become empty strings.
    pub fn from_reader<R: Read>(reader: R) -> AppResult<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = csv_reader.headers()?.clone();
        let column = |name: &str| headers.iter().position(|h| h == name);

        let name_idx = column(NAME_COLUMN).ok_or_else(|| {
            AppError::Catalog(format!("Catalog must have '{}' column.", NAME_COLUMN))
        })?;
        let url_idx = column(URL_COLUMN);
        let description_idx = column(DESCRIPTION_COLUMN);
        let test_type_idx = column(TEST_TYPE_COLUMN);

        let mut entries = Vec::new();
        for record in csv_reader.records() {
            let record = record?;
            let cell = |idx: Option<usize>| {
                idx.and_then(|i| record.get(i))
                    .unwrap_or_default()
                    .to_string()
            };

            let name = cell(Some(name_idx));
            let url = cell(url_idx);
            let description = cell(description_idx);
            let test_type = match test_type_idx {
                Some(_) => cell(test_type_idx),
                None => guess_test_type(&name, &url, &description).to_string(),
            };

            entries.push(Assessment {
                name,
                url,
                description,
                test_type,
            });
        }

        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[Assessment] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<Assessment> {
        self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
