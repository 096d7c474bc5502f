use std::collections::HashSet;
use std::fs;
use std::path::Path;

use tracing::debug;

use crate::catalog_manifest::{CatalogLeaf, CatalogManifest};
use crate::lessons::{Lesson, builtin_lessons};

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CatalogEntry {
    pub lesson: Lesson,
    /// Topic folders the lesson was filed under; empty for top-level lessons.
    pub categories: Vec<String>,
}

impl CatalogEntry {
    pub fn category_path(&self) -> String {
        self.categories.join(" / ")
    }
}

/// Totals shown on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogStats {
    pub lessons: usize,
    pub steps: usize,
    pub with_video: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LessonCatalog {
    entries: Vec<CatalogEntry>,
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogLoadError {
    #[error("failed to read lesson file at {path}: {source}")]
    ReadError {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse lesson file at {path}: {source}")]
    ParseError {
        path: String,
        source: serde_json::Error,
    },
    #[error("lesson id {id} appears more than once")]
    DuplicateId { id: String },
}

impl PartialEq for CatalogLoadError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::ReadError { path: left, .. }, Self::ReadError { path: right, .. }) => {
                left == right
            }
            (Self::ParseError { path: left, .. }, Self::ParseError { path: right, .. }) => {
                left == right
            }
            (Self::DuplicateId { id: left }, Self::DuplicateId { id: right }) => left == right,
            _ => false,
        }
    }
}

impl Eq for CatalogLoadError {}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("no lesson with id {id}")]
    LessonNotFound { id: String },
}

impl Default for LessonCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl LessonCatalog {
    pub fn new(entries: Vec<CatalogEntry>) -> Result<Self, CatalogLoadError> {
        let mut seen = HashSet::new();
        for entry in &entries {
            if !seen.insert(entry.lesson.id.as_str()) {
                return Err(CatalogLoadError::DuplicateId {
                    id: entry.lesson.id.clone(),
                });
            }
        }

        Ok(Self { entries })
    }

    /// The lessons bundled with the application, all at the top level.
    pub fn builtin() -> Self {
        Self {
            entries: builtin_lessons()
                .into_iter()
                .map(|lesson| CatalogEntry {
                    lesson,
                    categories: Vec::new(),
                })
                .collect(),
        }
    }

    /// Builds a catalog from lesson lists paired with the manifest leaf
    /// that named them.
    pub fn from_lists(
        lists: impl IntoIterator<Item = (CatalogLeaf, LessonList)>,
    ) -> Result<Self, CatalogLoadError> {
        let entries = lists
            .into_iter()
            .flat_map(|(leaf, list)| {
                list.lessons.into_iter().map(move |lesson| CatalogEntry {
                    lesson,
                    categories: leaf.path.clone(),
                })
            })
            .collect();

        Self::new(entries)
    }

    /// Loads the lesson files named by a manifest, resolved next to it.
    pub fn from_manifest_file(path: impl AsRef<Path>) -> Result<Self, CatalogLoadError> {
        let path = path.as_ref();
        let manifest: CatalogManifest = read_json(path)?;
        let base = path.parent().unwrap_or_else(|| Path::new("."));

        let mut lists = Vec::new();
        for leaf in manifest.leaves() {
            let file = base.join(&leaf.file);
            let list: LessonList = read_json(&file)?;
            debug!(path = %file.display(), count = list.lessons.len(), "lesson file loaded");
            lists.push((leaf, list));
        }

        Self::from_lists(lists)
    }

    pub fn lessons(&self) -> impl Iterator<Item = &Lesson> {
        self.entries.iter().map(|entry| &entry.lesson)
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn find(&self, id: &str) -> Result<&Lesson, CatalogError> {
        self.lessons()
            .find(|lesson| lesson.id == id)
            .ok_or_else(|| CatalogError::LessonNotFound { id: id.to_string() })
    }

    pub fn stats(&self) -> CatalogStats {
        CatalogStats {
            lessons: self.entries.len(),
            steps: self.lessons().map(|lesson| lesson.steps.len()).sum(),
            with_video: self
                .lessons()
                .filter(|lesson| lesson.video_id.is_some())
                .count(),
        }
    }
}

/// On-disk shape of a lesson file.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct LessonList {
    pub lessons: Vec<Lesson>,
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, CatalogLoadError> {
    let data = fs::read(path).map_err(|source| CatalogLoadError::ReadError {
        path: path.display().to_string(),
        source,
    })?;

    serde_json::from_slice(&data).map_err(|source| CatalogLoadError::ParseError {
        path: path.display().to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lessons::LessonStep;
    use std::path::PathBuf;

    fn lesson(id: &str, video: Option<&str>) -> Lesson {
        Lesson {
            id: id.to_string(),
            title: id.to_uppercase(),
            color: "#000000".to_string(),
            cover: None,
            video_id: video.map(str::to_string),
            steps: vec![LessonStep {
                text: "Stay calm.".to_string(),
                audio: "Stay calm.".to_string(),
                image: "assets/calm.png".to_string(),
            }],
            warnings: Vec::new(),
        }
    }

    fn write_lesson_list(path: impl Into<PathBuf>, lessons: Vec<Lesson>) {
        let payload = LessonList { lessons };
        let serialized =
            serde_json::to_string(&payload).expect("lesson list should serialize to JSON");
        fs::write(path.into(), serialized).expect("lesson list should be written");
    }

    #[test]
    fn builtin_catalog_stats_match_dashboard() {
        let stats = LessonCatalog::builtin().stats();
        assert_eq!(
            stats,
            CatalogStats {
                lessons: 5,
                steps: 20,
                with_video: 3
            }
        );
    }

    #[test]
    fn finds_lesson_by_id() {
        let catalog = LessonCatalog::builtin();
        assert_eq!(
            catalog.find("burns").map(|lesson| lesson.title.as_str()),
            Ok("Burns")
        );
        assert_eq!(
            catalog.find("snakebite"),
            Err(CatalogError::LessonNotFound {
                id: "snakebite".to_string()
            })
        );
    }

    #[test]
    fn rejects_duplicate_ids() {
        let entries = vec![
            CatalogEntry {
                lesson: lesson("burns", None),
                categories: Vec::new(),
            },
            CatalogEntry {
                lesson: lesson("burns", None),
                categories: vec!["Injuries".to_string()],
            },
        ];

        assert_eq!(
            LessonCatalog::new(entries),
            Err(CatalogLoadError::DuplicateId {
                id: "burns".to_string()
            })
        );
    }

    #[test]
    fn parse_errors_carry_the_file_path() {
        let root = tempfile::tempdir().expect("temporary directory should be created");
        let path = root.path().join("broken.json");
        fs::write(&path, "{").expect("broken file should be written");
        fs::write(
            root.path().join("index.json"),
            r#"{ "roots": [ { "label": "Broken", "slug": "broken", "file": "broken.json" } ] }"#,
        )
        .expect("manifest should be written");

        let error = LessonCatalog::from_manifest_file(root.path().join("index.json"))
            .expect_err("broken file");
        assert_eq!(
            error,
            CatalogLoadError::ParseError {
                path: path.display().to_string(),
                source: serde_json::from_str::<LessonList>("{").unwrap_err(),
            }
        );
    }

    #[test]
    fn lists_take_the_topic_of_their_leaf() {
        let leaf = CatalogLeaf {
            path: vec!["Outdoors".to_string(), "Bugs".to_string()],
            file: "bugs.json".to_string(),
        };
        let list = LessonList {
            lessons: vec![lesson("stings", None), lesson("ticks", Some("xyz"))],
        };

        let catalog = LessonCatalog::from_lists([(leaf, list)]).expect("catalog should build");

        assert_eq!(catalog.stats().lessons, 2);
        assert!(
            catalog
                .entries()
                .iter()
                .all(|entry| entry.category_path() == "Outdoors / Bugs")
        );
    }

    #[test]
    fn loads_lessons_listed_in_manifest() {
        let root = tempfile::tempdir().expect("temporary directory should be created");
        fs::create_dir_all(root.path().join("lessons")).expect("lesson folder");
        write_lesson_list(
            root.path().join("lessons").join("burns.json"),
            vec![lesson("burns", Some("VS4ezqDKS8Y"))],
        );
        fs::write(
            root.path().join("index.json"),
            r#"{ "roots": [ { "label": "Injuries", "slug": "injuries", "children": [
                { "label": "Burns", "slug": "burns", "file": "lessons/burns.json" }
            ] } ] }"#,
        )
        .expect("manifest should be written");

        let catalog = LessonCatalog::from_manifest_file(root.path().join("index.json"))
            .expect("catalog should load");

        assert_eq!(
            catalog.entries()[0].category_path(),
            "Injuries / Burns".to_string()
        );
        assert_eq!(catalog.stats().with_video, 1);
    }
}
