use std::fs;

use healthhub::{CatalogError, CatalogLoadError, LessonCatalog, StepCursor};

const MANIFEST: &str = r#"{ "roots": [
    { "label": "Outdoors", "slug": "outdoors", "children": [
        { "label": "Bugs", "slug": "bugs", "file": "stings.json" }
    ] },
    { "label": "Home", "slug": "home", "file": "splinters.json" }
] }"#;

const STINGS: &str = r##"{ "lessons": [ {
    "id": "stings",
    "title": "Bee Stings",
    "color": "#facc15",
    "steps": [
        { "text": "Move away from the bees.", "audio": "Move away from the bees.", "image": "assets/bees.png" },
        { "text": "Scrape the stinger out.", "audio": "Scrape the stinger out.", "image": "assets/stinger.png" }
    ],
    "warnings": ["Get help fast if breathing is hard."]
} ] }"##;

const SPLINTERS: &str = r##"{ "lessons": [ {
    "id": "splinters",
    "title": "Splinters",
    "color": "#a3e635",
    "video_id": "abc123",
    "steps": [
        { "text": "Wash the skin.", "audio": "Wash the skin.", "image": "assets/wash.png" }
    ]
} ] }"##;

#[test]
fn builtin_catalog_feeds_the_dashboard() {
    let catalog = LessonCatalog::builtin();
    let stats = catalog.stats();

    assert_eq!(stats.lessons, 5);
    assert_eq!(stats.steps, 20);
    assert_eq!(stats.with_video, 3);

    let nosebleed = catalog.find("nosebleed").expect("nosebleed lesson exists");
    let mut cursor = StepCursor::new(nosebleed);
    while cursor.next() {}
    assert_eq!(
        cursor.current(nosebleed).map(|step| step.text.as_str()),
        Some("Hold for 10 minutes.")
    );
}

#[test]
fn manifest_names_the_lesson_files() {
    let dir = tempfile::tempdir().expect("temporary directory should be created");
    fs::write(dir.path().join("stings.json"), STINGS).expect("lesson file should be written");
    fs::write(dir.path().join("splinters.json"), SPLINTERS).expect("lesson file should be written");
    fs::write(dir.path().join("index.json"), MANIFEST).expect("manifest should be written");

    let catalog = LessonCatalog::from_manifest_file(dir.path().join("index.json"))
        .expect("catalog should load");

    let stats = catalog.stats();
    assert_eq!(stats.lessons, 2);
    assert_eq!(stats.steps, 3);
    assert_eq!(stats.with_video, 1);
    let topics: Vec<String> = catalog
        .entries()
        .iter()
        .map(|entry| entry.category_path())
        .collect();
    assert_eq!(topics, ["Outdoors / Bugs", "Home"]);
    assert_eq!(
        catalog.find("stings").map(|lesson| lesson.title.as_str()),
        Ok("Bee Stings")
    );
}

#[test]
fn missing_lesson_file_names_the_path() {
    let dir = tempfile::tempdir().expect("temporary directory should be created");
    fs::write(dir.path().join("stings.json"), STINGS).expect("lesson file should be written");
    fs::write(dir.path().join("index.json"), MANIFEST).expect("manifest should be written");

    let error = LessonCatalog::from_manifest_file(dir.path().join("index.json"))
        .expect_err("splinters.json is missing");
    match error {
        CatalogLoadError::ReadError { path, .. } => assert!(path.ends_with("splinters.json")),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn duplicate_lesson_ids_are_rejected() {
    let dir = tempfile::tempdir().expect("temporary directory should be created");
    fs::write(dir.path().join("stings.json"), STINGS).expect("lesson file should be written");
    fs::write(dir.path().join("splinters.json"), STINGS).expect("lesson file should be written");
    fs::write(dir.path().join("index.json"), MANIFEST).expect("manifest should be written");

    assert_eq!(
        LessonCatalog::from_manifest_file(dir.path().join("index.json")),
        Err(CatalogLoadError::DuplicateId {
            id: "stings".to_string()
        })
    );
}

#[test]
fn lookup_errors_surface() {
    let catalog = LessonCatalog::builtin();

    assert_eq!(
        catalog.find("snakebite"),
        Err(CatalogError::LessonNotFound {
            id: "snakebite".to_string()
        })
    );
    assert_eq!(
        catalog.find(""),
        Err(CatalogError::LessonNotFound { id: String::new() })
    );
}
