use std::fs;
use std::path::{Path, PathBuf};

use tempfile::tempdir;

use super::*;
use crate::catalog::tags;
use crate::types::{Direction, GridVec};

const SAMPLE_TOML: &str = r#"
[[tiles]]
id = "start"
size = [4, 1, 4]
tags = ["Start"]
connectors = [{ direction = "North", type = "Hall", local_position = [2, 0, 0] }]

[[tiles]]
id = "corridor"
size = [2, 1, 4]
tags = ["Corridor"]
connectors = [
    { direction = "North", type = "Hall", local_position = [1, 0, 0] },
    { direction = "South", type = "Hall", local_position = [1, 0, 4] },
]

[[tiles]]
id = "end"
size = [4, 1, 4]
tags = ["End"]
connectors = [{ direction = "South", type = "Hall", local_position = [2, 0, 4] }]
"#;

fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn toml_catalog_loads_templates_in_file_order() {
    let dir = tempdir().unwrap();
    let path = write_file(dir.path(), "tiles.toml", SAMPLE_TOML);

    let catalog = load_catalog_from_file(&path).unwrap();
    let ids: Vec<&str> = catalog.iter().map(|template| template.id.as_str()).collect();
    assert_eq!(ids, ["start", "corridor", "end"]);

    let corridor = catalog.get("corridor").unwrap();
    assert!(corridor.has_tag(tags::CORRIDOR));
    assert_eq!(corridor.size, GridVec::new(2, 1, 4));
    assert_eq!(corridor.connectors[1].direction, Direction::South);
    assert_eq!(corridor.connectors[1].connector_type, "Hall");
    assert_eq!(corridor.connectors[1].local_position, GridVec::new(1, 0, 4));
}

#[test]
fn json_catalog_matches_toml_catalog() {
    let from_toml = parse_catalog(SAMPLE_TOML, CatalogFormat::Toml).unwrap();
    let json = catalog_to_string(&from_toml, CatalogFormat::Json).unwrap();

    let dir = tempdir().unwrap();
    let path = write_file(dir.path(), "tiles.JSON", &json);
    let from_json = load_catalog_from_file(&path).unwrap();

    assert_eq!(from_json, from_toml);
    assert_eq!(from_json.content_hash(), from_toml.content_hash());
}

#[test]
fn starter_catalog_survives_toml_serialization() {
    let starter = TileCatalog::starter();
    let text = catalog_to_string(&starter, CatalogFormat::Toml).unwrap();
    let parsed = parse_catalog(&text, CatalogFormat::Toml).unwrap();
    assert_eq!(parsed, starter);
}

#[test]
fn unknown_extension_is_rejected_before_reading() {
    let err = load_catalog_from_file(Path::new("/nowhere/tiles.yaml"))
        .expect_err("yaml is not supported");
    assert!(matches!(err, CatalogLoadError::UnsupportedFormat { .. }));
}

#[test]
fn missing_file_reports_io_error_with_path() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("absent.toml");
    let err = load_catalog_from_file(&path).expect_err("missing file should fail");
    assert!(matches!(err, CatalogLoadError::Io { .. }));
    assert!(err.to_string().contains("absent.toml"), "{err}");
}

#[test]
fn malformed_direction_is_a_parse_error() {
    let source = SAMPLE_TOML.replace("\"North\"", "\"Up\"");
    let err = parse_catalog(&source, CatalogFormat::Toml).expect_err("Up is not a direction");
    assert!(matches!(err, CatalogLoadError::Parse(_)));
}

#[test]
fn invalid_templates_surface_catalog_errors() {
    let source = SAMPLE_TOML.replace("id = \"end\"", "id = \"start\"");
    let err = parse_catalog(&source, CatalogFormat::Toml).expect_err("duplicate id");
    assert!(matches!(err, CatalogLoadError::Invalid(CatalogError::DuplicateId { .. })));
}

#[test]
fn empty_file_yields_empty_catalog() {
    let catalog = parse_catalog("", CatalogFormat::Toml).unwrap();
    assert!(catalog.is_empty());
}
