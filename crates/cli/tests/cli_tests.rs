use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn project() -> TempDir {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join(".yo-rc.json"),
        r#"{ "generator-jhipster": { "baseName": "shop", "entities": ["Product", "Category"] } }"#,
    )
    .unwrap();
    let entities = dir.path().join(".jhipster");
    std::fs::create_dir_all(&entities).unwrap();
    std::fs::write(
        entities.join("Product.json"),
        r#"{
            "name": "Product",
            "fields": [{ "fieldName": "price", "fieldType": "BigDecimal" }],
            "relationships": [
                { "relationshipType": "many-to-one", "otherEntityName": "Category", "otherEntityRelationshipName": "products" }
            ]
        }"#,
    )
    .unwrap();
    std::fs::write(
        entities.join("Category.json"),
        r#"{ "name": "Category", "fields": [{ "fieldName": "label", "fieldType": "String" }], "relationships": [] }"#,
    )
    .unwrap();
    dir
}

fn entigen() -> Command {
    let mut cmd = Command::cargo_bin("entigen").unwrap();
    cmd.env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_generate_then_check() {
    let dir = project();

    entigen()
        .args(["generate", "--path"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Product.json"))
        .stdout(predicate::str::contains(
            "2 entities: 0 created, 0 updated, 2 unchanged",
        ));

    entigen()
        .args(["generate", "--check", "--path"])
        .arg(dir.path())
        .assert()
        .success();
}

#[test]
fn test_blueprint_entity_is_created() {
    let dir = project();
    let blueprint = dir.path().join("tags.json");
    std::fs::write(
        &blueprint,
        r#"{ "name": "tags", "entities": { "Tag": { "fields": [{ "fieldName": "name", "fieldType": "String" }] } } }"#,
    )
    .unwrap();

    entigen()
        .args(["generate", "--path"])
        .arg(dir.path())
        .arg("--blueprint")
        .arg(&blueprint)
        .assert()
        .success()
        .stdout(predicate::str::contains("created"))
        .stdout(predicate::str::contains("Tag.json"));

    assert!(dir.path().join(".jhipster/Tag.json").exists());
}

#[test]
fn test_check_fails_on_pending_change() {
    let dir = project();
    let blueprint = dir.path().join("tags.json");
    std::fs::write(&blueprint, r#"{ "entities": { "Tag": {} } }"#).unwrap();

    entigen()
        .args(["generate", "--check", "--path"])
        .arg(dir.path())
        .arg("-b")
        .arg(&blueprint)
        .assert()
        .failure()
        .stderr(predicate::str::contains("writingEntities"));

    assert!(!dir.path().join(".jhipster/Tag.json").exists());
}

#[test]
fn test_entities_json() {
    let dir = project();

    let output = entigen()
        .args(["entities", "--json", "--path"])
        .arg(dir.path())
        .output()
        .unwrap();
    assert!(output.status.success());

    let entities: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let names: Vec<_> = entities
        .as_array()
        .unwrap()
        .iter()
        .map(|entity| entity["name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, ["User", "Product", "Category"]);

    let category = &entities[2];
    assert_eq!(category["relationships"][0]["relationshipName"], "products");
    assert_eq!(category["relationships"][0]["relationshipType"], "one-to-many");
}

#[test]
fn test_priorities() {
    entigen()
        .arg("priorities")
        .assert()
        .success()
        .stdout(predicate::str::starts_with(" 1. initializing"))
        .stdout(predicate::str::contains("loadingEntities (before preparingEachEntity)"));
}

#[test]
fn test_missing_entity_directory() {
    let dir = TempDir::new().unwrap();

    entigen()
        .args(["entities", "--path"])
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains(".jhipster"));
}

#[test]
fn test_version() {
    entigen()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("entigen "));
}
