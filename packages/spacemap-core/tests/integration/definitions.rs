//! Models declared from JSON definition files.

use ntest::timeout;
use std::fs;
use tempfile::tempdir;

use spacemap_core::{FieldError, FieldType, Model, ModelDefinition, OrmError, Value};

use crate::helpers::Fixture;

const USER_RECORD: &str = r#"{
    "name": "UserRecord",
    "meta": {"db_alias": "the_new_space"},
    "fields": [
        {"name": "pk", "type": "num64", "primary_key": true},
        {"name": "user_id", "type": "num32", "db_index": 1},
        {"name": "data", "type": "string"}
    ]
}"#;

#[test]
fn test_model_from_definition_file() -> anyhow::Result<()> {
    let fx = Fixture::new();
    let dir = tempdir()?;
    let path = dir.path().join("user_record.json");
    fs::write(&path, USER_RECORD)?;

    let definition = ModelDefinition::from_path(&path)?;
    let model = Model::from_definition(&definition)
        .registry(fx.registry.clone())
        .build()?;

    assert_eq!(model.schema().field("user_id").map(|f| f.ty()), Some(FieldType::Num32));
    assert_eq!(model.schema().primary_index(), Some(0));
    assert_eq!(model.connection()?.space(), 1);

    model
        .objects()
        .create([("pk", Value::from(1)), ("user_id", Value::from(5)), ("data", Value::from("x"))])?;
    assert_eq!(model.objects().filter([("user_id", 5)])?.len(), 1);
    Ok(())
}

#[timeout(1000)]
#[test]
fn test_missing_definition_file() {
    let dir = tempdir().unwrap();
    assert!(matches!(
        ModelDefinition::from_path(dir.path().join("absent.json")),
        Err(OrmError::Definition(_))
    ));
}

#[timeout(1000)]
#[test]
fn test_definition_rejected_by_schema() {
    let definition = ModelDefinition::from_json(
        r#"{
            "name": "Broken",
            "fields": [
                {"name": "pk", "type": "num64", "primary_key": true},
                {"name": "other", "type": "num64", "db_index": 0}
            ]
        }"#,
    )
    .unwrap();

    assert_eq!(
        Model::from_definition(&definition).build().unwrap_err(),
        FieldError::PrimaryIndexConflict {
            model: "Broken".to_string(),
            field: "pk".to_string(),
        }
    );
}
