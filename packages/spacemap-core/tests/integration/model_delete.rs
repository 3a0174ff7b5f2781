//! Record::delete.

use ntest::timeout;
use spacemap_core::{OrmError, Value};

use crate::helpers::Fixture;

#[timeout(1000)]
#[test]
fn test_delete_stored_record() {
    let fx = Fixture::new();
    let model = fx.record_model();
    let mut record = model
        .objects()
        .create([("pk", Value::from(1)), ("data", Value::from("test"))])
        .unwrap();

    assert!(record.delete().unwrap());
    assert!(!record.exists_in_db());
    assert!(model
        .objects()
        .get([("pk", 1)])
        .unwrap_err()
        .is_does_not_exist("Record"));
}

#[timeout(1000)]
#[test]
fn test_delete_reports_absent_row() {
    let fx = Fixture::new();
    let mut record = fx
        .record_model()
        .new_record([("pk", Value::from(1)), ("data", Value::from("test"))])
        .unwrap();

    assert!(!record.delete().unwrap());
    assert!(!record.exists_in_db());
}

#[timeout(1000)]
#[test]
fn test_delete_composite_key() {
    let fx = Fixture::new();
    let model = fx.pair_model();
    let mut pair = model
        .objects()
        .create([("sid", Value::from(1)), ("uid", Value::from(2)), ("data", Value::from("a"))])
        .unwrap();
    model
        .objects()
        .create([("sid", Value::from(1)), ("uid", Value::from(3)), ("data", Value::from("b"))])
        .unwrap();

    assert!(pair.delete().unwrap());
    assert!(model
        .objects()
        .get([("sid", 1), ("uid", 2)])
        .unwrap_err()
        .is_does_not_exist("Pair"));
    assert!(model.objects().get([("sid", 1), ("uid", 3)]).is_ok());
}

#[timeout(1000)]
#[test]
fn test_delete_composite_primary_key() {
    let fx = Fixture::new();
    let model = fx.session_model();
    let (sid, uid) = (1, 2);

    let mut record = model
        .new_record([("sid", Value::from(sid)), ("uid", Value::from(uid)), ("data", Value::from("test"))])
        .unwrap();
    record.save().unwrap();

    let loaded = model.objects().get([("sid", sid), ("uid", uid)]).unwrap();
    for field in ["sid", "uid", "data"] {
        assert_eq!(loaded.get(field), record.get(field));
    }

    assert!(model.objects().delete([("sid", sid), ("uid", uid)]).unwrap());
    assert!(model
        .objects()
        .get([("sid", sid)])
        .unwrap_err()
        .is_does_not_exist("Session"));
}

#[timeout(1000)]
#[test]
fn test_delete_without_primary_key() {
    let fx = Fixture::new();
    let model = fx.keyless_model();
    let mut record = model
        .objects()
        .create([("user_id", Value::from(1)), ("data", Value::from("a"))])
        .unwrap();
    let requests = fx.requests();

    assert_eq!(
        record.delete().unwrap_err(),
        OrmError::MissingPrimaryKey {
            model: "Keyless".to_string(),
            operation: "delete",
        }
    );
    assert!(record.exists_in_db());
    assert_eq!(fx.requests(), requests);
}

#[timeout(1000)]
#[test]
fn test_delete_unset_primary_key() {
    let fx = Fixture::new();
    let mut record = fx
        .record_model()
        .new_record([("data", "orphan")])
        .unwrap();

    assert!(record.delete().unwrap_err().is_usage());
    assert_eq!(fx.requests(), 0);
}
