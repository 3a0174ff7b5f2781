//! Record::save: insert-or-replace, validation, identity tracking.

use ntest::timeout;
use spacemap_core::{FieldError, OrmError, Value};

use crate::helpers::{num32, num64, text, Fixture};

#[timeout(1000)]
#[test]
fn test_save_new_record() {
    let fx = Fixture::new();
    let model = fx.record_model();
    let mut record = model
        .new_record([("pk", Value::from(1)), ("data", Value::from("test"))])
        .unwrap();

    record.save().unwrap();

    assert!(record.exists_in_db());
    assert_eq!(fx.store.tuples(0).unwrap(), vec![vec![num64(1), text("test")]]);
}

#[timeout(1000)]
#[test]
fn test_save_existing_record_replaces() {
    let fx = Fixture::new();
    let model = fx.record_model();
    let mut record = model
        .new_record([("pk", Value::from(1)), ("data", Value::from("test"))])
        .unwrap();
    record.save().unwrap();

    record.set("data", "changed").unwrap();
    record.save().unwrap();

    assert_eq!(fx.store.tuples(0).unwrap(), vec![vec![num64(1), text("changed")]]);
    assert_eq!(model.objects().get([("pk", 1)]).unwrap(), record);
}

#[timeout(1000)]
#[test]
fn test_save_over_foreign_tuple_with_same_key() {
    let fx = Fixture::new();
    fx.raw_insert(0, vec![num64(1), text("old")]);

    let mut record = fx
        .record_model()
        .new_record([("pk", Value::from(1)), ("data", Value::from("new"))])
        .unwrap();
    record.save().unwrap();

    assert_eq!(fx.store.tuples(0).unwrap(), vec![vec![num64(1), text("new")]]);
}

#[timeout(1000)]
#[test]
fn test_save_never_sends_out_of_range_values() {
    let fx = Fixture::new();
    let model = fx.user_model();
    let mut record = model
        .new_record([("pk", Value::from(1)), ("user_id", Value::from(1)), ("data", Value::from("x"))])
        .unwrap();

    let err = record.set("user_id", i64::from(i32::MAX) + 1).unwrap_err();
    assert!(err.is_validation());
    assert_eq!(record.get("user_id"), Some(&Value::Int(1)));
    assert_eq!(fx.requests(), 0);
}

#[timeout(1000)]
#[test]
fn test_save_without_primary_key() {
    let fx = Fixture::new();
    let model = fx.keyless_model();
    let mut record = model
        .new_record([("user_id", Value::from(3)), ("data", Value::from("x"))])
        .unwrap();

    // The first write needs no primary key.
    record.save().unwrap();
    assert!(record.exists_in_db());

    let requests = fx.requests();
    let err = record.save().unwrap_err();
    assert_eq!(
        err,
        OrmError::MissingPrimaryKey {
            model: "Keyless".to_string(),
            operation: "save",
        }
    );
    assert!(err.is_usage());
    assert_eq!(fx.requests(), requests);
}

#[timeout(1000)]
#[test]
fn test_fetched_record_has_identity() {
    let fx = Fixture::new();
    fx.raw_insert(1, vec![num64(9), num32(4), text("seeded")]);

    let record = fx.user_model().objects().get([("pk", 9)]).unwrap();
    assert!(record.exists_in_db());
    assert_eq!(record.pk(), Some(&Value::Int(9)));
    assert_eq!(
        record.iter().collect::<Vec<_>>(),
        vec![
            ("pk", Some(&Value::Int(9))),
            ("user_id", Some(&Value::Int(4))),
            ("data", Some(&Value::from("seeded"))),
        ]
    );
}

#[timeout(1000)]
#[test]
fn test_tuple_length_checked_by_default() {
    let fx = Fixture::new();
    fx.raw_insert(
        0,
        vec![num64(1), text("test1"), text("one"), text("two"), text("three")],
    );

    let err = fx.record_model().objects().get([("pk", 1)]).unwrap_err();
    assert_eq!(
        err,
        OrmError::Field(FieldError::TupleLength {
            model: "Record".to_string(),
            expected: 2,
            actual: 5,
        })
    );

    let record = fx.loose_record_model().objects().get([("pk", 1)]).unwrap();
    assert_eq!(record.get("data"), Some(&Value::from("test1")));
}

#[timeout(1000)]
#[test]
fn test_wrong_width_is_field_error() {
    let fx = Fixture::new();
    fx.raw_insert(1, vec![num64(1), num64(4), text("x")]);

    let err = fx.user_model().objects().get([("pk", 1)]).unwrap_err();
    assert!(matches!(
        err,
        OrmError::Field(FieldError::WireWidth { expected: 4, actual: 8, .. })
    ));
}
