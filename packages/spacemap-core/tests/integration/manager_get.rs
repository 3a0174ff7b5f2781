//! Manager::get: index resolution, validation and cardinality outcomes.

use ntest::timeout;
use spacemap_core::{FieldError, OrmError, Value};

use crate::helpers::{num32, num64, text, Fixture};

#[timeout(1000)]
#[test]
fn test_get_by_primary_key() {
    let fx = Fixture::new();
    fx.raw_insert(0, vec![num64(1), text("test")]);

    let record = fx.record_model().objects().get([("pk", 1)]).unwrap();
    assert_eq!(record.get("data"), Some(&Value::from("test")));
    assert!(record.exists_in_db());
}

#[timeout(1000)]
#[test]
fn test_get_does_not_exist() {
    let fx = Fixture::new();
    let err = fx.record_model().objects().get([("pk", 1)]).unwrap_err();
    assert_eq!(
        err,
        OrmError::DoesNotExist {
            model: "Record".to_string()
        }
    );
    assert!(err.is_does_not_exist("Record"));
    assert!(!err.is_does_not_exist("UserRecord"));
}

#[timeout(1000)]
#[test]
fn test_get_multiple_objects_returned() {
    let fx = Fixture::new();
    fx.raw_insert(1, vec![num64(1), num32(7), text("a")]);
    fx.raw_insert(1, vec![num64(2), num32(7), text("b")]);
    fx.raw_insert(1, vec![num64(3), num32(7), text("c")]);

    let requests = fx.requests();
    let err = fx.user_model().objects().get([("user_id", 7)]).unwrap_err();
    assert!(err.is_multiple_objects_returned("UserRecord"));
    // limit 2 is enough to detect ambiguity
    assert_eq!(
        err,
        OrmError::MultipleObjectsReturned {
            model: "UserRecord".to_string(),
            count: 2,
        }
    );
    assert_eq!(fx.requests(), requests + 1);
}

#[timeout(1000)]
#[test]
fn test_get_by_secondary_index() {
    let fx = Fixture::new();
    fx.raw_insert(1, vec![num64(1), num32(7), text("a")]);
    fx.raw_insert(1, vec![num64(2), num32(8), text("b")]);

    let record = fx.user_model().objects().get([("user_id", 8)]).unwrap();
    assert_eq!(record.pk(), Some(&Value::Int(2)));
}

#[timeout(1000)]
#[test]
fn test_get_composite_in_any_order() {
    let fx = Fixture::new();
    fx.raw_insert(2, vec![num64(1), num32(2), text("x")]);

    let objects = fx.session_model().objects();
    let a = objects.get([("sid", 1), ("uid", 2)]).unwrap();
    let b = objects.get([("uid", 2), ("sid", 1)]).unwrap();
    assert_eq!(a, b);
    assert_eq!(a.get("data"), Some(&Value::from("x")));
}

#[timeout(1000)]
#[test]
fn test_get_by_leading_composite_field() {
    let fx = Fixture::new();
    fx.raw_insert(2, vec![num64(1), num32(2), text("a")]);
    fx.raw_insert(2, vec![num64(1), num32(3), text("b")]);
    fx.raw_insert(2, vec![num64(4), num32(3), text("c")]);

    let objects = fx.session_model().objects();
    assert!(objects
        .get([("sid", 1)])
        .unwrap_err()
        .is_multiple_objects_returned("Session"));
    assert_eq!(objects.get([("sid", 4)]).unwrap().get("data"), Some(&Value::from("c")));
    assert_eq!(objects.filter([("uid", 3)]).unwrap().len(), 2);
}

#[timeout(1000)]
#[test]
fn test_get_trailing_composite_field_alone() {
    let fx = Fixture::new();
    let err = fx.pair_model().objects().get([("uid", 2)]).unwrap_err();
    assert_eq!(
        err,
        OrmError::Field(FieldError::NoMatchingIndex {
            model: "Pair".to_string(),
            fields: vec!["uid".to_string()],
        })
    );
    assert_eq!(fx.requests(), 0);
}

#[timeout(1000)]
#[test]
fn test_get_field_errors_before_store() {
    let fx = Fixture::new();
    let objects = fx.record_model().objects();

    assert!(matches!(
        objects.get([("non_existent_field", 1)]).unwrap_err(),
        OrmError::Field(FieldError::UnknownField { .. })
    ));
    assert!(matches!(
        objects.get([("data", "test")]).unwrap_err(),
        OrmError::Field(FieldError::NotIndexed { .. })
    ));
    assert!(matches!(
        objects.get(Vec::<(&str, Value)>::new()).unwrap_err(),
        OrmError::Field(FieldError::EmptyQuery { .. })
    ));
    assert_eq!(fx.requests(), 0);
}

#[timeout(1000)]
#[test]
fn test_get_validation_errors_before_store() {
    let fx = Fixture::new();
    let users = fx.user_model().objects();

    assert!(users
        .get([("user_id", i64::from(i32::MAX) + 1)])
        .unwrap_err()
        .is_validation());
    assert!(users
        .get([("user_id", i64::from(i32::MIN) - 1)])
        .unwrap_err()
        .is_validation());
    assert!(users.get([("pk", "one")]).unwrap_err().is_validation());
    assert_eq!(fx.requests(), 0);
}

#[timeout(1000)]
#[test]
fn test_get_unregistered_alias() {
    let fx = Fixture::new();
    fx.registry.dispose("the_new_space");

    assert!(matches!(
        fx.user_model().objects().get([("pk", 1)]).unwrap_err(),
        OrmError::Connection(_)
    ));
}
