//! Manager::create.

use ntest::timeout;
use spacemap_core::{OrmError, StoreError, Value};

use crate::helpers::{num64, text, Fixture};

#[timeout(1000)]
#[test]
fn test_create_persists() {
    let fx = Fixture::new();
    let model = fx.record_model();
    let record = model
        .objects()
        .create([("pk", Value::from(1)), ("data", Value::from("test"))])
        .unwrap();

    assert!(record.exists_in_db());
    assert_eq!(fx.store.tuples(0).unwrap(), vec![vec![num64(1), text("test")]]);
    assert_eq!(model.objects().get([("pk", 1)]).unwrap(), record);
}

#[timeout(1000)]
#[test]
fn test_create_validates_before_store() {
    let fx = Fixture::new();
    let objects = fx.record_model().objects();

    assert!(objects
        .create([("pk", Value::from("one")), ("data", Value::from("test"))])
        .unwrap_err()
        .is_validation());
    assert!(objects
        .create([("pk", Value::from(1)), ("extra", Value::from(1))])
        .unwrap_err()
        .is_field_error());
    assert!(matches!(
        objects.create([("pk", 1)]).unwrap_err(),
        OrmError::MissingValue { .. }
    ));
    assert_eq!(fx.requests(), 0);
}

#[timeout(1000)]
#[test]
fn test_create_surfaces_store_errors() {
    let fx = Fixture::new();
    let objects = fx.session_model().objects();
    fx.registry.dispose("composite_primary_key");
    fx.registry
        .register("composite_primary_key", 9, fx.store.clone())
        .unwrap();

    assert_eq!(
        objects
            .create([("sid", Value::from(1)), ("uid", Value::from(2)), ("data", Value::from("x"))])
            .unwrap_err(),
        OrmError::Store(StoreError::SpaceNotFound { space: 9 })
    );
}
