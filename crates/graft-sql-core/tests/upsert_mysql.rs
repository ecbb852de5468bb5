//! Upsert rendering for the implicit-target dialect (MySQL): duplicate-key
//! updates, `values(<col>)` references, and the features MySQL refuses.

mod common;
use common::*;

use graft_sql_core::dialect::{Dialect, Mysql, Postgres};
use graft_sql_core::error::Error;
use graft_sql_core::expr::{col, excluded, lit};
use graft_sql_core::insert::Insert;

#[test]
fn duplicate_key_update() {
    let users = users();
    let statement = Insert::into_table(&users)
        .columns(["id", "name"])
        .values([1.into(), "John".into()])
        .on_duplicate_key_update(|u| u.set("name", lit("Super John")))
        .build()
        .expect("valid upsert");
    assert_eq!(
        Mysql.render_inline(&statement).expect("renderable"),
        "insert into users (`id`,`name`) values (1,'John') \
         on duplicate key update name = 'Super John'"
    );
}

#[test]
fn rejected_row_reference_renders_as_values() {
    let inventory = inventory();
    let statement = Insert::into_table(&inventory)
        .values([1.into(), 7.into(), 20.into()])
        .on_duplicate_key_update(|u| {
            u.set("quantity", col("quantity").add(excluded("quantity")))
        })
        .build()
        .expect("valid upsert");
    let sql = Mysql.render_inline(&statement).expect("renderable");
    assert!(sql.ends_with("on duplicate key update quantity = quantity + values(quantity)"));
}

#[test]
fn do_nothing_self_assigns_a_key_column() {
    let users = users();
    let statement = Insert::into_table(&users)
        .columns(["id", "name"])
        .values([1.into(), "John".into()])
        .on_conflict_do_nothing()
        .build()
        .expect("valid insert");
    assert_eq!(
        Mysql.render_inline(&statement).expect("renderable"),
        "insert into users (`id`,`name`) values (1,'John') \
         on duplicate key update id = id"
    );
}

#[test]
fn filter_is_rejected_not_dropped() {
    let inventory = inventory();
    let statement = Insert::into_table(&inventory)
        .values([1.into(), 7.into(), 5.into()])
        .on_duplicate_key_update(|u| {
            u.set("quantity", excluded("quantity"))
                .filter(col("quantity").lt(excluded("quantity")))
        })
        .build()
        .expect("the model accepts a filter; the dialect decides");
    let err = Mysql.render(&statement).unwrap_err();
    assert!(matches!(
        err,
        Error::UnsupportedFeature {
            dialect: "mysql",
            ..
        }
    ));
    // The inline mode refuses identically.
    assert!(Mysql.render_inline(&statement).is_err());
}

#[test]
fn explicit_target_is_rejected() {
    let users = users();
    let statement = Insert::into_table(&users)
        .columns(["id", "name"])
        .values([1.into(), "John".into()])
        .on_conflict_do_update(["id"], |u| u.set("name", lit("x")))
        .build()
        .expect("valid for explicit dialects");
    let err = Mysql.render(&statement).unwrap_err();
    assert!(matches!(
        err,
        Error::UnsupportedFeature {
            dialect: "mysql",
            feature: "explicit conflict target",
        }
    ));
}

#[test]
fn implicit_do_update_is_rejected_on_explicit_dialects() {
    let users = users();
    let statement = Insert::into_table(&users)
        .columns(["id", "name"])
        .values([1.into(), "John".into()])
        .on_duplicate_key_update(|u| u.set("name", lit("x")))
        .build()
        .expect("valid for mysql");
    let err = Postgres.render(&statement).unwrap_err();
    assert!(matches!(
        err,
        Error::UnsupportedFeature {
            dialect: "postgres",
            ..
        }
    ));
}

#[test]
fn duplicate_key_update_binds_params_in_order() {
    let users = users();
    let statement = Insert::into_table(&users)
        .columns(["id", "name"])
        .values([1.into(), "John".into()])
        .on_duplicate_key_update(|u| u.set("name", lit("Super John")))
        .build()
        .expect("valid upsert");
    let query = Mysql.render(&statement).expect("renderable");
    assert_eq!(
        query.sql,
        "insert into users (`id`,`name`) values (?,?) \
         on duplicate key update name = ?"
    );
    assert_eq!(query.params.len(), 3);
}
