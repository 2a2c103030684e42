use tests::*;

use keel::{Operator, Repository};
use pretty_assertions::assert_eq;

#[derive(Debug, Default, Clone, PartialEq, keel::Entity)]
#[entity("users")]
struct User {
    #[id]
    #[column]
    id: i64,

    #[column]
    name: String,

    #[column]
    active: bool,
}

fn user(id: i64, name: &str, active: bool) -> User {
    User {
        id,
        name: name.to_string(),
        active,
    }
}

fn users(s: &impl Setup) -> Repository<User> {
    let db = s.setup(models!(User));
    let users = db.repository::<User>().unwrap();
    users.create_table_if_not_exists().unwrap();
    users
}

fn filter_and_delete_by_flag(s: impl Setup) {
    let users = users(&s);
    users
        .save_all(&[user(1, "Alice", true), user(2, "Bob", false)])
        .unwrap();

    let active = users
        .query()
        .filter("active", Operator::Equal, true)
        .unwrap()
        .all()
        .unwrap();
    assert_eq!(active, vec![user(1, "Alice", true)]);

    let removed = users
        .query()
        .filter("active", Operator::Equal, false)
        .unwrap()
        .delete()
        .unwrap();
    assert_eq!(removed, 1);

    assert_eq!(users.find_all().unwrap(), vec![user(1, "Alice", true)]);
}

fn save_replaces_by_id(s: impl Setup) {
    let users = users(&s);

    users.save(&user(1, "Alice", true)).unwrap();
    users.save(&user(1, "Alicia", false)).unwrap();

    assert_eq!(users.count().unwrap(), 1);
    assert_eq!(
        users.find_by_id(1).unwrap(),
        Some(user(1, "Alicia", false))
    );
}

fn find_by_id_misses_quietly(s: impl Setup) {
    let users = users(&s);
    assert_eq!(users.find_by_id(42).unwrap(), None);
}

fn delete_variants(s: impl Setup) {
    let users = users(&s);
    users
        .save_all(&[
            user(1, "Alice", true),
            user(2, "Bob", true),
            user(3, "Carol", true),
            user(4, "Dave", true),
        ])
        .unwrap();

    assert!(users.delete(&user(1, "ignored", false)).unwrap());
    assert!(!users.delete_by_id(1).unwrap());

    assert_eq!(users.delete_all_by_id([2, 3, 99]).unwrap(), 2);
    assert_eq!(users.find_all().unwrap(), vec![user(4, "Dave", true)]);

    assert_eq!(users.delete_all().unwrap(), 1);
    assert_eq!(users.count().unwrap(), 0);
}

fn drop_table_forgets_records(s: impl Setup) {
    let users = users(&s);
    users.save(&user(1, "Alice", true)).unwrap();

    users.drop_table().unwrap();
    users.create_table_if_not_exists().unwrap();

    assert!(users.find_all().unwrap().is_empty());
}

fn metadata_is_shared_per_type(s: impl Setup) {
    let db = s.setup(models!(User));
    let a = db.repository::<User>().unwrap();
    let b = db.repository::<User>().unwrap();

    assert!(std::ptr::eq(a.metadata(), b.metadata()));
    assert_eq!(db.registry().len(), 1);

    let columns: Vec<_> = a
        .metadata()
        .all_fields()
        .map(|field| field.column_name.as_str())
        .collect();
    assert_eq!(columns, ["id", "name", "active"]);
}

tests!(
    filter_and_delete_by_flag,
    save_replaces_by_id,
    find_by_id_misses_quietly,
    delete_variants,
    drop_table_forgets_records,
    metadata_is_shared_per_type,
);
