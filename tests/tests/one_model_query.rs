use tests::*;

use keel::{Operator, Repository, Value};
use pretty_assertions::assert_eq;

#[derive(Debug, Default, Clone, PartialEq, keel::Entity)]
#[entity("people")]
struct Person {
    #[id]
    #[column("person_id")]
    id: i64,

    #[column("full_name")]
    name: String,

    #[column]
    age: Option<i32>,

    #[column]
    city: Option<String>,

    /// Not persisted.
    scratch: u32,
}

fn person(id: i64, name: &str, age: Option<i32>, city: Option<&str>) -> Person {
    Person {
        id,
        name: name.to_string(),
        age,
        city: city.map(str::to_string),
        scratch: 0,
    }
}

fn seeded(s: &impl Setup) -> Repository<Person> {
    let db = s.setup(models!(Person));
    let people = db.repository::<Person>().unwrap();
    people.create_table_if_not_exists().unwrap();
    people
        .save_all(&[
            person(1, "Alice", Some(30), Some("Paris")),
            person(2, "Bob", Some(25), None),
            person(3, "Carol", None, Some("Lyon")),
            person(4, "Dave", Some(41), Some("Paris")),
        ])
        .unwrap();
    people
}

fn ids(people: Vec<Person>) -> Vec<i64> {
    let mut ids: Vec<_> = people.into_iter().map(|p| p.id).collect();
    ids.sort();
    ids
}

fn or_binds_to_the_previous_condition(s: impl Setup) {
    let people = seeded(&s);

    // (city = Lyon OR age = 41) AND name != Dave
    let found = people
        .query()
        .filter("city", Operator::Equal, "Lyon")
        .unwrap()
        .or()
        .filter("age", Operator::Equal, 41)
        .unwrap()
        .and()
        .filter("name", Operator::NotEqual, "Dave")
        .unwrap()
        .all()
        .unwrap();

    assert_eq!(ids(found), vec![3]);
}

fn connectors_without_a_following_filter_do_nothing(s: impl Setup) {
    let people = seeded(&s);

    let found = people
        .query()
        .or()
        .filter("city", Operator::Equal, "Paris")
        .unwrap()
        .and()
        .all()
        .unwrap();

    assert_eq!(ids(found), vec![1, 4]);
}

fn in_degrades_by_size(s: impl Setup) {
    let people = seeded(&s);

    let none = people
        .query()
        .filter("id", Operator::In, Value::list(Vec::<i64>::new()))
        .unwrap()
        .all()
        .unwrap();
    assert!(none.is_empty());

    let one = people
        .query()
        .filter("id", Operator::In, Value::list([2]))
        .unwrap()
        .all()
        .unwrap();
    assert_eq!(ids(one), vec![2]);

    let many = people
        .query()
        .filter("full_name", Operator::In, Value::list(["Alice", "Carol", "Zed"]))
        .unwrap()
        .all()
        .unwrap();
    assert_eq!(ids(many), vec![1, 3]);
}

fn null_predicates(s: impl Setup) {
    let people = seeded(&s);

    let no_city = people
        .query()
        .filter("city", Operator::Equal, Value::Null)
        .unwrap()
        .all()
        .unwrap();
    assert_eq!(ids(no_city), vec![2]);

    let with_age = people
        .query()
        .filter("age", Operator::NotEqual, Option::<i32>::None)
        .unwrap()
        .all()
        .unwrap();
    assert_eq!(ids(with_age), vec![1, 2, 4]);

    let err = people
        .query()
        .filter("age", Operator::GreaterThan, Value::Null)
        .unwrap_err();
    assert!(err.is_unsupported_predicate());
}

fn comparisons_skip_nulls(s: impl Setup) {
    let people = seeded(&s);

    let older = people
        .query()
        .filter("age", Operator::GreaterThanOrEqual, 30)
        .unwrap()
        .all()
        .unwrap();
    assert_eq!(ids(older), vec![1, 4]);

    let younger = people
        .query()
        .filter("age", Operator::LessThan, 30)
        .unwrap()
        .count()
        .unwrap();
    assert_eq!(younger, 1);
}

fn names_resolve_to_columns(s: impl Setup) {
    let people = seeded(&s);

    // Field name, column name and id field name all resolve.
    let by_field = people
        .query()
        .filter("name", Operator::Equal, "Bob")
        .unwrap()
        .one()
        .unwrap();
    let by_column = people
        .query()
        .filter("FULL_NAME", Operator::Equal, "Bob")
        .unwrap()
        .one()
        .unwrap();
    let by_id_field = people
        .query()
        .filter("id", Operator::Equal, 2)
        .unwrap()
        .one()
        .unwrap();

    assert_eq!(by_field, Some(person(2, "Bob", Some(25), None)));
    assert_eq!(by_field, by_column);
    assert_eq!(by_field, by_id_field);
}

fn limit_caps_all_but_not_delete(s: impl Setup) {
    let people = seeded(&s);

    assert_eq!(people.query().limit(3).all().unwrap().len(), 3);
    assert_eq!(people.query().limit(-1).all().unwrap().len(), 4);
    assert!(people
        .query()
        .filter("city", Operator::Equal, "Nowhere")
        .unwrap()
        .one()
        .unwrap()
        .is_none());

    let removed = people
        .query()
        .filter("city", Operator::Equal, "Paris")
        .unwrap()
        .limit(1)
        .delete()
        .unwrap();
    assert_eq!(removed, 2);
}

fn transient_fields_load_as_default(s: impl Setup) {
    let people = seeded(&s);

    let mut alice = person(1, "Alice", Some(30), Some("Paris"));
    alice.scratch = 99;
    people.save(&alice).unwrap();

    let loaded = people.find_by_id(1).unwrap().unwrap();
    assert_eq!(loaded.scratch, 0);
}

tests!(
    or_binds_to_the_previous_condition,
    connectors_without_a_following_filter_do_nothing,
    in_degrades_by_size,
    null_predicates,
    comparisons_skip_nulls,
    names_resolve_to_columns,
    limit_caps_all_but_not_delete,
    transient_fields_load_as_default,
);
