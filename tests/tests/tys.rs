use tests::*;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use keel::{Operator, Repository};
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
struct Address {
    street: String,
    zip: Option<u32>,
    tags: Vec<String>,
}

#[derive(Debug, Default, Clone, PartialEq, keel::Entity)]
#[entity("everything")]
struct Everything {
    #[id]
    #[column]
    id: Uuid,

    #[column]
    tiny: i8,

    #[column]
    small: i16,

    #[column]
    medium: i32,

    #[column]
    big: i64,

    #[column]
    unsigned: u32,

    #[column]
    ratio: f64,

    #[column]
    flag: bool,

    #[column]
    letter: char,

    #[column]
    text: String,

    #[column]
    bytes: Vec<u8>,

    #[column]
    price: Decimal,

    #[column]
    day: NaiveDate,

    #[column]
    at: NaiveDateTime,

    #[column]
    stamp: DateTime<Utc>,

    #[column]
    maybe: Option<String>,

    #[column(blob)]
    address: Address,

    #[column(blob)]
    history: Option<Vec<Address>>,
}

fn repository(s: &impl Setup) -> Repository<Everything> {
    let db = s.setup(models!(Everything));
    let everything = db.repository::<Everything>().unwrap();
    everything.create_table_if_not_exists().unwrap();
    everything
}

fn sample() -> Everything {
    let day = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
    let at = day.and_hms_micro_opt(23, 59, 58, 123_456).unwrap();

    Everything {
        id: Uuid::new_v4(),
        tiny: -8,
        small: 1_600,
        medium: -320_000,
        big: i64::MAX,
        unsigned: u32::MAX,
        ratio: 0.125,
        flag: true,
        letter: 'λ',
        text: "hello \"world\"".to_string(),
        bytes: vec![0, 1, 254, 255],
        price: Decimal::from_str("12345.678900").unwrap(),
        day,
        at,
        stamp: at.and_utc(),
        maybe: Some("here".to_string()),
        address: Address {
            street: "1 Main St".to_string(),
            zip: Some(75001),
            tags: vec!["home".to_string()],
        },
        history: Some(vec![Address::default()]),
    }
}

fn every_type_round_trips(s: impl Setup) {
    let everything = repository(&s);
    let record = sample();

    everything.save(&record).unwrap();
    let loaded = everything.find_by_id(record.id).unwrap().unwrap();

    assert_eq!(loaded, record);
}

fn absent_values_round_trip(s: impl Setup) {
    let everything = repository(&s);
    let record = Everything {
        id: Uuid::new_v4(),
        maybe: None,
        history: None,
        ..sample()
    };

    everything.save(&record).unwrap();
    let loaded = everything.find_by_id(record.id).unwrap().unwrap();

    assert_eq!(loaded.maybe, None);
    assert_eq!(loaded.history, None);
    assert_eq!(loaded, record);
}

fn typed_values_filter(s: impl Setup) {
    let everything = repository(&s);
    let record = sample();
    everything.save(&record).unwrap();

    let by_day = everything
        .query()
        .filter("day", Operator::Equal, record.day)
        .unwrap()
        .one()
        .unwrap();
    assert_eq!(by_day.map(|r| r.id), Some(record.id));

    let by_flag = everything
        .query()
        .filter("flag", Operator::Equal, false)
        .unwrap()
        .count()
        .unwrap();
    assert_eq!(by_flag, 0);

    assert!(everything.delete_by_id(record.id).unwrap());
}

fn ordering_compares_typed_values(s: impl Setup) {
    let everything = repository(&s);
    let base = sample();

    let priced = |price: &str, day: u32| Everything {
        id: Uuid::new_v4(),
        price: Decimal::from_str(price).unwrap(),
        day: NaiveDate::from_ymd_opt(2024, 3, day).unwrap(),
        ..base.clone()
    };
    let cheap = priced("8", 2);
    let middle = priced("10.5", 9);
    let dear = priced("100.00", 10);
    everything
        .save_all(&[cheap.clone(), middle.clone(), dear.clone()])
        .unwrap();

    let ids = |column: &str, op, value: keel::Value| {
        let mut found: Vec<Uuid> = everything
            .query()
            .filter(column, op, value)
            .unwrap()
            .all()
            .unwrap()
            .into_iter()
            .map(|r| r.id)
            .collect();
        found.sort();
        found
    };
    let sorted = |mut expected: Vec<Uuid>| {
        expected.sort();
        expected
    };

    // As text, "100.00" < "8" < "9".
    assert_eq!(
        ids("price", Operator::GreaterThan, Decimal::from(9).into()),
        sorted(vec![middle.id, dear.id])
    );
    assert_eq!(
        ids("price", Operator::LessThanOrEqual, Decimal::from_str("10.50").unwrap().into()),
        sorted(vec![cheap.id, middle.id])
    );
    assert_eq!(
        ids("price", Operator::Equal, Decimal::from(100).into()),
        vec![dear.id]
    );
    assert_eq!(
        ids(
            "price",
            Operator::In,
            keel::Value::list([Decimal::from(8), Decimal::from(100)])
        ),
        sorted(vec![cheap.id, dear.id])
    );

    let ninth = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
    assert_eq!(
        ids("day", Operator::GreaterThanOrEqual, ninth.into()),
        sorted(vec![middle.id, dear.id])
    );
    assert_eq!(ids("day", Operator::LessThan, ninth.into()), vec![cheap.id]);
}

tests!(
    every_type_round_trips,
    absent_values_round_trip,
    typed_values_filter,
    ordering_compares_typed_values,
);
