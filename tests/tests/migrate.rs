use tests::*;

use keel::Operator;
use pretty_assertions::assert_eq;

mod v1 {
    #[derive(Debug, Default, Clone, PartialEq, keel::Entity)]
    #[entity("users")]
    pub struct User {
        #[id]
        #[column]
        pub id: i64,

        #[column]
        pub name: String,
    }
}

mod v2 {
    #[derive(Debug, Default, Clone, PartialEq, keel::Entity)]
    #[entity("users")]
    #[index(name = "idx_users_name_nickname", columns("name", "nickname"))]
    pub struct User {
        #[id]
        #[column]
        pub id: i64,

        #[column]
        pub name: String,

        #[column]
        pub nickname: Option<String>,
    }
}

mod profile {
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
    pub struct Prefs {
        pub theme: String,
        pub font_size: u32,
    }

    pub mod v1 {
        #[derive(Debug, Default, Clone, PartialEq, keel::Entity)]
        #[entity("profiles")]
        pub struct Profile {
            #[id]
            #[column]
            pub id: i64,
        }
    }

    pub mod v2 {
        #[derive(Debug, Default, Clone, PartialEq, keel::Entity)]
        #[entity("profiles")]
        pub struct Profile {
            #[id]
            #[column]
            pub id: i64,

            #[column]
            pub visits: u32,

            #[column(blob)]
            pub prefs: super::Prefs,
        }
    }
}

fn migration_is_idempotent(s: impl Setup) {
    let db = s.setup(models!());
    let users = db.repository::<v2::User>().unwrap();
    users.create_table_if_not_exists().unwrap();

    if !s.capability().migrations {
        assert!(users.migrate().unwrap_err().is_unsupported_feature());
        return;
    }

    let first = users.migrate().unwrap();
    let second = users.migrate().unwrap();

    assert!(first.is_empty());
    assert!(second.is_empty());
}

fn new_columns_read_as_absent(s: impl Setup) {
    let db = s.setup(models!());

    let old = db.repository::<v1::User>().unwrap();
    old.create_table_if_not_exists().unwrap();
    old.save_all(&[
        v1::User {
            id: 1,
            name: "Alice".to_string(),
        },
        v1::User {
            id: 2,
            name: "Bob".to_string(),
        },
    ])
    .unwrap();

    let new = db.repository::<v2::User>().unwrap();

    if s.capability().migrations {
        let report = new.migrate().unwrap();
        assert_eq!(report.added_columns, vec!["nickname"]);
        assert_eq!(report.created_indexes, vec!["idx_users_name_nickname"]);
        assert!(report.skipped_drops.is_empty());
        assert_eq!(report.statements.len(), 2);

        assert!(new.migrate().unwrap().is_empty());
    }

    let existing = new.find_all().unwrap();
    assert_eq!(existing.len(), 2);
    assert!(existing.iter().all(|user| user.nickname.is_none()));

    let carol = v2::User {
        id: 3,
        name: "Carol".to_string(),
        nickname: Some("Caz".to_string()),
    };
    new.save(&carol).unwrap();
    assert_eq!(new.find_by_id(3).unwrap(), Some(carol));

    let nicknamed = new
        .query()
        .filter("nickname", Operator::NotEqual, Option::<String>::None)
        .unwrap()
        .count()
        .unwrap();
    assert_eq!(nicknamed, 1);
}

fn removed_columns_are_reported_not_dropped(s: impl Setup) {
    if !s.capability().migrations {
        return;
    }

    let db = s.setup(models!());
    let new = db.repository::<v2::User>().unwrap();
    new.create_table_if_not_exists().unwrap();
    new.save(&v2::User {
        id: 1,
        name: "Alice".to_string(),
        nickname: Some("Al".to_string()),
    })
    .unwrap();

    let old = db.repository::<v1::User>().unwrap();
    let report = old.migrate().unwrap();

    assert_eq!(report.skipped_drops, vec!["nickname"]);
    assert!(report.statements.is_empty());

    // The column and its data survive.
    assert_eq!(
        new.find_by_id(1).unwrap().and_then(|user| user.nickname),
        Some("Al".to_string())
    );
}

fn required_columns_added_later_load_zero_values(s: impl Setup) {
    use profile::{v1, v2, Prefs};

    let db = s.setup(models!());

    let old = db.repository::<v1::Profile>().unwrap();
    old.create_table_if_not_exists().unwrap();
    old.save_all(&[v1::Profile { id: 1 }, v1::Profile { id: 2 }])
        .unwrap();

    let new = db.repository::<v2::Profile>().unwrap();
    if s.capability().migrations {
        let report = new.migrate().unwrap();
        assert_eq!(report.added_columns, vec!["visits", "prefs"]);
    }

    assert_eq!(
        new.find_all().unwrap(),
        vec![
            v2::Profile {
                id: 1,
                ..Default::default()
            },
            v2::Profile {
                id: 2,
                ..Default::default()
            },
        ]
    );

    let updated = v2::Profile {
        id: 2,
        visits: 3,
        prefs: Prefs {
            theme: "dark".to_string(),
            font_size: 14,
        },
    };
    new.save(&updated).unwrap();
    assert_eq!(new.find_by_id(2).unwrap(), Some(updated));
}

tests!(
    migration_is_idempotent,
    required_columns_added_later_load_zero_values,
    new_columns_read_as_absent,
    removed_columns_are_reported_not_dropped,
);
