use tests::*;

use keel::{Db, Repository};
use pretty_assertions::assert_eq;
use std::{thread, time::Duration};

#[derive(Debug, Default, Clone, PartialEq, keel::Entity)]
#[entity("accounts")]
struct Account {
    #[id]
    #[column]
    id: i64,

    #[column]
    balance: i64,
}

fn accounts(s: &impl Setup) -> (Db, Repository<Account>) {
    let db = s.setup(models!(Account));
    let accounts = db.repository::<Account>().unwrap();
    accounts.create_table_if_not_exists().unwrap();
    (db, accounts)
}

fn committed_work_is_kept(s: impl Setup) {
    let (db, accounts) = accounts(&s);

    if !s.capability().transactions {
        assert!(db.begin().unwrap_err().is_unsupported_feature());
        return;
    }

    db.transaction(|_| {
        accounts.save(&Account { id: 1, balance: 10 })?;
        accounts.save(&Account { id: 2, balance: 20 })
    })
    .unwrap();

    assert_eq!(accounts.count().unwrap(), 2);
}

fn failed_work_is_rolled_back(s: impl Setup) {
    let (db, accounts) = accounts(&s);
    if !s.capability().transactions {
        return;
    }

    accounts.save(&Account { id: 1, balance: 10 }).unwrap();

    let err = db
        .transaction(|_| {
            accounts.save(&Account { id: 1, balance: 0 })?;
            accounts.save(&Account { id: 2, balance: 5 })?;
            Err::<(), _>(keel::Error::unsupported_feature("insufficient funds"))
        })
        .unwrap_err();
    assert!(err.is_unsupported_feature());

    assert_eq!(
        accounts.find_all().unwrap(),
        vec![Account { id: 1, balance: 10 }]
    );
}

fn dropped_guard_rolls_back(s: impl Setup) {
    let (db, accounts) = accounts(&s);
    if !s.capability().transactions {
        return;
    }

    {
        let _tx = db.begin().unwrap();
        accounts.save(&Account { id: 1, balance: 10 }).unwrap();
    }

    assert_eq!(accounts.count().unwrap(), 0);
    assert!(!db.in_transaction());
}

fn nested_transactions_fail_fast(s: impl Setup) {
    let (db, _) = accounts(&s);
    if !s.capability().transactions {
        return;
    }

    let tx = db.begin().unwrap();
    let err = db.transaction(|_| Ok(())).unwrap_err();
    assert!(err.is_transaction_already_active());
    tx.rollback().unwrap();

    db.transaction(|_| Ok(())).unwrap();
}

fn other_threads_stay_outside_the_transaction(s: impl Setup) {
    let (db, accounts) = accounts(&s);
    if !s.capability().transactions {
        return;
    }

    let tx = db.begin().unwrap();
    accounts.save(&Account { id: 1, balance: 10 }).unwrap();

    let writer = {
        let accounts = accounts.clone();
        thread::spawn(move || accounts.save(&Account { id: 42, balance: 1 }))
    };

    // The writer blocks until the owner is done.
    thread::sleep(Duration::from_millis(50));
    assert!(!writer.is_finished());
    tx.rollback().unwrap();
    writer.join().unwrap().unwrap();

    assert_eq!(accounts.find_by_id(1).unwrap(), None);
    assert_eq!(
        accounts.find_by_id(42).unwrap(),
        Some(Account { id: 42, balance: 1 })
    );
}

tests!(
    committed_work_is_kept,
    other_threads_stay_outside_the_transaction,
    failed_work_is_rolled_back,
    dropped_guard_rolls_back,
    nested_transactions_fail_fast,
);
