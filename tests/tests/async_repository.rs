use tests::*;

use keel::{AsyncRepository, Operator};
use pretty_assertions::assert_eq;

#[derive(Debug, Default, Clone, PartialEq, keel::Entity)]
#[entity("tasks")]
struct Task {
    #[id]
    #[column]
    id: i64,

    #[column]
    title: String,

    #[column]
    done: bool,
}

fn task(id: i64, title: &str, done: bool) -> Task {
    Task {
        id,
        title: title.to_string(),
        done,
    }
}

async fn tasks(s: &impl Setup) -> AsyncRepository<Task> {
    let db = s.setup(models!(Task));
    let tasks = db.repository::<Task>().unwrap().into_async();
    tasks.create_table_if_not_exists().await.unwrap();
    tasks
}

async fn crud_through_the_blocking_pool(s: impl Setup) {
    let tasks = tasks(&s).await;

    tasks.save(task(1, "write", false)).await.unwrap();
    tasks
        .save_all(vec![task(2, "test", true), task(3, "ship", false)])
        .await
        .unwrap();

    assert_eq!(tasks.count().await.unwrap(), 3);
    assert_eq!(
        tasks.find_by_id(2).await.unwrap(),
        Some(task(2, "test", true))
    );

    let open = tasks
        .query()
        .filter("done", Operator::Equal, false)
        .unwrap()
        .all()
        .await
        .unwrap();
    assert_eq!(open, vec![task(1, "write", false), task(3, "ship", false)]);

    assert!(tasks.delete(task(1, "", false)).await.unwrap());
    assert_eq!(tasks.delete_all_by_id([2, 3]).await.unwrap(), 2);
    assert!(tasks.find_all().await.unwrap().is_empty());
}

async fn concurrent_calls_share_one_database(s: impl Setup) {
    let tasks = tasks(&s).await;

    let handles: Vec<_> = (0..8)
        .map(|id| {
            let tasks = tasks.clone();
            tokio::spawn(async move { tasks.save(task(id, "parallel", false)).await })
        })
        .collect();

    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    assert_eq!(tasks.count().await.unwrap(), 8);
    assert_eq!(
        tasks
            .query()
            .filter("title", Operator::Equal, "parallel")
            .unwrap()
            .limit(3)
            .all()
            .await
            .unwrap()
            .len(),
        3
    );
}

async fn query_errors_are_synchronous(s: impl Setup) {
    let tasks = tasks(&s).await;

    let err = tasks
        .query()
        .filter("done", Operator::LessThan, Option::<bool>::None)
        .unwrap_err();
    assert!(err.is_unsupported_predicate());

    assert_eq!(tasks.query().one().await.unwrap(), None);
}

async_tests!(
    crud_through_the_blocking_pool,
    concurrent_calls_share_one_database,
    query_errors_are_synchronous,
);
