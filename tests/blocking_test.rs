// Wait-for-match queries: wakeup on mutation, no-timeout liveness, and
// broadcast to every waiter.

use featherql::executor::{DmlExecutor, SelectExecutor};
use featherql::parser::{Comparison, Condition};
use featherql::Table;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{sleep, timeout};

fn scores() -> Arc<Table> {
    Arc::new(
        Table::from_records(
            vec!["id".into(), "name".into(), "score".into()],
            vec![
                vec!["1".into(), "Amy".into(), "10".into()],
                vec!["2".into(), "Bo".into(), "20".into()],
            ],
        )
        .unwrap(),
    )
}

fn score_is(value: &str) -> Condition {
    Condition {
        column: "score".into(),
        op: Comparison::Eq,
        operand: value.into(),
    }
}

#[tokio::test]
async fn blocking_select_wakes_on_matching_update() {
    let table = scores();

    let waiter = tokio::spawn({
        let table = Arc::clone(&table);
        async move {
            SelectExecutor::select(&table, &["name".into()], Some(&score_is("30")), true)
                .await
                .unwrap()
        }
    });

    sleep(Duration::from_millis(100)).await;
    assert!(!waiter.is_finished(), "select returned before any match existed");

    let out = DmlExecutor::update(
        &table,
        &[("score".into(), "30".into())],
        Some(&Condition {
            column: "id".into(),
            op: Comparison::Eq,
            operand: "1".into(),
        }),
        false,
    )
    .await
    .unwrap();
    assert_eq!(out, "1 row(s) updated.\n");

    let out = timeout(Duration::from_secs(5), waiter).await.unwrap().unwrap();
    assert_eq!(out, "name\nAmy\n1 row(s) selected.\n");
}

#[tokio::test]
async fn blocking_select_wakes_on_insert() {
    let table = Arc::new(
        Table::from_records(vec!["id".into(), "name".into()], Vec::new()).unwrap(),
    );

    let waiter = tokio::spawn({
        let table = Arc::clone(&table);
        async move {
            SelectExecutor::select(
                &table,
                &["*".into()],
                Some(&Condition {
                    column: "id".into(),
                    op: Comparison::Eq,
                    operand: "1".into(),
                }),
                true,
            )
            .await
            .unwrap()
        }
    });

    sleep(Duration::from_millis(100)).await;
    DmlExecutor::insert(&table, &["id".into(), "name".into()], &["1".into(), "Amy".into()])
        .unwrap();

    let out = timeout(Duration::from_secs(5), waiter).await.unwrap().unwrap();
    assert_eq!(out, "id\tname\n1\tAmy\n1 row(s) selected.\n");
}

#[tokio::test]
async fn blocking_select_without_match_never_returns() {
    let table = scores();
    // Documented liveness property: no timeout exists, so a never-matching
    // wait stays pending for as long as we care to watch it.
    let result = timeout(
        Duration::from_millis(300),
        SelectExecutor::select(&table, &["*".into()], Some(&score_is("999")), true),
    )
    .await;
    assert!(result.is_err());
}

#[tokio::test]
async fn non_blocking_select_on_empty_table_returns_immediately() {
    let table = Arc::new(Table::from_records(vec!["id".into()], Vec::new()).unwrap());
    let out = timeout(
        Duration::from_millis(300),
        SelectExecutor::select(
            &table,
            &["*".into()],
            Some(&Condition {
                column: "id".into(),
                op: Comparison::Eq,
                operand: "1".into(),
            }),
            false,
        ),
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(out, "0 row(s) selected.\n");
}

#[tokio::test]
async fn update_broadcast_wakes_every_waiter() {
    let table = scores();

    let mut waiters = Vec::new();
    for _ in 0..3 {
        let table = Arc::clone(&table);
        waiters.push(tokio::spawn(async move {
            SelectExecutor::select(&table, &["id".into()], Some(&score_is("30")), true)
                .await
                .unwrap()
        }));
    }

    sleep(Duration::from_millis(100)).await;
    DmlExecutor::update(&table, &[("score".into(), "30".into())], None, false)
        .await
        .unwrap();

    for waiter in waiters {
        let out = timeout(Duration::from_secs(5), waiter).await.unwrap().unwrap();
        // Each waiter re-evaluates against the post-update state.
        assert_eq!(out, "id\n1\n2\n2 row(s) selected.\n");
    }
}

#[tokio::test]
async fn blocking_update_retries_until_match() {
    let table = scores();

    let waiter = tokio::spawn({
        let table = Arc::clone(&table);
        async move {
            DmlExecutor::update(
                &table,
                &[("name".into(), "Winner".into())],
                Some(&score_is("30")),
                true,
            )
            .await
            .unwrap()
        }
    });

    sleep(Duration::from_millis(100)).await;
    assert!(!waiter.is_finished());

    DmlExecutor::update(
        &table,
        &[("score".into(), "30".into())],
        Some(&Condition {
            column: "id".into(),
            op: Comparison::Eq,
            operand: "2".into(),
        }),
        false,
    )
    .await
    .unwrap();

    let out = timeout(Duration::from_secs(5), waiter).await.unwrap().unwrap();
    assert_eq!(out, "1 row(s) updated.\n");
    assert_eq!(table.rows()[1].snapshot(), ["2", "Winner", "30"]);
}
