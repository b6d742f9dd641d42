//! End-to-end tab lifecycle against a migrated SQLite database.

use chrono::Utc;
use comanda_core::{
    CoreError, ErrorKind, MenuItem, NewMenuItem, NewStaff, NewTable, Staff, Table, TableStatus,
    ValidationError, MAX_PRICE_CENTS,
};
use comanda_db::{Database, DbConfig, ServiceError};

struct Fixture {
    db: Database,
    staff: Staff,
    table: Table,
    moqueca: MenuItem,
    suco: MenuItem,
}

async fn fixture_with(db: Database) -> Fixture {
    let staff = db
        .staff()
        .insert(&NewStaff {
            cpf: "12345678901".to_string(),
            name: "Ana".to_string(),
        })
        .await
        .unwrap();
    let table = db
        .tables()
        .insert(&NewTable {
            capacity: 4,
            status: TableStatus::Free,
        })
        .await
        .unwrap();
    let moqueca = db
        .menu()
        .insert(&NewMenuItem {
            description: "Moqueca".to_string(),
            sub_description: None,
            price_cents: 2000,
        })
        .await
        .unwrap();
    let suco = db
        .menu()
        .insert(&NewMenuItem {
            description: "Suco".to_string(),
            sub_description: None,
            price_cents: 1500,
        })
        .await
        .unwrap();

    Fixture {
        db,
        staff,
        table,
        moqueca,
        suco,
    }
}

async fn fixture() -> Fixture {
    fixture_with(Database::new(DbConfig::in_memory()).await.unwrap()).await
}

async fn table_status(f: &Fixture) -> TableStatus {
    f.db.tables()
        .get_by_id(f.table.id)
        .await
        .unwrap()
        .unwrap()
        .status
}

#[tokio::test]
async fn full_service_bills_55_plus_fee() {
    let f = fixture().await;

    let tab = f.db.tabs().open_tab(f.staff.id, f.table.id).await.unwrap();
    f.db.ledger().append_item(tab.id, f.moqueca.id, 2).await.unwrap();
    f.db.ledger().append_item(tab.id, f.suco.id, 1).await.unwrap();

    let totals = f.db.tabs().compute_totals(tab.id).await.unwrap();
    assert_eq!(totals.subtotal_cents, 5500);
    assert_eq!(totals.fee_cents, 550);
    assert_eq!(totals.total_cents, 6050);
    assert_eq!(totals.table_id, f.table.id);

    let closed = f.db.tabs().close_tab(tab.id).await.unwrap();
    assert_eq!(closed.totals, totals);

    let stored = f.db.tabs().get_by_id(tab.id).await.unwrap().unwrap();
    assert_eq!(stored.total_cents, Some(6050));
    assert!(stored.closed_at.is_some());
    assert_eq!(table_status(&f).await, TableStatus::Free);
}

#[tokio::test]
async fn menu_price_change_does_not_touch_appended_items() {
    let f = fixture().await;
    let tab = f.db.tabs().open_tab(f.staff.id, f.table.id).await.unwrap();

    f.db.ledger().append_item(tab.id, f.moqueca.id, 2).await.unwrap();
    f.db.menu()
        .update(
            f.moqueca.id,
            &NewMenuItem {
                description: "Moqueca baiana".to_string(),
                sub_description: None,
                price_cents: 9900,
            },
        )
        .await
        .unwrap();
    f.db.ledger().append_item(tab.id, f.moqueca.id, 1).await.unwrap();

    let items = f.db.ledger().list_items(tab.id).await.unwrap();
    assert_eq!(items[0].unit_price_cents, 2000);
    assert_eq!(items[0].description, "Moqueca");
    assert_eq!(items[1].unit_price_cents, 9900);
    assert_eq!(items[1].description, "Moqueca baiana");

    let totals = f.db.tabs().compute_totals(tab.id).await.unwrap();
    assert_eq!(totals.subtotal_cents, 2 * 2000 + 9900);
}

#[tokio::test]
async fn double_close_is_a_conflict_and_keeps_total() {
    let f = fixture().await;
    let tab = f.db.tabs().open_tab(f.staff.id, f.table.id).await.unwrap();
    f.db.ledger().append_item(tab.id, f.suco.id, 1).await.unwrap();
    f.db.tabs().close_tab(tab.id).await.unwrap();

    let err = f.db.tabs().close_tab(tab.id).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::StateConflict);
    assert!(matches!(err, ServiceError::Core(CoreError::TabClosed { .. })));

    let stored = f.db.tabs().get_by_id(tab.id).await.unwrap().unwrap();
    assert_eq!(stored.total_cents, Some(1650));
}

#[tokio::test]
async fn open_on_occupied_or_reserved_table_is_rejected() {
    let f = fixture().await;

    f.db.tabs().open_tab(f.staff.id, f.table.id).await.unwrap();
    let err = f.db.tabs().open_tab(f.staff.id, f.table.id).await.unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Core(CoreError::TableNotFree {
            status: TableStatus::Occupied,
            ..
        })
    ));
    assert_eq!(table_status(&f).await, TableStatus::Occupied);
    assert_eq!(f.db.tabs().list_open().await.unwrap().len(), 1);

    let reserved = f
        .db
        .tables()
        .insert(&NewTable {
            capacity: 2,
            status: TableStatus::Reserved,
        })
        .await
        .unwrap();
    let err = f.db.tabs().open_tab(f.staff.id, reserved.id).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::StateConflict);

    let still = f.db.tables().get_by_id(reserved.id).await.unwrap().unwrap();
    assert_eq!(still.status, TableStatus::Reserved);
}

#[tokio::test]
async fn closed_tab_rejects_appends_and_table_reopens() {
    let f = fixture().await;
    let tab = f.db.tabs().open_tab(f.staff.id, f.table.id).await.unwrap();
    f.db.ledger().append_item(tab.id, f.suco.id, 1).await.unwrap();
    f.db.tabs().close_tab(tab.id).await.unwrap();

    let err = f.db.ledger().append_item(tab.id, f.suco.id, 1).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::StateConflict);
    assert_eq!(f.db.ledger().list_items(tab.id).await.unwrap().len(), 1);

    // The freed table takes a new tab.
    let next = f.db.tabs().open_tab(f.staff.id, f.table.id).await.unwrap();
    assert_ne!(next.id, tab.id);
}

#[tokio::test]
async fn empty_tab_cannot_be_closed() {
    let f = fixture().await;
    let tab = f.db.tabs().open_tab(f.staff.id, f.table.id).await.unwrap();

    let err = f.db.tabs().close_tab(tab.id).await.unwrap_err();
    assert!(matches!(err, ServiceError::Core(CoreError::EmptyTab { .. })));

    // Rolled back: still open, table still occupied.
    let stored = f.db.tabs().get_by_id(tab.id).await.unwrap().unwrap();
    assert!(stored.is_open());
    assert_eq!(stored.total_cents, None);
    assert_eq!(table_status(&f).await, TableStatus::Occupied);
}

#[tokio::test]
async fn bad_quantity_and_unknown_item() {
    let f = fixture().await;
    let tab = f.db.tabs().open_tab(f.staff.id, f.table.id).await.unwrap();

    let err = f.db.ledger().append_item(tab.id, f.suco.id, 0).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);

    let err = f.db.ledger().append_item(tab.id, 9999, 1).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    assert!(f.db.ledger().list_items(tab.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn close_unknown_tab_is_not_found() {
    let f = fixture().await;

    let err = f.db.tabs().close_tab(4242).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn menu_price_above_the_cap_is_rejected() {
    let f = fixture().await;

    let err = f
        .db
        .menu()
        .insert(&NewMenuItem {
            description: "Lagosta".to_string(),
            sub_description: None,
            price_cents: i64::MAX / 2,
        })
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);

    let err = f
        .db
        .menu()
        .update(
            f.suco.id,
            &NewMenuItem {
                description: "Suco".to_string(),
                sub_description: None,
                price_cents: MAX_PRICE_CENTS + 1,
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
}

#[tokio::test]
async fn append_that_would_overflow_the_bill_is_rejected() {
    let f = fixture().await;
    let tab = f.db.tabs().open_tab(f.staff.id, f.table.id).await.unwrap();
    f.db.ledger().append_item(tab.id, f.moqueca.id, 1).await.unwrap();

    // A price written before the cap existed.
    sqlx::query("UPDATE menu_item SET price_cents = ?1 WHERE id = ?2")
        .bind(i64::MAX / 2)
        .bind(f.suco.id)
        .execute(f.db.pool())
        .await
        .unwrap();

    let err = f.db.ledger().append_item(tab.id, f.suco.id, 3).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert!(matches!(
        err,
        ServiceError::Core(CoreError::Validation(ValidationError::AmountTooLarge { .. }))
    ));

    // Nothing was written and the tab still bills and closes.
    let items = f.db.ledger().list_items(tab.id).await.unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].line_total_cents, 2000);

    let closed = f.db.tabs().close_tab(tab.id).await.unwrap();
    assert_eq!(closed.totals.total_cents, 2200);
    assert_eq!(table_status(&f).await, TableStatus::Free);
}

#[tokio::test]
async fn stored_entry_that_overflows_is_a_typed_error_on_read() {
    let f = fixture().await;
    let tab = f.db.tabs().open_tab(f.staff.id, f.table.id).await.unwrap();

    sqlx::query(
        r#"
        INSERT INTO tab_line_item (
            tab_id, menu_item_id, quantity,
            unit_price_cents, description_snapshot, ordered_at
        )
        VALUES (?1, ?2, 3, ?3, 'Lagosta', ?4)
        "#,
    )
    .bind(tab.id)
    .bind(f.suco.id)
    .bind(i64::MAX / 2)
    .bind(Utc::now())
    .execute(f.db.pool())
    .await
    .unwrap();

    let err = f.db.ledger().list_items(tab.id).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::StateConflict);
    assert!(matches!(
        err,
        ServiceError::Core(CoreError::AmountOverflow { tab_id }) if tab_id == tab.id
    ));

    let err = f.db.tabs().compute_totals(tab.id).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::StateConflict);

    let err = f.db.tabs().close_tab(tab.id).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::StateConflict);
    let stored = f.db.tabs().get_by_id(tab.id).await.unwrap().unwrap();
    assert!(stored.is_open());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn concurrent_opens_on_one_table_admit_exactly_one() {
    let dir = tempfile::tempdir().unwrap();
    let config = DbConfig::new(dir.path().join("race.db")).max_connections(4);
    let f = fixture_with(Database::new(config).await.unwrap()).await;

    let tabs_a = f.db.tabs();
    let tabs_b = f.db.tabs();
    let (a, b) = tokio::join!(
        tabs_a.open_tab(f.staff.id, f.table.id),
        tabs_b.open_tab(f.staff.id, f.table.id),
    );

    let (ok, err) = match (a, b) {
        (Ok(tab), Err(err)) | (Err(err), Ok(tab)) => (tab, err),
        (a, b) => panic!("expected exactly one winner, got {a:?} and {b:?}"),
    };

    assert_eq!(err.kind(), ErrorKind::StateConflict);
    assert_eq!(ok.table_id, f.table.id);
    assert_eq!(f.db.tabs().list_open().await.unwrap().len(), 1);
    assert_eq!(table_status(&f).await, TableStatus::Occupied);

    f.db.close().await;
}
