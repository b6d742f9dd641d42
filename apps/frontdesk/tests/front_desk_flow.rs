//! Drives the front desk the way a shift would: set up the floor, open a
//! tab, order, check the bill, close.

use clap::Parser;
use comanda_core::ServiceFeeRate;
use comanda_db::{Database, DbConfig};
use std::path::PathBuf;

use frontdesk::cli::Cli;
use frontdesk::commands::{dispatch, Context, Output};
use frontdesk::config::FrontDeskConfig;
use frontdesk::error::{AppResult, ErrorCode};

struct Desk {
    db: Database,
    config: FrontDeskConfig,
}

impl Desk {
    async fn new() -> Self {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let config = FrontDeskConfig {
            db_path: PathBuf::from(":memory:"),
            service_fee: ServiceFeeRate::default(),
            currency_symbol: "R$".to_string(),
        };
        Desk { db, config }
    }

    async fn run(&self, args: &[&str]) -> AppResult<Output> {
        let argv = std::iter::once("frontdesk").chain(args.iter().copied());
        let cli = Cli::try_parse_from(argv).unwrap();
        let ctx = Context {
            db: &self.db,
            config: &self.config,
        };
        dispatch(ctx, cli.command).await
    }

    async fn id(&self, args: &[&str]) -> i64 {
        let out = self.run(args).await.unwrap();
        out.json["id"].as_i64().unwrap()
    }
}

#[tokio::test]
async fn test_full_service_flow() {
    let desk = Desk::new().await;

    let staff = desk.id(&["staff", "add", "--cpf", "12345678901", "--name", "Ana"]).await;
    let table = desk.id(&["table", "add", "--capacity", "4"]).await;
    let moqueca = desk.id(&["menu", "add", "Moqueca", "--price", "20.00"]).await;
    let suco = desk.id(&["menu", "add", "Suco", "--price", "15,00"]).await;

    let staff_arg = staff.to_string();
    let table_arg = table.to_string();
    let opened = desk
        .run(&["tab", "open", "--staff", &staff_arg, "--table", &table_arg])
        .await
        .unwrap();
    let tab = opened.json["id"].as_i64().unwrap();
    let tab_arg = tab.to_string();
    assert!(opened.text.contains("10.00%"));

    let moqueca_arg = moqueca.to_string();
    let suco_arg = suco.to_string();
    desk.run(&["tab", "add", &tab_arg, "--item", &moqueca_arg, "--qty", "2"])
        .await
        .unwrap();
    desk.run(&["tab", "add", &tab_arg, "--item", &suco_arg])
        .await
        .unwrap();

    let items = desk.run(&["tab", "items", &tab_arg]).await.unwrap();
    assert_eq!(items.json.as_array().unwrap().len(), 2);
    assert!(items.text.contains("Moqueca"));

    let totals = desk.run(&["tab", "totals", &tab_arg]).await.unwrap();
    assert_eq!(totals.json["subtotal_cents"], 5500);
    assert_eq!(totals.json["fee_cents"], 550);
    assert_eq!(totals.json["total_cents"], 6050);

    let tables = desk.run(&["table", "list"]).await.unwrap();
    assert_eq!(tables.json[0]["status"], "occupied");
    assert_eq!(tables.json[0]["open_tab_id"], tab);

    let closed = desk.run(&["tab", "close", &tab_arg]).await.unwrap();
    assert!(closed.text.contains("R$ 60.50"));
    assert_eq!(closed.json["totals"]["total_cents"], 6050);

    let tables = desk.run(&["table", "list"]).await.unwrap();
    assert_eq!(tables.json[0]["status"], "free");
    assert!(tables.json[0]["open_tab_id"].is_null());

    let history = desk.run(&["table", "history", &table_arg]).await.unwrap();
    assert_eq!(history.json[0]["id"], tab);
    assert!(history.text.contains("R$ 60.50"));

    let shown = desk.run(&["tab", "show", &tab_arg]).await.unwrap();
    assert_eq!(shown.json["tab"]["total_cents"], 6050);
    assert!(shown.text.contains("closed"));
}

#[tokio::test]
async fn test_rejections_carry_error_codes() {
    let desk = Desk::new().await;

    let staff = desk.id(&["staff", "add", "--cpf", "12345678901", "--name", "Ana"]).await;
    let table = desk.id(&["table", "add", "--capacity", "2", "--reserved"]).await;

    let err = desk
        .run(&["tab", "open", "--staff", &staff.to_string(), "--table", &table.to_string()])
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::StateConflict);
    assert_eq!(err.exit_code(), 4);

    let err = desk.run(&["tab", "close", "999"]).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::NotFound);

    let err = desk
        .run(&["staff", "add", "--cpf", "123", "--name", "Bia"])
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ValidationError);

    let err = desk.run(&["table", "edit", &table.to_string()]).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::ValidationError);

    let err = desk
        .run(&["table", "edit", &table.to_string(), "--status", "occupied"])
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::StateConflict);
}

#[tokio::test]
async fn test_edit_merges_with_current_values() {
    let desk = Desk::new().await;

    let item = desk
        .id(&["menu", "add", "Feijoada", "--price", "45.90", "--sub", "Sábado"])
        .await;
    let edited = desk
        .run(&["menu", "edit", &item.to_string(), "--price", "49.90"])
        .await
        .unwrap();
    assert_eq!(edited.json["description"], "Feijoada");
    assert_eq!(edited.json["sub_description"], "Sábado");
    assert_eq!(edited.json["price_cents"], 4990);

    let customer = desk
        .id(&["customer", "add", "--cpf", "98765432100", "--phone", "(71) 9999-0000"])
        .await;
    let edited = desk
        .run(&["customer", "edit", &customer.to_string(), "--name", "Caio"])
        .await
        .unwrap();
    assert_eq!(edited.json["name"], "Caio");
    assert_eq!(edited.json["phone"], "(71) 9999-0000");

    let err = desk.run(&["staff", "edit", "42", "--name", "Zé"]).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::NotFound);
}

#[tokio::test]
async fn test_status_and_json_rendering() {
    let desk = Desk::new().await;
    desk.run(&["table", "add", "--capacity", "6"]).await.unwrap();

    let status = desk.run(&["status"]).await.unwrap();
    assert_eq!(status.json["healthy"], true);
    assert_eq!(status.json["tables"], 1);
    assert_eq!(status.json["open_tabs"], 0);
    assert_eq!(status.json["service_fee_bps"], 1000);
    assert_eq!(
        status.json["migrations_applied"],
        status.json["migrations_total"]
    );

    let rendered = status.render(true).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&rendered).unwrap();
    assert_eq!(parsed["tables"], 1);
    assert!(status.render(false).unwrap().contains("Open tabs:"));
}
