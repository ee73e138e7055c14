//! 草稿唯一性并发测试
//!
//! 不变量：任一用户在任一时刻至多持有一份 Draft 药单。
//! N 个任务同时 get_or_create_draft，必须只创建一份草稿，
//! 其余调用方复用它。

use compound_server::auth::CurrentUser;
use compound_server::db::DbService;
use compound_server::db::models::{Medicine, MedicineStatus};
use compound_server::db::repository::AccountRepository;
use compound_server::orders::OrderEngine;
use compound_server::services::DoseService;
use shared::Role;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const RACERS: usize = 32;

async fn test_engine() -> (OrderEngine, Surreal<Db>) {
    let service = DbService::memory().await.expect("in-memory db");
    let db = service.db.clone();
    // 无人监听的端口：出站剂量请求会失败并被吞掉
    let dose = DoseService::new("http://127.0.0.1:9".to_string(), 1);
    (OrderEngine::new(db.clone(), dose), db)
}

async fn register(db: &Surreal<Db>, username: &str, role: Role) -> CurrentUser {
    let repo = AccountRepository::new(db.clone());
    let account = repo
        .create(username, "password123", role)
        .await
        .expect("create account");
    CurrentUser {
        id: account.id.expect("account id").to_string(),
        username: username.to_string(),
        role,
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn concurrent_get_or_create_yields_single_draft() {
    let (engine, db) = test_engine().await;
    let user = register(&db, "maria", Role::User).await;

    let mut handles = Vec::with_capacity(RACERS);
    for _ in 0..RACERS {
        let engine = engine.clone();
        let user = user.clone();
        handles.push(tokio::spawn(async move {
            engine.get_or_create_draft(&user).await
        }));
    }

    let mut draft_ids = Vec::new();
    for handle in handles {
        let draft = handle.await.expect("task").expect("get_or_create_draft");
        draft_ids.push(draft.id.expect("draft id").to_string());
    }

    // 所有调用方观察到同一份草稿
    let first = &draft_ids[0];
    assert!(draft_ids.iter().all(|id| id == first));

    // 数据库里恰好一份 Draft
    let medicines: Vec<Medicine> = db.select("medicine").await.expect("select medicines");
    let drafts: Vec<_> = medicines
        .iter()
        .filter(|m| m.status == MedicineStatus::Draft)
        .collect();
    assert_eq!(drafts.len(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn distinct_users_get_distinct_drafts() {
    let (engine, db) = test_engine().await;
    let maria = register(&db, "maria", Role::User).await;
    let ivan = register(&db, "ivan", Role::User).await;

    let (a, b) = tokio::join!(
        engine.get_or_create_draft(&maria),
        engine.get_or_create_draft(&ivan)
    );
    let a = a.expect("maria draft");
    let b = b.expect("ivan draft");

    assert_ne!(
        a.id.expect("id").to_string(),
        b.id.expect("id").to_string()
    );

    // 再次调用复用已有草稿
    let again = engine.get_or_create_draft(&maria).await.expect("reuse");
    let medicines: Vec<Medicine> = db.select("medicine").await.expect("select medicines");
    assert_eq!(medicines.len(), 2);
    assert!(medicines.iter().any(|m| {
        m.id.as_ref().map(|id| id.to_string())
            == again.id.as_ref().map(|id| id.to_string())
    }));
}
