use shelf_core::models::{NewAccount, Role};
use shelf_core::{AccountStore, AppError, USERNAME_TAKEN};
use shelf_db::{AccountRepository, Database};

use crate::integration::common::setup_test_db;

fn new_account(username: &str, role: Role) -> NewAccount {
    NewAccount {
        username: username.into(),
        password_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA".into(),
        role,
    }
}

#[tokio::test]
#[ignore = "requires docker"]
async fn create_and_find_account() {
    let (pool, _container) = setup_test_db().await;
    let repo = AccountRepository::new(pool);

    let created = repo
        .create(&new_account("alice", Role::Member))
        .await
        .unwrap();
    assert!(created.id > 0);
    assert_eq!(created.username, "alice");
    assert_eq!(created.role, Role::Member);

    let by_name = repo
        .find_by_username("alice")
        .await
        .unwrap()
        .expect("Should find by username");
    assert_eq!(by_name, created);

    let by_id = repo
        .find_by_id(created.id)
        .await
        .unwrap()
        .expect("Should find by id");
    assert_eq!(by_id.username, "alice");
}

#[tokio::test]
#[ignore = "requires docker"]
async fn missing_account_is_none() {
    let (pool, _container) = setup_test_db().await;
    let repo = AccountRepository::new(pool);

    assert!(repo.find_by_username("nobody").await.unwrap().is_none());
    assert!(repo.find_by_id(9999).await.unwrap().is_none());
}

#[tokio::test]
#[ignore = "requires docker"]
async fn duplicate_username_is_conflict() {
    let (pool, _container) = setup_test_db().await;
    let repo = AccountRepository::new(pool);

    repo.create(&new_account("alice", Role::Member))
        .await
        .unwrap();
    let err = repo
        .create(&new_account("alice", Role::Librarian))
        .await
        .unwrap_err();

    match err {
        AppError::Conflict(msg) => assert_eq!(msg, USERNAME_TAKEN),
        other => panic!("expected conflict, got {other:?}"),
    }
}

#[tokio::test]
#[ignore = "requires docker"]
async fn list_returns_newest_first() {
    let (pool, _container) = setup_test_db().await;
    let repo = AccountRepository::new(pool);

    repo.create(&new_account("alice", Role::Member))
        .await
        .unwrap();
    tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    repo.create(&new_account("libby", Role::Librarian))
        .await
        .unwrap();

    let accounts = repo.list().await.unwrap();
    let names: Vec<_> = accounts.iter().map(|a| a.username.as_str()).collect();
    assert_eq!(names, ["libby", "alice"]);
}

#[tokio::test]
#[ignore = "requires docker"]
async fn role_check_constraint_rejects_unknown_roles() {
    let (pool, _container) = setup_test_db().await;

    let result = sqlx::query(
        "INSERT INTO users (username, password_hash, role) VALUES ('mallory', 'x', 'admin')",
    )
    .execute(&pool)
    .await;
    assert!(result.is_err());
}

#[tokio::test]
#[ignore = "requires docker"]
async fn health_check_succeeds() {
    let (pool, _container) = setup_test_db().await;
    let repo = AccountRepository::new(pool);

    AccountStore::health_check(&repo).await.unwrap();
}

#[tokio::test]
#[ignore = "requires docker"]
async fn migrate_is_idempotent_and_repo_shares_pool() {
    let (pool, _container) = setup_test_db().await;
    let db = Database::from_pool(pool);

    db.migrate().await.unwrap();

    let created = db
        .account_repo()
        .insert(&new_account("libby", Role::Librarian))
        .await
        .unwrap();
    let found = db.account_repo().get_by_id(created.id).await.unwrap();
    assert_eq!(found.map(|a| a.username), Some("libby".to_string()));
}
