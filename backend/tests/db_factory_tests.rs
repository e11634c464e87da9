//! Tests for db::factory module - repository creation and configuration.

mod support;

use std::str::FromStr;
use schedule_stats::db::factory::{RepositoryFactory, RepositoryType};
use schedule_stats::db::RepositoryConfig;

#[test]
fn test_repository_type_from_str() {
    assert_eq!(
        RepositoryType::from_str("POSTGRES").unwrap(),
        RepositoryType::Postgres
    );
    assert_eq!(RepositoryType::from_str("pg").unwrap(), RepositoryType::Postgres);
    assert_eq!(RepositoryType::from_str("LOCAL").unwrap(), RepositoryType::Local);

    let result = RepositoryType::from_str("invalid");
    assert!(result.unwrap_err().contains("Unknown repository type"));
}

#[test]
fn test_repository_type_from_env_default() {
    let _env = support::RepositoryEnv::empty();
    assert_eq!(RepositoryType::from_env(), RepositoryType::Local);
}

#[test]
fn test_repository_type_from_env_with_database_url() {
    let _env = support::RepositoryEnv::with(&[("DATABASE_URL", "postgres://localhost/test")]);
    assert_eq!(RepositoryType::from_env(), RepositoryType::Postgres);
}

#[test]
fn test_repository_type_from_env_with_pg_database_url() {
    let _env = support::RepositoryEnv::with(&[("PG_DATABASE_URL", "postgres://localhost/test")]);
    assert_eq!(RepositoryType::from_env(), RepositoryType::Postgres);
}

#[test]
fn test_repository_type_from_env_explicit() {
    let _env = support::RepositoryEnv::with(&[
        ("REPOSITORY_TYPE", "local"),
        ("DATABASE_URL", "postgres://localhost/test"),
    ]);
    assert_eq!(RepositoryType::from_env(), RepositoryType::Local);
}

#[test]
fn test_env_restored_after_guard() {
    let before = std::env::var("REPOSITORY_TYPE").ok();
    {
        let _env = support::RepositoryEnv::with(&[("REPOSITORY_TYPE", "postgres")]);
        assert_eq!(std::env::var("REPOSITORY_TYPE").unwrap(), "postgres");
    }
    assert_eq!(std::env::var("REPOSITORY_TYPE").ok(), before);
}

#[tokio::test]
async fn test_create_local() {
    let repo = RepositoryFactory::create(RepositoryType::Local, None)
        .await
        .unwrap();
    assert!(repo.health_check().await.unwrap());
    assert_eq!(repo.count_queries().await.unwrap(), 0);
}

#[cfg(not(feature = "postgres-repo"))]
#[tokio::test]
async fn test_create_postgres_without_feature() {
    let result = RepositoryFactory::create(RepositoryType::Postgres, None).await;
    assert!(result.is_err());
}

#[test]
fn test_create_local_seeded() {
    let dir = tempfile::tempdir().unwrap();
    let seed = dir.path().join("queries.json");
    std::fs::write(
        &seed,
        r#"[
            {"name": "a", "created_at": "2024-05-01T00:00:00Z", "schedule": {"interval": 60}},
            {"name": "b", "created_at": "2024-05-01T00:00:00Z"}
        ]"#,
    )
    .unwrap();

    let repo = RepositoryFactory::create_local_seeded(&seed).unwrap();
    let rt = tokio::runtime::Runtime::new().unwrap();
    assert_eq!(rt.block_on(repo.count_queries()).unwrap(), 2);
}

#[test]
fn test_create_local_seeded_missing_file() {
    assert!(RepositoryFactory::create_local_seeded("/no/such/file.json").is_err());
}

#[tokio::test]
async fn test_from_repository_config_local() {
    let config = RepositoryConfig::from_toml_str("[repository]\ntype = \"local\"\n").unwrap();
    let repo = RepositoryFactory::from_repository_config(&config)
        .await
        .unwrap();
    assert_eq!(repo.count_queries().await.unwrap(), 0);
}

#[tokio::test]
async fn test_from_repository_config_invalid_type() {
    let config = RepositoryConfig::from_toml_str("[repository]\ntype = \"sqlite\"\n").unwrap();
    assert!(RepositoryFactory::from_repository_config(&config)
        .await
        .is_err());
}

#[tokio::test]
async fn test_bundled_repository_config() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/repository.toml");
    let repo = RepositoryFactory::from_config_file(path).await.unwrap();
    assert_eq!(repo.count_queries().await.unwrap(), 5);
}
