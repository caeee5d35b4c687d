use axum::Router;
use conduit::application::services::TokenService;
use conduit::bootstrap;
use conduit::config::Config;
use conduit::infrastructure::http::build_router;
use conduit::infrastructure::persistence::Database;
use std::collections::HashMap;
use std::path::PathBuf;

pub const TEST_JWT_SECRET: &str = "test-secret";

/// A migrated database in its own file, removed again on drop.
pub struct TestDb {
    db: Database,
    path: PathBuf,
}

impl TestDb {
    pub fn db(&self) -> Database {
        self.db.clone()
    }

    pub fn url(&self) -> String {
        format!("sqlite://{}?mode=rwc", self.path.display())
    }
}

impl Drop for TestDb {
    fn drop(&mut self) {
        for suffix in ["", "-wal", "-shm"] {
            let mut file = self.path.clone().into_os_string();
            file.push(suffix);
            std::fs::remove_file(file).ok();
        }
    }
}

pub async fn setup_test_db() -> TestDb {
    // Unique file per test so tests can run in parallel
    let path = std::env::temp_dir().join(format!("conduit_test_{}.db", uuid::Uuid::new_v4()));
    let db_url = format!("sqlite://{}?mode=rwc", path.display());

    let db = Database::connect(&db_url)
        .await
        .expect("Failed to connect to test database");

    db.run_migrations()
        .await
        .expect("Failed to run migrations");

    TestDb { db, path }
}

pub fn test_config(database_url: &str) -> Config {
    let vars: HashMap<&str, String> = HashMap::from([
        ("APP_ENV", "test".to_string()),
        ("DATABASE_URL", database_url.to_string()),
        ("DATABASE_TEST_URL", database_url.to_string()),
        ("JWT_SECRET", TEST_JWT_SECRET.to_string()),
    ]);

    Config::from_lookup(|key| vars.get(key).cloned()).expect("Failed to build test config")
}

/// Full router over a fresh database.
pub struct TestApp {
    pub test_db: TestDb,
    pub router: Router,
    pub tokens: TokenService,
}

impl TestApp {
    pub fn db(&self) -> Database {
        self.test_db.db()
    }
}

pub async fn setup_test_app() -> TestApp {
    let test_db = setup_test_db().await;
    let config = test_config(&test_db.url());
    let tokens = TokenService::new(&config.jwt_secret, config.jwt_ttl_hours);

    let state = bootstrap::build_app_state(test_db.db(), &config);
    let router = build_router(state);

    TestApp {
        test_db,
        router,
        tokens,
    }
}
