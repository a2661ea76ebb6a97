// Test Server Helpers
//
// `spawn_test_server` starts a real HTTP server on MySQL; contract tests
// build their own in-process services over the in-memory repositories.

use actix_web::{web, App};

pub use actix_test::TestServer;

use ngopi::modules::{health, Repositories};

use super::test_database::create_test_pool;

/// Bearer token accepted by servers built with `admin_auth()`
pub const ADMIN_TOKEN: &str = "test-admin-token";

/// Auth middleware configured for `ADMIN_TOKEN`
pub fn admin_auth() -> ngopi::middleware::AdminAuth {
    let hash = ngopi::middleware::hash_token(ADMIN_TOKEN).expect("Failed to hash token");
    ngopi::middleware::AdminAuth::new(&hash).expect("Failed to build auth middleware")
}

/// `Authorization` header pair for mutating requests
pub fn bearer() -> (&'static str, String) {
    ("Authorization", format!("Bearer {}", ADMIN_TOKEN))
}

/// Spawn a real HTTP test server with every resource mounted
///
/// # Behavior
/// - Connects to the test database via TEST_DATABASE_URL
/// - Mounts health probes and all CRUD routes behind admin auth
/// - Stops when the returned TestServer drops
pub async fn spawn_test_server() -> TestServer {
    let pool = create_test_pool().await;
    let repositories = Repositories::mysql(pool.clone());
    let auth = admin_auth();

    actix_test::start(move || {
        let repositories = repositories.clone();
        App::new()
            .app_data(web::Data::new(pool.clone()))
            .configure(health::configure)
            .configure(move |cfg| repositories.configure(cfg))
            .wrap(auth.clone())
    })
}
