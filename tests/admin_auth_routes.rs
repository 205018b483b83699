//! End-to-end coverage of the admin authentication and authorization gate.
//!
//! Each test provisions a disposable Postgres container; when no container
//! runtime is available the test skips instead of failing.

use consultancy_api::auth::responses::Role;
use consultancy_api::auth::routes as admin_routes;
use consultancy_api::auth::PasswordService;
use consultancy_api::test_support::{
    TestDatabase, TestDatabaseError, TestFixtures, TestRocketBuilder, test_auth_state,
};
use rocket::http::{ContentType, Header, Status};
use rocket::local::asynchronous::Client;
use rocket::routes;
use serde_json::{Value, json};
use sqlx::PgPool;

const PASSWORD: &str = "correct-horse-battery";

async fn provision() -> Option<TestDatabase> {
    match TestDatabase::new().await {
        Ok(db) => Some(db),
        Err(TestDatabaseError::Container(err)) => {
            eprintln!("skipping integration test: no container runtime available: {err}");
            None
        }
        Err(err) => panic!("failed to provision test database: {err:?}"),
    }
}

async fn admin_client(pool: &PgPool, token_ttl_secs: i64) -> Client {
    TestRocketBuilder::new()
        .manage_auth_state(test_auth_state(pool, token_ttl_secs))
        .mount_api_routes(routes![
            admin_routes::login,
            admin_routes::get_profile,
            admin_routes::update_profile,
            admin_routes::change_password,
            admin_routes::create_admin,
            admin_routes::list_admins,
        ])
        .async_client()
        .await
}

fn password_hash(plaintext: &str) -> String {
    PasswordService::new()
        .expect("password service")
        .hash_password(plaintext)
        .expect("hash")
}

fn bearer(token: &str) -> Header<'static> {
    Header::new("Authorization", format!("Bearer {token}"))
}

async fn login(client: &Client, email: &str, password: &str) -> (Status, Value) {
    let response = client
        .post("/api/v1/admin/login")
        .header(ContentType::JSON)
        .body(json!({ "email": email, "password": password }).to_string())
        .dispatch()
        .await;
    let status = response.status();
    let body: Value = response.into_json().await.expect("json body");
    (status, body)
}

#[tokio::test]
async fn login_issues_token_that_grants_profile_access() {
    let Some(db) = provision().await else { return };
    let pool = db.pool_clone();
    let fixtures = TestFixtures::new(&pool);

    let admin_id = fixtures
        .insert_admin(
            "casey",
            "casey@example.com",
            &password_hash(PASSWORD),
            Role::Admin,
            true,
        )
        .await
        .expect("insert admin");

    let client = admin_client(&pool, 3600).await;

    let (status, body) = login(&client, "casey@example.com", PASSWORD).await;
    assert_eq!(status, Status::Ok);
    assert_eq!(body["success"], json!(true));

    // The profile payload must never carry the secret in any spelling.
    let admin_json = serde_json::to_string(&body["data"]["admin"]).expect("serialize");
    assert!(!admin_json.contains("password"));
    assert!(!admin_json.contains("passwordHash"));

    let token = body["data"]["token"].as_str().expect("token").to_string();

    let response = client
        .get("/api/v1/admin/profile")
        .header(bearer(&token))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);
    let profile: Value = response.into_json().await.expect("json body");
    assert_eq!(profile["data"]["email"], json!("casey@example.com"));

    // Successful login records the audit timestamp.
    let last_login: Option<chrono::DateTime<chrono::Utc>> =
        sqlx::query_scalar("SELECT last_login_at FROM admins WHERE id = $1")
            .bind(admin_id)
            .fetch_one(&pool)
            .await
            .expect("query");
    assert!(last_login.is_some());

    db.close().await.expect("teardown");
}

#[tokio::test]
async fn wrong_password_is_generic_and_leaves_no_audit_trace() {
    let Some(db) = provision().await else { return };
    let pool = db.pool_clone();
    let fixtures = TestFixtures::new(&pool);

    let admin_id = fixtures
        .insert_admin(
            "robin",
            "robin@example.com",
            &password_hash(PASSWORD),
            Role::Admin,
            true,
        )
        .await
        .expect("insert admin");

    let client = admin_client(&pool, 3600).await;

    let (status, body) = login(&client, "robin@example.com", "wrong").await;
    assert_eq!(status, Status::Unauthorized);
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["message"], json!("Invalid credentials"));

    let last_login: Option<chrono::DateTime<chrono::Utc>> =
        sqlx::query_scalar("SELECT last_login_at FROM admins WHERE id = $1")
            .bind(admin_id)
            .fetch_one(&pool)
            .await
            .expect("query");
    assert!(last_login.is_none());

    db.close().await.expect("teardown");
}

#[tokio::test]
async fn unknown_email_and_inactive_account_are_indistinguishable() {
    let Some(db) = provision().await else { return };
    let pool = db.pool_clone();
    let fixtures = TestFixtures::new(&pool);

    fixtures
        .insert_admin(
            "dana",
            "dana@example.com",
            &password_hash(PASSWORD),
            Role::Admin,
            false,
        )
        .await
        .expect("insert admin");

    let client = admin_client(&pool, 3600).await;

    let (unknown_status, unknown_body) = login(&client, "ghost@example.com", PASSWORD).await;
    let (inactive_status, inactive_body) = login(&client, "dana@example.com", PASSWORD).await;

    assert_eq!(unknown_status, Status::Unauthorized);
    assert_eq!(inactive_status, Status::Unauthorized);
    assert_eq!(unknown_body["message"], inactive_body["message"]);

    db.close().await.expect("teardown");
}

#[tokio::test]
async fn login_requires_both_fields() {
    let Some(db) = provision().await else { return };
    let pool = db.pool_clone();

    let client = admin_client(&pool, 3600).await;

    let (status, body) = login(&client, "someone@example.com", "").await;
    assert_eq!(status, Status::BadRequest);
    assert_eq!(body["success"], json!(false));

    db.close().await.expect("teardown");
}

#[tokio::test]
async fn deactivation_revokes_live_tokens() {
    let Some(db) = provision().await else { return };
    let pool = db.pool_clone();
    let fixtures = TestFixtures::new(&pool);

    let admin_id = fixtures
        .insert_admin(
            "lee",
            "lee@example.com",
            &password_hash(PASSWORD),
            Role::Admin,
            true,
        )
        .await
        .expect("insert admin");

    let client = admin_client(&pool, 3600).await;

    let (_, body) = login(&client, "lee@example.com", PASSWORD).await;
    let token = body["data"]["token"].as_str().expect("token").to_string();

    let before = client
        .get("/api/v1/admin/profile")
        .header(bearer(&token))
        .dispatch()
        .await;
    assert_eq!(before.status(), Status::Ok);

    fixtures.deactivate_admin(admin_id).await.expect("deactivate");

    // The token is still cryptographically valid but the account is gone.
    let after = client
        .get("/api/v1/admin/profile")
        .header(bearer(&token))
        .dispatch()
        .await;
    assert_eq!(after.status(), Status::Unauthorized);

    db.close().await.expect("teardown");
}

#[tokio::test]
async fn expired_token_never_reaches_the_handler() {
    let Some(db) = provision().await else { return };
    let pool = db.pool_clone();
    let fixtures = TestFixtures::new(&pool);

    let admin_id = fixtures
        .insert_admin(
            "sam",
            "sam@example.com",
            &password_hash(PASSWORD),
            Role::Admin,
            true,
        )
        .await
        .expect("insert admin");

    // TTL beyond the 30s decode leeway: the minted token is already expired.
    let expired_state = test_auth_state(&pool, -120);
    let token = expired_state
        .jwt_service
        .issue_access_token(admin_id, "sam", "sam@example.com", "admin")
        .expect("issue token");

    let client = admin_client(&pool, 3600).await;

    let response = client
        .get("/api/v1/admin/profile")
        .header(bearer(&token.token))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Unauthorized);
    let body: Value = response.into_json().await.expect("json body");
    assert_eq!(body["success"], json!(false));

    db.close().await.expect("teardown");
}

#[tokio::test]
async fn missing_token_is_rejected() {
    let Some(db) = provision().await else { return };
    let pool = db.pool_clone();

    let client = admin_client(&pool, 3600).await;

    let response = client.get("/api/v1/admin/profile").dispatch().await;
    assert_eq!(response.status(), Status::Unauthorized);

    db.close().await.expect("teardown");
}

#[tokio::test]
async fn account_creation_requires_super_admin() {
    let Some(db) = provision().await else { return };
    let pool = db.pool_clone();
    let fixtures = TestFixtures::new(&pool);

    fixtures
        .insert_admin(
            "jordan",
            "jordan@example.com",
            &password_hash(PASSWORD),
            Role::Admin,
            true,
        )
        .await
        .expect("insert admin");

    let client = admin_client(&pool, 3600).await;

    let (_, body) = login(&client, "jordan@example.com", PASSWORD).await;
    let token = body["data"]["token"].as_str().expect("token").to_string();

    let response = client
        .post("/api/v1/admin/create")
        .header(ContentType::JSON)
        .header(bearer(&token))
        .body(
            json!({
                "username": "newbie",
                "email": "newbie@example.com",
                "password": "secret-enough"
            })
            .to_string(),
        )
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Forbidden);

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM admins")
        .fetch_one(&pool)
        .await
        .expect("count");
    assert_eq!(count, 1);

    db.close().await.expect("teardown");
}

#[tokio::test]
async fn super_admin_creates_and_lists_accounts() {
    let Some(db) = provision().await else { return };
    let pool = db.pool_clone();
    let fixtures = TestFixtures::new(&pool);

    fixtures
        .insert_admin(
            "root",
            "root@example.com",
            &password_hash(PASSWORD),
            Role::SuperAdmin,
            true,
        )
        .await
        .expect("insert admin");

    let client = admin_client(&pool, 3600).await;

    let (_, body) = login(&client, "root@example.com", PASSWORD).await;
    let token = body["data"]["token"].as_str().expect("token").to_string();

    let created = client
        .post("/api/v1/admin/create")
        .header(ContentType::JSON)
        .header(bearer(&token))
        .body(
            json!({
                "username": "editor",
                "email": "editor@example.com",
                "password": "secret-enough",
                "role": "admin"
            })
            .to_string(),
        )
        .dispatch()
        .await;
    assert_eq!(created.status(), Status::Created);
    let created_body: Value = created.into_json().await.expect("json body");
    assert_eq!(created_body["data"]["username"], json!("editor"));

    // Duplicate username or email is rejected up front.
    let duplicate = client
        .post("/api/v1/admin/create")
        .header(ContentType::JSON)
        .header(bearer(&token))
        .body(
            json!({
                "username": "editor",
                "email": "other@example.com",
                "password": "secret-enough"
            })
            .to_string(),
        )
        .dispatch()
        .await;
    assert_eq!(duplicate.status(), Status::BadRequest);

    let listed = client
        .get("/api/v1/admin/list")
        .header(bearer(&token))
        .dispatch()
        .await;
    assert_eq!(listed.status(), Status::Ok);
    let listed_body: Value = listed.into_json().await.expect("json body");
    assert_eq!(listed_body["data"].as_array().expect("array").len(), 2);
    let roster = serde_json::to_string(&listed_body).expect("serialize");
    assert!(!roster.contains("passwordHash"));

    db.close().await.expect("teardown");
}

#[tokio::test]
async fn password_change_swaps_which_credential_verifies() {
    let Some(db) = provision().await else { return };
    let pool = db.pool_clone();
    let fixtures = TestFixtures::new(&pool);

    fixtures
        .insert_admin(
            "morgan",
            "morgan@example.com",
            &password_hash(PASSWORD),
            Role::Admin,
            true,
        )
        .await
        .expect("insert admin");

    let client = admin_client(&pool, 3600).await;

    let (_, body) = login(&client, "morgan@example.com", PASSWORD).await;
    let token = body["data"]["token"].as_str().expect("token").to_string();

    let wrong_current = client
        .put("/api/v1/admin/change-password")
        .header(ContentType::JSON)
        .header(bearer(&token))
        .body(
            json!({ "currentPassword": "not-it", "newPassword": "brand-new-secret" }).to_string(),
        )
        .dispatch()
        .await;
    assert_eq!(wrong_current.status(), Status::BadRequest);

    let changed = client
        .put("/api/v1/admin/change-password")
        .header(ContentType::JSON)
        .header(bearer(&token))
        .body(
            json!({ "currentPassword": PASSWORD, "newPassword": "brand-new-secret" }).to_string(),
        )
        .dispatch()
        .await;
    assert_eq!(changed.status(), Status::Ok);

    let (old_status, _) = login(&client, "morgan@example.com", PASSWORD).await;
    assert_eq!(old_status, Status::Unauthorized);

    let (new_status, _) = login(&client, "morgan@example.com", "brand-new-secret").await;
    assert_eq!(new_status, Status::Ok);

    db.close().await.expect("teardown");
}

#[tokio::test]
async fn profile_updates_are_last_write_wins() {
    let Some(db) = provision().await else { return };
    let pool = db.pool_clone();
    let fixtures = TestFixtures::new(&pool);

    fixtures
        .insert_admin(
            "alex",
            "alex@example.com",
            &password_hash(PASSWORD),
            Role::Admin,
            true,
        )
        .await
        .expect("insert admin");

    let client = admin_client(&pool, 3600).await;

    let (_, body) = login(&client, "alex@example.com", PASSWORD).await;
    let token = body["data"]["token"].as_str().expect("token").to_string();

    // No optimistic locking: whichever update lands last is what persists.
    let first = client
        .put("/api/v1/admin/profile")
        .header(ContentType::JSON)
        .header(bearer(&token))
        .body(json!({ "name": "Alex One", "email": "alex@example.com" }).to_string())
        .dispatch()
        .await;
    assert_eq!(first.status(), Status::Ok);

    let second = client
        .put("/api/v1/admin/profile")
        .header(ContentType::JSON)
        .header(bearer(&token))
        .body(json!({ "name": "Alex Two", "email": "alex@example.com" }).to_string())
        .dispatch()
        .await;
    assert_eq!(second.status(), Status::Ok);

    let name: String = sqlx::query_scalar("SELECT name FROM admins WHERE email = $1")
        .bind("alex@example.com")
        .fetch_one(&pool)
        .await
        .expect("query");
    assert_eq!(name, "Alex Two");

    db.close().await.expect("teardown");
}

#[tokio::test]
async fn whitespace_padded_passwords_authenticate_verbatim() {
    let Some(db) = provision().await else { return };
    let pool = db.pool_clone();
    let fixtures = TestFixtures::new(&pool);

    // The stored hash covers the padding; login must compare the submitted
    // password byte-for-byte rather than trimming it first.
    fixtures
        .insert_admin(
            "quinn",
            "quinn@example.com",
            &password_hash(" padded-secret "),
            Role::Admin,
            true,
        )
        .await
        .expect("insert admin");

    let client = admin_client(&pool, 3600).await;

    let (padded_status, _) = login(&client, "quinn@example.com", " padded-secret ").await;
    assert_eq!(padded_status, Status::Ok);

    let (trimmed_status, _) = login(&client, "quinn@example.com", "padded-secret").await;
    assert_eq!(trimmed_status, Status::Unauthorized);

    db.close().await.expect("teardown");
}

#[tokio::test]
async fn profile_update_rejects_emails_held_by_other_admins() {
    let Some(db) = provision().await else { return };
    let pool = db.pool_clone();
    let fixtures = TestFixtures::new(&pool);

    fixtures
        .insert_admin(
            "avery",
            "avery@example.com",
            &password_hash(PASSWORD),
            Role::Admin,
            true,
        )
        .await
        .expect("insert admin");
    fixtures
        .insert_admin(
            "blake",
            "blake@example.com",
            &password_hash(PASSWORD),
            Role::Admin,
            true,
        )
        .await
        .expect("insert admin");

    let client = admin_client(&pool, 3600).await;

    let (_, body) = login(&client, "avery@example.com", PASSWORD).await;
    let token = body["data"]["token"].as_str().expect("token").to_string();

    // Another admin's address, in any casing, is a validation failure.
    let collision = client
        .put("/api/v1/admin/profile")
        .header(ContentType::JSON)
        .header(bearer(&token))
        .body(json!({ "name": "Avery", "email": "Blake@Example.com" }).to_string())
        .dispatch()
        .await;
    assert_eq!(collision.status(), Status::BadRequest);
    let collision_body: Value = collision.into_json().await.expect("json body");
    assert_eq!(collision_body["success"], json!(false));

    // Re-submitting the caller's own email is not a collision.
    let own = client
        .put("/api/v1/admin/profile")
        .header(ContentType::JSON)
        .header(bearer(&token))
        .body(json!({ "name": "Avery Updated", "email": "avery@example.com" }).to_string())
        .dispatch()
        .await;
    assert_eq!(own.status(), Status::Ok);

    db.close().await.expect("teardown");
}
