use axum::{
    Router,
    body::{Body, to_bytes},
    http::{HeaderMap, Request, StatusCode, header},
};
use petcare::db::{PetcareStorage, SqlitePool, User, connect};
use petcare::{Config, PetcareState, petcare_router};
use std::{
    collections::BTreeMap,
    fs,
    path::PathBuf,
    time::{SystemTime, UNIX_EPOCH},
};
use tower::ServiceExt;

struct TestResponse {
    status: StatusCode,
    location: Option<String>,
    body: String,
}

/// Router plus a cookie store that behaves like a single browser.
struct TestBrowser {
    app: Router,
    storage: PetcareStorage,
    /// Direct connection for row counts and fault injection.
    pool: SqlitePool,
    cookies: BTreeMap<String, String>,
    /// Set only on the browser that owns the database file.
    db_path: Option<PathBuf>,
}

impl Drop for TestBrowser {
    fn drop(&mut self) {
        let Some(path) = self.db_path.as_ref() else {
            return;
        };
        for suffix in ["", "-wal", "-shm"] {
            let _ = fs::remove_file(format!("{}{suffix}", path.display()));
        }
    }
}

async fn spawn_app() -> TestBrowser {
    spawn_app_with(Config::default()).await
}

async fn spawn_app_with(cfg: Config) -> TestBrowser {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system time before UNIX_EPOCH")
        .as_nanos();

    let mut db_path = std::env::temp_dir();
    db_path.push(format!(
        "petcare-routes-{}-{}.sqlite",
        std::process::id(),
        nanos
    ));

    let database_url = format!("sqlite:{}", db_path.display());
    let pool = connect(&database_url).await.expect("open database");
    let storage = PetcareStorage::new(pool.clone());
    storage.create_schema().await.expect("create schema");

    let state = PetcareState::new(storage.clone(), &cfg).expect("build state");
    TestBrowser {
        app: petcare_router(state),
        storage,
        pool,
        cookies: BTreeMap::new(),
        db_path: Some(db_path),
    }
}

impl TestBrowser {
    /// A second browser against the same database, with its own cookies.
    fn fresh_browser(&self) -> TestBrowser {
        TestBrowser {
            app: self.app.clone(),
            storage: self.storage.clone(),
            pool: self.pool.clone(),
            cookies: BTreeMap::new(),
            db_path: None,
        }
    }

    async fn get(&mut self, uri: &str) -> TestResponse {
        let req = Request::builder().method("GET").uri(uri);
        self.send(req, Body::empty()).await
    }

    async fn post(&mut self, uri: &str, form: &str) -> TestResponse {
        let req = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        self.send(req, Body::from(form.to_string())).await
    }

    async fn send(&mut self, mut req: axum::http::request::Builder, body: Body) -> TestResponse {
        if !self.cookies.is_empty() {
            let cookie_header = self
                .cookies
                .iter()
                .map(|(k, v)| format!("{k}={v}"))
                .collect::<Vec<_>>()
                .join("; ");
            req = req.header(header::COOKIE, cookie_header);
        }
        let resp = self
            .app
            .clone()
            .oneshot(req.body(body).expect("failed to build request"))
            .await
            .expect("request failed");

        self.store_cookies(resp.headers());
        let status = resp.status();
        let location = resp
            .headers()
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = to_bytes(resp.into_body(), usize::MAX)
            .await
            .expect("failed to read response body");
        let body = String::from_utf8(bytes.to_vec()).expect("response body was not utf-8");
        TestResponse {
            status,
            location,
            body,
        }
    }

    fn store_cookies(&mut self, headers: &HeaderMap) {
        for raw in headers
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
        {
            let Some((name, value)) = raw.split(';').next().and_then(|kv| kv.split_once('='))
            else {
                continue;
            };
            if value.is_empty() || raw.contains("Max-Age=0") {
                self.cookies.remove(name.trim());
            } else {
                self.cookies
                    .insert(name.trim().to_string(), value.trim().to_string());
            }
        }
    }

    async fn signup_and_login(&mut self, username: &str, password: &str) -> User {
        let form = format!("username={username}&password={password}");
        let resp = self.post("/signup", &form).await;
        assert_eq!(resp.location.as_deref(), Some("/login"));
        let resp = self.post("/login", &form).await;
        assert_eq!(resp.location.as_deref(), Some("/dashboard"));
        self.storage
            .find_user_by_username(username)
            .await
            .unwrap()
            .expect("user exists")
    }

    async fn count(&self, table: &str) -> i64 {
        let rec: (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(&self.pool)
            .await
            .expect("count rows");
        rec.0
    }

    async fn count_users_named(&self, username: &str) -> i64 {
        let rec: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM user WHERE username = ?")
            .bind(username)
            .fetch_one(&self.pool)
            .await
            .expect("count users");
        rec.0
    }
}

fn assert_redirect(resp: &TestResponse, to: &str) {
    assert_eq!(resp.status, StatusCode::SEE_OTHER);
    assert_eq!(resp.location.as_deref(), Some(to));
}

#[tokio::test]
async fn alice_walkthrough() {
    let mut browser = spawn_app().await;

    let resp = browser.post("/signup", "username=alice&password=pw1").await;
    assert_redirect(&resp, "/login");
    let resp = browser.get("/login").await;
    assert!(resp.body.contains("Account created successfully! Please login."));

    let resp = browser.post("/signup", "username=alice&password=pw2").await;
    assert_redirect(&resp, "/signup");
    let resp = browser.get("/signup").await;
    assert!(resp.body.contains("Username already exists. Please choose a different one."));
    assert_eq!(browser.count_users_named("alice").await, 1);

    let resp = browser.post("/login", "username=alice&password=pw1").await;
    assert_redirect(&resp, "/dashboard");
    let alice = browser
        .storage
        .find_user_by_username("alice")
        .await
        .unwrap()
        .expect("alice exists");
    assert_eq!(alice.password, "pw1");

    let resp = browser.post("/add_pet", "name=Rex").await;
    assert_redirect(&resp, "/add_pet");
    let pets = browser.storage.pets_by_owner(alice.id).await.unwrap();
    assert_eq!(pets.len(), 1);
    assert_eq!(pets[0].name, "Rex");
    assert_eq!(pets[0].owner_id, alice.id);
    let rex = pets[0].id;

    let resp = browser.get("/add_pet").await;
    assert_eq!(resp.status, StatusCode::OK);
    assert!(resp.body.contains("Pet added successfully!"));
    assert!(resp.body.contains("Rex"));

    let uri = format!("/add_appointment/{rex}");
    let resp = browser
        .post(&uri, "date=2024-01-01&description=checkup")
        .await;
    assert_redirect(&resp, &uri);
    let resp = browser.get(&uri).await;
    assert!(resp.body.contains("Appointment added successfully!"));
    assert!(resp.body.contains("2024-01-01: checkup"));

    let resp = browser.get("/dashboard").await;
    assert_eq!(resp.status, StatusCode::OK);
    assert!(resp.body.contains("Rex"));
    assert!(resp.body.contains("2024-01-01: checkup"));
    assert!(resp.body.contains("No medications."));
}

#[tokio::test]
async fn flash_is_shown_once() {
    let mut browser = spawn_app().await;
    browser.post("/signup", "username=alice&password=pw1").await;

    let first = browser.get("/login").await;
    assert!(first.body.contains("Account created successfully!"));
    let second = browser.get("/login").await;
    assert!(!second.body.contains("Account created successfully!"));
}

#[tokio::test]
async fn login_requires_exact_match() {
    let mut browser = spawn_app().await;
    browser.post("/signup", "username=alice&password=pw1").await;

    for form in [
        "username=alice&password=pw2",
        "username=alice&password=PW1",
        "username=Alice&password=pw1",
        "username=bob&password=pw1",
        "username=alice",
    ] {
        let resp = browser.post("/login", form).await;
        assert_eq!(resp.status, StatusCode::OK, "form {form}");
        assert!(resp.body.contains("Invalid credentials"), "form {form}");

        let resp = browser.get("/dashboard").await;
        assert_redirect(&resp, "/login");
    }
}

#[tokio::test]
async fn anonymous_requests_are_sent_to_login_without_writes() {
    let mut owner = spawn_app().await;
    let alice = owner.signup_and_login("alice", "pw1").await;
    owner.post("/add_pet", "name=Rex").await;
    let rex = owner.storage.pets_by_owner(alice.id).await.unwrap()[0].id;

    let mut anon = owner.fresh_browser();
    for uri in [
        "/dashboard".to_string(),
        "/add_pet".to_string(),
        format!("/add_appointment/{rex}"),
        format!("/add_medication/{rex}"),
        "/contact_vet".to_string(),
        "/logout".to_string(),
    ] {
        let resp = anon.get(&uri).await;
        assert_redirect(&resp, "/login");
    }

    let resp = anon.post("/add_pet", "name=Stray").await;
    assert_redirect(&resp, "/login");
    let resp = anon
        .post(&format!("/add_appointment/{rex}"), "date=today")
        .await;
    assert_redirect(&resp, "/login");
    let resp = anon
        .post(
            &format!("/add_medication/{rex}"),
            "medication_name=x&schedule=daily",
        )
        .await;
    assert_redirect(&resp, "/login");

    assert_eq!(owner.count("pet").await, 1);
    assert_eq!(owner.count("appointment").await, 0);
    assert_eq!(owner.count("medication").await, 0);

    let resp = anon.get("/login").await;
    assert!(resp.body.contains("Please log in to access this page."));
}

#[tokio::test]
async fn pets_only_show_for_their_owner() {
    let mut alice_browser = spawn_app().await;
    alice_browser.signup_and_login("alice", "pw1").await;
    alice_browser.post("/add_pet", "name=Rex").await;

    let mut bob_browser = alice_browser.fresh_browser();
    bob_browser.signup_and_login("bob", "pw2").await;
    bob_browser.post("/add_pet", "name=Fido").await;

    let alice_dash = alice_browser.get("/dashboard").await.body;
    assert!(alice_dash.contains("Rex"));
    assert!(!alice_dash.contains("Fido"));

    let bob_pets = bob_browser.get("/add_pet").await.body;
    assert!(bob_pets.contains("Fido"));
    assert!(!bob_pets.contains("Rex"));
}

#[tokio::test]
async fn records_are_listed_under_their_pet_only() {
    let mut browser = spawn_app().await;
    let alice = browser.signup_and_login("alice", "pw1").await;
    browser.post("/add_pet", "name=Rex").await;
    browser.post("/add_pet", "name=Tom").await;
    let pets = browser.storage.pets_by_owner(alice.id).await.unwrap();
    let (rex, tom) = (pets[0].id, pets[1].id);

    browser
        .post(
            &format!("/add_medication/{rex}"),
            "medication_name=Heartgard&schedule=monthly",
        )
        .await;
    browser
        .post(&format!("/add_appointment/{tom}"), "date=2024-02-02")
        .await;

    let rex_meds = browser.get(&format!("/add_medication/{rex}")).await.body;
    assert!(rex_meds.contains("Heartgard (monthly)"));
    let tom_meds = browser.get(&format!("/add_medication/{tom}")).await.body;
    assert!(!tom_meds.contains("Heartgard"));

    let tom_appts = browser.get(&format!("/add_appointment/{tom}")).await.body;
    assert!(tom_appts.contains("2024-02-02"));
    let rex_appts = browser.get(&format!("/add_appointment/{rex}")).await.body;
    assert!(!rex_appts.contains("2024-02-02"));

    assert_eq!(browser.storage.medications_by_pet(rex).await.unwrap().len(), 1);
    assert!(browser.storage.medications_by_pet(tom).await.unwrap().is_empty());
    assert_eq!(browser.storage.appointments_by_pet(tom).await.unwrap().len(), 1);
    assert_eq!(
        browser.storage.appointments_by_pet(tom).await.unwrap()[0].description,
        None
    );
}

#[tokio::test]
async fn any_user_can_add_records_to_any_existing_pet() {
    // No ownership check on the path pet id; kept as existing behaviour.
    let mut alice_browser = spawn_app().await;
    let alice = alice_browser.signup_and_login("alice", "pw1").await;
    alice_browser.post("/add_pet", "name=Rex").await;
    let rex = alice_browser.storage.pets_by_owner(alice.id).await.unwrap()[0].id;

    let mut bob_browser = alice_browser.fresh_browser();
    bob_browser.signup_and_login("bob", "pw2").await;
    let uri = format!("/add_appointment/{rex}");
    let resp = bob_browser.post(&uri, "date=2024-03-03&description=bob").await;
    assert_redirect(&resp, &uri);

    let appts = bob_browser.storage.appointments_by_pet(rex).await.unwrap();
    assert_eq!(appts.len(), 1);
    assert_eq!(appts[0].description.as_deref(), Some("bob"));
    assert!(bob_browser.get(&uri).await.body.contains("2024-03-03: bob"));
}

#[tokio::test]
async fn unknown_pet_id_fails_at_insert() {
    let mut browser = spawn_app().await;
    browser.signup_and_login("alice", "pw1").await;

    let resp = browser.post("/add_appointment/999", "date=2024-01-01").await;
    assert_redirect(&resp, "/add_appointment/999");
    let resp = browser
        .post("/add_medication/999", "medication_name=x&schedule=daily")
        .await;
    assert_redirect(&resp, "/add_medication/999");

    assert_eq!(browser.count("appointment").await, 0);
    assert_eq!(browser.count("medication").await, 0);

    let page = browser.get("/add_medication/999").await;
    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("An error occurred. Please try again."));
    assert!(page.body.contains("No medications."));
}

#[tokio::test]
async fn missing_required_fields_are_reported() {
    let mut browser = spawn_app().await;
    let alice = browser.signup_and_login("alice", "pw1").await;

    let resp = browser.post("/add_pet", "name=").await;
    assert_redirect(&resp, "/add_pet");
    assert!(browser.get("/add_pet").await.body.contains("Name is required."));
    assert!(browser.storage.pets_by_owner(alice.id).await.unwrap().is_empty());

    browser.post("/add_pet", "name=Rex").await;
    let rex = browser.storage.pets_by_owner(alice.id).await.unwrap()[0].id;
    let uri = format!("/add_medication/{rex}");
    browser.post(&uri, "medication_name=Heartgard").await;
    assert!(browser.get(&uri).await.body.contains("Schedule is required."));
    assert_eq!(browser.count("medication").await, 0);

    let mut anon = browser.fresh_browser();
    let resp = anon.post("/signup", "username=carol").await;
    assert_redirect(&resp, "/signup");
    assert!(anon.get("/signup").await.body.contains("Password is required."));
    assert_eq!(anon.count_users_named("carol").await, 0);
}

#[tokio::test]
async fn logout_ends_the_session() {
    let mut browser = spawn_app().await;
    browser.signup_and_login("alice", "pw1").await;
    assert_eq!(browser.get("/contact_vet").await.status, StatusCode::OK);

    let resp = browser.get("/logout").await;
    assert_redirect(&resp, "/");

    let resp = browser.get("/dashboard").await;
    assert_redirect(&resp, "/login");
    let home = browser.get("/").await;
    assert_eq!(home.status, StatusCode::OK);
    assert!(home.body.contains(r#"href="/login""#));
}

#[tokio::test]
async fn tampered_session_cookie_is_anonymous() {
    let mut browser = spawn_app().await;
    browser.signup_and_login("alice", "pw1").await;
    browser
        .cookies
        .insert("petcare_session".to_string(), "1".to_string());

    let resp = browser.get("/dashboard").await;
    assert_redirect(&resp, "/login");
}

#[tokio::test]
async fn failed_signup_insert_rerenders_form() {
    let mut browser = spawn_app().await;
    sqlx::query(
        "CREATE TRIGGER reject_user_insert BEFORE INSERT ON user \
         BEGIN SELECT RAISE(ABORT, 'user inserts disabled'); END",
    )
    .execute(&browser.pool)
    .await
    .expect("install trigger");

    let resp = browser.post("/signup", "username=zed&password=pw").await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.location, None);
    assert!(resp.body.contains("An error occurred. Please try again."));
    assert!(resp.body.contains(r#"action="/signup""#));
    assert_eq!(browser.count_users_named("zed").await, 0);

    // the notice was rendered inline, nothing is left for the next page
    let next = browser.get("/signup").await;
    assert!(!next.body.contains("An error occurred."));
}

#[tokio::test]
async fn flash_cookie_is_secure_when_configured() {
    let cfg = Config {
        secure_cookie: true,
        ..Config::default()
    };
    let mut browser = spawn_app_with(cfg).await;

    let req = Request::builder()
        .method("POST")
        .uri("/signup")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from("username=alice&password=pw1"))
        .expect("failed to build request");
    let resp = browser.app.clone().oneshot(req).await.expect("request failed");
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);

    let flash = resp
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find(|c| c.starts_with("petcare_flash="))
        .expect("flash cookie set");
    assert!(flash.contains("Secure"), "cookie: {flash}");

    let anon = browser.get("/dashboard").await;
    assert_redirect(&anon, "/login");
}

#[tokio::test]
async fn non_integer_pet_id_is_not_found() {
    let mut browser = spawn_app().await;

    for uri in ["/add_appointment/abc", "/add_medication/1.5"] {
        let resp = browser.get(uri).await;
        assert_eq!(resp.status, StatusCode::NOT_FOUND, "anonymous {uri}");
    }

    browser.signup_and_login("alice", "pw1").await;
    for uri in ["/add_appointment/abc", "/add_medication/1.5"] {
        let resp = browser.get(uri).await;
        assert_eq!(resp.status, StatusCode::NOT_FOUND, "logged in {uri}");
    }
    let resp = browser.post("/add_appointment/abc", "date=2024-01-01").await;
    assert_eq!(resp.status, StatusCode::NOT_FOUND);
    assert_eq!(browser.count("appointment").await, 0);
}
