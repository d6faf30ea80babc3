use huddle_api::config::AppConfig;
use reqwest::StatusCode;
use serde_json::json;

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn(config: AppConfig) -> Self {
        // Same router as prod, bound to an ephemeral port.
        let app = huddle_api::app::build_app(config);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }

    async fn spawn_default() -> Self {
        Self::spawn(AppConfig {
            peer_secrets: "event:peer-secret".to_string(),
            ..AppConfig::default()
        })
        .await
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Pull the refresh token out of the `Set-Cookie` headers of a response.
fn refresh_cookie(res: &reqwest::Response) -> Option<String> {
    res.headers()
        .get_all(reqwest::header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .filter_map(|v| v.strip_prefix("__auth="))
        .filter_map(|v| v.split(';').next())
        .map(str::to_string)
        .next()
}

async fn register_and_login(
    client: &reqwest::Client,
    base_url: &str,
    email: &str,
) -> (String, String) {
    let res = client
        .post(format!("{base_url}/auth/registration"))
        .json(&json!({ "email": email, "password": "hunter2" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);

    let res = client
        .post(format!("{base_url}/auth/login"))
        .json(&json!({ "email": email, "password": "hunter2" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let refresh = refresh_cookie(&res).expect("login must set the refresh cookie");
    let body: serde_json::Value = res.json().await.unwrap();
    let access = body["access_token"].as_str().unwrap().to_string();

    (access, refresh)
}

#[tokio::test]
async fn login_refresh_rotates_the_pair() {
    let srv = TestServer::spawn_default().await;
    let client = reqwest::Client::new();

    let (access, refresh) = register_and_login(&client, &srv.base_url, "alice@example.com").await;

    let res = client
        .get(format!("{}/auth/refresh", srv.base_url))
        .header("cookie", format!("__auth={refresh}"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let rotated_refresh = refresh_cookie(&res).expect("refresh must rotate the cookie");
    assert_ne!(rotated_refresh, refresh);

    let body: serde_json::Value = res.json().await.unwrap();
    assert_ne!(body["access_token"].as_str().unwrap(), access);
}

#[tokio::test]
async fn logout_revokes_the_refresh_token() {
    let srv = TestServer::spawn_default().await;
    let client = reqwest::Client::new();

    let (_, refresh) = register_and_login(&client, &srv.base_url, "bob@example.com").await;

    let res = client
        .delete(format!("{}/auth/logout", srv.base_url))
        .header("cookie", format!("__auth={refresh}"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    // The very same cookie value is now dead, well before its expiry.
    let res = client
        .get(format!("{}/auth/refresh", srv.base_url))
        .header("cookie", format!("__auth={refresh}"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"].as_str().unwrap(), "revoked");
}

#[tokio::test]
async fn access_token_keeps_working_after_logout_until_expiry() {
    let srv = TestServer::spawn_default().await;
    let client = reqwest::Client::new();

    let (access, refresh) = register_and_login(&client, &srv.base_url, "carol@example.com").await;

    client
        .delete(format!("{}/auth/logout", srv.base_url))
        .header("cookie", format!("__auth={refresh}"))
        .send()
        .await
        .unwrap();

    // Bounded blast radius by design: the short-lived access token is not
    // individually revocable.
    let res = client
        .get(format!("{}/whoami", srv.base_url))
        .bearer_auth(&access)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn missing_and_wrong_kind_tokens_are_rejected() {
    let srv = TestServer::spawn_default().await;
    let client = reqwest::Client::new();

    let (_, refresh) = register_and_login(&client, &srv.base_url, "dave@example.com").await;

    // No token at all.
    let res = client
        .get(format!("{}/whoami", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    // A refresh token where an access token belongs.
    let res = client
        .get(format!("{}/whoami", srv.base_url))
        .bearer_auth(&refresh)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn wrong_credentials_do_not_log_in() {
    let srv = TestServer::spawn_default().await;
    let client = reqwest::Client::new();

    let _ = register_and_login(&client, &srv.base_url, "erin@example.com").await;

    let res = client
        .post(format!("{}/auth/login", srv.base_url))
        .json(&json!({ "email": "erin@example.com", "password": "nope" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn duplicate_registration_conflicts() {
    let srv = TestServer::spawn_default().await;
    let client = reqwest::Client::new();

    let _ = register_and_login(&client, &srv.base_url, "frank@example.com").await;

    let res = client
        .post(format!("{}/auth/registration", srv.base_url))
        .json(&json!({ "email": "frank@example.com", "password": "other" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn peer_secret_authenticates_as_peer() {
    let srv = TestServer::spawn_default().await;
    let client = reqwest::Client::new();

    let (_, _) = register_and_login(&client, &srv.base_url, "gina@example.com").await;

    // Valid peer secret, no user token at all.
    let res = client
        .get(format!("{}/users/profile", srv.base_url))
        .header("x-service-secret", "peer-secret")
        .send()
        .await
        .unwrap();
    // Peer without a user_id selection is a caller bug, not a trust failure.
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    // Invalid secret and no fallback identity.
    let res = client
        .get(format!("{}/users/profile", srv.base_url))
        .header("x-service-secret", "wrong")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn peer_lookup_and_profile_read() {
    let srv = TestServer::spawn_default().await;
    let client = reqwest::Client::new();

    let _ = register_and_login(&client, &srv.base_url, "hugo@example.com").await;

    // Peer-only endpoint: reject end users outright, serve peers.
    let res = client
        .get(format!("{}/users/identity/hugo@example.com", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = client
        .get(format!("{}/users/identity/hugo@example.com", srv.base_url))
        .header("x-service-secret", "peer-secret")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    let subject_id = body["id"].as_str().unwrap().to_string();

    // The peer can now read that user's profile and is flagged as a peer.
    let res = client
        .get(format!("{}/users/profile", srv.base_url))
        .header("x-service-secret", "peer-secret")
        .query(&[("user_id", subject_id.as_str())])
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["is_peer_call"], json!(true));
    assert_eq!(body["email"].as_str().unwrap(), "hugo@example.com");
}

#[tokio::test]
async fn peer_directory_lists_registered_users() {
    let srv = TestServer::spawn_default().await;
    let client = reqwest::Client::new();

    let (access, _) = register_and_login(&client, &srv.base_url, "kate@example.com").await;

    // End users may not browse the directory.
    let res = client
        .get(format!("{}/users/all", srv.base_url))
        .bearer_auth(&access)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = client
        .get(format!("{}/users/all", srv.base_url))
        .header("x-service-secret", "peer-secret")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    let emails: Vec<_> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["email"].as_str().unwrap())
        .collect();
    assert!(emails.contains(&"kate@example.com"));
}

#[tokio::test]
async fn end_user_profile_is_their_own() {
    let srv = TestServer::spawn_default().await;
    let client = reqwest::Client::new();

    let (access, _) = register_and_login(&client, &srv.base_url, "iris@example.com").await;

    let res = client
        .get(format!("{}/users/profile", srv.base_url))
        .bearer_auth(&access)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["email"].as_str().unwrap(), "iris@example.com");
    assert_eq!(body["is_peer_call"], json!(false));
}

#[tokio::test]
async fn events_are_scoped_to_their_owner() {
    let srv = TestServer::spawn_default().await;
    let client = reqwest::Client::new();

    let (alice, _) = register_and_login(&client, &srv.base_url, "alice2@example.com").await;
    let (bob, _) = register_and_login(&client, &srv.base_url, "bob2@example.com").await;

    let res = client
        .post(format!("{}/events", srv.base_url))
        .bearer_auth(&alice)
        .json(&json!({ "title": "picnic", "starts_at": "2026-09-05T12:00:00Z" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);

    let res = client
        .get(format!("{}/events", srv.base_url))
        .bearer_auth(&alice)
        .send()
        .await
        .unwrap();
    let own: serde_json::Value = res.json().await.unwrap();
    assert_eq!(own.as_array().unwrap().len(), 1);

    let res = client
        .get(format!("{}/events", srv.base_url))
        .bearer_auth(&bob)
        .send()
        .await
        .unwrap();
    let others: serde_json::Value = res.json().await.unwrap();
    assert!(others.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn availability_flips_after_registration() {
    let srv = TestServer::spawn_default().await;
    let client = reqwest::Client::new();

    let url = format!("{}/users/registration/availability", srv.base_url);

    let res = client
        .get(&url)
        .query(&[("email", "judy@example.com")])
        .send()
        .await
        .unwrap();
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["email"], json!(true));

    let _ = register_and_login(&client, &srv.base_url, "judy@example.com").await;

    let res = client
        .get(&url)
        .query(&[("email", "judy@example.com")])
        .send()
        .await
        .unwrap();
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["email"], json!(false));
}
