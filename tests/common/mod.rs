//! Shared harness for container-backed tests
//!
//! Postgres and Redis containers are started once on first use and shared by
//! every test in the binary. Tests keep their data apart by using unique
//! usernames instead of truncating tables.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};

use axum::{
    body::Body,
    extract::ConnectInfo,
    http::{header, Method, Request, StatusCode},
    Router,
};
use jsonwebtoken::Algorithm;
use serde_json::Value;
use sqlx::PgPool;
use testcontainers::{runners::AsyncRunner, ContainerAsync, ImageExt};
use testcontainers_modules::{postgres::Postgres, redis::Redis};
use tokio::sync::OnceCell;
use tower::ServiceExt;
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
};

use contacts_api::{
    config::{
        CloudinaryConfig, Config, DatabaseConfig, JwtConfig, MailConfig, RateLimitConfig,
        RedisConfig, ServerConfig,
    },
    create_router,
    db::{self, repositories::UserRepository},
    services::{EmailClient, UploadFileService},
    state::AppState,
};

static POSTGRES: OnceCell<ContainerAsync<Postgres>> = OnceCell::const_new();
static REDIS: OnceCell<ContainerAsync<Redis>> = OnceCell::const_new();

pub const PASSWORD: &str = "s3cret-pass";

/// Version the mocked Cloudinary reports for every upload
pub const UPLOAD_VERSION: u64 = 1712345678;

/// Get PostgreSQL connection URL, starting the container on first use
pub async fn postgres_url() -> String {
    let container = POSTGRES
        .get_or_init(|| async {
            Postgres::default()
                .with_user("contacts")
                .with_password("contacts_test")
                .with_db_name("contacts_test")
                .with_tag("16-alpine")
                .start()
                .await
                .expect("Failed to start PostgreSQL container")
        })
        .await;

    let host = container.get_host().await.unwrap();
    let port = container.get_host_port_ipv4(5432).await.unwrap();
    format!("postgres://contacts:contacts_test@{}:{}/contacts_test", host, port)
}

/// Get Redis connection URL, starting the container on first use
pub async fn redis_url() -> String {
    let container = REDIS
        .get_or_init(|| async {
            Redis::default()
                .start()
                .await
                .expect("Failed to start Redis container")
        })
        .await;

    let host = container.get_host().await.unwrap();
    let port = container.get_host_port_ipv4(6379).await.unwrap();
    format!("redis://{}:{}", host, port)
}

/// Migrated pool against the shared container
pub async fn test_pool() -> PgPool {
    let pool = PgPool::connect(&postgres_url().await)
        .await
        .expect("Failed to connect to test database");
    db::run_migrations(&pool)
        .await
        .expect("Failed to run migrations");
    pool
}

/// Client address no other test will use
pub fn unique_peer() -> SocketAddr {
    static COUNTER: AtomicUsize = AtomicUsize::new(0);
    let n = COUNTER.fetch_add(1, Ordering::SeqCst);
    let pid = std::process::id();
    format!("10.{}.{}.{}:4000", pid % 250, (pid / 250) % 250, n % 250 + 1)
        .parse()
        .unwrap()
}

/// Redis connection against the shared container
pub async fn test_redis() -> redis::aio::ConnectionManager {
    let client = redis::Client::open(redis_url().await.as_str()).unwrap();
    redis::aio::ConnectionManager::new(client).await.unwrap()
}

/// Name that no other test will pick
pub fn unique(prefix: &str) -> String {
    static COUNTER: AtomicUsize = AtomicUsize::new(0);
    let n = COUNTER.fetch_add(1, Ordering::SeqCst);
    let nanos = chrono::Utc::now().timestamp_subsec_nanos();
    format!("{}_{}_{}_{}", prefix, std::process::id(), nanos, n)
}

/// Router wired to real containers and a mocked mail API
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub mail_server: MockServer,
    pub upload_server: MockServer,
}

impl TestApp {
    pub async fn spawn() -> Self {
        let database_url = postgres_url().await;
        let redis_url = redis_url().await;
        let pool = test_pool().await;

        let redis_client = redis::Client::open(redis_url.as_str()).unwrap();
        let redis = redis::aio::ConnectionManager::new(redis_client).await.unwrap();

        let mail_server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&mail_server)
            .await;

        let upload_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1_1/demo/image/upload"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "version": UPLOAD_VERSION,
            })))
            .mount(&upload_server)
            .await;

        let config = Config {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                rust_log: "warn".to_string(),
                log_format: "pretty".to_string(),
                cors_origins: vec!["http://localhost:3000".to_string()],
                public_base_url: None,
            },
            database: DatabaseConfig {
                url: database_url,
                max_connections: 5,
            },
            redis: RedisConfig {
                url: redis_url,
                user_cache_ttl_seconds: 60,
            },
            jwt: JwtConfig {
                secret: "test_secret_key_for_testing_only".to_string(),
                algorithm: Algorithm::HS256,
                expiration_seconds: 900,
            },
            mail: MailConfig {
                api_url: mail_server.uri(),
                api_token: "server-token".to_string(),
                from: "noreply@example.com".to_string(),
                from_name: "Contacts API".to_string(),
                timeout_seconds: 2,
            },
            cloudinary: CloudinaryConfig {
                cloud_name: "demo".to_string(),
                api_key: "1234".to_string(),
                api_secret: "shh".to_string(),
                api_base: upload_server.uri(),
            },
            rate_limit: RateLimitConfig {
                me_max_requests: 10,
                me_window_seconds: 60,
            },
        };

        let email = EmailClient::new(&config.mail).unwrap();
        let uploads = UploadFileService::new(&config.cloudinary).unwrap();
        let state = AppState::new(pool, redis, email, uploads, config);
        let router = create_router(state.clone());

        Self {
            router,
            state,
            mail_server,
            upload_server,
        }
    }

    /// Send a request and decode the JSON body (Null when empty)
    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    pub async fn json(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.send(request).await
    }

    /// GET /api/users/me from a specific client address
    pub async fn me_from(&self, token: &str, peer: SocketAddr) -> (StatusCode, Value) {
        let mut request = Request::builder()
            .uri("/api/users/me")
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .body(Body::empty())
            .unwrap();
        request.extensions_mut().insert(ConnectInfo(peer));
        self.send(request).await
    }

    /// GET /api/users/me without credentials
    pub async fn anonymous_me_from(&self, peer: SocketAddr) -> (StatusCode, Value) {
        let mut request = Request::builder()
            .uri("/api/users/me")
            .body(Body::empty())
            .unwrap();
        request.extensions_mut().insert(ConnectInfo(peer));
        self.send(request).await
    }

    /// PATCH /api/users/avatar with a single multipart field
    pub async fn upload_avatar(&self, token: &str, field: &str, data: &[u8]) -> (StatusCode, Value) {
        let boundary = "contacts-test-boundary";
        let mut body = format!(
            "--{b}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"me.png\"\r\nContent-Type: image/png\r\n\r\n",
            b = boundary,
            field = field,
        )
        .into_bytes();
        body.extend_from_slice(data);
        body.extend_from_slice(format!("\r\n--{}--\r\n", boundary).as_bytes());

        let request = Request::builder()
            .method(Method::PATCH)
            .uri("/api/users/avatar")
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", boundary),
            )
            .body(Body::from(body))
            .unwrap();
        self.send(request).await
    }

    pub async fn register(&self, username: &str) -> (StatusCode, Value) {
        self.json(
            Method::POST,
            "/api/auth/register",
            None,
            Some(serde_json::json!({
                "username": username,
                "email": format!("{}@example.com", username),
                "password": PASSWORD,
            })),
        )
        .await
    }

    pub async fn login(&self, username: &str, password: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/auth/login")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(format!("username={}&password={}", username, password)))
            .unwrap();
        self.send(request).await
    }

    /// Register, confirm and log in a fresh user; returns its access token
    pub async fn signed_in_user(&self, prefix: &str) -> (String, String) {
        let username = unique(prefix);
        let (status, _) = self.register(&username).await;
        assert_eq!(status, StatusCode::CREATED);

        UserRepository::confirm_email(self.state.db(), &format!("{}@example.com", username))
            .await
            .unwrap();

        let (status, body) = self.login(&username, PASSWORD).await;
        assert_eq!(status, StatusCode::OK);
        let token = body["access_token"].as_str().unwrap().to_string();
        (username, token)
    }
}
