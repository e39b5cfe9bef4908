//! Test helpers: server lifecycle, HTTP shortcuts and response assertions

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use argon2::Params;
use async_trait::async_trait;
use identity_api::{create_app, server::bootstrap, AppState};
use identity_common::{AppConfig, PasswordService};
use identity_core::PasswordResetNotifier;
use identity_db::MemoryStore;
use identity_service::ServiceContextBuilder;
use parking_lot::Mutex;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

pub const ADMIN_NAME: &str = "superadmin";
pub const ADMIN_EMAIL: &str = "admin@example.com";
pub const ADMIN_PASSWORD: &str = "password";

/// Captures reset secrets instead of mailing them
#[derive(Default)]
pub struct CapturingNotifier {
    sent: Mutex<Vec<(String, String)>>,
}

impl CapturingNotifier {
    pub fn token_for(&self, email: &str) -> Option<String> {
        self.sent
            .lock()
            .iter()
            .rev()
            .find(|(to, _)| to == email)
            .map(|(_, token)| token.clone())
    }
}

#[async_trait]
impl PasswordResetNotifier for CapturingNotifier {
    async fn send_password_reset_link(&self, email: &str, token: &str) {
        self.sent.lock().push((email.to_string(), token.to_string()));
    }
}

/// Running server on an ephemeral port with its own in-memory store
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: Client,
    pub notifier: Arc<CapturingNotifier>,
    _handle: JoinHandle<()>,
}

impl TestServer {
    pub async fn start() -> Result<Self> {
        Self::start_with(|_| None).await
    }

    /// Start with extra environment variables layered over the test defaults
    pub async fn start_with<F>(overrides: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = test_config(overrides)?;
        let notifier = Arc::new(CapturingNotifier::default());

        let params = Params::new(8, 1, 1, None).map_err(|e| anyhow::anyhow!("{e}"))?;
        let service_context = ServiceContextBuilder::new()
            .memory_store(MemoryStore::new())
            .password_verifier(Arc::new(PasswordService::with_params(params)))
            .notifier(notifier.clone())
            .auth(config.auth.clone())
            .app_url(config.app.url.clone())
            .build()?;

        let state = AppState::new(service_context, config);
        bootstrap(&state).await?;
        let app = create_app(state);

        let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
        let addr = listener.local_addr()?;
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        let client = Client::builder().timeout(Duration::from_secs(10)).build()?;

        Ok(Self {
            addr,
            client,
            notifier,
            _handle: handle,
        })
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    fn request(&self, method: Method, path: &str, token: Option<&str>) -> RequestBuilder {
        let builder = self
            .client
            .request(method, format!("{}{}", self.base_url(), path));
        match token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    pub async fn get(&self, path: &str) -> Result<Response> {
        Ok(self.request(Method::GET, path, None).send().await?)
    }

    pub async fn get_auth(&self, path: &str, token: &str) -> Result<Response> {
        Ok(self.request(Method::GET, path, Some(token)).send().await?)
    }

    pub async fn post<T: Serialize>(&self, path: &str, body: &T) -> Result<Response> {
        Ok(self.request(Method::POST, path, None).json(body).send().await?)
    }

    pub async fn post_auth<T: Serialize>(&self, path: &str, token: &str, body: &T) -> Result<Response> {
        Ok(self
            .request(Method::POST, path, Some(token))
            .json(body)
            .send()
            .await?)
    }

    pub async fn put_auth<T: Serialize>(&self, path: &str, token: &str, body: &T) -> Result<Response> {
        Ok(self
            .request(Method::PUT, path, Some(token))
            .json(body)
            .send()
            .await?)
    }

    pub async fn patch_auth(&self, path: &str, token: &str) -> Result<Response> {
        Ok(self.request(Method::PATCH, path, Some(token)).send().await?)
    }

    pub async fn delete_auth(&self, path: &str, token: &str) -> Result<Response> {
        Ok(self.request(Method::DELETE, path, Some(token)).send().await?)
    }

    /// Sign up through the API and return the bearer token
    pub async fn signup(&self, name: &str, email: &str, password: &str) -> Result<String> {
        let body = crate::fixtures::SignupRequest::new(name, email, password, "phone");
        let auth: crate::fixtures::AuthResponse =
            assert_json(self.post("/api/signup", &body).await?, StatusCode::CREATED).await?;
        Ok(auth.token)
    }

    /// Log in through the API and return the bearer token
    pub async fn login(&self, login: &str, password: &str, device: &str) -> Result<String> {
        let body = crate::fixtures::LoginRequest::new(login, password, device);
        let auth: crate::fixtures::AuthResponse =
            assert_json(self.post("/api/login", &body).await?, StatusCode::OK).await?;
        Ok(auth.token)
    }

    /// Token for the bootstrap super admin
    pub async fn admin_token(&self) -> Result<String> {
        self.login(ADMIN_NAME, ADMIN_PASSWORD, "admin-console").await
    }
}

/// Configuration for a test server; no `.env` is read
pub fn test_config<F>(overrides: F) -> Result<AppConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let config = AppConfig::from_lookup(|key| {
        overrides(key).or_else(|| {
            let value = match key {
                "API_PORT" => "0",
                "DATABASE_URL" => "postgres://unused",
                "APP_URL" => "http://localhost:3000",
                "BOOTSTRAP_ADMIN_NAME" => ADMIN_NAME,
                "BOOTSTRAP_ADMIN_EMAIL" => ADMIN_EMAIL,
                "BOOTSTRAP_ADMIN_PASSWORD" => ADMIN_PASSWORD,
                _ => return None,
            };
            Some(value.to_string())
        })
    })?;
    Ok(config)
}

/// Assert response status and parse JSON body
pub async fn assert_json<T: DeserializeOwned>(response: Response, expected_status: StatusCode) -> Result<T> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!("Expected status {expected_status}, got {status}. Body: {body}");
    }
    Ok(response.json().await?)
}

/// Assert response status without parsing body
pub async fn assert_status(response: Response, expected_status: StatusCode) -> Result<()> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!("Expected status {expected_status}, got {status}. Body: {body}");
    }
    Ok(())
}

/// Assert an error response and return its `error` object
pub async fn assert_error(response: Response, expected_status: StatusCode) -> Result<serde_json::Value> {
    let body: serde_json::Value = assert_json(response, expected_status).await?;
    Ok(body["error"].clone())
}
