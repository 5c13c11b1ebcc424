use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tracing::debug;

use crate::error::{ClientError, ClientResult};
use crate::form::CreateBookPayload;
use crate::models::{AuthResponse, Book, ListBooksResponse};

#[derive(Debug, Serialize)]
struct RegisterRequestDto<'a> {
    username: &'a str,
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
struct LoginRequestDto<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct ErrorResponseDto {
    message: Option<String>,
}

#[derive(Serialize)]
struct ListBooksQuery {
    page: u32,
    limit: u32,
}

#[derive(Debug, Clone)]
/// HTTP-клиент для REST API `bookshelf-server`.
pub(crate) struct HttpClient {
    base_url: String,
    client: Client,
}

impl HttpClient {
    pub(crate) fn new(base_url: impl Into<String>) -> ClientResult<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            base_url: base_url.into(),
            client,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    async fn decode_error(response: reqwest::Response) -> ClientError {
        let status = response.status();

        let message = match response.json::<ErrorResponseDto>().await {
            Ok(body) => body.message,
            Err(_) => None,
        };
        ClientError::from_http_status(status, message)
    }

    async fn send<TRes>(&self, request: RequestBuilder) -> ClientResult<TRes>
    where
        TRes: DeserializeOwned,
    {
        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(Self::decode_error(response).await);
        }
        Ok(response.json::<TRes>().await?)
    }

    /// универсальный helper для запросов с json-payload
    async fn send_json<TReq, TRes>(
        &self,
        method: Method,
        path: &str,
        body: &TReq,
        token: Option<&str>,
    ) -> ClientResult<TRes>
    where
        TReq: Serialize,
        TRes: DeserializeOwned,
    {
        let mut request = self.client.request(method, self.endpoint(path)).json(body);
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        self.send(request).await
    }

    pub(crate) async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> ClientResult<AuthResponse> {
        let payload = RegisterRequestDto {
            username,
            email,
            password,
        };
        self.send_json(Method::POST, "/api/auth/register", &payload, None)
            .await
    }

    pub(crate) async fn login(&self, email: &str, password: &str) -> ClientResult<AuthResponse> {
        let payload = LoginRequestDto { email, password };
        self.send_json(Method::POST, "/api/auth/login", &payload, None)
            .await
    }

    pub(crate) async fn create_book(
        &self,
        token: &str,
        payload: &CreateBookPayload,
    ) -> ClientResult<Book> {
        debug!(
            title = %payload.title,
            image_len = payload.image.len(),
            "submitting book recommendation"
        );
        self.send_json(Method::POST, "/api/books", payload, Some(token))
            .await
    }

    pub(crate) async fn list_books(
        &self,
        token: &str,
        page: u32,
        limit: u32,
    ) -> ClientResult<ListBooksResponse> {
        let request = self
            .client
            .request(Method::GET, self.endpoint("/api/books"))
            .query(&ListBooksQuery { page, limit })
            .bearer_auth(token);
        self.send(request).await
    }
}
