//! Authenticated REST client
//!
//! [`ApiClient`] exposes one async method per remote capability. Every
//! request reads the current token from the [`Session`] and, when one is
//! present, sends it as `Authorization: Bearer <token>`. Without a token the
//! request goes out unauthenticated and the server decides.
//!
//! Failures are always returned as a typed [`ApiError`]; nothing is logged
//! and dropped.

mod models;

pub use models::{
    CartItem, CartState, LoginResponse, Order, OrderConfirmation, OrderItem, Product,
    RegisterRequest, UserProfile,
};

use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};
use url::Url;

use crate::config::ClientConfig;
use crate::context::{TreeContext, MAX_DEPTH_LIMIT};
use crate::error::{ApiError, Result, TreeError};
use crate::session::Session;
use crate::tree::{normalize, ReferralNode};

use models::LoginRequest;

/// Longest slice of an error body kept in error messages.
const MAX_ERROR_BODY: usize = 200;

const TREE_PATH: &str = "/users/mlm-tree-user";

/// Which status-code mapping applies to a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operation {
    Login,
    Register,
    Standard,
}

impl Operation {
    fn classify(self, status: StatusCode, path: &str, message: String) -> ApiError {
        match (self, status.as_u16()) {
            (Operation::Login, 400 | 401 | 403) => ApiError::Auth { message },
            (Operation::Register, 400 | 422) => ApiError::Validation { message },
            (Operation::Register, 409) => ApiError::Conflict { message },
            (_, code @ (401 | 403)) => ApiError::Unauthorized {
                status: code,
                message,
            },
            (_, 404) => ApiError::NotFound {
                path: path.to_string(),
            },
            (_, code) => ApiError::Server {
                status: code,
                message,
            },
        }
    }
}

/// HTTP client for the shop backend.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    session: Session,
}

impl ApiClient {
    /// Create a client for `config.base_url` that authenticates through `session`.
    pub fn new(config: &ClientConfig, session: Session) -> Result<Self> {
        Url::parse(&config.base_url)?;

        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            session,
        })
    }

    /// The session this client reads its token from.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // ========== Auth ==========

    /// Sign in and store the returned token in the session.
    ///
    /// # Errors
    ///
    /// Returns `Auth` when the server rejects the credentials.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse> {
        let body = LoginRequest { email, password };
        let response: LoginResponse = self
            .post("/auth/user/login", &body, Operation::Login)
            .await?;
        self.session.establish(&response.token)?;
        info!("session established");
        Ok(response)
    }

    /// Forget the stored token. No request is sent.
    pub fn logout(&self) -> Result<()> {
        self.session.clear()?;
        info!("session cleared");
        Ok(())
    }

    /// Create an account.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for empty required fields (checked before
    /// sending) or a 400/422 response, and `Conflict` for a 409.
    pub async fn register(&self, request: &RegisterRequest) -> Result<Value> {
        request.validate()?;
        self.post("/auth/user/register", request, Operation::Register)
            .await
    }

    // ========== Catalog ==========

    /// Fetch the product catalog.
    ///
    /// # Errors
    ///
    /// Any failure, transport or server, is wrapped in `CatalogFetch`.
    pub async fn list_products(&self) -> Result<Vec<Product>> {
        self.get("/products/products-list")
            .await
            .map_err(|e| ApiError::CatalogFetch(Box::new(e)))
    }

    /// Fetch personalised product suggestions.
    pub async fn get_recommendations(&self) -> Result<Vec<Product>> {
        self.get("/products/recommendations-ai").await
    }

    // ========== Cart ==========

    /// Add one unit of a product to the cart.
    pub async fn add_to_cart(&self, product_id: &str) -> Result<CartState> {
        let body = serde_json::json!({ "productId": product_id, "quantity": 1 });
        self.post("/cart/add", &body, Operation::Standard).await
    }

    /// Remove a cart line.
    pub async fn remove_from_cart(&self, cart_item_id: &str) -> Result<CartState> {
        let url = self.endpoint_with_segment("/cart/remove", cart_item_id)?;
        let builder = self.request(Method::DELETE, url)?;
        self.execute(builder, "/cart/remove", Operation::Standard)
            .await
    }

    /// Fetch the cart.
    pub async fn get_cart(&self) -> Result<CartState> {
        self.get("/cart").await
    }

    /// Turn the cart into an order.
    pub async fn checkout(&self) -> Result<OrderConfirmation> {
        let path = "/checkout";
        let builder = self.request(Method::POST, self.endpoint(path)?)?;
        self.execute(builder, path, Operation::Standard).await
    }

    // ========== Orders & profile ==========

    /// Fetch the user's past orders.
    pub async fn get_orders(&self) -> Result<Vec<Order>> {
        self.get("/orders/get-all-orders").await
    }

    /// Fetch the signed-in user's profile.
    pub async fn get_user_profile(&self) -> Result<UserProfile> {
        self.get("/users/me").await
    }

    // ========== Downline ==========

    /// Fetch the raw referral tree rooted at the signed-in user.
    ///
    /// # Errors
    ///
    /// Returns `Tree(TreeTooDeep)` when the body nests past the default
    /// depth ceiling; use [`downline`](Self::downline) for a custom one.
    pub async fn get_referral_tree(&self) -> Result<Value> {
        self.fetch_tree(&TreeContext::default()).await
    }

    /// Fetch and normalize the referral tree.
    ///
    /// # Errors
    ///
    /// Returns `Tree` if the payload fails normalization or nests past
    /// `ctx.max_depth`.
    pub async fn downline(&self, ctx: &TreeContext) -> Result<ReferralNode> {
        let raw = self.fetch_tree(ctx).await?;
        normalize(&raw, ctx).map_err(|e| {
            warn!(error = %e, "referral tree rejected");
            ApiError::Tree(e)
        })
    }

    async fn fetch_tree(&self, ctx: &TreeContext) -> Result<Value> {
        let builder = self.request(Method::GET, self.endpoint(TREE_PATH)?)?;
        let body = self.execute_raw(builder, TREE_PATH, Operation::Standard).await?;
        decode_tree(&body, ctx)
    }

    // ========== Plumbing ==========

    fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(Url::parse(&format!("{}{}", self.base_url, path))?)
    }

    /// `prefix` plus one percent-encoded path segment.
    fn endpoint_with_segment(&self, prefix: &str, segment: &str) -> Result<Url> {
        let mut url = self.endpoint(prefix)?;
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidEndpoint(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .push(segment);
        Ok(url)
    }

    /// Start a request, attaching the bearer token if one is stored.
    fn request(&self, method: Method, url: Url) -> Result<RequestBuilder> {
        let token = self.session.token()?;
        debug!(
            method = %method,
            path = url.path(),
            authorized = token.is_some(),
            "sending request"
        );
        let builder = self
            .http
            .request(method, url)
            .header(reqwest::header::ACCEPT, "application/json");
        Ok(match token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        })
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let builder = self.request(Method::GET, self.endpoint(path)?)?;
        self.execute(builder, path, Operation::Standard).await
    }

    async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
        operation: Operation,
    ) -> Result<T> {
        let builder = self.request(Method::POST, self.endpoint(path)?)?.json(body);
        self.execute(builder, path, operation).await
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
        path: &str,
        operation: Operation,
    ) -> Result<T> {
        let body = self.execute_raw(builder, path, operation).await?;
        serde_json::from_str(json_or_null(&body)).map_err(|source| ApiError::Decode {
            path: path.to_string(),
            source,
        })
    }

    /// Send the request and return the body of a successful response.
    async fn execute_raw(
        &self,
        builder: RequestBuilder,
        path: &str,
        operation: Operation,
    ) -> Result<String> {
        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            warn!(status = status.as_u16(), path, "request failed");
            return Err(operation.classify(status, path, error_message(status, &body)));
        }
        Ok(body)
    }
}

/// An empty body decodes as JSON `null`.
fn json_or_null(body: &str) -> &str {
    if body.trim().is_empty() {
        "null"
    } else {
        body
    }
}

/// Decode a referral tree body.
///
/// Every tree level costs two levels of JSON nesting (the node object and its
/// children array), which would trip serde_json's fixed recursion limit long
/// before `ctx.max_depth`. The body is measured first and rejected when it
/// nests deeper than the ceiling allows, then parsed without that limit.
fn decode_tree(body: &str, ctx: &TreeContext) -> Result<Value> {
    let max = ctx.max_depth.min(MAX_DEPTH_LIMIT);
    let nesting = json_nesting(body);
    if nesting > 2 * max + 4 {
        let depth = (nesting - 1) / 2;
        warn!(depth, max, "referral tree rejected before parsing");
        return Err(TreeError::TreeTooDeep { depth, max }.into());
    }

    let decode = |source: serde_json::Error| ApiError::Decode {
        path: TREE_PATH.to_string(),
        source,
    };
    let mut de = serde_json::Deserializer::from_str(json_or_null(body));
    de.disable_recursion_limit();
    let value = Value::deserialize(&mut de).map_err(decode)?;
    de.end().map_err(decode)?;
    Ok(value)
}

/// Deepest bracket nesting in a JSON text, ignoring brackets inside strings.
fn json_nesting(text: &str) -> usize {
    let (mut depth, mut deepest) = (0usize, 0usize);
    let (mut in_string, mut escaped) = (false, false);
    for byte in text.bytes() {
        if in_string {
            match byte {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match byte {
            b'"' => in_string = true,
            b'{' | b'[' => {
                depth += 1;
                deepest = deepest.max(depth);
            }
            b'}' | b']' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    deepest
}

/// Pull a readable message out of an error body.
///
/// Prefers a JSON `message` or `error` string, then the raw text, then the
/// status reason phrase.
fn error_message(status: StatusCode, body: &str) -> String {
    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(body) {
        for key in ["message", "error"] {
            if let Some(Value::String(s)) = map.get(key) {
                return s.clone();
            }
        }
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return status
            .canonical_reason()
            .unwrap_or("unknown error")
            .to_string();
    }
    trimmed.chars().take(MAX_ERROR_BODY).collect()
}
