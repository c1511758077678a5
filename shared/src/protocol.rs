use crate::{
    API_PREFIX, AccessToken, AnalyticsSnapshot, ChatReply, Order, OrderLine, OrderStatus,
    OrderSummary, Product, ProductDraft, Supplier, SupplierDraft,
};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

/// HTTP Methods for API Requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Patch => "PATCH",
        }
    }
}

/// Encoded request payload.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Empty,
    Json(serde_json::Value),
    /// `application/x-www-form-urlencoded`, already encoded
    Form(String),
}

impl RequestBody {
    pub fn json<T: Serialize>(value: &T) -> Result<Self, serde_json::Error> {
        serde_json::to_value(value).map(RequestBody::Json)
    }

    pub fn form(fields: &[(&str, &str)]) -> Self {
        RequestBody::Form(encode_pairs(fields))
    }

    pub fn content_type(&self) -> Option<&'static str> {
        match self {
            RequestBody::Empty => None,
            RequestBody::Json(_) => Some("application/json"),
            RequestBody::Form(_) => Some("application/x-www-form-urlencoded"),
        }
    }

    pub fn into_text(self) -> Option<String> {
        match self {
            RequestBody::Empty => None,
            RequestBody::Json(value) => Some(value.to_string()),
            RequestBody::Form(encoded) => Some(encoded),
        }
    }
}

fn encode_pairs(fields: &[(&str, &str)]) -> String {
    fields
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

/// A trait that defines the request-response relationship and metadata for an API endpoint.
pub trait ApiRequest {
    /// The response type returned by this request.
    type Response: DeserializeOwned;
    /// The HTTP method.
    const METHOD: HttpMethod;
    /// Whether the bearer token should be attached.
    const REQUIRES_AUTH: bool = true;

    /// The URL path, without query string.
    fn path(&self) -> String;

    /// Query parameters, encoded by [`ApiRequest::target`].
    fn query(&self) -> Vec<(&'static str, String)> {
        Vec::new()
    }

    fn body(&self) -> Result<RequestBody, serde_json::Error> {
        Ok(RequestBody::Empty)
    }

    /// Path plus encoded query string.
    fn target(&self) -> String {
        let query = self.query();
        if query.is_empty() {
            return self.path();
        }
        let pairs: Vec<(&str, &str)> = query.iter().map(|(k, v)| (*k, v.as_str())).collect();
        format!("{}?{}", self.path(), encode_pairs(&pairs))
    }
}

fn api(path: &str) -> String {
    format!("{}{}", API_PREFIX, path)
}

/// Pagination shared by list endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub skip: u32,
    pub limit: u32,
}

impl Default for Page {
    fn default() -> Self {
        Self { skip: 0, limit: 100 }
    }
}

impl Page {
    fn query(&self) -> Vec<(&'static str, String)> {
        vec![("skip", self.skip.to_string()), ("limit", self.limit.to_string())]
    }
}

// =========================================================
// Auth
// =========================================================

/// OAuth2 password form login. The email goes in the `username` field.
#[derive(Debug, Clone)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl ApiRequest for LoginRequest {
    type Response = AccessToken;
    const METHOD: HttpMethod = HttpMethod::Post;
    const REQUIRES_AUTH: bool = false;

    fn path(&self) -> String {
        api("/auth/login")
    }

    fn body(&self) -> Result<RequestBody, serde_json::Error> {
        Ok(RequestBody::form(&[
            ("username", &self.email),
            ("password", &self.password),
        ]))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
}

impl ApiRequest for SignupRequest {
    type Response = AccessToken;
    const METHOD: HttpMethod = HttpMethod::Post;
    const REQUIRES_AUTH: bool = false;

    fn path(&self) -> String {
        api("/auth/signup")
    }

    fn body(&self) -> Result<RequestBody, serde_json::Error> {
        RequestBody::json(self)
    }
}

// =========================================================
// Inventory
// =========================================================

#[derive(Debug, Clone, Default)]
pub struct ListProductsRequest {
    pub page: Page,
}

impl ApiRequest for ListProductsRequest {
    type Response = Vec<Product>;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        api("/inventory/")
    }

    fn query(&self) -> Vec<(&'static str, String)> {
        self.page.query()
    }
}

#[derive(Debug, Clone)]
pub struct GetProductRequest {
    pub product_id: i64,
}

impl ApiRequest for GetProductRequest {
    type Response = Product;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        api(&format!("/inventory/{}", self.product_id))
    }
}

#[derive(Debug, Clone)]
pub struct CreateProductRequest(pub ProductDraft);

impl ApiRequest for CreateProductRequest {
    type Response = Product;
    const METHOD: HttpMethod = HttpMethod::Post;

    fn path(&self) -> String {
        api("/inventory/")
    }

    fn body(&self) -> Result<RequestBody, serde_json::Error> {
        RequestBody::json(&self.0)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct UpdateStockRequest {
    #[serde(skip)]
    pub product_id: i64,
    pub quantity_delta: i64,
}

impl ApiRequest for UpdateStockRequest {
    type Response = Product;
    const METHOD: HttpMethod = HttpMethod::Put;

    fn path(&self) -> String {
        api(&format!("/inventory/{}/stock", self.product_id))
    }

    fn body(&self) -> Result<RequestBody, serde_json::Error> {
        RequestBody::json(self)
    }
}

// =========================================================
// Orders
// =========================================================

#[derive(Debug, Clone, Default)]
pub struct ListOrdersRequest {
    pub page: Page,
}

impl ApiRequest for ListOrdersRequest {
    type Response = Vec<Order>;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        api("/orders/")
    }

    fn query(&self) -> Vec<(&'static str, String)> {
        self.page.query()
    }
}

#[derive(Debug, Clone)]
pub struct GetOrderRequest {
    pub order_id: i64,
}

impl ApiRequest for GetOrderRequest {
    type Response = Order;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        api(&format!("/orders/{}", self.order_id))
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateOrderRequest {
    pub items: Vec<OrderLine>,
}

impl ApiRequest for CreateOrderRequest {
    type Response = Order;
    const METHOD: HttpMethod = HttpMethod::Post;

    fn path(&self) -> String {
        api("/orders/")
    }

    fn body(&self) -> Result<RequestBody, serde_json::Error> {
        RequestBody::json(self)
    }
}

/// The status travels in the query string; the body is an empty JSON object.
#[derive(Debug, Clone)]
pub struct UpdateOrderStatusRequest {
    pub order_id: i64,
    pub status: OrderStatus,
}

impl ApiRequest for UpdateOrderStatusRequest {
    type Response = Order;
    const METHOD: HttpMethod = HttpMethod::Put;

    fn path(&self) -> String {
        api(&format!("/orders/{}/status", self.order_id))
    }

    fn query(&self) -> Vec<(&'static str, String)> {
        vec![("status", self.status.as_str().to_string())]
    }

    fn body(&self) -> Result<RequestBody, serde_json::Error> {
        Ok(RequestBody::Json(serde_json::json!({})))
    }
}

#[derive(Debug, Clone)]
pub struct OrderSummaryRequest {
    pub order_id: i64,
}

impl ApiRequest for OrderSummaryRequest {
    type Response = OrderSummary;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        api(&format!("/orders/{}/ai-summary", self.order_id))
    }
}

// =========================================================
// Suppliers
// =========================================================

#[derive(Debug, Clone, Default)]
pub struct ListSuppliersRequest;

impl ApiRequest for ListSuppliersRequest {
    type Response = Vec<Supplier>;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        api("/suppliers/")
    }
}

#[derive(Debug, Clone)]
pub struct CreateSupplierRequest(pub SupplierDraft);

impl ApiRequest for CreateSupplierRequest {
    type Response = Supplier;
    const METHOD: HttpMethod = HttpMethod::Post;

    fn path(&self) -> String {
        api("/suppliers/")
    }

    fn body(&self) -> Result<RequestBody, serde_json::Error> {
        RequestBody::json(&self.0)
    }
}

// =========================================================
// Analytics & AI
// =========================================================

#[derive(Debug, Clone, Default)]
pub struct DashboardRequest;

impl ApiRequest for DashboardRequest {
    type Response = AnalyticsSnapshot;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        api("/analytics/dashboard")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    pub context: String,
}

impl ChatRequest {
    /// The chat widget always asks from the dashboard context.
    pub fn from_dashboard(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            context: "dashboard".to_string(),
        }
    }
}

impl ApiRequest for ChatRequest {
    type Response = ChatReply;
    const METHOD: HttpMethod = HttpMethod::Post;

    fn path(&self) -> String {
        api("/ai/chat")
    }

    fn body(&self) -> Result<RequestBody, serde_json::Error> {
        RequestBody::json(self)
    }
}
