use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub mod protocol;

// =========================================================
// 常量定义 (Constants)
// =========================================================

pub const API_PREFIX: &str = "/api/v1";
pub const HEADER_AUTHORIZATION: &str = "Authorization";
pub const BEARER_PREFIX: &str = "Bearer ";

/// 库存低于该值时视为低库存
pub const LOW_STOCK_THRESHOLD: i64 = 10;

/// 生成 `Authorization` 头的值
pub fn bearer(token: &str) -> String {
    format!("{}{}", BEARER_PREFIX, token)
}

// =========================================================
// 供应商 (Suppliers)
// =========================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SupplierDraft {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Supplier {
    pub id: i64,
    #[serde(flatten)]
    pub base: SupplierDraft,
    #[serde(default)]
    pub on_time_delivery_rate: f64,
}

// =========================================================
// 商品 (Products)
// =========================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductDraft {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: f64,
    pub stock_quantity: i64,
    #[serde(default)]
    pub supplier_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    #[serde(flatten)]
    pub base: ProductDraft,
    #[serde(default)]
    pub supplier: Option<Supplier>,
}

impl Product {
    pub fn is_low_stock(&self) -> bool {
        self.base.stock_quantity < LOW_STOCK_THRESHOLD
    }
}

// =========================================================
// 订单 (Orders)
// =========================================================

/// 订单状态
///
/// 后端新增的状态会落到 `Unknown`，而不是让整个列表解析失败。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Created,
    Confirmed,
    Fulfilled,
    Shipped,
    Delivered,
    Cancelled,
    #[serde(other)]
    Unknown,
}

/// 状态徽章的色调
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusTone {
    Warning,
    Info,
    Progress,
    Success,
    Danger,
    Neutral,
}

/// 状态徽章的图标
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusIcon {
    Clock,
    CheckCircle,
    Truck,
    Package,
    XCircle,
    ShoppingCart,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Created => "CREATED",
            OrderStatus::Confirmed => "CONFIRMED",
            OrderStatus::Fulfilled => "FULFILLED",
            OrderStatus::Shipped => "SHIPPED",
            OrderStatus::Delivered => "DELIVERED",
            OrderStatus::Cancelled => "CANCELLED",
            OrderStatus::Unknown => "UNKNOWN",
        }
    }

    pub fn tone(&self) -> StatusTone {
        match self {
            OrderStatus::Created => StatusTone::Warning,
            OrderStatus::Confirmed => StatusTone::Info,
            OrderStatus::Fulfilled | OrderStatus::Shipped => StatusTone::Progress,
            OrderStatus::Delivered => StatusTone::Success,
            OrderStatus::Cancelled => StatusTone::Danger,
            OrderStatus::Unknown => StatusTone::Neutral,
        }
    }

    pub fn icon(&self) -> StatusIcon {
        match self {
            OrderStatus::Created => StatusIcon::Clock,
            OrderStatus::Confirmed => StatusIcon::CheckCircle,
            OrderStatus::Fulfilled | OrderStatus::Shipped => StatusIcon::Truck,
            OrderStatus::Delivered => StatusIcon::Package,
            OrderStatus::Cancelled => StatusIcon::XCircle,
            OrderStatus::Unknown => StatusIcon::ShoppingCart,
        }
    }

    /// 只有刚创建的订单可以被标记为已履约
    pub fn can_fulfill(&self) -> bool {
        matches!(self, OrderStatus::Created)
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLine {
    pub product_id: i64,
    pub quantity: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub id: i64,
    #[serde(flatten)]
    pub line: OrderLine,
    pub price_at_purchase: f64,
    #[serde(default)]
    pub product: Option<Product>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: i64,
    pub user_id: i64,
    pub status: OrderStatus,
    pub total_amount: f64,
    /// 后端返回的 ISO 8601 字符串，客户端不做解析
    pub created_at: String,
    #[serde(default)]
    pub items: Vec<OrderItem>,
}

/// 按订单 ID 倒序排列（最新的在前）
pub fn sort_newest_first(orders: &mut [Order]) {
    orders.sort_by(|a, b| b.id.cmp(&a.id));
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct OrderSummary {
    #[serde(default)]
    pub summary: Option<String>,
}

// =========================================================
// 分析 (Analytics)
// =========================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_revenue: f64,
    pub total_orders: i64,
    pub pending_orders: i64,
    pub low_stock_count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopProduct {
    pub id: i64,
    pub name: String,
    pub total_sold: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LowStockProduct {
    pub id: i64,
    pub name: String,
    pub stock_quantity: i64,
    pub price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsSnapshot {
    pub stats: DashboardStats,
    #[serde(default)]
    pub top_selling_products: Vec<TopProduct>,
    #[serde(default)]
    pub low_stock_products: Vec<LowStockProduct>,
    /// 日期 -> 金额
    #[serde(default)]
    pub daily_revenue: BTreeMap<String, f64>,
    /// 状态 -> 订单数
    #[serde(default)]
    pub order_status_distribution: BTreeMap<String, i64>,
}

// =========================================================
// AI 助手 (Chat)
// =========================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatReply {
    pub response: String,
    #[serde(default)]
    pub actions: Vec<serde_json::Value>,
}

// =========================================================
// 认证 (Auth)
// =========================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessToken {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_status_lookups() {
        assert_eq!(OrderStatus::Created.tone(), StatusTone::Warning);
        assert_eq!(OrderStatus::Shipped.tone(), OrderStatus::Fulfilled.tone());
        assert_eq!(OrderStatus::Cancelled.icon(), StatusIcon::XCircle);
        assert_eq!(OrderStatus::Unknown.tone(), StatusTone::Neutral);
        assert!(OrderStatus::Created.can_fulfill());
        assert!(!OrderStatus::Delivered.can_fulfill());
    }

    #[test]
    fn test_unknown_status_does_not_break_parsing() {
        let status: OrderStatus = serde_json::from_str("\"RETURNED\"").unwrap();
        assert_eq!(status, OrderStatus::Unknown);
    }

    #[test]
    fn test_sort_newest_first() {
        let order = |id| Order {
            id,
            user_id: 1,
            status: OrderStatus::Created,
            total_amount: 0.0,
            created_at: "2024-01-01T00:00:00".into(),
            items: vec![],
        };
        let mut orders = vec![order(2), order(7), order(5)];
        sort_newest_first(&mut orders);
        let ids: Vec<_> = orders.iter().map(|o| o.id).collect();
        assert_eq!(ids, vec![7, 5, 2]);
    }

    #[test]
    fn test_product_low_stock_and_nested_supplier() {
        let json = r#"{
            "id": 3,
            "name": "Widget",
            "description": null,
            "price": 12.5,
            "stock_quantity": 9,
            "supplier_id": 1,
            "supplier": {"id": 1, "name": "Acme", "contact_email": null, "phone": null, "on_time_delivery_rate": 0.9}
        }"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert!(product.is_low_stock());
        assert_eq!(product.supplier.unwrap().base.name, "Acme");
    }

    #[test]
    fn test_bearer_header_value() {
        assert_eq!(bearer("abc123"), "Bearer abc123");
    }
}
