//! Common data types used throughout the application

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// User profile returned by the authentication endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub email: String,
    pub name: Option<String>,
    /// Organization the user belongs to
    pub org_id: String,
    pub role: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Order summary as returned by the orders endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    /// Human-readable order reference (e.g., "WF-2024-00042")
    pub reference: String,
    pub status: String,
    pub line_count: u32,
    pub created_at: DateTime<Utc>,
}

/// Stock level for a single item at a single warehouse
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockLevel {
    pub item_id: String,
    pub warehouse_id: String,
    pub quantity_on_hand: i64,
    pub quantity_reserved: i64,
    pub updated_at: DateTime<Utc>,
}
