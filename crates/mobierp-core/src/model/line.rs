use serde::{Deserialize, Serialize};

use super::{EntityId, Product};

/// One product line of a receipt, delivery or material request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentLine {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_id: Option<EntityId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product: Option<Product>,
    #[serde(default, deserialize_with = "super::number::or_zero")]
    pub quantity: f64,
    #[serde(
        default,
        deserialize_with = "super::number::optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub unit_price: Option<f64>,
}
