//! Remote cart gateway.
//!
//! Thin client over the marketplace cart API. Every mutating call answers
//! with the full server-held cart so the caller can replace its local state
//! wholesale; the server is the source of truth.

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use serde::{Deserialize, Serialize};

use crate::{
    domain::carts::{
        data::NewCartItem,
        records::{CartItem, PhotoFormat},
    },
    http::{Api, GatewayError, expect_success},
    pricing,
};

/// Outcome of a batch add as reported by the cart API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchAddResponse {
    /// Whether the API accepted the batch.
    pub success: bool,
    /// The updated cart, when the API returned one.
    pub cart: Option<Vec<CartItem>>,
}

/// Remote cart operations.
#[automock]
#[async_trait]
pub trait CartGateway: Send + Sync {
    /// Fetch the server-held cart.
    async fn fetch(&self) -> Result<Vec<CartItem>, GatewayError>;

    /// Add a single photo to the cart, returning the updated cart.
    async fn add_item(
        &self,
        photo_id: String,
        quantity: u32,
        format: PhotoFormat,
    ) -> Result<Vec<CartItem>, GatewayError>;

    /// Add several photos in one call.
    async fn add_items_batch(
        &self,
        items: Vec<NewCartItem>,
    ) -> Result<BatchAddResponse, GatewayError>;

    /// Change the quantity of a cart line, returning the updated cart.
    async fn update_item(
        &self,
        item_id: String,
        quantity: u32,
    ) -> Result<Vec<CartItem>, GatewayError>;

    /// Remove a cart line, returning the updated cart.
    async fn remove_item(&self, item_id: String) -> Result<Vec<CartItem>, GatewayError>;

    /// Drop every line in the server-held cart.
    async fn clear(&self) -> Result<(), GatewayError>;
}

/// [`CartGateway`] backed by the marketplace HTTP API.
#[derive(Debug, Clone)]
pub struct HttpCartGateway {
    api: Api,
}

impl HttpCartGateway {
    #[must_use]
    pub fn new(api: Api) -> Self {
        Self { api }
    }

    async fn cart_from(&self, response: reqwest::Response) -> Result<Vec<CartItem>, GatewayError> {
        let response = expect_success(response).await?;
        let cart: CartDto = response.json().await?;

        Ok(cart.into_items())
    }
}

#[async_trait]
impl CartGateway for HttpCartGateway {
    async fn fetch(&self) -> Result<Vec<CartItem>, GatewayError> {
        let response = self
            .api
            .http()
            .get(self.api.url("/api/cart"))
            .send()
            .await?;

        self.cart_from(response).await
    }

    async fn add_item(
        &self,
        photo_id: String,
        quantity: u32,
        format: PhotoFormat,
    ) -> Result<Vec<CartItem>, GatewayError> {
        let response = self
            .api
            .http()
            .post(self.api.url("/api/cart/items"))
            .json(&AddItemBody {
                photo_id: &photo_id,
                quantity,
                format,
            })
            .send()
            .await?;

        self.cart_from(response).await
    }

    async fn add_items_batch(
        &self,
        items: Vec<NewCartItem>,
    ) -> Result<BatchAddResponse, GatewayError> {
        let items: Vec<AddItemBody<'_>> = items
            .iter()
            .map(|item| AddItemBody {
                photo_id: &item.photo_id,
                quantity: item.quantity,
                format: item.effective_format(),
            })
            .collect();

        let response = self
            .api
            .http()
            .post(self.api.url("/api/cart/items/batch"))
            .json(&BatchAddBody { items })
            .send()
            .await?;

        let response = expect_success(response).await?;
        let batch: BatchAddDto = response.json().await?;

        Ok(BatchAddResponse {
            success: batch.success,
            cart: batch.cart.map(CartDto::into_items),
        })
    }

    async fn update_item(
        &self,
        item_id: String,
        quantity: u32,
    ) -> Result<Vec<CartItem>, GatewayError> {
        let response = self
            .api
            .http()
            .put(self.api.url(&format!("/api/cart/items/{item_id}")))
            .json(&UpdateItemBody { quantity })
            .send()
            .await?;

        self.cart_from(response).await
    }

    async fn remove_item(&self, item_id: String) -> Result<Vec<CartItem>, GatewayError> {
        let response = self
            .api
            .http()
            .delete(self.api.url(&format!("/api/cart/items/{item_id}")))
            .send()
            .await?;

        self.cart_from(response).await
    }

    async fn clear(&self) -> Result<(), GatewayError> {
        let response = self
            .api
            .http()
            .delete(self.api.url("/api/cart/clear"))
            .send()
            .await?;

        expect_success(response).await?;

        Ok(())
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AddItemBody<'a> {
    photo_id: &'a str,
    quantity: u32,
    format: PhotoFormat,
}

#[derive(Debug, Serialize)]
struct BatchAddBody<'a> {
    items: Vec<AddItemBody<'a>>,
}

#[derive(Debug, Serialize)]
struct UpdateItemBody {
    quantity: u32,
}

#[derive(Debug, Deserialize)]
struct CartDto {
    #[serde(default)]
    items: Vec<CartItemDto>,
}

impl CartDto {
    fn into_items(self) -> Vec<CartItem> {
        self.items.into_iter().map(CartItemDto::into_record).collect()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CartItemDto {
    id: String,
    photo_id: String,
    #[serde(default)]
    event_id: String,
    #[serde(default)]
    event_name: String,
    thumbnail_url: Option<String>,
    unit_price: u64,
    #[serde(default = "default_currency")]
    currency: String,
    quantity: u32,
    // Older API revisions call this field `productType`.
    #[serde(alias = "productType")]
    format: PhotoFormat,
    added_at: Option<Timestamp>,
}

impl CartItemDto {
    fn into_record(self) -> CartItem {
        CartItem {
            id: self.id,
            photo_id: self.photo_id,
            event_id: self.event_id,
            event_name: self.event_name,
            thumbnail_url: self.thumbnail_url,
            unit_price: self.unit_price,
            currency: self.currency,
            quantity: self.quantity,
            format: self.format,
            added_at: self.added_at.unwrap_or_else(Timestamp::now),
        }
    }
}

#[derive(Debug, Deserialize)]
struct BatchAddDto {
    success: bool,
    cart: Option<CartDto>,
}

fn default_currency() -> String {
    pricing::DEFAULT_CURRENCY.to_owned()
}
