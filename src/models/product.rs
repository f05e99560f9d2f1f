// src/models/product.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;

// --- Produto (linha da tabela 'products' + nome do fornecedor via JOIN) ---
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Product {
    pub code: i32,
    pub name: String,
    pub stock: i32,
    pub price: Decimal,
    pub supplier_id: i32,
    pub supplier_name: String,
    pub low_stock_threshold: i32,
    pub image: Option<String>,
    pub description: Option<String>,
    pub active: bool,
    // Contador para o controle de concorrência otimista
    pub version: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Estoque baixo é derivado, nunca persistido.
    pub fn is_low_stock(&self) -> bool {
        is_low_stock(self.stock, self.low_stock_threshold)
    }
}

pub fn is_low_stock(stock: i32, threshold: i32) -> bool {
    stock <= threshold
}

// O que o repositório precisa para inserir um produto (o código é gerado pelo banco).
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub stock: i32,
    pub price: Decimal,
    pub supplier_id: i32,
    pub supplier_name: String,
    pub low_stock_threshold: i32,
    pub image: Option<String>,
    pub description: Option<String>,
}

// --- Resposta da API (mantém os nomes de campo do contrato com o frontend) ---
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ProductResponse {
    #[serde(rename = "codigo")]
    #[schema(example = 1)]
    pub code: i32,

    #[serde(rename = "nombre")]
    #[schema(example = "Dog Food")]
    pub name: String,

    #[schema(example = 10)]
    pub stock: i32,

    #[serde(rename = "precio")]
    #[schema(value_type = f64, example = 20.0)]
    pub price: Decimal,

    #[serde(rename = "proveedor")]
    #[schema(example = "Pet Supplies SA")]
    pub supplier: String,

    #[serde(rename = "umbralMinimo")]
    #[schema(example = 5)]
    pub low_stock_threshold: i32,

    #[serde(rename = "stockBajo")]
    pub low_stock: bool,

    #[serde(rename = "imagen")]
    pub image: Option<String>,

    #[serde(rename = "descripcion")]
    pub description: Option<String>,
}

impl From<&Product> for ProductResponse {
    fn from(product: &Product) -> Self {
        Self {
            code: product.code,
            name: product.name.clone(),
            stock: product.stock,
            price: product.price,
            supplier: product.supplier_name.clone(),
            low_stock_threshold: product.low_stock_threshold,
            low_stock: product.is_low_stock(),
            image: product.image.clone(),
            description: product.description.clone(),
        }
    }
}

impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        Self::from(&product)
    }
}
