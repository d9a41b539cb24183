use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_newtype!(ProductId);

/// A catalog entry. Immutable once it enters the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    pub price: Decimal,
    pub category: String,
    pub image: String,
    pub description: String,
}

impl Product {
    pub fn to_ref(&self) -> ProductRef {
        ProductRef {
            id: self.id,
            title: self.title.clone(),
            price: self.price,
            image: self.image.clone(),
        }
    }
}

/// The part of a product the cart snapshots when a line is created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRef {
    pub id: ProductId,
    pub title: String,
    pub price: Decimal,
    pub image: String,
}

impl From<&Product> for ProductRef {
    fn from(product: &Product) -> Self {
        product.to_ref()
    }
}
