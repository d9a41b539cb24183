use std::collections::HashSet;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    domain::{Product, ProductId},
    error::RecordError,
};

/// One element of the catalog endpoint's JSON array.
///
/// Extra fields (ratings and the like) are ignored. `description` may be
/// absent and defaults to empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductRecord {
    pub id: i64,
    pub title: String,
    pub price: Decimal,
    pub category: String,
    pub image: String,
    #[serde(default)]
    pub description: String,
}

impl TryFrom<ProductRecord> for Product {
    type Error = RecordError;

    fn try_from(record: ProductRecord) -> Result<Self, Self::Error> {
        let id = ProductId(record.id);
        if record.price < Decimal::ZERO {
            return Err(RecordError::NegativePrice { id });
        }
        Ok(Product {
            id,
            title: record.title,
            price: record.price,
            category: record.category,
            image: record.image,
            description: record.description,
        })
    }
}

#[derive(Debug, Default)]
pub struct DecodedRecords {
    pub products: Vec<Product>,
    pub rejected: Vec<RecordError>,
}

/// Validates each record on its own. A bad record is reported in
/// `rejected` and never fails its neighbours. The first occurrence of an id
/// wins.
pub fn decode_records(values: Vec<serde_json::Value>) -> DecodedRecords {
    let mut decoded = DecodedRecords::default();
    let mut seen = HashSet::new();

    for (index, value) in values.into_iter().enumerate() {
        let product = serde_json::from_value::<ProductRecord>(value)
            .map_err(|err| RecordError::Malformed {
                index,
                reason: err.to_string(),
            })
            .and_then(Product::try_from);

        match product {
            Ok(product) if !seen.insert(product.id) => {
                decoded
                    .rejected
                    .push(RecordError::DuplicateId { id: product.id });
            }
            Ok(product) => decoded.products.push(product),
            Err(err) => decoded.rejected.push(err),
        }
    }

    decoded
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use serde_json::json;

    use super::*;

    #[test]
    fn accepts_integer_and_fractional_prices() {
        let decoded = decode_records(vec![
            json!({"id": 5, "title": "Bracelet", "price": 695, "category": "jewelery",
                   "image": "https://img/5.jpg", "description": "gold"}),
            json!({"id": 2, "title": "Shirt", "price": 22.3, "category": "men's clothing",
                   "image": "https://img/2.jpg", "description": "slim",
                   "rating": {"rate": 4.1, "count": 259}}),
        ]);

        assert!(decoded.rejected.is_empty());
        assert_eq!(decoded.products[0].price, Decimal::from(695));
        assert_eq!(
            decoded.products[1].price,
            Decimal::from_str("22.3").expect("decimal")
        );
    }

    #[test]
    fn drops_records_missing_required_fields() {
        let decoded = decode_records(vec![
            json!({"id": 1, "title": "No price", "category": "c", "image": "i"}),
            json!({"id": 2, "title": "Ok", "price": 1, "category": "c", "image": "i"}),
        ]);

        assert_eq!(decoded.products.len(), 1);
        assert_eq!(decoded.products[0].id, ProductId(2));
        assert_eq!(decoded.products[0].description, "");
        assert!(matches!(
            decoded.rejected.as_slice(),
            [RecordError::Malformed { index: 0, .. }]
        ));
    }

    #[test]
    fn drops_negative_prices_and_duplicate_ids() {
        let decoded = decode_records(vec![
            json!({"id": 1, "title": "A", "price": -3, "category": "c", "image": "i"}),
            json!({"id": 2, "title": "B", "price": 3, "category": "c", "image": "i"}),
            json!({"id": 2, "title": "B again", "price": 4, "category": "c", "image": "i"}),
        ]);

        assert_eq!(decoded.products.len(), 1);
        assert_eq!(decoded.products[0].title, "B");
        assert_eq!(
            decoded.rejected,
            vec![
                RecordError::NegativePrice { id: ProductId(1) },
                RecordError::DuplicateId { id: ProductId(2) },
            ]
        );
    }

    #[test]
    fn wrong_field_type_is_malformed() {
        let decoded = decode_records(vec![json!({
            "id": "seven", "title": "A", "price": 1, "category": "c", "image": "i"
        })]);
        assert!(decoded.products.is_empty());
        assert_eq!(decoded.rejected.len(), 1);
    }
}
