use shared::fallback::fallback_products;

use super::*;

fn item(id: i64, title: &str, cents: i64, category: &str, description: &str) -> Product {
    Product {
        id: ProductId(id),
        title: title.into(),
        price: Decimal::new(cents, 2),
        category: category.into(),
        image: format!("https://img.example/{id}.jpg"),
        description: description.into(),
    }
}

fn sample() -> Vec<Product> {
    vec![
        item(1, "Backpack", 10995, "men's clothing", "everyday pack"),
        item(2, "Gold Ring", 999, "jewelery", "Solitaire promise ring"),
        item(3, "SSD", 10900, "electronics", "fast boot"),
        item(4, "Jacket", 5599, "Men's Clothing", "outerwear"),
        item(5, "USB Drive", 999, "electronics", "portable backup"),
    ]
}

fn ids(products: &[Product]) -> Vec<i64> {
    products.iter().map(|p| p.id.0).collect()
}

#[test]
fn categories_are_all_then_first_seen_order() {
    assert_eq!(
        categories(&sample()),
        vec![
            "all",
            "men's clothing",
            "jewelery",
            "electronics",
            "Men's Clothing"
        ]
    );
}

#[test]
fn categories_of_empty_catalog_fall_back_to_defaults() {
    let defaults = categories(&[]);
    assert_eq!(defaults.first().map(String::as_str), Some("all"));
    assert_eq!(defaults.len(), DEFAULT_CATEGORIES.len());
}

#[test]
fn category_filter_is_case_insensitive_and_all_passes_through() {
    let products = sample();
    assert_eq!(ids(&filter_by_category(&products, "men's clothing")), vec![1, 4]);
    assert_eq!(ids(&filter_by_category(&products, "ELECTRONICS")), vec![3, 5]);
    assert_eq!(filter_by_category(&products, ALL_CATEGORIES), products);
    assert!(filter_by_category(&products, "toys").is_empty());
}

#[test]
fn search_matches_title_or_description_ignoring_case() {
    let products = sample();
    assert_eq!(ids(&search(&products, "ring")), vec![2]);
    assert_eq!(ids(&search(&products, "  BOOT ")), vec![3]);
    assert_eq!(ids(&search(&products, "pack")), vec![1]);
    assert_eq!(search(&products, "   "), products);
}

#[test]
fn price_sort_is_stable_in_both_directions() {
    let products = sample();
    assert_eq!(ids(&sort_by_price(&products, SortOrder::Ascending)), vec![2, 5, 4, 3, 1]);
    assert_eq!(ids(&sort_by_price(&products, SortOrder::Descending)), vec![1, 3, 4, 2, 5]);
    assert_eq!(ids(&products), vec![1, 2, 3, 4, 5]);
}

#[test]
fn queries_are_deterministic() {
    let products = fallback_products();
    let query = CatalogQuery {
        category: Some("jewelery".into()),
        search: Some("gold".into()),
        sort: Some(SortOrder::Descending),
    };
    let first = query.apply(&products);
    assert_eq!(first, query.apply(&products));
    assert_eq!(ids(&first), vec![5, 6, 8, 7]);
}

#[test]
fn lookup_by_id() {
    let products = sample();
    assert_eq!(product_by_id(&products, ProductId(3)).map(|p| p.title.as_str()), Some("SSD"));
    assert!(product_by_id(&products, ProductId(99)).is_none());
}

#[test]
fn sort_order_parses_short_and_long_forms() {
    assert_eq!("asc".parse::<SortOrder>(), Ok(SortOrder::Ascending));
    assert_eq!("Descending".parse::<SortOrder>(), Ok(SortOrder::Descending));
    assert!("sideways".parse::<SortOrder>().is_err());
}

#[test]
fn price_formatting_and_discounts() {
    assert_eq!(format_price(Decimal::new(695, 0)), "$695.00");
    assert_eq!(format_price(Decimal::new(2230, 3)), "$2.23");
    assert_eq!(format_price(Decimal::new(1005, 3)), "$1.01");
    assert_eq!(
        discounted_price(Decimal::new(10000, 2), Decimal::from(20)),
        Some(Decimal::from(80))
    );
}

#[test]
fn discount_overflow_yields_none() {
    assert_eq!(discounted_price(Decimal::MAX, Decimal::from(200)), None);
    assert_eq!(
        discounted_price(Decimal::MAX, Decimal::ZERO),
        Some(Decimal::MAX)
    );
}
