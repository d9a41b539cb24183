//! Bundled reference catalog, served when the live catalog cannot be fetched.

use rust_decimal::Decimal;

use crate::domain::{Product, ProductId};

/// Category list shown before any products are known.
pub const DEFAULT_CATEGORIES: [&str; 5] = [
    "all",
    "electronics",
    "jewelery",
    "men's clothing",
    "women's clothing",
];

const IMAGE_BASE: &str = "https://fakestoreapi.com/img";

struct Entry {
    id: i64,
    title: &'static str,
    cents: i64,
    category: &'static str,
    image: &'static str,
    description: &'static str,
}

const ENTRIES: [Entry; 10] = [
    Entry {
        id: 1,
        title: "Fjallraven - Foldsack No. 1 Backpack",
        cents: 10995,
        category: "men's clothing",
        image: "81fPKd-2AYL._AC_SL1500_.jpg",
        description: "Your perfect pack for everyday use and walks in the forest.",
    },
    Entry {
        id: 2,
        title: "Mens Casual Premium Slim Fit T-Shirts",
        cents: 2230,
        category: "men's clothing",
        image: "71-3HjGNDUL._AC_SY879._SX._UX._SY._UY_.jpg",
        description: "Slim-fitting style, contrast raglan long sleeve.",
    },
    Entry {
        id: 3,
        title: "Mens Cotton Jacket",
        cents: 5599,
        category: "men's clothing",
        image: "71li-ujtlUL._AC_UX679_.jpg",
        description: "Great outerwear jackets for Spring/Autumn/Winter.",
    },
    Entry {
        id: 4,
        title: "Mens Casual Slim Fit",
        cents: 1599,
        category: "men's clothing",
        image: "71YXzeOuslL._AC_UY879_.jpg",
        description: "The color could be slightly different between on the screen and in practice.",
    },
    Entry {
        id: 5,
        title: "John Hardy Women's Legends Naga Gold & Silver Dragon Station Chain Bracelet",
        cents: 69500,
        category: "jewelery",
        image: "71pWzhdJNwL._AC_UL640_QL65_ML3_.jpg",
        description: "From our Legends Collection, the Naga was inspired by the mythical water dragon.",
    },
    Entry {
        id: 6,
        title: "Solid Gold Petite Micropave",
        cents: 16800,
        category: "jewelery",
        image: "61sbMiUnoGL._AC_UL640_QL65_ML3_.jpg",
        description: "Satisfaction Guaranteed. Return or exchange any order within 30 days.",
    },
    Entry {
        id: 7,
        title: "White Gold Plated Princess",
        cents: 999,
        category: "jewelery",
        image: "71YAIFU48IL._AC_UL640_QL65_ML3_.jpg",
        description: "Classic Created Wedding Engagement Solitaire Diamond Promise Ring.",
    },
    Entry {
        id: 8,
        title: "Pierced Owl Rose Gold Plated Stainless Steel Double",
        cents: 1099,
        category: "jewelery",
        image: "51UDEzMJVpL._AC_UL640_QL65_ML3_.jpg",
        description: "Rose Gold Plated Double Flared Tunnel Plug Earrings.",
    },
    Entry {
        id: 9,
        title: "WD 2TB Elements Portable External Hard Drive - USB 3.0",
        cents: 6400,
        category: "electronics",
        image: "61IBBVJvSDL._AC_SY879_.jpg",
        description: "USB 3.0 and USB 2.0 Compatibility Fast data transfers.",
    },
    Entry {
        id: 10,
        title: "SanDisk SSD PLUS 1TB Internal SSD - SATA III 6 Gb/s",
        cents: 10900,
        category: "electronics",
        image: "61U7T1koQqL._AC_SX679_.jpg",
        description: "Easy upgrade for faster boot up, shutdown, application load and response.",
    },
];

pub fn fallback_products() -> Vec<Product> {
    ENTRIES
        .iter()
        .map(|entry| Product {
            id: ProductId(entry.id),
            title: entry.title.to_string(),
            price: Decimal::new(entry.cents, 2),
            category: entry.category.to_string(),
            image: format!("{IMAGE_BASE}/{}", entry.image),
            description: entry.description.to_string(),
        })
        .collect()
}
