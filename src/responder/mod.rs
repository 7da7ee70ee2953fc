//! Rule-based chat responder.
//!
//! A query is normalised (trim + lowercase) and run through a fixed, ordered
//! table of intents. Each intent has a guard pattern and a resolver; a
//! resolver may decline with [`Outcome::NoAnswer`] (for example when its
//! product filter comes back empty), in which case evaluation continues with
//! the next rule rather than jumping to the fallback reply.

pub mod format;
pub mod intents;
mod templates;

use serde::{ Serialize, Deserialize };
use log::debug;

use crate::catalog::CatalogSnapshot;
use crate::models::chat::Suggestion;

pub use format::{ format_price, price_label, PRICE_PLACEHOLDER };
pub use intents::Intent;
pub use templates::{
    price_range,
    DEFAULT_ADDRESS,
    DEFAULT_EMAIL,
    DEFAULT_PHONE,
    DEFAULT_PRICE_RANGE,
    DEFAULT_SITE_NAME,
};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reply {
    pub text: String,
    pub show_suggestions: bool,
}

impl Reply {
    pub fn with_suggestions(text: String) -> Self {
        Self { text, show_suggestions: true }
    }

    pub fn plain(text: String) -> Self {
        Self { text, show_suggestions: false }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    Matched(Reply),
    NoAnswer,
}

type Resolver = fn(&str, &CatalogSnapshot) -> Outcome;

struct Rule {
    intent: Intent,
    resolve: Resolver,
}

const RULES: &[Rule] = &[
    Rule { intent: Intent::Greeting, resolve: templates::greeting },
    Rule { intent: Intent::ProductListing, resolve: templates::product_listing },
    Rule { intent: Intent::CategoryListing, resolve: templates::category_listing },
    Rule { intent: Intent::Deodorant, resolve: templates::deodorant },
    Rule { intent: Intent::Powder, resolve: templates::powder },
    Rule { intent: Intent::Mist, resolve: templates::mist },
    Rule { intent: Intent::Lotion, resolve: templates::lotion },
    Rule { intent: Intent::Price, resolve: templates::price },
    Rule { intent: Intent::About, resolve: templates::about },
    Rule { intent: Intent::HowToBuy, resolve: templates::how_to_buy },
    Rule { intent: Intent::Contact, resolve: templates::contact },
    Rule { intent: Intent::Certification, resolve: templates::certification },
    Rule { intent: Intent::Thanks, resolve: templates::thanks },
    Rule { intent: Intent::NameSearch, resolve: templates::name_search },
];

/// The reply together with the intent that produced it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Resolution {
    pub intent: Intent,
    pub reply: Reply,
}

pub fn normalize(query: &str) -> String {
    query.trim().to_lowercase()
}

pub fn classify(query: &str, catalog: &CatalogSnapshot) -> Resolution {
    let normalized = normalize(query);

    for rule in RULES {
        if !rule.intent.matches(&normalized) {
            continue;
        }
        match (rule.resolve)(&normalized, catalog) {
            Outcome::Matched(reply) => {
                debug!("Query '{}' resolved as {}", normalized, rule.intent.as_str());
                return Resolution { intent: rule.intent, reply };
            }
            Outcome::NoAnswer => {
                debug!("Intent {} matched '{}' but had no data, falling through", rule.intent.as_str(), normalized);
            }
        }
    }

    debug!("Query '{}' fell back to the default reply", normalized);
    Resolution {
        intent: Intent::Fallback,
        reply: templates::fallback(&catalog.settings),
    }
}

/// Maps one user query to exactly one canned reply. Pure: the snapshot is
/// only read.
pub fn respond(query: &str, catalog: &CatalogSnapshot) -> Reply {
    classify(query, catalog).reply
}

/// Quick-reply chips shown on an empty chat and after replies that enable them.
pub fn quick_suggestions() -> Vec<Suggestion> {
    [
        ("📦 Lihat produk unggulan", "Lihat produk unggulan"),
        ("🏷️ Kategori produk", "Kategori"),
        ("💰 Kisaran Harga", "Berapa kisaran harga"),
        ("📝 Cara beli", "Cara beli"),
        ("✨ Tentang Hibiscus Efsya", "Tentang Hibiscus Efsya"),
    ]
        .into_iter()
        .map(|(text, query)| Suggestion { text: text.to_string(), query: query.to_string() })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::catalog::{ Category, Product, Settings };

    fn product(name: &str, category: &str, price: i64, featured: bool) -> Product {
        Product {
            name: name.to_string(),
            slug: name.to_lowercase().replace(' ', "-"),
            category_name: Some(category.to_string()),
            price: Some(price),
            featured,
            ..Default::default()
        }
    }

    fn category(name: &str, count: i64) -> Category {
        Category {
            name: name.to_string(),
            slug: name.to_lowercase().replace(' ', "-"),
            product_count: Some(count),
            ..Default::default()
        }
    }

    fn catalog() -> CatalogSnapshot {
        CatalogSnapshot {
            products: vec![
                product("MBK Deodorant Roll On Pink", "Deodorant Roll On", 15000, true),
                product("MBK P.O. Powder Silver Sachet", "P.O. Powder", 35000, true),
                product("MBK Bedak Biang Keringat Biru", "Bedak Biang Keringat", 9000, false),
                product("MBK Body Mist Fresh", "Body Mist", 25000, false)
            ],
            categories: vec![
                category("Deodorant Roll On", 1),
                category("P.O. Powder", 1),
                category("Bedak Biang Keringat", 1),
                category("Body Mist", 1)
            ],
            settings: Settings::from_pairs([("site_name", "Toko Wangi")]),
        }
    }

    #[test]
    fn greeting_uses_site_name_and_suggestions() {
        let reply = respond("Halo kak", &catalog());
        assert!(reply.show_suggestions);
        assert!(reply.text.contains("Toko Wangi"));

        let reply = respond("  HELLO  ", &CatalogSnapshot::default());
        assert!(reply.show_suggestions);
        assert!(reply.text.contains(DEFAULT_SITE_NAME));
    }

    #[test]
    fn category_listing_enumerates_each_name_once_in_order() {
        let snapshot = catalog();
        let resolution = classify("kategori", &snapshot);
        assert_eq!(resolution.intent, Intent::CategoryListing);
        assert!(!resolution.reply.show_suggestions);

        let mut last = 0;
        for c in &snapshot.categories {
            let line = format!("• {} (", c.name);
            assert_eq!(resolution.reply.text.matches(&line).count(), 1, "{}", c.name);
            let pos = resolution.reply.text.find(&line).unwrap();
            assert!(pos >= last);
            last = pos;
        }
    }

    #[test]
    fn featured_products_are_listed_without_suggestions() {
        let resolution = classify("lihat produk unggulan", &catalog());
        assert_eq!(resolution.intent, Intent::ProductListing);
        assert!(!resolution.reply.show_suggestions);
        assert!(resolution.reply.text.contains("MBK Deodorant Roll On Pink - Rp 15.000"));
        assert!(resolution.reply.text.contains("MBK P.O. Powder Silver Sachet - Rp 35.000"));
        assert!(!resolution.reply.text.contains("Biru"));
    }

    #[test]
    fn product_listing_without_featured_shows_sample() {
        let mut snapshot = catalog();
        for p in &mut snapshot.products {
            p.featured = false;
        }
        let resolution = classify("lihat produk unggulan", &snapshot);
        assert_eq!(resolution.intent, Intent::ProductListing);
        assert!(resolution.reply.show_suggestions);
        assert!(resolution.reply.text.contains("Kami memiliki 4 produk"));
        assert!(resolution.reply.text.contains("• MBK Body Mist Fresh (Body Mist)"));
    }

    #[test]
    fn named_product_price() {
        let resolution = classify("harga silver sachet", &catalog());
        assert_eq!(resolution.intent, Intent::Price);
        assert!(resolution.reply.text.contains("MBK P.O. Powder Silver Sachet"));
        assert!(resolution.reply.text.contains("Rp 35.000"));
        assert!(resolution.reply.text.contains("Produk berkualitas dari M.B.K Indonesia."));
    }

    #[test]
    fn price_range_when_no_product_named() {
        let resolution = classify("berapa kisaran harga", &catalog());
        assert_eq!(resolution.intent, Intent::Price);
        assert!(resolution.reply.text.contains("Rp 9.000 - Rp 35.000"));

        let mut snapshot = catalog();
        snapshot.products.iter_mut().for_each(|p| p.price = Some(p.price.unwrap() + 1000));
        let reply = respond("berapa kisaran harga", &snapshot);
        assert!(reply.text.contains("Rp 10.000 - Rp 36.000"));
    }

    #[test]
    fn price_range_defaults_on_empty_catalog() {
        let reply = respond("harga", &CatalogSnapshot::default());
        assert!(reply.text.contains("Rp 9.000 - Rp 35.000"));
        assert!(reply.show_suggestions);
    }

    #[test]
    fn unparseable_price_counts_as_zero_in_range() {
        let mut snapshot = catalog();
        snapshot.products[0].price = None;
        let reply = respond("harga murah", &snapshot);
        assert!(reply.text.contains("Rp - - Rp 35.000"));
    }

    #[test]
    fn deodorant_branch_lists_matching_products() {
        let resolution = classify("ada deodorant?", &catalog());
        assert_eq!(resolution.intent, Intent::Deodorant);
        assert!(resolution.reply.text.contains("MBK Deodorant Roll On Pink - Rp 15.000"));
    }

    #[test]
    fn deodorant_without_inventory_falls_through() {
        let mut snapshot = catalog();
        snapshot.products.retain(|p| !p.category_lower().contains("deodorant"));

        let resolution = classify("deodorant", &snapshot);
        assert_ne!(resolution.intent, Intent::Deodorant);
        assert!(!resolution.reply.text.contains("Deodorant Roll On kami"));
        assert_eq!(resolution.intent, Intent::Fallback);

        let resolution = classify("harga deodorant", &snapshot);
        assert_eq!(resolution.intent, Intent::Price);
        assert!(resolution.reply.text.contains("Range harga"));
    }

    #[test]
    fn powder_limits_to_four() {
        let mut snapshot = catalog();
        for i in 0..6 {
            snapshot.products.push(product(&format!("Bedak Extra {}", i), "Bedak", 10000, false));
        }
        let reply = respond("bedak", &snapshot);
        assert_eq!(reply.text.matches("• ").count(), 4);
    }

    #[test]
    fn mist_lists_all_matches() {
        let mut snapshot = catalog();
        for i in 0..6 {
            snapshot.products.push(product(&format!("Mist Extra {}", i), "Body Mist", 10000, false));
        }
        let resolution = classify("yang wangi", &snapshot);
        assert_eq!(resolution.intent, Intent::Mist);
        assert_eq!(resolution.reply.text.matches("• ").count(), 7);
    }

    #[test]
    fn lotion_without_products_reaches_later_rules() {
        let resolution = classify("lotion", &catalog());
        assert_eq!(resolution.intent, Intent::Fallback);
    }

    #[test]
    fn contact_uses_defaults() {
        let resolution = classify("nomor kontak", &CatalogSnapshot::default());
        assert_eq!(resolution.intent, Intent::Contact);
        assert!(resolution.reply.text.contains(DEFAULT_PHONE));
        assert!(resolution.reply.text.contains(DEFAULT_EMAIL));
        assert!(resolution.reply.text.contains(DEFAULT_ADDRESS));
    }

    #[test]
    fn about_and_how_to_buy_and_thanks() {
        assert_eq!(classify("tentang mbk", &catalog()).intent, Intent::About);
        assert_eq!(classify("cara order", &catalog()).intent, Intent::HowToBuy);
        assert_eq!(classify("sudah halal?", &catalog()).intent, Intent::Certification);
        assert_eq!(classify("makasih", &catalog()).intent, Intent::Thanks);
    }

    #[test]
    fn name_search_finds_product_by_word() {
        let resolution = classify("yang biru", &catalog());
        assert_eq!(resolution.intent, Intent::NameSearch);
        assert!(resolution.reply.text.contains("**MBK Bedak Biang Keringat Biru**"));
        assert!(resolution.reply.text.contains("Kategori: Bedak Biang Keringat"));
    }

    #[test]
    fn unmatched_query_returns_fallback() {
        let resolution = classify("zzzzz123", &catalog());
        assert_eq!(resolution.intent, Intent::Fallback);
        assert!(resolution.reply.show_suggestions);
        assert!(resolution.reply.text.starts_with("Hmm, saya belum sepenuhnya memahami"));
        assert!(resolution.reply.text.contains("Toko Wangi"));
    }

    #[test]
    fn respond_is_idempotent() {
        let snapshot = catalog();
        let before = snapshot.clone();
        for query in ["halo", "kategori", "harga silver", "zzzzz123", "bedak"] {
            assert_eq!(respond(query, &snapshot), respond(query, &snapshot));
        }
        assert_eq!(snapshot, before);
    }

    #[test]
    fn listings_without_data_fall_through() {
        let resolution = classify("ada barang?", &CatalogSnapshot::default());
        assert_ne!(resolution.intent, Intent::ProductListing);
        assert_eq!(resolution.intent, Intent::Fallback);

        let mut snapshot = catalog();
        snapshot.categories.clear();
        let resolution = classify("jenis", &snapshot);
        assert_ne!(resolution.intent, Intent::CategoryListing);
        assert_eq!(resolution.intent, Intent::Fallback);
    }

    #[test]
    fn blank_but_present_description_is_kept() {
        let mut snapshot = catalog();
        snapshot.products[2].description = Some(" ".into());
        let reply = respond("harga biru", &snapshot);
        assert!(reply.text.contains("Rp 9.000\n\n \n\nMau pesan?"));

        snapshot.products[2].description = Some(String::new());
        let reply = respond("harga biru", &snapshot);
        assert!(reply.text.contains("Produk berkualitas dari M.B.K Indonesia."));
    }

    #[test]
    fn five_quick_suggestions() {
        let suggestions = quick_suggestions();
        assert_eq!(suggestions.len(), 5);
        assert_eq!(suggestions[1].query, "Kategori");
    }
}
