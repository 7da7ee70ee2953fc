use hibiscus_assistant::catalog::fallback::{ FallbackCatalog, FallbackData };
use hibiscus_assistant::catalog::CatalogSnapshot;
use hibiscus_assistant::responder::{ classify, respond, Intent };

fn bundled() -> CatalogSnapshot {
    FallbackCatalog::new(FallbackData::builtin().expect("bundled dataset parses")).snapshot()
}

#[test]
fn greeting_uses_bundled_site_name() {
    let reply = respond("Halo kak", &bundled());
    assert!(reply.text.contains("Hibiscus Efsya"));
    assert!(reply.show_suggestions);
}

#[test]
fn category_listing_names_each_category_once_in_order() {
    let catalog = bundled();
    let reply = respond("ada kategori apa?", &catalog);

    let mut last = 0;
    for category in &catalog.categories {
        let line = format!("• {} (", category.name);
        assert_eq!(reply.text.matches(&line).count(), 1, "{}", category.name);
        let at = reply.text.find(&line).unwrap();
        assert!(at >= last);
        last = at;
    }
    assert!(!reply.show_suggestions);
}

#[test]
fn featured_listing_only_shows_featured_products() {
    let resolution = classify("lihat produk unggulan", &bundled());
    assert_eq!(resolution.intent, Intent::ProductListing);
    assert!(resolution.reply.text.contains("• MBK Deodorant Roll On Pink (Women) - Rp 15.000"));
    assert!(resolution.reply.text.contains("MBK P.O. Powder Silver Sachet"));
    assert!(!resolution.reply.text.contains("Purple"));
    assert!(!resolution.reply.show_suggestions);
}

#[test]
fn price_question_names_the_product() {
    let resolution = classify("harga yang pink berapa?", &bundled());
    assert_eq!(resolution.intent, Intent::Price);
    assert!(resolution.reply.text.contains("MBK Deodorant Roll On Pink (Women)"));
    assert!(resolution.reply.text.contains("Rp 15.000"));
}

#[test]
fn price_range_spans_the_bundled_catalog() {
    let reply = respond("harga", &bundled());
    assert!(reply.text.contains("Rp 9.000 - Rp 35.000"));
}

#[test]
fn product_families_are_limited() {
    let catalog = bundled();

    let deodorant = respond("deodorant", &catalog);
    assert_eq!(deodorant.text.matches("• ").count(), 4);

    let mist = classify("body mist", &catalog);
    assert_eq!(mist.intent, Intent::Mist);
    assert!(mist.reply.text.contains("MBK Body Mist Fresh - Rp 25.000"));

    let lotion = classify("body lotion", &catalog);
    assert_eq!(lotion.intent, Intent::Lotion);
    assert!(lotion.reply.text.contains("MBK Body Lotion Hibiscus"));
}

#[test]
fn bare_product_word_finds_the_product() {
    let resolution = classify("yang hijau", &bundled());
    assert_eq!(resolution.intent, Intent::NameSearch);
    assert!(resolution.reply.text.contains("MBK Bedak Biang Keringat Hijau"));
    assert!(resolution.reply.text.contains("Bedak Biang Keringat"));
}

#[test]
fn gibberish_falls_back_with_suggestions() {
    let resolution = classify("zzzzz123", &bundled());
    assert_eq!(resolution.intent, Intent::Fallback);
    assert!(resolution.reply.show_suggestions);
}

#[test]
fn responding_is_idempotent() {
    let catalog = bundled();
    for query in ["halo", "kategori", "harga silver", "cara beli", "zzzzz123"] {
        assert_eq!(respond(query, &catalog), respond(query, &catalog));
    }
}
