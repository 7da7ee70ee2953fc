use crate::catalog::CatalogSnapshot;
use crate::models::catalog::{ Product, Settings };

use super::format::{ format_price, price_label };
use super::intents::asks_for_featured;
use super::{ Outcome, Reply };

pub const DEFAULT_SITE_NAME: &str = "Hibiscus Efsya";
pub const DEFAULT_ABOUT: &str =
    "Hibiscus Efsya adalah brand produk perawatan tubuh dibawah naungan M.B.K Indonesia.";
pub const DEFAULT_PHONE: &str = "+62 812 3456 7890";
pub const DEFAULT_EMAIL: &str = "info@hibiscusefsya.com";
pub const DEFAULT_ADDRESS: &str = "Jakarta, Indonesia";

/// Price range quoted when the catalog holds no products.
pub const DEFAULT_PRICE_RANGE: (i64, i64) = (9000, 35000);

const FEATURED_LIMIT: usize = 4;
const SAMPLE_LIMIT: usize = 5;

struct FamilyLookup {
    keywords: &'static [&'static str],
    limit: Option<usize>,
    heading: &'static str,
    blurb: &'static str,
}

const DEODORANT_FAMILY: FamilyLookup = FamilyLookup {
    keywords: &["deodorant"],
    limit: Some(4),
    heading: "🧴 Produk Deodorant Roll On kami:",
    blurb: "Deodorant M.B.K memberikan perlindungan hingga 24 jam dari bau badan. Tersedia untuk pria dan wanita!",
};

const POWDER_FAMILY: FamilyLookup = FamilyLookup {
    keywords: &["powder", "bedak"],
    limit: Some(4),
    heading: "✨ Produk Bedak & Powder kami:",
    blurb: "Bedak tabur M.B.K membantu menyerap keringat dan memberikan aroma segar sepanjang hari!",
};

const MIST_FAMILY: FamilyLookup = FamilyLookup {
    keywords: &["mist"],
    limit: None,
    heading: "🌸 Produk Body Mist kami:",
    blurb: "Body Mist M.B.K memberikan keharuman segar yang tahan lama!",
};

const LOTION_FAMILY: FamilyLookup = FamilyLookup {
    keywords: &["lotion"],
    limit: None,
    heading: "🧴 Produk Body Lotion kami:",
    blurb: "Body Lotion M.B.K melembabkan kulit dan memberikan aroma harum!",
};

fn site_name(settings: &Settings) -> &str {
    settings.get_or("site_name", DEFAULT_SITE_NAME)
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.is_empty())
}

fn priced_line(product: &Product) -> String {
    format!("• {} - {}", product.name, price_label(product))
}

pub fn greeting(_query: &str, catalog: &CatalogSnapshot) -> Outcome {
    Outcome::Matched(
        Reply::with_suggestions(
            format!(
                "Halo! 😊 Senang bertemu dengan Anda!\n\nSaya siap membantu Anda menemukan produk {} yang tepat. Silakan tanyakan tentang produk, harga, atau kategori yang Anda cari!",
                site_name(&catalog.settings)
            )
        )
    )
}

pub fn product_listing(query: &str, catalog: &CatalogSnapshot) -> Outcome {
    if asks_for_featured(query) {
        let featured: Vec<&Product> = catalog.products
            .iter()
            .filter(|p| p.featured)
            .collect();
        if !featured.is_empty() {
            let list = featured
                .iter()
                .take(FEATURED_LIMIT)
                .map(|p| priced_line(p))
                .collect::<Vec<_>>()
                .join("\n");
            return Outcome::Matched(
                Reply::plain(
                    format!(
                        "⭐ Berikut produk unggulan kami:\n\n{}\n\nMau tahu lebih detail tentang produk tertentu? Silakan tanyakan!",
                        list
                    )
                )
            );
        }
    }

    if catalog.products.is_empty() {
        return Outcome::NoAnswer;
    }

    let sample = catalog.products
        .iter()
        .take(SAMPLE_LIMIT)
        .map(|p| format!("• {} ({})", p.name, non_empty(p.category_name.as_deref()).unwrap_or("Kategori")))
        .collect::<Vec<_>>()
        .join("\n");

    Outcome::Matched(
        Reply::with_suggestions(
            format!(
                "📦 Kami memiliki {} produk perawatan tubuh berkualitas!\n\nBeberapa produk kami:\n{}\n\nKetik nama produk untuk info lebih detail, atau tanyakan berdasarkan kategori!",
                catalog.products.len(),
                sample
            )
        )
    )
}

pub fn category_listing(_query: &str, catalog: &CatalogSnapshot) -> Outcome {
    if catalog.categories.is_empty() {
        return Outcome::NoAnswer;
    }

    let list = catalog.categories
        .iter()
        .map(|c| format!("• {} ({} produk)", c.name, c.product_count.unwrap_or(0)))
        .collect::<Vec<_>>()
        .join("\n");

    Outcome::Matched(
        Reply::plain(
            format!(
                "🏷️ Kategori produk kami:\n\n{}\n\nMau lihat produk dari kategori tertentu? Ketik nama kategorinya!",
                list
            )
        )
    )
}

fn family_reply(family: &FamilyLookup, catalog: &CatalogSnapshot) -> Outcome {
    let matches: Vec<&Product> = catalog.products
        .iter()
        .filter(|p| {
            let category = p.category_lower();
            let name = p.name_lower();
            family.keywords.iter().any(|kw| category.contains(kw) || name.contains(kw))
        })
        .collect();

    if matches.is_empty() {
        return Outcome::NoAnswer;
    }

    let list = matches
        .iter()
        .take(family.limit.unwrap_or(usize::MAX))
        .map(|p| priced_line(p))
        .collect::<Vec<_>>()
        .join("\n");

    Outcome::Matched(Reply::with_suggestions(format!("{}\n\n{}\n\n{}", family.heading, list, family.blurb)))
}

pub fn deodorant(_query: &str, catalog: &CatalogSnapshot) -> Outcome {
    family_reply(&DEODORANT_FAMILY, catalog)
}

pub fn powder(_query: &str, catalog: &CatalogSnapshot) -> Outcome {
    family_reply(&POWDER_FAMILY, catalog)
}

pub fn mist(_query: &str, catalog: &CatalogSnapshot) -> Outcome {
    family_reply(&MIST_FAMILY, catalog)
}

pub fn lotion(_query: &str, catalog: &CatalogSnapshot) -> Outcome {
    family_reply(&LOTION_FAMILY, catalog)
}

/// True when the query contains the whole product name, or one of its
/// space-separated words longer than three characters.
fn mentions_product(query: &str, product: &Product) -> bool {
    let name = product.name_lower();
    if name.is_empty() {
        return false;
    }
    query.contains(&name) ||
        name.split(' ').any(|word| word.chars().count() > 3 && query.contains(word))
}

/// Min and max over every product, unparseable prices counting as zero.
pub fn price_range(products: &[Product]) -> (i64, i64) {
    let prices = products.iter().map(|p| p.price.unwrap_or(0));
    match (prices.clone().min(), prices.max()) {
        (Some(min), Some(max)) => (min, max),
        _ => DEFAULT_PRICE_RANGE,
    }
}

pub fn price(query: &str, catalog: &CatalogSnapshot) -> Outcome {
    if let Some(product) = catalog.products.iter().find(|p| mentions_product(query, p)) {
        return Outcome::Matched(
            Reply::with_suggestions(
                format!(
                    "💰 Harga {}:\n\n{}\n\n{}\n\nMau pesan? Silakan hubungi kami via WhatsApp!",
                    product.name,
                    price_label(product),
                    non_empty(product.description.as_deref()).unwrap_or(
                        "Produk berkualitas dari M.B.K Indonesia."
                    )
                )
            )
        );
    }

    let (min, max) = price_range(&catalog.products);
    Outcome::Matched(
        Reply::with_suggestions(
            format!(
                "💰 Range harga produk kami:\n\n{} - {}\n\nHarga sangat terjangkau untuk kualitas premium! Mau tahu harga produk tertentu? Sebutkan nama produknya ya!",
                format_price(Some(min)),
                format_price(Some(max))
            )
        )
    )
}

pub fn about(_query: &str, catalog: &CatalogSnapshot) -> Outcome {
    let settings = &catalog.settings;
    Outcome::Matched(
        Reply::with_suggestions(
            format!(
                "🌺 **{}**\n\n{}\n\n✅ Bersertifikat Halal MUI\n✅ BPOM Approved\n✅ Produksi Indonesia\n\nKami menyediakan deodorant, bedak tabur, body mist, dan body lotion berkualitas!",
                site_name(settings),
                settings.get_or("about_content", DEFAULT_ABOUT)
            )
        )
    )
}

pub fn how_to_buy(_query: &str, catalog: &CatalogSnapshot) -> Outcome {
    Outcome::Matched(
        Reply::with_suggestions(
            format!(
                "🛒 Cara membeli produk {}:\n\n1️⃣ Pilih produk yang Anda inginkan di katalog kami\n2️⃣ Catat produk yang ingin dibeli\n3️⃣ Hubungi kami via WhatsApp\n4️⃣ Konfirmasi pesanan dan alamat pengiriman\n5️⃣ Lakukan pembayaran\n6️⃣ Produk akan dikirim ke alamat Anda!\n\n📱 Klik tombol \"Chat WhatsApp\" di bawah untuk langsung terhubung dengan tim kami!",
                site_name(&catalog.settings)
            )
        )
    )
}

pub fn contact(_query: &str, catalog: &CatalogSnapshot) -> Outcome {
    let settings = &catalog.settings;
    Outcome::Matched(
        Reply::with_suggestions(
            format!(
                "📞 Hubungi Kami:\n\n📱 WhatsApp: {}\n📧 Email: {}\n📍 Lokasi: {}\n\nAtau klik tombol \"Chat WhatsApp\" untuk langsung terhubung dengan tim kami!",
                settings.get_or("contact_phone", DEFAULT_PHONE),
                settings.get_or("contact_email", DEFAULT_EMAIL),
                settings.get_or("contact_address", DEFAULT_ADDRESS)
            )
        )
    )
}

pub fn certification(_query: &str, _catalog: &CatalogSnapshot) -> Outcome {
    Outcome::Matched(
        Reply::with_suggestions(
            "✅ Keamanan Produk Kami:\n\n🕌 **Bersertifikat Halal MUI** - Aman digunakan sesuai syariat Islam\n\n🛡️ **BPOM Approved** - Telah terdaftar dan teruji di Badan POM\n\n🏭 **Produksi Indonesia** - Dibuat dengan standar kualitas tinggi\n\nSemua produk M.B.K Indonesia dijamin aman dan berkualitas!".to_string()
        )
    )
}

pub fn thanks(_query: &str, catalog: &CatalogSnapshot) -> Outcome {
    Outcome::Matched(
        Reply::with_suggestions(
            format!(
                "Sama-sama! 😊\n\nSenang bisa membantu Anda. Jika ada pertanyaan lain tentang produk {}, jangan ragu untuk bertanya ya!\n\nSemoga harimu menyenangkan! 🌸",
                site_name(&catalog.settings)
            )
        )
    )
}

pub fn name_search(query: &str, catalog: &CatalogSnapshot) -> Outcome {
    let found = catalog.products.iter().find(|p| {
        p.name_lower()
            .split(' ')
            .filter(|word| word.chars().count() > 2)
            .any(|word| query.contains(word))
    });

    match found {
        Some(product) =>
            Outcome::Matched(
                Reply::with_suggestions(
                    format!(
                        "📦 **{}**\n\n💰 Harga: {}\n📂 Kategori: {}\n\n{}\n\nTertarik? Hubungi kami via WhatsApp untuk pemesanan!",
                        product.name,
                        price_label(product),
                        non_empty(product.category_name.as_deref()).unwrap_or("-"),
                        non_empty(product.description.as_deref()).unwrap_or(
                            "Produk perawatan tubuh berkualitas dari M.B.K Indonesia."
                        )
                    )
                )
            ),
        None => Outcome::NoAnswer,
    }
}

pub fn fallback(settings: &Settings) -> Reply {
    Reply::with_suggestions(
        format!(
            "Hmm, saya belum sepenuhnya memahami pertanyaan Anda. 🤔\n\nAnda bisa bertanya tentang:\n• Produk dan harga\n• Kategori produk\n• Cara pembelian\n• Informasi tentang {}\n\nAtau jika butuh bantuan lebih lanjut, silakan chat langsung dengan tim kami via WhatsApp! 👇",
            site_name(settings)
        )
    )
}
