use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

lazy_static! {
    static ref GREETING: Regex =
        Regex::new(r"^(hai|halo|hi|hello|hey|p|permisi|selamat)").expect("greeting pattern");
    static ref PRODUCT_LISTING: Regex =
        Regex::new(r"(produk|barang|jual|tersedia|ada apa|apa saja|apa aja)").expect("product pattern");
    static ref FEATURED: Regex =
        Regex::new(r"(unggulan|terbaik|favorit|populer|best|rekomendasi)").expect("featured pattern");
    static ref CATEGORY_LISTING: Regex =
        Regex::new(r"(kategori|jenis|macam|tipe|varian)").expect("category pattern");
    static ref DEODORANT: Regex =
        Regex::new(r"(deodorant|deodoran|deo|roll on|roll-on)").expect("deodorant pattern");
    static ref POWDER: Regex =
        Regex::new(r"(bedak|powder|tabur|biang keringat)").expect("powder pattern");
    static ref MIST: Regex = Regex::new(r"(body mist|mist|parfum|wangi)").expect("mist pattern");
    static ref LOTION: Regex = Regex::new(r"(lotion|body lotion|pelembab)").expect("lotion pattern");
    static ref PRICE: Regex =
        Regex::new(r"(harga|price|berapa|biaya|murah|mahal)").expect("price pattern");
    static ref ABOUT: Regex =
        Regex::new(r"(tentang|about|siapa|apa itu|hibiscus|efsya|mbk|m\.b\.k)").expect("about pattern");
    static ref HOW_TO_BUY: Regex = Regex::new(
        r"(beli|order|pesan|cara|bisa|gimana|bagaimana|dimana|di mana|purchase|buy)"
    ).expect("how-to-buy pattern");
    static ref CONTACT: Regex = Regex::new(
        r"(kontak|contact|hubungi|telepon|telpon|hp|nomor|wa|whatsapp|email)"
    ).expect("contact pattern");
    static ref CERTIFICATION: Regex =
        Regex::new(r"(halal|sertifikat|bpom|aman|safe|certified)").expect("certification pattern");
    static ref THANKS: Regex =
        Regex::new(r"(terima kasih|makasih|thanks|thank you|thx|tq)").expect("thanks pattern");
}

/// Categories of recognised questions, in evaluation order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Greeting,
    ProductListing,
    CategoryListing,
    Deodorant,
    Powder,
    Mist,
    Lotion,
    Price,
    About,
    HowToBuy,
    Contact,
    Certification,
    Thanks,
    NameSearch,
    Fallback,
}

impl Intent {
    /// Guard pattern over the normalised query. `NameSearch` and `Fallback`
    /// have none and always qualify.
    pub fn pattern(self) -> Option<&'static Regex> {
        match self {
            Intent::Greeting => Some(&*GREETING),
            Intent::ProductListing => Some(&*PRODUCT_LISTING),
            Intent::CategoryListing => Some(&*CATEGORY_LISTING),
            Intent::Deodorant => Some(&*DEODORANT),
            Intent::Powder => Some(&*POWDER),
            Intent::Mist => Some(&*MIST),
            Intent::Lotion => Some(&*LOTION),
            Intent::Price => Some(&*PRICE),
            Intent::About => Some(&*ABOUT),
            Intent::HowToBuy => Some(&*HOW_TO_BUY),
            Intent::Contact => Some(&*CONTACT),
            Intent::Certification => Some(&*CERTIFICATION),
            Intent::Thanks => Some(&*THANKS),
            Intent::NameSearch | Intent::Fallback => None,
        }
    }

    pub fn matches(self, normalized: &str) -> bool {
        self.pattern().map_or(true, |re| re.is_match(normalized))
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Intent::Greeting => "greeting",
            Intent::ProductListing => "product_listing",
            Intent::CategoryListing => "category_listing",
            Intent::Deodorant => "deodorant",
            Intent::Powder => "powder",
            Intent::Mist => "mist",
            Intent::Lotion => "lotion",
            Intent::Price => "price",
            Intent::About => "about",
            Intent::HowToBuy => "how_to_buy",
            Intent::Contact => "contact",
            Intent::Certification => "certification",
            Intent::Thanks => "thanks",
            Intent::NameSearch => "name_search",
            Intent::Fallback => "fallback",
        }
    }
}

/// Nested check inside the product-listing branch.
pub fn asks_for_featured(normalized: &str) -> bool {
    FEATURED.is_match(normalized)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn greeting_is_anchored_at_start() {
        assert!(Intent::Greeting.matches("halo kak"));
        assert!(Intent::Greeting.matches("selamat pagi"));
        assert!(!Intent::Greeting.matches("kak, halo"));
    }

    #[test]
    fn greeting_catches_any_query_starting_with_p() {
        assert!(Intent::Greeting.matches("produk apa saja"));
        assert!(Intent::Greeting.matches("powder"));
    }

    #[test]
    fn family_patterns() {
        assert!(Intent::Deodorant.matches("ada roll-on?"));
        assert!(Intent::Powder.matches("obat biang keringat"));
        assert!(Intent::Mist.matches("yang wangi dong"));
        assert!(Intent::Lotion.matches("pelembab kulit"));
        assert!(!Intent::Lotion.matches("bedak"));
    }

    #[test]
    fn about_pattern_escapes_dots() {
        assert!(Intent::About.matches("produk m.b.k"));
        assert!(!Intent::About.matches("mxbxk"));
    }

    #[test]
    fn name_search_and_fallback_always_qualify() {
        assert!(Intent::NameSearch.matches("anything"));
        assert!(Intent::Fallback.matches(""));
    }

    #[test]
    fn featured_subcase() {
        assert!(asks_for_featured("lihat produk unggulan"));
        assert!(!asks_for_featured("lihat produk"));
    }
}
