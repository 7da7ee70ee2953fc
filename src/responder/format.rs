use crate::models::catalog::Product;

pub const PRICE_PLACEHOLDER: &str = "Rp -";
const CURRENCY_PREFIX: &str = "Rp";

/// Renders a rupiah amount with Indonesian digit grouping: `Rp 15.000`.
/// Missing and non-positive prices render as the placeholder.
pub fn format_price(price: Option<i64>) -> String {
    match price {
        Some(amount) if amount > 0 => {
            format!("{} {}", CURRENCY_PREFIX, group_thousands(amount.unsigned_abs()))
        }
        _ => PRICE_PLACEHOLDER.to_string(),
    }
}

/// The backend's preformatted label unless empty, otherwise `format_price`.
pub fn price_label(product: &Product) -> String {
    match product.price_formatted.as_deref() {
        Some(label) if !label.is_empty() => label.to_string(),
        _ => format_price(product.price),
    }
}

fn group_thousands(amount: u64) -> String {
    let digits = amount.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_with_dot_separators() {
        assert_eq!(format_price(Some(15000)), "Rp 15.000");
        assert_eq!(format_price(Some(9000)), "Rp 9.000");
        assert_eq!(format_price(Some(1250000)), "Rp 1.250.000");
        assert_eq!(format_price(Some(500)), "Rp 500");
    }

    #[test]
    fn missing_or_non_positive_is_placeholder() {
        assert_eq!(format_price(None), PRICE_PLACEHOLDER);
        assert_eq!(format_price(Some(0)), PRICE_PLACEHOLDER);
        assert_eq!(format_price(Some(-300)), PRICE_PLACEHOLDER);
    }

    #[test]
    fn price_label_prefers_backend_formatting() {
        let mut product = Product {
            name: "MBK Body Lotion".into(),
            price: Some(22000),
            price_formatted: Some("Rp 22.000,-".into()),
            ..Default::default()
        };
        assert_eq!(price_label(&product), "Rp 22.000,-");

        product.price_formatted = Some(String::new());
        assert_eq!(price_label(&product), "Rp 22.000");

        product.price_formatted = Some("  ".into());
        assert_eq!(price_label(&product), "  ");

        product.price_formatted = None;
        product.price = None;
        assert_eq!(price_label(&product), PRICE_PLACEHOLDER);
    }
}
