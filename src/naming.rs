//! Identifier-case helpers for the synthesizers.

/// `order` / `order_item` / `order-item` -> `Order` / `OrderItem`.
///
/// Domain names are lowercase by construction, so this is the only case
/// conversion generation needs: field and variable names reuse the domain
/// name as-is.
pub fn pascal_case(name: &str) -> String {
    name.split(|c| c == '_' || c == '-' || c == ' ')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect()
}
