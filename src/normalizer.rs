use crate::model::ProductDescriptor;

/// Cleans up scraped text: trimmed, whitespace runs collapsed, blanks dropped,
/// `details_text` lowercased.
pub fn normalize_descriptor(descriptor: ProductDescriptor) -> ProductDescriptor {
    ProductDescriptor {
        id: clean(descriptor.id),
        source: clean(descriptor.source),
        category: clean(descriptor.category),
        title: clean(descriptor.title),
        details_text: clean(descriptor.details_text).map(|text| text.to_lowercase()),
        price: clean(descriptor.price),
        image_url: clean(descriptor.image_url),
    }
}

fn clean(field: Option<String>) -> Option<String> {
    field
        .map(|s| s.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|s| !s.is_empty())
}
