//! Built-in template catalog.

use serde::Serialize;

/// A selectable starting template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    pub id: &'static str,
    pub name: &'static str,
    pub image_url: &'static str,
}

/// Thumbnail given to new websites until the owner uploads one.
pub const DEFAULT_THUMBNAIL_URL: &str =
    "https://images.unsplash.com/photo-1467232004584-a241de8bcf5d?auto=format&fit=crop&w=600&q=80";

static TEMPLATES: [Template; 8] = [
    Template {
        id: "modern-portfolio",
        name: "Modern Portfolio",
        image_url: "https://images.unsplash.com/photo-1467232004584-a241de8bcf5d?auto=format&fit=crop&w=1200&q=80",
    },
    Template {
        id: "agency-pro",
        name: "Agency Pro",
        image_url: "https://images.unsplash.com/photo-1467232004584-a241de8bcf5d?auto=format&fit=crop&w=1200&q=80",
    },
    Template {
        id: "shop-lite",
        name: "Shop Lite",
        image_url: "https://images.unsplash.com/photo-1472851294608-062f824d29cc?auto=format&fit=crop&w=1200&q=80",
    },
    Template {
        id: "startup-launch",
        name: "Startup Launch",
        image_url: "https://images.unsplash.com/photo-1460925895917-afdab827c52f?auto=format&fit=crop&w=1200&q=80",
    },
    Template {
        id: "creator-hub",
        name: "Creator Hub",
        image_url: "https://images.unsplash.com/photo-1498050108023-c5249f4df085?auto=format&fit=crop&w=1200&q=80",
    },
    Template {
        id: "restaurant-glow",
        name: "Restaurant Glow",
        image_url: "https://images.unsplash.com/photo-1517248135467-4c7edcad34c4?auto=format&fit=crop&w=1200&q=80",
    },
    Template {
        id: "fitness-zone",
        name: "Fitness Zone",
        image_url: "https://images.unsplash.com/photo-1517836357463-d25dfeac3438?auto=format&fit=crop&w=1200&q=80",
    },
    Template {
        id: "saas-focus",
        name: "SaaS Focus",
        image_url: "https://images.unsplash.com/photo-1454165804606-c3d57bc86b40?auto=format&fit=crop&w=1200&q=80",
    },
];

/// Every template, in catalog order.
#[must_use]
pub fn all() -> &'static [Template] {
    &TEMPLATES
}

/// Look up a template by ID.
#[must_use]
pub fn find(id: &str) -> Option<&'static Template> {
    TEMPLATES.iter().find(|template| template.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_ids_are_unique() {
        let mut ids: Vec<_> = all().iter().map(|t| t.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 8);
    }

    #[test]
    fn test_find() {
        assert_eq!(find("shop-lite").map(|t| t.name), Some("Shop Lite"));
        assert!(find("no-such-template").is_none());
    }
}
