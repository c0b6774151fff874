//! Starter content for newly created websites.
//!
//! Fills a fresh [`WebsiteContent`] from the few answers collected during
//! onboarding. Image and tagline choices come from the hash of the site seed,
//! so the same owner and template always start from the same copy.

use serde::Deserialize;

use crate::design::SiteSeed;
use crate::random::hash_seed;
use crate::types::{Language, SocialLinks, WebsiteContent};

const HERO_IMAGES: [&str; 5] = [
    "https://images.unsplash.com/photo-1556740738-b6a63e27c4df?auto=format&fit=crop&w=1400&q=80",
    "https://images.unsplash.com/photo-1515165562835-c4c8b8c92a2b?auto=format&fit=crop&w=1400&q=80",
    "https://images.unsplash.com/photo-1481437156560-3205f6a55735?auto=format&fit=crop&w=1400&q=80",
    "https://images.unsplash.com/photo-1520607162513-77705c0f0d4a?auto=format&fit=crop&w=1400&q=80",
    "https://images.unsplash.com/photo-1555396273-367ea4eb4db5?auto=format&fit=crop&w=1400&q=80",
];

const TAGLINES: [&str; 4] = [
    "No coding needed. WhatsApp powered websites.",
    "Local business, digital growth, more orders.",
    "Made for Indian shop owners and creators.",
    "Fast setup, modern design, better conversion.",
];

const DEFAULT_PRODUCTS: [&str; 3] = ["Best Seller", "Top Offer", "Premium Service"];

/// Onboarding answers for a new website.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateWebsiteInput {
    pub business_name: String,
    #[serde(default)]
    pub business_category: String,
    #[serde(default)]
    pub whatsapp_number: String,
    #[serde(default)]
    pub country_code: String,
    #[serde(default)]
    pub language: Language,
    #[serde(default)]
    pub additional_instructions: String,
}

/// Generated content for a new draft.
///
/// Drafts have no public address; one is assigned when the site is published.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StarterSite {
    pub content: WebsiteContent,
    pub thumbnail_url: String,
}

/// Build starter content for `input`.
#[must_use]
pub fn generate_starter_site(
    input: &CreateWebsiteInput,
    seed: &SiteSeed,
) -> StarterSite {
    let hash = hash_seed(seed.as_str());
    let hero = nth(&HERO_IMAGES, hash);
    let second = nth(&HERO_IMAGES, hash.wrapping_add(2));
    let name_slug = slugify(&input.business_name);

    let digits: String = input
        .whatsapp_number
        .chars()
        .filter(char::is_ascii_digit)
        .collect();

    let content = WebsiteContent {
        business_name: input.business_name.clone(),
        tagline: nth(&TAGLINES, hash).to_owned(),
        about: format!(
            "{} is a trusted {} serving customers with quality and care.",
            input.business_name,
            input.business_category.to_lowercase()
        ),
        contact_email: format!("hello@{name_slug}.in"),
        whatsapp: format!("{}{digits}", input.country_code),
        products: DEFAULT_PRODUCTS.iter().map(|&p| p.to_owned()).collect(),
        category: Some(input.business_category.clone()),
        language: Some(input.language),
        social_links: Some(SocialLinks {
            instagram: Some("#".to_owned()),
            facebook: Some("#".to_owned()),
            youtube: Some("#".to_owned()),
        }),
        gallery: vec![hero.to_owned(), second.to_owned()],
        location_label: Some("Main Branch".to_owned()),
        map_embed_url: Some("https://maps.google.com".to_owned()),
        additional_instructions: Some(input.additional_instructions.clone()),
        hero_image: Some(hero.to_owned()),
    };

    StarterSite {
        content,
        thumbnail_url: hero.to_owned(),
    }
}

/// URL-friendly form of a business name.
///
/// Lowercases, drops everything except ASCII letters, digits, whitespace and
/// `-`, trims, then joins whitespace-separated words with `-`.
#[must_use]
pub fn slugify(value: &str) -> String {
    let kept: String = value
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c.is_whitespace() || *c == '-')
        .collect();
    kept.split_whitespace().collect::<Vec<_>>().join("-")
}

fn nth(items: &[&'static str], n: u32) -> &'static str {
    let index = usize::try_from(n).unwrap_or_default() % items.len().max(1);
    items.get(index).copied().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{OwnerId, TemplateId};

    fn input() -> CreateWebsiteInput {
        CreateWebsiteInput {
            business_name: "Mumbai Chai Co".to_owned(),
            business_category: "Cafe".to_owned(),
            whatsapp_number: "98765 43210".to_owned(),
            country_code: "+91".to_owned(),
            language: Language::Hindi,
            additional_instructions: String::new(),
        }
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Mumbai Chai Co"), "mumbai-chai-co");
        assert_eq!(slugify("  Café & Bakery!  "), "caf-bakery");
        assert_eq!(slugify("a - b"), "a---b");
    }

    #[test]
    fn test_starter_site_is_seeded() {
        let seed = SiteSeed::for_owner(&OwnerId::new("owner-1"), &TemplateId::new("shop-lite"));
        let site = generate_starter_site(&input(), &seed);

        // hash("owner-1:shop-lite") = 3758331347
        assert_eq!(site.content.tagline, TAGLINES[3]);
        assert_eq!(site.content.hero_image.as_deref(), Some(HERO_IMAGES[2]));
        assert_eq!(site.content.gallery, [HERO_IMAGES[2], HERO_IMAGES[4]]);
        assert_eq!(site.thumbnail_url, HERO_IMAGES[2]);
        assert_eq!(site, generate_starter_site(&input(), &seed));
    }

    #[test]
    fn test_starter_site_contact_details() {
        let seed = SiteSeed::for_owner(&OwnerId::new("owner-1"), &TemplateId::new("shop-lite"));
        let site = generate_starter_site(&input(), &seed);

        assert_eq!(site.content.whatsapp, "+919876543210");
        assert_eq!(site.content.contact_email, "hello@mumbai-chai-co.in");
        assert_eq!(
            site.content.about,
            "Mumbai Chai Co is a trusted cafe serving customers with quality and care."
        );
        assert_eq!(site.content.language, Some(Language::Hindi));
    }
}
