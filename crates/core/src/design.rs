//! Deterministic design configuration.
//!
//! A [`DesignConfig`] is derived purely from a seed string: the seed drives a
//! [`SeededRandom`] which picks one entry from each fixed candidate list, in a
//! fixed field order (hero style, palette, fonts, layout). The section order is
//! never drawn.
//!
//! The template ID is recorded on the result but does not take part in the
//! draw. Callers that want per-template variety build the seed with
//! [`SiteSeed::for_owner`], which embeds the template ID.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::random::SeededRandom;
use crate::types::{OwnerId, TemplateId};

/// Visual treatment of the hero section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HeroStyle {
    Minimal,
    SplitImage,
    GradientSpotlight,
    Boxed,
}

/// Overall page layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LayoutStyle {
    Classic,
    Editorial,
    Cards,
    CleanGrid,
}

/// A renderable section of a generated site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SectionKey {
    AiHero,
    BusinessIdentity,
    SocialIcons,
    Products,
    Gallery,
    About,
    LocationMap,
    Whatsapp,
    Contact,
}

/// A named color bundle.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColorPalette {
    pub id: Cow<'static, str>,
    pub name: Cow<'static, str>,
    pub primary: Cow<'static, str>,
    pub secondary: Cow<'static, str>,
    pub accent: Cow<'static, str>,
    pub background: Cow<'static, str>,
    pub text: Cow<'static, str>,
}

/// Heading and body typefaces.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FontPair {
    pub id: Cow<'static, str>,
    pub heading: Cow<'static, str>,
    pub body: Cow<'static, str>,
}

/// The visual choices applied to a generated site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DesignConfig {
    pub seed: String,
    pub template_id: TemplateId,
    pub hero_style: HeroStyle,
    pub palette: ColorPalette,
    pub fonts: FontPair,
    pub layout: LayoutStyle,
    pub section_order: Vec<SectionKey>,
}

pub const HERO_STYLES: [HeroStyle; 4] = [
    HeroStyle::Minimal,
    HeroStyle::SplitImage,
    HeroStyle::GradientSpotlight,
    HeroStyle::Boxed,
];

pub const LAYOUT_STYLES: [LayoutStyle; 4] = [
    LayoutStyle::Classic,
    LayoutStyle::Editorial,
    LayoutStyle::Cards,
    LayoutStyle::CleanGrid,
];

const fn palette(
    id: &'static str,
    name: &'static str,
    colors: [&'static str; 5],
) -> ColorPalette {
    let [primary, secondary, accent, background, text] = colors;
    ColorPalette {
        id: Cow::Borrowed(id),
        name: Cow::Borrowed(name),
        primary: Cow::Borrowed(primary),
        secondary: Cow::Borrowed(secondary),
        accent: Cow::Borrowed(accent),
        background: Cow::Borrowed(background),
        text: Cow::Borrowed(text),
    }
}

pub const COLOR_PALETTES: [ColorPalette; 4] = [
    palette(
        "sunset-pop",
        "Sunset Pop",
        ["#FF5A5F", "#FFB400", "#2EC4B6", "#FFF8F0", "#1F2937"],
    ),
    palette(
        "ocean-tech",
        "Ocean Tech",
        ["#2563EB", "#0EA5E9", "#14B8A6", "#F0F9FF", "#0F172A"],
    ),
    palette(
        "forest-earth",
        "Forest Earth",
        ["#166534", "#65A30D", "#D97706", "#F7FEE7", "#1C1917"],
    ),
    palette(
        "violet-neo",
        "Violet Neo",
        ["#7C3AED", "#A855F7", "#EC4899", "#FAF5FF", "#111827"],
    ),
];

const fn font_pair(id: &'static str, heading: &'static str, body: &'static str) -> FontPair {
    FontPair {
        id: Cow::Borrowed(id),
        heading: Cow::Borrowed(heading),
        body: Cow::Borrowed(body),
    }
}

pub const FONT_PAIRS: [FontPair; 4] = [
    font_pair("inter-poppins", "Poppins", "Inter"),
    font_pair("montserrat-lato", "Montserrat", "Lato"),
    font_pair("spacegrotesk-manrope", "Space Grotesk", "Manrope"),
    font_pair("dmserif-opensans", "DM Serif Display", "Open Sans"),
];

/// Canonical section order shared by every design.
pub const SECTION_ORDER: [SectionKey; 9] = [
    SectionKey::AiHero,
    SectionKey::BusinessIdentity,
    SectionKey::SocialIcons,
    SectionKey::Products,
    SectionKey::Gallery,
    SectionKey::About,
    SectionKey::LocationMap,
    SectionKey::Whatsapp,
    SectionKey::Contact,
];

/// Seed string used for every design the server generates.
///
/// The convention is `"{ownerUid}:{templateId}"`, so one owner always gets the
/// same look for a given template, across restarts and machines.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SiteSeed(String);

impl SiteSeed {
    /// Build the seed for an owner's use of a template.
    #[must_use]
    pub fn for_owner(owner: &OwnerId, template: &TemplateId) -> Self {
        Self(format!("{owner}:{template}"))
    }

    /// The seed string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SiteSeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

fn pick<T: Clone, const N: usize>(candidates: &[T; N], random: &mut SeededRandom) -> T {
    let index = random.next_index(N).unwrap_or_default();
    // next_index() is always < N, and N > 0 for every candidate list
    #[allow(clippy::indexing_slicing)]
    candidates[index].clone()
}

/// Generate the design configuration for `seed`.
///
/// The style fields depend only on `seed`; `template_id` is stored as metadata.
/// Any seed is legal, including the empty string.
///
/// ```
/// use tezweb_core::design::{generate_design_config, HeroStyle, SECTION_ORDER};
/// use tezweb_core::TemplateId;
///
/// let config = generate_design_config("demo-seed", &TemplateId::new("modern-portfolio"));
/// assert_eq!(config.hero_style, HeroStyle::SplitImage);
/// assert_eq!(config.section_order, SECTION_ORDER);
/// ```
#[must_use]
pub fn generate_design_config(seed: &str, template_id: &TemplateId) -> DesignConfig {
    let mut random = SeededRandom::new(seed);

    let hero_style = pick(&HERO_STYLES, &mut random);
    let palette = pick(&COLOR_PALETTES, &mut random);
    let fonts = pick(&FONT_PAIRS, &mut random);
    let layout = pick(&LAYOUT_STYLES, &mut random);

    DesignConfig {
        seed: seed.to_owned(),
        template_id: template_id.clone(),
        hero_style,
        palette,
        fonts,
        layout,
        section_order: SECTION_ORDER.to_vec(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn template(id: &str) -> TemplateId {
        TemplateId::new(id)
    }

    #[test]
    fn test_known_seed_picks() {
        let config = generate_design_config("demo-seed", &template("modern-portfolio"));
        assert_eq!(config.hero_style, HeroStyle::SplitImage);
        assert_eq!(config.palette.id, "ocean-tech");
        assert_eq!(config.fonts.id, "spacegrotesk-manrope");
        assert_eq!(config.layout, LayoutStyle::Editorial);
    }

    #[test]
    fn test_empty_seed_is_legal_and_deterministic() {
        let config = generate_design_config("", &template(""));
        assert_eq!(config.hero_style, HeroStyle::GradientSpotlight);
        assert_eq!(config.palette.id, "sunset-pop");
        assert_eq!(config.fonts.id, "spacegrotesk-manrope");
        assert_eq!(config.layout, LayoutStyle::Classic);
        assert_eq!(config, generate_design_config("", &template("")));
    }

    #[test]
    fn test_owner_seed_convention() {
        let seed = SiteSeed::for_owner(&OwnerId::new("owner-1"), &template("modern-portfolio"));
        assert_eq!(seed.as_str(), "owner-1:modern-portfolio");

        let config = generate_design_config(seed.as_str(), &template("modern-portfolio"));
        assert_eq!(config.hero_style, HeroStyle::Boxed);
        assert_eq!(config.palette.id, "violet-neo");
        assert_eq!(config.fonts.id, "dmserif-opensans");
        assert_eq!(config.layout, LayoutStyle::CleanGrid);
    }

    #[test]
    fn test_template_id_does_not_affect_style() {
        let seeds = ["", "a", "abc", "owner-9:shop-lite", "Mumbai Chai Co."];
        for seed in seeds {
            let first = generate_design_config(seed, &template("agency-pro"));
            let second = generate_design_config(seed, &template("saas-focus"));
            assert_eq!(first.hero_style, second.hero_style);
            assert_eq!(first.palette, second.palette);
            assert_eq!(first.fonts, second.fonts);
            assert_eq!(first.layout, second.layout);
            assert_eq!(first.section_order, second.section_order);
            assert_ne!(first.template_id, second.template_id);
        }
    }

    #[test]
    fn test_section_order_is_constant() {
        for seed in ["", "x", "y", "owner:template", "🙂"] {
            let config = generate_design_config(seed, &template("creator-hub"));
            assert_eq!(config.section_order, SECTION_ORDER);
        }
    }

    #[test]
    fn test_section_order_is_copied_per_config() {
        let mut first = generate_design_config("seed", &template("shop-lite"));
        let second = generate_design_config("seed", &template("shop-lite"));
        first.section_order.reverse();
        assert_eq!(second.section_order, SECTION_ORDER);
    }

    #[test]
    fn test_distinct_seeds_usually_differ() {
        // Statistical property: 256 styles, so a handful of seeds should not
        // all collapse onto one combination.
        let styles: std::collections::HashSet<_> = (0..32)
            .map(|n| {
                let config = generate_design_config(&format!("seed-{n}"), &template("t"));
                (config.hero_style, config.palette.id, config.fonts.id, config.layout)
            })
            .collect();
        assert!(styles.len() > 1);
    }

    #[test]
    fn test_serialized_field_names() {
        let config = generate_design_config("demo-seed", &template("modern-portfolio"));
        let value = serde_json::to_value(&config).unwrap_or_default();
        assert_eq!(value["templateId"], "modern-portfolio");
        assert_eq!(value["heroStyle"], "split-image");
        assert_eq!(value["layout"], "editorial");
        assert_eq!(value["sectionOrder"][0], "aiHero");
        assert_eq!(value["sectionOrder"][6], "locationMap");
        assert_eq!(value["palette"]["primary"], "#2563EB");
    }

    #[test]
    fn test_deserialized_config_equals_original() {
        let config = generate_design_config("abc", &template("fitness-zone"));
        let json = serde_json::to_string(&config).unwrap_or_default();
        let parsed: Option<DesignConfig> = serde_json::from_str(&json).ok();
        assert_eq!(parsed, Some(config));
    }
}
