//! Offline commands: design previews and name normalization.
//!
//! Neither command needs a database.

use std::io::Write;

use tezweb_core::{Subdomain, TemplateId, generate_design_config, normalize_subdomain, templates};

use super::CommandError;

/// Write the design config for `seed` and `template` as pretty JSON.
///
/// # Errors
///
/// Returns `CommandError::Invalid` for an unknown template.
pub fn preview(seed: &str, template: &str, out: &mut impl Write) -> Result<(), CommandError> {
    if templates::find(template).is_none() {
        let known: Vec<&str> = templates::all().iter().map(|t| t.id).collect();
        return Err(CommandError::Invalid(format!(
            "unknown template {template:?} (known: {})",
            known.join(", ")
        )));
    }

    let config = generate_design_config(seed, &TemplateId::new(template));
    let json = serde_json::to_string_pretty(&config)
        .map_err(|e| CommandError::Invalid(e.to_string()))?;
    writeln!(out, "{json}").map_err(|e| CommandError::Invalid(e.to_string()))
}

/// Write the public name `raw` normalizes to.
///
/// # Errors
///
/// Returns `CommandError::Invalid` if nothing usable remains.
pub fn normalize(raw: &str, out: &mut impl Write) -> Result<(), CommandError> {
    let name = Subdomain::parse(raw).map_err(|e| CommandError::Invalid(e.to_string()))?;
    tracing::debug!(raw, normalized = %normalize_subdomain(raw), "Normalized");
    writeln!(out, "{name}").map_err(|e| CommandError::Invalid(e.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_writes_design_json() {
        let mut out = Vec::new();
        preview("demo-seed", "shop-lite", &mut out).unwrap();

        let json: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(json["seed"], "demo-seed");
        assert_eq!(json["templateId"], "shop-lite");
        assert_eq!(json["heroStyle"], "split-image");
    }

    #[test]
    fn test_preview_rejects_unknown_template() {
        let mut out = Vec::new();
        let err = preview("demo-seed", "nope", &mut out).unwrap_err();
        assert!(err.to_string().contains("shop-lite"));
        assert!(out.is_empty());
    }

    #[test]
    fn test_normalize() {
        let mut out = Vec::new();
        normalize("  Chai Point!! ", &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "chai-point\n");

        let mut out = Vec::new();
        assert!(normalize("!!!", &mut out).is_err());
    }
}
