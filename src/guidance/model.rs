//! Guidance response model — validates the generation service's output.

use serde::{Deserialize, Serialize};

use crate::error::GuidanceError;

/// One official resource the guide points at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OfficialLink {
    pub title: String,
    pub url: String,
    pub description: String,
}

/// The structured personalized output: summary, checklist, official links,
/// and questions to bring to an attorney.
///
/// Produced atomically by the generation service — an instance of this type
/// is always complete. `parse` is total and side-effect-free; persistence is
/// the caller's concern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuidanceResult {
    pub summary_text: String,
    pub checklist_items: Vec<String>,
    pub official_links: Vec<OfficialLink>,
    pub questions_to_ask: Vec<String>,
}

impl GuidanceResult {
    /// Validate a raw service response into a complete result, or reject it
    /// whole with `Malformed`. The generation contract guarantees non-empty
    /// content, so empty sections are rejected too.
    pub fn parse(raw: &serde_json::Value) -> Result<Self, GuidanceError> {
        let result: Self = serde_json::from_value(raw.clone()).map_err(|e| {
            GuidanceError::Malformed {
                reason: e.to_string(),
            }
        })?;
        result.check_complete()?;
        Ok(result)
    }

    fn check_complete(&self) -> Result<(), GuidanceError> {
        if self.summary_text.trim().is_empty() {
            return Err(malformed("summaryText is empty"));
        }
        if self.checklist_items.is_empty() {
            return Err(malformed("checklistItems is empty"));
        }
        if self.official_links.is_empty() {
            return Err(malformed("officialLinks is empty"));
        }
        if self.questions_to_ask.is_empty() {
            return Err(malformed("questionsToAsk is empty"));
        }
        if let Some(link) = self
            .official_links
            .iter()
            .find(|l| l.url.trim().is_empty() || l.title.trim().is_empty())
        {
            return Err(malformed(&format!(
                "officialLinks entry has empty title or url: {:?}",
                link.title
            )));
        }
        Ok(())
    }
}

fn malformed(reason: &str) -> GuidanceError {
    GuidanceError::Malformed {
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn well_formed() -> serde_json::Value {
        serde_json::json!({
            "summaryText": "You may be eligible to file a family petition.",
            "checklistItems": ["Gather proof of relationship", "File Form I-130"],
            "officialLinks": [{
                "title": "USCIS Form I-130",
                "url": "https://www.uscis.gov/i-130",
                "description": "Petition for Alien Relative"
            }],
            "questionsToAsk": ["Does my case qualify for consular processing?"]
        })
    }

    #[test]
    fn parse_accepts_complete_response() {
        let result = GuidanceResult::parse(&well_formed()).unwrap();
        assert_eq!(result.checklist_items.len(), 2);
        assert_eq!(result.official_links[0].title, "USCIS Form I-130");
        assert_eq!(result.questions_to_ask.len(), 1);
    }

    #[test]
    fn parse_rejects_missing_official_links() {
        let mut raw = well_formed();
        raw.as_object_mut().unwrap().remove("officialLinks");
        assert!(matches!(
            GuidanceResult::parse(&raw),
            Err(GuidanceError::Malformed { .. })
        ));
    }

    #[test]
    fn parse_rejects_missing_summary() {
        let mut raw = well_formed();
        raw.as_object_mut().unwrap().remove("summaryText");
        assert!(GuidanceResult::parse(&raw).is_err());
    }

    #[test]
    fn parse_rejects_empty_checklist() {
        let mut raw = well_formed();
        raw["checklistItems"] = serde_json::json!([]);
        assert!(GuidanceResult::parse(&raw).is_err());
    }

    #[test]
    fn parse_rejects_blank_summary() {
        let mut raw = well_formed();
        raw["summaryText"] = serde_json::json!("   ");
        assert!(GuidanceResult::parse(&raw).is_err());
    }

    #[test]
    fn parse_rejects_wrong_shape() {
        let mut raw = well_formed();
        // A bare string where a link object belongs.
        raw["officialLinks"] = serde_json::json!(["https://www.uscis.gov"]);
        assert!(GuidanceResult::parse(&raw).is_err());
    }

    #[test]
    fn parse_rejects_link_without_url() {
        let mut raw = well_formed();
        raw["officialLinks"][0]["url"] = serde_json::json!("");
        assert!(GuidanceResult::parse(&raw).is_err());
    }

    #[test]
    fn serde_roundtrip_preserves_wire_names() {
        let result = GuidanceResult::parse(&well_formed()).unwrap();
        let json = serde_json::to_value(&result).unwrap();
        assert!(json.get("summaryText").is_some());
        assert!(json.get("checklistItems").is_some());
        assert!(json.get("officialLinks").is_some());
        assert!(json.get("questionsToAsk").is_some());
        assert_eq!(GuidanceResult::parse(&json).unwrap(), result);
    }
}
