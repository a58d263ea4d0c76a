use std::path::Path;

use anyhow::Context as _;
use serde::{Deserialize, Serialize};

use crate::foundation::error::{ReelError, ReelResult};

/// One narration script record, supplied by an external catalog.
///
/// Records are read-only to the composer: selecting a script copies its narration into the
/// session's editable text.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Script {
    /// Stable catalog id.
    pub id: String,
    /// Display title, also used for the suggested output file name.
    pub title: String,
    /// Opening hook line.
    pub hook: String,
    /// Niche label (e.g. "productivity").
    pub niche: String,
    /// Full narration text.
    pub narration_text: String,
    /// Free-form tags.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Trend score in `0..=100`.
    pub trend_score: u8,
    /// Target duration in seconds.
    pub duration_seconds: u32,
}

impl Script {
    /// Validate field ranges.
    pub fn validate(&self) -> ReelResult<()> {
        if self.id.trim().is_empty() {
            return Err(ReelError::validation("script id must be non-empty"));
        }
        if self.title.trim().is_empty() {
            return Err(ReelError::validation(format!(
                "script '{}' title must be non-empty",
                self.id
            )));
        }
        if self.trend_score > 100 {
            return Err(ReelError::validation(format!(
                "script '{}' trend score must be within 0..=100, got {}",
                self.id, self.trend_score
            )));
        }
        Ok(())
    }

    /// Suggested download name: lowercased title, whitespace runs replaced by `-`, suffixed
    /// with `-short.webm`.
    pub fn suggested_file_name(&self) -> String {
        suggested_file_name(&self.title)
    }

    /// Parse a single record or an array of records from JSON.
    pub fn catalog_from_json_str(s: &str) -> ReelResult<Vec<Script>> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            One(Box<Script>),
            Many(Vec<Script>),
        }

        let scripts = match serde_json::from_str::<Repr>(s)
            .map_err(|e| ReelError::serde(format!("invalid script json: {e}")))?
        {
            Repr::One(s) => vec![*s],
            Repr::Many(v) => v,
        };
        for s in &scripts {
            s.validate()?;
        }
        Ok(scripts)
    }

    /// Load a catalog (single record or array) from a JSON file.
    pub fn load_catalog(path: impl AsRef<Path>) -> ReelResult<Vec<Script>> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read script file '{}'", path.display()))?;
        Self::catalog_from_json_str(&text)
    }
}

pub(crate) fn suggested_file_name(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut in_space = false;
    for c in title.chars() {
        if c.is_whitespace() {
            if !in_space {
                slug.push('-');
            }
            in_space = true;
        } else {
            slug.extend(c.to_lowercase());
            in_space = false;
        }
    }
    format!("{slug}-short.webm")
}

#[cfg(test)]
#[path = "../../tests/unit/script/model.rs"]
mod tests;
