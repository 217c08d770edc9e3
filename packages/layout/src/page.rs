use serde::{Deserialize, Serialize};

/// Landing page entry as known to the content backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LandingPage {
    /// Backend entry id used when writing the layout back
    pub id: String,
    pub title: String,
    pub slug: String,
}

impl LandingPage {
    /// Stand-in page used when no content backend is configured or reachable.
    /// `prefix` distinguishes the two cases in the id (`mock`, `fallback`).
    pub fn placeholder(slug: &str, prefix: &str) -> Self {
        let title = if slug == "page-1" {
            "Demo Landing Page 1"
        } else {
            "Demo Landing Page 2"
        };

        Self {
            id: format!("{}-{}", prefix, slug),
            title: title.to_string(),
            slug: slug.to_string(),
        }
    }

    pub fn description(&self) -> String {
        format!("{} - Built with our page builder", self.title)
    }
}
