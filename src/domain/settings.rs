use serde::{Deserialize, Serialize};

/// Board-wide user preferences
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    #[serde(rename = "openLinkInNewTab")]
    pub open_links_in_new_tab: bool,
}
