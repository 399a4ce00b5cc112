use serde::{Deserialize, Serialize};

/// What the document shows behind its emoji.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Background {
    #[default]
    Blank,
    Url(String),
    ImageData(Vec<u8>),
}

impl Background {
    pub fn is_blank(&self) -> bool {
        matches!(self, Self::Blank)
    }

    /// Human-readable name of where the image comes from, used in notices.
    pub fn locator(&self) -> String {
        match self {
            Self::Blank => "blank".to_owned(),
            Self::Url(url) => url.clone(),
            Self::ImageData(data) => format!("embedded image ({} bytes)", data.len()),
        }
    }
}
