use crate::document::{Background, first_emoji};

/// One item delivered by a drag-and-drop or paste source
#[derive(Debug, Clone, PartialEq)]
pub enum DropPayload {
    Text(String),
    Url(String),
    ImageBytes(Vec<u8>),
}

/// What a drop resolves to
#[derive(Debug, Clone, PartialEq)]
pub enum DropAction {
    /// Place this emoji at the drop location
    AddEmoji(String),
    /// Replace the background
    SetBackground(Background),
}

/// Resolves a multi-item drop.
///
/// Urls win over image bytes, which win over text. Anything malformed is
/// skipped; `None` means the drop changes nothing.
pub fn interpret_drop(payloads: &[DropPayload]) -> Option<DropAction> {
    let url = payloads.iter().find_map(|payload| match payload {
        DropPayload::Url(url) => normalize_url(url),
        _ => None,
    });
    if let Some(url) = url {
        return Some(DropAction::SetBackground(Background::Url(url)));
    }

    let bytes = payloads.iter().find_map(|payload| match payload {
        DropPayload::ImageBytes(bytes) if !bytes.is_empty() => Some(bytes),
        _ => None,
    });
    if let Some(bytes) = bytes {
        return Some(DropAction::SetBackground(Background::ImageData(bytes.clone())));
    }

    payloads.iter().find_map(|payload| match payload {
        DropPayload::Text(text) => {
            first_emoji(text).map(|emoji| DropAction::AddEmoji(emoji.to_owned()))
        }
        _ => None,
    })
}

/// Trims and validates a dropped url, unwrapping image-search result links.
pub fn normalize_url(url: &str) -> Option<String> {
    let url = url.trim();
    if url.is_empty() || url.chars().any(char::is_whitespace) {
        return None;
    }
    let (scheme, rest) = url.split_once("://")?;
    if scheme.is_empty() || rest.is_empty() || !scheme.chars().all(|c| c.is_ascii_alphanumeric() || "+-.".contains(c)) {
        return None;
    }
    Some(image_url(url))
}

/// Image-search result pages carry the real image in an `imgurl` query
/// parameter. Returns that parameter when present, else the url itself.
pub fn image_url(url: &str) -> String {
    let query = url
        .split_once('?')
        .map(|(_, query)| query.split('#').next().unwrap_or(query));
    let Some(query) = query else {
        return url.to_owned();
    };
    for pair in query.split('&') {
        if let Some(("imgurl", value)) = pair.split_once('=') {
            if let Ok(decoded) = urlencoding::decode(value) {
                if !decoded.is_empty() {
                    return decoded.into_owned();
                }
            }
        }
    }
    url.to_owned()
}

/// What the clipboard held when "paste background" was invoked
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Pasteboard {
    pub image: Option<Vec<u8>>,
    pub url: Option<String>,
}

impl Pasteboard {
    /// Builds a pasteboard from pasted text, keeping it only if it is a url.
    pub fn from_text(text: &str) -> Self {
        Self {
            image: None,
            url: normalize_url(text),
        }
    }

    /// The background this pasteboard would set. Image data wins over a url.
    pub fn background(&self) -> Option<Background> {
        if let Some(image) = self.image.as_ref().filter(|image| !image.is_empty()) {
            return Some(Background::ImageData(image.clone()));
        }
        self.url
            .as_deref()
            .and_then(normalize_url)
            .map(Background::Url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_with_leading_emoji_adds_it() {
        let action = interpret_drop(&[DropPayload::Text("🙂 hello".into())]);
        assert_eq!(action, Some(DropAction::AddEmoji("🙂".into())));
    }

    #[test]
    fn test_text_without_emoji_is_ignored() {
        assert_eq!(interpret_drop(&[DropPayload::Text("hello".into())]), None);
        assert_eq!(interpret_drop(&[]), None);
    }

    #[test]
    fn test_url_beats_image_beats_text() {
        let payloads = vec![
            DropPayload::Text("🙂".into()),
            DropPayload::ImageBytes(vec![1, 2, 3]),
            DropPayload::Url("https://example.com/cat.png".into()),
        ];
        assert_eq!(
            interpret_drop(&payloads),
            Some(DropAction::SetBackground(Background::Url(
                "https://example.com/cat.png".into()
            )))
        );
        assert_eq!(
            interpret_drop(&payloads[..2]),
            Some(DropAction::SetBackground(Background::ImageData(vec![1, 2, 3])))
        );
    }

    #[test]
    fn test_malformed_items_fall_through() {
        let payloads = vec![
            DropPayload::Url("not a url".into()),
            DropPayload::ImageBytes(Vec::new()),
            DropPayload::Text("🐶".into()),
        ];
        assert_eq!(
            interpret_drop(&payloads),
            Some(DropAction::AddEmoji("🐶".into()))
        );
    }

    #[test]
    fn test_image_url_unwraps_search_links() {
        let url = "https://www.google.com/imgres?imgurl=https%3A%2F%2Fexample.com%2Fdog.jpg&imgrefurl=x";
        assert_eq!(image_url(url), "https://example.com/dog.jpg");
        assert_eq!(image_url("https://example.com/a.png"), "https://example.com/a.png");
    }

    #[test]
    fn test_pasteboard_prefers_image() {
        let board = Pasteboard {
            image: Some(vec![9]),
            url: Some("https://example.com/a.png".into()),
        };
        assert_eq!(board.background(), Some(Background::ImageData(vec![9])));
        assert_eq!(Pasteboard::from_text("just words").background(), None);
        assert_eq!(Pasteboard::default().background(), None);
    }
}
