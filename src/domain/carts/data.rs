//! Cart input data.

use crate::domain::carts::records::PhotoFormat;

/// A photo selection heading into the cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCartItem {
    pub photo_id: String,
    pub event_id: String,
    pub quantity: u32,
    /// Requested product format. `None` means the caller did not choose one
    /// and the digital default applies.
    pub format: Option<PhotoFormat>,
    pub thumbnail_url: Option<String>,
}

impl NewCartItem {
    /// The format that will actually be ordered.
    #[must_use]
    pub fn effective_format(&self) -> PhotoFormat {
        self.format.unwrap_or_default()
    }

    /// Normalised copy with the format made explicit.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        self.format = Some(self.effective_format());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unspecified_format_defaults_to_digital() {
        let item = NewCartItem {
            photo_id: "photo-1".to_owned(),
            event_id: "event-1".to_owned(),
            quantity: 1,
            format: None,
            thumbnail_url: None,
        };

        assert_eq!(item.effective_format(), PhotoFormat::Digital);
        assert_eq!(item.normalized().format, Some(PhotoFormat::Digital));
    }

    #[test]
    fn chosen_format_is_kept() {
        let item = NewCartItem {
            photo_id: "photo-1".to_owned(),
            event_id: "event-1".to_owned(),
            quantity: 1,
            format: Some(PhotoFormat::PrintLarge),
            thumbnail_url: None,
        };

        assert_eq!(item.effective_format(), PhotoFormat::PrintLarge);
    }
}
