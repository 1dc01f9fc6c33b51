use scraper::ElementRef;

/// Finds the element that holds a listing's summary fields, given the
/// anchor that links to the listing.
pub trait ContainerLocator: Send + Sync {
    fn locate_container<'a>(&self, anchor: ElementRef<'a>) -> ElementRef<'a>;
}

/// Walks up from the anchor looking for a tile/card-like class name.
/// Falls back to the anchor when nothing within `max_levels` matches.
#[derive(Debug, Clone)]
pub struct CardAncestorLocator {
    pub max_levels: usize,
    pub class_markers: Vec<String>,
}

impl Default for CardAncestorLocator {
    fn default() -> Self {
        Self {
            max_levels: 5,
            class_markers: vec!["tile".to_string(), "card".to_string(), "listing".to_string()],
        }
    }
}

impl CardAncestorLocator {
    fn looks_like_card(&self, element: &ElementRef<'_>) -> bool {
        let class = element.value().attr("class").unwrap_or("").to_lowercase();
        self.class_markers
            .iter()
            .any(|marker| class.contains(marker.as_str()))
    }
}

impl ContainerLocator for CardAncestorLocator {
    fn locate_container<'a>(&self, anchor: ElementRef<'a>) -> ElementRef<'a> {
        let mut current = anchor;
        for _ in 0..self.max_levels {
            match current.parent().and_then(ElementRef::wrap) {
                Some(parent) => {
                    if self.looks_like_card(&parent) {
                        return parent;
                    }
                    current = parent;
                }
                None => break,
            }
        }
        anchor
    }
}
