//! Maps free-text provider signals onto the closed [`Category`] enum,
//! detects chain establishments, and carries the per-category defaults
//! (shelter, expected wait and dwell) the time classifier relies on.

use crate::models::{Category, IndoorOutdoor, Theme};

/// Keyword → category table. Multilingual on purpose: search hits come
/// back in English, Spanish and Catalan.
const CATEGORY_KEYWORDS: &[(&str, Category)] = &[
    // Cafes and bakeries
    ("cafe", Category::Cafe),
    ("coffee", Category::Cafe),
    ("bakery", Category::Cafe),
    ("pastelería", Category::Cafe),
    ("cafetería", Category::Cafe),
    // Parks and squares
    ("park", Category::Park),
    ("parque", Category::Park),
    ("gardens", Category::Park),
    ("jardines", Category::Park),
    ("plaza", Category::Park),
    ("plaça", Category::Park),
    ("square", Category::Park),
    // Viewpoints
    ("viewpoint", Category::Viewpoint),
    ("mirador", Category::Viewpoint),
    ("bunkers", Category::Viewpoint),
    ("overlook", Category::Viewpoint),
    // Markets and shops
    ("market", Category::Market),
    ("mercado", Category::Market),
    ("mercat", Category::Market),
    ("flea", Category::Market),
    ("vintage", Category::Shopping),
    ("shop", Category::Shopping),
    ("tienda", Category::Shopping),
    ("botiga", Category::Shopping),
    ("shopping", Category::Shopping),
    // Museums and galleries
    ("museum", Category::Museum),
    ("museo", Category::Museum),
    ("museu", Category::Museum),
    ("gallery", Category::Museum),
    ("galería", Category::Museum),
    ("galeria", Category::Museum),
    // Restaurants
    ("restaurant", Category::Restaurant),
    ("restaurante", Category::Restaurant),
    ("tapas", Category::Restaurant),
    ("bar", Category::Restaurant),
    ("food", Category::Restaurant),
    ("comida", Category::Restaurant),
    // Landmarks
    ("landmark", Category::Landmark),
    ("monument", Category::Landmark),
    ("monumento", Category::Landmark),
    ("cathedral", Category::Landmark),
    ("catedral", Category::Landmark),
    ("basilica", Category::Landmark),
    ("basílica", Category::Landmark),
];

/// Brands that read as chains rather than local spots
const CHAIN_KEYWORDS: &[&str] = &[
    "starbucks",
    "mcdonald",
    "burger king",
    "kfc",
    "subway",
    "h&m",
    "zara",
    "uniqlo",
    "nike",
    "adidas",
    "seven eleven",
    "family mart",
];

/// First keyword match wins; anything unmatched is `Other`
pub fn category_from_text(text: &str) -> Category {
    let text_lower = text.to_lowercase();
    CATEGORY_KEYWORDS
        .iter()
        .find(|(keyword, _)| text_lower.contains(keyword))
        .map(|(_, category)| *category)
        .unwrap_or(Category::Other)
}

pub fn is_chain_establishment(text: &str) -> bool {
    let text_lower = text.to_lowercase();
    CHAIN_KEYWORDS
        .iter()
        .any(|chain| text_lower.contains(chain))
}

impl Category {
    /// Whether places of this category are sheltered
    pub fn indoor_outdoor(&self) -> IndoorOutdoor {
        match self {
            Category::Cafe | Category::Museum | Category::Shopping | Category::Restaurant => {
                IndoorOutdoor::Indoor
            }
            Category::Park => IndoorOutdoor::Outdoor,
            Category::Viewpoint | Category::Market | Category::Landmark => IndoorOutdoor::Mixed,
            Category::Other => IndoorOutdoor::Unknown,
        }
    }

    /// Typical queueing time before the activity starts, minutes
    pub fn expected_wait_minutes(&self) -> u32 {
        match self {
            Category::Cafe => 5,
            Category::Park | Category::Viewpoint | Category::Shopping => 0,
            Category::Market | Category::Landmark | Category::Other => 3,
            Category::Museum => 15,
            Category::Restaurant => 10,
        }
    }

    /// Typical time spent at the place, minutes
    pub fn expected_dwell_minutes(&self) -> u32 {
        match self {
            Category::Cafe | Category::Shopping => 20,
            Category::Park | Category::Market | Category::Landmark | Category::Other => 15,
            Category::Viewpoint => 10,
            Category::Museum => 60,
            Category::Restaurant => 45,
        }
    }

    /// Theme a place of this category serves by default
    fn base_theme(&self) -> Option<Theme> {
        match self {
            Category::Cafe | Category::Park => Some(Theme::Relax),
            Category::Viewpoint | Category::Museum | Category::Landmark => Some(Theme::Activity),
            Category::Market | Category::Shopping => Some(Theme::Shopping),
            Category::Restaurant => Some(Theme::Food),
            Category::Other => None,
        }
    }
}

/// Theme tags for an item: the category's base theme plus anything the
/// descriptive text suggests. Deduplicated, order not significant.
pub fn theme_tags_from_text(text: &str, category: Category) -> Vec<Theme> {
    let text_lower = text.to_lowercase();
    let mut tags = Vec::new();

    if let Some(theme) = category.base_theme() {
        tags.push(theme);
    }

    let text_hits = [
        (Theme::Relax, &["quiet", "tranquil", "peaceful", "cozy"][..]),
        (Theme::Shopping, &["shop", "market", "store"][..]),
        (Theme::Food, &["food", "eat", "restaurant", "cafe"][..]),
        (
            Theme::Activity,
            &["museum", "gallery", "tour", "experience"][..],
        ),
    ];

    for (theme, words) in text_hits {
        if words.iter().any(|w| text_lower.contains(w)) && !tags.contains(&theme) {
            tags.push(theme);
        }
    }

    tags
}
