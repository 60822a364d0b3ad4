/// Catalog path for one part category: `{group},{leaf}` appended to the
/// vehicle segment of a RockAuto catalog URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryPath {
    pub key: &'static str,
    pub group: &'static str,
    pub leaf: &'static str,
    /// Human label used for fallback listings.
    pub label: &'static str,
}

impl CategoryPath {
    const fn new(
        key: &'static str,
        group: &'static str,
        leaf: &'static str,
        label: &'static str,
    ) -> Self {
        Self {
            key,
            group,
            leaf,
            label,
        }
    }
}

pub const DEFAULT_CATEGORY: &str = "body";

/// Label used in fallback listings for categories outside the table.
pub const GENERIC_LABEL: &str = "Part";

const BODY_AND_LAMP: &str = "body+%26+lamp+assembly";

pub static CATEGORY_TABLE: &[CategoryPath] = &[
    CategoryPath::new(DEFAULT_CATEGORY, BODY_AND_LAMP, "bumper+cover", "Bumper Cover"),
    CategoryPath::new("lighting", BODY_AND_LAMP, "headlamp+assembly", "Headlamp Assembly"),
    CategoryPath::new("glass", BODY_AND_LAMP, "windshield+glass", "Windshield Glass"),
    CategoryPath::new("mirror", BODY_AND_LAMP, "mirror+-+side+view", "Side View Mirror"),
    CategoryPath::new("hood", BODY_AND_LAMP, "hood", "Hood"),
    CategoryPath::new("fender", BODY_AND_LAMP, "fender", "Fender"),
    CategoryPath::new("door", BODY_AND_LAMP, "door+shell", "Door Shell"),
    CategoryPath::new("grille", BODY_AND_LAMP, "grille", "Grille"),
    CategoryPath::new("trunk", BODY_AND_LAMP, "trunk+lid", "Trunk Lid"),
];

/// Exact table entry for a category key (trimmed, case-insensitive).
pub fn lookup(category: &str) -> Option<&'static CategoryPath> {
    let key = category.trim().to_ascii_lowercase();
    CATEGORY_TABLE.iter().find(|c| c.key == key)
}

/// Path to scrape for a category; unknown keys use the default entry.
pub fn resolve(category: &str) -> &'static CategoryPath {
    lookup(category).unwrap_or(&CATEGORY_TABLE[0])
}

/// Fallback label; unknown keys get the generic one even though they
/// scrape the default path.
pub fn part_label(category: &str) -> &'static str {
    lookup(category).map(|c| c.label).unwrap_or(GENERIC_LABEL)
}
