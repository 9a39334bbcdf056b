use super::types::Category;

/// Color given to instruments created by a directory import.
pub const DEFAULT_IMPORT_COLOR: &str = "#3b82f6";

pub fn category_color(category: Category) -> &'static str {
    match category {
        Category::Orchestral => "#3b82f6",
        Category::Synth => "#8b5cf6",
        Category::Drums => "#ef4444",
        Category::Effects => "#10b981",
        Category::Keys => "#f59e0b",
        Category::World => "#ec4899",
        Category::Vocal => "#06b6d4",
        Category::Other => "#6b7280",
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RarityTier {
    Common,
    Rare,
    Epic,
    Legendary,
}

impl RarityTier {
    pub fn label(&self) -> &'static str {
        match self {
            RarityTier::Common => "Common",
            RarityTier::Rare => "Rare",
            RarityTier::Epic => "Epic",
            RarityTier::Legendary => "Legendary",
        }
    }
}

pub fn rarity_tier(usage_count: u32) -> RarityTier {
    if usage_count >= 50 {
        RarityTier::Legendary
    } else if usage_count >= 20 {
        RarityTier::Epic
    } else if usage_count >= 5 {
        RarityTier::Rare
    } else {
        RarityTier::Common
    }
}
