//! Style pool for deduplication

use std::hash::{Hash, Hasher};

use ahash::AHashMap;

use super::Style;

/// Handle to an interned [`Style`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StyleId(u32);

impl StyleId {
    /// The workbook default style, always present in every pool
    pub const DEFAULT: StyleId = StyleId(0);

    /// Raw pool index
    pub fn index(&self) -> u32 {
        self.0
    }
}

/// Interning pool for styles
///
/// Equal styles share one id, so comparing two ids is the same as comparing
/// the styles. Entries are append-only.
#[derive(Debug, Clone)]
pub struct StylePool {
    /// All unique styles (index 0 is the workbook default)
    styles: Vec<Style>,
    /// Hash -> ids with that hash
    index_map: AHashMap<u64, Vec<StyleId>>,
}

fn style_hash(style: &Style) -> u64 {
    let mut hasher = ahash::AHasher::default();
    style.hash(&mut hasher);
    hasher.finish()
}

impl StylePool {
    /// Create a pool whose default entry is `Style::default()`
    pub fn new() -> Self {
        Self::with_default(Style::default())
    }

    /// Create a pool with the given workbook default style at [`StyleId::DEFAULT`]
    pub fn with_default(default: Style) -> Self {
        let mut pool = Self {
            styles: Vec::with_capacity(64),
            index_map: AHashMap::with_capacity(64),
        };
        pool.get_or_insert(default);
        pool
    }

    /// Get or create a style, returning its id
    pub fn get_or_insert(&mut self, style: Style) -> StyleId {
        let key = style_hash(&style);
        let bucket = self.index_map.entry(key).or_default();

        if let Some(&id) = bucket
            .iter()
            .find(|id| self.styles[id.0 as usize] == style)
        {
            return id;
        }

        let id = StyleId(self.styles.len() as u32);
        bucket.push(id);
        self.styles.push(style);
        id
    }

    /// Get a style by id
    pub fn get(&self, id: StyleId) -> Option<&Style> {
        self.styles.get(id.0 as usize)
    }

    /// Get a style by id, falling back to the default for foreign ids
    pub fn resolve(&self, id: StyleId) -> &Style {
        self.styles
            .get(id.0 as usize)
            .unwrap_or_else(|| self.default_style())
    }

    /// The workbook default style
    pub fn default_style(&self) -> &Style {
        &self.styles[0]
    }

    /// Number of unique styles, including the default
    pub fn len(&self) -> usize {
        self.styles.len()
    }

    /// True if only the default style is present
    pub fn is_empty(&self) -> bool {
        self.styles.len() <= 1
    }

    /// Iterate over all styles with their ids
    pub fn iter(&self) -> impl Iterator<Item = (StyleId, &Style)> {
        self.styles
            .iter()
            .enumerate()
            .map(|(i, s)| (StyleId(i as u32), s))
    }
}

impl Default for StylePool {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::Color;

    #[test]
    fn test_default_style() {
        let pool = StylePool::new();
        assert_eq!(pool.len(), 1);
        assert!(pool.is_empty());
        assert_eq!(pool.get(StyleId::DEFAULT), Some(&Style::default()));
    }

    #[test]
    fn test_custom_default() {
        let pool = StylePool::with_default(Style::new().font_size(9.0));
        assert_eq!(pool.default_style().font.size, 9.0);
    }

    #[test]
    fn test_deduplication() {
        let mut pool = StylePool::new();

        let a = pool.get_or_insert(Style::new().bold(true));
        let b = pool.get_or_insert(Style::new().bold(true));
        let c = pool.get_or_insert(Style::new().italic(true));

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(pool.len(), 3);

        // Re-interning the default yields the default id
        assert_eq!(pool.get_or_insert(Style::default()), StyleId::DEFAULT);
    }

    #[test]
    fn test_resolve_unknown_id() {
        let mut pool = StylePool::new();
        let id = pool.get_or_insert(Style::new().fill_color(Color::RED));

        let other = StylePool::new();
        assert_eq!(other.resolve(id), &Style::default());
        assert_eq!(pool.resolve(id).fill, Some(Color::RED));
    }
}
