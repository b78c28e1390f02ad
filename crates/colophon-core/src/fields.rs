//! The fixed positional layout of the bulk book-entry format.
//!
//! One field per line, bound by index. Everything from [`QUOTES_START`]
//! onward is a quote line (`text|page|type|category`).

/// Index of the first quote line in a bulk entry.
pub const QUOTES_START: usize = 23;

/// Separator between the parts of a quote line.
pub const QUOTE_DELIMITER: char = '|';

/// Separator for multi-value fields (genres, main characters).
pub const LIST_DELIMITER: char = ',';

/// The scalar book fields, in bulk-line order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Title,
    Author,
    Genres,
    Rating,
    BookType,
    Pages,
    StartDate,
    EndDate,
    Year,
    Publisher,
    Language,
    Era,
    Format,
    Audience,
    Density,
    Awards,
    CoverUrl,
    MainCharacters,
    FavoriteCharacter,
    IsFavorite,
    Summary,
    Review,
    Series,
}

impl Field {
    /// Number of scalar fields before the quote region.
    pub const COUNT: usize = QUOTES_START;

    /// All fields, in bulk-line order.
    pub const ALL: [Field; Field::COUNT] = [
        Field::Title,
        Field::Author,
        Field::Genres,
        Field::Rating,
        Field::BookType,
        Field::Pages,
        Field::StartDate,
        Field::EndDate,
        Field::Year,
        Field::Publisher,
        Field::Language,
        Field::Era,
        Field::Format,
        Field::Audience,
        Field::Density,
        Field::Awards,
        Field::CoverUrl,
        Field::MainCharacters,
        Field::FavoriteCharacter,
        Field::IsFavorite,
        Field::Summary,
        Field::Review,
        Field::Series,
    ];

    /// The bulk line index this field is bound to.
    pub const fn index(self) -> usize {
        self as usize
    }

    /// The field bound to `index`, if it names a scalar field.
    pub fn from_index(index: usize) -> Option<Field> {
        Field::ALL.get(index).copied()
    }

    /// Whether the field's line holds a comma-separated list.
    pub const fn is_multi_valued(self) -> bool {
        matches!(self, Field::Genres | Field::MainCharacters)
    }

    /// Human-readable label for display.
    pub fn label(self) -> &'static str {
        match self {
            Field::Title => "title",
            Field::Author => "author",
            Field::Genres => "genres",
            Field::Rating => "rating",
            Field::BookType => "type",
            Field::Pages => "pages",
            Field::StartDate => "start date",
            Field::EndDate => "end date",
            Field::Year => "year",
            Field::Publisher => "publisher",
            Field::Language => "language",
            Field::Era => "era",
            Field::Format => "format",
            Field::Audience => "audience",
            Field::Density => "density",
            Field::Awards => "awards",
            Field::CoverUrl => "cover",
            Field::MainCharacters => "main characters",
            Field::FavoriteCharacter => "favorite character",
            Field::IsFavorite => "favorite",
            Field::Summary => "summary",
            Field::Review => "review",
            Field::Series => "series",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indices_are_stable() {
        assert_eq!(Field::Title.index(), 0);
        assert_eq!(Field::Author.index(), 1);
        assert_eq!(Field::Genres.index(), 2);
        assert_eq!(Field::Pages.index(), 5);
        assert_eq!(Field::Series.index(), 22);
        assert_eq!(Field::COUNT, 23);
    }

    #[test]
    fn from_index_round_trips() {
        for field in Field::ALL {
            assert_eq!(Field::from_index(field.index()), Some(field));
        }
        assert_eq!(Field::from_index(QUOTES_START), None);
    }

    #[test]
    fn multi_valued_fields() {
        assert!(Field::Genres.is_multi_valued());
        assert!(Field::MainCharacters.is_multi_valued());
        assert!(!Field::Title.is_multi_valued());
        assert!(!Field::Awards.is_multi_valued());
    }
}
