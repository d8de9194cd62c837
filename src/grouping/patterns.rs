use serde::{Deserialize, Serialize};

/// A curated canonical label and the misspellings/variants that map to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternEntry {
    pub canonical: String,
    #[serde(default)]
    pub variants: Vec<String>,
}

impl PatternEntry {
    /// Creates a new entry.
    pub fn new<I, S>(canonical: impl Into<String>, variants: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            canonical: canonical.into(),
            variants: variants.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns true if `label` is literally the canonical label or a listed variant.
    pub fn literally_matches(&self, label: &str) -> bool {
        self.canonical == label || self.variants.iter().any(|v| v == label)
    }
}

/// Ordered table of curated patterns consulted during grouping.
///
/// Entry order is significant: when a cluster matches several entries the
/// earliest one supplies the canonical label.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PatternTable {
    entries: Vec<PatternEntry>,
}

impl PatternTable {
    /// Creates a table from entries, keeping their order.
    pub fn new(entries: Vec<PatternEntry>) -> Self {
        Self { entries }
    }

    /// Creates a table with no entries.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The table used when no patterns are configured.
    ///
    /// # Examples
    ///
    /// ```
    /// use tagnorm::grouping::PatternTable;
    ///
    /// let table = PatternTable::builtin();
    /// let latex = table.entries().iter().find(|e| e.canonical == "latex").unwrap();
    /// assert!(latex.literally_matches("latx"));
    /// ```
    pub fn builtin() -> Self {
        Self::new(vec![
            PatternEntry::new("portrait", ["portait", "potrait", "protrait", "portraits"]),
            PatternEntry::new("landscape", ["lanscape", "landscap", "landscpe", "landscapes"]),
            PatternEntry::new(
                "black and white",
                ["black white", "blackandwhite", "b&w", "monochrome"],
            ),
            PatternEntry::new("selfie", ["selfi", "selfy", "selfies"]),
            PatternEntry::new("latex", ["latx", "laytex", "latexx"]),
            PatternEntry::new("lingerie", ["lingere", "lingeri", "lingery", "lingire"]),
            PatternEntry::new("cosplay", ["cosply", "cossplay", "cos play"]),
            PatternEntry::new("wedding", ["weding", "weddin", "weddings"]),
        ])
    }

    /// Returns the entries in table order.
    pub fn entries(&self) -> &[PatternEntry] {
        &self.entries
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
