use std::fmt;

/// 1-based column holding the listing URL.
pub const URL_COLUMN: usize = 9;
/// 1-based column receiving the normalized price.
pub const PRICE_COLUMN: usize = 10;
/// 1-based column receiving the normalized quantity.
pub const QUANTITY_COLUMN: usize = 11;

/// 1-based row position in the live table. Row 1 is the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RowIndex(usize);

impl RowIndex {
    pub fn new(row: usize) -> Option<Self> {
        (row > 0).then_some(Self(row))
    }

    pub fn get(self) -> usize {
        self.0
    }
}

impl fmt::Display for RowIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Point-in-time copy of the table, read once per run.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TableSnapshot {
    rows: Vec<Vec<String>>,
}

impl TableSnapshot {
    pub fn new(rows: Vec<Vec<String>>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// URL column values below the header, in table order. Rows too short to
    /// reach the URL column are left out.
    pub fn listing_urls(&self) -> Vec<String> {
        self.data_rows()
            .filter_map(|(_, row)| row.get(URL_COLUMN - 1).cloned())
            .collect()
    }

    /// First data row whose URL cell equals `url` exactly.
    ///
    /// Duplicate URLs are not detected; later rows with the same URL are
    /// never returned.
    pub fn locate(&self, url: &str) -> Option<RowIndex> {
        self.data_rows()
            .find(|(_, row)| row.get(URL_COLUMN - 1).is_some_and(|cell| cell == url))
            .map(|(index, _)| index)
    }

    fn data_rows(&self) -> impl Iterator<Item = (RowIndex, &Vec<String>)> {
        self.rows
            .iter()
            .enumerate()
            .skip(1)
            .map(|(offset, row)| (RowIndex(offset + 1), row))
    }
}

/// A1-style cell reference such as `J2`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CellAddress(String);

impl CellAddress {
    pub fn new(column: usize, row: RowIndex) -> Self {
        Self(format!("{}{}", column_letters(column), row))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for CellAddress {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for CellAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Bijective base-26 column name: 1 -> A, 26 -> Z, 27 -> AA.
fn column_letters(column: usize) -> String {
    let mut remaining = column;
    let mut letters = Vec::new();
    while remaining > 0 {
        let digit = (remaining - 1) % 26;
        letters.push(char::from(b'A' + digit as u8));
        remaining = (remaining - 1) / 26;
    }
    letters.iter().rev().collect()
}

#[cfg(test)]
mod tests {
    use super::column_letters;

    #[test]
    fn column_letters_follow_sheet_naming() {
        assert_eq!(column_letters(1), "A");
        assert_eq!(column_letters(9), "I");
        assert_eq!(column_letters(10), "J");
        assert_eq!(column_letters(26), "Z");
        assert_eq!(column_letters(27), "AA");
        assert_eq!(column_letters(703), "AAA");
    }
}
