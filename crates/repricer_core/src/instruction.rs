use crate::{CellAddress, RowIndex, ScrapedListing, PRICE_COLUMN, QUANTITY_COLUMN};

/// One cell write destined for the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateInstruction {
    pub address: CellAddress,
    pub value: String,
}

impl UpdateInstruction {
    pub fn new(address: CellAddress, value: impl Into<String>) -> Self {
        Self {
            address,
            value: value.into(),
        }
    }

    /// Has a target cell. An empty value is a legitimate write: it clears
    /// the cell when the page showed text without digits.
    pub fn is_well_formed(&self) -> bool {
        !self.address.as_str().trim().is_empty()
    }
}

/// Price and quantity writes for one matched row, price first.
pub fn instructions_for(row: RowIndex, listing: &ScrapedListing) -> [UpdateInstruction; 2] {
    [
        UpdateInstruction::new(CellAddress::new(PRICE_COLUMN, row), listing.price.clone()),
        UpdateInstruction::new(
            CellAddress::new(QUANTITY_COLUMN, row),
            listing.quantity.clone(),
        ),
    ]
}
