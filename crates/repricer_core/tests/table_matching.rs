use pretty_assertions::assert_eq;
use repricer_core::{
    instructions_for, CellAddress, ListingUrl, RowIndex, ScrapedListing, TableSnapshot,
    UpdateInstruction, PRICE_NOT_FOUND, QUANTITY_BELOW_THRESHOLD,
};

fn row_with_url(url: &str) -> Vec<String> {
    let mut row: Vec<String> = (1..=8).map(|i| format!("c{i}")).collect();
    row.push(url.to_string());
    row
}

fn header() -> Vec<String> {
    let mut row: Vec<String> = (1..=8).map(|i| format!("h{i}")).collect();
    row.push("URL".to_string());
    row.push("Price".to_string());
    row.push("Qty".to_string());
    row
}

fn snapshot() -> TableSnapshot {
    TableSnapshot::new(vec![
        header(),
        row_with_url("https://x/1"),
        vec!["too".into(), "short".into()],
        row_with_url("https://x/2"),
        row_with_url("https://x/1"),
    ])
}

#[test]
fn locate_returns_one_based_row_of_first_match() {
    let table = snapshot();
    assert_eq!(table.locate("https://x/1"), RowIndex::new(2));
    assert_eq!(table.locate("https://x/2"), RowIndex::new(4));
}

#[test]
fn locate_never_matches_header_or_missing_urls() {
    let table = snapshot();
    assert_eq!(table.locate("URL"), None);
    assert_eq!(table.locate("https://x/3"), None);
    assert_eq!(table.locate("https://x/1/"), None);
}

#[test]
fn listing_urls_skip_header_and_short_rows() {
    let table = snapshot();
    assert_eq!(
        table.listing_urls(),
        vec!["https://x/1", "https://x/2", "https://x/1"]
    );
}

#[test]
fn empty_snapshot_matches_nothing() {
    let table = TableSnapshot::default();
    assert!(table.is_empty());
    assert_eq!(table.locate("https://x/1"), None);
    assert!(table.listing_urls().is_empty());
}

#[test]
fn matched_row_yields_price_then_quantity_cells() {
    let listing = ScrapedListing::from_raw(Some("US $12.50"), Some("7 available"));
    let row = RowIndex::new(3).unwrap();

    assert_eq!(
        instructions_for(row, &listing),
        [
            UpdateInstruction::new(CellAddress::from("J3"), "12,50"),
            UpdateInstruction::new(CellAddress::from("K3"), "7"),
        ]
    );
}

#[test]
fn missing_page_data_becomes_sentinels() {
    let listing = ScrapedListing::from_raw(None, None);
    assert_eq!(listing.price, PRICE_NOT_FOUND);
    assert_eq!(listing.quantity, QUANTITY_BELOW_THRESHOLD);
}

#[test]
fn present_text_without_digits_is_kept_stripped() {
    let listing = ScrapedListing::from_raw(Some("Free"), Some("Last one"));
    assert_eq!(listing.price, "");
    assert_eq!(listing.quantity, "");
}

#[test]
fn normalized_price_has_only_digits_and_one_comma() {
    for raw in ["$1.00", "GBP 1,299.99", "  7.5 ", "C $0.99 each"] {
        let price = ScrapedListing::from_raw(Some(raw), None).price;
        assert!(price.chars().all(|c| c.is_ascii_digit() || c == ','), "{price}");
        assert_eq!(price.matches(',').count(), 1, "{raw} -> {price}");
    }
}

#[test]
fn validated_url_matches_table_text() {
    let table = snapshot();
    let url = ListingUrl::parse("https://x/2").unwrap();
    assert_eq!(table.locate(url.as_str()), RowIndex::new(4));
}
