//! End-to-end behavior of the public parsing API.

use std::sync::Arc;
use std::thread;

use chrono::NaiveDate;
use papertrail_core::{
    aggregate, parse_receipt, validate_receipt_totals, Category, ExpenseItem, ReceiptParser,
    RuleBasedReceiptParser,
};
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;

const GROCERY: &str = "FRESH MARKET #12
Mar 02, 2024
Orange Juice        4.99
Paper Towels        6.49
Ice Cream           5.25
Garden Hose        19.99
SUB TOTAL          36.72
SALES TAX           2.94
TOTAL              39.66
";

#[test]
fn coffee_line_becomes_an_item() {
    let items = parse_receipt("Coffee 3.50");
    assert_eq!(
        items,
        vec![ExpenseItem::new("Coffee", Decimal::new(350, 2), Category::FoodAndDining)]
    );
}

#[test]
fn grocery_receipt_items_and_categories() {
    let parsed = RuleBasedReceiptParser::new().parse(GROCERY);

    assert_eq!(parsed.store_name.as_deref(), Some("FRESH MARKET #12"));
    assert_eq!(parsed.date, NaiveDate::from_ymd_opt(2024, 3, 2));

    let categorized: Vec<(&str, Category)> = parsed
        .items
        .iter()
        .take(4)
        .map(|i| (i.name.as_str(), i.category))
        .collect();
    assert_eq!(
        categorized,
        vec![
            ("Orange Juice", Category::FoodAndDining),
            ("Paper Towels", Category::OfficeSupplies),
            ("Ice Cream", Category::FoodAndDining),
            ("Garden Hose", Category::Shopping),
        ]
    );

    assert!(parsed.totals.is_matched, "{}", parsed.totals.message);
}

#[test]
fn totals_match_in_any_order() {
    let orders = [
        "Subtotal 10.00\nTax 1.00\nTotal 11.00",
        "Total 11.00\nSubtotal 10.00\nTax 1.00",
        "Tax 1.00\nTotal 11.00\nItem 4.00\nSubtotal 10.00",
    ];

    for text in orders {
        let verdict = validate_receipt_totals(text);
        assert!(verdict.is_matched, "{text:?}: {}", verdict.message);
        assert_eq!(verdict.confidence, 1.0);
    }
}

#[test]
fn mismatched_total_embeds_both_values() {
    let verdict = validate_receipt_totals("Subtotal 10.00\nTax 1.00\nTotal 12.00");

    assert!(!verdict.is_matched);
    assert_eq!(verdict.confidence, 0.8);
    assert_eq!(
        verdict.message,
        "Receipt totals do not match (expected: 11.00, found: 12.00)"
    );
}

#[test]
fn items_and_totals_can_disagree() {
    let text = "Coffee 3.50\nSubtotal 10.00\nTax 1.00\nTotal 11.00";
    let parsed = RuleBasedReceiptParser::new()
        .with_summary_lines_excluded(true)
        .parse(text);

    assert_eq!(parsed.summary().total, Decimal::new(350, 2));
    assert!(parsed.totals.is_matched);
}

#[test]
fn aggregation_of_parsed_items() {
    let items = parse_receipt("Coffee 3.50\nPen 2.00");
    let summary = aggregate(&items);

    assert_eq!(summary.total, Decimal::new(550, 2));
    let order: Vec<Category> = summary.by_category.iter().map(|c| c.category).collect();
    assert_eq!(order, vec![Category::FoodAndDining, Category::OfficeSupplies]);
}

#[test]
fn noisy_input_never_panics() {
    let inputs = [
        "",
        "\n\n\n",
        "$$$ .. 12. .99 $.50",
        "ÄÖÜ 3.50 ∑ 12.345 9999999999999999999999999999999.99",
        "Total\nTax\nSubtotal",
        "01/32/2024 13/13/2024 2024-02-30",
        "Subtotal 79228162514264337593543950335.00\nTax 79228162514264337593543950335.00\nTotal 1.00",
        "Subtotal 79228162514264337593543950.00\nTax 79228162514264337593543950.00\nTotal 1.00",
        "A 79228162514264337593543950.00\nB 79228162514264337593543950.00",
    ];

    let parser = RuleBasedReceiptParser::new();
    for input in inputs {
        let parsed = parser.parse(input);
        assert_eq!(parsed, parser.parse(input));
        let _ = validate_receipt_totals(input);
        let _ = aggregate(&parse_receipt(input));
    }
}

#[test]
fn amounts_beyond_decimal_range_are_dropped() {
    let huge = "79228162514264337593543950335.00";
    let verdict = validate_receipt_totals(&format!("Subtotal {huge}\nTax {huge}\nTotal 1.00"));

    assert!(!verdict.is_matched);
    assert_eq!(verdict.confidence, 0.0);
    assert!(verdict.message.contains("missing: subtotal, tax"), "{}", verdict.message);

    let items = parse_receipt(&format!("A {huge}\nB {huge}\nC 1.00"));
    assert_eq!(aggregate(&items).total, Decimal::new(100, 2));
}

#[test]
fn price_only_lines_become_unnamed_items() {
    let items = parse_receipt("$12.00\n   4.50");

    let amounts: Vec<(&str, Decimal)> = items.iter().map(|i| (i.name.as_str(), i.amount)).collect();
    assert_eq!(
        amounts,
        vec![("", Decimal::new(1200, 2)), ("", Decimal::new(450, 2))]
    );
}

#[test]
fn parser_is_shareable_across_threads() {
    let parser = Arc::new(RuleBasedReceiptParser::new());
    let expected = parser.parse(GROCERY);

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let parser = Arc::clone(&parser);
            thread::spawn(move || parser.parse(GROCERY))
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), expected);
    }
}
