//! Property-based tests for basket operations.
//!
//! These check invariants that should hold for every sequence of edits,
//! not just the hand-picked scenarios in the unit tests.

#![allow(clippy::unwrap_used)]

use coffeeshop_core::{
    Basket, BasketError, BasketRules, CatalogLookup, CatalogSnapshot, CustomerId, DiscountPolicy,
    PaymentMethod, Price, Product, Quantity,
};
use proptest::prelude::*;

const PRODUCT_COUNT: usize = 4;

#[derive(Debug, Clone)]
enum Edit {
    Set { product: usize, quantity: i64 },
    Remove { product: usize },
}

fn edit() -> impl Strategy<Value = Edit> {
    prop_oneof![
        (0..PRODUCT_COUNT, 1..50i64).prop_map(|(product, quantity)| Edit::Set { product, quantity }),
        (0..PRODUCT_COUNT).prop_map(|product| Edit::Remove { product }),
    ]
}

fn catalog(cents: &[u32]) -> (Vec<Product>, CatalogSnapshot) {
    let products: Vec<Product> = cents
        .iter()
        .enumerate()
        .map(|(i, c)| Product::new(format!("Product {i}"), Price::from_cents(*c), "Test"))
        .collect();
    let snapshot = products.iter().cloned().collect();
    (products, snapshot)
}

fn run(edits: &[Edit], products: &[Product], catalog: &CatalogSnapshot) -> Basket {
    let rules = BasketRules::default();
    edits
        .iter()
        .fold(Basket::new(CustomerId::generate()), |basket, edit| match edit {
            Edit::Set { product, quantity } => basket
                .add_or_update(
                    catalog,
                    &rules,
                    products[*product].id,
                    Quantity::new(*quantity).unwrap(),
                )
                .unwrap(),
            Edit::Remove { product } => basket
                .remove(catalog, &rules, products[*product].id)
                .unwrap(),
        })
}

proptest! {
    /// The stored total always equals the sum of unit price times quantity.
    #[test]
    fn test_total_matches_line_sum(
        cents in prop::collection::vec(1..10_000u32, PRODUCT_COUNT),
        edits in prop::collection::vec(edit(), 0..30),
    ) {
        let (products, snapshot) = catalog(&cents);
        let basket = run(&edits, &products, &snapshot);

        let expected = basket.items().iter().fold(Price::ZERO, |acc, item| {
            let unit = snapshot.unit_price(&item.product_id).unwrap();
            acc.checked_add(unit.checked_mul(item.quantity).unwrap()).unwrap()
        });
        prop_assert_eq!(basket.total(), expected);
    }

    /// A product never appears on more than one line.
    #[test]
    fn test_lines_are_unique(
        cents in prop::collection::vec(1..10_000u32, PRODUCT_COUNT),
        edits in prop::collection::vec(edit(), 0..30),
    ) {
        let (products, snapshot) = catalog(&cents);
        let basket = run(&edits, &products, &snapshot);

        let mut ids: Vec<_> = basket.product_ids().collect();
        let before = ids.len();
        ids.sort();
        ids.dedup();
        prop_assert_eq!(ids.len(), before);
    }

    /// Setting the same quantity twice is the same as setting it once.
    #[test]
    fn test_add_or_update_is_idempotent(
        cents in prop::collection::vec(1..10_000u32, PRODUCT_COUNT),
        edits in prop::collection::vec(edit(), 0..20),
        product in 0..PRODUCT_COUNT,
        quantity in 1..50i64,
    ) {
        let (products, snapshot) = catalog(&cents);
        let rules = BasketRules::default();
        let quantity = Quantity::new(quantity).unwrap();
        let once = run(&edits, &products, &snapshot)
            .add_or_update(&snapshot, &rules, products[product].id, quantity)
            .unwrap();
        let twice = once
            .add_or_update(&snapshot, &rules, products[product].id, quantity)
            .unwrap();
        prop_assert_eq!(once, twice);
    }

    /// Checkout totals are never negative and never exceed the subtotal.
    #[test]
    fn test_checkout_total_bounded(
        cents in prop::collection::vec(1..10_000u32, PRODUCT_COUNT),
        edits in prop::collection::vec(edit(), 0..20),
        use_code in any::<bool>(),
    ) {
        let (products, snapshot) = catalog(&cents);
        let basket = run(&edits, &products, &snapshot);
        let subtotal = basket.compute_total(&snapshot).unwrap();
        let code = use_code.then_some("DISCOUNT10");

        let finalized = basket
            .checkout(&snapshot, &BasketRules::default(), code, PaymentMethod::CreditCard)
            .unwrap();
        prop_assert!(finalized.total() <= subtotal);
        prop_assert!(finalized.total() >= Price::ZERO);
        prop_assert_eq!(
            finalized.total(),
            subtotal.saturating_sub(DiscountPolicy::default().apply(code))
        );
    }

    /// A rejected cash checkout leaves the basket exactly as it was.
    #[test]
    fn test_rejected_checkout_changes_nothing(
        cents in prop::collection::vec(1..10_000u32, PRODUCT_COUNT),
        edits in prop::collection::vec(edit(), 0..20),
    ) {
        let (products, snapshot) = catalog(&cents);
        let basket = run(&edits, &products, &snapshot);
        let before = basket.clone();

        match basket.checkout(&snapshot, &BasketRules::default(), None, PaymentMethod::Cash) {
            Ok(finalized) => prop_assert!(finalized.total() <= Price::from_units(10)),
            Err(BasketError::PaymentMethodRejected { total, .. }) => {
                prop_assert!(total > Price::from_units(10));
                prop_assert_eq!(basket, before);
            }
            Err(other) => prop_assert!(false, "unexpected error: {other}"),
        }
    }
}
