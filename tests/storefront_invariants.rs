//! Cross-module invariants for the cart and pricing pipeline.

use camber::{
    cart::{CartError, CartProduct, CartStore},
    discounts::{DiscountDescriptor, DiscountEffect},
    pricing::quote,
};
use rust_decimal::dec;
use testresult::TestResult;
use uuid::Uuid;

fn product(name: &str, unit_price: u64, stock: u32) -> CartProduct {
    CartProduct {
        uuid: Uuid::now_v7(),
        name: name.to_string(),
        unit_price,
        stock,
        active: true,
    }
}

#[test]
fn quote_matches_cart_subtotal_after_every_mutation() -> TestResult {
    let mut cart = CartStore::new();
    let filter = product("Oil filter", 9_50, 10);
    let pads = product("Brake pads", 25_00, 6);

    cart.add(filter.clone())?;
    cart.add(pads.clone())?;
    cart.set_quantity(pads.uuid, 4)?;
    cart.remove(filter.uuid);

    let breakdown = quote(cart.lines(), 70_00, &DiscountDescriptor::none());

    assert_eq!(breakdown.subtotal, cart.subtotal());
    assert_eq!(
        breakdown.total,
        breakdown.subtotal + breakdown.shipping_cost - breakdown.discount_amount,
        "total identity must hold after mutations"
    );

    Ok(())
}

#[test]
fn happy_path_scenario() -> TestResult {
    // Cart of two units at 100.00, shipping 70.00, no coupon.
    let mut cart = CartStore::new();
    let rotor = product("Brake rotor", 100_00, 5);

    cart.add(rotor.clone())?;
    cart.set_quantity(rotor.uuid, 2)?;

    let breakdown = quote(cart.lines(), 70_00, &DiscountDescriptor::none());

    assert_eq!(breakdown.subtotal, 200_00);
    assert_eq!(breakdown.discount_amount, 0);
    assert_eq!(breakdown.total, 270_00);

    Ok(())
}

#[test]
fn percentage_coupon_scenario() -> TestResult {
    let mut cart = CartStore::new();
    let rotor = product("Brake rotor", 100_00, 5);

    cart.add(rotor.clone())?;
    cart.set_quantity(rotor.uuid, 2)?;

    let discount = DiscountDescriptor {
        effect: Some(DiscountEffect::Percentage(dec!(10))),
        ..DiscountDescriptor::default()
    };

    let breakdown = quote(cart.lines(), 70_00, &discount);

    assert_eq!(breakdown.discount_amount, 20_00);
    assert_eq!(breakdown.total, 250_00);

    Ok(())
}

#[test]
fn insufficient_stock_scenario_caps_at_available() -> TestResult {
    // Requesting 5 of a product with stock 3 fails at 4 and 5, capping at 3.
    let mut cart = CartStore::new();
    let sensor = product("O2 sensor", 40_00, 3);

    cart.add(sensor.clone())?;

    for requested in [4, 5] {
        assert_eq!(
            cart.set_quantity(sensor.uuid, requested),
            Err(CartError::InsufficientStock {
                requested,
                available: 3,
            })
        );
    }

    cart.set_quantity(sensor.uuid, 3)?;

    assert_eq!(
        cart.line(sensor.uuid).map(|line| line.quantity),
        Some(3),
        "effective quantity is capped at stock"
    );

    Ok(())
}

#[test]
fn discount_clamp_holds_for_any_oversized_discount() -> TestResult {
    let mut cart = CartStore::new();
    cart.add(product("Wiper blade", 19_99, 5))?;
    cart.add(product("Fuse kit", 5_25, 2))?;

    for effect in [
        DiscountEffect::Percentage(dec!(101)),
        DiscountEffect::Percentage(dec!(1000)),
        DiscountEffect::Fixed(u64::MAX),
    ] {
        let discount = DiscountDescriptor {
            effect: Some(effect),
            ..DiscountDescriptor::default()
        };

        let breakdown = quote(cart.lines(), 70_00, &discount);

        assert_eq!(
            breakdown.discount_amount, breakdown.subtotal,
            "oversized discounts clamp to the subtotal"
        );
        assert_eq!(
            breakdown.total, breakdown.shipping_cost,
            "total never drops below shipping"
        );
    }

    Ok(())
}
