//! Cart commands.
//!
//! Each invocation opens the persisted cart, applies at most one change and
//! exits. A mounted [`CartBinding`] prints the updated badge after the change.

use std::rc::Rc;

use anyhow::Result;
use cabinet_commerce::cart::{CartBinding, CartStore};
use cabinet_commerce::ProductId;

use super::{CartArgs, CartCommand};
use crate::context::Context;
use crate::output::{cart_badge, format_price, Output};

/// Run the cart command.
pub fn run(args: CartArgs, ctx: &Context) -> Result<()> {
    let store = ctx.open_store()?;

    match args.command.unwrap_or(CartCommand::Show) {
        CartCommand::Show => show_cart(&store, &ctx.output),
        CartCommand::Add { id, quantity } => add_item(&store, &id, quantity, ctx),
        CartCommand::Update { id, quantity } => update_item(&store, &id, quantity, ctx),
        CartCommand::Remove { id } => remove_item(&store, &id, ctx),
        CartCommand::Clear => {
            let badge = mount_badge(&store, &ctx.output);
            store.clear();
            drop(badge);
            ctx.output.success("Cart cleared");
            show_cart(&store, &ctx.output)
        }
        CartCommand::Checkout => checkout(&store, &ctx.output),
    }
}

fn mount_badge(store: &Rc<CartStore>, output: &Output) -> CartBinding {
    let output = output.clone();
    CartBinding::mount(store, move |cart| {
        output.debug(&format!("{} {}", cart_badge(cart.item_count), format_price(cart.subtotal)));
    })
}

fn add_item(store: &Rc<CartStore>, id: &str, quantity: i64, ctx: &Context) -> Result<()> {
    let catalog = ctx.catalog()?;
    let product = catalog.require(&ProductId::new(id))?;

    let badge = mount_badge(store, &ctx.output);
    store.add_item(product.to_snapshot(), quantity)?;
    drop(badge);

    ctx.output.success(&format!("Added {} x {}", quantity, product.name));
    show_cart(store, &ctx.output)
}

fn update_item(store: &Rc<CartStore>, id: &str, quantity: i64, ctx: &Context) -> Result<()> {
    let id = ProductId::new(id);
    let badge = mount_badge(store, &ctx.output);
    let changed = store.update_quantity(&id, quantity)?;
    drop(badge);

    if !changed {
        ctx.output.warn(&format!("Not in cart: {}", id));
    } else if quantity <= 0 {
        ctx.output.success(&format!("Removed {}", id));
    } else {
        ctx.output.success(&format!("Set {} to {}", id, quantity));
    }
    show_cart(store, &ctx.output)
}

fn remove_item(store: &Rc<CartStore>, id: &str, ctx: &Context) -> Result<()> {
    let id = ProductId::new(id);
    let badge = mount_badge(store, &ctx.output);
    let removed = store.remove_item(&id);
    drop(badge);

    if removed {
        ctx.output.success(&format!("Removed {}", id));
    } else {
        ctx.output.warn(&format!("Not in cart: {}", id));
    }
    show_cart(store, &ctx.output)
}

fn show_cart(store: &CartStore, output: &Output) -> Result<()> {
    let cart = store.snapshot();

    if output.is_json() {
        output.json(&cart);
        return Ok(());
    }

    output.header(&cart_badge(cart.item_count));

    if cart.items.is_empty() {
        output.info("Your cart is empty.");
        return Ok(());
    }

    for item in &cart.items {
        output.table_row(
            &[
                item.id.as_str(),
                &item.name,
                &format!("x{}", item.quantity),
                &format_price(item.price),
                &format_price(item.total()),
            ],
            &[18, 24, 5, 9, 9],
        );
    }
    println!();
    output.kv("subtotal", &format_price(cart.subtotal));

    Ok(())
}

fn checkout(store: &CartStore, output: &Output) -> Result<()> {
    let ack = store.checkout()?;

    if output.is_json() {
        output.json(&ack);
        return Ok(());
    }

    output.header("Checkout");
    output.kv("pieces", &ack.item_count.to_string());
    output.kv("line items", &ack.unique_item_count.to_string());
    output.kv("subtotal", &format_price(ack.subtotal));
    output.info("Orders are not taken here yet; your cart has been kept as is.");

    Ok(())
}
