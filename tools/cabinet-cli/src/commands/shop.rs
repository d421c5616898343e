//! Catalog browsing commands.

use anyhow::{bail, Result};
use cabinet_commerce::catalog::{Catalog, Category, Product, ALL_CATEGORIES};

use super::{ProductArgs, ShopArgs};
use crate::context::Context;
use crate::output::{format_price, rating_badge};

/// Run the shop command.
pub fn run(args: ShopArgs, ctx: &Context) -> Result<()> {
    let catalog = ctx.catalog()?;
    let category = args.category.as_deref().unwrap_or(ALL_CATEGORIES);

    if category != ALL_CATEGORIES && catalog.category(category).is_none() {
        bail!("Unknown category: {}", category);
    }

    let search = args.search.as_deref().unwrap_or("").trim();
    let products = select_products(&catalog, category, search);

    if ctx.output.is_json() {
        ctx.output.json(&products);
        return Ok(());
    }

    let title = if search.is_empty() {
        catalog
            .category(category)
            .map(|c| c.name.clone())
            .unwrap_or_else(|| Category::all().name)
    } else {
        format!("Results for \"{}\"", search)
    };
    ctx.output.header(&title);

    if products.is_empty() {
        ctx.output.info("Nothing in the cabinet matches.");
        return Ok(());
    }

    print_listing(&products, ctx);
    ctx.output.debug(&format!("{} of {} products", products.len(), catalog.products().len()));

    Ok(())
}

/// List featured products.
pub fn featured(ctx: &Context) -> Result<()> {
    let catalog = ctx.catalog()?;
    let products = catalog.featured();

    if ctx.output.is_json() {
        ctx.output.json(&products);
        return Ok(());
    }

    ctx.output.header("Featured Treasures");
    print_listing(&products, ctx);

    Ok(())
}

/// Show one product in detail.
pub fn product(args: ProductArgs, ctx: &Context) -> Result<()> {
    let catalog = ctx.catalog()?;
    let Some(product) = catalog.get_by_id(&args.id) else {
        bail!("Product not found: {}", args.id);
    };

    if ctx.output.is_json() {
        ctx.output.json(product);
        return Ok(());
    }

    ctx.output.header(&product.name);
    ctx.output.kv("id", product.id.as_str());
    ctx.output.kv("artist", &product.artist);
    ctx.output.kv("price", &format_price(product.price));
    ctx.output.kv(
        "rating",
        &rating_badge(product.rating, product.reviews, product.is_top_rated()),
    );
    if let Some(category) = catalog.category(product.category.as_str()) {
        ctx.output.kv("category", &format!("{} {}", category.icon, category.name));
    }
    if !product.dimensions.is_empty() {
        ctx.output.kv("dimensions", &product.dimensions);
    }
    if !product.materials.is_empty() {
        ctx.output.kv("materials", &product.materials.join(", "));
    }

    if !product.description.is_empty() {
        println!("\n  {}", product.description);
    }
    if !product.backstory.is_empty() {
        println!("\n  {}", product.backstory);
    }

    ctx.output.header("Images");
    for image in product.gallery() {
        ctx.output.list_item(image);
    }

    Ok(())
}

/// List categories with product counts.
pub fn categories(ctx: &Context) -> Result<()> {
    let catalog = ctx.catalog()?;

    if ctx.output.is_json() {
        ctx.output.json(&catalog.categories());
        return Ok(());
    }

    ctx.output.header("Categories");
    let all = Category::all();
    ctx.output.table_row(
        &[all.icon.as_str(), all.id.as_str(), &all.name, &catalog.products().len().to_string()],
        &[2, 14, 20, 4],
    );
    for (id, count) in catalog.category_counts() {
        if let Some(category) = catalog.category(id.as_str()) {
            ctx.output.table_row(
                &[category.icon.as_str(), id.as_str(), &category.name, &count.to_string()],
                &[2, 14, 20, 4],
            );
        }
    }

    Ok(())
}

/// A search query looks across the whole catalog; the category only
/// applies when there is no query.
fn select_products<'a>(catalog: &'a Catalog, category: &str, search: &str) -> Vec<&'a Product> {
    if search.trim().is_empty() {
        catalog.get_by_category(category)
    } else {
        catalog.search(search)
    }
}

fn print_listing(products: &[&Product], ctx: &Context) {
    for product in products {
        let price = format_price(product.price);
        let rating = rating_badge(product.rating, product.reviews, product.is_top_rated());
        ctx.output.table_row(
            &[product.id.as_str(), &product.name, &product.artist, &price, &rating],
            &[18, 24, 20, 9, 12],
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(products: &[&Product]) -> Vec<String> {
        products.iter().map(|p| p.id.to_string()).collect()
    }

    #[test]
    fn test_search_ignores_category() {
        let catalog = Catalog::builtin().unwrap();

        let found = select_products(&catalog, "jewelry", "moon");
        assert_eq!(ids(&found), ids(&catalog.search("moon")));
        assert!(found.iter().any(|p| p.id == "moon-vase"));
    }

    #[test]
    fn test_blank_search_uses_category() {
        let catalog = Catalog::builtin().unwrap();

        let found = select_products(&catalog, "ceramics", "  ");
        assert_eq!(ids(&found), ids(&catalog.get_by_category("ceramics")));
        assert!(found.iter().all(|p| p.category == "ceramics"));
    }
}
