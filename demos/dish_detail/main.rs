//! Dish detail walkthrough
//!
//! Loads a menu, pages through it, and posts a comment, printing what a
//! presentation layer would render at each step.
//!
//! Run with `RUST_LOG=dishdetail=debug` to see the controller's tracing.

use anyhow::Result;
use dishdetail::prelude::*;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let repository = InMemoryDishRepository::from_json_str(include_str!("db.json"))?;
    let view = DetailViewController::new(repository, DetailConfig::default_config())?;

    let mut events = view.subscribe_events();
    tokio::spawn(async move {
        while let Ok(envelope) = events.recv().await {
            println!("   ↳ event: {}", serde_json::to_string(&envelope.event).unwrap_or_default());
        }
    });

    println!("🍽  Loading dish 0\n");
    view.load("0").await?;
    print_view(&view);

    println!("\n➡️  Next dish\n");
    view.load_next().await?;
    print_view(&view);

    println!("\n✍️  Typing a comment\n");
    view.set_field("author", "A")?;
    view.touch_field("comment")?;
    for (field, message) in view.form_errors().iter() {
        println!("   {:<8} {}", field, if message.is_empty() { "✓" } else { message });
    }

    view.set_field("author", "Ada")?;
    view.set_field("rating", 4u8)?;
    view.set_field("comment", "Crunchy and bright.")?;

    let saved = view.submit_comment().await?;
    if let Some(dish) = saved.applied() {
        println!("\n✅ Saved: {} now has {} comment(s)", dish.name, dish.comments.len());
        for comment in &dish.comments {
            println!(
                "   {} ★{} - {} ({})",
                comment.author,
                comment.rating,
                comment.comment,
                comment.date_iso()
            );
        }
    }

    println!("\n⬅️  Back\n");
    view.go_back().await?;
    print_view(&view);

    Ok(())
}

fn print_view<R: DishRepository>(view: &DetailViewController<R>) {
    let snapshot = view.snapshot();
    match &snapshot.dish {
        Some(dish) => {
            println!("   {} ({})", dish.name, dish.price);
            if let Some(url) = &snapshot.image_url {
                println!("   image: {}", url);
            }
            println!(
                "   ◀ {}  |  {} ▶",
                snapshot.previous.as_deref().unwrap_or("-"),
                snapshot.next.as_deref().unwrap_or("-")
            );
        }
        None => println!("   (no dish) {}", snapshot.error.unwrap_or_default()),
    }
}
