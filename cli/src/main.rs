mod cook;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use fridgechef_core::ai::create_client_from_env;
use fridgechef_core::{
    photo_from_bytes, AppState, NullNarrator, Recipe, ACQUIRE_FAILED_MESSAGE, DIETARY_OPTIONS,
};

#[derive(Parser)]
#[command(name = "fridgechef")]
#[command(about = "FridgeChef CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Suggest recipes from a photo of your fridge
    Suggest {
        /// Path to the fridge photo (jpeg, png, gif or webp)
        #[arg(long)]
        image: PathBuf,
        #[arg(long = "filter", help = filter_help())]
        filters: Vec<String>,
        /// Print the matching recipes as JSON
        #[arg(long)]
        json: bool,
    },
    /// Walk through a suggested recipe step by step
    Cook {
        /// Path to the fridge photo (jpeg, png, gif or webp)
        #[arg(long)]
        image: PathBuf,
        #[arg(long = "filter", help = filter_help())]
        filters: Vec<String>,
        /// Recipe to cook, as numbered by `suggest`
        #[arg(long, default_value_t = 1)]
        recipe: usize,
    },
}

/// Help text for `--filter`. Any free-text term is accepted; these are the
/// presets recipe tags usually carry.
fn filter_help() -> String {
    format!(
        "Dietary filter to apply, repeatable; presets: {}",
        DIETARY_OPTIONS.join(", ")
    )
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Suggest {
            image,
            filters,
            json,
        } => {
            suggest(&image, &filters, json).await?;
        }
        Commands::Cook {
            image,
            filters,
            recipe,
        } => {
            cook::cook(&image, &filters, recipe).await?;
        }
    }

    Ok(())
}

/// Read the photo, submit it, and leave the suggestions in `app`.
pub(crate) async fn submit_fridge_photo(app: &mut AppState, image: &Path) -> Result<usize> {
    let bytes =
        std::fs::read(image).with_context(|| format!("failed to read image {}", image.display()))?;
    let photo = photo_from_bytes(&bytes)?;

    let count = app
        .submit_photo(photo)
        .await
        .context(ACQUIRE_FAILED_MESSAGE)?;

    Ok(count)
}

async fn suggest(image: &Path, filters: &[String], json: bool) -> Result<()> {
    let client = create_client_from_env()?;
    let mut app = AppState::new(Box::new(client), Arc::new(NullNarrator));

    for term in filters {
        app.toggle_filter(term);
    }

    let total = submit_fridge_photo(&mut app, image).await?;
    let visible = app.visible_recipes();

    if json {
        let refs: Vec<&Recipe> = visible.iter().map(|recipe| recipe.as_ref()).collect();
        println!("{}", serde_json::to_string_pretty(&refs)?);
        return Ok(());
    }

    if filters.is_empty() {
        println!("Found {} recipes:", total);
    } else {
        println!(
            "Found {} recipes, {} matching {}:",
            total,
            visible.len(),
            filters.join(" + ")
        );
    }

    for (num, recipe) in visible.iter().enumerate() {
        println!();
        println!(
            "{}. {} ({}, {}, {} cal)",
            num + 1,
            recipe.name,
            recipe.difficulty.as_str(),
            recipe.prep_time,
            recipe.calories
        );
        if !recipe.dietary_tags.is_empty() {
            println!("   Tags: {}", recipe.dietary_tags.join(", "));
        }
        println!("   {}", recipe.description);

        let missing: Vec<&str> = recipe
            .ingredients
            .iter()
            .filter(|ing| !ing.in_fridge)
            .map(|ing| ing.name.as_str())
            .collect();
        if !missing.is_empty() {
            println!("   Not in your fridge: {}", missing.join(", "));
        }
    }

    Ok(())
}
