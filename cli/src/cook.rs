use std::io::{self, Write};
use std::path::Path;
use std::sync::{Arc, Mutex};

use anyhow::{bail, Context, Result};
use fridgechef_core::ai::create_client_from_env;
use fridgechef_core::{AppState, CookingSession, CookingView, Narrator, UtteranceId};

/// Narrator that prints the utterance text instead of speaking it.
///
/// A printed utterance is over as soon as it is written, so the command
/// loop reports completion back to the session right after the command
/// that started it.
struct PrintNarrator {
    last: Mutex<Option<UtteranceId>>,
}

impl PrintNarrator {
    fn new() -> Self {
        Self {
            last: Mutex::new(None),
        }
    }

    fn take_last(&self) -> Option<UtteranceId> {
        self.last.lock().unwrap().take()
    }
}

impl Narrator for PrintNarrator {
    fn speak(&self, id: UtteranceId, text: &str) -> bool {
        println!("[narration] {}", text);
        *self.last.lock().unwrap() = Some(id);
        true
    }

    fn cancel(&self) {
        self.last.lock().unwrap().take();
    }
}

pub async fn cook(image: &Path, filters: &[String], recipe_num: usize) -> Result<()> {
    let client = create_client_from_env()?;
    let narrator = Arc::new(PrintNarrator::new());
    let mut app = AppState::new(Box::new(client), narrator.clone());

    for term in filters {
        app.toggle_filter(term);
    }

    crate::submit_fridge_photo(&mut app, image).await?;

    let visible = app.visible_recipes();
    if visible.is_empty() {
        bail!("no recipes matched the active filters");
    }
    let index = recipe_num
        .checked_sub(1)
        .filter(|&i| i < visible.len())
        .with_context(|| format!("--recipe must be between 1 and {}", visible.len()))?;

    if !app.open_session(index) {
        bail!("could not open recipe {}", recipe_num);
    }

    if let Some(session) = app.session() {
        print_ingredients(session);
    }
    print_help();

    let mut line = String::new();
    loop {
        print!("> ");
        io::stdout().flush()?;

        line.clear();
        if io::stdin().read_line(&mut line)? == 0 {
            break;
        }
        let mut parts = line.split_whitespace();
        let verb = match parts.next() {
            Some(verb) => verb,
            None => continue,
        };

        match verb {
            "n" | "next" => {
                if let Some(session) = app.session_mut() {
                    if session.view() == CookingView::Ingredients {
                        println!("(switch to the instructions pane first: i)");
                    } else if session.key_next() {
                        print_step(session);
                    } else {
                        println!("(already at the last step)");
                    }
                }
            }
            "p" | "prev" => {
                if let Some(session) = app.session_mut() {
                    if session.view() == CookingView::Ingredients {
                        println!("(switch to the instructions pane first: i)");
                    } else if session.key_prev() {
                        print_step(session);
                    } else {
                        println!("(already at the first step)");
                    }
                }
            }
            "i" | "tab" => {
                if let Some(session) = app.session_mut() {
                    match session.view() {
                        CookingView::Ingredients => {
                            session.set_view(CookingView::Instructions);
                            print_step(session);
                        }
                        CookingView::Instructions => {
                            session.set_view(CookingView::Ingredients);
                            print_ingredients(session);
                        }
                    }
                }
            }
            "t" | "read" => {
                if let Some(session) = app.session_mut() {
                    session.toggle_narration();
                }
            }
            "a" | "add" => match parts.next().and_then(|arg| arg.parse::<usize>().ok()) {
                Some(num) if num >= 1 => {
                    let name = app
                        .session()
                        .and_then(|session| session.recipe().ingredients.get(num - 1))
                        .map(|ing| ing.name.clone());
                    if app.add_ingredient_to_shopping_list(num - 1) {
                        if let Some(name) = name {
                            println!("Added {} to the shopping list.", name);
                        }
                    } else {
                        println!("(only ingredients marked missing can be added)");
                    }
                }
                _ => println!("usage: a <ingredient number>"),
            },
            "s" | "list" => print_shopping_list(&app),
            "h" | "?" | "help" => print_help(),
            "q" | "quit" => break,
            other => println!("unknown command: {} (h for help)", other),
        }

        // A printed utterance finishes immediately.
        if let Some(id) = narrator.take_last() {
            app.narration_finished(id);
        }
    }

    app.close_session();
    if !app.shopping_list().is_empty() {
        println!();
        print_shopping_list(&app);
    }

    Ok(())
}

fn print_ingredients(session: &CookingSession) {
    let recipe = session.recipe();

    println!();
    println!("Cooking: {} ({} steps)", recipe.name, session.total_steps());
    println!("Ingredients:");
    for (num, ing) in recipe.ingredients.iter().enumerate() {
        let marker = if ing.in_fridge { "in fridge" } else { "missing" };
        println!("  {}. {} ({}) - {}", num + 1, ing.name, ing.quantity, marker);
    }
}

fn print_step(session: &CookingSession) {
    println!(
        "Step {}/{}: {}",
        session.step() + 1,
        session.total_steps(),
        session.current_instruction()
    );
}

fn print_shopping_list(app: &AppState) {
    let items = app.shopping_list().items();
    if items.is_empty() {
        println!("Shopping list is empty.");
        return;
    }
    println!("Shopping list:");
    for item in items {
        println!("  - {}", item);
    }
}

fn print_help() {
    println!();
    println!("Commands:");
    println!("  i        switch between ingredients and instructions");
    println!("  n / p    next / previous step (instructions pane only)");
    println!("  t        read the current step aloud");
    println!("  a <num>  add a missing ingredient to the shopping list");
    println!("  s        show the shopping list");
    println!("  q        finish cooking");
}
