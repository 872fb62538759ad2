// ABOUTME: Interactive terminal front end for the ironplan workout planner
// ABOUTME: Drives the session workflow over stdin/stdout prompts
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

//! # ironplan binary
//!
//! Thin terminal loop over the session workflow controller: register or log
//! in, then list, generate, edit, save and delete plans and progress
//! entries.
//!
//! ```bash
//! export DATABASE_URL=sqlite:./data/ironplan.db
//! export OPENAI_API_KEY=sk-...
//! ironplan
//! ```

use anyhow::Result;
use clap::Parser;
use ironplan::{
    auth::CredentialStore,
    config::environment::{AppConfig, DatabaseUrl},
    database::Database,
    llm::{LlmProvider, OpenAiCompatibleConfig, OpenAiCompatibleProvider},
    logging,
    models::{NewProgress, ProgressUpdate, WorkoutPlan},
    planner::{AssistantKind, PlanGenerator},
    workflow::{PlanDraft, SessionController, SessionState},
};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Stdin, Stdout};
use tracing::info;

#[derive(Parser)]
#[command(name = "ironplan")]
#[command(about = "AI workout assistant - plan generation, editing and progress tracking")]
struct Args {
    /// Database URL override
    #[arg(long)]
    database_url: Option<String>,
}

/// Whether the outer loop keeps running after a menu pass.
enum LoopAction {
    Continue,
    Quit,
}

/// Line-oriented prompt wrapper over stdin/stdout.
struct Console {
    reader: BufReader<Stdin>,
    stdout: Stdout,
}

impl Console {
    fn new() -> Self {
        Self {
            reader: BufReader::new(tokio::io::stdin()),
            stdout: tokio::io::stdout(),
        }
    }

    /// Print a prompt and read one trimmed line. `None` means stdin closed.
    async fn prompt(&mut self, text: &str) -> Result<Option<String>> {
        self.stdout.write_all(text.as_bytes()).await?;
        self.stdout.flush().await?;

        let mut line = String::new();
        if self.reader.read_line(&mut line).await? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_owned()))
    }

    /// Prompt for a number. `None` means stdin closed or unusable input.
    async fn prompt_number<T: std::str::FromStr>(&mut self, text: &str) -> Result<Option<T>> {
        let Some(raw) = self.prompt(text).await? else {
            return Ok(None);
        };
        match raw.parse() {
            Ok(value) => Ok(Some(value)),
            Err(_) => {
                println!("Enter a number.");
                Ok(None)
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    logging::init_from_env()?;

    let mut config = AppConfig::from_env()?;
    if let Some(url) = args.database_url {
        config.database_url = DatabaseUrl::parse_url(&url);
    }
    config.validate()?;
    info!("{}", config.summary());

    let database = Database::new(&config.database_url.to_connection_string()).await?;
    database.migrate().await?;

    let credentials = CredentialStore::new(database.clone());
    let provider: Arc<dyn LlmProvider> = Arc::new(OpenAiCompatibleProvider::new(
        OpenAiCompatibleConfig::from(&config.llm),
    )?);
    let generator = PlanGenerator::new(
        provider,
        Duration::from_secs(config.generation_timeout_secs),
    );
    let mut controller = SessionController::new(database, credentials, generator);

    println!("Welcome to your AI workout assistant!");

    let mut console = Console::new();
    loop {
        let action = match controller.state() {
            SessionState::Unauthenticated => auth_menu(&mut console, &mut controller).await?,
            SessionState::Viewing { .. } => main_menu(&mut console, &mut controller).await?,
            SessionState::EditingDraft { .. } => draft_menu(&mut console, &mut controller).await?,
            SessionState::ConfirmingDelete { .. } => {
                confirm_delete_prompt(&mut console, &mut controller).await?
            }
        };
        if matches!(action, LoopAction::Quit) {
            break;
        }
    }

    println!("Goodbye!");
    Ok(())
}

async fn auth_menu(console: &mut Console, controller: &mut SessionController) -> Result<LoopAction> {
    println!("\n1) Register");
    println!("2) Log in");
    println!("3) Quit");
    let Some(choice) = console.prompt("> ").await? else {
        return Ok(LoopAction::Quit);
    };

    match choice.as_str() {
        "1" => {
            let Some(email) = console.prompt("Email: ").await? else {
                return Ok(LoopAction::Quit);
            };
            let Some(password) = console.prompt("Password: ").await? else {
                return Ok(LoopAction::Quit);
            };
            match controller.register(&email, &password).await {
                Ok(()) => println!("Account created. You can log in now."),
                Err(e) => println!("{e}"),
            }
        }
        "2" => {
            let Some(email) = console.prompt("Email: ").await? else {
                return Ok(LoopAction::Quit);
            };
            let Some(password) = console.prompt("Password: ").await? else {
                return Ok(LoopAction::Quit);
            };
            match controller.login(&email, &password).await {
                Ok(()) => println!("Logged in as {email}."),
                Err(e) => println!("{e}"),
            }
        }
        "3" => return Ok(LoopAction::Quit),
        _ => println!("Pick an option from the menu."),
    }
    Ok(LoopAction::Continue)
}

async fn main_menu(console: &mut Console, controller: &mut SessionController) -> Result<LoopAction> {
    println!("\n 1) Ask the assistant");
    println!(" 2) List plans");
    println!(" 3) View a plan");
    println!(" 4) Generate a new plan");
    println!(" 5) Build a plan manually");
    println!(" 6) Edit a plan");
    println!(" 7) Delete a plan");
    println!(" 8) Log progress");
    println!(" 9) Show progress");
    println!("10) Update a progress entry");
    println!("11) Delete a progress entry");
    println!("12) Log out");
    println!("13) Quit");
    let Some(choice) = console.prompt("> ").await? else {
        return Ok(LoopAction::Quit);
    };

    match choice.as_str() {
        "1" => ask_assistant(console, controller).await?,
        "2" => list_plans(controller).await,
        "3" => view_plan(console, controller).await?,
        "4" => generate_plan(console, controller).await?,
        "5" => build_manual_plan(console, controller).await?,
        "6" => edit_plan(console, controller).await?,
        "7" => delete_plan(console, controller).await?,
        "8" => log_progress(console, controller).await?,
        "9" => show_progress(controller).await,
        "10" => update_progress(console, controller).await?,
        "11" => delete_progress(console, controller).await?,
        "12" => {
            controller.logout();
            println!("Logged out.");
        }
        "13" => return Ok(LoopAction::Quit),
        _ => println!("Pick an option from the menu."),
    }
    Ok(LoopAction::Continue)
}

async fn ask_assistant(console: &mut Console, controller: &mut SessionController) -> Result<()> {
    let Some(request) = console
        .prompt("What do you need help with? (e.g. 'create a workout plan' or 'create a nutrition plan') ")
        .await?
    else {
        return Ok(());
    };

    match controller.classify_request(&request).await {
        Ok(intent) => match intent.kind {
            AssistantKind::WorkoutPlanner => generate_plan(console, controller).await?,
            AssistantKind::NutritionPlanner => {
                println!("Nutrition planning is not available yet.");
            }
        },
        Err(e) => println!("{e}"),
    }
    Ok(())
}

async fn list_plans(controller: &SessionController) {
    match controller.list_plans().await {
        Ok(plans) if plans.is_empty() => println!("No plans saved yet."),
        Ok(plans) => {
            for (label, _) in &plans {
                println!("{label}");
            }
        }
        Err(e) => println!("{e}"),
    }
}

async fn view_plan(console: &mut Console, controller: &SessionController) -> Result<()> {
    let Some(plan_id) = choose_plan(console, controller).await? else {
        return Ok(());
    };
    match controller.view_plan(plan_id).await {
        Ok(plan) => print_plan(&plan),
        Err(e) => println!("{e}"),
    }
    Ok(())
}

async fn generate_plan(console: &mut Console, controller: &mut SessionController) -> Result<()> {
    let Some(goal) = console
        .prompt("What is your goal? (e.g. 'lose weight' or 'gain muscle') ")
        .await?
    else {
        return Ok(());
    };
    let Some(minutes) = console
        .prompt_number::<u32>("How many minutes do you have to workout each day? ")
        .await?
    else {
        return Ok(());
    };
    let Some(days) = console
        .prompt_number::<i32>("How many days a week do you want to workout? ")
        .await?
    else {
        return Ok(());
    };

    println!("Generating your plan...");
    match controller.generate_draft(&goal, days, minutes).await {
        Ok(()) => {
            if let Some(draft) = controller.draft() {
                print_draft(draft);
            }
            println!("Review the draft, then save or discard it.");
        }
        Err(e) => println!("{e}"),
    }
    Ok(())
}

async fn build_manual_plan(console: &mut Console, controller: &mut SessionController) -> Result<()> {
    let Some(goal) = console.prompt("What is your goal? ").await? else {
        return Ok(());
    };
    let Some(days) = console
        .prompt_number::<i32>("How many days a week do you want to workout? ")
        .await?
    else {
        return Ok(());
    };
    if days < 1 {
        println!("Training days must be between 1 and 7");
        return Ok(());
    }

    let mut day_labels = Vec::new();
    for ordinal in 1..=days {
        let fallback = format!("Day {ordinal}");
        let Some(name) = console
            .prompt(&format!("Name for day {ordinal} [{fallback}]: "))
            .await?
        else {
            return Ok(());
        };
        let Some(focus) = console
            .prompt("Focus (e.g. 'Chest & Triceps', empty for none): ")
            .await?
        else {
            return Ok(());
        };
        let name = if name.is_empty() { fallback } else { name };
        let focus = if focus.is_empty() { None } else { Some(focus) };
        day_labels.push((name, focus));
    }

    match controller.start_manual_draft(&goal, day_labels) {
        Ok(()) => {
            if let Some(draft) = controller.draft() {
                print_draft(draft);
            }
            println!("Add exercises to each day, then save.");
        }
        Err(e) => println!("{e}"),
    }
    Ok(())
}

async fn edit_plan(console: &mut Console, controller: &mut SessionController) -> Result<()> {
    let Some(plan_id) = choose_plan(console, controller).await? else {
        return Ok(());
    };
    match controller.edit_plan(plan_id).await {
        Ok(()) => {
            if let Some(draft) = controller.draft() {
                print_draft(draft);
            }
        }
        Err(e) => println!("{e}"),
    }
    Ok(())
}

async fn delete_plan(console: &mut Console, controller: &mut SessionController) -> Result<()> {
    let Some(plan_id) = choose_plan(console, controller).await? else {
        return Ok(());
    };
    if let Err(e) = controller.request_delete(plan_id) {
        println!("{e}");
    }
    Ok(())
}

async fn confirm_delete_prompt(
    console: &mut Console,
    controller: &mut SessionController,
) -> Result<LoopAction> {
    let Some(answer) = console.prompt("Delete this plan? (y/n) ").await? else {
        return Ok(LoopAction::Quit);
    };

    if answer.eq_ignore_ascii_case("y") {
        match controller.confirm_delete().await {
            Ok(()) => println!("Plan deleted."),
            Err(e) => {
                println!("{e}");
                controller.cancel_delete()?;
            }
        }
    } else {
        controller.cancel_delete()?;
        println!("Deletion cancelled.");
    }
    Ok(LoopAction::Continue)
}

async fn draft_menu(console: &mut Console, controller: &mut SessionController) -> Result<LoopAction> {
    if let Some(draft) = controller.draft() {
        print_draft(draft);
    }
    println!("\n1) Edit an exercise");
    println!("2) Remove/restore an exercise");
    println!("3) Add an exercise");
    println!("4) Save");
    println!("5) Discard");
    let Some(choice) = console.prompt("> ").await? else {
        return Ok(LoopAction::Quit);
    };

    match choice.as_str() {
        "1" => edit_draft_exercise(console, controller).await?,
        "2" => toggle_draft_exercise(console, controller).await?,
        "3" => add_draft_exercise(console, controller).await?,
        "4" => match controller.save_draft().await {
            Ok(plan_id) => println!("Plan saved (id {plan_id})."),
            Err(e) => println!("{e}"),
        },
        "5" => {
            controller.discard_draft()?;
            println!("Draft discarded.");
        }
        _ => println!("Pick an option from the menu."),
    }
    Ok(LoopAction::Continue)
}

/// Prompt for day and exercise position within the current draft.
async fn choose_draft_row(console: &mut Console) -> Result<Option<(usize, usize)>> {
    let Some(day) = console.prompt_number::<usize>("Day number: ").await? else {
        return Ok(None);
    };
    let Some(row) = console.prompt_number::<usize>("Exercise number: ").await? else {
        return Ok(None);
    };
    if day < 1 || row < 1 {
        println!("Numbers start at 1.");
        return Ok(None);
    }
    Ok(Some((day - 1, row - 1)))
}

async fn edit_draft_exercise(
    console: &mut Console,
    controller: &mut SessionController,
) -> Result<()> {
    let Some((day_index, exercise_index)) = choose_draft_row(console).await? else {
        return Ok(());
    };

    let current = match controller.draft_exercise_mut(day_index, exercise_index) {
        Ok(row) => row.clone(),
        Err(e) => {
            println!("{e}");
            return Ok(());
        }
    };

    let Some(name) = console
        .prompt(&format!("Name [{}]: ", current.name))
        .await?
    else {
        return Ok(());
    };
    let Some(sets) = console
        .prompt(&format!("Sets [{}]: ", current.sets))
        .await?
    else {
        return Ok(());
    };
    let Some(reps) = console
        .prompt(&format!("Reps [{}]: ", current.reps))
        .await?
    else {
        return Ok(());
    };
    let Some(rest) = console
        .prompt(&format!("Rest seconds [{}]: ", current.rest_time.unwrap_or(0)))
        .await?
    else {
        return Ok(());
    };
    let weight_label = current
        .weight
        .map_or_else(|| "bodyweight".to_owned(), |w| format!("{w}"));
    let Some(weight) = console
        .prompt(&format!("Weight in kg, 0 for bodyweight [{weight_label}]: "))
        .await?
    else {
        return Ok(());
    };

    match controller.draft_exercise_mut(day_index, exercise_index) {
        Ok(row) => {
            if !name.is_empty() {
                row.name = name;
            }
            if let Ok(sets) = sets.parse() {
                row.sets = sets;
            }
            if let Ok(reps) = reps.parse() {
                row.reps = reps;
            }
            if let Ok(rest) = rest.parse() {
                row.rest_time = Some(rest);
            }
            if let Ok(weight) = weight.parse() {
                row.weight = Some(weight);
            }
            println!("Exercise updated.");
        }
        Err(e) => println!("{e}"),
    }
    Ok(())
}

async fn toggle_draft_exercise(
    console: &mut Console,
    controller: &mut SessionController,
) -> Result<()> {
    let Some((day_index, exercise_index)) = choose_draft_row(console).await? else {
        return Ok(());
    };
    match controller.toggle_exercise_removed(day_index, exercise_index) {
        Ok(true) => println!("Exercise removed. It will not be saved."),
        Ok(false) => println!("Exercise restored."),
        Err(e) => println!("{e}"),
    }
    Ok(())
}

async fn add_draft_exercise(
    console: &mut Console,
    controller: &mut SessionController,
) -> Result<()> {
    let Some(day) = console.prompt_number::<usize>("Day number: ").await? else {
        return Ok(());
    };
    if day < 1 {
        println!("Numbers start at 1.");
        return Ok(());
    }
    let day_index = day - 1;

    match controller.add_blank_exercise(day_index) {
        Ok(exercise_index) => {
            println!("Added a blank exercise as number {}.", exercise_index + 1);

            let Some(name) = console.prompt("Name: ").await? else {
                return Ok(());
            };
            if let Ok(row) = controller.draft_exercise_mut(day_index, exercise_index) {
                row.name = name;
            }
        }
        Err(e) => println!("{e}"),
    }
    Ok(())
}

async fn log_progress(console: &mut Console, controller: &SessionController) -> Result<()> {
    let Some(exercise_name) = console.prompt("Exercise: ").await? else {
        return Ok(());
    };
    let Some(day_name) = console.prompt("Day (e.g. 'Day 1'): ").await? else {
        return Ok(());
    };
    let Some(sets_done) = console.prompt_number::<i32>("Sets done: ").await? else {
        return Ok(());
    };
    let Some(reps_done) = console.prompt_number::<i32>("Reps done: ").await? else {
        return Ok(());
    };
    let Some(weight_used) = console.prompt_number::<f64>("Weight used in kg (0 for bodyweight): ").await?
    else {
        return Ok(());
    };
    let Some(notes) = console.prompt("Notes (optional): ").await? else {
        return Ok(());
    };

    let progress = NewProgress {
        exercise_name,
        day_name,
        sets_done,
        reps_done,
        weight_used,
        notes: if notes.is_empty() { None } else { Some(notes) },
    };
    match controller.log_progress(&progress).await {
        Ok(entry) => println!(
            "Logged {} on {}.",
            entry.exercise_name, entry.completed_date
        ),
        Err(e) => println!("{e}"),
    }
    Ok(())
}

async fn show_progress(controller: &SessionController) {
    match controller.list_progress().await {
        Ok(entries) if entries.is_empty() => println!("No progress logged yet."),
        Ok(entries) => {
            for entry in &entries {
                let notes = entry
                    .notes
                    .as_deref()
                    .map_or_else(String::new, |n| format!(", {n}"));
                println!(
                    "#{} {} {} ({}): {}x{} @ {}kg{}",
                    entry.id.unwrap_or(0),
                    entry.completed_date,
                    entry.exercise_name,
                    entry.day_name,
                    entry.sets_done,
                    entry.reps_done,
                    entry.weight_used,
                    notes
                );
            }
        }
        Err(e) => println!("{e}"),
    }
}

async fn update_progress(console: &mut Console, controller: &SessionController) -> Result<()> {
    let Some(entry_id) = console.prompt_number::<i64>("Entry id (from 'Show progress'): ").await? else {
        return Ok(());
    };
    let Some(sets_done) = console.prompt_number::<i32>("Sets done: ").await? else {
        return Ok(());
    };
    let Some(reps_done) = console.prompt_number::<i32>("Reps done: ").await? else {
        return Ok(());
    };
    let Some(weight_used) = console.prompt_number::<f64>("Weight used in kg: ").await? else {
        return Ok(());
    };
    let Some(notes) = console.prompt("Notes (optional): ").await? else {
        return Ok(());
    };

    let update = ProgressUpdate {
        sets_done,
        reps_done,
        weight_used,
        notes: if notes.is_empty() { None } else { Some(notes) },
    };
    match controller.update_progress(entry_id, &update).await {
        Ok(()) => println!("Entry updated."),
        Err(e) => println!("{e}"),
    }
    Ok(())
}

async fn delete_progress(console: &mut Console, controller: &SessionController) -> Result<()> {
    let Some(entry_id) = console.prompt_number::<i64>("Entry id (from 'Show progress'): ").await? else {
        return Ok(());
    };
    match controller.delete_progress(entry_id).await {
        Ok(()) => println!("Entry deleted."),
        Err(e) => println!("{e}"),
    }
    Ok(())
}

/// List the user's plans and let them pick one by its listed number.
async fn choose_plan(console: &mut Console, controller: &SessionController) -> Result<Option<i64>> {
    let plans = match controller.list_plans().await {
        Ok(plans) => plans,
        Err(e) => {
            println!("{e}");
            return Ok(None);
        }
    };
    if plans.is_empty() {
        println!("No plans saved yet.");
        return Ok(None);
    }

    for (label, _) in &plans {
        println!("{label}");
    }
    let Some(choice) = console.prompt("Which plan? ").await? else {
        return Ok(None);
    };
    let Ok(ordinal) = choice.parse::<usize>() else {
        println!("Enter a plan number.");
        return Ok(None);
    };

    let selected = ordinal
        .checked_sub(1)
        .and_then(|index| plans.get(index))
        .map(|(_, summary)| summary.id);
    if selected.is_none() {
        println!("No plan with that number.");
    }
    Ok(selected)
}

fn print_plan(plan: &WorkoutPlan) {
    println!("\nGoal: {} ({} days/week)", plan.goal, plan.days_per_week);
    for day in &plan.workout_days {
        match &day.focus {
            Some(focus) => println!("{} - {focus}", day.day_name),
            None => println!("{}", day.day_name),
        }
        for exercise in &day.exercises {
            println!(
                "  - {}: {}x{}, Rest: {}s",
                exercise.name,
                exercise.sets,
                exercise.reps,
                exercise.rest_or_zero()
            );
        }
    }
}

fn print_draft(draft: &PlanDraft) {
    println!("\nDraft: {} ({} days/week)", draft.goal, draft.days_per_week);
    for (day_number, day) in draft.days.iter().enumerate() {
        match &day.focus {
            Some(focus) => println!("{}. {} - {focus}", day_number + 1, day.day_name),
            None => println!("{}. {}", day_number + 1, day.day_name),
        }
        if day.exercises.is_empty() {
            println!("   (no exercises yet)");
        }
        for (row_number, row) in day.exercises.iter().enumerate() {
            let weight = row
                .weight
                .map_or_else(|| "bodyweight".to_owned(), |w| format!("{w}kg"));
            let marker = if row.removed { " [removed]" } else { "" };
            let name = if row.name.is_empty() { "(unnamed)" } else { &row.name };
            println!(
                "   {}. {}: {}x{}, {}, Rest: {}s{}",
                row_number + 1,
                name,
                row.sets,
                row.reps,
                weight,
                row.rest_time.unwrap_or(0),
                marker
            );
        }
    }
}
