use std::io::{self, Write};

use anyhow::Result;
use clap::{Parser, Subcommand};
use client_core::{build_state_source, load_settings, view, ChecklistClient};
use shared::domain::{ChecklistState, FoodId, Participant};
use tracing::warn;

#[derive(Parser, Debug)]
#[command(name = "churras", about = "Shared churrasco checklist")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the food board and summary.
    Show,
    /// Mark a food as prepared/served by one participant.
    Mark {
        /// Food id (slug), e.g. costela-farofa.
        food: String,
        /// Who marked it: vini or duda.
        #[arg(long)]
        by: String,
    },
    /// Show one participant's mark log (default tab: vini).
    Log {
        /// Which tab to show: vini or duda.
        #[arg(long)]
        tab: Option<String>,
    },
    /// Clear the mark log, keeping all counters.
    ClearLog,
    /// Reset everything to the seed list. Destructive.
    Reset {
        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().init();
    let args = Args::parse();

    let settings = load_settings();
    let source = match build_state_source(&settings).await {
        Ok(source) => source,
        Err(err) => {
            toast(&format!("{err:#}"));
            std::process::exit(1);
        }
    };
    let client = ChecklistClient::new(source);

    if let Err(err) = run(&client, args.command).await {
        warn!("command failed: {err:#}");
        toast(&format!("{err:#}"));
        std::process::exit(1);
    }
    Ok(())
}

async fn run(client: &ChecklistClient, command: Command) -> Result<()> {
    match command {
        Command::Show => {
            let state = match client.load().await {
                Ok(state) => state,
                Err(err) => {
                    toast("Erro ao carregar estado do servidor.");
                    return Err(err.into());
                }
            };
            render_board(&state);
        }
        Command::Mark { food, by } => {
            let by: Participant = by.parse()?;
            let food_id = FoodId(food);
            let state = client.mark_food(&food_id, by).await?;
            render_board(&state);
            let name = state
                .food(&food_id)
                .map(|food| food.name.clone())
                .unwrap_or_else(|| food_id.to_string());
            toast(&format!("{name} marcado por {}!", by.display_name()));
        }
        Command::Log { tab } => {
            let mut tabs = view::LogTabs::default();
            if let Some(raw) = tab {
                tabs.activate(raw.parse()?);
            }
            let state = client.load().await?;
            render_log(&state, tabs.active());
        }
        Command::ClearLog => {
            let state = client.clear_log().await?;
            render_board(&state);
            toast("Histórico limpo.");
        }
        Command::Reset { yes } => {
            if !yes && !confirm("Zerar tudo (lista e histórico)?")? {
                toast("Cancelado.");
                return Ok(());
            }
            let state = client.reset_all().await?;
            render_board(&state);
            toast("Zerado.");
        }
    }
    Ok(())
}

fn render_board(state: &ChecklistState) {
    let summary = view::summary(state);
    println!("{} itens • {} marcados", summary.items, summary.total_marks);

    let board = view::board(state);
    println!("\nChurrasco");
    for card in &board.churrasco {
        print_card(card);
    }
    println!("\nSobremesas");
    for card in &board.sobremesas {
        print_card(card);
    }
}

fn print_card(card: &view::FoodCard) {
    let marker = match card.marker {
        view::CardMarker::Unmarked => " ",
        view::CardMarker::ViniOnly => "V",
        view::CardMarker::DudaOnly => "D",
        view::CardMarker::Both => "*",
    };
    println!(
        "  [{marker}] {}  (vini: {}, duda: {})  [{}]",
        card.name, card.counts.vini, card.counts.duda, card.id
    );
}

fn render_log(state: &ChecklistState, tab: Participant) {
    println!("Histórico de {}", tab.display_name());
    let panel = view::log_panel(state, tab);
    if panel.is_empty() {
        println!("  Nada ainda — comece marcando uma comida.");
        return;
    }
    for line in panel {
        println!("  {}  {}", line.when, line.food_name);
    }
}

/// Transient notification line, kept apart from the rendered board.
fn toast(message: &str) {
    eprintln!("• {message}");
}

fn confirm(question: &str) -> Result<bool> {
    eprint!("{question} [s/N] ");
    io::stderr().flush()?;

    let mut answer = String::new();
    io::stdin().read_line(&mut answer)?;
    let answer = answer.trim().to_ascii_lowercase();
    Ok(matches!(answer.as_str(), "s" | "sim" | "y" | "yes"))
}
