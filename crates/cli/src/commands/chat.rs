//! `herald chat` — Interactive or single-message mode.

use herald_config::AppConfig;
use herald_core::{CommandResult, DonationLink, ResultKind};
use herald_engine::Engine;
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};

pub async fn run(
    message: Option<String>,
    api_key: Option<String>,
    show_audit: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    if let Some(key) = api_key.filter(|k| !k.trim().is_empty()) {
        config.credential = Some(key);
    }

    let engine = Engine::from_config(&config)?;
    let credential = config.credential().map(str::to_string);
    let links = engine.knowledge().donation_links().to_vec();

    if let Some(msg) = message {
        // Single message mode
        let result = engine.submit(&msg, credential.as_deref()).await;
        print_result(&result, &links, show_audit);
        return Ok(());
    }

    // Interactive mode
    println!();
    println!("  {}", config.assistant.name);
    println!(
        "  Fallback:  {} ({})",
        config.fallback.model,
        if credential.is_some() {
            "enabled"
        } else {
            "no credential"
        }
    );
    println!("  Type 'exit' or Ctrl+D to quit.");
    println!();
    for turn in engine.conversation().turns() {
        print_agent_text(&turn.text);
    }
    println!();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("  You > ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        if matches!(line.trim(), "exit" | "quit") {
            break;
        }

        let result = engine.submit(&line, credential.as_deref()).await;
        print_result(&result, &links, show_audit);
        println!();
    }

    println!();
    println!("  Goodbye!");
    Ok(())
}

fn print_result(result: &CommandResult, links: &[DonationLink], show_audit: bool) {
    match result.kind {
        ResultKind::Error => eprintln!("  [Error] {}", result.text),
        _ => print_agent_text(&result.text),
    }
    if result.kind == ResultKind::PaymentPrompt {
        for link in links {
            println!("    - {}: {}", link.label, link.url);
        }
    }
    if show_audit {
        println!("  {}", result.audit_line);
    }
}

fn print_agent_text(text: &str) {
    for line in text.lines() {
        println!("  Herald > {line}");
    }
}
