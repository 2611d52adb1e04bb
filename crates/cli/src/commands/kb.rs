//! `herald kb` — List knowledge base entries.

use herald_config::AppConfig;

pub async fn run(subject: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    let kb = config.knowledge_base();

    let Some(subject) = subject else {
        if kb.is_empty() {
            println!("Knowledge base is empty.");
        }
        for entry in kb.entries() {
            println!("[{}] {}", entry.subject, entry.statement);
        }
        return Ok(());
    };

    println!("{subject}:");
    let mut found = false;
    for entry in kb.lookup(&subject) {
        found = true;
        println!("  - {}", entry.statement);
    }
    if !found {
        println!("  (no entries)");
    }

    Ok(())
}
