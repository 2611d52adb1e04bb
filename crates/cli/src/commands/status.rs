//! `herald status` — Show configuration and engine status.

use herald_config::AppConfig;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    let kb = config.knowledge_base();

    println!("Herald Status");
    println!("=============");
    println!("  Config dir:   {}", AppConfig::config_dir().display());
    println!("  Assistant:    {}", config.assistant.name);
    println!("  Fallback:     {} / {}", config.fallback.provider, config.fallback.model);
    println!("  Timeout:      {}s", config.fallback.timeout_secs);
    println!(
        "  Credential:   {}",
        if config.has_credential() { "configured" } else { "missing" }
    );
    println!("  Knowledge:    {} entries, {} subjects", kb.len(), kb.subjects().len());
    if kb.contacts().is_empty() {
        println!("  Contacts:     none");
    }
    for contact in kb.contacts() {
        println!("  Contact:      {:?} {}", contact.kind, contact.address);
    }
    println!("  Donations:    {} links", kb.donation_links().len());
    println!("  Social:       {}", config.social.targets.join(", "));
    for policy in &config.guard.protected {
        println!(
            "  Protected:    {} (min {} facts, {} known)",
            policy.subject,
            policy.min_facts,
            kb.count(&policy.subject)
        );
    }

    if AppConfig::config_path().exists() {
        println!("\n  Config file found");
    } else {
        println!("\n  No config file — run `herald init` first");
    }

    Ok(())
}
