//! Example demonstrating the configuration system
//!
//! Run with: cargo run --example config_demo

use reddown::config::Config;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Reddown Configuration Demo ===\n");

    // Load or create default config
    let config = Config::load()?;
    let settings = &config.settings;

    println!("Current settings:");
    println!("  Theme: {:?}", settings.theme);
    println!("  Font size: {}", settings.font_size);
    println!("  Dialect: {}", settings.markdown.dialect.label());
    println!("  Line breaks: {}", settings.markdown.breaks);
    println!("  Recent files: {}", settings.recent_files.len());

    println!("\nDraft directory: {}", Config::data_dir().display());
    println!("Config file: {}", Config::config_path()?.display());

    println!("\n✅ Configuration loaded successfully!");
    println!("You can modify the config file manually or use Config::save() to persist changes.");

    Ok(())
}
