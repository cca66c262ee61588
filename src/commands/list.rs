//! List commands implementation

use vl53l7cx_platform::available_platforms;

/// List all compiled-in platforms
pub fn list_platforms() {
    println!("Supported platforms:");
    println!();
    for info in available_platforms() {
        if info.aliases.is_empty() {
            println!("  {:<8} - {}", info.name, info.description);
        } else {
            println!(
                "  {:<8} - {} (aliases: {})",
                info.name,
                info.description,
                info.aliases.join(", ")
            );
        }
    }
}
