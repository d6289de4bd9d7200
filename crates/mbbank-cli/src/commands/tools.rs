//! Tool registry listing

use anyhow::Result;
use mbbank_core::bank_tools;

/// List all tools, optionally with their argument schemas
pub fn cmd_tools(schema: bool) -> Result<()> {
    let tools = bank_tools();

    println!("Available Tools:\n");
    println!("{:<24} DESCRIPTION", "NAME");
    println!("{}", "-".repeat(80));

    for tool in &tools {
        println!("{:<24} {}", tool.name, tool.description);
    }

    if schema {
        for tool in &tools {
            println!();
            println!("{}:", tool.name);
            println!("{}", serde_json::to_string_pretty(&tool.input_schema)?);
        }
    }

    println!();
    println!("{} tools", tools.len());

    Ok(())
}
