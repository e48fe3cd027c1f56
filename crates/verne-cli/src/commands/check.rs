use std::path::Path;

use colored::Colorize;
use comfy_table::{ContentArrangement, Table};
use verne_core::{ItemKind, Room, World};

use crate::diagnostics::{self, Diagnostic};

pub fn run(path: &Path) -> Result<(), String> {
    let loaded = super::load_world(path)?;
    let world = &loaded.world;

    println!("{}", room_table(world));
    println!();

    let warnings = world.lint();
    if !warnings.is_empty() {
        let diags: Vec<Diagnostic> = warnings
            .iter()
            .map(|w| Diagnostic::from_warning(&loaded.source, w))
            .collect();
        let filename = path.display().to_string();
        eprint!("{}", diagnostics::render(&loaded.source, &filename, &diags));
    }

    println!(
        "  {} rooms, start {}, end {}",
        world.room_count(),
        world.start_room().bold(),
        world.end_room().bold()
    );
    match warnings.len() {
        0 => println!("  All checks passed for '{}'.", path.display()),
        1 => println!("  {}", "1 warning".yellow()),
        n => println!("  {}", format!("{n} warnings").yellow()),
    }

    Ok(())
}

fn room_table(world: &World) -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Room", "Exits", "Items", "Transforms"]);

    for room in world.rooms() {
        let name = if room.id == world.start_room() {
            format!("{} (start)", room.id)
        } else {
            room.id.clone()
        };
        table.add_row(vec![
            name,
            describe_exits(room),
            describe_items(room),
            describe_transform(room).to_string(),
        ]);
    }
    table
}

fn describe_exits(room: &Room) -> String {
    if room.exits.is_empty() {
        return "—".to_string();
    }
    room.exits
        .iter()
        .map(|exit| match (exit.locked, exit.key.as_deref()) {
            (true, Some(key)) => format!("{} -> {} [key: {key}]", exit.name, exit.to),
            (true, None) => format!("{} -> {} [locked]", exit.name, exit.to),
            (false, _) => format!("{} -> {}", exit.name, exit.to),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn describe_items(room: &Room) -> String {
    if room.items.is_empty() {
        return "—".to_string();
    }
    room.items
        .iter()
        .map(|item| {
            let kind = match &item.kind {
                ItemKind::Hint { .. } => "hint",
                ItemKind::Inventory { .. } => "inventory",
                ItemKind::Riddle(_) => "riddle",
                ItemKind::Unknown => "unknown",
            };
            match item.grants() {
                Some(gift) => format!("{} ({kind}, gives {gift})", item.name),
                None => format!("{} ({kind})", item.name),
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn describe_transform(room: &Room) -> &'static str {
    match (room.transform().is_some(), room.after_text().is_some()) {
        (true, _) => "with text",
        (false, true) => "silently",
        (false, false) => "—",
    }
}
