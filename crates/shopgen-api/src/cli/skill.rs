//! `shopgen skills` - list resolvable skill and feature ids.

use anyhow::Result;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};

use shopgen_types::skill::SkillDescriptor;

use crate::state::AppState;

pub fn list_skills(state: &AppState, json: bool) -> Result<()> {
    let resolver = state.dispatcher.resolver();
    let skills: Vec<&SkillDescriptor> = resolver
        .skill_ids()
        .into_iter()
        .map(|id| resolver.resolve(id))
        .collect::<Result<_, _>>()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&skills)?);
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Id").fg(Color::White),
        Cell::new("Primary").fg(Color::White),
        Cell::new("Fallback").fg(Color::White),
        Cell::new("Vision").fg(Color::White),
        Cell::new("Temp").fg(Color::White),
    ]);

    for skill in skills {
        let fallback = skill
            .fallback
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_else(|| "-".to_string());
        let vision = skill
            .vision
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_else(|| "-".to_string());
        table.add_row(vec![
            Cell::new(&skill.id).fg(Color::Cyan),
            Cell::new(skill.primary.to_string()),
            Cell::new(fallback).fg(Color::DarkGrey),
            Cell::new(vision).fg(Color::DarkGrey),
            Cell::new(format!("{:.1}", skill.temperature)),
        ]);
    }

    println!("{table}");
    Ok(())
}
