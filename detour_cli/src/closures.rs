use clap::Args;
use comfy_table::{Table, presets::UTF8_FULL};
use detour_core::{
    bounding_box::BoundingBox,
    closure::{Closure, ClosureId, ClosureStatus, Directionality},
    relevance::relevant_closures,
    transport_mode::TransportMode,
};
use detour_planner::config::PlannerConfig;
use jiff::Timestamp;

use crate::parsers;

const DESCRIPTION_WIDTH: usize = 48;

#[derive(Args)]
pub struct ClosuresArgs {
    /// Area as WEST,SOUTH,EAST,NORTH
    #[arg(short, long, value_parser = parsers::parse_bbox, allow_hyphen_values = true)]
    bbox: BoundingBox,

    /// Only closures relevant to this mode
    #[arg(short, long)]
    mode: Option<TransportMode>,
}

#[derive(Args)]
pub struct StatusArgs {
    id: ClosureId,

    #[arg(value_parser = parsers::parse_status)]
    status: ClosureStatus,
}

pub async fn run(args: ClosuresArgs, config: &PlannerConfig) -> anyhow::Result<()> {
    let closures = config.closures_client().fetch_in_bbox(&args.bbox).await?;

    let shown: Vec<&Closure> = match args.mode {
        Some(mode) => relevant_closures(&closures, mode).collect(),
        None => closures.iter().collect(),
    };

    println!("{}", closures_table(&shown, Timestamp::now()));
    println!("{} of {} closures", shown.len(), closures.len());

    Ok(())
}

pub async fn statistics(config: &PlannerConfig) -> anyhow::Result<()> {
    let statistics = config.closures_client().statistics().await?;

    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec!["", "Closures"]);
    table.add_row(vec!["Total".to_string(), statistics.total_closures.to_string()]);
    table.add_row(vec!["Valid now".to_string(), statistics.valid_closures.to_string()]);
    for (closure_type, count) in &statistics.by_type {
        table.add_row(vec![format!("type: {closure_type}"), count.to_string()]);
    }
    for (status, count) in &statistics.by_status {
        table.add_row(vec![format!("status: {status}"), count.to_string()]);
    }
    if let Some(hours) = statistics.avg_duration_hours {
        table.add_row(vec!["Average duration (h)".to_string(), format!("{hours:.1}")]);
    }

    println!("{table}");

    Ok(())
}

pub async fn update_status(args: StatusArgs, config: &PlannerConfig) -> anyhow::Result<()> {
    let closure = config
        .closures_client()
        .update_status(args.id, args.status)
        .await?;

    println!("Closure {} is now {}", closure.id, closure.status);

    Ok(())
}

fn closures_table(closures: &[&Closure], now: Timestamp) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec![
        "Id",
        "Type",
        "Status",
        "Geometry",
        "Direction",
        "Ends",
        "Description",
    ]);

    for closure in closures {
        let direction = match closure.directionality() {
            Some(Directionality::Bidirectional) => "both ways",
            Some(Directionality::OneWay) => "one way",
            None => "",
        };

        table.add_row(vec![
            closure.id.to_string(),
            closure.category.to_string(),
            closure.status_at(now).to_string(),
            format!("{} points", closure.vertices().count()),
            direction.to_string(),
            closure
                .end_time
                .map(|end_time| end_time.to_string())
                .unwrap_or_else(|| "open".to_string()),
            truncate(&closure.description, DESCRIPTION_WIDTH),
        ]);
    }

    table
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }

    let mut truncated: String = text.chars().take(width - 1).collect();
    truncated.push('…');
    truncated
}
