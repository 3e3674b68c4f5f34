use std::{fs::File, io::BufWriter, path::PathBuf};

use anyhow::anyhow;
use clap::Args;
use comfy_table::{Table, presets::UTF8_FULL};
use detour_core::{geopoint::GeoPoint, route::CalculatedRoute, transport_mode::TransportMode};
use detour_planner::{
    config::PlannerConfig,
    planner::{RoutePlan, RoutePlanner},
    render::render_plan,
    session::{RoutePlanningSession, SessionState},
};
use geojson::GeoJson;
use tracing::info;

use crate::parsers;

#[derive(Args)]
pub struct RouteArgs {
    /// Starting point as LAT,LNG
    #[arg(short, long, value_parser = parsers::parse_geo_point, allow_hyphen_values = true)]
    from: GeoPoint,

    /// Destination as LAT,LNG
    #[arg(short, long, value_parser = parsers::parse_geo_point, allow_hyphen_values = true)]
    to: GeoPoint,

    /// auto, bicycle or pedestrian
    #[arg(short, long, default_value_t = TransportMode::Auto)]
    mode: TransportMode,

    /// Writes the rendered routes and closures as GeoJSON
    #[arg(short, long)]
    geojson: Option<PathBuf>,
}

pub async fn run(args: RouteArgs, config: &PlannerConfig) -> anyhow::Result<()> {
    let planner = RoutePlanner::new(config.closures_client(), config.valhalla_client());

    let mut session = RoutePlanningSession::new(args.mode);
    session.select_point(args.from);
    session.select_point(args.to);
    session.calculate(&planner).await;

    let plan = match session.state() {
        SessionState::RouteDisplayed(plan) => plan,
        SessionState::ErrorDisplayed(error) => return Err(anyhow!("{error}")),
        state => return Err(anyhow!("Unexpected session state {state:?}")),
    };

    println!("{}", comparison_table(plan));

    if let Some(path) = args.geojson {
        let writer = BufWriter::new(File::create(&path)?);
        serde_json::to_writer_pretty(writer, &GeoJson::FeatureCollection(render_plan(plan)))?;
        info!("GeoJSON written to {}", path.display());
    }

    Ok(())
}

fn comparison_table(plan: &RoutePlan) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec![
        "Route",
        "Distance (km)",
        "Duration (min)",
        "Excluded points",
    ]);

    let row = |name: &str, route: &CalculatedRoute| {
        vec![
            name.to_string(),
            format!("{:.2}", route.distance_km),
            format!("{:.1}", route.duration_minutes()),
            route.avoided_closures.to_string(),
        ]
    };

    table.add_row(row("Direct", &plan.direct_route));
    table.add_row(row("Avoiding closures", &plan.closure_aware_route));
    table.add_row(vec![
        "Difference".to_string(),
        format!("{:+.2}", plan.extra_distance_km()),
        format!("{:+.1}", plan.extra_minutes()),
        format!(
            "{} of {} closures relevant for {}",
            plan.relevant_closure_ids.len(),
            plan.closures.len(),
            plan.mode
        ),
    ]);

    table
}
