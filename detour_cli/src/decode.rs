use clap::Args;
use comfy_table::{Table, presets::UTF8_FULL};
use detour_core::polyline::{self, VALHALLA_PRECISION};

#[derive(Args)]
pub struct DecodeArgs {
    /// Encoded polyline
    #[arg(allow_hyphen_values = true)]
    polyline: String,

    /// 6 for Valhalla shapes, 5 for Google polylines
    #[arg(short, long, default_value_t = VALHALLA_PRECISION)]
    precision: u32,
}

pub fn run(args: DecodeArgs) -> anyhow::Result<()> {
    let points = polyline::decode(&args.polyline, args.precision)?;

    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec!["#", "Lat", "Lng"]);
    for (i, point) in points.iter().enumerate() {
        table.add_row(vec![
            i.to_string(),
            format!("{:.6}", point.lat),
            format!("{:.6}", point.lng),
        ]);
    }

    println!("{table}");

    Ok(())
}
