use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use rusty_facets::data::loader::load_file;
use rusty_facets::Explorer;

fn main() -> Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let Some(path) = args.next().map(PathBuf::from) else {
        bail!("usage: rusty-facets <data.json|data.csv> [dimension]");
    };
    let dimension: Option<usize> = args
        .next()
        .map(|d| d.parse::<usize>().with_context(|| format!("invalid dimension '{d}'")))
        .transpose()?;

    let blob = load_file(&path)?;
    let mut explorer = Explorer::from_blob(blob).context("analysing dataset")?;

    let shape = *explorer.shape();
    println!(
        "shape: {} | j={} k={} n={} m={} total={}",
        shape.value_type, shape.j, shape.k, shape.n, shape.m, shape.total_dim
    );

    let dims = explorer.available_dimensions();
    println!("available dimensions: {dims:?}");

    let dimensions: Vec<usize> = match dimension {
        Some(d) => vec![d],
        None => dims.into_iter().collect(),
    };

    for d in dimensions {
        let count = explorer
            .select_dimension(d)
            .with_context(|| format!("enumerating dimension {d}"))?
            .len();
        println!("\n{d}D: {count} views");

        for view in explorer.views() {
            let encoding = explorer.active_encoding(view.id)?;
            let projection = explorer.projection(view.id)?;
            let flag = if explorer.exceeds_display_limit(view.id)? {
                " (too many to draw)"
            } else {
                ""
            };
            let encodings: Vec<String> = view
                .encoding_kinds()
                .iter()
                .map(ToString::to_string)
                .collect();
            println!(
                "  [{:>3}] {:<28} {:<10} [{}] -> {} records in window ({}){flag}",
                view.id,
                view.name,
                view.data_type,
                encodings.join(" | "),
                projection.len(),
                encoding,
            );
        }
    }

    Ok(())
}
