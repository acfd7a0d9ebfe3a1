mod db;
mod extract;
mod kml;
mod poi;

use std::time::Instant;

use anyhow::Result;
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use rusqlite::Connection;

use extract::tags::TagRegistry;

const KML_PATH: &str = "data/trails.kml";

#[derive(Parser)]
#[command(name = "trail_builder", about = "Trail-guide database builder: KML to normalized SQLite")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rebuild the database from the KML source (drops any prior run)
    Build,
    /// Show row counts per table
    Stats,
    /// Trail listing with tags and vertex counts
    Overview {
        /// Max rows to display
        #[arg(short = 'n', long, default_value = "50")]
        limit: usize,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Build => {
            let conn = db::connect()?;
            let counts = build(&conn, KML_PATH)?;
            counts.print();
            Ok(())
        }
        Commands::Stats => {
            let conn = db::connect()?;
            let s = db::get_stats(&conn)?;
            println!("Trails:      {}", s.trails);
            println!("Tags:        {}", s.tags);
            println!("Tag links:   {}", s.links);
            println!("Coordinates: {}", s.coordinates);
            println!("POI types:   {}", s.poi_types);
            println!("POIs:        {}", s.pois);
            Ok(())
        }
        Commands::Overview { limit } => {
            let conn = db::connect()?;
            let rows = db::fetch_overview(&conn, limit)?;
            if rows.is_empty() {
                println!("No trails found. Run 'build' first.");
                return Ok(());
            }

            println!(
                "{:>3} | {:<26} | {:<26} | {:>9} | {:>5} | {}",
                "#", "Summer name", "Winter name", "Meters", "Verts", "Tags"
            );
            println!("{}", "-".repeat(100));

            for r in &rows {
                println!(
                    "{:>3} | {:<26} | {:<26} | {:>9.1} | {:>5} | {}",
                    r.id,
                    truncate(&r.name_summer, 26),
                    truncate(&r.name_winter, 26),
                    r.distance_meters,
                    r.vertices,
                    r.tags
                );
            }

            println!("\n{} trails", rows.len());
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }

    result
}

struct BuildCounts {
    trails: usize,
    tags: usize,
    links: usize,
    coordinates: usize,
    poi_types: usize,
    pois: usize,
}

impl BuildCounts {
    fn print(&self) {
        println!(
            "Saved {} trails, {} tags, {} tag links, {} coordinates; seeded {} POI types, {} POIs.",
            self.trails, self.tags, self.links, self.coordinates, self.poi_types, self.pois,
        );
    }
}

/// Full rebuild: reset the schema, extract every placemark in document
/// order committing one record at a time, then seed the static POI rows.
fn build(conn: &Connection, kml_path: &str) -> Result<BuildCounts> {
    db::reset_schema(conn)?;

    let placemarks = kml::load(kml_path)?;
    println!("Processing {} placemarks...", placemarks.len());

    let pb = ProgressBar::new(placemarks.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len}")?
            .progress_chars("#>-"),
    );

    let mut registry = TagRegistry::new();
    let mut counts = BuildCounts {
        trails: 0,
        tags: 0,
        links: 0,
        coordinates: 0,
        poi_types: 0,
        pois: 0,
    };

    for (ordinal, placemark) in placemarks.iter().enumerate() {
        let record = extract::extract_trail(placemark, ordinal as i64, &mut registry)?;
        db::save_trail(
            conn,
            &record.trail,
            &record.new_tags,
            &record.links,
            &record.coordinates,
        )?;
        counts.trails += 1;
        counts.tags += record.new_tags.len();
        counts.links += record.links.len();
        counts.coordinates += record.coordinates.len();
        pb.inc(1);
    }

    pb.finish_and_clear();

    let (poi_types, pois) = db::seed_pois(conn)?;
    counts.poi_types = poi_types;
    counts.pois = pois;

    Ok(counts)
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max).collect();
        format!("{}...", truncated)
    }
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else {
        format!("{}m {}s", secs / 60, secs % 60)
    }
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = "tests/fixtures/trails.kml";

    fn dump(conn: &Connection, sql: &str) -> Vec<String> {
        let mut stmt = conn.prepare(sql).unwrap();
        let cols = stmt.column_count();
        stmt.query_map([], |row| {
            let mut parts = Vec::new();
            for i in 0..cols {
                parts.push(format!("{:?}", row.get_ref(i).unwrap()));
            }
            Ok(parts.join("|"))
        })
        .unwrap()
        .collect::<Result<Vec<_>, _>>()
        .unwrap()
    }

    fn dump_all(conn: &Connection) -> Vec<String> {
        let mut all = Vec::new();
        all.extend(dump(conn, "SELECT * FROM trails ORDER BY id"));
        all.extend(dump(conn, "SELECT * FROM trail_tags ORDER BY id"));
        all.extend(dump(conn, "SELECT * FROM trail_tag_ids ORDER BY trail_id, tag_id"));
        all.extend(dump(conn, "SELECT * FROM coordinates ORDER BY rowid"));
        all.extend(dump(conn, "SELECT * FROM poi_types ORDER BY id"));
        all.extend(dump(conn, "SELECT * FROM points_of_interest ORDER BY rowid"));
        all
    }

    #[test]
    fn build_counts_match_fixture() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trails.sqlite");
        let conn = db::open(path.to_str().unwrap()).unwrap();

        let counts = build(&conn, FIXTURE).unwrap();
        assert_eq!(counts.trails, 3);
        assert_eq!(counts.tags, 4);
        assert_eq!(counts.links, 5);
        assert_eq!(counts.coordinates, 9);
        assert_eq!(counts.poi_types, poi::POI_TYPES.len());
        assert_eq!(counts.pois, poi::POIS.len());

        let s = db::get_stats(&conn).unwrap();
        assert_eq!(s.trails, 3);
        assert_eq!(s.tags, 4);
        assert_eq!(s.links, 5);
        assert_eq!(s.coordinates, 9);
    }

    #[test]
    fn trail_ids_are_contiguous_in_document_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trails.sqlite");
        let conn = db::open(path.to_str().unwrap()).unwrap();
        build(&conn, FIXTURE).unwrap();

        let mut stmt = conn.prepare("SELECT id, name_summer FROM trails ORDER BY id").unwrap();
        let rows: Vec<(i64, String)> = stmt
            .query_map([], |r| Ok((r.get(0)?, r.get(1)?)))
            .unwrap()
            .collect::<Result<Vec<_>, _>>()
            .unwrap();
        let ids: Vec<i64> = rows.iter().map(|(id, _)| *id).collect();
        assert_eq!(ids, vec![0, 1, 2]);
        assert_eq!(rows[0].1, "Quarry Loop");
        assert_eq!(rows[2].1, "Boulder Ramble");
    }

    #[test]
    fn no_zero_coordinates_stored() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trails.sqlite");
        let conn = db::open(path.to_str().unwrap()).unwrap();
        build(&conn, FIXTURE).unwrap();

        let zeros: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM coordinates WHERE latitude = 0.0 OR longitude = 0.0",
                [],
                |r| r.get(0),
            )
            .unwrap();
        assert_eq!(zeros, 0);
    }

    #[test]
    fn rebuild_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trails.sqlite");
        let conn = db::open(path.to_str().unwrap()).unwrap();

        build(&conn, FIXTURE).unwrap();
        let first = dump_all(&conn);
        build(&conn, FIXTURE).unwrap();
        let second = dump_all(&conn);
        assert_eq!(first, second);
    }
}
