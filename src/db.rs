use anyhow::Result;
use rusqlite::Connection;

use crate::poi;

const DB_PATH: &str = "data/trails.sqlite";

pub fn connect() -> Result<Connection> {
    open(DB_PATH)
}

/// Open a specific database file; `connect` uses the fixed deployment path.
pub fn open(path: &str) -> Result<Connection> {
    let conn = Connection::open(path)?;
    conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
    Ok(conn)
}

/// Drop and recreate every table. Each run rebuilds the store from scratch;
/// children are dropped before the tables they reference.
pub fn reset_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        DROP TABLE IF EXISTS trail_tag_ids;
        DROP TABLE IF EXISTS coordinates;
        DROP TABLE IF EXISTS points_of_interest;
        DROP TABLE IF EXISTS trail_tags;
        DROP TABLE IF EXISTS trails;
        DROP TABLE IF EXISTS poi_types;

        CREATE TABLE trails (
            id          INTEGER PRIMARY KEY,
            name_summer TEXT,
            name_winter TEXT,
            distance    REAL,
            url         TEXT
        );

        CREATE TABLE trail_tags (
            id  INTEGER PRIMARY KEY,
            tag TEXT
        );

        CREATE TABLE trail_tag_ids (
            trail_id INTEGER,
            tag_id   INTEGER,
            FOREIGN KEY(trail_id) REFERENCES trails(id),
            FOREIGN KEY(tag_id) REFERENCES trail_tags(id)
        );

        CREATE TABLE coordinates (
            trail_id  INTEGER,
            latitude  REAL,
            longitude REAL,
            FOREIGN KEY(trail_id) REFERENCES trails(id)
        );

        CREATE TABLE poi_types (
            id   INTEGER PRIMARY KEY,
            name TEXT
        );

        CREATE TABLE points_of_interest (
            name      TEXT,
            type      INTEGER,
            latitude  REAL,
            longitude REAL,
            url       TEXT,
            FOREIGN KEY(type) REFERENCES poi_types(id)
        );
        ",
    )?;
    Ok(())
}

// ── Row types ──

#[derive(Debug)]
pub struct TrailRow {
    pub id: i64,
    pub name_summer: String,
    pub name_winter: String,
    pub distance_meters: f64,
    pub url: String,
}

#[derive(Debug)]
pub struct TagRow {
    pub id: i64,
    pub label: String,
}

#[derive(Debug)]
pub struct TrailTagRow {
    pub trail_id: i64,
    pub tag_id: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CoordinateRow {
    pub trail_id: i64,
    pub latitude: f64,
    pub longitude: f64,
}

// ── Writes ──

/// Persist one trail's worth of rows as a single committed unit: the trail,
/// any tags first seen on it, its tag links, and its vertices in path order.
pub fn save_trail(
    conn: &Connection,
    trail: &TrailRow,
    new_tags: &[TagRow],
    links: &[TrailTagRow],
    coordinates: &[CoordinateRow],
) -> Result<()> {
    let tx = conn.unchecked_transaction()?;
    {
        tx.execute(
            "INSERT INTO trails (id, name_summer, name_winter, distance, url)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            rusqlite::params![
                trail.id,
                trail.name_summer,
                trail.name_winter,
                trail.distance_meters,
                trail.url,
            ],
        )?;

        let mut tag_stmt = tx.prepare("INSERT INTO trail_tags (id, tag) VALUES (?1, ?2)")?;
        for t in new_tags {
            tag_stmt.execute(rusqlite::params![t.id, t.label])?;
        }

        let mut link_stmt =
            tx.prepare("INSERT INTO trail_tag_ids (trail_id, tag_id) VALUES (?1, ?2)")?;
        for l in links {
            link_stmt.execute(rusqlite::params![l.trail_id, l.tag_id])?;
        }

        let mut coord_stmt = tx.prepare(
            "INSERT INTO coordinates (trail_id, latitude, longitude) VALUES (?1, ?2, ?3)",
        )?;
        for c in coordinates {
            coord_stmt.execute(rusqlite::params![c.trail_id, c.latitude, c.longitude])?;
        }
    }
    tx.commit()?;
    Ok(())
}

/// Insert the static POI-type and POI seed rows as one committed batch.
/// Returns (type count, poi count).
pub fn seed_pois(conn: &Connection) -> Result<(usize, usize)> {
    let tx = conn.unchecked_transaction()?;
    {
        let mut type_stmt = tx.prepare("INSERT INTO poi_types (id, name) VALUES (?1, ?2)")?;
        for t in poi::POI_TYPES {
            type_stmt.execute(rusqlite::params![t.id, t.name])?;
        }

        let mut poi_stmt = tx.prepare(
            "INSERT INTO points_of_interest (name, type, latitude, longitude, url)
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )?;
        for p in poi::POIS {
            poi_stmt.execute(rusqlite::params![
                p.name,
                p.poi_type,
                p.latitude,
                p.longitude,
                p.url,
            ])?;
        }
    }
    tx.commit()?;
    Ok((poi::POI_TYPES.len(), poi::POIS.len()))
}

// ── Overview ──

pub struct OverviewRow {
    pub id: i64,
    pub name_summer: String,
    pub name_winter: String,
    pub distance_meters: f64,
    pub vertices: i64,
    pub tags: String,
}

pub fn fetch_overview(conn: &Connection, limit: usize) -> Result<Vec<OverviewRow>> {
    let sql = format!(
        "SELECT t.id, t.name_summer, t.name_winter, t.distance,
                (SELECT COUNT(*) FROM coordinates c WHERE c.trail_id = t.id),
                COALESCE((SELECT GROUP_CONCAT(g.tag, ', ')
                          FROM trail_tag_ids ti
                          JOIN trail_tags g ON g.id = ti.tag_id
                          WHERE ti.trail_id = t.id), '')
         FROM trails t
         ORDER BY t.id
         LIMIT {}",
        limit
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map([], |row| {
            Ok(OverviewRow {
                id: row.get(0)?,
                name_summer: row.get(1)?,
                name_winter: row.get(2)?,
                distance_meters: row.get(3)?,
                vertices: row.get(4)?,
                tags: row.get(5)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

// ── Stats ──

pub struct Stats {
    pub trails: usize,
    pub tags: usize,
    pub links: usize,
    pub coordinates: usize,
    pub poi_types: usize,
    pub pois: usize,
}

pub fn get_stats(conn: &Connection) -> Result<Stats> {
    let count = |table: &str| -> Result<usize> {
        let n = conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |r| r.get(0))?;
        Ok(n)
    };
    Ok(Stats {
        trails: count("trails")?,
        tags: count("trail_tags")?,
        links: count("trail_tag_ids")?,
        coordinates: count("coordinates")?,
        poi_types: count("poi_types")?,
        pois: count("points_of_interest")?,
    })
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    fn mem_conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("PRAGMA foreign_keys=ON;").unwrap();
        reset_schema(&conn).unwrap();
        conn
    }

    fn sample_trail() -> TrailRow {
        TrailRow {
            id: 0,
            name_summer: "Quarry Loop".into(),
            name_winter: "Quarry Loop North".into(),
            distance_meters: 1287.4,
            url: String::new(),
        }
    }

    #[test]
    fn save_trail_commits_all_rows() {
        let conn = mem_conn();
        save_trail(
            &conn,
            &sample_trail(),
            &[TagRow { id: 0, label: "Hiking".into() }],
            &[TrailTagRow { trail_id: 0, tag_id: 0 }],
            &[CoordinateRow { trail_id: 0, latitude: 44.15, longitude: -72.47 }],
        )
        .unwrap();

        let s = get_stats(&conn).unwrap();
        assert_eq!(s.trails, 1);
        assert_eq!(s.tags, 1);
        assert_eq!(s.links, 1);
        assert_eq!(s.coordinates, 1);
    }

    #[test]
    fn reset_schema_clears_prior_run() {
        let conn = mem_conn();
        save_trail(&conn, &sample_trail(), &[], &[], &[]).unwrap();
        seed_pois(&conn).unwrap();

        reset_schema(&conn).unwrap();
        let s = get_stats(&conn).unwrap();
        assert_eq!(s.trails, 0);
        assert_eq!(s.pois, 0);
    }

    #[test]
    fn seed_counts_match_static_lists() {
        let conn = mem_conn();
        let (types, pois) = seed_pois(&conn).unwrap();
        assert_eq!(types, crate::poi::POI_TYPES.len());
        assert_eq!(pois, crate::poi::POIS.len());

        let s = get_stats(&conn).unwrap();
        assert_eq!(s.poi_types, types);
        assert_eq!(s.pois, pois);

        let name: String = conn
            .query_row(
                "SELECT p.name FROM points_of_interest p
                 JOIN poi_types t ON t.id = p.type
                 WHERE t.name = 'Store'",
                [],
                |r| r.get(0),
            )
            .unwrap();
        assert_eq!(name, "Millstone Hill Touring Center");
    }

    #[test]
    fn broken_tag_link_is_rejected() {
        let conn = mem_conn();
        let result = save_trail(
            &conn,
            &sample_trail(),
            &[],
            &[TrailTagRow { trail_id: 0, tag_id: 99 }],
            &[],
        );
        assert!(result.is_err());
    }

    #[test]
    fn overview_joins_tags_in_order() {
        let conn = mem_conn();
        save_trail(
            &conn,
            &sample_trail(),
            &[
                TagRow { id: 0, label: "Hiking".into() },
                TagRow { id: 1, label: "Skiing".into() },
            ],
            &[
                TrailTagRow { trail_id: 0, tag_id: 0 },
                TrailTagRow { trail_id: 0, tag_id: 1 },
            ],
            &[CoordinateRow { trail_id: 0, latitude: 44.15, longitude: -72.47 }],
        )
        .unwrap();

        let rows = fetch_overview(&conn, 50).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].vertices, 1);
        assert_eq!(rows[0].tags, "Hiking, Skiing");
    }
}
