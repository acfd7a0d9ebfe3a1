pub mod coords;
pub mod tags;

use anyhow::{bail, Context, Result};

use crate::db::{CoordinateRow, TagRow, TrailRow, TrailTagRow};
use crate::kml::Placemark;
use tags::TagRegistry;

const POS_SUMMER_USE: usize = 0;
const POS_WINTER_USE: usize = 1;
const POS_SUMMER_NAME: usize = 3;
const POS_WINTER_NAME: usize = 4;
const POS_LENGTH_M: usize = 10;

/// Expected (position, SimpleData name) layout of each placemark's
/// SchemaData block. Values are read by position, but only after the names
/// at those positions have been checked, so a reordered upstream export
/// fails loudly instead of binding fields to the wrong meaning.
const SCHEMA_ORDER: &[(usize, &str)] = &[
    (POS_SUMMER_USE, "SUMMER_USE"),
    (POS_WINTER_USE, "WINTER_USE"),
    (POS_SUMMER_NAME, "SUMMER_NAME"),
    (POS_WINTER_NAME, "WINTER_NAME"),
    (POS_LENGTH_M, "LENGTH_M"),
];

/// One placemark's normalized output, persisted as a single unit.
#[derive(Debug)]
pub struct TrailRecord {
    pub trail: TrailRow,
    pub new_tags: Vec<TagRow>,
    pub links: Vec<TrailTagRow>,
    pub coordinates: Vec<CoordinateRow>,
}

/// Extract one placemark into its normalized rows. `ordinal` is the
/// 0-based document position and becomes the trail id.
pub fn extract_trail(
    placemark: &Placemark,
    ordinal: i64,
    registry: &mut TagRegistry,
) -> Result<TrailRecord> {
    validate_schema(placemark, ordinal)?;

    let field = |pos: usize| placemark.fields[pos].value.as_str();
    let summer_tag = field(POS_SUMMER_USE);
    let winter_tag = field(POS_WINTER_USE);

    let distance_meters: f64 = field(POS_LENGTH_M).trim().parse().with_context(|| {
        format!(
            "Placemark {}: LENGTH_M value {:?} is not a number",
            ordinal,
            field(POS_LENGTH_M)
        )
    })?;

    let coordinates = coords::parse_coordinates(&placemark.coordinates, ordinal);

    let mut new_tags = Vec::new();
    let mut links = Vec::new();
    let registered = registry.register(summer_tag, ordinal);
    links.push(registered.link);
    new_tags.extend(registered.new_tag);

    // One link per season, collapsed when both seasons carry the same tag.
    if !TagRegistry::same_label(summer_tag, winter_tag) {
        let registered = registry.register(winter_tag, ordinal);
        links.push(registered.link);
        new_tags.extend(registered.new_tag);
    }

    Ok(TrailRecord {
        trail: TrailRow {
            id: ordinal,
            name_summer: field(POS_SUMMER_NAME).to_string(),
            name_winter: field(POS_WINTER_NAME).to_string(),
            distance_meters,
            url: String::new(),
        },
        new_tags,
        links,
        coordinates,
    })
}

fn validate_schema(placemark: &Placemark, ordinal: i64) -> Result<()> {
    for &(pos, name) in SCHEMA_ORDER {
        match placemark.fields.get(pos) {
            None => bail!(
                "Placemark {}: metadata block has {} fields, expected {:?} at position {}",
                ordinal,
                placemark.fields.len(),
                name,
                pos
            ),
            Some(f) if f.name != name => bail!(
                "Placemark {}: expected field {:?} at position {}, found {:?}",
                ordinal,
                name,
                pos,
                f.name
            ),
            Some(_) => {}
        }
    }
    Ok(())
}

// ── Tests ──
