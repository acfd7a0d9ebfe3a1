use anyhow::{bail, Context, Result};
use quick_xml::events::{BytesStart, Event};
use tracing::info;

/// One `<SimpleData>` entry of a placemark's `<SchemaData>` block, in
/// document order.
#[derive(Debug, Clone)]
pub struct MetaField {
    pub name: String,
    pub value: String,
}

/// One `<Placemark>`: its ordered metadata fields plus the raw text of its
/// `<LineString><coordinates>` block.
#[derive(Debug, Clone)]
pub struct Placemark {
    pub fields: Vec<MetaField>,
    pub coordinates: String,
}

pub fn load(path: &str) -> Result<Vec<Placemark>> {
    let xml = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read KML file {}", path))?;
    let placemarks = parse_document(&xml)?;
    info!("Parsed {} placemarks from {}", placemarks.len(), path);
    Ok(placemarks)
}

/// Parse a KML document into its placemarks, in document order.
///
/// Every placemark must carry one SchemaData block and one
/// LineString/coordinates block; a record missing either aborts the parse.
/// When a placemark has more than one of either block, the first wins.
pub fn parse_document(xml: &str) -> Result<Vec<Placemark>> {
    let mut reader = quick_xml::Reader::from_str(xml);
    let mut placemarks: Vec<Placemark> = Vec::new();
    let mut buf = Vec::new();

    let mut in_placemark = false;
    let mut in_schema_data = false;
    let mut in_linestring = false;
    let mut in_coordinates = false;
    let mut seen_schema_data = false;

    let mut fields: Vec<MetaField> = Vec::new();
    let mut field_name: Option<String> = None;
    let mut field_value = String::new();
    let mut coord_buf = String::new();
    let mut coordinates: Option<String> = None;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => match e.name().as_ref() {
                b"Placemark" => {
                    in_placemark = true;
                    seen_schema_data = false;
                    fields.clear();
                    coordinates = None;
                }
                b"SchemaData" if in_placemark && !seen_schema_data => {
                    in_schema_data = true;
                    seen_schema_data = true;
                }
                b"SimpleData" if in_schema_data => {
                    field_name = Some(attr_value(&e, "name")?.unwrap_or_default());
                    field_value.clear();
                }
                b"LineString" if in_placemark => in_linestring = true,
                b"coordinates" if in_linestring => {
                    in_coordinates = true;
                    coord_buf.clear();
                }
                _ => {}
            },
            Ok(Event::Empty(e)) if in_schema_data && e.name().as_ref() == b"SimpleData" => {
                fields.push(MetaField {
                    name: attr_value(&e, "name")?.unwrap_or_default(),
                    value: String::new(),
                });
            }
            Ok(Event::Text(e)) => {
                if field_name.is_some() {
                    field_value.push_str(&e.unescape()?);
                } else if in_coordinates {
                    coord_buf.push_str(&e.unescape()?);
                }
            }
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"SimpleData" => {
                    if let Some(name) = field_name.take() {
                        fields.push(MetaField {
                            name,
                            value: std::mem::take(&mut field_value),
                        });
                    }
                }
                b"SchemaData" => in_schema_data = false,
                b"coordinates" => {
                    in_coordinates = false;
                    if in_linestring && coordinates.is_none() {
                        coordinates = Some(std::mem::take(&mut coord_buf));
                    }
                }
                b"LineString" => in_linestring = false,
                b"Placemark" => {
                    if !seen_schema_data {
                        bail!("Placemark {} has no SchemaData block", placemarks.len());
                    }
                    let Some(coordinates) = coordinates.take() else {
                        bail!(
                            "Placemark {} has no LineString coordinates",
                            placemarks.len()
                        );
                    };
                    placemarks.push(Placemark {
                        fields: std::mem::take(&mut fields),
                        coordinates,
                    });
                    in_placemark = false;
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(e.into()),
            _ => {}
        }
        buf.clear();
    }

    Ok(placemarks)
}

fn attr_value(e: &BytesStart, name: &str) -> Result<Option<String>> {
    Ok(e.try_get_attribute(name)?
        .map(|a| a.unescape_value())
        .transpose()?
        .map(|v| v.into_owned()))
}

// ── Tests ──
