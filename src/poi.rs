//! Static point-of-interest seed rows.
//!
//! These come from the guide's hand-curated list, not from the KML source,
//! and are inserted verbatim at the end of every rebuild.

pub struct PoiType {
    pub id: i64,
    pub name: &'static str,
}

pub struct Poi {
    pub name: &'static str,
    pub poi_type: i64,
    pub latitude: f64,
    pub longitude: f64,
    pub url: Option<&'static str>,
}

pub const PARKING_LOT: i64 = 1;
pub const OVERLOOK: i64 = 2;
pub const STORE: i64 = 3;
pub const HISTORIC_SITE: i64 = 4;

pub static POI_TYPES: &[PoiType] = &[
    PoiType { id: PARKING_LOT, name: "Parking Lot" },
    PoiType { id: OVERLOOK, name: "Overlook" },
    PoiType { id: STORE, name: "Store" },
    PoiType { id: HISTORIC_SITE, name: "Historic Site" },
];

pub static POIS: &[Poi] = &[
    Poi {
        name: "Canyon Road Trailhead",
        poi_type: PARKING_LOT,
        latitude: 44.16137,
        longitude: -72.47804,
        url: None,
    },
    Poi {
        name: "Brook Street Trailhead",
        poi_type: PARKING_LOT,
        latitude: 44.15225,
        longitude: -72.49369,
        url: None,
    },
    Poi {
        name: "Littlejohn Road Lot",
        poi_type: PARKING_LOT,
        latitude: 44.14489,
        longitude: -72.48097,
        url: None,
    },
    Poi {
        name: "Grand Lookout",
        poi_type: OVERLOOK,
        latitude: 44.15693,
        longitude: -72.47311,
        url: None,
    },
    Poi {
        name: "Brook Quarry Overlook",
        poi_type: OVERLOOK,
        latitude: 44.15102,
        longitude: -72.48755,
        url: None,
    },
    Poi {
        name: "Millstone Hill Touring Center",
        poi_type: STORE,
        latitude: 44.15474,
        longitude: -72.48716,
        url: Some("http://www.millstonetrails.com"),
    },
    Poi {
        name: "Barclay Quarry",
        poi_type: HISTORIC_SITE,
        latitude: 44.15617,
        longitude: -72.47489,
        url: None,
    },
    Poi {
        name: "Grand Quarry Ruins",
        poi_type: HISTORIC_SITE,
        latitude: 44.15729,
        longitude: -72.47258,
        url: None,
    },
];
