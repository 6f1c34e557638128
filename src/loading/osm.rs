//! OpenStreetMap XML → GeoJSON features.
//!
//! Produces the same feature shape as common OSM-to-GeoJSON converters, which
//! is what [`crate::build_road_network`] expects:
//!
//! - tagged nodes become `Point` features with id `node/<id>`
//! - ways become `LineString` features with id `way/<id>`, or `Polygon` when
//!   the way is closed and tagged as an area
//! - the element's tags become the feature's properties
//!
//! Relations are skipped. Way node references that do not resolve to a node in
//! the same document are dropped, and a way left with fewer than two positions
//! produces no feature.

use std::collections::HashMap;

use geojson::{feature::Id, Feature, FeatureCollection, Geometry, JsonObject, Value};
use log::debug;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::Result;

/// Tag keys that make a closed way an area rather than a ring-shaped line.
const AREA_KEYS: [&str; 7] = [
    "building", "landuse", "leisure", "natural", "amenity", "place", "area:highway",
];

/// Tags that carry no meaning on their own; a node with only these is untagged.
const UNINTERESTING_TAGS: [&str; 3] = ["created_by", "source", "converted_by"];

#[derive(Debug, Default)]
struct OsmNode {
    id: i64,
    lon: f64,
    lat: f64,
    tags: Vec<(String, String)>,
}

#[derive(Debug, Default)]
struct OsmWay {
    id: i64,
    node_refs: Vec<i64>,
    tags: Vec<(String, String)>,
}

/// Element whose children (`<nd>`, `<tag>`) are being read.
enum Open {
    Node(OsmNode),
    Way(OsmWay),
    /// Relations, or nodes/ways with unusable attributes
    Ignored,
}

#[derive(Default)]
struct OsmDocument {
    nodes: Vec<OsmNode>,
    ways: Vec<OsmWay>,
}

impl OsmDocument {
    fn close(&mut self, element: Open) {
        match element {
            Open::Node(node) => self.nodes.push(node),
            Open::Way(way) => self.ways.push(way),
            Open::Ignored => {}
        }
    }
}

fn attr_value(event: &BytesStart<'_>, key: &[u8]) -> Result<Option<String>> {
    for attr in event.attributes().with_checks(false) {
        let attr = attr.map_err(quick_xml::Error::from)?;
        if attr.key.as_ref() == key {
            return Ok(Some(attr.unescape_value()?.into_owned()));
        }
    }
    Ok(None)
}

fn parse_attr<T: std::str::FromStr>(event: &BytesStart<'_>, key: &[u8]) -> Result<Option<T>> {
    Ok(attr_value(event, key)?.and_then(|value| value.parse().ok()))
}

fn open_element(event: &BytesStart<'_>) -> Result<Option<Open>> {
    let open = match event.name().as_ref() {
        b"node" => {
            let id = parse_attr::<i64>(event, b"id")?;
            let lat = parse_attr::<f64>(event, b"lat")?;
            let lon = parse_attr::<f64>(event, b"lon")?;
            match (id, lat, lon) {
                (Some(id), Some(lat), Some(lon)) => Open::Node(OsmNode {
                    id,
                    lon,
                    lat,
                    tags: Vec::new(),
                }),
                _ => {
                    debug!("[OSM] Skipping node without id/lat/lon");
                    Open::Ignored
                }
            }
        }
        b"way" => match parse_attr::<i64>(event, b"id")? {
            Some(id) => Open::Way(OsmWay {
                id,
                ..OsmWay::default()
            }),
            None => Open::Ignored,
        },
        b"relation" => Open::Ignored,
        _ => return Ok(None),
    };
    Ok(Some(open))
}

fn read_child(event: &BytesStart<'_>, open: &mut Open) -> Result<()> {
    match event.name().as_ref() {
        b"nd" => {
            if let Open::Way(way) = open {
                if let Some(node_ref) = parse_attr::<i64>(event, b"ref")? {
                    way.node_refs.push(node_ref);
                }
            }
        }
        b"tag" => {
            let tags = match open {
                Open::Node(node) => &mut node.tags,
                Open::Way(way) => &mut way.tags,
                Open::Ignored => return Ok(()),
            };
            if let (Some(k), Some(v)) = (attr_value(event, b"k")?, attr_value(event, b"v")?) {
                tags.push((k, v));
            }
        }
        _ => {}
    }
    Ok(())
}

fn parse_document(xml: &str) -> Result<OsmDocument> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut document = OsmDocument::default();
    let mut open: Option<Open> = None;

    loop {
        match reader.read_event()? {
            Event::Eof => break,
            Event::Start(e) => match open.as_mut() {
                Some(element) => read_child(&e, element)?,
                None => open = open_element(&e)?,
            },
            Event::Empty(e) => match open.as_mut() {
                Some(element) => read_child(&e, element)?,
                None => {
                    if let Some(element) = open_element(&e)? {
                        document.close(element);
                    }
                }
            },
            Event::End(e) => {
                if matches!(e.name().as_ref(), b"node" | b"way" | b"relation") {
                    if let Some(element) = open.take() {
                        document.close(element);
                    }
                }
            }
            _ => {}
        }
    }

    Ok(document)
}

fn properties(id: String, tags: &[(String, String)]) -> JsonObject {
    let mut props = JsonObject::new();
    for (k, v) in tags {
        props.insert(k.clone(), serde_json::Value::String(v.clone()));
    }
    props.insert("@id".to_string(), serde_json::Value::String(id));
    props
}

fn feature(id: String, value: Value, tags: &[(String, String)]) -> Feature {
    Feature {
        bbox: None,
        geometry: Some(Geometry::new(value)),
        properties: Some(properties(id.clone(), tags)),
        id: Some(Id::String(id)),
        foreign_members: None,
    }
}

fn is_area(way: &OsmWay) -> bool {
    let closed = way.node_refs.len() >= 4 && way.node_refs.first() == way.node_refs.last();
    if !closed {
        return false;
    }
    let tag = |key: &str| way.tags.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str());
    match tag("area") {
        Some("yes") => true,
        Some("no") => false,
        _ => AREA_KEYS.iter().any(|key| tag(key).is_some()),
    }
}

/// Convert an OSM XML document into a GeoJSON feature collection.
///
/// Node features come first, then way features, each in document order.
pub fn osm_to_features(xml: &str) -> Result<FeatureCollection> {
    let document = parse_document(xml)?;

    let coords: HashMap<i64, Vec<f64>> = document
        .nodes
        .iter()
        .map(|n| (n.id, vec![n.lon, n.lat]))
        .collect();

    let mut features = Vec::new();

    for node in &document.nodes {
        let tagged = node
            .tags
            .iter()
            .any(|(k, _)| !UNINTERESTING_TAGS.contains(&k.as_str()));
        if tagged {
            features.push(feature(
                format!("node/{}", node.id),
                Value::Point(vec![node.lon, node.lat]),
                &node.tags,
            ));
        }
    }

    for way in &document.ways {
        let positions: Vec<Vec<f64>> = way
            .node_refs
            .iter()
            .filter_map(|node_ref| coords.get(node_ref).cloned())
            .collect();

        if positions.len() < way.node_refs.len() {
            debug!(
                "[OSM] Way {} references {} missing nodes",
                way.id,
                way.node_refs.len() - positions.len()
            );
        }
        if positions.len() < 2 {
            continue;
        }

        let value = if is_area(way) && positions.len() == way.node_refs.len() {
            Value::Polygon(vec![positions])
        } else {
            Value::LineString(positions)
        };
        features.push(feature(format!("way/{}", way.id), value, &way.tags));
    }

    debug!(
        "[OSM] Parsed {} nodes, {} ways into {} features",
        document.nodes.len(),
        document.ways.len(),
        features.len()
    );

    Ok(FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    })
}
