//! Composition of a MapLibre style document for stop places.
//!
//! The console only builds the document: one GeoJSON source per system plus
//! a circle and a label layer for each, drawn over a raster base layer.
//! Rendering is up to whatever map library loads the style.

use crate::config::MapConfig;
use crate::domain::model::StationInformation;
use serde_json::{json, Map, Value};

pub const PALETTE: [&str; 8] = [
    "#e6194b", "#3cb44b", "#4363d8", "#f58231", "#911eb4", "#42d4f4", "#f032e6", "#9a6324",
];

const BASE_SOURCE: &str = "base";
const LABEL_MIN_ZOOM: u8 = 14;

#[derive(Debug, Clone)]
pub struct StopPlaceLayer {
    pub system_id: String,
    pub stations: Vec<StationInformation>,
}

#[derive(Debug, Clone)]
pub struct MapComposition {
    pub style: Value,
    pub station_count: usize,
    /// Stations dropped for missing or out-of-range coordinates.
    pub skipped: usize,
}

pub fn layer_color(index: usize) -> &'static str {
    PALETTE[index % PALETTE.len()]
}

pub fn source_id(system_id: &str) -> String {
    format!("stops-{}", system_id)
}

fn station_feature(system_id: &str, station: &StationInformation, lon: f64, lat: f64) -> Value {
    json!({
        "type": "Feature",
        "geometry": {
            "type": "Point",
            "coordinates": [lon, lat],
        },
        "properties": {
            "stationId": station.station_id,
            "name": station.name.clone().unwrap_or_else(|| station.station_id.clone()),
            "systemId": system_id,
            "capacity": station.capacity,
        },
    })
}

fn system_layers(source: &str, color: &str) -> [Value; 2] {
    [
        json!({
            "id": format!("{}-circles", source),
            "type": "circle",
            "source": source,
            "paint": {
                "circle-radius": 5,
                "circle-color": color,
                "circle-stroke-width": 1,
                "circle-stroke-color": "#ffffff",
            },
        }),
        json!({
            "id": format!("{}-labels", source),
            "type": "symbol",
            "source": source,
            "minzoom": LABEL_MIN_ZOOM,
            "layout": {
                "text-field": ["get", "name"],
                "text-size": 11,
                "text-offset": [0, 1.2],
                "text-anchor": "top",
            },
            "paint": {
                "text-color": "#333333",
                "text-halo-color": "#ffffff",
                "text-halo-width": 1,
            },
        }),
    ]
}

pub fn compose_style(layers: &[StopPlaceLayer], config: &MapConfig) -> MapComposition {
    let mut sources = Map::new();
    sources.insert(
        BASE_SOURCE.to_string(),
        json!({
            "type": "raster",
            "tiles": [config.tile_url],
            "tileSize": 256,
            "attribution": config.tile_attribution,
        }),
    );

    let mut style_layers = vec![json!({
        "id": BASE_SOURCE,
        "type": "raster",
        "source": BASE_SOURCE,
    })];

    let mut station_count = 0;
    let mut skipped = 0;
    let (mut lon_sum, mut lat_sum) = (0.0, 0.0);

    for (index, layer) in layers.iter().enumerate() {
        let mut features = Vec::with_capacity(layer.stations.len());
        for station in &layer.stations {
            let Some((lon, lat)) = station.coordinates() else {
                skipped += 1;
                continue;
            };
            lon_sum += lon;
            lat_sum += lat;
            features.push(station_feature(&layer.system_id, station, lon, lat));
        }
        station_count += features.len();

        let source = source_id(&layer.system_id);
        sources.insert(
            source.clone(),
            json!({
                "type": "geojson",
                "data": { "type": "FeatureCollection", "features": features },
            }),
        );
        style_layers.extend(system_layers(&source, layer_color(index)));
    }

    if skipped > 0 {
        tracing::warn!("Skipped {} stations without usable coordinates", skipped);
    }

    let center = if station_count > 0 {
        [lon_sum / station_count as f64, lat_sum / station_count as f64]
    } else {
        [0.0, 0.0]
    };

    let style = json!({
        "version": 8,
        "name": "Stop places",
        "center": center,
        "zoom": config.default_zoom,
        "glyphs": config.glyphs_url,
        "sources": sources,
        "layers": style_layers,
    });

    MapComposition {
        style,
        station_count,
        skipped,
    }
}
