//! Map adapter over an injected mapping capability.
//!
//! The adapter builds exactly one map per container: it centres it, adds the
//! OpenStreetMap tile layer and places one severity-coloured marker per
//! report. Clicking a marker hands the report id to the host callback.
//! Calling `initialize` again is a no-op; `sync` re-centres an existing map
//! and replaces its markers.
//!
//! [`RecordingMap`] is a backend that records what would be drawn as a
//! serializable [`MapPlan`], which is what the HTTP layer returns.

use std::fmt;

use serde::Serialize;

use crate::error::Result;
use crate::location::{self, Geolocator};
use crate::models::{GeoPoint, Notification, PollutionReport, Severity, SeverityColor};

/// Default map centre (central India) and zoom.
pub const DEFAULT_CENTER: GeoPoint = GeoPoint::new(20.5937, 78.9629);
pub const DEFAULT_ZOOM: u8 = 5;

/// Zoom used after centring on the user's own position.
pub const LOCATED_ZOOM: u8 = 11;

// ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct MapId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct MarkerId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MapView {
    pub center: GeoPoint,
    pub zoom: u8,
}

impl Default for MapView {
    fn default() -> Self {
        Self {
            center: DEFAULT_CENTER,
            zoom: DEFAULT_ZOOM,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TileLayer {
    pub url_template: &'static str,
    pub attribution: &'static str,
}

pub const OSM_TILES: TileLayer = TileLayer {
    url_template: "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png",
    attribution: "&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> \
                  contributors",
};

/// Round coloured dot used as a marker icon.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkerIcon {
    pub class_name: &'static str,
    pub color: &'static str,
    pub html: String,
    pub size: [u32; 2],
    pub anchor: [u32; 2],
}

impl MarkerIcon {
    pub fn dot(color: SeverityColor) -> Self {
        // ---
        let hex = color.hex();
        Self {
            class_name: "custom-marker",
            color: hex,
            html: format!(
                "<div style=\"background-color: {hex}; width: 12px; height: 12px; \
                 border-radius: 50%; border: 2px solid white; \
                 box-shadow: 0 0 4px rgba(0,0,0,0.4);\"></div>"
            ),
            size: [12, 12],
            anchor: [6, 6],
        }
    }
}

/// The narrow surface of a mapping library the adapter depends on.
pub trait MapBackend {
    fn create_map(&mut self, container: &str, view: MapView) -> MapId;
    fn add_tile_layer(&mut self, map: MapId, layer: &TileLayer);
    fn add_marker(&mut self, map: MapId, at: GeoPoint, icon: MarkerIcon) -> MarkerId;
    fn bind_popup(&mut self, marker: MarkerId, html: String);
    fn set_view(&mut self, map: MapId, view: MapView);
    fn remove_marker(&mut self, marker: MarkerId);
}

/// Maps a severity to its marker colour.
pub type ColorFn = fn(Severity) -> SeverityColor;

/// Called with the report id of a clicked marker.
pub type ClickFn = Box<dyn FnMut(u32) + Send>;

pub struct MapAdapter<B: MapBackend> {
    backend: B,
    container: String,
    color: ColorFn,
    map: Option<MapId>,
    markers: Vec<(MarkerId, u32)>,
    on_click: Option<ClickFn>,
}

impl<B: MapBackend> MapAdapter<B> {
    pub fn new(backend: B, container: impl Into<String>, color: ColorFn) -> Self {
        Self {
            backend,
            container: container.into(),
            color,
            map: None,
            markers: Vec::new(),
            on_click: None,
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.map.is_some()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn into_backend(self) -> B {
        self.backend
    }

    /// Build the map once. Returns `false` if it already exists.
    pub fn initialize(
        &mut self,
        reports: &[&PollutionReport],
        view: MapView,
        on_click: ClickFn,
    ) -> bool {
        // ---
        if self.map.is_some() {
            tracing::debug!("Map for '{}' already initialised", self.container);
            return false;
        }

        let map = self.backend.create_map(&self.container, view);
        self.backend.add_tile_layer(map, &OSM_TILES);
        self.map = Some(map);
        self.on_click = Some(on_click);
        self.place_markers(map, reports);

        tracing::debug!(
            "Map for '{}' built with {} markers",
            self.container,
            self.markers.len()
        );
        true
    }

    /// Re-centre an existing map and replace its markers.
    ///
    /// Returns `false` when the map has not been built yet.
    pub fn sync(&mut self, reports: &[&PollutionReport], view: MapView) -> bool {
        // ---
        let Some(map) = self.map else {
            return false;
        };

        self.backend.set_view(map, view);
        for (marker, _) in self.markers.drain(..) {
            self.backend.remove_marker(marker);
        }
        self.place_markers(map, reports);
        true
    }

    /// Dispatch a marker click. Returns the report id it belongs to.
    pub fn click(&mut self, marker: MarkerId) -> Option<u32> {
        // ---
        let report_id = self
            .markers
            .iter()
            .find(|(m, _)| *m == marker)
            .map(|(_, id)| *id)?;

        if let Some(cb) = self.on_click.as_mut() {
            cb(report_id);
        }
        Some(report_id)
    }

    fn place_markers(&mut self, map: MapId, reports: &[&PollutionReport]) {
        // ---
        for report in reports {
            let icon = MarkerIcon::dot((self.color)(report.severity));
            let marker = self.backend.add_marker(map, report.coordinates, icon);
            self.backend.bind_popup(marker, popup_html(report));
            self.markers.push((marker, report.id));
        }
    }
}

impl<B: MapBackend> fmt::Debug for MapAdapter<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MapAdapter")
            .field("container", &self.container)
            .field("map", &self.map)
            .field("markers", &self.markers)
            .finish()
    }
}

fn popup_html(r: &PollutionReport) -> String {
    format!(
        "<div class=\"text-sm\"><h3 class=\"font-medium\">{} River</h3>\
         <p class=\"text-xs\">{}</p><p class=\"mt-1\">{}</p>\
         <div class=\"mt-2\"><span>Severity: {}/5</span></div></div>",
        escape(&r.river),
        escape(&r.location),
        escape(&r.description),
        r.severity.level()
    )
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

// ---

/// A marker as it would be drawn.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannedMarker {
    pub id: MarkerId,
    pub point: GeoPoint,
    pub icon: MarkerIcon,
    pub popup: Option<String>,
}

/// Everything drawn on one map.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapPlan {
    pub container: String,
    pub view: Option<MapView>,
    pub tile_layers: Vec<TileLayer>,
    pub markers: Vec<PlannedMarker>,
}

/// Backend that records drawing calls instead of rendering.
#[derive(Debug, Default)]
pub struct RecordingMap {
    plan: MapPlan,
    maps_created: usize,
    next_marker: usize,
}

impl RecordingMap {
    pub fn plan(&self) -> &MapPlan {
        &self.plan
    }

    pub fn into_plan(self) -> MapPlan {
        self.plan
    }

    pub fn maps_created(&self) -> usize {
        self.maps_created
    }
}

impl MapBackend for RecordingMap {
    fn create_map(&mut self, container: &str, view: MapView) -> MapId {
        self.maps_created += 1;
        self.plan.container = container.to_string();
        self.plan.view = Some(view);
        MapId(self.maps_created)
    }

    fn add_tile_layer(&mut self, _map: MapId, layer: &TileLayer) {
        self.plan.tile_layers.push(layer.clone());
    }

    fn add_marker(&mut self, _map: MapId, at: GeoPoint, icon: MarkerIcon) -> MarkerId {
        self.next_marker += 1;
        let id = MarkerId(self.next_marker);
        self.plan.markers.push(PlannedMarker {
            id,
            point: at,
            icon,
            popup: None,
        });
        id
    }

    fn bind_popup(&mut self, marker: MarkerId, html: String) {
        if let Some(m) = self.plan.markers.iter_mut().find(|m| m.id == marker) {
            m.popup = Some(html);
        }
    }

    fn set_view(&mut self, _map: MapId, view: MapView) {
        self.plan.view = Some(view);
    }

    fn remove_marker(&mut self, marker: MarkerId) {
        self.plan.markers.retain(|m| m.id != marker);
    }
}

/// Centre the map on the device position.
pub fn focus_on(locator: &dyn Geolocator) -> Result<(MapView, Notification)> {
    // ---
    let here = locator.current_position().map_err(|e| {
        tracing::warn!("Error getting location: {}", e);
        e
    })?;
    Ok((
        MapView {
            center: here,
            zoom: LOCATED_ZOOM,
        },
        location::detected(here),
    ))
}

/// One row of the severity legend.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LegendEntry {
    pub level: u8,
    pub label: String,
    pub color_class: &'static str,
    pub color: &'static str,
}

/// Legend rows, most severe first.
pub fn legend() -> Vec<LegendEntry> {
    (Severity::MIN.level()..=Severity::MAX.level())
        .rev()
        .filter_map(Severity::new)
        .map(|s| LegendEntry {
            level: s.level(),
            label: s.legend_label(),
            color_class: s.color().class(),
            color: s.color().hex(),
        })
        .collect()
}
