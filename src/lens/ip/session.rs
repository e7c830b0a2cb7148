//! Lookup session: owns the render collaborators and the current display
//!
//! Each lookup takes a [`LookupTicket`] from [`LookupSession::begin`]. When a
//! result arrives it is applied only if no newer lookup has started since, so
//! a slow response can never overwrite a faster, more recent one.

use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, warn};

use super::error::LookupResult;
use super::types::CanonicalLocation;

/// Map view shown before the first successful lookup
pub const INITIAL_VIEW: (f64, f64, u8) = (20.0, 0.0, 3);

/// Zoom level used when centering on a located address
pub const LOCATED_ZOOM: u8 = 13;

/// Map rendering collaborator
pub trait MapView {
    fn set_view(&mut self, lat: f64, lng: f64, zoom: u8);
    fn place_marker(&mut self, lat: f64, lng: f64, label: Option<&str>);
    fn clear_marker(&mut self);
}

/// Text panel collaborator
pub trait InfoPanel {
    fn set_ip(&mut self, ip: &str);
    fn set_location(&mut self, location: &str);
    fn set_timezone(&mut self, timezone: &str);
    fn set_isp(&mut self, isp: &str);
}

/// Generation stamp handed out when a lookup starts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LookupTicket(u64);

impl LookupTicket {
    pub fn generation(&self) -> u64 {
        self.0
    }
}

/// What happened to a completed lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// The result was rendered
    Applied,
    /// A newer lookup started after this one; the result was dropped
    Stale,
}

pub struct LookupSession<M: MapView, P: InfoPanel> {
    map: M,
    panel: P,
    generation: AtomicU64,
    current: Option<CanonicalLocation>,
}

impl<M: MapView, P: InfoPanel> LookupSession<M, P> {
    /// Create a session and put the map at its initial view
    pub fn new(mut map: M, panel: P) -> Self {
        let (lat, lng, zoom) = INITIAL_VIEW;
        map.set_view(lat, lng, zoom);
        Self {
            map,
            panel,
            generation: AtomicU64::new(0),
            current: None,
        }
    }

    /// Start a new lookup, superseding any lookup still in flight
    pub fn begin(&self) -> LookupTicket {
        LookupTicket(self.generation.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Whether `ticket` belongs to the most recently started lookup
    pub fn is_current(&self, ticket: LookupTicket) -> bool {
        self.generation.load(Ordering::SeqCst) == ticket.0
    }

    /// Render the outcome of the lookup identified by `ticket`.
    ///
    /// Failures reset every field to the unknown placeholder.
    pub fn complete(
        &mut self,
        ticket: LookupTicket,
        result: &LookupResult<CanonicalLocation>,
    ) -> Completion {
        if !self.is_current(ticket) {
            warn!(
                "dropping stale lookup result (generation {}, latest {})",
                ticket.0,
                self.generation.load(Ordering::SeqCst)
            );
            return Completion::Stale;
        }

        match result {
            Ok(loc) => self.render(loc),
            Err(e) => {
                debug!("lookup failed, resetting display: {}", e);
                self.reset();
            }
        }
        Completion::Applied
    }

    /// Reset the display to all-unknown and remove the marker
    pub fn reset(&mut self) {
        let unknown = CanonicalLocation::unknown();
        self.fill_panel(&unknown);
        self.map.clear_marker();
        self.current = None;
    }

    /// The record currently on display, if the last lookup succeeded
    pub fn current(&self) -> Option<&CanonicalLocation> {
        self.current.as_ref()
    }

    pub fn map(&self) -> &M {
        &self.map
    }

    pub fn panel(&self) -> &P {
        &self.panel
    }

    fn render(&mut self, loc: &CanonicalLocation) {
        self.fill_panel(loc);

        match loc.coordinates() {
            Some(c) => {
                let label = loc.location_line();
                self.map.set_view(c.latitude, c.longitude, LOCATED_ZOOM);
                self.map
                    .place_marker(c.latitude, c.longitude, Some(label.as_str()));
            }
            None => {
                debug!("no usable coordinates for {}, skipping map placement", loc.ip);
                self.map.clear_marker();
            }
        }

        self.current = Some(loc.clone());
    }

    fn fill_panel(&mut self, loc: &CanonicalLocation) {
        self.panel.set_ip(&loc.ip);
        self.panel.set_location(&loc.location_line());
        self.panel.set_timezone(&loc.timezone);
        self.panel.set_isp(&loc.isp);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lens::ip::error::LookupError;
    use crate::lens::ip::types::UNKNOWN;

    #[derive(Default)]
    struct RecordingMap {
        view: Option<(f64, f64, u8)>,
        marker: Option<(f64, f64, Option<String>)>,
    }

    impl MapView for RecordingMap {
        fn set_view(&mut self, lat: f64, lng: f64, zoom: u8) {
            assert!(lat.is_finite() && lng.is_finite());
            self.view = Some((lat, lng, zoom));
        }

        fn place_marker(&mut self, lat: f64, lng: f64, label: Option<&str>) {
            assert!(lat.is_finite() && lng.is_finite());
            self.marker = Some((lat, lng, label.map(str::to_string)));
        }

        fn clear_marker(&mut self) {
            self.marker = None;
        }
    }

    #[derive(Default)]
    struct RecordingPanel {
        ip: String,
        location: String,
        timezone: String,
        isp: String,
    }

    impl InfoPanel for RecordingPanel {
        fn set_ip(&mut self, ip: &str) {
            self.ip = ip.to_string();
        }
        fn set_location(&mut self, location: &str) {
            self.location = location.to_string();
        }
        fn set_timezone(&mut self, timezone: &str) {
            self.timezone = timezone.to_string();
        }
        fn set_isp(&mut self, isp: &str) {
            self.isp = isp.to_string();
        }
    }

    fn session() -> LookupSession<RecordingMap, RecordingPanel> {
        LookupSession::new(RecordingMap::default(), RecordingPanel::default())
    }

    fn paris() -> CanonicalLocation {
        CanonicalLocation {
            ip: "1.2.3.4".to_string(),
            city: "Paris".to_string(),
            country: "France".to_string(),
            latitude: Some(48.8),
            longitude: Some(2.3),
            ..CanonicalLocation::unknown()
        }
    }

    #[test]
    fn test_initial_view() {
        let s = session();
        assert_eq!(s.map().view, Some((20.0, 0.0, 3)));
        assert!(s.map().marker.is_none());
    }

    #[test]
    fn test_success_renders_panel_and_marker() {
        let mut s = session();
        let ticket = s.begin();
        assert_eq!(s.complete(ticket, &Ok(paris())), Completion::Applied);

        assert_eq!(s.panel().ip, "1.2.3.4");
        assert_eq!(s.panel().location, "Paris, France");
        assert_eq!(s.panel().timezone, UNKNOWN);
        assert_eq!(s.map().view, Some((48.8, 2.3, LOCATED_ZOOM)));
        assert_eq!(
            s.map().marker,
            Some((48.8, 2.3, Some("Paris, France".to_string())))
        );
        assert_eq!(s.current(), Some(&paris()));
    }

    #[test]
    fn test_missing_coordinates_skip_map() {
        let mut s = session();
        let ticket = s.begin();
        let loc = CanonicalLocation {
            latitude: None,
            ..paris()
        };
        s.complete(ticket, &Ok(loc));

        assert_eq!(s.panel().ip, "1.2.3.4");
        assert_eq!(s.map().view, Some(INITIAL_VIEW));
        assert!(s.map().marker.is_none());
    }

    #[test]
    fn test_failure_resets_display() {
        let mut s = session();
        let first = s.begin();
        s.complete(first, &Ok(paris()));

        let second = s.begin();
        let err = LookupError::ResolutionFailure("no answer".to_string());
        assert_eq!(s.complete(second, &Err(err)), Completion::Applied);

        assert_eq!(s.panel().ip, UNKNOWN);
        assert_eq!(s.panel().location, UNKNOWN);
        assert_eq!(s.panel().timezone, UNKNOWN);
        assert_eq!(s.panel().isp, UNKNOWN);
        assert!(s.map().marker.is_none());
        assert!(s.current().is_none());
    }

    #[test]
    fn test_stale_result_is_dropped() {
        let mut s = session();
        let slow = s.begin();
        let fast = s.begin();
        assert!(!s.is_current(slow));

        assert_eq!(s.complete(fast, &Ok(paris())), Completion::Applied);

        let other = CanonicalLocation {
            ip: "9.9.9.9".to_string(),
            ..CanonicalLocation::unknown()
        };
        assert_eq!(s.complete(slow, &Ok(other)), Completion::Stale);
        assert_eq!(s.panel().ip, "1.2.3.4");
    }

    #[test]
    fn test_ticket_generations_increase() {
        let s = session();
        let a = s.begin();
        let b = s.begin();
        assert!(b.generation() > a.generation());
    }
}
