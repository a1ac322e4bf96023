mod common;

use campusmap::{
    geolocation::{
        Geolocation, Position, PositionOptions, PositionWatch, StartOutcome, TrackingState,
    },
    MapError, MapEvent, PixelPoint, Point,
};
use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

/// Integration tests for GPS tracking and following
#[cfg(test)]
mod gps_tests {
    use super::*;
    use common::*;

    fn following_log(map: &mut campusmap::CampusMap) -> Arc<Mutex<Vec<bool>>> {
        let log = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&log);
        map.on_following_change(move |following| sink.lock().unwrap().push(following));
        log
    }

    #[test]
    fn test_start_follows_and_recenters() {
        let (mut map, geolocation) = tracked_map();
        let changes = following_log(&mut map);
        let feeder = geolocation.feeder();

        assert_eq!(map.start_gps().unwrap(), StartOutcome::Started);
        assert_eq!(map.tracking_state(), TrackingState::Watching);
        assert!(map.is_following());

        feeder.push(Position::new(1000.0, 1500.0));
        assert_eq!(map.poll_gps().unwrap(), 1);
        assert_eq!(
            map.marker_position("user-marker"),
            Some(Point::new(1000.0, 2075.0))
        );
        assert!(map.viewport().is_animating());

        map.advance(Duration::from_millis(1000));
        assert_eq!(map.viewport().center(), Point::new(1000.0, 2075.0));
        assert_eq!(map.viewport().zoom(), 4.5);
        assert_eq!(*changes.lock().unwrap(), vec![true]);
    }

    #[test]
    fn test_implausible_readings_are_discarded() {
        let (mut map, geolocation) = tracked_map();
        let feeder = geolocation.feeder();
        map.start_gps().unwrap();

        feeder.push(Position::new(5431.0, 1000.0));
        feeder.push(Position::new(1000.0, 5375.0));
        feeder.push(Position::new(0.0, 1000.0));
        assert_eq!(map.poll_gps().unwrap(), 0);
        assert_eq!(map.marker_position("user-marker"), None);
        assert_eq!(map.last_known_position(), None);

        feeder.push(Position::new(100.0, 100.0));
        assert_eq!(map.poll_gps().unwrap(), 1);
        assert_eq!(map.last_known_position(), Some(PixelPoint::new(100, 100)));
        assert_eq!(
            map.marker_position("user-marker"),
            Some(Point::new(100.0, 3475.0))
        );
    }

    #[test]
    fn test_drag_stops_following() {
        let (mut map, geolocation) = tracked_map();
        let changes = following_log(&mut map);
        let feeder = geolocation.feeder();
        map.start_gps().unwrap();

        feeder.push(Position::new(1000.0, 1500.0));
        map.poll_gps().unwrap();
        map.handle_input(campusmap::InputEvent::Drag {
            delta: Point::new(10.0, 10.0),
        })
        .unwrap();
        assert!(!map.is_following());
        assert!(!map.viewport().is_animating());
        let center = map.viewport().center();

        // the marker keeps tracking, the view stays put
        feeder.push(Position::new(1200.0, 1500.0));
        map.poll_gps().unwrap();
        assert_eq!(
            map.marker_position("user-marker"),
            Some(Point::new(1200.0, 2075.0))
        );
        assert!(!map.viewport().is_animating());
        assert_eq!(map.viewport().center(), center);

        // restarting recenters on the last reading without a second watch
        assert_eq!(
            map.start_gps().unwrap(),
            StartOutcome::Recentered(Some(PixelPoint::new(1200, 1500)))
        );
        assert!(map.viewport().is_animating());
        assert_eq!(*changes.lock().unwrap(), vec![true, false, true]);
    }

    struct DeniedGeolocation;

    impl Geolocation for DeniedGeolocation {
        fn watch_position(&self, _options: &PositionOptions) -> campusmap::Result<PositionWatch> {
            Err(MapError::Geolocation("permission denied".to_string()))
        }
    }

    #[test]
    fn test_refused_watch_leaves_following_off() {
        let mut map = campusmap::CampusMap::builder(config())
            .with_locations(locations())
            .with_document(document())
            .with_geolocation(DeniedGeolocation)
            .build()
            .unwrap();
        let changes = following_log(&mut map);

        assert!(matches!(map.start_gps(), Err(MapError::Geolocation(_))));
        assert!(!map.is_following());
        assert_eq!(map.tracking_state(), TrackingState::Unstarted);

        // nothing was following, so a drag has nothing to report
        map.handle_input(campusmap::InputEvent::Drag {
            delta: Point::new(10.0, 0.0),
        })
        .unwrap();
        assert!(changes.lock().unwrap().is_empty());
    }

    #[test]
    fn test_unsupported_geolocation() {
        let (mut map, _) = campus_map();
        let events = Arc::new(Mutex::new(0));
        let sink = Arc::clone(&events);
        map.on("geolocationunavailable", move |event| {
            assert!(matches!(event, MapEvent::GeolocationUnavailable));
            *sink.lock().unwrap() += 1;
        });

        assert_eq!(map.start_gps().unwrap(), StartOutcome::Unsupported);
        assert_eq!(*events.lock().unwrap(), 1);
        assert!(!map.is_following());
        assert_eq!(map.marker_position("user-marker"), None);
    }

    #[test]
    fn test_stop_keeps_user_marker() {
        let (mut map, geolocation) = tracked_map();
        let feeder = geolocation.feeder();
        map.start_gps().unwrap();
        feeder.push(Position::new(800.0, 900.0));
        map.poll_gps().unwrap();

        assert!(map.stop_gps());
        assert!(!map.is_following());
        assert_eq!(map.tracking_state(), TrackingState::Unstarted);
        assert_eq!(feeder.push(Position::new(900.0, 900.0)), 0);
        assert_eq!(
            map.marker_position("user-marker"),
            Some(Point::new(800.0, 2675.0))
        );
    }

    #[tokio::test]
    async fn test_position_stream() {
        let (mut map, geolocation) = tracked_map();
        let feeder = geolocation.feeder();
        map.start_gps().unwrap();

        let producer = tokio::spawn(async move {
            for position in [
                Position::new(6000.0, 100.0),
                Position::new(300.0, 400.0),
                Position::new(310.0, 400.0).with_accuracy(5.0),
            ] {
                tokio::time::sleep(Duration::from_millis(5)).await;
                feeder.push(position);
            }
            feeder
        });

        let first = map.next_gps_fix().await.unwrap().unwrap();
        assert_eq!(first.pixel, PixelPoint::new(300, 400));
        assert!(first.recenter);
        let second = map.next_gps_fix().await.unwrap().unwrap();
        assert_eq!(second.pixel, PixelPoint::new(310, 400));

        let feeder = producer.await.unwrap();
        feeder.close();
        assert!(map.next_gps_fix().await.unwrap().is_none());
        assert_eq!(map.tracking_state(), TrackingState::Unstarted);
        assert_eq!(map.last_known_position(), Some(PixelPoint::new(310, 400)));
    }
}
