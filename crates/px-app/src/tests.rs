#[cfg(test)]
mod tests {
    use std::path::Path;

    use px_core::Vector3;

    use crate::app::App;
    use crate::state::SceneState;

    #[test]
    fn test_run_animates_and_picks_center() {
        let mut app = App::new(None, 800, 600).unwrap();
        let summary = app.run(30, 12.0);

        assert_eq!(summary.frames, 30);
        assert_eq!(summary.visible_per_frame.len(), 30);
        assert!(summary.visible_per_frame.iter().all(|&v| v > 0));
        assert_eq!(summary.picked.as_ref().map(|(name, _)| name.as_str()), Some("center"));

        assert!(app.camera.position_binding().is_none());
        assert_eq!(app.camera.target(), Vector3::ZERO);
    }

    #[test]
    fn test_missing_config_is_an_error() {
        assert!(App::new(Some(Path::new("/nonexistent/px-camera.toml")), 800, 600).is_err());
    }

    #[test]
    fn test_scene_pick_prefers_nearest() {
        let scene = SceneState::demo();
        let ray = px_core::Ray::new(Vector3::new(10.0, 0.0, 0.0), -Vector3::X);
        let (object, t) = scene.pick(&ray).unwrap();
        assert_eq!(object.name, "east");
        assert!((t - 5.5).abs() < 1e-9);
    }
}
