use boid_cli::{AsciiCanvas, FrameStats, Session};
use boid_core::Boid;
use boid_shared::{BoidParams, LiveTuning, LIVE_MAX_SPEED};

#[test]
fn test_every_boid_drawn_each_frame() {
    let mut session = Session::new((800.0, 600.0), 40, Some(8)).unwrap();
    let mut stats = FrameStats::default();

    for frame in 1..=30 {
        stats.reset();
        session.advance(&mut stats);
        assert_eq!(stats.points, 40);
        assert_eq!(session.frame(), frame);
        assert!((0.0..=1.0).contains(&stats.mean_intensity()));
    }

    assert!(session.flock.boids.iter().all(Boid::is_initialized));
    for boid in &session.flock.boids {
        assert!(boid.position.x >= 0.0 && boid.position.x < 800.0);
        assert!(boid.position.y >= 0.0 && boid.position.y < 600.0);
        assert!(boid.speed() <= LIVE_MAX_SPEED + 0.0001);
    }
}

#[test]
fn test_tuning_applies_only_to_new_boids() {
    let mut session = Session::new((800.0, 600.0), 10, Some(21)).unwrap();
    let mut stats = FrameStats::default();
    session.advance(&mut stats);

    let original = LiveTuning::default().apply(BoidParams::default());
    assert!(session.flock.boids.iter().all(|b| b.params == original));

    // separation modifier 1.25 -> 3.25
    session.press('a');
    session.press('a');
    session.spawn(5);
    session.advance(&mut stats);

    let (old, new) = session.flock.boids.split_at(10);
    assert!(old.iter().all(|b| b.params == original));
    assert!(new.iter().all(|b| (b.params.separation - 1.0 / 3.25).abs() < 0.0001));

    session.respawn();
    session.advance(&mut stats);
    assert_eq!(session.flock.len(), 15);
    assert!(session
        .flock
        .boids
        .iter()
        .all(|b| (b.params.separation - 1.0 / 3.25).abs() < 0.0001));
}

#[test]
fn test_resize_rewraps_boids() {
    let mut session = Session::new((800.0, 600.0), 50, Some(4)).unwrap();
    let mut stats = FrameStats::default();
    session.advance(&mut stats);

    session.resize(200.0, 100.0);
    session.advance(&mut stats);

    assert_eq!((session.flock.width, session.flock.height), (200.0, 100.0));
    for boid in &session.flock.boids {
        assert!(boid.position.x >= 0.0 && boid.position.x < 200.0);
        assert!(boid.position.y >= 0.0 && boid.position.y < 100.0);
    }
}

#[test]
fn test_ascii_frame_has_requested_shape() {
    let mut session = Session::new((800.0, 600.0), 100, Some(2)).unwrap();
    let mut canvas = AsciiCanvas::new(40, 12, session.viewport());
    session.advance(&mut canvas);

    let text = canvas.render();
    assert_eq!(text.lines().count(), 12);
    assert!(text.lines().all(|line| line.chars().count() == 40));
    assert!(text.chars().any(|c| !c.is_whitespace()));
}

#[test]
fn test_seeded_sessions_repeat() {
    let mut a = Session::new((640.0, 480.0), 30, Some(77)).unwrap();
    let mut b = Session::new((640.0, 480.0), 30, Some(77)).unwrap();
    let mut stats = FrameStats::default();
    for _ in 0..20 {
        a.advance(&mut stats);
        b.advance(&mut stats);
    }
    let positions = |s: &Session| s.flock.boids.iter().map(|b| b.position).collect::<Vec<_>>();
    assert_eq!(positions(&a), positions(&b));
}
