//! End to end tests
#[cfg(test)]
mod e2e {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use gushing_rig::controller::{Controller, ControllerHandle, Snapshot};
    use gushing_rig::eruption::{RUMBLE_WINDOW, SPRAY_WINDOW};
    use gushing_rig::input::{InputEvent, Key, KeyOutcome, TriggerSource};
    use gushing_rig::motion::{ReducedMotionOverride, SystemMotionPreference};
    use gushing_rig::physics::{PhysicsConfig, RigConfig};
    use rand::SeedableRng as _;

    fn setup_logging() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .without_time()
            .try_init();
    }

    struct Rig {
        controller: ControllerHandle,
        snapshots: tokio::sync::mpsc::Receiver<Snapshot>,
        task: tokio::task::JoinHandle<()>,
        erupt_count: Arc<AtomicUsize>,
    }

    impl Rig {
        async fn start(config: RigConfig, system: Option<&SystemMotionPreference>) -> Self {
            setup_logging();
            let erupt_count = Arc::new(AtomicUsize::new(0));
            let counter = Arc::clone(&erupt_count);
            let (output, snapshots) = tokio::sync::mpsc::channel(64);

            let mut controller =
                Controller::new(&config, rand::rngs::StdRng::seed_from_u64(2024), output)
                    .unwrap()
                    .with_on_erupt(move || {
                        counter.fetch_add(1, Ordering::SeqCst);
                    });
            if let Some(preference) = system {
                controller = controller.with_system_motion(preference);
            }
            let (controller, task) = controller.spawn();

            let mut rig = Self {
                controller,
                snapshots,
                task,
                erupt_count,
            };
            let initial = rig.next().await;
            assert_eq!(initial.generation, 0);
            assert!(initial.current_batch.is_empty());
            rig
        }

        async fn next(&mut self) -> Snapshot {
            self.snapshots.recv().await.unwrap()
        }

        async fn stop(self) {
            self.controller.end().await.unwrap();
            self.task.await.unwrap();
        }
    }

    fn fixed_config() -> RigConfig {
        RigConfig {
            droplet_count: 3,
            physics: PhysicsConfig {
                angle_center: -90.0,
                angle_spread: 0.0,
                power_min: 100.0,
                power_max: 100.0,
                size_min: 5.0,
                size_max: 5.0,
                duration_min: 1000.0,
                duration_max: 1000.0,
                delay_max: 0.0,
            },
            ..RigConfig::default()
        }
    }

    #[tokio::test(start_paused = true)]
    async fn fixed_physics_spray_straight_up() {
        let mut rig = Rig::start(fixed_config(), None).await;
        rig.controller.trigger(TriggerSource::Click).await.unwrap();

        let snapshot = rig.next().await;
        assert!(snapshot.is_erupting);
        assert_eq!(snapshot.current_batch.len(), 3);
        for droplet in &snapshot.current_batch {
            assert!(droplet.dx.abs() < 1e-3);
            assert!((droplet.dy + 100.0).abs() < 1e-3);
            assert!((droplet.size - 5.0).abs() < f32::EPSILON);
            assert!((droplet.duration_ms - 1000.0).abs() < f32::EPSILON);
            assert!(droplet.delay_ms.abs() < f32::EPSILON);
        }
        assert_eq!(rig.erupt_count.load(Ordering::SeqCst), 1);
        rig.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn full_lifecycle_timings() {
        let mut rig = Rig::start(RigConfig::default(), None).await;
        let start = tokio::time::Instant::now();
        rig.controller.input(&InputEvent::Key(Key::Enter)).await;

        let erupting = rig.next().await;
        assert!(erupting.is_erupting);
        assert_eq!(erupting.current_batch.len(), 14);

        let rumbled = rig.next().await;
        let rumble_elapsed = start.elapsed();
        assert!(!rumbled.is_erupting);
        assert!(!rumbled.current_batch.is_empty());
        assert!(rumble_elapsed >= RUMBLE_WINDOW);
        assert!(rumble_elapsed <= RUMBLE_WINDOW + std::time::Duration::from_millis(1));

        let sprayed = rig.next().await;
        assert!(sprayed.current_batch.is_empty());
        assert!(!sprayed.is_erupting);
        assert!(start.elapsed() >= SPRAY_WINDOW);
        rig.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn hover_storm_is_not_debounced() {
        let mut rig = Rig::start(RigConfig::default(), None).await;
        for _ in 0..5 {
            rig.controller.input(&InputEvent::Hover).await;
        }

        let mut generations = vec![];
        for _ in 0..5 {
            let snapshot = rig.next().await;
            assert!(snapshot.is_erupting);
            generations.push(snapshot.generation);
        }
        assert_eq!(generations, vec![1, 2, 3, 4, 5]);
        assert_eq!(rig.erupt_count.load(Ordering::SeqCst), 5);

        // Only the last hover's resets count.
        let rumbled = rig.next().await;
        assert_eq!(rumbled.generation, 5);
        assert!(!rumbled.is_erupting);
        let sprayed = rig.next().await;
        assert!(sprayed.current_batch.is_empty());
        rig.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn droplet_ids_are_unique_across_eruptions() {
        let mut rig = Rig::start(fixed_config(), None).await;
        let mut ids = vec![];
        for _ in 0..3 {
            rig.controller.trigger(TriggerSource::Click).await.unwrap();
            let snapshot = rig.next().await;
            ids.extend(snapshot.current_batch.iter().map(|droplet| droplet.id));
        }
        assert_eq!(ids, (1..=9).collect::<Vec<u64>>());
        rig.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn non_activation_keys_do_nothing() {
        let mut rig = Rig::start(RigConfig::default(), None).await;
        let outcome = rig
            .controller
            .input(&InputEvent::Key(Key::from_name("Tab")))
            .await;
        assert_eq!(outcome, KeyOutcome::Default);

        let outcome = rig
            .controller
            .input(&InputEvent::Key(Key::from_name(" ")))
            .await;
        assert_eq!(outcome, KeyOutcome::PreventDefault);
        assert_eq!(rig.next().await.generation, 1);
        rig.stop().await;
    }

    #[tokio::test]
    async fn reduced_motion_only_affects_idle() {
        let system = SystemMotionPreference::new(Some(true));
        let mut rig = Rig::start(RigConfig::default(), Some(&system)).await;

        rig.controller.trigger(TriggerSource::Click).await.unwrap();
        let snapshot = rig.next().await;
        assert!(!snapshot.current_batch.is_empty());
        assert!(!snapshot.is_idle_animation_enabled);

        system.set(Some(false));
        let snapshot = rig.next().await;
        assert!(snapshot.is_idle_animation_enabled);
        assert!(!snapshot.current_batch.is_empty());

        rig.stop().await;
        assert_eq!(system.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn forced_on_beats_the_system() {
        let system = SystemMotionPreference::new(Some(false));
        let config = RigConfig {
            reduced_motion: ReducedMotionOverride::ForcedOn,
            ..RigConfig::default()
        };
        let mut rig = Rig::start(config, Some(&system)).await;
        assert_eq!(system.subscriber_count(), 0);

        rig.controller.trigger(TriggerSource::Key).await.unwrap();
        let snapshot = rig.next().await;
        assert!(!snapshot.is_idle_animation_enabled);
        assert_eq!(snapshot.current_batch.len(), 14);
        rig.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn snapshots_serialise_for_renderers() {
        let mut rig = Rig::start(fixed_config(), None).await;
        rig.controller.trigger(TriggerSource::Click).await.unwrap();
        let snapshot = rig.next().await;

        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["generation"], 1);
        assert_eq!(json["is_erupting"], true);
        assert_eq!(json["is_idle_animation_enabled"], true);
        let droplet = &json["current_batch"][0];
        for key in ["id", "dx", "dy", "size", "duration_ms", "delay_ms"] {
            assert!(droplet.get(key).is_some(), "missing {key}");
        }
        rig.stop().await;
    }
}
