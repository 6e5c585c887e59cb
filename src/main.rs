//! Balloon Drift entry point
//!
//! Headless driver: loads config and settings, launches one balloon with the
//! device's input style, and flies it with logging collaborators.
//!
//! Usage: `balloon-drift [config.json] [settings.json]`

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::path::Path;

    use balloon_drift::consts::FRAME_DT;
    use balloon_drift::effects::{Collaborators, LightWorker, SceneChange};
    use balloon_drift::error::{LightError, StoreError};
    use balloon_drift::motion::MotionScript;
    use balloon_drift::persistence::{JsonFileStore, MemoryStore};
    use balloon_drift::platform::{
        AchievementNotifier, MenuControl, MenuState, SceneRenderer, SettingsStore, SmartLight, SoundAction,
        SoundControl,
    };
    use balloon_drift::sim::{FlightPhase, InputMode, TouchPoint};
    use balloon_drift::{ErrorLog, FlightSession, GameConfig, Settings};

    /// Logs everything the session asks of the UI
    #[derive(Default)]
    struct LogSink {
        scene_changes: usize,
        motions: usize,
    }

    impl MenuControl for LogSink {
        fn control_menu(&mut self, state: MenuState) {
            log::info!("menu: {}", state.as_str());
        }
    }

    impl SoundControl for LogSink {
        fn control_sound(&mut self, background: bool, file_name: &str, action: SoundAction, volume: f32) {
            let track = if background { "music" } else { file_name };
            log::info!("sound: {} {} @ {:.1}", action.as_str(), track, volume);
        }
    }

    impl AchievementNotifier for LogSink {
        fn notify_achievement(&mut self, best_time: &str) {
            log::info!("achievement: new best time {}", best_time);
        }
    }

    impl SceneRenderer for LogSink {
        fn play_motion(&mut self, script: &MotionScript) {
            self.motions += 1;
            log::debug!("motion: {:?} ({} steps)", script.target, script.intro.len());
        }

        fn apply_scene(&mut self, change: &SceneChange) {
            self.scene_changes += 1;
            match change {
                SceneChange::Stopwatch(text) => log::info!("stopwatch: {}", text),
                other => log::debug!("scene: {:?}", other),
            }
        }
    }

    /// Bulb stand-in that only logs
    struct LogLight;

    impl SmartLight for LogLight {
        fn set_color(&mut self, r: u8, g: u8, b: u8) -> Result<(), LightError> {
            log::info!("light: color {}, {}, {}", r, g, b);
            Ok(())
        }

        fn flash(&mut self) -> Result<(), LightError> {
            log::info!("light: flash");
            Ok(())
        }
    }

    pub fn run(config_path: Option<String>, settings_path: Option<String>) -> Result<(), StoreError> {
        let config = match config_path {
            Some(path) => GameConfig::load(Path::new(&path))?,
            None => GameConfig::default(),
        };
        let mut store: Box<dyn SettingsStore> = match settings_path {
            Some(path) => Box::new(JsonFileStore::open(path)?),
            None => Box::new(MemoryStore::new()),
        };

        let settings = Settings::load(store.as_ref());
        let mut lights = settings
            .light
            .is_paired()
            .then(|| LightWorker::spawn(Box::new(LogLight)));
        let mut session = FlightSession::from_store(&config, store.as_ref());

        let mut menu = LogSink::default();
        let mut sound = LogSink::default();
        let mut achievements = LogSink::default();
        let mut scene = LogSink::default();

        let pos = session.balloon().pos;
        match session.input_mode() {
            InputMode::Swipe => {
                session.touch_began(TouchPoint::new(pos.x, pos.y + 10.0, 0.0));
                session.touch_moved(TouchPoint::new(pos.x + 5.0, pos.y + 60.0, 60.0));
                session.touch_ended(TouchPoint::new(pos.x + 10.0, pos.y + 110.0, 120.0));
            }
            InputMode::Pressure => {
                session.force_changed(2.0, 6.67);
                session.touch_ended(TouchPoint::new(pos.x, pos.y, 0.0));
            }
        }

        // Fly until the balloon pops and the next one is on the ground
        let mut frames = 0;
        while frames < 60 * 60 && (session.pop_count() == 0 || session.phase() != FlightPhase::Idle) {
            session.tick(FRAME_DT);
            let mut collab = Collaborators {
                menu: &mut menu,
                sound: &mut sound,
                achievements: &mut achievements,
                store: store.as_mut(),
                scene: &mut scene,
                lights: lights.as_mut(),
            };
            session.dispatch(&mut collab);
            frames += 1;
        }

        if let Some(worker) = lights.as_mut() {
            let mut log = ErrorLog::new();
            worker.flush(&mut log, session.clock());
            if !log.is_empty() {
                log::warn!("Light errors:\n{}", log.render());
            }
        }

        log::info!(
            "{} frames, {} pops, best time {}, {} scene changes, {} motions",
            frames,
            session.pop_count(),
            session.best_time().time,
            scene.scene_changes,
            scene.motions
        );
        if !session.error_log().is_empty() {
            log::warn!("Errors:\n{}", session.error_log().render());
        }
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Balloon Drift (headless) starting...");

    let mut args = std::env::args().skip(1);
    if let Err(e) = headless::run(args.next(), args.next()) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Embedders drive `FlightSession` directly on the web
}
