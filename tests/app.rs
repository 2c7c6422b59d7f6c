//! Frame loop and event dispatch against the in-memory backend.

use std::fmt;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use cellwright::*;
use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
use tokio::sync::mpsc;

#[derive(Clone, Default)]
struct Log(Arc<Mutex<Vec<String>>>);

impl Log {
    fn push(&self, entry: impl Into<String>) {
        self.0.lock().unwrap().push(entry.into());
    }

    fn entries(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

impl PartialEq for Log {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Log {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Log")
    }
}

fn key(code: KeyCode) -> Event {
    Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
}

fn config() -> RunConfig {
    RunConfig::default().with_frame_interval(Duration::from_millis(5))
}

/// Poll `check` until it holds or a second passes.
async fn wait_until(mut check: impl FnMut() -> bool) -> bool {
    tokio::time::timeout(Duration::from_secs(1), async {
        while !check() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .is_ok()
}

/// Shows a counter that the up arrow increments.
#[derive(Debug, PartialEq)]
struct Clicker {
    log: Log,
}

impl StatefulWidget for Clicker {
    fn build(&self) -> Result<Widget> {
        let (count, set_count) = use_state(0u32);
        use_event(move |ctx| {
            if let Event::Key(key) = &ctx.event {
                if key.code == KeyCode::Up {
                    set_count.update(|count| count + 1);
                }
            }
        });

        let log = self.log.clone();
        use_setup({
            let log = log.clone();
            move || log.push("setup")
        });
        use_cleanup(move || log.push("cleanup"));

        Ok(Text::new(format!("count {count}")).into())
    }
}

/// Always reports a size its constraints reject.
#[derive(Debug, PartialEq)]
struct Oversized;

impl RenderWidget for Oversized {
    fn layout(&self, ctx: &mut LayoutContext) -> Result<Size> {
        let _ = ctx.constraints();
        Ok(Size::new(100, 100))
    }
}

#[derive(Debug, PartialEq)]
struct Wrapper {
    log: Log,
}

impl StatefulWidget for Wrapper {
    fn build(&self) -> Result<Widget> {
        let log = self.log.clone();
        use_cleanup(move || log.push("cleanup"));
        Ok(Widget::render(Oversized))
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_event_updates_screen_and_shutdown_cleans_up() {
    let screen = TestBackend::new(12, 2);
    let log = Log::default();
    let (tx, rx) = mpsc::unbounded_channel();
    let shutdown = ShutdownTrigger::new();

    let mut app = App::new(screen.clone()).with_config(config());
    let widget = Widget::stateful(Clicker { log: log.clone() });
    let stop = shutdown.clone();
    let running = tokio::spawn(async move { app.run(widget, rx, &stop).await });

    assert!(wait_until(|| screen.lines().first().is_some_and(|l| l.starts_with("count 0"))).await);
    assert_eq!(log.entries(), vec!["setup"]);

    tx.send(key(KeyCode::Up)).unwrap();
    assert!(wait_until(|| screen.lines().first().is_some_and(|l| l.starts_with("count 1"))).await);

    screen.resize(20, 3);
    assert!(wait_until(|| screen.last_canvas().is_some_and(|c| c.width() == 20)).await);

    shutdown.trigger();
    running.await.unwrap().unwrap();
    assert_eq!(log.entries(), vec!["setup", "cleanup"]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_quit_key_stops_the_loop() {
    let screen = TestBackend::new(12, 1);
    let log = Log::default();
    let (tx, rx) = mpsc::unbounded_channel();
    let shutdown = ShutdownTrigger::new();

    let mut app = App::new(screen.clone()).with_config(config());
    let widget = Widget::stateful(Clicker { log: log.clone() });
    let stop = shutdown.clone();
    let running = tokio::spawn(async move { app.run(widget, rx, &stop).await });

    assert!(wait_until(|| screen.frames() > 0).await);
    tx.send(key(KeyCode::Esc)).unwrap();

    let result = tokio::time::timeout(Duration::from_secs(1), running)
        .await
        .expect("run should stop on a quit key");
    result.unwrap().unwrap();
    assert!(shutdown.is_triggered());
    assert_eq!(log.entries(), vec!["setup", "cleanup"]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_frame_error_tears_down() {
    let screen = TestBackend::new(10, 5);
    let log = Log::default();
    let (_tx, rx) = mpsc::unbounded_channel();
    let shutdown = ShutdownTrigger::new();

    let mut app = App::new(screen.clone()).with_config(config());
    let result = app
        .run(Widget::stateful(Wrapper { log: log.clone() }), rx, &shutdown)
        .await;

    match result {
        Err(Error::ConstraintViolation { widget, .. }) => assert_eq!(widget, "Oversized"),
        other => panic!("expected a constraint violation, got {other:?}"),
    }
    assert_eq!(screen.frames(), 0);
    assert_eq!(log.entries(), vec!["cleanup"]);
}
