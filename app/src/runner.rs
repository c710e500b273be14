//! Engine run loop.
//!
//! One thread owns the engine and multiplexes the landmark channel with the
//! display ticker, so frame handling and ticks never overlap.

use crate::cli::PointerKind;
use anyhow::Context;
use crossbeam_channel::{after, never, select, tick, Receiver};
use handpoint_core::{
    BackendConfig, BackendSink, Engine, EngineConfig, EngineEvent, PointerSink, Sinks,
};
use handpoint_platform::{
    open_input, start_json_source, EnigoPointer, HttpBackend, LogFeedback, NoopPointer,
    SourceConfig, SourceEvent,
};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Options for one run.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub input: Option<PathBuf>,
    pub pointer: PointerKind,
    pub frame_interval: Option<Duration>,
    pub run_for: Option<Duration>,
    pub print_events: bool,
}

/// Run the engine until the source closes or the run time elapses.
pub fn run(config: EngineConfig, opts: RunOptions) -> anyhow::Result<()> {
    let input = open_input(opts.input.as_deref()).context("landmark source failed to start")?;

    let pointer: Box<dyn PointerSink> = match opts.pointer {
        PointerKind::Enigo => Box::new(EnigoPointer::new()?),
        PointerKind::Noop => Box::new(NoopPointer),
    };

    // Forwarding can be switched on mid-run, so the client always exists.
    let backend = HttpBackend::new(&config.backend)?;
    if config.backend.enabled {
        report_health(&backend);
    }

    let sinks = Sinks {
        pointer,
        backend: Box::new(backend) as Box<dyn BackendSink>,
        feedback: Box::new(LogFeedback),
    };

    let (event_tx, event_rx) = crossbeam_channel::bounded(256);
    let tick_interval = config.render.tick_interval();
    let mut engine = Engine::new(config, sinks).with_events(event_tx);

    let source = start_json_source(
        input,
        SourceConfig {
            frame_interval: opts.frame_interval,
        },
    );
    let ticker = tick(tick_interval);
    let deadline: Receiver<Instant> = match opts.run_for {
        Some(limit) => after(limit),
        None => never(),
    };

    engine.start();
    let mut frames = 0u64;

    loop {
        select! {
            recv(source.receiver()) -> msg => match msg {
                Ok(event) => {
                    if matches!(event, SourceEvent::Frame { .. }) {
                        frames += 1;
                    }
                    handle_source_event(&mut engine, event);
                }
                Err(_) => {
                    info!("Landmark source closed");
                    break;
                }
            },
            recv(ticker) -> _ => {
                engine.tick();
            }
            recv(deadline) -> _ => {
                info!("Run time elapsed");
                break;
            }
        }
        drain_events(&event_rx, opts.print_events);
    }

    engine.stop();
    source.stop();
    drain_events(&event_rx, opts.print_events);
    info!(frames, "Run finished");
    Ok(())
}

fn handle_source_event(engine: &mut Engine, event: SourceEvent) {
    match event {
        SourceEvent::Frame { frame, hand } => engine.on_hand_data(&frame, hand, Instant::now()),
        SourceEvent::HandLost => engine.on_hand_lost(),
        SourceEvent::SetMode(mode) => engine.set_mode(mode),
        SourceEvent::SetBackend(enabled) => engine.set_backend_enabled(enabled),
    }
}

fn drain_events(rx: &Receiver<EngineEvent>, print: bool) {
    for event in rx.try_iter() {
        if print {
            match serde_json::to_string(&event) {
                Ok(line) => println!("{line}"),
                Err(e) => warn!(error = %e, "Failed to encode engine event"),
            }
        } else {
            debug!(?event, "engine event");
        }
    }
}

/// Log the backend's health; an unreachable backend is not fatal.
pub fn report_health(backend: &HttpBackend) {
    match backend.probe_health() {
        Ok(health) => info!(
            url = backend.base_url(),
            status = %health.status,
            screen = ?health.screen,
            version = %health.version,
            "Backend is reachable"
        ),
        Err(e) => warn!(url = backend.base_url(), error = %e, "Backend health check failed"),
    }
}

/// One-shot health probe for the `health` command.
pub fn check_health(config: &BackendConfig) -> anyhow::Result<()> {
    let backend = HttpBackend::new(config)?;
    let health = backend
        .probe_health()
        .with_context(|| format!("backend at {} is not healthy", backend.base_url()))?;
    println!(
        "{} status={} screen={:?} version={}",
        backend.base_url(),
        health.status,
        health.screen,
        health.version
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use handpoint_core::{EngineState, GestureMode};
    use std::io::Write;

    fn temp_input(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "handpoint-{}-{}.jsonl",
            name,
            std::process::id()
        ));
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    fn options(input: PathBuf) -> RunOptions {
        RunOptions {
            input: Some(input),
            pointer: PointerKind::Noop,
            frame_interval: None,
            run_for: Some(Duration::from_secs(5)),
            print_events: false,
        }
    }

    #[test]
    fn test_run_until_source_closes() {
        let path = temp_input(
            "run",
            "{\"type\":\"set_mode\",\"mode\":\"desk\"}\nnot json\n{\"type\":\"hand_lost\"}\n",
        );
        assert!(run(EngineConfig::default(), options(path.clone())).is_ok());
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_missing_input_is_fatal() {
        let opts = options(PathBuf::from("/nonexistent/handpoint/input.jsonl"));
        assert!(run(EngineConfig::default(), opts).is_err());
    }

    #[test]
    fn test_handle_source_event_toggles_flags() {
        let sinks = Sinks {
            pointer: Box::new(NoopPointer),
            backend: Box::new(handpoint_core::NoopBackend),
            feedback: Box::new(LogFeedback),
        };
        let mut engine = Engine::new(EngineConfig::default(), sinks);
        engine.start();

        handle_source_event(&mut engine, SourceEvent::SetMode(GestureMode::Desk));
        handle_source_event(&mut engine, SourceEvent::SetBackend(true));
        handle_source_event(&mut engine, SourceEvent::HandLost);

        assert_eq!(engine.mode(), GestureMode::Desk);
        assert!(engine.backend_enabled());
        assert_eq!(engine.state(), EngineState::Running);
    }
}
