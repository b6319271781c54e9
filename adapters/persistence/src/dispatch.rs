//! Runs gateway I/O off the calling thread.
//!
//! The begin command is applied before the worker starts, so painting is
//! refused from the moment a spawn function returns. The worker performs the
//! gateway call without holding the session lock and then applies the
//! matching completion, even when the gateway panics, so the session never
//! stays stuck in a transfer. In-flight transfers cannot be cancelled.

use std::{
    any::Any,
    panic::{self, AssertUnwindSafe},
    sync::Arc,
    thread::{self, JoinHandle},
};

use marble_lab_core::{Command, Event};
use marble_lab_world::SharedSession;

use crate::{load_outcome, save_outcome, GatewayError, LevelGateway};

/// Loads a level on a worker thread and returns every event produced.
///
/// If the session refuses the load, the worker does nothing and the
/// rejection event is returned.
pub fn spawn_load<G>(
    session: SharedSession,
    gateway: Arc<G>,
    handle: G::Handle,
) -> JoinHandle<Vec<Event>>
where
    G: LevelGateway + Send + Sync + 'static,
    G::Handle: Send + 'static,
{
    let mut events = session.apply(Command::BeginLoad);
    let started = events.contains(&Event::LoadStarted);

    thread::spawn(move || {
        if started {
            let outcome = load_outcome(guarded(|| gateway.load(&handle)));
            events.extend(session.apply(Command::CompleteLoad { outcome }));
        }
        events
    })
}

/// Saves the current level on a worker thread and returns every event produced.
pub fn spawn_save<G>(
    session: SharedSession,
    gateway: Arc<G>,
    handle: G::Handle,
) -> JoinHandle<Vec<Event>>
where
    G: LevelGateway + Send + Sync + 'static,
    G::Handle: Send + 'static,
{
    let mut events = session.apply(Command::BeginSave);
    let tiles = events.iter().find_map(|event| match event {
        Event::SaveStarted { tiles } => Some(tiles.clone()),
        _ => None,
    });

    thread::spawn(move || {
        if let Some(tiles) = tiles {
            let outcome = save_outcome(guarded(|| gateway.save(&handle, &tiles)));
            events.extend(session.apply(Command::CompleteSave { outcome }));
        }
        events
    })
}

fn guarded<T>(call: impl FnOnce() -> Result<T, GatewayError>) -> Result<T, GatewayError> {
    panic::catch_unwind(AssertUnwindSafe(call)).unwrap_or_else(|payload| {
        let message = panic_message(payload.as_ref());
        log::error!("level gateway panicked: {message}");
        Err(GatewayError::Panicked(message))
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_owned()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_owned()
    }
}
