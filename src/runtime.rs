//! Session runtime: cooperative single-threaded event loop.
//!
//! Uses `edge-executor` for task scheduling and `async-io-mini` for
//! reactor-driven timers (no busy-spinning). Three concurrent futures
//! share one [`MonitorService`]:
//!
//! 1. **Clock**: wakes every `clock_resolution_ms`, feeds the elapsed
//!    time into [`MonitorService::advance`] and raises the dispatch signal
//! 2. **Commands**: truly async via `CommandChannel::receive().await`;
//!    ends the session on [`AppCommand::Shutdown`]
//! 3. **Dispatch**: waits on the signal, resolves the location, then
//!    completes the alert
//!
//! ```text
//!  ┌──────────────────────────────────────────────────────────┐
//!  │  futures_lite::future::block_on                          │
//!  │  ┌────────────────────────────────────────────────────┐  │
//!  │  │  edge_executor::LocalExecutor                      │  │
//!  │  │                                                    │  │
//!  │  │  ┌─────────┐   ┌───────────┐   ┌───────────────┐   │  │
//!  │  │  │  Clock  │   │ Commands  │   │   Dispatch    │   │  │
//!  │  │  │  10ms ⏱ │   │ wake-on-  │   │ wake-on-      │   │  │
//!  │  │  │         │   │ send      │   │ signal        │   │  │
//!  │  │  └─────────┘   └───────────┘   └───────────────┘   │  │
//!  │  └────────────────────────────────────────────────────┘  │
//!  └──────────────────────────────────────────────────────────┘
//! ```
//!
//! Shared state lives in `Rc<RefCell<..>>`; every borrow is released before
//! the next `.await`, so each callback runs to completion on its own.

use core::cell::RefCell;
use core::time::Duration;
use std::rc::Rc;

use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;
use log::info;

use crate::adapters::time::MonotonicClock;
use crate::app::commands::AppCommand;
use crate::app::dispatch::{self, LocationFix};
use crate::app::events::AlertReport;
use crate::app::ports::{AudioPort, EventSink, LocationPort, MotionPort, SpeechPort};
use crate::app::service::{DispatchRequest, MonitorService};
use crate::fsm::StateId;

/// Channel depth for user actions.
pub const COMMAND_DEPTH: usize = 8;

/// Inbound user actions: presentation layer → session.
pub type CommandChannel = Channel<NoopRawMutex, AppCommand, COMMAND_DEPTH>;

type DispatchSignal = Signal<NoopRawMutex, DispatchRequest>;

/// What a finished session leaves behind.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSummary {
    pub alerts_sent: u32,
    pub last_alert: Option<AlertReport>,
    pub final_state: StateId,
}

struct Session<S, E> {
    service: MonitorService,
    sensors: S,
    sink: E,
}

type Shared<S, E> = Rc<RefCell<Session<S, E>>>;

// ── Tasks ────────────────────────────────────────────────────

async fn clock_loop<S, E>(shared: Shared<S, E>, signal: &DispatchSignal, resolution_ms: u32)
where
    S: MotionPort + AudioPort,
    E: EventSink,
{
    let mut clock = MonotonicClock::new();
    loop {
        async_io_mini::Timer::after(Duration::from_millis(u64::from(resolution_ms))).await;
        let elapsed = clock.lap_ms();

        let request = {
            let mut guard = shared.borrow_mut();
            let Session {
                service,
                sensors,
                sink,
            } = &mut *guard;
            service.advance(elapsed, sensors, sink)
        };

        if let Some(request) = request {
            signal.signal(request);
        }
    }
}

async fn command_loop<S, E>(shared: Shared<S, E>, commands: &CommandChannel)
where
    S: MotionPort + AudioPort,
    E: EventSink,
{
    loop {
        let cmd = commands.receive().await;
        {
            let mut guard = shared.borrow_mut();
            let Session {
                service,
                sensors,
                sink,
            } = &mut *guard;
            service.handle_command(cmd, sensors, sink);
        }
        if cmd == AppCommand::Shutdown {
            info!("Session: shutdown requested");
            return;
        }
    }
}

async fn dispatch_loop<S, E, L, P>(
    shared: Shared<S, E>,
    signal: &DispatchSignal,
    mut location: L,
    mut speech: P,
) where
    E: EventSink,
    L: LocationPort,
    P: SpeechPort,
{
    loop {
        let request = signal.wait().await;
        let fix: LocationFix = dispatch::locate(&mut location).await;

        let mut guard = shared.borrow_mut();
        let Session { service, sink, .. } = &mut *guard;
        service.complete_dispatch(request, fix, &mut speech, sink);
    }
}

// ── Entry points ─────────────────────────────────────────────

/// Run one monitoring session until [`AppCommand::Shutdown`] arrives on
/// `commands`.
///
/// An alert already locating at shutdown is allowed to finish first, as is
/// a countdown that deactivation left running.
pub async fn run_session<S, E, L, P>(
    mut service: MonitorService,
    sensors: S,
    mut sink: E,
    location: L,
    speech: P,
    commands: &CommandChannel,
) -> SessionSummary
where
    S: MotionPort + AudioPort,
    E: EventSink,
    L: LocationPort,
    P: SpeechPort,
{
    let resolution_ms = service.config().clock_resolution_ms;
    service.start(&mut sink);

    let signal = DispatchSignal::new();
    let shared: Shared<S, E> = Rc::new(RefCell::new(Session {
        service,
        sensors,
        sink,
    }));

    let executor: edge_executor::LocalExecutor<'_, 4> = edge_executor::LocalExecutor::new();

    executor
        .spawn(clock_loop(shared.clone(), &signal, resolution_ms))
        .detach();
    executor
        .spawn(dispatch_loop(shared.clone(), &signal, location, speech))
        .detach();

    info!("Session started (clock {} ms)", resolution_ms);

    let drained = shared.clone();
    executor
        .run(async move {
            command_loop(drained.clone(), commands).await;
            while matches!(
                drained.borrow().service.state(),
                StateId::CountingDown | StateId::Locating
            ) {
                async_io_mini::Timer::after(Duration::from_millis(u64::from(resolution_ms))).await;
            }
        })
        .await;

    let guard = shared.borrow();
    let summary = SessionSummary {
        alerts_sent: guard.service.alerts_sent(),
        last_alert: guard.service.last_alert().cloned(),
        final_state: guard.service.state(),
    };
    info!(
        "Session ended in {:?} ({} alerts sent)",
        summary.final_state, summary.alerts_sent
    );
    summary
}

/// Drive `fut` to completion on the current thread.
pub fn run_blocking<T>(fut: impl core::future::Future<Output = T>) -> T {
    futures_lite::future::block_on(fut)
}
