//! Function-pointer state machine for the device link.
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │  StateTable                                                   │
//! │  ┌──────────────┬───────────┬──────────┬────────────────────┐ │
//! │  │ LinkState    │ on_enter  │ on_exit  │ on_event           │ │
//! │  ├──────────────┼───────────┼──────────┼────────────────────┤ │
//! │  │ Disconnected │ fn(ctx)   │ -        │ fn(ctx, ev)->Opt<> │ │
//! │  │ Connecting   │ fn(ctx)   │ -        │ fn(ctx, ev)->Opt<> │ │
//! │  │ Connected    │ fn(ctx)   │ fn(ctx)  │ fn(ctx, ev)->Opt<> │ │
//! │  └──────────────┴───────────┴──────────┴────────────────────┘ │
//! └───────────────────────────────────────────────────────────────┘
//! ```
//!
//! The link only moves on discrete [`LinkEvent`]s.  The engine hands each
//! event to the current state's `on_event`; a `Some(next)` runs `on_exit`
//! for the current state, then `on_enter` for the next.  Side effects of a
//! state (forcing relays off, arming telemetry) live in those hooks, so
//! they run exactly once per transition no matter which event caused it.

pub mod context;
pub mod states;

use context::SessionContext;
use log::info;

// ---------------------------------------------------------------------------
// State identity
// ---------------------------------------------------------------------------

/// Link status.  Exactly one per session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum LinkState {
    #[default]
    Disconnected = 0,
    Connecting = 1,
    Connected = 2,
}

impl LinkState {
    pub const COUNT: usize = 3;

    pub fn from_index(idx: usize) -> Self {
        match idx {
            0 => Self::Disconnected,
            1 => Self::Connecting,
            2 => Self::Connected,
            _ => {
                debug_assert!(false, "invalid link state index: {idx}");
                Self::Disconnected
            }
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Disconnected => "Disconnected",
            Self::Connecting => "Connecting",
            Self::Connected => "Connected",
        }
    }

    pub fn is_connected(self) -> bool {
        self == Self::Connected
    }
}

impl core::fmt::Display for LinkState {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

/// Inputs that can move the link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkEvent {
    /// The operator asked to connect and pairing is available.
    ConnectRequested,
    /// The transport finished its handshake.
    PairingSucceeded,
    /// Handshake error, picker dismissed, or timeout.
    PairingFailed,
    /// The operator asked to disconnect (or cancel a pending pairing).
    DisconnectRequested,
    /// The transport dropped the link on its own.
    LinkLost,
}

// ---------------------------------------------------------------------------
// Function-pointer type aliases
// ---------------------------------------------------------------------------

/// `on_enter` / `on_exit` action.
pub type StateActionFn = fn(&mut SessionContext);

/// Event handler.  `Some(next)` requests a transition.
pub type StateEventFn = fn(&mut SessionContext, LinkEvent) -> Option<LinkState>;

/// One row of the state table.
pub struct StateDescriptor {
    pub id: LinkState,
    pub name: &'static str,
    pub on_enter: Option<StateActionFn>,
    pub on_exit: Option<StateActionFn>,
    pub on_event: StateEventFn,
}

// ---------------------------------------------------------------------------
// FSM engine
// ---------------------------------------------------------------------------

pub struct Fsm {
    /// Indexed by `LinkState as usize`.
    table: [StateDescriptor; LinkState::COUNT],
    current: usize,
    /// Completed transitions since construction.
    transitions: u64,
}

impl Fsm {
    pub fn new(table: [StateDescriptor; LinkState::COUNT], initial: LinkState) -> Self {
        Self {
            table,
            current: initial as usize,
            transitions: 0,
        }
    }

    /// Run the initial state's `on_enter`.  Call once before the first event.
    pub fn start(&mut self, ctx: &mut SessionContext) {
        info!("LINK starting in state: {}", self.table[self.current].name);
        if let Some(enter) = self.table[self.current].on_enter {
            enter(ctx);
        }
    }

    /// Feed one event.  Returns `(from, to)` when a transition happened.
    pub fn handle(
        &mut self,
        event: LinkEvent,
        ctx: &mut SessionContext,
    ) -> Option<(LinkState, LinkState)> {
        let from = self.current_state();
        let next = (self.table[self.current].on_event)(ctx, event)?;
        if next == from {
            return None;
        }
        self.transition(next, ctx);
        Some((from, next))
    }

    pub fn current_state(&self) -> LinkState {
        LinkState::from_index(self.current)
    }

    pub fn transition_count(&self) -> u64 {
        self.transitions
    }

    fn transition(&mut self, next: LinkState, ctx: &mut SessionContext) {
        let next_idx = next as usize;

        info!(
            "LINK transition: {} -> {}",
            self.table[self.current].name, self.table[next_idx].name
        );

        if let Some(exit) = self.table[self.current].on_exit {
            exit(ctx);
        }

        self.current = next_idx;
        self.transitions += 1;

        if let Some(enter) = self.table[self.current].on_enter {
            enter(ctx);
        }
    }
}
