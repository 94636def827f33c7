//! State handlers and table builder for the link FSM.
//!
//! ```text
//!  DISCONNECTED ──[connect requested]──▶ CONNECTING
//!       ▲  ▲                                │
//!       │  └──[pairing failed / cancel]─────┤
//!       │                          [pairing succeeded]
//!       │                                   ▼
//!       └──────[disconnect / link lost]── CONNECTED
//! ```

use super::context::SessionContext;
use super::{LinkEvent, LinkState, StateDescriptor};
use log::{info, warn};

// ═══════════════════════════════════════════════════════════════════════════
//  Table builder
// ═══════════════════════════════════════════════════════════════════════════

pub fn build_state_table() -> [StateDescriptor; LinkState::COUNT] {
    [
        StateDescriptor {
            id: LinkState::Disconnected,
            name: "Disconnected",
            on_enter: Some(disconnected_enter),
            on_exit: None,
            on_event: disconnected_event,
        },
        StateDescriptor {
            id: LinkState::Connecting,
            name: "Connecting",
            on_enter: Some(connecting_enter),
            on_exit: None,
            on_event: connecting_event,
        },
        StateDescriptor {
            id: LinkState::Connected,
            name: "Connected",
            on_enter: Some(connected_enter),
            on_exit: Some(connected_exit),
            on_event: connected_event,
        },
    ]
}

// ═══════════════════════════════════════════════════════════════════════════
//  DISCONNECTED
// ═══════════════════════════════════════════════════════════════════════════

fn disconnected_enter(ctx: &mut SessionContext) {
    // Real mutation, not a display mask.
    ctx.forced_off = ctx.relays.force_all_off();
    ctx.telemetry.stop();
    ctx.device_name = None;
    info!("DISCONNECTED: outputs off, telemetry frozen");
}

fn disconnected_event(_ctx: &mut SessionContext, event: LinkEvent) -> Option<LinkState> {
    match event {
        LinkEvent::ConnectRequested => Some(LinkState::Connecting),
        _ => None,
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  CONNECTING
// ═══════════════════════════════════════════════════════════════════════════

fn connecting_enter(_ctx: &mut SessionContext) {
    info!("CONNECTING: waiting for pairing");
}

fn connecting_event(_ctx: &mut SessionContext, event: LinkEvent) -> Option<LinkState> {
    match event {
        LinkEvent::PairingSucceeded => Some(LinkState::Connected),
        LinkEvent::PairingFailed | LinkEvent::LinkLost => {
            warn!("CONNECTING: pairing did not complete");
            Some(LinkState::Disconnected)
        }
        LinkEvent::DisconnectRequested => {
            info!("CONNECTING: cancelled by operator");
            Some(LinkState::Disconnected)
        }
        LinkEvent::ConnectRequested => None,
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  CONNECTED
// ═══════════════════════════════════════════════════════════════════════════

fn connected_enter(ctx: &mut SessionContext) {
    ctx.forced_off = 0;
    ctx.telemetry.start();
    info!(
        "CONNECTED: {} (telemetry live)",
        ctx.device_name.as_deref().unwrap_or("unnamed device")
    );
}

fn connected_exit(ctx: &mut SessionContext) {
    ctx.telemetry.stop();
}

fn connected_event(_ctx: &mut SessionContext, event: LinkEvent) -> Option<LinkState> {
    match event {
        LinkEvent::DisconnectRequested | LinkEvent::LinkLost => Some(LinkState::Disconnected),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_rows_match_their_index() {
        for (i, row) in build_state_table().iter().enumerate() {
            assert_eq!(row.id as usize, i);
            assert_eq!(row.name, row.id.name());
        }
    }
}
