//! Relay registry: named on/off outputs bound to device pins.
//!
//! Invariants held at all times:
//!
//! - ids are unique and never reused, even after a delete;
//! - pins are unique and drawn from [`RELAY_PINS`](crate::pins::RELAY_PINS);
//! - every rejected operation leaves the registry untouched.
//!
//! The registry owns each relay's stored `state`.  A relay is only *on*
//! when that state is set **and** the link is connected, so readers go
//! through [`Relay::is_on`].  Toggle and set-all refuse to run while
//! disconnected, and a disconnect forces every stored state to `false`.

pub mod icons;

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::error::{PanelError, Result, ValidationError};
use crate::pins::{DEFAULT_RELAY_PIN, MAX_RELAYS, Pin, RELAY_PINS, is_relay_pin};

pub use icons::RelayIcon;

/// Registry-assigned relay identity.
pub type RelayId = u32;

/// One configured relay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relay {
    pub id: RelayId,
    pub name: String,
    pub icon: RelayIcon,
    pub description: String,
    pub pin: Pin,
    /// Stored output state; see [`Relay::is_on`].
    pub state: bool,
}

impl Relay {
    /// Effective output state.
    pub fn is_on(&self, connected: bool) -> bool {
        self.state && connected
    }
}

/// Fields for a relay about to be added.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRelay {
    pub name: String,
    pub description: String,
    pub pin: Pin,
    pub icon: RelayIcon,
}

impl NewRelay {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        pin: Pin,
        icon: RelayIcon,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            pin,
            icon,
        }
    }
}

impl Default for NewRelay {
    fn default() -> Self {
        Self::new("", "", DEFAULT_RELAY_PIN, RelayIcon::FALLBACK)
    }
}

/// Partial update for [`RelayRegistry::edit`].  `None` keeps the field.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RelayPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub pin: Option<Pin>,
    pub icon: Option<RelayIcon>,
}

impl RelayPatch {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn pin(mut self, pin: Pin) -> Self {
        self.pin = Some(pin);
        self
    }

    pub fn icon(mut self, icon: RelayIcon) -> Self {
        self.icon = Some(icon);
        self
    }
}

/// A stored-state change the dispatcher must forward to the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelaySwitch {
    pub id: RelayId,
    pub pin: Pin,
    pub on: bool,
}

/// Derived counts, recomputed on every read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelaySummary {
    pub active: usize,
    pub total: usize,
}

/// Batch of switches produced by [`RelayRegistry::set_all`].
pub type SwitchBatch = heapless::Vec<RelaySwitch, MAX_RELAYS>;

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// Ordered relay collection (insertion order preserved).
#[derive(Debug, Clone)]
pub struct RelayRegistry {
    relays: heapless::Vec<Relay, MAX_RELAYS>,
    /// High-water mark; ids at or above this were never handed out.
    next_id: RelayId,
}

impl Default for RelayRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl RelayRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self {
            relays: heapless::Vec::new(),
            next_id: 1,
        }
    }

    /// The six relays a fresh panel ships with.
    pub fn with_defaults() -> Self {
        let defaults = [
            ("LED Strip", "RGB LED Strip Lighting", 2, RelayIcon::Lightbulb),
            ("Cooling Fan", "12V Cooling Fan", 4, RelayIcon::Fan),
            ("Main Power", "Main Power Supply", 5, RelayIcon::Zap),
            ("Room Light", "Room Lighting Control", 18, RelayIcon::Home),
            ("Motor Driver", "DC Motor Driver", 19, RelayIcon::Car),
            ("WiFi Module", "External WiFi Module", 21, RelayIcon::Wifi),
        ];
        let mut registry = Self::new();
        for (name, description, pin, icon) in defaults {
            if let Err(e) = registry.add(NewRelay::new(name, description, pin, icon)) {
                warn!("default relay '{}' rejected: {}", name, e);
            }
        }
        registry
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn get(&self, id: RelayId) -> Option<&Relay> {
        self.relays.iter().find(|r| r.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Relay> {
        self.relays.iter()
    }

    pub fn len(&self) -> usize {
        self.relays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.relays.is_empty()
    }

    /// Relays whose stored state is on.
    pub fn active_count(&self) -> usize {
        self.relays.iter().filter(|r| r.state).count()
    }

    pub fn summary(&self) -> RelaySummary {
        RelaySummary {
            active: self.active_count(),
            total: self.len(),
        }
    }

    pub fn pin_in_use(&self, pin: Pin) -> bool {
        self.relays.iter().any(|r| r.pin == pin)
    }

    /// Allowed pins not yet bound to a relay, in picker order.
    pub fn free_pins(&self) -> impl Iterator<Item = Pin> + '_ {
        RELAY_PINS.iter().copied().filter(|p| !self.pin_in_use(*p))
    }

    // ── Mutations ─────────────────────────────────────────────

    /// Validate and append a relay with `state = false`.
    pub fn add(&mut self, new: NewRelay) -> Result<Relay> {
        if new.name.trim().is_empty() {
            return Err(ValidationError::EmptyName.into());
        }
        if !is_relay_pin(new.pin) {
            return Err(ValidationError::PinNotAllowed(new.pin).into());
        }
        if self.pin_in_use(new.pin) {
            return Err(ValidationError::PinInUse(new.pin).into());
        }

        let id = self.allocate_id();
        let relay = Relay {
            id,
            name: new.name,
            icon: new.icon,
            description: new.description,
            pin: new.pin,
            state: false,
        };
        self.relays
            .push(relay.clone())
            .map_err(|_| PanelError::from(ValidationError::RegistryFull))?;
        self.next_id = id + 1;
        info!("Relay {} '{}' added on pin {}", relay.id, relay.name, relay.pin);
        Ok(relay)
    }

    /// Apply `patch` in place, keeping the id and stored state.
    pub fn edit(&mut self, id: RelayId, patch: RelayPatch) -> Result<Relay> {
        let index = self.index_of(id).ok_or(PanelError::NotFound(id))?;

        if let Some(name) = &patch.name {
            if name.trim().is_empty() {
                return Err(ValidationError::EmptyName.into());
            }
        }
        if let Some(pin) = patch.pin {
            if !is_relay_pin(pin) {
                return Err(ValidationError::PinNotAllowed(pin).into());
            }
            if self.relays.iter().any(|r| r.id != id && r.pin == pin) {
                return Err(ValidationError::PinInUse(pin).into());
            }
        }

        let relay = &mut self.relays[index];
        if let Some(name) = patch.name {
            relay.name = name;
        }
        if let Some(description) = patch.description {
            relay.description = description;
        }
        if let Some(pin) = patch.pin {
            relay.pin = pin;
        }
        if let Some(icon) = patch.icon {
            relay.icon = icon;
        }
        info!("Relay {} updated", id);
        Ok(relay.clone())
    }

    /// Flip a relay's stored state.  Rejected while disconnected.
    pub fn toggle(&mut self, id: RelayId, connected: bool) -> Result<RelaySwitch> {
        if !connected {
            return Err(PanelError::NotConnected);
        }
        let relay = self
            .relays
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(PanelError::NotFound(id))?;
        relay.state = !relay.state;
        Ok(RelaySwitch {
            id,
            pin: relay.pin,
            on: relay.state,
        })
    }

    /// Remove a relay.  Other relays keep their ids and pins.
    pub fn delete(&mut self, id: RelayId) -> Result<Relay> {
        let index = self.index_of(id).ok_or(PanelError::NotFound(id))?;
        let relay = self.relays.remove(index);
        info!("Relay {} '{}' deleted", relay.id, relay.name);
        Ok(relay)
    }

    /// Set every relay to `on`.  Rejected while disconnected.
    pub fn set_all(&mut self, on: bool, connected: bool) -> Result<SwitchBatch> {
        if !connected {
            return Err(PanelError::NotConnected);
        }
        let mut batch = SwitchBatch::new();
        for relay in &mut self.relays {
            relay.state = on;
            // Capacity matches the registry's, so this never overflows.
            let _ = batch.push(RelaySwitch {
                id: relay.id,
                pin: relay.pin,
                on,
            });
        }
        Ok(batch)
    }

    /// Overwrite every stored state with `false` (link went down).
    /// Returns how many relays were on.
    pub fn force_all_off(&mut self) -> usize {
        let mut changed = 0;
        for relay in &mut self.relays {
            if relay.state {
                relay.state = false;
                changed += 1;
            }
        }
        if changed > 0 {
            info!("Relays: forced {} output(s) off", changed);
        }
        changed
    }

    // ── Internal ──────────────────────────────────────────────

    fn index_of(&self, id: RelayId) -> Option<usize> {
        self.relays.iter().position(|r| r.id == id)
    }

    fn allocate_id(&self) -> RelayId {
        let max_existing = self.relays.iter().map(|r| r.id).max().unwrap_or(0);
        self.next_id.max(max_existing + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lamp(pin: Pin) -> NewRelay {
        NewRelay::new("Lamp", "", pin, RelayIcon::Lamp)
    }

    fn pins_and_ids(reg: &RelayRegistry) -> Vec<(RelayId, Pin)> {
        reg.iter().map(|r| (r.id, r.pin)).collect()
    }

    #[test]
    fn defaults_have_six_relays_all_off() {
        let reg = RelayRegistry::with_defaults();
        assert_eq!(reg.len(), 6);
        assert_eq!(reg.active_count(), 0);
        let ids: Vec<_> = reg.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn add_assigns_next_id_and_starts_off() {
        let mut reg = RelayRegistry::new();
        let a = reg.add(lamp(2)).unwrap();
        let b = reg.add(lamp(4)).unwrap();
        assert_eq!((a.id, b.id), (1, 2));
        assert!(!b.state);
    }

    #[test]
    fn add_rejects_blank_name() {
        let mut reg = RelayRegistry::new();
        let err = reg.add(NewRelay::new("   ", "", 2, RelayIcon::Fan)).unwrap_err();
        assert_eq!(err, PanelError::Validation(ValidationError::EmptyName));
        assert!(reg.is_empty());
    }

    #[test]
    fn add_rejects_pin_in_use() {
        let mut reg = RelayRegistry::new();
        for pin in [2, 4, 5] {
            reg.add(NewRelay::new("R", "", pin, RelayIcon::Plug)).unwrap();
        }
        let before = pins_and_ids(&reg);
        let err = reg.add(lamp(4)).unwrap_err();
        assert_eq!(err, PanelError::Validation(ValidationError::PinInUse(4)));
        assert_eq!(reg.len(), 3);
        assert_eq!(pins_and_ids(&reg), before);
    }

    #[test]
    fn add_rejects_pin_outside_allowed_set() {
        let mut reg = RelayRegistry::new();
        let err = reg.add(lamp(3)).unwrap_err();
        assert_eq!(err, PanelError::Validation(ValidationError::PinNotAllowed(3)));
    }

    #[test]
    fn ids_are_not_reused_after_delete() {
        let mut reg = RelayRegistry::with_defaults();
        reg.delete(6).unwrap();
        let r = reg.add(lamp(22)).unwrap();
        assert_eq!(r.id, 7);
    }

    #[test]
    fn add_then_delete_restores_prior_shape() {
        let mut reg = RelayRegistry::with_defaults();
        let before = pins_and_ids(&reg);
        let r = reg.add(lamp(33)).unwrap();
        reg.delete(r.id).unwrap();
        assert_eq!(pins_and_ids(&reg), before);
    }

    #[test]
    fn edit_keeps_id_and_allows_own_pin() {
        let mut reg = RelayRegistry::with_defaults();
        let r = reg
            .edit(2, RelayPatch::default().name("Exhaust Fan").pin(4))
            .unwrap();
        assert_eq!(r.id, 2);
        assert_eq!(r.name, "Exhaust Fan");
        assert_eq!(r.pin, 4);
    }

    #[test]
    fn edit_rejects_pin_of_other_relay() {
        let mut reg = RelayRegistry::with_defaults();
        let err = reg.edit(2, RelayPatch::default().pin(5)).unwrap_err();
        assert_eq!(err, PanelError::Validation(ValidationError::PinInUse(5)));
        assert_eq!(reg.get(2).unwrap().pin, 4);
    }

    #[test]
    fn edit_unknown_id_is_not_found() {
        let mut reg = RelayRegistry::with_defaults();
        assert_eq!(
            reg.edit(99, RelayPatch::default().name("x")).unwrap_err(),
            PanelError::NotFound(99)
        );
    }

    #[test]
    fn toggle_requires_connection() {
        let mut reg = RelayRegistry::with_defaults();
        assert_eq!(reg.toggle(1, false).unwrap_err(), PanelError::NotConnected);
        assert!(!reg.get(1).unwrap().state);

        let sw = reg.toggle(1, true).unwrap();
        assert_eq!(sw, RelaySwitch { id: 1, pin: 2, on: true });
        assert_eq!(reg.toggle(42, true).unwrap_err(), PanelError::NotFound(42));
    }

    #[test]
    fn set_all_and_force_off() {
        let mut reg = RelayRegistry::with_defaults();
        assert_eq!(reg.set_all(true, false).unwrap_err(), PanelError::NotConnected);
        assert_eq!(reg.active_count(), 0);

        let batch = reg.set_all(true, true).unwrap();
        assert_eq!(batch.len(), 6);
        assert_eq!(reg.summary(), RelaySummary { active: 6, total: 6 });

        assert_eq!(reg.force_all_off(), 6);
        assert_eq!(reg.active_count(), 0);
    }

    #[test]
    fn effective_state_needs_connection() {
        let mut reg = RelayRegistry::with_defaults();
        reg.toggle(3, true).unwrap();
        let r = reg.get(3).unwrap();
        assert!(r.is_on(true));
        assert!(!r.is_on(false));
    }

    #[test]
    fn free_pins_excludes_assigned() {
        let reg = RelayRegistry::with_defaults();
        let free: Vec<_> = reg.free_pins().collect();
        assert_eq!(free.len(), RELAY_PINS.len() - 6);
        assert!(!free.contains(&2));
        assert!(free.contains(&12));
    }

    #[test]
    fn registry_fills_every_allowed_pin() {
        let mut reg = RelayRegistry::new();
        for pin in RELAY_PINS {
            reg.add(lamp(pin)).unwrap();
        }
        assert_eq!(reg.len(), MAX_RELAYS);
        assert_eq!(reg.free_pins().count(), 0);
    }
}
