//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter          | Implements     | Connects to                   |
//! |------------------|----------------|-------------------------------|
//! | `log_sink`       | EventSink      | `log` facade                  |
//! | `settings_store` | SettingsPort   | in-memory JSON blob           |
//! | `sim_transport`  | LinkTransport  | scripted link, encoded frames |
//! | `wire`           | -              | JSON / postcard / text frames |

pub mod log_sink;
pub mod settings_store;
pub mod sim_transport;
pub mod wire;
