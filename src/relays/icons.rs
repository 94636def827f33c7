//! Relay icon symbols.
//!
//! A closed set of symbolic names, each mapped to an opaque asset
//! reference the presentation layer knows how to render.  Unknown names
//! resolve to [`RelayIcon::FALLBACK`].

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RelayIcon {
    #[default]
    Lightbulb,
    Fan,
    Zap,
    Home,
    Car,
    Wifi,
    Tv,
    Speaker,
    Smartphone,
    Printer,
    Coffee,
    Lamp,
    Refrigerator,
    AirVent,
    Plug,
    Siren,
    Thermometer,
    Droplets,
    Gamepad,
    Camera,
    Radio,
    Projector,
    Microwave,
    Laptop,
}

impl RelayIcon {
    pub const FALLBACK: Self = Self::Lightbulb;

    /// Every icon, in picker order.
    pub const ALL: [Self; 24] = [
        Self::Lightbulb,
        Self::Fan,
        Self::Zap,
        Self::Home,
        Self::Car,
        Self::Wifi,
        Self::Tv,
        Self::Speaker,
        Self::Smartphone,
        Self::Printer,
        Self::Coffee,
        Self::Lamp,
        Self::Refrigerator,
        Self::AirVent,
        Self::Plug,
        Self::Siren,
        Self::Thermometer,
        Self::Droplets,
        Self::Gamepad,
        Self::Camera,
        Self::Radio,
        Self::Projector,
        Self::Microwave,
        Self::Laptop,
    ];

    /// Symbolic name, as stored in relay configuration.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Lightbulb => "Lightbulb",
            Self::Fan => "Fan",
            Self::Zap => "Zap",
            Self::Home => "Home",
            Self::Car => "Car",
            Self::Wifi => "Wifi",
            Self::Tv => "Tv",
            Self::Speaker => "Speaker",
            Self::Smartphone => "Smartphone",
            Self::Printer => "Printer",
            Self::Coffee => "Coffee",
            Self::Lamp => "Lamp",
            Self::Refrigerator => "Refrigerator",
            Self::AirVent => "AirVent",
            Self::Plug => "Plug",
            Self::Siren => "Siren",
            Self::Thermometer => "Thermometer",
            Self::Droplets => "Droplets",
            Self::Gamepad => "Gamepad",
            Self::Camera => "Camera",
            Self::Radio => "Radio",
            Self::Projector => "Projector",
            Self::Microwave => "Microwave",
            Self::Laptop => "Laptop",
        }
    }

    /// Opaque display-asset reference.
    pub const fn asset(self) -> &'static str {
        match self {
            Self::Lightbulb => "lucide:lightbulb",
            Self::Fan => "lucide:fan",
            Self::Zap => "lucide:zap",
            Self::Home => "lucide:home",
            Self::Car => "lucide:car",
            Self::Wifi => "lucide:wifi",
            Self::Tv => "lucide:tv",
            Self::Speaker => "lucide:speaker",
            Self::Smartphone => "lucide:smartphone",
            Self::Printer => "lucide:printer",
            Self::Coffee => "lucide:coffee",
            Self::Lamp => "lucide:lamp",
            Self::Refrigerator => "lucide:refrigerator",
            Self::AirVent => "lucide:air-vent",
            Self::Plug => "lucide:plug",
            Self::Siren => "lucide:siren",
            Self::Thermometer => "lucide:thermometer",
            Self::Droplets => "lucide:droplets",
            Self::Gamepad => "lucide:gamepad",
            Self::Camera => "lucide:camera",
            Self::Radio => "lucide:radio",
            Self::Projector => "lucide:projector",
            Self::Microwave => "lucide:microwave",
            Self::Laptop => "lucide:laptop",
        }
    }

    /// Look up by symbolic name, falling back for unknown names.
    pub fn from_name(name: &str) -> Self {
        Self::ALL
            .iter()
            .copied()
            .find(|icon| icon.name() == name)
            .unwrap_or(Self::FALLBACK)
    }
}
