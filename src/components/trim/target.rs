use serde::de::{self, Deserializer, SeqAccess, Visitor};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::components::aircraft::{AirframeLayout, ControlSurface};

/// Flight-condition names a trim target may constrain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FlightCondition {
    Airspeed,
    Alpha,
    Beta,
    Gamma,
    Phi,
    Theta,
    Psi,
    PhiDot,
    ThetaDot,
    PsiDot,
    P,
    Q,
    R,
    Altitude,
}

impl FlightCondition {
    pub const ALL: [FlightCondition; 14] = [
        FlightCondition::Airspeed,
        FlightCondition::Alpha,
        FlightCondition::Beta,
        FlightCondition::Gamma,
        FlightCondition::Phi,
        FlightCondition::Theta,
        FlightCondition::Psi,
        FlightCondition::PhiDot,
        FlightCondition::ThetaDot,
        FlightCondition::PsiDot,
        FlightCondition::P,
        FlightCondition::Q,
        FlightCondition::R,
        FlightCondition::Altitude,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            FlightCondition::Airspeed => "airspeed",
            FlightCondition::Alpha => "alpha",
            FlightCondition::Beta => "beta",
            FlightCondition::Gamma => "gamma",
            FlightCondition::Phi => "phi",
            FlightCondition::Theta => "theta",
            FlightCondition::Psi => "psi",
            FlightCondition::PhiDot => "phidot",
            FlightCondition::ThetaDot => "thetadot",
            FlightCondition::PsiDot => "psidot",
            FlightCondition::P => "p",
            FlightCondition::Q => "q",
            FlightCondition::R => "r",
            FlightCondition::Altitude => "altitude",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        FlightCondition::ALL.into_iter().find(|c| c.name() == name)
    }
}

/// Name of one constrainable quantity: a flight condition, the throttle, or
/// a control surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TargetKey {
    Flight(FlightCondition),
    Motor,
    Surface(ControlSurface),
}

pub const MOTOR_KEY: &str = "motor";

impl TargetKey {
    pub fn name(&self) -> &'static str {
        match self {
            TargetKey::Flight(condition) => condition.name(),
            TargetKey::Motor => MOTOR_KEY,
            TargetKey::Surface(surface) => surface.name(),
        }
    }

    /// Resolves a raw field name against the names any variant recognises.
    pub fn from_name(name: &str) -> Option<Self> {
        if name == MOTOR_KEY {
            return Some(TargetKey::Motor);
        }
        FlightCondition::from_name(name)
            .map(TargetKey::Flight)
            .or_else(|| ControlSurface::from_name(name).map(TargetKey::Surface))
    }

    /// Resolves a raw field name against one airframe's recognised names.
    pub fn for_layout(name: &str, layout: &dyn AirframeLayout) -> Option<Self> {
        match TargetKey::from_name(name)? {
            TargetKey::Surface(surface) if !layout.control_names().contains(&surface) => None,
            key => Some(key),
        }
    }
}

impl fmt::Display for TargetKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for TargetKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for TargetKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        TargetKey::from_name(&name)
            .ok_or_else(|| de::Error::custom(format!("unknown trim target key '{}'", name)))
    }
}

/// A field that is present in a trim target. Absent fields are simply not in
/// the map, so together this forms the unset / explicitly-free / valued
/// tri-state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TargetEntry {
    /// Present without a value: forces the quantity free, overriding defaults.
    Free,
    Fixed(f64),
}

impl TargetEntry {
    pub fn value(&self) -> Option<f64> {
        match self {
            TargetEntry::Free => None,
            TargetEntry::Fixed(value) => Some(*value),
        }
    }
}

impl Serialize for TargetEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            TargetEntry::Free => serializer.serialize_none(),
            TargetEntry::Fixed(value) => serializer.serialize_f64(*value),
        }
    }
}

impl<'de> Deserialize<'de> for TargetEntry {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct EntryVisitor;

        impl<'de> Visitor<'de> for EntryVisitor {
            type Value = TargetEntry;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a number, a one-element list, null or []")
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
                Ok(TargetEntry::Fixed(v))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
                Ok(TargetEntry::Fixed(v as f64))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
                Ok(TargetEntry::Fixed(v as f64))
            }

            fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
                Ok(TargetEntry::Free)
            }

            fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
                Ok(TargetEntry::Free)
            }

            fn visit_some<D: Deserializer<'de>>(self, d: D) -> Result<Self::Value, D::Error> {
                d.deserialize_any(EntryVisitor)
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
                match seq.next_element::<f64>()? {
                    None => Ok(TargetEntry::Free),
                    Some(value) => {
                        if seq.next_element::<f64>()?.is_some() {
                            return Err(de::Error::invalid_length(2, &self));
                        }
                        Ok(TargetEntry::Fixed(value))
                    }
                }
            }
        }

        deserializer.deserialize_any(EntryVisitor)
    }
}

/// Raw, caller-supplied trim constraints keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrimTarget {
    entries: BTreeMap<String, TargetEntry>,
}

impl TrimTarget {
    pub fn new() -> Self {
        Self::default()
    }

    /// Constrain `name` to `value`.
    pub fn with(mut self, name: impl Into<String>, value: f64) -> Self {
        self.entries.insert(name.into(), TargetEntry::Fixed(value));
        self
    }

    /// Mark `name` as explicitly free.
    pub fn free(mut self, name: impl Into<String>) -> Self {
        self.entries.insert(name.into(), TargetEntry::Free);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, entry: TargetEntry) {
        self.entries.insert(name.into(), entry);
    }

    pub fn get(&self, name: &str) -> Option<TargetEntry> {
        self.entries.get(name).copied()
    }

    /// True when `name` is present with a value.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, TargetEntry)> {
        self.entries.iter().map(|(name, entry)| (name.as_str(), *entry))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Validated target: every key recognised, defaults applied, explicitly free
/// fields removed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NormalizedTarget {
    values: BTreeMap<TargetKey, f64>,
}

impl NormalizedTarget {
    pub(crate) fn from_values(values: BTreeMap<TargetKey, f64>) -> Self {
        Self { values }
    }

    pub fn get(&self, key: TargetKey) -> Option<f64> {
        self.values.get(&key).copied()
    }

    pub fn flight(&self, condition: FlightCondition) -> Option<f64> {
        self.get(TargetKey::Flight(condition))
    }

    pub fn contains(&self, key: TargetKey) -> bool {
        self.values.contains_key(&key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (TargetKey, f64)> + '_ {
        self.values.iter().map(|(key, value)| (*key, *value))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
