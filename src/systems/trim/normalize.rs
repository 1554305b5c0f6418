use std::collections::BTreeMap;
use tracing::debug;

use crate::components::{FlightCondition, NormalizedTarget, TargetKey, TrimTarget, Variant};
use crate::utils::{TrimError, TrimResult};

/// Field combinations that over-determine the problem, with the reason
/// reported to the caller.
const CONTRADICTIONS: [(&[&str], &str); 2] = [
    (
        &["alpha", "theta", "gamma"],
        "pitch attitude has no remaining degree of freedom",
    ),
    (
        &["alpha", "airspeed", "gamma"],
        "pitch attitude has no remaining degree of freedom",
    ),
];

const COMBINED_AILERON: &str = "aileron";
const SPLIT_AILERONS: [&str; 2] = ["l_aileron", "r_aileron"];

/// Validate a raw target against `variant` and apply defaults.
///
/// Order matters: contradictions are checked on the raw fields before any
/// default is filled in, and every unrecognised field is reported at once.
pub fn normalize_target(target: &TrimTarget, variant: Variant) -> TrimResult<NormalizedTarget> {
    check_contradictions(target)?;

    let layout = variant.layout();
    let mut keys = Vec::with_capacity(target.len());
    let mut unrecognized = Vec::new();
    for (name, entry) in target.iter() {
        match TargetKey::for_layout(name, layout) {
            Some(key) => keys.push((key, name, entry)),
            None => unrecognized.push(name.to_string()),
        }
    }
    if !unrecognized.is_empty() {
        return Err(TrimError::UnrecognizedFields {
            variant,
            fields: unrecognized,
        });
    }

    let mut values = BTreeMap::new();
    for (key, name, entry) in keys {
        // Explicitly free entries are dropped here and also block defaults below.
        if let Some(value) = entry.value() {
            if !value.is_finite() {
                return Err(TrimError::InvalidTargetValue {
                    field: name.to_string(),
                    value,
                });
            }
            values.insert(key, value);
        }
    }

    let defaults = [
        TargetKey::Flight(FlightCondition::Beta),
        TargetKey::Flight(FlightCondition::Gamma),
    ]
    .into_iter()
    .chain(
        layout
            .secondary_controls()
            .iter()
            .map(|&surface| TargetKey::Surface(surface)),
    );
    for key in defaults {
        if !target.contains(key.name()) {
            values.insert(key, 0.0);
        }
    }

    let normalized = NormalizedTarget::from_values(values);
    debug!("Normalized {} target: {:?}", variant, normalized);
    Ok(normalized)
}

// A field counts as present whether it carries a value or is explicitly free.
fn check_contradictions(target: &TrimTarget) -> TrimResult<()> {
    for (fields, reason) in CONTRADICTIONS {
        if fields.iter().all(|field| target.contains(field)) {
            return Err(TrimError::ContradictoryTarget {
                fields: fields.to_vec(),
                reason,
            });
        }
    }

    if target.contains(COMBINED_AILERON) {
        let split: Vec<&'static str> = SPLIT_AILERONS
            .into_iter()
            .filter(|field| target.contains(field))
            .collect();
        if !split.is_empty() {
            let mut fields = vec![COMBINED_AILERON];
            fields.extend(split);
            return Err(TrimError::ContradictoryTarget {
                fields,
                reason: "combined and split aileron deflections are both specified",
            });
        }
    }

    Ok(())
}
