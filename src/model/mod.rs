pub mod order;
pub mod policy;
pub mod price;
pub mod vehicle;

pub use order::{Order, OrderStatus};
pub use policy::{Policy, PolicyStatus, PolicyType};
pub use price::Price;
pub use vehicle::{Vehicle, VehicleDetails, VinStatus};

use crate::core::{LedgerError, Result};

/// Parse a status or type argument: the variant name in any case (with or without
/// `_`/`-`/spaces) or its position in `variants`.
pub(crate) fn parse_variant<T: Copy>(field: &str, input: &str, variants: &[(T, &str)]) -> Result<T> {
    let trimmed = input.trim();

    if let Ok(index) = trimmed.parse::<usize>() {
        return variants.get(index).map(|(v, _)| *v).ok_or_else(|| {
            LedgerError::InvalidArgument(format!(
                "{} index {} is out of range (0..{})",
                field,
                index,
                variants.len()
            ))
        });
    }

    let normalized: String = trimmed
        .chars()
        .filter(|c| !matches!(c, '_' | '-' | ' '))
        .map(|c| c.to_ascii_uppercase())
        .collect();

    variants
        .iter()
        .find(|(_, name)| name.replace('_', "") == normalized)
        .map(|(v, _)| *v)
        .ok_or_else(|| {
            let names: Vec<&str> = variants.iter().map(|(_, name)| *name).collect();
            LedgerError::InvalidArgument(format!(
                "{} '{}' is not one of {}",
                field,
                input,
                names.join(", ")
            ))
        })
}
