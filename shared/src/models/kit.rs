//! Kit availability computation

/// How many complete kits can be assembled from current stock.
///
/// Each element pairs a component's available stock with the quantity the
/// kit consumes. Availability is the minimum over all components; a kit
/// with no components has zero availability.
pub fn kit_availability(components: &[(i32, i32)]) -> i32 {
    components
        .iter()
        .map(|(stock, per_kit)| {
            if *per_kit > 0 {
                stock / per_kit
            } else {
                0
            }
        })
        .min()
        .unwrap_or(0)
        .max(0)
}
