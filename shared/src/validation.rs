//! Validation utilities for the Maestranza Inventory Platform

/// Validate a movement quantity as supplied by the form layer
pub fn validate_movement_quantity(quantity: i32) -> Result<(), &'static str> {
    if quantity <= 0 {
        return Err("Quantity must be positive");
    }
    Ok(())
}

/// Validate product stock thresholds
pub fn validate_stock_levels(current: i32, minimum: i32) -> Result<(), &'static str> {
    if current < 0 {
        return Err("Current stock cannot be negative");
    }
    if minimum < 0 {
        return Err("Minimum stock cannot be negative");
    }
    Ok(())
}

/// Validate the global critical/low stock display thresholds.
/// The critical threshold must sit strictly below the low threshold.
pub fn validate_alert_thresholds(critical: i32, low: i32) -> Result<(), &'static str> {
    if critical < 0 || low < 0 {
        return Err("Thresholds cannot be negative");
    }
    if critical >= low {
        return Err("Critical threshold must be below the low threshold");
    }
    Ok(())
}

/// Validate a batch's quantities on creation
pub fn validate_batch_quantities(initial: i32, current: i32) -> Result<(), &'static str> {
    if initial < 0 {
        return Err("Initial quantity cannot be negative");
    }
    if current < 0 {
        return Err("Current quantity cannot be negative");
    }
    if current > initial {
        return Err("Current quantity cannot exceed the initial quantity");
    }
    Ok(())
}

/// Available quantity for an exit: a named batch bounds the exit, the
/// product aggregate bounds it otherwise.
pub fn exit_availability(batch_quantity: Option<i32>, product_stock: i32) -> i32 {
    batch_quantity.unwrap_or(product_stock)
}

/// Direct stock edits are only allowed for products without active batches.
/// Once batches exist they are the source of truth and stock changes go
/// through the movement ledger.
pub fn validate_direct_stock_edit(active_batches: i64) -> Result<(), &'static str> {
    if active_batches > 0 {
        return Err("Stock is managed by batches; record a movement instead");
    }
    Ok(())
}

/// Validate a product serial number
pub fn validate_serial_number(serial: &str) -> Result<(), &'static str> {
    let serial = serial.trim();
    if serial.is_empty() {
        return Err("Serial number cannot be empty");
    }
    if serial.len() > 50 {
        return Err("Serial number is too long");
    }
    Ok(())
}
