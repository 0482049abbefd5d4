// Error handling utilities for consistent error messages and exit codes

use std::process;
use crate::models::SlotId;

/// Exit with a user error (exit code 1)
/// User errors are for invalid input, unknown slots, etc.
pub fn user_error(message: &str) -> ! {
    eprintln!("Error: {}", message);
    process::exit(1);
}

/// Validate that a slot argument is a non-negative integer
pub fn validate_slot_id(slot_str: &str) -> Result<SlotId, String> {
    let trimmed = slot_str.trim().trim_start_matches('#');
    trimmed.parse::<SlotId>()
        .map_err(|_| format!("Invalid slot: '{}'. Slot must be a non-negative number.", slot_str))
}

/// Message for a slot that parses but is not on the board
pub fn slot_not_found_message(slot: SlotId, slots: &[SlotId]) -> String {
    match (slots.first(), slots.last()) {
        (Some(first), Some(last)) => {
            format!("Slot {} not found. The board has slots {}-{}.", slot, first, last)
        }
        _ => format!("Slot {} not found. The board is empty.", slot),
    }
}
