// Output formatting utilities

use crate::board::{Card, Renderer, StageSummary};
use crate::models::{Field, SlotId, Stage};
use std::io::IsTerminal;

// ANSI escape codes for terminal formatting
const ANSI_BOLD: &str = "\x1b[1m";
const ANSI_DIM: &str = "\x1b[2m";
const ANSI_RESET: &str = "\x1b[0m";
const ANSI_FG_BLACK: &str = "\x1b[30m";

/// Title shown above the card grid
pub const BOARD_TITLE: &str = "March Madness Website Launch!";

/// Width of the text area inside a card
const CARD_INNER_WIDTH: usize = 50;
/// Full card width including borders and padding
pub const CARD_WIDTH: usize = CARD_INNER_WIDTH + 4;
/// Spaces between cards in a row
const CARD_GAP: usize = 2;

/// Check if stdout is a terminal (TTY)
pub fn is_tty() -> bool {
    std::io::stdout().is_terminal()
}

/// Get terminal width dynamically
///
/// Uses the `terminal_size` crate for reliable detection, with fallback to
/// COLUMNS environment variable and a sensible default.
pub fn get_terminal_width() -> usize {
    if let Some((terminal_size::Width(w), _)) = terminal_size::terminal_size() {
        if w > 0 {
            return w as usize;
        }
    }

    if let Ok(cols) = std::env::var("COLUMNS") {
        if let Ok(width) = cols.parse::<usize>() {
            if width > 0 && width < 10000 {
                return width;
            }
        }
    }

    120
}

/// Apply bold formatting if in TTY mode
fn bold_if_tty(text: &str, is_tty: bool) -> String {
    if is_tty {
        format!("{}{}{}", ANSI_BOLD, text, ANSI_RESET)
    } else {
        text.to_string()
    }
}

/// Terminal column width of a single character
fn char_width(c: char) -> usize {
    match c as u32 {
        // variation selectors, zero-width joiner, combining marks
        0xFE00..=0xFE0F | 0x200B..=0x200D | 0x0300..=0x036F => 0,
        0x1100..=0x115F
        | 0x2E80..=0xA4CF
        | 0xAC00..=0xD7A3
        | 0xF900..=0xFAFF
        | 0xFF00..=0xFF60
        | 0xFFE0..=0xFFE6
        | 0x1F300..=0x1F64F
        | 0x1F680..=0x1F6FF
        | 0x1F900..=0x1F9FF
        | 0x2705
        | 0x274C
        | 0x2728 => 2,
        _ => 1,
    }
}

/// Terminal column width of a string
pub fn display_width(text: &str) -> usize {
    text.chars().map(char_width).sum()
}

/// Cut text to at most `width` columns, ending with an ellipsis when cut
pub fn truncate_to_width(text: &str, width: usize) -> String {
    if display_width(text) <= width {
        return text.to_string();
    }

    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = char_width(c);
        if used + w + 1 > width {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}

/// Truncate then right-pad text to exactly `width` columns
fn fit_to_width(text: &str, width: usize) -> String {
    let mut out = truncate_to_width(text, width);
    let pad = width.saturating_sub(display_width(&out));
    out.push_str(&" ".repeat(pad));
    out
}

/// Value of a card input, or its placeholder when empty
fn field_text(value: &str, field: Field) -> String {
    if value.is_empty() {
        format!("({})", field.placeholder())
    } else {
        // Inputs are single-line
        value.replace(['\n', '\r'], " ")
    }
}

/// Render one card as fixed-width lines
pub fn format_card(card: &Card, is_tty: bool) -> Vec<String> {
    let content = [
        format!("#{}", card.slot),
        format!("Name:    {}", field_text(&card.name, Field::Name)),
        format!("Manager: {}", field_text(&card.manager, Field::Manager)),
        format!("{} {}", card.icon(), card.label()),
        format!("[Advance] mmboard advance {}", card.slot),
    ];

    let border = "─".repeat(CARD_INNER_WIDTH + 2);
    let mut lines = Vec::with_capacity(content.len() + 2);
    lines.push(format!("┌{}┐", border));
    for (i, text) in content.iter().enumerate() {
        let mut cell = fit_to_width(text, CARD_INNER_WIDTH);
        if i == 0 {
            cell = bold_if_tty(&cell, is_tty);
        }
        if is_tty {
            let bg = card.stage.color().ansi_bg;
            // bold_if_tty resets attributes, so restore the background after it
            let cell = cell.replace(ANSI_RESET, &format!("{}{}{}", ANSI_RESET, bg, ANSI_FG_BLACK));
            lines.push(format!("│{}{} {} {}│", bg, ANSI_FG_BLACK, cell, ANSI_RESET));
        } else {
            lines.push(format!("│ {} │", cell));
        }
    }
    lines.push(format!("└{}┘", border));
    lines
}

/// Number of cards that fit side by side in `width` columns
pub fn columns_for_width(width: usize) -> usize {
    ((width + CARD_GAP) / (CARD_WIDTH + CARD_GAP)).max(1)
}

/// Render the title and the card grid
pub fn format_board(cards: &[Card], width: usize, is_tty: bool) -> String {
    let mut out = String::new();
    out.push_str(&bold_if_tty(BOARD_TITLE, is_tty));
    out.push_str("\n\n");

    if cards.is_empty() {
        out.push_str("No slots on the board.\n");
        return out;
    }

    let columns = columns_for_width(width);
    let gap = " ".repeat(CARD_GAP);
    for row in cards.chunks(columns) {
        let rendered: Vec<Vec<String>> = row.iter().map(|card| format_card(card, is_tty)).collect();
        let height = rendered.iter().map(|lines| lines.len()).max().unwrap_or(0);
        for i in 0..height {
            let line: Vec<&str> = rendered
                .iter()
                .map(|lines| lines.get(i).map(String::as_str).unwrap_or(""))
                .collect();
            out.push_str(line.join(&gap).trim_end());
            out.push('\n');
        }
    }
    out
}

/// Render the fixed stage table
pub fn format_stage_table(is_tty: bool) -> String {
    let header = format!("{:<5} {:<6} {:<12} {}", "Idx", "Icon", "Color", "Stage");
    let mut out = bold_if_tty(&header, is_tty);
    out.push('\n');
    for stage in Stage::ALL {
        out.push_str(&format!(
            "{:<5} {} {:<12} {}\n",
            stage.index(),
            fit_to_width(stage.icon(), 6),
            stage.color().name,
            stage.label()
        ));
    }
    out
}

/// Render the slots-per-stage summary
pub fn format_status(summary: &StageSummary, is_tty: bool) -> String {
    let mut out = bold_if_tty(&format!("{} ({} slots)", BOARD_TITLE, summary.total()), is_tty);
    out.push('\n');

    let label_width = Stage::ALL
        .iter()
        .map(|stage| display_width(&stage.to_string()))
        .max()
        .unwrap_or(0);
    for stage in Stage::ALL {
        let count = summary.count(stage);
        let line = format!("{}  {:>3}", fit_to_width(&stage.to_string(), label_width), count);
        if count == 0 && is_tty {
            out.push_str(&format!("{}{}{}\n", ANSI_DIM, line, ANSI_RESET));
        } else {
            out.push_str(&line);
            out.push('\n');
        }
    }
    out.push_str(&format!(
        "Launched: {}/{}\n",
        summary.count(Stage::Championship),
        summary.total()
    ));
    out
}

/// Slots-per-stage summary as JSON
pub fn format_status_json(summary: &StageSummary) -> serde_json::Value {
    let stages: Vec<serde_json::Value> = Stage::ALL
        .iter()
        .map(|stage| {
            serde_json::json!({
                "index": stage.index(),
                "label": stage.label(),
                "icon": stage.icon(),
                "color": stage.color().name,
                "count": summary.count(*stage),
            })
        })
        .collect();

    serde_json::json!({
        "total": summary.total(),
        "launched": summary.count(Stage::Championship),
        "stages": stages,
    })
}

/// One card as JSON
pub fn format_card_json(card: &Card) -> serde_json::Value {
    serde_json::json!({
        "slot": card.slot,
        "name": card.name,
        "manager": card.manager,
        "stage": card.stage.index(),
        "label": card.label(),
        "icon": card.icon(),
        "color": card.stage.color().name,
    })
}

/// Renderer that prints the card that just changed
pub struct CardEcho {
    is_tty: bool,
}

impl CardEcho {
    pub fn new(is_tty: bool) -> Self {
        Self { is_tty }
    }
}

impl Renderer for CardEcho {
    fn redraw(&mut self, cards: &[Card], changed: Option<SlotId>) {
        match changed.and_then(|slot| cards.iter().find(|card| card.slot == slot)) {
            Some(card) => {
                for line in format_card(card, self.is_tty) {
                    println!("{}", line);
                }
            }
            None => println!("Board reset: {} empty slots.", cards.len()),
        }
    }
}
