//! Human-mode rendering: headers, tables, spinner, confirmation prompt.

use std::io::{self, BufRead, Write};
use std::time::Duration;

use anyhow::{Context, Result};
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Attribute, Cell, ContentArrangement, Table};
use indicatif::{ProgressBar, ProgressStyle};

use sluice_core::{format_droplets_as_coins, Address, Output, OutputMode, RowIssue};

const SPINNER_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "✓"];
const ADDRESS_HEAD: usize = 6;
const ADDRESS_TAIL: usize = 4;

/// Progress spinner for human mode; agents get nothing on the terminal.
pub fn spinner(mode: OutputMode, message: &'static str) -> Option<ProgressBar> {
    (mode == OutputMode::Human).then(|| {
        let style = ProgressStyle::default_spinner().tick_strings(SPINNER_FRAMES);
        let pb = ProgressBar::new_spinner()
            .with_style(style)
            .with_message(message);
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    })
}

fn banner_lines(title: &str) -> [String; 3] {
    let inner = title.chars().count() + 4;
    let rule = "═".repeat(inner);
    [
        format!("╔{rule}╗"),
        format!("║  {title}  ║"),
        format!("╚{rule}╝"),
    ]
}

pub fn human_header(title: &str) {
    for line in banner_lines(title) {
        println!("{}", line.bright_white());
    }
    println!();
}

/// `2GgFvq...c9qv` style shortening for table cells.
fn short_address(address: &Address) -> String {
    let text = address.as_str();
    let len = text.chars().count();
    if len <= ADDRESS_HEAD + ADDRESS_TAIL + 4 {
        return text.to_string();
    }
    let head: String = text.chars().take(ADDRESS_HEAD).collect();
    let tail: String = text.chars().skip(len - ADDRESS_TAIL).collect();
    format!("{head}...{tail}")
}

fn bold_header(titles: &[&str]) -> Vec<Cell> {
    titles
        .iter()
        .map(|title| Cell::new(title).add_attribute(Attribute::Bold))
        .collect()
}

pub fn render_outputs_table(outputs: &[Output]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(bold_header(&["Row", "Address", "Coins", "Hours"]));

    for (i, out) in outputs.iter().enumerate() {
        table.add_row(vec![
            Cell::new(i),
            Cell::new(short_address(&out.address)),
            Cell::new(format_droplets_as_coins(out.coins)),
            Cell::new(out.hours),
        ]);
    }

    table
}

pub fn render_issues_table(issues: &[RowIssue]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(bold_header(&["Row", "Field", "Value", "Message"]));

    for issue in issues {
        table.add_row(vec![
            Cell::new(issue.row),
            Cell::new(&issue.field),
            Cell::new(&issue.value),
            Cell::new(&issue.message),
        ]);
    }

    table
}

pub fn confirm_or_abort(force: bool) -> Result<bool> {
    if force {
        return Ok(true);
    }

    println!(
        "{}",
        "⚠️  This will submit the transaction to the coinjoin coordinator.\n    Type 'yes' to continue, or 'no' to cancel:"
            .yellow()
    );
    print!("> ");
    io::stdout().flush().context("failed to flush stdout")?;

    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("failed to read stdin")?;
    let answer = line.trim().to_lowercase();

    Ok(answer == "y" || answer == "yes")
}

#[cfg(test)]
mod tests {
    use sluice_core::decode_address;

    use super::*;

    #[test]
    fn outputs_table_formats_coins_and_truncates_addresses() {
        let outputs = vec![Output {
            address: decode_address("2GgFvqoyk9RjwVzj8tqfcXVXB4orBwoc9qv").unwrap(),
            coins: 10_200_000,
            hours: 3,
        }];
        let rendered = render_outputs_table(&outputs).to_string();
        assert!(rendered.contains("2GgFvq...c9qv"));
        assert!(rendered.contains("10.2"));
    }

    #[test]
    fn issues_table_lists_every_issue() {
        let issues = vec![
            RowIssue {
                row: 1,
                field: "address".to_string(),
                value: "bogus".to_string(),
                message: "address is not valid base58".to_string(),
            },
            RowIssue {
                row: 4,
                field: "hours".to_string(),
                value: "-1".to_string(),
                message: "hours must be a base-10 unsigned integer".to_string(),
            },
        ];
        let rendered = render_issues_table(&issues).to_string();
        assert!(rendered.contains("bogus"));
        assert!(rendered.contains("hours"));
    }

    #[test]
    fn short_address_keeps_head_and_tail() {
        let long = decode_address("2GgFvqoyk9RjwVzj8tqfcXVXB4orBwoc9qv").unwrap();
        assert_eq!(short_address(&long), "2GgFvq...c9qv");

        let short = decode_address("fyqX5YuwXMUs4GEUE3LjLyhrqvNztFHQ4B").unwrap();
        assert_eq!(short_address(&short), "fyqX5Y...HQ4B");
    }

    #[test]
    fn banner_fits_its_title() {
        let [top, middle, bottom] = banner_lines("SLUICE: Coinjoin Review");
        assert_eq!(middle, "║  SLUICE: Coinjoin Review  ║");
        assert_eq!(top.chars().count(), middle.chars().count());
        assert_eq!(bottom.chars().count(), middle.chars().count());
    }

    #[test]
    fn spinner_is_disabled_in_agent_mode() {
        assert!(spinner(OutputMode::Agent, "working").is_none());
    }
}
