use comfy_table::{Cell, Color};

use super::format::{create_styled_table, header_cell, styled_cell};
use crate::check::{CheckItem, CheckStatus};

fn status_color(status: CheckStatus, use_color: bool) -> Option<Color> {
    if !use_color {
        return None;
    }
    match status {
        CheckStatus::Ok => Some(Color::Green),
        CheckStatus::Info => None,
        CheckStatus::Warn => Some(Color::Yellow),
        CheckStatus::Fail => Some(Color::Red),
    }
}

const RUN_COMMANDS: &str = "\
  pumpwatch generate --scenario combined   write sample telemetry
  pumpwatch --analyzer                     analyze telemetry, write a JSON report
  pumpwatch --dashboard                    terminal dashboard
  pumpwatch --chatbot                      rule-based chatbot
  pumpwatch --llm-chatbot --provider openai|ollama";

pub(crate) fn render_checks(items: &[CheckItem], use_color: bool) -> String {
    let mut table = create_styled_table();
    table.set_header(vec![
        header_cell("Check", use_color),
        header_cell("Status", use_color),
        header_cell("Detail", use_color),
    ]);
    for item in items {
        table.add_row(vec![
            Cell::new(item.name),
            styled_cell(
                item.status.as_str(),
                status_color(item.status, use_color),
                item.status == CheckStatus::Fail,
            ),
            Cell::new(&item.detail),
        ]);
    }
    format!("\n  Environment Check\n\n{table}\n\n  Commands\n\n{RUN_COMMANDS}\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_lists_items_and_commands() {
        let items = vec![CheckItem {
            name: "OPENAI_API_KEY",
            status: CheckStatus::Warn,
            detail: "not set".to_string(),
        }];
        let text = render_checks(&items, false);
        assert!(text.contains("OPENAI_API_KEY"));
        assert!(text.contains("warn"));
        assert!(text.contains("pumpwatch --analyzer"));
    }
}
