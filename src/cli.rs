//! Line tokenizing and framed text output for the interactive loop.

use crate::{dispatch::Output, types::Operand};

/// Width of the framed output.
pub const FRAME_WIDTH: usize = 50;

/// Splits a line into a lowercased command name and its operands.
///
/// Integer-looking tokens become [`Operand::Int`], other numbers
/// [`Operand::Float`], anything else [`Operand::Text`].
pub fn parse_line(line: &str) -> Option<(String, Vec<Operand>)> {
    let mut tokens = line.split_whitespace();
    let command = tokens.next()?.to_lowercase();
    let args = tokens.map(parse_token).collect();
    Some((command, args))
}

fn parse_token(token: &str) -> Operand {
    if let Ok(v) = token.parse::<i64>() {
        Operand::Int(v)
    } else if let Ok(v) = token.parse::<f64>() {
        Operand::Float(v)
    } else {
        Operand::Text(token.to_string())
    }
}

/// Centers `text` in `width` columns. Odd padding leans the same way as
/// Python's `str.center`.
pub fn center_text(text: &str, width: usize) -> String {
    let len = text.chars().count();
    if len >= width {
        return text.to_string();
    }
    let pad = width - len;
    let left = pad / 2 + (pad & width & 1);
    format!("{}{}{}", " ".repeat(left), text, " ".repeat(pad - left))
}

/// Frames an [`Output`] the way the interactive loop prints it.
pub fn render(output: &Output, width: usize) -> String {
    let rule = "=".repeat(width);
    let mut lines = vec![String::new(), rule.clone()];
    match output {
        Output::Number(n) => {
            lines.push(String::new());
            lines.push(center_text(&format!("Result: {n}"), width));
            lines.push(String::new());
        }
        Output::History(entries) if entries.is_empty() => {
            lines.push(center_text("History is empty.", width));
        }
        Output::History(entries) => {
            lines.extend(entries.iter().map(|calc| center_text(&calc.to_string(), width)));
        }
        Output::Message(text) => {
            lines.extend(text.lines().map(|line| center_text(line, width)));
        }
    }
    lines.push(rule);
    lines.push(String::new());
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn center_matches_reference_padding() {
        assert_eq!(center_text("Hello", 20), "       Hello        ");
        assert_eq!(center_text("toolongtext", 4), "toolongtext");
    }

    #[test]
    fn tokens_classify_by_shape() {
        let (cmd, args) = parse_line("  ADD 3 2.5 x ").unwrap();
        assert_eq!(cmd, "add");
        assert_eq!(
            args,
            vec![Operand::Int(3), Operand::Float(2.5), Operand::Text("x".into())]
        );
        assert!(parse_line("   ").is_none());
    }

    #[test]
    fn number_output_is_framed() {
        let out = render(&Output::Number(8.0), 20);
        assert!(out.contains(&"=".repeat(20)));
        assert!(out.contains("     Result: 8      "));
    }
}
