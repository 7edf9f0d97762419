use serde_json::Value;

const FENCE: &str = "```";

/// Removes a ```` ``` ```` or ```` ```json ```` wrapper that models like to put
/// around structured output, then trims. Text without a fence is only trimmed.
pub fn strip_code_fence(raw: &str) -> &str {
  let mut text: &str = raw.trim();

  if let Some(rest) = text.strip_prefix(FENCE) {
    text = rest;
    if text.len() >= 4 && text.is_char_boundary(4) && text[..4].eq_ignore_ascii_case("json") {
      text = &text[4..];
    }
  }
  if let Some(rest) = text.strip_suffix(FENCE) {
    text = rest;
  }

  return text.trim();
}

/// Parses fenced or bare JSON out of an oracle reply.
pub fn parse_json_reply(raw: &str) -> Result<Value, serde_json::Error> {
  serde_json::from_str::<Value>(strip_code_fence(raw))
}

pub fn show_oracle_reply(output_str: &str, label: &str) {
  log::debug!("{:=<10} {:^28} {:=<10}", "", label, "");
  match parse_json_reply(output_str).and_then(|value| serde_json::to_string_pretty(&value)) {
    Ok(pretty) => log::debug!("{}", pretty),
    Err(_) => log::debug!("{}", output_str),
  }
  log::debug!("{:=<50}", "");
}

/// First `max_chars` characters of `text`, never splitting a code point.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
  match text.char_indices().nth(max_chars) {
    Some((byte_index, _)) => &text[..byte_index],
    None => text,
  }
}
