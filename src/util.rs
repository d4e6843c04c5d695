//! Small utility helpers used across modules.

/// Very small and safe string templating.
/// Replaces occurrences of `{key}` in the template with provided values.
/// Single pass per key; values are not re-scanned for other keys' placeholders.
pub fn fill_template(tpl: &str, pairs: &[(&str, &str)]) -> String {
  let mut out = tpl.to_string();
  for (k, v) in pairs {
    let needle = format!("{{{}}}", k);
    out = out.replace(&needle, v);
  }
  out
}

/// Remove a surrounding markdown code fence (```` ```lang ... ``` ````) that
/// models add despite being told not to. Unfenced input is only trimmed.
pub fn strip_code_fences(s: &str) -> String {
  let trimmed = s.trim();
  let Some(rest) = trimmed.strip_prefix("```") else {
    return trimmed.to_string();
  };
  // Drop the info string ("python", "json", ...) up to the first newline.
  let body = match rest.find('\n') {
    Some(nl) if rest[..nl].chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '#' | '-' | '_')) => &rest[nl + 1..],
    _ => rest,
  };
  let body = body.trim_end();
  body.strip_suffix("```").unwrap_or(body).trim().to_string()
}

/// Log-safe truncation for large strings (char-boundary aware).
pub fn trunc_for_log(s: &str, max: usize) -> String {
  if s.len() <= max {
    return s.to_string();
  }
  let mut end = max;
  while !s.is_char_boundary(end) {
    end -= 1;
  }
  format!("{}… ({} bytes total)", &s[..end], s.len())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn fills_all_occurrences() {
    let out = fill_template("{lang} and {lang} at {level}", &[("lang", "rust"), ("level", "Hard")]);
    assert_eq!(out, "rust and rust at Hard");
  }

  #[test]
  fn strips_fences_with_and_without_language() {
    assert_eq!(strip_code_fences("```python\nprint(1)\n```"), "print(1)");
    assert_eq!(strip_code_fences("```\nfn main() {}\n```  "), "fn main() {}");
    assert_eq!(strip_code_fences("```c++\nint x;\n```"), "int x;");
    assert_eq!(strip_code_fences("  x = 1\n"), "x = 1");
  }

  #[test]
  fn unterminated_fence_keeps_body() {
    assert_eq!(strip_code_fences("```js\nconsole.log(1)"), "console.log(1)");
  }

  #[test]
  fn truncation_respects_char_boundaries() {
    assert_eq!(trunc_for_log("short", 10), "short");
    let out = trunc_for_log("héllo wörld", 2);
    assert!(out.starts_with("h…"));
  }
}
