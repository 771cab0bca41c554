//! Small utility helpers used across modules.

/// Very small and safe string templating.
/// Replaces occurrences of `{key}` in the template with provided values.
/// This is intentionally simple (no nested/conditional logic).
pub fn fill_template(tpl: &str, pairs: &[(&str, &str)]) -> String {
  let mut out = tpl.to_string();
  for (k, v) in pairs {
    let needle = format!("{{{}}}", k);
    out = out.replace(&needle, v);
  }
  out
}

/// Log-safe truncation for large strings (char-boundary aware).
/// Avoids spamming logs with huge request/response payloads.
pub fn trunc_for_log(s: &str, max_chars: usize) -> String {
  match s.char_indices().nth(max_chars) {
    None => s.to_string(),
    Some((cut, _)) => format!("{}… ({} bytes total)", &s[..cut], s.len()),
  }
}

/// Lowercase and collapse every whitespace run into `sep`.
pub fn slugify(s: &str, sep: &str) -> String {
  s.split_whitespace()
    .map(str::to_lowercase)
    .collect::<Vec<_>>()
    .join(sep)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn fill_template_replaces_every_occurrence() {
    let out = fill_template("{n} of {n} on {t}", &[("n", "5"), ("t", "rust")]);
    assert_eq!(out, "5 of 5 on rust");
  }

  #[test]
  fn trunc_keeps_short_strings_and_respects_chars() {
    assert_eq!(trunc_for_log("abc", 5), "abc");
    let t = trunc_for_log("héllo wörld", 4);
    assert!(t.starts_with("héll…"));
    assert!(t.ends_with("bytes total)"));
  }

  #[test]
  fn slugify_collapses_whitespace() {
    assert_eq!(slugify("  The Solar\tSystem ", "_"), "the_solar_system");
    assert_eq!(slugify("", "_"), "");
  }
}
