//! Conventional-commit category from the first message line.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::types::Category;

/// Ordered rules; the first match wins.
static RULES: Lazy<Vec<(Regex, Category)>> = Lazy::new(|| {
  [
    (r"(?i)^(fix|bug)(\(.*\))?:", Category::Bug),
    (r"(?i)^(feat|feature)(\(.*\))?:", Category::Feature),
    (r"(?i)^ci(\(.*\))?:", Category::Ci),
    (r"(?i)^docs(\(.*\))?:", Category::Docs),
    (r"(?i)^test(\(.*\))?:", Category::Test),
    (r"(?i)^perf(\(.*\))?:", Category::Perf),
  ]
  .into_iter()
  .map(|(pattern, category)| (Regex::new(pattern).expect("category regex"), category))
  .collect()
});

/// Category of a commit message line, or `None` for anything else.
pub fn categorize(message: &str) -> Option<Category> {
  RULES
    .iter()
    .find(|(pattern, _)| pattern.is_match(message))
    .map(|(_, category)| *category)
}
