//! File paths that never count toward a change score (lockfiles, build output, logs, binaries).

use once_cell::sync::Lazy;
use regex::Regex;

const NOISE_PATTERNS: &[&str] = &[
  // dependency locks
  r"package-lock\.json$",
  r"yarn\.lock$",
  r"pnpm-lock\.yaml$",
  r"bun\.lockb$",
  // dependency directories
  r"\bnode_modules[/\\]",
  r"\bvendor[/\\]",
  // build outputs
  r"\bdist[/\\]",
  r"\bbuild[/\\]",
  r"\bout[/\\]",
  r"\.next[/\\]",
  r"\.nuxt[/\\]",
  r"\bcoverage[/\\]",
  // environment / OS files
  r"\.env(\..*)?$",
  r"\.DS_Store$",
  r"\bThumbs\.db$",
  // logs
  r"\.log$",
  // compiled / binary
  r"\.pyc$",
  r"\.pyo$",
  r"\.class$",
  r"\.o$",
  r"\.obj$",
  r"\.so$",
  r"\.dll$",
  r"\.exe$",
  r"\.out$",
  // license
  r"LICENSE$",
];

static NOISE_RE: Lazy<Regex> = Lazy::new(|| {
  let alternation = NOISE_PATTERNS.join("|");
  Regex::new(&format!("(?i)({})", alternation)).expect("noise regex")
});

/// True when the path is infrastructure noise and must be skipped before scoring.
pub fn is_noise(path: &str) -> bool {
  NOISE_RE.is_match(path)
}
