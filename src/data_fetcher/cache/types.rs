//! Cache reporting types

use std::fmt;

/// Summary of what the match cache directory currently holds
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub dir: String,
    /// Complete cache files
    pub entries: usize,
    /// Files too small to be trusted
    pub partial_entries: usize,
    pub total_bytes: u64,
}

impl fmt::Display for CacheStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Cache Location: {}", self.dir)?;
        writeln!(f, "Cached Matches: {}", self.entries)?;
        if self.partial_entries > 0 {
            writeln!(f, "Partial Files:  {}", self.partial_entries)?;
        }
        write!(f, "Total Size:     {:.1} KiB", self.total_bytes as f64 / 1024.0)
    }
}
