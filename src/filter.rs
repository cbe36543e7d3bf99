//! File filter.
//! Decides whether a discovered file qualifies for relocation.
//!
//! Rules, applied in order (first rejection wins):
//! 1. include globs (when configured) must match the relative path
//! 2. exclude globs must not match
//! 3. allow-extension list (when configured) must contain the extension
//! 4. deny-extension list must not contain the extension
//! 5. size within [min_size, max_size]
//! 6. modification time within [newer_than, older_than]

use globset::GlobSet;
use std::path::Path;
use std::time::SystemTime;

use crate::config::Options;
use crate::errors::MnfError;
use crate::pathutil::{build_globset, ext_in_list, extension_of};

/// Facts about a candidate the filter looks at.
#[derive(Debug, Clone, Copy)]
pub struct Candidate<'a> {
    /// Path relative to the source root
    pub rel: &'a Path,
    /// Base name
    pub name: &'a str,
    pub size: u64,
    pub modified: Option<SystemTime>,
}

/// Compiled filter; built once per run and shared read-only by the walker.
#[derive(Debug, Default)]
pub struct Filter {
    includes: Option<GlobSet>,
    excludes: Option<GlobSet>,
    allow_ext: Vec<String>,
    deny_ext: Vec<String>,
    min_size: Option<u64>,
    max_size: Option<u64>,
    newer_than: Option<SystemTime>,
    older_than: Option<SystemTime>,
}

impl Filter {
    pub fn new(opts: &Options) -> Result<Self, MnfError> {
        Ok(Self {
            includes: build_globset(&opts.includes)?,
            excludes: build_globset(&opts.excludes)?,
            allow_ext: opts.allow_ext.iter().map(|e| normalize_ext(e)).collect(),
            deny_ext: opts.deny_ext.iter().map(|e| normalize_ext(e)).collect(),
            min_size: opts.min_size,
            max_size: opts.max_size,
            newer_than: opts.newer_than,
            older_than: opts.older_than,
        })
    }

    /// Pure accept/reject decision.
    pub fn accepts(&self, c: &Candidate<'_>) -> bool {
        if let Some(inc) = &self.includes
            && !inc.is_match(c.rel)
        {
            return false;
        }
        if let Some(exc) = &self.excludes
            && exc.is_match(c.rel)
        {
            return false;
        }

        let ext = extension_of(c.name);
        if !self.allow_ext.is_empty() {
            match ext {
                Some(e) if ext_in_list(&self.allow_ext, e) => {}
                _ => return false,
            }
        }
        if let Some(e) = ext
            && ext_in_list(&self.deny_ext, e)
        {
            return false;
        }

        if self.min_size.is_some_and(|min| c.size < min) {
            return false;
        }
        if self.max_size.is_some_and(|max| c.size > max) {
            return false;
        }

        if self.newer_than.is_some() || self.older_than.is_some() {
            let Some(mtime) = c.modified else {
                return false;
            };
            if self.newer_than.is_some_and(|floor| mtime < floor) {
                return false;
            }
            if self.older_than.is_some_and(|ceil| mtime > ceil) {
                return false;
            }
        }
        true
    }
}

/// Accept "jpg", ".jpg" and "JPG" alike.
fn normalize_ext(e: &str) -> String {
    e.trim().trim_start_matches('.').to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_size;
    use std::time::Duration;

    fn cand<'a>(rel: &'a str, size: u64) -> Candidate<'a> {
        let rel = Path::new(rel);
        Candidate {
            rel,
            name: rel.file_name().unwrap().to_str().unwrap(),
            size,
            modified: Some(SystemTime::UNIX_EPOCH + Duration::from_secs(1_000)),
        }
    }

    fn filter(f: impl FnOnce(&mut Options)) -> Filter {
        let mut o = Options::default();
        f(&mut o);
        Filter::new(&o).unwrap()
    }

    #[test]
    fn no_rules_accepts_everything() {
        let f = filter(|_| {});
        assert!(f.accepts(&cand("a/b/c.bin", 0)));
        assert!(f.accepts(&cand("a/.hidden", 0)));
    }

    #[test]
    fn include_and_exclude() {
        let f = filter(|o| {
            o.includes = vec!["**/*.jpg".into(), "**/*.png".into()];
            o.excludes = vec!["**/tmp/**".into()];
        });
        assert!(f.accepts(&cand("x/a.JPG", 1)));
        assert!(f.accepts(&cand("x/y/b.png", 1)));
        assert!(!f.accepts(&cand("x/a.gif", 1)));
        assert!(!f.accepts(&cand("x/tmp/a.jpg", 1)));
    }

    #[test]
    fn allow_list_is_case_insensitive() {
        let f = filter(|o| o.allow_ext = vec!["jpg".into(), "png".into()]);
        assert!(f.accepts(&cand("d/photo.JPG", 1)));
        assert!(!f.accepts(&cand("d/notes.txt", 1)));
        assert!(!f.accepts(&cand("d/Makefile", 1)));
        assert!(!f.accepts(&cand("d/.png", 1)));
    }

    #[test]
    fn deny_list() {
        let f = filter(|o| o.deny_ext = vec![".part".into(), "TMP".into()]);
        assert!(!f.accepts(&cand("d/movie.part", 1)));
        assert!(!f.accepts(&cand("d/x.tmp", 1)));
        assert!(f.accepts(&cand("d/movie.mkv", 1)));
        assert!(f.accepts(&cand("d/README", 1)));
    }

    #[test]
    fn size_bounds() {
        let f = filter(|o| o.min_size = Some(parse_size("10M").unwrap()));
        assert!(!f.accepts(&cand("d/small.bin", 5 * 1024 * 1024)));
        assert!(f.accepts(&cand("d/big.bin", 15 * 1024 * 1024)));

        let f = filter(|o| o.max_size = Some(100));
        assert!(f.accepts(&cand("d/a", 100)));
        assert!(!f.accepts(&cand("d/a", 101)));
    }

    #[test]
    fn time_bounds() {
        let at = |s| SystemTime::UNIX_EPOCH + Duration::from_secs(s);
        let f = filter(|o| {
            o.newer_than = Some(at(500));
            o.older_than = Some(at(1_000));
        });
        assert!(f.accepts(&cand("d/a", 1)));

        let f = filter(|o| o.newer_than = Some(at(1_001)));
        assert!(!f.accepts(&cand("d/a", 1)));

        let f = filter(|o| o.older_than = Some(at(999)));
        assert!(!f.accepts(&cand("d/a", 1)));
    }
}
