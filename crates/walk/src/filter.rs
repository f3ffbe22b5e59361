use filters::PatternSet;

/// Include and exclude pattern sets narrowed to one directory.
///
/// Both sets are optional; an absent set places no restriction. Entering a
/// directory derives the filter for its contents:
///
/// - a directory fully matched by the includes lifts the include filter below
///   it, and one with no include pattern left below it is skipped;
/// - a directory fully matched by the excludes is skipped, and one with no
///   exclude pattern left below it lifts the exclude filter.
///
/// # Examples
///
/// ```
/// use filters::PatternSet;
/// use walk::PathFilter;
///
/// let includes = PatternSet::parse(["/src/lib/"]).unwrap();
/// let filter = PathFilter::new(Some(includes), None);
///
/// assert!(filter.descend("docs").is_none());
/// let src = filter.descend("src").unwrap();
/// assert!(!src.admits_file("main.c"));
/// let lib = src.descend("lib").unwrap();
/// assert!(lib.admits_file("util.c"));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PathFilter {
    includes: Option<PatternSet>,
    excludes: Option<PatternSet>,
}

impl PathFilter {
    /// Builds a filter from optional include and exclude sets.
    #[must_use]
    pub const fn new(includes: Option<PatternSet>, excludes: Option<PatternSet>) -> Self {
        Self { includes, excludes }
    }

    /// Returns `true` when neither set restricts anything.
    #[must_use]
    pub const fn is_unrestricted(&self) -> bool {
        self.includes.is_none() && self.excludes.is_none()
    }

    /// Whether the file `name` in the current directory passes the filter.
    #[must_use]
    pub fn admits_file(&self, name: &str) -> bool {
        if let Some(includes) = &self.includes
            && !includes.matches_file(name)
        {
            return false;
        }
        !self
            .excludes
            .as_ref()
            .is_some_and(|excludes| excludes.matches_file(name))
    }

    /// The filter for the subdirectory `name`, or `None` when the directory is
    /// filtered out.
    #[must_use]
    pub fn descend(&self, name: &str) -> Option<Self> {
        let includes = match &self.includes {
            Some(includes) => {
                let (matched, narrowed) = includes.descend(name);
                if matched {
                    None
                } else if narrowed.is_empty() {
                    return None;
                } else {
                    Some(narrowed)
                }
            }
            None => None,
        };

        let excludes = match &self.excludes {
            Some(excludes) => {
                let (matched, narrowed) = excludes.descend(name);
                if matched {
                    return None;
                }
                (!narrowed.is_empty()).then_some(narrowed)
            }
            None => None,
        };

        Some(Self { includes, excludes })
    }
}
