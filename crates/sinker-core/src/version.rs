//! Image tag versions and upstream update detection

use crate::error::{Error, Result};
use semver::{BuildMetadata, Prerelease};
use std::cmp::Ordering;
use std::fmt;
use tracing::trace;

/// Most newer versions reported for a single image
pub const MAX_NEWER_VERSIONS: usize = 5;

/// A tag parsed as a version, keeping the tag's original text.
///
/// Accepts an optional leading `v`, any number of numeric release segments
/// (`1`, `1.2`, `1.2.3.4`), a pre-release with or without a leading hyphen
/// (`1.2.3-rc.1`, `1.2.3rc1`) and build metadata (`+build.5`). Release
/// segments compare as if padded with zeros to the same length.
#[derive(Debug, Clone)]
pub struct ImageVersion {
    original: String,
    segments: Vec<u64>,
    pre: Prerelease,
    build: BuildMetadata,
}

impl ImageVersion {
    pub fn parse(tag: &str) -> Result<Self> {
        let invalid = || Error::version_parse(tag);

        let text = tag.trim();
        let text = text.strip_prefix('v').unwrap_or(text);

        let (text, build) = match text.split_once('+') {
            Some((_, "")) => return Err(invalid()),
            Some((text, build)) => (text, BuildMetadata::new(build).map_err(|_| invalid())?),
            None => (text, BuildMetadata::EMPTY),
        };

        let release_end = text
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(text.len());
        let (release, rest) = text.split_at(release_end);

        let pre = match rest.strip_prefix('-') {
            Some("") => return Err(invalid()),
            Some(pre) => Prerelease::new(pre).map_err(|_| invalid())?,
            None if rest.is_empty() => Prerelease::EMPTY,
            // Suffix written straight after the release: 1.2.3rc1
            None if rest.starts_with(|c: char| c.is_ascii_alphabetic()) => {
                Prerelease::new(rest).map_err(|_| invalid())?
            }
            None => return Err(invalid()),
        };

        let segments = release
            .split('.')
            .map(|segment| {
                if segment.is_empty() {
                    return Err(invalid());
                }
                segment.parse::<u64>().map_err(|_| invalid())
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            original: tag.to_string(),
            segments,
            pre,
            build,
        })
    }

    /// The tag exactly as it was parsed
    pub fn original(&self) -> &str {
        &self.original
    }

    /// Numeric release segments as written, without padding
    pub fn segments(&self) -> &[u64] {
        &self.segments
    }

    pub fn pre(&self) -> &Prerelease {
        &self.pre
    }

    pub fn build(&self) -> &BuildMetadata {
        &self.build
    }
}

impl PartialEq for ImageVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ImageVersion {}

impl PartialOrd for ImageVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ImageVersion {
    /// Release segments padded with zeros, then pre-release precedence;
    /// build metadata does not count.
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.segments.len().max(other.segments.len());
        (0..len)
            .map(|i| {
                let a = self.segments.get(i).copied().unwrap_or(0);
                let b = other.segments.get(i).copied().unwrap_or(0);
                a.cmp(&b)
            })
            .find(|ordering| ordering.is_ne())
            .unwrap_or(Ordering::Equal)
            .then_with(|| self.pre.cmp(&other.pre))
    }
}

impl fmt::Display for ImageVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.original)
    }
}

/// Whether a tag looks like a release: at least two dots and no hyphen.
///
/// Rejects floating tags (`latest`, `stable`), short versions (`1.2`) and
/// pre-releases (`1.2.3-rc1`).
pub fn is_release_tag(tag: &str) -> bool {
    tag.matches('.').count() > 1 && !tag.contains('-')
}

/// Keep the release-like tags, in their original order
pub fn filter_tags<S: AsRef<str>>(tags: &[S]) -> Vec<String> {
    tags.iter()
        .map(AsRef::as_ref)
        .filter(|tag| is_release_tag(tag))
        .map(str::to_string)
        .collect()
}

/// Tags that are strictly newer than `current`, in the order given.
///
/// Tags that do not parse are dropped. When more than
/// [`MAX_NEWER_VERSIONS`] are newer, only the last ones in the given order
/// are kept; this does not pick the highest versions.
pub fn newer_versions<S: AsRef<str>>(current: &ImageVersion, tags: &[S]) -> Vec<String> {
    let mut newer: Vec<String> = tags
        .iter()
        .map(AsRef::as_ref)
        .filter_map(|tag| match ImageVersion::parse(tag) {
            Ok(version) => Some(version),
            Err(_) => {
                trace!("Skipping non-semver tag: {}", tag);
                None
            }
        })
        .filter(|version| version > current)
        .map(|version| version.original)
        .collect();

    if newer.len() > MAX_NEWER_VERSIONS {
        newer = newer.split_off(newer.len() - MAX_NEWER_VERSIONS);
    }

    newer
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(tag: &str) -> ImageVersion {
        ImageVersion::parse(tag).unwrap()
    }

    #[test]
    fn test_version_parsing() {
        assert_eq!(v("1.2.3").segments(), &[1, 2, 3]);
        assert_eq!(v("v1.2.3").segments(), &[1, 2, 3]);
        assert_eq!(v("1.2").segments(), &[1, 2]);
        assert_eq!(v("7").segments(), &[7]);
        assert_eq!(v("1.2.3.4").segments(), &[1, 2, 3, 4]);
        assert_eq!(v("v1.0.0").original(), "v1.0.0");

        let pre = v("1.2.3-rc.1+build.5");
        assert_eq!(pre.pre().as_str(), "rc.1");
        assert_eq!(pre.build().as_str(), "build.5");

        let pre = v("1.2.3rc1");
        assert_eq!(pre.segments(), &[1, 2, 3]);
        assert_eq!(pre.pre().as_str(), "rc1");
    }

    #[test]
    fn test_invalid_versions() {
        for tag in [
            "latest", "", "v", "1..2", "1.x.0", "1.2.3-", "bad-tag", "1.2.", "1.2.3.rc1", "1.2_3",
        ] {
            assert!(
                matches!(ImageVersion::parse(tag), Err(Error::VersionParse { .. })),
                "expected {:?} to be rejected",
                tag
            );
        }
    }

    #[test]
    fn test_version_comparison() {
        assert!(v("1.0.1") > v("1.0.0"));
        assert!(v("1.1.0") > v("1.0.9"));
        assert!(v("2.0.0") > v("1.99.99"));
        assert!(v("1.0.0") > v("1.0.0-rc.1"));
        assert!(v("1.0.0-rc.2") > v("1.0.0-rc.1"));
        assert_eq!(v("v1.0.0"), v("1.0.0"));
        assert_eq!(v("1.0"), v("1.0.0"));
        assert_eq!(v("1.0.0+build.1"), v("1.0.0+build.2"));
    }

    #[test]
    fn test_segments_compare_zero_padded() {
        assert!(v("1.2.3.4") > v("1.2.3"));
        assert!(v("1.2.10") > v("1.2.9.9"));
        assert_eq!(v("1.2.3.0"), v("1.2.3"));
        assert_eq!(v("1"), v("1.0.0.0"));
    }

    #[test]
    fn test_pre_release_without_hyphen() {
        assert!(v("1.2.3rc1") < v("1.2.3"));
        assert!(v("1.2.3rc1") > v("1.2.2"));
        assert!(v("1.2.3rc2") > v("1.2.3rc1"));
        assert_eq!(v("1.2.3rc1"), v("1.2.3-rc1"));
    }

    #[test]
    fn test_release_tag_filter() {
        assert!(is_release_tag("1.2.3"));
        assert!(is_release_tag("v1.2.3"));
        assert!(!is_release_tag("1.2.3-rc1"));
        assert!(!is_release_tag("latest"));
        assert!(!is_release_tag("1.2"));

        let tags = ["latest", "1.2.3", "1.2", "2.0.0-rc", "1.10.0", "stable"];
        assert_eq!(filter_tags(&tags), vec!["1.2.3", "1.10.0"]);
    }

    #[test]
    fn test_newer_versions() {
        let tags = ["1.0.1", "1.1.0", "0.9.0", "bad-tag", "2.0.0-rc"];
        let candidates = filter_tags(&tags);
        assert_eq!(candidates, vec!["1.0.1", "1.1.0", "0.9.0"]);

        let newer = newer_versions(&v("1.0.0"), &candidates);
        assert_eq!(newer, vec!["1.0.1", "1.1.0"]);
    }

    #[test]
    fn test_no_newer_versions() {
        let tags = ["0.9.0", "1.0.0", "v1.0.0"];
        assert!(newer_versions(&v("1.0.0"), &tags).is_empty());
    }

    #[test]
    fn test_newer_versions_keep_original_text() {
        let tags = ["v1.2.0", "1.3.0"];
        assert_eq!(newer_versions(&v("v1.0.0"), &tags), vec!["v1.2.0", "1.3.0"]);
    }

    #[test]
    fn test_unparsable_candidates_are_dropped() {
        let tags = ["1.2.3.rc1", "1.x.0", "1.1.0"];
        assert_eq!(newer_versions(&v("1.0.0"), &tags), vec!["1.1.0"]);
    }

    #[test]
    fn test_four_segment_tags() {
        let tags = filter_tags(&["1.0.0.1", "2.0.0.0", "0.9.9.9", "1.0.0.0"]);
        assert_eq!(tags, vec!["1.0.0.1", "2.0.0.0", "0.9.9.9", "1.0.0.0"]);
        assert_eq!(newer_versions(&v("1.0.0"), &tags), vec!["1.0.0.1", "2.0.0.0"]);

        assert_eq!(newer_versions(&v("1.2.3.4"), &["1.2.3.5", "1.2.3"]), vec!["1.2.3.5"]);
    }

    #[test]
    fn test_cap_keeps_last_in_registry_order_not_highest() {
        // The registry lists the highest version first; the cap keeps the
        // last five in list order, so 9.0.0 is dropped.
        let tags = ["9.0.0", "1.1.0", "1.2.0", "1.3.0", "1.4.0", "1.5.0"];
        let newer = newer_versions(&v("1.0.0"), &tags);
        assert_eq!(newer, vec!["1.1.0", "1.2.0", "1.3.0", "1.4.0", "1.5.0"]);
        assert!(!newer.contains(&"9.0.0".to_string()));
    }
}
