use crate::domain::{IncrementLevel, PreReleaseKind, Semver};
use crate::error::{PrSemverError, Result};

/// Pre-release and metadata options applied to the next version
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IncrementOptions {
    /// Custom pre-release label, takes priority over the flags below
    pub pre: Option<String>,
    pub rc: bool,
    pub beta: bool,
    pub alpha: bool,
    /// Build metadata appended verbatim
    pub meta: Option<String>,
    /// Keep the major at zero: a major change only bumps the minor while major is 0
    pub zero_major_dev: bool,
}

impl IncrementOptions {
    /// The one pre-release kind to apply, if any
    pub fn pre_release_kind(&self) -> Option<PreReleaseKind> {
        PreReleaseKind::select(self.pre.as_deref(), self.rc, self.beta, self.alpha)
    }

    fn build_metadata(&self) -> Option<&str> {
        self.meta.as_deref().filter(|meta| !meta.is_empty())
    }

    /// Check that custom labels are valid semver identifiers
    pub fn validate(&self) -> Result<()> {
        if let Some(PreReleaseKind::Custom(label)) = self.pre_release_kind() {
            semver::Prerelease::new(&label).map_err(|e| {
                PrSemverError::invalid_option(format!(
                    "Pre-release label '{}' is not a valid semver identifier: {}",
                    label, e
                ))
            })?;
        }
        if let Some(meta) = self.build_metadata() {
            semver::BuildMetadata::new(meta).map_err(|e| {
                PrSemverError::invalid_option(format!(
                    "Build metadata '{}' is not a valid semver identifier: {}",
                    meta, e
                ))
            })?;
        }
        Ok(())
    }
}

fn bump(component: u64, version: &Semver) -> Result<u64> {
    component
        .checked_add(1)
        .ok_or_else(|| PrSemverError::invalid_version(version.label()))
}

/// Compute the next version from `current` and the classified increment.
///
/// Any suffix on `current` is dropped. A requested pre-release continues the
/// highest `<new base>-<kind>.<n>` sequence found in `tag_names`, and build
/// metadata is appended after it.
pub fn increment_version<'a, I>(
    current: &Semver,
    level: IncrementLevel,
    options: &IncrementOptions,
    tag_names: I,
) -> Result<Semver>
where
    I: IntoIterator<Item = &'a str>,
{
    options.validate()?;

    let mut next = current.without_suffix();
    match level {
        IncrementLevel::Major if next.major > 0 || !options.zero_major_dev => {
            next.major = bump(next.major, current)?;
            next.minor = 0;
            next.patch = 0;
        }
        IncrementLevel::Major | IncrementLevel::Minor => {
            next.minor = bump(next.minor, current)?;
            next.patch = 0;
        }
        IncrementLevel::Patch => {
            next.patch = bump(next.patch, current)?;
        }
        IncrementLevel::None => {}
    }

    if let Some(kind) = options.pre_release_kind() {
        next.pre_release = Some(kind.next_pre_release(&next.base_label(), tag_names));
    }

    next.build_metadata = options.build_metadata().map(str::to_string);
    Ok(next)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(text: &str) -> Semver {
        Semver::parse(text).unwrap()
    }

    fn inc(current: &str, level: IncrementLevel, options: &IncrementOptions) -> String {
        increment_version(&v(current), level, options, std::iter::empty())
            .unwrap()
            .label()
    }

    #[test]
    fn test_basic_levels() {
        let options = IncrementOptions::default();
        assert_eq!(inc("4.2.3", IncrementLevel::Major, &options), "5.0.0");
        assert_eq!(inc("4.2.3", IncrementLevel::Minor, &options), "4.3.0");
        assert_eq!(inc("4.2.3", IncrementLevel::Patch, &options), "4.2.4");
        assert_eq!(inc("4.2.3", IncrementLevel::None, &options), "4.2.3");
    }

    #[test]
    fn test_zero_major_dev_mode() {
        let dev = IncrementOptions {
            zero_major_dev: true,
            ..Default::default()
        };
        assert_eq!(inc("0.3.0", IncrementLevel::Major, &dev), "0.4.0");
        assert_eq!(inc("0.3.5", IncrementLevel::Major, &dev), "0.4.0");
        assert_eq!(inc("0.3.0", IncrementLevel::Major, &IncrementOptions::default()), "1.0.0");
        assert_eq!(inc("2.3.0", IncrementLevel::Major, &dev), "3.0.0");
    }

    #[test]
    fn test_suffix_of_current_is_dropped() {
        let options = IncrementOptions::default();
        assert_eq!(inc("1.2.3+build.9", IncrementLevel::None, &options), "1.2.3");
        assert_eq!(inc("1.2.3-rc.1", IncrementLevel::Patch, &options), "1.2.4");
    }

    #[test]
    fn test_pre_release_continues_sequence() {
        let options = IncrementOptions {
            alpha: true,
            ..Default::default()
        };
        let tags = ["4.2.4-alpha.1", "4.2.3"];
        let next =
            increment_version(&v("4.2.3"), IncrementLevel::Patch, &options, tags.iter().copied())
                .unwrap();
        assert_eq!(next.label(), "4.2.4-alpha.2");
    }

    #[test]
    fn test_pre_release_starts_at_one() {
        let options = IncrementOptions {
            beta: true,
            ..Default::default()
        };
        assert_eq!(inc("1.0.0", IncrementLevel::Minor, &options), "1.1.0-beta.1");
    }

    #[test]
    fn test_pre_release_priority() {
        let options = IncrementOptions {
            pre: Some("snapshot".to_string()),
            rc: true,
            beta: true,
            alpha: true,
            ..Default::default()
        };
        assert_eq!(inc("1.0.0", IncrementLevel::Patch, &options), "1.0.1-snapshot.1");

        let options = IncrementOptions {
            beta: true,
            alpha: true,
            ..Default::default()
        };
        assert_eq!(inc("1.0.0", IncrementLevel::Patch, &options), "1.0.1-beta.1");
    }

    #[test]
    fn test_metadata_after_pre_release() {
        let options = IncrementOptions {
            rc: true,
            meta: Some("sha.5114f85".to_string()),
            ..Default::default()
        };
        let tags = ["2.0.0-rc.1", "2.0.0-rc.2"];
        let next =
            increment_version(&v("1.9.9"), IncrementLevel::Major, &options, tags.iter().copied())
                .unwrap();
        assert_eq!(next.label(), "2.0.0-rc.3+sha.5114f85");
        assert_eq!(next.build_metadata.as_deref(), Some("sha.5114f85"));
    }

    #[test]
    fn test_invalid_custom_labels_rejected() {
        let bad_pre = IncrementOptions {
            pre: Some("not valid!".to_string()),
            ..Default::default()
        };
        let err = increment_version(&v("1.0.0"), IncrementLevel::Patch, &bad_pre, std::iter::empty())
            .unwrap_err();
        assert!(matches!(err, PrSemverError::InvalidOption(_)));

        let bad_meta = IncrementOptions {
            meta: Some("a..b".to_string()),
            ..Default::default()
        };
        assert!(bad_meta.validate().is_err());
    }

    #[test]
    fn test_overflow_is_an_error() {
        let current = Semver::new(1, 2, u64::MAX);
        let result = increment_version(
            &current,
            IncrementLevel::Patch,
            &IncrementOptions::default(),
            std::iter::empty(),
        );
        assert!(result.is_err());
    }
}
