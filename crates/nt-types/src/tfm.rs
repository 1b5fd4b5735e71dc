//! Target-framework (TFM) family classification, used by the TFM
//! adoption refresher (§4.I) to group moniker strings like `net8.0` or
//! `netstandard2.0` into a small, stable set of families.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TfmFamily {
    /// Modern, unified .NET (`net5.0` and later).
    Net,
    /// .NET Framework (`net4*`, `net[1-3]*`, `net20`, …).
    NetFramework,
    /// .NET Standard (`netstandard*`).
    NetStandard,
    /// Everything else: `netcoreapp*`, portable profiles, mono, etc.
    Other,
}

impl TfmFamily {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Net => ".NET",
            Self::NetFramework => ".NET Framework",
            Self::NetStandard => ".NET Standard",
            Self::Other => "Other",
        }
    }
}

/// Classify a raw TFM string into its family.
///
/// `net5.0` and above are the unified "`.NET`" family; anything shaped
/// like `net4xx`/`net[23]xx`/`net1x` (two or three bare digits, no dot)
/// is classic .NET Framework; `netstandard*` is its own family; anything
/// else falls into [`TfmFamily::Other`].
#[must_use]
pub fn tfm_family(tfm: &str) -> TfmFamily {
    let lower = tfm.to_lowercase();

    if let Some(rest) = lower.strip_prefix("netstandard") {
        if rest.chars().next().is_some_and(|c| c.is_ascii_digit()) {
            return TfmFamily::NetStandard;
        }
    }

    if let Some(rest) = lower.strip_prefix("net") {
        if let Some(major) = leading_major_version(rest) {
            if rest.contains('.') {
                return if major >= 5 {
                    TfmFamily::Net
                } else {
                    TfmFamily::Other
                };
            }
            // Bare digits with no dot, e.g. "net48", "net472", "net20":
            // classic .NET Framework monikers.
            return TfmFamily::NetFramework;
        }
    }

    TfmFamily::Other
}

fn leading_major_version(rest: &str) -> Option<u32> {
    let digits: String = rest.chars().take_while(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return None;
    }
    if let Some(dot_pos) = rest.find('.') {
        rest[..dot_pos].parse().ok()
    } else {
        // e.g. "48" -> treat the first digit as the major version.
        digits.chars().next().and_then(|c| c.to_digit(10))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_modern_net() {
        assert_eq!(tfm_family("net8.0"), TfmFamily::Net);
        assert_eq!(tfm_family("net5.0"), TfmFamily::Net);
        assert_eq!(tfm_family("NET9.0"), TfmFamily::Net);
    }

    #[test]
    fn classifies_netcoreapp_as_other() {
        assert_eq!(tfm_family("net4.0"), TfmFamily::Other);
        assert_eq!(tfm_family("netcoreapp3.1"), TfmFamily::Other);
    }

    #[test]
    fn classifies_net_framework() {
        assert_eq!(tfm_family("net48"), TfmFamily::NetFramework);
        assert_eq!(tfm_family("net472"), TfmFamily::NetFramework);
        assert_eq!(tfm_family("net20"), TfmFamily::NetFramework);
    }

    #[test]
    fn classifies_net_standard() {
        assert_eq!(tfm_family("netstandard2.0"), TfmFamily::NetStandard);
        assert_eq!(tfm_family("netstandard1.6"), TfmFamily::NetStandard);
    }

    #[test]
    fn classifies_unknown_as_other() {
        assert_eq!(tfm_family("portable-net45+win8"), TfmFamily::Other);
        assert_eq!(tfm_family("monoandroid"), TfmFamily::Other);
    }

    proptest::proptest! {
        #[test]
        fn tfm_family_never_panics_on_arbitrary_input(s in "\\PC*") {
            let _ = tfm_family(&s);
        }

        #[test]
        fn netstandard_prefixed_digits_are_always_netstandard(major in 1u32..9, minor in 0u32..9) {
            let tfm = format!("netstandard{major}.{minor}");
            proptest::prop_assert_eq!(tfm_family(&tfm), TfmFamily::NetStandard);
        }
    }
}
