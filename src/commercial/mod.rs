use std::collections::{HashMap, HashSet};

/// Result of the commercial-extension check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Standard,
    Commercial,
}

/// A known official release of a commercial extension in the target
/// ecosystem's store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OfficialAlternative {
    pub name: String,
    pub url: String,
}

/// Commercial extensions whose vendors publish an official release on
/// addons.mozilla.org; converting these is pointless as well as
/// disallowed.
const OFFICIAL_ALTERNATIVES: &[(&str, &str, &str)] = &[
    (
        "hdokiejnpimakedhajhdlcegeplioahd",
        "LastPass",
        "https://addons.mozilla.org/en-US/firefox/addon/lastpass-password-manager/",
    ),
    (
        "kbfnbcaeplbcioakkpcpgfkobkghlhen",
        "Grammarly",
        "https://addons.mozilla.org/en-US/firefox/addon/grammarly-1/",
    ),
    (
        "bmnlcjabgnpnenekpadlanbbkooimhnj",
        "Honey",
        "https://addons.mozilla.org/en-US/firefox/addon/honey/",
    ),
    (
        "fjoaledfpmneenckfbpdfhkmimnjocfa",
        "NordVPN",
        "https://addons.mozilla.org/en-US/firefox/addon/nordvpn-proxy-extension/",
    ),
];

/// Commercial extensions with no curated equivalent; candidates for the
/// placeholder path.
const COMMERCIAL_EXTENSIONS: &[&str] = &[
    // Adobe Acrobat
    "efaidnbmnnnibpcajpcglclefindmkaj",
];

/// Curated, immutable lookup tables injected into the orchestrator.
///
/// Membership is a closed set maintained by the operator; it is never
/// consulted over the network.
#[derive(Debug, Clone)]
pub struct CuratedLists {
    commercial_ids: HashSet<String>,
    alternatives: HashMap<String, OfficialAlternative>,
}

impl CuratedLists {
    /// The built-in curated tables
    pub fn builtin() -> Self {
        let mut commercial_ids: HashSet<String> = COMMERCIAL_EXTENSIONS
            .iter()
            .map(|id| id.to_string())
            .collect();

        let mut alternatives = HashMap::new();
        for (id, name, url) in OFFICIAL_ALTERNATIVES {
            commercial_ids.insert(id.to_string());
            alternatives.insert(
                id.to_string(),
                OfficialAlternative {
                    name: name.to_string(),
                    url: url.to_string(),
                },
            );
        }

        Self {
            commercial_ids,
            alternatives,
        }
    }

    /// Empty tables, mainly for tests and fully-permissive runs
    pub fn empty() -> Self {
        Self {
            commercial_ids: HashSet::new(),
            alternatives: HashMap::new(),
        }
    }

    /// Add an extension id to the commercial set
    pub fn add_commercial(&mut self, id: impl Into<String>) {
        self.commercial_ids.insert(id.into());
    }

    /// Add or replace a curated official alternative (implies commercial)
    pub fn add_alternative(&mut self, id: impl Into<String>, alternative: OfficialAlternative) {
        let id = id.into();
        self.commercial_ids.insert(id.clone());
        self.alternatives.insert(id, alternative);
    }

    pub fn classify(&self, extension_id: &str) -> Classification {
        if self.commercial_ids.contains(extension_id) {
            Classification::Commercial
        } else {
            Classification::Standard
        }
    }

    pub fn official_alternative(&self, extension_id: &str) -> Option<&OfficialAlternative> {
        self.alternatives.get(extension_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_classifies_known_commercial() {
        let lists = CuratedLists::builtin();
        assert_eq!(
            lists.classify("hdokiejnpimakedhajhdlcegeplioahd"),
            Classification::Commercial
        );
        assert_eq!(
            lists.classify("abcdefghijklmnopabcdefghijklmnop"),
            Classification::Standard
        );
    }

    #[test]
    fn test_alternative_lookup() {
        let lists = CuratedLists::builtin();
        let alt = lists
            .official_alternative("kbfnbcaeplbcioakkpcpgfkobkghlhen")
            .unwrap();
        assert_eq!(alt.name, "Grammarly");
        assert!(alt.url.contains("addons.mozilla.org"));
    }

    #[test]
    fn test_commercial_without_alternative() {
        let lists = CuratedLists::builtin();
        let id = "efaidnbmnnnibpcajpcglclefindmkaj";
        assert_eq!(lists.classify(id), Classification::Commercial);
        assert!(lists.official_alternative(id).is_none());
    }

    #[test]
    fn test_add_commercial_without_alternative() {
        let mut lists = CuratedLists::empty();
        let id = "paidonlypaidonlypaidonlypaidonly";
        assert_eq!(lists.classify(id), Classification::Standard);

        lists.add_commercial(id);
        assert_eq!(lists.classify(id), Classification::Commercial);
        assert!(lists.official_alternative(id).is_none());
    }

    #[test]
    fn test_add_alternative_implies_commercial() {
        let mut lists = CuratedLists::empty();
        lists.add_alternative(
            "customidcustomidcustomidcustomid",
            OfficialAlternative {
                name: "Custom".to_string(),
                url: "https://example.com".to_string(),
            },
        );
        assert_eq!(
            lists.classify("customidcustomidcustomidcustomid"),
            Classification::Commercial
        );
    }
}
