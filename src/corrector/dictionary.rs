use anyhow::{Context, Result};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DictionaryError {
    #[error("duplicate dictionary key after case folding: '{0}'")]
    DuplicateKey(String),
    #[error("dictionary entry '{0}' has an empty replacement")]
    EmptyValue(String),
}

/// Static American-to-British spelling map. Keys are case-folded to
/// lowercase at load time; one canonical British spelling per key.
#[derive(Debug, Clone)]
pub struct Dictionary {
    entries: HashMap<String, String>,
}

impl Dictionary {
    /// Build a dictionary from raw pairs, case-folding keys and rejecting
    /// collisions.
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self, DictionaryError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut entries = HashMap::new();
        for (key, value) in pairs {
            let key = key.as_ref().to_lowercase();
            let value = value.as_ref().to_string();
            if value.is_empty() {
                return Err(DictionaryError::EmptyValue(key));
            }
            if entries.insert(key.clone(), value).is_some() {
                return Err(DictionaryError::DuplicateKey(key));
            }
        }
        Ok(Self { entries })
    }

    /// The mapping compiled into the binary, used when no dictionary file
    /// is supplied.
    pub fn embedded() -> Self {
        let mut entries = HashMap::with_capacity(DEFAULT_MAPPINGS.len());
        for &(american, british) in DEFAULT_MAPPINGS {
            entries.insert(american.to_string(), british.to_string());
        }
        Self { entries }
    }

    /// Load a dictionary from a JSON file mapping American spellings to
    /// British spellings.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read dictionary: {}", path.display()))?;

        let map: HashMap<String, String> = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse dictionary: {}", path.display()))?;

        Self::from_pairs(map)
            .with_context(|| format!("Invalid dictionary: {}", path.display()))
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// Keep this table duplicate-free; `embedded()` inserts it without
// collision checks.
const DEFAULT_MAPPINGS: &[(&str, &str)] = &[
    ("acknowledgment", "acknowledgement"),
    ("aluminum", "aluminium"),
    ("analog", "analogue"),
    ("analyze", "analyse"),
    ("analyzed", "analysed"),
    ("analyzes", "analyses"),
    ("analyzing", "analysing"),
    ("apologize", "apologise"),
    ("apologized", "apologised"),
    ("apologizes", "apologises"),
    ("armor", "armour"),
    ("armored", "armoured"),
    ("artifact", "artefact"),
    ("artifacts", "artefacts"),
    ("behavior", "behaviour"),
    ("behavioral", "behavioural"),
    ("behaviors", "behaviours"),
    ("caliber", "calibre"),
    ("canceled", "cancelled"),
    ("canceling", "cancelling"),
    ("cancelation", "cancellation"),
    ("catalog", "catalogue"),
    ("catalogs", "catalogues"),
    ("center", "centre"),
    ("centered", "centred"),
    ("centering", "centring"),
    ("centers", "centres"),
    ("checkered", "chequered"),
    ("color", "colour"),
    ("colored", "coloured"),
    ("colorful", "colourful"),
    ("coloring", "colouring"),
    ("colorize", "colourise"),
    ("colors", "colours"),
    ("counselor", "counsellor"),
    ("counselors", "counsellors"),
    ("criticize", "criticise"),
    ("criticized", "criticised"),
    ("criticizes", "criticises"),
    ("defense", "defence"),
    ("defenses", "defences"),
    ("dialog", "dialogue"),
    ("dialogs", "dialogues"),
    ("emphasize", "emphasise"),
    ("emphasized", "emphasised"),
    ("emphasizes", "emphasises"),
    ("endeavor", "endeavour"),
    ("endeavors", "endeavours"),
    ("enroll", "enrol"),
    ("enrollment", "enrolment"),
    ("favor", "favour"),
    ("favorable", "favourable"),
    ("favorably", "favourably"),
    ("favored", "favoured"),
    ("favoring", "favouring"),
    ("favorite", "favourite"),
    ("favorites", "favourites"),
    ("favors", "favours"),
    ("fiber", "fibre"),
    ("fibers", "fibres"),
    ("flavor", "flavour"),
    ("flavored", "flavoured"),
    ("flavors", "flavours"),
    ("fulfill", "fulfil"),
    ("fulfillment", "fulfilment"),
    ("gray", "grey"),
    ("grayed", "greyed"),
    ("grays", "greys"),
    ("harbor", "harbour"),
    ("harbors", "harbours"),
    ("honor", "honour"),
    ("honorable", "honourable"),
    ("honored", "honoured"),
    ("honors", "honours"),
    ("humor", "humour"),
    ("installment", "instalment"),
    ("jewelry", "jewellery"),
    ("labeled", "labelled"),
    ("labeling", "labelling"),
    ("labor", "labour"),
    ("labored", "laboured"),
    ("liter", "litre"),
    ("liters", "litres"),
    ("luster", "lustre"),
    ("maneuver", "manoeuvre"),
    ("maneuvers", "manoeuvres"),
    ("marvelous", "marvellous"),
    ("maximize", "maximise"),
    ("maximized", "maximised"),
    ("maximizes", "maximises"),
    ("meager", "meagre"),
    ("minimize", "minimise"),
    ("minimized", "minimised"),
    ("minimizes", "minimises"),
    ("modeled", "modelled"),
    ("modeling", "modelling"),
    ("mold", "mould"),
    ("molds", "moulds"),
    ("mustache", "moustache"),
    ("neighbor", "neighbour"),
    ("neighborhood", "neighbourhood"),
    ("neighboring", "neighbouring"),
    ("neighbors", "neighbours"),
    ("offense", "offence"),
    ("offenses", "offences"),
    ("optimize", "optimise"),
    ("optimized", "optimised"),
    ("optimizes", "optimises"),
    ("optimizing", "optimising"),
    ("organization", "organisation"),
    ("organizational", "organisational"),
    ("organizations", "organisations"),
    ("organize", "organise"),
    ("organized", "organised"),
    ("organizer", "organiser"),
    ("organizes", "organises"),
    ("organizing", "organising"),
    ("pajamas", "pyjamas"),
    ("plow", "plough"),
    ("plows", "ploughs"),
    ("pretense", "pretence"),
    ("program", "programme"),
    ("programs", "programmes"),
    ("realize", "realise"),
    ("realized", "realised"),
    ("realizes", "realises"),
    ("realizing", "realising"),
    ("recognize", "recognise"),
    ("recognized", "recognised"),
    ("recognizes", "recognises"),
    ("recognizing", "recognising"),
    ("rumor", "rumour"),
    ("rumors", "rumours"),
    ("savior", "saviour"),
    ("skillful", "skilful"),
    ("somber", "sombre"),
    ("specter", "spectre"),
    ("summarize", "summarise"),
    ("summarized", "summarised"),
    ("summarizes", "summarises"),
    ("theater", "theatre"),
    ("theaters", "theatres"),
    ("traveled", "travelled"),
    ("traveler", "traveller"),
    ("travelers", "travellers"),
    ("traveling", "travelling"),
    ("utilize", "utilise"),
    ("utilized", "utilised"),
    ("utilizes", "utilises"),
    ("valor", "valour"),
    ("vapor", "vapour"),
    ("vigor", "vigour"),
];

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_embedded_dictionary() {
        let dict = Dictionary::embedded();
        assert_eq!(dict.get("color"), Some("colour"));
        assert_eq!(dict.get("behavior"), Some("behaviour"));
        assert_eq!(dict.get("colour"), None);
        assert!(!dict.is_empty());
    }

    #[test]
    fn test_keys_are_case_folded() {
        let dict = Dictionary::from_pairs([("Color", "colour")]).unwrap();
        assert_eq!(dict.get("color"), Some("colour"));
    }

    #[test]
    fn test_duplicate_key_after_folding_rejected() {
        let err = Dictionary::from_pairs([("color", "colour"), ("COLOR", "colour")]).unwrap_err();
        assert!(matches!(err, DictionaryError::DuplicateKey(_)));
    }

    #[test]
    fn test_empty_replacement_rejected() {
        let err = Dictionary::from_pairs([("color", "")]).unwrap_err();
        assert!(matches!(err, DictionaryError::EmptyValue(_)));
    }

    #[test]
    fn test_load_from_json_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("mappings.json");
        std::fs::write(&path, r#"{"color": "colour", "gray": "grey"}"#).unwrap();

        let dict = Dictionary::load_from_path(&path).unwrap();
        assert_eq!(dict.len(), 2);
        assert_eq!(dict.get("gray"), Some("grey"));
    }

    #[test]
    fn test_load_rejects_malformed_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{not json").unwrap();

        assert!(Dictionary::load_from_path(&path).is_err());
    }

    #[test]
    fn test_no_embedded_key_maps_to_itself() {
        // A key identical to its replacement would make every match a no-op.
        for (american, british) in Dictionary::embedded().iter() {
            assert_ne!(american, british);
        }
    }
}
